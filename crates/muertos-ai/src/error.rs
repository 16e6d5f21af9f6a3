//! Errors that can occur when invoking a completion provider.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("API key not configured")]
  NoApiKey,

  #[error("network error: {0}")]
  Network(String),

  #[error("API error (status {status}): {message}")]
  Api { status: u16, message: String },

  #[error("failed to parse response: {0}")]
  Parse(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
