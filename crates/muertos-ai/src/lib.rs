//! Narrow AI-completion interface for the Muertos backend.
//!
//! Two concerns live here, both deliberately small (the application treats
//! AI as an external collaborator, not a subsystem):
//!
//! - [`template`] — render a prompt from a template plus named values,
//!   substituting `[Bracketed Placeholder]` markers.
//! - [`provider`] — invoke a completion provider with a single prompt
//!   string and get a single text completion back. No streaming, no
//!   retries, no tool use.

pub mod anthropic;
pub mod error;
pub mod openai;
pub mod provider;
pub mod template;

pub use error::{Error, Result};
pub use provider::Completions;
