//! Handlers for `/authors` endpoints.
//!
//! An author row is materialised with the `Unknown` role the first time a
//! wallet is seen; curators promote roles out of band.

use axum::{
  Json,
  extract::{Path, State},
};
use muertos_core::{
  record::{RecordId, Versioned},
  store::{RecordStore, VoteStore},
  world::Author,
};

use crate::{AppState, error::ApiError};

/// `GET /authors/:walletAddress` — get, creating a placeholder row on first
/// sight of the wallet. The returned display name carries an abbreviated
/// wallet suffix.
pub async fn get_or_create<S>(
  State(state): State<AppState<S>>,
  Path(wallet): Path<String>,
) -> Result<Json<Versioned<Author>>, ApiError>
where
  S: RecordStore + VoteStore + Clone + 'static,
{
  if wallet.is_empty() {
    return Err(ApiError::BadRequest("invalid wallet address".into()));
  }

  let existing = state
    .store
    .find::<Author>(RecordId::Name(wallet.clone()))
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  let mut author = match existing {
    Some(author) => author,
    None => {
      let id = state
        .store
        .next_serial::<Author>()
        .await
        .map_err(|e| ApiError::Store(Box::new(e)))?;
      state
        .store
        .save(Author {
          id,
          name: wallet.clone(),
          role: "Unknown".into(),
          address: wallet.clone(),
        })
        .await
        .map_err(|e| ApiError::Store(Box::new(e)))?
        .record
    }
  };

  author.record.name =
    format!("{} ({}...)", author.record.name, abbreviate(&wallet));
  Ok(Json(author))
}

/// First six characters of a wallet address, for display suffixes.
fn abbreviate(wallet: &str) -> &str {
  let end = wallet.len().min(6);
  &wallet[..end]
}

#[cfg(test)]
mod tests {
  use super::abbreviate;

  #[test]
  fn abbreviate_truncates_long_addresses() {
    assert_eq!(abbreviate("0xabcdef0123456789"), "0xabcd");
  }

  #[test]
  fn abbreviate_keeps_short_addresses_whole() {
    assert_eq!(abbreviate("0xab"), "0xab");
  }
}
