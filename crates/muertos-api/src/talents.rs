//! Handler for `/talents/:tokenId` — the derived talent sheet.
//!
//! Talents are never stored per muerto. The token's Mask/Body/Headwear/
//! Expression traits each map to a talent category, and the response is the
//! union of those categories' talents, annotated with the category that
//! granted them.

use axum::{
  Json,
  extract::{Path, State},
};
use muertos_core::{
  entity::trait_value,
  record::RecordId,
  store::{RecordStore, VoteStore},
  talent::{TALENT_TRAITS, Talent, TalentCategory, TokenMetadata, TraitCategory},
};

use crate::{AppState, error::ApiError, parse_token_id};

/// `GET /talents/:tokenId`
pub async fn for_token<S>(
  State(state): State<AppState<S>>,
  Path(token_id): Path<String>,
) -> Result<Json<Vec<Talent>>, ApiError>
where
  S: RecordStore + VoteStore + Clone + 'static,
{
  let token_id = parse_token_id(&token_id)?;

  let muerto = state
    .store
    .find::<TokenMetadata>(RecordId::Name(TokenMetadata::display_name(token_id)))
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("muerto {token_id} not found")))?;

  let mut talents = Vec::new();

  for trait_type in TALENT_TRAITS {
    let Some(value) = trait_value(&muerto.record.attributes, trait_type) else {
      continue;
    };

    // Map the trait value to its talent category.
    let Some(mapping) = state
      .store
      .find::<TraitCategory>(RecordId::Name(value.to_string()))
      .await
      .map_err(|e| ApiError::Store(Box::new(e)))?
    else {
      continue;
    };

    let category_type = trait_type.to_lowercase();
    let category_key =
      format!("{category_type}-{}", mapping.record.category_id);

    let Some(category) = state
      .store
      .find::<TalentCategory>(RecordId::Name(category_key))
      .await
      .map_err(|e| ApiError::Store(Box::new(e)))?
    else {
      continue;
    };

    // Category → its talents, annotated with where they came from.
    let granted = state
      .store
      .list::<Talent>()
      .await
      .map_err(|e| ApiError::Store(Box::new(e)))?
      .into_iter()
      .map(|v| v.record)
      .filter(|t| {
        t.category_id == mapping.record.category_id
          && t.category_type == category_type
      })
      .map(|mut t| {
        t.category_name = Some(category.record.name.clone());
        t
      });
    talents.extend(granted);
  }

  Ok(Json(talents))
}
