//! Handlers for `/user-profile`.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/user-profile` | `?userId` required; returns `{"items": [...]}` newest first |
//! | `POST`   | `/user-profile` | Body: [`CreateBody`]; upserts, returns `{"success": true, "item": {...}}` |
//! | `DELETE` | `/user-profile` | `?userId&itemId` required; returns `{"success": true}` |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use fracto_core::{ItemMetadata, ItemType, NewProfileItem, ProfileItem, store::TagStore};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

fn required(value: Option<String>) -> Option<String> {
  value.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
  pub user_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ItemsResponse {
  pub items: Vec<ProfileItem>,
}

/// `GET /user-profile?userId=<id>`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<ItemsResponse>, ApiError>
where
  S: TagStore,
{
  let user_id = required(params.user_id)
    .ok_or_else(|| ApiError::BadRequest("userId required".into()))?;

  let items = store.list_items(&user_id).await.map_err(ApiError::store)?;
  Ok(Json(ItemsResponse { items }))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /user-profile`.
///
/// Every field is optional at the type level so a missing field is reported
/// as a 400 with a readable message rather than a deserialisation rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBody {
  pub user_id:   Option<String>,
  pub item_type: Option<String>,
  pub value:     Option<String>,
  pub metadata:  Option<ItemMetadata>,
  pub confirmed: Option<bool>,
}

impl TryFrom<CreateBody> for NewProfileItem {
  type Error = ApiError;

  fn try_from(b: CreateBody) -> Result<Self, ApiError> {
    let (Some(user_id), Some(item_type), Some(value)) =
      (required(b.user_id), required(b.item_type), required(b.value))
    else {
      return Err(ApiError::BadRequest("userId, itemType, and value required".into()));
    };

    let item_type: ItemType = item_type
      .parse()
      .map_err(|e: fracto_core::Error| ApiError::BadRequest(e.to_string()))?;

    Ok(
      NewProfileItem::new(user_id, item_type, value)
        .confirmed(b.confirmed.unwrap_or(false))
        .with_metadata(b.metadata.unwrap_or_default()),
    )
  }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateResponse {
  pub success: bool,
  pub item:    ProfileItem,
}

/// `POST /user-profile`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<CreateBody>,
) -> Result<Json<CreateResponse>, ApiError>
where
  S: TagStore,
{
  let input = NewProfileItem::try_from(body)?;
  let item = store.create_item(input).await.map_err(ApiError::store)?;
  Ok(Json(CreateResponse { success: true, item }))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteParams {
  pub user_id: Option<String>,
  pub item_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
  pub success: bool,
}

/// `DELETE /user-profile?userId=<id>&itemId=<id>`
///
/// Deleting an item that does not exist (or belongs to someone else) is not
/// an error; the call is idempotent.
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<DeleteParams>,
) -> Result<Json<SuccessResponse>, ApiError>
where
  S: TagStore,
{
  let (Some(user_id), Some(item_id)) = (required(params.user_id), required(params.item_id))
  else {
    return Err(ApiError::BadRequest("userId and itemId required".into()));
  };
  let item_id = Uuid::parse_str(&item_id)
    .map_err(|_| ApiError::BadRequest(format!("invalid itemId: {item_id:?}")))?;

  let removed = store.delete_item(&user_id, item_id).await.map_err(ApiError::store)?;
  if !removed {
    tracing::debug!(%item_id, "delete matched no profile item");
  }
  Ok(Json(SuccessResponse { success: true }))
}
