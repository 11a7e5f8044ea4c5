//! Profile items: the tags attached to a user's profile.
//!
//! An item is a single `(item_type, value)` pair owned by a user. Items are
//! never edited in place: an edit deletes the old row and creates a new one,
//! so the store only ever holds distinct rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::{Error, ItemType, Result};

/// Opaque identifier assigned by the tag store.
pub type ItemId = Uuid;

// ─── Metadata ────────────────────────────────────────────────────────────────

/// Optional auxiliary data attached to an item.
///
/// Only `job_title` and `company_url` have meaning to this crate; any other
/// keys are carried through untouched so they survive an edit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemMetadata {
  /// The user's title at a company (company items only).
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub job_title:   Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub company_url: Option<String>,
  #[serde(flatten)]
  pub extra:       serde_json::Map<String, serde_json::Value>,
}

impl ItemMetadata {
  pub fn is_empty(&self) -> bool {
    self.job_title.is_none() && self.company_url.is_none() && self.extra.is_empty()
  }

  /// Metadata carrying only a job title.
  pub fn with_job_title(title: impl Into<String>) -> Self {
    Self { job_title: Some(title.into()), ..Self::default() }
  }
}

/// Treat an explicit JSON `null` the same as a missing field.
fn null_as_default<'de, D, T>(de: D) -> std::result::Result<T, D::Error>
where
  D: Deserializer<'de>,
  T: Default + Deserialize<'de>,
{
  Ok(Option::<T>::deserialize(de)?.unwrap_or_default())
}

// ─── ProfileItem ─────────────────────────────────────────────────────────────

/// One tag attached to a user, as returned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileItem {
  /// Absent until the store has persisted the item.
  #[serde(default)]
  pub id:         Option<ItemId>,
  pub item_type:  ItemType,
  pub value:      String,
  #[serde(default, deserialize_with = "null_as_default")]
  pub metadata:   ItemMetadata,
  /// User-confirmed, as opposed to inferred or tentative.
  #[serde(default)]
  pub confirmed:  bool,
  #[serde(default)]
  pub created_at: Option<DateTime<Utc>>,
}

impl ProfileItem {
  pub fn is_persisted(&self) -> bool { self.id.is_some() }

  /// The store id, or [`Error::NotPersisted`] for a local-only item.
  pub fn require_id(&self) -> Result<ItemId> { self.id.ok_or(Error::NotPersisted) }

  /// Value as shown to the user; company items carry their job title.
  pub fn display_value(&self) -> String {
    match (&self.item_type, &self.metadata.job_title) {
      (ItemType::Company, Some(title)) => format!("{} ({title})", self.value),
      _ => self.value.clone(),
    }
  }
}

// ─── NewProfileItem ──────────────────────────────────────────────────────────

/// Input to [`crate::store::TagStore::create_item`].
///
/// The serialised form is the JSON body of `POST /api/user-profile`, hence
/// the camelCase field names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProfileItem {
  pub user_id:   String,
  pub item_type: ItemType,
  pub value:     String,
  #[serde(default)]
  pub confirmed: bool,
  #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "ItemMetadata::is_empty")]
  pub metadata:  ItemMetadata,
}

impl NewProfileItem {
  /// Unconfirmed item with empty metadata.
  pub fn new(
    user_id: impl Into<String>,
    item_type: ItemType,
    value: impl Into<String>,
  ) -> Self {
    Self {
      user_id: user_id.into(),
      item_type,
      value: value.into(),
      confirmed: false,
      metadata: ItemMetadata::default(),
    }
  }

  pub fn confirmed(mut self, confirmed: bool) -> Self {
    self.confirmed = confirmed;
    self
  }

  pub fn with_metadata(mut self, metadata: ItemMetadata) -> Self {
    self.metadata = metadata;
    self
  }

  /// The local, not-yet-persisted view of this input.
  pub fn to_pending(&self) -> ProfileItem {
    ProfileItem {
      id:         None,
      item_type:  self.item_type,
      value:      self.value.clone(),
      metadata:   self.metadata.clone(),
      confirmed:  self.confirmed,
      created_at: None,
    }
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn item_decodes_store_row_with_null_metadata() {
    let id = Uuid::new_v4();
    let item: ProfileItem = serde_json::from_value(json!({
      "id": id,
      "item_type": "location",
      "value": "London",
      "metadata": null,
      "confirmed": true,
      "created_at": "2025-01-02T03:04:05Z"
    }))
    .unwrap();

    assert_eq!(item.id, Some(id));
    assert_eq!(item.item_type, ItemType::Location);
    assert!(item.metadata.is_empty());
    assert!(item.created_at.is_some());
  }

  #[test]
  fn metadata_keeps_unknown_keys() {
    let raw = json!({ "job_title": "CFO", "source": "voice" });
    let meta: ItemMetadata = serde_json::from_value(raw.clone()).unwrap();
    assert_eq!(meta.job_title.as_deref(), Some("CFO"));
    assert_eq!(meta.extra.get("source"), Some(&json!("voice")));
    assert_eq!(serde_json::to_value(&meta).unwrap(), raw);
  }

  #[test]
  fn new_item_uses_camel_case_wire_names() {
    let body = NewProfileItem::new("u1", ItemType::RolePreference, "CTO").confirmed(true);
    let v = serde_json::to_value(&body).unwrap();
    assert_eq!(
      v,
      json!({ "userId": "u1", "itemType": "role_preference", "value": "CTO", "confirmed": true })
    );
  }

  #[test]
  fn company_display_includes_job_title() {
    let item = NewProfileItem::new("u1", ItemType::Company, "Acme")
      .with_metadata(ItemMetadata::with_job_title("COO"))
      .to_pending();
    assert_eq!(item.display_value(), "Acme (COO)");
    assert!(matches!(item.require_id(), Err(Error::NotPersisted)));
  }
}
