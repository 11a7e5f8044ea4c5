//! Error types for `fracto-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("value must not be empty")]
  EmptyValue,

  #[error("profile item has no id; it has not been persisted yet")]
  NotPersisted,

  #[error("unknown item type: {0:?}")]
  UnknownItemType(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
