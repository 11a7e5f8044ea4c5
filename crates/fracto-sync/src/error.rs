//! Error types for `fracto-sync`.

use thiserror::Error;

/// Failure talking to the profile API over HTTP.
#[derive(Debug, Error)]
pub enum ClientError {
  #[error("failed to build HTTP client: {0}")]
  Build(#[source] reqwest::Error),

  #[error("{what} failed: {source}")]
  Transport {
    what:   &'static str,
    #[source]
    source: reqwest::Error,
  },

  #[error("{what} → {status}: {message}")]
  Status {
    what:    &'static str,
    status:  u16,
    message: String,
  },

  #[error("deserialising {what}: {source}")]
  Decode {
    what:   &'static str,
    #[source]
    source: reqwest::Error,
  },
}

/// Failure of a [`crate::ProfileSync`] operation.
#[derive(Debug, Error)]
pub enum SyncError {
  #[error(transparent)]
  Core(#[from] fracto_core::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl SyncError {
  pub(crate) fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }
}
