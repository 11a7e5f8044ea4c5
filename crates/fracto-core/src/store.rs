//! The `TagStore` and `JobStore` traits.
//!
//! The tag store is the source of truth for a user's profile items. It is
//! implemented server-side by `fracto-store-sqlite` and client-side by the
//! HTTP client in `fracto-sync`, so the sync controller does not care which
//! side of the wire it runs on.

use std::future::Future;

use crate::{
  item::{ItemId, NewProfileItem, ProfileItem},
  jobs::{JobPage, JobQuery},
};

/// Abstraction over a profile tag store.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait TagStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// All items for `user_id`, newest first.
  fn list_items<'a>(
    &'a self,
    user_id: &'a str,
  ) -> impl Future<Output = Result<Vec<ProfileItem>, Self::Error>> + Send + 'a;

  /// Create an item and return it as persisted.
  ///
  /// Keyed by `(user_id, item_type, value)`: creating an existing triple
  /// overwrites its `metadata` and `confirmed` and returns the existing id.
  fn create_item(
    &self,
    input: NewProfileItem,
  ) -> impl Future<Output = Result<ProfileItem, Self::Error>> + Send + '_;

  /// Delete one item owned by `user_id`. Returns `false` if nothing matched.
  fn delete_item<'a>(
    &'a self,
    user_id: &'a str,
    item_id: ItemId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;
}

/// Read access to the job board.
pub trait JobStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Active fractional listings matching `query`, newest posting first.
  fn search_jobs<'a>(
    &'a self,
    query: &'a JobQuery,
  ) -> impl Future<Output = Result<JobPage, Self::Error>> + Send + 'a;
}
