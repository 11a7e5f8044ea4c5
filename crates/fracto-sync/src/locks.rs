//! Per-category mutation locks.
//!
//! Every add, edit and delete holds the lock of the category it touches, so
//! the delete-then-create sequences of two edits to one category run one
//! after the other instead of interleaving.

use std::{collections::HashMap, sync::Arc};

use fracto_core::ItemType;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Default)]
pub(crate) struct CategoryLocks {
  inner: Mutex<HashMap<ItemType, Arc<Mutex<()>>>>,
}

impl CategoryLocks {
  pub(crate) async fn acquire(&self, item_type: ItemType) -> OwnedMutexGuard<()> {
    let lock = {
      let mut inner = self.inner.lock().await;
      Arc::clone(inner.entry(item_type).or_insert_with(|| Arc::new(Mutex::new(()))))
    };
    lock.lock_owned().await
  }
}
