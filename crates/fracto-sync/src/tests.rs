//! Behaviour of `ProfileSync` over an in-memory SQLite store with switchable
//! failures.

use std::{
  sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
  },
  time::Duration,
};

use fracto_core::{ItemId, ItemMetadata, ItemType, NewProfileItem, ProfileItem, store::TagStore};
use fracto_store_sqlite::SqliteStore;
use tokio::sync::Semaphore;

use crate::{JUST_UPDATED_FOR, ProfileSync, SyncError, SyncEvent};

// ─── Test store ──────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
#[error("injected {0} failure")]
struct Injected(&'static str);

#[derive(Debug, thiserror::Error)]
enum FlakyError {
  #[error(transparent)]
  Injected(#[from] Injected),
  #[error(transparent)]
  Sqlite(#[from] fracto_store_sqlite::Error),
}

/// Wraps a real store; each operation can be told to fail or to never
/// answer, and deletes can be held until the test releases them.
struct FlakyStore {
  inner:        SqliteStore,
  fail_list:    AtomicBool,
  fail_create:  AtomicBool,
  fail_delete:  AtomicBool,
  stall_list:   AtomicBool,
  stall_create: AtomicBool,
  stall_delete: AtomicBool,
  delete_gate:  Option<Arc<Semaphore>>,
}

impl FlakyStore {
  async fn new() -> Self {
    Self {
      inner:        SqliteStore::open_in_memory().await.unwrap(),
      fail_list:    AtomicBool::new(false),
      fail_create:  AtomicBool::new(false),
      fail_delete:  AtomicBool::new(false),
      stall_list:   AtomicBool::new(false),
      stall_create: AtomicBool::new(false),
      stall_delete: AtomicBool::new(false),
      delete_gate:  None,
    }
  }

  fn gated(mut self, gate: Arc<Semaphore>) -> Self {
    self.delete_gate = Some(gate);
    self
  }
}

/// Never resolves when `flag` is set.
async fn maybe_stall(flag: &AtomicBool) {
  if flag.load(Ordering::SeqCst) {
    std::future::pending::<()>().await;
  }
}

impl TagStore for FlakyStore {
  type Error = FlakyError;

  async fn list_items(&self, user_id: &str) -> Result<Vec<ProfileItem>, FlakyError> {
    maybe_stall(&self.stall_list).await;
    if self.fail_list.load(Ordering::SeqCst) {
      return Err(Injected("list").into());
    }
    Ok(self.inner.list_items(user_id).await?)
  }

  async fn create_item(&self, input: NewProfileItem) -> Result<ProfileItem, FlakyError> {
    maybe_stall(&self.stall_create).await;
    if self.fail_create.load(Ordering::SeqCst) {
      return Err(Injected("create").into());
    }
    Ok(self.inner.create_item(input).await?)
  }

  async fn delete_item(&self, user_id: &str, item_id: ItemId) -> Result<bool, FlakyError> {
    if let Some(gate) = &self.delete_gate {
      gate.acquire().await.unwrap().forget();
    }
    maybe_stall(&self.stall_delete).await;
    if self.fail_delete.load(Ordering::SeqCst) {
      return Err(Injected("delete").into());
    }
    Ok(self.inner.delete_item(user_id, item_id).await?)
  }
}

async fn sync() -> ProfileSync<FlakyStore> {
  ProfileSync::new(FlakyStore::new().await, "u1")
}

fn values(items: &[ProfileItem]) -> Vec<&str> {
  items.iter().map(|i| i.value.as_str()).collect()
}

// ─── Add ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_to_empty_location() {
  let s = sync().await;
  let mut events = s.subscribe();

  let item = s.add(ItemType::Location, "  London ").await.unwrap();
  assert_eq!(item.value, "London");
  assert!(item.confirmed);
  assert!(item.is_persisted());

  assert_eq!(s.items(), vec![item]);
  assert_eq!(events.try_recv().unwrap(), SyncEvent::ProfileUpdated);
}

#[tokio::test]
async fn single_valued_add_replaces_existing() {
  let s = sync().await;
  s.add(ItemType::Location, "London").await.unwrap();
  s.add(ItemType::Location, "Manchester").await.unwrap();

  assert_eq!(values(&s.items_of(ItemType::Location)), ["Manchester"]);

  let remote = s.store().list_items("u1").await.unwrap();
  assert_eq!(values(&remote), ["Manchester"]);
}

#[tokio::test]
async fn repeated_single_adds_keep_one_item() {
  let s = sync().await;
  for role in ["Part-time CFO", "Fractional CTO", "Interim COO"] {
    s.add(ItemType::RolePreference, role).await.unwrap();
  }
  assert_eq!(values(&s.items_of(ItemType::RolePreference)), ["Interim COO"]);
  assert_eq!(s.store().list_items("u1").await.unwrap().len(), 1);
}

#[tokio::test]
async fn multi_valued_add_keeps_both() {
  let s = sync().await;
  s.add(ItemType::Skill, "Python").await.unwrap();
  s.add(ItemType::Skill, "M&A").await.unwrap();

  let mut skills = values(&s.items_of(ItemType::Skill)).into_iter().map(String::from).collect::<Vec<_>>();
  skills.sort();
  assert_eq!(skills, ["M&A", "Python"]);
}

#[tokio::test]
async fn blank_value_is_rejected_without_store_call() {
  let s = sync().await;
  let err = s.add(ItemType::Skill, "   ").await.unwrap_err();
  assert!(matches!(err, SyncError::Core(fracto_core::Error::EmptyValue)));
  assert!(s.items().is_empty());
  assert!(s.store().list_items("u1").await.unwrap().is_empty());
}

#[tokio::test]
async fn failed_create_drops_pending_item() {
  let s = sync().await;
  s.store().fail_create.store(true, Ordering::SeqCst);

  let err = s.add(ItemType::Skill, "Python").await.unwrap_err();
  assert!(matches!(err, SyncError::Store(_)));
  assert!(s.items().is_empty());
}

#[tokio::test]
async fn single_add_aborts_when_old_item_cannot_be_deleted() {
  let s = sync().await;
  s.add(ItemType::Location, "London").await.unwrap();
  s.store().fail_delete.store(true, Ordering::SeqCst);

  assert!(s.add(ItemType::Location, "Leeds").await.is_err());

  // The failed delete reloaded the server view and nothing new was created.
  assert_eq!(values(&s.items()), ["London"]);
  assert_eq!(values(&s.store().list_items("u1").await.unwrap()), ["London"]);
}

#[tokio::test]
async fn concurrent_single_adds_leave_one_item() {
  let s = Arc::new(sync().await);

  let a = tokio::spawn({
    let s = Arc::clone(&s);
    async move { s.add(ItemType::Location, "London").await }
  });
  let b = tokio::spawn({
    let s = Arc::clone(&s);
    async move { s.add(ItemType::Location, "Bristol").await }
  });
  a.await.unwrap().unwrap();
  b.await.unwrap().unwrap();

  assert_eq!(s.items_of(ItemType::Location).len(), 1);
  assert_eq!(s.store().list_items("u1").await.unwrap().len(), 1);
}

// ─── Edit ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn edit_replaces_value_and_keeps_metadata() {
  let s = sync().await;
  let original = s
    .store()
    .create_item(
      NewProfileItem::new("u1", ItemType::Company, "Acme")
        .with_metadata(ItemMetadata::with_job_title("CFO")),
    )
    .await
    .unwrap();
  s.refresh().await.unwrap();

  let edited = s.edit(&original, "Acme Ltd").await.unwrap();
  assert_eq!(edited.value, "Acme Ltd");
  assert_eq!(edited.item_type, ItemType::Company);
  assert_eq!(edited.metadata.job_title.as_deref(), Some("CFO"));
  assert!(edited.confirmed);
  assert_ne!(edited.id, original.id);

  assert_eq!(s.items(), vec![edited.clone()]);
  assert_eq!(s.store().list_items("u1").await.unwrap(), vec![edited]);
}

#[tokio::test]
async fn edit_requires_persisted_item() {
  let s = sync().await;
  let local = NewProfileItem::new("u1", ItemType::Skill, "Go").to_pending();
  let err = s.edit(&local, "Rust").await.unwrap_err();
  assert!(matches!(err, SyncError::Core(fracto_core::Error::NotPersisted)));
}

#[tokio::test]
async fn edit_to_blank_changes_nothing() {
  let s = sync().await;
  let item = s.add(ItemType::Skill, "Go").await.unwrap();
  assert!(s.edit(&item, "  ").await.is_err());
  assert_eq!(s.items(), vec![item]);
}

// ─── Delete ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_hides_item_before_store_answers() {
  let gate = Arc::new(Semaphore::new(0));
  let store = FlakyStore::new().await.gated(Arc::clone(&gate));
  let s = Arc::new(ProfileSync::new(store, "u1"));

  let item = s
    .store()
    .create_item(NewProfileItem::new("u1", ItemType::Skill, "Python"))
    .await
    .unwrap();
  s.refresh().await.unwrap();
  assert_eq!(s.items().len(), 1);

  let task = tokio::spawn({
    let s = Arc::clone(&s);
    let id = item.id.unwrap();
    async move { s.delete(id).await }
  });
  tokio::task::yield_now().await;
  while s.items().len() == 1 {
    tokio::task::yield_now().await;
  }
  assert!(s.items().is_empty());
  assert_eq!(s.store().inner.list_items("u1").await.unwrap().len(), 1);

  gate.add_permits(1);
  task.await.unwrap().unwrap();
  assert!(s.store().inner.list_items("u1").await.unwrap().is_empty());
}

#[tokio::test]
async fn failed_delete_restores_item_via_refresh() {
  let s = sync().await;
  let item = s.add(ItemType::Skill, "Python").await.unwrap();
  s.store().fail_delete.store(true, Ordering::SeqCst);

  assert!(s.delete(item.id.unwrap()).await.is_err());
  assert_eq!(s.items(), vec![item]);
}

#[tokio::test]
async fn delete_of_unknown_id_succeeds() {
  let s = sync().await;
  s.delete(uuid::Uuid::new_v4()).await.unwrap();
  assert!(s.items().is_empty());
}

// ─── Refresh ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn refresh_loads_remote_items() {
  let s = sync().await;
  s.store()
    .create_item(NewProfileItem::new("u1", ItemType::Skill, "Python"))
    .await
    .unwrap();
  s.store()
    .create_item(NewProfileItem::new("u2", ItemType::Skill, "Go"))
    .await
    .unwrap();

  let mut events = s.subscribe();
  s.refresh().await.unwrap();
  assert_eq!(values(&s.items()), ["Python"]);
  assert!(!s.is_loading());
  assert_eq!(events.try_recv().unwrap(), SyncEvent::Refreshed);
}

#[tokio::test]
async fn failed_refresh_keeps_cached_items() {
  let s = sync().await;
  s.add(ItemType::Skill, "Python").await.unwrap();
  let before = s.items();

  s.store().fail_list.store(true, Ordering::SeqCst);
  assert!(s.refresh().await.is_err());
  assert_eq!(s.items(), before);
  assert!(!s.is_loading());
}

#[tokio::test]
async fn graph_reflects_cached_items() {
  let s = sync().await;
  s.add(ItemType::Location, "London").await.unwrap();
  s.add(ItemType::Skill, "Python").await.unwrap();

  let graph = s.graph(Some("Sam"));
  assert_eq!(graph.nodes.len(), 3);
  assert_eq!(graph.links.len(), 2);
  assert_eq!(graph.nodes[0].name, "Sam");
}

#[tokio::test(start_paused = true)]
async fn just_updated_flag_expires() {
  let s = sync().await;
  assert!(!s.is_just_updated());

  s.request_refresh().await.unwrap();
  assert!(s.is_just_updated());

  tokio::time::advance(JUST_UPDATED_FOR + Duration::from_millis(1)).await;
  assert!(!s.is_just_updated());
}

// ─── Polling ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn polling_picks_up_remote_changes_until_dropped() {
  let s = Arc::new(sync().await);
  let mut events = s.subscribe();
  let guard = s.start_polling(Duration::from_millis(20));

  // Immediate first refresh.
  let first = tokio::time::timeout(Duration::from_secs(2), events.recv()).await;
  assert_eq!(first.unwrap().unwrap(), SyncEvent::Refreshed);

  s.store()
    .create_item(NewProfileItem::new("u1", ItemType::Skill, "Python"))
    .await
    .unwrap();
  tokio::time::timeout(Duration::from_secs(2), async {
    while s.items().is_empty() {
      let _ = events.recv().await;
    }
  })
  .await
  .unwrap();
  assert_eq!(values(&s.items()), ["Python"]);

  drop(guard);
  tokio::time::sleep(Duration::from_millis(20)).await;
  while events.try_recv().is_ok() {}

  s.store()
    .create_item(NewProfileItem::new("u1", ItemType::Skill, "Go"))
    .await
    .unwrap();
  tokio::time::sleep(Duration::from_millis(100)).await;
  assert_eq!(values(&s.items()), ["Python"]);
}

// ─── Cancellation ────────────────────────────────────────────────────────────

const GIVE_UP: Duration = Duration::from_millis(50);

#[tokio::test]
async fn cancelled_refresh_clears_loading() {
  let s = sync().await;
  s.store().stall_list.store(true, Ordering::SeqCst);

  assert!(tokio::time::timeout(GIVE_UP, s.refresh()).await.is_err());
  assert!(!s.is_loading());
}

#[tokio::test]
async fn dropping_poll_guard_mid_refresh_clears_loading() {
  let s = Arc::new(sync().await);
  s.store().stall_list.store(true, Ordering::SeqCst);
  let guard = s.start_polling(Duration::from_millis(10));

  tokio::time::timeout(Duration::from_secs(2), async {
    while !s.is_loading() {
      tokio::time::sleep(Duration::from_millis(5)).await;
    }
  })
  .await
  .unwrap();

  drop(guard);
  tokio::time::timeout(Duration::from_secs(2), async {
    while s.is_loading() {
      tokio::time::sleep(Duration::from_millis(5)).await;
    }
  })
  .await
  .unwrap();
}

#[tokio::test]
async fn cancelled_add_leaves_no_pending_item() {
  let s = sync().await;
  s.store().stall_create.store(true, Ordering::SeqCst);

  assert!(tokio::time::timeout(GIVE_UP, s.add(ItemType::Skill, "Go")).await.is_err());
  assert!(s.items().is_empty());
}

#[tokio::test]
async fn cancelled_delete_shows_item_again() {
  let s = sync().await;
  let item = s.add(ItemType::Skill, "Python").await.unwrap();
  s.store().stall_delete.store(true, Ordering::SeqCst);

  assert!(tokio::time::timeout(GIVE_UP, s.delete(item.id.unwrap())).await.is_err());
  assert_eq!(s.items(), vec![item]);
}

#[tokio::test]
async fn cancelled_single_add_keeps_old_value_and_allows_another_add() {
  let s = sync().await;
  s.add(ItemType::Location, "London").await.unwrap();

  s.store().stall_delete.store(true, Ordering::SeqCst);
  let add = s.add(ItemType::Location, "Leeds");
  assert!(tokio::time::timeout(GIVE_UP, add).await.is_err());
  assert_eq!(values(&s.items_of(ItemType::Location)), ["London"]);

  s.store().stall_delete.store(false, Ordering::SeqCst);
  s.add(ItemType::Location, "Leeds").await.unwrap();
  assert_eq!(values(&s.items_of(ItemType::Location)), ["Leeds"]);
}
