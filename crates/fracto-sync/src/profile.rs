//! [`ProfileSync`]: a cached, optimistically-updated view of one user's tags.
//!
//! The cache is two layers: the last server snapshot, and the local
//! operations that have not been confirmed yet. Readers always see
//! pending creates first, then the server items minus pending deletes.
//!
//! A refresh that started before a mutation completed is stale by the time
//! it lands, so every applied mutation bumps an epoch and refresh results
//! from an older epoch are dropped.
//!
//! Every optimistic mark (a refresh in flight, a pending create, a hidden
//! item) is held by an [`Undo`] guard, so a mutation future that is dropped
//! mid-request leaves the view as it found it.

use std::{
  collections::HashSet,
  sync::{Mutex, MutexGuard, PoisonError},
  time::Duration,
};

use fracto_core::{
  ItemId, ItemType, NewProfileItem, ProfileItem,
  graph::{self, ProfileGraph},
  store::TagStore,
};
use tokio::{sync::broadcast, time::Instant};

use crate::{error::SyncError, locks::CategoryLocks};

/// How long [`ProfileSync::is_just_updated`] stays true after a requested refresh.
pub const JUST_UPDATED_FOR: Duration = Duration::from_secs(2);

const EVENT_CAPACITY: usize = 32;

/// Change notifications broadcast to [`ProfileSync::subscribe`]rs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncEvent {
  /// A server snapshot replaced the cached items.
  Refreshed,
  /// A local add, edit or delete was accepted by the store.
  ProfileUpdated,
}

// ─── State ───────────────────────────────────────────────────────────────────

struct PendingCreate {
  token: u64,
  item:  ProfileItem,
}

#[derive(Default)]
struct ProfileState {
  server:          Vec<ProfileItem>,
  pending_creates: Vec<PendingCreate>,
  pending_deletes: HashSet<ItemId>,
  loading:         usize,
  epoch:           u64,
  just_updated_at: Option<Instant>,
  next_token:      u64,
}

impl ProfileState {
  fn visible(&self) -> Vec<ProfileItem> {
    let pending = self.pending_creates.iter().rev().map(|p| p.item.clone());
    let server = self
      .server
      .iter()
      .filter(|i| i.id.is_none_or(|id| !self.pending_deletes.contains(&id)))
      .cloned();
    pending.chain(server).collect()
  }

  fn item_type_of(&self, id: ItemId) -> Option<ItemType> {
    self.server.iter().find(|i| i.id == Some(id)).map(|i| i.item_type)
  }

  fn push_pending(&mut self, item: ProfileItem) -> u64 {
    let token = self.next_token;
    self.next_token += 1;
    self.pending_creates.push(PendingCreate { token, item });
    token
  }

  fn drop_pending(&mut self, token: u64) {
    self.pending_creates.retain(|p| p.token != token);
  }

  /// Swap a pending create for the item the store returned. An upsert may
  /// hand back an id already in the snapshot, so that copy is replaced.
  fn confirm_create(&mut self, token: u64, item: ProfileItem) {
    self.drop_pending(token);
    self.server.retain(|i| i.id != item.id);
    self.server.insert(0, item);
    self.epoch += 1;
  }

  fn confirm_delete(&mut self, id: ItemId) {
    self.pending_deletes.remove(&id);
    self.server.retain(|i| i.id != Some(id));
    self.epoch += 1;
  }
}

fn lock(state: &Mutex<ProfileState>) -> MutexGuard<'_, ProfileState> {
  state.lock().unwrap_or_else(PoisonError::into_inner)
}

// ─── Undo guards ─────────────────────────────────────────────────────────────

#[derive(Clone, Copy)]
enum Mark {
  Loading,
  PendingCreate(u64),
  Hidden(ItemId),
}

/// Reverts one optimistic mark when dropped.
///
/// Confirming a create or delete already clears the mark, so dropping the
/// guard afterwards is a no-op. The state lock must not be held at drop.
struct Undo<'a> {
  state: &'a Mutex<ProfileState>,
  mark:  Mark,
}

impl<'a> Undo<'a> {
  fn loading(state: &'a Mutex<ProfileState>) -> Self {
    lock(state).loading += 1;
    Self { state, mark: Mark::Loading }
  }

  fn pending(state: &'a Mutex<ProfileState>, item: ProfileItem) -> (u64, Self) {
    let token = lock(state).push_pending(item);
    (token, Self { state, mark: Mark::PendingCreate(token) })
  }

  fn hidden(state: &'a Mutex<ProfileState>, id: ItemId) -> Self {
    lock(state).pending_deletes.insert(id);
    Self { state, mark: Mark::Hidden(id) }
  }
}

impl Drop for Undo<'_> {
  fn drop(&mut self) {
    let mut s = lock(self.state);
    match self.mark {
      Mark::Loading => s.loading = s.loading.saturating_sub(1),
      Mark::PendingCreate(token) => s.drop_pending(token),
      Mark::Hidden(id) => {
        s.pending_deletes.remove(&id);
      }
    }
  }
}

// ─── ProfileSync ─────────────────────────────────────────────────────────────

/// Eventually-consistent client view of one user's profile tags.
///
/// Reads never block on the network. Mutations update the local view first
/// and reconcile with the store's response. Mutations of one category are
/// serialised so delete-then-create sequences never interleave.
pub struct ProfileSync<S> {
  store:   S,
  user_id: String,
  state:   Mutex<ProfileState>,
  locks:   CategoryLocks,
  events:  broadcast::Sender<SyncEvent>,
}

impl<S: TagStore> ProfileSync<S> {
  /// An empty view; call [`refresh`](Self::refresh) or
  /// [`start_polling`](Self::start_polling) to load it.
  pub fn new(store: S, user_id: impl Into<String>) -> Self {
    let (events, _) = broadcast::channel(EVENT_CAPACITY);
    Self {
      store,
      user_id: user_id.into(),
      state: Mutex::new(ProfileState::default()),
      locks: CategoryLocks::default(),
      events,
    }
  }

  pub fn user_id(&self) -> &str { &self.user_id }

  pub fn store(&self) -> &S { &self.store }

  fn state(&self) -> MutexGuard<'_, ProfileState> { lock(&self.state) }

  /// Take `id` out of the visible items until the guard drops.
  fn hide(&self, id: ItemId) -> Undo<'_> { Undo::hidden(&self.state, id) }

  fn notify(&self, event: SyncEvent) {
    // No subscribers is fine.
    let _ = self.events.send(event);
  }

  pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> { self.events.subscribe() }

  // ── Reads ──────────────────────────────────────────────────────────────────

  /// Every visible item, pending creates first, then newest server items.
  pub fn items(&self) -> Vec<ProfileItem> { self.state().visible() }

  pub fn items_of(&self, item_type: ItemType) -> Vec<ProfileItem> {
    let mut items = self.items();
    items.retain(|i| i.item_type == item_type);
    items
  }

  pub fn graph(&self, user_name: Option<&str>) -> ProfileGraph {
    graph::project(user_name, &self.items())
  }

  /// True while at least one refresh is in flight.
  pub fn is_loading(&self) -> bool { self.state().loading > 0 }

  /// True for [`JUST_UPDATED_FOR`] after [`request_refresh`](Self::request_refresh).
  pub fn is_just_updated(&self) -> bool {
    self
      .state()
      .just_updated_at
      .is_some_and(|at| at.elapsed() < JUST_UPDATED_FOR)
  }

  // ── Fetch ──────────────────────────────────────────────────────────────────

  /// Replace the server snapshot with the store's current list.
  ///
  /// On failure the cached view is left as it was. There is no retry; the
  /// next poll tick tries again.
  pub async fn refresh(&self) -> Result<(), SyncError> {
    let loading = Undo::loading(&self.state);
    let epoch = self.state().epoch;

    let result = self.store.list_items(&self.user_id).await;
    drop(loading);

    let applied = {
      let mut state = self.state();
      match result {
        Ok(items) if state.epoch == epoch => {
          state.server = items;
          Ok(true)
        }
        Ok(_) => Ok(false),
        Err(e) => Err(e),
      }
    };

    match applied {
      Ok(true) => {
        self.notify(SyncEvent::Refreshed);
        Ok(())
      }
      Ok(false) => {
        tracing::debug!(user_id = %self.user_id, "discarded stale profile snapshot");
        Ok(())
      }
      Err(e) => {
        tracing::warn!(user_id = %self.user_id, error = %e, "profile refresh failed");
        Err(SyncError::store(e))
      }
    }
  }

  /// Refresh in response to an outside "profile changed" signal, raising the
  /// just-updated flag.
  pub async fn request_refresh(&self) -> Result<(), SyncError> {
    self.state().just_updated_at = Some(Instant::now());
    self.refresh().await
  }

  // ── Mutations ──────────────────────────────────────────────────────────────

  /// Add `raw_value` to `item_type`.
  ///
  /// A single-valued category first loses its existing item; if that delete
  /// fails nothing is created.
  pub async fn add(&self, item_type: ItemType, raw_value: &str) -> Result<ProfileItem, SyncError> {
    let value = item_type.normalize(raw_value)?;
    let _guard = self.locks.acquire(item_type).await;

    if item_type.is_single() {
      let existing: Vec<ItemId> = self.items_of(item_type).iter().filter_map(|i| i.id).collect();
      for id in existing {
        self.remote_delete(self.hide(id), id).await?;
      }
    }

    let input = NewProfileItem::new(self.user_id.clone(), item_type, value).confirmed(true);
    self.create(input).await
  }

  /// Delete the item with `item_id`.
  ///
  /// The item disappears from [`items`](Self::items) before the store is
  /// contacted. If the store rejects the delete a full refresh restores it.
  pub async fn delete(&self, item_id: ItemId) -> Result<(), SyncError> {
    let hidden = self.hide(item_id);
    let item_type = self.state().item_type_of(item_id);

    let _guard = match item_type {
      Some(t) => Some(self.locks.acquire(t).await),
      None => None,
    };
    self.remote_delete(hidden, item_id).await
  }

  /// Replace `item`'s value, keeping its category and metadata.
  ///
  /// Runs as delete-then-create: the store has no update operation. The new
  /// item is always confirmed.
  pub async fn edit(&self, item: &ProfileItem, new_value: &str) -> Result<ProfileItem, SyncError> {
    let id = item.require_id()?;
    let value = item.item_type.normalize(new_value)?;
    let _guard = self.locks.acquire(item.item_type).await;

    self.remote_delete(self.hide(id), id).await?;

    let input = NewProfileItem::new(self.user_id.clone(), item.item_type, value)
      .confirmed(true)
      .with_metadata(item.metadata.clone());
    self.create(input).await
  }

  /// Remote half of a delete. `hidden` keeps the item out of view until the
  /// store answers.
  async fn remote_delete(&self, hidden: Undo<'_>, id: ItemId) -> Result<(), SyncError> {
    let result = self.store.delete_item(&self.user_id, id).await;
    match result {
      Ok(_) => {
        self.state().confirm_delete(id);
        drop(hidden);
        self.notify(SyncEvent::ProfileUpdated);
        Ok(())
      }
      Err(e) => {
        tracing::warn!(%id, error = %e, "profile item delete failed; reloading");
        drop(hidden);
        // The refresh logs its own failure.
        let _ = self.refresh().await;
        Err(SyncError::store(e))
      }
    }
  }

  async fn create(&self, input: NewProfileItem) -> Result<ProfileItem, SyncError> {
    let (token, pending) = Undo::pending(&self.state, input.to_pending());
    let item_type = input.item_type;

    let result = self.store.create_item(input).await;
    match result {
      Ok(item) => {
        self.state().confirm_create(token, item.clone());
        drop(pending);
        tracing::debug!(id = ?item.id, %item_type, "profile item created");
        self.notify(SyncEvent::ProfileUpdated);
        Ok(item)
      }
      Err(e) => {
        drop(pending);
        tracing::warn!(%item_type, error = %e, "profile item create failed");
        Err(SyncError::store(e))
      }
    }
  }
}
