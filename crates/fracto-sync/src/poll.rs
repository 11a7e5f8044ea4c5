//! Background refresh loop.

use std::{sync::Arc, time::Duration};

use fracto_core::store::TagStore;
use tokio::{task::JoinHandle, time::MissedTickBehavior};

use crate::ProfileSync;

/// Default refresh cadence.
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Keeps a polling task alive. Dropping it stops the polling.
#[must_use = "polling stops as soon as the guard is dropped"]
pub struct PollGuard {
  handle: JoinHandle<()>,
}

impl Drop for PollGuard {
  fn drop(&mut self) {
    self.handle.abort();
  }
}

impl<S: TagStore + 'static> ProfileSync<S> {
  /// Refresh now, then every `every` until the returned guard is dropped.
  ///
  /// A slow refresh pushes the next tick back rather than stacking requests.
  /// Failures are logged by [`refresh`](Self::refresh) and otherwise ignored.
  pub fn start_polling(self: &Arc<Self>, every: Duration) -> PollGuard {
    let sync = Arc::clone(self);
    let handle = tokio::spawn(async move {
      let mut ticker = tokio::time::interval(every);
      ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
      loop {
        ticker.tick().await;
        let _ = sync.refresh().await;
      }
    });
    tracing::debug!(user_id = %self.user_id(), ?every, "profile polling started");
    PollGuard { handle }
  }
}
