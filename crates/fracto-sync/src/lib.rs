//! Client-side profile tag synchronisation.
//!
//! [`HttpTagStore`] speaks the `/api/user-profile` contract. [`ProfileSync`]
//! keeps a cached, eventually-consistent copy of one user's tags on top of any
//! [`fracto_core::store::TagStore`], applies edits optimistically, and polls
//! for remote changes while a [`PollGuard`] is alive.

pub mod client;
pub mod error;
mod locks;
pub mod poll;
pub mod profile;

pub use client::HttpTagStore;
pub use error::{ClientError, SyncError};
pub use poll::{POLL_INTERVAL, PollGuard};
pub use profile::{JUST_UPDATED_FOR, ProfileSync, SyncEvent};

#[cfg(test)]
mod tests;
