//! Core types and trait definitions for fracto profile tags and job search.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! The store, API, sync and CLI crates all depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod category;
pub mod error;
pub mod graph;
pub mod item;
pub mod jobs;
pub mod rates;
pub mod store;

pub use category::{Cardinality, CategorySpec, InputKind, ItemType};
pub use error::{Error, Result};
pub use item::{ItemId, ItemMetadata, NewProfileItem, ProfileItem};
pub use jobs::{Country, Job, JobId, JobPage, JobQuery, NewJob, WorkplaceType};
