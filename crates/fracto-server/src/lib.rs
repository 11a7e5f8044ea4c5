//! HTTP server wiring for the fracto profile API.
//!
//! Loads [`ServerConfig`], mounts [`fracto_api::api_router`] under `/api`
//! behind an HTTP trace layer, and imports job listings into the store.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use axum::Router;
use fracto_core::{
  NewJob,
  store::{JobStore, TagStore},
};
use fracto_store_sqlite::SqliteStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `FRACTO_*` environment variables.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:       "127.0.0.1".to_string(),
      port:       8080,
      store_path: PathBuf::from("fracto.db"),
    }
  }
}

impl ServerConfig {
  /// Read `path` (optional) overlaid with `FRACTO_*` environment variables.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("FRACTO"))
      .build()
      .context("failed to read config file")?;

    settings
      .try_deserialize()
      .context("failed to deserialise ServerConfig")
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  /// `store_path` with a leading `~` expanded to the user's home directory.
  pub fn resolved_store_path(&self) -> PathBuf { expand_tilde(&self.store_path) }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Job import ───────────────────────────────────────────────────────────────

/// Load a JSON array of listings from `path` into `store`.
///
/// Listings are matched by slug, so re-importing an updated file replaces
/// the old rows. Returns the number of listings written.
pub async fn import_jobs(store: &SqliteStore, path: &Path) -> anyhow::Result<usize> {
  let raw = tokio::fs::read_to_string(path)
    .await
    .with_context(|| format!("failed to read job file {}", path.display()))?;
  let jobs: Vec<NewJob> = serde_json::from_str(&raw)
    .with_context(|| format!("failed to parse job file {}", path.display()))?;

  let count = jobs.len();
  for job in jobs {
    let slug = job.slug.clone();
    store
      .upsert_job(job)
      .await
      .with_context(|| format!("failed to store job {slug:?}"))?;
  }
  tracing::info!(count, path = %path.display(), "imported job listings");
  Ok(count)
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the top-level [`Router`]: the API nested under `/api`.
pub fn router<S>(store: Arc<S>) -> Router
where
  S: TagStore + JobStore + 'static,
{
  Router::new()
    .nest("/api", fracto_api::api_router(store))
    .layer(TraceLayer::new_for_http())
}
