//! JSON REST API for fracto profile tags and the job board.
//!
//! Exposes an axum [`Router`] backed by any store implementing both
//! [`fracto_core::store::TagStore`] and [`fracto_core::store::JobStore`].
//! Auth, TLS, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", fracto_api::api_router(store.clone()))
//! ```

pub mod error;
pub mod jobs;
pub mod profile;

use std::sync::Arc;

use axum::{Router, routing::get};
use fracto_core::store::{JobStore, TagStore};

pub use error::ApiError;

/// Build the API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: TagStore + JobStore + 'static,
{
  Router::new()
    .route(
      "/user-profile",
      get(profile::list::<S>)
        .post(profile::create::<S>)
        .delete(profile::delete::<S>),
    )
    .route("/jobs/search", get(jobs::search::<S>))
    .with_state(store)
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use chrono::NaiveDate;
  use fracto_core::{
    ItemId, ItemType, JobPage, JobQuery, NewJob, NewProfileItem, ProfileItem, WorkplaceType,
    store::{JobStore, TagStore},
  };
  use fracto_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  use super::api_router;

  async fn make_store() -> Arc<SqliteStore> {
    Arc::new(SqliteStore::open_in_memory().await.unwrap())
  }

  async fn oneshot_json(
    store: Arc<SqliteStore>,
    method: &str,
    uri: &str,
    body: Option<Value>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    let resp = api_router(store).oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
  }

  // ── GET ──────────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn get_without_user_id_is_400() {
    let (status, body) = oneshot_json(make_store().await, "GET", "/user-profile", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "userId required");
  }

  #[tokio::test]
  async fn get_returns_items_envelope() {
    let store = make_store().await;
    store
      .create_item(NewProfileItem::new("u1", ItemType::Skill, "Strategy").confirmed(true))
      .await
      .unwrap();

    let (status, body) = oneshot_json(store, "GET", "/user-profile?userId=u1", None).await;
    assert_eq!(status, StatusCode::OK);
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["item_type"], "skill");
    assert_eq!(items[0]["value"], "Strategy");
    assert_eq!(items[0]["confirmed"], true);
    assert!(items[0]["id"].is_string());
  }

  // ── POST ─────────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn post_creates_item() {
    let store = make_store().await;
    let (status, body) = oneshot_json(
      store.clone(),
      "POST",
      "/user-profile",
      Some(json!({
        "userId": "u1",
        "itemType": "company",
        "value": "Acme",
        "confirmed": true,
        "metadata": { "job_title": "CFO" }
      })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["item"]["metadata"]["job_title"], "CFO");

    let items = store.list_items("u1").await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].value, "Acme");
  }

  #[tokio::test]
  async fn post_defaults_to_unconfirmed() {
    let store = make_store().await;
    let (status, body) = oneshot_json(
      store,
      "POST",
      "/user-profile",
      Some(json!({ "userId": "u1", "itemType": "skill", "value": "Python" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["item"]["confirmed"], false);
  }

  #[tokio::test]
  async fn post_missing_value_is_400() {
    let (status, body) = oneshot_json(
      make_store().await,
      "POST",
      "/user-profile",
      Some(json!({ "userId": "u1", "itemType": "skill", "value": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "userId, itemType, and value required");
  }

  #[tokio::test]
  async fn post_unknown_item_type_is_400() {
    let (status, _) = oneshot_json(
      make_store().await,
      "POST",
      "/user-profile",
      Some(json!({ "userId": "u1", "itemType": "hobby", "value": "Chess" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  // ── DELETE ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn delete_removes_item() {
    let store = make_store().await;
    let item = store
      .create_item(NewProfileItem::new("u1", ItemType::Location, "Leeds"))
      .await
      .unwrap();
    let id = item.id.unwrap();

    let (status, body) = oneshot_json(
      store.clone(),
      "DELETE",
      &format!("/user-profile?userId=u1&itemId={id}"),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(store.list_items("u1").await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn delete_requires_both_ids() {
    let (status, body) =
      oneshot_json(make_store().await, "DELETE", "/user-profile?userId=u1", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "userId and itemId required");
  }

  #[tokio::test]
  async fn delete_rejects_malformed_item_id() {
    let (status, _) = oneshot_json(
      make_store().await,
      "DELETE",
      "/user-profile?userId=u1&itemId=42",
      None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  // ── Job search ───────────────────────────────────────────────────────────────

  async fn job_board() -> Arc<SqliteStore> {
    let store = make_store().await;
    let jobs = [
      NewJob {
        location:       Some("London".into()),
        role_category:  Some("Engineering".into()),
        workplace_type: Some(WorkplaceType::Remote),
        posted_date:    NaiveDate::from_ymd_opt(2025, 4, 2),
        ..NewJob::new("cto-london", "Fractional CTO")
      },
      NewJob {
        role_category: Some("Finance".into()),
        posted_date:   NaiveDate::from_ymd_opt(2025, 4, 1),
        ..NewJob::new("cfo-unplaced", "Fractional CFO")
      },
      NewJob {
        location:      Some("Edinburgh".into()),
        role_category: Some("Finance".into()),
        posted_date:   NaiveDate::from_ymd_opt(2025, 3, 1),
        ..NewJob::new("cfo-edinburgh", "Fractional CFO")
      },
    ];
    for job in jobs {
      store.upsert_job(job).await.unwrap();
    }
    store
  }

  #[tokio::test]
  async fn job_search_envelope_and_listing_shape() {
    let (status, body) = oneshot_json(job_board().await, "GET", "/jobs/search", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    assert_eq!(body["page"], 1);
    assert_eq!(body["limit"], 20);
    assert_eq!(body["totalPages"], 1);

    let first = &body["jobs"][0];
    assert_eq!(first["slug"], "cto-london");
    assert_eq!(first["is_remote"], true);
    assert_eq!(first["workplace_type"], "Remote");
    assert_eq!(first["skills_required"], json!([]));
    assert_eq!(first["posted_date"], "2025-04-02");
  }

  #[tokio::test]
  async fn international_search_shows_unplaced_listing_as_tbd() {
    let (_, body) = oneshot_json(
      job_board().await,
      "GET",
      "/jobs/search?role=Finance&international=true",
      None,
    )
    .await;
    let slugs: Vec<_> = body["jobs"].as_array().unwrap().iter().map(|j| j["slug"].clone()).collect();
    assert_eq!(slugs, [json!("cfo-unplaced"), json!("cfo-edinburgh")]);
    assert_eq!(body["jobs"][0]["location"], "Location TBD");
  }

  #[tokio::test]
  async fn job_search_filters_and_caps_limit() {
    let store = job_board().await;

    let (_, body) = oneshot_json(
      store.clone(),
      "GET",
      "/jobs/search?role=Technology&remote=remote&location=lon",
      None,
    )
    .await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["jobs"][0]["slug"], "cto-london");

    let (_, body) = oneshot_json(store.clone(), "GET", "/jobs/search?remote=hybrid", None).await;
    assert_eq!(body["total"], 0);

    let (status, body) =
      oneshot_json(store, "GET", "/jobs/search?limit=500&page=abc", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["limit"], 50);
    assert_eq!(body["page"], 1);
  }

  /// Every operation fails.
  struct BrokenStore;

  #[derive(Debug, thiserror::Error)]
  #[error("disk on fire")]
  struct Broken;

  impl TagStore for BrokenStore {
    type Error = Broken;

    async fn list_items(&self, _: &str) -> Result<Vec<ProfileItem>, Broken> { Err(Broken) }

    async fn create_item(&self, _: NewProfileItem) -> Result<ProfileItem, Broken> { Err(Broken) }

    async fn delete_item(&self, _: &str, _: ItemId) -> Result<bool, Broken> { Err(Broken) }
  }

  impl JobStore for BrokenStore {
    type Error = Broken;

    async fn search_jobs(&self, _: &JobQuery) -> Result<JobPage, Broken> { Err(Broken) }
  }

  async fn broken(uri: &str) -> (StatusCode, Value) {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = api_router(Arc::new(BrokenStore)).oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
  }

  #[tokio::test]
  async fn store_failures_are_500_without_details() {
    let (status, body) = broken("/user-profile?userId=u1").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "profile store failure" }));

    let (status, body) = broken("/jobs/search").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "jobs": [], "total": 0, "error": "Search failed" }));
  }
}
