//! Async HTTP client wrapping the `/api/user-profile` endpoints.

use std::time::Duration;

use fracto_core::{ItemId, NewProfileItem, ProfileItem, store::TagStore};
use reqwest::{Client, Response};
use serde::Deserialize;

use crate::error::ClientError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Deserialize)]
struct ItemsEnvelope {
  items: Vec<ProfileItem>,
}

#[derive(Deserialize)]
struct CreateEnvelope {
  item: ProfileItem,
}

#[derive(Deserialize)]
struct ErrorBody {
  error: String,
}

/// [`TagStore`] backed by a remote fracto API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct HttpTagStore {
  client:   Client,
  base_url: String,
}

impl HttpTagStore {
  /// `base_url` is the server root, e.g. `http://localhost:8080`.
  pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
    let client = Client::builder()
      .timeout(REQUEST_TIMEOUT)
      .build()
      .map_err(ClientError::Build)?;
    Ok(Self { client, base_url: base_url.into() })
  }

  pub fn base_url(&self) -> &str { &self.base_url }

  fn url(&self) -> String {
    format!("{}/api/user-profile", self.base_url.trim_end_matches('/'))
  }

  /// Turn a non-2xx response into [`ClientError::Status`], keeping the
  /// server's `{"error": ...}` message when there is one.
  async fn check(what: &'static str, resp: Response) -> Result<Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
      return Ok(resp);
    }
    let message = resp
      .json::<ErrorBody>()
      .await
      .map(|b| b.error)
      .unwrap_or_default();
    Err(ClientError::Status { what, status: status.as_u16(), message })
  }
}

impl TagStore for HttpTagStore {
  type Error = ClientError;

  /// `GET /api/user-profile?userId=<id>`
  async fn list_items(&self, user_id: &str) -> Result<Vec<ProfileItem>, ClientError> {
    const WHAT: &str = "GET /user-profile";
    let resp = self
      .client
      .get(self.url())
      .query(&[("userId", user_id)])
      .send()
      .await
      .map_err(|source| ClientError::Transport { what: WHAT, source })?;

    let envelope: ItemsEnvelope = Self::check(WHAT, resp)
      .await?
      .json()
      .await
      .map_err(|source| ClientError::Decode { what: WHAT, source })?;
    Ok(envelope.items)
  }

  /// `POST /api/user-profile`
  async fn create_item(&self, input: NewProfileItem) -> Result<ProfileItem, ClientError> {
    const WHAT: &str = "POST /user-profile";
    let resp = self
      .client
      .post(self.url())
      .json(&input)
      .send()
      .await
      .map_err(|source| ClientError::Transport { what: WHAT, source })?;

    let envelope: CreateEnvelope = Self::check(WHAT, resp)
      .await?
      .json()
      .await
      .map_err(|source| ClientError::Decode { what: WHAT, source })?;
    Ok(envelope.item)
  }

  /// `DELETE /api/user-profile?userId=<id>&itemId=<id>`
  ///
  /// The API does not say whether a row matched, so success is always `true`.
  async fn delete_item(&self, user_id: &str, item_id: ItemId) -> Result<bool, ClientError> {
    const WHAT: &str = "DELETE /user-profile";
    let item_id = item_id.to_string();
    let resp = self
      .client
      .delete(self.url())
      .query(&[("userId", user_id), ("itemId", item_id.as_str())])
      .send()
      .await
      .map_err(|source| ClientError::Transport { what: WHAT, source })?;

    Self::check(WHAT, resp).await?;
    Ok(true)
  }
}
