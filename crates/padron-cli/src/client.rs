//! Async HTTP client for the citizen registry's JSON API.

use std::time::Duration;

use padron_core::{
  citizen::{Citizen, CitizenId, CitizenUpdate},
  directory::CitizenDirectory,
};
use reqwest::{Client, StatusCode};
use thiserror::Error;

// ─── Errors ───────────────────────────────────────────────────────────────────

/// Failures talking to the registry API.
#[derive(Debug, Error)]
pub enum Error {
  #[error("request failed: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("{method} {path} → {status}")]
  Status {
    method: &'static str,
    path:   String,
    status: StatusCode,
  },
}

// ─── Config & client ──────────────────────────────────────────────────────────

/// Connection settings for the registry API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  pub username: String,
  pub password: String,
}

/// Async HTTP client for the registry's JSON REST API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self, Error> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}/api{}", self.config.base_url.trim_end_matches('/'), path)
  }

  fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    if self.config.username.is_empty() {
      req
    } else {
      req.basic_auth(&self.config.username, Some(&self.config.password))
    }
  }
}

impl CitizenDirectory for ApiClient {
  type Error = Error;

  /// `GET /api/citizens/{id}` — 404 is "no such citizen", not an error.
  async fn get_citizen(&self, id: CitizenId) -> Result<Option<Citizen>, Error> {
    let path = format!("/citizens/{id}");
    let resp = self.auth(self.client.get(self.url(&path))).send().await?;

    if resp.status() == StatusCode::NOT_FOUND {
      return Ok(None);
    }
    if !resp.status().is_success() {
      return Err(Error::Status { method: "GET", path, status: resp.status() });
    }
    Ok(Some(resp.json().await?))
  }

  /// `GET /api/citizens`
  async fn list_citizens(&self) -> Result<Vec<Citizen>, Error> {
    let path = "/citizens".to_string();
    let resp = self.auth(self.client.get(self.url(&path))).send().await?;

    if !resp.status().is_success() {
      return Err(Error::Status { method: "GET", path, status: resp.status() });
    }
    Ok(resp.json().await?)
  }

  /// `PUT /api/citizens/{id}`
  async fn update_citizen(&self, id: CitizenId, update: &CitizenUpdate) -> Result<(), Error> {
    let path = format!("/citizens/{id}");
    let resp = self
      .auth(self.client.put(self.url(&path)))
      .json(update)
      .send()
      .await?;

    if !resp.status().is_success() {
      return Err(Error::Status { method: "PUT", path, status: resp.status() });
    }
    Ok(())
  }
}
