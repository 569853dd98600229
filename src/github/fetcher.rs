//! Cache-first GitHub fetcher.
//! A fresh cache entry short-circuits the network; a miss performs exactly one
//! request and overwrites the entry on success. Failures never touch the cache.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use super::cache::{repos_key, user_key, TimedCache};
use super::client::GitHubClient;
use super::types::{GitHubUser, Repository};
use crate::error::{FetchError, FetchResult};
use crate::store::KeyValueStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheSource {
  Network,
  Cache,
}

/// A fetched value with where it came from and when it was captured.
#[derive(Debug, Clone)]
pub struct Fetched<T> {
  pub data: T,
  pub source: CacheSource,
  /// Capture time, Unix epoch milliseconds.
  pub fetched_at_ms: i64,
}

#[derive(Clone)]
pub struct CachedGitHubClient {
  inner: GitHubClient,
  cache: TimedCache,
}

impl CachedGitHubClient {
  pub fn new(inner: GitHubClient, store: Arc<dyn KeyValueStore>, ttl: Duration) -> Self {
    Self {
      inner,
      cache: TimedCache::new(store, ttl),
    }
  }

  pub async fn fetch_user(&self, username: &str) -> FetchResult<Fetched<GitHubUser>> {
    let username = username.trim();
    self
      .cached(user_key(username), || self.inner.get_user(username))
      .await
  }

  pub async fn fetch_repos(&self, username: &str) -> FetchResult<Fetched<Vec<Repository>>> {
    let username = username.trim();
    self
      .cached(repos_key(username), || self.inner.get_repos(username))
      .await
  }

  async fn cached<T, F, Fut>(&self, key: String, fetch: F) -> FetchResult<Fetched<T>>
  where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = FetchResult<T>>,
  {
    let now = Utc::now().timestamp_millis();
    if let Some(entry) = self.cache.get_fresh::<T>(&key, now) {
      debug!(%key, "cache hit");
      return Ok(Fetched {
        data: entry.data,
        source: CacheSource::Cache,
        fetched_at_ms: entry.timestamp,
      });
    }

    debug!(%key, "cache miss");
    let data = fetch().await?;
    let now = Utc::now().timestamp_millis();
    if let Err(e) = self.cache.put(&key, &data, now) {
      warn!(%key, error = %e, "failed to write cache entry");
    }

    Ok(Fetched {
      data,
      source: CacheSource::Network,
      fetched_at_ms: now,
    })
  }
}

/// Message shown when a profile lookup fails.
pub fn user_error_message(err: &FetchError) -> String {
  match err {
    FetchError::NotFound(_) => "User not found".to_string(),
    FetchError::Status { status, .. } => format!("User not found (HTTP {})", status.as_u16()),
    FetchError::Network(_) => "Failed to fetch user data".to_string(),
    other => other.to_string(),
  }
}

/// Message shown when a repository lookup fails.
pub fn repos_error_message(err: &FetchError) -> String {
  match err {
    FetchError::Malformed { .. } | FetchError::InvalidUsername(_) => err.to_string(),
    _ => "Failed to fetch repositories".to_string(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::github::cache::DEFAULT_TTL;
  use crate::store::{JsonStore, MemoryStore};
  use reqwest::StatusCode;
  use wiremock::matchers::{method, path};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  fn user_body() -> serde_json::Value {
    serde_json::json!({
      "login": "octocat",
      "name": "The Octocat",
      "avatar_url": "https://avatars.example/octocat",
      "html_url": "https://github.com/octocat",
      "location": "San Francisco",
      "bio": null
    })
  }

  fn user(name: &str) -> GitHubUser {
    GitHubUser {
      login: "octocat".to_string(),
      name: Some(name.to_string()),
      avatar_url: String::new(),
      html_url: "https://github.com/octocat".to_string(),
      location: None,
      bio: None,
      followers: 0,
      following: 0,
      public_repos: 0,
    }
  }

  async fn setup() -> (MockServer, Arc<dyn KeyValueStore>, CachedGitHubClient) {
    let server = MockServer::start().await;
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let client = CachedGitHubClient::new(
      GitHubClient::new(&server.uri()).unwrap(),
      store.clone(),
      DEFAULT_TTL,
    );
    (server, store, client)
  }

  #[tokio::test]
  async fn test_miss_fetches_and_caches() {
    let (server, store, client) = setup().await;
    Mock::given(method("GET"))
      .and(path("/users/octocat"))
      .respond_with(ResponseTemplate::new(200).set_body_json(user_body()))
      .expect(1)
      .mount(&server)
      .await;

    let first = client.fetch_user("octocat").await.unwrap();
    assert_eq!(first.source, CacheSource::Network);
    assert!(store.get("user-octocat").unwrap().is_some());

    let second = client.fetch_user("octocat").await.unwrap();
    assert_eq!(second.source, CacheSource::Cache);
    assert_eq!(second.data, first.data);
  }

  #[tokio::test]
  async fn test_fresh_entry_skips_network() {
    let (server, _store, client) = setup().await;
    Mock::given(method("GET"))
      .respond_with(ResponseTemplate::new(500))
      .expect(0)
      .mount(&server)
      .await;

    let now = Utc::now().timestamp_millis();
    client.cache.put("user-octocat", &user("Cached"), now - 1_000).unwrap();

    let fetched = client.fetch_user("octocat").await.unwrap();
    assert_eq!(fetched.source, CacheSource::Cache);
    assert_eq!(fetched.data.display_name(), "Cached");
  }

  #[tokio::test]
  async fn test_stale_entry_refetches_and_overwrites() {
    let (server, store, client) = setup().await;
    Mock::given(method("GET"))
      .and(path("/users/octocat"))
      .respond_with(ResponseTemplate::new(200).set_body_json(user_body()))
      .expect(1)
      .mount(&server)
      .await;

    let stale_at = Utc::now().timestamp_millis() - 300_000;
    client.cache.put("user-octocat", &user("Stale"), stale_at).unwrap();

    let fetched = client.fetch_user("octocat").await.unwrap();
    assert_eq!(fetched.source, CacheSource::Network);
    assert_eq!(fetched.data.display_name(), "The Octocat");

    let raw: serde_json::Value = store.get_json("user-octocat").unwrap().unwrap();
    assert_eq!(raw["data"]["name"], "The Octocat");
    assert!(raw["timestamp"].as_i64().unwrap() > stale_at);
  }

  #[tokio::test]
  async fn test_error_leaves_cache_untouched() {
    let (server, store, client) = setup().await;
    Mock::given(method("GET"))
      .and(path("/users/octocat/repos"))
      .respond_with(ResponseTemplate::new(500))
      .mount(&server)
      .await;

    let stale_at = Utc::now().timestamp_millis() - 600_000;
    client.cache.put("repos-octocat", &Vec::<Repository>::new(), stale_at).unwrap();
    let before = store.get("repos-octocat").unwrap();

    let err = client.fetch_repos("octocat").await.unwrap_err();
    assert_eq!(repos_error_message(&err), "Failed to fetch repositories");
    assert_eq!(store.get("repos-octocat").unwrap(), before);
  }

  #[tokio::test]
  async fn test_not_found_message() {
    let (server, store, client) = setup().await;
    Mock::given(method("GET"))
      .and(path("/users/ghost"))
      .respond_with(ResponseTemplate::new(404))
      .mount(&server)
      .await;

    let err = client.fetch_user("ghost").await.unwrap_err();
    assert_eq!(user_error_message(&err), "User not found");
    assert!(store.get("user-ghost").unwrap().is_none());
  }

  #[test]
  fn test_status_message() {
    let err = FetchError::Status {
      status: StatusCode::FORBIDDEN,
      url: "https://api.github.com/users/x".to_string(),
    };
    assert_eq!(user_error_message(&err), "User not found (HTTP 403)");
    assert_eq!(repos_error_message(&err), "Failed to fetch repositories");
  }
}
