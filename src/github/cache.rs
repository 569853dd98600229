//! Time-boxed cache for GitHub responses.
//! Entries are `{ data, timestamp }` JSON values in the key-value store, with
//! the capture time in Unix milliseconds. Nothing is ever evicted; an entry
//! older than the TTL is simply treated as absent.

use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::warn;

use crate::error::StoreResult;
use crate::store::{JsonStore, KeyValueStore};

/// Default freshness window: 5 minutes.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Cache key for a user's profile.
pub fn user_key(username: &str) -> String {
  format!("user-{}", username)
}

/// Cache key for a user's repository list.
pub fn repos_key(username: &str) -> String {
  format!("repos-{}", username)
}

/// Cached value plus the time it was captured.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedEntry<T> {
  pub data: T,
  /// Capture time, Unix epoch milliseconds.
  pub timestamp: i64,
}

impl<T> CachedEntry<T> {
  pub fn new(data: T, now_ms: i64) -> Self {
    Self {
      data,
      timestamp: now_ms,
    }
  }

  /// Fresh iff `now - timestamp < ttl`; an entry exactly `ttl` old is expired.
  pub fn is_fresh(&self, now_ms: i64, ttl: Duration) -> bool {
    let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
    now_ms.saturating_sub(self.timestamp) < ttl_ms
  }
}

/// Freshness-checked view over the key-value store.
#[derive(Clone)]
pub struct TimedCache {
  store: Arc<dyn KeyValueStore>,
  ttl: Duration,
}

impl TimedCache {
  pub fn new(store: Arc<dyn KeyValueStore>, ttl: Duration) -> Self {
    Self { store, ttl }
  }

  /// Return the entry under `key` if it is still fresh at `now_ms`.
  ///
  /// Unreadable entries count as misses so the caller refetches and
  /// overwrites them.
  pub fn get_fresh<T: DeserializeOwned>(&self, key: &str, now_ms: i64) -> Option<CachedEntry<T>> {
    match self.store.get_json::<CachedEntry<T>>(key) {
      Ok(Some(entry)) if entry.is_fresh(now_ms, self.ttl) => Some(entry),
      Ok(_) => None,
      Err(e) => {
        warn!(%key, error = %e, "discarding unreadable cache entry");
        None
      }
    }
  }

  /// Overwrite the entry under `key` with `data` captured at `now_ms`.
  pub fn put<T: Serialize>(&self, key: &str, data: &T, now_ms: i64) -> StoreResult<()> {
    self.store.set_json(key, &CachedEntry::new(data, now_ms))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::store::MemoryStore;

  const TTL_MS: i64 = 300_000;

  fn cache() -> (Arc<dyn KeyValueStore>, TimedCache) {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    (store.clone(), TimedCache::new(store, DEFAULT_TTL))
  }

  #[test]
  fn test_keys() {
    assert_eq!(user_key("octocat"), "user-octocat");
    assert_eq!(repos_key("octocat"), "repos-octocat");
  }

  #[test]
  fn test_freshness_boundary_is_exclusive() {
    let entry = CachedEntry::new("x", 1_000);
    assert!(entry.is_fresh(1_000, DEFAULT_TTL));
    assert!(entry.is_fresh(1_000 + TTL_MS - 1, DEFAULT_TTL));
    assert!(!entry.is_fresh(1_000 + TTL_MS, DEFAULT_TTL));
    assert!(!entry.is_fresh(1_000 + TTL_MS + 1, DEFAULT_TTL));
  }

  #[test]
  fn test_put_then_get_within_window() {
    let (_, cache) = cache();
    cache.put("user-octocat", &vec!["a".to_string()], 10_000).unwrap();

    let hit: Option<CachedEntry<Vec<String>>> = cache.get_fresh("user-octocat", 10_000 + 60_000);
    let hit = hit.unwrap();
    assert_eq!(hit.data, vec!["a".to_string()]);
    assert_eq!(hit.timestamp, 10_000);

    let miss: Option<CachedEntry<Vec<String>>> = cache.get_fresh("user-octocat", 10_000 + TTL_MS);
    assert!(miss.is_none());
  }

  #[test]
  fn test_stored_shape() {
    let (store, cache) = cache();
    cache.put("repos-octocat", &42u32, 7).unwrap();
    let raw: serde_json::Value =
      serde_json::from_str(&store.get("repos-octocat").unwrap().unwrap()).unwrap();
    assert_eq!(raw, serde_json::json!({ "data": 42, "timestamp": 7 }));
  }

  #[test]
  fn test_unreadable_entry_is_miss() {
    let (store, cache) = cache();
    store.set("user-octocat", "garbage").unwrap();
    let entry: Option<CachedEntry<u32>> = cache.get_fresh("user-octocat", 0);
    assert!(entry.is_none());
  }
}
