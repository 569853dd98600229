//! Storage trait and typed JSON helpers.

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{StoreError, StoreResult};

/// Flat string key-value storage backend.
///
/// Implementations must be safe to share between the UI and spawned fetch
/// tasks. Writes are last-write-wins; there is no transaction across keys.
pub trait KeyValueStore: Send + Sync {
  /// Read the raw value stored under `key`.
  fn get(&self, key: &str) -> StoreResult<Option<String>>;

  /// Store `value` under `key`, replacing any previous value.
  fn set(&self, key: &str, value: &str) -> StoreResult<()>;

  /// Delete `key`. Removing a missing key is not an error.
  fn remove(&self, key: &str) -> StoreResult<()>;
}

/// JSON (de)serialization on top of any [`KeyValueStore`].
pub trait JsonStore {
  /// Read and parse the value under `key`.
  ///
  /// Returns `StoreError::Malformed` when the stored text is not valid JSON
  /// for `T`; callers decide whether that is fatal.
  fn get_json<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Option<T>>;

  /// Serialize `value` and store it under `key`.
  fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> StoreResult<()>;
}

impl<S: KeyValueStore + ?Sized> JsonStore for S {
  fn get_json<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Option<T>> {
    match self.get(key)? {
      Some(raw) => serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StoreError::Malformed {
          key: key.to_string(),
          source,
        }),
      None => Ok(None),
    }
  }

  fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> StoreResult<()> {
    let raw = serde_json::to_string(value).map_err(|source| StoreError::Serialize {
      key: key.to_string(),
      source,
    })?;
    self.set(key, &raw)
  }
}
