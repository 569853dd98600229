//! Error types for the store and GitHub boundaries.
//!
//! Application-level failures (config, terminal setup) use `color_eyre`
//! reports instead; these enums exist where callers branch on the kind.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
  #[error("storage backend error: {0}")]
  Backend(#[from] rusqlite::Error),

  #[error("storage lock poisoned")]
  Poisoned,

  #[error("malformed value under key '{key}': {source}")]
  Malformed {
    key: String,
    #[source]
    source: serde_json::Error,
  },

  #[error("failed to serialize value for key '{key}': {source}")]
  Serialize {
    key: String,
    #[source]
    source: serde_json::Error,
  },

  #[error("IO error: {0}")]
  Io(#[from] std::io::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum FetchError {
  #[error("Resource not found: {0}")]
  NotFound(String),

  #[error("GitHub returned HTTP {status} for {url}")]
  Status { status: StatusCode, url: String },

  #[error("Network error: {0}")]
  Network(#[from] reqwest::Error),

  #[error("Malformed response from {url}: {source}")]
  Malformed {
    url: String,
    #[source]
    source: serde_json::Error,
  },

  #[error("Invalid username: '{0}'")]
  InvalidUsername(String),
}

pub type FetchResult<T> = std::result::Result<T, FetchError>;
