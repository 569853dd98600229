//! Recently searched GitHub usernames.

use std::sync::Arc;

use tracing::warn;

use crate::error::StoreResult;
use crate::store::{JsonStore, KeyValueStore, SEARCH_HISTORY_KEY};

/// Maximum number of remembered searches.
pub const HISTORY_LIMIT: usize = 5;

/// Most-recent-first list of searched usernames, persisted after every change.
pub struct SearchHistory {
  store: Arc<dyn KeyValueStore>,
  entries: Vec<String>,
}

impl SearchHistory {
  /// Load history from `store`. Unreadable history starts empty.
  pub fn load(store: Arc<dyn KeyValueStore>) -> StoreResult<Self> {
    let entries = match store.get_json::<Vec<String>>(SEARCH_HISTORY_KEY) {
      Ok(entries) => entries.unwrap_or_default(),
      Err(e) => {
        warn!(error = %e, "ignoring unreadable search history");
        Vec::new()
      }
    };

    Ok(Self { store, entries })
  }

  pub fn entries(&self) -> &[String] {
    &self.entries
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Record a search for `username` and persist.
  ///
  /// Blank input is ignored. A repeated username moves to the front
  /// instead of appearing twice.
  pub fn record(&mut self, username: &str) -> StoreResult<()> {
    let username = username.trim();
    if username.is_empty() {
      return Ok(());
    }

    self.entries = push_recent(&self.entries, username);
    self.store.set_json(SEARCH_HISTORY_KEY, &self.entries)
  }
}

fn push_recent(entries: &[String], username: &str) -> Vec<String> {
  std::iter::once(username.to_string())
    .chain(entries.iter().filter(|e| e.as_str() != username).cloned())
    .take(HISTORY_LIMIT)
    .collect()
}
