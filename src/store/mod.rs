//! Key-value persistence for candidates, search history and cached API data.
//!
//! Every persisted value is a JSON string stored under a flat key:
//! - `candidates`: array of candidates
//! - `searchHistory`: array of usernames
//! - `user-<username>` / `repos-<username>`: `{ data, timestamp }` cache entries

mod memory;
mod sqlite;
mod traits;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{JsonStore, KeyValueStore};

/// Key holding the candidate collection.
pub const CANDIDATES_KEY: &str = "candidates";

/// Key holding the raw candidate value when it failed to parse.
pub const CANDIDATES_CORRUPT_KEY: &str = "candidates.corrupt";

/// Key holding the GitHub search history.
pub const SEARCH_HISTORY_KEY: &str = "searchHistory";
