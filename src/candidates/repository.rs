//! In-memory candidate collection backed by the key-value store.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::model::{Candidate, CandidateDraft, ExperienceLevel};
use crate::error::{StoreError, StoreResult};
use crate::store::{JsonStore, KeyValueStore, CANDIDATES_CORRUPT_KEY, CANDIDATES_KEY};

/// Candidate counts per experience level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExperienceSummary {
  pub junior: usize,
  pub mid: usize,
  pub senior: usize,
}

impl ExperienceSummary {
  pub fn count(&self, level: ExperienceLevel) -> usize {
    match level {
      ExperienceLevel::Junior => self.junior,
      ExperienceLevel::Mid => self.mid,
      ExperienceLevel::Senior => self.senior,
    }
  }

  pub fn total(&self) -> usize {
    self.junior + self.mid + self.senior
  }
}

/// All candidates, loaded once from the store.
///
/// The store is the only persistence: every mutation rewrites the whole
/// `candidates` key.
pub struct CandidateRepository {
  store: Arc<dyn KeyValueStore>,
  candidates: Vec<Candidate>,
  /// Set when the stored collection could not be parsed at load time.
  load_warning: Option<String>,
}

impl CandidateRepository {
  /// Load the collection from `store`.
  ///
  /// A missing key yields an empty collection. A value that does not parse
  /// is copied to `candidates.corrupt` and the repository starts empty, so
  /// the next write cannot destroy the only copy.
  pub fn load(store: Arc<dyn KeyValueStore>) -> StoreResult<Self> {
    let (candidates, load_warning) = match store.get_json::<Vec<Candidate>>(CANDIDATES_KEY) {
      Ok(Some(candidates)) => (candidates, None),
      Ok(None) => (Vec::new(), None),
      Err(StoreError::Malformed { key, source }) => {
        warn!(%key, error = %source, "stored candidates are malformed, starting empty");
        if let Some(raw) = store.get(CANDIDATES_KEY)? {
          store.set(CANDIDATES_CORRUPT_KEY, &raw)?;
        }
        let message = format!(
          "Stored candidates could not be read ({}); saved a copy under '{}'",
          source, CANDIDATES_CORRUPT_KEY
        );
        (Vec::new(), Some(message))
      }
      Err(e) => return Err(e),
    };

    info!(count = candidates.len(), "loaded candidates");

    Ok(Self {
      store,
      candidates,
      load_warning,
    })
  }

  /// All candidates in insertion order.
  pub fn all(&self) -> &[Candidate] {
    &self.candidates
  }

  pub fn len(&self) -> usize {
    self.candidates.len()
  }

  pub fn is_empty(&self) -> bool {
    self.candidates.is_empty()
  }

  /// Warning produced while loading, if the stored data was unreadable.
  pub fn load_warning(&self) -> Option<&str> {
    self.load_warning.as_deref()
  }

  /// Create a candidate from a submitted draft and persist the collection.
  pub fn add(&mut self, draft: CandidateDraft) -> StoreResult<Candidate> {
    let candidate = draft.into_candidate(Utc::now());
    self.candidates.push(candidate.clone());
    self.persist()?;

    info!(id = %candidate.id, name = %candidate.full_name, "added candidate");
    Ok(candidate)
  }

  /// Remove the candidate with `id`. Returns whether anything was removed.
  ///
  /// An unknown id leaves both memory and store untouched.
  pub fn delete(&mut self, id: &str) -> StoreResult<bool> {
    let before = self.candidates.len();
    self.candidates.retain(|c| c.id != id);
    if self.candidates.len() == before {
      return Ok(false);
    }

    self.persist()?;
    info!(%id, "deleted candidate");
    Ok(true)
  }

  /// Count candidates per experience level, ignoring any active filter.
  pub fn summary(&self) -> ExperienceSummary {
    self
      .candidates
      .iter()
      .fold(ExperienceSummary::default(), |mut acc, c| {
        match c.experience_level {
          ExperienceLevel::Junior => acc.junior += 1,
          ExperienceLevel::Mid => acc.mid += 1,
          ExperienceLevel::Senior => acc.senior += 1,
        }
        acc
      })
  }

  fn persist(&self) -> StoreResult<()> {
    self.store.set_json(CANDIDATES_KEY, &self.candidates)
  }
}
