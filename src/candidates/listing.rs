//! Filtering, sorting and incremental paging over the candidate collection.
//!
//! Everything here is a pure function of its inputs; views recompute the
//! listing whenever a filter, the sort mode or the collection changes.

use std::cmp::Ordering;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use super::model::{Candidate, ExperienceLevel};

/// Default number of candidates revealed per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Conjunctive candidate filter. Empty inputs match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateFilter {
  /// Case-insensitive substring of the role.
  pub role: String,
  /// Exact experience level.
  pub experience: Option<ExperienceLevel>,
  /// Case-insensitive substring of any tech-stack tag.
  pub tech: String,
}

impl CandidateFilter {
  pub fn is_empty(&self) -> bool {
    self.role.is_empty() && self.experience.is_none() && self.tech.is_empty()
  }

  pub fn matches(&self, candidate: &Candidate) -> bool {
    if !self.role.is_empty() && !contains_ignore_case(&candidate.role, &self.role) {
      return false;
    }

    if let Some(level) = self.experience {
      if candidate.experience_level != level {
        return false;
      }
    }

    if !self.tech.is_empty()
      && !candidate
        .tech_stack
        .iter()
        .any(|tech| contains_ignore_case(tech, &self.tech))
    {
      return false;
    }

    true
  }
}

/// Sort order for the candidate list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
  #[default]
  Name,
  Experience,
}

impl SortMode {
  pub fn label(&self) -> &'static str {
    match self {
      SortMode::Name => "Name",
      SortMode::Experience => "Experience",
    }
  }

  pub fn toggle(&self) -> Self {
    match self {
      SortMode::Name => SortMode::Experience,
      SortMode::Experience => SortMode::Name,
    }
  }

  fn compare(&self, a: &Candidate, b: &Candidate) -> Ordering {
    match self {
      SortMode::Name => locale_compare(&a.full_name, &b.full_name),
      SortMode::Experience => a.experience_level.rank().cmp(&b.experience_level.rank()),
    }
  }
}

/// Filter then stably sort `candidates`.
pub fn apply<'a>(
  candidates: &'a [Candidate],
  filter: &CandidateFilter,
  sort: SortMode,
) -> Vec<&'a Candidate> {
  let mut result: Vec<&Candidate> = candidates.iter().filter(|c| filter.matches(c)).collect();
  // sort_by is stable: equal keys keep their stored order
  result.sort_by(|a, b| sort.compare(a, b));
  result
}

/// Incremental pager: reveals the first `page * page_size` entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
  page: usize,
  page_size: usize,
}

impl Default for Pager {
  fn default() -> Self {
    Self::new(DEFAULT_PAGE_SIZE)
  }
}

impl Pager {
  pub fn new(page_size: usize) -> Self {
    Self {
      page: 1,
      page_size: page_size.max(1),
    }
  }

  pub fn page(&self) -> usize {
    self.page
  }

  /// Number of entries to show out of `total`.
  pub fn visible(&self, total: usize) -> usize {
    total.min(self.page.saturating_mul(self.page_size))
  }

  /// Whether more entries exist beyond the visible window.
  pub fn has_more(&self, total: usize) -> bool {
    self.visible(total) < total
  }

  /// Reveal the next page. Returns false when everything is already shown.
  pub fn load_more(&mut self, total: usize) -> bool {
    if !self.has_more(total) {
      return false;
    }
    self.page += 1;
    true
  }

  /// Back to the first page, used whenever the filter or sort changes.
  pub fn reset(&mut self) {
    self.page = 1;
  }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
  haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Base letters with accents stripped and case folded.
fn primary_key(s: &str) -> String {
  s.nfd()
    .filter(|c| !is_combining_mark(*c))
    .flat_map(char::to_lowercase)
    .collect()
}

/// Collation in three passes: base letters, then accents, then case with
/// lowercase first. "Ángel" sorts between "Alice" and "Bob".
pub(crate) fn locale_compare(a: &str, b: &str) -> Ordering {
  primary_key(a)
    .cmp(&primary_key(b))
    .then_with(|| {
      let a = a.nfd().flat_map(char::to_lowercase);
      let b = b.nfd().flat_map(char::to_lowercase);
      a.cmp(b)
    })
    .then_with(|| b.cmp(a))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn candidate(id: &str, name: &str, role: &str, level: ExperienceLevel, tech: &[&str]) -> Candidate {
    Candidate {
      id: id.to_string(),
      full_name: name.to_string(),
      role: role.to_string(),
      linkedin_url: String::new(),
      github_url: String::new(),
      experience_level: level,
      tech_stack: tech.iter().map(|t| t.to_string()).collect(),
      date_added: "2024-01-01T00:00:00.000Z".to_string(),
    }
  }

  fn sample() -> Vec<Candidate> {
    vec![
      candidate("1", "zoe", "Backend Engineer", ExperienceLevel::Senior, &["Python", "AWS"]),
      candidate("2", "Adam", "Frontend Developer", ExperienceLevel::Junior, &["React", "TypeScript"]),
      candidate("3", "mia", "backend developer", ExperienceLevel::Mid, &["Node.js"]),
      candidate("4", "Bob", "Data Engineer", ExperienceLevel::Senior, &["Python", "SQL"]),
      candidate("5", "Cleo", "DevOps", ExperienceLevel::Junior, &["Docker", "AWS"]),
    ]
  }

  fn ids(list: &[&Candidate]) -> Vec<String> {
    list.iter().map(|c| c.id.clone()).collect()
  }

  #[test]
  fn test_empty_filter_keeps_everything() {
    let all = sample();
    let filter = CandidateFilter::default();
    assert!(filter.is_empty());
    assert_eq!(apply(&all, &filter, SortMode::Name).len(), all.len());
  }

  #[test]
  fn test_role_filter_is_case_insensitive_substring() {
    let all = sample();
    let filter = CandidateFilter {
      role: "BACKEND".to_string(),
      ..Default::default()
    };
    let result = apply(&all, &filter, SortMode::Name);
    assert_eq!(ids(&result), vec!["3", "1"]);

    let expected: Vec<&Candidate> = all
      .iter()
      .filter(|c| c.role.to_lowercase().contains("backend"))
      .collect();
    assert_eq!(result.len(), expected.len());
  }

  #[test]
  fn test_role_filter_is_idempotent() {
    let all = sample();
    let filter = CandidateFilter {
      role: "engineer".to_string(),
      ..Default::default()
    };
    let once: Vec<Candidate> = apply(&all, &filter, SortMode::Name)
      .into_iter()
      .cloned()
      .collect();
    let twice = apply(&once, &filter, SortMode::Name);
    assert_eq!(ids(&twice), once.iter().map(|c| c.id.clone()).collect::<Vec<_>>());
  }

  #[test]
  fn test_filters_are_conjunctive() {
    let all = sample();
    let filter = CandidateFilter {
      role: "engineer".to_string(),
      experience: Some(ExperienceLevel::Senior),
      tech: "sql".to_string(),
    };
    assert_eq!(ids(&apply(&all, &filter, SortMode::Name)), vec!["4"]);
  }

  #[test]
  fn test_tech_filter_matches_any_tag_substring() {
    let all = sample();
    let filter = CandidateFilter {
      tech: "aw".to_string(),
      ..Default::default()
    };
    assert_eq!(ids(&apply(&all, &filter, SortMode::Name)), vec!["5", "1"]);
  }

  #[test]
  fn test_sort_by_name_ignores_case() {
    let all = sample();
    let result = apply(&all, &CandidateFilter::default(), SortMode::Name);
    assert_eq!(ids(&result), vec!["2", "4", "5", "3", "1"]);
  }

  #[test]
  fn test_sort_by_experience_is_stable() {
    let all = sample();
    let result = apply(&all, &CandidateFilter::default(), SortMode::Experience);
    // Juniors (2, 5), then Mid (3), then Seniors (1, 4), each in stored order
    assert_eq!(ids(&result), vec!["2", "5", "3", "1", "4"]);

    let mut reversed = all.clone();
    reversed.reverse();
    let result = apply(&reversed, &CandidateFilter::default(), SortMode::Experience);
    assert_eq!(ids(&result), vec!["5", "2", "3", "4", "1"]);
    for pair in result.windows(2) {
      assert!(pair[0].experience_level.rank() <= pair[1].experience_level.rank());
    }
  }

  #[test]
  fn test_locale_compare_folds_accents() {
    let mut names = vec!["Zoe", "Émile", "Edgar", "Ángel", "Bob"];
    names.sort_by(|a, b| locale_compare(a, b));
    assert_eq!(names, vec!["Ángel", "Bob", "Edgar", "Émile", "Zoe"]);

    assert_eq!(locale_compare("resume", "résumé"), Ordering::Less);
    assert_eq!(locale_compare("émile", "Emile"), Ordering::Greater);
    assert_eq!(locale_compare("alice", "Alice"), Ordering::Less);
  }

  #[test]
  fn test_pager_reveals_pages() {
    let mut pager = Pager::new(10);
    assert_eq!(pager.visible(25), 10);
    assert!(pager.has_more(25));

    assert!(pager.load_more(25));
    assert_eq!(pager.visible(25), 20);
    assert!(pager.load_more(25));
    assert_eq!(pager.visible(25), 25);
    assert!(!pager.load_more(25));
    assert_eq!(pager.page(), 3);

    pager.reset();
    assert_eq!(pager.visible(25), 10);
  }

  #[test]
  fn test_pager_small_collection() {
    let pager = Pager::default();
    assert_eq!(pager.visible(3), 3);
    assert!(!pager.has_more(3));
    assert_eq!(Pager::new(0).visible(3), 1);
  }
}
