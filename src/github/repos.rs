//! Repository selection for the profile view: language filter, sort, top N.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use super::types::Repository;
use crate::candidates::listing::locale_compare;

pub const DEFAULT_REPO_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepoSort {
  #[default]
  Stars,
  Name,
}

impl RepoSort {
  pub fn label(&self) -> &'static str {
    match self {
      RepoSort::Stars => "Stars",
      RepoSort::Name => "Name",
    }
  }

  pub fn toggle(&self) -> Self {
    match self {
      RepoSort::Stars => RepoSort::Name,
      RepoSort::Name => RepoSort::Stars,
    }
  }

  fn compare(&self, a: &Repository, b: &Repository) -> Ordering {
    match self {
      RepoSort::Stars => b.stargazers_count.cmp(&a.stargazers_count),
      RepoSort::Name => locale_compare(&a.name, &b.name),
    }
  }
}

/// Distinct, sorted languages across `repos`. Repositories without a
/// language contribute nothing.
pub fn languages(repos: &[Repository]) -> Vec<String> {
  repos
    .iter()
    .filter_map(|r| r.language.clone())
    .collect::<BTreeSet<_>>()
    .into_iter()
    .collect()
}

/// Filter by `language`, sort, then keep the first `limit`.
pub fn select<'a>(
  repos: &'a [Repository],
  language: Option<&str>,
  sort: RepoSort,
  limit: usize,
) -> Vec<&'a Repository> {
  let mut selected: Vec<&Repository> = repos
    .iter()
    .filter(|r| language.map_or(true, |lang| r.language.as_deref() == Some(lang)))
    .collect();
  selected.sort_by(|a, b| sort.compare(a, b));
  selected.truncate(limit);
  selected
}
