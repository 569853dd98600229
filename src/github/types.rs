//! GitHub API response types.
//! Only the fields the profile and repository views render are kept; unknown
//! fields are ignored and a missing required field is a malformed response.

use serde::{Deserialize, Serialize};

/// Public profile of a GitHub user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubUser {
  pub login: String,
  pub name: Option<String>,
  pub avatar_url: String,
  pub html_url: String,
  pub location: Option<String>,
  pub bio: Option<String>,
  #[serde(default)]
  pub followers: u64,
  #[serde(default)]
  pub following: u64,
  #[serde(default)]
  pub public_repos: u64,
}

impl GitHubUser {
  /// Display name, falling back to the login when no name is set.
  pub fn display_name(&self) -> &str {
    self
      .name
      .as_deref()
      .filter(|n| !n.trim().is_empty())
      .unwrap_or(&self.login)
  }
}

/// Public repository owned by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
  pub id: u64,
  pub name: String,
  pub description: Option<String>,
  pub html_url: String,
  #[serde(default)]
  pub stargazers_count: u64,
  #[serde(default)]
  pub forks_count: u64,
  pub language: Option<String>,
}
