//! Candidate records and form drafts.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Technologies offered by the candidate form.
pub const TECH_STACK_OPTIONS: &[&str] = &[
  "React",
  "Node.js",
  "Docker",
  "TypeScript",
  "Python",
  "Java",
  "AWS",
  "MongoDB",
  "SQL",
];

/// Experience tier of a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ExperienceLevel {
  Junior,
  #[default]
  Mid,
  Senior,
}

impl ExperienceLevel {
  pub const ALL: [ExperienceLevel; 3] = [
    ExperienceLevel::Junior,
    ExperienceLevel::Mid,
    ExperienceLevel::Senior,
  ];

  /// Ordinal used for sorting: Junior < Mid < Senior.
  pub fn rank(&self) -> u8 {
    match self {
      ExperienceLevel::Junior => 1,
      ExperienceLevel::Mid => 2,
      ExperienceLevel::Senior => 3,
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      ExperienceLevel::Junior => "Junior",
      ExperienceLevel::Mid => "Mid",
      ExperienceLevel::Senior => "Senior",
    }
  }

  pub fn next(&self) -> Self {
    match self {
      ExperienceLevel::Junior => ExperienceLevel::Mid,
      ExperienceLevel::Mid => ExperienceLevel::Senior,
      ExperienceLevel::Senior => ExperienceLevel::Junior,
    }
  }

  pub fn prev(&self) -> Self {
    match self {
      ExperienceLevel::Junior => ExperienceLevel::Senior,
      ExperienceLevel::Mid => ExperienceLevel::Junior,
      ExperienceLevel::Senior => ExperienceLevel::Mid,
    }
  }
}

/// A tracked job applicant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
  pub id: String,
  pub full_name: String,
  pub role: String,
  pub linkedin_url: String,
  pub github_url: String,
  pub experience_level: ExperienceLevel,
  #[serde(default)]
  pub tech_stack: Vec<String>,
  pub date_added: String,
}

impl Candidate {
  /// GitHub username taken from the candidate's profile URL, if it has one.
  ///
  /// Accepts `https://github.com/<user>` with or without a trailing path,
  /// and a bare username.
  pub fn github_username(&self) -> Option<String> {
    let raw = self.github_url.trim();
    if raw.is_empty() {
      return None;
    }

    let rest = raw
      .strip_prefix("https://")
      .or_else(|| raw.strip_prefix("http://"))
      .unwrap_or(raw);
    let rest = rest.strip_prefix("www.").unwrap_or(rest);

    let username = match rest.strip_prefix("github.com/") {
      Some(path) => path.split('/').next().unwrap_or(""),
      None if !rest.contains('/') && !rest.contains('.') => rest,
      None => "",
    };

    let username = username.trim_start_matches('@');
    if username.is_empty() {
      None
    } else {
      Some(username.to_string())
    }
  }
}

/// Form data collected before a candidate exists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateDraft {
  pub full_name: String,
  pub role: String,
  pub linkedin_url: String,
  pub github_url: String,
  pub experience_level: ExperienceLevel,
  pub tech_stack: Vec<String>,
}

impl CandidateDraft {
  /// Add `tech` if missing, remove it if already selected.
  pub fn toggle_tech(&mut self, tech: &str) {
    if let Some(pos) = self.tech_stack.iter().position(|t| t == tech) {
      self.tech_stack.remove(pos);
    } else {
      self.tech_stack.push(tech.to_string());
    }
  }

  /// Names of required fields that are still blank.
  pub fn missing_fields(&self) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if self.full_name.trim().is_empty() {
      missing.push("Full Name");
    }
    if self.role.trim().is_empty() {
      missing.push("Job Role / Position");
    }
    if self.linkedin_url.trim().is_empty() {
      missing.push("LinkedIn URL");
    }
    if self.github_url.trim().is_empty() {
      missing.push("GitHub URL");
    }
    missing
  }

  /// Turn the draft into a candidate with a fresh id and timestamp.
  pub fn into_candidate(self, now: DateTime<Utc>) -> Candidate {
    Candidate {
      id: Uuid::new_v4().to_string(),
      full_name: self.full_name.trim().to_string(),
      role: self.role.trim().to_string(),
      linkedin_url: self.linkedin_url.trim().to_string(),
      github_url: self.github_url.trim().to_string(),
      experience_level: self.experience_level,
      tech_stack: self.tech_stack,
      date_added: now.to_rfc3339_opts(SecondsFormat::Millis, true),
    }
  }
}
