//! CSV export of the full candidate collection.

use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::{eyre::eyre, Result};
use tracing::info;

use super::model::Candidate;

/// File name written by an export.
pub const EXPORT_FILE_NAME: &str = "candidates.csv";

const HEADER: [&str; 6] = [
  "Full Name",
  "Role",
  "Experience Level",
  "Tech Stack",
  "LinkedIn",
  "GitHub",
];

/// Render candidates as CSV: a header plus one row per candidate.
///
/// Fields containing commas, quotes or newlines are quoted, so the joined
/// tech stack stays a single column.
pub fn to_csv(candidates: &[Candidate]) -> Result<String> {
  let mut writer = csv::WriterBuilder::new()
    .terminator(csv::Terminator::Any(b'\n'))
    .from_writer(Vec::new());

  writer.write_record(HEADER)?;
  for candidate in candidates {
    let tech_stack = candidate.tech_stack.join(", ");
    writer.write_record([
      candidate.full_name.as_str(),
      candidate.role.as_str(),
      candidate.experience_level.label(),
      tech_stack.as_str(),
      candidate.linkedin_url.as_str(),
      candidate.github_url.as_str(),
    ])?;
  }

  let bytes = writer
    .into_inner()
    .map_err(|e| eyre!("Failed to finish CSV output: {}", e.error()))?;
  Ok(String::from_utf8(bytes)?)
}

/// Write `candidates.csv` into `dir`, returning the file path.
pub fn export_to_dir(candidates: &[Candidate], dir: &Path) -> Result<PathBuf> {
  let csv = to_csv(candidates)?;

  fs::create_dir_all(dir)
    .map_err(|e| eyre!("Failed to create export directory {}: {}", dir.display(), e))?;
  let path = dir.join(EXPORT_FILE_NAME);
  fs::write(&path, csv).map_err(|e| eyre!("Failed to write {}: {}", path.display(), e))?;

  info!(path = %path.display(), count = candidates.len(), "exported candidates");
  Ok(path)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::candidates::ExperienceLevel;
  use tempfile::TempDir;

  fn candidate(name: &str, role: &str, level: ExperienceLevel, tech: &[&str]) -> Candidate {
    Candidate {
      id: name.to_lowercase(),
      full_name: name.to_string(),
      role: role.to_string(),
      linkedin_url: format!("https://linkedin.com/in/{}", name.to_lowercase()),
      github_url: format!("https://github.com/{}", name.to_lowercase()),
      experience_level: level,
      tech_stack: tech.iter().map(|t| t.to_string()).collect(),
      date_added: "2024-01-01T00:00:00.000Z".to_string(),
    }
  }

  #[test]
  fn test_two_candidates_produce_three_lines() {
    let candidates = vec![
      candidate("Jane", "Backend Engineer", ExperienceLevel::Senior, &["Python", "AWS"]),
      candidate("John", "Designer", ExperienceLevel::Junior, &[]),
    ];
    let csv = to_csv(&candidates).unwrap();
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "Full Name,Role,Experience Level,Tech Stack,LinkedIn,GitHub");
    assert_eq!(
      lines[1],
      "Jane,Backend Engineer,Senior,\"Python, AWS\",https://linkedin.com/in/jane,https://github.com/jane"
    );
    assert_eq!(
      lines[2],
      "John,Designer,Junior,,https://linkedin.com/in/john,https://github.com/john"
    );
  }

  #[test]
  fn test_fields_with_quotes_are_escaped() {
    let candidates = vec![candidate(
      "Dwayne \"The Rock\"",
      "Lead, Platform",
      ExperienceLevel::Mid,
      &["SQL"],
    )];
    let csv = to_csv(&candidates).unwrap();

    let mut reader = csv::Reader::from_reader(csv.as_bytes());
    let record = reader.records().next().unwrap().unwrap();
    assert_eq!(&record[0], "Dwayne \"The Rock\"");
    assert_eq!(&record[1], "Lead, Platform");
    assert_eq!(record.len(), 6);
  }

  #[test]
  fn test_empty_collection_is_header_only() {
    let csv = to_csv(&[]).unwrap();
    assert_eq!(csv.lines().count(), 1);
  }

  #[test]
  fn test_export_writes_file() {
    let dir = TempDir::new().unwrap();
    let candidates = vec![candidate("Jane", "Engineer", ExperienceLevel::Senior, &["Rust"])];

    let path = export_to_dir(&candidates, dir.path()).unwrap();
    assert!(path.ends_with(EXPORT_FILE_NAME));

    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents.lines().count(), 2);
  }
}
