use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::candidates::listing::DEFAULT_PAGE_SIZE;
use crate::github::cache::DEFAULT_TTL;
use crate::github::client::GITHUB_API_BASE;
use crate::github::repos::DEFAULT_REPO_LIMIT;

const APP_NAME: &str = "hiredeck";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
  /// Store and log location (defaults to the platform data dir)
  data_dir: Option<PathBuf>,
  /// Where candidates.csv is written (defaults to the working directory)
  export_dir: Option<PathBuf>,
  #[serde(default)]
  pub candidates: CandidatesConfig,
  #[serde(default)]
  pub github: GitHubConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CandidatesConfig {
  pub page_size: usize,
}

impl Default for CandidatesConfig {
  fn default() -> Self {
    Self {
      page_size: DEFAULT_PAGE_SIZE,
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
  pub api_url: String,
  pub cache_ttl_secs: u64,
  /// Repositories shown on a profile
  pub repo_limit: usize,
}

impl Default for GitHubConfig {
  fn default() -> Self {
    Self {
      api_url: GITHUB_API_BASE.to_string(),
      cache_ttl_secs: DEFAULT_TTL.as_secs(),
      repo_limit: DEFAULT_REPO_LIMIT,
    }
  }
}

impl GitHubConfig {
  pub fn cache_ttl(&self) -> Duration {
    Duration::from_secs(self.cache_ttl_secs)
  }
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided (must exist)
  /// 2. ./hiredeck.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/hiredeck/config.yaml
  ///
  /// Nothing is required, so no file means defaults.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = match explicit_path {
      Some(p) if p.exists() => Some(p.to_path_buf()),
      Some(p) => return Err(eyre!("Config file not found: {}", p.display())),
      None => Self::find_config_file(),
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Ok(Self::default()),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(format!("{APP_NAME}.yaml"));
    if local.exists() {
      return Some(local);
    }

    dirs::config_dir()
      .map(|dir| dir.join(APP_NAME).join("config.yaml"))
      .filter(|p| p.exists())
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;
    Self::parse(&contents).map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn parse(contents: &str) -> Result<Self> {
    // an empty file deserializes to unit, not an empty map
    if contents.trim().is_empty() {
      return Ok(Self::default());
    }
    let config: Config = serde_yaml::from_str(contents)?;
    if config.candidates.page_size == 0 {
      return Err(eyre!("candidates.page_size must be at least 1"));
    }
    Ok(config)
  }

  pub fn set_data_dir(&mut self, dir: PathBuf) {
    self.data_dir = Some(dir);
  }

  pub fn set_export_dir(&mut self, dir: PathBuf) {
    self.export_dir = Some(dir);
  }

  pub fn data_dir(&self) -> PathBuf {
    match &self.data_dir {
      Some(dir) => expand_home(dir),
      None => dirs::data_dir()
        .map(|d| d.join(APP_NAME))
        .unwrap_or_else(|| PathBuf::from(format!(".{APP_NAME}"))),
    }
  }

  pub fn export_dir(&self) -> PathBuf {
    self
      .export_dir
      .as_deref()
      .map(expand_home)
      .unwrap_or_else(|| PathBuf::from("."))
  }

  pub fn database_path(&self) -> PathBuf {
    self.data_dir().join(format!("{APP_NAME}.db"))
  }

  pub fn log_dir(&self) -> PathBuf {
    self.data_dir().join("logs")
  }
}

fn expand_home(path: &Path) -> PathBuf {
  match (path.strip_prefix("~"), dirs::home_dir()) {
    (Ok(rest), Some(home)) => home.join(rest),
    _ => path.to_path_buf(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::io::Write;

  #[test]
  fn test_empty_file_is_default() {
    let config = Config::parse("").unwrap();
    assert_eq!(config.candidates.page_size, 10);
    assert_eq!(config.github.api_url, "https://api.github.com");
    assert_eq!(config.github.cache_ttl(), Duration::from_secs(300));
    assert_eq!(config.export_dir(), PathBuf::from("."));
  }

  #[test]
  fn test_partial_file_keeps_other_defaults() {
    let config = Config::parse(
      "export_dir: /tmp/out\ngithub:\n  api_url: http://localhost:9000\n",
    )
    .unwrap();
    assert_eq!(config.export_dir(), PathBuf::from("/tmp/out"));
    assert_eq!(config.github.api_url, "http://localhost:9000");
    assert_eq!(config.github.repo_limit, 10);
    assert_eq!(config.candidates.page_size, 10);
  }

  #[test]
  fn test_zero_page_size_rejected() {
    assert!(Config::parse("candidates:\n  page_size: 0\n").is_err());
  }

  #[test]
  fn test_explicit_missing_path_errors() {
    let dir = tempfile::tempdir().unwrap();
    assert!(Config::load(Some(&dir.path().join("nope.yaml"))).is_err());
  }

  #[test]
  fn test_load_explicit_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "data_dir: /var/lib/hiredeck").unwrap();
    let config = Config::load(Some(file.path())).unwrap();
    assert_eq!(config.database_path(), PathBuf::from("/var/lib/hiredeck/hiredeck.db"));
    assert_eq!(config.log_dir(), PathBuf::from("/var/lib/hiredeck/logs"));
  }
}
