//! GitHub API HTTP client.
//! Builds endpoint URLs, sends unauthenticated requests and maps responses
//! into typed records or FetchError kinds.

use color_eyre::{eyre::eyre, Result};
use reqwest::{
  header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT},
  Client, Response, StatusCode,
};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::types::{GitHubUser, Repository};
use crate::error::{FetchError, FetchResult};

pub const GITHUB_API_BASE: &str = "https://api.github.com";
const GITHUB_API_VERSION: &str = "2022-11-28";

/// Page size requested from the repositories endpoint.
pub const REPOS_PER_PAGE: u32 = 100;

/// Unauthenticated GitHub REST client.
#[derive(Clone)]
pub struct GitHubClient {
  client: Client,
  base_url: Url,
}

impl GitHubClient {
  /// Create a client for the API rooted at `api_url`.
  pub fn new(api_url: &str) -> Result<Self> {
    let base_url =
      Url::parse(api_url).map_err(|e| eyre!("Invalid GitHub API URL '{}': {}", api_url, e))?;
    if base_url.cannot_be_a_base() {
      return Err(eyre!("Invalid GitHub API URL '{}'", api_url));
    }

    let mut headers = HeaderMap::new();
    headers.insert(
      ACCEPT,
      HeaderValue::from_static("application/vnd.github+json"),
    );
    headers.insert(
      "X-GitHub-Api-Version",
      HeaderValue::from_static(GITHUB_API_VERSION),
    );
    headers.insert(
      USER_AGENT,
      HeaderValue::from_static(concat!("hiredeck/", env!("CARGO_PKG_VERSION"))),
    );

    let client = Client::builder()
      .default_headers(headers)
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Ok(Self { client, base_url })
  }

  /// Fetch a user's public profile.
  pub async fn get_user(&self, username: &str) -> FetchResult<GitHubUser> {
    let url = self.endpoint(&["users", validate_username(username)?])?;
    self.get_json(url).await
  }

  /// Fetch up to [`REPOS_PER_PAGE`] public repositories of a user.
  pub async fn get_repos(&self, username: &str) -> FetchResult<Vec<Repository>> {
    let mut url = self.endpoint(&["users", validate_username(username)?, "repos"])?;
    url
      .query_pairs_mut()
      .append_pair("per_page", &REPOS_PER_PAGE.to_string());
    self.get_json(url).await
  }

  /// Join path segments onto the base URL, percent-encoding each one.
  fn endpoint(&self, segments: &[&str]) -> FetchResult<Url> {
    let mut url = self.base_url.clone();
    url
      .path_segments_mut()
      .map_err(|_| FetchError::InvalidUsername(segments.join("/")))?
      .pop_if_empty()
      .extend(segments);
    Ok(url)
  }

  async fn get_json<T: DeserializeOwned>(&self, url: Url) -> FetchResult<T> {
    debug!(%url, "GET");
    let response = self.client.get(url.clone()).send().await?;
    log_rate_limit(&response);

    let response = check_response(response)?;
    let body = response.text().await?;

    serde_json::from_str(&body).map_err(|source| FetchError::Malformed {
      url: url.to_string(),
      source,
    })
  }
}

/// Convert non-2xx responses into errors.
fn check_response(response: Response) -> FetchResult<Response> {
  let status = response.status();
  if status.is_success() {
    return Ok(response);
  }

  let url = response.url().to_string();
  debug!(%status, %url, "request failed");
  match status {
    StatusCode::NOT_FOUND => Err(FetchError::NotFound(url)),
    status => Err(FetchError::Status { status, url }),
  }
}

fn log_rate_limit(response: &Response) {
  let remaining = response
    .headers()
    .get("x-ratelimit-remaining")
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.parse::<u64>().ok());

  if let Some(remaining) = remaining {
    debug!(remaining, "GitHub rate limit");
  }
}

fn validate_username(username: &str) -> FetchResult<&str> {
  let trimmed = username.trim();
  if trimmed.is_empty() || trimmed.chars().any(|c| c.is_whitespace() || c == '/') {
    return Err(FetchError::InvalidUsername(username.to_string()));
  }
  Ok(trimmed)
}
