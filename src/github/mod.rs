//! GitHub REST API access for user profiles and repositories.

pub mod cache;
pub mod client;
pub mod fetcher;
pub mod repos;
pub mod types;

pub use client::GitHubClient;
pub use fetcher::{CacheSource, CachedGitHubClient, Fetched};
pub use repos::RepoSort;
pub use types::{GitHubUser, Repository};
