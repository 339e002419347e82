// src/github/mod.rs
// =============================================================================
// This module is the GitHub REST API client.
//
// - error:  the typed error every request can fail with
// - models: the raw API payloads we deserialize
// - fetch:  the client itself, one method per resource plus fetch_all()
// =============================================================================

mod error;
mod fetch;
mod models;

pub use error::GitHubError;
pub use fetch::{decode_all, ClientConfig, GitHubClient, Resource, DEFAULT_API_BASE};
pub use models::{ApiEvent, ApiIssue, ApiRepository, ApiUser, RawGitHubData};
