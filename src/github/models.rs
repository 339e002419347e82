// src/github/models.rs
// =============================================================================
// Raw GitHub REST API payloads.
//
// These structs mirror only the fields we actually read. Anything GitHub may
// omit or send as null is an Option or has a serde default, so a sparse
// payload still decodes.
// =============================================================================

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// GET /users/{user}
#[derive(Debug, Clone, Deserialize)]
pub struct ApiUser {
    pub login: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub blog: Option<String>,
    pub location: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    pub html_url: Option<String>,
    #[serde(default)]
    pub public_repos: u32,
    #[serde(default)]
    pub public_gists: u32,
    #[serde(default)]
    pub followers: u32,
    #[serde(default)]
    pub following: u32,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// One element of GET /users/{user}/repos
#[derive(Debug, Clone, Deserialize)]
pub struct ApiRepository {
    pub name: String,
    pub full_name: Option<String>,
    pub description: Option<String>,
    pub html_url: String,
    #[serde(default)]
    pub stargazers_count: u32,
    #[serde(default)]
    pub forks_count: u32,
    pub language: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub fork: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// One element of GET /users/{user}/events/public
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub repo: ApiEventRepo,
    pub created_at: DateTime<Utc>,
    // Passed through untouched; its shape depends on the event type
    #[serde(default)]
    pub payload: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiEventRepo {
    pub name: String,
}

/// GET /search/issues
#[derive(Debug, Clone, Deserialize)]
pub struct ApiIssueSearch {
    #[serde(default)]
    pub items: Vec<ApiIssue>,
}

/// A search hit. Pull requests come back from the issues search with a
/// `pull_request` object attached.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiIssue {
    pub title: String,
    pub html_url: String,
    pub state: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub pull_request: Option<ApiPullRequestLinks>,
    pub repository_url: String,
    pub body: Option<String>,
    #[serde(default)]
    pub comments: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiPullRequestLinks {
    pub merged_at: Option<DateTime<Utc>>,
}

/// Everything one fetch run collects, before any shaping
#[derive(Debug, Clone)]
pub struct RawGitHubData {
    pub user: ApiUser,
    pub repositories: Vec<ApiRepository>,
    pub events: Vec<ApiEvent>,
    pub pull_requests: Vec<ApiIssue>,
}
