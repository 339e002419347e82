// src/contributions/process.rs
// =============================================================================
// This module shapes the raw API payloads into a ContributionsDocument.
//
// Rules:
// - Forked repositories are dropped everywhere (listing, totals, languages)
// - Repositories are ordered by stars + forks, highest first. The sort is
//   stable, so repositories with equal scores keep the API's order
// - Only the first 6 repositories are "top" repositories
// - OSS contributions are merged PRs in repositories owned by someone else,
//   at most 50, in the order the search returned them
// - Recent activity is the first 10 public events
// =============================================================================

use chrono::{DateTime, Utc};
use url::Url;

use super::document::{
    ActivityEvent, Contribution, ContributionStats, ContributionsDocument, LanguageStats,
    OssContributions, RepoRef, RepositoryEntry, RepositorySummary, UserProfile,
};
use crate::github::{ApiEvent, ApiIssue, ApiRepository, ApiUser, RawGitHubData};

pub const TOP_REPOSITORY_COUNT: usize = 6;
pub const MAX_CONTRIBUTIONS: usize = 50;
pub const MAX_ACTIVITY_EVENTS: usize = 10;

const GITHUB_WEB: &str = "https://github.com";

/// Builds the document for `username` from one fetch run
pub fn build_document(
    username: &str,
    raw: RawGitHubData,
    generated_at: DateTime<Utc>,
) -> ContributionsDocument {
    let repositories = original_repositories(raw.repositories);
    let language_stats = language_stats(&repositories);
    let contributions = oss_contributions(username, raw.pull_requests);
    let recent_activity = recent_activity(raw.events);

    let stats = ContributionStats {
        total_stars: repositories.iter().map(|r| u64::from(r.stargazers_count)).sum(),
        total_forks: repositories.iter().map(|r| u64::from(r.forks_count)).sum(),
        languages_used: language_stats.len(),
        oss_contributions_count: contributions.len(),
    };

    ContributionsDocument {
        generated_at,
        user: user_profile(raw.user),
        repositories: RepositorySummary {
            total_count: repositories.len(),
            top_repositories: repositories.iter().take(TOP_REPOSITORY_COUNT).cloned().collect(),
            all_repositories: repositories,
            language_stats,
        },
        oss_contributions: OssContributions {
            total_count: contributions.len(),
            contributions,
        },
        recent_activity,
        stats,
    }
}

fn user_profile(user: ApiUser) -> UserProfile {
    UserProfile {
        login: user.login,
        name: user.name,
        bio: user.bio,
        blog: user.blog,
        location: user.location,
        email: user.email,
        avatar_url: user.avatar_url,
        html_url: user.html_url,
        public_repos: user.public_repos,
        public_gists: user.public_gists,
        followers: user.followers,
        following: user.following,
        created_at: user.created_at,
        updated_at: user.updated_at,
    }
}

/// Non-fork repositories, highest activity score first
fn original_repositories(repositories: Vec<ApiRepository>) -> Vec<RepositoryEntry> {
    let mut entries: Vec<RepositoryEntry> = repositories
        .into_iter()
        .filter(|repo| !repo.fork)
        .map(|repo| RepositoryEntry {
            activity_score: repo.stargazers_count.saturating_add(repo.forks_count),
            name: repo.name,
            full_name: repo.full_name,
            description: repo.description,
            html_url: repo.html_url,
            stargazers_count: repo.stargazers_count,
            forks_count: repo.forks_count,
            language: repo.language,
            topics: repo.topics,
            created_at: repo.created_at,
            updated_at: repo.updated_at,
        })
        .collect();

    // sort_by is stable: equal scores keep their input order
    entries.sort_by(|a, b| b.activity_score.cmp(&a.activity_score));
    entries
}

// Counts languages over the score-sorted repositories, so each language sits
// where it first appears in that ordering
fn language_stats(repositories: &[RepositoryEntry]) -> LanguageStats {
    let mut stats = LanguageStats::default();

    for language in repositories.iter().filter_map(|r| r.language.as_deref()) {
        if language.is_empty() {
            continue;
        }
        stats.record(language);
    }

    stats
}

fn oss_contributions(username: &str, pull_requests: Vec<ApiIssue>) -> Vec<Contribution> {
    pull_requests
        .into_iter()
        .filter_map(|pr| {
            let repository = repo_ref_from_api_url(&pr.repository_url);
            if is_owned_by(&repository.name, username) {
                return None;
            }

            Some(Contribution {
                title: pr.title,
                html_url: pr.html_url,
                state: pr.state,
                created_at: pr.created_at,
                updated_at: pr.updated_at,
                closed_at: pr.closed_at,
                merged_at: pr.pull_request.and_then(|links| links.merged_at),
                repository,
                body: pr.body,
                comments: pr.comments,
            })
        })
        .take(MAX_CONTRIBUTIONS)
        .collect()
}

fn recent_activity(events: Vec<ApiEvent>) -> Vec<ActivityEvent> {
    events
        .into_iter()
        .take(MAX_ACTIVITY_EVENTS)
        .map(|event| ActivityEvent {
            kind: event.event_type.into(),
            repo: RepoRef {
                url: format!("{}/{}", GITHUB_WEB, event.repo.name),
                name: event.repo.name,
            },
            created_at: event.created_at,
            payload: event.payload,
        })
        .collect()
}

/// GitHub logins are case-insensitive
fn is_owned_by(full_name: &str, username: &str) -> bool {
    full_name
        .split('/')
        .next()
        .is_some_and(|owner| owner.eq_ignore_ascii_case(username))
}

// Turns "https://api.github.com/repos/owner/repo" into
// name "owner/repo" and url "https://github.com/owner/repo"
fn repo_ref_from_api_url(repository_url: &str) -> RepoRef {
    let segments: Vec<String> = match Url::parse(repository_url) {
        Ok(url) => url
            .path_segments()
            .map(|s| s.filter(|s| !s.is_empty()).map(str::to_string).collect())
            .unwrap_or_default(),
        Err(_) => repository_url
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
    };

    let name = match segments.as_slice() {
        [.., owner, repo] => format!("{}/{}", owner, repo),
        [only] => only.clone(),
        [] => String::new(),
    };

    RepoRef {
        url: format!("{}/{}", GITHUB_WEB, name),
        name,
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Stable sorting
//    - slice::sort_by is a stable merge sort; sort_unstable_by is not
//    - Equal activity scores therefore keep the order GitHub returned
//
// 2. Why u64 for totals?
//    - Per-repository counts fit in u32, but a sum over a hundred popular
//      repositories might not
//
// 3. take() after filter_map()
//    - Iterators are lazy, so the 50-item cap stops the work early instead
//      of shaping every pull request and then truncating
// -----------------------------------------------------------------------------
