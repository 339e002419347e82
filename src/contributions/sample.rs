// src/contributions/sample.rs
// =============================================================================
// Hardcoded fallback dataset.
//
// Used only in a local/development context when the real data cannot be
// loaded, so the page still has something to show. It follows the same
// schema as a fetched document and its stats agree with its repositories.
// =============================================================================

use chrono::{DateTime, Duration, Utc};
use serde_json::json;

use super::document::{
    ActivityEvent, ContributionStats, ContributionsDocument, EventKind, LanguageStats,
    OssContributions, RepoRef, RepositoryEntry, RepositorySummary, UserProfile,
};

const SAMPLE_LOGIN: &str = "sample-user";

/// Builds the sample document, with event times relative to `now`
pub fn sample_document(now: DateTime<Utc>) -> ContributionsDocument {
    let top_repositories: Vec<RepositoryEntry> = [
        ("awesome-project", "An amazing open source project that does cool things", 128, 23, "JavaScript"),
        ("react-components", "Reusable React components library", 89, 15, "TypeScript"),
        ("python-utilities", "Collection of useful Python utility functions", 64, 12, "Python"),
        ("css-framework", "Lightweight CSS framework for modern web apps", 45, 8, "CSS"),
        ("node-api", "RESTful API built with Node.js and Express", 37, 6, "JavaScript"),
        ("go-microservice", "Microservice architecture example in Go", 28, 4, "Go"),
    ]
    .into_iter()
    .map(|(name, description, stars, forks, language)| RepositoryEntry {
        name: name.to_string(),
        full_name: Some(format!("{}/{}", SAMPLE_LOGIN, name)),
        description: Some(description.to_string()),
        html_url: format!("https://github.com/{}/{}", SAMPLE_LOGIN, name),
        stargazers_count: stars,
        forks_count: forks,
        language: Some(language.to_string()),
        activity_score: stars + forks,
        ..RepositoryEntry::default()
    })
    .collect();

    let mut language_stats = LanguageStats::default();
    for language in top_repositories.iter().filter_map(|r| r.language.as_deref()) {
        language_stats.record(language);
    }

    let stats = ContributionStats {
        total_stars: top_repositories.iter().map(|r| u64::from(r.stargazers_count)).sum(),
        total_forks: top_repositories.iter().map(|r| u64::from(r.forks_count)).sum(),
        languages_used: language_stats.len(),
        oss_contributions_count: 0,
    };

    let event = |kind: EventKind, repo: &str, days_ago: i64, payload: serde_json::Value| {
        ActivityEvent {
            kind,
            repo: RepoRef {
                name: format!("{}/{}", SAMPLE_LOGIN, repo),
                url: format!("https://github.com/{}/{}", SAMPLE_LOGIN, repo),
            },
            created_at: now - Duration::days(days_ago),
            payload,
        }
    };

    ContributionsDocument {
        generated_at: now,
        user: UserProfile {
            login: SAMPLE_LOGIN.to_string(),
            name: Some("Sample User".to_string()),
            bio: Some("Software Developer & Open Source Contributor".to_string()),
            location: Some("Earth".to_string()),
            blog: Some("https://example.com".to_string()),
            public_repos: 25,
            followers: 42,
            following: 35,
            ..UserProfile::default()
        },
        repositories: RepositorySummary {
            total_count: top_repositories.len(),
            all_repositories: top_repositories.clone(),
            top_repositories,
            language_stats,
        },
        oss_contributions: OssContributions::default(),
        recent_activity: vec![
            event(EventKind::Push, "awesome-project", 2, serde_json::Value::Null),
            event(EventKind::Create, "new-feature", 3, json!({ "ref_type": "branch" })),
            event(EventKind::Issues, "react-components", 5, json!({ "action": "closed" })),
        ],
        stats,
    }
}
