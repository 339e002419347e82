// src/render/widgets.rs
// =============================================================================
// The HTML widgets that make up the contributions section.
//
// Each widget takes one part of the document and returns a maud Markup
// fragment. maud escapes every interpolated value, so titles, bodies and
// descriptions coming from GitHub cannot inject markup.
//
// Widgets with nothing to show (no languages, no contributions) render as an
// empty fragment instead of an empty box.
// =============================================================================

use maud::{html, Markup};

use super::text::{format_date, markdown_to_plain, preview};
use crate::contributions::{
    ActivityEvent, ContributionStats, EventKind, LanguageStats, OssContributions, RepositorySummary,
    UserProfile,
};

pub const MAX_LANGUAGES: usize = 8;
pub const MAX_CONTRIBUTIONS_SHOWN: usize = 5;
pub const MAX_EVENTS_SHOWN: usize = 5;
pub const BODY_PREVIEW_CHARS: usize = 100;

pub fn user_stats(user: &UserProfile) -> Markup {
    html! {
        div.github-stats {
            (stat_item(user.public_repos, "Repositories"))
            (stat_item(user.followers, "Followers"))
            (stat_item(user.following, "Following"))
        }
    }
}

fn stat_item(value: u32, label: &str) -> Markup {
    html! {
        div.stat-item {
            span.stat-number { (value) }
            span.stat-label { (label) }
        }
    }
}

pub fn top_repositories(repositories: &RepositorySummary) -> Markup {
    html! {
        div.top-repositories {
            h3 { "Top Repositories" }
            div.repos-grid {
                @for repo in &repositories.top_repositories {
                    div.repo-card {
                        h4 {
                            a href=(repo.html_url) target="_blank" rel="noopener" { (repo.name) }
                        }
                        p.repo-description {
                            (repo.description.as_deref().unwrap_or("No description"))
                        }
                        div.repo-stats {
                            span.repo-stat {
                                span.star { "⭐" } " " (repo.stargazers_count)
                            }
                            span.repo-stat {
                                span.fork { "🍴" } " " (repo.forks_count)
                            }
                            @if let Some(language) = repo.language.as_deref().filter(|l| !l.is_empty()) {
                                span.repo-language { (language) }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Languages by repository count, highest first, with each one's share
/// (in percent) of the languages shown.
///
/// Equal counts keep the order the languages were first recorded in.
pub fn language_shares(stats: &LanguageStats) -> Vec<(&str, u32, f64)> {
    let mut languages: Vec<(&str, u32)> = stats.iter().collect();
    // Stable, so ties are not reshuffled
    languages.sort_by(|a, b| b.1.cmp(&a.1));
    languages.truncate(MAX_LANGUAGES);

    let total: u32 = languages.iter().map(|(_, count)| count).sum();
    if total == 0 {
        return Vec::new();
    }

    languages
        .into_iter()
        .map(|(language, count)| (language, count, f64::from(count) / f64::from(total) * 100.0))
        .collect()
}

pub fn language_stats(repositories: &RepositorySummary) -> Markup {
    let shares = language_shares(&repositories.language_stats);
    if shares.is_empty() {
        return html! {};
    }

    html! {
        div.language-stats {
            h3 { "Programming Languages" }
            div.language-bars {
                @for (language, count, percentage) in &shares {
                    div.language-bar {
                        div.language-info {
                            span.language-name { (language) }
                            span.language-count { (count) " repos" }
                        }
                        div.language-progress {
                            div.language-fill style={ "width: " (format!("{:.1}", percentage)) "%" } {}
                        }
                    }
                }
            }
        }
    }
}

pub fn oss_contributions(oss: &OssContributions) -> Markup {
    if oss.contributions.is_empty() {
        return html! {};
    }

    html! {
        div.oss-contributions {
            h3 { "Recent OSS Contributions (" (oss.total_count) " total)" }
            div.contributions-list {
                @for contribution in oss.contributions.iter().take(MAX_CONTRIBUTIONS_SHOWN) {
                    div.contribution-item {
                        div.contribution-title {
                            a href=(contribution.html_url) target="_blank" rel="noopener" {
                                (contribution.title)
                            }
                        }
                        div.contribution-meta {
                            span.contribution-repo { (contribution.repository.name) }
                            @if let Some(date) = contribution.display_date() {
                                span.contribution-date { (format_date(date)) }
                            }
                        }
                        @if let Some(body) = body_preview(contribution.body.as_deref()) {
                            div.contribution-body { (body) }
                        }
                    }
                }
            }
        }
    }
}

fn body_preview(body: Option<&str>) -> Option<String> {
    let plain = markdown_to_plain(body?);
    if plain.is_empty() {
        None
    } else {
        Some(preview(&plain, BODY_PREVIEW_CHARS))
    }
}

/// One-line description of an event, e.g. "Pushed to octocat/hello"
pub fn describe_event(event: &ActivityEvent) -> String {
    let repo = &event.repo.name;

    match &event.kind {
        EventKind::Push => format!("Pushed to {}", repo),
        EventKind::Create => format!(
            "Created {} in {}",
            event.payload_str("ref_type").unwrap_or("branch"),
            repo
        ),
        EventKind::Issues => format!(
            "{} issue in {}",
            event.payload_str("action").unwrap_or("updated"),
            repo
        ),
        EventKind::PullRequest => format!(
            "{} pull request in {}",
            event.payload_str("action").unwrap_or("updated"),
            repo
        ),
        EventKind::Watch => format!("Starred {}", repo),
        EventKind::Other(kind) => format!("{} in {}", kind, repo),
    }
}

pub fn recent_activity(events: &[ActivityEvent]) -> Markup {
    html! {
        div.recent-activity {
            h3 { "Recent Activity" }
            div.activity-list {
                @for event in events.iter().take(MAX_EVENTS_SHOWN) {
                    div.activity-item {
                        span.activity-action { (describe_event(event)) }
                        span.activity-date { (format_date(event.created_at)) }
                    }
                }
            }
        }
    }
}

pub fn summary(stats: &ContributionStats) -> Markup {
    html! {
        div.github-summary {
            p {
                strong { "Summary:" }
                " " (stats.total_stars) " stars earned • "
                (stats.oss_contributions_count) " OSS contributions • "
                (stats.languages_used) " languages used"
            }
        }
    }
}
