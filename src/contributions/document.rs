// src/contributions/document.rs
// =============================================================================
// The normalized contributions document.
//
// This is the JSON file `fetch` writes and `render` reads. Field names are
// part of the file format, so they stay in snake_case exactly as serialized.
// Deserialization is lenient (serde defaults everywhere a field can be
// missing) so hand-written or older documents still load.
// =============================================================================

use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionsDocument {
    pub generated_at: DateTime<Utc>,
    pub user: UserProfile,
    pub repositories: RepositorySummary,
    pub oss_contributions: OssContributions,
    #[serde(default)]
    pub recent_activity: Vec<ActivityEvent>,
    pub stats: ContributionStats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub login: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub blog: Option<String>,
    pub location: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    pub html_url: Option<String>,
    pub public_repos: u32,
    pub public_gists: u32,
    pub followers: u32,
    pub following: u32,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositorySummary {
    pub total_count: usize,
    pub top_repositories: Vec<RepositoryEntry>,
    pub all_repositories: Vec<RepositoryEntry>,
    /// Language name to number of (non-fork) repositories using it
    pub language_stats: LanguageStats,
}

// Per-language repository counts, kept in the order each language was first
// recorded. Serialized as a JSON object whose keys follow that order, so a
// document read back in renders tied languages the same way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageStats(Vec<(String, u32)>);

impl LanguageStats {
    /// Counts one more repository for `language`
    pub fn record(&mut self, language: &str) {
        match self.0.iter_mut().find(|(name, _)| name == language) {
            Some((_, count)) => *count += 1,
            None => self.0.push((language.to_string(), 1)),
        }
    }

    pub fn get(&self, language: &str) -> Option<u32> {
        self.0
            .iter()
            .find(|(name, _)| name == language)
            .map(|(_, count)| *count)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Languages in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.0.iter().map(|(name, count)| (name.as_str(), *count))
    }
}

impl FromIterator<(String, u32)> for LanguageStats {
    fn from_iter<I: IntoIterator<Item = (String, u32)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Serialize for LanguageStats {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, count) in &self.0 {
            map.serialize_entry(name, count)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for LanguageStats {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct StatsVisitor;

        impl<'de> Visitor<'de> for StatsVisitor {
            type Value = LanguageStats;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of language names to repository counts")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries: Vec<(String, u32)> = Vec::new();
                while let Some((name, count)) = access.next_entry::<String, u32>()? {
                    // A repeated key keeps its first position and the last count
                    match entries.iter_mut().find(|(seen, _)| *seen == name) {
                        Some(entry) => entry.1 = count,
                        None => entries.push((name, count)),
                    }
                }
                Ok(LanguageStats(entries))
            }
        }

        deserializer.deserialize_map(StatsVisitor)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryEntry {
    pub name: String,
    pub full_name: Option<String>,
    pub description: Option<String>,
    pub html_url: String,
    pub stargazers_count: u32,
    pub forks_count: u32,
    pub language: Option<String>,
    pub topics: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    /// stars + forks
    pub activity_score: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OssContributions {
    pub total_count: usize,
    pub contributions: Vec<Contribution>,
}

/// A merged pull request in a repository the user does not own
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub title: String,
    pub html_url: String,
    pub state: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub merged_at: Option<DateTime<Utc>>,
    pub repository: RepoRef,
    pub body: Option<String>,
    #[serde(default)]
    pub comments: u32,
}

impl Contribution {
    /// The date shown next to a contribution: merge time, else close time
    pub fn display_date(&self) -> Option<DateTime<Utc>> {
        self.merged_at.or(self.closed_at)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepoRef {
    /// "owner/repo"
    pub name: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub repo: RepoRef,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub payload: serde_json::Value,
}

impl ActivityEvent {
    /// Reads a string field from the opaque payload, if present
    pub fn payload_str(&self, key: &str) -> Option<&str> {
        self.payload.get(key).and_then(|v| v.as_str())
    }
}

/// The kind of a public timeline event.
///
/// Serialized as the GitHub type string ("PushEvent", ...). Kinds we do not
/// render specially are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventKind {
    Push,
    Create,
    Issues,
    PullRequest,
    Watch,
    Other(String),
}

impl From<String> for EventKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "PushEvent" => EventKind::Push,
            "CreateEvent" => EventKind::Create,
            "IssuesEvent" => EventKind::Issues,
            "PullRequestEvent" => EventKind::PullRequest,
            "WatchEvent" => EventKind::Watch,
            _ => EventKind::Other(value),
        }
    }
}

impl From<EventKind> for String {
    fn from(kind: EventKind) -> Self {
        kind.to_string()
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventKind::Push => "PushEvent",
            EventKind::Create => "CreateEvent",
            EventKind::Issues => "IssuesEvent",
            EventKind::PullRequest => "PullRequestEvent",
            EventKind::Watch => "WatchEvent",
            EventKind::Other(name) => name,
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContributionStats {
    pub total_stars: u64,
    pub total_forks: u64,
    pub languages_used: usize,
    pub oss_contributions_count: usize,
}
