// src/contributions/mod.rs
// =============================================================================
// The contributions document: its schema, how it is built from API data, and
// the fallback sample used during local development.
// =============================================================================

mod document;
mod process;
mod sample;

pub use document::{
    ActivityEvent, ContributionStats, ContributionsDocument, EventKind, LanguageStats,
    OssContributions, RepositorySummary, UserProfile,
};
pub use process::build_document;
pub use sample::sample_document;
