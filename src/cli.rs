// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Two subcommands:
// - fetch:  GitHub API -> normalized JSON file
// - render: JSON file (or the live API) -> static HTML page
//
// Flags that hold secrets or differ per machine can also come from the
// environment (GITHUB_TOKEN, GH_SHOWCASE_HOST, GH_SHOWCASE_API_BASE).
// =============================================================================

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::github::{ClientConfig, DEFAULT_API_BASE};

pub const DEFAULT_DATA_FILE: &str = "_data/github-contributions.json";
pub const DEFAULT_PAGE_FILE: &str = "github-contributions.html";

#[derive(Parser, Debug)]
#[command(
    name = "gh-showcase",
    version,
    about = "Snapshot a GitHub profile to JSON and render it as static HTML widgets",
    long_about = "gh-showcase fetches a user's GitHub profile, repositories, merged pull requests \
                  and recent activity into one JSON document, and renders that document into \
                  an HTML page for a static site."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch GitHub data for a user and save it as JSON
    ///
    /// Example: gh-showcase fetch octocat --output _data/github-contributions.json
    Fetch(FetchArgs),

    /// Render the contributions page from saved JSON or the live API
    ///
    /// Example: gh-showcase render --data _data/github-contributions.json --host localhost
    Render(RenderArgs),
}

#[derive(Args, Debug)]
pub struct FetchArgs {
    /// GitHub username to fetch (e.g., octocat)
    pub username: String,

    /// Where to write the JSON document
    #[arg(long, short, default_value = DEFAULT_DATA_FILE)]
    pub output: PathBuf,

    #[command(flatten)]
    pub api: ApiArgs,
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// JSON document written by `fetch`
    #[arg(long, default_value = DEFAULT_DATA_FILE)]
    pub data: PathBuf,

    /// Where to write the HTML page
    #[arg(long, short, default_value = DEFAULT_PAGE_FILE)]
    pub output: PathBuf,

    /// Call the GitHub API for this user instead of reading --data
    #[arg(long, value_name = "USERNAME")]
    pub live: Option<String>,

    /// Host the page is served from. "localhost" and "127.0.0.1" enable the
    /// sample-data fallback
    #[arg(long, env = "GH_SHOWCASE_HOST")]
    pub host: Option<String>,

    /// Re-render every SECS seconds until interrupted
    #[arg(long, value_name = "SECS")]
    pub watch: Option<u64>,

    /// How long live API responses are reused, in seconds
    #[arg(long, value_name = "SECS", default_value_t = 300)]
    pub cache_ttl: u64,

    #[command(flatten)]
    pub api: ApiArgs,
}

/// Settings shared by everything that talks to the GitHub API
#[derive(Args, Debug, Clone)]
pub struct ApiArgs {
    /// GitHub API base URL
    #[arg(long, env = "GH_SHOWCASE_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = 10)]
    pub timeout: u64,

    /// GitHub token, raises the API rate limit
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}

impl ApiArgs {
    pub fn client_config(&self, username: &str) -> ClientConfig {
        ClientConfig {
            api_base: self.api_base.clone(),
            token: self.token.clone(),
            timeout: Duration::from_secs(self.timeout),
            ..ClientConfig::new(username)
        }
    }
}
