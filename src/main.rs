// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging (tracing, filtered by RUST_LOG, written to stderr)
// 2. Parse command-line arguments using clap
// 3. Dispatch to the fetch or render handler
// 4. Exit with proper code (0 = success, 1 = any failure)
// =============================================================================

mod cache;         // src/cache.rs - time-based cache for live API payloads
mod cli;           // src/cli.rs - command-line parsing
mod contributions; // src/contributions/ - document schema and data shaping
mod github;        // src/github/ - GitHub REST API client
mod loader;        // src/loader.rs - loading documents with sample fallback
mod render;        // src/render/ - HTML widgets and page

#[cfg(test)]
mod test_helpers;

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, FetchArgs, RenderArgs};
use github::GitHubClient;
use loader::{DataOrigin, DeployContext, LiveSource, Source};

// #[tokio::main] sets up the async runtime before main() runs
#[tokio::main]
async fn main() {
    init_tracing();

    // run() returns the exit code; any error it bubbles up also means exit 1
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("\n❌ Error: {:#}", e);
            1
        }
    };

    std::process::exit(exit_code);
}

// Installs the log subscriber
// RUST_LOG overrides the default "info" level (e.g. RUST_LOG=debug shows every URL)
// Logs go to stderr so stdout keeps only the progress output
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

// Parses the arguments and dispatches to the right handler
// Returns: Result<i32> where i32 is the exit code
async fn run() -> Result<i32> {
    // Cli::parse() exits on its own for --help, --version and bad arguments
    let cli = Cli::parse();

    // Each subcommand has its own handler
    match cli.command {
        Commands::Fetch(args) => handle_fetch(&args).await,
        Commands::Render(args) => handle_render(&args).await,
    }
}

// Handles the 'fetch' subcommand: API -> JSON file
// Parameters:
//   args: the username plus output path and API settings
// Returns: Ok(0) once the document is written, Err if any request fails
async fn handle_fetch(args: &FetchArgs) -> Result<i32> {
    println!("🚀 Starting GitHub data collection for @{}...\n", args.username);

    // Build the client (base URL, token, timeout) from the CLI flags
    let client = GitHubClient::new(args.api.client_config(&args.username))?;

    // All four resources are requested at once; one failure fails the run
    println!("📡 Fetching data from GitHub API...");
    let raw = client
        .fetch_all()
        .await
        .context("Error fetching GitHub data")?;

    println!("\n📊 Data fetched successfully:");
    println!(
        "  - User: {} (@{})",
        raw.user.name.as_deref().unwrap_or(&raw.user.login),
        raw.user.login
    );
    println!("  - Repositories: {}", raw.repositories.len());
    println!("  - Events: {}", raw.events.len());
    println!("  - Merged PRs: {}", raw.pull_requests.len());

    // Shape the raw payloads into the document we store
    println!("\n🔄 Processing data...");
    let document = contributions::build_document(&args.username, raw, Utc::now());

    println!("💾 Saving data to: {}", args.output.display());
    loader::write_document(&args.output, &document).await?;

    println!("\n✅ GitHub data collection completed successfully!");
    println!("\n📈 Summary:");
    println!("  - Original repositories: {}", document.repositories.total_count);
    println!("  - OSS contributions: {}", document.oss_contributions.total_count);
    println!("  - Total stars earned: {}", document.stats.total_stars);
    println!("  - Languages used: {}", document.stats.languages_used);
    println!("  - Data saved to: {}", args.output.display());

    Ok(0)
}

// Handles the 'render' subcommand: JSON file or live API -> HTML page
// Parameters:
//   args: where the data comes from, where the page goes, and --watch
// Returns: Ok(0) when the contributions page was written, Ok(1) when the
//   error page was written instead
async fn handle_render(args: &RenderArgs) -> Result<i32> {
    // The host decides whether a failed load falls back to sample data
    let context = DeployContext::from_host(args.host.as_deref());

    // --live USERNAME reads the API (through the cache), otherwise the JSON file
    let mut source = match &args.live {
        Some(username) => {
            let client = GitHubClient::new(args.api.client_config(username))?;
            Source::Live(LiveSource::new(client, Duration::from_secs(args.cache_ttl)))
        }
        None => Source::StaticFile(args.data.clone()),
    };

    // Without --watch, render one page and stop
    let Some(every) = args.watch else {
        return render_once(&mut source, context, &args.output).await;
    };

    println!("👀 Re-rendering every {}s (Ctrl-C to stop)", every);
    // The first tick fires immediately, so the page is rendered right away
    let mut interval = tokio::time::interval(Duration::from_secs(every.max(1)));

    // Re-render on every tick until Ctrl-C
    // A failed render is not fatal here: the next tick tries again
    loop {
        tokio::select! {
            _ = interval.tick() => {
                if render_once(&mut source, context, &args.output).await? != 0 {
                    warn!("Render failed, retrying on the next tick");
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!("\n👋 Stopped watching");
                return Ok(0);
            }
        }
    }
}

// Loads the data and writes either the contributions page or the error page.
// Returns 1 when the error page was written.
async fn render_once(source: &mut Source, context: DeployContext, output: &Path) -> Result<i32> {
    match loader::load(source, context).await {
        // Data loaded (possibly the sample): write the full page
        Ok(loaded) => {
            render::write_page(output, render::render_page(&loaded, context)).await?;

            let origin = match loaded.origin {
                DataOrigin::StaticFile => "static data",
                DataOrigin::Live => "live data",
                DataOrigin::Sample => "sample data",
            };
            println!("✅ Rendered {} from {}", output.display(), origin);
            Ok(0)
        }
        // No data: show the error on the page itself, then report failure
        Err(e) => {
            // {:#} includes the whole context chain, e.g. "Could not read ...: No such file"
            let message = format!("{:#}", e);
            render::write_page(output, render::render_error_page(&message)).await?;

            eprintln!("❌ Failed to load GitHub data: {}", message);
            println!("📄 Wrote error page to {}", output.display());
            Ok(1)
        }
    }
}
