// src/loader.rs
// =============================================================================
// This module gets a ContributionsDocument into the renderer.
//
// Two sources are supported:
// - a static JSON file written earlier by `fetch`
// - the live GitHub API, with each raw payload held in a 5-minute cache
//
// Failure policy:
// - any failure (missing file, HTTP error, bad JSON) in a local/development
//   context is replaced by the built-in sample document
// - anywhere else the error is returned to the caller, which shows it
// =============================================================================

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::Utc;
use futures::future::try_join4;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::cache::TtlCache;
use crate::contributions::{build_document, sample_document, ContributionsDocument};
use crate::github::{decode_all, GitHubClient, GitHubError, RawGitHubData, Resource};

/// Hosts that count as local development
const LOCAL_HOSTS: [&str; 2] = ["localhost", "127.0.0.1"];

/// Where the page is being served from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployContext {
    Local,
    Deployed,
}

impl DeployContext {
    // Classifies a host name
    //
    // Parameters:
    //   host: e.g. "localhost:4000" or "octocat.github.io"; None when unknown
    //
    // Returns: Local for localhost / 127.0.0.1 (any case, any port),
    //   Deployed for everything else including no host at all
    pub fn from_host(host: Option<&str>) -> Self {
        // Blank counts as missing
        let Some(host) = host.map(str::trim).filter(|h| !h.is_empty()) else {
            return DeployContext::Deployed;
        };

        // Strip a trailing ":port", but only if it really is a number
        let hostname = match host.rsplit_once(':') {
            Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name,
            _ => host,
        };

        if LOCAL_HOSTS.contains(&hostname.to_ascii_lowercase().as_str()) {
            DeployContext::Local
        } else {
            DeployContext::Deployed
        }
    }

    pub fn is_local(self) -> bool {
        self == DeployContext::Local
    }
}

/// Where the document in a [`Loaded`] came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataOrigin {
    StaticFile,
    Live,
    Sample,
}

#[derive(Debug, Clone)]
pub struct Loaded {
    pub document: ContributionsDocument,
    pub origin: DataOrigin,
}

/// The live API plus a per-resource cache of raw payloads
#[derive(Debug)]
pub struct LiveSource {
    client: GitHubClient,
    cache: TtlCache<Value>,
}

impl LiveSource {
    pub fn new(client: GitHubClient, ttl: Duration) -> Self {
        Self {
            client,
            cache: TtlCache::new(ttl),
        }
    }

    // Fetches the four resources, serving unexpired ones from the cache.
    //
    // Steps:
    // 1. Drop expired entries
    // 2. Look every resource up; misses are requested concurrently
    // 3. Decode all four payloads
    // 4. Only then store the misses, so a failed request or a payload of the
    //    wrong shape never reaches the cache
    pub async fn fetch(&mut self) -> Result<RawGitHubData, GitHubError> {
        let now = Instant::now();
        self.cache.purge_expired(now);

        // Borrow the client and cache separately so the closure can hand out
        // futures that only hold the client
        let client = &self.client;
        let cache = &self.cache;
        let lookup = |resource: Resource| {
            let hit = cache.get(resource.name(), now).cloned();
            async move {
                match hit {
                    Some(payload) => {
                        debug!("Cache hit: {}", resource.name());
                        Ok((payload, true))
                    }
                    None => client.fetch_resource(resource).await.map(|p| (p, false)),
                }
            }
        };

        // Any failed request fails the whole load
        let (user, repositories, events, merged) = try_join4(
            lookup(Resource::User),
            lookup(Resource::Repositories),
            lookup(Resource::Events),
            lookup(Resource::MergedPullRequests),
        )
        .await?;

        // Keep copies of the freshly fetched payloads before decoding consumes them
        let misses: Vec<(Resource, Value)> = [
            (Resource::User, &user),
            (Resource::Repositories, &repositories),
            (Resource::Events, &events),
            (Resource::MergedPullRequests, &merged),
        ]
        .into_iter()
        .filter(|(_, (_, hit))| !*hit)
        .map(|(resource, (payload, _))| (resource, payload.clone()))
        .collect();

        let data = decode_all(user.0, repositories.0, events.0, merged.0)?;

        let fetched_at = Instant::now();
        for (resource, payload) in misses {
            self.cache.insert(resource.name(), payload, fetched_at);
        }

        Ok(data)
    }

    // Fetches (or reuses) the payloads and shapes them into a document
    pub async fn load_document(&mut self) -> Result<ContributionsDocument> {
        let raw = self.fetch().await.context("Failed to fetch live GitHub data")?;
        Ok(build_document(self.client.username(), raw, Utc::now()))
    }
}

#[derive(Debug)]
pub enum Source {
    StaticFile(PathBuf),
    Live(LiveSource),
}

// Loads a document, falling back to sample data in a local context
//
// Parameters:
//   source: the static file or the live API; &mut because the live source
//     updates its cache
//   context: decides what happens on failure
//
// Returns: Result<Loaded>
//   Success: the document plus where it came from (file, API or sample)
//   Error: only outside a local context
pub async fn load(source: &mut Source, context: DeployContext) -> Result<Loaded> {
    // Try the configured source first, remembering which one answered
    let result = match source {
        Source::StaticFile(path) => read_document(path)
            .await
            .map(|document| (document, DataOrigin::StaticFile)),
        Source::Live(live) => live
            .load_document()
            .await
            .map(|document| (document, DataOrigin::Live)),
    };

    match result {
        Ok((document, origin)) => {
            info!("GitHub contributions data loaded successfully");
            Ok(Loaded { document, origin })
        }
        // Local development: never leave the page empty
        Err(e) if context.is_local() => {
            warn!("Error loading GitHub data, using sample data: {:#}", e);
            Ok(Loaded {
                document: sample_document(Utc::now()),
                origin: DataOrigin::Sample,
            })
        }
        // Deployed: surface the error so the caller renders the error page
        Err(e) => {
            error!("Error loading GitHub data: {:#}", e);
            Err(e)
        }
    }
}

// Reads a document previously written by write_document()
// Both a missing file and invalid JSON are errors, with the path in the message
pub async fn read_document(path: &Path) -> Result<ContributionsDocument> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Could not read {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Invalid GitHub data in {}", path.display()))
}

// Writes the document as pretty JSON, creating parent directories
pub async fn write_document(path: &Path, document: &ContributionsDocument) -> Result<()> {
    // A bare file name has an empty parent: nothing to create
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        if !dir.exists() {
            tokio::fs::create_dir_all(dir)
                .await
                .with_context(|| format!("Failed to create directory {}", dir.display()))?;
            info!("Created directory: {}", dir.display());
        }
    }

    let json = serde_json::to_string_pretty(document)?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Match guards
//    - `Err(e) if context.is_local()` only matches when the guard is true;
//      otherwise matching falls through to the plain `Err(e)` arm
//
// 2. What the cache holds
//    - Raw JSON per resource, inserted only after all four payloads decoded
//    - A hit skips the request; the document is rebuilt from the payloads on
//      every load, so generated_at is always the render time
//
// 3. {:#} on anyhow errors
//    - Prints the whole context chain on one line, outermost first
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::DEFAULT_TTL;
    use crate::test_helpers::{github_routes, mount_github, test_client, USERNAME};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_deploy_context_from_host() {
        assert_eq!(DeployContext::from_host(Some("localhost")), DeployContext::Local);
        assert_eq!(DeployContext::from_host(Some("127.0.0.1")), DeployContext::Local);
        assert_eq!(DeployContext::from_host(Some("localhost:4000")), DeployContext::Local);
        assert_eq!(DeployContext::from_host(Some("LocalHost")), DeployContext::Local);
        assert_eq!(
            DeployContext::from_host(Some("octocat.github.io")),
            DeployContext::Deployed
        );
        assert_eq!(DeployContext::from_host(Some("")), DeployContext::Deployed);
        assert_eq!(DeployContext::from_host(None), DeployContext::Deployed);
    }

    #[tokio::test]
    async fn test_write_then_read_static_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("_data").join("github-contributions.json");

        let document = sample_document(Utc::now());
        write_document(&file, &document).await.unwrap();

        let mut source = Source::StaticFile(file);
        let loaded = load(&mut source, DeployContext::Deployed).await.unwrap();
        assert_eq!(loaded.origin, DataOrigin::StaticFile);
        assert_eq!(loaded.document, document);
    }

    #[tokio::test]
    async fn test_missing_file_falls_back_locally() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = Source::StaticFile(dir.path().join("missing.json"));

        let loaded = load(&mut source, DeployContext::Local).await.unwrap();
        assert_eq!(loaded.origin, DataOrigin::Sample);
        assert_eq!(loaded.document.stats.total_stars, 391);
    }

    #[tokio::test]
    async fn test_missing_file_propagates_when_deployed() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = Source::StaticFile(dir.path().join("missing.json"));

        let err = load(&mut source, DeployContext::Deployed).await.unwrap_err();
        assert!(err.to_string().contains("Could not read"));
    }

    #[tokio::test]
    async fn test_invalid_json_propagates_when_deployed() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("broken.json");
        std::fs::write(&file, "{ not json").unwrap();

        let mut source = Source::StaticFile(file);
        let err = load(&mut source, DeployContext::Deployed).await.unwrap_err();
        assert!(err.to_string().contains("Invalid GitHub data"));
    }

    #[tokio::test]
    async fn test_live_source_builds_document() {
        let server = MockServer::start().await;
        mount_github(&server).await;

        let mut source = Source::Live(LiveSource::new(test_client(&server), DEFAULT_TTL));
        let loaded = load(&mut source, DeployContext::Deployed).await.unwrap();

        assert_eq!(loaded.origin, DataOrigin::Live);
        assert_eq!(loaded.document.user.login, USERNAME);
        assert_eq!(loaded.document.stats.total_stars, 16);
        assert_eq!(loaded.document.stats.total_forks, 9);
    }

    #[tokio::test]
    async fn test_live_failure_falls_back_locally_and_propagates_otherwise() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let mut source = Source::Live(LiveSource::new(test_client(&server), DEFAULT_TTL));
        let loaded = load(&mut source, DeployContext::Local).await.unwrap();
        assert_eq!(loaded.origin, DataOrigin::Sample);

        let err = load(&mut source, DeployContext::Deployed).await.unwrap_err();
        assert!(format!("{:#}", err).contains("HTTP 500"));
    }

    #[tokio::test]
    async fn test_live_source_serves_repeat_loads_from_cache() {
        let server = MockServer::start().await;
        for (route, body) in github_routes() {
            // Each resource may be requested exactly once
            Mock::given(method("GET"))
                .and(path(route))
                .respond_with(ResponseTemplate::new(200).set_body_json(body))
                .expect(1)
                .mount(&server)
                .await;
        }

        let mut live = LiveSource::new(test_client(&server), DEFAULT_TTL);
        let first = live.fetch().await.unwrap();
        let second = live.fetch().await.unwrap();

        assert_eq!(first.repositories.len(), second.repositories.len());
        assert_eq!(second.user.login, USERNAME);
        // expect(1) is verified when the server is dropped
    }

    #[tokio::test]
    async fn test_live_source_does_not_cache_undecodable_payloads() {
        let server = MockServer::start().await;

        // The first repositories answer is a 200 with an error object instead of a list
        Mock::given(method("GET"))
            .and(path(format!("/users/{}/repos", USERNAME)))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "message": "oops" })),
            )
            .up_to_n_times(1)
            .with_priority(1)
            .mount(&server)
            .await;
        mount_github(&server).await;

        let mut live = LiveSource::new(test_client(&server), DEFAULT_TTL);
        let err = live.fetch().await.unwrap_err();
        assert!(matches!(err, GitHubError::Shape { resource: "repositories", .. }));

        // GitHub has recovered: the next load must go back to the API
        let data = live.fetch().await.unwrap();
        assert_eq!(data.repositories.len(), 4);
        assert_eq!(data.user.login, USERNAME);

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 8);

        // The successful load is now cached
        live.fetch().await.unwrap();
        assert_eq!(server.received_requests().await.unwrap().len(), 8);
    }

    #[tokio::test]
    async fn test_live_source_refetches_after_expiry() {
        let server = MockServer::start().await;
        for (route, body) in github_routes() {
            Mock::given(method("GET"))
                .and(path(route))
                .respond_with(ResponseTemplate::new(200).set_body_json(body))
                .expect(2)
                .mount(&server)
                .await;
        }

        // A zero TTL makes every entry expired immediately
        let mut live = LiveSource::new(test_client(&server), Duration::ZERO);
        live.fetch().await.unwrap();
        live.fetch().await.unwrap();
    }
}
