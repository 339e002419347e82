// src/github/fetch.rs
// =============================================================================
// This module talks to the GitHub REST API.
//
// Four resources are fetched for a single user:
// - the user profile            GET /users/{user}
// - their repositories          GET /users/{user}/repos
// - recent public events        GET /users/{user}/events/public
// - merged pull requests        GET /search/issues?q=is:pr is:merged author:{user}
//
// Every request gets the same headers (User-Agent, Accept, optional bearer
// token) and the same timeout. Responses are first read as raw JSON, which
// is what the live cache stores, and then decoded into the typed models.
// =============================================================================

use std::time::Duration;

use futures::future::try_join4;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{error, info, instrument};
use url::Url;

use super::error::GitHubError;
use super::models::{ApiEvent, ApiIssue, ApiIssueSearch, ApiRepository, ApiUser, RawGitHubData};

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = "gh-showcase-data-fetcher";
const GITHUB_JSON: &str = "application/vnd.github.v3+json";

/// The four API resources that make up a contributions document.
///
/// `name()` is also the key the live cache stores the payload under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    User,
    Repositories,
    Events,
    MergedPullRequests,
}

impl Resource {
    pub fn name(self) -> &'static str {
        match self {
            Resource::User => "user",
            Resource::Repositories => "repositories",
            Resource::Events => "events",
            Resource::MergedPullRequests => "merged_pull_requests",
        }
    }

    // Builds the endpoint URL for one user
    //
    // Parameters:
    //   api_base: e.g. "https://api.github.com" (a trailing slash is fine)
    //   username: the GitHub login
    //
    // Returns: Result<Url>
    //   Error: only if api_base is not a valid URL
    //
    // parse_with_params() percent-encodes the query, so the spaces and
    // colons of the search query arrive intact
    pub fn url(self, api_base: &str, username: &str) -> Result<Url, GitHubError> {
        let base = api_base.trim_end_matches('/');

        let url = match self {
            Resource::User => {
                Url::parse(&format!("{}/users/{}", base, username))?
            }
            Resource::Repositories => Url::parse_with_params(
                &format!("{}/users/{}/repos", base, username),
                &[("sort", "updated"), ("per_page", "100"), ("type", "all")],
            )?,
            Resource::Events => Url::parse_with_params(
                &format!("{}/users/{}/events/public", base, username),
                &[("per_page", "30")],
            )?,
            Resource::MergedPullRequests => {
                let query = format!("is:pr is:merged author:{}", username);
                Url::parse_with_params(
                    &format!("{}/search/issues", base),
                    &[
                        ("q", query.as_str()),
                        ("sort", "updated"),
                        ("order", "desc"),
                        ("per_page", "100"),
                    ],
                )?
            }
        };

        Ok(url)
    }
}

/// Settings for building a [`GitHubClient`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub username: String,
    pub api_base: String,
    pub token: Option<String>,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// A GitHub API client bound to one tracked user
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Client,
    api_base: String,
    username: String,
    token: Option<String>,
}

impl GitHubClient {
    // Builds the reqwest client shared by every request
    //
    // User-Agent is mandatory for the GitHub API; requests without it get 403
    pub fn new(config: ClientConfig) -> Result<Self, GitHubError> {
        // Ask for the v3 JSON media type on every request
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_JSON));

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| GitHubError::from_reqwest(&config.api_base, e))?;

        Ok(Self {
            client,
            api_base: config.api_base,
            username: config.username,
            // An empty GITHUB_TOKEN is the same as no token
            token: config.token.filter(|t| !t.is_empty()),
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    // Fetches one resource and returns its raw JSON payload
    // (the live cache stores this Value as-is)
    pub async fn fetch_resource(&self, resource: Resource) -> Result<Value, GitHubError> {
        let url = resource.url(&self.api_base, &self.username)?;
        self.get_json(url).await
    }

    pub async fn fetch_user(&self) -> Result<ApiUser, GitHubError> {
        let payload = self.fetch_resource(Resource::User).await?;
        decode(Resource::User, payload)
    }

    pub async fn fetch_repositories(&self) -> Result<Vec<ApiRepository>, GitHubError> {
        let payload = self.fetch_resource(Resource::Repositories).await?;
        decode(Resource::Repositories, payload)
    }

    pub async fn fetch_events(&self) -> Result<Vec<ApiEvent>, GitHubError> {
        let payload = self.fetch_resource(Resource::Events).await?;
        decode(Resource::Events, payload)
    }

    // Merged pull requests authored by the user, in any repository
    pub async fn fetch_merged_pull_requests(&self) -> Result<Vec<ApiIssue>, GitHubError> {
        let payload = self.fetch_resource(Resource::MergedPullRequests).await?;
        // The search endpoint wraps the results: { "total_count": .., "items": [..] }
        let search: ApiIssueSearch = decode(Resource::MergedPullRequests, payload)?;
        Ok(search.items)
    }

    // Fetches all four resources concurrently
    //
    // Returns: Result<RawGitHubData>
    //   Success: all four decoded payloads
    //   Error: the first failure; the other requests are dropped
    pub async fn fetch_all(&self) -> Result<RawGitHubData, GitHubError> {
        let (user, repositories, events, pull_requests) = try_join4(
            self.fetch_user(),
            self.fetch_repositories(),
            self.fetch_events(),
            self.fetch_merged_pull_requests(),
        )
        .await?;

        Ok(RawGitHubData {
            user,
            repositories,
            events,
            pull_requests,
        })
    }

    #[instrument(skip_all, fields(url = %url), level = "debug")]
    async fn get_json(&self, url: Url) -> Result<Value, GitHubError> {
        info!("Fetching: {}", url);

        // Authenticated requests get a much higher rate limit
        let mut request = self.client.get(url.clone());
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| GitHubError::from_reqwest(url.as_str(), e))?;

        // Read the body even on errors: GitHub explains failures in it
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GitHubError::from_reqwest(url.as_str(), e))?;

        // 4xx/5xx: keep the body in the error so the page can show it
        if !status.is_success() {
            error!("HTTP error {} for {}", status.as_u16(), url);
            return Err(GitHubError::Status {
                url: url.to_string(),
                status,
                body,
            });
        }

        // Parse as untyped JSON here; decoding into models happens later
        let json = serde_json::from_str(&body).map_err(|source| {
            error!("JSON parse error for {}: {}", url, source);
            GitHubError::Decode {
                url: url.to_string(),
                source,
            }
        })?;

        info!("Success: {} ({})", url, status.as_u16());
        Ok(json)
    }
}

// Decodes a raw payload previously returned by fetch_resource()
// A payload of the wrong shape (e.g. an error object where a list was
// expected) becomes GitHubError::Shape naming the resource
pub fn decode<T: DeserializeOwned>(resource: Resource, payload: Value) -> Result<T, GitHubError> {
    serde_json::from_value(payload).map_err(|source| GitHubError::Shape {
        resource: resource.name(),
        source,
    })
}

// Assembles typed data from the four raw payloads
// Used both after fetch_all() and for payloads served from the live cache
pub fn decode_all(
    user: Value,
    repositories: Value,
    events: Value,
    merged_pull_requests: Value,
) -> Result<RawGitHubData, GitHubError> {
    let search: ApiIssueSearch = decode(Resource::MergedPullRequests, merged_pull_requests)?;

    Ok(RawGitHubData {
        user: decode(Resource::User, user)?,
        repositories: decode(Resource::Repositories, repositories)?,
        events: decode(Resource::Events, events)?,
        pull_requests: search.items,
    })
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Raw JSON first, models second
//    - get_json() returns serde_json::Value, not the typed model
//    - The live cache can then store one payload type for all four resources
//    - decode() turns it into ApiUser, Vec<ApiRepository>, ... when needed
//
// 2. try_join4
//    - Polls four futures on the current task, no spawning needed
//    - Short-circuits on the first Err, like `?` for a group of futures
//
// 3. #[instrument]
//    - Opens a debug-level span carrying the URL around each request, so
//      every log line inside get_json() is tagged with it
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{mount_github, test_client, USERNAME};
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_resource_urls() {
        let url = Resource::User.url("https://api.github.com/", "octocat").unwrap();
        assert_eq!(url.as_str(), "https://api.github.com/users/octocat");

        let url = Resource::Repositories.url("https://api.github.com", "octocat").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.github.com/users/octocat/repos?sort=updated&per_page=100&type=all"
        );

        let url = Resource::Events.url("https://api.github.com", "octocat").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.github.com/users/octocat/events/public?per_page=30"
        );

        let url = Resource::MergedPullRequests
            .url("https://api.github.com", "octocat")
            .unwrap();
        let q = url
            .query_pairs()
            .find(|(k, _)| k == "q")
            .map(|(_, v)| v.into_owned());
        assert_eq!(q.as_deref(), Some("is:pr is:merged author:octocat"));
    }

    #[test]
    fn test_invalid_base_url() {
        let result = Resource::User.url("not a url", "octocat");
        assert!(matches!(result, Err(GitHubError::Url(_))));
    }

    #[tokio::test]
    async fn test_fetch_all() {
        let server = MockServer::start().await;
        mount_github(&server).await;

        let client = test_client(&server);
        let data = client.fetch_all().await.unwrap();

        assert_eq!(data.user.login, USERNAME);
        assert_eq!(data.repositories.len(), 4);
        assert_eq!(data.events.len(), 3);
        assert_eq!(data.pull_requests.len(), 2);
    }

    #[tokio::test]
    async fn test_sends_github_headers_and_token() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!("/users/{}", USERNAME)))
            .and(header("accept", GITHUB_JSON))
            .and(header("user-agent", USER_AGENT))
            .and(header("authorization", "Bearer secret-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "login": USERNAME
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut config = ClientConfig::new(USERNAME);
        config.api_base = server.uri();
        config.token = Some("secret-token".to_string());
        let client = GitHubClient::new(config).unwrap();

        let user = client.fetch_user().await.unwrap();
        assert_eq!(user.login, USERNAME);
    }

    #[tokio::test]
    async fn test_search_query_params() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search/issues"))
            .and(query_param("q", format!("is:pr is:merged author:{}", USERNAME)))
            .and(query_param("order", "desc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "total_count": 0,
                "items": []
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let prs = client.fetch_merged_pull_requests().await.unwrap();
        assert!(prs.is_empty());
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!("/users/{}", USERNAME)))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
            .mount(&server)
            .await;

        let client = test_client(&server);
        match client.fetch_user().await {
            Err(GitHubError::Status { status, body, .. }) => {
                assert_eq!(status.as_u16(), 404);
                assert_eq!(body, "Not Found");
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_json() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!("/users/{}", USERNAME)))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let result = client.fetch_user().await;
        assert!(matches!(result, Err(GitHubError::Decode { .. })));
    }

    #[tokio::test]
    async fn test_wrong_shape() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!("/users/{}/repos", USERNAME)))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "message": "not a list"
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let result = client.fetch_repositories().await;
        assert!(matches!(
            result,
            Err(GitHubError::Shape { resource: "repositories", .. })
        ));
    }

    #[tokio::test]
    async fn test_timeout() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!("/users/{}", USERNAME)))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "login": USERNAME }))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let mut config = ClientConfig::new(USERNAME);
        config.api_base = server.uri();
        config.timeout = Duration::from_millis(50);
        let client = GitHubClient::new(config).unwrap();

        let result = client.fetch_user().await;
        assert!(matches!(result, Err(GitHubError::Timeout { .. })));
    }

    #[tokio::test]
    async fn test_fetch_all_fails_when_one_request_fails() {
        let server = MockServer::start().await;

        // Events fail, everything else would succeed
        Mock::given(method("GET"))
            .and(path(format!("/users/{}/events/public", USERNAME)))
            .respond_with(ResponseTemplate::new(500))
            .with_priority(1)
            .mount(&server)
            .await;
        mount_github(&server).await;

        let client = test_client(&server);
        let result = client.fetch_all().await;
        assert!(matches!(result, Err(GitHubError::Status { .. })));
    }
}
