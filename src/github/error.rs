// src/github/error.rs
// =============================================================================
// Error type for everything that can go wrong while talking to the GitHub API.
//
// The rest of the application works with anyhow::Result, but the client
// returns this typed error so callers (and tests) can tell a bad status code
// apart from a timeout or a malformed payload.
// =============================================================================

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GitHubError {
    /// The request could not be sent or the connection failed
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The request exceeded the client timeout
    #[error("request timeout for {url}")]
    Timeout { url: String },

    /// GitHub answered with a non-2xx status
    #[error("HTTP {status} for {url}: {body}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },

    /// The response body was not valid JSON
    #[error("JSON parse error for {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// The JSON was valid but did not match the expected payload
    #[error("unexpected {resource} payload: {source}")]
    Shape {
        resource: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// An endpoint URL could not be built from the configured base
    #[error("invalid API URL: {0}")]
    Url(#[from] url::ParseError),
}

impl GitHubError {
    /// Classifies a reqwest error the same way for every endpoint
    pub(crate) fn from_reqwest(url: &str, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            GitHubError::Timeout {
                url: url.to_string(),
            }
        } else {
            GitHubError::Request {
                url: url.to_string(),
                source: error,
            }
        }
    }
}
