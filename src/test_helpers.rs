// src/test_helpers.rs
// =============================================================================
// Shared fixtures for unit tests: canned GitHub API payloads and a helper
// that mounts them on a wiremock server.
//
// The fixture user "octocat" has four repositories:
//   alpha   10 stars  2 forks  Rust
//   beta     5 stars  7 forks  Go      (same score as alpha, listed after it)
//   forked 100 stars 50 forks  C       (a fork, excluded everywhere)
//   gamma    1 star   0 forks  ""      (empty language)
// and two merged pull requests, one of them in its own repository.
// =============================================================================

use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::github::{decode_all, ClientConfig, GitHubClient, RawGitHubData};

pub const USERNAME: &str = "octocat";

pub fn user_json() -> Value {
    json!({
        "login": "octocat",
        "name": "The Octocat",
        "bio": "Mascot",
        "blog": "https://github.blog",
        "location": "San Francisco",
        "email": null,
        "avatar_url": "https://avatars.githubusercontent.com/u/583231",
        "html_url": "https://github.com/octocat",
        "public_repos": 8,
        "public_gists": 8,
        "followers": 3938,
        "following": 9,
        "created_at": "2011-01-25T18:44:36Z",
        "updated_at": "2024-01-22T12:13:30Z"
    })
}

fn repo_json(name: &str, stars: u32, forks: u32, language: Value, fork: bool) -> Value {
    json!({
        "name": name,
        "full_name": format!("octocat/{}", name),
        "description": format!("The {} project", name),
        "html_url": format!("https://github.com/octocat/{}", name),
        "stargazers_count": stars,
        "forks_count": forks,
        "language": language,
        "topics": ["demo"],
        "fork": fork,
        "created_at": "2020-01-01T00:00:00Z",
        "updated_at": "2024-01-01T00:00:00Z"
    })
}

pub fn repositories_json() -> Value {
    json!([
        repo_json("alpha", 10, 2, json!("Rust"), false),
        repo_json("beta", 5, 7, json!("Go"), false),
        repo_json("forked", 100, 50, json!("C"), true),
        repo_json("gamma", 1, 0, json!(""), false),
    ])
}

pub fn events_json() -> Value {
    json!([
        {
            "type": "PushEvent",
            "repo": { "name": "octocat/alpha" },
            "created_at": "2024-03-03T10:00:00Z",
            "payload": { "size": 1 }
        },
        {
            "type": "CreateEvent",
            "repo": { "name": "octocat/beta" },
            "created_at": "2024-03-02T10:00:00Z",
            "payload": { "ref_type": "tag" }
        },
        {
            "type": "WatchEvent",
            "repo": { "name": "rust-lang/rust" },
            "created_at": "2024-03-01T10:00:00Z",
            "payload": { "action": "started" }
        }
    ])
}

pub fn search_json() -> Value {
    json!({
        "total_count": 2,
        "incomplete_results": false,
        "items": [
            {
                "title": "Fix typo in docs",
                "html_url": "https://github.com/rust-lang/rust/pull/1",
                "state": "closed",
                "created_at": "2024-02-01T00:00:00Z",
                "updated_at": "2024-02-03T00:00:00Z",
                "closed_at": "2024-02-02T00:00:00Z",
                "pull_request": { "merged_at": "2024-02-02T00:00:00Z" },
                "repository_url": "https://api.github.com/repos/rust-lang/rust",
                "body": "Fixes a **typo** in the book.",
                "comments": 3
            },
            {
                "title": "Own change",
                "html_url": "https://github.com/octocat/alpha/pull/7",
                "state": "closed",
                "created_at": "2024-01-01T00:00:00Z",
                "updated_at": "2024-01-02T00:00:00Z",
                "closed_at": "2024-01-02T00:00:00Z",
                "pull_request": { "merged_at": "2024-01-02T00:00:00Z" },
                "repository_url": "https://api.github.com/repos/octocat/alpha",
                "body": null,
                "comments": 0
            }
        ]
    })
}

pub fn raw_data() -> RawGitHubData {
    decode_all(user_json(), repositories_json(), events_json(), search_json())
        .expect("fixtures decode")
}

pub fn test_client(server: &MockServer) -> GitHubClient {
    let mut config = ClientConfig::new(USERNAME);
    config.api_base = server.uri();
    GitHubClient::new(config).expect("client builds")
}

/// (path, body) for each of the four endpoints of the fixture user
pub fn github_routes() -> Vec<(String, Value)> {
    vec![
        (format!("/users/{}", USERNAME), user_json()),
        (format!("/users/{}/repos", USERNAME), repositories_json()),
        (format!("/users/{}/events/public", USERNAME), events_json()),
        ("/search/issues".to_string(), search_json()),
    ]
}

/// Mounts all four endpoints for the fixture user
pub async fn mount_github(server: &MockServer) {
    for (route, body) in github_routes() {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }
}
