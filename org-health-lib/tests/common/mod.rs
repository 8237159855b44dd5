//! Fixtures shared by the integration tests.

use chrono::{DateTime, Duration, Utc};
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A GraphQL repository node.
pub fn repo_node(name: &str, stars: u64, forks: u64, pushed_days_ago: i64) -> Value {
    let now = Utc::now();
    json!({
        "name": name,
        "description": format!("The {name} project"),
        "url": format!("https://github.com/acme/{name}"),
        "isArchived": false,
        "isFork": false,
        "isEmpty": false,
        "isPrivate": false,
        "stargazerCount": stars,
        "forkCount": forks,
        "createdAt": to_rfc3339(now - Duration::days(900)),
        "updatedAt": to_rfc3339(now - Duration::days(pushed_days_ago)),
        "pushedAt": to_rfc3339(now - Duration::days(pushed_days_ago)),
        "issues": { "totalCount": 30 },
        "pullRequests": { "totalCount": 25 },
        "releases": { "nodes": [{ "createdAt": to_rfc3339(now - Duration::days(60)) }] },
        "primaryLanguage": { "name": "Rust" },
        "repositoryTopics": { "nodes": [{ "topic": { "name": "tooling" } }] }
    })
}

/// A successful GraphQL response carrying one page of repositories.
pub fn page(nodes: Vec<Value>, end_cursor: Option<&str>, total: u64) -> Value {
    json!({
        "data": {
            "organization": {
                "repositories": {
                    "nodes": nodes,
                    "pageInfo": { "hasNextPage": end_cursor.is_some(), "endCursor": end_cursor },
                    "totalCount": total
                }
            }
        }
    })
}

/// Rate limit headers with `remaining` requests left and a reset at `reset_at`.
pub fn with_rate_limit(template: ResponseTemplate, remaining: u64, reset_at: DateTime<Utc>) -> ResponseTemplate {
    template
        .insert_header("x-ratelimit-limit", "5000")
        .insert_header("x-ratelimit-remaining", remaining.to_string().as_str())
        .insert_header("x-ratelimit-used", (5000 - remaining).to_string().as_str())
        .insert_header("x-ratelimit-reset", reset_at.timestamp().to_string().as_str())
}

/// Answer requests for the page after `cursor` (the first page when `None`).
pub async fn mount_page(server: &MockServer, org: &str, cursor: Option<&str>, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "variables": { "org": org, "cursor": cursor } })))
        .respond_with(response)
        .mount(server)
        .await;
}

/// A single-page organization with the given nodes.
pub async fn mount_single_page(server: &MockServer, org: &str, nodes: Vec<Value>) {
    let total = nodes.len() as u64;
    mount_page(server, org, None, ResponseTemplate::new(200).set_body_json(page(nodes, None, total))).await;
}

pub fn graphql_url(server: &MockServer) -> String {
    format!("{}/graphql", server.uri())
}

fn to_rfc3339(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}
