//! GraphQL query for an organization's repositories and its response shape.

use super::{FetchError, Repository};
use chrono::{DateTime, Utc};
use serde::Deserialize;

pub const ORG_REPOSITORIES_QUERY: &str = "
query($org: String!, $cursor: String, $pageSize: Int!) {
  organization(login: $org) {
    repositories(first: $pageSize, after: $cursor, orderBy: {field: STARGAZERS, direction: DESC}) {
      nodes {
        name
        description
        url
        isArchived
        isFork
        isEmpty
        isPrivate
        stargazerCount
        forkCount
        createdAt
        updatedAt
        pushedAt
        issues(states: CLOSED) { totalCount }
        pullRequests(states: CLOSED) { totalCount }
        releases(first: 1, orderBy: {field: CREATED_AT, direction: DESC}) {
          nodes { createdAt }
        }
        primaryLanguage { name }
        repositoryTopics(first: 10) {
          nodes { topic { name } }
        }
      }
      pageInfo {
        hasNextPage
        endCursor
      }
      totalCount
    }
  }
}
";

/// One page of the repository connection, converted to domain records.
#[derive(Debug, Clone)]
pub struct PageData {
    pub repositories: Vec<Repository>,
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
    pub total_count: u64,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    data: Option<Data>,
    errors: Option<Vec<QueryError>>,
}

#[derive(Debug, Deserialize)]
struct QueryError {
    #[serde(default)]
    message: String,
    #[serde(rename = "type")]
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Data {
    organization: Option<Organization>,
}

#[derive(Debug, Deserialize)]
struct Organization {
    repositories: RepositoryConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepositoryConnection {
    #[serde(default)]
    nodes: Vec<Option<RepositoryNode>>,
    page_info: PageInfo,
    #[serde(default)]
    total_count: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    has_next_page: bool,
    end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepositoryNode {
    name: String,
    #[serde(default)]
    url: String,
    description: Option<String>,
    #[serde(default)]
    is_archived: bool,
    #[serde(default)]
    is_fork: bool,
    #[serde(default)]
    is_empty: bool,
    #[serde(default)]
    is_private: bool,
    #[serde(default)]
    stargazer_count: u64,
    #[serde(default)]
    fork_count: u64,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    pushed_at: Option<DateTime<Utc>>,
    issues: Option<Count>,
    pull_requests: Option<Count>,
    releases: Option<Connection<Release>>,
    primary_language: Option<Named>,
    repository_topics: Option<Connection<TopicNode>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Count {
    #[serde(default)]
    total_count: u64,
}

#[derive(Debug, Deserialize)]
struct Connection<T> {
    #[serde(default = "Vec::new")]
    nodes: Vec<Option<T>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Release {
    created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct Named {
    name: String,
}

#[derive(Debug, Deserialize)]
struct TopicNode {
    topic: Option<Named>,
}

impl From<RepositoryNode> for Repository {
    fn from(node: RepositoryNode) -> Self {
        Self {
            name: node.name,
            url: node.url,
            description: node.description,
            is_archived: node.is_archived,
            is_fork: node.is_fork,
            is_empty: node.is_empty,
            is_private: node.is_private,
            stargazer_count: node.stargazer_count,
            fork_count: node.fork_count,
            created_at: node.created_at,
            updated_at: node.updated_at,
            pushed_at: node.pushed_at,
            primary_language: node.primary_language.map(|l| l.name),
            topics: node
                .repository_topics
                .map(|c| c.nodes.into_iter().flatten().filter_map(|n| n.topic).map(|t| t.name).collect())
                .unwrap_or_default(),
            closed_issue_count: node.issues.map_or(0, |c| c.total_count),
            closed_pull_request_count: node.pull_requests.map_or(0, |c| c.total_count),
            most_recent_release_date: node
                .releases
                .and_then(|c| c.nodes.into_iter().flatten().next())
                .and_then(|r| r.created_at),
        }
    }
}

/// Interpret the body of a successful (2xx) response.
pub fn parse_page(org: &str, body: &str) -> Result<PageData, FetchError> {
    let envelope: Envelope =
        serde_json::from_str(body).map_err(|e| FetchError::protocol(format!("unable to decode response body: {e}")))?;

    if let Some(errors) = envelope.errors.filter(|errors| !errors.is_empty()) {
        if errors.iter().any(|e| e.kind.as_deref() == Some("NOT_FOUND")) {
            return Err(FetchError::NotFound { org: org.to_string() });
        }

        if errors.iter().any(|e| e.kind.as_deref() == Some("RATE_LIMITED")) {
            return Err(FetchError::RateLimitExceeded { reset_at: None });
        }

        let messages: Vec<_> = errors.into_iter().map(|e| e.message).collect();
        return Err(FetchError::protocol(format!("query failed: {}", messages.join("; "))));
    }

    let connection = envelope
        .data
        .and_then(|d| d.organization)
        .ok_or_else(|| FetchError::NotFound { org: org.to_string() })?
        .repositories;

    Ok(PageData {
        repositories: connection.nodes.into_iter().flatten().map(Repository::from).collect(),
        has_next_page: connection.page_info.has_next_page,
        end_cursor: connection.page_info.end_cursor,
        total_count: connection.total_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page_body(nodes: &serde_json::Value, has_next: bool, cursor: Option<&str>) -> String {
        json!({
            "data": {
                "organization": {
                    "repositories": {
                        "nodes": nodes,
                        "pageInfo": { "hasNextPage": has_next, "endCursor": cursor },
                        "totalCount": 2
                    }
                }
            }
        })
        .to_string()
    }

    #[test]
    fn parses_full_node() {
        let nodes = json!([{
            "name": "widget",
            "description": "A widget",
            "url": "https://github.com/acme/widget",
            "isArchived": false,
            "isFork": false,
            "isEmpty": false,
            "isPrivate": false,
            "stargazerCount": 120,
            "forkCount": 14,
            "createdAt": "2020-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z",
            "pushedAt": "2024-01-02T00:00:00Z",
            "issues": { "totalCount": 40 },
            "pullRequests": { "totalCount": 25 },
            "releases": { "nodes": [{ "createdAt": "2023-12-01T00:00:00Z" }] },
            "primaryLanguage": { "name": "Rust" },
            "repositoryTopics": { "nodes": [{ "topic": { "name": "cli" } }, { "topic": { "name": "tools" } }] }
        }]);

        let page = parse_page("acme", &page_body(&nodes, true, Some("abc"))).unwrap();
        assert!(page.has_next_page);
        assert_eq!(page.end_cursor.as_deref(), Some("abc"));
        assert_eq!(page.total_count, 2);

        let repo = &page.repositories[0];
        assert_eq!(repo.name, "widget");
        assert_eq!(repo.stargazer_count, 120);
        assert_eq!(repo.fork_count, 14);
        assert_eq!(repo.closed_issue_count, 40);
        assert_eq!(repo.closed_pull_request_count, 25);
        assert_eq!(repo.primary_language.as_deref(), Some("Rust"));
        assert_eq!(repo.topics, vec!["cli".to_string(), "tools".to_string()]);
        assert_eq!(repo.most_recent_release_date.unwrap().to_rfc3339(), "2023-12-01T00:00:00+00:00");
    }

    #[test]
    fn sparse_node_uses_defaults() {
        let nodes = json!([
            { "name": "bare", "pushedAt": null, "releases": { "nodes": [] }, "primaryLanguage": null },
            null
        ]);

        let page = parse_page("acme", &page_body(&nodes, false, None)).unwrap();
        assert_eq!(page.repositories.len(), 1);

        let repo = &page.repositories[0];
        assert_eq!(repo.name, "bare");
        assert_eq!(repo.stargazer_count, 0);
        assert_eq!(repo.total_closed(), 0);
        assert!(repo.pushed_at.is_none());
        assert!(repo.most_recent_release_date.is_none());
        assert!(repo.primary_language.is_none());
        assert!(repo.topics.is_empty());
    }

    #[test]
    fn null_organization_is_not_found() {
        let body = json!({ "data": { "organization": null } }).to_string();
        let err = parse_page("ghost", &body).unwrap_err();
        assert!(matches!(err, FetchError::NotFound { ref org } if org == "ghost"));
    }

    #[test]
    fn not_found_error_type_is_not_found() {
        let body = json!({
            "data": { "organization": null },
            "errors": [{ "type": "NOT_FOUND", "message": "Could not resolve to an Organization with the login of 'ghost'." }]
        })
        .to_string();

        assert!(matches!(parse_page("ghost", &body).unwrap_err(), FetchError::NotFound { .. }));
    }

    #[test]
    fn rate_limited_error_type_is_rate_limit() {
        let body = json!({ "errors": [{ "type": "RATE_LIMITED", "message": "API rate limit exceeded" }] }).to_string();
        assert!(matches!(parse_page("acme", &body).unwrap_err(), FetchError::RateLimitExceeded { reset_at: None }));
    }

    #[test]
    fn other_errors_are_protocol_errors() {
        let body = json!({
            "errors": [{ "message": "Field 'bogus' doesn't exist" }, { "message": "second" }]
        })
        .to_string();

        match parse_page("acme", &body).unwrap_err() {
            FetchError::Protocol { message } => {
                assert!(message.contains("Field 'bogus' doesn't exist"));
                assert!(message.contains("second"));
            }
            other => panic!("expected Protocol, got {other:?}"),
        }
    }

    #[test]
    fn empty_error_list_is_ignored() {
        let body = json!({
            "data": {
                "organization": {
                    "repositories": { "nodes": [], "pageInfo": { "hasNextPage": false, "endCursor": null }, "totalCount": 0 }
                }
            },
            "errors": []
        })
        .to_string();

        let page = parse_page("acme", &body).unwrap();
        assert!(page.repositories.is_empty());
    }

    #[test]
    fn undecodable_body_is_protocol_error() {
        assert!(matches!(parse_page("acme", "<html>").unwrap_err(), FetchError::Protocol { .. }));
    }
}
