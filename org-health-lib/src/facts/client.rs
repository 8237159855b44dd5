//! GitHub GraphQL API client
//!
//! Minimal client issuing the repository page query and classifying responses.

use super::query::{ORG_REPOSITORIES_QUERY, PageData, parse_page};
use super::{Credentials, FetchError, RateLimitState};
use core::time::Duration;
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde_json::json;

const LOG_TARGET: &str = "    client";

/// The outcome of one page request along with the rate limit state reported with it.
///
/// Failed responses carry rate limit headers too, notably the one that exhausts the quota.
#[derive(Debug)]
pub struct Page {
    pub data: Result<PageData, FetchError>,
    pub rate_limit: Option<RateLimitState>,
}

/// GitHub GraphQL API client
#[derive(Debug, Clone)]
#[expect(clippy::struct_field_names, reason = "client field stores the underlying HTTP client")]
pub struct Client {
    client: reqwest::Client,
    api_url: String,
}

impl Client {
    /// Create a new API client with optional bearer credentials.
    pub fn new(credentials: &Credentials, api_url: impl Into<String>, timeout: Duration) -> crate::Result<Self> {
        let mut client_builder = reqwest::Client::builder().user_agent("org-health").timeout(timeout);

        if let Some(t) = credentials.token() {
            let mut auth_val = HeaderValue::from_str(&format!("Bearer {t}"))?;
            auth_val.set_sensitive(true);

            let mut headers = HeaderMap::new();
            let _ = headers.insert(AUTHORIZATION, auth_val);

            client_builder = client_builder.default_headers(headers);
        }

        Ok(Self {
            client: client_builder.build()?,
            api_url: api_url.into(),
        })
    }

    /// The GraphQL endpoint this client talks to.
    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Request one page of an organization's repositories.
    pub async fn fetch_page(&self, org: &str, cursor: Option<&str>, page_size: u8) -> Page {
        let body = json!({
            "query": ORG_REPOSITORIES_QUERY,
            "variables": { "org": org, "cursor": cursor, "pageSize": page_size },
        });

        log::debug!(target: LOG_TARGET, "Requesting repositories of '{org}' after cursor {cursor:?}");

        let resp = match self.client.post(&self.api_url).json(&body).send().await {
            Ok(resp) => resp,
            Err(e) => {
                return Page {
                    data: Err(FetchError::Transport(e)),
                    rate_limit: None,
                };
            }
        };

        // Extract rate limit info from response headers before checking status
        let rate_limit = RateLimitState::from_headers(resp.headers());
        let status = resp.status();

        let data = match resp.text().await {
            Ok(text) if status.is_success() => parse_page(org, &text),
            Ok(text) => Err(classify_failure(org, status, rate_limit, text)),
            Err(e) => Err(FetchError::Transport(e)),
        };

        Page { data, rate_limit }
    }
}

/// Map an unsuccessful HTTP status to a fetch error.
fn classify_failure(org: &str, status: StatusCode, rate_limit: Option<RateLimitState>, body: String) -> FetchError {
    let exhausted = rate_limit.is_some_and(|rl| rl.remaining == 0);

    match status {
        StatusCode::UNAUTHORIZED => FetchError::Auth,
        StatusCode::NOT_FOUND => FetchError::NotFound { org: org.to_string() },
        StatusCode::TOO_MANY_REQUESTS => FetchError::RateLimitExceeded {
            reset_at: rate_limit.map(|rl| rl.reset_at),
        },
        StatusCode::FORBIDDEN if exhausted => FetchError::RateLimitExceeded {
            reset_at: rate_limit.map(|rl| rl.reset_at),
        },
        s if s.is_server_error() => FetchError::UpstreamUnavailable { status: s.as_u16() },
        s => FetchError::Upstream { status: s.as_u16(), body },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn rate_limit(remaining: u64) -> Option<RateLimitState> {
        Some(RateLimitState {
            limit: 5000,
            remaining,
            used: 5000 - remaining,
            reset_at: DateTime::from_timestamp(1_704_067_200, 0).unwrap(),
        })
    }

    #[test]
    fn test_client_new_without_token() {
        let client = Client::new(&Credentials::default(), "https://api.github.com/graphql", Duration::from_secs(30)).unwrap();
        assert_eq!(client.api_url(), "https://api.github.com/graphql");
    }

    #[test]
    fn test_client_new_with_token() {
        let creds = Credentials::new(Some("test_token".into()));
        let client = Client::new(&creds, "https://example.test/graphql", Duration::from_secs(30)).unwrap();
        assert_eq!(client.api_url(), "https://example.test/graphql");
    }

    #[test]
    fn test_unauthorized_is_auth() {
        let err = classify_failure("acme", StatusCode::UNAUTHORIZED, None, String::new());
        assert!(matches!(err, FetchError::Auth));
    }

    #[test]
    fn test_not_found() {
        let err = classify_failure("acme", StatusCode::NOT_FOUND, None, String::new());
        assert!(matches!(err, FetchError::NotFound { ref org } if org == "acme"));
    }

    #[test]
    fn test_too_many_requests_is_rate_limited() {
        let err = classify_failure("acme", StatusCode::TOO_MANY_REQUESTS, rate_limit(0), String::new());
        match err {
            FetchError::RateLimitExceeded { reset_at } => assert_eq!(reset_at.unwrap().timestamp(), 1_704_067_200),
            other => panic!("expected RateLimitExceeded, got {other:?}"),
        }
    }

    #[test]
    fn test_forbidden_with_exhausted_quota_is_rate_limited() {
        let err = classify_failure("acme", StatusCode::FORBIDDEN, rate_limit(0), String::new());
        assert!(matches!(err, FetchError::RateLimitExceeded { .. }));
    }

    #[test]
    fn test_forbidden_with_quota_left_is_upstream() {
        let err = classify_failure("acme", StatusCode::FORBIDDEN, rate_limit(100), "SSO required".into());
        assert!(matches!(err, FetchError::Upstream { status: 403, ref body } if body == "SSO required"));
    }

    #[test]
    fn test_server_errors_are_unavailable() {
        for status in [StatusCode::INTERNAL_SERVER_ERROR, StatusCode::BAD_GATEWAY, StatusCode::SERVICE_UNAVAILABLE] {
            let err = classify_failure("acme", status, None, String::new());
            assert!(matches!(err, FetchError::UpstreamUnavailable { status: s } if s == status.as_u16()));
        }
    }

    #[test]
    fn test_other_status_is_upstream() {
        let err = classify_failure("acme", StatusCode::IM_A_TEAPOT, None, "short and stout".into());
        assert!(matches!(err, FetchError::Upstream { status: 418, .. }));
    }
}
