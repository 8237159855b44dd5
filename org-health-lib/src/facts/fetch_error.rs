use chrono::{DateTime, Utc};

/// Failures that can occur while fetching an organization's repositories.
///
/// Each variant carries a stable machine-readable [`reason`](FetchError::reason)
/// so front ends can map it to a status code without inspecting messages.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The organization does not exist or is not visible to the caller.
    #[error("organization '{org}' not found")]
    NotFound { org: String },

    /// The credential is missing or was rejected.
    #[error("authentication with the GitHub API failed; supply a valid token through GITHUB_TOKEN or GITHUB_PAT")]
    Auth,

    /// The quota is exhausted and waiting for it to reset is not an option.
    #[error("GitHub API rate limit exhausted{}", reset_hint(.reset_at.as_ref()))]
    RateLimitExceeded { reset_at: Option<DateTime<Utc>> },

    /// The API answered with a transient server-side failure.
    #[error("GitHub is temporarily unavailable (HTTP {status}); try again in a few moments")]
    UpstreamUnavailable { status: u16 },

    /// The response could not be understood or carried query errors.
    #[error("malformed GitHub API response: {message}")]
    Protocol { message: String },

    /// Any other unsuccessful HTTP status.
    #[error("GitHub API error: HTTP {status}: {body}")]
    Upstream { status: u16, body: String },

    /// The request never produced a response.
    #[error("could not reach the GitHub API")]
    Transport(#[source] reqwest::Error),

    /// The caller abandoned the fetch.
    #[error("fetch cancelled")]
    Cancelled,
}

impl FetchError {
    /// Stable identifier for the kind of failure.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::Auth => "auth",
            Self::RateLimitExceeded { .. } => "rate_limited",
            Self::UpstreamUnavailable { .. } => "upstream_unavailable",
            Self::Protocol { .. } => "protocol",
            Self::Upstream { .. } => "upstream",
            Self::Transport(_) => "transport",
            Self::Cancelled => "cancelled",
        }
    }

    pub(crate) fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol { message: message.into() }
    }
}

fn reset_hint(reset_at: Option<&DateTime<Utc>>) -> String {
    reset_at.map_or_else(String::new, |t| format!(" until {}", t.format("%Y-%m-%d %H:%M:%S UTC")))
}
