use crate::analysis::AnalysisError;
use crate::facts::FetchError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

const LOG_TARGET: &str = "    server";

/// Errors surfaced to HTTP clients.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("no results stored for organization '{org}'")]
    ResultsNotFound { org: String },

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Analysis(AnalysisError::Fetch(e)) => fetch_status(e),
            Self::ResultsNotFound { .. } => StatusCode::NOT_FOUND,
            Self::Analysis(AnalysisError::Report(_)) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::Analysis(e) => e.reason(),
            Self::ResultsNotFound { .. } => "not_found",
            Self::Internal(_) => "internal",
        }
    }
}

const fn fetch_status(error: &FetchError) -> StatusCode {
    match error {
        FetchError::NotFound { .. } => StatusCode::NOT_FOUND,
        FetchError::Auth => StatusCode::UNAUTHORIZED,
        FetchError::RateLimitExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
        FetchError::UpstreamUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        FetchError::Protocol { .. } | FetchError::Upstream { .. } | FetchError::Transport(_) => StatusCode::BAD_GATEWAY,
        FetchError::Cancelled => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!(target: LOG_TARGET, "Request failed: {self}");
        } else {
            log::debug!(target: LOG_TARGET, "Request rejected: {self}");
        }

        let body = json!({ "error": self.to_string(), "reason": self.reason() });
        (status, Json(body)).into_response()
    }
}
