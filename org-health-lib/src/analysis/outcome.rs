use crate::facts::FetchError;
use crate::reports::AnalysisReport;
use core::fmt::{Display, Formatter};
use serde::Serialize;
use std::path::PathBuf;

/// Why an analysis produced no scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyReason {
    /// The organization has no repositories visible to the caller.
    NoRepositories,

    /// Repositories exist but none qualified for analysis.
    NoneSelected,
}

impl EmptyReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoRepositories => "no_repositories",
            Self::NoneSelected => "none_selected",
        }
    }
}

impl Display for EmptyReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NoRepositories => write!(f, "no repositories found"),
            Self::NoneSelected => write!(f, "no repositories met the selection criteria"),
        }
    }
}

/// The result of a successful analysis run.
#[derive(Debug, Clone)]
pub enum AnalysisOutcome {
    Completed {
        report: AnalysisReport,
        results_file: PathBuf,
    },
    Empty(EmptyReason),
}

/// Failures of an analysis run.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("could not save the report: {0}")]
    Report(String),
}

impl AnalysisError {
    /// Stable identifier for the kind of failure.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::Fetch(e) => e.reason(),
            Self::Report(_) => "report",
        }
    }
}
