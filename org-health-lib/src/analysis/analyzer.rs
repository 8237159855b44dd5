use super::{AnalysisError, AnalysisOutcome, EmptyReason};
use crate::facts::{Fetcher, NoProgress, Progress};
use crate::reports::{AnalysisReport, write_report};
use crate::scoring::Scorer;
use crate::selection::{DEFAULT_MAX_COUNT, select_important};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

const LOG_TARGET: &str = "  analyzer";

/// Runs the fetch, select, score and export pipeline.
pub struct Analyzer {
    fetcher: Fetcher,
    scorer: Scorer,
    max_repos: usize,
    results_dir: PathBuf,
    progress: Arc<dyn Progress>,
}

impl core::fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Analyzer")
            .field("fetcher", &self.fetcher)
            .field("scorer", &self.scorer)
            .field("max_repos", &self.max_repos)
            .field("results_dir", &self.results_dir)
            .finish_non_exhaustive()
    }
}

impl Analyzer {
    #[must_use]
    pub fn new(fetcher: Fetcher, scorer: Scorer, results_dir: impl Into<PathBuf>) -> Self {
        Self {
            fetcher,
            scorer,
            max_repos: DEFAULT_MAX_COUNT,
            results_dir: results_dir.into(),
            progress: Arc::new(NoProgress),
        }
    }

    /// Limit how many repositories are scored.
    #[must_use]
    pub const fn with_max_repos(mut self, max_repos: usize) -> Self {
        self.max_repos = max_repos;
        self
    }

    #[must_use]
    pub fn with_progress(mut self, progress: Arc<dyn Progress>) -> Self {
        self.progress = progress;
        self
    }

    #[must_use]
    pub const fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    #[must_use]
    pub fn results_dir(&self) -> &Path {
        &self.results_dir
    }

    /// Analyze `org` as of `now`.
    ///
    /// Fetch failures propagate unchanged. Cancelling `cancel` abandons an in-flight fetch.
    pub async fn analyze(&self, org: &str, now: DateTime<Utc>, cancel: &CancellationToken) -> Result<AnalysisOutcome, AnalysisError> {
        log::info!(target: LOG_TARGET, "Analyzing '{org}'");

        let result = self.run(org, now, cancel).await;
        self.progress.done();

        match &result {
            Ok(AnalysisOutcome::Completed { report, .. }) => log::info!(
                target: LOG_TARGET,
                "Analyzed {} repositories of '{org}', average score {:.1}",
                report.summary.analyzed,
                report.summary.average_score
            ),
            Ok(AnalysisOutcome::Empty(reason)) => log::info!(target: LOG_TARGET, "Nothing to analyze for '{org}': {reason}"),
            Err(e) => log::error!(target: LOG_TARGET, "Analysis of '{org}' failed: {e}"),
        }

        result
    }

    async fn run(&self, org: &str, now: DateTime<Utc>, cancel: &CancellationToken) -> Result<AnalysisOutcome, AnalysisError> {
        let repositories = self.fetcher.fetch_all_repositories(org, cancel).await?;
        let total_found = repositories.len();
        if total_found == 0 {
            return Ok(AnalysisOutcome::Empty(EmptyReason::NoRepositories));
        }

        self.progress.set_phase("Selecting");
        let selected = select_important(repositories, self.max_repos, now);
        if selected.is_empty() {
            return Ok(AnalysisOutcome::Empty(EmptyReason::NoneSelected));
        }

        self.progress.set_phase("Scoring");
        self.progress.set_message(format!("{} repositories", selected.len()));
        let scored = self.scorer.score_all(selected, now);

        self.progress.set_phase("Exporting");
        let report = AnalysisReport::new(org, now, total_found, scored);
        let results_file = write_report(&self.results_dir, &report).map_err(|e| AnalysisError::Report(format!("{e:#}")))?;

        Ok(AnalysisOutcome::Completed { report, results_file })
    }
}
