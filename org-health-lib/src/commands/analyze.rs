use super::common::{CommonArgs, LogLevel, Setup, init_logging};
use super::{Host, ProgressReporter};
use crate::Result;
use crate::analysis::AnalysisOutcome;
use crate::reports::generate_console;
use chrono::Utc;
use clap::Parser;
use core::time::Duration;
use std::io::{IsTerminal, Write, stderr, stdout};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

const LOG_TARGET: &str = "   analyze";

#[derive(Parser, Debug)]
pub struct AnalyzeArgs {
    /// Name of the GitHub organization to analyze
    #[arg(value_name = "ORG")]
    pub org: String,

    /// Neither read nor write the repository cache
    #[arg(long)]
    pub no_cache: bool,

    /// Clear the repository cache before running
    #[arg(long)]
    pub clear_cache: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Analyze one organization and print a summary.
///
/// Failures are reported on the error stream and exit with status 1. An organization
/// with nothing to analyze is reported but is not a failure.
pub async fn analyze_org<H: Host>(host: &mut H, args: &AnalyzeArgs) -> Result<()> {
    let log_level = args.common.log_level.unwrap_or(LogLevel::None);
    init_logging(log_level);

    let setup = Setup::new(&args.common)?;
    if setup.credentials.token().is_none() {
        let _ = writeln!(
            host.error(),
            "warning: no GitHub token found; set GITHUB_TOKEN or pass --github-token to avoid strict rate limits"
        );
    }

    if args.clear_cache {
        let removed = setup.cache.clear_all().await?;
        let _ = writeln!(host.error(), "Cleared {removed} cached entries");
    }

    let delay = if log_level == LogLevel::None {
        Duration::from_millis(300)
    } else {
        Duration::from_secs(365 * 24 * 60 * 60)
    };
    let progress = ProgressReporter::new(delay, args.common.color.enabled(stderr().is_terminal()));
    let analyzer = setup.analyzer(!args.no_cache, Arc::new(progress))?;

    let cancel = CancellationToken::new();
    let ctrl_c = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };

    let result = analyzer.analyze(&args.org, Utc::now(), &cancel).await;
    ctrl_c.abort();

    if let Some(rate_limit) = analyzer.fetcher().rate_limit() {
        log::info!(target: LOG_TARGET, "{}", rate_limit.summary(Utc::now()));
    }

    match result {
        Ok(AnalysisOutcome::Completed { report, results_file }) => {
            let mut text = String::new();
            generate_console(
                &report,
                Some(results_file.as_path()),
                args.common.color.enabled(stdout().is_terminal()),
                &mut text,
            )?;
            let _ = write!(host.output(), "{text}");
        }

        Ok(AnalysisOutcome::Empty(reason)) => {
            let _ = writeln!(host.error(), "Nothing to analyze for '{}': {reason}", args.org);
        }

        Err(e) => {
            let _ = writeln!(host.error(), "Error analyzing '{}': {e}", args.org);
            host.exit(1);
        }
    }

    Ok(())
}
