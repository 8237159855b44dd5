//! Setup shared by the analyze and serve commands.

use super::config::Config;
use crate::Result;
use crate::analysis::Analyzer;
use crate::facts::{Cache, Credentials, Fetcher, Progress, TOKEN_ENV_VARS};
use crate::scoring::Scorer;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, ValueEnum};
use directories::BaseDirs;
use ohno::IntoAppError;
use std::path::PathBuf;
use std::sync::Arc;

const LOG_TARGET: &str = "  commands";

/// Color mode configuration for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Always use colors
    Always,

    /// Never use colors
    Never,

    /// Use colors if the output is a terminal, otherwise don't use colors
    Auto,
}

impl ColorMode {
    /// Whether to color output going to a stream for which `is_terminal` was reported.
    #[must_use]
    pub const fn enabled(self, is_terminal: bool) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => is_terminal,
        }
    }
}

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    None,

    /// Only error messages
    Error,

    /// Warning and error messages
    Warn,

    /// Info, warning, and error messages
    Info,

    /// Debug, info, warning, and error messages
    Debug,

    /// Trace, debug, info, warning, and error messages
    Trace,
}

/// Arguments shared between the analyze and serve commands
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// GitHub personal access token (defaults to GITHUB_TOKEN, then GITHUB_PAT)
    #[arg(long, value_name = "TOKEN")]
    pub github_token: Option<String>,

    /// Path to configuration file (default is `org-health.toml`)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Directory where fetched repository lists are cached
    #[arg(long, value_name = "PATH")]
    pub cache_dir: Option<Utf8PathBuf>,

    /// Directory where reports are written (overrides the configuration file)
    #[arg(long, value_name = "PATH")]
    pub results_dir: Option<Utf8PathBuf>,

    /// Maximum number of repositories to score (overrides the configuration file)
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
    pub max_repos: Option<u16>,

    /// Control when to use colored output
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    pub color: ColorMode,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Everything resolved from the command line, the configuration file and the environment.
#[derive(Debug)]
pub struct Setup {
    pub config: Config,
    pub credentials: Credentials,
    pub cache: Cache,
    pub results_dir: PathBuf,
    pub max_repos: usize,
}

impl Setup {
    /// Resolve configuration relative to the current directory.
    pub fn new(args: &CommonArgs) -> Result<Self> {
        Self::with_base_dir(Utf8Path::new("."), args)
    }

    /// Resolve configuration, looking for the default configuration file in `base_dir`.
    pub fn with_base_dir(base_dir: &Utf8Path, args: &CommonArgs) -> Result<Self> {
        let config = Config::load(base_dir, args.config.as_ref())?;

        // Determine cache directory: use provided path or default cache directory for the platform
        let cache_dir = if let Some(cache_path) = &args.cache_dir {
            cache_path.as_std_path().to_path_buf()
        } else {
            BaseDirs::new()
                .into_app_err("could not determine cache directory")?
                .cache_dir()
                .join("org-health")
        };

        let results_dir = args
            .results_dir
            .as_ref()
            .map_or_else(|| config.results_dir.clone(), |p| p.as_std_path().to_path_buf());

        let max_repos = args.max_repos.map_or(config.max_repos, usize::from);

        let credentials = Credentials::from_env(args.github_token.as_deref());
        if credentials.token().is_none() {
            log::warn!(
                target: LOG_TARGET,
                "No GitHub token found in --github-token, {}; API rate limits will be very restrictive",
                TOKEN_ENV_VARS.join(" or ")
            );
        }

        log::debug!(target: LOG_TARGET, "Using cache directory '{}'", cache_dir.display());

        Ok(Self {
            cache: Cache::new(cache_dir, config.cache_ttl),
            config,
            credentials,
            results_dir,
            max_repos,
        })
    }

    /// Build the analysis pipeline. With `use_cache` false the cache is neither read nor written.
    pub fn analyzer(&self, use_cache: bool, progress: Arc<dyn Progress>) -> Result<Analyzer> {
        let cache = use_cache.then(|| self.cache.clone());
        let fetcher = Fetcher::new(&self.credentials, self.config.fetcher_config(), cache)?.with_progress(Arc::clone(&progress));

        Ok(Analyzer::new(fetcher, Scorer::default(), &self.results_dir)
            .with_max_repos(self.max_repos)
            .with_progress(progress))
    }
}

/// Initialize logger based on log level
pub fn init_logging(log_level: LogLevel) {
    let level = match log_level {
        LogLevel::None => return,
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    };

    let env = env_logger::Env::default().filter_or("RUST_LOG", level);

    // A logger may already be installed when commands run more than once in a process
    let _ = env_logger::Builder::from_env(env)
        .format_module_path(false)
        .format_target(matches!(log_level, LogLevel::Debug | LogLevel::Trace))
        .try_init();
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::facts::NoProgress;
    use std::fs;

    fn args(tmp: &Utf8Path) -> CommonArgs {
        CommonArgs {
            github_token: Some("token".to_string()),
            config: None,
            cache_dir: Some(tmp.join("cache")),
            results_dir: None,
            max_repos: None,
            color: ColorMode::Never,
            log_level: None,
        }
    }

    #[test]
    fn color_mode_enabled() {
        assert!(ColorMode::Always.enabled(false));
        assert!(!ColorMode::Never.enabled(true));
        assert!(ColorMode::Auto.enabled(true));
        assert!(!ColorMode::Auto.enabled(false));
    }

    #[test]
    fn setup_uses_config_values() {
        let tmp = tempfile::tempdir().unwrap();
        let base = Utf8Path::from_path(tmp.path()).unwrap();
        fs::write(base.join("org-health.toml"), "max_repos = 12\nresults_dir = \"reports\"\ncache_ttl = \"5m\"").unwrap();

        let setup = Setup::with_base_dir(base, &args(base)).unwrap();
        assert_eq!(setup.max_repos, 12);
        assert_eq!(setup.results_dir, PathBuf::from("reports"));
        assert_eq!(setup.cache.ttl(), core::time::Duration::from_secs(300));
        assert_eq!(setup.cache.dir(), base.join("cache").as_std_path());
        assert_eq!(setup.credentials.token(), Some("token"));
    }

    #[test]
    fn command_line_overrides_config() {
        let tmp = tempfile::tempdir().unwrap();
        let base = Utf8Path::from_path(tmp.path()).unwrap();
        fs::write(base.join("org-health.toml"), "max_repos = 12\nresults_dir = \"reports\"").unwrap();

        let mut args = args(base);
        args.max_repos = Some(3);
        args.results_dir = Some(base.join("elsewhere"));

        let setup = Setup::with_base_dir(base, &args).unwrap();
        assert_eq!(setup.max_repos, 3);
        assert_eq!(setup.results_dir, base.join("elsewhere").as_std_path());
    }

    #[test]
    fn analyzer_honors_cache_choice() {
        let tmp = tempfile::tempdir().unwrap();
        let base = Utf8Path::from_path(tmp.path()).unwrap();
        let setup = Setup::with_base_dir(base, &args(base)).unwrap();

        let cached = setup.analyzer(true, Arc::new(NoProgress)).unwrap();
        assert!(cached.fetcher().cache().is_some());

        let uncached = setup.analyzer(false, Arc::new(NoProgress)).unwrap();
        assert!(uncached.fetcher().cache().is_none());
    }
}
