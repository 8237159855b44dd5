//! Command dispatch logic for org-health

use super::{AnalyzeArgs, InitArgs, ServeArgs, analyze_org, init_config, serve_api};
use crate::{Host, Result};
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, Subcommand};

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "org-health", version, author, long_about = None)]
#[command(about = "Score the health of the repositories in a GitHub organization")]
#[command(styles = CLAP_STYLES)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze an organization and write a JSON report
    Analyze(Box<AnalyzeArgs>),
    /// Serve analyses over HTTP
    Serve(Box<ServeArgs>),
    /// Generate a default configuration file
    Init(InitArgs),
}

/// Dispatch command-line arguments to the appropriate handler
///
/// # Arguments
///
/// * `args` - An iterator of command-line arguments (typically from `std::env::args()`)
///
/// # Errors
///
/// Returns an error if the executed command fails
pub async fn run<I, T, H>(host: &mut H, args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
{
    match &Cli::parse_from(args).command {
        Command::Analyze(analyze_args) => analyze_org(host, analyze_args).await,
        Command::Serve(serve_args) => serve_api(host, serve_args).await,
        Command::Init(init_args) => init_config(host, init_args),
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_analyze_flags() {
        let cli = Cli::parse_from(["org-health", "analyze", "acme", "--no-cache", "--clear-cache", "--max-repos", "5"]);
        let Command::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(args.org, "acme");
        assert!(args.no_cache);
        assert!(args.clear_cache);
        assert_eq!(args.common.max_repos, Some(5));
    }

    #[test]
    fn serve_defaults() {
        let cli = Cli::parse_from(["org-health", "serve"]);
        let Command::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.port, 8000);
        assert_eq!(args.bind.to_string(), "0.0.0.0");
        assert!(args.common.log_level.is_none());
    }

    #[test]
    fn rejects_zero_max_repos() {
        assert!(Cli::try_parse_from(["org-health", "analyze", "acme", "--max-repos", "0"]).is_err());
    }
}
