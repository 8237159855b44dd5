//! Command-line interface and orchestration for org-health
//!
//! This module implements the CLI commands and wires the library components into
//! end-to-end workflows. It handles argument parsing, configuration management,
//! credential resolution and console presentation.
//!
//! # Implementation Model
//!
//! ## Commands
//!
//! - **analyze**: Fetch, select and score one organization's repositories, write
//!   the JSON report and print a summary
//! - **serve**: Expose the same pipeline over HTTP
//! - **init**: Generate a default configuration file
//!
//! ## Execution Flow
//!
//! The `run` function parses command-line arguments using clap and routes to the
//! appropriate command handler. The analyze and serve commands share a `Setup`
//! step that loads the TOML configuration, resolves the cache and results
//! directories, and resolves the GitHub token once from the command line or the
//! environment before building an `Analyzer`.

mod analyze;
mod common;
mod config;
mod host;
mod init;
mod progress_reporter;
mod run;
mod serve;

pub use analyze::{AnalyzeArgs, analyze_org};
pub use common::{ColorMode, CommonArgs, LogLevel, Setup};
pub use config::{CONFIG_FILE_NAME, Config, DEFAULT_CONFIG_TOML};
pub use host::Host;
pub use init::{InitArgs, init_config};
pub use progress_reporter::ProgressReporter;
pub use run::run;
pub use serve::{ServeArgs, serve_api};
