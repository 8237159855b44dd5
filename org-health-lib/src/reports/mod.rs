//! Analysis reports
//!
//! An [`AnalysisReport`] captures one analysis run: the organization, when it was
//! produced, summary statistics and the scored repositories in descending score
//! order. Reports are persisted as pretty-printed JSON files named after the
//! organization and can be read back later. A colored console summary is provided
//! for the command line.

mod analysis_report;
mod console;
mod json;

pub use analysis_report::{AnalysisReport, RepositoryEntry, Summary};
pub use console::generate as generate_console;
pub use json::{generate as generate_json, load_report, report_path, write_report};
