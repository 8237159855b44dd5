use super::AnalysisReport;
use crate::Result;
use crate::facts::sanitize_path_component;
use core::fmt::Write;
use ohno::IntoAppError;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const LOG_TARGET: &str = "   reports";

/// Render `report` as pretty-printed JSON.
pub fn generate<W: Write>(report: &AnalysisReport, writer: &mut W) -> Result<()> {
    write!(writer, "{}", serde_json::to_string_pretty(report)?)?;
    Ok(())
}

/// Where the report for `org` lives inside `results_dir`.
///
/// Organization logins are case-insensitive, so the file name is lowercased.
#[must_use]
pub fn report_path(results_dir: &Path, org: &str) -> PathBuf {
    results_dir.join(format!("{}.json", sanitize_path_component(&org.to_lowercase())))
}

/// Write `report` into `results_dir`, replacing any earlier report for the same organization.
///
/// Returns the path of the written file.
pub fn write_report(results_dir: &Path, report: &AnalysisReport) -> Result<PathBuf> {
    fs::create_dir_all(results_dir).into_app_err_with(|| format!("creating results directory '{}'", results_dir.display()))?;

    let mut content = String::new();
    generate(report, &mut content)?;
    content.push('\n');

    let path = report_path(results_dir, &report.organization);
    fs::write(&path, content).into_app_err_with(|| format!("writing report '{}'", path.display()))?;

    log::info!(target: LOG_TARGET, "Wrote report for '{}' to '{}'", report.organization, path.display());
    Ok(path)
}

/// Read back the report previously written for `org`.
///
/// Returns `Ok(None)` when no report exists.
pub fn load_report(results_dir: &Path, org: &str) -> Result<Option<AnalysisReport>> {
    let path = report_path(results_dir, org);

    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::debug!(target: LOG_TARGET, "No report for '{org}' at '{}'", path.display());
            return Ok(None);
        }
        Err(e) => return Err(e).into_app_err_with(|| format!("reading report '{}'", path.display())),
    };

    let report = serde_json::from_str(&content).into_app_err_with(|| format!("parsing report '{}'", path.display()))?;
    Ok(Some(report))
}
