use super::AnalysisReport;
use crate::Result;
use core::fmt::Write;
use owo_colors::OwoColorize;
use std::path::Path;

/// How many repositories the summary lists.
const TOP_COUNT: usize = 5;

/// Render a human-readable summary of `report`.
pub fn generate<W: Write>(report: &AnalysisReport, results_file: Option<&Path>, use_colors: bool, writer: &mut W) -> Result<()> {
    let summary = &report.summary;

    let heading = format!("Summary for {}", report.organization);
    if use_colors {
        writeln!(writer, "{}", heading.bold())?;
    } else {
        writeln!(writer, "{heading}")?;
    }

    writeln!(writer, "  Total repositories     : {}", summary.total_found)?;
    writeln!(writer, "  Repositories analyzed  : {}", summary.analyzed)?;
    writeln!(writer, "  Average health score   : {:.1}/100", summary.average_score)?;
    writeln!(writer, "  Median health score    : {:.1}/100", summary.median_score)?;

    let top = report.top(TOP_COUNT);
    if !top.is_empty() {
        writeln!(writer)?;
        if use_colors {
            writeln!(writer, "{}", format!("Top {} repositories", top.len()).bold())?;
        } else {
            writeln!(writer, "Top {} repositories", top.len())?;
        }

        let name_width = top.iter().map(|r| r.name.len()).max().unwrap_or(0);
        for (index, entry) in top.iter().enumerate() {
            let score = format!("{:>3}/100", entry.health_score);
            let score = if use_colors { colorize_score(entry.health_score, &score) } else { score };
            writeln!(
                writer,
                "  {}. {:<name_width$}  {score}  ★ {}",
                index + 1,
                entry.name,
                entry.stars
            )?;
        }
    }

    if let Some(path) = results_file {
        writeln!(writer)?;
        writeln!(writer, "Results saved to {}", path.display())?;
    }

    Ok(())
}

fn colorize_score(score: u8, text: &str) -> String {
    match score {
        70.. => text.green().to_string(),
        40.. => text.yellow().to_string(),
        _ => text.red().to_string(),
    }
}
