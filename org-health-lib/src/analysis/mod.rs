//! The analysis pipeline
//!
//! [`Analyzer::analyze`] runs one organization through the whole pipeline:
//! fetch every repository, select the important ones, score them, and persist the
//! report. The steps run strictly in sequence since each consumes the complete
//! output of the previous one.
//!
//! An organization with no repositories, or with none surviving selection, is not
//! an error. It yields [`AnalysisOutcome::Empty`] so callers can tell "nothing to
//! show" apart from a failure.

mod analyzer;
mod outcome;

pub use analyzer::Analyzer;
pub use outcome::{AnalysisError, AnalysisOutcome, EmptyReason};
