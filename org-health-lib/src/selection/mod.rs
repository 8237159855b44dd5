//! Choosing which repositories of an organization are worth scoring
//!
//! Large organizations carry long tails of experiments, mirrors and abandoned
//! projects. Scoring all of them is wasteful and skews the summary, so the
//! analysis only looks at a bounded, representative subset.
//!
//! # Implementation Model
//!
//! Selection happens in three steps:
//!
//! 1. Repositories that are archived, forks, empty or private are dropped.
//! 2. The survivors are ranked by an importance value derived from stars and
//!    forks, boosted for recent pushes and dampened for stale ones.
//! 3. The ranked list is truncated once it either reaches the requested count or
//!    has at least [`MIN_REPRESENTATIVE`] entries covering [`STAR_COVERAGE`] of the
//!    organization's stars.
//!
//! The current time is always passed in so rankings are reproducible.

mod selector;

pub use selector::{DEFAULT_MAX_COUNT, MIN_REPRESENTATIVE, STAR_COVERAGE, importance, is_importable, select_important};
