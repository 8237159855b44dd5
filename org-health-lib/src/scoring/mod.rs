//! The repository health score
//!
//! Every selected repository receives an integer score between 0 and 100 built from
//! six sub-scores, each itself between 0 and 100:
//!
//! | Sub-score          | Weight | Basis                                              |
//! |--------------------|--------|----------------------------------------------------|
//! | `commit_frequency` | 0.30   | days since the last push                           |
//! | `responsiveness`   | 0.25   | closed issues plus closed pull requests            |
//! | `release_cadence`  | 0.15   | days since the latest release, or repository age   |
//! | `contributors`     | 0.10   | fork count                                         |
//! | `star_growth`      | 0.10   | stars per month of repository age                  |
//! | `ci_health`        | 0.10   | days since the last push                           |
//!
//! Several of these are proxies: push recency stands in for commit activity and CI
//! status, forks stand in for contributors. The breakpoints are fixed so scores are
//! comparable across runs.
//!
//! Scoring is pure. The evaluation time is passed in and missing data degrades to a
//! defined sub-score instead of failing.

mod breakdown;
mod scorer;
mod sub_scores;
mod weights;

pub use breakdown::ScoreBreakdown;
pub use scorer::Scorer;
pub use weights::Weights;
