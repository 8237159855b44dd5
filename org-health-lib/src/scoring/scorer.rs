use super::{ScoreBreakdown, Weights, sub_scores};
use crate::facts::{Repository, ScoredRepository};
use chrono::{DateTime, Utc};
use rayon::prelude::*;

const LOG_TARGET: &str = "    scorer";

/// Computes health scores with a fixed set of weights.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scorer {
    weights: Weights,
}

impl Scorer {
    /// Create a scorer using `weights`, which must be valid.
    pub fn new(weights: Weights) -> crate::Result<Self> {
        weights.validate()?;
        Ok(Self { weights })
    }

    #[must_use]
    pub const fn weights(&self) -> &Weights {
        &self.weights
    }

    /// The individual sub-scores of `repo` evaluated at `now`.
    #[must_use]
    pub fn breakdown(&self, repo: &Repository, now: DateTime<Utc>) -> ScoreBreakdown {
        ScoreBreakdown {
            commit_frequency: sub_scores::commit_frequency(repo, now),
            responsiveness: sub_scores::responsiveness(repo),
            release_cadence: sub_scores::release_cadence(repo, now),
            contributors: sub_scores::contributors(repo),
            star_growth: sub_scores::star_growth(repo, now),
            ci_health: sub_scores::ci_health(repo, now),
        }
    }

    /// The health score of `repo` evaluated at `now`, between 0 and 100.
    #[must_use]
    pub fn score(&self, repo: &Repository, now: DateTime<Utc>) -> u8 {
        let breakdown = self.breakdown(repo, now);
        let score = breakdown.total(&self.weights);
        log::trace!(target: LOG_TARGET, "{}: {score} {breakdown:?}", repo.name);
        score
    }

    /// Score a batch of repositories in parallel, keeping their order.
    #[must_use]
    pub fn score_all(&self, repos: Vec<Repository>, now: DateTime<Utc>) -> Vec<ScoredRepository> {
        let scored: Vec<ScoredRepository> = repos
            .into_par_iter()
            .map(|repo| {
                let score = self.score(&repo, now);
                ScoredRepository::new(repo, score)
            })
            .collect();

        log::debug!(target: LOG_TARGET, "Scored {} repositories", scored.len());
        scored
    }
}
