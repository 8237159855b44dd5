use super::Weights;
use serde::Serialize;

/// The six sub-scores behind a health score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    pub commit_frequency: u8,
    pub responsiveness: u8,
    pub release_cadence: u8,
    pub contributors: u8,
    pub star_growth: u8,
    pub ci_health: u8,
}

impl ScoreBreakdown {
    /// The sub-scores in the same order as [`Weights::as_array`].
    #[must_use]
    pub const fn as_array(&self) -> [u8; 6] {
        [
            self.commit_frequency,
            self.responsiveness,
            self.release_cadence,
            self.contributors,
            self.star_growth,
            self.ci_health,
        ]
    }

    /// The unrounded weighted sum.
    #[must_use]
    pub fn weighted_sum(&self, weights: &Weights) -> f64 {
        self.as_array()
            .into_iter()
            .zip(weights.as_array())
            .fold(0.0, |acc, (score, weight)| acc + f64::from(score) * weight)
    }

    /// The weighted sum rounded half-to-even and clamped to `[0, 100]`.
    #[must_use]
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss, reason = "value is clamped to [0, 100] first")]
    pub fn total(&self, weights: &Weights) -> u8 {
        self.weighted_sum(weights).round_ties_even().clamp(0.0, 100.0) as u8
    }
}
