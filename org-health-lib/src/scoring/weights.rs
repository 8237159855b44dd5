use ohno::app_err;

/// How far the weights may drift from summing to exactly one.
const SUM_TOLERANCE: f64 = 1e-4;

/// Relative weight of each sub-score in the composite health score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub commit_frequency: f64,
    pub responsiveness: f64,
    pub release_cadence: f64,
    pub contributors: f64,
    pub star_growth: f64,
    pub ci_health: f64,
}

impl Weights {
    /// The standard weighting.
    pub const DEFAULT: Self = Self {
        commit_frequency: 0.30,
        responsiveness: 0.25,
        release_cadence: 0.15,
        contributors: 0.10,
        star_growth: 0.10,
        ci_health: 0.10,
    };

    /// The weights in the order they are applied.
    #[must_use]
    pub const fn as_array(&self) -> [f64; 6] {
        [
            self.commit_frequency,
            self.responsiveness,
            self.release_cadence,
            self.contributors,
            self.star_growth,
            self.ci_health,
        ]
    }

    #[must_use]
    pub fn sum(&self) -> f64 {
        self.as_array().iter().sum()
    }

    /// Check that every weight is non-negative and that together they sum to one.
    pub fn validate(&self) -> crate::Result<()> {
        if let Some(w) = self.as_array().into_iter().find(|w| !w.is_finite() || *w < 0.0) {
            return Err(app_err!("score weights must be non-negative, found {w}"));
        }

        let sum = self.sum();
        if (sum - 1.0).abs() > SUM_TOLERANCE {
            return Err(app_err!("score weights must sum to 1.0, but they sum to {sum}"));
        }

        Ok(())
    }
}

impl Default for Weights {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn default_weights_sum_to_one() {
        assert!((Weights::DEFAULT.sum() - 1.0).abs() <= SUM_TOLERANCE);
        Weights::DEFAULT.validate().unwrap();
    }

    #[test]
    fn default_trait_matches_constant() {
        assert_eq!(Weights::default(), Weights::DEFAULT);
    }

    #[test]
    fn rejects_weights_not_summing_to_one() {
        let weights = Weights {
            commit_frequency: 0.5,
            ..Weights::DEFAULT
        };
        let err = weights.validate().unwrap_err();
        assert!(err.to_string().contains("sum to 1.0"));
    }

    #[test]
    fn rejects_negative_weights() {
        let weights = Weights {
            commit_frequency: 0.5,
            responsiveness: 0.05,
            release_cadence: -0.05,
            ..Weights::DEFAULT
        };
        let err = weights.validate().unwrap_err();
        assert!(err.to_string().contains("non-negative"));
    }

    #[test]
    fn accepts_small_rounding_drift() {
        let weights = Weights {
            ci_health: 0.100_05,
            ..Weights::DEFAULT
        };
        weights.validate().unwrap();
    }
}
