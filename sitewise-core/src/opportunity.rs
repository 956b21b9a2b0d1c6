//! Two-criterion TOPSIS closeness for a site's market opportunity.
//!
//! Support density and competitor distance are both benefit criteria. Each is
//! scaled against a saturation threshold, weighted, and compared with the
//! ideal best (both criteria saturated) and ideal worst (both zero) points.
//! The relative closeness to the ideal best is the opportunity score.

use thiserror::Error;

/// Criterion weights; they should sum to one.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OpportunityWeights {
    /// Weight of the support density criterion.
    pub support: f64,
    /// Weight of the competitor distance criterion.
    pub distance: f64,
}

impl Default for OpportunityWeights {
    fn default() -> Self {
        Self {
            support: 0.6,
            distance: 0.4,
        }
    }
}

/// Values at which each criterion saturates.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SaturationThresholds {
    /// Support count treated as ideal.
    pub support_count: f64,
    /// Competitor distance in meters treated as ideal.
    pub competitor_distance: f64,
}

impl Default for SaturationThresholds {
    fn default() -> Self {
        Self {
            support_count: 50.0,
            competitor_distance: 3_000.0,
        }
    }
}

/// Errors returned by [`OpportunityScorer::new`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum OpportunityConfigError {
    /// A weight was negative or not finite.
    #[error("criterion weight {weight} must be finite and non-negative")]
    InvalidWeight {
        /// Rejected weight.
        weight: f64,
    },
    /// A saturation threshold was zero, negative, or not finite.
    #[error("saturation threshold {threshold} must be finite and positive")]
    InvalidThreshold {
        /// Rejected threshold.
        threshold: f64,
    },
}

/// Intermediate values of one closeness computation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OpportunityBreakdown {
    /// Support count scaled into `[0, 1]`.
    pub norm_support: f64,
    /// Competitor distance scaled into `[0, 1]`.
    pub norm_distance: f64,
    /// `norm_support` times its weight.
    pub weighted_support: f64,
    /// `norm_distance` times its weight.
    pub weighted_distance: f64,
    /// Euclidean distance to the ideal best point.
    pub distance_to_best: f64,
    /// Euclidean distance to the ideal worst point.
    pub distance_to_worst: f64,
    /// Relative closeness to the ideal best, in `[0, 1]`.
    pub closeness: f64,
}

/// Scores support density and competitor distance.
///
/// # Examples
/// ```
/// use sitewise_core::OpportunityScorer;
///
/// let scorer = OpportunityScorer::default();
/// assert_eq!(scorer.score(60, 4_000.0), 1.0);
/// assert!((scorer.score(0, 100.0) - 0.0184).abs() < 1e-3);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OpportunityScorer {
    weights: OpportunityWeights,
    thresholds: SaturationThresholds,
}

impl OpportunityScorer {
    /// Validate and build a scorer.
    ///
    /// # Errors
    /// Returns [`OpportunityConfigError`] for negative or non-finite weights
    /// and for thresholds that are not positive and finite.
    pub fn new(
        weights: OpportunityWeights,
        thresholds: SaturationThresholds,
    ) -> Result<Self, OpportunityConfigError> {
        for weight in [weights.support, weights.distance] {
            if !(weight.is_finite() && weight >= 0.0) {
                return Err(OpportunityConfigError::InvalidWeight { weight });
            }
        }
        for threshold in [thresholds.support_count, thresholds.competitor_distance] {
            if !(threshold.is_finite() && threshold > 0.0) {
                return Err(OpportunityConfigError::InvalidThreshold { threshold });
            }
        }
        Ok(Self {
            weights,
            thresholds,
        })
    }

    /// Criterion weights in use.
    #[must_use]
    pub const fn weights(&self) -> OpportunityWeights {
        self.weights
    }

    /// Saturation thresholds in use.
    #[must_use]
    pub const fn thresholds(&self) -> SaturationThresholds {
        self.thresholds
    }

    /// Closeness to the ideal site, in `[0, 1]`.
    #[must_use]
    pub fn score(&self, support_count: u32, competitor_distance: f64) -> f64 {
        self.breakdown(support_count, competitor_distance).closeness
    }

    /// Every intermediate value of the closeness computation.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "TOPSIS closeness")]
    pub fn breakdown(&self, support_count: u32, competitor_distance: f64) -> OpportunityBreakdown {
        let norm_support = scale(f64::from(support_count), self.thresholds.support_count);
        let norm_distance = scale(competitor_distance, self.thresholds.competitor_distance);
        let weighted_support = norm_support * self.weights.support;
        let weighted_distance = norm_distance * self.weights.distance;

        let distance_to_best = (weighted_support - self.weights.support)
            .hypot(weighted_distance - self.weights.distance);
        let distance_to_worst = weighted_support.hypot(weighted_distance);
        let denominator = distance_to_best + distance_to_worst;
        let closeness = if denominator > 0.0 {
            (distance_to_worst / denominator).clamp(0.0, 1.0)
        } else {
            0.0
        };

        OpportunityBreakdown {
            norm_support,
            norm_distance,
            weighted_support,
            weighted_distance,
            distance_to_best,
            distance_to_worst,
            closeness,
        }
    }
}

#[expect(clippy::float_arithmetic, reason = "criterion scaling")]
fn scale(value: f64, threshold: f64) -> f64 {
    let ratio = value / threshold;
    if ratio.is_nan() {
        return 0.0;
    }
    ratio.clamp(0.0, 1.0)
}

#[cfg(test)]
#[expect(
    clippy::float_arithmetic,
    reason = "assertions compare floating-point values"
)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn scorer() -> OpportunityScorer {
        OpportunityScorer::default()
    }

    #[rstest]
    #[case(50, 3_000.0)]
    #[case(60, 4_000.0)]
    #[case(500, 5_000.0)]
    fn saturated_criteria_score_exactly_one(
        scorer: OpportunityScorer,
        #[case] support: u32,
        #[case] distance: f64,
    ) {
        assert!((scorer.score(support, distance) - 1.0).abs() < f64::EPSILON);
    }

    #[rstest]
    fn crowded_quiet_site_scores_low(scorer: OpportunityScorer) {
        let breakdown = scorer.breakdown(0, 100.0);
        assert!((breakdown.closeness - 0.0184).abs() < 1e-3);
        assert!((breakdown.norm_distance - 100.0 / 3_000.0).abs() < 1e-12);
        assert!(breakdown.norm_support.abs() < f64::EPSILON);
    }

    #[rstest]
    fn worst_point_scores_zero(scorer: OpportunityScorer) {
        assert!(scorer.score(0, 0.0).abs() < f64::EPSILON);
    }

    #[rstest]
    fn zero_weights_give_zero_denominator() {
        let weights = OpportunityWeights {
            support: 0.0,
            distance: 0.0,
        };
        let scorer = OpportunityScorer::new(weights, SaturationThresholds::default())
            .expect("valid configuration");
        assert!(scorer.score(25, 1_500.0).abs() < f64::EPSILON);
    }

    #[rstest]
    fn breakdown_exposes_ideal_distances(scorer: OpportunityScorer) {
        let breakdown = scorer.breakdown(25, 1_500.0);
        assert!((breakdown.weighted_support - 0.3).abs() < 1e-12);
        assert!((breakdown.weighted_distance - 0.2).abs() < 1e-12);
        assert!((breakdown.distance_to_best - breakdown.distance_to_worst).abs() < 1e-12);
        assert!((breakdown.closeness - 0.5).abs() < 1e-12);
    }

    #[rstest]
    #[case(OpportunityWeights { support: -0.1, distance: 0.4 }, SaturationThresholds::default())]
    #[case(OpportunityWeights { support: f64::NAN, distance: 0.4 }, SaturationThresholds::default())]
    #[case(
        OpportunityWeights::default(),
        SaturationThresholds { support_count: 0.0, competitor_distance: 3_000.0 }
    )]
    #[case(
        OpportunityWeights::default(),
        SaturationThresholds { support_count: 50.0, competitor_distance: f64::INFINITY }
    )]
    fn rejects_invalid_configuration(
        #[case] weights: OpportunityWeights,
        #[case] thresholds: SaturationThresholds,
    ) {
        assert!(OpportunityScorer::new(weights, thresholds).is_err());
    }
}
