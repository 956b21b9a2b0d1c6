//! Weighted blend of the per-site sub-scores.

use serde::{Deserialize, Serialize};

use crate::round_to;

/// The three criteria a site is judged on, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubScores {
    /// Geospatial opportunity closeness, rounded to four decimals.
    pub geo: f64,
    /// Review sentiment.
    pub sentiment: f64,
    /// Rent price value.
    pub price_value: f64,
}

impl SubScores {
    /// Criteria in matrix column order: geo, sentiment, price.
    #[must_use]
    pub const fn as_row(&self) -> [f64; 3] {
        [self.geo, self.sentiment, self.price_value]
    }

    /// Copy rounded to two decimals for presentation.
    #[must_use]
    pub fn rounded_for_display(&self) -> Self {
        Self {
            geo: round_to(self.geo, 100.0),
            sentiment: round_to(self.sentiment, 100.0),
            price_value: round_to(self.price_value, 100.0),
        }
    }
}

/// Criterion weights for the final blend.
///
/// # Examples
/// ```
/// use sitewise_scorer::{BlendWeights, SubScores};
///
/// let scores = SubScores { geo: 1.0, sentiment: 0.5, price_value: 1.0 };
/// assert_eq!(BlendWeights::default().blend(&scores), 0.85);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlendWeights {
    /// Weight of the geospatial score.
    pub geo: f64,
    /// Weight of the sentiment score.
    pub sentiment: f64,
    /// Weight of the price-value score.
    pub price: f64,
}

impl Default for BlendWeights {
    fn default() -> Self {
        Self {
            geo: 0.6,
            sentiment: 0.3,
            price: 0.1,
        }
    }
}

impl BlendWeights {
    /// Weights in matrix column order: geo, sentiment, price.
    #[must_use]
    pub const fn as_row(&self) -> [f64; 3] {
        [self.geo, self.sentiment, self.price]
    }

    /// Weighted sum of `scores`, rounded to four decimals.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "weighted sum")]
    pub fn blend(&self, scores: &SubScores) -> f64 {
        let raw = scores.geo * self.geo
            + scores.sentiment * self.sentiment
            + scores.price_value * self.price;
        round_to(raw, 10_000.0)
    }
}

#[cfg(test)]
#[expect(
    clippy::float_arithmetic,
    reason = "assertions compare floating-point values"
)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(SubScores { geo: 0.0, sentiment: 0.5, price_value: 1.0 }, 0.25)]
    #[case(SubScores { geo: 0.5123, sentiment: 0.912, price_value: 0.5 }, 0.6310)]
    #[case(SubScores { geo: 1.0, sentiment: 1.0, price_value: 1.0 }, 1.0)]
    fn blends_with_default_weights(#[case] scores: SubScores, #[case] expected: f64) {
        assert!((BlendWeights::default().blend(&scores) - expected).abs() < 1e-9);
    }

    #[rstest]
    fn display_rounding_uses_two_decimals() {
        let scores = SubScores {
            geo: 0.5183,
            sentiment: 0.912,
            price_value: 0.333_333,
        };
        let shown = scores.rounded_for_display();
        assert!((shown.geo - 0.52).abs() < 1e-12);
        assert!((shown.sentiment - 0.91).abs() < 1e-12);
        assert!((shown.price_value - 0.33).abs() < 1e-12);
    }

    #[rstest]
    fn partial_weights_deserialise_with_defaults() {
        let weights: BlendWeights =
            serde_json::from_str(r#"{"geo": 0.5}"#).expect("valid weights");
        assert!((weights.geo - 0.5).abs() < f64::EPSILON);
        assert!((weights.sentiment - 0.3).abs() < f64::EPSILON);
        assert!((weights.price - 0.1).abs() < f64::EPSILON);
    }
}
