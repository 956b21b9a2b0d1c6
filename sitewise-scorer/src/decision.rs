//! Multi-criteria decision matrices ranked with TOPSIS or SAW.
//!
//! Rows are alternatives and columns are criteria. Both methods return one
//! preference value per row, in row order; higher is better.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Whether larger values of a criterion are better or worse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CriterionKind {
    /// Larger is better.
    Benefit,
    /// Smaller is better.
    Cost,
}

/// One column of a [`DecisionMatrix`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    /// Relative importance.
    pub weight: f64,
    /// Direction of preference.
    pub kind: CriterionKind,
}

impl Criterion {
    /// A benefit criterion with `weight`.
    #[must_use]
    pub const fn benefit(weight: f64) -> Self {
        Self {
            weight,
            kind: CriterionKind::Benefit,
        }
    }

    /// A cost criterion with `weight`.
    #[must_use]
    pub const fn cost(weight: f64) -> Self {
        Self {
            weight,
            kind: CriterionKind::Cost,
        }
    }
}

/// Errors returned by [`DecisionMatrix::push_row`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecisionError {
    /// The row does not have one value per criterion.
    #[error("row has {actual} values but the matrix has {expected} criteria")]
    RowWidth {
        /// Number of criteria.
        expected: usize,
        /// Number of values supplied.
        actual: usize,
    },
    /// A value was NaN or infinite.
    #[error("value in column {column} is not finite")]
    NonFinite {
        /// Offending column.
        column: usize,
    },
}

/// Alternatives scored on a fixed set of criteria.
///
/// # Examples
/// ```
/// use sitewise_scorer::{Criterion, DecisionMatrix};
///
/// # fn main() -> Result<(), sitewise_scorer::DecisionError> {
/// let mut matrix = DecisionMatrix::new(vec![Criterion::benefit(0.7), Criterion::cost(0.3)]);
/// matrix.push_row(vec![0.9, 120.0])?;
/// matrix.push_row(vec![0.4, 80.0])?;
///
/// let saw = matrix.saw();
/// assert!(saw[0] > saw[1]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionMatrix {
    criteria: Vec<Criterion>,
    rows: Vec<Vec<f64>>,
}

impl DecisionMatrix {
    /// An empty matrix over `criteria`.
    #[must_use]
    pub const fn new(criteria: Vec<Criterion>) -> Self {
        Self {
            criteria,
            rows: Vec::new(),
        }
    }

    /// Append an alternative.
    ///
    /// # Errors
    /// Returns [`DecisionError`] when the row width differs from the number
    /// of criteria or a value is not finite.
    pub fn push_row(&mut self, values: Vec<f64>) -> Result<(), DecisionError> {
        if values.len() != self.criteria.len() {
            return Err(DecisionError::RowWidth {
                expected: self.criteria.len(),
                actual: values.len(),
            });
        }
        if let Some(column) = values.iter().position(|value| !value.is_finite()) {
            return Err(DecisionError::NonFinite { column });
        }
        self.rows.push(values);
        Ok(())
    }

    /// Number of alternatives.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Report whether the matrix has no alternatives.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn column(&self, index: usize) -> impl Iterator<Item = f64> + '_ {
        self.rows
            .iter()
            .filter_map(move |row| row.get(index).copied())
    }

    /// TOPSIS relative closeness per row.
    ///
    /// Columns are vector-normalised and weighted; each row is compared with
    /// the per-criterion ideal and anti-ideal. A row equidistant at zero from
    /// both (every row identical) scores `0.0`.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "TOPSIS closeness")]
    pub fn topsis(&self) -> Vec<f64> {
        let norms: Vec<f64> = (0..self.criteria.len())
            .map(|j| self.column(j).map(|value| value * value).sum::<f64>().sqrt())
            .collect();
        let weighted: Vec<Vec<f64>> = self
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .zip(&self.criteria)
                    .zip(&norms)
                    .map(|((value, criterion), norm)| {
                        if *norm > 0.0 {
                            value / norm * criterion.weight
                        } else {
                            0.0
                        }
                    })
                    .collect()
            })
            .collect();

        let (ideal, anti_ideal): (Vec<f64>, Vec<f64>) = self
            .criteria
            .iter()
            .enumerate()
            .map(|(j, criterion)| {
                let column = weighted.iter().filter_map(|row| row.get(j).copied());
                let max = column.clone().fold(f64::NEG_INFINITY, f64::max);
                let min = column.fold(f64::INFINITY, f64::min);
                match criterion.kind {
                    CriterionKind::Benefit => (max, min),
                    CriterionKind::Cost => (min, max),
                }
            })
            .unzip();

        weighted
            .iter()
            .map(|row| {
                let to_ideal = euclidean(row, &ideal);
                let to_anti_ideal = euclidean(row, &anti_ideal);
                let denominator = to_ideal + to_anti_ideal;
                if denominator > 0.0 {
                    to_anti_ideal / denominator
                } else {
                    0.0
                }
            })
            .collect()
    }

    /// Simple additive weighting score per row.
    ///
    /// Benefit columns scale by `value / max` (a zero maximum becomes one);
    /// cost columns by `min / value` (a zero minimum becomes `0.001`, a zero
    /// value scores zero).
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "SAW normalisation")]
    pub fn saw(&self) -> Vec<f64> {
        let bounds: Vec<(f64, f64)> = (0..self.criteria.len())
            .map(|j| {
                let max = self.column(j).fold(f64::NEG_INFINITY, f64::max);
                let min = self.column(j).fold(f64::INFINITY, f64::min);
                (
                    if max == 0.0 { 1.0 } else { max },
                    if min == 0.0 { 0.001 } else { min },
                )
            })
            .collect();

        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .zip(&self.criteria)
                    .zip(&bounds)
                    .map(|((value, criterion), (max, min))| {
                        let normalised = match criterion.kind {
                            CriterionKind::Benefit => value / max,
                            CriterionKind::Cost if *value > 0.0 => min / value,
                            CriterionKind::Cost => 0.0,
                        };
                        normalised * criterion.weight
                    })
                    .sum()
            })
            .collect()
    }
}

#[expect(clippy::float_arithmetic, reason = "Euclidean distance")]
fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

#[cfg(test)]
#[expect(
    clippy::float_arithmetic,
    clippy::indexing_slicing,
    reason = "assertions compare floating-point values at known positions"
)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn sites() -> DecisionMatrix {
        let mut matrix = DecisionMatrix::new(vec![
            Criterion::benefit(0.35),
            Criterion::benefit(0.30),
            Criterion::cost(0.15),
            Criterion::cost(0.20),
        ]);
        matrix.push_row(vec![0.8, 0.7, 300.0, 120.0]).expect("valid row");
        matrix.push_row(vec![0.5, 0.9, 900.0, 80.0]).expect("valid row");
        matrix.push_row(vec![0.2, 0.4, 1_500.0, 200.0]).expect("valid row");
        matrix
    }

    #[rstest]
    fn topsis_scores_lie_in_unit_interval(sites: DecisionMatrix) {
        let scores = sites.topsis();
        assert_eq!(scores.len(), 3);
        for score in &scores {
            assert!((0.0..=1.0).contains(score));
        }
        assert!(scores[0] > scores[2]);
        assert!(scores[1] > scores[2]);
    }

    #[rstest]
    fn topsis_prefers_dominant_row() {
        let mut matrix = DecisionMatrix::new(vec![Criterion::benefit(0.5), Criterion::cost(0.5)]);
        matrix.push_row(vec![10.0, 1.0]).expect("valid row");
        matrix.push_row(vec![1.0, 10.0]).expect("valid row");
        let scores = matrix.topsis();
        assert!((scores[0] - 1.0).abs() < 1e-12);
        assert!(scores[1].abs() < 1e-12);
    }

    #[rstest]
    fn topsis_identical_rows_score_zero() {
        let mut matrix = DecisionMatrix::new(vec![Criterion::benefit(1.0)]);
        matrix.push_row(vec![0.4]).expect("valid row");
        matrix.push_row(vec![0.4]).expect("valid row");
        assert_eq!(matrix.topsis(), vec![0.0, 0.0]);
    }

    #[rstest]
    fn saw_matches_hand_computation(sites: DecisionMatrix) {
        let scores = sites.saw();
        // Row 0: 0.8/0.8*0.35 + 0.7/0.9*0.30 + 300/300*0.15 + 80/120*0.20
        let expected = 0.35 + 0.7 / 0.9 * 0.30 + 0.15 + 80.0 / 120.0 * 0.20;
        assert!((scores[0] - expected).abs() < 1e-12);
    }

    #[rstest]
    fn saw_guards_zero_extremes() {
        let mut matrix = DecisionMatrix::new(vec![Criterion::benefit(0.5), Criterion::cost(0.5)]);
        matrix.push_row(vec![0.0, 0.0]).expect("valid row");
        matrix.push_row(vec![0.0, 2.0]).expect("valid row");
        let scores = matrix.saw();
        assert!(scores[0].abs() < 1e-12);
        assert!((scores[1] - 0.001 / 2.0 * 0.5).abs() < 1e-12);
    }

    #[rstest]
    fn rejects_malformed_rows() {
        let mut matrix = DecisionMatrix::new(vec![Criterion::benefit(1.0)]);
        assert_eq!(
            matrix.push_row(vec![1.0, 2.0]),
            Err(DecisionError::RowWidth {
                expected: 1,
                actual: 2
            })
        );
        assert_eq!(
            matrix.push_row(vec![f64::NAN]),
            Err(DecisionError::NonFinite { column: 0 })
        );
        assert!(matrix.is_empty());
    }

    #[rstest]
    fn empty_matrix_scores_nothing() {
        let matrix = DecisionMatrix::new(vec![Criterion::benefit(1.0)]);
        assert!(matrix.topsis().is_empty());
        assert!(matrix.saw().is_empty());
    }
}
