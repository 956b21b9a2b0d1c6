//! Ranking of preference values.

use serde::{Deserialize, Serialize};

/// How the recommender turns sub-scores into a preference value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RankingMethod {
    /// Linear blend with [`BlendWeights`](crate::BlendWeights).
    #[default]
    WeightedSum,
    /// TOPSIS closeness over the sub-score matrix.
    Topsis,
    /// Simple additive weighting over the sub-score matrix.
    Saw,
}

impl RankingMethod {
    /// Kebab-case name used in configuration and output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WeightedSum => "weighted-sum",
            Self::Topsis => "topsis",
            Self::Saw => "saw",
        }
    }
}

impl std::fmt::Display for RankingMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RankingMethod {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "weighted-sum" => Ok(Self::WeightedSum),
            "topsis" => Ok(Self::Topsis),
            "saw" => Ok(Self::Saw),
            other => Err(format!(
                "unknown ranking method `{other}`; expected weighted-sum, topsis or saw"
            )),
        }
    }
}

/// Rank `values` in descending order; ties share the lowest rank.
///
/// # Examples
/// ```
/// use sitewise_scorer::min_rank;
///
/// assert_eq!(min_rank(&[0.9, 0.7, 0.9]), vec![1, 3, 1]);
/// ```
#[must_use]
pub fn min_rank(values: &[f64]) -> Vec<u32> {
    values
        .iter()
        .map(|value| {
            let better = values
                .iter()
                .filter(|other| other.total_cmp(value).is_gt())
                .count();
            u32::try_from(better).map_or(u32::MAX, |count| count.saturating_add(1))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(&[], &[])]
    #[case(&[0.5], &[1])]
    #[case(&[0.9, 0.7, 0.9], &[1, 3, 1])]
    #[case(&[0.1, 0.2, 0.3], &[3, 2, 1])]
    #[case(&[0.4, 0.4, 0.4], &[1, 1, 1])]
    fn ranks_with_min_ties(#[case] values: &[f64], #[case] expected: &[u32]) {
        assert_eq!(min_rank(values), expected);
    }

    #[rstest]
    #[case("weighted-sum", RankingMethod::WeightedSum)]
    #[case("topsis", RankingMethod::Topsis)]
    #[case("saw", RankingMethod::Saw)]
    fn parses_method_names(#[case] name: &str, #[case] expected: RankingMethod) {
        assert_eq!(name.parse::<RankingMethod>(), Ok(expected));
        assert_eq!(expected.to_string(), name);
    }

    #[rstest]
    fn rejects_unknown_method() {
        assert!("electre".parse::<RankingMethod>().is_err());
    }

    #[rstest]
    fn method_serialises_in_kebab_case() {
        let json = serde_json::to_string(&RankingMethod::WeightedSum).expect("serialise");
        assert_eq!(json, "\"weighted-sum\"");
    }
}
