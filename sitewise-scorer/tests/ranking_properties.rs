//! Property tests for ranking and decision-matrix scoring.

use proptest::prelude::*;
use sitewise_scorer::{
    BlendWeights, Criterion, DecisionMatrix, LexiconSentiment, SentimentScorer, SubScores,
    min_rank, normalise_rent,
};

fn unit() -> impl Strategy<Value = f64> {
    0.0..=1.0_f64
}

proptest! {
    #[test]
    fn min_rank_is_one_based_and_order_consistent(values in prop::collection::vec(unit(), 0..20)) {
        let ranks = min_rank(&values);
        prop_assert_eq!(ranks.len(), values.len());
        for (a, rank_a) in values.iter().zip(&ranks) {
            prop_assert!(*rank_a >= 1);
            for (b, rank_b) in values.iter().zip(&ranks) {
                if a > b {
                    prop_assert!(rank_a < rank_b);
                }
                if a.to_bits() == b.to_bits() {
                    prop_assert_eq!(rank_a, rank_b);
                }
            }
        }
        if !values.is_empty() {
            prop_assert!(ranks.contains(&1));
        }
    }

    #[test]
    fn topsis_closeness_is_bounded(
        rows in prop::collection::vec((unit(), unit(), unit()), 1..12),
    ) {
        let weights = BlendWeights::default().as_row();
        let mut matrix = DecisionMatrix::new(weights.into_iter().map(Criterion::benefit).collect());
        for (geo, sentiment, price) in &rows {
            matrix.push_row(vec![*geo, *sentiment, *price]).expect("finite row");
        }
        for closeness in matrix.topsis() {
            prop_assert!((0.0..=1.0).contains(&closeness), "closeness {closeness}");
        }
    }

    #[test]
    fn blend_of_unit_scores_stays_in_unit_interval(geo in unit(), sentiment in unit(), price_value in unit()) {
        let blended = BlendWeights::default().blend(&SubScores { geo, sentiment, price_value });
        prop_assert!((0.0..=1.0).contains(&blended));
    }

    #[test]
    fn rent_value_is_bounded(cost in prop::num::f64::ANY) {
        let value = normalise_rent(cost);
        prop_assert!((0.0..=1.0).contains(&value));
    }

    #[test]
    fn sentiment_is_bounded(reviews in prop::collection::vec("[a-z !]{0,40}", 0..6)) {
        let score = LexiconSentiment::new().score(&reviews);
        prop_assert!((0.0..=1.0).contains(&score));
    }
}
