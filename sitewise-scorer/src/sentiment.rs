//! Review sentiment scoring.
//!
//! [`LexiconSentiment`] scores each review with the VADER rule-based model
//! (lexicon valences adjusted for negation, booster words, ALL-CAPS emphasis,
//! exclamation marks and contrastive "but") and averages the compound
//! polarities of a batch.

use vader_sentiment::SentimentIntensityAnalyzer;

use crate::round_to;

/// Scores a batch of reviews for one location.
///
/// Implementations return a value in `[0, 1]` where `0.5` is neutral, and
/// must return exactly `0.5` for an empty batch.
pub trait SentimentScorer: Send + Sync {
    /// Aggregate sentiment of `reviews`.
    fn score(&self, reviews: &[String]) -> f64;
}

/// Score returned for a location without reviews.
pub const NEUTRAL_SENTIMENT: f64 = 0.5;

const COMPOUND: &str = "compound";

/// VADER review polarity.
///
/// # Examples
/// ```
/// use sitewise_scorer::{LexiconSentiment, SentimentScorer};
///
/// let model = LexiconSentiment::new();
/// assert!(model.polarity("The food was okay") > 0.0);
/// assert!(model.polarity("not good") < 0.0);
/// assert_eq!(model.score(&[]), 0.5);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconSentiment;

impl LexiconSentiment {
    /// Build the model over the bundled VADER lexicon.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Compound polarity of one review in `[-1, 1]`; `0.0` when no lexicon
    /// word occurs.
    #[must_use]
    pub fn polarity(&self, review: &str) -> f64 {
        let analyzer = SentimentIntensityAnalyzer::new();
        analyzer
            .polarity_scores(review)
            .get(COMPOUND)
            .copied()
            .filter(|compound| compound.is_finite())
            .map_or(0.0, |compound| compound.clamp(-1.0, 1.0))
    }
}

impl SentimentScorer for LexiconSentiment {
    #[expect(clippy::float_arithmetic, reason = "mean polarity rescaled to [0, 1]")]
    fn score(&self, reviews: &[String]) -> f64 {
        if reviews.is_empty() {
            return NEUTRAL_SENTIMENT;
        }
        let total: f64 = reviews.iter().map(|review| self.polarity(review)).sum();
        let count = f64::from(u32::try_from(reviews.len()).unwrap_or(u32::MAX));
        let mean = total / count;
        round_to(((mean + 1.0) / 2.0).clamp(0.0, 1.0), 1_000.0)
    }
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
    fn model() -> LexiconSentiment {
        LexiconSentiment::new()
    }

    fn reviews(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|text| (*text).to_owned()).collect()
    }

    #[rstest]
    fn empty_batch_is_neutral(model: LexiconSentiment) {
        assert_eq!(model.score(&[]).to_bits(), NEUTRAL_SENTIMENT.to_bits());
    }

    #[rstest]
    fn unknown_words_are_neutral(model: LexiconSentiment) {
        assert!(model.polarity("the quick brown fox").abs() < f64::EPSILON);
        let score = model.score(&reviews(&["lorem ipsum"]));
        assert!((score - 0.5).abs() < f64::EPSILON);
    }

    #[rstest]
    #[case("Good!", 0.4926)]
    #[case("The food was okay", 0.2263)]
    #[case("not good", -0.3412)]
    #[case("GREAT place", 0.7034)]
    #[case("The food is good but the service is terrible", -0.4939)]
    fn polarity_matches_vader_reference(
        model: LexiconSentiment,
        #[case] text: &str,
        #[case] expected: f64,
    ) {
        let polarity = model.polarity(text);
        assert!((polarity - expected).abs() < 1e-3, "{text}: {polarity}");
    }

    #[rstest]
    fn exclamation_and_capitals_add_emphasis(model: LexiconSentiment) {
        assert!(model.polarity("Good!") > model.polarity("Good"));
        assert!(model.polarity("GREAT place") > model.polarity("great place"));
    }

    #[rstest]
    fn boosters_intensify(model: LexiconSentiment) {
        assert!(model.polarity("very good") > model.polarity("good"));
    }

    #[rstest]
    fn common_mild_words_are_positive(model: LexiconSentiment) {
        assert!(model.polarity("Worth it, fine, decent") > 0.0);
        let score = model.score(&reviews(&["The food was okay"]));
        assert!(score > NEUTRAL_SENTIMENT, "score {score}");
    }

    #[rstest]
    fn mixed_batch_averages_and_rounds(model: LexiconSentiment) {
        let score = model.score(&reviews(&[
            "Great location, always busy",
            "Parking is hard and the road is jammed",
            "Delicious, highly recommended!",
        ]));
        assert!((0.0..=1.0).contains(&score));
        assert!((score * 1_000.0 - (score * 1_000.0).round()).abs() < 1e-9);
    }

    #[rstest]
    fn strongly_positive_batch_exceeds_reputation_threshold(model: LexiconSentiment) {
        let score = model.score(&reviews(&[
            "Amazing food, very friendly staff",
            "Clean and comfortable place, love it",
        ]));
        assert!(score > 0.7, "score {score}");
    }
}
