//! Recommendation requests and the orchestrating [`Recommender`].

use std::collections::BTreeMap;

use log::{debug, info};
use serde::{Deserialize, Serialize};
use sitewise_core::{GeoEngine, IndexedPoiStore, PoiStore, ScoreResult};

use crate::{
    BlendWeights, BusinessCatalog, BusinessProfile, Criterion, DEFAULT_BUSINESS_TYPE,
    DecisionMatrix, LexiconSentiment, REFERENCE_RENT, RankingMethod, RecommendError,
    SentimentScorer, SubScores, explain, facility_labels, min_rank, normalise_rent, round_to,
};

/// One candidate location in a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alternative {
    /// WGS84 latitude in degrees.
    pub lat: f64,
    /// WGS84 longitude in degrees.
    pub lon: f64,
    /// Free-text reviews of the location.
    #[serde(default)]
    pub reviews: Vec<String>,
    /// Annual rent; defaults to [`REFERENCE_RENT`] when absent.
    #[serde(default, alias = "sewa_cost", skip_serializing_if = "Option::is_none")]
    pub rent_cost: Option<f64>,
}

impl Alternative {
    /// Candidate at `lat`/`lon` with no reviews and default rent.
    #[must_use]
    pub const fn at(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            reviews: Vec::new(),
            rent_cost: None,
        }
    }
}

/// A set of candidate locations for one business type.
///
/// # Examples
/// ```
/// use sitewise_scorer::RecommendRequest;
///
/// let request: RecommendRequest = serde_json::from_str(
///     r#"{"business_type": "pharmacy",
///         "alternatives": {"A": {"lat": -6.7, "lon": 108.5, "sewa_cost": 75000000}}}"#,
/// )?;
/// assert_eq!(request.alternatives["A"].rent_cost, Some(75_000_000.0));
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendRequest {
    /// Business type; [`DEFAULT_BUSINESS_TYPE`] when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_type: Option<String>,
    /// Candidates keyed by caller-chosen identifier.
    pub alternatives: BTreeMap<String, Alternative>,
}

/// A ranked, explained candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Identifier from the request.
    pub id: String,
    /// Business type the site was judged for.
    pub business_type: String,
    /// Preference value used for ranking, rounded to four decimals.
    pub final_score: f64,
    /// One-based rank; ties share the lowest rank.
    pub rank: u32,
    /// Sub-scores rounded to two decimals.
    pub scores: SubScores,
    /// Raw geospatial features.
    pub field_data: ScoreResult,
    /// Plain-language reasons.
    pub analysis: Vec<String>,
    /// Facility labels.
    pub tags: Vec<String>,
}

struct Assessment {
    id: String,
    field_data: ScoreResult,
    scores: SubScores,
    analysis: Vec<String>,
}

/// Ranks candidate sites for a business type.
///
/// Holds the geospatial engine, a sentiment scorer, the business catalog,
/// blend weights and the ranking method. All scoring is synchronous and
/// read-only, so one recommender can serve concurrent callers.
pub struct Recommender<S = IndexedPoiStore> {
    engine: GeoEngine<S>,
    sentiment: Box<dyn SentimentScorer>,
    catalog: BusinessCatalog,
    weights: BlendWeights,
    method: RankingMethod,
}

impl<S: PoiStore> Recommender<S> {
    /// Recommender over `engine` with the lexicon sentiment scorer, default
    /// catalog, default weights and weighted-sum ranking.
    #[must_use]
    pub fn new(engine: GeoEngine<S>) -> Self {
        Self {
            engine,
            sentiment: Box::new(LexiconSentiment::new()),
            catalog: BusinessCatalog::default(),
            weights: BlendWeights::default(),
            method: RankingMethod::default(),
        }
    }

    /// Replace the sentiment scorer.
    #[must_use]
    pub fn with_sentiment<T: SentimentScorer + 'static>(mut self, sentiment: T) -> Self {
        self.sentiment = Box::new(sentiment);
        self
    }

    /// Replace the business catalog.
    #[must_use]
    pub fn with_catalog(mut self, catalog: BusinessCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Replace the blend weights.
    #[must_use]
    pub const fn with_weights(mut self, weights: BlendWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Replace the ranking method.
    #[must_use]
    pub const fn with_method(mut self, method: RankingMethod) -> Self {
        self.method = method;
        self
    }

    /// The underlying geospatial engine.
    #[must_use]
    pub const fn engine(&self) -> &GeoEngine<S> {
        &self.engine
    }

    /// The business catalog in use.
    #[must_use]
    pub const fn catalog(&self) -> &BusinessCatalog {
        &self.catalog
    }

    /// Score, explain and rank every alternative in `request`.
    ///
    /// Results are sorted by rank; equal ranks keep identifier order.
    ///
    /// # Errors
    /// Returns [`RecommendError::UnknownBusinessType`] for a type missing from
    /// the catalog, and [`RecommendError::InvalidCoordinate`] or
    /// [`RecommendError::InvalidRent`] for the first malformed alternative.
    pub fn recommend(
        &self,
        request: &RecommendRequest,
    ) -> Result<Vec<Recommendation>, RecommendError> {
        let business_type = request
            .business_type
            .as_deref()
            .unwrap_or(DEFAULT_BUSINESS_TYPE);
        let profile =
            self.catalog
                .get(business_type)
                .ok_or_else(|| RecommendError::UnknownBusinessType {
                    business_type: business_type.to_owned(),
                })?;

        let assessments = request
            .alternatives
            .iter()
            .map(|(id, alternative)| self.assess(id, alternative, profile))
            .collect::<Result<Vec<_>, _>>()?;

        let preferences = self.preferences(&assessments)?;
        let ranks = min_rank(&preferences);

        let mut recommendations: Vec<Recommendation> = assessments
            .into_iter()
            .zip(preferences)
            .zip(ranks)
            .map(|((assessment, final_score), rank)| Recommendation {
                id: assessment.id,
                business_type: business_type.to_owned(),
                final_score,
                rank,
                scores: assessment.scores.rounded_for_display(),
                tags: facility_labels(&assessment.field_data),
                field_data: assessment.field_data,
                analysis: assessment.analysis,
            })
            .collect();
        recommendations.sort_by_key(|recommendation| recommendation.rank);

        info!(
            "ranked {} alternatives for {business_type} using {}",
            recommendations.len(),
            self.method
        );
        Ok(recommendations)
    }

    fn assess(
        &self,
        id: &str,
        alternative: &Alternative,
        profile: &BusinessProfile,
    ) -> Result<Assessment, RecommendError> {
        let rent = alternative.rent_cost.unwrap_or(REFERENCE_RENT);
        if !rent.is_finite() {
            return Err(RecommendError::InvalidRent {
                id: id.to_owned(),
                cost: rent,
            });
        }
        let field_data = self
            .engine
            .score(
                alternative.lat,
                alternative.lon,
                &profile.competitor,
                &profile.support,
            )
            .map_err(|source| RecommendError::InvalidCoordinate {
                id: id.to_owned(),
                source,
            })?;
        let scores = SubScores {
            geo: round_to(field_data.closeness, 10_000.0),
            sentiment: self.sentiment.score(&alternative.reviews),
            price_value: normalise_rent(rent),
        };
        debug!(
            "alternative {id}: geo {:.4}, sentiment {:.3}, price {:.4}",
            scores.geo, scores.sentiment, scores.price_value
        );
        let analysis = explain(&field_data, rent, scores.sentiment);
        Ok(Assessment {
            id: id.to_owned(),
            field_data,
            scores,
            analysis,
        })
    }

    fn preferences(&self, assessments: &[Assessment]) -> Result<Vec<f64>, RecommendError> {
        if self.method == RankingMethod::WeightedSum {
            return Ok(assessments
                .iter()
                .map(|assessment| self.weights.blend(&assessment.scores))
                .collect());
        }

        let mut matrix = DecisionMatrix::new(
            self.weights
                .as_row()
                .into_iter()
                .map(Criterion::benefit)
                .collect(),
        );
        for assessment in assessments {
            matrix.push_row(assessment.scores.as_row().to_vec())?;
        }
        let raw = if self.method == RankingMethod::Topsis {
            matrix.topsis()
        } else {
            matrix.saw()
        };
        Ok(raw
            .into_iter()
            .map(|value| round_to(value, 10_000.0))
            .collect())
    }
}

impl<S> std::fmt::Debug for Recommender<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recommender")
            .field("catalog", &self.catalog)
            .field("weights", &self.weights)
            .field("method", &self.method)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[expect(
    clippy::float_arithmetic,
    clippy::indexing_slicing,
    reason = "assertions compare floating-point values at known positions"
)]
mod tests {
    use super::*;
    use geo::Coord;
    use rstest::{fixture, rstest};
    use sitewise_core::test_support::MemoryStore;
    use sitewise_core::{Categories, GeoPoint, PointOfInterest};

    const SITE: (f64, f64) = (-6.732, 108.552);

    struct Silent;

    impl SentimentScorer for Silent {
        fn score(&self, _reviews: &[String]) -> f64 {
            0.5
        }
    }

    fn offset(dx: f64, dy: f64) -> Coord<f64> {
        let origin = GeoPoint::new(SITE.0, SITE.1)
            .expect("valid site")
            .to_planar();
        Coord {
            x: origin.x + dx,
            y: origin.y + dy,
        }
    }

    #[fixture]
    fn recommender() -> Recommender<MemoryStore> {
        let store = MemoryStore::with_pois([
            PointOfInterest::new(1, offset(100.0, 0.0), Categories::amenity("school")),
            PointOfInterest::new(2, offset(0.0, 150.0), Categories::amenity("bank")),
            PointOfInterest::new(3, offset(-50.0, 0.0), Categories::amenity("cafe")),
        ]);
        Recommender::new(GeoEngine::new(store)).with_sentiment(Silent)
    }

    fn request(business_type: Option<&str>, sites: &[(&str, f64, f64)]) -> RecommendRequest {
        RecommendRequest {
            business_type: business_type.map(str::to_owned),
            alternatives: sites
                .iter()
                .map(|(id, lat, lon)| ((*id).to_owned(), Alternative::at(*lat, *lon)))
                .collect(),
        }
    }

    #[rstest]
    fn defaults_to_restaurant(recommender: Recommender<MemoryStore>) {
        let ranked = recommender
            .recommend(&request(None, &[("A", SITE.0, SITE.1)]))
            .expect("recommendation");
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].business_type, "restaurant");
        assert_eq!(ranked[0].field_data.support_count, 2);
        assert!(ranked[0].field_data.competitor_distance <= 50.0 + 1e-6);
        assert_eq!(ranked[0].rank, 1);
    }

    #[rstest]
    fn empty_request_yields_no_recommendations(recommender: Recommender<MemoryStore>) {
        let ranked = recommender
            .recommend(&request(Some("pharmacy"), &[]))
            .expect("recommendation");
        assert!(ranked.is_empty());
    }

    #[rstest]
    fn unknown_business_type_is_rejected(recommender: Recommender<MemoryStore>) {
        let error = recommender
            .recommend(&request(Some("bakery"), &[("A", SITE.0, SITE.1)]))
            .expect_err("unknown type");
        assert!(matches!(
            error,
            RecommendError::UnknownBusinessType { ref business_type } if business_type == "bakery"
        ));
    }

    #[rstest]
    fn invalid_coordinate_names_the_alternative(recommender: Recommender<MemoryStore>) {
        let error = recommender
            .recommend(&request(None, &[("A", SITE.0, SITE.1), ("B", 91.0, 0.0)]))
            .expect_err("invalid latitude");
        assert!(matches!(error, RecommendError::InvalidCoordinate { ref id, .. } if id == "B"));
        assert!(
            recommender
                .recommend(&request(None, &[("A", SITE.0, SITE.1)]))
                .is_ok()
        );
    }

    #[rstest]
    fn non_finite_rent_is_rejected(recommender: Recommender<MemoryStore>) {
        let mut req = request(None, &[("A", SITE.0, SITE.1)]);
        if let Some(alternative) = req.alternatives.get_mut("A") {
            alternative.rent_cost = Some(f64::NAN);
        }
        let error = recommender.recommend(&req).expect_err("invalid rent");
        assert!(matches!(error, RecommendError::InvalidRent { .. }));
    }

    #[rstest]
    fn closer_to_supports_ranks_first(recommender: Recommender<MemoryStore>) {
        // "far" sits ~11 km north: no coarse neighbours at all.
        let ranked = recommender
            .recommend(&request(
                Some("restaurant"),
                &[("far", SITE.0 + 0.1, SITE.1), ("near", SITE.0, SITE.1)],
            ))
            .expect("recommendation");
        assert_eq!(ranked[0].id, "near");
        assert_eq!(ranked[1].id, "far");
        assert_eq!(ranked[1].field_data.competitor_distance, 5_000.0);
        assert_eq!(ranked[1].scores.geo, 0.0);
        // 0.0 * 0.6 + 0.5 * 0.3 + 1.0 * 0.1
        assert!((ranked[1].final_score - 0.25).abs() < 1e-9);
    }

    #[rstest]
    fn ties_share_rank_and_keep_identifier_order(recommender: Recommender<MemoryStore>) {
        let ranked = recommender
            .recommend(&request(
                None,
                &[("b", SITE.0, SITE.1), ("a", SITE.0, SITE.1)],
            ))
            .expect("recommendation");
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[1].rank, 1);
        assert_eq!(ranked[0].id, "a");
    }

    #[rstest]
    #[case(RankingMethod::Topsis)]
    #[case(RankingMethod::Saw)]
    fn matrix_methods_agree_on_dominant_site(
        recommender: Recommender<MemoryStore>,
        #[case] method: RankingMethod,
    ) {
        let ranked = recommender
            .with_method(method)
            .recommend(&request(
                None,
                &[("far", SITE.0 + 0.1, SITE.1), ("near", SITE.0, SITE.1)],
            ))
            .expect("recommendation");
        assert_eq!(ranked[0].id, "near");
        assert!((0.0..=1.0).contains(&ranked[0].final_score));
    }

    #[rstest]
    fn recommendation_serialises_field_data(recommender: Recommender<MemoryStore>) {
        let ranked = recommender
            .recommend(&request(None, &[("A", SITE.0, SITE.1)]))
            .expect("recommendation");
        let json = serde_json::to_value(&ranked[0]).expect("serialise");
        assert_eq!(json["field_data"]["support_count"], 2);
        assert_eq!(json["scores"]["sentiment"], 0.5);
    }
}
