//! Site scoring over a loaded point store.

use std::collections::BTreeMap;

#[cfg(feature = "store-geojson")]
use camino::Utf8Path;
use log::debug;

#[cfg(feature = "store-geojson")]
use crate::DataLoadError;
use crate::{
    ExtractorConfig, FeatureExtractor, FeatureTuple, GeoPoint, IndexedPoiStore,
    InvalidCoordinateError, OpportunityScorer, PoiStore, TagSet,
};

/// Tunable parameters of a [`GeoEngine`].
///
/// The defaults are the production values: 5 km coarse radius, 500 m
/// support radius, 5 km no-competitor fallback, 1 m distance floor, weights
/// `0.6/0.4` and saturation at 50 supports or 3 km.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EngineConfig {
    /// Radii and fallbacks for feature extraction.
    pub extractor: ExtractorConfig,
    /// Closeness scorer.
    pub scorer: OpportunityScorer,
}

/// Score of a candidate site with the raw features behind it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoreResult {
    /// Opportunity closeness in `[0, 1]`.
    pub closeness: f64,
    /// Supports within the support radius.
    pub support_count: u32,
    /// Nearest competitor distance in meters, always positive.
    pub competitor_distance: f64,
    /// Counted supports keyed by matched tag.
    pub support_breakdown: BTreeMap<String, u32>,
}

/// Scores candidate sites against one immutable point store.
///
/// Construct once at startup and share by reference; scoring takes `&self`
/// and never blocks.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use sitewise_core::{Categories, GeoEngine, GeoPoint, IndexedPoiStore, PointOfInterest, TagSet};
///
/// # fn main() -> Result<(), sitewise_core::InvalidCoordinateError> {
/// let site = GeoPoint::new(-6.73, 108.55)?;
/// let origin = site.to_planar();
/// let near = Coord { x: origin.x + 200.0, y: origin.y };
/// let engine = GeoEngine::new(IndexedPoiStore::new(vec![
///     PointOfInterest::new(1, near, Categories::amenity("school")),
/// ]));
///
/// let supports: TagSet = ["school"].into_iter().collect();
/// let result = engine.score(-6.73, 108.55, &TagSet::new(), &supports)?;
/// assert_eq!(result.support_count, 1);
/// assert_eq!(result.competitor_distance, 5_000.0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct GeoEngine<S = IndexedPoiStore> {
    store: S,
    extractor: FeatureExtractor,
    scorer: OpportunityScorer,
}

#[cfg(feature = "store-geojson")]
#[cfg_attr(docsrs, doc(cfg(feature = "store-geojson")))]
impl GeoEngine<IndexedPoiStore> {
    /// Load a GeoJSON dataset and build an engine over it.
    ///
    /// # Errors
    /// Returns [`DataLoadError`] when the dataset cannot be loaded.
    pub fn load(path: &Utf8Path) -> Result<Self, DataLoadError> {
        IndexedPoiStore::load(path).map(Self::new)
    }
}

impl<S: PoiStore> GeoEngine<S> {
    /// Build an engine with the default configuration.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self::with_config(store, EngineConfig::default())
    }

    /// Build an engine with explicit parameters.
    #[must_use]
    pub const fn with_config(store: S, config: EngineConfig) -> Self {
        Self {
            store,
            extractor: FeatureExtractor::new(config.extractor),
            scorer: config.scorer,
        }
    }

    /// The point store being queried.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Score the site at (`lat`, `lon`) in WGS84 degrees.
    ///
    /// # Errors
    /// Returns [`InvalidCoordinateError`] when the coordinate is not finite,
    /// out of range, or outside the Web Mercator domain.
    pub fn score(
        &self,
        lat: f64,
        lon: f64,
        competitor_tags: &TagSet,
        support_tags: &TagSet,
    ) -> Result<ScoreResult, InvalidCoordinateError> {
        let site = GeoPoint::new(lat, lon)?;
        Ok(self.score_point(site, competitor_tags, support_tags))
    }

    /// Score an already validated site.
    #[must_use]
    pub fn score_point(
        &self,
        site: GeoPoint,
        competitor_tags: &TagSet,
        support_tags: &TagSet,
    ) -> ScoreResult {
        let query = site.to_planar();
        let Some(features) =
            self.extractor
                .extract(&self.store, query, competitor_tags, support_tags)
        else {
            debug!(
                "no points within {} m of ({}, {}); scoring as desolate",
                self.extractor.config().coarse_radius,
                site.lat(),
                site.lon()
            );
            return ScoreResult {
                closeness: 0.0,
                support_count: 0,
                competitor_distance: self.extractor.config().no_competitor_distance,
                support_breakdown: BTreeMap::new(),
            };
        };

        let FeatureTuple {
            support_count,
            competitor_distance,
            support_breakdown,
        } = features;
        let closeness = self.scorer.score(support_count, competitor_distance);
        debug!(
            "scored ({}, {}): supports={support_count} competitor={competitor_distance:.1}m closeness={closeness:.4}",
            site.lat(),
            site.lon()
        );
        ScoreResult {
            closeness,
            support_count,
            competitor_distance,
            support_breakdown,
        }
    }
}

#[cfg(test)]
#[expect(
    clippy::float_arithmetic,
    reason = "assertions compare floating-point values"
)]
mod tests {
    use super::*;
    use crate::{Categories, PointOfInterest, test_support::MemoryStore};
    use geo::Coord;
    use rstest::rstest;

    const LAT: f64 = -6.971_841;
    const LON: f64 = 108.519_947;

    fn offset(dx: f64, dy: f64) -> Coord<f64> {
        let origin = GeoPoint::new(LAT, LON).expect("valid site").to_planar();
        Coord {
            x: origin.x + dx,
            y: origin.y + dy,
        }
    }

    fn tags(values: &[&str]) -> TagSet {
        values.iter().collect()
    }

    #[rstest]
    fn desolate_site_scores_zero() {
        let engine = GeoEngine::new(MemoryStore::with_poi(PointOfInterest::new(
            1,
            offset(20_000.0, 0.0),
            Categories::amenity("restaurant"),
        )));
        let result = engine
            .score(LAT, LON, &tags(&["restaurant"]), &tags(&["school"]))
            .expect("valid site");
        assert!(result.closeness.abs() < f64::EPSILON);
        assert_eq!(result.support_count, 0);
        assert!((result.competitor_distance - 5_000.0).abs() < f64::EPSILON);
        assert!(result.support_breakdown.is_empty());
    }

    #[rstest]
    fn saturated_site_scores_one() {
        let mut pois: Vec<PointOfInterest> = (0..60_u32)
            .map(|i| {
                PointOfInterest::new(
                    u64::from(i),
                    offset(f64::from(i) * 5.0, 10.0),
                    Categories::amenity("school"),
                )
            })
            .collect();
        pois.push(PointOfInterest::new(
            100,
            offset(0.0, 4_000.0),
            Categories::amenity("restaurant"),
        ));
        let engine = GeoEngine::new(MemoryStore::with_pois(pois));
        let result = engine
            .score(LAT, LON, &tags(&["restaurant"]), &tags(&["school"]))
            .expect("valid site");
        assert_eq!(result.support_count, 60);
        assert!((result.competitor_distance - 4_000.0).abs() < 1e-6);
        assert!((result.closeness - 1.0).abs() < f64::EPSILON);
        assert_eq!(result.support_breakdown.get("school"), Some(&60));
    }

    #[rstest]
    fn invalid_coordinate_is_rejected() {
        let engine = GeoEngine::new(MemoryStore::default());
        assert!(engine.score(f64::NAN, LON, &tags(&[]), &tags(&[])).is_err());
        assert!(engine.score(86.0, LON, &tags(&[]), &tags(&[])).is_err());
    }

    #[rstest]
    fn swapping_tag_lists_changes_roles() {
        let engine = GeoEngine::new(MemoryStore::with_pois([
            PointOfInterest::new(1, offset(100.0, 0.0), Categories::amenity("cafe")),
            PointOfInterest::new(2, offset(0.0, 2_000.0), Categories::amenity("bank")),
        ]));
        let forward = engine
            .score(LAT, LON, &tags(&["cafe"]), &tags(&["bank"]))
            .expect("valid site");
        let swapped = engine
            .score(LAT, LON, &tags(&["bank"]), &tags(&["cafe"]))
            .expect("valid site");
        assert!((forward.competitor_distance - 100.0).abs() < 1e-6);
        assert_eq!(forward.support_count, 0);
        assert!((swapped.competitor_distance - 2_000.0).abs() < 1e-6);
        assert_eq!(swapped.support_count, 1);
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn score_result_keeps_its_field_names_on_the_wire() {
        let result = ScoreResult {
            closeness: 0.25,
            support_count: 2,
            competitor_distance: 1.0,
            support_breakdown: BTreeMap::from([("bank".to_owned(), 2)]),
        };
        let value = serde_json::to_value(&result).expect("serialise result");
        assert_eq!(
            value,
            serde_json::json!({
                "closeness": 0.25,
                "support_count": 2,
                "competitor_distance": 1.0,
                "support_breakdown": {"bank": 2}
            })
        );
        let decoded: ScoreResult = serde_json::from_value(value).expect("deserialise result");
        assert_eq!(decoded, result);
    }
}
