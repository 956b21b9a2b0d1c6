//! Density and proximity features around a candidate site.

use std::collections::BTreeMap;

use geo::Coord;

use crate::{PoiStore, PointOfInterest, TagSet, filter_by_tags, planar_distance};

/// Radii and fallbacks used when extracting features, all in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtractorConfig {
    /// Radius of the candidate subset fetched from the store.
    pub coarse_radius: f64,
    /// Supports within this radius are counted.
    pub support_radius: f64,
    /// Competitor distance reported when no competitor is in range.
    pub no_competitor_distance: f64,
    /// Lower bound applied to the nearest competitor distance.
    pub min_competitor_distance: f64,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            coarse_radius: 5_000.0,
            support_radius: 500.0,
            no_competitor_distance: 5_000.0,
            min_competitor_distance: 1.0,
        }
    }
}

/// Features describing a site's surroundings.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeatureTuple {
    /// Support points within the support radius.
    pub support_count: u32,
    /// Distance in meters to the nearest competitor, or the fallback.
    pub competitor_distance: f64,
    /// Counted supports keyed by the tag each one matched.
    pub support_breakdown: BTreeMap<String, u32>,
}

/// Computes [`FeatureTuple`]s from a [`PoiStore`].
///
/// # Examples
/// ```
/// use geo::Coord;
/// use sitewise_core::{Categories, FeatureExtractor, IndexedPoiStore, PointOfInterest, TagSet};
///
/// let store = IndexedPoiStore::new(vec![
///     PointOfInterest::new(1, Coord { x: 800.0, y: 0.0 }, Categories::amenity("cafe")),
///     PointOfInterest::new(2, Coord { x: 100.0, y: 0.0 }, Categories::amenity("school")),
/// ]);
/// let competitors: TagSet = ["cafe"].into_iter().collect();
/// let supports: TagSet = ["school"].into_iter().collect();
///
/// let features = FeatureExtractor::default()
///     .extract(&store, Coord { x: 0.0, y: 0.0 }, &competitors, &supports)
///     .expect("points nearby");
/// assert_eq!(features.support_count, 1);
/// assert_eq!(features.competitor_distance, 800.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FeatureExtractor {
    config: ExtractorConfig,
}

impl FeatureExtractor {
    /// Build an extractor with explicit radii.
    #[must_use]
    pub const fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// Radii and fallbacks in use.
    #[must_use]
    pub const fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract features around `query` (planar meters).
    ///
    /// Returns `None` when no point lies within the coarse radius.
    pub fn extract<S>(
        &self,
        store: &S,
        query: Coord<f64>,
        competitor_tags: &TagSet,
        support_tags: &TagSet,
    ) -> Option<FeatureTuple>
    where
        S: PoiStore + ?Sized,
    {
        let candidates = store.query_subset(query, self.config.coarse_radius);
        if candidates.is_empty() {
            return None;
        }
        Some(self.from_candidates(query, &candidates, competitor_tags, support_tags))
    }

    /// Features computed from an already fetched candidate subset.
    ///
    /// Competitors and supports are filtered independently, so a point
    /// matching both tag sets contributes to both features.
    #[must_use]
    pub fn from_candidates(
        &self,
        query: Coord<f64>,
        candidates: &[&PointOfInterest],
        competitor_tags: &TagSet,
        support_tags: &TagSet,
    ) -> FeatureTuple {
        let competitors = filter_by_tags(candidates, competitor_tags);
        let competitor_distance = competitors
            .iter()
            .map(|poi| planar_distance(query, poi.location))
            .reduce(f64::min)
            .map_or(self.config.no_competitor_distance, |nearest| {
                nearest.max(self.config.min_competitor_distance)
            });

        let mut support_count = 0_u32;
        let mut support_breakdown = BTreeMap::new();
        for poi in filter_by_tags(candidates, support_tags) {
            if planar_distance(query, poi.location) > self.config.support_radius {
                continue;
            }
            support_count = support_count.saturating_add(1);
            if let Some(tag) = support_tags.matching_tag(&poi.categories) {
                let count: &mut u32 = support_breakdown.entry(tag.to_owned()).or_default();
                *count = count.saturating_add(1);
            }
        }

        FeatureTuple {
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
    use crate::{Categories, test_support::MemoryStore};
    use rstest::{fixture, rstest};

    fn at(id: u64, x: f64, y: f64, categories: Categories) -> PointOfInterest {
        PointOfInterest::new(id, Coord { x, y }, categories)
    }

    fn tags(values: &[&str]) -> TagSet {
        values.iter().collect()
    }

    const ORIGIN: Coord<f64> = Coord { x: 0.0, y: 0.0 };

    #[fixture]
    fn neighbourhood() -> MemoryStore {
        MemoryStore::with_pois([
            at(1, 1_200.0, 0.0, Categories::amenity("restaurant")),
            at(2, 0.0, -2_500.0, Categories::amenity("restaurant")),
            at(3, 300.0, 0.0, Categories::amenity("school")),
            at(4, 0.0, 500.0, Categories::shop("mall")),
            at(5, 501.0, 0.0, Categories::amenity("school")),
            at(6, 100.0, 100.0, Categories::amenity("bank")),
        ])
    }

    #[rstest]
    fn counts_supports_and_finds_nearest_competitor(neighbourhood: MemoryStore) {
        let features = FeatureExtractor::default()
            .extract(
                &neighbourhood,
                ORIGIN,
                &tags(&["restaurant"]),
                &tags(&["school", "mall"]),
            )
            .expect("points in range");
        assert_eq!(features.support_count, 2);
        assert!((features.competitor_distance - 1_200.0).abs() < 1e-9);
        let breakdown: Vec<(&str, u32)> = features
            .support_breakdown
            .iter()
            .map(|(tag, count)| (tag.as_str(), *count))
            .collect();
        assert_eq!(breakdown, vec![("mall", 1), ("school", 1)]);
    }

    #[rstest]
    fn missing_competitors_use_fallback(neighbourhood: MemoryStore) {
        let features = FeatureExtractor::default()
            .extract(&neighbourhood, ORIGIN, &tags(&["pharmacy"]), &tags(&["bank"]))
            .expect("points in range");
        assert!((features.competitor_distance - 5_000.0).abs() < f64::EPSILON);
        assert_eq!(features.support_count, 1);
    }

    #[rstest]
    fn near_coincident_competitor_is_clamped() {
        let store = MemoryStore::with_poi(at(1, 0.3, 0.0, Categories::amenity("cafe")));
        let features = FeatureExtractor::default()
            .extract(&store, ORIGIN, &tags(&["cafe"]), &tags(&[]))
            .expect("point in range");
        assert!((features.competitor_distance - 1.0).abs() < f64::EPSILON);
        assert_eq!(features.support_count, 0);
    }

    #[rstest]
    fn competitor_beyond_coarse_radius_is_ignored() {
        let store = MemoryStore::with_pois([
            at(1, 5_001.0, 0.0, Categories::amenity("cafe")),
            at(2, 10.0, 0.0, Categories::amenity("school")),
        ]);
        let features = FeatureExtractor::default()
            .extract(&store, ORIGIN, &tags(&["cafe"]), &tags(&["school"]))
            .expect("point in range");
        assert!((features.competitor_distance - 5_000.0).abs() < f64::EPSILON);
    }

    #[rstest]
    fn point_matching_both_lists_counts_twice() {
        let store = MemoryStore::with_poi(at(1, 40.0, 30.0, Categories::amenity("cafe")));
        let both = tags(&["cafe"]);
        let features = FeatureExtractor::default()
            .extract(&store, ORIGIN, &both, &both)
            .expect("point in range");
        assert_eq!(features.support_count, 1);
        assert!((features.competitor_distance - 50.0).abs() < 1e-9);
    }

    #[rstest]
    fn empty_coarse_subset_short_circuits() {
        let store = MemoryStore::with_poi(at(1, 9_000.0, 0.0, Categories::amenity("cafe")));
        assert!(
            FeatureExtractor::default()
                .extract(&store, ORIGIN, &tags(&["cafe"]), &tags(&["cafe"]))
                .is_none()
        );
    }

    #[rstest]
    fn custom_radii_are_honoured(neighbourhood: MemoryStore) {
        let extractor = FeatureExtractor::new(ExtractorConfig {
            support_radius: 600.0,
            ..ExtractorConfig::default()
        });
        let features = extractor
            .extract(&neighbourhood, ORIGIN, &tags(&[]), &tags(&["school", "mall"]))
            .expect("points in range");
        assert_eq!(features.support_count, 3);
    }
}
