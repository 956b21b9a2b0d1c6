//! Property tests for the opportunity scorer and the point store.
#![expect(
    clippy::float_arithmetic,
    reason = "properties compare floating-point scores and distances"
)]

use geo::Coord;
use proptest::prelude::*;
use sitewise_core::{
    Categories, GridIndex, IndexedPoiStore, OpportunityScorer, PoiStore, PointOfInterest,
};

fn planar_pois() -> impl Strategy<Value = Vec<PointOfInterest>> {
    prop::collection::vec((-8_000.0..8_000.0_f64, -8_000.0..8_000.0_f64), 0..200).prop_map(
        |positions| {
            positions
                .into_iter()
                .zip(0_u64..)
                .map(|((x, y), id)| {
                    PointOfInterest::new(id, Coord { x, y }, Categories::amenity("cafe"))
                })
                .collect()
        },
    )
}

proptest! {
    #[test]
    fn closeness_stays_in_unit_interval(support in 0_u32..1_000, distance in 1.0..10_000.0_f64) {
        let closeness = OpportunityScorer::default().score(support, distance);
        prop_assert!((0.0..=1.0).contains(&closeness));
    }

    #[test]
    fn closeness_never_drops_with_more_supports(support in 0_u32..60, distance in 1.0..5_000.0_f64) {
        let scorer = OpportunityScorer::default();
        prop_assert!(scorer.score(support + 1, distance) >= scorer.score(support, distance));
    }

    #[test]
    fn closeness_never_drops_with_farther_competitors(
        support in 0_u32..60,
        distance in 1.0..4_000.0_f64,
        step in 1.0..1_000.0_f64,
    ) {
        let scorer = OpportunityScorer::default();
        prop_assert!(scorer.score(support, distance + step) >= scorer.score(support, distance));
    }

    #[test]
    fn saturation_scores_exactly_one(support in 50_u32..10_000, distance in 3_000.0..50_000.0_f64) {
        prop_assert_eq!(OpportunityScorer::default().score(support, distance).to_bits(), 1.0_f64.to_bits());
    }

    #[test]
    fn scoring_is_deterministic(support in 0_u32..100, distance in 1.0..6_000.0_f64) {
        let scorer = OpportunityScorer::default();
        prop_assert_eq!(scorer.score(support, distance).to_bits(), scorer.score(support, distance).to_bits());
    }

    #[test]
    fn grid_and_rtree_stores_return_identical_subsets(
        pois in planar_pois(),
        cx in -6_000.0..6_000.0_f64,
        cy in -6_000.0..6_000.0_f64,
        radius in 0.0..6_000.0_f64,
        cell in 50.0..3_000.0_f64,
    ) {
        let rtree = IndexedPoiStore::new(pois.clone());
        let grid = IndexedPoiStore::with_index(pois, |positions| {
            GridIndex::build(positions, cell).expect("positive cell size")
        });
        let centre = Coord { x: cx, y: cy };
        let from_rtree: Vec<u64> = rtree.query_subset(centre, radius).iter().map(|poi| poi.id).collect();
        let from_grid: Vec<u64> = grid.query_subset(centre, radius).iter().map(|poi| poi.id).collect();
        prop_assert_eq!(from_rtree, from_grid);
    }

    #[test]
    fn query_subset_returns_exactly_the_closed_disk(
        pois in planar_pois(),
        cx in -6_000.0..6_000.0_f64,
        cy in -6_000.0..6_000.0_f64,
        radius in 0.0..6_000.0_f64,
    ) {
        let store = IndexedPoiStore::new(pois.clone());
        let centre = Coord { x: cx, y: cy };
        let found: Vec<u64> = store.query_subset(centre, radius).iter().map(|poi| poi.id).collect();
        let expected: Vec<u64> = pois
            .iter()
            .filter(|poi| sitewise_core::planar_distance(centre, poi.location) <= radius)
            .map(|poi| poi.id)
            .collect();
        prop_assert_eq!(found, expected);
    }
}
