//! Read-only access to loaded points of interest.
//!
//! The [`PoiStore`] trait answers "which records lie within this circle" in
//! planar meters. [`IndexedPoiStore`] is the production implementation: it
//! owns the records and a [`SpatialIndex`] built over them at load time, and
//! never mutates either afterwards.

#[cfg(feature = "store-geojson")]
use camino::Utf8Path;
use geo::Coord;

use crate::{PointOfInterest, planar_distance};

#[cfg(feature = "store-geojson")]
mod dataset;
mod spatial_index;

#[cfg(feature = "store-geojson")]
#[cfg_attr(docsrs, doc(cfg(feature = "store-geojson")))]
pub use dataset::{DataLoadError, read_points};
pub use spatial_index::{GridIndex, GridIndexError, RTreeIndex, SpatialIndex};

/// Read-only circle queries over points of interest.
///
/// Implementations must be safe to share between threads; the scoring engine
/// serves concurrent requests from one store instance.
///
/// # Examples
///
/// ```rust
/// use geo::Coord;
/// use sitewise_core::{Categories, IndexedPoiStore, PoiStore, PointOfInterest};
///
/// let near = PointOfInterest::new(1, Coord { x: 100.0, y: 0.0 }, Categories::amenity("cafe"));
/// let far = PointOfInterest::new(2, Coord { x: 9_000.0, y: 0.0 }, Categories::amenity("cafe"));
/// let store = IndexedPoiStore::new(vec![near.clone(), far]);
///
/// let found = store.query_subset(Coord { x: 0.0, y: 0.0 }, 5_000.0);
/// assert_eq!(found, vec![&near]);
/// ```
pub trait PoiStore: Send + Sync {
    /// Every record whose planar distance to `centre` is at most `radius`
    /// meters, in load order.
    ///
    /// Containment includes points on the circle. A negative or non-finite
    /// radius yields an empty result.
    fn query_subset(&self, centre: Coord<f64>, radius: f64) -> Vec<&PointOfInterest>;

    /// Number of records held.
    fn len(&self) -> usize;

    /// Report whether the store holds no records.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Records plus the spatial index built over their positions.
#[derive(Debug)]
pub struct IndexedPoiStore<I = RTreeIndex> {
    pois: Vec<PointOfInterest>,
    index: I,
}

impl IndexedPoiStore<RTreeIndex> {
    /// Index `pois` with an R\*-tree.
    #[must_use]
    pub fn new(pois: Vec<PointOfInterest>) -> Self {
        Self::with_index(pois, RTreeIndex::build)
    }

    /// Load a GeoJSON dataset and index it with an R\*-tree.
    ///
    /// # Errors
    /// Returns [`DataLoadError`] when the file cannot be read or parsed, or
    /// yields no usable point features.
    #[cfg(feature = "store-geojson")]
    #[cfg_attr(docsrs, doc(cfg(feature = "store-geojson")))]
    pub fn load(path: &Utf8Path) -> Result<Self, DataLoadError> {
        Ok(Self::new(read_points(path)?))
    }
}

impl<I: SpatialIndex> IndexedPoiStore<I> {
    /// Index `pois` with the index produced by `build`.
    ///
    /// `build` receives the record positions in load order; the offsets it
    /// reports must refer to that order.
    ///
    /// # Examples
    /// ```
    /// use geo::Coord;
    /// use sitewise_core::{GridIndex, IndexedPoiStore, PoiStore, PointOfInterest};
    ///
    /// # fn main() -> Result<(), sitewise_core::GridIndexError> {
    /// let pois = vec![PointOfInterest::uncategorised(1, Coord { x: 0.0, y: 0.0 })];
    /// let index = GridIndex::build(&[Coord { x: 0.0, y: 0.0 }], 250.0)?;
    /// let store = IndexedPoiStore::with_index(pois, |_| index);
    /// assert_eq!(store.len(), 1);
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_index<F>(pois: Vec<PointOfInterest>, build: F) -> Self
    where
        F: FnOnce(&[Coord<f64>]) -> I,
    {
        let positions: Vec<Coord<f64>> = pois.iter().map(|poi| poi.location).collect();
        let index = build(&positions);
        Self { pois, index }
    }

    /// All records in load order.
    #[must_use]
    pub fn pois(&self) -> &[PointOfInterest] {
        &self.pois
    }

    /// The underlying spatial index.
    #[must_use]
    pub const fn index(&self) -> &I {
        &self.index
    }
}

impl<I: SpatialIndex> PoiStore for IndexedPoiStore<I> {
    fn query_subset(&self, centre: Coord<f64>, radius: f64) -> Vec<&PointOfInterest> {
        let mut offsets = self.index.candidates_within(centre, radius);
        offsets.sort_unstable();
        offsets.dedup();
        offsets
            .into_iter()
            .filter_map(|offset| self.pois.get(offset))
            // Indices may over-report; keep only the closed disk.
            .filter(|poi| planar_distance(centre, poi.location) <= radius)
            .collect()
    }

    fn len(&self) -> usize {
        self.pois.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Categories, test_support::MemoryStore};
    use rstest::{fixture, rstest};

    #[fixture]
    fn pois() -> Vec<PointOfInterest> {
        vec![
            PointOfInterest::new(10, Coord { x: 0.0, y: 0.0 }, Categories::amenity("cafe")),
            PointOfInterest::new(11, Coord { x: 499.0, y: 0.0 }, Categories::shop("mall")),
            PointOfInterest::new(12, Coord { x: 0.0, y: 500.0 }, Categories::amenity("bank")),
            PointOfInterest::new(13, Coord { x: 400.0, y: 400.0 }, Categories::amenity("school")),
            PointOfInterest::new(14, Coord { x: 6_000.0, y: 0.0 }, Categories::amenity("cafe")),
        ]
    }

    fn ids(found: &[&PointOfInterest]) -> Vec<u64> {
        found.iter().map(|poi| poi.id).collect()
    }

    #[rstest]
    #[case(500.0, &[10, 11, 12])]
    #[case(566.0, &[10, 11, 12, 13])]
    #[case(0.0, &[10])]
    #[case(10_000.0, &[10, 11, 12, 13, 14])]
    #[case(-1.0, &[])]
    fn rtree_store_filters_by_exact_distance(
        pois: Vec<PointOfInterest>,
        #[case] radius: f64,
        #[case] expected: &[u64],
    ) {
        let store = IndexedPoiStore::new(pois);
        let found = store.query_subset(Coord { x: 0.0, y: 0.0 }, radius);
        assert_eq!(ids(&found), expected);
    }

    #[rstest]
    #[case(500.0, &[10, 11, 12])]
    #[case(566.0, &[10, 11, 12, 13])]
    fn grid_store_agrees_with_rtree_store(
        pois: Vec<PointOfInterest>,
        #[case] radius: f64,
        #[case] expected: &[u64],
    ) {
        let store = IndexedPoiStore::with_index(pois, |positions| {
            GridIndex::build(positions, 1_000.0).expect("valid cell size")
        });
        let found = store.query_subset(Coord { x: 0.0, y: 0.0 }, radius);
        assert_eq!(ids(&found), expected);
    }

    #[rstest]
    fn memory_store_matches_indexed_store(pois: Vec<PointOfInterest>) {
        let memory = MemoryStore::with_pois(pois.clone());
        let indexed = IndexedPoiStore::new(pois);
        let centre = Coord { x: 250.0, y: 100.0 };
        for radius in [0.0, 100.0, 300.0, 700.0, 7_000.0] {
            assert_eq!(
                ids(&memory.query_subset(centre, radius)),
                ids(&indexed.query_subset(centre, radius)),
                "radius {radius}"
            );
        }
    }

    #[rstest]
    fn empty_store_returns_nothing() {
        let store = IndexedPoiStore::new(Vec::new());
        assert!(store.is_empty());
        assert!(
            store
                .query_subset(Coord { x: 0.0, y: 0.0 }, 5_000.0)
                .is_empty()
        );
    }
}
