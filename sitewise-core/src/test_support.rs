//! Test-only, in-memory `PoiStore` implementation used by unit and behaviour
//! tests.

use geo::Coord;

use crate::{PoiStore, PointOfInterest, planar_distance};

/// In-memory `PoiStore` implementation used in tests.
///
/// The store performs a linear scan and is intended only for small datasets.
#[derive(Default, Debug, Clone)]
pub struct MemoryStore {
    pois: Vec<PointOfInterest>,
}

impl MemoryStore {
    /// Create a store containing a single point of interest.
    #[must_use]
    pub fn with_poi(poi: PointOfInterest) -> Self {
        Self::with_pois(std::iter::once(poi))
    }

    /// Create a store from a collection of points of interest.
    pub fn with_pois<I>(pois: I) -> Self
    where
        I: IntoIterator<Item = PointOfInterest>,
    {
        Self {
            pois: pois.into_iter().collect(),
        }
    }
}

impl PoiStore for MemoryStore {
    fn query_subset(&self, centre: Coord<f64>, radius: f64) -> Vec<&PointOfInterest> {
        if !(radius.is_finite() && radius >= 0.0) {
            return Vec::new();
        }
        self.pois
            .iter()
            .filter(|poi| planar_distance(centre, poi.location) <= radius)
            .collect()
    }

    fn len(&self) -> usize {
        self.pois.len()
    }
}
