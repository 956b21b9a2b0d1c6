//! Spatial indices over planar POI positions.
//!
//! An index is built once from the positions of every loaded record and
//! answers circle queries with record positions (offsets into the store's
//! record vector). Implementations must never omit a point inside the
//! circle; returning extra candidates is allowed because the store applies
//! an exact distance test afterwards.

use std::collections::HashMap;

use geo::Coord;
use rstar::{RTree, primitives::GeomWithData};
use thiserror::Error;

/// Region query contract shared by all index implementations.
///
/// Indices are immutable after construction and must be `Send + Sync` so a
/// single instance can serve concurrent scoring calls without locking.
pub trait SpatialIndex: Send + Sync {
    /// Number of indexed positions.
    fn len(&self) -> usize;

    /// Report whether the index holds no positions.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Offsets of every position that may lie within `radius` meters of
    /// `centre`.
    ///
    /// Every position inside the closed disk must be returned. A negative
    /// or non-finite radius yields no candidates.
    fn candidates_within(&self, centre: Coord<f64>, radius: f64) -> Vec<usize>;
}

fn usable_radius(radius: f64) -> bool {
    radius.is_finite() && radius >= 0.0
}

type IndexedPosition = GeomWithData<[f64; 2], usize>;

/// R\*-tree index, the default for [`crate::IndexedPoiStore`].
///
/// Bulk-loaded once; circle queries are exact.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use sitewise_core::{RTreeIndex, SpatialIndex};
///
/// let index = RTreeIndex::build(&[Coord { x: 0.0, y: 0.0 }, Coord { x: 900.0, y: 0.0 }]);
/// assert_eq!(index.candidates_within(Coord { x: 0.0, y: 0.0 }, 500.0), vec![0]);
/// ```
#[derive(Debug)]
pub struct RTreeIndex {
    tree: RTree<IndexedPosition>,
}

impl RTreeIndex {
    /// Bulk-load an R\*-tree over `positions`.
    #[must_use]
    pub fn build(positions: &[Coord<f64>]) -> Self {
        let entries = positions
            .iter()
            .enumerate()
            .map(|(offset, position)| GeomWithData::new([position.x, position.y], offset))
            .collect();
        Self {
            tree: RTree::bulk_load(entries),
        }
    }
}

impl SpatialIndex for RTreeIndex {
    fn len(&self) -> usize {
        self.tree.size()
    }

    #[expect(clippy::float_arithmetic, reason = "rstar expects a squared radius")]
    fn candidates_within(&self, centre: Coord<f64>, radius: f64) -> Vec<usize> {
        if !usable_radius(radius) {
            return Vec::new();
        }
        self.tree
            .locate_within_distance([centre.x, centre.y], radius * radius)
            .map(|entry| entry.data)
            .collect()
    }
}

/// Errors returned by [`GridIndex::build`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GridIndexError {
    /// The cell size was zero, negative, or not finite.
    #[error("grid cell size must be positive and finite, got {cell_size}")]
    InvalidCellSize {
        /// Rejected cell size in meters.
        cell_size: f64,
    },
}

type CellKey = (i64, i64);

/// Uniform grid of square buckets.
///
/// Queries return every member of the cells overlapping the circle's
/// bounding square, so results contain false positives near the edges.
/// Dense cells make queries proportionally slower; choose a cell size close
/// to the typical query radius.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use sitewise_core::{GridIndex, SpatialIndex};
///
/// # fn main() -> Result<(), sitewise_core::GridIndexError> {
/// let positions = [Coord { x: 10.0, y: 10.0 }, Coord { x: 50_000.0, y: 0.0 }];
/// let index = GridIndex::build(&positions, GridIndex::DEFAULT_CELL_SIZE)?;
/// assert_eq!(index.candidates_within(Coord { x: 0.0, y: 0.0 }, 100.0), vec![0]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct GridIndex {
    cell_size: f64,
    cells: HashMap<CellKey, Vec<usize>>,
    len: usize,
}

impl GridIndex {
    /// Default bucket edge length in meters.
    pub const DEFAULT_CELL_SIZE: f64 = 1_000.0;

    /// Bucket `positions` into square cells of `cell_size` meters.
    ///
    /// # Errors
    /// Returns [`GridIndexError::InvalidCellSize`] when `cell_size` is not a
    /// positive finite number.
    pub fn build(positions: &[Coord<f64>], cell_size: f64) -> Result<Self, GridIndexError> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(GridIndexError::InvalidCellSize { cell_size });
        }
        let mut cells: HashMap<CellKey, Vec<usize>> = HashMap::new();
        for (offset, position) in positions.iter().enumerate() {
            let key = cell_key(cell_size, *position);
            cells.entry(key).or_default().push(offset);
        }
        Ok(Self {
            cell_size,
            cells,
            len: positions.len(),
        })
    }

    /// Edge length of each cell in meters.
    #[must_use]
    pub const fn cell_size(&self) -> f64 {
        self.cell_size
    }
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_possible_truncation,
    reason = "cell coordinates are floored quotients; the cast saturates"
)]
fn cell_key(cell_size: f64, position: Coord<f64>) -> CellKey {
    (
        (position.x / cell_size).floor() as i64,
        (position.y / cell_size).floor() as i64,
    )
}

impl SpatialIndex for GridIndex {
    fn len(&self) -> usize {
        self.len
    }

    #[expect(clippy::float_arithmetic, reason = "bounding square of the circle")]
    fn candidates_within(&self, centre: Coord<f64>, radius: f64) -> Vec<usize> {
        if !usable_radius(radius) {
            return Vec::new();
        }
        let (min_x, min_y) = cell_key(
            self.cell_size,
            Coord {
                x: centre.x - radius,
                y: centre.y - radius,
            },
        );
        let (max_x, max_y) = cell_key(
            self.cell_size,
            Coord {
                x: centre.x + radius,
                y: centre.y + radius,
            },
        );

        let span = (i128::from(max_x) - i128::from(min_x) + 1)
            .saturating_mul(i128::from(max_y) - i128::from(min_y) + 1);
        let occupied = i128::try_from(self.cells.len()).unwrap_or(i128::MAX);

        let mut candidates = Vec::new();
        if span > occupied {
            // Sparse grid relative to the query: walk occupied cells instead.
            for (&(x, y), members) in &self.cells {
                if (min_x..=max_x).contains(&x) && (min_y..=max_y).contains(&y) {
                    candidates.extend_from_slice(members);
                }
            }
        } else {
            for x in min_x..=max_x {
                for y in min_y..=max_y {
                    if let Some(members) = self.cells.get(&(x, y)) {
                        candidates.extend_from_slice(members);
                    }
                }
            }
        }
        candidates
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

    fn exact(positions: &[Coord<f64>], centre: Coord<f64>, radius: f64) -> Vec<usize> {
        positions
            .iter()
            .enumerate()
            .filter(|(_, p)| crate::planar_distance(centre, **p) <= radius)
            .map(|(offset, _)| offset)
            .collect()
    }

    #[fixture]
    fn positions() -> Vec<Coord<f64>> {
        let mut positions = Vec::new();
        for i in -20_i32..=20 {
            for j in -20_i32..=20 {
                positions.push(Coord {
                    x: f64::from(i) * 250.0,
                    y: f64::from(j) * 250.0,
                });
            }
        }
        positions
    }

    #[rstest]
    #[case(Coord { x: 0.0, y: 0.0 }, 500.0)]
    #[case(Coord { x: 125.0, y: -310.0 }, 1_200.0)]
    #[case(Coord { x: 4_900.0, y: 4_900.0 }, 300.0)]
    #[case(Coord { x: 90_000.0, y: 0.0 }, 5_000.0)]
    fn rtree_matches_exact_scan(
        positions: Vec<Coord<f64>>,
        #[case] centre: Coord<f64>,
        #[case] radius: f64,
    ) {
        let index = RTreeIndex::build(&positions);
        let mut found = index.candidates_within(centre, radius);
        found.sort_unstable();
        assert_eq!(found, exact(&positions, centre, radius));
    }

    #[rstest]
    #[case(Coord { x: 0.0, y: 0.0 }, 500.0, 1_000.0)]
    #[case(Coord { x: 125.0, y: -310.0 }, 1_200.0, 300.0)]
    #[case(Coord { x: -4_999.0, y: 2.0 }, 5_000.0, 1_000.0)]
    // Huge radius takes the occupied-cell path.
    #[case(Coord { x: 0.0, y: 0.0 }, 1.0e7, 10.0)]
    fn grid_returns_superset_of_exact_scan(
        positions: Vec<Coord<f64>>,
        #[case] centre: Coord<f64>,
        #[case] radius: f64,
        #[case] cell_size: f64,
    ) {
        let index = GridIndex::build(&positions, cell_size).expect("valid cell size");
        let found = index.candidates_within(centre, radius);
        for offset in exact(&positions, centre, radius) {
            assert!(found.contains(&offset), "missing offset {offset}");
        }
    }

    #[rstest]
    fn point_on_circle_boundary_is_included() {
        let positions = [Coord { x: 500.0, y: 0.0 }];
        let centre = Coord { x: 0.0, y: 0.0 };
        assert_eq!(
            RTreeIndex::build(&positions).candidates_within(centre, 500.0),
            vec![0]
        );
        let grid = GridIndex::build(&positions, 500.0).expect("valid cell size");
        assert_eq!(grid.candidates_within(centre, 500.0), vec![0]);
    }

    #[rstest]
    #[case(-1.0)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn unusable_radius_yields_nothing(positions: Vec<Coord<f64>>, #[case] radius: f64) {
        let centre = Coord { x: 0.0, y: 0.0 };
        assert!(
            RTreeIndex::build(&positions)
                .candidates_within(centre, radius)
                .is_empty()
        );
        let grid = GridIndex::build(&positions, 100.0).expect("valid cell size");
        assert!(grid.candidates_within(centre, radius).is_empty());
    }

    #[rstest]
    #[case(0.0)]
    #[case(-5.0)]
    #[case(f64::NAN)]
    fn grid_rejects_invalid_cell_size(#[case] cell_size: f64) {
        assert!(matches!(
            GridIndex::build(&[], cell_size),
            Err(GridIndexError::InvalidCellSize { .. })
        ));
    }

    #[rstest]
    fn empty_indices_report_empty() {
        assert!(RTreeIndex::build(&[]).is_empty());
        let grid = GridIndex::build(&[], 10.0).expect("valid cell size");
        assert!(grid.is_empty());
        assert_eq!(grid.len(), 0);
    }
}
