//! Criterion benchmarks for site scoring.
//!
//! Measures `GeoEngine::score` over stores of 1k, 10k and 100k points for
//! both index implementations.
//!
//! Run benchmarks with:
//! ```bash
//! cargo bench --package sitewise-core
//! ```

// Criterion macros generate code that triggers missing_docs warnings.
#![allow(missing_docs, reason = "Criterion macros generate undocumented code")]

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use geo::Coord;
use sitewise_core::{
    Categories, GeoEngine, GeoPoint, GridIndex, IndexedPoiStore, PointOfInterest, TagSet,
};

/// Store sizes to benchmark.
const STORE_SIZES: &[u32] = &[1_000, 10_000, 100_000];

const SITE: (f64, f64) = (-6.732, 108.552);

/// Deterministic points spread over a 20 km square centred on the site.
#[expect(
    clippy::float_arithmetic,
    clippy::integer_division_remainder_used,
    reason = "pseudo-random layout uses modular arithmetic and float offsets"
)]
fn generate_pois(count: u32) -> Vec<PointOfInterest> {
    let origin = GeoPoint::new(SITE.0, SITE.1)
        .expect("valid site")
        .to_planar();
    let labels = ["restaurant", "school", "bank", "mall", "hospital"];
    (0..count)
        .map(|i| {
            let hashed = u64::from(i).wrapping_mul(0x9E37_79B9_7F4A_7C15);
            let dx = f64::from(u32::try_from(hashed % 20_000).expect("fits in u32")) - 10_000.0;
            let dy = f64::from(u32::try_from((hashed >> 20) % 20_000).expect("fits in u32"))
                - 10_000.0;
            let label = labels
                .get(usize::try_from(hashed % 5).expect("fits in usize"))
                .copied()
                .unwrap_or("school");
            PointOfInterest::new(
                u64::from(i),
                Coord {
                    x: origin.x + dx,
                    y: origin.y + dy,
                },
                Categories::amenity(label),
            )
        })
        .collect()
}

fn bench_score(c: &mut Criterion) {
    let competitors: TagSet = ["restaurant"].into_iter().collect();
    let supports: TagSet = ["school", "bank", "mall"].into_iter().collect();
    let mut group = c.benchmark_group("engine_score");

    for &size in STORE_SIZES {
        let pois = generate_pois(size);
        group.throughput(Throughput::Elements(1));

        let rtree = GeoEngine::new(IndexedPoiStore::new(pois.clone()));
        group.bench_with_input(BenchmarkId::new("rtree", size), &rtree, |b, engine| {
            b.iter(|| engine.score(SITE.0, SITE.1, &competitors, &supports));
        });

        let grid = GeoEngine::new(IndexedPoiStore::with_index(pois, |positions| {
            GridIndex::build(positions, GridIndex::DEFAULT_CELL_SIZE).expect("valid cell size")
        }));
        group.bench_with_input(BenchmarkId::new("grid", size), &grid, |b, engine| {
            b.iter(|| engine.score(SITE.0, SITE.1, &competitors, &supports));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_score);
criterion_main!(benches);
