//! Core geospatial scoring for the Sitewise engine.
//!
//! Loads a static set of geotagged points of interest, indexes them in
//! planar Web Mercator meters, and scores candidate business sites by the
//! density of supporting facilities nearby and the distance to the nearest
//! competitor. Everything here is synchronous and immutable after load, so
//! one [`GeoEngine`] can be shared across threads by reference.
#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod category;
mod engine;
mod features;
mod opportunity;
mod poi;
mod projection;
mod store;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use category::{TagSet, filter_by_tags};
pub use engine::{EngineConfig, GeoEngine, ScoreResult};
pub use features::{ExtractorConfig, FeatureExtractor, FeatureTuple};
pub use opportunity::{
    OpportunityBreakdown, OpportunityConfigError, OpportunityScorer, OpportunityWeights,
    SaturationThresholds,
};
pub use poi::{Categories, PointOfInterest};
pub use projection::{
    GeoPoint, InvalidCoordinateError, MAX_MERCATOR_LATITUDE, WEB_MERCATOR_RADIUS, planar_distance,
};
pub use store::{
    GridIndex, GridIndexError, IndexedPoiStore, PoiStore, RTreeIndex, SpatialIndex,
};
#[cfg(feature = "store-geojson")]
pub use store::{DataLoadError, read_points};
