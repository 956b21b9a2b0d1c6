//! Facade crate for the Sitewise location recommendation engine.
//!
//! This crate re-exports the core geospatial scoring types and, behind the
//! `scorer` feature, the recommendation layer that blends site scores with
//! review sentiment and rent.

#![forbid(unsafe_code)]

#[cfg(feature = "store-geojson")]
pub use sitewise_core::DataLoadError;
pub use sitewise_core::{
    Categories, EngineConfig, ExtractorConfig, FeatureTuple, GeoEngine, GeoPoint,
    GridIndex, IndexedPoiStore, InvalidCoordinateError, OpportunityScorer, PoiStore,
    PointOfInterest, RTreeIndex, ScoreResult, SpatialIndex, TagSet,
};

#[cfg(feature = "scorer")]
pub use sitewise_scorer::{
    Alternative, BlendWeights, BusinessCatalog, BusinessProfile, LexiconSentiment,
    RankingMethod, RecommendError, RecommendRequest, Recommendation, Recommender,
    SentimentScorer,
};
