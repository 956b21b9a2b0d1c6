//! Site recommendation on top of the Sitewise geospatial engine.
//!
//! [`Recommender`] takes a set of candidate locations for a business type
//! and combines three criteria per location:
//! - the geospatial opportunity score from [`sitewise_core::GeoEngine`],
//! - review sentiment from a [`SentimentScorer`],
//! - rent value from [`normalise_rent`].
//!
//! The criteria are blended with [`BlendWeights`] (or ranked with TOPSIS or
//! SAW over a [`DecisionMatrix`]), ranked with shared minimum ranks, and
//! annotated with plain-language reasons and facility labels.
//!
//! # Examples
//!
//! ```no_run
//! use camino::Utf8Path;
//! use sitewise_core::GeoEngine;
//! use sitewise_scorer::{Alternative, RecommendRequest, Recommender};
//!
//! let engine = GeoEngine::load(Utf8Path::new("data/poi.geojson")).expect("load dataset");
//! let recommender = Recommender::new(engine);
//!
//! let mut request = RecommendRequest::default();
//! request
//!     .alternatives
//!     .insert("A".to_owned(), Alternative::at(-6.732, 108.552));
//! let ranked = recommender.recommend(&request).expect("recommend");
//! println!("{} ranks first", ranked[0].id);
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod blend;
mod business;
mod decision;
mod error;
mod explain;
mod price;
mod ranking;
mod recommend;
mod sentiment;

pub use blend::{BlendWeights, SubScores};
pub use business::{BusinessCatalog, BusinessProfile, DEFAULT_BUSINESS_TYPE};
pub use decision::{Criterion, CriterionKind, DecisionError, DecisionMatrix};
pub use error::RecommendError;
pub use explain::{explain, facility_labels};
pub use price::{REFERENCE_RENT, normalise_rent};
pub use ranking::{RankingMethod, min_rank};
pub use recommend::{Alternative, RecommendRequest, Recommendation, Recommender};
pub use sentiment::{LexiconSentiment, NEUTRAL_SENTIMENT, SentimentScorer};

/// Round `value` to the precision implied by `scale` (100 for two decimals).
#[expect(clippy::float_arithmetic, reason = "decimal rounding")]
pub(crate) fn round_to(value: f64, scale: f64) -> f64 {
    (value * scale).round() / scale
}
