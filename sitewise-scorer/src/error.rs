//! Error types raised while building recommendations.

use sitewise_core::InvalidCoordinateError;
use thiserror::Error;

use crate::DecisionError;

/// Errors raised by [`Recommender::recommend`](crate::Recommender::recommend).
#[derive(Debug, Error)]
pub enum RecommendError {
    /// The requested business type has no profile in the catalog.
    #[error("unknown business type `{business_type}`")]
    UnknownBusinessType {
        /// Requested type.
        business_type: String,
    },
    /// An alternative carried coordinates outside the supported domain.
    #[error("alternative `{id}` has an invalid coordinate")]
    InvalidCoordinate {
        /// Identifier of the alternative.
        id: String,
        /// Source error from the geospatial engine.
        #[source]
        source: InvalidCoordinateError,
    },
    /// An alternative carried a rent cost that is not a finite number.
    #[error("alternative `{id}` has a non-finite rent cost {cost}")]
    InvalidRent {
        /// Identifier of the alternative.
        id: String,
        /// Offending cost.
        cost: f64,
    },
    /// Building the decision matrix failed.
    #[error("failed to build the decision matrix")]
    Decision(#[from] DecisionError),
}
