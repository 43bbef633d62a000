//! Measurement error taxonomy
//!
//! A closed set of failure reasons, one per precondition or algorithmic
//! dead-end. Every operation fails fast at the point of detection; there
//! are no partial results and nothing is retried.

use thiserror::Error;

use caliper_geom::QueryError;

/// Error type for measurement operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum MeasureError {
    #[error("Entity must be a vertex")]
    NotVertex,

    #[error("Entity must be a circular edge")]
    NotCircularEdge,

    #[error("Entity must be a B-Rep shape")]
    NotBRepShape,

    #[error("Edge must carry geometric or polygonal data")]
    NotGeometricOrPolygonEdge,

    #[error("Minimum distance computation failed")]
    MinDistanceFailure,

    #[error("All entities must be edges")]
    NotAllEdges,

    #[error("Entity must be a linear edge")]
    NotLinearEdge,

    #[error("All entities must be faces")]
    NotAllFaces,

    #[error("Edges are parallel")]
    ParallelEdges,

    #[error("Unknown error")]
    Unknown,
}

/// Result type for measurement operations
pub type MeasureResult<T> = Result<T, MeasureError>;

// Kernel errors never leak through the engine; anything a call site does
// not map to a specific precondition surfaces as Unknown.
impl From<QueryError> for MeasureError {
    fn from(_: QueryError) -> Self {
        MeasureError::Unknown
    }
}
