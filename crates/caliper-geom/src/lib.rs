//! Geometry primitives and query facade for caliper
//!
//! This crate provides:
//! - Analytic curve, polyline and face primitives with parametric evaluation
//! - The `GeometryQuery` trait that geometry drivers implement
//! - An in-memory analytic driver for models built from analytic geometry
//! - Exact closest-point routines between points, segments and triangles

pub mod analytic;
pub mod consts;
pub mod curve;
pub mod distance;
pub mod face;
pub mod query;

// Re-exports for convenience
pub use analytic::AnalyticQuery;
pub use curve::{
    Circle3, CubicBezier3, Curve3, CurveGeometry, CurveKind, EdgeAdaptor, EdgeGeometry, Frame3,
    Line3, Polyline3,
};
pub use face::FaceGeometry;
pub use query::{
    DistanceResult, EntityId, EntityKind, GeometryQuery, NullQuery, Primitive, QueryError,
    QueryResult,
};
