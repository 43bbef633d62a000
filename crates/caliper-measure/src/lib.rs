//! BRep Measurement Engine
//!
//! This crate provides:
//! - A closed measurement error taxonomy with fixed messages
//! - Dimension-typed scalar quantities (length, area, angle)
//! - Result records for each measurement kind
//! - The polymorphic `MeasureBackend` trait
//! - A BRep backend with circle-fitting and skew-edge angle algorithms
//!
//! Entities are referenced by opaque handles owned by an external
//! geometry driver (see `caliper-geom`); every measurement is a pure,
//! synchronous function of the resolved geometry.

pub mod backend;
pub mod brep;
pub mod error;
pub mod quantity;
pub mod sampling;
pub mod types;

// Re-exports for convenience
pub use backend::{MeasureBackend, selection_modes};
pub use brep::{BRepMeasure, MeasureConfig};
pub use error::{MeasureError, MeasureResult};
pub use quantity::{Angle, Area, Length};
pub use types::{
    EntityKindSet, MeasureAngle, MeasureArea, MeasureCircle, MeasureDistance, MeasureLength,
    MeasureType,
};
