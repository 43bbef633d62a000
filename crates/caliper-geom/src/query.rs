//! Geometry query facade
//!
//! These traits define the interface a geometry driver must implement for
//! the measurement engine to consume. The engine never assumes a specific
//! kernel; it only requires entity resolution, parametric evaluation (via
//! the resolved geometry) and the distance/area primitives declared here.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::curve::EdgeGeometry;
use crate::face::FaceGeometry;

/// Unique identifier for a geometric entity within its owning driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId {
    /// ID of the model/driver this entity belongs to
    pub owner: Uuid,
    /// Index of the entity within the owner
    pub index: u32,
}

impl EntityId {
    /// Create a new entity ID
    pub fn new(owner: Uuid, index: u32) -> Self {
        Self { owner, index }
    }
}

/// Kind of a BRep sub-shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Vertex,
    Edge,
    Face,
}

/// A resolved geometric entity in the shared model frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Primitive {
    /// A vertex point
    Vertex(DVec3),
    /// An edge with analytic and/or polygonal geometry
    Edge(EdgeGeometry),
    /// A face with an area-integrable surface
    Face(FaceGeometry),
}

impl Primitive {
    /// Kind of the resolved entity
    pub fn kind(&self) -> EntityKind {
        match self {
            Primitive::Vertex(_) => EntityKind::Vertex,
            Primitive::Edge(_) => EntityKind::Edge,
            Primitive::Face(_) => EntityKind::Face,
        }
    }
}

/// Result of a minimum-distance computation between two entities
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceResult {
    /// Closest point on the first entity
    pub point1: DVec3,
    /// Closest point on the second entity
    pub point2: DVec3,
    /// Distance between the two points
    pub distance: f64,
}

/// Error type for geometry query operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("entity is not owned by this geometry driver")]
    UnknownEntity,

    #[error("geometry computation did not converge")]
    NotDone,

    #[error("no geometry backend is available")]
    BackendUnavailable,
}

/// Result type for geometry query operations
pub type QueryResult<T> = Result<T, QueryError>;

/// The geometry query facade consumed by the measurement engine
///
/// Implementations resolve opaque entity handles into concrete geometry
/// expressed in a shared coordinate frame, and provide the two kernel
/// primitives the engine cannot compute itself: minimum distance between
/// arbitrary entities and surface-area integration.
pub trait GeometryQuery: Send + Sync {
    /// Name of this geometry driver
    fn name(&self) -> &str;

    /// Whether the entity is owned by this driver
    fn contains(&self, entity: EntityId) -> bool;

    /// Resolve an entity handle to concrete geometry
    fn resolve(&self, entity: EntityId) -> QueryResult<Primitive>;

    /// Minimum distance between two entities
    fn min_distance(&self, entity1: EntityId, entity2: EntityId) -> QueryResult<DistanceResult>;

    /// Surface area of a face entity
    fn surface_area(&self, entity: EntityId) -> QueryResult<f64>;
}

impl<Q: GeometryQuery + ?Sized> GeometryQuery for &Q {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn contains(&self, entity: EntityId) -> bool {
        (**self).contains(entity)
    }

    fn resolve(&self, entity: EntityId) -> QueryResult<Primitive> {
        (**self).resolve(entity)
    }

    fn min_distance(&self, entity1: EntityId, entity2: EntityId) -> QueryResult<DistanceResult> {
        (**self).min_distance(entity1, entity2)
    }

    fn surface_area(&self, entity: EntityId) -> QueryResult<f64> {
        (**self).surface_area(entity)
    }
}

impl<Q: GeometryQuery + ?Sized> GeometryQuery for std::sync::Arc<Q> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn contains(&self, entity: EntityId) -> bool {
        (**self).contains(entity)
    }

    fn resolve(&self, entity: EntityId) -> QueryResult<Primitive> {
        (**self).resolve(entity)
    }

    fn min_distance(&self, entity1: EntityId, entity2: EntityId) -> QueryResult<DistanceResult> {
        (**self).min_distance(entity1, entity2)
    }

    fn surface_area(&self, entity: EntityId) -> QueryResult<f64> {
        (**self).surface_area(entity)
    }
}

/// A null driver that owns nothing and always fails (used when no
/// geometry source is wired)
#[derive(Debug, Default)]
pub struct NullQuery;

impl GeometryQuery for NullQuery {
    fn name(&self) -> &str {
        "null"
    }

    fn contains(&self, _entity: EntityId) -> bool {
        false
    }

    fn resolve(&self, _entity: EntityId) -> QueryResult<Primitive> {
        Err(QueryError::BackendUnavailable)
    }

    fn min_distance(&self, _entity1: EntityId, _entity2: EntityId) -> QueryResult<DistanceResult> {
        Err(QueryError::BackendUnavailable)
    }

    fn surface_area(&self, _entity: EntityId) -> QueryResult<f64> {
        Err(QueryError::BackendUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_query_owns_nothing() {
        let query = NullQuery;
        let id = EntityId::new(Uuid::new_v4(), 0);
        assert!(!query.contains(id));
        assert_eq!(query.resolve(id), Err(QueryError::BackendUnavailable));
    }

    #[test]
    fn test_entity_id_equality() {
        let owner = Uuid::new_v4();
        assert_eq!(EntityId::new(owner, 3), EntityId::new(owner, 3));
        assert_ne!(EntityId::new(owner, 3), EntityId::new(owner, 4));
    }
}
