//! Measurement backend trait
//!
//! The public contract of the engine, polymorphic over measurement
//! backends. The BRep backend lives in this crate; a mesh backend for
//! discrete entities would implement the same trait. New entity families
//! are added by implementing a new backend, not by modifying existing
//! ones.

use glam::DVec3;

use caliper_geom::EntityId;

use crate::error::MeasureResult;
use crate::types::{
    EntityKindSet, MeasureAngle, MeasureArea, MeasureCircle, MeasureDistance, MeasureLength,
    MeasureType,
};

/// Entity kinds the selection UI may offer for a measurement type
pub fn selection_modes(measure_type: MeasureType) -> EntityKindSet {
    match measure_type {
        MeasureType::None => EntityKindSet::EMPTY,
        MeasureType::VertexPosition => EntityKindSet::VERTEX,
        MeasureType::CircleCenter
        | MeasureType::CircleDiameter
        | MeasureType::Angle
        | MeasureType::Length => EntityKindSet::EDGE,
        MeasureType::MinDistance => EntityKindSet::ALL,
        MeasureType::Area => EntityKindSet::FACE,
    }
}

/// A measurement backend over one family of geometric entities
///
/// Every operation is a pure function of its inputs and the externally
/// resolved geometry; there is no measurement session state.
pub trait MeasureBackend: Send + Sync {
    /// Entity kinds pickable for the given measurement type
    fn selection_modes(&self, measure_type: MeasureType) -> EntityKindSet {
        selection_modes(measure_type)
    }

    /// Whether this backend supports the given measurement type
    fn supports_measure(&self, measure_type: MeasureType) -> bool {
        !matches!(measure_type, MeasureType::None)
    }

    /// Whether the entity's owning driver matches this backend
    fn supports_entity(&self, entity: EntityId) -> bool;

    /// Coordinates of a vertex entity
    fn vertex_position(&self, entity: EntityId) -> MeasureResult<DVec3>;

    /// Circle carried by a circular (or circle-like) edge
    fn circle(&self, entity: EntityId) -> MeasureResult<MeasureCircle>;

    /// Minimum distance between two entities
    fn min_distance(&self, entity1: EntityId, entity2: EntityId)
    -> MeasureResult<MeasureDistance>;

    /// Angle between two linear edges
    fn angle(&self, entity1: EntityId, entity2: EntityId) -> MeasureResult<MeasureAngle>;

    /// Arc length of an edge
    fn length(&self, entity: EntityId) -> MeasureResult<MeasureLength>;

    /// Surface area of a face
    fn area(&self, entity: EntityId) -> MeasureResult<MeasureArea>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use caliper_geom::EntityKind;

    #[test]
    fn test_selection_modes_mapping() {
        assert!(selection_modes(MeasureType::None).is_empty());
        assert_eq!(
            selection_modes(MeasureType::VertexPosition),
            EntityKindSet::VERTEX
        );
        assert_eq!(selection_modes(MeasureType::CircleCenter), EntityKindSet::EDGE);
        assert_eq!(selection_modes(MeasureType::CircleDiameter), EntityKindSet::EDGE);
        assert_eq!(selection_modes(MeasureType::Angle), EntityKindSet::EDGE);
        assert_eq!(selection_modes(MeasureType::Length), EntityKindSet::EDGE);
        assert_eq!(selection_modes(MeasureType::Area), EntityKindSet::FACE);

        let all = selection_modes(MeasureType::MinDistance);
        assert!(all.contains(EntityKind::Vertex));
        assert!(all.contains(EntityKind::Edge));
        assert!(all.contains(EntityKind::Face));
    }
}
