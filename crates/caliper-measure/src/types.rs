//! Measurement kinds and result records
//!
//! Results are immutable snapshots computed once and returned by value.
//! Anchor points position on-screen annotations and carry no further
//! computational meaning.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use caliper_geom::{Circle3, EntityKind};

use crate::quantity::{Angle, Area, Length};

/// Kind of measurement requested by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MeasureType {
    /// No measurement selected
    #[default]
    None,
    /// Coordinates of a vertex
    VertexPosition,
    /// Center of a circular edge
    CircleCenter,
    /// Diameter of a circular edge
    CircleDiameter,
    /// Minimum distance between two entities
    MinDistance,
    /// Angle between two linear edges
    Angle,
    /// Arc length of an edge
    Length,
    /// Surface area of a face
    Area,
}

/// A set of entity kinds, used to restrict what the selection UI lets
/// the user pick for a given measurement type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct EntityKindSet(u8);

impl EntityKindSet {
    pub const EMPTY: Self = Self(0);
    pub const VERTEX: Self = Self(1);
    pub const EDGE: Self = Self(2);
    pub const FACE: Self = Self(4);
    pub const ALL: Self = Self(7);

    const fn bit(kind: EntityKind) -> u8 {
        match kind {
            EntityKind::Vertex => 1,
            EntityKind::Edge => 2,
            EntityKind::Face => 4,
        }
    }

    /// Whether the set contains the given kind
    pub const fn contains(self, kind: EntityKind) -> bool {
        self.0 & Self::bit(kind) != 0
    }

    /// Union of two sets
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Whether the set is empty
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for EntityKindSet {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl From<EntityKind> for EntityKindSet {
    fn from(kind: EntityKind) -> Self {
        Self(Self::bit(kind))
    }
}

/// Result of a circle measurement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasureCircle {
    /// Point on the curve used as a visual reference
    pub anchor: DVec3,
    /// Whether the curve is an open arc rather than a full closed loop
    pub is_arc: bool,
    /// The measured circle
    pub circle: Circle3,
}

impl MeasureCircle {
    /// Diameter of the measured circle
    pub fn diameter(&self) -> Length {
        Length::new(self.circle.diameter())
    }

    /// Radius of the measured circle
    pub fn radius(&self) -> Length {
        Length::new(self.circle.radius)
    }
}

/// Result of a minimum-distance measurement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasureDistance {
    /// Closest point on the first entity
    pub point1: DVec3,
    /// Closest point on the second entity
    pub point2: DVec3,
    /// Distance between the two points
    pub distance: Length,
}

/// Result of an angle measurement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasureAngle {
    /// Endpoint of the first ray
    pub point1: DVec3,
    /// Endpoint of the second ray
    pub point2: DVec3,
    /// Shared apex of the two rays
    pub center: DVec3,
    /// Unsigned angle between the rays, in [0, pi]
    pub angle: Angle,
}

/// Result of a length measurement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasureLength {
    /// Arc length of the edge
    pub length: Length,
}

/// Result of an area measurement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasureArea {
    /// Surface area of the face
    pub area: Area,
}
