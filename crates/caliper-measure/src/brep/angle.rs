//! Angle extraction
//!
//! Angle between two linear edges that need not touch in the model. The
//! longer edge is translated along the closest-points vector onto the
//! shorter one, producing two concurrent rays from a shared apex; the
//! result is the unsigned angle between them in [0, pi].

use glam::DVec3;

use caliper_geom::{CurveKind, EntityId, GeometryQuery, Primitive, distance};

use crate::brep::MeasureConfig;
use crate::error::{MeasureError, MeasureResult};
use crate::quantity::Angle;
use crate::types::MeasureAngle;

/// A linear edge reduced to its endpoints
#[derive(Debug, Clone, Copy)]
struct Segment {
    start: DVec3,
    end: DVec3,
}

impl Segment {
    fn dir(&self) -> DVec3 {
        (self.end - self.start).normalize_or_zero()
    }

    fn translated(&self, offset: DVec3) -> Self {
        Self {
            start: self.start + offset,
            end: self.end + offset,
        }
    }

    /// Endpoint farther from the given point
    fn far_endpoint(&self, from: DVec3) -> DVec3 {
        if self.start.distance_squared(from) >= self.end.distance_squared(from) {
            self.start
        } else {
            self.end
        }
    }
}

/// Extract the angle between two linear edges
pub(crate) fn extract_angle<Q: GeometryQuery>(
    query: &Q,
    entity1: EntityId,
    entity2: EntityId,
    config: &MeasureConfig,
) -> MeasureResult<MeasureAngle> {
    let (seg1, len1) = resolve_linear(query, entity1, config)?;
    let (seg2, len2) = resolve_linear(query, entity2, config)?;

    if seg1.dir().cross(seg2.dir()).length() < config.angular_tolerance {
        return Err(MeasureError::ParallelEdges);
    }

    // Shorter edge first: the translation below moves the far edge onto
    // the near one, keeping the error contribution of the longer edge out
    // of the apex construction.
    let (near, far) = if len1 <= len2 {
        (seg1, seg2)
    } else {
        (seg2, seg1)
    };

    let (near_point, far_point, dist) =
        distance::segment_segment(near.start, near.end, far.start, far.end);
    if !dist.is_finite() {
        return Err(MeasureError::Unknown);
    }

    let far = if dist > config.confusion_tolerance {
        tracing::debug!(dist, "angle: translating disjoint edge onto its peer");
        far.translated(near_point - far_point)
    } else {
        far
    };

    let apex = near_point;
    let point1 = near.far_endpoint(apex);
    let point2 = far.far_endpoint(apex);

    let v1 = point1 - apex;
    let v2 = point2 - apex;
    let (l1, l2) = (v1.length(), v2.length());
    if l1 <= config.confusion_tolerance || l2 <= config.confusion_tolerance {
        return Err(MeasureError::Unknown);
    }

    let angle = (v1.dot(v2) / (l1 * l2)).clamp(-1.0, 1.0).acos();
    Ok(MeasureAngle {
        point1,
        point2,
        center: apex,
        angle: Angle::from_radians(angle),
    })
}

/// Resolve an entity into a linear segment and its arc length
fn resolve_linear<Q: GeometryQuery>(
    query: &Q,
    entity: EntityId,
    config: &MeasureConfig,
) -> MeasureResult<(Segment, f64)> {
    let primitive = query
        .resolve(entity)
        .map_err(|_| MeasureError::NotBRepShape)?;

    let Primitive::Edge(geometry) = primitive else {
        return Err(MeasureError::NotLinearEdge);
    };
    let curve = geometry.curve.as_ref().ok_or(MeasureError::NotLinearEdge)?;
    if curve.kind() != CurveKind::Line {
        return Err(MeasureError::NotLinearEdge);
    }

    let length = curve.arc_length(config.length_rel_tolerance);
    Ok((
        Segment {
            start: curve.start_point(),
            end: curve.end_point(),
        },
        length,
    ))
}
