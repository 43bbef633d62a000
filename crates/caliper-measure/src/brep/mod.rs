//! BRep measurement backend
//!
//! Implements [`MeasureBackend`] on top of a [`GeometryQuery`] driver.
//! The thin operations (vertex position, minimum distance, length, area)
//! live here; the circle and angle extraction algorithms have their own
//! modules.

mod angle;
mod circle;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use caliper_geom::{EntityId, GeometryQuery, Primitive, consts};

use crate::backend::MeasureBackend;
use crate::error::{MeasureError, MeasureResult};
use crate::quantity::{Area, Length};
use crate::types::{MeasureAngle, MeasureArea, MeasureCircle, MeasureDistance, MeasureLength};

/// Tunable constants of the measurement algorithms
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasureConfig {
    /// Distance below which two points are considered coincident
    pub confusion_tolerance: f64,
    /// Angle in radians below which two directions are considered parallel
    pub angular_tolerance: f64,
    /// Sample count for the circle-fitting stage
    pub fit_samples: usize,
    /// Minimum number of valid fit samples
    pub min_fit_samples: usize,
    /// Sample count for circle-fit residual verification
    pub verify_samples: usize,
    /// Absolute residual bound for a fitted circle to be accepted
    pub fit_tolerance: f64,
    /// Relative tolerance for arc-length integration
    pub length_rel_tolerance: f64,
    /// Pre-sampling resolution of the quasi-uniform chord table
    pub presample_resolution: usize,
}

impl Default for MeasureConfig {
    fn default() -> Self {
        Self {
            confusion_tolerance: consts::CONFUSION,
            angular_tolerance: consts::ANGULAR,
            fit_samples: 4,
            min_fit_samples: 3,
            verify_samples: 64,
            fit_tolerance: 1e-4,
            length_rel_tolerance: consts::LENGTH_TOLERANCE,
            presample_resolution: 128,
        }
    }
}

impl MeasureConfig {
    /// Create a config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the coincidence tolerance
    pub fn with_confusion_tolerance(mut self, tolerance: f64) -> Self {
        self.confusion_tolerance = tolerance;
        self
    }

    /// Set the parallelism tolerance in radians
    pub fn with_angular_tolerance(mut self, tolerance: f64) -> Self {
        self.angular_tolerance = tolerance;
        self
    }

    /// Set the circle-fit residual bound
    pub fn with_fit_tolerance(mut self, tolerance: f64) -> Self {
        self.fit_tolerance = tolerance;
        self
    }

    /// Set the fitting and verification sample counts
    pub fn with_fit_samples(mut self, fit: usize, verify: usize) -> Self {
        self.fit_samples = fit.max(self.min_fit_samples);
        self.verify_samples = verify;
        self
    }

    /// Set the relative tolerance for arc-length integration
    pub fn with_length_tolerance(mut self, rel_tolerance: f64) -> Self {
        self.length_rel_tolerance = rel_tolerance;
        self
    }
}

/// Measurement backend for BRep entities resolved through a geometry
/// query driver
pub struct BRepMeasure<Q> {
    query: Q,
    config: MeasureConfig,
}

impl<Q: GeometryQuery> BRepMeasure<Q> {
    /// Create a backend over the given driver with default configuration
    pub fn new(query: Q) -> Self {
        Self {
            query,
            config: MeasureConfig::default(),
        }
    }

    /// Create a backend with an explicit configuration
    pub fn with_config(query: Q, config: MeasureConfig) -> Self {
        Self { query, config }
    }

    /// The active configuration
    pub fn config(&self) -> &MeasureConfig {
        &self.config
    }

    /// The underlying geometry driver
    pub fn query(&self) -> &Q {
        &self.query
    }
}

impl<Q: GeometryQuery> MeasureBackend for BRepMeasure<Q> {
    fn supports_entity(&self, entity: EntityId) -> bool {
        self.query.contains(entity)
    }

    fn vertex_position(&self, entity: EntityId) -> MeasureResult<DVec3> {
        match self.query.resolve(entity) {
            Ok(Primitive::Vertex(point)) => Ok(point),
            _ => Err(MeasureError::NotVertex),
        }
    }

    fn circle(&self, entity: EntityId) -> MeasureResult<MeasureCircle> {
        match self.query.resolve(entity) {
            Ok(Primitive::Edge(geometry)) => circle::extract_circle(&geometry, &self.config),
            _ => Err(MeasureError::NotCircularEdge),
        }
    }

    fn min_distance(
        &self,
        entity1: EntityId,
        entity2: EntityId,
    ) -> MeasureResult<MeasureDistance> {
        self.query
            .resolve(entity1)
            .map_err(|_| MeasureError::NotBRepShape)?;
        self.query
            .resolve(entity2)
            .map_err(|_| MeasureError::NotBRepShape)?;

        let result = self
            .query
            .min_distance(entity1, entity2)
            .map_err(|_| MeasureError::MinDistanceFailure)?;

        Ok(MeasureDistance {
            point1: result.point1,
            point2: result.point2,
            distance: Length::new(result.distance),
        })
    }

    fn angle(&self, entity1: EntityId, entity2: EntityId) -> MeasureResult<MeasureAngle> {
        angle::extract_angle(&self.query, entity1, entity2, &self.config)
    }

    fn length(&self, entity: EntityId) -> MeasureResult<MeasureLength> {
        let geometry = match self.query.resolve(entity) {
            Ok(Primitive::Edge(geometry)) => geometry,
            _ => return Err(MeasureError::NotAllEdges),
        };

        // Analytic edges integrate over the parameter domain; edges that
        // only carry a tessellation polygon sum its segments.
        let value = if let Some(curve) = &geometry.curve {
            curve.arc_length(self.config.length_rel_tolerance)
        } else if let Some(polygon) = &geometry.polygon {
            polygon.length()
        } else {
            return Err(MeasureError::NotGeometricOrPolygonEdge);
        };

        Ok(MeasureLength {
            length: Length::new(value),
        })
    }

    fn area(&self, entity: EntityId) -> MeasureResult<MeasureArea> {
        match self.query.resolve(entity) {
            Ok(Primitive::Face(_)) => {}
            _ => return Err(MeasureError::NotAllFaces),
        }

        let value = self
            .query
            .surface_area(entity)
            .map_err(|_| MeasureError::Unknown)?;

        Ok(MeasureArea {
            area: Area::new(value),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MeasureType;
    use approx::assert_abs_diff_eq;
    use caliper_geom::{
        AnalyticQuery, Curve3, EdgeGeometry, EntityKind, FaceGeometry, Frame3, NullQuery,
        Polyline3,
    };
    use glam::DVec3;
    use uuid::Uuid;

    #[test]
    fn test_vertex_position() {
        let query = AnalyticQuery::new();
        let vertex = query.add_vertex(DVec3::new(1.0, -2.0, 3.0));
        let backend = BRepMeasure::new(query);

        let point = backend.vertex_position(vertex).unwrap();
        assert_abs_diff_eq!(point.distance(DVec3::new(1.0, -2.0, 3.0)), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_vertex_position_rejects_edge() {
        let query = AnalyticQuery::new();
        let edge = query.add_curve_edge(Curve3::line_segment(DVec3::ZERO, DVec3::X));
        let backend = BRepMeasure::new(query);

        assert_eq!(backend.vertex_position(edge), Err(MeasureError::NotVertex));
    }

    #[test]
    fn test_supports_entity() {
        let query = AnalyticQuery::new();
        let vertex = query.add_vertex(DVec3::ZERO);
        let backend = BRepMeasure::new(query);

        assert!(backend.supports_entity(vertex));
        assert!(!backend.supports_entity(EntityId::new(Uuid::new_v4(), 0)));
    }

    #[test]
    fn test_supports_measure() {
        let backend = BRepMeasure::new(NullQuery);
        assert!(!backend.supports_measure(MeasureType::None));
        assert!(backend.supports_measure(MeasureType::VertexPosition));
        assert!(backend.supports_measure(MeasureType::MinDistance));
        assert_eq!(
            backend.selection_modes(MeasureType::Length),
            crate::types::EntityKindSet::EDGE
        );
        assert!(
            backend
                .selection_modes(MeasureType::MinDistance)
                .contains(EntityKind::Face)
        );
    }

    #[test]
    fn test_min_distance_between_vertices() {
        let query = AnalyticQuery::new();
        let a = query.add_vertex(DVec3::ZERO);
        let b = query.add_vertex(DVec3::new(3.0, 4.0, 0.0));
        let backend = BRepMeasure::new(query);

        let result = backend.min_distance(a, b).unwrap();
        assert_abs_diff_eq!(result.distance.value(), 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(result.point1.distance(DVec3::ZERO), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(
            result.point2.distance(DVec3::new(3.0, 4.0, 0.0)),
            0.0,
            epsilon = 1e-12
        );
        // The reported distance matches the anchor points
        assert_abs_diff_eq!(
            result.point1.distance(result.point2),
            result.distance.value(),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_min_distance_between_separated_plates() {
        let query = AnalyticQuery::new();
        let u = DVec3::new(0.0, 1.0, 0.0);
        let v = DVec3::new(0.0, 0.0, 1.0);
        let near = query.add_face(FaceGeometry::rectangle(DVec3::ZERO, u, v));
        let far = query.add_face(FaceGeometry::rectangle(DVec3::new(2.5, 0.0, 0.0), u, v));
        let backend = BRepMeasure::new(query);

        let result = backend.min_distance(near, far).unwrap();
        assert_abs_diff_eq!(result.distance.value(), 2.5, epsilon = 1e-12);
    }

    #[test]
    fn test_min_distance_rejects_unknown_entity() {
        let query = AnalyticQuery::new();
        let a = query.add_vertex(DVec3::ZERO);
        let backend = BRepMeasure::new(query);

        let foreign = EntityId::new(Uuid::new_v4(), 7);
        assert_eq!(
            backend.min_distance(a, foreign),
            Err(MeasureError::NotBRepShape)
        );
        assert_eq!(
            backend.min_distance(foreign, a),
            Err(MeasureError::NotBRepShape)
        );
    }

    #[test]
    fn test_length_of_polyline_edge() {
        let query = AnalyticQuery::new();
        // Segments of length 10, 5, 7, 2
        let edge = query.add_polygon_edge(Polyline3::new(vec![
            DVec3::ZERO,
            DVec3::new(10.0, 0.0, 0.0),
            DVec3::new(10.0, 5.0, 0.0),
            DVec3::new(10.0, 5.0, 7.0),
            DVec3::new(8.0, 5.0, 7.0),
        ]));
        let backend = BRepMeasure::new(query);

        let result = backend.length(edge).unwrap();
        assert_abs_diff_eq!(result.length.value(), 24.0, epsilon = 1e-12);
    }

    #[test]
    fn test_length_of_circular_arc() {
        let query = AnalyticQuery::new();
        let frame = Frame3::new(DVec3::ZERO, DVec3::Z, DVec3::X);
        let edge = query.add_curve_edge(Curve3::arc(frame, 2.0, (0.0, std::f64::consts::PI)));
        let backend = BRepMeasure::new(query);

        let result = backend.length(edge).unwrap();
        assert_abs_diff_eq!(
            result.length.value(),
            2.0 * std::f64::consts::PI,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_length_requires_edge() {
        let query = AnalyticQuery::new();
        let vertex = query.add_vertex(DVec3::ZERO);
        let backend = BRepMeasure::new(query);

        assert_eq!(backend.length(vertex), Err(MeasureError::NotAllEdges));
    }

    #[test]
    fn test_length_requires_geometry() {
        let query = AnalyticQuery::new();
        let empty = query.add_edge(EdgeGeometry::default());
        let backend = BRepMeasure::new(query);

        assert_eq!(
            backend.length(empty),
            Err(MeasureError::NotGeometricOrPolygonEdge)
        );
    }

    #[test]
    fn test_area_of_triangulated_face() {
        let query = AnalyticQuery::new();
        let face = query.add_face(FaceGeometry::from_triangles(vec![
            [
                DVec3::ZERO,
                DVec3::new(3.0, 0.0, 0.0),
                DVec3::new(0.0, 4.0, 0.0),
            ],
            [
                DVec3::new(3.0, 0.0, 0.0),
                DVec3::new(3.0, 4.0, 0.0),
                DVec3::new(0.0, 4.0, 0.0),
            ],
        ]));
        let backend = BRepMeasure::new(query);

        let result = backend.area(face).unwrap();
        assert_abs_diff_eq!(result.area.value(), 12.0, epsilon = 1e-12);
    }

    #[test]
    fn test_area_requires_face() {
        let query = AnalyticQuery::new();
        let edge = query.add_curve_edge(Curve3::line_segment(DVec3::ZERO, DVec3::X));
        let backend = BRepMeasure::new(query);

        assert_eq!(backend.area(edge), Err(MeasureError::NotAllFaces));
    }

    #[test]
    fn test_operations_are_pure() {
        let query = AnalyticQuery::new();
        let frame = Frame3::new(DVec3::new(1.0, 2.0, 3.0), DVec3::Z, DVec3::X);
        let rim = query.add_curve_edge(Curve3::full_circle(frame, 1.5));
        let backend = BRepMeasure::new(query);

        let first = backend.circle(rim).unwrap();
        let second = backend.circle(rim).unwrap();
        assert_eq!(first, second);

        let l1 = backend.length(rim).unwrap();
        let l2 = backend.length(rim).unwrap();
        assert_eq!(l1.length.value().to_bits(), l2.length.value().to_bits());
    }

    #[test]
    fn test_config_builders() {
        let config = MeasureConfig::new()
            .with_fit_tolerance(1e-3)
            .with_angular_tolerance(1e-6)
            .with_fit_samples(8, 128);
        assert_eq!(config.fit_tolerance, 1e-3);
        assert_eq!(config.angular_tolerance, 1e-6);
        assert_eq!(config.fit_samples, 8);
        assert_eq!(config.verify_samples, 128);

        let query = AnalyticQuery::new();
        let backend = BRepMeasure::with_config(query, config);
        assert_eq!(backend.config().fit_tolerance, 1e-3);
    }
}
