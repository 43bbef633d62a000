//! Analytic geometry driver
//!
//! Pure Rust reference implementation of [`GeometryQuery`] backed by an
//! in-memory model store. Minimum distance is exact for point, segment
//! and triangle combinations; curved edges are discretized into chords
//! first.

use std::collections::HashMap;
use std::sync::Mutex;

use glam::DVec3;
use uuid::Uuid;

use crate::consts::DISCRETIZATION_CHORDS;
use crate::curve::{Curve3, CurveKind, EdgeGeometry, Polyline3};
use crate::distance;
use crate::face::FaceGeometry;
use crate::query::{
    DistanceResult, EntityId, GeometryQuery, Primitive, QueryError, QueryResult,
};

/// In-memory geometry driver (keyed by entity index)
pub struct AnalyticQuery {
    /// Owner ID stamped on every entity registered with this driver
    model_id: Uuid,
    store: Mutex<Store>,
}

#[derive(Default)]
struct Store {
    next_index: u32,
    entities: HashMap<u32, Primitive>,
}

impl AnalyticQuery {
    /// Create an empty driver
    pub fn new() -> Self {
        Self {
            model_id: Uuid::new_v4(),
            store: Mutex::new(Store::default()),
        }
    }

    /// The owner ID of entities registered with this driver
    pub fn model_id(&self) -> Uuid {
        self.model_id
    }

    fn insert(&self, primitive: Primitive) -> EntityId {
        let mut store = self.store.lock().unwrap();
        let index = store.next_index;
        store.next_index += 1;
        store.entities.insert(index, primitive);
        EntityId::new(self.model_id, index)
    }

    /// Register a vertex
    pub fn add_vertex(&self, point: DVec3) -> EntityId {
        self.insert(Primitive::Vertex(point))
    }

    /// Register an edge backed by an analytic curve
    pub fn add_curve_edge(&self, curve: Curve3) -> EntityId {
        self.insert(Primitive::Edge(EdgeGeometry::from_curve(curve)))
    }

    /// Register an edge backed only by a discrete polygon
    pub fn add_polygon_edge(&self, polygon: Polyline3) -> EntityId {
        self.insert(Primitive::Edge(EdgeGeometry::from_polygon(polygon)))
    }

    /// Register an edge with explicit geometry
    pub fn add_edge(&self, geometry: EdgeGeometry) -> EntityId {
        self.insert(Primitive::Edge(geometry))
    }

    /// Register a triangulated face
    pub fn add_face(&self, face: FaceGeometry) -> EntityId {
        self.insert(Primitive::Face(face))
    }
}

impl Default for AnalyticQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl GeometryQuery for AnalyticQuery {
    fn name(&self) -> &str {
        "analytic"
    }

    fn contains(&self, entity: EntityId) -> bool {
        entity.owner == self.model_id
            && self.store.lock().unwrap().entities.contains_key(&entity.index)
    }

    fn resolve(&self, entity: EntityId) -> QueryResult<Primitive> {
        if entity.owner != self.model_id {
            return Err(QueryError::UnknownEntity);
        }
        self.store
            .lock()
            .unwrap()
            .entities
            .get(&entity.index)
            .cloned()
            .ok_or(QueryError::UnknownEntity)
    }

    fn min_distance(&self, entity1: EntityId, entity2: EntityId) -> QueryResult<DistanceResult> {
        let shape1 = discretize(&self.resolve(entity1)?)?;
        let shape2 = discretize(&self.resolve(entity2)?)?;
        let (point1, point2, dist) = shape1.closest_pair(&shape2).ok_or(QueryError::NotDone)?;
        Ok(DistanceResult {
            point1,
            point2,
            distance: dist,
        })
    }

    fn surface_area(&self, entity: EntityId) -> QueryResult<f64> {
        match self.resolve(entity)? {
            Primitive::Face(face) => Ok(face.area()),
            _ => Err(QueryError::NotDone),
        }
    }
}

/// Discrete stand-in for a primitive in closest-point queries
enum DiscreteShape {
    Point(DVec3),
    Segments(Vec<[DVec3; 2]>),
    Triangles(Vec<[DVec3; 3]>),
}

fn discretize(primitive: &Primitive) -> QueryResult<DiscreteShape> {
    match primitive {
        Primitive::Vertex(p) => Ok(DiscreteShape::Point(*p)),
        Primitive::Edge(geometry) => {
            if let Some(curve) = &geometry.curve {
                if curve.kind() == CurveKind::Line {
                    return Ok(DiscreteShape::Segments(vec![[
                        curve.start_point(),
                        curve.end_point(),
                    ]]));
                }
                let (t0, t1) = curve.domain();
                let n = DISCRETIZATION_CHORDS;
                let segments = (0..n)
                    .map(|i| {
                        let ta = t0 + (t1 - t0) * i as f64 / n as f64;
                        let tb = t0 + (t1 - t0) * (i + 1) as f64 / n as f64;
                        [curve.point_at(ta), curve.point_at(tb)]
                    })
                    .collect();
                return Ok(DiscreteShape::Segments(segments));
            }
            if let Some(polygon) = &geometry.polygon {
                let segments: Vec<[DVec3; 2]> =
                    polygon.points.windows(2).map(|w| [w[0], w[1]]).collect();
                if !segments.is_empty() {
                    return Ok(DiscreteShape::Segments(segments));
                }
            }
            Err(QueryError::NotDone)
        }
        Primitive::Face(face) => {
            if face.triangles.is_empty() {
                return Err(QueryError::NotDone);
            }
            Ok(DiscreteShape::Triangles(face.triangles.clone()))
        }
    }
}

impl DiscreteShape {
    fn closest_pair(&self, other: &DiscreteShape) -> Option<(DVec3, DVec3, f64)> {
        use DiscreteShape::*;
        let mut best: Option<(DVec3, DVec3, f64)> = None;
        let mut consider = |p: DVec3, q: DVec3, d: f64| {
            if best.is_none_or(|(_, _, bd)| d < bd) {
                best = Some((p, q, d));
            }
        };
        match (self, other) {
            (Point(p), Point(q)) => consider(*p, *q, p.distance(*q)),
            (Point(p), Segments(segs)) => {
                for s in segs {
                    let q = distance::closest_point_segment(*p, s[0], s[1]);
                    consider(*p, q, p.distance(q));
                }
            }
            (Segments(segs), Point(q)) => {
                for s in segs {
                    let p = distance::closest_point_segment(*q, s[0], s[1]);
                    consider(p, *q, p.distance(*q));
                }
            }
            (Point(p), Triangles(tris)) => {
                for t in tris {
                    let (q, d) = distance::point_triangle(*p, t);
                    consider(*p, q, d);
                }
            }
            (Triangles(tris), Point(q)) => {
                for t in tris {
                    let (p, d) = distance::point_triangle(*q, t);
                    consider(p, *q, d);
                }
            }
            (Segments(a), Segments(b)) => {
                for s in a {
                    for t in b {
                        let (p, q, d) = distance::segment_segment(s[0], s[1], t[0], t[1]);
                        consider(p, q, d);
                    }
                }
            }
            (Segments(segs), Triangles(tris)) => {
                for s in segs {
                    for t in tris {
                        let (p, q, d) = distance::segment_triangle(s[0], s[1], t);
                        consider(p, q, d);
                    }
                }
            }
            (Triangles(tris), Segments(segs)) => {
                for s in segs {
                    for t in tris {
                        let (p, q, d) = distance::segment_triangle(s[0], s[1], t);
                        consider(q, p, d);
                    }
                }
            }
            (Triangles(a), Triangles(b)) => {
                for s in a {
                    for t in b {
                        let (p, q, d) = distance::triangle_triangle(s, t);
                        consider(p, q, d);
                    }
                }
            }
        }
        best
    }
}
