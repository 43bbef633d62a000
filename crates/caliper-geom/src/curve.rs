//! Analytic curves and edge geometry
//!
//! Curve types mirror what a BRep kernel reports for an edge: an analytic
//! curve over a parameter domain, a discrete polygon, or both. The
//! [`EdgeAdaptor`] gives the measurement layer a single evaluation view
//! over either representation.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::consts::CONFUSION;

/// Classification tag reported for an edge's geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CurveKind {
    /// Straight line segment
    Line,
    /// Circle or circular arc
    Circle,
    /// Ellipse or elliptical arc
    Ellipse,
    /// Generic analytic curve (cubic Bezier)
    Generic,
    /// Discrete polygonal polyline
    Polyline,
}

/// A circle in 3D space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle3 {
    /// Center point
    pub center: DVec3,
    /// Normal of the circle plane (unit length)
    pub axis: DVec3,
    /// Radius (non-negative)
    pub radius: f64,
}

impl Circle3 {
    /// Create a circle, normalizing the axis
    pub fn new(center: DVec3, axis: DVec3, radius: f64) -> Self {
        Self {
            center,
            axis: axis.normalize(),
            radius: radius.abs(),
        }
    }

    /// Diameter of the circle
    pub fn diameter(&self) -> f64 {
        2.0 * self.radius
    }
}

/// An orthonormal placement frame for planar curves
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame3 {
    /// Origin of the frame
    pub origin: DVec3,
    /// Plane normal (unit length)
    pub axis: DVec3,
    /// Reference direction in the plane (unit length, orthogonal to axis)
    pub x_dir: DVec3,
}

impl Frame3 {
    /// Create a frame, normalizing the axis and projecting the reference
    /// direction into the plane
    pub fn new(origin: DVec3, axis: DVec3, x_dir: DVec3) -> Self {
        let axis = axis.normalize();
        let x_dir = (x_dir - axis * x_dir.dot(axis)).normalize();
        Self { origin, axis, x_dir }
    }

    /// Create a frame from origin and axis with an arbitrary reference
    /// direction in the plane
    pub fn from_axis(origin: DVec3, axis: DVec3) -> Self {
        let axis = axis.normalize();
        Self {
            origin,
            axis,
            x_dir: axis.any_orthonormal_vector(),
        }
    }

    /// Second in-plane direction, completing the right-handed frame
    pub fn y_dir(&self) -> DVec3 {
        self.axis.cross(self.x_dir)
    }
}

/// An infinite line carrier for linear edges
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line3 {
    /// A point on the line
    pub origin: DVec3,
    /// Direction (unit length)
    pub dir: DVec3,
}

impl Line3 {
    /// Create a line, normalizing the direction. A zero direction yields
    /// a degenerate line that evaluates to its origin everywhere
    pub fn new(origin: DVec3, dir: DVec3) -> Self {
        Self {
            origin,
            dir: dir.normalize_or_zero(),
        }
    }
}

/// A cubic Bezier segment, the generic analytic curve produced by
/// format conversion and approximation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CubicBezier3 {
    pub p0: DVec3,
    pub p1: DVec3,
    pub p2: DVec3,
    pub p3: DVec3,
}

impl CubicBezier3 {
    pub fn new(p0: DVec3, p1: DVec3, p2: DVec3, p3: DVec3) -> Self {
        Self { p0, p1, p2, p3 }
    }

    /// Evaluate the point at parameter t in [0, 1]
    pub fn point_at(&self, t: f64) -> DVec3 {
        let u = 1.0 - t;
        self.p0 * (u * u * u)
            + self.p1 * (3.0 * u * u * t)
            + self.p2 * (3.0 * u * t * t)
            + self.p3 * (t * t * t)
    }

    /// Evaluate the first derivative at parameter t in [0, 1]
    pub fn derivative_at(&self, t: f64) -> DVec3 {
        let u = 1.0 - t;
        (self.p1 - self.p0) * (3.0 * u * u)
            + (self.p2 - self.p1) * (6.0 * u * t)
            + (self.p3 - self.p2) * (3.0 * t * t)
    }
}

/// A discrete polyline, the representation carried by tessellation-only
/// edges. Parametrized by cumulative chord length over [0, length]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline3 {
    /// Vertices in order
    pub points: Vec<DVec3>,
}

impl Polyline3 {
    pub fn new(points: Vec<DVec3>) -> Self {
        Self { points }
    }

    /// Total length (sum of segment lengths)
    pub fn length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| (w[1] - w[0]).length())
            .sum()
    }

    /// Whether the first and last vertices coincide
    pub fn is_closed(&self) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(a), Some(b)) => a.distance(*b) <= CONFUSION && self.points.len() > 2,
            _ => false,
        }
    }

    /// Point at arc-length parameter s in [0, length]
    pub fn point_at(&self, s: f64) -> DVec3 {
        let Some(&first) = self.points.first() else {
            return DVec3::ZERO;
        };
        let mut remaining = s.max(0.0);
        for w in self.points.windows(2) {
            let seg = w[1] - w[0];
            let len = seg.length();
            if remaining <= len {
                return if len > 0.0 {
                    w[0] + seg * (remaining / len)
                } else {
                    w[0]
                };
            }
            remaining -= len;
        }
        self.points.last().copied().unwrap_or(first)
    }

    /// Unit direction of the segment containing arc-length parameter s
    pub fn tangent_at(&self, s: f64) -> DVec3 {
        let mut remaining = s.max(0.0);
        let mut last_dir = DVec3::ZERO;
        for w in self.points.windows(2) {
            let seg = w[1] - w[0];
            let len = seg.length();
            if len > 0.0 {
                last_dir = seg / len;
            }
            if remaining <= len {
                return last_dir;
            }
            remaining -= len;
        }
        last_dir
    }
}

/// The analytic geometry carried by a curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CurveGeometry {
    /// Straight line; the parameter is the signed distance along `dir`
    Line(Line3),
    /// Circle; the parameter is the angle from `frame.x_dir`
    Circle { frame: Frame3, radius: f64 },
    /// Ellipse; the parameter is the angle from the major axis `frame.x_dir`
    Ellipse {
        frame: Frame3,
        major_radius: f64,
        minor_radius: f64,
    },
    /// Cubic Bezier over [0, 1]
    Bezier(CubicBezier3),
}

/// An analytic curve restricted to a parameter domain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Curve3 {
    geometry: CurveGeometry,
    domain: (f64, f64),
}

impl Curve3 {
    /// Create a curve over an explicit parameter domain
    pub fn new(geometry: CurveGeometry, domain: (f64, f64)) -> Self {
        Self { geometry, domain }
    }

    /// Line segment from `start` to `end`; the domain spans the segment
    /// length so the parameter is arc length
    pub fn line_segment(start: DVec3, end: DVec3) -> Self {
        let dir = end - start;
        let len = dir.length();
        Self {
            geometry: CurveGeometry::Line(Line3::new(start, dir)),
            domain: (0.0, len),
        }
    }

    /// Full circle (domain spans one turn)
    pub fn full_circle(frame: Frame3, radius: f64) -> Self {
        Self {
            geometry: CurveGeometry::Circle { frame, radius },
            domain: (0.0, std::f64::consts::TAU),
        }
    }

    /// Circular arc over an angle domain
    pub fn arc(frame: Frame3, radius: f64, domain: (f64, f64)) -> Self {
        Self {
            geometry: CurveGeometry::Circle { frame, radius },
            domain,
        }
    }

    /// Elliptical arc over an angle domain; `frame.x_dir` is the major axis
    pub fn ellipse_arc(
        frame: Frame3,
        major_radius: f64,
        minor_radius: f64,
        domain: (f64, f64),
    ) -> Self {
        Self {
            geometry: CurveGeometry::Ellipse {
                frame,
                major_radius,
                minor_radius,
            },
            domain,
        }
    }

    /// Cubic Bezier over [0, 1]
    pub fn bezier(bezier: CubicBezier3) -> Self {
        Self {
            geometry: CurveGeometry::Bezier(bezier),
            domain: (0.0, 1.0),
        }
    }

    /// The underlying analytic geometry
    pub fn geometry(&self) -> &CurveGeometry {
        &self.geometry
    }

    /// Parameter domain
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Classification tag
    pub fn kind(&self) -> CurveKind {
        match self.geometry {
            CurveGeometry::Line(_) => CurveKind::Line,
            CurveGeometry::Circle { .. } => CurveKind::Circle,
            CurveGeometry::Ellipse { .. } => CurveKind::Ellipse,
            CurveGeometry::Bezier(_) => CurveKind::Generic,
        }
    }

    /// The analytic circle, if this curve is natively circular
    pub fn as_circle(&self) -> Option<Circle3> {
        match &self.geometry {
            CurveGeometry::Circle { frame, radius } => {
                Some(Circle3::new(frame.origin, frame.axis, *radius))
            }
            _ => None,
        }
    }

    /// Frame and radii, if this curve is natively elliptical
    pub fn as_ellipse(&self) -> Option<(Frame3, f64, f64)> {
        match &self.geometry {
            CurveGeometry::Ellipse {
                frame,
                major_radius,
                minor_radius,
            } => Some((*frame, *major_radius, *minor_radius)),
            _ => None,
        }
    }

    /// The carrier line, if this curve is natively linear
    pub fn as_line(&self) -> Option<Line3> {
        match &self.geometry {
            CurveGeometry::Line(line) => Some(*line),
            _ => None,
        }
    }

    /// Evaluate the point at parameter t
    pub fn point_at(&self, t: f64) -> DVec3 {
        match &self.geometry {
            CurveGeometry::Line(line) => line.origin + line.dir * t,
            CurveGeometry::Circle { frame, radius } => {
                frame.origin + (frame.x_dir * t.cos() + frame.y_dir() * t.sin()) * *radius
            }
            CurveGeometry::Ellipse {
                frame,
                major_radius,
                minor_radius,
            } => {
                frame.origin
                    + frame.x_dir * (major_radius * t.cos())
                    + frame.y_dir() * (minor_radius * t.sin())
            }
            CurveGeometry::Bezier(bezier) => bezier.point_at(t),
        }
    }

    /// Evaluate the first derivative at parameter t
    pub fn tangent_at(&self, t: f64) -> DVec3 {
        match &self.geometry {
            CurveGeometry::Line(line) => line.dir,
            CurveGeometry::Circle { frame, radius } => {
                (frame.y_dir() * t.cos() - frame.x_dir * t.sin()) * *radius
            }
            CurveGeometry::Ellipse {
                frame,
                major_radius,
                minor_radius,
            } => frame.y_dir() * (minor_radius * t.cos()) - frame.x_dir * (major_radius * t.sin()),
            CurveGeometry::Bezier(bezier) => bezier.derivative_at(t),
        }
    }

    /// Start-parameter position
    pub fn start_point(&self) -> DVec3 {
        self.point_at(self.domain.0)
    }

    /// End-parameter position
    pub fn end_point(&self) -> DVec3 {
        self.point_at(self.domain.1)
    }

    /// Whether the domain spans a closed loop (endpoints coincide)
    pub fn is_closed(&self) -> bool {
        self.start_point().distance(self.end_point()) <= CONFUSION
    }

    /// Arc length over the domain. Lines and circles are exact; other
    /// curves are integrated by adaptive Simpson quadrature to the given
    /// relative tolerance
    pub fn arc_length(&self, rel_tol: f64) -> f64 {
        let (t0, t1) = self.domain;
        match &self.geometry {
            CurveGeometry::Line(_) => (t1 - t0).abs(),
            CurveGeometry::Circle { radius, .. } => radius * (t1 - t0).abs(),
            _ => adaptive_simpson(&|t| self.tangent_at(t).length(), t0, t1, rel_tol),
        }
    }
}

/// Adaptive Simpson quadrature with a relative error target and a bounded
/// recursion depth
fn adaptive_simpson(f: &dyn Fn(f64) -> f64, a: f64, b: f64, rel_tol: f64) -> f64 {
    fn simpson(a: f64, fa: f64, b: f64, fb: f64, fm: f64) -> f64 {
        (b - a) / 6.0 * (fa + 4.0 * fm + fb)
    }

    #[allow(clippy::too_many_arguments)]
    fn recurse(
        f: &dyn Fn(f64) -> f64,
        a: f64,
        fa: f64,
        b: f64,
        fb: f64,
        fm: f64,
        whole: f64,
        eps: f64,
        depth: u32,
    ) -> f64 {
        let m = 0.5 * (a + b);
        let lm = 0.5 * (a + m);
        let rm = 0.5 * (m + b);
        let flm = f(lm);
        let frm = f(rm);
        let left = simpson(a, fa, m, fm, flm);
        let right = simpson(m, fm, b, fb, frm);
        let delta = left + right - whole;
        if depth == 0 || delta.abs() <= 15.0 * eps {
            return left + right + delta / 15.0;
        }
        recurse(f, a, fa, m, fm, flm, left, 0.5 * eps, depth - 1)
            + recurse(f, m, fm, b, fb, frm, right, 0.5 * eps, depth - 1)
    }

    if a == b {
        return 0.0;
    }
    let fa = f(a);
    let fb = f(b);
    let fm = f(0.5 * (a + b));
    let whole = simpson(a, fa, b, fb, fm);
    let eps = rel_tol * whole.abs().max(1e-12);
    recurse(f, a, fa, b, fb, fm, whole, eps, 20)
}

/// Geometry carried by a BRep edge: an analytic curve, a discrete polygon,
/// or both. Tessellation-only imports carry just the polygon
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EdgeGeometry {
    /// Analytic curve with parameter domain, if present
    pub curve: Option<Curve3>,
    /// Discrete polygonal representation, if present
    pub polygon: Option<Polyline3>,
}

impl EdgeGeometry {
    /// Edge backed by an analytic curve
    pub fn from_curve(curve: Curve3) -> Self {
        Self {
            curve: Some(curve),
            polygon: None,
        }
    }

    /// Edge backed only by a discrete polygon
    pub fn from_polygon(polygon: Polyline3) -> Self {
        Self {
            curve: None,
            polygon: Some(polygon),
        }
    }
}

/// Uniform evaluation view over an edge's geometry, preferring the
/// analytic curve over the discrete polygon
#[derive(Debug, Clone, Copy)]
pub struct EdgeAdaptor<'a> {
    repr: Repr<'a>,
}

#[derive(Debug, Clone, Copy)]
enum Repr<'a> {
    Curve(&'a Curve3),
    Polygon(&'a Polyline3),
}

impl<'a> EdgeAdaptor<'a> {
    /// Build an adaptor over the edge, or None if the edge carries no
    /// usable geometry
    pub fn new(edge: &'a EdgeGeometry) -> Option<Self> {
        if let Some(curve) = &edge.curve {
            Some(Self {
                repr: Repr::Curve(curve),
            })
        } else if let Some(polygon) = &edge.polygon {
            if polygon.points.len() < 2 {
                return None;
            }
            Some(Self {
                repr: Repr::Polygon(polygon),
            })
        } else {
            None
        }
    }

    /// The analytic curve, if this adaptor wraps one
    pub fn curve(&self) -> Option<&'a Curve3> {
        match self.repr {
            Repr::Curve(curve) => Some(curve),
            Repr::Polygon(_) => None,
        }
    }

    /// Classification tag of the wrapped geometry
    pub fn kind(&self) -> CurveKind {
        match self.repr {
            Repr::Curve(curve) => curve.kind(),
            Repr::Polygon(_) => CurveKind::Polyline,
        }
    }

    /// Parameter domain
    pub fn domain(&self) -> (f64, f64) {
        match self.repr {
            Repr::Curve(curve) => curve.domain(),
            Repr::Polygon(polygon) => (0.0, polygon.length()),
        }
    }

    /// Point at parameter t
    pub fn point_at(&self, t: f64) -> DVec3 {
        match self.repr {
            Repr::Curve(curve) => curve.point_at(t),
            Repr::Polygon(polygon) => polygon.point_at(t),
        }
    }

    /// First derivative (curve) or unit segment direction (polygon) at t
    pub fn tangent_at(&self, t: f64) -> DVec3 {
        match self.repr {
            Repr::Curve(curve) => curve.tangent_at(t),
            Repr::Polygon(polygon) => polygon.tangent_at(t),
        }
    }

    /// Start-parameter position
    pub fn start_point(&self) -> DVec3 {
        let (t0, _) = self.domain();
        self.point_at(t0)
    }

    /// Whether the geometry forms a closed loop
    pub fn is_closed(&self) -> bool {
        match self.repr {
            Repr::Curve(curve) => curve.is_closed(),
            Repr::Polygon(polygon) => polygon.is_closed(),
        }
    }

    /// Arc length at the given relative integration tolerance
    pub fn length(&self, rel_tol: f64) -> f64 {
        match self.repr {
            Repr::Curve(curve) => curve.arc_length(rel_tol),
            Repr::Polygon(polygon) => polygon.length(),
        }
    }
}
