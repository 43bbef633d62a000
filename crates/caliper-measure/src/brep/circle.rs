//! Circle extraction
//!
//! Ordered strategy chain, first success wins: native analytic circle,
//! ellipse with coincident radii, then a numeric 3-point fit verified
//! against a dense re-sampling. Verification guards against silently
//! fitting a circle to a non-circular curve; a failed fit is a hard
//! failure, not a best-effort approximation.

use glam::DVec3;

use caliper_geom::{Circle3, EdgeAdaptor, EdgeGeometry};

use crate::brep::MeasureConfig;
use crate::error::{MeasureError, MeasureResult};
use crate::sampling;
use crate::types::MeasureCircle;

/// Extract a circle from an edge's geometry
pub(crate) fn extract_circle(
    edge: &EdgeGeometry,
    config: &MeasureConfig,
) -> MeasureResult<MeasureCircle> {
    let adaptor = EdgeAdaptor::new(edge).ok_or(MeasureError::NotCircularEdge)?;

    if let Some(curve) = adaptor.curve() {
        if let Some(circle) = curve.as_circle() {
            return Ok(finish(&adaptor, circle));
        }
        if let Some((frame, major, minor)) = curve.as_ellipse()
            && (major - minor).abs() < config.confusion_tolerance
        {
            return Ok(finish(&adaptor, Circle3::new(frame.origin, frame.axis, major)));
        }
    }

    fit_circle(&adaptor, config)
}

/// Numeric fallback: fit a circle through sampled points and verify the
/// residual at every verification sample
fn fit_circle(adaptor: &EdgeAdaptor, config: &MeasureConfig) -> MeasureResult<MeasureCircle> {
    let points: Vec<DVec3> =
        sampling::sample_points(adaptor, config.fit_samples, config.presample_resolution)
            .into_iter()
            .map(|sample| sample.point)
            .filter(|point| point.is_finite())
            .collect();

    if points.len() < config.min_fit_samples {
        tracing::debug!(
            valid = points.len(),
            required = config.min_fit_samples,
            "circle fit: not enough valid samples"
        );
        return Err(MeasureError::NotCircularEdge);
    }

    let circle = circle_through(points[0], points[1], points[2]).ok_or_else(|| {
        tracing::debug!("circle fit: sampled points are collinear");
        MeasureError::NotCircularEdge
    })?;

    for sample in
        sampling::sample_points(adaptor, config.verify_samples, config.presample_resolution)
    {
        let residual = (sample.point.distance(circle.center) - circle.radius).abs();
        if !(residual < config.fit_tolerance) {
            tracing::debug!(
                param = sample.param,
                residual,
                tolerance = config.fit_tolerance,
                "circle fit: residual verification failed"
            );
            return Err(MeasureError::NotCircularEdge);
        }
    }

    Ok(finish(adaptor, circle))
}

/// The unique circle through three points, or None if they are collinear
fn circle_through(p0: DVec3, p1: DVec3, p2: DVec3) -> Option<Circle3> {
    let a = p1 - p0;
    let b = p2 - p0;
    let normal = a.cross(b);
    let normal_sq = normal.length_squared();
    if normal_sq <= f64::EPSILON * a.length_squared() * b.length_squared() {
        return None;
    }

    let center = p0
        + (b.cross(normal) * a.length_squared() + normal.cross(a) * b.length_squared())
            / (2.0 * normal_sq);
    let radius = center.distance(p0);
    if !center.is_finite() || !radius.is_finite() {
        return None;
    }
    Some(Circle3::new(center, normal, radius))
}

fn finish(adaptor: &EdgeAdaptor, circle: Circle3) -> MeasureCircle {
    MeasureCircle {
        anchor: adaptor.start_point(),
        is_arc: !adaptor.is_closed(),
        circle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use caliper_geom::{CubicBezier3, Curve3, Frame3, Polyline3};
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

    fn config() -> MeasureConfig {
        MeasureConfig::default()
    }

    #[test]
    fn test_analytic_circle_is_exact() {
        let center = DVec3::new(1.0, 2.0, 3.0);
        let frame = Frame3::new(center, DVec3::Z, DVec3::X);
        let edge = EdgeGeometry::from_curve(Curve3::full_circle(frame, 2.5));

        let result = extract_circle(&edge, &config()).unwrap();
        assert_abs_diff_eq!(result.circle.center.distance(center), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(result.circle.radius, 2.5, epsilon = 1e-12);
        assert_abs_diff_eq!(result.circle.axis.distance(DVec3::Z), 0.0, epsilon = 1e-12);
        assert!(!result.is_arc);
        // Anchor sits at the start-parameter position
        assert_abs_diff_eq!(
            result.anchor.distance(center + DVec3::X * 2.5),
            0.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_open_arc_is_flagged() {
        let frame = Frame3::new(DVec3::ZERO, DVec3::Z, DVec3::X);
        let edge = EdgeGeometry::from_curve(Curve3::arc(frame, 1.0, (0.0, FRAC_PI_2)));

        let result = extract_circle(&edge, &config()).unwrap();
        assert!(result.is_arc);
        assert_abs_diff_eq!(result.circle.radius, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_circular_ellipse_is_accepted() {
        let frame = Frame3::new(DVec3::new(0.0, 0.0, 5.0), DVec3::Z, DVec3::X);
        let edge = EdgeGeometry::from_curve(Curve3::ellipse_arc(frame, 3.0, 3.0, (0.0, TAU)));

        let result = extract_circle(&edge, &config()).unwrap();
        assert_abs_diff_eq!(result.circle.radius, 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(
            result.circle.center.distance(DVec3::new(0.0, 0.0, 5.0)),
            0.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_eccentric_ellipse_is_rejected() {
        let frame = Frame3::new(DVec3::ZERO, DVec3::Z, DVec3::X);
        let edge = EdgeGeometry::from_curve(Curve3::ellipse_arc(frame, 2.0, 1.0, (0.0, TAU)));

        // The 3-point fit succeeds but residual verification must reject it
        assert_eq!(
            extract_circle(&edge, &config()),
            Err(MeasureError::NotCircularEdge)
        );
    }

    #[test]
    fn test_bezier_arc_approximation_is_fitted() {
        // Standard cubic Bezier approximation of a 45-degree unit arc;
        // its radial deviation is a few 1e-6, well inside the residual
        // bound
        let k = 4.0 / 3.0 * (FRAC_PI_4 / 4.0).tan();
        let end = DVec3::new(FRAC_PI_4.cos(), FRAC_PI_4.sin(), 0.0);
        let end_tangent = DVec3::new(-FRAC_PI_4.sin(), FRAC_PI_4.cos(), 0.0);
        let bezier = CubicBezier3::new(
            DVec3::X,
            DVec3::X + DVec3::Y * k,
            end - end_tangent * k,
            end,
        );
        let edge = EdgeGeometry::from_curve(Curve3::bezier(bezier));

        let result = extract_circle(&edge, &config()).unwrap();
        assert!(result.is_arc);
        assert_abs_diff_eq!(result.circle.radius, 1.0, epsilon = 1e-4);
        assert_abs_diff_eq!(result.circle.center.distance(DVec3::ZERO), 0.0, epsilon = 1e-4);
    }

    #[test]
    fn test_generic_bezier_is_rejected() {
        let bezier = CubicBezier3::new(
            DVec3::ZERO,
            DVec3::new(1.0, 3.0, 0.0),
            DVec3::new(2.0, -3.0, 1.0),
            DVec3::new(3.0, 0.0, 0.0),
        );
        let edge = EdgeGeometry::from_curve(Curve3::bezier(bezier));

        assert_eq!(
            extract_circle(&edge, &config()),
            Err(MeasureError::NotCircularEdge)
        );
    }

    #[test]
    fn test_linear_edge_is_rejected() {
        let edge = EdgeGeometry::from_curve(Curve3::line_segment(
            DVec3::ZERO,
            DVec3::new(10.0, 0.0, 0.0),
        ));

        assert_eq!(
            extract_circle(&edge, &config()),
            Err(MeasureError::NotCircularEdge)
        );
    }

    #[test]
    fn test_polyline_on_circle_is_fitted() {
        // Dense polygonal approximation of a unit circle; chord sag at
        // 512 segments is ~2e-5
        let n = 512;
        let points: Vec<DVec3> = (0..=n)
            .map(|i| {
                let angle = TAU * i as f64 / n as f64;
                DVec3::new(angle.cos(), angle.sin(), 0.0)
            })
            .collect();
        let edge = EdgeGeometry::from_polygon(Polyline3::new(points));

        let result = extract_circle(&edge, &config()).unwrap();
        assert!(!result.is_arc);
        assert_abs_diff_eq!(result.circle.radius, 1.0, epsilon = 1e-3);
        assert_abs_diff_eq!(result.circle.center.distance(DVec3::ZERO), 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_empty_edge_is_rejected() {
        assert_eq!(
            extract_circle(&EdgeGeometry::default(), &config()),
            Err(MeasureError::NotCircularEdge)
        );
    }

    #[test]
    fn test_circle_through_points() {
        let circle = circle_through(
            DVec3::new(2.0, 0.0, 0.0),
            DVec3::new(0.0, 2.0, 0.0),
            DVec3::new(-2.0, 0.0, 0.0),
        )
        .unwrap();
        assert_abs_diff_eq!(circle.radius, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(circle.center.distance(DVec3::ZERO), 0.0, epsilon = 1e-12);

        assert!(circle_through(DVec3::ZERO, DVec3::X, DVec3::X * 2.0).is_none());
    }

    #[test]
    fn test_quarter_arc_length_sanity() {
        // Guard for the arc test fixtures above
        let frame = Frame3::new(DVec3::ZERO, DVec3::Z, DVec3::X);
        let arc = Curve3::arc(frame, 1.0, (0.0, PI));
        assert_abs_diff_eq!(arc.arc_length(1e-6), PI, epsilon = 1e-9);
    }
}
