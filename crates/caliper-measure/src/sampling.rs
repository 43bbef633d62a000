//! Quasi-uniform curve sampling
//!
//! Parameters spaced equally by arc length rather than by raw parameter
//! value. A chord-length table built from a fixed pre-sampling resolution
//! is inverted to place the requested sample count.

use glam::DVec3;

use caliper_geom::EdgeAdaptor;

/// A sampled point on a curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveSample {
    /// Curve parameter of the sample
    pub param: f64,
    /// Evaluated position
    pub point: DVec3,
}

/// Parameters spaced quasi-uniformly by arc length over the adaptor's
/// domain, endpoints included
pub fn quasi_uniform_params(adaptor: &EdgeAdaptor, count: usize, resolution: usize) -> Vec<f64> {
    let (t0, t1) = adaptor.domain();
    if count == 0 {
        return Vec::new();
    }
    if count == 1 {
        return vec![t0];
    }
    let resolution = resolution.max(count);

    // Cumulative chord lengths over a uniform pre-sampling
    let mut cumulative = Vec::with_capacity(resolution + 1);
    cumulative.push(0.0);
    let mut total = 0.0;
    let mut prev = adaptor.point_at(t0);
    for i in 1..=resolution {
        let t = t0 + (t1 - t0) * i as f64 / resolution as f64;
        let p = adaptor.point_at(t);
        total += p.distance(prev);
        prev = p;
        cumulative.push(total);
    }

    // Degenerate curve: every parameter maps to the same point
    if total <= 0.0 {
        return vec![t0; count];
    }

    (0..count)
        .map(|k| {
            let target = total * k as f64 / (count - 1) as f64;
            let j = cumulative.partition_point(|&c| c < target).clamp(1, resolution);
            let c0 = cumulative[j - 1];
            let c1 = cumulative[j];
            let frac = if c1 > c0 { (target - c0) / (c1 - c0) } else { 0.0 };
            t0 + (t1 - t0) * ((j - 1) as f64 + frac) / resolution as f64
        })
        .collect()
}

/// Quasi-uniform point samples over the adaptor's domain
pub fn sample_points(adaptor: &EdgeAdaptor, count: usize, resolution: usize) -> Vec<CurveSample> {
    quasi_uniform_params(adaptor, count, resolution)
        .into_iter()
        .map(|param| CurveSample {
            param,
            point: adaptor.point_at(param),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use caliper_geom::{Curve3, EdgeGeometry, Frame3, Polyline3};
    use glam::DVec3;

    #[test]
    fn test_line_samples_evenly_spaced() {
        let edge = EdgeGeometry::from_curve(Curve3::line_segment(
            DVec3::ZERO,
            DVec3::new(10.0, 0.0, 0.0),
        ));
        let adaptor = EdgeAdaptor::new(&edge).unwrap();
        let params = quasi_uniform_params(&adaptor, 5, 128);
        assert_eq!(params.len(), 5);
        for (k, t) in params.iter().enumerate() {
            assert_abs_diff_eq!(*t, 2.5 * k as f64, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_circle_samples_on_radius() {
        let frame = Frame3::new(DVec3::ZERO, DVec3::Z, DVec3::X);
        let edge = EdgeGeometry::from_curve(Curve3::full_circle(frame, 3.0));
        let adaptor = EdgeAdaptor::new(&edge).unwrap();
        for sample in sample_points(&adaptor, 16, 128) {
            assert_abs_diff_eq!(sample.point.length(), 3.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_polyline_samples_follow_arc_length() {
        // Two segments of very different parameter density
        let edge = EdgeGeometry::from_polygon(Polyline3::new(vec![
            DVec3::ZERO,
            DVec3::new(9.0, 0.0, 0.0),
            DVec3::new(9.0, 1.0, 0.0),
        ]));
        let adaptor = EdgeAdaptor::new(&edge).unwrap();
        let params = quasi_uniform_params(&adaptor, 3, 128);
        // Midpoint by arc length is at s = 5 on the first segment
        assert_abs_diff_eq!(adaptor.point_at(params[1]).x, 5.0, epsilon = 1e-6);
    }

    #[test]
    fn test_degenerate_curve() {
        let edge = EdgeGeometry::from_curve(Curve3::line_segment(DVec3::ZERO, DVec3::ZERO));
        let adaptor = EdgeAdaptor::new(&edge).unwrap();
        let params = quasi_uniform_params(&adaptor, 4, 32);
        assert_eq!(params, vec![0.0; 4]);
    }
}
