//! Closest-point primitives
//!
//! Exact closest-point routines between points, segments and triangles.
//! These back the analytic query's minimum-distance computation and the
//! concurrent-edge construction of the angle measurement.

use glam::DVec3;

/// Closest point to `p` on the segment `[a, b]`
pub fn closest_point_segment(p: DVec3, a: DVec3, b: DVec3) -> DVec3 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return a;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Closest pair of points between segments `[p1, q1]` and `[p2, q2]`,
/// returned as (point on first, point on second, distance)
pub fn segment_segment(p1: DVec3, q1: DVec3, p2: DVec3, q2: DVec3) -> (DVec3, DVec3, f64) {
    let d1 = q1 - p1;
    let d2 = q2 - p2;
    let r = p1 - p2;
    let a = d1.length_squared();
    let e = d2.length_squared();
    let f = d2.dot(r);

    let (s, t);
    if a == 0.0 && e == 0.0 {
        s = 0.0;
        t = 0.0;
    } else if a == 0.0 {
        s = 0.0;
        t = (f / e).clamp(0.0, 1.0);
    } else {
        let c = d1.dot(r);
        if e == 0.0 {
            t = 0.0;
            s = (-c / a).clamp(0.0, 1.0);
        } else {
            let b = d1.dot(d2);
            let denom = a * e - b * b;
            let mut s_val = if denom != 0.0 {
                ((b * f - c * e) / denom).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let mut t_val = (b * s_val + f) / e;
            if t_val < 0.0 {
                t_val = 0.0;
                s_val = (-c / a).clamp(0.0, 1.0);
            } else if t_val > 1.0 {
                t_val = 1.0;
                s_val = ((b - c) / a).clamp(0.0, 1.0);
            }
            s = s_val;
            t = t_val;
        }
    }

    let c1 = p1 + d1 * s;
    let c2 = p2 + d2 * t;
    (c1, c2, c1.distance(c2))
}

/// Closest point to `p` on a triangle, returned as (point, distance)
pub fn point_triangle(p: DVec3, tri: &[DVec3; 3]) -> (DVec3, f64) {
    let [a, b, c] = *tri;
    let ab = b - a;
    let ac = c - a;
    let ap = p - a;

    let d1 = ab.dot(ap);
    let d2 = ac.dot(ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return (a, p.distance(a));
    }

    let bp = p - b;
    let d3 = ab.dot(bp);
    let d4 = ac.dot(bp);
    if d3 >= 0.0 && d4 <= d3 {
        return (b, p.distance(b));
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        let v = d1 / (d1 - d3);
        let q = a + ab * v;
        return (q, p.distance(q));
    }

    let cp = p - c;
    let d5 = ab.dot(cp);
    let d6 = ac.dot(cp);
    if d6 >= 0.0 && d5 <= d6 {
        return (c, p.distance(c));
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        let w = d2 / (d2 - d6);
        let q = a + ac * w;
        return (q, p.distance(q));
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        let q = b + (c - b) * w;
        return (q, p.distance(q));
    }

    // Interior projection
    let denom = 1.0 / (va + vb + vc);
    let v = vb * denom;
    let w = vc * denom;
    let q = a + ab * v + ac * w;
    (q, p.distance(q))
}

/// Closest pair between a segment and a triangle, returned as
/// (point on segment, point on triangle, distance)
pub fn segment_triangle(a: DVec3, b: DVec3, tri: &[DVec3; 3]) -> (DVec3, DVec3, f64) {
    // Piercing segment: distance is zero at the plane intersection
    let n = (tri[1] - tri[0]).cross(tri[2] - tri[0]);
    if n.length_squared() > 0.0 {
        let da = (a - tri[0]).dot(n);
        let db = (b - tri[0]).dot(n);
        if da * db < 0.0 {
            let t = da / (da - db);
            let hit = a + (b - a) * t;
            let (q, d) = point_triangle(hit, tri);
            if d <= f64::EPSILON.sqrt() * (b - a).length().max(1.0) {
                return (hit, q, 0.0);
            }
        }
    }

    let mut best = {
        let (q, d) = point_triangle(a, tri);
        (a, q, d)
    };
    let (q, d) = point_triangle(b, tri);
    if d < best.2 {
        best = (b, q, d);
    }
    for i in 0..3 {
        let (ea, eb) = (tri[i], tri[(i + 1) % 3]);
        let (ps, pt, d) = segment_segment(a, b, ea, eb);
        if d < best.2 {
            best = (ps, pt, d);
        }
    }
    best
}

/// Closest pair between two triangles, returned as
/// (point on first, point on second, distance)
pub fn triangle_triangle(t1: &[DVec3; 3], t2: &[DVec3; 3]) -> (DVec3, DVec3, f64) {
    let mut best: Option<(DVec3, DVec3, f64)> = None;
    for i in 0..3 {
        let (a, b) = (t1[i], t1[(i + 1) % 3]);
        let (p, q, d) = segment_triangle(a, b, t2);
        if best.is_none_or(|(_, _, bd)| d < bd) {
            best = Some((p, q, d));
        }
    }
    for i in 0..3 {
        let (a, b) = (t2[i], t2[(i + 1) % 3]);
        let (p, q, d) = segment_triangle(a, b, t1);
        if best.is_none_or(|(_, _, bd)| d < bd) {
            best = Some((q, p, d));
        }
    }
    best.expect("triangles have edges")
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_closest_point_segment_clamps() {
        let a = DVec3::ZERO;
        let b = DVec3::new(10.0, 0.0, 0.0);
        let c = closest_point_segment(DVec3::new(-5.0, 3.0, 0.0), a, b);
        assert_abs_diff_eq!(c.x, 0.0, epsilon = 1e-12);
        let c = closest_point_segment(DVec3::new(4.0, 3.0, 0.0), a, b);
        assert_abs_diff_eq!(c.x, 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_segment_segment_crossing() {
        let (p, q, d) = segment_segment(
            DVec3::new(-1.0, 0.0, 0.0),
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(0.0, -1.0, 0.0),
            DVec3::new(0.0, 1.0, 0.0),
        );
        assert_abs_diff_eq!(d, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.distance(q), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_segment_segment_skew() {
        let (p, q, d) = segment_segment(
            DVec3::new(-1.0, 0.0, 0.0),
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(0.0, -1.0, 5.0),
            DVec3::new(0.0, 1.0, 5.0),
        );
        assert_abs_diff_eq!(d, 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(q.z, 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_point_triangle_regions() {
        let tri = [
            DVec3::ZERO,
            DVec3::new(4.0, 0.0, 0.0),
            DVec3::new(0.0, 4.0, 0.0),
        ];
        // Above the interior
        let (q, d) = point_triangle(DVec3::new(1.0, 1.0, 2.0), &tri);
        assert_abs_diff_eq!(d, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(q.z, 0.0, epsilon = 1e-12);
        // Nearest a vertex
        let (q, d) = point_triangle(DVec3::new(-3.0, -4.0, 0.0), &tri);
        assert_abs_diff_eq!(d, 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(q.distance(tri[0]), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_triangle_triangle_parallel_gap() {
        let t1 = [
            DVec3::ZERO,
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(0.0, 1.0, 0.0),
        ];
        let t2 = [
            DVec3::new(0.0, 0.0, 3.0),
            DVec3::new(1.0, 0.0, 3.0),
            DVec3::new(0.0, 1.0, 3.0),
        ];
        let (_, _, d) = triangle_triangle(&t1, &t2);
        assert_abs_diff_eq!(d, 3.0, epsilon = 1e-12);
    }
}
