//! Triangulated planar faces
//!
//! A face is carried as its triangulation; area is the exact sum of
//! triangle areas, which is what the surface-property integration of a
//! kernel reports for planar faces.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Geometry carried by a BRep face
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FaceGeometry {
    /// Triangles covering the face
    pub triangles: Vec<[DVec3; 3]>,
}

impl FaceGeometry {
    /// Face from an explicit triangle list
    pub fn from_triangles(triangles: Vec<[DVec3; 3]>) -> Self {
        Self { triangles }
    }

    /// Rectangular face spanned by two edge vectors from a corner
    pub fn rectangle(corner: DVec3, u: DVec3, v: DVec3) -> Self {
        let a = corner;
        let b = corner + u;
        let c = corner + u + v;
        let d = corner + v;
        Self {
            triangles: vec![[a, b, c], [a, c, d]],
        }
    }

    /// Total surface area
    pub fn area(&self) -> f64 {
        self.triangles
            .iter()
            .map(|t| 0.5 * (t[1] - t[0]).cross(t[2] - t[0]).length())
            .sum()
    }

    /// Area-weighted centroid
    pub fn centroid(&self) -> DVec3 {
        let mut weighted = DVec3::ZERO;
        let mut total = 0.0;
        for t in &self.triangles {
            let area = 0.5 * (t[1] - t[0]).cross(t[2] - t[0]).length();
            weighted += (t[0] + t[1] + t[2]) / 3.0 * area;
            total += area;
        }
        if total > 0.0 { weighted / total } else { DVec3::ZERO }
    }

    /// Normal of the first non-degenerate triangle
    pub fn normal(&self) -> Option<DVec3> {
        self.triangles.iter().find_map(|t| {
            let n = (t[1] - t[0]).cross(t[2] - t[0]);
            (n.length_squared() > 0.0).then(|| n.normalize())
        })
    }
}
