//! Nearest-point queries against the mesh surface.
//!
//! Navigation needs to know which triangle a query location sits in. This
//! module finds, for each query point, the closest point on the surface, its
//! distance, and the face containing it. The scan is brute force over faces;
//! batches are spread over threads with rayon.

use nalgebra::Point3;
use rayon::prelude::*;

use crate::error::{NavError, Result};
use crate::mesh::{FaceId, MeshIndex, TriMesh};

/// The closest surface point to a query location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfacePoint<I: MeshIndex = u32> {
    /// Closest point on the surface.
    pub point: Point3<f64>,
    /// Euclidean distance from the query to `point`.
    pub distance: f64,
    /// Face containing `point`.
    pub face: FaceId<I>,
}

/// Find the closest point on triangle `abc` to `p`.
///
/// Classifies `p` against the Voronoi regions of the triangle's vertices and
/// edges ("Real-Time Collision Detection", Ericson, 5.1.5).
pub fn closest_point_on_triangle(
    p: &Point3<f64>,
    a: &Point3<f64>,
    b: &Point3<f64>,
    c: &Point3<f64>,
) -> Point3<f64> {
    let ab = b - a;
    let ac = c - a;
    let ap = p - a;

    let d1 = ab.dot(&ap);
    let d2 = ac.dot(&ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return *a;
    }

    let bp = p - b;
    let d3 = ab.dot(&bp);
    let d4 = ac.dot(&bp);
    if d3 >= 0.0 && d4 <= d3 {
        return *b;
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        let v = d1 / (d1 - d3);
        return a + ab * v;
    }

    let cp = p - c;
    let d5 = ab.dot(&cp);
    let d6 = ac.dot(&cp);
    if d6 >= 0.0 && d5 <= d6 {
        return *c;
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        let w = d2 / (d2 - d6);
        return a + ac * w;
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        return b + (c - b) * w;
    }

    // Interior
    let denom = 1.0 / (va + vb + vc);
    let v = vb * denom;
    let w = vc * denom;
    a + ab * v + ac * w
}

/// Find the closest surface point to a single query.
///
/// When several faces are equally close (a point on a shared edge or vertex)
/// the lowest face index wins. Returns `None` for an empty mesh.
pub fn closest_point<I: MeshIndex>(mesh: &TriMesh<I>, query: &Point3<f64>) -> Option<SurfacePoint<I>> {
    let mut best: Option<SurfacePoint<I>> = None;

    for (face, [a, b, c]) in mesh.triangles() {
        let point = closest_point_on_triangle(query, &a, &b, &c);
        let distance = (query - point).norm();
        if best.map_or(true, |s| distance < s.distance) {
            best = Some(SurfacePoint { point, distance, face });
        }
    }

    best
}

/// Find the closest surface point for every query in a batch.
///
/// Results are in query order.
///
/// # Errors
///
/// [`NavError::EmptyMesh`] if the mesh has no faces, and
/// [`NavError::InvalidParameter`] if a query has a non-finite coordinate.
///
/// # Example
///
/// ```
/// use trinav::prelude::*;
/// use trinav::algo::proximity::closest_points;
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// let mesh: TriMesh = build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap();
///
/// let hits = closest_points(&mesh, &[Point3::new(0.2, 0.2, 1.0)]).unwrap();
/// assert!((hits[0].distance - 1.0).abs() < 1e-12);
/// assert_eq!(hits[0].face, FaceId::new(0));
/// ```
pub fn closest_points<I: MeshIndex>(
    mesh: &TriMesh<I>,
    queries: &[Point3<f64>],
) -> Result<Vec<SurfacePoint<I>>> {
    if mesh.is_empty() {
        return Err(NavError::EmptyMesh);
    }
    if let Some(q) = queries.iter().find(|q| !q.coords.iter().all(|c| c.is_finite())) {
        return Err(NavError::invalid_param(
            "query",
            format!("({}, {}, {})", q.x, q.y, q.z),
            "coordinates must be finite",
        ));
    }

    queries
        .par_iter()
        .map(|q| closest_point(mesh, q).ok_or(NavError::EmptyMesh))
        .collect()
}
