//! Waypoint placement inside candidate triangles.
//!
//! When the search steps from one face into a neighbor it commits to a single
//! location in that neighbor. [`WaypointSampler`] abstracts how that location
//! is picked so the search itself stays strategy agnostic:
//!
//! - [`UniformRandom`]: a point drawn uniformly over the neighbor's area.
//! - [`EdgeMidpoint`]: the midpoint between where the current location and the
//!   target project onto the edge the two faces share.

use nalgebra::Point3;
use rand::Rng;

use crate::mesh::Triangle;

/// Strategy for choosing a waypoint inside a neighbor triangle.
pub trait WaypointSampler {
    /// Pick a location in `neighbor` for a step out of `current`.
    ///
    /// `location` is the committed waypoint in `current` and `target` is the
    /// final destination. Returns `None` when the strategy needs a shared edge
    /// and the two triangles do not have exactly one.
    fn sample(
        &mut self,
        current: &Triangle,
        location: &Point3<f64>,
        neighbor: &Triangle,
        target: &Point3<f64>,
    ) -> Option<Point3<f64>>;
}

/// Draw a point uniformly over the area of a triangle.
///
/// Uses the square-root barycentric transform: for uniforms `r1, r2` in
/// `[0, 1)` the point is `(1 - √r1)·A + √r1·(1 - r2)·B + √r1·r2·C`.
/// Sampling the barycentric weights directly would cluster points near `A`.
pub fn sample_in_triangle<R: Rng + ?Sized>(triangle: &Triangle, rng: &mut R) -> Point3<f64> {
    let r1: f64 = rng.gen();
    let r2: f64 = rng.gen();
    let s = r1.sqrt();
    let [a, b, c] = triangle;

    Point3::from(a.coords * (1.0 - s) + b.coords * (s * (1.0 - r2)) + c.coords * (s * r2))
}

/// Find the edge two triangles share, matching corners by exact coordinates.
///
/// Adjacent faces reference the same mesh vertices, so their shared corners
/// compare bit-for-bit equal. Returns `None` unless exactly two distinct
/// corners are common to both.
pub fn shared_edge(tri1: &Triangle, tri2: &Triangle) -> Option<[Point3<f64>; 2]> {
    let mut common: Vec<Point3<f64>> = Vec::with_capacity(3);
    for p in tri1 {
        if tri2.contains(p) && !common.contains(p) {
            common.push(*p);
        }
    }

    match common.as_slice() {
        [e0, e1] => Some([*e0, *e1]),
        _ => None,
    }
}

/// Project `p` onto the edge shared by two triangles.
///
/// The projection parameter is clamped to the segment, so the result never
/// leaves the edge. Returns `None` if the triangles do not share exactly one
/// edge.
pub fn select_point_on_shared_edge(
    tri1: &Triangle,
    tri2: &Triangle,
    p: &Point3<f64>,
) -> Option<Point3<f64>> {
    let [e0, e1] = shared_edge(tri1, tri2)?;
    let axis = e1 - e0;
    let len = axis.norm();
    let dir = axis / len;

    let t = (p - e0).dot(&dir).clamp(0.0, len);
    Some(e0 + dir * t)
}

/// Uniform random sampling over the neighbor triangle.
///
/// Successive searches with an unseeded generator produce different paths for
/// the same query.
#[derive(Debug, Clone)]
pub struct UniformRandom<R> {
    rng: R,
}

impl<R: Rng> UniformRandom<R> {
    /// Sample with the given random source.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Recover the random source.
    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl<R: Rng> WaypointSampler for UniformRandom<R> {
    fn sample(
        &mut self,
        _current: &Triangle,
        _location: &Point3<f64>,
        neighbor: &Triangle,
        _target: &Point3<f64>,
    ) -> Option<Point3<f64>> {
        Some(sample_in_triangle(neighbor, &mut self.rng))
    }
}

/// Deterministic sampling anchored on the shared edge.
///
/// The waypoint is the midpoint of the entry point (current location projected
/// onto the edge) and the exit point (target projected onto the edge).
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeMidpoint;

impl WaypointSampler for EdgeMidpoint {
    fn sample(
        &mut self,
        current: &Triangle,
        location: &Point3<f64>,
        neighbor: &Triangle,
        target: &Point3<f64>,
    ) -> Option<Point3<f64>> {
        let entry = select_point_on_shared_edge(neighbor, current, location)?;
        let exit = select_point_on_shared_edge(neighbor, current, target)?;
        Some(nalgebra::center(&entry, &exit))
    }
}
