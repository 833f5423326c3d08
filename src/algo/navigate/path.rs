//! The waypoint sequence returned by navigation.

use nalgebra::Point3;

use crate::mesh::{FaceId, MeshIndex};

/// An ordered on-surface path from start to target.
///
/// Every waypoint is paired with the face it lies in. Consecutive faces are
/// either identical or adjacent in the mesh, so the path is a walk over the
/// face-adjacency graph.
#[derive(Debug, Clone, PartialEq)]
pub struct NavPath<I: MeshIndex = u32> {
    waypoints: Vec<Point3<f64>>,
    faces: Vec<FaceId<I>>,
}

impl<I: MeshIndex> NavPath<I> {
    pub(crate) fn new(waypoints: Vec<Point3<f64>>, faces: Vec<FaceId<I>>) -> Self {
        debug_assert_eq!(waypoints.len(), faces.len());
        Self { waypoints, faces }
    }

    /// Two-point path for endpoints that share a face.
    pub(crate) fn direct(start: Point3<f64>, target: Point3<f64>, face: FaceId<I>) -> Self {
        Self::new(vec![start, target], vec![face, face])
    }

    /// The waypoints, start first.
    #[inline]
    pub fn waypoints(&self) -> &[Point3<f64>] {
        &self.waypoints
    }

    /// The face of each waypoint.
    #[inline]
    pub fn faces(&self) -> &[FaceId<I>] {
        &self.faces
    }

    /// Number of waypoints.
    #[inline]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Check if the path has no waypoints.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// The first waypoint.
    pub fn start(&self) -> Option<&Point3<f64>> {
        self.waypoints.first()
    }

    /// The last waypoint.
    pub fn end(&self) -> Option<&Point3<f64>> {
        self.waypoints.last()
    }

    /// Total polyline length.
    pub fn length(&self) -> f64 {
        self.waypoints.windows(2).map(|w| (w[1] - w[0]).norm()).sum()
    }

    /// Iterate over waypoints with their faces.
    pub fn iter(&self) -> impl Iterator<Item = (&Point3<f64>, FaceId<I>)> + '_ {
        self.waypoints.iter().zip(self.faces.iter().copied())
    }

    /// Take the waypoints, dropping the face labels.
    pub fn into_waypoints(self) -> Vec<Point3<f64>> {
        self.waypoints
    }
}
