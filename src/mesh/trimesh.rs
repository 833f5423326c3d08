//! Triangle mesh with face adjacency.
//!
//! [`TriMesh`] stores vertex positions, triangles as vertex-index triples, and
//! the face-adjacency relation that navigation walks. The adjacency is kept in
//! two shapes: the unordered pair list `(a, b)` with `a < b`, and per-face
//! neighbor lists for O(1) expansion during search.

use nalgebra::{Point3, Vector3};

use super::index::{FaceId, MeshIndex, VertexId};

/// The three corner positions of a triangle.
pub type Triangle = [Point3<f64>; 3];

/// A triangle mesh with a face-adjacency relation.
///
/// The mesh is immutable once built; searches borrow it read-only and may run
/// concurrently from several threads.
#[derive(Debug, Clone)]
pub struct TriMesh<I: MeshIndex = u32> {
    /// Vertex positions.
    pub(crate) vertices: Vec<Point3<f64>>,

    /// Triangles as vertex-index triples.
    pub(crate) faces: Vec<[VertexId<I>; 3]>,

    /// Unordered adjacency pairs, each stored once with the smaller face first.
    pub(crate) adjacency: Vec<(FaceId<I>, FaceId<I>)>,

    /// Neighbor faces of each face.
    pub(crate) neighbors: Vec<Vec<FaceId<I>>>,
}

impl<I: MeshIndex> Default for TriMesh<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: MeshIndex> TriMesh<I> {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
            adjacency: Vec::new(),
            neighbors: Vec::new(),
        }
    }

    /// Assemble a mesh from already validated parts.
    ///
    /// Pairs are normalized to `(min, max)`, sorted, and deduplicated.
    pub(crate) fn from_parts(
        vertices: Vec<Point3<f64>>,
        faces: Vec<[VertexId<I>; 3]>,
        mut adjacency: Vec<(FaceId<I>, FaceId<I>)>,
    ) -> Self {
        for pair in adjacency.iter_mut() {
            if pair.1 < pair.0 {
                *pair = (pair.1, pair.0);
            }
        }
        adjacency.sort_unstable();
        adjacency.dedup();

        let mut neighbors = vec![Vec::new(); faces.len()];
        for &(a, b) in &adjacency {
            neighbors[a.index()].push(b);
            neighbors[b.index()].push(a);
        }

        Self {
            vertices,
            faces,
            adjacency,
            neighbors,
        }
    }

    // ==================== Accessors ====================

    /// Get the number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Get the number of adjacency pairs.
    #[inline]
    pub fn num_adjacencies(&self) -> usize {
        self.adjacency.len()
    }

    /// Check if the mesh has no faces.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Get the position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId<I>) -> &Point3<f64> {
        &self.vertices[v.index()]
    }

    /// Get the three vertices of a face.
    #[inline]
    pub fn face_vertices(&self, f: FaceId<I>) -> [VertexId<I>; 3] {
        self.faces[f.index()]
    }

    /// Get the positions of the three vertices of a face.
    pub fn face_positions(&self, f: FaceId<I>) -> Triangle {
        let [v0, v1, v2] = self.face_vertices(f);
        [*self.position(v0), *self.position(v1), *self.position(v2)]
    }

    /// The faces sharing an edge with `f`.
    #[inline]
    pub fn face_neighbors(&self, f: FaceId<I>) -> &[FaceId<I>] {
        &self.neighbors[f.index()]
    }

    /// The unordered face-adjacency pairs, smaller face first.
    #[inline]
    pub fn face_adjacency(&self) -> &[(FaceId<I>, FaceId<I>)] {
        &self.adjacency
    }

    /// Check whether two faces are declared adjacent.
    pub fn are_adjacent(&self, a: FaceId<I>, b: FaceId<I>) -> bool {
        self.face_neighbors(a).contains(&b)
    }

    // ==================== Iteration ====================

    /// Iterate over all vertex IDs.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId<I>> + '_ {
        (0..self.vertices.len()).map(VertexId::new)
    }

    /// Iterate over all face IDs.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId<I>> + '_ {
        (0..self.faces.len()).map(FaceId::new)
    }

    /// Iterate over all faces with their corner positions.
    pub fn triangles(&self) -> impl Iterator<Item = (FaceId<I>, Triangle)> + '_ {
        self.face_ids().map(move |f| (f, self.face_positions(f)))
    }

    // ==================== Geometry ====================

    /// Compute the unit normal of a face.
    pub fn face_normal(&self, f: FaceId<I>) -> Vector3<f64> {
        let [p0, p1, p2] = self.face_positions(f);
        (p1 - p0).cross(&(p2 - p0)).normalize()
    }

    /// Compute the area of a face.
    pub fn face_area(&self, f: FaceId<I>) -> f64 {
        let [p0, p1, p2] = self.face_positions(f);
        0.5 * (p1 - p0).cross(&(p2 - p0)).norm()
    }

    /// Compute the centroid of a face.
    pub fn face_centroid(&self, f: FaceId<I>) -> Point3<f64> {
        let [p0, p1, p2] = self.face_positions(f);
        Point3::from((p0.coords + p1.coords + p2.coords) / 3.0)
    }

    /// Compute the total surface area of the mesh.
    pub fn surface_area(&self) -> f64 {
        self.face_ids().map(|f| self.face_area(f)).sum()
    }

    /// Compute the axis-aligned bounding box of the mesh.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = self.vertices.first()?;
        let mut min = *first;
        let mut max = *first;

        for p in &self.vertices {
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
        }

        Some((min, max))
    }

    // ==================== Topology ====================

    /// Label each face with the index of its connected component.
    ///
    /// Components are numbered in order of their lowest face index. Two faces
    /// share a label exactly when navigation between them can succeed.
    pub fn connected_components(&self) -> Vec<usize> {
        let mut labels = vec![usize::MAX; self.num_faces()];
        let mut stack = Vec::new();
        let mut next_label = 0;

        for seed in 0..self.num_faces() {
            if labels[seed] != usize::MAX {
                continue;
            }
            labels[seed] = next_label;
            stack.push(seed);

            while let Some(f) = stack.pop() {
                for &n in &self.neighbors[f] {
                    if labels[n.index()] == usize::MAX {
                        labels[n.index()] = next_label;
                        stack.push(n.index());
                    }
                }
            }
            next_label += 1;
        }

        labels
    }

    /// Count the connected components of the face-adjacency graph.
    pub fn num_components(&self) -> usize {
        self.connected_components()
            .iter()
            .max()
            .map_or(0, |&max| max + 1)
    }
}
