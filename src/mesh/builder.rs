//! Mesh construction utilities.
//!
//! This module builds [`TriMesh`] values from face-vertex lists as commonly
//! found in mesh file formats, deriving face adjacency from shared edges, or
//! accepting an adjacency relation computed elsewhere.

use std::collections::HashMap;

use nalgebra::Point3;

use super::index::{FaceId, MeshIndex, VertexId};
use super::trimesh::TriMesh;
use crate::error::{NavError, Result};

/// Build a navigation mesh from vertices and triangle faces.
///
/// Two faces are adjacent when they share an undirected edge (the same pair of
/// vertex indices). An edge used by more than two faces is rejected as
/// non-manifold.
///
/// # Example
/// ```
/// use trinav::mesh::{build_from_triangles, TriMesh};
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
/// ];
/// let faces = vec![[0, 1, 2], [1, 2, 3]];
///
/// let mesh: TriMesh = build_from_triangles(&vertices, &faces).unwrap();
/// assert_eq!(mesh.num_faces(), 2);
/// assert_eq!(mesh.num_adjacencies(), 1);
/// ```
pub fn build_from_triangles<I: MeshIndex>(
    vertices: &[Point3<f64>],
    faces: &[[usize; 3]],
) -> Result<TriMesh<I>> {
    validate_faces::<I>(vertices, faces)?;

    // Undirected edge -> incident faces seen so far
    let mut edge_faces: HashMap<(usize, usize), Vec<usize>> = HashMap::new();
    for (fi, face) in faces.iter().enumerate() {
        for k in 0..3 {
            let a = face[k];
            let b = face[(k + 1) % 3];
            let key = (a.min(b), a.max(b));
            let incident = edge_faces.entry(key).or_default();
            if incident.len() == 2 {
                return Err(NavError::NonManifoldEdge { v0: key.0, v1: key.1 });
            }
            incident.push(fi);
        }
    }

    let adjacency = edge_faces
        .values()
        .filter(|incident| incident.len() == 2 && incident[0] != incident[1])
        .map(|incident| (FaceId::new(incident[0]), FaceId::new(incident[1])))
        .collect();

    Ok(TriMesh::from_parts(
        vertices.to_vec(),
        to_vertex_ids(faces),
        adjacency,
    ))
}

/// Build a navigation mesh with a caller-supplied face adjacency relation.
///
/// Each pair must reference two distinct, existing faces. Whether a pair
/// actually shares an edge is not checked here; edge-anchored sampling reports
/// [`NavError::MalformedAdjacency`] when it does not.
pub fn build_with_adjacency<I: MeshIndex>(
    vertices: &[Point3<f64>],
    faces: &[[usize; 3]],
    adjacency: &[(usize, usize)],
) -> Result<TriMesh<I>> {
    validate_faces::<I>(vertices, faces)?;

    let num_faces = faces.len();
    let pairs = adjacency
        .iter()
        .map(|&(a, b)| {
            if a >= num_faces || b >= num_faces || a == b {
                Err(NavError::InvalidFaceIndex { a, b, num_faces })
            } else {
                Ok((FaceId::new(a), FaceId::new(b)))
            }
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(TriMesh::from_parts(vertices.to_vec(), to_vertex_ids(faces), pairs))
}

/// Convert a mesh back to a face-vertex representation.
///
/// Returns (vertices, faces) tuple.
pub fn to_face_vertex<I: MeshIndex>(mesh: &TriMesh<I>) -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
    let vertices = mesh.vertices.clone();
    let faces = mesh
        .faces
        .iter()
        .map(|[v0, v1, v2]| [v0.index(), v1.index(), v2.index()])
        .collect();

    (vertices, faces)
}

fn validate_faces<I: MeshIndex>(vertices: &[Point3<f64>], faces: &[[usize; 3]]) -> Result<()> {
    if faces.is_empty() {
        return Err(NavError::EmptyMesh);
    }

    // Largest index must fit in I
    let max = I::MAX.to_usize();
    for (name, count) in [("vertices", vertices.len()), ("faces", faces.len())] {
        if count.saturating_sub(1) > max {
            return Err(NavError::invalid_param(name, count, "exceeds index type"));
        }
    }

    for (fi, face) in faces.iter().enumerate() {
        for &vi in face {
            if vi >= vertices.len() {
                return Err(NavError::InvalidVertexIndex { face: fi, vertex: vi });
            }
        }
        if face[0] == face[1] || face[1] == face[2] || face[0] == face[2] {
            return Err(NavError::DegenerateFace { face: fi });
        }
    }

    Ok(())
}

fn to_vertex_ids<I: MeshIndex>(faces: &[[usize; 3]]) -> Vec<[VertexId<I>; 3]> {
    faces
        .iter()
        .map(|&[a, b, c]| [VertexId::new(a), VertexId::new(b), VertexId::new(c)])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_triangles() -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        ];
        let faces = vec![[0, 1, 2], [1, 2, 3]];
        (vertices, faces)
    }

    #[test]
    fn test_two_triangles_adjacent() {
        let (vertices, faces) = two_triangles();
        let mesh: TriMesh<u32> = build_from_triangles(&vertices, &faces).unwrap();

        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.num_faces(), 2);
        assert_eq!(mesh.face_adjacency(), &[(FaceId::new(0), FaceId::new(1))]);
    }

    #[test]
    fn test_fan_adjacency() {
        // Four triangles around a center vertex, closed fan
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(-1.0, 0.0, 0.0),
            Point3::new(0.0, -1.0, 0.0),
        ];
        let faces = vec![[0, 1, 2], [0, 2, 3], [0, 3, 4], [0, 4, 1]];
        let mesh: TriMesh<u32> = build_from_triangles(&vertices, &faces).unwrap();

        assert_eq!(mesh.num_adjacencies(), 4);
        for f in mesh.face_ids() {
            assert_eq!(mesh.face_neighbors(f).len(), 2, "face {:?}", f);
        }
        assert!(!mesh.are_adjacent(FaceId::new(0), FaceId::new(2)));
    }

    #[test]
    fn test_non_manifold_edge() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, -1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
        ];
        // Edge (0, 1) shared by three faces
        let faces = vec![[0, 1, 2], [1, 0, 3], [0, 1, 4]];
        let result: Result<TriMesh<u32>> = build_from_triangles(&vertices, &faces);
        assert!(matches!(result, Err(NavError::NonManifoldEdge { v0: 0, v1: 1 })));
    }

    #[test]
    fn test_invalid_vertex_index() {
        let vertices = vec![Point3::new(0.0, 0.0, 0.0)];
        let faces = vec![[0, 1, 2]];

        let result: Result<TriMesh<u32>> = build_from_triangles(&vertices, &faces);
        assert!(matches!(result, Err(NavError::InvalidVertexIndex { face: 0, vertex: 1 })));
    }

    #[test]
    fn test_degenerate_face() {
        let (vertices, _) = two_triangles();
        let faces = vec![[0, 0, 2]];

        let result: Result<TriMesh<u32>> = build_from_triangles(&vertices, &faces);
        assert!(matches!(result, Err(NavError::DegenerateFace { face: 0 })));
    }

    #[test]
    fn test_empty_faces() {
        let (vertices, _) = two_triangles();
        let result: Result<TriMesh<u32>> = build_from_triangles(&vertices, &[]);
        assert!(matches!(result, Err(NavError::EmptyMesh)));
    }

    #[test]
    fn test_counts_must_fit_index_type() {
        // 21846 disjoint triangles need 65538 vertices, two past u16
        let n = 21_846;
        let vertices: Vec<_> = (0..3 * n)
            .map(|i| Point3::new(i as f64, ((i % 3) * (i % 3)) as f64, 0.0))
            .collect();
        let faces: Vec<[usize; 3]> = (0..n).map(|f| [3 * f, 3 * f + 1, 3 * f + 2]).collect();

        let small: Result<TriMesh<u16>> = build_from_triangles(&vertices, &faces);
        assert!(matches!(
            small,
            Err(NavError::InvalidParameter { name: "vertices", .. })
        ));

        let wide: TriMesh<u32> = build_from_triangles(&vertices, &faces).unwrap();
        assert_eq!(wide.num_faces(), n);
    }

    #[test]
    fn test_explicit_adjacency() {
        let (vertices, faces) = two_triangles();
        let mesh: TriMesh<u32> = build_with_adjacency(&vertices, &faces, &[(1, 0)]).unwrap();
        assert_eq!(mesh.face_adjacency(), &[(FaceId::new(0), FaceId::new(1))]);

        let bad: Result<TriMesh<u32>> = build_with_adjacency(&vertices, &faces, &[(0, 2)]);
        assert!(matches!(bad, Err(NavError::InvalidFaceIndex { a: 0, b: 2, num_faces: 2 })));

        let self_pair: Result<TriMesh<u32>> = build_with_adjacency(&vertices, &faces, &[(1, 1)]);
        assert!(self_pair.is_err());
    }

    #[test]
    fn test_roundtrip() {
        let (vertices, faces) = two_triangles();
        let mesh: TriMesh<u32> = build_from_triangles(&vertices, &faces).unwrap();

        let (out_verts, out_faces) = to_face_vertex(&mesh);
        assert_eq!(out_faces, faces);
        for (v_in, v_out) in vertices.iter().zip(out_verts.iter()) {
            assert!((v_in - v_out).norm() < 1e-10);
        }
    }
}
