//! Core mesh data structures.
//!
//! This module provides the triangle mesh that navigation runs over.
//!
//! # Overview
//!
//! The primary type is [`TriMesh`], a face-vertex triangle mesh that also
//! stores which faces share an edge. Navigation never walks vertices or edges
//! directly; it hops from face to neighboring face, so the adjacency relation
//! is the only topology kept.
//!
//! # Index Types
//!
//! Mesh elements are identified by type-safe index wrappers:
//! - [`VertexId`] - Identifies a vertex
//! - [`FaceId`] - Identifies a face (triangle)
//!
//! These indices are generic over the underlying integer type ([`MeshIndex`] trait).
//!
//! # Construction
//!
//! ```
//! use trinav::mesh::{TriMesh, build_from_triangles};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ];
//! let faces = vec![[0, 1, 2]];
//!
//! let mesh: TriMesh = build_from_triangles(&vertices, &faces).unwrap();
//! assert!(mesh.face_adjacency().is_empty());
//! ```

mod builder;
mod index;
mod trimesh;

pub use builder::{build_from_triangles, build_with_adjacency, to_face_vertex};
pub use index::{FaceId, MeshIndex, VertexId};
pub use trimesh::{TriMesh, Triangle};
