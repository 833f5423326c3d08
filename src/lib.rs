//! # trinav
//!
//! Plausible path planning over the surface of a triangulated navigation mesh.
//!
//! Given a mesh and two points on its surface, trinav returns an ordered list
//! of 3D waypoints that stays on the surface and crosses a chain of adjacent
//! triangles from the start to the target. It is meant for agent and camera
//! paths over non-planar, obstacle-shaped terrain where a believable route
//! matters more than the exact geodesic.
//!
//! ## Features
//!
//! - **Face-adjacency search**: best-first search keyed by `g + h`, one visit per face
//! - **Pluggable waypoint sampling**: uniform random per face, or edge-anchored midpoints
//! - **Surface queries**: closest point and containing face for arbitrary 3D points
//! - **File formats**: OBJ, STL and PLY
//!
//! ## Quick Start
//!
//! ```no_run
//! use trinav::prelude::*;
//! use trinav::algo::navigate::{navigate, NavigateOptions};
//! use nalgebra::Point3;
//!
//! let mesh: TriMesh = trinav::io::load("terrain.ply").unwrap();
//!
//! let start = Point3::new(0.0, 0.0, 0.0);
//! let target = Point3::new(12.0, 4.0, 1.5);
//! match navigate(&mesh, start, target, &NavigateOptions::default()).unwrap() {
//!     Some(path) => println!("{} waypoints, length {:.3}", path.len(), path.length()),
//!     None => println!("no path"),
//! }
//! ```
//!
//! ## Building Meshes Programmatically
//!
//! ```
//! use trinav::prelude::*;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//! ];
//! let faces = vec![[0, 1, 2], [1, 2, 3]];
//!
//! let mesh: TriMesh = build_from_triangles(&vertices, &faces).unwrap();
//! assert_eq!(mesh.num_faces(), 2);
//! assert!(mesh.are_adjacent(FaceId::new(0), FaceId::new(1)));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod io;
pub mod mesh;

/// Prelude module for convenient imports.
///
/// ```
/// use trinav::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::navigate::{navigate, NavPath, NavigateOptions, SamplingMode};
    pub use crate::error::{NavError, Result};
    pub use crate::mesh::{
        build_from_triangles, build_with_adjacency, FaceId, MeshIndex, TriMesh, Triangle,
        VertexId,
    };
}

// Re-export nalgebra types for convenience
pub use nalgebra;
