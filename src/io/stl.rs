//! STL (stereolithography) format support.
//!
//! STL stores three corners per triangle with no shared vertex list. Corners
//! are welded by exact coordinate so that neighboring triangles reference the
//! same vertex and become adjacent.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use nalgebra::Point3;

use super::{drop_degenerate, VertexWelder};
use crate::error::{NavError, Result};
use crate::mesh::{build_from_triangles, MeshIndex, TriMesh};

/// Load a navigation mesh from an STL file.
///
/// Automatically detects binary vs ASCII format. Triangles that collapse after
/// welding are skipped.
///
/// # Example
///
/// ```no_run
/// use trinav::io::stl;
/// use trinav::mesh::TriMesh;
///
/// let mesh: TriMesh = stl::load("maze.stl").unwrap();
/// ```
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<TriMesh<I>> {
    let path = path.as_ref();
    let mut reader = BufReader::new(File::open(path)?);

    let stl = stl_io::read_stl(&mut reader).map_err(|e| NavError::LoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut welder = VertexWelder::default();
    let mut faces: Vec<[usize; 3]> = stl
        .faces
        .iter()
        .map(|tri| {
            tri.vertices.map(|vi| {
                let v = &stl.vertices[vi];
                welder.insert(Point3::new(v[0] as f64, v[1] as f64, v[2] as f64))
            })
        })
        .collect();
    drop_degenerate(path, &mut faces);

    if faces.is_empty() {
        return Err(NavError::LoadError {
            path: path.to_path_buf(),
            message: "STL file contains no valid triangles".to_string(),
        });
    }

    build_from_triangles(&welder.into_vertices(), &faces)
}
