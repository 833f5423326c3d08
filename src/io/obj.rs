//! Wavefront OBJ format support.
//!
//! Polygons are triangulated on load. Every object and group in the file
//! contributes to a single navigation mesh; their vertices are welded by
//! coordinate so that faces on either side of a group boundary stay adjacent.

use std::path::Path;

use nalgebra::Point3;

use super::{drop_degenerate, VertexWelder};
use crate::error::{NavError, Result};
use crate::mesh::{build_from_triangles, MeshIndex, TriMesh};

/// Load a navigation mesh from an OBJ file.
///
/// Materials, normals and texture coordinates are ignored.
///
/// # Example
///
/// ```no_run
/// use trinav::io::obj;
/// use trinav::mesh::TriMesh;
///
/// let mesh: TriMesh = obj::load("navi_maze.obj").unwrap();
/// ```
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<TriMesh<I>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} not found", path.display()),
        )
        .into());
    }

    let options = tobj::LoadOptions {
        triangulate: true,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    };
    let (models, _materials) =
        tobj::load_obj(path, &options).map_err(|e| NavError::LoadError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let mut welder = VertexWelder::default();
    let mut faces: Vec<[usize; 3]> = Vec::new();
    for model in &models {
        let mesh = &model.mesh;
        let corner = |i: u32| {
            let k = 3 * i as usize;
            Point3::new(
                mesh.positions[k] as f64,
                mesh.positions[k + 1] as f64,
                mesh.positions[k + 2] as f64,
            )
        };

        for tri in mesh.indices.chunks_exact(3) {
            faces.push([
                welder.insert(corner(tri[0])),
                welder.insert(corner(tri[1])),
                welder.insert(corner(tri[2])),
            ]);
        }
    }
    drop_degenerate(path, &mut faces);

    if faces.is_empty() {
        return Err(NavError::LoadError {
            path: path.to_path_buf(),
            message: "OBJ file contains no faces".to_string(),
        });
    }

    build_from_triangles(&welder.into_vertices(), &faces)
}
