//! Mesh file I/O.
//!
//! Navigation meshes are loaded from common triangle formats. Adjacency is
//! derived from shared vertices after loading, so formats that store vertices
//! per triangle (STL) or per object (OBJ) are welded by exact coordinate first.
//!
//! # Supported Formats
//!
//! | Format | Extension | Load | Notes |
//! |--------|-----------|------|-------|
//! | Wavefront OBJ | `.obj` | ✓ | Polygons are triangulated, objects welded |
//! | STL | `.stl` | ✓ | Binary and ASCII |
//! | PLY | `.ply` | ✓ | Polygons are fan-triangulated |
//!
//! Computed paths can be written out as PLY polylines with [`ply::save_path`].
//!
//! # Usage
//!
//! ```no_run
//! use trinav::io::load;
//! use trinav::mesh::TriMesh;
//!
//! let mesh: TriMesh = load("maze.stl").unwrap();
//! ```

pub mod obj;
pub mod ply;
pub mod stl;

use std::collections::HashMap;
use std::path::Path;

use nalgebra::Point3;

use crate::error::{NavError, Result};
use crate::mesh::{MeshIndex, TriMesh};

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Wavefront OBJ format.
    Obj,
    /// STL (stereolithography) format.
    Stl,
    /// PLY (Stanford polygon) format.
    Ply,
}

impl Format {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "obj" => Some(Format::Obj),
            "stl" => Some(Format::Stl),
            "ply" => Some(Format::Ply),
            _ => None,
        }
    }

    /// Detect format from file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }
}

/// Load a navigation mesh from a file with automatic format detection.
///
/// The format is determined by the file extension.
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<TriMesh<I>> {
    let path = path.as_ref();
    let format = Format::from_path(path).ok_or_else(|| NavError::UnsupportedFormat {
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)")
            .to_string(),
    })?;

    let mesh = match format {
        Format::Obj => obj::load(path)?,
        Format::Stl => stl::load(path)?,
        Format::Ply => ply::load(path)?,
    };

    log::info!(
        "loaded {}: {} vertices, {} faces, {} adjacencies",
        path.display(),
        mesh.num_vertices(),
        mesh.num_faces(),
        mesh.num_adjacencies()
    );
    Ok(mesh)
}

/// Merges vertices with identical coordinates.
///
/// `-0.0` and `0.0` are treated as the same coordinate.
#[derive(Debug, Default)]
pub(crate) struct VertexWelder {
    index: HashMap<[u64; 3], usize>,
    vertices: Vec<Point3<f64>>,
}

impl VertexWelder {
    /// Index of the welded vertex at `p`, inserting it if unseen.
    pub(crate) fn insert(&mut self, p: Point3<f64>) -> usize {
        let key = p.coords.map(|c| if c == 0.0 { 0.0f64.to_bits() } else { c.to_bits() });
        let vertices = &mut self.vertices;
        *self.index.entry([key.x, key.y, key.z]).or_insert_with(|| {
            vertices.push(p);
            vertices.len() - 1
        })
    }

    pub(crate) fn into_vertices(self) -> Vec<Point3<f64>> {
        self.vertices
    }
}

/// Drop triangles whose corners are not distinct, logging how many went.
pub(crate) fn drop_degenerate(path: &Path, faces: &mut Vec<[usize; 3]>) {
    let before = faces.len();
    faces.retain(|&[a, b, c]| a != b && b != c && a != c);
    let skipped = before - faces.len();
    if skipped > 0 {
        log::warn!("{}: skipped {} degenerate triangles", path.display(), skipped);
    }
}
