//! PLY (Stanford polygon) format support.
//!
//! Meshes are read from the `vertex` and `face` elements; polygons with more
//! than three corners are fan-triangulated. Paths are written as a PLY with a
//! `vertex` element for waypoints and an `edge` element for the segments.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;
use ply_rs::parser::Parser;
use ply_rs::ply::{DefaultElement, Property};

use super::drop_degenerate;
use crate::algo::navigate::NavPath;
use crate::error::{NavError, Result};
use crate::mesh::{build_from_triangles, MeshIndex, TriMesh};

/// Load a navigation mesh from a PLY file.
///
/// # Example
///
/// ```no_run
/// use trinav::io::ply;
/// use trinav::mesh::TriMesh;
///
/// let mesh: TriMesh = ply::load("terrain.ply").unwrap();
/// ```
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<TriMesh<I>> {
    let path = path.as_ref();
    let mut reader = BufReader::new(File::open(path)?);
    let load_error = |message: &str| NavError::LoadError {
        path: path.to_path_buf(),
        message: message.to_string(),
    };

    let parser = Parser::<DefaultElement>::new();
    let ply = parser
        .read_ply(&mut reader)
        .map_err(|e| load_error(&e.to_string()))?;

    let vertex_element = ply
        .payload
        .get("vertex")
        .ok_or_else(|| load_error("PLY file has no vertex element"))?;

    let vertices = vertex_element
        .iter()
        .map(|vertex| {
            let coord = |name: &str| {
                float_property(vertex, name)
                    .ok_or_else(|| load_error(&format!("vertex missing {} coordinate", name)))
            };
            Ok(Point3::new(coord("x")?, coord("y")?, coord("z")?))
        })
        .collect::<Result<Vec<_>>>()?;

    let face_element = ply
        .payload
        .get("face")
        .ok_or_else(|| load_error("PLY file has no face element"))?;

    let mut faces: Vec<[usize; 3]> = Vec::with_capacity(face_element.len());
    for face in face_element {
        let indices = index_list_property(face, "vertex_indices")
            .or_else(|| index_list_property(face, "vertex_index"))
            .ok_or_else(|| load_error("face missing vertex_indices property"))?;

        for i in 1..indices.len().saturating_sub(1) {
            faces.push([indices[0], indices[i], indices[i + 1]]);
        }
    }

    drop_degenerate(path, &mut faces);

    if faces.is_empty() {
        return Err(load_error("PLY file contains no faces"));
    }

    build_from_triangles(&vertices, &faces)
}

fn float_property(element: &DefaultElement, name: &str) -> Option<f64> {
    match element.get(name)? {
        Property::Float(v) => Some(*v as f64),
        Property::Double(v) => Some(*v),
        Property::Int(v) => Some(*v as f64),
        Property::UInt(v) => Some(*v as f64),
        Property::Short(v) => Some(*v as f64),
        Property::UShort(v) => Some(*v as f64),
        Property::Char(v) => Some(*v as f64),
        Property::UChar(v) => Some(*v as f64),
        _ => None,
    }
}

fn index_list_property(element: &DefaultElement, name: &str) -> Option<Vec<usize>> {
    match element.get(name)? {
        Property::ListInt(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUInt(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListShort(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUShort(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUChar(v) => Some(v.iter().map(|&x| x as usize).collect()),
        _ => None,
    }
}

/// Save a navigation path as an ASCII PLY polyline.
///
/// Each waypoint becomes a vertex (with the index of its face) and each
/// segment an edge, which most mesh viewers draw on top of the loaded mesh.
pub fn save_path<P: AsRef<Path>, I: MeshIndex>(path: &NavPath<I>, file: P) -> Result<()> {
    let mut writer = BufWriter::new(File::create(file.as_ref())?);

    writeln!(writer, "ply")?;
    writeln!(writer, "format ascii 1.0")?;
    writeln!(writer, "comment trinav path, length {}", path.length())?;
    writeln!(writer, "element vertex {}", path.len())?;
    writeln!(writer, "property double x")?;
    writeln!(writer, "property double y")?;
    writeln!(writer, "property double z")?;
    writeln!(writer, "property int face")?;
    writeln!(writer, "element edge {}", path.len().saturating_sub(1))?;
    writeln!(writer, "property int vertex1")?;
    writeln!(writer, "property int vertex2")?;
    writeln!(writer, "end_header")?;

    for (p, face) in path.iter() {
        writeln!(writer, "{} {} {} {}", p.x, p.y, p.z, face.index())?;
    }
    for i in 1..path.len() {
        writeln!(writer, "{} {}", i - 1, i)?;
    }

    writer.flush()?;
    Ok(())
}
