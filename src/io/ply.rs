//! PLY (Stanford polygon) format support.
//!
//! Reading accepts ASCII and binary files through `ply-rs`; faces are kept as
//! polygons. Writing produces ASCII with double-precision coordinates.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;
use ply_rs::parser::Parser;
use ply_rs::ply::{DefaultElement, Property};

use crate::error::{MeshError, Result};
use crate::mesh::{build, to_face_vertex, HalfEdgeMesh, MeshIndex};

/// Read a mesh from PLY data.
pub fn read<R: BufRead, I: MeshIndex>(mut reader: R) -> Result<HalfEdgeMesh<I>> {
    let parser = Parser::<DefaultElement>::new();
    let ply = parser
        .read_ply(&mut reader)
        .map_err(|e| MeshError::invalid_format(e.to_string()))?;

    let vertex_element = ply
        .payload
        .get("vertex")
        .ok_or_else(|| MeshError::invalid_format("PLY file has no vertex element"))?;

    let mut vertices: Vec<Point3<f64>> = Vec::with_capacity(vertex_element.len());
    for (i, vertex) in vertex_element.iter().enumerate() {
        let coord = |name: &str| {
            get_float_property(vertex, name).ok_or_else(|| {
                MeshError::invalid_format(format!("vertex {} missing {} coordinate", i, name))
            })
        };
        vertices.push(Point3::new(coord("x")?, coord("y")?, coord("z")?));
    }

    // A point cloud has no face element; it then fails as isolated vertices.
    let mut faces: Vec<Vec<usize>> = Vec::new();
    if let Some(face_element) = ply.payload.get("face") {
        faces.reserve(face_element.len());
        for (i, face) in face_element.iter().enumerate() {
            let indices = get_list_property(face, "vertex_indices")
                .or_else(|| get_list_property(face, "vertex_index"))
                .ok_or_else(|| {
                    MeshError::invalid_format(format!("face {} missing vertex_indices", i))
                })?
                .map_err(|value| {
                    MeshError::invalid_format(format!(
                        "face {} has negative vertex index {}",
                        i, value
                    ))
                })?;
            faces.push(indices);
        }
    }

    Ok(build(&vertices, &faces)?)
}

/// Load a mesh from a PLY file.
///
/// # Example
///
/// ```no_run
/// use tessera::io::ply;
/// use tessera::mesh::HalfEdgeMesh;
///
/// let mesh: HalfEdgeMesh = ply::load("model.ply").unwrap();
/// ```
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<HalfEdgeMesh<I>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    read(BufReader::new(file)).map_err(|e| super::with_path(path, e))
}

fn get_float_property(element: &DefaultElement, name: &str) -> Option<f64> {
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

/// An index list, or the first entry that does not fit a `usize` (negative).
fn get_list_property(
    element: &DefaultElement,
    name: &str,
) -> Option<std::result::Result<Vec<usize>, String>> {
    fn convert<T: Copy + ToString + TryInto<usize>>(
        v: &[T],
    ) -> std::result::Result<Vec<usize>, String> {
        v.iter()
            .map(|&x| x.try_into().map_err(|_| x.to_string()))
            .collect()
    }
    match element.get(name)? {
        Property::ListInt(v) => Some(convert(v)),
        Property::ListUInt(v) => Some(convert(v)),
        Property::ListShort(v) => Some(convert(v)),
        Property::ListUShort(v) => Some(convert(v)),
        Property::ListChar(v) => Some(convert(v)),
        Property::ListUChar(v) => Some(convert(v)),
        _ => None,
    }
}

/// Write a mesh as ASCII PLY. Boundary loops are not written.
pub fn write<W: Write, I: MeshIndex>(mesh: &HalfEdgeMesh<I>, mut writer: W) -> Result<()> {
    let (vertices, faces) = to_face_vertex(mesh);

    if let Some(f) = faces.iter().position(|f| f.len() > u8::MAX as usize) {
        return Err(MeshError::invalid_format(format!(
            "face {} has {} sides; PLY lists are limited to {}",
            f,
            faces[f].len(),
            u8::MAX
        )));
    }

    writeln!(writer, "ply")?;
    writeln!(writer, "format ascii 1.0")?;
    writeln!(writer, "comment Generated by tessera")?;
    writeln!(writer, "element vertex {}", vertices.len())?;
    writeln!(writer, "property double x")?;
    writeln!(writer, "property double y")?;
    writeln!(writer, "property double z")?;
    writeln!(writer, "element face {}", faces.len())?;
    writeln!(writer, "property list uchar int vertex_indices")?;
    writeln!(writer, "end_header")?;

    for v in &vertices {
        writeln!(writer, "{} {} {}", v.x, v.y, v.z)?;
    }

    for f in &faces {
        write!(writer, "{}", f.len())?;
        for i in f {
            write!(writer, " {}", i)?;
        }
        writeln!(writer)?;
    }

    writer.flush()?;
    Ok(())
}

/// Save a mesh to a PLY file (ASCII format).
pub fn save<P: AsRef<Path>, I: MeshIndex>(mesh: &HalfEdgeMesh<I>, path: P) -> Result<()> {
    let file = File::create(path)?;
    write(mesh, BufWriter::new(file))
}
