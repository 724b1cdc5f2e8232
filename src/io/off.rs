//! OFF (Object File Format) support.
//!
//! ```text
//! OFF
//! # optional comments
//! <num_vertices> <num_faces> <num_edges>
//! x y z
//! ...
//! n i0 i1 ... i(n-1)
//! ...
//! ```
//!
//! The counts may follow `OFF` on the same line. Text after `#` is ignored,
//! as are blank lines and any trailing values on vertex or face lines
//! (colors). The edge count is read but not used.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;

use crate::error::{MeshError, Result};
use crate::mesh::{build, to_face_vertex, HalfEdgeMesh, MeshIndex};

/// Non-empty lines with comments stripped, paired with one-based line numbers.
struct Lines<R> {
    inner: std::io::Lines<R>,
    line: usize,
}

impl<R: BufRead> Lines<R> {
    fn new(reader: R) -> Self {
        Self {
            inner: reader.lines(),
            line: 0,
        }
    }

    /// The next meaningful line split into tokens, or `None` at end of input.
    fn next_tokens(&mut self) -> Result<Option<(usize, Vec<String>)>> {
        for text in self.inner.by_ref() {
            let text = text?;
            self.line += 1;
            let content = text.split('#').next().unwrap_or("");
            let tokens: Vec<String> = content.split_whitespace().map(str::to_string).collect();
            if !tokens.is_empty() {
                return Ok(Some((self.line, tokens)));
            }
        }
        Ok(None)
    }

    fn expect_tokens(&mut self, what: &str) -> Result<(usize, Vec<String>)> {
        self.next_tokens()?.ok_or_else(|| {
            MeshError::parse(self.line + 1, format!("unexpected end of input, expected {}", what))
        })
    }
}

const MAX_RESERVE: usize = 1 << 20;

fn parse_number<T: std::str::FromStr>(line: usize, token: &str, what: &str) -> Result<T> {
    token
        .parse()
        .map_err(|_| MeshError::parse(line, format!("invalid {} '{}'", what, token)))
}

/// Parse OFF text into a vertex list and a polygon list.
fn read_face_vertex<R: BufRead>(reader: R) -> Result<(Vec<Point3<f64>>, Vec<Vec<usize>>)> {
    let mut lines = Lines::new(reader);

    let (line, mut header) = lines.expect_tokens("OFF header")?;
    if header[0] != "OFF" {
        return Err(MeshError::parse(line, format!("expected 'OFF', found '{}'", header[0])));
    }
    header.remove(0);

    let (line, counts) = if header.is_empty() {
        lines.expect_tokens("element counts")?
    } else {
        (line, header)
    };
    if counts.len() < 2 {
        return Err(MeshError::parse(line, "expected vertex and face counts"));
    }
    let num_vertices: usize = parse_number(line, &counts[0], "vertex count")?;
    let num_faces: usize = parse_number(line, &counts[1], "face count")?;

    // Header counts are untrusted; cap the up-front reservation.
    let mut vertices = Vec::with_capacity(num_vertices.min(MAX_RESERVE));
    for _ in 0..num_vertices {
        let (line, tokens) = lines.expect_tokens("vertex")?;
        if tokens.len() < 3 {
            return Err(MeshError::parse(line, "expected 3 coordinates"));
        }
        let x: f64 = parse_number(line, &tokens[0], "coordinate")?;
        let y: f64 = parse_number(line, &tokens[1], "coordinate")?;
        let z: f64 = parse_number(line, &tokens[2], "coordinate")?;
        vertices.push(Point3::new(x, y, z));
    }

    let mut faces = Vec::with_capacity(num_faces.min(MAX_RESERVE));
    for _ in 0..num_faces {
        let (line, tokens) = lines.expect_tokens("face")?;
        let n: usize = parse_number(line, &tokens[0], "face size")?;
        if tokens.len() - 1 < n {
            return Err(MeshError::parse(
                line,
                format!("expected {} vertex indices, found {}", n, tokens.len() - 1),
            ));
        }
        let face = tokens[1..=n]
            .iter()
            .map(|t| parse_number(line, t, "vertex index"))
            .collect::<Result<Vec<usize>>>()?;
        faces.push(face);
    }

    Ok((vertices, faces))
}

/// Read a mesh from OFF text.
///
/// # Example
///
/// ```
/// use tessera::io::off;
/// use tessera::mesh::HalfEdgeMesh;
///
/// let text = "OFF\n4 1 0\n0 0 0\n1 0 0\n1 1 0\n0 1 0\n4 0 1 2 3\n";
/// let mesh: HalfEdgeMesh = off::read(text.as_bytes()).unwrap();
/// assert!(mesh.is_quad_mesh());
/// ```
pub fn read<R: BufRead, I: MeshIndex>(reader: R) -> Result<HalfEdgeMesh<I>> {
    let (vertices, faces) = read_face_vertex(reader)?;
    Ok(build(&vertices, &faces)?)
}

/// Load a mesh from an OFF file.
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<HalfEdgeMesh<I>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    read(BufReader::new(file)).map_err(|e| super::with_path(path, e))
}

/// Write a mesh as OFF text. Boundary loops are not written.
pub fn write<W: Write, I: MeshIndex>(mesh: &HalfEdgeMesh<I>, mut writer: W) -> Result<()> {
    let (vertices, faces) = to_face_vertex(mesh);

    writeln!(writer, "OFF")?;
    writeln!(writer, "{} {} 0", vertices.len(), faces.len())?;
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

/// Save a mesh to an OFF file.
pub fn save<P: AsRef<Path>, I: MeshIndex>(mesh: &HalfEdgeMesh<I>, path: P) -> Result<()> {
    let file = File::create(path)?;
    write(mesh, BufWriter::new(file))
}
