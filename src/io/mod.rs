//! Mesh file I/O.
//!
//! # Supported Formats
//!
//! | Format | Extension | Load | Save | Notes |
//! |--------|-----------|------|------|-------|
//! | OFF | `.off` | ✓ | ✓ | Polygons, plain text |
//! | PLY | `.ply` | ✓ | ✓ | ASCII or binary in, ASCII out |
//!
//! Every loader goes through the same construction as [`crate::mesh::build`],
//! so a file describing a defective mesh fails with [`MeshError::Defect`].
//!
//! # Usage
//!
//! ```no_run
//! use tessera::io::{load, save};
//! use tessera::mesh::HalfEdgeMesh;
//!
//! // Format is picked from the extension
//! let mesh: HalfEdgeMesh = load("model.off").unwrap();
//! save(&mesh, "model.ply").unwrap();
//! ```
//!
//! The format modules also read from and write to any `BufRead` / `Write`:
//!
//! ```
//! use tessera::io::off;
//! use tessera::mesh::HalfEdgeMesh;
//!
//! let text = "OFF\n3 1 0\n0 0 0\n1 0 0\n0 1 0\n3 0 1 2\n";
//! let mesh: HalfEdgeMesh = off::read(text.as_bytes()).unwrap();
//!
//! let mut out = Vec::new();
//! off::write(&mesh, &mut out).unwrap();
//! assert_eq!(String::from_utf8(out).unwrap(), text);
//! ```

pub mod off;
pub mod ply;

use std::fmt;
use std::path::Path;

use crate::error::{MeshError, Result};
use crate::mesh::{HalfEdgeMesh, MeshIndex};

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Object File Format.
    Off,
    /// PLY (Stanford polygon) format.
    Ply,
}

impl Format {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "off" => Some(Format::Off),
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

    fn for_path(path: &Path) -> Result<Format> {
        Format::from_path(path).ok_or_else(|| MeshError::UnsupportedFormat {
            extension: path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("(none)")
                .to_string(),
        })
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Off => write!(f, "OFF"),
            Format::Ply => write!(f, "PLY"),
        }
    }
}

/// Attach the file path to content errors.
///
/// I/O errors and construction defects pass through unchanged so callers can
/// still match on them.
fn with_path(path: &Path, err: MeshError) -> MeshError {
    match err {
        MeshError::Parse { .. } | MeshError::InvalidFormat { .. } => MeshError::LoadError {
            path: path.to_path_buf(),
            message: err.to_string(),
        },
        other => other,
    }
}

/// Load a mesh from a file with automatic format detection.
///
/// The format is determined by the file extension.
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<HalfEdgeMesh<I>> {
    let path = path.as_ref();
    let mesh = match Format::for_path(path)? {
        Format::Off => off::load(path)?,
        Format::Ply => ply::load(path)?,
    };
    log::info!(
        "loaded {}: {} vertices, {} faces",
        path.display(),
        mesh.num_vertices(),
        mesh.num_faces()
    );
    Ok(mesh)
}

/// Save a mesh to a file with automatic format detection.
///
/// The format is determined by the file extension.
pub fn save<P: AsRef<Path>, I: MeshIndex>(mesh: &HalfEdgeMesh<I>, path: P) -> Result<()> {
    let path = path.as_ref();
    match Format::for_path(path)? {
        Format::Off => off::save(mesh, path)?,
        Format::Ply => ply::save(mesh, path)?,
    }
    log::info!("saved {}", path.display());
    Ok(())
}
