//! Error types for tessera.
//!
//! Construction failures are reported as [`MeshDefect`]; everything else that
//! can go wrong (I/O, parsing, corrupted traversal) is a [`MeshError`].

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// A structural defect that prevents a mesh from being built.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeshDefect {
    /// A face references a vertex index outside the vertex list.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A face has fewer than two vertices or repeats a vertex along one side.
    #[error("face {face} is degenerate")]
    DegenerateFace {
        /// The face index.
        face: usize,
    },

    /// A vertex is not referenced by any face.
    #[error("vertex {vertex} is isolated")]
    IsolatedVertex {
        /// The vertex index.
        vertex: usize,
    },

    /// A face shares none of its edges with any other face.
    #[error("face {face} is isolated")]
    IsolatedFace {
        /// The face index.
        face: usize,
    },

    /// An edge has more than two incident faces.
    #[error("edge ({v0}, {v1}) has more than two incident faces")]
    NonManifoldEdge {
        /// First vertex of the edge.
        v0: usize,
        /// Second vertex of the edge.
        v1: usize,
    },

    /// The faces around a vertex do not form a single fan.
    #[error("vertex {vertex} is non-manifold")]
    NonManifoldVertex {
        /// The vertex index.
        vertex: usize,
    },

    /// Two faces traverse their shared edge in the same direction.
    #[error("faces sharing edge ({v0}, {v1}) have inconsistent orientation")]
    InconsistentOrientation {
        /// Origin of both half-edges.
        v0: usize,
        /// Destination of both half-edges.
        v1: usize,
    },

    /// The mesh needs more elements of one kind than the index type can
    /// address.
    #[error("mesh needs {count} {kind}, index type allows at most {max}")]
    TooLarge {
        /// The element kind (`"vertices"`, `"half-edges"`, `"faces"`).
        kind: &'static str,
        /// Number of elements required.
        count: usize,
        /// Largest element count the index type supports.
        max: usize,
    },
}

/// Errors that can occur during mesh operations.
#[derive(Error, Debug)]
pub enum MeshError {
    /// The input does not describe a valid mesh.
    #[error("invalid mesh: {0}")]
    Defect(#[from] MeshDefect),

    /// A rotation walk exceeded the number of half-edges in the mesh.
    #[error("adjacency walk exceeded {limit} steps; mesh connectivity is corrupted")]
    WalkLimitExceeded {
        /// The step bound that was hit.
        limit: usize,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed text input.
    #[error("parse error on line {line}: {message}")]
    Parse {
        /// One-based line number.
        line: usize,
        /// What was wrong.
        message: String,
    },

    /// Well-formed input that does not describe a mesh (missing elements,
    /// unsupported properties).
    #[error("invalid mesh data: {message}")]
    InvalidFormat {
        /// What was wrong.
        message: String,
    },

    /// Error loading mesh from file.
    #[error("failed to load mesh from {path}: {message}")]
    LoadError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Unsupported file format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension.
        extension: String,
    },
}

impl MeshError {
    /// Create a parse error for the given line.
    pub fn parse<T: std::fmt::Display>(line: usize, message: T) -> Self {
        MeshError::Parse {
            line,
            message: message.to_string(),
        }
    }

    /// Create an invalid-format error.
    pub fn invalid_format<T: std::fmt::Display>(message: T) -> Self {
        MeshError::InvalidFormat {
            message: message.to_string(),
        }
    }

    /// The construction defect behind this error, if any.
    pub fn defect(&self) -> Option<&MeshDefect> {
        match self {
            MeshError::Defect(d) => Some(d),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defect_converts_into_error() {
        let err: MeshError = MeshDefect::IsolatedVertex { vertex: 4 }.into();
        assert_eq!(err.defect(), Some(&MeshDefect::IsolatedVertex { vertex: 4 }));
        assert_eq!(err.to_string(), "invalid mesh: vertex 4 is isolated");
    }

    #[test]
    fn test_too_large_message() {
        let defect = MeshDefect::TooLarge {
            kind: "half-edges",
            count: 70000,
            max: 65534,
        };
        assert_eq!(
            defect.to_string(),
            "mesh needs 70000 half-edges, index type allows at most 65534"
        );
    }

    #[test]
    fn test_parse_error_message() {
        let err = MeshError::parse(3, "expected 3 coordinates");
        assert!(err.defect().is_none());
        assert_eq!(err.to_string(), "parse error on line 3: expected 3 coordinates");
    }
}
