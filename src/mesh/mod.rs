//! Core mesh data structures.
//!
//! This module provides the half-edge mesh representation for arbitrary
//! polygon meshes, the construction routine that builds it from face-vertex
//! lists, and the geometric operators defined on it.
//!
//! # Overview
//!
//! The primary type is [`HalfEdgeMesh`]. Faces may be triangles, quads or any
//! mix of polygons. Holes are closed by synthetic boundary loops, so every
//! half-edge has a twin and every vertex rotation is a closed cycle.
//!
//! # Index Types
//!
//! Mesh elements are identified by type-safe index wrappers:
//! - [`VertexId`] - Identifies a vertex
//! - [`HalfEdgeId`] - Identifies a half-edge
//! - [`FaceId`] - Identifies a face or a boundary loop
//! - [`EdgeId`] - Identifies a full edge
//! - [`CornerId`] - Identifies a corner
//!
//! These indices are generic over the underlying integer type ([`MeshIndex`] trait),
//! allowing you to choose `u16`, `u32`, or `u64` based on mesh size.
//!
//! # Construction
//!
//! ```
//! use tessera::mesh::{build, HalfEdgeMesh, NormalWeighting, VertexId};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let faces = vec![[0, 1, 3], [3, 1, 2]];
//!
//! let mesh: HalfEdgeMesh = build(&vertices, &faces).unwrap();
//! assert_eq!(mesh.num_edges(), 5);
//!
//! let n = mesh.vertex_normal(VertexId::new(1), NormalWeighting::Angle).unwrap();
//! assert!((n.z - 1.0).abs() < 1e-12);
//! ```

mod builder;
mod geometry;
mod halfedge;
mod index;
mod topology;

pub use builder::{
    build, build_from_quads, build_from_triangles, build_with_options, to_face_vertex,
    BuildOptions, NonManifoldEdgePolicy,
};
pub use geometry::NormalWeighting;
pub use halfedge::{Around, Corner, Edge, Face, HalfEdge, HalfEdgeMesh, HalfEdgeWalk, Vertex};
pub use index::{CornerId, EdgeId, FaceId, HalfEdgeId, MeshIndex, VertexId};
pub use topology::TopologyIndex;
