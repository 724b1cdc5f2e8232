//! # Tessera
//!
//! A half-edge polygon mesh kernel with discrete differential-geometry
//! operators.
//!
//! Tessera turns a face-vertex description (positions plus ordered vertex
//! index lists) into a fully connected half-edge mesh, checks it for
//! structural defects, and answers adjacency and geometry queries on it.
//!
//! ## Features
//!
//! - **Half-edge data structure**: O(1) adjacency queries with type-safe indices
//! - **Arbitrary polygons**: triangles, quads and mixed meshes, with boundary loops
//! - **Flexible indexing**: Support for 16-bit, 32-bit, and 64-bit indices
//! - **Geometry**: areas, normals, angles, cotangents, dihedral angles, dual areas
//! - **Curvature**: angle defect, Gaussian, mean and principal curvature
//! - **File formats**: OFF, PLY
//!
//! ## Building Meshes Programmatically
//!
//! ```
//! use tessera::prelude::*;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//!     Point3::new(0.5, 0.5, 1.0),
//! ];
//!
//! let faces = vec![
//!     [0, 2, 1],  // bottom
//!     [0, 1, 3],  // front
//!     [1, 2, 3],  // right
//!     [2, 0, 3],  // left
//! ];
//!
//! let mesh: HalfEdgeMesh = build(&vertices, &faces).unwrap();
//! assert_eq!(mesh.num_vertices(), 4);
//! assert_eq!(mesh.num_edges(), 6);
//! assert_eq!(mesh.euler_characteristic(), 2);
//! ```
//!
//! ## Mesh Traversal
//!
//! ```
//! use tessera::prelude::*;
//! use nalgebra::Point3;
//!
//! # let vertices = vec![
//! #     Point3::new(0.0, 0.0, 0.0),
//! #     Point3::new(1.0, 0.0, 0.0),
//! #     Point3::new(0.5, 1.0, 0.0),
//! # ];
//! # let faces = vec![[0, 1, 2]];
//! # let mesh: HalfEdgeMesh = build(&vertices, &faces).unwrap();
//! let v = VertexId::new(0);
//! for neighbor in mesh.vertex_neighbors(v) {
//!     println!("Neighbor: {:?}", neighbor);
//! }
//!
//! let f = FaceId::new(0);
//! for c in mesh.face_corners(f) {
//!     println!("{:?} at {:?}: {} rad", c, mesh.corner_vertex(c), mesh.corner_angle(c));
//! }
//! ```
//!
//! ## Defects
//!
//! Construction either succeeds completely or reports the first defect:
//!
//! ```
//! use tessera::prelude::*;
//! use nalgebra::Point3;
//!
//! let vertices = vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)];
//! let result: std::result::Result<HalfEdgeMesh, _> = build(&vertices, &[[0, 1, 2]]);
//! assert_eq!(
//!     result.unwrap_err(),
//!     MeshDefect::InvalidVertexIndex { face: 0, vertex: 2 }
//! );
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod io;
pub mod mesh;

pub use nalgebra;

/// Prelude module for convenient imports.
///
/// ```
/// use tessera::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{MeshDefect, MeshError, Result};
    pub use crate::mesh::{
        build, build_with_options, to_face_vertex, BuildOptions, CornerId, EdgeId, FaceId,
        HalfEdgeId, HalfEdgeMesh, MeshIndex, NormalWeighting, VertexId,
    };
}

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use nalgebra::Point3;

    #[test]
    fn test_tetrahedron() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];
        let faces = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];

        let mesh: HalfEdgeMesh = build(&vertices, &faces).unwrap();

        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.num_faces(), 4);
        assert_eq!(mesh.num_edges(), 6);
        assert_eq!(mesh.num_corners(), 12);
        assert!(mesh.is_valid());

        for v in mesh.vertex_ids() {
            assert!(!mesh.is_boundary_vertex(v));
            let n = mesh.vertex_normal(v, NormalWeighting::Angle).unwrap();
            let outward = mesh.position(v) - Point3::new(0.5, 0.375, 0.25);
            assert!(n.dot(&outward) > 0.0);
        }
    }
}
