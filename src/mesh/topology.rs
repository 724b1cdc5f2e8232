//! Array-based adjacency tables.
//!
//! [`TopologyIndex`] flattens the half-edge connectivity into plain integer
//! lists, for consumers that assemble matrices or export adjacency and would
//! rather not walk half-edges.

use super::halfedge::HalfEdgeMesh;
use super::index::{FaceId, MeshIndex};

/// Precomputed adjacency of a mesh, keyed by dense element indices.
#[derive(Debug, Clone, Default)]
pub struct TopologyIndex {
    vertex_vertices: Vec<Vec<usize>>,
    vertex_faces: Vec<Vec<usize>>,
    vertex_edges: Vec<Vec<usize>>,
    face_vertices: Vec<Vec<usize>>,
    face_edges: Vec<Vec<usize>>,
    face_faces: Vec<Vec<usize>>,
    edge_vertices: Vec<[usize; 2]>,
    edge_faces: Vec<[Option<usize>; 2]>,
    boundary_loops: Vec<Vec<usize>>,
}

impl TopologyIndex {
    /// Index all adjacency of `mesh`.
    pub fn new<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) -> Self {
        let real_face = |f: FaceId<I>| (!mesh.is_boundary_loop(f)).then(|| f.index());

        let vertex_vertices = mesh
            .vertex_ids()
            .map(|v| mesh.vertex_neighbors(v).map(|w| w.index()).collect())
            .collect();
        let vertex_faces = mesh
            .vertex_ids()
            .map(|v| mesh.vertex_faces(v).map(|f| f.index()).collect())
            .collect();
        let vertex_edges = mesh
            .vertex_ids()
            .map(|v| mesh.vertex_edges(v).map(|e| e.index()).collect())
            .collect();

        let face_vertices = mesh
            .face_ids()
            .map(|f| mesh.face_vertices(f).map(|v| v.index()).collect())
            .collect();
        let face_edges = mesh
            .face_ids()
            .map(|f| mesh.face_edges(f).map(|e| e.index()).collect())
            .collect();
        let face_faces = mesh
            .face_ids()
            .map(|f| mesh.face_neighbors(f).map(|g| g.index()).collect())
            .collect();

        let edge_vertices = mesh
            .edge_ids()
            .map(|e| mesh.edge_vertices(e).map(|v| v.index()))
            .collect();
        let edge_faces = mesh
            .edge_ids()
            .map(|e| {
                let he = mesh.edge_halfedge(e);
                [
                    real_face(mesh.face_of(he)),
                    real_face(mesh.face_of(mesh.twin(he))),
                ]
            })
            .collect();

        let boundary_loops = mesh
            .boundary_loop_ids()
            .map(|b| mesh.face_vertices(b).map(|v| v.index()).collect())
            .collect();

        Self {
            vertex_vertices,
            vertex_faces,
            vertex_edges,
            face_vertices,
            face_edges,
            face_faces,
            edge_vertices,
            edge_faces,
            boundary_loops,
        }
    }

    /// Vertices adjacent to vertex `v`, in rotation order.
    pub fn vertex_vertices(&self, v: usize) -> &[usize] {
        &self.vertex_vertices[v]
    }

    /// Real faces around vertex `v`.
    pub fn vertex_faces(&self, v: usize) -> &[usize] {
        &self.vertex_faces[v]
    }

    /// Edges incident to vertex `v`.
    pub fn vertex_edges(&self, v: usize) -> &[usize] {
        &self.vertex_edges[v]
    }

    /// Vertices of face `f`, in winding order.
    pub fn face_vertices(&self, f: usize) -> &[usize] {
        &self.face_vertices[f]
    }

    /// Edges of face `f`, in winding order.
    pub fn face_edges(&self, f: usize) -> &[usize] {
        &self.face_edges[f]
    }

    /// Real faces sharing an edge with face `f`.
    pub fn face_faces(&self, f: usize) -> &[usize] {
        &self.face_faces[f]
    }

    /// Endpoints of edge `e`.
    pub fn edge_vertices(&self, e: usize) -> [usize; 2] {
        self.edge_vertices[e]
    }

    /// The faces on either side of edge `e`; `None` on the boundary side.
    pub fn edge_faces(&self, e: usize) -> [Option<usize>; 2] {
        self.edge_faces[e]
    }

    /// Vertex cycles of all boundary loops, numbered from 0.
    pub fn boundary_loops(&self) -> &[Vec<usize>] {
        &self.boundary_loops
    }

    /// Number of indexed vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertex_vertices.len()
    }

    /// Number of indexed faces.
    pub fn num_faces(&self) -> usize {
        self.face_vertices.len()
    }

    /// Number of indexed edges.
    pub fn num_edges(&self) -> usize {
        self.edge_vertices.len()
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::Point3;

    use super::*;
    use crate::mesh::build;

    fn strip() -> HalfEdgeMesh {
        // Three quads in a row.
        let mut vertices = Vec::new();
        for i in 0..4 {
            vertices.push(Point3::new(i as f64, 0.0, 0.0));
            vertices.push(Point3::new(i as f64, 1.0, 0.0));
        }
        let faces: Vec<[usize; 4]> = (0..3)
            .map(|i| [2 * i, 2 * i + 2, 2 * i + 3, 2 * i + 1])
            .collect();
        build(&vertices, &faces).unwrap()
    }

    #[test]
    fn test_counts_and_faces() {
        let mesh = strip();
        let index = TopologyIndex::new(&mesh);

        assert_eq!(index.num_vertices(), 8);
        assert_eq!(index.num_faces(), 3);
        assert_eq!(index.num_edges(), 10);
        assert_eq!(index.face_vertices(1), &[2, 4, 5, 3]);
        assert_eq!(index.face_faces(0), &[1]);

        let mut middle = index.face_faces(1).to_vec();
        middle.sort_unstable();
        assert_eq!(middle, vec![0, 2]);
    }

    #[test]
    fn test_agrees_with_mesh() {
        let mesh = strip();
        let index = TopologyIndex::new(&mesh);

        for v in mesh.vertex_ids() {
            assert_eq!(index.vertex_vertices(v.index()).len(), mesh.degree(v));
            assert_eq!(index.vertex_edges(v.index()).len(), mesh.degree(v));
            for &e in index.vertex_edges(v.index()) {
                assert!(index.edge_vertices(e).contains(&v.index()));
            }
            for &f in index.vertex_faces(v.index()) {
                assert!(index.face_vertices(f).contains(&v.index()));
            }
        }

        for f in 0..index.num_faces() {
            for &e in index.face_edges(f) {
                assert!(index.edge_faces(e).contains(&Some(f)));
            }
        }
    }

    #[test]
    fn test_edge_faces_and_boundary() {
        let mesh = strip();
        let index = TopologyIndex::new(&mesh);

        let interior: Vec<_> = (0..index.num_edges())
            .filter(|&e| index.edge_faces(e).iter().all(Option::is_some))
            .collect();
        assert_eq!(interior.len(), 2);

        for e in 0..index.num_edges() {
            let sides = index.edge_faces(e);
            assert!(sides.iter().any(Option::is_some));
        }

        assert_eq!(index.boundary_loops().len(), 1);
        let mut loop_vertices = index.boundary_loops()[0].clone();
        assert_eq!(loop_vertices.len(), 8);
        loop_vertices.sort_unstable();
        assert_eq!(loop_vertices, (0..8).collect::<Vec<_>>());
    }
}
