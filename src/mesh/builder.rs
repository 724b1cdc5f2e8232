//! Mesh construction utilities.
//!
//! This module builds half-edge meshes from face-vertex lists as commonly
//! found in mesh file formats. Faces may be arbitrary polygons, and sizes may
//! be mixed within one mesh.
//!
//! Construction runs in one pass:
//!
//! 1. one vertex per input position
//! 2. one half-edge per face side, linked into a cycle per face
//! 3. twin resolution through an unordered `{v0, v1}` key per side
//! 4. boundary loops for every run of unmatched half-edges
//! 5. one corner per non-boundary half-edge
//! 6. validation (isolated vertices and faces, non-manifold edges)
//!
//! Either the whole mesh is built and validated, or a [`MeshDefect`] is
//! returned.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use nalgebra::Point3;

use super::halfedge::{Corner, Edge, Face, HalfEdge, HalfEdgeMesh};
use super::index::{CornerId, EdgeId, FaceId, HalfEdgeId, MeshIndex, VertexId};
use crate::error::MeshDefect;

/// What construction does when more than two faces share an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NonManifoldEdgePolicy {
    /// Fail with [`MeshDefect::NonManifoldEdge`].
    #[default]
    Reject,
    /// Leave the extra half-edges unpaired; each becomes part of a boundary.
    Allow,
}

/// Options for mesh construction.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Handling of edges with more than two incident faces.
    pub non_manifold_edges: NonManifoldEdgePolicy,

    /// Whether to fail on vertices whose faces do not form a single fan.
    pub reject_non_manifold_vertices: bool,
}

impl BuildOptions {
    /// Set the non-manifold edge policy.
    pub fn with_non_manifold_edges(mut self, policy: NonManifoldEdgePolicy) -> Self {
        self.non_manifold_edges = policy;
        self
    }

    /// Set whether non-manifold vertices are rejected.
    pub fn with_reject_non_manifold_vertices(mut self, reject: bool) -> Self {
        self.reject_non_manifold_vertices = reject;
        self
    }
}

/// Build a half-edge mesh from vertices and polygonal faces.
///
/// Each face is an ordered list of vertex indices; any type that can be viewed
/// as `&[usize]` works (`Vec<usize>`, `[usize; 3]`, ...).
///
/// # Example
/// ```
/// use tessera::mesh::{build, HalfEdgeMesh};
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// let faces = vec![vec![0, 1, 2, 3]];
///
/// let mesh: HalfEdgeMesh = build(&vertices, &faces).unwrap();
/// assert_eq!(mesh.num_faces(), 1);
/// assert_eq!(mesh.num_boundary_loops(), 1);
/// assert_eq!(mesh.euler_characteristic(), 1);
/// ```
pub fn build<I: MeshIndex, F: AsRef<[usize]>>(
    vertices: &[Point3<f64>],
    faces: &[F],
) -> Result<HalfEdgeMesh<I>, MeshDefect> {
    build_with_options(vertices, faces, &BuildOptions::default())
}

/// Build a half-edge mesh from vertices and triangle faces.
pub fn build_from_triangles<I: MeshIndex>(
    vertices: &[Point3<f64>],
    faces: &[[usize; 3]],
) -> Result<HalfEdgeMesh<I>, MeshDefect> {
    build(vertices, faces)
}

/// Build a half-edge mesh from vertices and quad faces.
pub fn build_from_quads<I: MeshIndex>(
    vertices: &[Point3<f64>],
    faces: &[[usize; 4]],
) -> Result<HalfEdgeMesh<I>, MeshDefect> {
    build(vertices, faces)
}

/// Build a half-edge mesh with explicit [`BuildOptions`].
pub fn build_with_options<I: MeshIndex, F: AsRef<[usize]>>(
    vertices: &[Point3<f64>],
    faces: &[F],
    options: &BuildOptions,
) -> Result<HalfEdgeMesh<I>, MeshDefect> {
    let result = build_impl(vertices, faces, options);
    match &result {
        Ok(mesh) => log::debug!(
            "built mesh: {} vertices, {} edges, {} faces, {} boundary loops",
            mesh.num_vertices(),
            mesh.num_edges(),
            mesh.num_faces(),
            mesh.num_boundary_loops()
        ),
        Err(defect) => log::warn!("mesh construction rejected input: {}", defect),
    }
    result
}

fn build_impl<I: MeshIndex, F: AsRef<[usize]>>(
    vertices: &[Point3<f64>],
    faces: &[F],
    options: &BuildOptions,
) -> Result<HalfEdgeMesh<I>, MeshDefect> {
    validate_faces(vertices.len(), faces)?;

    let num_sides: usize = faces.iter().map(|f| f.as_ref().len()).sum();
    check_capacity::<I>("vertices", vertices.len())?;
    check_capacity::<I>("faces", faces.len())?;
    check_capacity::<I>("half-edges", num_sides)?;
    let mut mesh = HalfEdgeMesh::with_capacity(vertices.len(), faces.len(), num_sides);

    for &pos in vertices {
        mesh.add_vertex(pos);
    }

    link_faces(&mut mesh, faces);
    resolve_twins(&mut mesh, options.non_manifold_edges)?;
    build_boundary_loops(&mut mesh)?;
    create_corners(&mut mesh);

    if let Some(v) = mesh.isolated_vertex() {
        return Err(MeshDefect::IsolatedVertex { vertex: v.index() });
    }
    if let Some(f) = mesh.isolated_face() {
        return Err(MeshDefect::IsolatedFace { face: f.index() });
    }
    if let Some(v) = mesh.non_manifold_vertex() {
        if options.reject_non_manifold_vertices {
            return Err(MeshDefect::NonManifoldVertex { vertex: v.index() });
        }
        log::warn!(
            "vertex {} is non-manifold; rotations around it cover only one fan",
            v.index()
        );
    }

    Ok(mesh)
}

fn validate_faces<F: AsRef<[usize]>>(num_vertices: usize, faces: &[F]) -> Result<(), MeshDefect> {
    for (fi, face) in faces.iter().enumerate() {
        let face = face.as_ref();
        if let Some(&vi) = face.iter().find(|&&vi| vi >= num_vertices) {
            return Err(MeshDefect::InvalidVertexIndex { face: fi, vertex: vi });
        }
        if face.len() < 2 {
            return Err(MeshDefect::DegenerateFace { face: fi });
        }
        let n = face.len();
        if (0..n).any(|k| face[k] == face[(k + 1) % n]) {
            return Err(MeshDefect::DegenerateFace { face: fi });
        }
    }
    Ok(())
}

/// Fail with [`MeshDefect::TooLarge`] when `count` elements cannot all be
/// addressed by `I`.
fn check_capacity<I: MeshIndex>(kind: &'static str, count: usize) -> Result<(), MeshDefect> {
    let max = I::MAX.to_usize();
    if count > max {
        return Err(MeshDefect::TooLarge { kind, count, max });
    }
    Ok(())
}

/// Create one half-edge per face side and link each face into a cycle.
///
/// Each vertex keeps the last half-edge that leaves it.
fn link_faces<I: MeshIndex, F: AsRef<[usize]>>(mesh: &mut HalfEdgeMesh<I>, faces: &[F]) {
    for face in faces {
        let face = face.as_ref();
        let n = face.len();
        let first = mesh.halfedges.len();
        let face_id = FaceId::<I>::new(mesh.faces.len());
        mesh.faces.push(Face::new(HalfEdgeId::new(first)));

        for (k, &vi) in face.iter().enumerate() {
            let he_id = HalfEdgeId::<I>::new(first + k);
            mesh.halfedges.push(HalfEdge {
                origin: VertexId::new(vi),
                face: face_id,
                next: HalfEdgeId::new(first + (k + 1) % n),
                prev: HalfEdgeId::new(first + (k + n - 1) % n),
                ..HalfEdge::new()
            });
            mesh.vertex_mut(VertexId::new(vi)).halfedge = he_id;
        }
    }
    mesh.num_real_faces = mesh.faces.len();
}

/// Pair half-edges that traverse the same vertex pair and assign edges.
fn resolve_twins<I: MeshIndex>(
    mesh: &mut HalfEdgeMesh<I>,
    policy: NonManifoldEdgePolicy,
) -> Result<(), MeshDefect> {
    struct Slot<I: MeshIndex> {
        first: HalfEdgeId<I>,
        count: usize,
    }

    let mut slots: HashMap<(usize, usize), Slot<I>> = HashMap::with_capacity(mesh.halfedges.len());
    let mut non_manifold: Option<(usize, usize)> = None;

    for i in 0..mesh.halfedges.len() {
        let he = HalfEdgeId::<I>::new(i);
        let a = mesh.origin(he).index();
        let b = mesh.origin(mesh.next(he)).index();
        let key = if a < b { (a, b) } else { (b, a) };

        let fresh_edge = match slots.entry(key) {
            Entry::Vacant(entry) => {
                entry.insert(Slot { first: he, count: 1 });
                true
            }
            Entry::Occupied(mut entry) => {
                let slot = entry.get_mut();
                slot.count += 1;
                if slot.count == 2 {
                    let other = slot.first;
                    if mesh.origin(other).index() == a {
                        return Err(MeshDefect::InconsistentOrientation { v0: a, v1: b });
                    }
                    let edge = mesh.halfedges[other.index()].edge;
                    mesh.halfedges[other.index()].twin = he;
                    let h = &mut mesh.halfedges[i];
                    h.twin = other;
                    h.edge = edge;
                    false
                } else {
                    non_manifold.get_or_insert(key);
                    true
                }
            }
        };

        if fresh_edge {
            let edge = EdgeId::new(mesh.edges.len());
            mesh.edges.push(Edge::new(he));
            mesh.halfedges[i].edge = edge;
        }
    }

    if let Some((v0, v1)) = non_manifold {
        match policy {
            NonManifoldEdgePolicy::Reject => {
                return Err(MeshDefect::NonManifoldEdge { v0, v1 });
            }
            NonManifoldEdgePolicy::Allow => {
                log::warn!("edge ({}, {}) has more than two faces; extra sides left on the boundary", v0, v1);
            }
        }
    }

    Ok(())
}

/// Close every run of unmatched half-edges with a boundary loop.
///
/// Boundary half-edges are linked in the reverse direction of the interior
/// half-edges they twin, so each loop traverses its hole consistently.
///
/// Both walks terminate without a bound: `next(twin(_))` is injective on
/// paired half-edges and never yields the successor of an unpaired one, so
/// the rotation reaches an unpaired half-edge, and the induced successor map
/// permutes the unpaired half-edges, so every loop returns to its start.
fn build_boundary_loops<I: MeshIndex>(mesh: &mut HalfEdgeMesh<I>) -> Result<(), MeshDefect> {
    let num_interior = mesh.halfedges.len();
    let mut matched: Vec<bool> = mesh.halfedges.iter().map(|he| he.twin.is_valid()).collect();

    for i in 0..num_interior {
        if matched[i] {
            continue;
        }
        let start = HalfEdgeId::<I>::new(i);
        check_capacity::<I>("faces", mesh.faces.len() + 1)?;
        let loop_id = FaceId::<I>::new(mesh.faces.len());
        let mut cycle: Vec<HalfEdgeId<I>> = Vec::new();
        let mut he = start;

        loop {
            // Rotate around the destination until the next unmatched side.
            let mut next_he = mesh.next(he);
            while matched[next_he.index()] {
                next_he = mesh.next(mesh.twin(next_he));
                debug_assert!(next_he.index() < num_interior);
            }

            check_capacity::<I>("half-edges", mesh.halfedges.len() + 1)?;
            let boundary = HalfEdgeId::<I>::new(mesh.halfedges.len());
            let origin = mesh.origin(next_he);
            let edge = mesh.edge_of(he);
            mesh.halfedges.push(HalfEdge {
                origin,
                edge,
                face: loop_id,
                twin: he,
                on_boundary: true,
                ..HalfEdge::new()
            });
            mesh.halfedges[he.index()].twin = boundary;
            cycle.push(boundary);

            he = next_he;
            if he == start {
                break;
            }
            debug_assert!(cycle.len() <= num_interior);
        }

        let n = cycle.len();
        for (j, &b) in cycle.iter().enumerate() {
            let h = &mut mesh.halfedges[b.index()];
            h.next = cycle[(j + n - 1) % n];
            h.prev = cycle[(j + 1) % n];
            matched[mesh.halfedges[b.index()].twin.index()] = true;
        }
        mesh.faces.push(Face::new(cycle[0]));
    }

    Ok(())
}

/// Create one corner per non-boundary half-edge.
fn create_corners<I: MeshIndex>(mesh: &mut HalfEdgeMesh<I>) {
    for i in 0..mesh.halfedges.len() {
        if mesh.halfedges[i].on_boundary {
            continue;
        }
        let corner = CornerId::new(mesh.corners.len());
        mesh.corners.push(Corner::new(HalfEdgeId::new(i)));
        mesh.halfedges[i].corner = corner;
    }
}

/// Convert a half-edge mesh back to a face-vertex representation.
///
/// Returns (vertices, faces) tuple; boundary loops are not included.
pub fn to_face_vertex<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) -> (Vec<Point3<f64>>, Vec<Vec<usize>>) {
    let vertices: Vec<Point3<f64>> = mesh.vertex_ids().map(|v| *mesh.position(v)).collect();

    let faces: Vec<Vec<usize>> = mesh
        .face_ids()
        .map(|f| mesh.face_vertices(f).map(|v| v.index()).collect())
        .collect();

    (vertices, faces)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Vec<Point3<f64>> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ]
    }

    fn single_triangle() -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
        ];
        (vertices, vec![[0, 1, 2]])
    }

    fn tetrahedron() -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];
        let faces = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
        (vertices, faces)
    }

    fn assert_connectivity<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) {
        for he in mesh.halfedge_ids() {
            assert_eq!(mesh.twin(mesh.twin(he)), he);
            assert_eq!(mesh.prev(mesh.next(he)), he);
            assert_eq!(mesh.next(mesh.prev(he)), he);
            assert_eq!(mesh.corner_of(he).is_some(), !mesh.is_boundary_halfedge(he));
        }
        for e in mesh.edge_ids() {
            let he = mesh.edge_halfedge(e);
            assert_eq!(mesh.edge_of(mesh.twin(he)), e);
        }
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_single_triangle() {
        let (vertices, faces) = single_triangle();
        let mesh: HalfEdgeMesh<u32> = build_from_triangles(&vertices, &faces).unwrap();

        assert_eq!(mesh.num_vertices(), 3);
        assert_eq!(mesh.num_faces(), 1);
        // 3 interior half-edges + 3 boundary half-edges
        assert_eq!(mesh.num_halfedges(), 6);
        assert_eq!(mesh.num_edges(), 3);
        assert_eq!(mesh.num_corners(), 3);
        assert_eq!(mesh.num_boundary_loops(), 1);
        assert_connectivity(&mesh);

        for v in mesh.vertex_ids() {
            assert!(mesh.is_boundary_vertex(v));
            assert_eq!(mesh.degree(v), 2);
        }
    }

    #[test]
    fn test_closed_tetrahedron() {
        let (vertices, faces) = tetrahedron();
        let mesh: HalfEdgeMesh<u32> = build_from_triangles(&vertices, &faces).unwrap();

        assert_eq!(mesh.num_halfedges(), 12);
        assert_eq!(mesh.num_edges(), 6);
        assert_eq!(mesh.num_boundary_loops(), 0);
        assert_eq!(mesh.euler_characteristic(), 2);
        assert!(mesh.is_triangle_mesh());
        assert_connectivity(&mesh);

        for v in mesh.vertex_ids() {
            assert!(!mesh.is_boundary_vertex(v));
            assert_eq!(mesh.degree(v), 3);
            assert_eq!(mesh.vertex_faces(v).count(), 3);
            assert_eq!(mesh.vertex_corners(v).count(), 3);
        }
    }

    #[test]
    fn test_unit_square_quad() {
        let mesh: HalfEdgeMesh = build(&unit_square(), &[vec![0, 1, 2, 3]]).unwrap();

        assert!(mesh.is_quad_mesh());
        assert!(!mesh.is_triangle_mesh());
        assert!(!mesh.has_isolated_vertices());
        assert!(!mesh.has_isolated_faces());
        assert_eq!(mesh.num_boundary_loops(), 1);
        assert_eq!(mesh.euler_characteristic(), 4 - 4 + 1);
        assert_connectivity(&mesh);
    }

    #[test]
    fn test_unit_square_split() {
        let mesh: HalfEdgeMesh = build(&unit_square(), &[[0, 1, 3], [3, 1, 2]]).unwrap();

        assert!(mesh.is_triangle_mesh());
        assert_eq!(mesh.num_edges(), 5);
        assert_eq!(mesh.num_boundary_loops(), 1);
        assert_eq!(mesh.euler_characteristic(), 1);
        // Vertices 0 and 2 belong to one triangle only.
        assert_eq!(mesh.degree(VertexId::new(0)), 2);
        assert_eq!(mesh.degree(VertexId::new(2)), 2);
        assert_eq!(mesh.degree(VertexId::new(1)), 3);
        assert_eq!(mesh.degree(VertexId::new(3)), 3);
        assert_connectivity(&mesh);
    }

    #[test]
    fn test_mixed_polygons() {
        // A quad and a triangle sharing edge 1-2, plus a pentagon on edge 2-3.
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(2.0, 0.5, 0.0),
            Point3::new(1.0, 2.0, 0.0),
            Point3::new(0.5, 2.5, 0.0),
            Point3::new(0.0, 2.0, 0.0),
        ];
        let faces = vec![vec![0, 1, 2, 3], vec![1, 4, 2], vec![3, 2, 5, 6, 7]];
        let mesh: HalfEdgeMesh = build(&vertices, &faces).unwrap();

        assert!(!mesh.is_triangle_mesh());
        assert!(!mesh.is_quad_mesh());
        assert_eq!(mesh.num_edges(), 10);
        assert_eq!(mesh.euler_characteristic(), 1);
        assert_connectivity(&mesh);

        for f in mesh.face_ids() {
            let n = faces[f.index()].len();
            assert_eq!(mesh.face_vertices(f).count(), n);
            assert_eq!(mesh.face_edges(f).count(), n);
            assert_eq!(mesh.face_corners(f).count(), n);
        }
    }

    #[test]
    fn test_roundtrip() {
        let (vertices, faces) = tetrahedron();
        let mesh: HalfEdgeMesh<u32> = build_from_triangles(&vertices, &faces).unwrap();

        let (out_verts, out_faces) = to_face_vertex(&mesh);

        assert_eq!(vertices.len(), out_verts.len());
        assert_eq!(faces.len(), out_faces.len());
        for (v_in, v_out) in vertices.iter().zip(out_verts.iter()) {
            assert!((v_in - v_out).norm() < 1e-10);
        }
        for (f_in, f_out) in faces.iter().zip(out_faces.iter()) {
            // Equal up to rotation of the starting vertex.
            let shift = f_out.iter().position(|&v| v == f_in[0]).unwrap();
            let rotated: Vec<usize> = (0..3).map(|k| f_out[(k + shift) % 3]).collect();
            assert_eq!(rotated, f_in.to_vec());
        }

        let rebuilt: HalfEdgeMesh<u32> = build(&out_verts, &out_faces).unwrap();
        assert_eq!(rebuilt.num_edges(), mesh.num_edges());
        assert_eq!(rebuilt.euler_characteristic(), mesh.euler_characteristic());
    }

    #[test]
    fn test_small_index_type() {
        let (vertices, faces) = tetrahedron();
        let mesh: HalfEdgeMesh<u16> = build_from_triangles(&vertices, &faces).unwrap();
        assert_eq!(mesh.num_halfedges(), 12);
        assert_connectivity(&mesh);
    }

    /// `nx` by `ny` unit squares, each split into two triangles.
    fn triangle_grid(nx: usize, ny: usize) -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
        let mut vertices = Vec::with_capacity((nx + 1) * (ny + 1));
        for j in 0..=ny {
            for i in 0..=nx {
                vertices.push(Point3::new(i as f64, j as f64, 0.0));
            }
        }
        let mut faces = Vec::with_capacity(2 * nx * ny);
        for j in 0..ny {
            for i in 0..nx {
                let v00 = j * (nx + 1) + i;
                let v01 = v00 + nx + 1;
                faces.push([v00, v00 + 1, v01 + 1]);
                faces.push([v00, v01 + 1, v01]);
            }
        }
        (vertices, faces)
    }

    #[test]
    fn test_too_many_sides_for_index_type() {
        let (vertices, faces) = triangle_grid(110, 110);
        let result: Result<HalfEdgeMesh<u16>, _> = build(&vertices, &faces);
        assert_eq!(
            result.unwrap_err(),
            MeshDefect::TooLarge {
                kind: "half-edges",
                count: 72600,
                max: 65534
            }
        );

        let mesh: HalfEdgeMesh<u32> = build(&vertices, &faces).unwrap();
        assert_eq!(mesh.num_faces(), 24200);
    }

    #[test]
    fn test_boundary_half_edges_count_against_index_type() {
        // 65532 face sides fit in u16, but not with the boundary added.
        let (vertices, faces) = triangle_grid(10922, 1);
        let result: Result<HalfEdgeMesh<u16>, _> = build(&vertices, &faces);
        assert_eq!(
            result.unwrap_err(),
            MeshDefect::TooLarge {
                kind: "half-edges",
                count: 65535,
                max: 65534
            }
        );
    }

    #[test]
    fn test_too_many_vertices_for_index_type() {
        let mut vertices: Vec<Point3<f64>> = (0..70000)
            .map(|i| Point3::new(i as f64, 0.0, 0.0))
            .collect();
        vertices.push(Point3::new(0.0, 1.0, 0.0));
        let result: Result<HalfEdgeMesh<u16>, _> = build(&vertices, &[[0, 1, 70000]]);
        assert!(matches!(
            result.unwrap_err(),
            MeshDefect::TooLarge { kind: "vertices", count: 70001, .. }
        ));
    }

    #[test]
    fn test_build_from_quads_two_quads() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(2.0, 1.0, 0.0),
        ];
        let faces = vec![[0, 1, 2, 3], [1, 4, 5, 2]];
        let mesh: HalfEdgeMesh<u32> = build_from_quads(&vertices, &faces).unwrap();

        // 8 interior half-edges + 6 boundary half-edges
        assert_eq!(mesh.num_halfedges(), 14);
        assert_eq!(mesh.num_edges(), 7);
        assert!(mesh.is_quad_mesh());
        assert_connectivity(&mesh);
    }

    #[test]
    fn test_appended_vertex_is_isolated() {
        let mut mesh: HalfEdgeMesh = build(&unit_square(), &[vec![0, 1, 2, 3]]).unwrap();
        assert!(!mesh.has_isolated_vertices());

        let v = mesh.add_vertex(Point3::new(5.0, 5.0, 5.0));
        assert!(mesh.has_isolated_vertices());
        assert_eq!(mesh.isolated_vertex(), Some(v));
    }

    #[test]
    fn test_unreferenced_vertex_rejected() {
        let mut vertices = unit_square();
        vertices.push(Point3::new(2.0, 2.0, 0.0));
        let result: Result<HalfEdgeMesh, _> = build(&vertices, &[vec![0, 1, 2, 3]]);
        assert_eq!(result.unwrap_err(), MeshDefect::IsolatedVertex { vertex: 4 });
    }

    #[test]
    fn test_duplicate_positions_not_merged() {
        // Two triangles touching along coincident but distinct vertices form
        // two disconnected faces.
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        ];
        let result: Result<HalfEdgeMesh, _> = build(&vertices, &[[0, 1, 2], [4, 3, 5]]);
        assert_eq!(result.unwrap_err(), MeshDefect::IsolatedFace { face: 0 });
    }

    #[test]
    fn test_invalid_vertex_index() {
        let vertices = vec![Point3::new(0.0, 0.0, 0.0)];
        let result: Result<HalfEdgeMesh<u32>, _> = build(&vertices, &[[0, 1, 2]]);
        assert_eq!(
            result.unwrap_err(),
            MeshDefect::InvalidVertexIndex { face: 0, vertex: 1 }
        );
    }

    #[test]
    fn test_degenerate_face() {
        let (vertices, _) = single_triangle();
        let result: Result<HalfEdgeMesh<u32>, _> = build(&vertices, &[[0, 0, 2]]);
        assert_eq!(result.unwrap_err(), MeshDefect::DegenerateFace { face: 0 });

        let result: Result<HalfEdgeMesh<u32>, _> = build(&vertices, &[vec![1]]);
        assert_eq!(result.unwrap_err(), MeshDefect::DegenerateFace { face: 0 });
    }

    #[test]
    fn test_sliver_face_accepted() {
        let vertices = vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)];
        let mesh: HalfEdgeMesh = build(&vertices, &[vec![0, 1]]).unwrap();

        assert_eq!(mesh.num_halfedges(), 2);
        assert_eq!(mesh.num_edges(), 1);
        assert_eq!(mesh.num_boundary_loops(), 0);
        assert_eq!(mesh.face_degree(FaceId::new(0)), 2);
        assert_connectivity(&mesh);
    }

    #[test]
    fn test_inconsistent_orientation() {
        let vertices = unit_square();
        let result: Result<HalfEdgeMesh, _> = build(&vertices, &[[0, 1, 3], [1, 3, 2]]);
        assert_eq!(
            result.unwrap_err(),
            MeshDefect::InconsistentOrientation { v0: 1, v1: 3 }
        );
    }

    fn three_face_fin() -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
        // Three triangles hinged on edge 0-1; the third one is glued to a
        // fourth triangle so it is not isolated.
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, -1.0, 0.0),
            Point3::new(0.5, 0.0, 1.0),
            Point3::new(1.5, 0.0, 1.0),
        ];
        let faces = vec![[0, 1, 2], [1, 0, 3], [0, 1, 4], [4, 1, 5]];
        (vertices, faces)
    }

    #[test]
    fn test_non_manifold_edge_rejected() {
        let (vertices, faces) = three_face_fin();
        let result: Result<HalfEdgeMesh, _> = build(&vertices, &faces);
        assert_eq!(result.unwrap_err(), MeshDefect::NonManifoldEdge { v0: 0, v1: 1 });
    }

    #[test]
    fn test_non_manifold_edge_allowed() {
        let (vertices, faces) = three_face_fin();
        let options = BuildOptions::default().with_non_manifold_edges(NonManifoldEdgePolicy::Allow);
        let mesh: HalfEdgeMesh = build_with_options(&vertices, &faces, &options).unwrap();

        assert!(mesh.has_non_manifold_edges());
        assert_eq!(
            mesh.non_manifold_edge(),
            Some([VertexId::new(0), VertexId::new(1)])
        );
        // The third side on 0-1 got its own edge.
        assert_eq!(mesh.num_edges(), 10);
        assert_connectivity(&mesh);
    }

    #[test]
    fn test_boundary_loops_close_around_multi_face_edge() {
        // Four faces on edge 0-1, each extra page bridged by a neighbor.
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, -1.0, 0.0),
            Point3::new(0.5, 0.0, 1.0),
            Point3::new(1.5, 0.0, 1.0),
            Point3::new(0.5, 0.0, -1.0),
            Point3::new(-0.5, 0.0, -1.0),
        ];
        let faces = vec![
            [0, 1, 2],
            [1, 0, 3],
            [0, 1, 4],
            [4, 1, 5],
            [1, 0, 6],
            [6, 0, 7],
        ];
        let options = BuildOptions::default().with_non_manifold_edges(NonManifoldEdgePolicy::Allow);
        let mesh: HalfEdgeMesh = build_with_options(&vertices, &faces, &options).unwrap();

        // 18 face sides, 6 of them paired, so 12 boundary half-edges.
        assert_eq!(mesh.num_corners(), 18);
        assert_eq!(mesh.num_halfedges(), 30);
        assert_connectivity(&mesh);
        for f in mesh.boundary_loop_ids() {
            assert!(mesh.face_halfedges(f).all(|he| mesh.is_boundary_halfedge(he)));
        }
    }

    #[test]
    fn test_non_manifold_vertex() {
        // Two triangles touching only at vertex 0 (a bowtie), bridged by a
        // third triangle so neither face is isolated.
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(-1.0, 0.0, 0.0),
            Point3::new(-1.0, -1.0, 0.0),
            Point3::new(0.0, -2.0, 0.0),
        ];
        let faces = vec![[0, 1, 2], [0, 3, 4], [1, 0, 5], [5, 0, 4]];
        let mesh: HalfEdgeMesh = build(&vertices, &faces).unwrap();
        assert!(!mesh.has_non_manifold_vertices());

        let bowtie = vec![[0, 1, 2], [0, 3, 4], [1, 5, 2], [3, 5, 4]];
        let mesh: HalfEdgeMesh = build(&vertices, &bowtie).unwrap();
        let v0 = VertexId::new(0);
        assert_eq!(mesh.non_manifold_vertex(), Some(v0));

        // The rotation around the pinch vertex sees a strict subset of the
        // half-edges leaving it.
        let outgoing = mesh.halfedge_ids().filter(|&he| mesh.origin(he) == v0).count();
        assert!(mesh.degree(v0) < outgoing, "{} vs {}", mesh.degree(v0), outgoing);
        assert!(mesh.vertex_halfedges(v0).all(|he| mesh.origin(he) == v0));

        let options = BuildOptions::default().with_reject_non_manifold_vertices(true);
        let result: Result<HalfEdgeMesh, _> = build_with_options(&vertices, &bowtie, &options);
        assert_eq!(result.unwrap_err(), MeshDefect::NonManifoldVertex { vertex: 0 });
    }
}
