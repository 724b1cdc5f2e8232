//! Half-edge mesh data structure.
//!
//! This module provides a half-edge (doubly-connected edge list) representation
//! for polygon meshes. This structure enables O(1) adjacency queries and is
//! the foundation for the geometry operators in this crate.
//!
//! # Structure
//!
//! - Each edge is split into two **half-edges** pointing in opposite directions
//! - Each half-edge knows its **twin** (opposite half-edge), **next** and **prev**
//!   (neighbours around the face), **origin vertex**, **edge**, **face** and,
//!   unless it lies on the boundary, its **corner**
//! - Each vertex stores one outgoing half-edge
//! - Each edge, face and corner stores one half-edge
//!
//! All elements live in flat arrays owned by [`HalfEdgeMesh`]; references
//! between them are indices.
//!
//! # Boundary Handling
//!
//! Holes in the surface are closed by synthetic **boundary loops**: faces made
//! of boundary-flagged half-edges that trace the hole in the opposite
//! direction. Every half-edge therefore has a valid twin, and every rotation
//! around a vertex is a closed cycle. Boundary loops are numbered after the
//! real faces and are skipped by [`HalfEdgeMesh::face_ids`].

use std::collections::HashMap;

use nalgebra::Point3;

use super::index::{CornerId, EdgeId, FaceId, HalfEdgeId, MeshIndex, VertexId};
use crate::error::{MeshError, Result};

/// A vertex in the half-edge mesh.
#[derive(Debug, Clone)]
pub struct Vertex<I: MeshIndex = u32> {
    /// The 3D position of this vertex.
    pub position: Point3<f64>,

    /// One outgoing half-edge from this vertex.
    /// Invalid for an isolated vertex.
    pub halfedge: HalfEdgeId<I>,

    /// Named scalar fields attached to this vertex by client algorithms.
    pub values: HashMap<String, f64>,
}

impl<I: MeshIndex> Vertex<I> {
    /// Create a new vertex at the given position.
    pub fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            halfedge: HalfEdgeId::invalid(),
            values: HashMap::new(),
        }
    }

    /// Create a new vertex from coordinates.
    pub fn from_coords(x: f64, y: f64, z: f64) -> Self {
        Self::new(Point3::new(x, y, z))
    }
}

/// A half-edge in the mesh.
#[derive(Debug, Clone, Copy)]
pub struct HalfEdge<I: MeshIndex = u32> {
    /// The vertex this half-edge originates from.
    pub origin: VertexId<I>,

    /// The undirected edge this half-edge belongs to.
    pub edge: EdgeId<I>,

    /// The face (or boundary loop) this half-edge belongs to.
    pub face: FaceId<I>,

    /// The corner associated with this half-edge.
    /// Invalid for boundary half-edges.
    pub corner: CornerId<I>,

    /// The opposite half-edge (pointing in the reverse direction).
    pub twin: HalfEdgeId<I>,

    /// The next half-edge around the face.
    pub next: HalfEdgeId<I>,

    /// The previous half-edge around the face.
    pub prev: HalfEdgeId<I>,

    /// Whether this half-edge belongs to a boundary loop.
    pub on_boundary: bool,
}

impl<I: MeshIndex> HalfEdge<I> {
    /// Create a new uninitialized half-edge.
    pub fn new() -> Self {
        Self {
            origin: VertexId::invalid(),
            edge: EdgeId::invalid(),
            face: FaceId::invalid(),
            corner: CornerId::invalid(),
            twin: HalfEdgeId::invalid(),
            next: HalfEdgeId::invalid(),
            prev: HalfEdgeId::invalid(),
            on_boundary: false,
        }
    }

    /// Check if this half-edge is on the boundary.
    #[inline]
    pub fn is_boundary(&self) -> bool {
        self.on_boundary
    }
}

impl<I: MeshIndex> Default for HalfEdge<I> {
    fn default() -> Self {
        Self::new()
    }
}

/// An undirected edge, represented by one of its half-edges.
#[derive(Debug, Clone, Copy)]
pub struct Edge<I: MeshIndex = u32> {
    /// One of the two half-edges of this edge.
    pub halfedge: HalfEdgeId<I>,
}

impl<I: MeshIndex> Edge<I> {
    /// Create a new edge owned by the given half-edge.
    pub fn new(halfedge: HalfEdgeId<I>) -> Self {
        Self { halfedge }
    }
}

/// A face in the half-edge mesh. Boundary loops are faces too.
#[derive(Debug, Clone, Copy)]
pub struct Face<I: MeshIndex = u32> {
    /// One half-edge on the boundary of this face.
    pub halfedge: HalfEdgeId<I>,
}

impl<I: MeshIndex> Face<I> {
    /// Create a new face with the given half-edge.
    pub fn new(halfedge: HalfEdgeId<I>) -> Self {
        Self { halfedge }
    }
}

impl<I: MeshIndex> Default for Face<I> {
    fn default() -> Self {
        Self {
            halfedge: HalfEdgeId::invalid(),
        }
    }
}

/// The angle of a face at one of its vertices.
///
/// A corner belongs to the half-edge *opposite* the vertex in a triangle:
/// its vertex is the origin of the half-edge's `prev`.
#[derive(Debug, Clone, Copy)]
pub struct Corner<I: MeshIndex = u32> {
    /// The half-edge this corner is associated with.
    pub halfedge: HalfEdgeId<I>,
}

impl<I: MeshIndex> Corner<I> {
    /// Create a new corner bound to the given half-edge.
    pub fn new(halfedge: HalfEdgeId<I>) -> Self {
        Self { halfedge }
    }
}

/// A half-edge mesh data structure for polygon meshes.
///
/// This structure stores vertices, half-edges, edges, faces and corners with
/// full connectivity information, enabling O(1) adjacency queries.
#[derive(Debug, Clone)]
pub struct HalfEdgeMesh<I: MeshIndex = u32> {
    /// All vertices in the mesh.
    pub(crate) vertices: Vec<Vertex<I>>,

    /// All half-edges in the mesh, interior ones first.
    pub(crate) halfedges: Vec<HalfEdge<I>>,

    /// All edges in the mesh.
    pub(crate) edges: Vec<Edge<I>>,

    /// Real faces followed by boundary loops.
    pub(crate) faces: Vec<Face<I>>,

    /// All corners in the mesh.
    pub(crate) corners: Vec<Corner<I>>,

    /// Number of real (non boundary-loop) faces at the front of `faces`.
    pub(crate) num_real_faces: usize,
}

impl<I: MeshIndex> Default for HalfEdgeMesh<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: MeshIndex> HalfEdgeMesh<I> {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            halfedges: Vec::new(),
            edges: Vec::new(),
            faces: Vec::new(),
            corners: Vec::new(),
            num_real_faces: 0,
        }
    }

    /// Create a mesh with pre-allocated capacity.
    ///
    /// `num_sides` is the total number of face sides in the input.
    pub fn with_capacity(num_vertices: usize, num_faces: usize, num_sides: usize) -> Self {
        // Interior half-edges plus some slack for the boundary.
        let num_halfedges = num_sides + num_sides / 4;

        Self {
            vertices: Vec::with_capacity(num_vertices),
            halfedges: Vec::with_capacity(num_halfedges),
            edges: Vec::with_capacity(num_halfedges / 2 + 1),
            faces: Vec::with_capacity(num_faces),
            corners: Vec::with_capacity(num_sides),
            num_real_faces: 0,
        }
    }

    // ==================== Accessors ====================

    /// Get the number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of half-edges, boundary half-edges included.
    #[inline]
    pub fn num_halfedges(&self) -> usize {
        self.halfedges.len()
    }

    /// Get the number of edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Get the number of real faces (boundary loops excluded).
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.num_real_faces
    }

    /// Get the number of boundary loops.
    #[inline]
    pub fn num_boundary_loops(&self) -> usize {
        self.faces.len() - self.num_real_faces
    }

    /// Get the number of corners.
    #[inline]
    pub fn num_corners(&self) -> usize {
        self.corners.len()
    }

    /// Get a vertex by ID.
    #[inline]
    pub fn vertex(&self, id: VertexId<I>) -> &Vertex<I> {
        &self.vertices[id.index()]
    }

    /// Get a mutable vertex by ID.
    #[inline]
    pub fn vertex_mut(&mut self, id: VertexId<I>) -> &mut Vertex<I> {
        &mut self.vertices[id.index()]
    }

    /// Get a half-edge by ID.
    #[inline]
    pub fn halfedge(&self, id: HalfEdgeId<I>) -> &HalfEdge<I> {
        &self.halfedges[id.index()]
    }

    /// Get an edge by ID.
    #[inline]
    pub fn edge(&self, id: EdgeId<I>) -> &Edge<I> {
        &self.edges[id.index()]
    }

    /// Get a face (or boundary loop) by ID.
    #[inline]
    pub fn face(&self, id: FaceId<I>) -> &Face<I> {
        &self.faces[id.index()]
    }

    /// Get a corner by ID.
    #[inline]
    pub fn corner(&self, id: CornerId<I>) -> &Corner<I> {
        &self.corners[id.index()]
    }

    /// Get the position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId<I>) -> &Point3<f64> {
        &self.vertex(v).position
    }

    /// Set the position of a vertex.
    #[inline]
    pub fn set_position(&mut self, v: VertexId<I>, pos: Point3<f64>) {
        self.vertex_mut(v).position = pos;
    }

    // ==================== Vertex Values ====================

    /// Read a named scalar stored on a vertex.
    pub fn vertex_value(&self, v: VertexId<I>, key: &str) -> Option<f64> {
        self.vertex(v).values.get(key).copied()
    }

    /// Store a named scalar on a vertex, returning the previous value.
    pub fn set_vertex_value(
        &mut self,
        v: VertexId<I>,
        key: impl Into<String>,
        value: f64,
    ) -> Option<f64> {
        self.vertex_mut(v).values.insert(key.into(), value)
    }

    /// All named scalars stored on a vertex.
    pub fn vertex_values(&self, v: VertexId<I>) -> &HashMap<String, f64> {
        &self.vertex(v).values
    }

    // ==================== Half-Edge Queries ====================

    /// Get the twin (opposite) half-edge.
    #[inline]
    pub fn twin(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedge(he).twin
    }

    /// Get the next half-edge around the face.
    #[inline]
    pub fn next(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedge(he).next
    }

    /// Get the previous half-edge around the face.
    #[inline]
    pub fn prev(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedge(he).prev
    }

    /// Get the origin vertex of a half-edge.
    #[inline]
    pub fn origin(&self, he: HalfEdgeId<I>) -> VertexId<I> {
        self.halfedge(he).origin
    }

    /// Get the destination vertex of a half-edge.
    #[inline]
    pub fn dest(&self, he: HalfEdgeId<I>) -> VertexId<I> {
        self.origin(self.twin(he))
    }

    /// Get the face (or boundary loop) of a half-edge.
    #[inline]
    pub fn face_of(&self, he: HalfEdgeId<I>) -> FaceId<I> {
        self.halfedge(he).face
    }

    /// Get the edge of a half-edge.
    #[inline]
    pub fn edge_of(&self, he: HalfEdgeId<I>) -> EdgeId<I> {
        self.halfedge(he).edge
    }

    /// Get the corner of a half-edge, if it is not on the boundary.
    #[inline]
    pub fn corner_of(&self, he: HalfEdgeId<I>) -> Option<CornerId<I>> {
        let c = self.halfedge(he).corner;
        c.is_valid().then_some(c)
    }

    /// Check if a half-edge is on the boundary.
    #[inline]
    pub fn is_boundary_halfedge(&self, he: HalfEdgeId<I>) -> bool {
        self.halfedge(he).is_boundary()
    }

    // ==================== Edge Queries ====================

    /// Get the representative half-edge of an edge.
    #[inline]
    pub fn edge_halfedge(&self, e: EdgeId<I>) -> HalfEdgeId<I> {
        self.edge(e).halfedge
    }

    /// Get the two vertices of an edge.
    pub fn edge_vertices(&self, e: EdgeId<I>) -> [VertexId<I>; 2] {
        let he = self.edge_halfedge(e);
        [self.origin(he), self.dest(he)]
    }

    /// Check if an edge lies on the boundary.
    #[inline]
    pub fn is_boundary_edge(&self, e: EdgeId<I>) -> bool {
        let he = self.edge_halfedge(e);
        self.is_boundary_halfedge(he) || self.is_boundary_halfedge(self.twin(he))
    }

    // ==================== Corner Queries ====================

    /// Get the half-edge of a corner.
    #[inline]
    pub fn corner_halfedge(&self, c: CornerId<I>) -> HalfEdgeId<I> {
        self.corner(c).halfedge
    }

    /// Get the vertex a corner sits at.
    #[inline]
    pub fn corner_vertex(&self, c: CornerId<I>) -> VertexId<I> {
        self.origin(self.prev(self.corner_halfedge(c)))
    }

    /// Get the face a corner belongs to.
    #[inline]
    pub fn corner_face(&self, c: CornerId<I>) -> FaceId<I> {
        self.face_of(self.corner_halfedge(c))
    }

    /// Get the next corner around the face.
    pub fn corner_next(&self, c: CornerId<I>) -> Option<CornerId<I>> {
        self.corner_of(self.next(self.corner_halfedge(c)))
    }

    /// Get the previous corner around the face.
    pub fn corner_prev(&self, c: CornerId<I>) -> Option<CornerId<I>> {
        self.corner_of(self.prev(self.corner_halfedge(c)))
    }

    // ==================== Vertex Queries ====================

    /// Check if a vertex has no incident half-edge.
    #[inline]
    pub fn is_isolated_vertex(&self, v: VertexId<I>) -> bool {
        !self.vertex(v).halfedge.is_valid()
    }

    /// Check if a vertex is on the boundary.
    pub fn is_boundary_vertex(&self, v: VertexId<I>) -> bool {
        self.vertex_halfedges(v)
            .any(|he| self.is_boundary_halfedge(he))
    }

    /// Number of outgoing half-edges of a vertex.
    ///
    /// At a non-manifold vertex (see [`Self::non_manifold_vertex`]) this
    /// counts only the fan reached from the vertex's representative half-edge.
    pub fn degree(&self, v: VertexId<I>) -> usize {
        self.vertex_halfedges(v).count()
    }

    /// Iterate over half-edges around a vertex (outgoing half-edges).
    pub fn vertex_halfedges(&self, v: VertexId<I>) -> HalfEdgeWalk<'_, I> {
        HalfEdgeWalk::new(self, self.vertex(v).halfedge, Around::Vertex)
    }

    /// Collect the outgoing half-edges of a vertex, failing if the rotation
    /// does not close within `num_halfedges()` steps.
    pub fn try_vertex_halfedges(&self, v: VertexId<I>) -> Result<Vec<HalfEdgeId<I>>> {
        self.vertex_halfedges(v).collect_checked()
    }

    /// Iterate over vertices adjacent to a vertex.
    pub fn vertex_neighbors(&self, v: VertexId<I>) -> impl Iterator<Item = VertexId<I>> + '_ {
        self.vertex_halfedges(v).map(|he| self.dest(he))
    }

    /// Iterate over edges incident to a vertex.
    pub fn vertex_edges(&self, v: VertexId<I>) -> impl Iterator<Item = EdgeId<I>> + '_ {
        self.vertex_halfedges(v).map(|he| self.edge_of(he))
    }

    /// Iterate over faces adjacent to a vertex. Boundary loops are skipped.
    pub fn vertex_faces(&self, v: VertexId<I>) -> impl Iterator<Item = FaceId<I>> + '_ {
        self.vertex_halfedges(v)
            .filter(|&he| !self.is_boundary_halfedge(he))
            .map(|he| self.face_of(he))
    }

    /// Iterate over the corners located at a vertex.
    pub fn vertex_corners(&self, v: VertexId<I>) -> impl Iterator<Item = CornerId<I>> + '_ {
        self.vertex_halfedges(v)
            .filter(|&he| !self.is_boundary_halfedge(he))
            .filter_map(|he| self.corner_of(self.next(he)))
    }

    // ==================== Face Queries ====================

    /// Check if a face is a synthetic boundary loop.
    #[inline]
    pub fn is_boundary_loop(&self, f: FaceId<I>) -> bool {
        let he = self.face(f).halfedge;
        he.is_valid() && self.is_boundary_halfedge(he)
    }

    /// Dense index of a boundary loop among all boundary loops.
    pub fn boundary_loop_index(&self, f: FaceId<I>) -> Option<usize> {
        f.index().checked_sub(self.num_real_faces)
    }

    /// Iterate over half-edges around a face.
    pub fn face_halfedges(&self, f: FaceId<I>) -> HalfEdgeWalk<'_, I> {
        HalfEdgeWalk::new(self, self.face(f).halfedge, Around::Face)
    }

    /// Collect the half-edges of a face, failing if the loop does not close
    /// within `num_halfedges()` steps.
    pub fn try_face_halfedges(&self, f: FaceId<I>) -> Result<Vec<HalfEdgeId<I>>> {
        self.face_halfedges(f).collect_checked()
    }

    /// Number of sides of a face.
    pub fn face_degree(&self, f: FaceId<I>) -> usize {
        self.face_halfedges(f).count()
    }

    /// Iterate over vertices of a face.
    pub fn face_vertices(&self, f: FaceId<I>) -> impl Iterator<Item = VertexId<I>> + '_ {
        self.face_halfedges(f).map(|he| self.origin(he))
    }

    /// Iterate over edges of a face.
    pub fn face_edges(&self, f: FaceId<I>) -> impl Iterator<Item = EdgeId<I>> + '_ {
        self.face_halfedges(f).map(|he| self.edge_of(he))
    }

    /// Iterate over corners of a face, in the same order as [`Self::face_vertices`].
    ///
    /// Yields nothing for boundary loops.
    pub fn face_corners(&self, f: FaceId<I>) -> impl Iterator<Item = CornerId<I>> + '_ {
        self.face_halfedges(f)
            .filter_map(|he| self.corner_of(self.next(he)))
    }

    /// Iterate over real faces sharing an edge with a face.
    pub fn face_neighbors(&self, f: FaceId<I>) -> impl Iterator<Item = FaceId<I>> + '_ {
        self.face_halfedges(f)
            .map(|he| self.twin(he))
            .filter(|&twin| !self.is_boundary_halfedge(twin))
            .map(|twin| self.face_of(twin))
    }

    // ==================== Iteration ====================

    /// Iterate over all vertex IDs.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId<I>> + '_ {
        (0..self.vertices.len()).map(VertexId::new)
    }

    /// Iterate over all vertices with their IDs.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId<I>, &Vertex<I>)> + '_ {
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, v)| (VertexId::new(i), v))
    }

    /// Iterate over all half-edge IDs.
    pub fn halfedge_ids(&self) -> impl Iterator<Item = HalfEdgeId<I>> + '_ {
        (0..self.halfedges.len()).map(HalfEdgeId::new)
    }

    /// Iterate over all half-edges with their IDs.
    pub fn halfedges(&self) -> impl Iterator<Item = (HalfEdgeId<I>, &HalfEdge<I>)> + '_ {
        self.halfedges
            .iter()
            .enumerate()
            .map(|(i, he)| (HalfEdgeId::new(i), he))
    }

    /// Iterate over all edge IDs.
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId<I>> + '_ {
        (0..self.edges.len()).map(EdgeId::new)
    }

    /// Iterate over all real face IDs.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId<I>> + '_ {
        (0..self.num_real_faces).map(FaceId::new)
    }

    /// Iterate over all boundary loop IDs.
    pub fn boundary_loop_ids(&self) -> impl Iterator<Item = FaceId<I>> + '_ {
        (self.num_real_faces..self.faces.len()).map(FaceId::new)
    }

    /// Iterate over all corner IDs.
    pub fn corner_ids(&self) -> impl Iterator<Item = CornerId<I>> + '_ {
        (0..self.corners.len()).map(CornerId::new)
    }

    // ==================== Mesh Queries ====================

    /// Euler characteristic `V - E + F`, boundary loops excluded.
    pub fn euler_characteristic(&self) -> i64 {
        self.num_vertices() as i64 - self.num_edges() as i64 + self.num_faces() as i64
    }

    /// Check whether every face is a triangle.
    pub fn is_triangle_mesh(&self) -> bool {
        self.num_faces() > 0 && self.face_ids().all(|f| self.face_degree(f) == 3)
    }

    /// Check whether every face is a quad.
    pub fn is_quad_mesh(&self) -> bool {
        self.num_faces() > 0 && self.face_ids().all(|f| self.face_degree(f) == 4)
    }

    /// Check whether any vertex has no incident half-edge.
    pub fn has_isolated_vertices(&self) -> bool {
        self.isolated_vertex().is_some()
    }

    /// The first vertex without an incident half-edge.
    pub fn isolated_vertex(&self) -> Option<VertexId<I>> {
        self.vertex_ids().find(|&v| self.is_isolated_vertex(v))
    }

    /// Check whether any face is disconnected from the rest of the surface.
    pub fn has_isolated_faces(&self) -> bool {
        self.isolated_face().is_some()
    }

    /// The first face whose every edge lies on the boundary.
    ///
    /// A mesh made of a single face is not considered isolated.
    pub fn isolated_face(&self) -> Option<FaceId<I>> {
        if self.num_faces() < 2 {
            return None;
        }
        self.face_ids().find(|&f| {
            self.face_halfedges(f)
                .all(|he| self.is_boundary_halfedge(self.twin(he)))
        })
    }

    /// Check whether any edge is shared by more than two faces.
    pub fn has_non_manifold_edges(&self) -> bool {
        self.non_manifold_edge().is_some()
    }

    /// The first vertex pair shared by more than two real faces.
    pub fn non_manifold_edge(&self) -> Option<[VertexId<I>; 2]> {
        let mut face_count: HashMap<(usize, usize), usize> = HashMap::new();
        for (id, he) in self.halfedges() {
            if he.on_boundary {
                continue;
            }
            let a = he.origin.index();
            let b = self.origin(self.next(id)).index();
            let key = if a < b { (a, b) } else { (b, a) };
            let count = face_count.entry(key).or_insert(0);
            *count += 1;
            if *count > 2 {
                return Some([VertexId::new(key.0), VertexId::new(key.1)]);
            }
        }
        None
    }

    /// Check whether the faces around any vertex fail to form a single fan.
    pub fn has_non_manifold_vertices(&self) -> bool {
        self.non_manifold_vertex().is_some()
    }

    /// The first vertex whose rotation misses some of its incident faces.
    ///
    /// Counts face and boundary-loop incidences by walking every face, and
    /// compares the count with the length of the vertex rotation.
    pub fn non_manifold_vertex(&self) -> Option<VertexId<I>> {
        let mut incidences = vec![0usize; self.num_vertices()];
        for he in &self.halfedges {
            incidences[he.origin.index()] += 1;
        }
        self.vertex_ids()
            .find(|&v| !self.is_isolated_vertex(v) && incidences[v.index()] != self.degree(v))
    }

    /// Compute the bounding box of the mesh.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = self.vertices.first()?.position;
        let mut min = first;
        let mut max = first;

        for v in &self.vertices {
            for i in 0..3 {
                min[i] = min[i].min(v.position[i]);
                max[i] = max[i].max(v.position[i]);
            }
        }

        Some((min, max))
    }

    // ==================== Construction ====================

    /// Add a new, unconnected vertex and return its ID.
    pub fn add_vertex(&mut self, position: Point3<f64>) -> VertexId<I> {
        let id = VertexId::new(self.vertices.len());
        self.vertices.push(Vertex::new(position));
        id
    }

    // ==================== Validation ====================

    /// Check if the mesh is valid (all connectivity is consistent).
    pub fn is_valid(&self) -> bool {
        for (vid, v) in self.vertices() {
            if v.halfedge.is_valid() && self.halfedge(v.halfedge).origin != vid {
                return false;
            }
        }

        for (heid, he) in self.halfedges() {
            if !he.twin.is_valid() || !he.next.is_valid() || !he.prev.is_valid() {
                return false;
            }
            let twin = self.halfedge(he.twin);
            if twin.twin != heid || twin.edge != he.edge {
                return false;
            }
            if self.halfedge(he.next).prev != heid || self.halfedge(he.prev).next != heid {
                return false;
            }
            // Origins of the twin and of `next` are the same vertex.
            if twin.origin != self.halfedge(he.next).origin {
                return false;
            }
            if he.on_boundary == he.corner.is_valid() {
                return false;
            }
            if he.corner.is_valid() && self.corner(he.corner).halfedge != heid {
                return false;
            }
        }

        for e in &self.edges {
            if self.halfedge(e.halfedge).edge.index() >= self.edges.len() {
                return false;
            }
        }

        for f in &self.faces {
            if !f.halfedge.is_valid() {
                return false;
            }
        }

        true
    }
}

/// Which rotation a [`HalfEdgeWalk`] follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Around {
    /// Outgoing half-edges of a vertex, advancing by `next(twin(he))`.
    Vertex,
    /// Half-edges of a face, advancing by `next(he)`.
    Face,
}

/// Iterator over a cycle of half-edges around a vertex or a face.
///
/// The walk stops after `num_halfedges()` steps even when the cycle never
/// returns to its start, so corrupted connectivity cannot loop forever.
pub struct HalfEdgeWalk<'a, I: MeshIndex = u32> {
    mesh: &'a HalfEdgeMesh<I>,
    start: HalfEdgeId<I>,
    current: HalfEdgeId<I>,
    around: Around,
    remaining: usize,
    done: bool,
    truncated: bool,
}

impl<'a, I: MeshIndex> HalfEdgeWalk<'a, I> {
    fn new(mesh: &'a HalfEdgeMesh<I>, start: HalfEdgeId<I>, around: Around) -> Self {
        Self {
            mesh,
            start,
            current: start,
            around,
            remaining: mesh.num_halfedges(),
            done: !start.is_valid(),
            truncated: false,
        }
    }

    /// Whether the walk was cut off before returning to its start.
    pub fn truncated(&self) -> bool {
        self.truncated
    }

    fn collect_checked(mut self) -> Result<Vec<HalfEdgeId<I>>> {
        let hes: Vec<_> = self.by_ref().collect();
        if self.truncated {
            Err(MeshError::WalkLimitExceeded {
                limit: self.mesh.num_halfedges(),
            })
        } else {
            Ok(hes)
        }
    }
}

impl<'a, I: MeshIndex> Iterator for HalfEdgeWalk<'a, I> {
    type Item = HalfEdgeId<I>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.remaining == 0 || !self.current.is_valid() {
            log::warn!(
                "{:?} walk from {:?} did not close; connectivity is corrupted",
                self.around,
                self.start
            );
            self.done = true;
            self.truncated = true;
            return None;
        }
        self.remaining -= 1;

        let result = self.current;

        // If he goes v -> w, then twin(he) goes w -> v and next(twin(he)) is
        // the following outgoing half-edge of v.
        self.current = match self.around {
            Around::Vertex => self.mesh.next(self.mesh.twin(self.current)),
            Around::Face => self.mesh.next(self.current),
        };

        if self.current == self.start {
            self.done = true;
        }

        Some(result)
    }
}
