//! Discrete differential-geometry operators on [`HalfEdgeMesh`].
//!
//! All operators are read-only and work on arbitrary polygons unless noted.
//! Boundary loops have zero area and no normal, and boundary half-edges have a
//! zero cotangent, so sums over a vertex neighbourhood can include them
//! without special casing.
//!
//! # References
//!
//! - Crane, K. (2013). "Digital Geometry Processing with Discrete Exterior
//!   Calculus." SIGGRAPH Course Notes.
//! - Meyer, M., et al. (2003). "Discrete Differential-Geometry Operators for
//!   Triangulated 2-Manifolds." Visualization and Mathematics III.

use nalgebra::{Point3, Vector3};

use super::halfedge::HalfEdgeMesh;
use super::index::{CornerId, EdgeId, FaceId, HalfEdgeId, MeshIndex, VertexId};

/// Squared lengths below this are treated as degenerate.
const EPSILON: f64 = 1e-12;

/// Weighting scheme for [`HalfEdgeMesh::vertex_normal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NormalWeighting {
    /// Plain sum of incident face normals.
    Equal,
    /// Face normals weighted by face area.
    #[default]
    Area,
    /// Face normals weighted by the corner angle at the vertex.
    Angle,
    /// Gradient of the angle defect (edge vectors weighted by dihedral angle).
    GaussCurvature,
    /// Cotangent Laplacian of the position (mean curvature normal).
    MeanCurvature,
    /// Normal of the sphere inscribed in the one-ring (Max 1999).
    SphereInscribed,
}

impl<I: MeshIndex> HalfEdgeMesh<I> {
    // ==================== Edges ====================

    /// The vector of a half-edge: its origin minus the origin of the next
    /// half-edge, i.e. pointing from the destination back to the origin.
    #[inline]
    pub fn vector(&self, he: HalfEdgeId<I>) -> Vector3<f64> {
        let a = self.position(self.origin(he));
        let b = self.position(self.origin(self.next(he)));
        a - b
    }

    /// Length of a half-edge.
    #[inline]
    pub fn halfedge_length(&self, he: HalfEdgeId<I>) -> f64 {
        self.vector(he).norm()
    }

    /// Length of an edge.
    #[inline]
    pub fn edge_length(&self, e: EdgeId<I>) -> f64 {
        self.halfedge_length(self.edge_halfedge(e))
    }

    /// Midpoint of an edge.
    pub fn edge_midpoint(&self, e: EdgeId<I>) -> Point3<f64> {
        let he = self.edge_halfedge(e);
        let p = self.position(self.origin(he));
        p - self.vector(he) * 0.5
    }

    /// Mean length over all edges, or 0 for a mesh without edges.
    pub fn mean_edge_length(&self) -> f64 {
        if self.num_edges() == 0 {
            return 0.0;
        }
        let total: f64 = self.edge_ids().map(|e| self.edge_length(e)).sum();
        total / self.num_edges() as f64
    }

    // ==================== Faces ====================

    /// Half the sum of `p_i x p_(i+1)` over the face; its norm is the area.
    fn vector_area(&self, f: FaceId<I>) -> Vector3<f64> {
        let mut hes = self.face_halfedges(f);
        let Some(first) = hes.next() else {
            return Vector3::zeros();
        };
        // Relative to the first vertex to keep far-from-origin faces accurate.
        let p0 = self.position(self.origin(first));
        let mut sum = Vector3::zeros();
        for he in hes {
            let a = self.position(self.origin(he)) - p0;
            let b = self.position(self.origin(self.next(he))) - p0;
            sum += a.cross(&b);
        }
        sum * 0.5
    }

    /// Area of a face. Boundary loops have zero area.
    pub fn face_area(&self, f: FaceId<I>) -> f64 {
        if self.is_boundary_loop(f) {
            return 0.0;
        }
        self.vector_area(f).norm()
    }

    /// Total area of all real faces.
    pub fn total_area(&self) -> f64 {
        self.face_ids().map(|f| self.face_area(f)).sum()
    }

    /// Unit normal of a face.
    ///
    /// Returns `None` for boundary loops and faces with (near) zero area.
    pub fn face_normal(&self, f: FaceId<I>) -> Option<Vector3<f64>> {
        if self.is_boundary_loop(f) {
            return None;
        }
        self.vector_area(f).try_normalize(EPSILON)
    }

    /// Average of the face's vertex positions.
    pub fn face_centroid(&self, f: FaceId<I>) -> Point3<f64> {
        let mut sum = Vector3::zeros();
        let mut n = 0usize;
        for v in self.face_vertices(f) {
            sum += self.position(v).coords;
            n += 1;
        }
        if n == 0 {
            return Point3::origin();
        }
        Point3::from(sum / n as f64)
    }

    /// Circumcenter of a triangle.
    ///
    /// Returns `None` for non-triangular faces and for collinear triangles.
    pub fn face_circumcenter(&self, f: FaceId<I>) -> Option<Point3<f64>> {
        if self.is_boundary_loop(f) || self.face_degree(f) != 3 {
            return None;
        }
        let he = self.face(f).halfedge;
        let a = self.position(self.origin(he));
        let b = self.position(self.origin(self.next(he)));
        let c = self.position(self.origin(self.prev(he)));

        let ab = b - a;
        let ac = c - a;
        let w = ab.cross(&ac);
        let w2 = w.norm_squared();
        if w2 < EPSILON {
            return None;
        }

        let u = w.cross(&ab) * ac.norm_squared();
        let v = ac.cross(&w) * ab.norm_squared();
        Some(a + (u + v) / (2.0 * w2))
    }

    // ==================== Corners ====================

    /// Interior angle of a corner, in radians.
    ///
    /// Returns 0 if one of the edges at the corner has zero length.
    pub fn corner_angle(&self, c: CornerId<I>) -> f64 {
        let he = self.corner_halfedge(c);
        let outgoing = self.prev(he);
        let u = self.vector(outgoing);
        let v = -self.vector(self.prev(outgoing));
        match (u.try_normalize(EPSILON), v.try_normalize(EPSILON)) {
            (Some(u), Some(v)) => u.dot(&v).clamp(-1.0, 1.0).acos(),
            _ => 0.0,
        }
    }

    /// Cotangent of the angle opposite a half-edge.
    ///
    /// Zero for boundary half-edges and degenerate corners.
    pub fn cotan(&self, he: HalfEdgeId<I>) -> f64 {
        if self.is_boundary_halfedge(he) {
            return 0.0;
        }
        let u = self.vector(self.prev(he));
        let v = -self.vector(self.next(he));
        let cross = u.cross(&v).norm();
        if cross < EPSILON {
            0.0
        } else {
            u.dot(&v) / cross
        }
    }

    /// Signed angle between the normals of the two faces sharing a half-edge.
    ///
    /// Positive on convex edges of an outward-oriented surface. Since
    /// [`vector`](Self::vector) points against the half-edge, the sine is
    /// taken from `n2 x n1`. Zero on the boundary or next to a degenerate
    /// face.
    pub fn dihedral_angle(&self, he: HalfEdgeId<I>) -> f64 {
        let twin = self.twin(he);
        if self.is_boundary_halfedge(he) || self.is_boundary_halfedge(twin) {
            return 0.0;
        }
        let (Some(n1), Some(n2)) = (
            self.face_normal(self.face_of(he)),
            self.face_normal(self.face_of(twin)),
        ) else {
            return 0.0;
        };
        let Some(w) = self.vector(he).try_normalize(EPSILON) else {
            return 0.0;
        };
        n2.cross(&n1).dot(&w).atan2(n1.dot(&n2))
    }

    // ==================== Vertices ====================

    /// One third of the area of the faces around a vertex.
    pub fn barycentric_dual_area(&self, v: VertexId<I>) -> f64 {
        self.vertex_faces(v).map(|f| self.face_area(f)).sum::<f64>() / 3.0
    }

    /// Area of the circumcentric (Voronoi) dual cell of a vertex.
    ///
    /// May be negative around obtuse triangles.
    pub fn circumcentric_dual_area(&self, v: VertexId<I>) -> f64 {
        let mut area = 0.0;
        for he in self.vertex_halfedges(v) {
            let prev = self.prev(he);
            let u2 = self.vector(prev).norm_squared();
            let v2 = self.vector(he).norm_squared();
            area += u2 * self.cotan(prev) + v2 * self.cotan(he);
        }
        area / 8.0
    }

    /// Unit normal at a vertex under the given weighting.
    ///
    /// Returns `None` when the weighted sum vanishes, e.g. for isolated
    /// vertices or curvature weightings on flat regions. Like every rotation,
    /// the sum covers a single fan at a non-manifold vertex.
    pub fn vertex_normal(&self, v: VertexId<I>, weighting: NormalWeighting) -> Option<Vector3<f64>> {
        let mut n = Vector3::zeros();
        match weighting {
            NormalWeighting::Equal => {
                for f in self.vertex_faces(v) {
                    n += self.face_normal(f).unwrap_or_else(Vector3::zeros);
                }
            }
            NormalWeighting::Area => {
                for f in self.vertex_faces(v) {
                    n += self.vector_area(f);
                }
            }
            NormalWeighting::Angle => {
                for c in self.vertex_corners(v) {
                    if let Some(normal) = self.face_normal(self.corner_face(c)) {
                        n += normal * self.corner_angle(c);
                    }
                }
            }
            NormalWeighting::GaussCurvature => {
                for he in self.vertex_halfedges(v) {
                    let length = self.halfedge_length(he);
                    if length > EPSILON {
                        let weight = 0.5 * self.dihedral_angle(he) / length;
                        n += self.vector(he) * weight;
                    }
                }
            }
            NormalWeighting::MeanCurvature => {
                for he in self.vertex_halfedges(v) {
                    let weight = 0.5 * (self.cotan(he) + self.cotan(self.twin(he)));
                    n += self.vector(he) * weight;
                }
            }
            NormalWeighting::SphereInscribed => {
                for c in self.vertex_corners(v) {
                    let outgoing = self.prev(self.corner_halfedge(c));
                    let a = self.vector(outgoing);
                    let b = -self.vector(self.prev(outgoing));
                    let denom = a.norm_squared() * b.norm_squared();
                    if denom > EPSILON {
                        n += a.cross(&b) / denom;
                    }
                }
            }
        }
        n.try_normalize(EPSILON)
    }
}
