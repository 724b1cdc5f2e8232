//! Discrete curvature of polygon meshes.
//!
//! Curvatures are built from the mesh operators in [`crate::mesh`]:
//!
//! - **Angle defect**: `2π` (or `π` on the boundary) minus the corner angles
//!   around a vertex; the integrated Gaussian curvature of its dual cell
//! - **Gaussian curvature K**: angle defect over circumcentric dual area
//! - **Mean curvature H**: half the sum of edge length times dihedral angle
//!   around a vertex, over circumcentric dual area
//! - **Principal curvatures**: `H ± sqrt(max(H² - K, 0))`
//!
//! Per-vertex functions compute a single value; [`compute_curvature`] fills a
//! [`CurvatureResult`] for every vertex, in parallel by default.
//!
//! # Example
//!
//! ```no_run
//! use tessera::prelude::*;
//! use tessera::algo::curvature::{compute_curvature, total_angle_defect};
//! use std::f64::consts::PI;
//!
//! let mesh: HalfEdgeMesh = tessera::io::load("sphere.off").unwrap();
//!
//! let result = compute_curvature(&mesh);
//! let v = VertexId::new(0);
//! println!("K={} H={}", result.gaussian(v), result.mean(v));
//!
//! // Gauss-Bonnet
//! let chi = mesh.euler_characteristic() as f64;
//! assert!((total_angle_defect(&mesh) - 2.0 * PI * chi).abs() < 1e-6);
//! ```
//!
//! # References
//!
//! - Crane, K. (2020). "Discrete Differential Geometry: An Applied
//!   Introduction." Chapter on discrete curvature.

use std::f64::consts::PI;
use std::marker::PhantomData;

use rayon::prelude::*;

use crate::mesh::{HalfEdgeMesh, MeshIndex, VertexId};

/// Dual areas below this yield zero curvature.
const MIN_AREA: f64 = 1e-12;

/// Options for batch curvature computation.
#[derive(Debug, Clone)]
pub struct CurvatureOptions {
    /// Whether to spread vertices over the rayon thread pool.
    pub parallel: bool,
}

impl Default for CurvatureOptions {
    fn default() -> Self {
        Self { parallel: true }
    }
}

impl CurvatureOptions {
    /// Single-threaded computation.
    pub fn sequential() -> Self {
        Self { parallel: false }
    }

    /// Set whether to compute in parallel.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// Per-vertex curvature for a whole mesh.
#[derive(Debug, Clone)]
pub struct CurvatureResult<I: MeshIndex = u32> {
    gaussian: Vec<f64>,
    mean: Vec<f64>,
    principal_max: Vec<f64>,
    principal_min: Vec<f64>,
    _marker: PhantomData<I>,
}

impl<I: MeshIndex> CurvatureResult<I> {
    /// Gaussian curvature at a vertex.
    #[inline]
    pub fn gaussian(&self, v: VertexId<I>) -> f64 {
        self.gaussian[v.index()]
    }

    /// Mean curvature at a vertex.
    #[inline]
    pub fn mean(&self, v: VertexId<I>) -> f64 {
        self.mean[v.index()]
    }

    /// Principal curvatures `(k_max, k_min)` at a vertex.
    #[inline]
    pub fn principal(&self, v: VertexId<I>) -> (f64, f64) {
        (self.principal_max[v.index()], self.principal_min[v.index()])
    }

    /// All Gaussian curvatures, indexed by vertex.
    #[inline]
    pub fn gaussian_values(&self) -> &[f64] {
        &self.gaussian
    }

    /// All mean curvatures, indexed by vertex.
    #[inline]
    pub fn mean_values(&self) -> &[f64] {
        &self.mean
    }

    /// Number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.gaussian.len()
    }

    /// Check if empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.gaussian.is_empty()
    }

    /// Shape index `(2/π) atan((k1 + k2) / (k1 - k2))`.
    ///
    /// Ranges over [-1, 1]: -1 is a cup, 0 a saddle, 1 a cap. Umbilic points
    /// map to 0.
    pub fn shape_index(&self, v: VertexId<I>) -> f64 {
        let (k1, k2) = self.principal(v);
        let diff = k1 - k2;
        if diff.abs() < 1e-10 {
            0.0
        } else {
            (2.0 / PI) * ((k1 + k2) / diff).atan()
        }
    }

    /// Curvedness `sqrt((k1² + k2²) / 2)`.
    pub fn curvedness(&self, v: VertexId<I>) -> f64 {
        let (k1, k2) = self.principal(v);
        ((k1 * k1 + k2 * k2) / 2.0).sqrt()
    }
}

/// Angle defect at a vertex.
///
/// Sums the corners of one rotation, so at a non-manifold vertex only the fan
/// containing the representative half-edge contributes.
pub fn angle_defect<I: MeshIndex>(mesh: &HalfEdgeMesh<I>, v: VertexId<I>) -> f64 {
    let full = if mesh.is_boundary_vertex(v) { PI } else { 2.0 * PI };
    let angles: f64 = mesh.vertex_corners(v).map(|c| mesh.corner_angle(c)).sum();
    full - angles
}

/// Sum of all angle defects.
///
/// Equals `2π χ` on any manifold mesh, boundary included (discrete
/// Gauss-Bonnet).
pub fn total_angle_defect<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) -> f64 {
    mesh.vertex_ids()
        .filter(|&v| !mesh.is_isolated_vertex(v))
        .map(|v| angle_defect(mesh, v))
        .sum()
}

/// Pointwise Gaussian curvature at a vertex.
pub fn gaussian_curvature_at<I: MeshIndex>(mesh: &HalfEdgeMesh<I>, v: VertexId<I>) -> f64 {
    per_area(angle_defect(mesh, v), mesh.circumcentric_dual_area(v))
}

/// Integrated mean curvature `½ Σ length × dihedral` over outgoing half-edges.
pub fn scalar_mean_curvature<I: MeshIndex>(mesh: &HalfEdgeMesh<I>, v: VertexId<I>) -> f64 {
    0.5 * mesh
        .vertex_halfedges(v)
        .map(|he| mesh.halfedge_length(he) * mesh.dihedral_angle(he))
        .sum::<f64>()
}

/// Pointwise mean curvature at a vertex.
///
/// This is the integrated value over the dual area, so it estimates the sum
/// of the principal curvatures: `2/r` on a sphere of radius `r`.
pub fn mean_curvature_at<I: MeshIndex>(mesh: &HalfEdgeMesh<I>, v: VertexId<I>) -> f64 {
    per_area(scalar_mean_curvature(mesh, v), mesh.circumcentric_dual_area(v))
}

/// Principal curvatures `(k_max, k_min)` at a vertex.
pub fn principal_curvatures<I: MeshIndex>(mesh: &HalfEdgeMesh<I>, v: VertexId<I>) -> (f64, f64) {
    let area = mesh.circumcentric_dual_area(v);
    let k = per_area(angle_defect(mesh, v), area);
    let h = per_area(scalar_mean_curvature(mesh, v), area);
    principal_from(h, k)
}

fn per_area(value: f64, area: f64) -> f64 {
    if area.abs() < MIN_AREA {
        0.0
    } else {
        value / area
    }
}

fn principal_from(h: f64, k: f64) -> (f64, f64) {
    let disc = (h * h - k).max(0.0).sqrt();
    (h + disc, h - disc)
}

/// Compute Gaussian, mean and principal curvature for every vertex, in
/// parallel.
///
/// # Example
///
/// ```
/// use tessera::prelude::*;
/// use tessera::algo::curvature::compute_curvature;
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.5, 1.0, 0.0),
///     Point3::new(0.5, 0.5, 1.0),
/// ];
/// let faces = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
/// let mesh: HalfEdgeMesh = build(&vertices, &faces).unwrap();
///
/// let result = compute_curvature(&mesh);
/// assert_eq!(result.len(), 4);
/// ```
pub fn compute_curvature<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) -> CurvatureResult<I> {
    compute_curvature_with_options(mesh, &CurvatureOptions::default())
}

/// Compute all curvatures on the current thread.
pub fn compute_curvature_sequential<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) -> CurvatureResult<I> {
    compute_curvature_with_options(mesh, &CurvatureOptions::sequential())
}

/// Compute all curvatures with explicit [`CurvatureOptions`].
pub fn compute_curvature_with_options<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
    options: &CurvatureOptions,
) -> CurvatureResult<I> {
    let n = mesh.num_vertices();

    let compute_vertex = |idx: usize| -> [f64; 4] {
        let v = VertexId::<I>::new(idx);
        if mesh.is_isolated_vertex(v) {
            return [0.0; 4];
        }
        // One dual area per vertex.
        let area = mesh.circumcentric_dual_area(v);
        let k = per_area(angle_defect(mesh, v), area);
        let h = per_area(scalar_mean_curvature(mesh, v), area);
        let (k_max, k_min) = principal_from(h, k);
        [k, h, k_max, k_min]
    };

    let values: Vec<[f64; 4]> = if options.parallel {
        (0..n).into_par_iter().map(compute_vertex).collect()
    } else {
        (0..n).map(compute_vertex).collect()
    };

    let mut result = CurvatureResult {
        gaussian: Vec::with_capacity(n),
        mean: Vec::with_capacity(n),
        principal_max: Vec::with_capacity(n),
        principal_min: Vec::with_capacity(n),
        _marker: PhantomData,
    };
    for [k, h, k_max, k_min] in values {
        result.gaussian.push(k);
        result.mean.push(h);
        result.principal_max.push(k_max);
        result.principal_min.push(k_min);
    }

    log::debug!("computed curvature for {} vertices", n);
    result
}
