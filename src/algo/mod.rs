//! Mesh processing algorithms.
//!
//! - **Curvature**: angle defect, Gaussian, mean and principal curvature

pub mod curvature;
