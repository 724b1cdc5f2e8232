//! Benchmarks for mesh operations.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nalgebra::Point3;
use tessera::algo::curvature::{compute_curvature, compute_curvature_sequential};
use tessera::mesh::TopologyIndex;
use tessera::prelude::*;

fn grid(n: usize) -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
    let mut vertices = Vec::with_capacity((n + 1) * (n + 1));
    let mut faces = Vec::with_capacity(n * n * 2);

    for j in 0..=n {
        for i in 0..=n {
            // A gentle bump so curvature is not trivially zero.
            let (x, y) = (i as f64 / n as f64, j as f64 / n as f64);
            let z = (x * std::f64::consts::PI).sin() * (y * std::f64::consts::PI).sin();
            vertices.push(Point3::new(x, y, 0.25 * z));
        }
    }

    for j in 0..n {
        for i in 0..n {
            let v00 = j * (n + 1) + i;
            let v10 = v00 + 1;
            let v01 = v00 + (n + 1);
            let v11 = v01 + 1;

            faces.push([v00, v10, v11]);
            faces.push([v00, v11, v01]);
        }
    }

    (vertices, faces)
}

fn create_grid_mesh(n: usize) -> HalfEdgeMesh {
    let (vertices, faces) = grid(n);
    build(&vertices, &faces).unwrap()
}

fn bench_mesh_construction(c: &mut Criterion) {
    let (vertices, faces) = grid(100);

    c.bench_function("build_grid_100x100", |b| {
        b.iter(|| {
            let mesh: HalfEdgeMesh = build(black_box(&vertices), black_box(&faces)).unwrap();
            mesh
        });
    });
}

fn bench_mesh_traversal(c: &mut Criterion) {
    let mesh = create_grid_mesh(50);

    c.bench_function("vertex_neighbors_all", |b| {
        b.iter(|| {
            let mut count = 0;
            for v in mesh.vertex_ids() {
                count += mesh.vertex_neighbors(v).count();
            }
            count
        });
    });

    c.bench_function("face_normals_all", |b| {
        b.iter(|| {
            let mut sum = nalgebra::Vector3::zeros();
            for f in mesh.face_ids() {
                sum += mesh.face_normal(f).unwrap_or_else(nalgebra::Vector3::zeros);
            }
            sum
        });
    });

    c.bench_function("topology_index", |b| {
        b.iter(|| TopologyIndex::new(black_box(&mesh)));
    });
}

fn bench_curvature(c: &mut Criterion) {
    let mesh = create_grid_mesh(100);

    c.bench_function("curvature_parallel", |b| {
        b.iter(|| compute_curvature(black_box(&mesh)));
    });

    c.bench_function("curvature_sequential", |b| {
        b.iter(|| compute_curvature_sequential(black_box(&mesh)));
    });
}

criterion_group!(benches, bench_mesh_construction, bench_mesh_traversal, bench_curvature);
criterion_main!(benches);
