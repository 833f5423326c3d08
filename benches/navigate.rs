//! Benchmarks for navigation queries.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nalgebra::Point3;
use trinav::algo::navigate::{navigate_batch, NavigateOptions};
use trinav::algo::proximity::closest_points;
use trinav::prelude::*;

fn create_grid_mesh(n: usize) -> TriMesh {
    let mut vertices = Vec::with_capacity((n + 1) * (n + 1));
    let mut faces = Vec::with_capacity(n * n * 2);

    for j in 0..=n {
        for i in 0..=n {
            vertices.push(Point3::new(i as f64, j as f64, 0.0));
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

    build_from_triangles(&vertices, &faces).unwrap()
}

fn bench_navigate(c: &mut Criterion) {
    let mut group = c.benchmark_group("navigate_corner_to_corner");

    for n in [10, 30] {
        let mesh = create_grid_mesh(n);
        let start = Point3::new(0.25, 0.1, 0.0);
        let target = Point3::new(n as f64 - 0.25, n as f64 - 0.1, 0.0);

        for (name, mode) in [("random", SamplingMode::Random), ("on_edge", SamplingMode::OnEdge)] {
            let options = NavigateOptions::default().with_sampling(mode).with_seed(7);
            group.bench_with_input(BenchmarkId::new(name, n), &n, |b, _| {
                b.iter(|| navigate(&mesh, black_box(start), black_box(target), &options).unwrap())
            });
        }
    }

    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let mesh = create_grid_mesh(30);
    let queries: Vec<_> = (0..64)
        .map(|i| {
            let t = i as f64 / 64.0;
            (
                Point3::new(0.5, 30.0 * t, 0.0),
                Point3::new(29.5, 30.0 * (1.0 - t), 0.0),
            )
        })
        .collect();
    let options = NavigateOptions::default()
        .with_sampling(SamplingMode::OnEdge)
        .with_seed(7);

    c.bench_function("navigate_batch_64", |b| {
        b.iter(|| navigate_batch(&mesh, black_box(&queries), &options))
    });
}

fn bench_proximity(c: &mut Criterion) {
    let mesh = create_grid_mesh(30);
    let queries: Vec<_> = (0..256)
        .map(|i| Point3::new((i % 30) as f64 + 0.3, (i / 30) as f64 + 0.6, 0.1))
        .collect();

    c.bench_function("closest_points_256", |b| {
        b.iter(|| closest_points(&mesh, black_box(&queries)).unwrap())
    });
}

criterion_group!(benches, bench_navigate, bench_batch, bench_proximity);
criterion_main!(benches);
