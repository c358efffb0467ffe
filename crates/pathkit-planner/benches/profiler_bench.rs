//! Benchmarks for timeline and collision evaluation.
//!
//! Run with: cargo bench -p pathkit-planner

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pathkit_core::{PathSegment, Point, RobotSettings, Shape, ShapeKind, StartPoint};
use pathkit_planner::{CollisionChecker, MotionProfiler};
use pathkit_settings::{CollisionSettings, ProfilerSettings};

/// Zig-zag of curved segments across the field.
fn zigzag(count: usize) -> Vec<PathSegment> {
    (0..count)
        .map(|i| {
            let x = 10.0 + (i as f64 * 12.0) % 120.0;
            let y = if i % 2 == 0 { 20.0 } else { 120.0 };
            PathSegment::line_to(x, y).with_control_points(vec![
                Point::new(x - 5.0, 70.0),
                Point::new(x + 5.0, 70.0),
            ])
        })
        .collect()
}

fn bench_profile_path(c: &mut Criterion) {
    let mut group = c.benchmark_group("profile_path");
    let profiler = MotionProfiler::new(&RobotSettings::default(), ProfilerSettings::default())
        .expect("default settings are valid");

    for count in [1usize, 10, 50] {
        let segments = zigzag(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &segments, |b, segments| {
            b.iter(|| profiler.profile_path(black_box(&StartPoint::default()), segments, &[]))
        });
    }
    group.finish();
}

fn bench_path_penalty(c: &mut Criterion) {
    let shapes = vec![
        Shape::rectangle(Point::new(60.0, 60.0), Point::new(80.0, 80.0), ShapeKind::Obstacle),
        Shape::rectangle(Point::new(0.0, 0.0), Point::new(144.0, 144.0), ShapeKind::KeepIn),
    ];
    let segments = zigzag(10);

    for inflate_footprint in [false, true] {
        let checker = CollisionChecker::new(
            CollisionSettings {
                inflate_footprint,
                ..CollisionSettings::default()
            },
            &RobotSettings::default(),
            100,
        );
        c.bench_function(&format!("path_penalty/footprint={inflate_footprint}"), |b| {
            b.iter(|| checker.path_penalty(&StartPoint::default(), black_box(&segments), &[], &shapes))
        });
    }
}

criterion_group!(benches, bench_profile_path, bench_path_penalty);
criterion_main!(benches);
