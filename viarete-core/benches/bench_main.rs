use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use geo::{Coord, LineString};
use viarete_core::algo::{clean_topology, polygonize};

/// Street grid with a short stub hanging off every junction; the kind
/// of input the cleaner sees after centerline extraction.
fn grid_with_stubs(size: usize, spacing: f64) -> Vec<LineString<f64>> {
    let mut lines = Vec::new();
    for i in 0..=size {
        let offset = i as f64 * spacing;
        lines.push(LineString::new(vec![
            Coord { x: 0.0, y: offset },
            Coord { x: size as f64 * spacing, y: offset },
        ]));
        lines.push(LineString::new(vec![
            Coord { x: offset, y: 0.0 },
            Coord { x: offset, y: size as f64 * spacing },
        ]));
    }
    for i in 0..size {
        for j in 0..size {
            let x = i as f64 * spacing;
            let y = j as f64 * spacing;
            lines.push(LineString::new(vec![
                Coord { x, y },
                Coord { x: x + 12.0, y: y + 9.0 },
            ]));
        }
    }
    lines
}

fn bench_topology(c: &mut Criterion) {
    let lines = grid_with_stubs(20, 100.0);
    c.bench_function("clean_topology_grid_20", |b| {
        b.iter(|| clean_topology(black_box(&lines), 0.05, 50.0))
    });
}

fn bench_polygonize(c: &mut Criterion) {
    let cleaned = clean_topology(&grid_with_stubs(20, 100.0), 0.05, 50.0);
    c.bench_function("polygonize_grid_20", |b| {
        b.iter(|| polygonize(black_box(&cleaned), 0.05))
    });
}

criterion_group!(benches, bench_topology, bench_polygonize);
criterion_main!(benches);
