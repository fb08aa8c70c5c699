//! Benchmark for scene traversals.
//!
//! Run with: cargo bench --package trellis_ui --bench traversal_benchmark

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use trellis_ui::{Block, CommandBuffer, Point, Rect, Scene};

/// A root with `panels` columns of `rows` cells each. Half of the columns
/// sit outside the root so culling has something to skip.
fn build_grid(panels: usize, rows: usize) -> Scene {
    let mut scene = Scene::with_root(Rect::new(0.0, 0.0, 1000.0, 1000.0), Box::new(Block))
        .expect("root");
    let root = scene.root();

    for p in 0..panels {
        let x = (p as f32) * 100.0;
        let panel = scene
            .insert_block(Rect::new(x, 0.0, 100.0, 1000.0), root, (p % 3) as i32)
            .expect("panel");
        for r in 0..rows {
            scene
                .insert_block(Rect::new(0.0, (r as f32) * 10.0, 100.0, 10.0), Some(panel), 0)
                .expect("cell");
        }
    }
    scene
}

fn benchmark_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    for &(panels, rows) in &[(20usize, 50usize), (20, 500)] {
        let mut scene = build_grid(panels, rows);
        let mut buffer = CommandBuffer::new();
        group.throughput(Throughput::Elements((panels * (rows + 1) + 1) as u64));

        for culling in [false, true] {
            let id = BenchmarkId::new(if culling { "culled" } else { "full" }, panels * rows);
            group.bench_with_input(id, &culling, |b, &culling| {
                b.iter(|| {
                    buffer.begin_frame();
                    black_box(scene.render(&mut buffer, culling).expect("render"))
                });
            });
        }
    }
    group.finish();
}

fn benchmark_hit_test(c: &mut Criterion) {
    let mut scene = build_grid(10, 100);

    c.bench_function("node_at_leaf", |b| {
        let mut i = 0u32;
        b.iter(|| {
            i = i.wrapping_add(1);
            let point = Point::new((i % 1000) as f32, ((i * 7) % 1000) as f32);
            black_box(scene.node_at(black_box(point)).expect("hit"))
        });
    });
}

fn benchmark_resort(c: &mut Criterion) {
    let mut scene = build_grid(1, 1000);
    let root = scene.root().expect("root");
    let panel = scene.tree().children(root).expect("children")[0];
    let cells: Vec<_> = scene.tree().children(panel).expect("cells").to_vec();

    c.bench_function("resort_1000_after_z_burst", |b| {
        let mut z = 0i32;
        b.iter(|| {
            for &cell in cells.iter().step_by(10) {
                z = z.wrapping_add(1);
                scene.tree_mut().set_z_index(cell, z % 17).expect("z");
            }
            scene.tree_mut().resort(panel).expect("resort");
        });
    });
}

criterion_group!(benches, benchmark_render, benchmark_hit_test, benchmark_resort);
criterion_main!(benches);
