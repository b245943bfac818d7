use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use inkframe_core::{Rgba, StageConfig};
use inkframe_scene::{LayerBuilder, Stage};
use std::hint::black_box;

/// A `count` x `count` grid of 10px rects nested one frame deep.
fn grid_stage(count: u32) -> Stage {
    let size = count * 12;
    let mut stage = Stage::new(StageConfig::new(size, size)).expect("stage");
    let frame = stage
        .add(LayerBuilder::frame(0.0, 0.0, size as f32, size as f32))
        .expect("frame");
    for row in 0..count {
        for col in 0..count {
            let rect = stage
                .scene_mut()
                .insert(
                    LayerBuilder::rect(col as f32 * 12.0, row as f32 * 12.0, 10.0, 10.0)
                        .fill(Rgba::RED),
                )
                .expect("rect");
            stage.scene_mut().add_child(frame, rect).expect("attach");
        }
    }
    stage.render();
    stage
}

fn bench_hit_test(c: &mut Criterion) {
    let mut group = c.benchmark_group("stage/hit_test");
    for count in [10u32, 50] {
        let stage = grid_stage(count);
        group.bench_with_input(BenchmarkId::from_parameter(count * count), &stage, |b, stage| {
            b.iter(|| {
                for i in 0..count {
                    let p = i as f32 * 12.0 + 5.0;
                    black_box(stage.hit_test(black_box(p), black_box(p)));
                }
            });
        });
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("stage/render");
    group.sample_size(20);
    for count in [10u32, 50] {
        let mut stage = grid_stage(count);
        group.bench_function(BenchmarkId::from_parameter(count * count), |b| {
            b.iter(|| stage.render());
        });
    }
    group.finish();
}

fn bench_pointer_move(c: &mut Criterion) {
    let mut stage = grid_stage(20);
    c.bench_function("stage/pointer_move_sweep", |b| {
        b.iter(|| {
            for x in 0..240 {
                stage.pointer_move(black_box(x as f32), 5.0);
            }
        });
    });
}

criterion_group!(benches, bench_hit_test, bench_render, bench_pointer_move);
criterion_main!(benches);
