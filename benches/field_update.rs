//! Benchmarks for the CPU-side particle update loop.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use sitefx::field::{FieldConfig, ParticleField};
use sitefx::pointer::PointerSnapshot;
use sitefx::scheduler::{FrameInput, FrameTick};

fn bench_field_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("field_update");

    for count in [100u32, 400, 2_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let config = FieldConfig {
                count,
                ..FieldConfig::default()
            };
            let mut field = ParticleField::new(config, 16.0 / 9.0, &mut StdRng::seed_from_u64(42));

            let input = FrameInput {
                pointer: PointerSnapshot {
                    ndc: Vec2::new(0.3, -0.2),
                    position: Vec2::new(830.0, 430.0),
                    last_move: Some(0.0),
                },
                viewport: Vec2::new(1280.0, 720.0),
            };

            let mut frame = 0u64;
            b.iter(|| {
                frame += 1;
                let tick = FrameTick {
                    elapsed: frame as f32 / 60.0,
                    delta: 1.0 / 60.0,
                    frame,
                };
                field.update(tick, &input);
                black_box(field.instance_bytes());
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_field_update);
criterion_main!(benches);
