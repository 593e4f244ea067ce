use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use humanctl::typing::plan_typing;
use humanctl::{generate_overshoot_path, generate_path, MotionConfig, Point2D, TypingConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn bench_generate_path(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_path");
    let config = MotionConfig::default();
    let origin = Point2D::new(0.0, 0.0);

    for distance in [50.0, 500.0, 2000.0] {
        group.bench_with_input(BenchmarkId::from_parameter(distance), &distance, |b, &d| {
            let mut rng = StdRng::seed_from_u64(42);
            b.iter(|| {
                generate_path(&mut rng, origin, black_box(Point2D::new(d, d * 0.4)), &config)
                    .unwrap()
            })
        });
    }

    group.finish();
}

fn bench_overshoot_path(c: &mut Criterion) {
    let config = MotionConfig::default();
    let mut rng = StdRng::seed_from_u64(42);

    c.bench_function("generate_overshoot_path", |b| {
        b.iter(|| {
            generate_overshoot_path(
                &mut rng,
                Point2D::new(0.0, 0.0),
                black_box(Point2D::new(900.0, 400.0)),
                &config,
            )
            .unwrap()
        })
    });
}

fn bench_plan_typing(c: &mut Criterion) {
    let config = TypingConfig::default();
    let mut rng = StdRng::seed_from_u64(42);
    let text = "The quick brown fox jumps over the lazy dog. Then it naps, briefly!";

    c.bench_function("plan_typing", |b| {
        b.iter(|| plan_typing(&mut rng, black_box(text), &config).unwrap())
    });
}

criterion_group!(
    benches,
    bench_generate_path,
    bench_overshoot_path,
    bench_plan_typing
);
criterion_main!(benches);
