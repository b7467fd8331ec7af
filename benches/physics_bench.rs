use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::DVec2;
use impulse2d::{
    broadphase::SweepAndPrune, sat::separating_axis_test, Body, BodyOptions, InputState,
    Simulator,
};
use rand::Rng;

const BODIES: [u32; 6] = [10, 100, 250, 500, 1000, 2000];

fn random_bodies(count: u32, w: f64) -> Vec<Body> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|i| {
            let position = DVec2::new(rng.gen_range(0.0..w), rng.gen_range(0.0..w));
            let options = BodyOptions::new().angle(rng.gen_range(0.0..std::f64::consts::TAU));
            if i % 2 == 0 {
                Body::circle(position, rng.gen_range(5.0..20.0), &options)
            } else {
                Body::rectangle(
                    position,
                    rng.gen_range(5.0..40.0),
                    rng.gen_range(5.0..40.0),
                    &options,
                )
            }
            .unwrap()
        })
        .collect()
}

fn broad_phase(c: &mut Criterion) {
    let mut group = c.benchmark_group("Sweep and prune");
    for i in BODIES {
        let bodies = random_bodies(i, 2000.0);
        let mut sap = SweepAndPrune::new();
        group.throughput(criterion::Throughput::Elements(i as u64));
        group.bench_function(BenchmarkId::new("update and sweep", i), |b| {
            b.iter(|| {
                sap.update(black_box(&bodies));
                sap.candidate_pairs()
            });
        });
    }
}

fn narrow_phase(c: &mut Criterion) {
    let mut group = c.benchmark_group("SAT");
    let circle = Body::circle(DVec2::ZERO, 10.0, &BodyOptions::new()).unwrap();
    let tilted = BodyOptions::new().angle(0.3);
    let a = Body::rectangle(DVec2::new(12.0, 0.0), 10.0, 10.0, &tilted).unwrap();
    let b = Body::rectangle(DVec2::new(18.0, 3.0), 10.0, 10.0, &BodyOptions::new()).unwrap();

    group.bench_function("circle vs box", |bench| {
        bench.iter(|| separating_axis_test(black_box(&circle), black_box(&a)));
    });
    group.bench_function("box vs box", |bench| {
        bench.iter(|| separating_axis_test(black_box(&a), black_box(&b)));
    });
}

fn full_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("Simulator frame");
    let mut rng = rand::thread_rng();
    for i in [10, 100, 250, 500] {
        let mut sim = Simulator::builder().build();
        let world = sim.world_mut();
        world
            .create_box(
                DVec2::new(500.0, 1100.0),
                100.0,
                1200.0,
                BodyOptions::new().fixed(true),
            )
            .unwrap();
        for _ in 0..i {
            let position = DVec2::new(rng.gen_range(0.0..1000.0), rng.gen_range(0.0..1000.0));
            world
                .create_circle(position, rng.gen_range(5.0..15.0), BodyOptions::new())
                .unwrap();
        }
        group.throughput(criterion::Throughput::Elements(i as u64));
        group.bench_function(BenchmarkId::new("bodies", i), |b| {
            b.iter(|| sim.frame(black_box(&InputState::default())));
        });
    }
}

criterion_group!(simulation, broad_phase, narrow_phase, full_frame);
criterion_main!(simulation);
