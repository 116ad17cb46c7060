use criterion::{criterion_group, criterion_main, Criterion};

use common::{Body, Region};
use quadsim::{Config, SpatialTree};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn populated_tree(workers: usize, count: usize) -> SpatialTree {
    let world = Region::new(-10.0, -30.0, 30.0, 30.0);
    let config = Config {
        depth: 3,
        workers,
        margin_width: 0.2,
        entity_capacity: 50_000,
    };
    let mut tree = SpatialTree::new_with_config(world, config);

    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..count {
        let (x, z) = world.random_point_inside(1.0, &mut rng);
        let body = Body::cube(x, rng.gen_range(0.05..5.0), z).with_velocity(
            rng.gen_range(-2.0..2.0),
            0.0,
            rng.gen_range(-2.0..2.0),
        );
        tree.add_entity(body).expect("bench world over capacity");
    }
    tree
}

fn tick_inline_benchmark(c: &mut Criterion) {
    let mut tree = populated_tree(0, 2000);
    c.bench_function("tick_2000_bodies_inline", |b| {
        b.iter(|| tree.tick(0.016));
    });
}

fn tick_pooled_benchmark(c: &mut Criterion) {
    let mut tree = populated_tree(4, 2000);
    c.bench_function("tick_2000_bodies_4_workers", |b| {
        b.iter(|| tree.tick(0.016));
    });
}

fn insert_benchmark(c: &mut Criterion) {
    c.bench_function("build_and_insert_2000_bodies", |b| {
        b.iter(|| populated_tree(0, 2000));
    });
}

criterion_group!(
    benches,
    tick_inline_benchmark,
    tick_pooled_benchmark,
    insert_benchmark
);
criterion_main!(benches);
