mod common;

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use track_scatter::prelude::{
    Aabb, MemoryScene, PrefabShape, PropCategory, PropCycle, PropDeck, PropEntry, SegmentSpawner,
    SpawnerConfig, TrackDirector,
};

fn make_deck(count: usize, big_every: usize) -> PropDeck {
    PropDeck::new((0..count).map(|i| {
        let id = format!("P{i}");
        if big_every > 0 && i % big_every == 0 {
            PropEntry::new(
                id.clone(),
                id,
                Aabb::new(Vec3::new(-3.0, 0.0, -10.0), Vec3::new(3.0, 4.0, 10.0)),
            )
            .with_category(PropCategory::Big)
            .with_weight(0.2)
        } else {
            PropEntry::new(
                id.clone(),
                id,
                Aabb::new(Vec3::new(-0.6, 0.0, -0.6), Vec3::new(0.6, 1.5, 0.6)),
            )
        }
    }))
}

fn make_scene(deck: &PropDeck) -> MemoryScene {
    let mut scene = MemoryScene::new().with_prefab("segment", PrefabShape::empty());
    scene.add_static(
        Aabb::new(Vec3::new(-20.0, -1.0, -10.0), Vec3::new(20.0, 0.0, 1.0e6)),
        0,
    );
    for entry in deck.iter() {
        scene.register_prefab(entry.prefab(), PrefabShape::new(entry.local_bounds(), 1));
    }
    scene
}

fn spawner_spawn_next_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("spawner/spawn_next");

    for &props in &[1usize, 4, 12] {
        let deck = make_deck(32, 0);
        group.throughput(common::elements_throughput(props * 2));

        group.bench_with_input(BenchmarkId::new("props_per_side", props), &props, |b, &props| {
            let mut scene = make_scene(&deck);
            let config = SpawnerConfig::new("segment")
                .with_max_segments(5)
                .with_props_per_side(props);
            let mut spawner = SegmentSpawner::new(config, deck.clone());
            let mut cycle = PropCycle::new();
            let mut rng = StdRng::seed_from_u64(0xC0FFEE);
            b.iter(|| {
                let report = spawner.spawn_next(&mut scene, &mut cycle, &mut rng);
                black_box(report.map(|r| r.placed_count()));
            });
        });
    }

    {
        let deck = make_deck(32, 4);
        group.bench_function("with_big_props", |b| {
            let mut scene = make_scene(&deck);
            let mut spawner = SegmentSpawner::new(SpawnerConfig::new("segment"), deck.clone());
            let mut cycle = PropCycle::new();
            let mut rng = StdRng::seed_from_u64(0xFACE);
            b.iter(|| {
                let report = spawner.spawn_next(&mut scene, &mut cycle, &mut rng);
                black_box(report.map(|r| r.placed_count()));
            });
        });
    }

    group.finish();
}

fn spawner_director_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("spawner/director");
    let deck = make_deck(24, 6);

    for &segments in &[8usize, 64] {
        group.throughput(common::elements_throughput(segments));

        group.bench_with_input(BenchmarkId::new("run", segments), &segments, |b, &segments| {
            b.iter_batched(
                || {
                    let config = SpawnerConfig::new("segment").with_trigger(15.0, Vec3::new(30.0, 10.0, 2.0));
                    let director = TrackDirector::new(SegmentSpawner::new(config, deck.clone()));
                    (director, make_scene(&deck), StdRng::seed_from_u64(0xBEEF))
                },
                |(mut director, mut scene, mut rng)| {
                    director.prewarm(3, &mut scene, &mut rng, &mut ());
                    for i in 0..segments {
                        let tracked = Vec3::new(0.0, 0.0, 15.0 + 30.0 * i as f32);
                        director.tick(tracked, &mut scene, &mut rng, &mut ());
                    }
                    black_box(director.spawner().pool().len());
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = spawner_spawn_next_benches,
              spawner_director_benches
}
criterion_main!(benches);
