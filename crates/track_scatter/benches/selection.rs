mod common;

use std::collections::HashSet;
use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use track_scatter::prelude::{pick_weighted, pick_weighted_index, Aabb, PropCycle, PropDeck, PropEntry};

fn make_deck(count: usize) -> PropDeck {
    PropDeck::new((0..count).map(|i| {
        PropEntry::new(
            format!("P{i}"),
            format!("prop_{i}"),
            Aabb::new(Vec3::new(-0.5, 0.0, -0.5), Vec3::new(0.5, 1.0, 0.5)),
        )
        .with_weight(0.25 + ((i % 7) as f32) / 7.0)
    }))
}

fn selection_weighted_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("selection/weighted");

    for &n in &[8usize, 64, 256, 1024, 4096] {
        let deck = make_deck(n);
        let entries: Vec<&PropEntry> = deck.iter().collect();
        group.throughput(common::elements_throughput(n));

        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            let mut rng = StdRng::seed_from_u64(0xDEADBEEF);
            b.iter(|| {
                let sel = pick_weighted(&entries, &mut rng);
                black_box(sel);
            });
        });
    }

    for &n in &[256usize, 2048] {
        let weights = vec![0.0f32; n];
        group.throughput(common::elements_throughput(n));

        group.bench_with_input(BenchmarkId::new("zero_total", n), &n, |b, _| {
            b.iter(|| {
                let sel = pick_weighted_index(black_box(&weights), 0.5);
                black_box(sel);
            });
        });
    }

    group.finish();
}

fn selection_cycle_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("selection/cycle");

    for &n in &[8usize, 64, 256] {
        let deck = make_deck(n);
        group.throughput(common::elements_throughput(n));

        // Draw the whole deck once, which ends in a reset on the next pass.
        group.bench_with_input(BenchmarkId::new("full_cycle", n), &n, |b, _| {
            let mut rng = StdRng::seed_from_u64(0xC0FFEE);
            let excluded = HashSet::new();
            b.iter_batched(
                PropCycle::new,
                |mut cycle| {
                    for _ in 0..n {
                        if let Some(draw) = cycle.pick(&deck, &excluded, |_| true, &mut rng) {
                            cycle.mark_used(draw.entry.id());
                        }
                    }
                    black_box(cycle.used_count());
                },
                BatchSize::SmallInput,
            );
        });
    }

    for &n in &[64usize, 1024] {
        let deck = make_deck(n);
        let excluded: HashSet<String> = deck
            .iter()
            .take(n / 2)
            .map(|e| e.prefab().to_owned())
            .collect();
        group.throughput(common::elements_throughput(n));

        group.bench_with_input(BenchmarkId::new("half_excluded", n), &n, |b, _| {
            let mut rng = StdRng::seed_from_u64(0xFACEFEED);
            let mut cycle = PropCycle::new();
            b.iter(|| {
                let sel = cycle.pick(&deck, &excluded, |_| true, &mut rng);
                black_box(sel.map(|d| d.entry.id().len()));
            });
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = selection_weighted_benches,
              selection_cycle_benches
}
criterion_main!(benches);
