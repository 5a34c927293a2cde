use std::collections::HashSet;

use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use track_scatter::prelude::*;
use track_scatter_demos::init_tracing;
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let unit = Aabb::new(Vec3::new(-0.5, 0.0, -0.5), Vec3::new(0.5, 1.0, 0.5));
    let deck = PropDeck::try_new([
        PropEntry::new("A", "a", unit).with_weight(1.0),
        PropEntry::new("B", "b", unit).with_weight(3.0),
        PropEntry::new("C", "c", unit).with_weight(0.5),
        // Non-positive weights fall back to 1.
        PropEntry::new("D", "d", unit).with_weight(0.0),
    ])?;

    let mut cycle = PropCycle::new();
    let mut rng = StdRng::seed_from_u64(7);
    let none = HashSet::new();

    // Each line is one full cycle: every entry appears exactly once before the reset.
    for round in 0..4 {
        let mut order = Vec::new();
        for _ in 0..deck.len() {
            let Some(draw) = cycle.pick(&deck, &none, |_| true, &mut rng) else {
                break;
            };
            if draw.reset {
                info!("-- reset #{} --", cycle.resets());
            }
            cycle.mark_used(draw.entry.id());
            order.push(draw.entry.id().to_owned());
        }
        info!("cycle {}: {}", round, order.join(" "));
    }

    // First picks of a fresh cycle follow the weights: B should lead about 3x as often as A.
    let trials = 20_000;
    let mut firsts = [0usize; 4];
    for _ in 0..trials {
        let mut fresh = PropCycle::new();
        if let Some(draw) = fresh.pick(&deck, &none, |_| true, &mut rng) {
            if let Some(i) = deck.iter().position(|e| e.id() == draw.entry.id()) {
                firsts[i] += 1;
            }
        }
    }
    for (entry, count) in deck.iter().zip(firsts) {
        info!(
            "{} (weight {:.1}): first pick {:.1}%",
            entry.id(),
            entry.weight(),
            100.0 * count as f64 / trials as f64
        );
    }

    // Excluding a prefab for one event keeps its entries out without touching the cycle.
    let excluded: HashSet<PrefabId> = ["b".to_owned()].into_iter().collect();
    let mut cycle = PropCycle::new();
    let mut order = Vec::new();
    while let Some(draw) = cycle.pick(&deck, &excluded, |_| true, &mut rng) {
        if draw.reset {
            break;
        }
        cycle.mark_used(draw.entry.id());
        order.push(draw.entry.id().to_owned());
    }
    info!("with prefab b excluded: {}", order.join(" "));

    Ok(())
}
