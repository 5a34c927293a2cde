use std::path::PathBuf;

use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;
use track_scatter::prelude::*;
use track_scatter_demos::{
    init_tracing, load_track_def, render_track_to_png, PropStyle, RenderConfig,
};
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Track definition; pass another .ron path as the first argument to swap it.
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/meadow.track.ron")
        });
    let def = load_track_def(&path)?;
    let deck = def.deck()?;
    let mut scene = def.build_scene(&deck);

    let spawner = SegmentSpawner::try_new(def.spawner.clone(), deck)?;
    let mut director = TrackDirector::new(spawner);
    let mut rng = StdRng::seed_from_u64(2025);

    // Only keep the events worth reporting at the end.
    let mut sink = VecSink::only([
        SpawnEventKind::SegmentEvicted,
        SpawnEventKind::CycleReset,
        SpawnEventKind::Warning,
    ]);

    let mut reports = director.prewarm(def.prewarm, &mut scene, &mut rng, &mut sink);

    // Run the player down the center line for a while, one meter per tick.
    let run_length = 12.0 * def.spawner.segment_length;
    let mut z = def.spawner.origin.z;
    while z < run_length {
        let tracked = Vec3::new(def.spawner.origin.x, def.spawner.origin.y, z);
        reports.extend(director.tick(tracked, &mut scene, &mut rng, &mut sink));
        z += 1.0;
    }

    let placed: usize = reports.iter().map(SpawnReport::placed_count).sum();
    let big = reports
        .iter()
        .flat_map(|r| [&r.left, &r.right])
        .filter(|s| s.big)
        .count();
    info!(
        "Spawned {} segments, placed {} props ({} big sides), {} evictions, {} cycle resets, {} warnings.",
        reports.len(),
        placed,
        big,
        sink.count(SpawnEventKind::SegmentEvicted),
        sink.count(SpawnEventKind::CycleReset),
        sink.count(SpawnEventKind::Warning),
    );
    info!("Live objects in scene: {}.", scene.object_count());

    // Frame the live segments.
    let spawner = director.spawner();
    let first = spawner.pool().oldest().map_or(0.0, |s| s.position.z);
    let last = spawner
        .pool()
        .newest()
        .map_or(0.0, |s| s.position.z + def.spawner.segment_length);
    let span = last - first;
    let rc = RenderConfig::new(
        (400, (400.0 * span / 40.0).round().max(1.0) as u32),
        Vec2::new(-20.0, first),
        Vec2::new(20.0, last),
    )
    .with_prop_style("pine", PropStyle::Footprint { color: [40, 140, 60] })
    .with_prop_style("oak", PropStyle::Footprint { color: [70, 170, 70] })
    .with_prop_style("bush", PropStyle::Footprint { color: [110, 190, 90] })
    .with_prop_style("rock", PropStyle::Footprint { color: [150, 150, 150] })
    .with_prop_style("stump", PropStyle::Dot { color: [140, 100, 60], radius: 3 })
    .with_prop_style("fence", PropStyle::Footprint { color: [200, 170, 120] })
    .with_prop_style("barn", PropStyle::Footprint { color: [180, 50, 40] })
    .with_prop_style("windmill", PropStyle::Footprint { color: [230, 230, 230] });

    render_track_to_png(spawner, &reports, &rc, "endless-run.png")?;

    director.teardown(&mut scene);
    info!("After teardown: {} live objects.", scene.object_count());
    Ok(())
}
