use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;
use track_scatter::prelude::*;
use track_scatter_demos::{init_tracing, render_candidates_to_png, RenderConfig};
use tracing::info;

const GROUND: u8 = 0;
const OBSTACLE: u8 = 1;

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Ground covers only the lower two thirds of the area; the rest is a drop-off.
    let mut scene = MemoryScene::new();
    scene.add_static(
        Aabb::new(Vec3::new(-20.0, -1.0, -20.0), Vec3::new(20.0, 0.0, 5.0)),
        GROUND,
    );
    scene.add_static(
        Aabb::new(Vec3::new(-3.0, 0.0, -6.0), Vec3::new(2.0, 2.0, -1.0)),
        OBSTACLE,
    );
    scene.add_static(
        Aabb::from_center_size(Vec3::new(5.0, 1.0, -11.0), Vec3::new(3.0, 2.0, 3.0)),
        OBSTACLE,
    );

    let area = PlacementArea::new(Vec3::new(0.0, 5.0, 0.0), Vec2::new(24.0, 30.0));
    let entry = PropEntry::new(
        "crate",
        "crate",
        Aabb::new(Vec3::new(-1.0, 0.0, -1.0), Vec3::new(1.0, 1.5, 1.0)),
    );
    let validator = PlacementValidator::new(ValidatorConfig::default().with_edge_margin(0.5));
    let mut rng = StdRng::seed_from_u64(99);

    let mut accepted = Vec::new();
    let mut rejected = Vec::new();
    for _ in 0..1500 {
        let Some(point) = validator.sample_point(&area, &mut rng) else {
            break;
        };
        match validator.validate(&area, &entry, point, &scene, None) {
            Ok(_) => accepted.push(point),
            Err(reason) => rejected.push((point, reason)),
        }
    }

    let count = |r: Rejection| rejected.iter().filter(|(_, x)| *x == r).count();
    info!(
        "accepted {}, no ground {}, obstructed {}, out of bounds {}",
        accepted.len(),
        count(Rejection::NoGround),
        count(Rejection::Obstructed),
        count(Rejection::OutOfBounds),
    );

    // Same seed, same scene: the search is reproducible.
    let mut a = StdRng::seed_from_u64(5);
    let mut b = StdRng::seed_from_u64(5);
    let mut budget_a = AttemptBudget::new(50);
    let mut budget_b = AttemptBudget::new(50);
    let first = validator.find_placement(&area, &entry, &scene, &mut a, &mut budget_a, None);
    let second = validator.find_placement(&area, &entry, &scene, &mut b, &mut budget_b, None);
    info!(
        "find_placement: {:?} after {} attempts (repeat matches: {})",
        first.map(|p| p.position),
        budget_a.spent(),
        first == second
    );

    let rc = RenderConfig::new((480, 600), Vec2::new(-13.0, -16.0), Vec2::new(13.0, 16.0));
    render_candidates_to_png(&area, &accepted, &rejected, &rc, "placement-rejections.png")?;
    Ok(())
}
