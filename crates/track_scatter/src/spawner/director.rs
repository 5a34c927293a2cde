//! Drives a [`SegmentSpawner`] from proximity triggers.
use glam::Vec3;
use rand::Rng as RngCore;
use tracing::{debug, info};

use crate::geometry::Aabb;
use crate::pool::Segment;
use crate::scene::{Instantiator, SceneQuery};
use crate::selection::PropCycle;
use crate::spawner::events::{EventSink, SpawnEvent, SpawnEventKind};
use crate::spawner::runner::{SegmentSpawner, SpawnReport};
use crate::spawner::trigger::{ProximityTriggers, TriggerRegion, TriggerSource};

/// Name of the trigger region armed for the segment with `index`.
pub fn trigger_name(index: u64) -> String {
    format!("segment:{index}")
}

/// Owns the spawner, its trigger source and the prop cycle, and spawns one segment per
/// trigger event.
pub struct TrackDirector<T: TriggerSource = ProximityTriggers> {
    spawner: SegmentSpawner,
    triggers: T,
    cycle: PropCycle,
}

impl TrackDirector<ProximityTriggers> {
    pub fn new(spawner: SegmentSpawner) -> Self {
        Self::with_triggers(spawner, ProximityTriggers::new())
    }
}

impl<T: TriggerSource> TrackDirector<T> {
    pub fn with_triggers(spawner: SegmentSpawner, triggers: T) -> Self {
        Self {
            spawner,
            triggers,
            cycle: PropCycle::new(),
        }
    }

    pub fn spawner(&self) -> &SegmentSpawner {
        &self.spawner
    }

    pub fn triggers(&self) -> &T {
        &self.triggers
    }

    pub fn cycle(&self) -> &PropCycle {
        &self.cycle
    }

    /// Spawns `count` segments up front. Returns the reports of the ones that spawned.
    pub fn prewarm<S, R>(
        &mut self,
        count: usize,
        scene: &mut S,
        rng: &mut R,
        sink: &mut dyn EventSink,
    ) -> Vec<SpawnReport>
    where
        S: SceneQuery + Instantiator,
        R: RngCore,
    {
        info!("Prewarming {} segments.", count);
        let mut reports = Vec::with_capacity(count);
        for _ in 0..count {
            if let Some(report) = self.spawn_one(scene, rng, sink) {
                reports.push(report);
            }
        }
        reports
    }

    /// Polls the triggers with the tracked position and spawns one segment per event.
    pub fn tick<S, R>(
        &mut self,
        tracked: Vec3,
        scene: &mut S,
        rng: &mut R,
        sink: &mut dyn EventSink,
    ) -> Vec<SpawnReport>
    where
        S: SceneQuery + Instantiator,
        R: RngCore,
    {
        let events = self.triggers.poll(tracked);
        let mut reports = Vec::with_capacity(events.len());
        for event in events {
            debug!("Trigger '{}' fired; spawning next segment.", event.region);
            if sink.wants(SpawnEventKind::Triggered) {
                sink.send(SpawnEvent::Triggered {
                    region: event.region,
                    position: event.position,
                });
            }
            if let Some(report) = self.spawn_one(scene, rng, sink) {
                reports.push(report);
            }
        }
        reports
    }

    /// Destroys all live segments and disarms their triggers.
    pub fn teardown<I: Instantiator>(&mut self, scene: &mut I) -> Vec<Segment> {
        let cleared = self.spawner.clear(scene);
        for segment in &cleared {
            self.triggers.disarm(&trigger_name(segment.index));
        }
        info!("Track torn down ({} segments).", cleared.len());
        cleared
    }

    fn spawn_one<S, R>(
        &mut self,
        scene: &mut S,
        rng: &mut R,
        sink: &mut dyn EventSink,
    ) -> Option<SpawnReport>
    where
        S: SceneQuery + Instantiator,
        R: RngCore,
    {
        let report = self
            .spawner
            .spawn_next_with_events(scene, &mut self.cycle, rng, sink)?;

        if let Some(evicted) = &report.evicted {
            self.triggers.disarm(&trigger_name(evicted.index));
        }

        let config = self.spawner.config();
        let center = report.segment.position + Vec3::Z * config.trigger_offset;
        self.triggers.arm(TriggerRegion::new(
            trigger_name(report.segment.index),
            Aabb::from_center_size(center, config.trigger_size),
        ));
        Some(report)
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::prop::PropDeck;
    use crate::spawner::config::SpawnerConfig;
    use crate::spawner::events::VecSink;
    use crate::spawner::runner::tests::{scene_for, small};

    fn director(max_segments: usize) -> (TrackDirector, crate::scene::MemoryScene) {
        let deck = PropDeck::new(vec![small("a"), small("b"), small("c")]);
        let scene = scene_for(&deck);
        let config = SpawnerConfig::new("segment")
            .with_max_segments(max_segments)
            .with_props_per_side(1)
            .with_trigger(15.0, Vec3::new(30.0, 10.0, 2.0));
        let spawner = SegmentSpawner::try_new(config, deck).expect("valid config");
        (TrackDirector::new(spawner), scene)
    }

    #[test]
    fn prewarm_arms_one_trigger_per_segment() {
        let (mut director, mut scene) = director(5);
        let mut rng = StdRng::seed_from_u64(1);

        let reports = director.prewarm(3, &mut scene, &mut rng, &mut ());
        assert_eq!(reports.len(), 3);
        assert_eq!(director.triggers().len(), 3);
        assert!(director.triggers().is_armed("segment:2"));
    }

    #[test]
    fn tick_spawns_once_per_trigger_entry() {
        let (mut director, mut scene) = director(5);
        let mut rng = StdRng::seed_from_u64(2);
        director.prewarm(2, &mut scene, &mut rng, &mut ());

        let mut sink = VecSink::new();
        assert!(director
            .tick(Vec3::new(0.0, 0.0, 5.0), &mut scene, &mut rng, &mut sink)
            .is_empty());

        // Middle of segment 0.
        let reports = director.tick(Vec3::new(0.0, 0.0, 15.0), &mut scene, &mut rng, &mut sink);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].segment.index, 2);
        assert_eq!(sink.count(SpawnEventKind::Triggered), 1);

        // Staying inside the same region does not fire again.
        assert!(director
            .tick(Vec3::new(0.0, 0.0, 15.2), &mut scene, &mut rng, &mut sink)
            .is_empty());
        assert_eq!(director.spawner().pool().len(), 3);
    }

    #[test]
    fn evicted_segments_lose_their_trigger() {
        let (mut director, mut scene) = director(2);
        let mut rng = StdRng::seed_from_u64(3);

        director.prewarm(3, &mut scene, &mut rng, &mut ());
        assert!(!director.triggers().is_armed("segment:0"));
        assert!(director.triggers().is_armed("segment:1"));
        assert!(director.triggers().is_armed("segment:2"));
        assert_eq!(director.spawner().pool().len(), 2);
    }

    #[test]
    fn cycle_state_survives_across_ticks() {
        let (mut director, mut scene) = director(5);
        let mut rng = StdRng::seed_from_u64(4);

        director.prewarm(1, &mut scene, &mut rng, &mut ());
        assert_eq!(director.cycle().used_count(), 2);
        director.tick(Vec3::new(0.0, 0.0, 15.0), &mut scene, &mut rng, &mut ());
        assert_eq!(director.cycle().resets(), 1);
    }

    #[test]
    fn teardown_clears_segments_and_triggers() {
        let (mut director, mut scene) = director(5);
        let mut rng = StdRng::seed_from_u64(5);

        director.prewarm(3, &mut scene, &mut rng, &mut ());
        let cleared = director.teardown(&mut scene);
        assert_eq!(cleared.len(), 3);
        assert!(director.triggers().is_empty());
        assert_eq!(scene.object_count(), 0);
    }
}
