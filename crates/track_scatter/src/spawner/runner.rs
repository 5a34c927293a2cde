//! Segment spawner: instantiates track segments and populates their side areas with props.
use std::collections::HashSet;

use glam::{Quat, Vec2, Vec3};
use rand::Rng as RngCore;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::placement::{AttemptBudget, PlacementArea, PlacementValidator, ValidPlacement};
use crate::pool::{Segment, SegmentPool};
use crate::prop::{PropDeck, PropEntry, PropId};
use crate::scene::{Instantiator, ObjectHandle, PrefabId, SceneQuery};
use crate::selection::PropCycle;
use crate::spawner::config::{Side, SpawnerConfig};
use crate::spawner::events::{EventSink, SpawnEvent, SpawnEventKind};

/// A prop placed on a segment side.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedProp {
    pub prop_id: PropId,
    pub handle: ObjectHandle,
    pub position: Vec3,
    pub rotation: Quat,
}

/// Outcome of populating one side.
#[derive(Debug, Clone, PartialEq)]
pub struct SideReport {
    pub side: Side,
    pub placed: Vec<PlacedProp>,
    /// Candidate attempts spent.
    pub attempts: usize,
    /// True when a big prop took the whole side.
    pub big: bool,
}

impl SideReport {
    fn new(side: Side) -> Self {
        Self {
            side,
            placed: Vec::new(),
            attempts: 0,
            big: false,
        }
    }
}

/// Outcome of one spawn event.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnReport {
    pub segment: Segment,
    /// Segment pushed out of the pool and destroyed, if any.
    pub evicted: Option<Segment>,
    pub left: SideReport,
    pub right: SideReport,
    /// Prop cycle resets that happened while populating.
    pub cycle_resets: usize,
}

impl SpawnReport {
    pub fn side(&self, side: Side) -> &SideReport {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    /// Props placed on both sides.
    pub fn placed_count(&self) -> usize {
        self.left.placed.len() + self.right.placed.len()
    }
}

/// Lays out segments along the track and fills their side areas with props.
pub struct SegmentSpawner {
    config: SpawnerConfig,
    deck: PropDeck,
    validator: PlacementValidator,
    pool: SegmentPool,
    next_index: u64,
}

impl SegmentSpawner {
    /// Creates a spawner after validating `config`.
    pub fn try_new(config: SpawnerConfig, deck: PropDeck) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config, deck))
    }

    pub fn new(config: SpawnerConfig, deck: PropDeck) -> Self {
        debug_assert!(config.max_segments > 0, "max_segments must be > 0");
        debug_assert!(config.segment_length > 0.0, "segment_length must be > 0");

        if deck.is_empty() {
            warn!("Prop deck is empty; segments will spawn without props.");
        }

        Self {
            validator: PlacementValidator::new(config.validator),
            pool: SegmentPool::new(config.max_segments),
            config,
            deck,
            next_index: 0,
        }
    }

    /// Replaces the placement validator (e.g. to change its candidate sampler).
    pub fn with_validator(mut self, validator: PlacementValidator) -> Self {
        self.validator = validator;
        self
    }

    pub fn config(&self) -> &SpawnerConfig {
        &self.config
    }

    pub fn deck(&self) -> &PropDeck {
        &self.deck
    }

    pub fn pool(&self) -> &SegmentPool {
        &self.pool
    }

    /// Index the next spawned segment will get.
    pub fn next_index(&self) -> u64 {
        self.next_index
    }

    /// Origin of the next segment.
    pub fn next_segment_position(&self) -> Vec3 {
        self.config.origin + Vec3::Z * (self.config.segment_length * self.next_index as f32)
    }

    /// World-space area for `side` of `segment`.
    pub fn side_area(&self, segment: &Segment, side: Side) -> PlacementArea {
        self.config.area(side).translated(segment.position)
    }

    /// Spawns the next segment and populates it. See [`SegmentSpawner::spawn_next_with_events`].
    pub fn spawn_next<S, R>(
        &mut self,
        scene: &mut S,
        cycle: &mut PropCycle,
        rng: &mut R,
    ) -> Option<SpawnReport>
    where
        S: SceneQuery + Instantiator,
        R: RngCore,
    {
        self.spawn_next_with_events(scene, cycle, rng, &mut ())
    }

    /// Spawns the next segment, registers it (destroying any evicted segment) and then
    /// populates the left and right areas.
    ///
    /// Returns `None` when the segment itself could not be instantiated. Props that find no
    /// valid spot within the attempt budget are simply left out.
    pub fn spawn_next_with_events<S, R>(
        &mut self,
        scene: &mut S,
        cycle: &mut PropCycle,
        rng: &mut R,
        sink: &mut dyn EventSink,
    ) -> Option<SpawnReport>
    where
        S: SceneQuery + Instantiator,
        R: RngCore,
    {
        let index = self.next_index;
        let position = self.next_segment_position();

        if self.config.segment_prefab.is_empty() {
            warn!("No segment prefab configured; skipping spawn.");
            if sink.wants(SpawnEventKind::Warning) {
                sink.send(SpawnEvent::Warning {
                    context: format!("segment:{index}"),
                    message: "No segment prefab configured".into(),
                });
            }
            return None;
        }

        let Some(handle) =
            scene.instantiate(&self.config.segment_prefab, position, Quat::IDENTITY, None)
        else {
            warn!(
                "Failed to instantiate segment prefab '{}'; skipping spawn.",
                self.config.segment_prefab
            );
            if sink.wants(SpawnEventKind::Warning) {
                sink.send(SpawnEvent::Warning {
                    context: format!("segment:{index}"),
                    message: format!(
                        "Failed to instantiate segment prefab '{}'",
                        self.config.segment_prefab
                    ),
                });
            }
            return None;
        };
        if !handle.is_valid() {
            warn!(
                "Segment prefab '{}' produced an invalid handle; skipping spawn.",
                self.config.segment_prefab
            );
            if sink.wants(SpawnEventKind::Warning) {
                sink.send(SpawnEvent::Warning {
                    context: format!("segment:{index}"),
                    message: format!(
                        "Segment prefab '{}' produced an invalid handle",
                        self.config.segment_prefab
                    ),
                });
            }
            return None;
        }

        self.next_index += 1;
        let segment = Segment::new(handle, index, position);
        info!("Segment {} spawned at {:?}.", index, position);
        if sink.wants(SpawnEventKind::SegmentSpawned) {
            sink.send(SpawnEvent::SegmentSpawned {
                index,
                handle,
                position,
            });
        }

        let evicted = self.pool.register(segment);
        if let Some(old) = &evicted {
            scene.destroy(old.handle);
            if sink.wants(SpawnEventKind::SegmentEvicted) {
                sink.send(SpawnEvent::SegmentEvicted {
                    index: old.index,
                    handle: old.handle,
                });
            }
        }

        // Prefabs already placed during this spawn.
        let mut consumed: HashSet<PrefabId> = HashSet::new();
        let mut cycle_resets = 0;
        let left = self.populate_side(
            Side::Left,
            &segment,
            scene,
            cycle,
            &mut consumed,
            rng,
            sink,
            &mut cycle_resets,
        );
        let right = self.populate_side(
            Side::Right,
            &segment,
            scene,
            cycle,
            &mut consumed,
            rng,
            sink,
            &mut cycle_resets,
        );

        debug!(
            "Segment {} populated: {} left, {} right.",
            index,
            left.placed.len(),
            right.placed.len()
        );

        Some(SpawnReport {
            segment,
            evicted,
            left,
            right,
            cycle_resets,
        })
    }

    /// Destroys every live segment (and its props), oldest first.
    pub fn clear<I: Instantiator>(&mut self, scene: &mut I) -> Vec<Segment> {
        let drained = self.pool.drain();
        for segment in &drained {
            scene.destroy(segment.handle);
        }
        drained
    }

    #[allow(clippy::too_many_arguments)]
    fn populate_side<S, R>(
        &self,
        side: Side,
        segment: &Segment,
        scene: &mut S,
        cycle: &mut PropCycle,
        consumed: &mut HashSet<PrefabId>,
        rng: &mut R,
        sink: &mut dyn EventSink,
        cycle_resets: &mut usize,
    ) -> SideReport
    where
        S: SceneQuery + Instantiator,
        R: RngCore,
    {
        let mut report = SideReport::new(side);
        let area = self.side_area(segment, side);
        let mut budget = AttemptBudget::new(self.config.validator.attempts_per_side);
        let target = self.config.props_per_side;

        while report.placed.len() < target && budget.try_spend() {
            // Big props only compete while the side is still empty.
            let allow_big = report.placed.is_empty();
            let Some(draw) = cycle.pick(&self.deck, consumed, |e| allow_big || !e.is_big(), rng)
            else {
                break;
            };
            if draw.reset {
                *cycle_resets += 1;
                if sink.wants(SpawnEventKind::CycleReset) {
                    sink.send(SpawnEvent::CycleReset {
                        resets: cycle.resets(),
                    });
                }
            }

            let entry = draw.entry;
            if entry.is_big() {
                let center = area.center + side.outward() * self.config.big_outward_offset;
                let point = Vec2::new(center.x, center.z);
                match self.validator.place_fixed(&area, entry, point, &*scene, None) {
                    Ok(placement) => {
                        if let Some(prop) = self.instantiate_prop(
                            entry, &placement, segment, side, true, scene, cycle, consumed, sink,
                        ) {
                            report.placed.push(prop);
                            report.big = true;
                        }
                    }
                    Err(reason) => {
                        debug!(
                            "Big prop '{}' rejected on {:?} side of segment {}: {}.",
                            entry.id(),
                            side,
                            segment.index,
                            reason
                        );
                    }
                }
                // A big prop claims the side whether or not it fit.
                break;
            }

            let Some(point) = self.validator.sample_point(&area, rng) else {
                warn!(
                    "{:?} area of segment {} is too small to sample; skipping side.",
                    side, segment.index
                );
                break;
            };
            if let Ok(placement) = self.validator.validate(&area, entry, point, &*scene, None) {
                if let Some(prop) = self.instantiate_prop(
                    entry, &placement, segment, side, false, scene, cycle, consumed, sink,
                ) {
                    report.placed.push(prop);
                }
            }
        }

        report.attempts = budget.spent();
        if sink.wants(SpawnEventKind::SideFinished) {
            sink.send(SpawnEvent::SideFinished {
                segment_index: segment.index,
                side,
                placed: report.placed.len(),
                attempts: report.attempts,
            });
        }
        report
    }

    #[allow(clippy::too_many_arguments)]
    fn instantiate_prop<S: Instantiator>(
        &self,
        entry: &PropEntry,
        placement: &ValidPlacement,
        segment: &Segment,
        side: Side,
        big: bool,
        scene: &mut S,
        cycle: &mut PropCycle,
        consumed: &mut HashSet<PrefabId>,
        sink: &mut dyn EventSink,
    ) -> Option<PlacedProp> {
        let Some(handle) = scene.instantiate(
            entry.prefab(),
            placement.position,
            placement.rotation,
            Some(segment.handle),
        ) else {
            warn!(
                "Failed to instantiate prop '{}' (prefab '{}').",
                entry.id(),
                entry.prefab()
            );
            if sink.wants(SpawnEventKind::Warning) {
                sink.send(SpawnEvent::Warning {
                    context: format!("segment:{} prop:{}", segment.index, entry.id()),
                    message: format!("Failed to instantiate prefab '{}'", entry.prefab()),
                });
            }
            return None;
        };

        cycle.mark_used(entry.id());
        consumed.insert(entry.prefab().to_owned());

        if sink.wants(SpawnEventKind::PropPlaced) {
            sink.send(SpawnEvent::PropPlaced {
                segment_index: segment.index,
                side,
                prop_id: entry.id().to_owned(),
                handle,
                position: placement.position,
                big,
            });
        }

        Some(PlacedProp {
            prop_id: entry.id().to_owned(),
            handle,
            position: placement.position,
            rotation: placement.rotation,
        })
    }
}
