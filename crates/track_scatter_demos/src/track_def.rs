use std::fs;
use std::path::Path;

use anyhow::Context;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use track_scatter::prelude::*;

/// Static box placed in the demo scene, e.g. a rock outcrop that props must avoid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleDef {
    pub bounds: Aabb,
    #[serde(default = "default_obstacle_layer")]
    pub layer: u8,
}

fn default_obstacle_layer() -> u8 {
    1
}

/// A track definition loaded from RON: spawner settings, prop deck and scene dressing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackDef {
    #[serde(default)]
    pub spawner: SpawnerConfig,
    pub props: Vec<PropDef>,
    /// Ground slab all segments rest on.
    pub ground: Aabb,
    #[serde(default)]
    pub ground_layer: u8,
    /// Layer assigned to instantiated props.
    #[serde(default = "default_obstacle_layer")]
    pub prop_layer: u8,
    #[serde(default)]
    pub obstacles: Vec<ObstacleDef>,
    /// Segments spawned before the run starts.
    #[serde(default = "default_prewarm")]
    pub prewarm: usize,
}

fn default_prewarm() -> usize {
    3
}

impl TrackDef {
    pub fn from_ron_str(text: &str) -> anyhow::Result<Self> {
        let def: TrackDef = ron::from_str(text).context("parsing track definition")?;
        def.spawner.validate()?;
        Ok(def)
    }

    /// Strict deck: empty prefabs and duplicate ids are errors here.
    pub fn deck(&self) -> anyhow::Result<PropDeck> {
        Ok(PropDeck::try_new(self.props.iter().map(PropEntry::from))?)
    }

    /// Builds an in-memory scene with the ground, obstacles and a shape for every prefab.
    pub fn build_scene(&self, deck: &PropDeck) -> MemoryScene {
        let mut scene = MemoryScene::new()
            .with_prefab(self.spawner.segment_prefab.clone(), PrefabShape::empty());
        scene.add_static(self.ground, self.ground_layer);
        for obstacle in &self.obstacles {
            scene.add_static(obstacle.bounds, obstacle.layer);
        }
        for entry in deck.iter() {
            scene.register_prefab(
                entry.prefab(),
                PrefabShape::new(entry.local_bounds(), self.prop_layer),
            );
        }
        scene
    }

    /// Center of the trigger region of segment `index`.
    pub fn trigger_point(&self, index: u64) -> Vec3 {
        let cfg = &self.spawner;
        cfg.origin + Vec3::Z * (cfg.segment_length * index as f32 + cfg.trigger_offset)
    }
}

pub fn load_track_def(path: impl AsRef<Path>) -> anyhow::Result<TrackDef> {
    let path = path.as_ref();
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    TrackDef::from_ron_str(&text).with_context(|| format!("loading {}", path.display()))
}
