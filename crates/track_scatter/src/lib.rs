#![forbid(unsafe_code)]
//! track_scatter: Segment streaming and prop scattering for endless-runner tracks.
//!
//! Modules:
//! - pool: bounded FIFO of live segments; registering past capacity evicts the oldest
//! - selection: weighted prop picks with cycle memory (no repeats until the deck is used up)
//! - placement: ground projection, obstruction and area checks for candidate positions
//! - scene: host-engine collaborator traits plus an in-memory scene
//! - spawner: segment spawning, proximity triggers, events
//!
//! For a walkthrough, see the README and the demos crate.
pub mod error;
pub mod geometry;
pub mod placement;
pub mod pool;
pub mod prop;
pub mod sampling;
pub mod scene;
pub mod selection;
pub mod spawner;

/// Convenient re-exports for common types. Import with `use track_scatter::prelude::*;`.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::geometry::Aabb;
    pub use crate::placement::{
        AttemptBudget, PlacementArea, PlacementValidator, Rejection, ValidPlacement,
        ValidatorConfig,
    };
    pub use crate::pool::{Segment, SegmentPool};
    pub use crate::prop::{PropCategory, PropDeck, PropDef, PropEntry, PropId};
    pub use crate::sampling::{PositionSampling, UniformRandomSampling};
    pub use crate::scene::{
        Instantiator, LayerMask, MemoryScene, ObjectHandle, PrefabId, PrefabShape, RayHit,
        SceneObject, SceneQuery,
    };
    pub use crate::selection::{pick_weighted, pick_weighted_index, PropCycle};
    pub use crate::spawner::{
        EventSink, FnSink, MultiSink, PlacedProp, ProximityTriggers, SegmentSpawner, Side,
        SideReport, SpawnEvent, SpawnEventKind, SpawnReport, SpawnerConfig, TrackDirector,
        TriggerEvent, TriggerRegion, TriggerSource, VecSink,
    };
}
