//! Segment spawning: configuration, proximity triggers, event reporting, and the
//! [`SegmentSpawner`] / [`TrackDirector`] that tie the pool, prop cycle and placement
//! validator together.
pub mod config;
pub mod director;
pub mod events;
pub mod runner;
pub mod trigger;

pub use config::{Side, SpawnerConfig};
pub use director::{trigger_name, TrackDirector};
pub use events::{EventSink, FnSink, MultiSink, SpawnEvent, SpawnEventKind, VecSink};
pub use runner::{PlacedProp, SegmentSpawner, SideReport, SpawnReport};
pub use trigger::{ProximityTriggers, TriggerEvent, TriggerRegion, TriggerSource};
