//! Boundary to the host scene: spatial queries and object instantiation.
//!
//! The spawning core never talks to an engine directly. It asks a [`SceneQuery`] for ground hits
//! and overlaps, and an [`Instantiator`] for live objects. [`MemoryScene`] implements both
//! in memory for tests, benches and headless runs.
use glam::{Quat, Vec3};

use crate::geometry::Aabb;

pub mod memory;

pub use memory::{MemoryScene, PrefabShape, SceneObject};

/// Identifier of a prefab known to the [`Instantiator`].
pub type PrefabId = String;

/// Handle to a live object created by an [`Instantiator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectHandle(pub u64);

impl ObjectHandle {
    /// The null handle. Never returned by a well-behaved instantiator.
    pub const INVALID: ObjectHandle = ObjectHandle(0);

    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

/// Bit set of collision layers (32 layers, indices 0..=31).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: LayerMask = LayerMask(0);
    pub const ALL: LayerMask = LayerMask(u32::MAX);

    /// Mask containing the single layer `index`. Indices above 31 yield an empty mask.
    pub fn layer(index: u8) -> Self {
        if index < 32 {
            LayerMask(1 << index)
        } else {
            LayerMask::NONE
        }
    }

    pub fn contains(self, index: u8) -> bool {
        index < 32 && self.0 & (1 << index) != 0
    }

    pub fn union(self, other: LayerMask) -> Self {
        LayerMask(self.0 | other.0)
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        LayerMask::ALL
    }
}

/// Result of a ray query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// World-space hit point.
    pub point: Vec3,
    /// Surface normal at the hit point.
    pub normal: Vec3,
    /// Distance from the ray origin.
    pub distance: f32,
    /// Object that owns the hit collider, if it was instantiated.
    pub handle: Option<ObjectHandle>,
}

/// Spatial queries against the scene.
pub trait SceneQuery {
    /// Casts a ray and returns the nearest hit on a collider in `mask` within `max_distance`.
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RayHit>;

    /// Returns true when `bounds` overlaps any collider in `mask` not owned by `ignore`.
    fn overlap_aabb(&self, bounds: &Aabb, mask: LayerMask, ignore: Option<ObjectHandle>) -> bool;
}

/// Creates and destroys live objects.
pub trait Instantiator {
    /// Instantiates `prefab`. Returns `None` when the prefab is unknown.
    fn instantiate(
        &mut self,
        prefab: &str,
        position: Vec3,
        rotation: Quat,
        parent: Option<ObjectHandle>,
    ) -> Option<ObjectHandle>;

    /// Destroys `handle` and everything parented to it. Unknown handles are ignored.
    fn destroy(&mut self, handle: ObjectHandle);
}
