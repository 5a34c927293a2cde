//! Ground projection and obstruction checks for candidate prop positions.
use glam::{Quat, Vec2, Vec3};
use rand::Rng as RngCore;

use crate::error::{Error, Result};
use crate::placement::area::PlacementArea;
use crate::prop::PropEntry;
use crate::sampling::{PositionSampling, UniformRandomSampling};
use crate::scene::{LayerMask, ObjectHandle, SceneQuery};

pub const DEFAULT_ATTEMPTS_PER_SIDE: usize = 200;
pub const DEFAULT_GROUND_CLEARANCE: f32 = 0.02;
pub const DEFAULT_EDGE_MARGIN: f32 = 0.25;
pub const DEFAULT_OVERLAP_PADDING: f32 = 0.05;
pub const DEFAULT_MAX_GROUND_DISTANCE: f32 = 10.0;

/// Why a candidate was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("no ground within search distance")]
    NoGround,
    #[error("footprint overlaps an obstruction")]
    Obstructed,
    #[error("footprint leaves the placement area")]
    OutOfBounds,
}

/// An accepted placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidPlacement {
    /// Origin of the placed object; its bottom rests on the ground plus clearance.
    pub position: Vec3,
    pub rotation: Quat,
    /// Ground point under the candidate.
    pub ground_point: Vec3,
    pub ground_normal: Vec3,
}

/// Configuration for [`PlacementValidator`].
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ValidatorConfig {
    /// Layers counted as ground.
    pub ground_mask: LayerMask,
    /// Layers that block placement. Keep ground layers out of this mask.
    pub obstruction_mask: LayerMask,
    /// Length of the downward search from the top of the area.
    pub max_ground_distance: f32,
    /// Gap left between the object's bottom and the ground.
    pub ground_clearance: f32,
    /// Distance a footprint must keep from the area's edges.
    pub edge_margin: f32,
    /// Amount the bounds are grown by for the obstruction test.
    pub overlap_padding: f32,
    /// Candidate attempts allowed per side.
    pub attempts_per_side: usize,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            ground_mask: LayerMask::layer(0),
            obstruction_mask: LayerMask(!1),
            max_ground_distance: DEFAULT_MAX_GROUND_DISTANCE,
            ground_clearance: DEFAULT_GROUND_CLEARANCE,
            edge_margin: DEFAULT_EDGE_MARGIN,
            overlap_padding: DEFAULT_OVERLAP_PADDING,
            attempts_per_side: DEFAULT_ATTEMPTS_PER_SIDE,
        }
    }
}

impl ValidatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_masks(mut self, ground_mask: LayerMask, obstruction_mask: LayerMask) -> Self {
        self.ground_mask = ground_mask;
        self.obstruction_mask = obstruction_mask;
        self
    }

    pub fn with_max_ground_distance(mut self, distance: f32) -> Self {
        self.max_ground_distance = distance;
        self
    }

    pub fn with_ground_clearance(mut self, clearance: f32) -> Self {
        self.ground_clearance = clearance;
        self
    }

    pub fn with_edge_margin(mut self, margin: f32) -> Self {
        self.edge_margin = margin;
        self
    }

    pub fn with_overlap_padding(mut self, padding: f32) -> Self {
        self.overlap_padding = padding;
        self
    }

    pub fn with_attempts_per_side(mut self, attempts: usize) -> Self {
        self.attempts_per_side = attempts;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.max_ground_distance.is_finite() || self.max_ground_distance <= 0.0 {
            return Err(Error::InvalidConfig(
                "max_ground_distance must be > 0".into(),
            ));
        }
        if self.ground_mask.is_empty() {
            return Err(Error::InvalidConfig("ground_mask selects no layer".into()));
        }
        if self.ground_mask.0 & self.obstruction_mask.0 != 0 {
            return Err(Error::InvalidConfig(
                "ground_mask and obstruction_mask must not share layers".into(),
            ));
        }
        if self.edge_margin < 0.0 || self.ground_clearance < 0.0 || self.overlap_padding < 0.0 {
            return Err(Error::InvalidConfig(
                "edge_margin, ground_clearance and overlap_padding must be >= 0".into(),
            ));
        }
        Ok(())
    }
}

/// Candidate attempts left for one side of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptBudget {
    remaining: usize,
    spent: usize,
}

impl AttemptBudget {
    pub fn new(attempts: usize) -> Self {
        Self {
            remaining: attempts,
            spent: 0,
        }
    }

    /// Consumes one attempt; false once the budget is gone.
    pub fn try_spend(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        self.spent += 1;
        true
    }

    pub fn remaining(&self) -> usize {
        self.remaining
    }

    pub fn spent(&self) -> usize {
        self.spent
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }
}

/// Finds resting positions for props inside a [`PlacementArea`].
pub struct PlacementValidator {
    pub config: ValidatorConfig,
    sampling: Box<dyn PositionSampling>,
}

impl PlacementValidator {
    pub fn new(config: ValidatorConfig) -> Self {
        Self {
            config,
            sampling: Box::new(UniformRandomSampling::new()),
        }
    }

    /// Replaces the candidate sampler (uniform by default).
    pub fn with_sampling<S: PositionSampling + 'static>(mut self, sampling: S) -> Self {
        self.sampling = Box::new(sampling);
        self
    }

    /// Checks a single candidate at world X/Z `point`.
    ///
    /// Rejects when no ground is found below the area top, when the padded bounds overlap an
    /// obstruction other than `ignore`, or when the footprint is not strictly inside the area
    /// minus the edge margin.
    pub fn validate(
        &self,
        area: &PlacementArea,
        entry: &PropEntry,
        point: Vec2,
        scene: &dyn SceneQuery,
        ignore: Option<ObjectHandle>,
    ) -> std::result::Result<ValidPlacement, Rejection> {
        let placement = self.rest_on_ground(area, entry, point, scene, ignore)?;

        let (min, max) = entry.world_bounds(placement.position).footprint();
        if !area.contains_footprint(min, max, self.config.edge_margin) {
            return Err(Rejection::OutOfBounds);
        }

        Ok(placement)
    }

    /// Like [`PlacementValidator::validate`] but without the area-bounds check.
    ///
    /// Used for props that are sized to a whole side and placed at a fixed point.
    pub fn place_fixed(
        &self,
        area: &PlacementArea,
        entry: &PropEntry,
        point: Vec2,
        scene: &dyn SceneQuery,
        ignore: Option<ObjectHandle>,
    ) -> std::result::Result<ValidPlacement, Rejection> {
        self.rest_on_ground(area, entry, point, scene, ignore)
    }

    /// Draws a world X/Z candidate inside `area`. `None` when the area is degenerate.
    pub fn sample_point(&self, area: &PlacementArea, rng: &mut dyn RngCore) -> Option<Vec2> {
        self.sampling
            .sample(area.extent.into(), rng)
            .map(|local| area.to_world(Vec2::from(local)))
    }

    /// Samples candidates until one validates or `budget` runs out.
    pub fn find_placement(
        &self,
        area: &PlacementArea,
        entry: &PropEntry,
        scene: &dyn SceneQuery,
        rng: &mut dyn RngCore,
        budget: &mut AttemptBudget,
        ignore: Option<ObjectHandle>,
    ) -> Option<ValidPlacement> {
        while budget.try_spend() {
            let point = self.sample_point(area, rng)?;
            if let Ok(placement) = self.validate(area, entry, point, scene, ignore) {
                return Some(placement);
            }
        }
        None
    }

    fn rest_on_ground(
        &self,
        area: &PlacementArea,
        entry: &PropEntry,
        point: Vec2,
        scene: &dyn SceneQuery,
        ignore: Option<ObjectHandle>,
    ) -> std::result::Result<ValidPlacement, Rejection> {
        let origin = Vec3::new(point.x, area.center.y, point.y);
        let hit = scene
            .raycast(
                origin,
                Vec3::NEG_Y,
                self.config.max_ground_distance,
                self.config.ground_mask,
            )
            .ok_or(Rejection::NoGround)?;

        let rest_y = hit.point.y - entry.local_bottom_y() + self.config.ground_clearance;
        let position = Vec3::new(point.x, rest_y, point.y);

        let padded = entry
            .world_bounds(position)
            .inflated(self.config.overlap_padding);
        if scene.overlap_aabb(&padded, self.config.obstruction_mask, ignore) {
            return Err(Rejection::Obstructed);
        }

        Ok(ValidPlacement {
            position,
            rotation: entry.local_rotation(),
            ground_point: hit.point,
            ground_normal: hit.normal,
        })
    }
}

impl Default for PlacementValidator {
    fn default() -> Self {
        Self::new(ValidatorConfig::default())
    }
}
