//! Spawner configuration.
use glam::{Vec2, Vec3};

use crate::error::{Error, Result};
use crate::placement::{PlacementArea, ValidatorConfig};
use crate::scene::PrefabId;

/// One of the two prop strips along a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    /// Unit vector pointing away from the track (the track runs along +Z).
    pub fn outward(self) -> Vec3 {
        match self {
            Side::Left => Vec3::NEG_X,
            Side::Right => Vec3::X,
        }
    }
}

/// Configuration for [`crate::spawner::SegmentSpawner`].
///
/// Segments are laid out along +Z starting at `origin`, `segment_length` apart. Prop areas are
/// given relative to each segment's origin.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpawnerConfig {
    /// Prefab instantiated for every segment.
    pub segment_prefab: PrefabId,
    /// Maximum number of live segments.
    pub max_segments: usize,
    /// Distance between consecutive segment origins.
    pub segment_length: f32,
    /// Origin of the first segment.
    pub origin: Vec3,
    /// Props targeted per side.
    pub props_per_side: usize,
    /// Left prop area, relative to the segment origin.
    pub left_area: PlacementArea,
    /// Right prop area, relative to the segment origin.
    pub right_area: PlacementArea,
    /// How far a big prop is pushed outward from its area's center.
    pub big_outward_offset: f32,
    /// Distance along the segment at which its trigger region sits.
    pub trigger_offset: f32,
    /// Size of each trigger region.
    pub trigger_size: Vec3,
    /// Placement validation settings.
    pub validator: ValidatorConfig,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            segment_prefab: "segment".into(),
            max_segments: 5,
            segment_length: 30.0,
            origin: Vec3::ZERO,
            props_per_side: 4,
            left_area: PlacementArea::new(Vec3::new(-9.0, 5.0, 15.0), Vec2::new(8.0, 28.0)),
            right_area: PlacementArea::new(Vec3::new(9.0, 5.0, 15.0), Vec2::new(8.0, 28.0)),
            big_outward_offset: 1.5,
            trigger_offset: 0.0,
            trigger_size: Vec3::new(30.0, 10.0, 2.0),
            validator: ValidatorConfig::default(),
        }
    }
}

impl SpawnerConfig {
    pub fn new(segment_prefab: impl Into<PrefabId>) -> Self {
        Self {
            segment_prefab: segment_prefab.into(),
            ..Default::default()
        }
    }

    pub fn with_max_segments(mut self, max_segments: usize) -> Self {
        self.max_segments = max_segments;
        self
    }

    pub fn with_segment_length(mut self, segment_length: f32) -> Self {
        self.segment_length = segment_length;
        self
    }

    pub fn with_origin(mut self, origin: Vec3) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_props_per_side(mut self, props_per_side: usize) -> Self {
        self.props_per_side = props_per_side;
        self
    }

    /// Sets both side areas, relative to the segment origin.
    pub fn with_areas(mut self, left: PlacementArea, right: PlacementArea) -> Self {
        self.left_area = left;
        self.right_area = right;
        self
    }

    pub fn with_big_outward_offset(mut self, offset: f32) -> Self {
        self.big_outward_offset = offset;
        self
    }

    pub fn with_trigger(mut self, offset: f32, size: Vec3) -> Self {
        self.trigger_offset = offset;
        self.trigger_size = size;
        self
    }

    pub fn with_validator(mut self, validator: ValidatorConfig) -> Self {
        self.validator = validator;
        self
    }

    /// Segment-local area for `side`.
    pub fn area(&self, side: Side) -> &PlacementArea {
        match side {
            Side::Left => &self.left_area,
            Side::Right => &self.right_area,
        }
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.segment_prefab.is_empty() {
            return Err(Error::MissingPrefab {
                id: "segment".into(),
            });
        }
        if self.max_segments == 0 {
            return Err(Error::InvalidConfig("max_segments must be > 0".into()));
        }
        if !self.segment_length.is_finite() || self.segment_length <= 0.0 {
            return Err(Error::InvalidConfig("segment_length must be > 0".into()));
        }
        for side in Side::BOTH {
            let extent = self.area(side).extent;
            if extent.x <= 0.0 || extent.y <= 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "{side:?} area extent must be > 0 in both components"
                )));
            }
        }
        self.validator.validate()
    }
}
