//! Rectangular placement areas on the ground plane.
use glam::{Vec2, Vec3};

/// Axis-aligned X/Z rectangle constraining candidate points.
///
/// `center.y` is the height the downward ground search starts from.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlacementArea {
    pub center: Vec3,
    /// Full size along X (`extent.x`) and Z (`extent.y`).
    pub extent: Vec2,
}

impl PlacementArea {
    pub fn new(center: Vec3, extent: Vec2) -> Self {
        Self {
            center,
            extent: extent.abs(),
        }
    }

    pub fn min_xz(&self) -> Vec2 {
        Vec2::new(self.center.x, self.center.z) - self.extent * 0.5
    }

    pub fn max_xz(&self) -> Vec2 {
        Vec2::new(self.center.x, self.center.z) + self.extent * 0.5
    }

    /// Area moved by `offset`.
    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            center: self.center + offset,
            extent: self.extent,
        }
    }

    /// Converts an area-local point (centered on the origin) to world X/Z.
    pub fn to_world(&self, local: Vec2) -> Vec2 {
        Vec2::new(self.center.x, self.center.z) + local
    }

    /// True when the footprint lies strictly inside the area shrunk by `margin` on every edge.
    ///
    /// A footprint touching the shrunk boundary is outside.
    pub fn contains_footprint(&self, min: Vec2, max: Vec2, margin: f32) -> bool {
        let inner_min = self.min_xz() + Vec2::splat(margin);
        let inner_max = self.max_xz() - Vec2::splat(margin);
        min.x > inner_min.x && min.y > inner_min.y && max.x < inner_max.x && max.y < inner_max.y
    }
}
