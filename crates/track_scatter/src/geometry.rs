//! Axis-aligned bounds used for footprints and overlap tests.
use glam::{Quat, Vec2, Vec3};

/// Axis-aligned bounding box in 3D.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Creates bounds from two corners, sorting components so `min <= max`.
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Creates bounds around `center` with full size `size`.
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size.abs() * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Bounds shifted by `offset`.
    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Bounds grown by `amount` on every side. Negative amounts shrink, never past the center.
    pub fn inflated(&self, amount: f32) -> Self {
        let center = self.center();
        let half = (self.size() * 0.5 + Vec3::splat(amount)).max(Vec3::ZERO);
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Smallest axis-aligned box enclosing these bounds after rotation about the origin.
    pub fn rotated(&self, rotation: Quat) -> Self {
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for i in 0..8 {
            let corner = Vec3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            );
            let p = rotation * corner;
            min = min.min(p);
            max = max.max(p);
        }
        Self { min, max }
    }

    /// Overlap test with open intervals: boxes that only touch do not intersect.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }

    pub fn contains_point(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// Horizontal (X/Z) extent as `(min, max)`.
    pub fn footprint(&self) -> (Vec2, Vec2) {
        (
            Vec2::new(self.min.x, self.min.z),
            Vec2::new(self.max.x, self.max.z),
        )
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::from_center_size(Vec3::ZERO, Vec3::ONE)
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    #[test]
    fn new_sorts_corners() {
        let b = Aabb::new(Vec3::new(1.0, -1.0, 2.0), Vec3::new(-1.0, 1.0, 0.0));
        assert_eq!(b.min, Vec3::new(-1.0, -1.0, 0.0));
        assert_eq!(b.max, Vec3::new(1.0, 1.0, 2.0));
    }

    #[test]
    fn touching_boxes_do_not_intersect() {
        let a = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let b = a.translated(Vec3::X);
        assert!(!a.intersects(&b));
        assert!(a.inflated(0.01).intersects(&b));
    }

    #[test]
    fn quarter_turn_swaps_horizontal_extents() {
        let b = Aabb::from_center_size(Vec3::ZERO, Vec3::new(4.0, 1.0, 2.0));
        let r = b.rotated(Quat::from_rotation_y(FRAC_PI_2));
        let size = r.size();
        assert!((size.x - 2.0).abs() < 1e-4);
        assert!((size.z - 4.0).abs() < 1e-4);
    }

    #[test]
    fn negative_inflation_stops_at_center() {
        let b = Aabb::from_center_size(Vec3::ZERO, Vec3::splat(2.0));
        let shrunk = b.inflated(-5.0);
        assert_eq!(shrunk.size(), Vec3::ZERO);
    }

    #[test]
    fn footprint_drops_height() {
        let b = Aabb::new(Vec3::new(-1.0, 3.0, -2.0), Vec3::new(1.0, 5.0, 2.0));
        assert_eq!(b.footprint(), (Vec2::new(-1.0, -2.0), Vec2::new(1.0, 2.0)));
    }
}
