//! Prop entries and the deck they are drawn from.
use std::collections::HashSet;

use glam::{Quat, Vec3};
use tracing::warn;

use crate::error::{Error, Result};
use crate::geometry::Aabb;
use crate::scene::PrefabId;

pub type PropId = String;

/// How much of a side a prop occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PropCategory {
    /// Shares a side with other small props.
    #[default]
    Small,
    /// Fills a whole side in one placement.
    Big,
}

/// A placeable prop with cached local geometry.
///
/// Entries are immutable after construction. Weights that are not strictly positive are
/// stored as `1.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct PropEntry {
    id: PropId,
    prefab: PrefabId,
    weight: f32,
    category: PropCategory,
    local_bounds: Aabb,
    local_bottom_y: f32,
    local_rotation: Quat,
}

impl PropEntry {
    pub fn new(id: impl Into<PropId>, prefab: impl Into<PrefabId>, local_bounds: Aabb) -> Self {
        Self {
            id: id.into(),
            prefab: prefab.into(),
            weight: 1.0,
            category: PropCategory::Small,
            local_bottom_y: local_bounds.min.y,
            local_bounds,
            local_rotation: Quat::IDENTITY,
        }
    }

    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = normalize_weight(weight);
        self
    }

    pub fn with_category(mut self, category: PropCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.local_rotation = rotation.normalize();
        self
    }

    /// Overrides the bottom height, which otherwise follows `local_bounds.min.y`.
    pub fn with_bottom_y(mut self, bottom_y: f32) -> Self {
        self.local_bottom_y = bottom_y;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn prefab(&self) -> &str {
        &self.prefab
    }

    pub fn weight(&self) -> f32 {
        self.weight
    }

    pub fn category(&self) -> PropCategory {
        self.category
    }

    pub fn is_big(&self) -> bool {
        self.category == PropCategory::Big
    }

    pub fn local_bounds(&self) -> Aabb {
        self.local_bounds
    }

    pub fn local_bottom_y(&self) -> f32 {
        self.local_bottom_y
    }

    pub fn local_rotation(&self) -> Quat {
        self.local_rotation
    }

    /// World-space bounds when the entry's origin is placed at `position`.
    pub fn world_bounds(&self, position: Vec3) -> Aabb {
        self.local_bounds
            .rotated(self.local_rotation)
            .translated(position)
    }
}

fn normalize_weight(weight: f32) -> f32 {
    if weight.is_finite() && weight > 0.0 {
        weight
    } else {
        1.0
    }
}

/// Serializable description of a [`PropEntry`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PropDef {
    pub id: PropId,
    pub prefab: PrefabId,
    #[cfg_attr(feature = "serde", serde(default = "default_weight"))]
    pub weight: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub category: PropCategory,
    pub bounds: Aabb,
    /// Yaw in degrees applied to the prop.
    #[cfg_attr(feature = "serde", serde(default))]
    pub yaw_degrees: f32,
}

#[cfg(feature = "serde")]
fn default_weight() -> f32 {
    1.0
}

impl From<&PropDef> for PropEntry {
    fn from(def: &PropDef) -> Self {
        PropEntry::new(def.id.clone(), def.prefab.clone(), def.bounds)
            .with_weight(def.weight)
            .with_category(def.category)
            .with_rotation(Quat::from_rotation_y(def.yaw_degrees.to_radians()))
    }
}

/// Ordered set of prop entries with unique ids and non-empty prefabs.
#[derive(Debug, Clone, Default)]
pub struct PropDeck {
    entries: Vec<PropEntry>,
}

impl PropDeck {
    /// Builds a deck, skipping entries with an empty prefab or a repeated id.
    pub fn new(entries: impl IntoIterator<Item = PropEntry>) -> Self {
        let mut seen = HashSet::new();
        let mut kept = Vec::new();
        for entry in entries {
            if entry.prefab.is_empty() {
                warn!("Prop '{}' has no prefab; skipping.", entry.id);
                continue;
            }
            if !seen.insert(entry.id.clone()) {
                warn!("Prop '{}' appears more than once; keeping the first.", entry.id);
                continue;
            }
            kept.push(entry);
        }
        Self { entries: kept }
    }

    /// Strict variant of [`PropDeck::new`] that reports the first bad entry.
    pub fn try_new(entries: impl IntoIterator<Item = PropEntry>) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut kept = Vec::new();
        for entry in entries {
            if entry.prefab.is_empty() {
                return Err(Error::MissingPrefab { id: entry.id });
            }
            if !seen.insert(entry.id.clone()) {
                return Err(Error::DuplicateProp { id: entry.id });
            }
            kept.push(entry);
        }
        Ok(Self { entries: kept })
    }

    pub fn from_defs(defs: &[PropDef]) -> Self {
        Self::new(defs.iter().map(PropEntry::from))
    }

    pub fn entries(&self) -> &[PropEntry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&PropEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PropEntry> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    fn unit_box() -> Aabb {
        Aabb::new(Vec3::new(-0.5, 0.0, -0.5), Vec3::new(0.5, 1.0, 0.5))
    }

    #[test]
    fn non_positive_weights_become_one() {
        assert_eq!(PropEntry::new("a", "a", unit_box()).with_weight(0.0).weight(), 1.0);
        assert_eq!(PropEntry::new("a", "a", unit_box()).with_weight(-3.0).weight(), 1.0);
        assert_eq!(
            PropEntry::new("a", "a", unit_box()).with_weight(f32::NAN).weight(),
            1.0
        );
        assert_eq!(PropEntry::new("a", "a", unit_box()).with_weight(2.5).weight(), 2.5);
    }

    #[test]
    fn bottom_defaults_to_bounds_min() {
        let e = PropEntry::new(
            "a",
            "a",
            Aabb::new(Vec3::new(0.0, -0.25, 0.0), Vec3::ONE),
        );
        assert_eq!(e.local_bottom_y(), -0.25);
        assert_eq!(e.with_bottom_y(0.1).local_bottom_y(), 0.1);
    }

    #[test]
    fn world_bounds_apply_rotation_then_offset() {
        let e = PropEntry::new(
            "log",
            "log",
            Aabb::new(Vec3::new(-2.0, 0.0, -0.5), Vec3::new(2.0, 1.0, 0.5)),
        )
        .with_rotation(Quat::from_rotation_y(FRAC_PI_2));
        let b = e.world_bounds(Vec3::new(10.0, 0.0, 0.0));
        assert!((b.min.x - 9.5).abs() < 1e-4);
        assert!((b.max.z - 2.0).abs() < 1e-4);
    }

    #[test]
    fn deck_skips_bad_entries() {
        let deck = PropDeck::new(vec![
            PropEntry::new("a", "rock", unit_box()),
            PropEntry::new("b", "", unit_box()),
            PropEntry::new("a", "tree", unit_box()),
            PropEntry::new("c", "tree", unit_box()),
        ]);
        let ids: Vec<_> = deck.iter().map(|e| e.id()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(deck.get("a").unwrap().prefab(), "rock");
    }

    #[test]
    fn strict_deck_reports_first_problem() {
        let err = PropDeck::try_new(vec![
            PropEntry::new("a", "rock", unit_box()),
            PropEntry::new("a", "rock", unit_box()),
        ])
        .unwrap_err();
        assert!(matches!(err, Error::DuplicateProp { ref id } if id == "a"));

        let err = PropDeck::try_new(vec![PropEntry::new("b", "", unit_box())]).unwrap_err();
        assert!(matches!(err, Error::MissingPrefab { ref id } if id == "b"));
    }

    #[test]
    fn def_converts_yaw_and_category() {
        let def = PropDef {
            id: "barn".into(),
            prefab: "barn".into(),
            weight: 0.0,
            category: PropCategory::Big,
            bounds: unit_box(),
            yaw_degrees: 90.0,
        };
        let entry = PropEntry::from(&def);
        assert!(entry.is_big());
        assert_eq!(entry.weight(), 1.0);
        let expected = Quat::from_rotation_y(FRAC_PI_2);
        assert!(entry.local_rotation().abs_diff_eq(expected, 1e-5));
    }
}
