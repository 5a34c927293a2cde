//! In-memory scene with box colliders and a prefab registry.
use std::collections::HashMap;

use glam::{Quat, Vec3};
use tracing::{debug, warn};

use crate::geometry::Aabb;
use crate::scene::{Instantiator, LayerMask, ObjectHandle, PrefabId, RayHit, SceneQuery};

/// Collision shape registered for a prefab.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrefabShape {
    /// Local bounds of the collider, or `None` for prefabs without collision.
    pub local_bounds: Option<Aabb>,
    /// Collision layer index.
    pub layer: u8,
}

impl PrefabShape {
    pub fn new(local_bounds: Aabb, layer: u8) -> Self {
        Self {
            local_bounds: Some(local_bounds),
            layer,
        }
    }

    /// A prefab that creates an object without a collider.
    pub fn empty() -> Self {
        Self {
            local_bounds: None,
            layer: 0,
        }
    }
}

/// A live object in a [`MemoryScene`].
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub prefab: PrefabId,
    pub position: Vec3,
    pub rotation: Quat,
    pub parent: Option<ObjectHandle>,
    pub children: Vec<ObjectHandle>,
}

#[derive(Debug, Clone)]
struct Collider {
    owner: Option<ObjectHandle>,
    bounds: Aabb,
    layer: u8,
}

/// Scene backed by plain vectors. Queries are linear scans.
#[derive(Debug, Default)]
pub struct MemoryScene {
    prefabs: HashMap<PrefabId, PrefabShape>,
    colliders: Vec<Collider>,
    objects: HashMap<ObjectHandle, SceneObject>,
    next_handle: u64,
}

impl MemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) the collision shape for `prefab`.
    pub fn register_prefab(&mut self, prefab: impl Into<PrefabId>, shape: PrefabShape) {
        self.prefabs.insert(prefab.into(), shape);
    }

    /// Builder variant of [`MemoryScene::register_prefab`].
    pub fn with_prefab(mut self, prefab: impl Into<PrefabId>, shape: PrefabShape) -> Self {
        self.register_prefab(prefab, shape);
        self
    }

    /// Adds a static collider that no object owns (terrain, fixed obstacles).
    pub fn add_static(&mut self, bounds: Aabb, layer: u8) {
        self.colliders.push(Collider {
            owner: None,
            bounds,
            layer,
        });
    }

    pub fn object(&self, handle: ObjectHandle) -> Option<&SceneObject> {
        self.objects.get(&handle)
    }

    pub fn contains(&self, handle: ObjectHandle) -> bool {
        self.objects.contains_key(&handle)
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    /// Live objects instantiated from `prefab`.
    pub fn objects_with_prefab<'a>(
        &'a self,
        prefab: &'a str,
    ) -> impl Iterator<Item = (ObjectHandle, &'a SceneObject)> + 'a {
        self.objects
            .iter()
            .filter(move |(_, o)| o.prefab == prefab)
            .map(|(h, o)| (*h, o))
    }

    fn collect_subtree(&self, root: ObjectHandle, out: &mut Vec<ObjectHandle>) {
        out.push(root);
        if let Some(obj) = self.objects.get(&root) {
            for child in &obj.children {
                self.collect_subtree(*child, out);
            }
        }
    }
}

impl SceneQuery for MemoryScene {
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RayHit> {
        let dir = direction.normalize_or_zero();
        if dir == Vec3::ZERO || max_distance < 0.0 {
            return None;
        }

        self.colliders
            .iter()
            .filter(|c| mask.contains(c.layer))
            .filter_map(|c| {
                ray_aabb(origin, dir, &c.bounds).map(|(t, normal)| RayHit {
                    point: origin + dir * t,
                    normal,
                    distance: t,
                    handle: c.owner,
                })
            })
            .filter(|hit| hit.distance <= max_distance)
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    fn overlap_aabb(&self, bounds: &Aabb, mask: LayerMask, ignore: Option<ObjectHandle>) -> bool {
        self.colliders.iter().any(|c| {
            mask.contains(c.layer)
                && (ignore.is_none() || c.owner != ignore)
                && c.bounds.intersects(bounds)
        })
    }
}

impl Instantiator for MemoryScene {
    fn instantiate(
        &mut self,
        prefab: &str,
        position: Vec3,
        rotation: Quat,
        parent: Option<ObjectHandle>,
    ) -> Option<ObjectHandle> {
        let Some(shape) = self.prefabs.get(prefab).copied() else {
            warn!("Unknown prefab '{}'; nothing instantiated.", prefab);
            return None;
        };

        self.next_handle += 1;
        let handle = ObjectHandle(self.next_handle);

        if let Some(local) = shape.local_bounds {
            self.colliders.push(Collider {
                owner: Some(handle),
                bounds: local.rotated(rotation).translated(position),
                layer: shape.layer,
            });
        }

        let parent = parent.filter(|p| self.objects.contains_key(p));
        if let Some(p) = parent {
            if let Some(parent_obj) = self.objects.get_mut(&p) {
                parent_obj.children.push(handle);
            }
        }

        self.objects.insert(
            handle,
            SceneObject {
                prefab: prefab.to_owned(),
                position,
                rotation,
                parent,
                children: Vec::new(),
            },
        );
        Some(handle)
    }

    fn destroy(&mut self, handle: ObjectHandle) {
        if !self.objects.contains_key(&handle) {
            return;
        }

        let mut doomed = Vec::new();
        self.collect_subtree(handle, &mut doomed);

        if let Some(parent) = self.objects.get(&handle).and_then(|o| o.parent) {
            if let Some(parent_obj) = self.objects.get_mut(&parent) {
                parent_obj.children.retain(|c| *c != handle);
            }
        }

        self.colliders
            .retain(|c| !c.owner.is_some_and(|owner| doomed.contains(&owner)));
        for h in &doomed {
            self.objects.remove(h);
        }
        debug!("Destroyed {:?} ({} objects).", handle, doomed.len());
    }
}

/// Slab test. Returns the entry distance and the normal of the entered face.
fn ray_aabb(origin: Vec3, dir: Vec3, bounds: &Aabb) -> Option<(f32, Vec3)> {
    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;
    let mut normal = -dir;

    for axis in 0..3 {
        let o = origin[axis];
        let d = dir[axis];
        let (lo, hi) = (bounds.min[axis], bounds.max[axis]);

        if d.abs() < f32::EPSILON {
            if o < lo || o > hi {
                return None;
            }
            continue;
        }

        let inv = 1.0 / d;
        let (mut t0, mut t1) = ((lo - o) * inv, (hi - o) * inv);
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        if t0 > t_enter {
            t_enter = t0;
            let mut n = Vec3::ZERO;
            n[axis] = -d.signum();
            normal = n;
        }
        t_exit = t_exit.min(t1);
        if t_enter > t_exit {
            return None;
        }
    }

    if t_exit < 0.0 {
        return None;
    }
    if t_enter < 0.0 {
        // Origin inside the box.
        return Some((0.0, -dir));
    }
    Some((t_enter, normal))
}
