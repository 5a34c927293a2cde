//! Proximity triggers that drive spawning.
use glam::Vec3;
use tracing::debug;

use crate::geometry::Aabb;

/// A named region that fires when the tracked entity enters it.
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerRegion {
    pub name: String,
    pub bounds: Aabb,
}

impl TriggerRegion {
    pub fn new(name: impl Into<String>, bounds: Aabb) -> Self {
        Self {
            name: name.into(),
            bounds,
        }
    }
}

/// Fired when the tracked entity enters a region.
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerEvent {
    /// Name of the region entered.
    pub region: String,
    /// Tracked position at the time of entry.
    pub position: Vec3,
}

/// Source of trigger events. Engines map this onto their own overlap callbacks.
pub trait TriggerSource {
    /// Adds a region, replacing any region with the same name.
    fn arm(&mut self, region: TriggerRegion);

    /// Removes the region called `name`, if armed.
    fn disarm(&mut self, name: &str);

    /// Reports regions entered by `tracked` since the last poll.
    fn poll(&mut self, tracked: Vec3) -> Vec<TriggerEvent>;
}

/// One-shot box triggers checked against a single tracked point.
///
/// A region fires the first time the point is inside it and is then retired.
#[derive(Debug, Clone, Default)]
pub struct ProximityTriggers {
    regions: Vec<TriggerRegion>,
}

impl ProximityTriggers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn is_armed(&self, name: &str) -> bool {
        self.regions.iter().any(|r| r.name == name)
    }

    pub fn clear(&mut self) {
        self.regions.clear();
    }
}

impl TriggerSource for ProximityTriggers {
    fn arm(&mut self, region: TriggerRegion) {
        self.disarm(&region.name);
        self.regions.push(region);
    }

    fn disarm(&mut self, name: &str) {
        self.regions.retain(|r| r.name != name);
    }

    fn poll(&mut self, tracked: Vec3) -> Vec<TriggerEvent> {
        let mut fired = Vec::new();
        self.regions.retain(|r| {
            if r.bounds.contains_point(tracked) {
                debug!("Trigger '{}' entered at {:?}.", r.name, tracked);
                fired.push(TriggerEvent {
                    region: r.name.clone(),
                    position: tracked,
                });
                false
            } else {
                true
            }
        });
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate(name: &str, z: f32) -> TriggerRegion {
        TriggerRegion::new(
            name,
            Aabb::from_center_size(Vec3::new(0.0, 0.0, z), Vec3::new(10.0, 10.0, 2.0)),
        )
    }

    #[test]
    fn fires_once_in_arming_order() {
        let mut triggers = ProximityTriggers::new();
        triggers.arm(gate("a", 10.0));
        triggers.arm(gate("b", 10.5));
        triggers.arm(gate("c", 40.0));

        assert!(triggers.poll(Vec3::new(0.0, 0.0, 5.0)).is_empty());
        let fired: Vec<_> = triggers
            .poll(Vec3::new(0.0, 0.0, 10.2))
            .into_iter()
            .map(|e| e.region)
            .collect();
        assert_eq!(fired, vec!["a", "b"]);
        assert!(triggers.poll(Vec3::new(0.0, 0.0, 10.2)).is_empty());
        assert_eq!(triggers.len(), 1);
    }

    #[test]
    fn arming_same_name_replaces() {
        let mut triggers = ProximityTriggers::new();
        triggers.arm(gate("a", 10.0));
        triggers.arm(gate("a", 50.0));
        assert_eq!(triggers.len(), 1);
        assert!(triggers.poll(Vec3::new(0.0, 0.0, 10.0)).is_empty());
        assert_eq!(triggers.poll(Vec3::new(0.0, 0.0, 50.0)).len(), 1);
    }

    #[test]
    fn disarmed_region_never_fires() {
        let mut triggers = ProximityTriggers::new();
        triggers.arm(gate("a", 0.0));
        triggers.disarm("a");
        assert!(!triggers.is_armed("a"));
        assert!(triggers.poll(Vec3::ZERO).is_empty());
    }
}
