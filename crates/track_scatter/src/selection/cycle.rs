//! Cycle memory: props are drawn without replacement until the deck runs dry.
use std::collections::HashSet;

use rand::Rng as RngCore;
use tracing::debug;

use crate::prop::{PropDeck, PropEntry, PropId};
use crate::scene::PrefabId;
use crate::selection::weighted::pick_weighted;

/// Entries eligible for the next draw.
#[derive(Debug)]
pub struct Candidates<'a> {
    pub entries: Vec<&'a PropEntry>,
    /// True when the cycle was reset to produce these candidates.
    pub reset: bool,
}

/// Result of a cycle-aware draw.
#[derive(Debug, Clone, Copy)]
pub struct CycleDraw<'a> {
    pub entry: &'a PropEntry,
    pub reset: bool,
}

/// Set of props consumed in the current cycle.
///
/// The set survives across spawns. It is cleared only when every entry outside the current
/// prefab exclusions has been consumed, at which point the whole deck becomes available
/// again. Callers hold one cycle for the lifetime of a track and lend it out by `&mut`.
#[derive(Debug, Clone, Default)]
pub struct PropCycle {
    used: HashSet<PropId>,
    resets: u64,
}

impl PropCycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_used(&self, id: &str) -> bool {
        self.used.contains(id)
    }

    pub fn used_count(&self) -> usize {
        self.used.len()
    }

    /// Number of times the cycle has wrapped around.
    pub fn resets(&self) -> u64 {
        self.resets
    }

    /// Records `id` as consumed in this cycle.
    pub fn mark_used(&mut self, id: impl Into<PropId>) {
        self.used.insert(id.into());
    }

    pub fn reset(&mut self) {
        self.used.clear();
        self.resets += 1;
    }

    /// Entries of `deck` passing `filter` that are unused and whose prefab is not in
    /// `excluded_prefabs`.
    ///
    /// Exhaustion is judged on the whole deck minus the excluded prefabs, regardless of
    /// `filter`: while any such entry is unused, the cycle holds and only the unused entries
    /// passing `filter` are returned (possibly none). Once every one of them is used, the cycle
    /// is reset and the filtered, non-excluded entries are returned instead. When the excluded
    /// prefabs cover the whole deck nothing is returned and the cycle is left alone.
    pub fn candidates<'a>(
        &mut self,
        deck: &'a PropDeck,
        excluded_prefabs: &HashSet<PrefabId>,
        filter: impl Fn(&PropEntry) -> bool,
    ) -> Candidates<'a> {
        let allowed: Vec<&'a PropEntry> = deck
            .iter()
            .filter(|e| !excluded_prefabs.contains(e.prefab()))
            .collect();

        let exhausted = allowed.iter().all(|e| self.used.contains(e.id()));
        if !exhausted || allowed.is_empty() {
            let entries = allowed
                .into_iter()
                .filter(|e| !self.used.contains(e.id()) && filter(*e))
                .collect();
            return Candidates {
                entries,
                reset: false,
            };
        }

        debug!(
            "Prop cycle exhausted after {} entries; starting a new cycle.",
            self.used.len()
        );
        self.reset();
        Candidates {
            entries: allowed.into_iter().filter(|e| filter(*e)).collect(),
            reset: true,
        }
    }

    /// Draws a weighted entry from [`PropCycle::candidates`]. Does not mark it used.
    pub fn pick<'a>(
        &mut self,
        deck: &'a PropDeck,
        excluded_prefabs: &HashSet<PrefabId>,
        filter: impl Fn(&PropEntry) -> bool,
        rng: &mut dyn RngCore,
    ) -> Option<CycleDraw<'a>> {
        let candidates = self.candidates(deck, excluded_prefabs, filter);
        pick_weighted(&candidates.entries, rng).map(|entry| CycleDraw {
            entry,
            reset: candidates.reset,
        })
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::geometry::Aabb;
    use crate::prop::PropCategory;

    fn deck(weights: &[(&str, f32)]) -> PropDeck {
        PropDeck::new(weights.iter().map(|(id, w)| {
            PropEntry::new(*id, *id, Aabb::new(Vec3::ZERO, Vec3::ONE)).with_weight(*w)
        }))
    }

    fn any(_: &PropEntry) -> bool {
        true
    }

    #[test]
    fn no_repeats_until_deck_is_exhausted() {
        let deck = deck(&[("a", 1.0), ("b", 5.0), ("c", 2.0), ("d", 0.5)]);
        let mut cycle = PropCycle::new();
        let mut rng = StdRng::seed_from_u64(9);
        let none = HashSet::new();

        for round in 0..5 {
            let mut seen = HashSet::new();
            for i in 0..deck.len() {
                let draw = cycle.pick(&deck, &none, any, &mut rng).unwrap();
                assert_eq!(draw.reset, round > 0 && i == 0);
                assert!(seen.insert(draw.entry.id().to_owned()), "repeat in cycle");
                cycle.mark_used(draw.entry.id());
            }
            assert_eq!(cycle.used_count(), deck.len());
        }
        assert_eq!(cycle.resets(), 4);
    }

    #[test]
    fn first_two_picks_are_distinct() {
        let deck = deck(&[("a", 1.0), ("b", 3.0)]);
        let none = HashSet::new();
        for seed in 0..64 {
            let mut cycle = PropCycle::new();
            let mut rng = StdRng::seed_from_u64(seed);
            let first = cycle.pick(&deck, &none, any, &mut rng).unwrap().entry.id().to_owned();
            cycle.mark_used(first.clone());
            let second = cycle.pick(&deck, &none, any, &mut rng).unwrap().entry.id().to_owned();
            assert_ne!(first, second);
        }
    }

    #[test]
    fn excluded_prefabs_do_not_hold_the_cycle_open() {
        let deck = deck(&[("a", 1.0), ("b", 1.0)]);
        let mut cycle = PropCycle::new();
        cycle.mark_used("a");
        let excluded: HashSet<PrefabId> = ["b".to_owned()].into_iter().collect();

        let candidates = cycle.candidates(&deck, &excluded, any);
        assert!(candidates.reset);
        let ids: Vec<_> = candidates.entries.iter().map(|e| e.id()).collect();
        assert_eq!(ids, vec!["a"]);
        assert_eq!(cycle.used_count(), 0);
    }

    #[test]
    fn fully_excluded_deck_yields_nothing_without_reset() {
        let deck = deck(&[("a", 1.0), ("b", 1.0)]);
        let mut cycle = PropCycle::new();
        cycle.mark_used("a");
        let excluded: HashSet<PrefabId> = ["a".to_owned(), "b".to_owned()].into_iter().collect();

        let candidates = cycle.candidates(&deck, &excluded, any);
        assert!(candidates.entries.is_empty());
        assert!(!candidates.reset);
        assert!(cycle.is_used("a"));
    }

    #[test]
    fn filtered_out_unused_entry_keeps_cycle_open() {
        let mut entries: Vec<PropEntry> = ["a", "b", "c"]
            .into_iter()
            .map(|id| PropEntry::new(id, id, Aabb::default()))
            .collect();
        entries.push(PropEntry::new("x", "x", Aabb::default()).with_category(PropCategory::Big));
        let deck = PropDeck::new(entries);
        let mut cycle = PropCycle::new();
        for id in ["a", "b", "c"] {
            cycle.mark_used(id);
        }
        let excluded: HashSet<PrefabId> = ["a".to_owned()].into_iter().collect();

        let candidates = cycle.candidates(&deck, &excluded, |e| !e.is_big());
        assert!(candidates.entries.is_empty());
        assert!(!candidates.reset);
        assert_eq!(cycle.used_count(), 3);

        // Once the big entry is used too, the cycle wraps.
        cycle.mark_used("x");
        let candidates = cycle.candidates(&deck, &excluded, |e| !e.is_big());
        assert!(candidates.reset);
        let ids: Vec<_> = candidates.entries.iter().map(|e| e.id()).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn exclusion_matches_shared_prefabs() {
        let deck = PropDeck::new(vec![
            PropEntry::new("rock_a", "rock", Aabb::default()),
            PropEntry::new("rock_b", "rock", Aabb::default()),
            PropEntry::new("bush", "bush", Aabb::default()),
        ]);
        let mut cycle = PropCycle::new();
        let excluded: HashSet<PrefabId> = ["rock".to_owned()].into_iter().collect();

        let candidates = cycle.candidates(&deck, &excluded, any);
        let ids: Vec<_> = candidates.entries.iter().map(|e| e.id()).collect();
        assert_eq!(ids, vec!["bush"]);
    }

    #[test]
    fn reset_respects_event_exclusions() {
        let deck = deck(&[("a", 1.0), ("b", 1.0), ("c", 1.0)]);
        let mut cycle = PropCycle::new();
        for id in ["a", "b", "c"] {
            cycle.mark_used(id);
        }
        let excluded: HashSet<PrefabId> = ["a".to_owned()].into_iter().collect();

        let candidates = cycle.candidates(&deck, &excluded, any);
        assert!(candidates.reset);
        let ids: Vec<_> = candidates.entries.iter().map(|e| e.id()).collect();
        assert_eq!(ids, vec!["b", "c"]);
        assert_eq!(cycle.used_count(), 0);
    }

    #[test]
    fn filter_limits_candidates() {
        let entries = vec![
            PropEntry::new("rock", "rock", Aabb::default()),
            PropEntry::new("barn", "barn", Aabb::default()).with_category(PropCategory::Big),
        ];
        let deck = PropDeck::new(entries);
        let mut cycle = PropCycle::new();
        let mut rng = StdRng::seed_from_u64(3);
        let none = HashSet::new();

        let draw = cycle.pick(&deck, &none, |e| !e.is_big(), &mut rng).unwrap();
        assert_eq!(draw.entry.id(), "rock");
        cycle.mark_used(draw.entry.id());

        // The barn is still unused, so small-only picks wait for it.
        assert!(cycle.pick(&deck, &none, |e| !e.is_big(), &mut rng).is_none());
        assert_eq!(cycle.resets(), 0);

        let draw = cycle.pick(&deck, &none, any, &mut rng).unwrap();
        assert_eq!(draw.entry.id(), "barn");
        assert!(!draw.reset);
    }

    #[test]
    fn empty_deck_yields_nothing() {
        let deck = PropDeck::default();
        let mut cycle = PropCycle::new();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(cycle.pick(&deck, &HashSet::new(), any, &mut rng).is_none());
        assert_eq!(cycle.resets(), 0);
    }
}
