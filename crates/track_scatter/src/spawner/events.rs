//! Event types and sinks for observing segment spawning.
//!
//! This module defines [`SpawnEvent`] and a set of sinks and adapters to emit, collect, or
//! forward events while a [`crate::spawner::SegmentSpawner`] runs.
use glam::Vec3;

use crate::prop::PropId;
use crate::scene::ObjectHandle;
use crate::spawner::config::Side;

/// Describes events emitted while spawning.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum SpawnEvent {
    /// A segment was instantiated and registered.
    SegmentSpawned {
        index: u64,
        handle: ObjectHandle,
        position: Vec3,
    },

    /// The oldest segment was pushed out of the pool and destroyed.
    SegmentEvicted { index: u64, handle: ObjectHandle },

    /// A prop was placed on a segment side.
    PropPlaced {
        segment_index: u64,
        side: Side,
        prop_id: PropId,
        handle: ObjectHandle,
        position: Vec3,
        /// True when the prop filled the whole side.
        big: bool,
    },

    /// A side finished populating.
    SideFinished {
        segment_index: u64,
        side: Side,
        /// Number of props placed.
        placed: usize,
        /// Candidate attempts spent.
        attempts: usize,
    },

    /// Every eligible prop was used and the cycle started over.
    CycleReset {
        /// Total resets so far.
        resets: u64,
    },

    /// A proximity trigger fired.
    Triggered { region: String, position: Vec3 },

    /// Non-fatal warning generated during spawning.
    Warning {
        /// Context string (e.g. segment index, prop id).
        context: String,
        /// Human-readable message.
        message: String,
    },
}

/// Discriminant of [`SpawnEvent`] used for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpawnEventKind {
    SegmentSpawned,
    SegmentEvicted,
    PropPlaced,
    SideFinished,
    CycleReset,
    Triggered,
    Warning,
}

impl SpawnEvent {
    pub fn kind(&self) -> SpawnEventKind {
        match self {
            SpawnEvent::SegmentSpawned { .. } => SpawnEventKind::SegmentSpawned,
            SpawnEvent::SegmentEvicted { .. } => SpawnEventKind::SegmentEvicted,
            SpawnEvent::PropPlaced { .. } => SpawnEventKind::PropPlaced,
            SpawnEvent::SideFinished { .. } => SpawnEventKind::SideFinished,
            SpawnEvent::CycleReset { .. } => SpawnEventKind::CycleReset,
            SpawnEvent::Triggered { .. } => SpawnEventKind::Triggered,
            SpawnEvent::Warning { .. } => SpawnEventKind::Warning,
        }
    }
}

/// A generic event sink that accepts [`SpawnEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: SpawnEvent);

    /// Whether events of `kind` should be built and sent at all.
    fn wants(&self, _kind: SpawnEventKind) -> bool {
        true
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: SpawnEvent) {}

    #[inline]
    fn wants(&self, _kind: SpawnEventKind) -> bool {
        false
    }
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(SpawnEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(SpawnEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(SpawnEvent),
{
    #[inline]
    fn send(&mut self, event: SpawnEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects events in a `Vec`, optionally only some kinds.
#[derive(Default)]
pub struct VecSink {
    events: Vec<SpawnEvent>,
    only: Option<Vec<SpawnEventKind>>,
}

impl VecSink {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            only: None,
        }
    }

    /// Collect only events whose kind is in `kinds`.
    pub fn only(kinds: impl IntoIterator<Item = SpawnEventKind>) -> Self {
        Self {
            events: Vec::new(),
            only: Some(kinds.into_iter().collect()),
        }
    }

    pub fn into_inner(self) -> Vec<SpawnEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[SpawnEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of collected events of `kind`.
    pub fn count(&self, kind: SpawnEventKind) -> usize {
        self.events.iter().filter(|e| e.kind() == kind).count()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: SpawnEvent) {
        if self.wants(event.kind()) {
            self.events.push(event);
        }
    }

    fn wants(&self, kind: SpawnEventKind) -> bool {
        self.only.as_ref().is_none_or(|kinds| kinds.contains(&kind))
    }
}

/// Fan-out sink that forwards each event to all contained sinks.
pub struct MultiSink<S: EventSink> {
    pub(crate) sinks: Vec<S>,
}

impl<S: EventSink> MultiSink<S> {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn with_sinks(sinks: Vec<S>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: S) {
        self.sinks.push(sink);
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn into_inner(self) -> Vec<S> {
        self.sinks
    }
}

impl<S: EventSink> Default for MultiSink<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EventSink> EventSink for MultiSink<S> {
    fn send(&mut self, event: SpawnEvent) {
        let kind = event.kind();
        let targets: Vec<usize> = (0..self.sinks.len())
            .filter(|&i| self.sinks[i].wants(kind))
            .collect();
        let Some((&last, rest)) = targets.split_last() else {
            return;
        };
        for &i in rest {
            self.sinks[i].send(event.clone());
        }
        self.sinks[last].send(event);
    }

    fn wants(&self, kind: SpawnEventKind) -> bool {
        self.sinks.iter().any(|s| s.wants(kind))
    }
}
