//! Fixed-capacity FIFO of live track segments.
use std::collections::VecDeque;

use glam::Vec3;
use tracing::{debug, warn};

use crate::scene::ObjectHandle;

/// A live track segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// Live object backing the segment.
    pub handle: ObjectHandle,
    /// Sequence number along the track, starting at 0.
    pub index: u64,
    /// World-space origin of the segment.
    pub position: Vec3,
}

impl Segment {
    pub fn new(handle: ObjectHandle, index: u64, position: Vec3) -> Self {
        Self {
            handle,
            index,
            position,
        }
    }
}

/// Bounded queue of segments. Registering past capacity evicts the oldest.
///
/// The pool only does bookkeeping: the caller destroys whatever [`SegmentPool::register`]
/// hands back.
#[derive(Debug, Clone)]
pub struct SegmentPool {
    segments: VecDeque<Segment>,
    max_segments: usize,
}

impl SegmentPool {
    /// Creates a pool holding at most `max_segments` (at least one).
    pub fn new(max_segments: usize) -> Self {
        if max_segments == 0 {
            warn!("Segment pool capacity 0 is not usable; using 1.");
        }
        let max_segments = max_segments.max(1);
        Self {
            segments: VecDeque::with_capacity(max_segments + 1),
            max_segments,
        }
    }

    /// Appends `segment` and returns the evicted head when the pool overflows.
    ///
    /// Segments with an invalid handle are ignored.
    pub fn register(&mut self, segment: Segment) -> Option<Segment> {
        if !segment.handle.is_valid() {
            warn!(
                "Ignoring segment {} with an invalid handle.",
                segment.index
            );
            return None;
        }

        self.segments.push_back(segment);
        if self.segments.len() > self.max_segments {
            let evicted = self.segments.pop_front();
            if let Some(s) = &evicted {
                debug!("Evicting segment {} ({:?}).", s.index, s.handle);
            }
            evicted
        } else {
            None
        }
    }

    pub fn capacity(&self) -> usize {
        self.max_segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn oldest(&self) -> Option<&Segment> {
        self.segments.front()
    }

    pub fn newest(&self) -> Option<&Segment> {
        self.segments.back()
    }

    pub fn contains(&self, handle: ObjectHandle) -> bool {
        self.segments.iter().any(|s| s.handle == handle)
    }

    /// Segments from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter()
    }

    /// Removes every segment, oldest first.
    pub fn drain(&mut self) -> Vec<Segment> {
        self.segments.drain(..).collect()
    }
}
