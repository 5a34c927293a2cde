//! Selection utilities for choosing a [crate::prop::PropEntry] to place.
//!
//! - [pick_weighted_index] / [pick_weighted]: one uniform draw against cumulative weights.
//! - [PropCycle]: cycle memory layered on top, so no entry repeats until the deck is exhausted.
//!
//! Randomness comes from any [rand::RngCore]; see [crate::sampling::rand01] for the draw.
pub mod cycle;
pub mod weighted;

pub use cycle::{Candidates, CycleDraw, PropCycle};
pub use weighted::{pick_weighted, pick_weighted_index};
