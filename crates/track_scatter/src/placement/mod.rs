//! Placement of props inside per-side areas of a segment.
//!
//! [`PlacementArea`] describes where candidates may go; [`PlacementValidator`] projects each
//! candidate onto the ground, rejects obstructed or out-of-area footprints, and retries within an
//! [`AttemptBudget`].
pub mod area;
pub mod validator;

pub use area::PlacementArea;
pub use validator::{AttemptBudget, PlacementValidator, Rejection, ValidPlacement, ValidatorConfig};
