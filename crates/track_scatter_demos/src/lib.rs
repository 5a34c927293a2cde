#![forbid(unsafe_code)]

mod rendering;
mod track_def;

pub use rendering::{
    init_tracing, render_candidates_to_png, render_track_to_png, PropStyle, RenderConfig,
};
pub use track_def::{load_track_def, ObstacleDef, TrackDef};
