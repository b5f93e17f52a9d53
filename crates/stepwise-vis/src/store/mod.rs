//! Presentation-facing state replayed by the playback engine.
//!
//! - [`BarStore`]: array of bars for the sorting visualizer
//! - [`GridStore`]: grid of cells for the pathfinding visualizer

mod bars;
mod cells;

pub use bars::{
    parse_custom_input, replay_bars, ArraySnapshot, Bar, BarStore, BarTone, SortPhase,
    SortRecording, MAX_ARRAY_SIZE, MIN_ARRAY_SIZE,
};
pub use cells::{EditAction, GridSnapshot, GridStore, PathPhase, PathRecording};
