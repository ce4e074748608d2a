//! State management modules for the circuit viewer.
//!
//! This module contains state-only logic (no UI concerns):
//! - Dataset state (loaded dataset, where it came from)
//! - View state (edge threshold, coloring, legend, model preset, selected
//!   heads and head groups)
//! - Canvas state (renderer memo, recorded frame, last pass result)
//! - Theme state (theme manager, current theme)

mod dataset_state;
mod view_state;
mod canvas_state;
mod theme_state;

pub use dataset_state::{DatasetState, DatasetSource};
pub use view_state::{ViewState, ColoringMode, HeadEditor};
pub use canvas_state::CanvasState;
pub use theme_state::ThemeState;
