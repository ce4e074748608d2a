//! UI panel rendering subsystem
//!
//! This module contains all UI panel rendering logic for the circuit viewer:
//! - Header panel (dataset controls, SVG export, theme selector)
//! - Controls panel (edge threshold, coloring, model preset, selected heads,
//!   head groups)
//! - Canvas panel (the rendered circuit)
//! - Status bar (dataset and render statistics)
//! - Panel manager (panel orchestration and layout)

pub mod header;
pub mod controls_panel;
pub mod canvas_panel;
pub mod status_bar;
pub mod panel_manager;
