//! Rendering subsystem for drawing the circuit on the egui canvas
//!
//! The layout and draw pass live in the library and record primitives;
//! this module replays them onto an egui painter.

pub mod circuit_painter;
