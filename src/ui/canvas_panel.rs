//! Canvas panel UI rendering
//!
//! Allocates the drawing area, refreshes the recorded frame for the current
//! size and replays it.

use eframe::egui;
use crate::app::{AppState, ApplicationCoordinator};
use crate::rendering::circuit_painter;

/// Renders the circuit canvas filling the remaining space
///
/// # Arguments
/// * `ui` - The egui UI context for drawing
/// * `state` - Mutable reference to application state
/// * `is_loading` - Whether a background load is running
pub fn render_canvas_panel(ui: &mut egui::Ui, state: &mut AppState, is_loading: bool) {
    let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::hover());
    let rect = response.rect;

    let theme = state.theme.current_theme();
    let background = theme.colors.background;
    let text_color = theme.colors.label_text;
    painter.rect_filled(rect, 0.0, background);

    if is_loading {
        circuit_painter::paint_placeholder(&painter, rect, "⏳ Loading dataset...", text_color);
        return;
    }

    if state.dataset.dataset().is_none() {
        circuit_painter::paint_placeholder(
            &painter,
            rect,
            "Open an attention dataset or generate a sample",
            text_color,
        );
        return;
    }

    let width = rect.width().max(0.0).round() as u32;
    let height = rect.height().max(0.0).round() as u32;
    ApplicationCoordinator::refresh_canvas(state, width, height);

    if let Some(err) = state.canvas.render_error() {
        circuit_painter::paint_placeholder(&painter, rect, err, egui::Color32::RED);
        return;
    }

    circuit_painter::paint_primitives(&painter, rect.min, state.canvas.primitives());
}
