//! Status bar UI rendering
//!
//! Handles the bottom status bar with dataset and render statistics.

use eframe::egui;
use egui::RichText;
use circuitview::HeadBounds;
use crate::app::AppState;

/// Renders the status panel at the bottom of the window
///
/// # Arguments
/// * `ui` - The egui UI context for drawing
/// * `state` - Reference to application state
pub fn render_status_bar(ui: &mut egui::Ui, state: &AppState) {
    ui.horizontal(|ui| {
        let Some(dataset) = state.dataset.dataset() else {
            ui.label(RichText::new("No dataset loaded").strong());
            return;
        };

        ui.label(RichText::new(state.dataset.source_label()).strong());
        ui.label(RichText::new("|").strong());

        let heads = HeadBounds::of_dataset(dataset)
            .num_heads
            .map(|n| n.to_string())
            .unwrap_or_else(|| "?".to_string());
        ui.label(RichText::new(format!(
            "Layers: {} | Tokens: {} | Heads: {} | Edges: {}",
            dataset.num_layers,
            dataset.num_tokens,
            heads,
            dataset.attention_patterns.len()
        )).strong());

        if let Some(stats) = state.canvas.last_stats() {
            ui.label(RichText::new("|").strong());
            ui.label(RichText::new(format!(
                "Drawn: {} | Filtered: {}",
                stats.edges_drawn, stats.edges_filtered
            )).strong());

            if stats.edges_skipped > 0 {
                ui.label(RichText::new(format!("Skipped: {}", stats.edges_skipped))
                    .strong()
                    .color(egui::Color32::YELLOW))
                    .on_hover_text("Edges whose endpoints lie outside the layer/token grid");
            }
        }
    });
}
