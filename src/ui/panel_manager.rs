//! Panel orchestration and layout management.
//!
//! Coordinates all UI panels (header, controls, canvas, status) and manages
//! their layout.

use crate::app::AppState;
use crate::io::AsyncLoader;
use crate::ui::{canvas_panel, controls_panel, header, status_bar};

/// Result of panel interactions that need to be handled by the application coordinator.
pub enum PanelInteraction {
    /// User requested to open a file
    OpenFileRequested(std::path::PathBuf),
    /// User requested a generated sample
    OpenSampleRequested,
    /// User requested an SVG export
    ExportSvgRequested(std::path::PathBuf),
}

/// Manages the layout and rendering of all UI panels.
pub struct PanelManager;

impl PanelManager {
    /// Renders all panels in the application window.
    ///
    /// This is the main entry point for rendering the entire UI, called from
    /// the eframe::App::update() implementation.
    pub fn render_all_panels(
        ctx: &egui::Context,
        state: &mut AppState,
        loader: &AsyncLoader,
    ) -> Option<PanelInteraction> {
        let mut interaction: Option<PanelInteraction> = None;

        // Header panel at the top
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            if let Some(header_interaction) = header::render_header(ui, state) {
                interaction = Some(match header_interaction {
                    header::HeaderInteraction::OpenFileRequested(path) => {
                        PanelInteraction::OpenFileRequested(path)
                    }
                    header::HeaderInteraction::OpenSampleRequested => {
                        PanelInteraction::OpenSampleRequested
                    }
                    header::HeaderInteraction::ExportSvgRequested(path) => {
                        PanelInteraction::ExportSvgRequested(path)
                    }
                });
            }
        });

        // Status panel at the very bottom
        egui::TopBottomPanel::bottom("status_panel").show(ctx, |ui| {
            status_bar::render_status_bar(ui, state);
        });

        // Left panel: view controls
        let controls_frame = egui::Frame::default()
            .inner_margin(egui::Margin::same(6))
            .fill(ctx.style().visuals.panel_fill);

        egui::SidePanel::left("controls_panel")
            .default_width(220.0)
            .resizable(true)
            .frame(controls_frame)
            .show(ctx, |ui| {
                controls_panel::render_controls_panel(ui, state);
            });

        // Remaining space: the circuit canvas
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                canvas_panel::render_canvas_panel(ui, state, loader.is_loading());
            });

        interaction
    }
}
