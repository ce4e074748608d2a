//! Header panel UI rendering
//!
//! Handles the top menu bar with dataset controls, SVG export and theme selector.

use eframe::egui;
use egui::Color32;
use std::path::PathBuf;
use crate::app::{AppState, ThemeCoordinator};

/// Result of user interaction with the header panel
pub enum HeaderInteraction {
    /// User picked a dataset file
    OpenFileRequested(PathBuf),
    /// User clicked "Sample"
    OpenSampleRequested,
    /// User picked an SVG export destination
    ExportSvgRequested(PathBuf),
}

/// Renders the application header
///
/// # Arguments
/// * `ui` - The egui UI context for drawing
/// * `state` - Mutable reference to application state
///
/// # Returns
/// * `Option<HeaderInteraction>` - User interaction result
pub fn render_header(ui: &mut egui::Ui, state: &mut AppState) -> Option<HeaderInteraction> {
    let mut interaction = None;

    ui.horizontal(|ui| {
        if ui.button("📁 Open Dataset").clicked() {
            let mut dialog = rfd::FileDialog::new()
                .add_filter("Attention Datasets", &["json", "br"])
                .add_filter("JSON", &["json"]);

            if let Ok(cwd) = std::env::current_dir() {
                dialog = dialog.set_directory(cwd);
            }

            if let Some(path) = dialog.pick_file() {
                interaction = Some(HeaderInteraction::OpenFileRequested(path));
            }
        }

        if ui.button("🎲 Sample").clicked() {
            interaction = Some(HeaderInteraction::OpenSampleRequested);
        }

        ui.separator();

        let can_export = state.dataset.dataset().is_some() && state.canvas.render_error().is_none();
        if ui.add_enabled(can_export, egui::Button::new("💾 Export SVG")).clicked() {
            if let Some(path) = rfd::FileDialog::new()
                .add_filter("SVG", &["svg"])
                .set_file_name("circuit.svg")
                .save_file()
            {
                interaction = Some(HeaderInteraction::ExportSvgRequested(path));
            }
        }

        // Push theme selector to the right
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let mut current_theme = state.theme.current_theme_name().to_string();
            egui::ComboBox::from_id_salt("theme_selector")
                .selected_text(&current_theme)
                .show_ui(ui, |ui| {
                    for theme_name in state.theme.theme_manager().list_themes() {
                        ui.selectable_value(&mut current_theme, theme_name.to_string(), theme_name);
                    }
                });

            ThemeCoordinator::select_theme(state, &current_theme);

            ui.label("Theme:");
        });
    });

    if let Some(err) = &state.error_message {
        ui.colored_label(Color32::RED, err);
    }

    interaction
}
