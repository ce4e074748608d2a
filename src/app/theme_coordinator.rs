//! Theme application to the egui context.

use crate::app::AppState;

/// Coordinates theme management.
pub struct ThemeCoordinator;

impl ThemeCoordinator {
    /// Applies the current theme to the egui context.
    ///
    /// Called every frame to ensure theme is correctly applied.
    pub fn apply_current_theme(ctx: &egui::Context, state: &AppState) {
        let theme = state.theme.current_theme();
        let mut visuals = if theme.name == "Light" {
            egui::Visuals::light()
        } else {
            egui::Visuals::dark()
        };

        state.theme.theme_manager().apply_theme(theme, &mut visuals);
        ctx.set_visuals(visuals);
    }

    /// Switches theme. The style is part of the render options, so the next
    /// canvas refresh redraws in the new colors.
    pub fn select_theme(state: &mut AppState, theme_name: &str) {
        if state.theme.current_theme_name() != theme_name {
            log::info!("Switching theme to {}", theme_name);
            state.theme.set_theme(theme_name.to_string());
        }
    }
}
