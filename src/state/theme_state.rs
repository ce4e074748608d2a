//! Theme and styling state management.

use circuitview::{CircuitStyle, Theme, ThemeManager};
use circuitview::theme::DEFAULT_THEME;

/// State related to visual theme and styling.
///
/// Responsibilities:
/// - Managing theme instances
/// - Tracking current theme selection
/// - Deriving the renderer style from the current theme
pub struct ThemeState {
    /// Theme manager instance
    theme_manager: ThemeManager,
    /// Name of currently selected theme
    current_theme_name: String,
}

impl std::fmt::Debug for ThemeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeState")
            .field("current_theme_name", &self.current_theme_name)
            .finish_non_exhaustive()
    }
}

impl Default for ThemeState {
    fn default() -> Self {
        Self::with_theme(DEFAULT_THEME.to_string())
    }
}

impl ThemeState {
    /// Creates a new theme state with a specific theme.
    pub fn with_theme(theme_name: String) -> Self {
        Self {
            theme_manager: ThemeManager::new(),
            current_theme_name: theme_name,
        }
    }

    pub fn theme_manager(&self) -> &ThemeManager {
        &self.theme_manager
    }

    pub fn current_theme_name(&self) -> &str {
        &self.current_theme_name
    }

    /// Current theme, or the default one if the stored name is unknown.
    pub fn current_theme(&self) -> &Theme {
        self.theme_manager.theme_or_default(&self.current_theme_name)
    }

    /// Renderer colors for the current theme.
    pub fn circuit_style(&self) -> CircuitStyle {
        CircuitStyle::from_theme(self.current_theme())
    }

    pub fn set_theme(&mut self, theme_name: String) {
        self.current_theme_name = theme_name;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_stored_theme_falls_back() {
        let state = ThemeState::with_theme("Removed Theme".into());
        assert_eq!(state.current_theme().name, DEFAULT_THEME);
        assert_eq!(state.circuit_style(), CircuitStyle::default());
    }

    #[test]
    fn test_switch_theme_changes_style() {
        let mut state = ThemeState::default();
        let light = state.circuit_style();
        state.set_theme("Dracula".into());
        assert_ne!(state.circuit_style(), light);
    }
}
