//! Centralized application state for the circuit viewer.
//!
//! The state is split into focused components so the UI panels can borrow
//! different parts at the same time.

use crate::app::ViewerSettings;
use crate::state::{CanvasState, DatasetState, HeadEditor, ThemeState, ViewState};

/// Main application state composed of focused state components.
pub struct AppState {
    /// Loaded dataset and its source
    pub dataset: DatasetState,

    /// Edge filtering and coloring controls
    pub view: ViewState,

    /// Text typed into the head and group editors (not persisted)
    pub head_editor: HeadEditor,

    /// Renderer memo and the recorded frame
    pub canvas: CanvasState,

    /// Theme and styling state
    pub theme: ThemeState,

    /// Current error message to display (if any)
    pub error_message: Option<String>,

    /// Seed for the next generated sample
    pub next_sample_seed: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Creates a new application state with default values.
    pub fn new() -> Self {
        Self::with_settings(ViewerSettings::default())
    }

    /// Creates a new AppState from settings loaded from storage.
    pub fn with_settings(settings: ViewerSettings) -> Self {
        Self {
            dataset: DatasetState::new(),
            view: settings.view,
            head_editor: HeadEditor::default(),
            canvas: CanvasState::new(),
            theme: ThemeState::with_theme(settings.theme),
            error_message: None,
            next_sample_seed: 42,
        }
    }

    /// Settings to persist at shutdown.
    pub fn settings(&self) -> ViewerSettings {
        ViewerSettings {
            theme: self.theme.current_theme_name().to_string(),
            view: self.view.clone(),
        }
    }

    /// Resets dataset-related state before loading a new dataset.
    pub fn reset_dataset_state(&mut self) {
        self.dataset.clear();
        self.canvas.reset();
        self.error_message = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{ColoringMode, DatasetSource};
    use circuitview::GraphDataset;

    #[test]
    fn test_settings_round_trip_through_state() {
        let settings = ViewerSettings {
            theme: "Dracula".into(),
            view: ViewState { coloring: ColoringMode::Head, ..Default::default() },
        };
        let state = AppState::with_settings(settings.clone());
        assert_eq!(state.settings(), settings);
    }

    #[test]
    fn test_reset_dataset_state() {
        let mut state = AppState::new();
        state.dataset.load(GraphDataset::new(1, 1), DatasetSource::Sample { seed: 1 });
        state.error_message = Some("old".into());

        state.reset_dataset_state();
        assert!(state.dataset.dataset().is_none());
        assert!(state.error_message.is_none());
    }
}
