//! Settings persistence coordination.
//!
//! Settings are stored as JSON strings in eframe's persistent storage.

use crate::state::ViewState;
use circuitview::theme::DEFAULT_THEME;
use serde::{Deserialize, Serialize};

const SETTINGS_KEY: &str = "circuit_view_settings";

/// Everything the viewer remembers between sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerSettings {
    pub theme: String,
    pub view: ViewState,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME.to_string(),
            view: ViewState::default(),
        }
    }
}

/// Coordinates settings persistence.
pub struct SettingsCoordinator;

impl SettingsCoordinator {
    /// Loads the viewer settings, falling back to defaults when missing or unreadable.
    pub fn load_settings(storage: Option<&dyn eframe::Storage>) -> ViewerSettings {
        Self::load_setting(storage, SETTINGS_KEY)
    }

    pub fn save_settings(storage: &mut dyn eframe::Storage, settings: &ViewerSettings) {
        Self::save_setting(storage, SETTINGS_KEY, settings);
    }

    /// Loads a setting from persistent storage with a default fallback.
    pub fn load_setting<T>(storage: Option<&dyn eframe::Storage>, key: &str) -> T
    where
        T: for<'de> Deserialize<'de> + Default,
    {
        let Some(json_str) = storage.and_then(|s| s.get_string(key)) else {
            return T::default();
        };
        match serde_json::from_str(&json_str) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Ignoring stored setting {}: {}", key, e);
                T::default()
            }
        }
    }

    /// Saves a setting to persistent storage.
    pub fn save_setting<T>(storage: &mut dyn eframe::Storage, key: &str, value: &T)
    where
        T: Serialize,
    {
        match serde_json::to_string(value) {
            Ok(json_str) => {
                storage.set_string(key, json_str);
                storage.flush();
            }
            Err(e) => log::warn!("Failed to save setting {}: {}", key, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ColoringMode;
    use circuitview::HeadPair;
    use std::collections::HashMap;

    /// Simple mock storage for testing
    #[derive(Default)]
    struct MockStorage {
        data: HashMap<String, String>,
    }

    impl eframe::Storage for MockStorage {
        fn get_string(&self, key: &str) -> Option<String> {
            self.data.get(key).cloned()
        }

        fn set_string(&mut self, key: &str, value: String) {
            self.data.insert(key.to_string(), value);
        }

        fn flush(&mut self) {}
    }

    #[test]
    fn test_save_and_load_settings() {
        let mut storage = MockStorage::default();
        let settings = ViewerSettings {
            theme: "Dark".into(),
            view: ViewState {
                threshold: 0.25,
                coloring: ColoringMode::Group,
                legend: true,
                preset_name: "pythia-2.8b".into(),
                groups: Vec::new(),
                selected_heads: vec![HeadPair::new(9, 9), HeadPair::new(10, 0)],
                selected_only: true,
            },
        };

        SettingsCoordinator::save_settings(&mut storage, &settings);
        assert_eq!(SettingsCoordinator::load_settings(Some(&storage)), settings);
    }

    #[test]
    fn test_missing_storage_gives_defaults() {
        assert_eq!(SettingsCoordinator::load_settings(None), ViewerSettings::default());
        let storage = MockStorage::default();
        assert_eq!(SettingsCoordinator::load_settings(Some(&storage)), ViewerSettings::default());
    }

    #[test]
    fn test_partial_settings_fill_defaults() {
        let mut storage = MockStorage::default();
        storage.data.insert(SETTINGS_KEY.into(), r#"{"view":{"threshold":0.5}}"#.into());

        let settings = SettingsCoordinator::load_settings(Some(&storage));
        assert_eq!(settings.theme, DEFAULT_THEME);
        assert_eq!(settings.view.threshold, 0.5);
        assert_eq!(settings.view.preset_name, "gpt2-small");
    }

    #[test]
    fn test_corrupt_settings_fall_back() {
        let mut storage = MockStorage::default();
        storage.data.insert(SETTINGS_KEY.into(), "not json".into());
        assert_eq!(SettingsCoordinator::load_settings(Some(&storage)), ViewerSettings::default());
    }
}
