//! Theme support for circuit rendering
//!
//! A theme bundles the colors used for node markers, labels, edges and the
//! per-head palette. Built-in themes are Light, Dark and Dracula.
//!
//! # Examples
//!
//! ```
//! use circuitview::theme::ThemeManager;
//!
//! let manager = ThemeManager::new();
//! let dracula = manager.get_theme("Dracula").unwrap();
//! println!("Dracula edges: {:?}", dracula.colors.edge_stroke);
//! ```

use egui::Color32;
use std::collections::HashMap;

/// Color palette for a theme
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeColors {
    // Canvas
    pub background: Color32,

    // Grid
    pub node_fill: Color32,
    pub label_text: Color32,

    // Edges
    pub edge_stroke: Color32,
    pub head_palette: Vec<Color32>,
}

/// A complete theme definition with metadata and color palette
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub description: String,
    pub colors: ThemeColors,
}

/// Centralized theme manager providing access to all available themes
pub struct ThemeManager {
    themes: HashMap<String, Theme>,
}

pub const DEFAULT_THEME: &str = "Light";

impl ThemeManager {
    /// Creates a new ThemeManager initialized with all built-in themes
    pub fn new() -> Self {
        let mut themes = HashMap::new();

        themes.insert("Light".to_string(), light_theme());
        themes.insert("Dark".to_string(), dark_theme());
        themes.insert("Dracula".to_string(), dracula_theme());

        Self { themes }
    }

    /// Retrieves a theme by name
    pub fn get_theme(&self, name: &str) -> Option<&Theme> {
        self.themes.get(name)
    }

    /// Retrieves a theme by name, falling back to the default theme
    pub fn theme_or_default(&self, name: &str) -> &Theme {
        self.themes
            .get(name)
            .or_else(|| self.themes.get(DEFAULT_THEME))
            .unwrap_or_else(|| unreachable!("default theme is always registered"))
    }

    /// Returns a list of all available theme names
    pub fn list_themes(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.themes.keys().map(|s| s.as_str()).collect();
        names.sort();
        names
    }

    /// Applies a theme's colors to egui visuals
    pub fn apply_theme(&self, theme: &Theme, visuals: &mut egui::Visuals) {
        let colors = &theme.colors;

        visuals.extreme_bg_color = colors.background;
        visuals.override_text_color = Some(colors.label_text);
        visuals.selection.stroke.color = colors.edge_stroke;
        visuals.hyperlink_color = colors.edge_stroke;
    }
}

impl Default for ThemeManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Head palette shared by the light themes
fn light_head_palette() -> Vec<Color32> {
    [
        "#38B2AC", "#9F7AEA", "#F6AD55", "#68D391", "#F687B3",
        "#4FD1C5", "#B794F4", "#7F9CF5", "#C6F6D5", "#FBD38D",
        "#76E4F7", "#E9D8FD", "#90CDF4", "#FEB2B2", "#81E6D9",
        "#D6BCFA", "#FBB6CE", "#B2F5EA", "#667EEA", "#ED64A6",
    ]
    .iter()
    .map(|hex| hex_to_color32(hex))
    .collect()
}

/// Creates the Light theme (white canvas, gray nodes, blue edges)
fn light_theme() -> Theme {
    Theme {
        name: "Light".to_string(),
        description: "White canvas with blue attention edges".to_string(),
        colors: ThemeColors {
            background: Color32::from_rgb(255, 255, 255),
            node_fill: hex_to_color32("#69b3a2"),
            label_text: Color32::from_rgb(31, 41, 55),
            edge_stroke: hex_to_color32("#3B82F6"),
            head_palette: light_head_palette(),
        },
    }
}

/// Creates the Dark theme
fn dark_theme() -> Theme {
    Theme {
        name: "Dark".to_string(),
        description: "Dark canvas with bright edges".to_string(),
        colors: ThemeColors {
            background: Color32::from_rgb(16, 16, 16),
            node_fill: Color32::from_rgb(149, 165, 166),
            label_text: Color32::from_rgb(230, 230, 230),
            edge_stroke: Color32::from_rgb(52, 152, 219),
            head_palette: light_head_palette(),
        },
    }
}

/// Creates the Dracula theme
///
/// Official colors from: https://draculatheme.com/spec
fn dracula_theme() -> Theme {
    Theme {
        name: "Dracula".to_string(),
        description: "Official Dracula theme color palette".to_string(),
        colors: ThemeColors {
            background: hex_to_color32("#282a36"),
            node_fill: hex_to_color32("#6272a4"),
            label_text: hex_to_color32("#f8f8f2"),
            edge_stroke: hex_to_color32("#ff79c6"),
            head_palette: ["#8be9fd", "#50fa7b", "#ffb86c", "#ff5555", "#bd93f9", "#f1fa8c"]
                .iter()
                .map(|hex| hex_to_color32(hex))
                .collect(),
        },
    }
}

/// Converts a hex color string (like "#282a36") to Color32
pub fn hex_to_color32(hex: &str) -> Color32 {
    let hex = hex.trim_start_matches('#');

    if hex.len() == 6 {
        let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(0);
        let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(0);
        let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(0);
        Color32::from_rgb(r, g, b)
    } else {
        Color32::from_rgb(0, 0, 0) // Fallback to black
    }
}

/// Formats the RGB part of a color as `#rrggbb`
pub fn color32_to_hex(color: Color32) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_roundtrip() {
        let color = hex_to_color32("#3B82F6");
        assert_eq!(color, Color32::from_rgb(0x3b, 0x82, 0xf6));
        assert_eq!(color32_to_hex(color), "#3b82f6");
        assert_eq!(hex_to_color32("nonsense"), Color32::from_rgb(0, 0, 0));
    }

    #[test]
    fn test_node_and_edge_colors_differ() {
        let manager = ThemeManager::new();
        for name in manager.list_themes() {
            let colors = &manager.get_theme(name).unwrap().colors;
            assert_ne!(colors.node_fill, colors.edge_stroke, "theme {}", name);
            assert!(!colors.head_palette.is_empty());
        }
    }

    #[test]
    fn test_unknown_theme_falls_back() {
        let manager = ThemeManager::new();
        assert_eq!(manager.theme_or_default("Solarized").name, DEFAULT_THEME);
        assert_eq!(manager.list_themes(), vec!["Dark", "Dracula", "Light"]);
    }
}
