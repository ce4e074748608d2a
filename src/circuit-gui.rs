//! Circuit Viewer GUI Application
//!
//! Interactive viewer for transformer attention datasets built on egui.
//! Each layer is a row of token nodes and every attention edge is a line
//! whose width and opacity follow its weight. The viewer features:

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]
//! - Asynchronous file loading (plain or brotli-compressed JSON)
//! - Edge threshold, head-group filtering and per-head or per-group coloring
//! - SVG export of the current view
//! - Multiple theme support with persistent preferences
//!
//! The application is built with a modular architecture:
//! - `app/` - Application state management and coordination
//! - `io/` - Background dataset loading
//! - `ui/` - UI panel rendering
//! - `rendering/` - Replaying recorded primitives onto the egui painter
//! - `state/` - State for the dataset, view controls, canvas and theme

use eframe::egui;
use std::path::PathBuf;

mod io;
mod app;
mod rendering;
mod ui;
mod state;

use app::{AppState, ApplicationCoordinator, SettingsCoordinator, ThemeCoordinator, ViewerSettings};
use io::AsyncLoader;
use ui::panel_manager::{PanelInteraction, PanelManager};

/// Main application entry point that initializes and launches the circuit viewer GUI.
fn main() -> eframe::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Parse command-line arguments to check for initial file to load
    let initial_file = std::env::args()
        .nth(1)
        .map(PathBuf::from);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title("Circuit Viewer"),
        ..Default::default()
    };

    eframe::run_native(
        "Circuit Viewer",
        options,
        Box::new(move |cc| Ok(Box::new(CircuitViewerApp::new(cc, initial_file)))),
    )
}

/// The main Circuit Viewer application.
///
/// Delegates most functionality to coordinators:
/// - `ApplicationCoordinator` handles loading, export and canvas refresh
/// - `ThemeCoordinator` applies the theme to egui
/// - `SettingsCoordinator` persists the theme and view controls
/// - `PanelManager` handles UI panel layout and rendering
struct CircuitViewerApp {
    /// Centralized application state
    state: AppState,
    /// Asynchronous file loader
    loader: AsyncLoader,
    /// Optional file to load on first frame
    pending_file_load: Option<PathBuf>,
    /// Settings as last written to storage
    saved_settings: ViewerSettings,
}

impl CircuitViewerApp {
    /// Creates a new viewer instance with settings loaded from persistent storage.
    /// Optionally accepts an initial file path to load on startup.
    fn new(cc: &eframe::CreationContext, initial_file: Option<PathBuf>) -> Self {
        let settings = SettingsCoordinator::load_settings(cc.storage);

        Self {
            state: AppState::with_settings(settings.clone()),
            loader: AsyncLoader::new(),
            pending_file_load: initial_file,
            saved_settings: settings,
        }
    }

    /// Handles panel interactions by delegating to ApplicationCoordinator.
    fn handle_panel_interaction(&mut self, interaction: PanelInteraction, ctx: &egui::Context) {
        match interaction {
            PanelInteraction::OpenFileRequested(path) => {
                ApplicationCoordinator::open_file(&mut self.state, &mut self.loader, path, ctx);
            }
            PanelInteraction::OpenSampleRequested => {
                ApplicationCoordinator::open_sample(&mut self.state, &self.loader);
            }
            PanelInteraction::ExportSvgRequested(path) => {
                match ApplicationCoordinator::export_svg(&self.state, &path) {
                    Ok(_) => self.state.error_message = None,
                    Err(e) => {
                        log::error!("SVG export failed: {:#}", e);
                        self.state.error_message = Some(format!("Error exporting SVG: {:#}", e));
                    }
                }
            }
        }
    }
}

impl eframe::App for CircuitViewerApp {
    /// Called when the app is being shut down - ensures preferences are saved.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        SettingsCoordinator::save_settings(storage, &self.state.settings());
    }

    /// Main update loop that renders all UI panels and handles application state.
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        // Check for async loading completion
        ApplicationCoordinator::check_loading_completion(&mut self.state, &mut self.loader);

        // Apply current theme
        ThemeCoordinator::apply_current_theme(ctx, &self.state);

        // Persist preferences when they change (for crash resilience)
        let settings = self.state.settings();
        if settings != self.saved_settings {
            if let Some(storage) = frame.storage_mut() {
                SettingsCoordinator::save_settings(storage, &settings);
            }
            self.saved_settings = settings;
        }

        // Load initial file if specified via command line (only on first frame)
        if let Some(path) = self.pending_file_load.take() {
            ApplicationCoordinator::open_file(&mut self.state, &mut self.loader, path, ctx);
        }

        // Render all panels and get interaction result
        if let Some(interaction) = PanelManager::render_all_panels(ctx, &mut self.state, &self.loader) {
            self.handle_panel_interaction(interaction, ctx);
        }
    }
}
