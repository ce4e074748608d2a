//! Application-level coordination and workflow management.
//!
//! Handles high-level application operations like file loading, sample
//! generation, SVG export and canvas refresh.

use crate::app::AppState;
use crate::io::{AsyncLoader, LoadResult};
use crate::state::DatasetSource;
use anyhow::{Context, Result};
use circuitview::{draw_circuit, preset, DatasetWriter, RenderStats, SvgSurface};
use std::path::{Path, PathBuf};

/// Coordinates application-level operations and workflows.
pub struct ApplicationCoordinator;

impl ApplicationCoordinator {
    /// Initiates asynchronous file loading.
    ///
    /// Immediately clears the previous dataset to show the loading indicator.
    pub fn open_file(
        state: &mut AppState,
        loader: &mut AsyncLoader,
        path: PathBuf,
        ctx: &egui::Context,
    ) {
        state.reset_dataset_state();
        loader.start_file_load(path, ctx);
    }

    /// Checks for loading completion and applies results to application state.
    ///
    /// Called once per frame in the update loop.
    /// Returns true if a load operation completed (success or error).
    pub fn check_loading_completion(state: &mut AppState, loader: &mut AsyncLoader) -> bool {
        match loader.check_completion() {
            LoadResult::Success { data, path } => {
                log::info!(
                    "Loaded {}: {} layers, {} tokens, {} edges",
                    path.display(),
                    data.num_layers,
                    data.num_tokens,
                    data.attention_patterns.len()
                );
                state.dataset.load(data, DatasetSource::File(path));
                state.error_message = None;
                true
            }
            LoadResult::Error(error_msg) => {
                log::error!("Error loading dataset: {}", error_msg);
                state.error_message = Some(format!("Error loading dataset: {}", error_msg));
                state.dataset.clear();
                true
            }
            LoadResult::None => false,
        }
    }

    /// Generates and loads a sample dataset in-memory.
    ///
    /// Each call uses a fresh seed so repeated clicks show different graphs.
    /// The sample takes the selected model's layer and head counts and prompt.
    pub fn open_sample(state: &mut AppState, loader: &AsyncLoader) {
        let seed = state.next_sample_seed;
        state.next_sample_seed = seed.wrapping_add(1);

        state.reset_dataset_state();
        let dataset = loader.load_sample(seed, preset(&state.view.preset_name));
        state.dataset.load(dataset, DatasetSource::Sample { seed });
    }

    /// Re-renders the canvas for the current dataset, size and controls.
    pub fn refresh_canvas(state: &mut AppState, width: u32, height: u32) {
        let Some(dataset) = state.dataset.dataset() else {
            return;
        };
        let options = state.view.render_options(state.theme.circuit_style());
        state.canvas.refresh(dataset, width, height, options);
    }

    /// Writes the current view to an SVG file at the canvas' last size.
    pub fn export_svg(state: &AppState, path: &Path) -> Result<RenderStats> {
        let dataset = state.dataset.dataset().context("No dataset loaded")?;
        let (width, height) = state.canvas.size();
        let options = state.view.render_options(state.theme.circuit_style());

        let background = state.theme.current_theme().colors.background;
        let mut surface = SvgSurface::new(width, height).with_background(background);
        let stats = draw_circuit(&mut surface, dataset, width, height, &options)?;

        let mut writer = DatasetWriter::new(path)?;
        writer.write_str(&surface.to_svg())?;
        log::info!("Exported {} ({}x{})", path.display(), width, height);
        Ok(stats)
    }
}
