//! Asynchronous dataset loading.
//!
//! Attention datasets for long prompts on deep models can hold hundreds of
//! thousands of edges, so files are parsed on a background thread to keep
//! the GUI responsive.

use circuitview::{generate_dataset, load_dataset, GraphDataset, ModelPreset, SampleConfig};
use eframe::egui;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::thread;

/// Result of a completed loading operation.
pub enum LoadResult {
    /// Loading completed successfully
    Success {
        /// The parsed dataset
        data: GraphDataset,
        /// Path to the file that was loaded
        path: PathBuf,
    },
    /// Loading failed with an error
    Error(String),
    /// No loading operation finished since the last check
    None,
}

/// Manages asynchronous loading of dataset files.
pub struct AsyncLoader {
    /// Flag of the most recent load; set while it runs
    in_progress: Arc<AtomicBool>,

    /// Channel receiver for loading results
    loading_receiver: Option<Receiver<Result<GraphDataset, String>>>,

    /// Path of the file currently being loaded
    pending_load_path: Option<PathBuf>,
}

impl AsyncLoader {
    /// Creates a new async loader with no active loading operation.
    pub fn new() -> Self {
        Self {
            in_progress: Arc::new(AtomicBool::new(false)),
            loading_receiver: None,
            pending_load_path: None,
        }
    }

    /// Checks if a loading operation is currently in progress.
    pub fn is_loading(&self) -> bool {
        self.in_progress.load(Ordering::Acquire)
    }

    /// Starts loading a dataset file on a background thread.
    ///
    /// Call `check_completion()` once per frame to pick up the result. A load
    /// started while another is running replaces it; the earlier result is
    /// dropped with its channel.
    pub fn start_file_load(&mut self, path: PathBuf, ctx: &egui::Context) {
        let job_path = path.clone();
        self.spawn_load(path, ctx, move || {
            log::info!("Loading dataset {}", job_path.display());
            load_dataset(&job_path).map_err(|e| format!("{:#}", e))
        });
    }

    fn spawn_load<F>(&mut self, path: PathBuf, ctx: &egui::Context, job: F)
    where
        F: FnOnce() -> Result<GraphDataset, String> + Send + 'static,
    {
        let (sender, receiver) = channel();
        self.loading_receiver = Some(receiver);
        self.pending_load_path = Some(path);

        // Each load owns its flag, so a replaced load finishing late cannot
        // mark the current one as done
        let in_progress = Arc::new(AtomicBool::new(true));
        self.in_progress = Arc::clone(&in_progress);
        let ctx_handle = ctx.clone();

        thread::spawn(move || {
            let result = job();

            in_progress.store(false, Ordering::Release);

            // Receiver is gone if a newer load replaced this one
            let _ = sender.send(result);
            ctx_handle.request_repaint();
        });
    }

    /// Generates a sample dataset synchronously, sized after `model` when
    /// one is given.
    ///
    /// Generation is fast enough for the preset sizes that no thread is
    /// needed.
    pub fn load_sample(&self, seed: u64, model: Option<&ModelPreset>) -> GraphDataset {
        let config = match model {
            Some(model) => SampleConfig::from_preset(model, seed),
            None => SampleConfig { seed, ..SampleConfig::default() },
        };
        generate_dataset(&config)
    }

    /// Returns the result of a finished background load, if any.
    pub fn check_completion(&mut self) -> LoadResult {
        let Some(receiver) = &self.loading_receiver else {
            return LoadResult::None;
        };

        let Ok(result) = receiver.try_recv() else {
            return LoadResult::None;
        };

        self.loading_receiver = None;
        match (result, self.pending_load_path.take()) {
            (Ok(data), Some(path)) => LoadResult::Success { data, path },
            (Ok(_), None) => LoadResult::Error("Load finished without a pending path".to_string()),
            (Err(error_msg), _) => LoadResult::Error(error_msg),
        }
    }
}

impl Default for AsyncLoader {
    fn default() -> Self {
        Self::new()
    }
}
