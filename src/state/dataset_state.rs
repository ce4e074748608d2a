//! Loaded dataset state management.

use circuitview::GraphDataset;
use std::path::PathBuf;

/// Where the current dataset came from.
#[derive(Debug, Clone, PartialEq)]
pub enum DatasetSource {
    File(PathBuf),
    Sample { seed: u64 },
}

/// State related to the loaded attention dataset.
///
/// Responsibilities:
/// - Owning the dataset handed to the renderer
/// - Tracking its source for the status bar
#[derive(Default)]
pub struct DatasetState {
    /// The currently loaded dataset (if any)
    dataset: Option<GraphDataset>,
    /// Source of the current dataset
    source: Option<DatasetSource>,
}

impl DatasetState {
    /// Creates a new dataset state with nothing loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current dataset.
    pub fn load(&mut self, dataset: GraphDataset, source: DatasetSource) {
        self.dataset = Some(dataset);
        self.source = Some(source);
    }

    /// Clears the dataset, e.g. while a new file is loading.
    pub fn clear(&mut self) {
        self.dataset = None;
        self.source = None;
    }

    pub fn dataset(&self) -> Option<&GraphDataset> {
        self.dataset.as_ref()
    }

    pub fn source(&self) -> Option<&DatasetSource> {
        self.source.as_ref()
    }

    /// Short description of the source for display.
    pub fn source_label(&self) -> String {
        match &self.source {
            Some(DatasetSource::File(path)) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            Some(DatasetSource::Sample { seed }) => format!("Sample (seed {})", seed),
            None => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_and_clear() {
        let mut state = DatasetState::new();
        assert!(state.dataset().is_none());

        state.load(GraphDataset::new(2, 2), DatasetSource::File(PathBuf::from("/tmp/ioi.json")));
        assert_eq!(state.dataset().map(|d| d.num_layers), Some(2));
        assert_eq!(state.source_label(), "ioi.json");

        state.load(GraphDataset::new(1, 1), DatasetSource::Sample { seed: 9 });
        assert_eq!(state.source_label(), "Sample (seed 9)");

        state.clear();
        assert!(state.dataset().is_none());
        assert!(state.source().is_none());
    }
}
