//! Canvas state: the renderer memo and the most recent frame.
//!
//! egui repaints every frame, so the circuit is rendered into a
//! `RecordingSurface` only when its input changes and the recording is
//! replayed onto the painter each frame.

use circuitview::{
    CircuitRenderer, GraphDataset, Primitive, RecordingSurface, RenderOptions, RenderOutcome,
    RenderStats,
};

pub struct CanvasState {
    renderer: CircuitRenderer,
    surface: RecordingSurface,
    /// Size of the last requested frame
    size: (u32, u32),
    last_stats: Option<RenderStats>,
    render_error: Option<String>,
}

impl Default for CanvasState {
    fn default() -> Self {
        Self::new()
    }
}

impl CanvasState {
    pub fn new() -> Self {
        Self {
            renderer: CircuitRenderer::default(),
            surface: RecordingSurface::new(),
            size: (0, 0),
            last_stats: None,
            render_error: None,
        }
    }

    /// Re-renders when the dataset, the size or the options changed.
    pub fn refresh(&mut self, dataset: &GraphDataset, width: u32, height: u32, options: RenderOptions) {
        self.size = (width, height);
        self.renderer.set_options(options);

        match self.renderer.render(&mut self.surface, dataset, width, height) {
            Ok(RenderOutcome::Drawn(stats)) => {
                self.last_stats = Some(stats);
                self.render_error = None;
            }
            Ok(RenderOutcome::Unchanged) => {}
            Err(e) => {
                let message = e.to_string();
                if self.render_error.as_deref() != Some(message.as_str()) {
                    log::warn!("Render failed: {}", message);
                }
                self.last_stats = None;
                self.render_error = Some(message);
            }
        }
    }

    /// Drops the recorded frame, e.g. when the dataset is unloaded.
    pub fn reset(&mut self) {
        self.renderer.invalidate();
        self.surface = RecordingSurface::new();
        self.last_stats = None;
        self.render_error = None;
    }

    pub fn primitives(&self) -> &[Primitive] {
        self.surface.primitives()
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn last_stats(&self) -> Option<RenderStats> {
        self.last_stats
    }

    pub fn render_error(&self) -> Option<&str> {
        self.render_error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use circuitview::AttentionEdge;

    fn dataset() -> GraphDataset {
        GraphDataset::new(2, 3).with_edges([AttentionEdge::new((1, 2), (0, 0), 0.5, 0)])
    }

    #[test]
    fn test_refresh_records_frame() {
        let mut canvas = CanvasState::new();
        canvas.refresh(&dataset(), 600, 400, RenderOptions::default());

        assert_eq!(canvas.size(), (600, 400));
        assert_eq!(canvas.primitives().len(), 6 + 6 + 1);
        assert_eq!(canvas.last_stats().map(|s| s.edges_drawn), Some(1));
        assert!(canvas.render_error().is_none());
    }

    #[test]
    fn test_invalid_dataset_clears_frame() {
        let mut canvas = CanvasState::new();
        canvas.refresh(&dataset(), 600, 400, RenderOptions::default());
        canvas.refresh(&GraphDataset::new(2, 0), 600, 400, RenderOptions::default());

        assert!(canvas.primitives().is_empty());
        assert!(canvas.last_stats().is_none());
        assert!(canvas.render_error().unwrap().contains("numTokens"));
    }

    #[test]
    fn test_reset() {
        let mut canvas = CanvasState::new();
        canvas.refresh(&dataset(), 600, 400, RenderOptions::default());
        canvas.reset();
        assert!(canvas.primitives().is_empty());

        // The memo was dropped with the frame, so the same input draws again
        canvas.refresh(&dataset(), 600, 400, RenderOptions::default());
        assert!(!canvas.primitives().is_empty());
    }
}
