pub mod error;
pub mod dataset;
pub mod layout;
pub mod surface;
pub mod svg;
pub mod renderer;
pub mod heads;
pub mod models;
pub mod sample;
pub mod writer;
pub mod theme;

// Export error type
pub use error::{CircuitError, HeadSpecError};

// Export data model
pub use dataset::{GraphDataset, AttentionEdge, load_dataset};

// Export layout engine
pub use layout::{Margins, LinearScale, Node, NodeIndex, compute_layout, MAX_GRID_NODES};

// Export surfaces
pub use surface::{DrawSurface, Primitive, RecordingSurface, TextAnchor};
pub use svg::SvgSurface;

// Export renderer
pub use renderer::{
    CircuitRenderer, CircuitStyle, RenderOptions, RenderOutcome, RenderStats,
    draw_circuit, edge_opacity
};

// Export head groups and presets
pub use heads::{HeadPair, HeadGroup, HeadBounds, EdgeFilter, EdgeColoring, parse_head_list, palette_color};
pub use models::{ModelPreset, preset, presets};

// Export sample generation and writer
pub use sample::{SampleConfig, generate_dataset};
pub use writer::DatasetWriter;

// Export theme support
pub use theme::{Theme, ThemeColors, ThemeManager, hex_to_color32, color32_to_hex};
