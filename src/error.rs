use thiserror::Error;

/// Errors that make a render pass fail as a whole.
///
/// Edges whose endpoints fall outside the grid are not errors; they are
/// skipped and counted in [`crate::RenderStats`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CircuitError {
    /// `numLayers` was zero or negative.
    #[error("invalid dataset: numLayers must be positive, got {0}")]
    NonPositiveLayers(i64),

    /// `numTokens` was zero or negative.
    #[error("invalid dataset: numTokens must be positive, got {0}")]
    NonPositiveTokens(i64),

    /// `tokens` is present but shorter than `numTokens`.
    #[error("invalid dataset: token label index {index} out of range for {len} labels")]
    TokenLabelOutOfRange { index: usize, len: usize },

    /// `numLayers × numTokens` exceeds the node cap (or overflows).
    #[error("invalid dataset: {layers}x{tokens} grid exceeds the {max} node limit")]
    GridTooLarge { layers: i64, tokens: i64, max: usize },

    /// Canvas with a zero dimension.
    #[error("invalid canvas size {width}x{height}")]
    InvalidCanvas { width: u32, height: u32 },
}

impl CircuitError {
    /// True for the errors caused by the dataset itself rather than the canvas.
    pub fn is_invalid_dataset(&self) -> bool {
        !matches!(self, CircuitError::InvalidCanvas { .. })
    }
}

pub type Result<T> = std::result::Result<T, CircuitError>;

/// Errors from parsing a user-entered head list such as `9.9, 10.:`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HeadSpecError {
    /// Entry is not `layer.head` with integers or `:` wildcards.
    #[error("invalid head '{0}': expected layer.head, e.g. 9.9, 10.: or :.3")]
    Format(String),

    #[error("layer {layer} out of range: must be between 0 and {}", .num_layers - 1)]
    LayerOutOfRange { layer: i64, num_layers: i64 },

    #[error("head {head} out of range: must be between 0 and {}", .num_heads - 1)]
    HeadOutOfRange { head: i64, num_heads: i64 },

    /// A head wildcard was used but the dataset does not say how many heads it has.
    #[error("'{0}' needs the number of heads, which the dataset does not provide")]
    UnknownHeadCount(String),
}
