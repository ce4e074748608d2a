//! Attention-pattern dataset model and file loading.
//!
//! Datasets are plain JSON documents with camelCase field names:
//!
//! ```json
//! {
//!   "numLayers": 2,
//!   "numTokens": 2,
//!   "tokens": ["The", "cat"],
//!   "attentionPatterns": [
//!     {"sourceLayer": 1, "sourceToken": 1, "destLayer": 0, "destToken": 0, "weight": 0.8, "head": 0}
//!   ]
//! }
//! ```
//!
//! Files whose name ends in `.br` are brotli-compressed JSON.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};
use brotli::Decompressor;
use serde::{Deserialize, Serialize};

/// One directed attention edge between two (layer, token) positions.
///
/// Indices are signed so that malformed data still decodes; edges that point
/// outside the grid are skipped at render time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttentionEdge {
    pub source_layer: i64,
    pub source_token: i64,
    pub dest_layer: i64,
    pub dest_token: i64,
    pub weight: f64,
    pub head: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head_type: Option<String>,
}

impl AttentionEdge {
    pub fn new(
        source: (i64, i64),
        dest: (i64, i64),
        weight: f64,
        head: i64,
    ) -> Self {
        Self {
            source_layer: source.0,
            source_token: source.1,
            dest_layer: dest.0,
            dest_token: dest.1,
            weight,
            head,
            head_type: None,
        }
    }
}

/// Input of a render pass. Owned by the host and treated as read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphDataset {
    pub num_layers: i64,
    pub num_tokens: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_heads: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens: Option<Vec<String>>,
    #[serde(default)]
    pub attention_patterns: Vec<AttentionEdge>,
}

impl GraphDataset {
    /// Creates a dataset without token labels or edges.
    pub fn new(num_layers: i64, num_tokens: i64) -> Self {
        Self {
            num_layers,
            num_tokens,
            num_heads: None,
            tokens: None,
            attention_patterns: Vec::new(),
        }
    }

    pub fn with_tokens<S: Into<String>>(mut self, tokens: impl IntoIterator<Item = S>) -> Self {
        self.tokens = Some(tokens.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_edges(mut self, edges: impl IntoIterator<Item = AttentionEdge>) -> Self {
        self.attention_patterns.extend(edges);
        self
    }

    /// Parses a dataset from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse attention dataset JSON")
    }

    /// Serializes the dataset as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize attention dataset")
    }

    /// Largest head index referenced by any edge, used when `numHeads` is absent.
    pub fn max_head(&self) -> Option<i64> {
        self.attention_patterns.iter().map(|e| e.head).max()
    }
}

/// Loads a dataset from disk, decompressing `.br` files on the fly.
pub fn load_dataset(path: impl AsRef<Path>) -> Result<GraphDataset> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open dataset: {}", path.display()))?;

    let mut reader: Box<dyn Read> = if is_brotli_path(path) {
        Box::new(Decompressor::new(BufReader::new(file), 4096))
    } else {
        Box::new(BufReader::new(file))
    };

    let mut json = String::new();
    reader
        .read_to_string(&mut json)
        .with_context(|| format!("Failed to read dataset: {}", path.display()))?;

    let dataset = GraphDataset::from_json_str(&json)
        .with_context(|| format!("Invalid dataset file: {}", path.display()))?;

    log::info!(
        "Loaded dataset {}: {} layers, {} tokens, {} edges",
        path.display(),
        dataset.num_layers,
        dataset.num_tokens,
        dataset.attention_patterns.len()
    );
    Ok(dataset)
}

pub(crate) fn is_brotli_path(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some("br")
}
