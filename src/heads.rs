//! Attention-head groups, edge filtering and edge coloring.
//!
//! An edge belongs to the head `(sourceLayer, head)`. Groups collect heads that
//! play one role in a circuit (e.g. "Name Mover") and give them a shared color.

use std::collections::HashSet;

use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::dataset::{AttentionEdge, GraphDataset};
use crate::error::HeadSpecError;
use crate::theme::hex_to_color32;

/// Identifies one attention head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HeadPair {
    pub layer: i64,
    pub head: i64,
}

impl HeadPair {
    pub const fn new(layer: i64, head: i64) -> Self {
        Self { layer, head }
    }

    /// Head that produced an edge.
    pub fn of_edge(edge: &AttentionEdge) -> Self {
        Self::new(edge.source_layer, edge.head)
    }
}

/// Layer and head counts that head lists are checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadBounds {
    pub num_layers: i64,
    /// `None` when the dataset does not record its head count
    pub num_heads: Option<i64>,
}

impl HeadBounds {
    /// Bounds of a dataset; without `numHeads` the head count is inferred from
    /// the largest head index on any edge.
    pub fn of_dataset(dataset: &GraphDataset) -> Self {
        Self {
            num_layers: dataset.num_layers,
            num_heads: dataset
                .num_heads
                .or_else(|| dataset.max_head().and_then(|h| h.checked_add(1))),
        }
    }
}

/// Parses a head list such as `9.9, 10.0 :.3`.
///
/// Entries are separated by commas or whitespace. Each entry is
/// `layer.head`, where either side may be `:` to select every layer or every
/// head. Duplicates are dropped and the first occurrence keeps its place.
pub fn parse_head_list(spec: &str, bounds: HeadBounds) -> Result<Vec<HeadPair>, HeadSpecError> {
    let mut heads = Vec::new();
    let mut seen = HashSet::new();

    for entry in spec.split(|c: char| c == ',' || c.is_whitespace()) {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        for head in parse_head_entry(entry, bounds)? {
            if seen.insert(head) {
                heads.push(head);
            }
        }
    }
    Ok(heads)
}

fn parse_head_entry(entry: &str, bounds: HeadBounds) -> Result<Vec<HeadPair>, HeadSpecError> {
    let format_err = || HeadSpecError::Format(entry.to_string());
    let (layer_part, head_part) = entry.split_once('.').ok_or_else(format_err)?;

    let layers: Vec<i64> = match layer_part.trim() {
        ":" => (0..bounds.num_layers.max(0)).collect(),
        text => {
            let layer: i64 = text.parse().map_err(|_| format_err())?;
            if !(0..bounds.num_layers).contains(&layer) {
                return Err(HeadSpecError::LayerOutOfRange { layer, num_layers: bounds.num_layers });
            }
            vec![layer]
        }
    };

    let heads: Vec<i64> = match head_part.trim() {
        ":" => {
            let num_heads = bounds
                .num_heads
                .ok_or_else(|| HeadSpecError::UnknownHeadCount(entry.to_string()))?;
            (0..num_heads.max(0)).collect()
        }
        text => {
            let head: i64 = text.parse().map_err(|_| format_err())?;
            match bounds.num_heads {
                Some(num_heads) if !(0..num_heads).contains(&head) => {
                    return Err(HeadSpecError::HeadOutOfRange { head, num_heads });
                }
                None if head < 0 => {
                    return Err(HeadSpecError::HeadOutOfRange { head, num_heads: 0 });
                }
                _ => {}
            }
            vec![head]
        }
    };

    Ok(layers
        .iter()
        .flat_map(|&layer| heads.iter().map(move |&head| HeadPair::new(layer, head)))
        .collect())
}

/// Named set of heads drawn in a shared color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadGroup {
    pub id: usize,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub heads: Vec<HeadPair>,
    /// Custom `#rrggbb` color; the palette entry for `id` is used when absent
    #[serde(default)]
    pub color: Option<String>,
}

impl HeadGroup {
    pub fn contains(&self, head: HeadPair) -> bool {
        self.heads.contains(&head)
    }

    pub fn resolved_color(&self, palette: &[Color32]) -> Color32 {
        match &self.color {
            Some(hex) => hex_to_color32(hex),
            None => palette_color(palette, self.id as i64),
        }
    }
}

/// Decides which edges take part in a render pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeFilter {
    /// Edges with a smaller weight are filtered out
    pub threshold: f64,
    /// When set, only edges produced by one of these heads pass
    pub visible_heads: Option<HashSet<HeadPair>>,
}

impl EdgeFilter {
    pub fn with_threshold(threshold: f64) -> Self {
        Self { threshold, visible_heads: None }
    }

    pub fn with_visible_heads(mut self, heads: impl IntoIterator<Item = HeadPair>) -> Self {
        self.visible_heads = Some(heads.into_iter().collect());
        self
    }

    pub fn accepts(&self, edge: &AttentionEdge) -> bool {
        if edge.weight < self.threshold {
            return false;
        }
        match &self.visible_heads {
            Some(heads) => heads.contains(&HeadPair::of_edge(edge)),
            None => true,
        }
    }
}

/// How edge stroke colors are chosen.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum EdgeColoring {
    /// Every edge uses the style's edge color
    #[default]
    Uniform,
    /// Palette entry indexed by head number
    ByHead,
    /// Group color for grouped heads, per-head palette otherwise
    ByGroup(Vec<HeadGroup>),
}

impl EdgeColoring {
    pub fn color_for(&self, edge: &AttentionEdge, uniform: Color32, palette: &[Color32]) -> Color32 {
        match self {
            EdgeColoring::Uniform => uniform,
            EdgeColoring::ByHead => palette_color(palette, edge.head),
            EdgeColoring::ByGroup(groups) => {
                let head = HeadPair::of_edge(edge);
                groups
                    .iter()
                    .find(|g| g.contains(head))
                    .map(|g| g.resolved_color(palette))
                    .unwrap_or_else(|| palette_color(palette, edge.head))
            }
        }
    }

    pub fn groups(&self) -> &[HeadGroup] {
        match self {
            EdgeColoring::ByGroup(groups) => groups,
            _ => &[],
        }
    }
}

/// Palette lookup that wraps around and tolerates negative indices.
pub fn palette_color(palette: &[Color32], index: i64) -> Color32 {
    if palette.is_empty() {
        return Color32::GRAY;
    }
    palette[index.rem_euclid(palette.len() as i64) as usize]
}
