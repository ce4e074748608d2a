//! Grid layout for the circuit view.
//!
//! Maps abstract `(layer, token)` coordinates to pixel coordinates inside the
//! canvas' inner rectangle with two independent linear scales. Tokens run along
//! the horizontal axis, layers along the vertical axis.

use std::collections::HashMap;

use egui::Pos2;

use crate::error::{CircuitError, Result};

/// Largest node grid a render pass will lay out.
pub const MAX_GRID_NODES: usize = 1_000_000;

/// Space reserved around the drawable inner rectangle, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Margins {
    pub const fn uniform(value: f32) -> Self {
        Self { top: value, right: value, bottom: value, left: value }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(20.0)
    }
}

/// Linear map from an index domain `[0, count - 1]` onto `[0, extent]`.
///
/// A single-point domain (`count == 1`) maps its only value to the range
/// start instead of dividing by zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_max: f32,
    extent: f32,
}

impl LinearScale {
    pub fn new(count: usize, extent: f32) -> Self {
        Self {
            domain_max: count.saturating_sub(1) as f32,
            extent,
        }
    }

    pub fn map(&self, index: usize) -> f32 {
        if self.domain_max == 0.0 {
            return 0.0;
        }
        index as f32 / self.domain_max * self.extent
    }
}

/// One laid-out grid position.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub layer: usize,
    pub token: usize,
    /// Horizontal position inside the inner rectangle
    pub x: f32,
    /// Vertical position inside the inner rectangle
    pub y: f32,
    pub label: String,
}

impl Node {
    /// Absolute canvas position, shifted by the left/top margins.
    pub fn canvas_pos(&self, margins: &Margins) -> Pos2 {
        Pos2::new(margins.left + self.x, margins.top + self.y)
    }
}

/// Computes the full node grid in row-major order (layers outer, tokens inner).
///
/// `tokens`, when present, must hold a label for every token column; the
/// synthesized `T<index>` fallback only applies when it is absent.
pub fn compute_layout(
    num_layers: i64,
    num_tokens: i64,
    tokens: Option<&[String]>,
    width: u32,
    height: u32,
    margins: &Margins,
) -> Result<Vec<Node>> {
    if num_layers <= 0 {
        return Err(CircuitError::NonPositiveLayers(num_layers));
    }
    if num_tokens <= 0 {
        return Err(CircuitError::NonPositiveTokens(num_tokens));
    }
    if width == 0 || height == 0 {
        return Err(CircuitError::InvalidCanvas { width, height });
    }

    let too_large = CircuitError::GridTooLarge {
        layers: num_layers,
        tokens: num_tokens,
        max: MAX_GRID_NODES,
    };
    let (Ok(num_layers), Ok(num_tokens)) = (usize::try_from(num_layers), usize::try_from(num_tokens)) else {
        return Err(too_large);
    };
    match num_layers.checked_mul(num_tokens) {
        Some(count) if count <= MAX_GRID_NODES => {}
        _ => return Err(too_large),
    }

    if let Some(labels) = tokens {
        if labels.len() < num_tokens {
            return Err(CircuitError::TokenLabelOutOfRange {
                index: labels.len(),
                len: labels.len(),
            });
        }
    }

    let inner_width = width as f32 - margins.left - margins.right;
    let inner_height = height as f32 - margins.top - margins.bottom;
    let token_scale = LinearScale::new(num_tokens, inner_width);
    let layer_scale = LinearScale::new(num_layers, inner_height);

    let mut nodes = Vec::with_capacity(num_layers * num_tokens);
    for layer in 0..num_layers {
        let y = layer_scale.map(layer);
        for token in 0..num_tokens {
            nodes.push(Node {
                layer,
                token,
                x: token_scale.map(token),
                y,
                label: token_label(tokens, token),
            });
        }
    }
    Ok(nodes)
}

fn token_label(tokens: Option<&[String]>, token: usize) -> String {
    match tokens {
        Some(labels) => labels[token].clone(),
        None => format!("T{}", token),
    }
}

/// Composite-key lookup over a node set, built once per render pass.
pub struct NodeIndex<'a> {
    nodes: &'a [Node],
    by_key: HashMap<(usize, usize), usize>,
}

impl<'a> NodeIndex<'a> {
    pub fn new(nodes: &'a [Node]) -> Self {
        let by_key = nodes
            .iter()
            .enumerate()
            .map(|(i, node)| ((node.layer, node.token), i))
            .collect();
        Self { nodes, by_key }
    }

    /// Resolves a signed `(layer, token)` pair; negative indices never match.
    pub fn get(&self, layer: i64, token: i64) -> Option<&'a Node> {
        let layer = usize::try_from(layer).ok()?;
        let token = usize::try_from(token).ok()?;
        self.by_key.get(&(layer, token)).map(|&i| &self.nodes[i])
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_full_grid_with_unique_keys() {
        for (layers, tokens) in [(1, 1), (1, 7), (4, 1), (3, 5), (12, 9)] {
            let nodes = compute_layout(layers, tokens, None, 640, 480, &Margins::default()).unwrap();
            assert_eq!(nodes.len(), (layers * tokens) as usize);

            let keys: HashSet<_> = nodes.iter().map(|n| (n.layer, n.token)).collect();
            assert_eq!(keys.len(), nodes.len());
            for l in 0..layers as usize {
                for t in 0..tokens as usize {
                    assert!(keys.contains(&(l, t)));
                }
            }
        }
    }

    #[test]
    fn test_row_major_order() {
        let nodes = compute_layout(2, 3, None, 300, 200, &Margins::default()).unwrap();
        let order: Vec<_> = nodes.iter().map(|n| (n.layer, n.token)).collect();
        assert_eq!(order, vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)]);
    }

    #[test]
    fn test_scales_span_inner_rect() {
        let nodes = compute_layout(2, 2, None, 300, 200, &Margins::default()).unwrap();
        let corners: Vec<_> = nodes.iter().map(|n| (n.x, n.y)).collect();
        assert_eq!(corners, vec![(0.0, 0.0), (260.0, 0.0), (0.0, 160.0), (260.0, 160.0)]);
    }

    #[test]
    fn test_single_token_collapses_to_range_start() {
        for width in [50, 300, 4096] {
            let nodes = compute_layout(3, 1, None, width, 200, &Margins::default()).unwrap();
            assert!(nodes.iter().all(|n| n.x == 0.0));
        }
    }

    #[test]
    fn test_single_layer_collapses_to_range_start() {
        let nodes = compute_layout(1, 4, None, 300, 999, &Margins::default()).unwrap();
        assert!(nodes.iter().all(|n| n.y == 0.0));
    }

    #[test]
    fn test_labels_from_tokens_and_fallback() {
        let tokens = labels(&["The", "cat"]);
        let nodes = compute_layout(1, 2, Some(&tokens), 300, 200, &Margins::default()).unwrap();
        assert_eq!(nodes[0].label, "The");
        assert_eq!(nodes[1].label, "cat");

        let nodes = compute_layout(1, 3, None, 300, 200, &Margins::default()).unwrap();
        let names: Vec<_> = nodes.iter().map(|n| n.label.as_str()).collect();
        assert_eq!(names, vec!["T0", "T1", "T2"]);
    }

    #[test]
    fn test_short_token_labels_rejected() {
        let tokens = labels(&["only"]);
        let err = compute_layout(1, 3, Some(&tokens), 300, 200, &Margins::default()).unwrap_err();
        assert_eq!(err, CircuitError::TokenLabelOutOfRange { index: 1, len: 1 });
        assert!(err.is_invalid_dataset());
    }

    #[test]
    fn test_non_positive_counts_rejected() {
        let m = Margins::default();
        assert_eq!(compute_layout(0, 3, None, 300, 200, &m), Err(CircuitError::NonPositiveLayers(0)));
        assert_eq!(compute_layout(2, -4, None, 300, 200, &m), Err(CircuitError::NonPositiveTokens(-4)));
        assert_eq!(
            compute_layout(2, 2, None, 0, 200, &m),
            Err(CircuitError::InvalidCanvas { width: 0, height: 200 })
        );
    }

    #[test]
    fn test_oversized_grid_rejected_before_allocating() {
        let m = Margins::default();
        let huge = 5_000_000_000;
        assert_eq!(
            compute_layout(huge, huge, None, 300, 200, &m),
            Err(CircuitError::GridTooLarge { layers: huge, tokens: huge, max: MAX_GRID_NODES })
        );
        assert!(matches!(
            compute_layout(100_000, 100_000, None, 300, 200, &m),
            Err(CircuitError::GridTooLarge { .. })
        ));
        assert!(matches!(
            compute_layout(i64::MAX, 2, None, 300, 200, &m),
            Err(CircuitError::GridTooLarge { .. })
        ));

        // Exactly at the cap is still laid out
        let nodes = compute_layout(1, MAX_GRID_NODES as i64, None, 300, 200, &m).unwrap();
        assert_eq!(nodes.len(), MAX_GRID_NODES);
    }

    #[test]
    fn test_node_index_resolution() {
        let nodes = compute_layout(2, 2, None, 300, 200, &Margins::default()).unwrap();
        let index = NodeIndex::new(&nodes);
        assert_eq!(index.len(), 4);
        assert_eq!(index.get(1, 0).map(|n| (n.layer, n.token)), Some((1, 0)));
        assert!(index.get(2, 0).is_none());
        assert!(index.get(0, -1).is_none());
    }

    #[test]
    fn test_canvas_pos_applies_margins() {
        let margins = Margins { top: 5.0, right: 0.0, bottom: 0.0, left: 7.0 };
        let node = Node { layer: 0, token: 0, x: 10.0, y: 20.0, label: "T0".into() };
        assert_eq!(node.canvas_pos(&margins), Pos2::new(17.0, 25.0));
    }
}
