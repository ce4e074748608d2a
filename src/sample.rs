//! Synthetic attention datasets for demos and tests.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::dataset::{AttentionEdge, GraphDataset};
use crate::models::ModelPreset;

/// Shape of a generated dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleConfig {
    pub num_layers: i64,
    pub num_heads: i64,
    pub tokens: Vec<String>,
    pub seed: u64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            num_layers: 4,
            num_heads: 2,
            tokens: ["The", "cat", "sat", "down"].iter().map(|s| s.to_string()).collect(),
            seed: 42,
        }
    }
}

impl SampleConfig {
    /// Uses the preset's architecture and its default prompt as tokens.
    pub fn from_preset(preset: &ModelPreset, seed: u64) -> Self {
        Self {
            num_layers: preset.num_layers,
            num_heads: preset.num_heads,
            tokens: preset.default_tokens(),
            seed,
        }
    }
}

/// Generates one causal edge per (layer ≥ 1, head, query token).
///
/// Each edge points from `(layer, s)` to `(layer - 1, d)` with `d <= s` and a
/// weight drawn uniformly from `[0, 1)`. The same config always produces the
/// same dataset.
pub fn generate_dataset(config: &SampleConfig) -> GraphDataset {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let num_tokens = config.tokens.len() as i64;

    let mut edges = Vec::new();
    for layer in 1..config.num_layers {
        for head in 0..config.num_heads {
            for source in 0..num_tokens {
                let dest = rng.gen_range(0..=source);
                let weight: f64 = rng.gen_range(0.0..1.0);
                edges.push(AttentionEdge::new((layer, source), (layer - 1, dest), weight, head));
            }
        }
    }

    let mut dataset = GraphDataset::new(config.num_layers, num_tokens)
        .with_tokens(config.tokens.iter().cloned())
        .with_edges(edges);
    dataset.num_heads = Some(config.num_heads);
    dataset
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::preset;

    #[test]
    fn test_same_seed_same_dataset() {
        let config = SampleConfig::default();
        assert_eq!(generate_dataset(&config), generate_dataset(&config));

        let other = SampleConfig { seed: 7, ..SampleConfig::default() };
        assert_ne!(generate_dataset(&config), generate_dataset(&other));
    }

    #[test]
    fn test_edges_are_causal_and_in_range() {
        let dataset = generate_dataset(&SampleConfig::default());
        assert_eq!(dataset.attention_patterns.len(), 3 * 2 * 4);

        for edge in &dataset.attention_patterns {
            assert_eq!(edge.dest_layer, edge.source_layer - 1);
            assert!(edge.dest_token <= edge.source_token);
            assert!(edge.dest_token >= 0);
            assert!((0.0..1.0).contains(&edge.weight));
            assert!(edge.head < 2);
        }
    }

    #[test]
    fn test_from_preset() {
        let gpt2 = preset("gpt2-small").unwrap();
        let dataset = generate_dataset(&SampleConfig::from_preset(gpt2, 1));
        assert_eq!(dataset.num_layers, 12);
        assert_eq!(dataset.num_heads, Some(12));
        assert_eq!(dataset.num_tokens, gpt2.default_tokens().len() as i64);
        assert_eq!(dataset.tokens.as_ref().map(Vec::len), Some(dataset.num_tokens as usize));
    }

    #[test]
    fn test_single_layer_has_no_edges() {
        let config = SampleConfig { num_layers: 1, ..SampleConfig::default() };
        assert!(generate_dataset(&config).attention_patterns.is_empty());
    }
}
