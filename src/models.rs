//! Built-in model presets: architecture sizes, default prompts and the
//! attention-head groups known from circuit analyses of each model.

use once_cell::sync::Lazy;

use crate::heads::{HeadGroup, HeadPair};

/// Static description of a supported model.
#[derive(Debug, Clone)]
pub struct ModelPreset {
    pub name: &'static str,
    pub num_layers: i64,
    pub num_heads: i64,
    pub default_text: &'static str,
    pub groups: Vec<HeadGroup>,
}

impl ModelPreset {
    /// Default prompt split on whitespace.
    pub fn default_tokens(&self) -> Vec<String> {
        self.default_text.split_whitespace().map(str::to_string).collect()
    }
}

// (name, description, [layer, head] vertices)
type GroupTable = &'static [(&'static str, &'static str, &'static [[i64; 2]])];

const GPT2_GROUPS: GroupTable = &[
    (
        "Name Mover",
        "Attend to names and copy them to output. Active at END token position.",
        &[[9, 9], [10, 0], [9, 6]],
    ),
    (
        "Negative",
        "Write in opposite direction of Name Movers, decreasing prediction confidence.",
        &[[10, 7], [11, 10]],
    ),
    (
        "S Inhibition",
        "Reduce Name Mover Heads' attention to subject tokens. Attend to S2 and modify query patterns.",
        &[[8, 10], [7, 9], [8, 6], [7, 3]],
    ),
    (
        "Induction",
        "Recognize [A][B]...[A] patterns to detect duplicated tokens via different mechanism.",
        &[[5, 5], [5, 9], [6, 9], [5, 8]],
    ),
    (
        "Duplicate Token",
        "Identify repeated tokens. Active at S2, attend to S1, signal token duplication.",
        &[[0, 1], [0, 10], [3, 0]],
    ),
    (
        "Previous Token",
        "Copy subject information to the token after S1. Support Induction Heads.",
        &[[4, 11], [2, 2]],
    ),
    (
        "Backup Name Mover",
        "Normally inactive but replace Name Movers if they're disabled. Show circuit redundancy.",
        &[[11, 2], [10, 6], [10, 10], [10, 2], [9, 7], [10, 1], [11, 9], [9, 0]],
    ),
];

const PYTHIA_GROUPS: GroupTable = &[
    (
        "Subject Heads",
        "Attend to subject tokens and extract their attributes. May activate even when irrelevant to the query.",
        &[[17, 2], [16, 12], [21, 9], [16, 20], [22, 17], [18, 14]],
    ),
    (
        "Relation Heads",
        "Focus on relation tokens and boost possible answers for that relation type. Operate independently of subjects.",
        &[[13, 31], [18, 20], [14, 24], [21, 18]],
    ),
    (
        "Mixed Heads",
        "Attend to both subject and relation tokens. Extract correct attributes more effectively through \"subject to relation propagation.\"",
        &[[17, 17], [21, 23], [23, 22], [26, 8], [22, 15], [17, 30], [18, 25]],
    ),
];

fn build_groups(table: GroupTable) -> Vec<HeadGroup> {
    table
        .iter()
        .enumerate()
        .map(|(id, (name, description, vertices))| HeadGroup {
            id,
            name: name.to_string(),
            description: Some(description.to_string()),
            heads: vertices.iter().map(|[l, h]| HeadPair::new(*l, *h)).collect(),
            color: None,
        })
        .collect()
}

static PRESETS: Lazy<Vec<ModelPreset>> = Lazy::new(|| {
    vec![
        ModelPreset {
            name: "gpt2-small",
            num_layers: 12,
            num_heads: 12,
            default_text: "When Mary and John went the store, John gave a drink to",
            groups: build_groups(GPT2_GROUPS),
        },
        ModelPreset {
            name: "pythia-2.8b",
            num_layers: 32,
            num_heads: 32,
            default_text: "The quick brown fox jumps over the lazy dog",
            groups: build_groups(PYTHIA_GROUPS),
        },
    ]
});

/// All presets in display order.
pub fn presets() -> &'static [ModelPreset] {
    &PRESETS
}

pub fn preset(name: &str) -> Option<&'static ModelPreset> {
    PRESETS.iter().find(|p| p.name == name)
}
