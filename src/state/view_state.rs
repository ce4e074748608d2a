//! View settings: which edges are shown and how they are colored.

use circuitview::{
    parse_head_list, preset, CircuitStyle, EdgeColoring, EdgeFilter, GraphDataset, HeadBounds,
    HeadGroup, HeadPair, HeadSpecError, RenderOptions,
};
use serde::{Deserialize, Serialize};

/// Edge coloring choice exposed in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ColoringMode {
    #[default]
    Uniform,
    Head,
    Group,
}

impl ColoringMode {
    pub const ALL: [ColoringMode; 3] = [ColoringMode::Uniform, ColoringMode::Head, ColoringMode::Group];

    pub fn label(&self) -> &'static str {
        match self {
            ColoringMode::Uniform => "Uniform",
            ColoringMode::Head => "By head",
            ColoringMode::Group => "By group",
        }
    }
}

/// State of the view controls. Persisted between sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewState {
    /// Minimum edge weight shown (0.0 shows everything)
    pub threshold: f64,
    pub coloring: ColoringMode,
    pub legend: bool,
    /// Model preset the groups were seeded from
    pub preset_name: String,
    /// Active head groups: the preset's groups plus any the user created
    pub groups: Vec<HeadGroup>,
    /// Heads the user picked one by one
    pub selected_heads: Vec<HeadPair>,
    /// Only show edges of selected or grouped heads
    #[serde(alias = "groups_only")]
    pub selected_only: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        let preset_name = "gpt2-small".to_string();
        Self {
            threshold: 0.0,
            coloring: ColoringMode::Uniform,
            legend: false,
            groups: preset_groups(&preset_name),
            preset_name,
            selected_heads: Vec::new(),
            selected_only: false,
        }
    }
}

fn preset_groups(name: &str) -> Vec<HeadGroup> {
    preset(name).map(|p| p.groups.clone()).unwrap_or_default()
}

impl ViewState {
    /// Switches model preset; the groups are reset to the preset's own.
    pub fn select_preset(&mut self, name: &str) {
        if self.preset_name != name {
            self.preset_name = name.to_string();
            self.groups = preset_groups(name);
        }
    }

    /// Bounds for head entry: the loaded dataset's, else the preset architecture.
    pub fn head_bounds(&self, dataset: Option<&GraphDataset>) -> HeadBounds {
        match (dataset, preset(&self.preset_name)) {
            (Some(dataset), _) => HeadBounds::of_dataset(dataset),
            (None, Some(model)) => HeadBounds {
                num_layers: model.num_layers,
                num_heads: Some(model.num_heads),
            },
            (None, None) => HeadBounds { num_layers: 0, num_heads: None },
        }
    }

    /// Adds the heads of a head list like `9.9, 10.:`. Returns how many were new.
    pub fn add_heads(&mut self, spec: &str, bounds: HeadBounds) -> Result<usize, HeadSpecError> {
        let before = self.selected_heads.len();
        for head in parse_head_list(spec, bounds)? {
            if !self.selected_heads.contains(&head) {
                self.selected_heads.push(head);
            }
        }
        Ok(self.selected_heads.len() - before)
    }

    pub fn remove_head(&mut self, head: HeadPair) {
        self.selected_heads.retain(|h| *h != head);
    }

    /// Creates a user group from a name and a head list. Returns the new group id.
    pub fn create_group(
        &mut self,
        name: &str,
        spec: &str,
        bounds: HeadBounds,
        color: Option<String>,
    ) -> Result<usize, String> {
        let name = name.trim();
        if name.is_empty() {
            return Err("Group name cannot be empty".to_string());
        }
        let heads = parse_head_list(spec, bounds).map_err(|e| e.to_string())?;

        // Ids stay stable after removals, so take one past the largest
        let id = self.groups.iter().map(|g| g.id + 1).max().unwrap_or(0);
        self.groups.push(HeadGroup {
            id,
            name: name.to_string(),
            description: None,
            heads,
            color,
        });
        Ok(id)
    }

    pub fn remove_group(&mut self, id: usize) {
        self.groups.retain(|g| g.id != id);
    }

    pub fn set_group_color(&mut self, id: usize, color: String) {
        if let Some(group) = self.groups.iter_mut().find(|g| g.id == id) {
            group.color = Some(color);
        }
    }

    /// Selected heads followed by every grouped head.
    pub fn visible_heads(&self) -> impl Iterator<Item = HeadPair> + '_ {
        self.selected_heads
            .iter()
            .copied()
            .chain(self.groups.iter().flat_map(|g| g.heads.iter().copied()))
    }

    /// Builds the renderer configuration for the current controls.
    pub fn render_options(&self, style: CircuitStyle) -> RenderOptions {
        let mut filter = EdgeFilter::with_threshold(self.threshold);
        if self.selected_only {
            filter = filter.with_visible_heads(self.visible_heads());
        }

        let coloring = match self.coloring {
            ColoringMode::Uniform => EdgeColoring::Uniform,
            ColoringMode::Head => EdgeColoring::ByHead,
            ColoringMode::Group => EdgeColoring::ByGroup(self.groups.clone()),
        };

        RenderOptions {
            filter,
            coloring,
            legend: self.legend,
            individual_heads: self.selected_heads.clone(),
            style,
            ..Default::default()
        }
    }
}

/// Transient text inputs of the head and group editors.
#[derive(Debug, Default)]
pub struct HeadEditor {
    pub head_input: String,
    pub group_name: String,
    pub group_heads: String,
    pub error: Option<String>,
}
