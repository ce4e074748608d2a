//! Full-replace draw cycle for the circuit view.
//!
//! One pass lays out the grid, clears the surface, and draws node markers,
//! node labels and attention edges, in that order. Edges go last so they sit
//! on top of the markers; among themselves they keep input order.

use egui::{Color32, Pos2, Vec2};

use crate::dataset::{AttentionEdge, GraphDataset};
use crate::error::Result;
use crate::heads::{palette_color, EdgeColoring, EdgeFilter, HeadPair};
use crate::layout::{compute_layout, Margins, NodeIndex};
use crate::surface::{DrawSurface, Primitive, TextAnchor};
use crate::theme::{Theme, ThemeManager, DEFAULT_THEME};

const LEGEND_WIDTH: f32 = 160.0;
const LEGEND_ROW_HEIGHT: f32 = 20.0;
const LEGEND_SWATCH: f32 = 12.0;

/// Colors used by a render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct CircuitStyle {
    pub node_fill: Color32,
    pub label_color: Color32,
    pub edge_color: Color32,
    pub head_palette: Vec<Color32>,
}

impl CircuitStyle {
    pub fn from_theme(theme: &Theme) -> Self {
        let colors = &theme.colors;
        Self {
            node_fill: colors.node_fill,
            label_color: colors.label_text,
            edge_color: colors.edge_stroke,
            head_palette: colors.head_palette.clone(),
        }
    }
}

impl Default for CircuitStyle {
    fn default() -> Self {
        Self::from_theme(ThemeManager::new().theme_or_default(DEFAULT_THEME))
    }
}

/// Geometry and encoding settings of a render pass.
///
/// The defaults draw 5px markers, 12px labels 10px above them, and edges
/// `2 × weight` wide with every edge passing and a single stroke color.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub margins: Margins,
    pub node_radius: f32,
    pub label_offset: f32,
    pub font_size: f32,
    pub edge_width_scale: f32,
    pub filter: EdgeFilter,
    pub coloring: EdgeColoring,
    /// Draws a legend in the top-right corner: one row per group, then the
    /// individually selected heads that belong to no group
    pub legend: bool,
    /// Heads the user picked one by one, listed in the legend
    pub individual_heads: Vec<HeadPair>,
    pub style: CircuitStyle,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            margins: Margins::default(),
            node_radius: 5.0,
            label_offset: 10.0,
            font_size: 12.0,
            edge_width_scale: 2.0,
            filter: EdgeFilter::default(),
            coloring: EdgeColoring::Uniform,
            legend: false,
            individual_heads: Vec::new(),
            style: CircuitStyle::default(),
        }
    }
}

/// Counters for one completed pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub nodes: usize,
    pub edges_drawn: usize,
    /// Edges with an endpoint outside the grid
    pub edges_skipped: usize,
    /// Edges rejected by the [`EdgeFilter`]
    pub edges_filtered: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    Drawn(RenderStats),
    /// Input identical to the previous successful pass; surface untouched
    Unchanged,
}

/// Opacity of an edge: its weight clamped to `[0, 1]`, NaN treated as 0.
pub fn edge_opacity(weight: f64) -> f32 {
    if weight.is_nan() {
        0.0
    } else {
        weight.clamp(0.0, 1.0) as f32
    }
}

/// Draws one complete frame.
///
/// All fallible work happens before the surface is cleared, so on error the
/// surface still holds the previous frame untouched.
pub fn draw_circuit(
    surface: &mut dyn DrawSurface,
    dataset: &GraphDataset,
    width: u32,
    height: u32,
    options: &RenderOptions,
) -> Result<RenderStats> {
    let nodes = compute_layout(
        dataset.num_layers,
        dataset.num_tokens,
        dataset.tokens.as_deref(),
        width,
        height,
        &options.margins,
    )?;
    let index = NodeIndex::new(&nodes);
    let style = &options.style;
    let margins = &options.margins;

    surface.clear();

    for node in &nodes {
        surface.draw(Primitive::Circle {
            center: node.canvas_pos(margins),
            radius: options.node_radius,
            fill: style.node_fill,
        });
    }

    for node in &nodes {
        let pos = node.canvas_pos(margins);
        surface.draw(Primitive::Text {
            pos: Pos2::new(pos.x, pos.y - options.label_offset),
            text: format!("L{}-{}", node.layer, node.label),
            font_size: options.font_size,
            anchor: TextAnchor::Middle,
            color: style.label_color,
        });
    }

    let mut stats = RenderStats {
        nodes: index.len(),
        ..Default::default()
    };

    for edge in &dataset.attention_patterns {
        if !options.filter.accepts(edge) {
            stats.edges_filtered += 1;
            continue;
        }

        let (Some(source), Some(target)) = (
            index.get(edge.source_layer, edge.source_token),
            index.get(edge.dest_layer, edge.dest_token),
        ) else {
            log::debug!("Skipping edge with unresolved endpoint: {:?}", edge);
            stats.edges_skipped += 1;
            continue;
        };

        surface.draw(edge_primitive(
            edge,
            source.canvas_pos(margins),
            target.canvas_pos(margins),
            options,
        ));
        stats.edges_drawn += 1;
    }

    if options.legend {
        draw_legend(surface, width, options);
    }

    log::debug!(
        "Rendered {}x{} circuit: {} nodes, {} edges drawn, {} skipped, {} filtered",
        width,
        height,
        stats.nodes,
        stats.edges_drawn,
        stats.edges_skipped,
        stats.edges_filtered
    );
    Ok(stats)
}

fn edge_primitive(edge: &AttentionEdge, from: Pos2, to: Pos2, options: &RenderOptions) -> Primitive {
    let style = &options.style;
    Primitive::Line {
        from,
        to,
        stroke_width: (edge.weight * options.edge_width_scale as f64) as f32,
        opacity: edge_opacity(edge.weight),
        color: options
            .coloring
            .color_for(edge, style.edge_color, &style.head_palette),
    }
}

fn draw_legend(surface: &mut dyn DrawSurface, width: u32, options: &RenderOptions) {
    if matches!(options.coloring, EdgeColoring::Uniform) {
        return;
    }

    let groups = options.coloring.groups();
    let style = &options.style;
    let left = width as f32 - LEGEND_WIDTH;
    let top = options.margins.top;
    let mut row = 0usize;

    let legend_row = |surface: &mut dyn DrawSurface, row: usize, fill: Option<Color32>, text: String| {
        let y = top + row as f32 * LEGEND_ROW_HEIGHT;
        let text_x = match fill {
            Some(fill) => {
                surface.draw(Primitive::Rect {
                    min: Pos2::new(left, y),
                    size: Vec2::splat(LEGEND_SWATCH),
                    fill,
                });
                left + LEGEND_SWATCH + 6.0
            }
            None => left,
        };
        surface.draw(Primitive::Text {
            pos: Pos2::new(text_x, y + LEGEND_SWATCH - 1.0),
            text,
            font_size: options.font_size,
            anchor: TextAnchor::Start,
            color: style.label_color,
        });
    };

    for group in groups {
        legend_row(&mut *surface, row, Some(group.resolved_color(&style.head_palette)), group.name.clone());
        row += 1;
    }

    let ungrouped: Vec<&HeadPair> = options
        .individual_heads
        .iter()
        .filter(|head| !groups.iter().any(|g| g.contains(**head)))
        .collect();
    if ungrouped.is_empty() {
        return;
    }

    // Header row of the individual heads section
    legend_row(&mut *surface, row, None, "Individual Heads".to_string());
    row += 1;
    for head in ungrouped {
        legend_row(
            &mut *surface,
            row,
            Some(palette_color(&style.head_palette, head.head)),
            format!("Layer {}, Head {}", head.layer, head.head),
        );
        row += 1;
    }
}

/// Redraws a surface whenever its input changes.
///
/// The host calls [`CircuitRenderer::render`] as often as it likes (on mount,
/// on data arrival, every GUI frame); a full pass only happens when the
/// dataset or the canvas size differs from the last successful pass.
pub struct CircuitRenderer {
    options: RenderOptions,
    last_input: Option<(GraphDataset, u32, u32)>,
}

impl Default for CircuitRenderer {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}

impl CircuitRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            last_input: None,
        }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Replaces the options; the next call to `render` redraws.
    pub fn set_options(&mut self, options: RenderOptions) {
        if options != self.options {
            self.options = options;
            self.invalidate();
        }
    }

    /// Forgets the previous input so the next call redraws unconditionally.
    pub fn invalidate(&mut self) {
        self.last_input = None;
    }

    /// Draws `dataset` onto `surface` unless the input is unchanged.
    ///
    /// On error the surface is cleared, so the host shows no graph rather than
    /// a stale or partial one.
    pub fn render(
        &mut self,
        surface: &mut dyn DrawSurface,
        dataset: &GraphDataset,
        width: u32,
        height: u32,
    ) -> Result<RenderOutcome> {
        if let Some((last, w, h)) = &self.last_input {
            if *w == width && *h == height && last == dataset {
                return Ok(RenderOutcome::Unchanged);
            }
        }

        match draw_circuit(surface, dataset, width, height, &self.options) {
            Ok(stats) => {
                self.last_input = Some((dataset.clone(), width, height));
                Ok(RenderOutcome::Drawn(stats))
            }
            Err(e) => {
                surface.clear();
                self.last_input = None;
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CircuitError;
    use crate::heads::HeadGroup;
    use crate::surface::RecordingSurface;

    fn cat_dataset() -> GraphDataset {
        GraphDataset::new(2, 2)
            .with_tokens(["The", "cat"])
            .with_edges([AttentionEdge::new((1, 1), (0, 0), 0.8, 0)])
    }

    fn lines(surface: &RecordingSurface) -> Vec<(Pos2, Pos2, f32, f32)> {
        surface
            .lines()
            .map(|p| match p {
                Primitive::Line { from, to, stroke_width, opacity, .. } => (*from, *to, *stroke_width, *opacity),
                _ => unreachable!(),
            })
            .collect()
    }

    #[test]
    fn test_draw_order_nodes_labels_edges() {
        let mut surface = RecordingSurface::new();
        draw_circuit(&mut surface, &cat_dataset(), 300, 200, &RenderOptions::default()).unwrap();

        let kinds: Vec<_> = surface
            .primitives()
            .iter()
            .map(|p| match p {
                Primitive::Circle { .. } => 'c',
                Primitive::Text { .. } => 't',
                Primitive::Line { .. } => 'l',
                Primitive::Rect { .. } => 'r',
            })
            .collect();
        assert_eq!(kinds.into_iter().collect::<String>(), "ccccttttl");
    }

    #[test]
    fn test_label_placement() {
        let mut surface = RecordingSurface::new();
        draw_circuit(&mut surface, &cat_dataset(), 300, 200, &RenderOptions::default()).unwrap();

        let first = surface.texts().next().unwrap();
        match first {
            Primitive::Text { pos, text, font_size, anchor, .. } => {
                assert_eq!(*pos, Pos2::new(20.0, 10.0));
                assert_eq!(text, "L0-The");
                assert_eq!(*font_size, 12.0);
                assert_eq!(*anchor, TextAnchor::Middle);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_visual_encoding() {
        let dataset = GraphDataset::new(1, 2).with_edges([AttentionEdge::new((0, 0), (0, 1), 0.5, 0)]);
        let mut surface = RecordingSurface::new();
        draw_circuit(&mut surface, &dataset, 300, 200, &RenderOptions::default()).unwrap();

        let drawn = lines(&surface);
        assert_eq!(drawn.len(), 1);
        assert_eq!(drawn[0].2, 1.0);
        assert_eq!(drawn[0].3, 0.5);
    }

    #[test]
    fn test_opacity_clamped_width_not() {
        let dataset = GraphDataset::new(1, 2).with_edges([
            AttentionEdge::new((0, 0), (0, 1), 1.5, 0),
            AttentionEdge::new((0, 1), (0, 0), -0.25, 0),
        ]);
        let mut surface = RecordingSurface::new();
        draw_circuit(&mut surface, &dataset, 300, 200, &RenderOptions::default()).unwrap();

        let drawn = lines(&surface);
        assert_eq!((drawn[0].2, drawn[0].3), (3.0, 1.0));
        assert_eq!((drawn[1].2, drawn[1].3), (-0.5, 0.0));
        assert_eq!(edge_opacity(f64::NAN), 0.0);
    }

    #[test]
    fn test_unresolved_edges_skipped() {
        let dataset = GraphDataset::new(2, 2).with_edges([
            AttentionEdge::new((2, 0), (0, 0), 0.9, 0),
            AttentionEdge::new((1, 0), (0, -1), 0.9, 0),
            AttentionEdge::new((1, 0), (0, 1), 0.9, 0),
        ]);
        let mut surface = RecordingSurface::new();
        let stats = draw_circuit(&mut surface, &dataset, 300, 200, &RenderOptions::default()).unwrap();

        assert_eq!(stats.edges_drawn, 1);
        assert_eq!(stats.edges_skipped, 2);
        assert_eq!(surface.lines().count(), 1);
        assert_eq!(surface.circles().count(), 4);
    }

    #[test]
    fn test_edges_keep_input_order() {
        let dataset = GraphDataset::new(2, 2).with_edges([
            AttentionEdge::new((1, 0), (0, 0), 0.1, 0),
            AttentionEdge::new((1, 1), (0, 1), 0.2, 0),
            AttentionEdge::new((1, 0), (0, 1), 0.3, 0),
        ]);
        let mut surface = RecordingSurface::new();
        draw_circuit(&mut surface, &dataset, 300, 200, &RenderOptions::default()).unwrap();

        let opacities: Vec<_> = lines(&surface).iter().map(|l| l.3).collect();
        assert_eq!(opacities, vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_filter_counts_but_does_not_draw() {
        let dataset = GraphDataset::new(2, 2).with_edges([
            AttentionEdge::new((1, 0), (0, 0), 0.1, 0),
            AttentionEdge::new((1, 1), (0, 1), 0.6, 3),
            AttentionEdge::new((1, 0), (0, 1), 0.7, 1),
        ]);
        let options = RenderOptions {
            filter: EdgeFilter::with_threshold(0.4).with_visible_heads([HeadPair::new(1, 1)]),
            ..Default::default()
        };
        let mut surface = RecordingSurface::new();
        let stats = draw_circuit(&mut surface, &dataset, 300, 200, &options).unwrap();

        assert_eq!(stats.edges_drawn, 1);
        assert_eq!(stats.edges_filtered, 2);
        assert_eq!(lines(&surface)[0].3, 0.7);
    }

    #[test]
    fn test_legend_drawn_after_edges() {
        let group = HeadGroup {
            id: 0,
            name: "Induction".into(),
            description: None,
            heads: vec![HeadPair::new(1, 0)],
            color: Some("#ff0000".into()),
        };
        let options = RenderOptions {
            coloring: EdgeColoring::ByGroup(vec![group]),
            legend: true,
            ..Default::default()
        };
        let mut surface = RecordingSurface::new();
        draw_circuit(&mut surface, &cat_dataset(), 300, 200, &options).unwrap();

        let tail = &surface.primitives()[surface.len() - 2..];
        assert!(matches!(tail[0], Primitive::Rect { fill, .. } if fill == Color32::from_rgb(255, 0, 0)));
        assert!(matches!(&tail[1], Primitive::Text { text, anchor: TextAnchor::Start, .. } if text == "Induction"));
        assert!(matches!(
            surface.lines().next(),
            Some(Primitive::Line { color, .. }) if *color == Color32::from_rgb(255, 0, 0)
        ));
    }

    #[test]
    fn test_legend_lists_ungrouped_individual_heads() {
        let group = HeadGroup {
            id: 0,
            name: "Induction".into(),
            description: None,
            heads: vec![HeadPair::new(1, 0)],
            color: None,
        };
        let options = RenderOptions {
            coloring: EdgeColoring::ByGroup(vec![group]),
            legend: true,
            individual_heads: vec![HeadPair::new(1, 0), HeadPair::new(0, 3)],
            ..Default::default()
        };
        let mut surface = RecordingSurface::new();
        draw_circuit(&mut surface, &cat_dataset(), 300, 200, &options).unwrap();

        let legend_texts: Vec<&str> = surface
            .texts()
            .filter_map(|p| match p {
                Primitive::Text { text, anchor: TextAnchor::Start, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        // The grouped head is not repeated in the individual section
        assert_eq!(legend_texts, vec!["Induction", "Individual Heads", "Layer 0, Head 3"]);

        let swatches: Vec<Color32> = surface
            .primitives()
            .iter()
            .filter_map(|p| match p {
                Primitive::Rect { fill, .. } => Some(*fill),
                _ => None,
            })
            .collect();
        let palette = &options.style.head_palette;
        assert_eq!(swatches, vec![palette[0], palette_color(palette, 3)]);
    }

    #[test]
    fn test_legend_needs_non_uniform_coloring() {
        let options = RenderOptions {
            legend: true,
            individual_heads: vec![HeadPair::new(0, 3)],
            ..Default::default()
        };
        let mut surface = RecordingSurface::new();
        draw_circuit(&mut surface, &cat_dataset(), 300, 200, &options).unwrap();
        assert_eq!(surface.texts().count(), 4);
    }

    #[test]
    fn test_renderer_skips_unchanged_input() {
        let mut renderer = CircuitRenderer::default();
        let mut surface = RecordingSurface::new();
        let dataset = cat_dataset();

        assert!(matches!(renderer.render(&mut surface, &dataset, 300, 200), Ok(RenderOutcome::Drawn(_))));
        let first = surface.clone();
        assert_eq!(renderer.render(&mut surface, &dataset, 300, 200), Ok(RenderOutcome::Unchanged));
        assert_eq!(surface, first);

        // A resize redraws from scratch without accumulating
        assert!(matches!(renderer.render(&mut surface, &dataset, 400, 200), Ok(RenderOutcome::Drawn(_))));
        assert_eq!(surface.len(), first.len());

        renderer.invalidate();
        assert!(matches!(renderer.render(&mut surface, &dataset, 400, 200), Ok(RenderOutcome::Drawn(_))));
        assert_eq!(surface.len(), first.len());
    }

    #[test]
    fn test_options_change_forces_redraw() {
        let mut renderer = CircuitRenderer::default();
        let mut surface = RecordingSurface::new();
        let dataset = cat_dataset();
        renderer.render(&mut surface, &dataset, 300, 200).unwrap();

        renderer.set_options(RenderOptions {
            filter: EdgeFilter::with_threshold(0.9),
            ..Default::default()
        });
        match renderer.render(&mut surface, &dataset, 300, 200).unwrap() {
            RenderOutcome::Drawn(stats) => assert_eq!(stats.edges_filtered, 1),
            RenderOutcome::Unchanged => panic!("expected a redraw"),
        }
        assert_eq!(surface.lines().count(), 0);
    }

    #[test]
    fn test_failed_render_leaves_no_graph() {
        let mut renderer = CircuitRenderer::default();
        let mut surface = RecordingSurface::new();
        renderer.render(&mut surface, &cat_dataset(), 300, 200).unwrap();
        assert!(!surface.is_empty());

        let err = renderer
            .render(&mut surface, &GraphDataset::new(0, 2), 300, 200)
            .unwrap_err();
        assert_eq!(err, CircuitError::NonPositiveLayers(0));
        assert!(surface.is_empty());

        // The memo was reset, so the previous valid input draws again
        assert!(matches!(
            renderer.render(&mut surface, &cat_dataset(), 300, 200),
            Ok(RenderOutcome::Drawn(_))
        ));
    }
}
