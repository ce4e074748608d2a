//! Controls panel UI rendering
//!
//! Side panel with the edge threshold, coloring mode, model preset, the
//! individually selected heads and the head-group editor.

use eframe::egui;
use egui::{Color32, RichText};
use rand::seq::SliceRandom;
use circuitview::{color32_to_hex, palette_color, presets, HeadPair};
use crate::app::AppState;
use crate::state::ColoringMode;

/// Renders the view controls. Changes are written straight into `state.view`;
/// the canvas picks them up on its next refresh.
pub fn render_controls_panel(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading("View");
    ui.add_space(4.0);

    ui.label("Edge threshold");
    ui.add(egui::Slider::new(&mut state.view.threshold, 0.0..=1.0).step_by(0.01))
        .on_hover_text("Hide edges whose weight is below this value");

    ui.add_space(8.0);
    ui.label("Edge coloring");
    for mode in ColoringMode::ALL {
        ui.radio_value(&mut state.view.coloring, mode, mode.label());
    }

    ui.add_space(8.0);
    ui.label("Model");
    let mut chosen = state.view.preset_name.clone();
    egui::ComboBox::from_id_salt("model_preset")
        .selected_text(&chosen)
        .show_ui(ui, |ui| {
            for model in presets() {
                ui.selectable_value(&mut chosen, model.name.to_string(), model.name);
            }
        });
    state.view.select_preset(&chosen);

    ui.checkbox(&mut state.view.selected_only, "Only selected heads")
        .on_hover_text("Hide edges from heads that are neither selected nor in a group");
    ui.add_enabled(
        state.view.coloring != ColoringMode::Uniform,
        egui::Checkbox::new(&mut state.view.legend, "Show legend"),
    );

    let palette = state.theme.current_theme().colors.head_palette.clone();

    ui.separator();
    render_selected_heads(ui, state, &palette);

    ui.separator();
    render_groups(ui, state, &palette);

    if let Some(error) = &state.head_editor.error {
        ui.add_space(4.0);
        ui.colored_label(Color32::from_rgb(220, 80, 80), error);
    }
}

fn render_selected_heads(ui: &mut egui::Ui, state: &mut AppState, palette: &[Color32]) {
    ui.label(RichText::new("Selected heads").strong());

    ui.horizontal(|ui| {
        let input = ui.add(
            egui::TextEdit::singleline(&mut state.head_editor.head_input)
                .hint_text("9.9, 10.:")
                .desired_width(100.0),
        );
        let submitted = input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if ui.button("Add").clicked() || submitted {
            let bounds = state.view.head_bounds(state.dataset.dataset());
            match state.view.add_heads(&state.head_editor.head_input, bounds) {
                Ok(added) => {
                    log::debug!("Added {} heads", added);
                    state.head_editor.head_input.clear();
                    state.head_editor.error = None;
                }
                Err(e) => state.head_editor.error = Some(e.to_string()),
            }
        }
    });

    let mut removed: Option<HeadPair> = None;
    for head in &state.view.selected_heads {
        ui.horizontal(|ui| {
            ui.label(RichText::new("■").color(palette_color(palette, head.head)));
            ui.label(format!("Layer {}, Head {}", head.layer, head.head));
            if ui.small_button("×").on_hover_text("Remove head").clicked() {
                removed = Some(*head);
            }
        });
    }
    if let Some(head) = removed {
        state.view.remove_head(head);
    }
}

fn render_groups(ui: &mut egui::Ui, state: &mut AppState, palette: &[Color32]) {
    ui.label(RichText::new("Head groups").strong());

    let mut removed: Option<usize> = None;
    let mut recolored: Option<usize> = None;
    egui::ScrollArea::vertical().max_height(240.0).show(ui, |ui| {
        for group in &state.view.groups {
            let color = group.resolved_color(palette);

            let heads: Vec<String> = group.heads.iter()
                .map(|h| format!("{}.{}", h.layer, h.head))
                .collect();

            let response = ui.horizontal(|ui| {
                ui.label(RichText::new("■").color(color));
                ui.label(&group.name);
                if ui.small_button("🎨").on_hover_text("New color").clicked() {
                    recolored = Some(group.id);
                }
                if ui.small_button("×").on_hover_text("Remove group").clicked() {
                    removed = Some(group.id);
                }
            }).response;

            let mut hover = heads.join(", ");
            if let Some(description) = &group.description {
                hover = format!("{}\n\n{}", description, hover);
            }
            response.on_hover_text(hover);
        }
    });

    if let Some(id) = removed {
        state.view.remove_group(id);
    }
    if let Some(id) = recolored {
        if let Some(color) = random_palette_hex(palette) {
            state.view.set_group_color(id, color);
        }
    }

    ui.add_space(4.0);
    ui.label("New group");
    ui.add(
        egui::TextEdit::singleline(&mut state.head_editor.group_name)
            .hint_text("Name")
            .desired_width(160.0),
    );
    ui.add(
        egui::TextEdit::singleline(&mut state.head_editor.group_heads)
            .hint_text("Heads, e.g. 5.5 6.9")
            .desired_width(160.0),
    );
    if ui.button("Create group").clicked() {
        let bounds = state.view.head_bounds(state.dataset.dataset());
        let editor = &mut state.head_editor;
        let color = random_palette_hex(palette);
        match state.view.create_group(&editor.group_name, &editor.group_heads, bounds, color) {
            Ok(id) => {
                log::info!("Created head group {} '{}'", id, editor.group_name.trim());
                editor.group_name.clear();
                editor.group_heads.clear();
                editor.error = None;
            }
            Err(e) => editor.error = Some(e),
        }
    }
}

fn random_palette_hex(palette: &[Color32]) -> Option<String> {
    palette.choose(&mut rand::thread_rng()).map(|c| color32_to_hex(*c))
}
