//! Replays recorded circuit primitives onto an egui painter
//!
//! Primitive coordinates are canvas coordinates with the origin at the
//! top-left corner of the canvas, so every position is offset by the
//! canvas rect's origin before drawing.

use eframe::egui;
use egui::{Align2, Color32, FontId, Pos2, Rect, Stroke};

use circuitview::{Primitive, TextAnchor};

/// Maps a text anchor to the egui alignment of the text box.
///
/// Text positions are baselines, so the box hangs above the point.
pub fn text_align(anchor: TextAnchor) -> Align2 {
    match anchor {
        TextAnchor::Start => Align2::LEFT_BOTTOM,
        TextAnchor::Middle => Align2::CENTER_BOTTOM,
        TextAnchor::End => Align2::RIGHT_BOTTOM,
    }
}

/// Stroke for an edge line; opacity is applied to the color alpha.
pub fn edge_stroke(stroke_width: f32, opacity: f32, color: Color32) -> Stroke {
    Stroke::new(stroke_width.max(0.0), color.gamma_multiply(opacity.clamp(0.0, 1.0)))
}

/// Draws every primitive in order, translated by `origin`.
pub fn paint_primitives(painter: &egui::Painter, origin: Pos2, primitives: &[Primitive]) {
    let offset = origin.to_vec2();

    for primitive in primitives {
        match primitive {
            Primitive::Circle { center, radius, fill } => {
                painter.circle_filled(*center + offset, *radius, *fill);
            }
            Primitive::Text { pos, text, font_size, anchor, color } => {
                painter.text(
                    *pos + offset,
                    text_align(*anchor),
                    text,
                    FontId::proportional(*font_size),
                    *color,
                );
            }
            Primitive::Line { from, to, stroke_width, opacity, color } => {
                painter.line_segment(
                    [*from + offset, *to + offset],
                    edge_stroke(*stroke_width, *opacity, *color),
                );
            }
            Primitive::Rect { min, size, fill } => {
                painter.rect_filled(Rect::from_min_size(*min + offset, *size), 0.0, *fill);
            }
        }
    }
}

/// Draws a centered placeholder message on an empty canvas.
pub fn paint_placeholder(painter: &egui::Painter, rect: Rect, message: &str, color: Color32) {
    painter.text(
        rect.center(),
        Align2::CENTER_CENTER,
        message,
        FontId::proportional(16.0),
        color,
    );
}
