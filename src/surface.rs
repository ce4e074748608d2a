//! Drawing surfaces the renderer writes into.
//!
//! A surface receives an ordered stream of [`Primitive`]s between two calls to
//! [`DrawSurface::clear`]. The renderer holds it by `&mut` for a whole pass, so
//! no one else can write to it while a frame is being drawn.

use egui::{Color32, Pos2, Vec2};

/// Horizontal anchoring of a text primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

/// A single drawing command.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Circle {
        center: Pos2,
        radius: f32,
        fill: Color32,
    },
    /// Text whose baseline sits at `pos.y`
    Text {
        pos: Pos2,
        text: String,
        font_size: f32,
        anchor: TextAnchor,
        color: Color32,
    },
    Line {
        from: Pos2,
        to: Pos2,
        stroke_width: f32,
        opacity: f32,
        color: Color32,
    },
    Rect {
        min: Pos2,
        size: Vec2,
        fill: Color32,
    },
}

/// Exclusively-owned output target of a render pass.
pub trait DrawSurface {
    /// Removes everything drawn so far.
    fn clear(&mut self);

    /// Appends one primitive on top of the previous ones.
    fn draw(&mut self, primitive: Primitive);
}

/// Surface that records primitives in draw order.
///
/// Used by tests and by the GUI host, which replays the recording onto an
/// egui painter every frame.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RecordingSurface {
    primitives: Vec<Primitive>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn circles(&self) -> impl Iterator<Item = &Primitive> {
        self.primitives.iter().filter(|p| matches!(p, Primitive::Circle { .. }))
    }

    pub fn texts(&self) -> impl Iterator<Item = &Primitive> {
        self.primitives.iter().filter(|p| matches!(p, Primitive::Text { .. }))
    }

    pub fn lines(&self) -> impl Iterator<Item = &Primitive> {
        self.primitives.iter().filter(|p| matches!(p, Primitive::Line { .. }))
    }
}

impl DrawSurface for RecordingSurface {
    fn clear(&mut self) {
        self.primitives.clear();
    }

    fn draw(&mut self, primitive: Primitive) {
        self.primitives.push(primitive);
    }
}
