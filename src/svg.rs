//! SVG output surface.

use egui::Color32;

use crate::surface::{DrawSurface, Primitive, TextAnchor};
use crate::theme::color32_to_hex;

/// Surface that serializes primitives as SVG elements on a fixed-size canvas.
pub struct SvgSurface {
    width: u32,
    height: u32,
    background: Option<Color32>,
    elements: Vec<String>,
}

impl SvgSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            background: None,
            elements: Vec::new(),
        }
    }

    /// Fills the canvas before any primitive. Not part of the primitive stream.
    pub fn with_background(mut self, color: Color32) -> Self {
        self.background = Some(color);
        self
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Renders the complete document.
    pub fn to_svg(&self) -> String {
        let mut svg = String::new();

        svg.push_str(&format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">
"#,
            self.width, self.height, self.width, self.height
        ));

        if let Some(bg) = self.background {
            svg.push_str(&format!(
                "  <rect width=\"100%\" height=\"100%\" fill=\"{}\"/>\n",
                color32_to_hex(bg)
            ));
        }

        for element in &self.elements {
            svg.push_str("  ");
            svg.push_str(element);
            svg.push('\n');
        }

        svg.push_str("</svg>\n");
        svg
    }
}

impl DrawSurface for SvgSurface {
    fn clear(&mut self) {
        self.elements.clear();
    }

    fn draw(&mut self, primitive: Primitive) {
        let element = match primitive {
            Primitive::Circle { center, radius, fill } => format!(
                r#"<circle cx="{}" cy="{}" r="{}" fill="{}"/>"#,
                center.x,
                center.y,
                radius,
                color32_to_hex(fill)
            ),
            Primitive::Text { pos, text, font_size, anchor, color } => format!(
                r#"<text x="{}" y="{}" text-anchor="{}" font-size="{}px" font-family="sans-serif" fill="{}">{}</text>"#,
                pos.x,
                pos.y,
                anchor_attr(anchor),
                font_size,
                color32_to_hex(color),
                escape_xml(&text)
            ),
            Primitive::Line { from, to, stroke_width, opacity, color } => format!(
                r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}" stroke-opacity="{}"/>"#,
                from.x,
                from.y,
                to.x,
                to.y,
                color32_to_hex(color),
                stroke_width,
                opacity
            ),
            Primitive::Rect { min, size, fill } => format!(
                r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
                min.x,
                min.y,
                size.x,
                size.y,
                color32_to_hex(fill)
            ),
        };
        self.elements.push(element);
    }
}

fn anchor_attr(anchor: TextAnchor) -> &'static str {
    match anchor {
        TextAnchor::Start => "start",
        TextAnchor::Middle => "middle",
        TextAnchor::End => "end",
    }
}

/// Escapes the five XML special characters.
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::Pos2;

    #[test]
    fn test_document_shape() {
        let mut surface = SvgSurface::new(300, 200).with_background(Color32::WHITE);
        surface.draw(Primitive::Circle { center: Pos2::new(20.0, 20.0), radius: 5.0, fill: Color32::RED });
        surface.draw(Primitive::Line {
            from: Pos2::new(20.0, 20.0),
            to: Pos2::new(280.0, 180.0),
            stroke_width: 1.6,
            opacity: 0.8,
            color: Color32::BLUE,
        });

        let svg = surface.to_svg();
        assert!(svg.contains(r#"width="300" height="200""#));
        assert!(svg.contains(r##"fill="#ffffff""##));
        assert!(svg.contains(r##"<circle cx="20" cy="20" r="5" fill="#ff0000"/>"##));
        assert!(svg.contains(r#"stroke-width="1.6" stroke-opacity="0.8""#));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_text_is_escaped() {
        let mut surface = SvgSurface::new(10, 10);
        surface.draw(Primitive::Text {
            pos: Pos2::new(1.0, 2.0),
            text: "L0-<eos>&\"x\"".to_string(),
            font_size: 12.0,
            anchor: TextAnchor::Middle,
            color: Color32::BLACK,
        });
        let svg = surface.to_svg();
        assert!(svg.contains("L0-&lt;eos&gt;&amp;&quot;x&quot;"));
        assert!(svg.contains(r#"text-anchor="middle""#));
    }

    #[test]
    fn test_clear_resets_elements() {
        let mut surface = SvgSurface::new(10, 10);
        surface.draw(Primitive::Circle { center: Pos2::ZERO, radius: 1.0, fill: Color32::RED });
        surface.clear();
        assert_eq!(surface.element_count(), 0);
        assert!(!surface.to_svg().contains("<circle"));
    }
}
