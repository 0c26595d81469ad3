//! SVG renderer.
//!
//! Serializes a [`Scene`] into a standalone SVG document. Used for headless
//! hosts, snapshots and the replay binary.

use crate::renderer::{RenderResult, Renderer};
use crate::scene::{NodeRole, Paint, Primitive, Scene, SceneNode};
use peniko::Color;
use std::fmt::Write;

/// Renderer that produces SVG markup.
#[derive(Debug, Default)]
pub struct SvgRenderer {
    output: String,
    frames: usize,
}

impl SvgRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Markup of the last rendered frame.
    pub fn svg(&self) -> &str {
        &self.output
    }

    /// Take the last frame, leaving the renderer empty.
    pub fn take_svg(&mut self) -> String {
        std::mem::take(&mut self.output)
    }

    /// Number of frames rendered so far.
    pub fn frames(&self) -> usize {
        self.frames
    }

    fn write_node(out: &mut String, node: &SceneNode) -> std::fmt::Result {
        let paint = paint_attrs(&node.paint);
        let pointer = match node.role {
            NodeRole::Visual => "",
            NodeRole::HitTarget => " pointer-events=\"stroke\"",
        };

        match &node.primitive {
            Primitive::Polyline(_) => writeln!(
                out,
                "  <path data-key=\"{}\" d=\"{}\"{} stroke-linecap=\"round\" stroke-linejoin=\"round\"{}/>",
                escape(&node.key),
                node.primitive.to_path().to_svg(),
                paint,
                pointer
            ),
            Primitive::Path(path) => writeln!(
                out,
                "  <path data-key=\"{}\" d=\"{}\"{}{}/>",
                escape(&node.key),
                path.to_svg(),
                paint,
                pointer
            ),
            Primitive::Text {
                origin,
                text,
                font_size,
            } => writeln!(
                out,
                "  <text data-key=\"{}\" x=\"{}\" y=\"{}\" font-size=\"{}\" dominant-baseline=\"hanging\"{}>{}</text>",
                escape(&node.key),
                origin.x,
                origin.y,
                font_size,
                paint,
                escape(text)
            ),
        }
    }
}

impl Renderer for SvgRenderer {
    fn render(&mut self, scene: &Scene) -> RenderResult<()> {
        let mut out = String::new();
        writeln!(
            out,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">",
            w = scene.width,
            h = scene.height
        )?;
        writeln!(
            out,
            "  <rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
            svg_color(scene.background)
        )?;
        for node in &scene.nodes {
            Self::write_node(&mut out, node)?;
        }
        out.push_str("</svg>\n");

        log::trace!("Rendered SVG frame with {} nodes", scene.len());
        self.output = out;
        self.frames += 1;
        Ok(())
    }
}

fn paint_attrs(paint: &Paint) -> String {
    let fill = paint.fill.map_or_else(|| "none".to_string(), svg_color);
    match paint.stroke {
        Some(stroke) => format!(
            " fill=\"{}\" stroke=\"{}\" stroke-width=\"{}\"",
            fill,
            svg_color(stroke),
            paint.stroke_width
        ),
        None => format!(" fill=\"{}\"", fill),
    }
}

fn svg_color(color: Color) -> String {
    let rgba = color.to_rgba8();
    if rgba.a == u8::MAX {
        format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b)
    } else {
        format!(
            "rgba({}, {}, {}, {:.3})",
            rgba.r,
            rgba.g,
            rgba.b,
            f64::from(rgba.a) / 255.0
        )
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::RenderContext;
    use crate::scene::build_scene;
    use kurbo::Point;
    use sketchblock_core::shapes::{Geometry, Shape, ShapeStyle};

    fn render(shapes: &[Shape]) -> String {
        let scene = build_scene(shapes, &RenderContext::new(800, 400));
        let mut renderer = SvgRenderer::new();
        renderer.render(&scene).unwrap();
        assert_eq!(renderer.frames(), 1);
        renderer.take_svg()
    }

    #[test]
    fn test_empty_scene() {
        let svg = render(&[]);
        assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"800\" height=\"400\""));
        assert!(svg.contains("fill=\"#ffffff\""));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_shapes_in_paint_order() {
        let line = Shape::new(
            Point::new(0.0, 0.0),
            Geometry::Line {
                points: vec![0.0, 0.0, 10.0, 10.0],
            },
            ShapeStyle::default(),
        );
        let rect = Shape::new(
            Point::new(5.0, 5.0),
            Geometry::Rect {
                width: 20.0,
                height: 10.0,
            },
            ShapeStyle::default(),
        );
        let svg = render(&[line.clone(), rect.clone()]);

        let hit = svg.find(&format!("data-key=\"{}-hit\"", line.id)).unwrap();
        let visible = svg.find(&format!("data-key=\"{}\"", line.id)).unwrap();
        let rect_at = svg.find(&format!("data-key=\"{}\"", rect.id)).unwrap();
        assert!(hit < visible && visible < rect_at);
        assert!(svg.contains("pointer-events=\"stroke\""));
        assert!(svg.contains("stroke=\"#007bff\""));
    }

    #[test]
    fn test_text_is_escaped() {
        let text = Shape::new(
            Point::new(1.0, 2.0),
            Geometry::Text {
                text: "a < b & \"c\"".to_string(),
                font_size: 16.0,
            },
            ShapeStyle::text(),
        );
        let svg = render(&[text]);
        assert!(svg.contains(">a &lt; b &amp; &quot;c&quot;</text>"));
        assert!(svg.contains("font-size=\"16\""));
    }

    #[test]
    fn test_translucent_colors() {
        assert_eq!(svg_color(Color::from_rgba8(0, 123, 255, 255)), "#007bff");
        assert_eq!(svg_color(Color::TRANSPARENT), "rgba(0, 0, 0, 0.000)");
    }
}
