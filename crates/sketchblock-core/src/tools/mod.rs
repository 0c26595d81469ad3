//! Tool system for the drawing canvas.

use crate::shapes::{Geometry, Shape, ShapeKind, ShapeStyle};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Placeholder content of a freshly placed text shape.
pub const TEXT_PLACEHOLDER: &str = "Double click to edit";

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Select,
    Pen,
    Rectangle,
    Circle,
    Ellipse,
    Triangle,
    Star,
    Text,
}

impl ToolKind {
    /// All tools in toolbar order.
    pub fn all() -> &'static [ToolKind] {
        &[
            ToolKind::Select,
            ToolKind::Pen,
            ToolKind::Rectangle,
            ToolKind::Circle,
            ToolKind::Ellipse,
            ToolKind::Triangle,
            ToolKind::Star,
            ToolKind::Text,
        ]
    }

    /// Shape kind this tool draws, or `None` for the select tool.
    pub fn shape_kind(&self) -> Option<ShapeKind> {
        match self {
            ToolKind::Select => None,
            ToolKind::Pen => Some(ShapeKind::Line),
            ToolKind::Rectangle => Some(ShapeKind::Rect),
            ToolKind::Circle => Some(ShapeKind::Circle),
            ToolKind::Ellipse => Some(ShapeKind::Ellipse),
            ToolKind::Triangle => Some(ShapeKind::Triangle),
            ToolKind::Star => Some(ShapeKind::Star),
            ToolKind::Text => Some(ShapeKind::Text),
        }
    }

    /// Whether this tool creates shapes.
    pub fn is_drawing(&self) -> bool {
        self.shape_kind().is_some()
    }

    /// Get display name for the toolbar.
    pub fn display_name(&self) -> &'static str {
        match self {
            ToolKind::Select => "Select",
            ToolKind::Pen => "Pen",
            ToolKind::Rectangle => "Rectangle",
            ToolKind::Circle => "Circle",
            ToolKind::Ellipse => "Ellipse",
            ToolKind::Triangle => "Triangle",
            ToolKind::Star => "Star",
            ToolKind::Text => "Text",
        }
    }

    /// Create the initial, zero-sized shape for a pointer-down at `point`.
    pub fn create_shape(&self, point: Point) -> Option<Shape> {
        let kind = self.shape_kind()?;
        let shape = match kind {
            ShapeKind::Text => Shape::new(
                point,
                Geometry::Text {
                    text: TEXT_PLACEHOLDER.to_string(),
                    font_size: crate::shapes::DEFAULT_FONT_SIZE,
                },
                ShapeStyle::text(),
            ),
            _ => Shape::new(point, Geometry::empty(kind, point), ShapeStyle::default()),
        };
        Some(shape)
    }
}
