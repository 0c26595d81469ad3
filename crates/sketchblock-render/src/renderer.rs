//! Renderer trait abstraction.

use crate::scene::Scene;
use peniko::Color;
use sketchblock_core::shapes::ShapeId;
use sketchblock_core::tools::ToolKind;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Output formatting failed: {0}")]
    Format(#[from] std::fmt::Error),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Visual constants applied while building a scene.
#[derive(Debug, Clone)]
pub struct RenderStyle {
    /// Stroke color of the selected shape.
    pub highlight_color: Color,
    /// Stroke width of the selected shape.
    pub highlight_width: f64,
    /// Stroke width of the invisible hit target placed under each line.
    pub hit_stroke_width: f64,
    /// Stage background.
    pub background_color: Color,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            highlight_color: Color::from_rgba8(0xff, 0x6b, 0x6b, 0xff),
            highlight_width: 3.0,
            hit_stroke_width: 15.0,
            background_color: Color::WHITE,
        }
    }
}

/// Context for a single scene build.
#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    /// Stage size in pixels.
    pub width: u32,
    pub height: u32,
    /// Currently selected shape.
    pub selection: Option<&'a ShapeId>,
    /// Active tool; shapes are draggable only under the select tool.
    pub tool: ToolKind,
    pub style: RenderStyle,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            selection: None,
            tool: ToolKind::default(),
            style: RenderStyle::default(),
        }
    }

    /// Set the selected shape.
    pub fn with_selection(mut self, selection: Option<&'a ShapeId>) -> Self {
        self.selection = selection;
        self
    }

    /// Set the active tool.
    pub fn with_tool(mut self, tool: ToolKind) -> Self {
        self.tool = tool;
        self
    }

    /// Set the render style.
    pub fn with_style(mut self, style: RenderStyle) -> Self {
        self.style = style;
        self
    }

    pub fn is_selected(&self, id: &ShapeId) -> bool {
        self.selection == Some(id)
    }
}

/// Trait for rendering backends.
///
/// A backend consumes a fully built [`Scene`]; it never sees shapes directly.
/// Scenes are rebuilt from scratch on every change, so backends need no
/// incremental state.
pub trait Renderer {
    /// Draw one frame.
    fn render(&mut self, scene: &Scene) -> RenderResult<()>;
}
