//! Shape definitions for the drawing canvas.
//!
//! A [`Shape`] carries the fields every drawable shares (id, anchor, style)
//! plus a [`Geometry`] whose variant decides which kind-specific fields exist.
//! The serialized form is a flat JSON object with a `type` tag, e.g.
//! `{"id":"shape_…","type":"rect","x":10,"y":10,"width":100,"height":50,…}`.

mod id;

pub use id::ShapeId;

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Default font size for text shapes.
pub const DEFAULT_FONT_SIZE: f64 = 16.0;

/// Number of sides of a triangle shape (rendered as a regular polygon).
pub const TRIANGLE_SIDES: u32 = 3;

/// Number of spikes on a star shape.
pub const STAR_POINTS: u32 = 5;

/// Ratio between a star's inner and outer radius.
pub const STAR_INNER_RATIO: f64 = 0.5;

fn default_font_size() -> f64 {
    DEFAULT_FONT_SIZE
}

fn default_sides() -> u32 {
    TRIANGLE_SIDES
}

/// Discriminant of a shape, without its geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Line,
    Rect,
    Circle,
    Ellipse,
    Triangle,
    Star,
    Text,
}

impl ShapeKind {
    /// Name used in the serialized `type` tag.
    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Line => "line",
            ShapeKind::Rect => "rect",
            ShapeKind::Circle => "circle",
            ShapeKind::Ellipse => "ellipse",
            ShapeKind::Triangle => "triangle",
            ShapeKind::Star => "star",
            ShapeKind::Text => "text",
        }
    }
}

/// Kind-specific geometry of a shape.
///
/// All lengths are in stage pixels. `Rect` extents may be negative when the
/// rectangle was dragged up or left of its anchor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Geometry {
    /// Free-hand path, flattened as `[x0, y0, x1, y1, …]` in absolute coordinates.
    Line {
        #[serde(default)]
        points: Vec<f64>,
    },
    Rect {
        #[serde(default)]
        width: f64,
        #[serde(default)]
        height: f64,
    },
    Circle {
        #[serde(default)]
        radius: f64,
    },
    Ellipse {
        #[serde(default, rename = "radiusX")]
        radius_x: f64,
        #[serde(default, rename = "radiusY")]
        radius_y: f64,
    },
    /// Regular polygon; `sides` is always 3 for shapes this crate creates.
    Triangle {
        #[serde(default = "default_sides")]
        sides: u32,
        #[serde(default)]
        radius: f64,
    },
    Star {
        #[serde(default, rename = "innerRadius")]
        inner_radius: f64,
        #[serde(default, rename = "outerRadius")]
        outer_radius: f64,
    },
    Text {
        #[serde(default)]
        text: String,
        #[serde(default = "default_font_size", rename = "fontSize")]
        font_size: f64,
    },
}

impl Geometry {
    /// Zero-sized geometry of the given kind anchored at `anchor`.
    pub fn empty(kind: ShapeKind, anchor: Point) -> Self {
        match kind {
            ShapeKind::Line => Geometry::Line {
                points: vec![anchor.x, anchor.y],
            },
            ShapeKind::Rect => Geometry::Rect {
                width: 0.0,
                height: 0.0,
            },
            ShapeKind::Circle => Geometry::Circle { radius: 0.0 },
            ShapeKind::Ellipse => Geometry::Ellipse {
                radius_x: 0.0,
                radius_y: 0.0,
            },
            ShapeKind::Triangle => Geometry::Triangle {
                sides: TRIANGLE_SIDES,
                radius: 0.0,
            },
            ShapeKind::Star => Geometry::Star {
                inner_radius: 0.0,
                outer_radius: 0.0,
            },
            ShapeKind::Text => Geometry::Text {
                text: String::new(),
                font_size: DEFAULT_FONT_SIZE,
            },
        }
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Geometry::Line { .. } => ShapeKind::Line,
            Geometry::Rect { .. } => ShapeKind::Rect,
            Geometry::Circle { .. } => ShapeKind::Circle,
            Geometry::Ellipse { .. } => ShapeKind::Ellipse,
            Geometry::Triangle { .. } => ShapeKind::Triangle,
            Geometry::Star { .. } => ShapeKind::Star,
            Geometry::Text { .. } => ShapeKind::Text,
        }
    }
}

/// Fill, stroke and drag defaults applied to newly created shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    /// CSS fill color (empty string = no fill).
    pub fill: String,
    /// CSS stroke color.
    pub stroke: String,
    pub stroke_width: f64,
    pub draggable: bool,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            fill: "rgba(0, 123, 255, 0.3)".to_string(),
            stroke: "#007bff".to_string(),
            stroke_width: 2.0,
            draggable: true,
        }
    }
}

impl ShapeStyle {
    /// Style for text shapes: solid black glyphs, same outline.
    pub fn text() -> Self {
        Self {
            fill: "#000000".to_string(),
            ..Self::default()
        }
    }
}

/// One drawable primitive on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub id: ShapeId,
    /// Anchor position. For lines this is the first path point; the path
    /// itself is absolute.
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(flatten)]
    pub geometry: Geometry,
    #[serde(default)]
    pub fill: String,
    #[serde(default)]
    pub stroke: String,
    #[serde(default, rename = "strokeWidth")]
    pub stroke_width: f64,
    #[serde(default)]
    pub draggable: bool,
}

impl Shape {
    /// Create a shape with a fresh id.
    pub fn new(anchor: Point, geometry: Geometry, style: ShapeStyle) -> Self {
        Self {
            id: ShapeId::generate(),
            x: anchor.x,
            y: anchor.y,
            geometry,
            fill: style.fill,
            stroke: style.stroke,
            stroke_width: style.stroke_width,
            draggable: style.draggable,
        }
    }

    pub fn kind(&self) -> ShapeKind {
        self.geometry.kind()
    }

    /// Anchor position as a point.
    pub fn anchor(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Whether this is a text shape.
    pub fn is_text(&self) -> bool {
        matches!(self.geometry, Geometry::Text { .. })
    }

    /// Text content, if this is a text shape.
    pub fn text(&self) -> Option<&str> {
        match &self.geometry {
            Geometry::Text { text, .. } => Some(text),
            _ => None,
        }
    }

    /// Path points of a line as pairs. Trailing odd coordinates are ignored.
    pub fn line_points(&self) -> Vec<Point> {
        match &self.geometry {
            Geometry::Line { points } => points
                .chunks_exact(2)
                .map(|pair| Point::new(pair[0], pair[1]))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Move the shape by `delta`. Line paths move with their anchor.
    pub fn translate(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
        if let Geometry::Line { points } = &mut self.geometry {
            for pair in points.chunks_exact_mut(2) {
                pair[0] += delta.x;
                pair[1] += delta.y;
            }
        }
    }
}

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = Vec2::new(b.x - a.x, b.y - a.y);
    let pv = Vec2::new(point.x - a.x, point.y - a.y);
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = Point::new(a.x + t * seg.x, a.y + t * seg.y);
    ((point.x - proj.x).powi(2) + (point.y - proj.y).powi(2)).sqrt()
}

/// Minimum distance from a point to a polyline.
///
/// A single-point polyline degenerates to the distance to that point.
pub fn point_to_polyline_dist(point: Point, points: &[Point]) -> f64 {
    match points {
        [] => f64::INFINITY,
        [only] => point.distance(*only),
        _ => points
            .windows(2)
            .map(|w| point_to_segment_dist(point, w[0], w[1]))
            .fold(f64::INFINITY, f64::min),
    }
}
