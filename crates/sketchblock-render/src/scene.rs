//! Scene graph built from a shape list.
//!
//! A [`Scene`] is a flat, ordered list of drawable nodes. It is rebuilt from
//! scratch on every change and never written back into the shape list.

use crate::renderer::RenderContext;
use kurbo::{
    Affine, BezPath, Circle, Ellipse, ParamCurveNearest, Point, Rect, Shape as KurboShape, Vec2,
};
use peniko::Color;
use peniko::color::{Srgb, parse_color};
use sketchblock_core::shapes::{
    Geometry, STAR_POINTS, Shape, ShapeId, point_to_polyline_dist,
};
use sketchblock_core::tools::ToolKind;
use std::f64::consts::PI;

/// Flattening tolerance for curves.
const PATH_TOLERANCE: f64 = 0.1;

/// Minimum half-width of a stroke when hit-testing.
const MIN_HIT_HALF_WIDTH: f64 = 1.0;

/// Approximate glyph advance as a fraction of the font size.
const TEXT_ADVANCE_RATIO: f64 = 0.6;

/// Suffix appended to a shape id to key its hit-target node.
pub const HIT_KEY_SUFFIX: &str = "-hit";

/// Parse a CSS color string.
///
/// Empty strings mean "no paint". Unparsable colors paint transparent.
pub fn parse_css_color(css: &str) -> Option<Color> {
    let css = css.trim();
    if css.is_empty() {
        return None;
    }
    match parse_color(css) {
        Ok(color) => Some(color.to_alpha_color::<Srgb>()),
        Err(e) => {
            log::warn!("Unparsable color '{}': {:?}", css, e);
            Some(Color::TRANSPARENT)
        }
    }
}

/// Why a node exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    /// Draws a shape.
    Visual,
    /// Invisible widened stroke that makes thin lines easy to hit.
    HitTarget,
}

/// Geometry of a scene node in stage coordinates.
#[derive(Debug, Clone)]
pub enum Primitive {
    /// Open polyline.
    Polyline(Vec<Point>),
    /// Closed outline.
    Path(BezPath),
    /// Single-line text with its top-left corner at `origin`.
    Text {
        origin: Point,
        text: String,
        font_size: f64,
    },
}

impl Primitive {
    /// Outline as a kurbo path. Text yields its estimated bounding box.
    pub fn to_path(&self) -> BezPath {
        match self {
            Primitive::Polyline(points) => {
                let mut path = BezPath::new();
                if let Some((first, rest)) = points.split_first() {
                    path.move_to(*first);
                    for point in rest {
                        path.line_to(*point);
                    }
                }
                path
            }
            Primitive::Path(path) => path.clone(),
            Primitive::Text { .. } => self.bounds().to_path(PATH_TOLERANCE),
        }
    }

    /// Axis-aligned bounds.
    pub fn bounds(&self) -> Rect {
        match self {
            Primitive::Polyline(points) => points
                .iter()
                .fold(None, |acc: Option<Rect>, p| {
                    Some(match acc {
                        Some(r) => r.union_pt(*p),
                        None => Rect::from_points(*p, *p),
                    })
                })
                .unwrap_or(Rect::ZERO),
            Primitive::Path(path) => path.bounding_box(),
            Primitive::Text {
                origin,
                text,
                font_size,
            } => {
                let chars = text.chars().count().max(1) as f64;
                Rect::from_origin_size(*origin, (chars * font_size * TEXT_ADVANCE_RATIO, *font_size))
            }
        }
    }
}

/// Fill and stroke of a node. `None` paints nothing.
#[derive(Debug, Clone)]
pub struct Paint {
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_width: f64,
}

/// One drawable node.
#[derive(Debug, Clone)]
pub struct SceneNode {
    /// Stable key: the shape id, or the id plus [`HIT_KEY_SUFFIX`].
    pub key: String,
    /// Shape this node belongs to.
    pub shape_id: ShapeId,
    pub role: NodeRole,
    pub primitive: Primitive,
    pub paint: Paint,
    /// Node position before any drag. Lines sit at the origin because their
    /// points are absolute; every other node sits at its shape anchor.
    pub position: Point,
    pub draggable: bool,
    /// Whether a double-click opens the text editor.
    pub double_click: bool,
}

impl SceneNode {
    /// Whether `point` hits this node.
    pub fn hit(&self, point: Point) -> bool {
        let half_width = (self.paint.stroke_width / 2.0).max(MIN_HIT_HALF_WIDTH);
        match &self.primitive {
            Primitive::Polyline(points) => {
                self.paint.stroke.is_some() && point_to_polyline_dist(point, points) <= half_width
            }
            Primitive::Path(path) => {
                let inside = self.paint.fill.is_some() && path.contains(point);
                inside || (self.paint.stroke.is_some() && outline_distance(path, point) <= half_width)
            }
            Primitive::Text { .. } => self.primitive.bounds().contains(point),
        }
    }
}

fn outline_distance(path: &BezPath, point: Point) -> f64 {
    path.segments()
        .map(|seg| seg.nearest(point, 1e-3).distance_sq)
        .fold(f64::INFINITY, f64::min)
        .sqrt()
}

/// A built frame.
#[derive(Debug, Clone)]
pub struct Scene {
    pub width: u32,
    pub height: u32,
    pub background: Color,
    /// Nodes in paint order (back to front).
    pub nodes: Vec<SceneNode>,
}

impl Scene {
    /// Topmost node under `point`, hit targets included.
    pub fn hit_test(&self, point: Point) -> Option<&SceneNode> {
        self.nodes.iter().rev().find(|node| node.hit(point))
    }

    /// Look up a node by key.
    pub fn node(&self, key: &str) -> Option<&SceneNode> {
        self.nodes.iter().find(|node| node.key == key)
    }

    /// The visible node of a shape.
    pub fn visual(&self, id: &ShapeId) -> Option<&SceneNode> {
        self.nodes
            .iter()
            .find(|node| node.role == NodeRole::Visual && &node.shape_id == id)
    }

    /// Move every node of a shape by `delta` without touching the shape.
    /// Used to show a drag in progress.
    pub fn offset_shape(&mut self, id: &ShapeId, delta: Vec2) {
        for node in self.nodes.iter_mut().filter(|n| &n.shape_id == id) {
            node.position += delta;
            match &mut node.primitive {
                Primitive::Polyline(points) => {
                    for point in points.iter_mut() {
                        *point += delta;
                    }
                }
                Primitive::Path(path) => path.apply_affine(Affine::translate(delta)),
                Primitive::Text { origin, .. } => *origin += delta,
            }
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Regular polygon with its first vertex straight above `center`.
pub fn regular_polygon(center: Point, sides: u32, radius: f64) -> BezPath {
    let mut path = BezPath::new();
    if sides < 3 {
        return path;
    }
    for i in 0..sides {
        let angle = 2.0 * PI * f64::from(i) / f64::from(sides);
        let vertex = Point::new(center.x + radius * angle.sin(), center.y - radius * angle.cos());
        if i == 0 {
            path.move_to(vertex);
        } else {
            path.line_to(vertex);
        }
    }
    path.close_path();
    path
}

/// Star with its first spike straight above `center`.
pub fn star(center: Point, points: u32, inner_radius: f64, outer_radius: f64) -> BezPath {
    let mut path = BezPath::new();
    if points == 0 {
        return path;
    }
    for i in 0..points * 2 {
        let radius = if i % 2 == 0 { outer_radius } else { inner_radius };
        let angle = PI * f64::from(i) / f64::from(points);
        let vertex = Point::new(center.x + radius * angle.sin(), center.y - radius * angle.cos());
        if i == 0 {
            path.move_to(vertex);
        } else {
            path.line_to(vertex);
        }
    }
    path.close_path();
    path
}

/// Geometry primitive for a shape.
pub fn shape_primitive(shape: &Shape) -> Primitive {
    let anchor = shape.anchor();
    match &shape.geometry {
        Geometry::Line { .. } => Primitive::Polyline(shape.line_points()),
        Geometry::Rect { width, height } => Primitive::Path(
            Rect::from_points(anchor, Point::new(anchor.x + width, anchor.y + height))
                .to_path(PATH_TOLERANCE),
        ),
        Geometry::Circle { radius } => {
            Primitive::Path(Circle::new(anchor, radius.abs()).to_path(PATH_TOLERANCE))
        }
        Geometry::Ellipse { radius_x, radius_y } => Primitive::Path(
            Ellipse::new(anchor, (radius_x.abs(), radius_y.abs()), 0.0).to_path(PATH_TOLERANCE),
        ),
        Geometry::Triangle { sides, radius } => {
            Primitive::Path(regular_polygon(anchor, *sides, *radius))
        }
        Geometry::Star {
            inner_radius,
            outer_radius,
        } => Primitive::Path(star(anchor, STAR_POINTS, *inner_radius, *outer_radius)),
        Geometry::Text { text, font_size } => Primitive::Text {
            origin: anchor,
            text: text.clone(),
            font_size: *font_size,
        },
    }
}

/// Build the scene for a shape list.
///
/// Each line gets a transparent, widened hit-target node painted before its
/// visible node.
pub fn build_scene(shapes: &[Shape], ctx: &RenderContext) -> Scene {
    let mut nodes = Vec::with_capacity(shapes.len());

    for shape in shapes {
        let selected = ctx.is_selected(&shape.id);
        let draggable = ctx.tool == ToolKind::Select && shape.draggable;
        let primitive = shape_primitive(shape);
        let is_line = matches!(shape.geometry, Geometry::Line { .. });
        let position = if is_line { Point::ZERO } else { shape.anchor() };

        if is_line {
            nodes.push(SceneNode {
                key: format!("{}{}", shape.id, HIT_KEY_SUFFIX),
                shape_id: shape.id.clone(),
                role: NodeRole::HitTarget,
                primitive: primitive.clone(),
                paint: Paint {
                    fill: None,
                    stroke: Some(Color::TRANSPARENT),
                    stroke_width: ctx.style.hit_stroke_width,
                },
                position,
                draggable,
                double_click: false,
            });
        }

        let (stroke, stroke_width) = if selected {
            (Some(ctx.style.highlight_color), ctx.style.highlight_width)
        } else {
            (parse_css_color(&shape.stroke), shape.stroke_width)
        };

        // Open polylines are never filled.
        let fill = if is_line {
            None
        } else {
            parse_css_color(&shape.fill)
        };

        nodes.push(SceneNode {
            key: shape.id.to_string(),
            shape_id: shape.id.clone(),
            role: NodeRole::Visual,
            primitive,
            paint: Paint {
                fill,
                stroke,
                stroke_width,
            },
            position,
            draggable,
            double_click: shape.is_text(),
        });
    }

    Scene {
        width: ctx.width,
        height: ctx.height,
        background: ctx.style.background_color,
        nodes,
    }
}
