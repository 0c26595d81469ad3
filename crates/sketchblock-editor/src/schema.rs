//! Document schema entry for the canvas block and its HTML attribute codec.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sketchblock_core::config::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use sketchblock_core::node::{ATTR_CANVAS_DATA, ATTR_HEIGHT, ATTR_WIDTH, AttrMap};
use sketchblock_core::canvas::decode_shape_list;
use sketchblock_core::shapes::Shape;
use std::collections::BTreeMap;

/// Node type name registered with the host editor.
pub const NODE_NAME: &str = "drawingCanvas";

/// Value of the `data-type` attribute that marks a canvas element.
pub const DATA_TYPE: &str = "drawing-canvas";

/// Node name used by documents saved with earlier releases.
pub const LEGACY_NODE_NAME: &str = "konvaCanvas";

/// `data-type` used by markup saved with earlier releases. Accepted on parse,
/// never rendered.
pub const LEGACY_DATA_TYPE: &str = "konva-canvas";

pub const HTML_TAG: &str = "div";
pub const DATA_TYPE_ATTR: &str = "data-type";
pub const DATA_WIDTH_ATTR: &str = "data-width";
pub const DATA_HEIGHT_ATTR: &str = "data-height";
pub const DATA_CANVAS_ATTR: &str = "data-canvas";

/// HTML attributes of one element, by name.
pub type HtmlAttrs = BTreeMap<String, String>;

/// Static description of the canvas node type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeSpec {
    pub name: &'static str,
    /// Content group the node belongs to.
    pub group: &'static str,
    /// Atom nodes have no editable content and are never split.
    pub atom: bool,
    pub tag: &'static str,
    pub data_type: &'static str,
    /// Older names and `data-type` values still recognized on read.
    pub aliases: &'static [&'static str],
}

/// The canvas block: block-level and atomic.
pub const CANVAS_NODE: NodeSpec = NodeSpec {
    name: NODE_NAME,
    group: "block",
    atom: true,
    tag: HTML_TAG,
    data_type: DATA_TYPE,
    aliases: &[LEGACY_NODE_NAME, LEGACY_DATA_TYPE],
};

impl NodeSpec {
    /// Whether an element with this tag and attributes is a canvas node.
    pub fn matches(&self, tag: &str, attrs: &HtmlAttrs) -> bool {
        let Some(data_type) = attrs.get(DATA_TYPE_ATTR) else {
            return false;
        };
        tag.eq_ignore_ascii_case(self.tag)
            && (data_type == self.data_type || self.aliases.contains(&data_type.as_str()))
    }

    /// Whether `node_type` names this node, under its current or an older name.
    pub fn is_named(&self, node_type: &str) -> bool {
        node_type == self.name || self.aliases.contains(&node_type)
    }
}

/// Options the canvas node type is registered with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasNodeOptions {
    /// Width of newly inserted canvases.
    pub width: u32,
    /// Height of newly inserted canvases.
    pub height: u32,
    /// Extra attributes merged into every rendered element.
    pub html_attributes: HtmlAttrs,
}

impl Default for CanvasNodeOptions {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            html_attributes: HtmlAttrs::new(),
        }
    }
}

/// Persisted attributes of one canvas node.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CanvasNodeAttrs {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub canvas_data: Option<Vec<Shape>>,
}

impl CanvasNodeAttrs {
    /// Attributes of a fresh node: option dimensions, no shapes.
    pub fn with_defaults(options: &CanvasNodeOptions) -> Self {
        Self {
            width: Some(options.width),
            height: Some(options.height),
            canvas_data: None,
        }
    }

    /// Parse an element's HTML attributes.
    ///
    /// Returns `None` when the element is not a canvas node. Missing or
    /// unparsable dimensions fall back to the option defaults; a malformed
    /// `data-canvas` is logged and read as absent so the rest of the document
    /// still loads.
    pub fn parse_html(tag: &str, attrs: &HtmlAttrs, options: &CanvasNodeOptions) -> Option<Self> {
        if !CANVAS_NODE.matches(tag, attrs) {
            return None;
        }

        let dimension = |name: &str, default: u32| {
            attrs
                .get(name)
                .and_then(|v| v.trim().parse::<u32>().ok())
                .unwrap_or(default)
        };

        let canvas_data = attrs
            .get(DATA_CANVAS_ATTR)
            .filter(|raw| !raw.trim().is_empty())
            .and_then(|raw| match serde_json::from_str::<Value>(raw) {
                Ok(Value::Array(items)) => Some(decode_shape_list(items)),
                Ok(Value::Null) => None,
                Ok(other) => {
                    log::warn!("Ignoring {} attribute of unexpected form: {}", DATA_CANVAS_ATTR, other);
                    None
                }
                Err(e) => {
                    log::warn!("Ignoring malformed {} attribute: {}", DATA_CANVAS_ATTR, e);
                    None
                }
            });

        Some(Self {
            width: Some(dimension(DATA_WIDTH_ATTR, options.width)),
            height: Some(dimension(DATA_HEIGHT_ATTR, options.height)),
            canvas_data,
        })
    }

    /// HTML attributes for rendering. Zero or absent values are omitted.
    pub fn html_attributes(&self, options: &CanvasNodeOptions) -> HtmlAttrs {
        let mut attrs = options.html_attributes.clone();

        if let Some(width) = self.width.filter(|w| *w > 0) {
            attrs.insert(DATA_WIDTH_ATTR.to_string(), width.to_string());
        }
        if let Some(height) = self.height.filter(|h| *h > 0) {
            attrs.insert(DATA_HEIGHT_ATTR.to_string(), height.to_string());
        }
        if let Some(shapes) = &self.canvas_data {
            match serde_json::to_string(shapes) {
                Ok(json) => {
                    attrs.insert(DATA_CANVAS_ATTR.to_string(), json);
                }
                Err(e) => log::error!("Failed to serialize canvas data: {}", e),
            }
        }

        attrs.insert(DATA_TYPE_ATTR.to_string(), DATA_TYPE.to_string());
        attrs
    }

    /// Render the node as an HTML element.
    pub fn render_html(&self, options: &CanvasNodeOptions) -> String {
        let mut html = format!("<{}", HTML_TAG);
        for (name, value) in self.html_attributes(options) {
            html.push_str(&format!(" {}=\"{}\"", name, escape_attr(&value)));
        }
        html.push_str(&format!("></{}>", HTML_TAG));
        html
    }

    /// Read attributes from a node attribute map.
    pub fn from_attr_map(map: &AttrMap) -> Self {
        let dimension = |name: &str| match map.get(name) {
            Some(Value::Number(n)) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        };

        let canvas_data = match map.get(ATTR_CANVAS_DATA) {
            Some(Value::Array(items)) => Some(decode_shape_list(items.clone())),
            Some(Value::String(raw)) => match serde_json::from_str::<Value>(raw) {
                Ok(Value::Array(items)) => Some(decode_shape_list(items)),
                _ => None,
            },
            _ => None,
        };

        Self {
            width: dimension(ATTR_WIDTH),
            height: dimension(ATTR_HEIGHT),
            canvas_data,
        }
    }

    /// Convert to a node attribute map. Absent values are left out.
    pub fn to_attr_map(&self) -> AttrMap {
        let mut map = AttrMap::new();
        if let Some(width) = self.width {
            map.insert(ATTR_WIDTH.to_string(), Value::from(width));
        }
        if let Some(height) = self.height {
            map.insert(ATTR_HEIGHT.to_string(), Value::from(height));
        }
        if let Some(shapes) = &self.canvas_data {
            match serde_json::to_value(shapes) {
                Ok(value) => {
                    map.insert(ATTR_CANVAS_DATA.to_string(), value);
                }
                Err(e) => log::error!("Failed to serialize canvas data: {}", e),
            }
        }
        map
    }
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;
    use sketchblock_core::tools::ToolKind;

    fn html_attrs(pairs: &[(&str, &str)]) -> HtmlAttrs {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_node_spec() {
        assert_eq!(CANVAS_NODE.name, "drawingCanvas");
        assert_eq!(CANVAS_NODE.group, "block");
        assert!(CANVAS_NODE.atom);
        assert!(CANVAS_NODE.matches("DIV", &html_attrs(&[("data-type", "drawing-canvas")])));
        assert!(!CANVAS_NODE.matches("div", &html_attrs(&[("data-type", "image")])));
        assert!(!CANVAS_NODE.matches("span", &html_attrs(&[("data-type", "drawing-canvas")])));
        assert!(CANVAS_NODE.is_named("drawingCanvas"));
        assert!(CANVAS_NODE.is_named(LEGACY_NODE_NAME));
        assert!(!CANVAS_NODE.is_named("image"));
    }

    #[test]
    fn test_parse_legacy_markup() {
        let options = CanvasNodeOptions::default();
        let circle = ToolKind::Circle.create_shape(Point::new(30.0, 30.0)).unwrap();
        let data = serde_json::to_string(&vec![circle.clone()]).unwrap();
        let attrs = html_attrs(&[
            ("data-type", "konva-canvas"),
            ("data-width", "600"),
            ("data-canvas", data.as_str()),
        ]);

        let parsed = CanvasNodeAttrs::parse_html("div", &attrs, &options).unwrap();
        assert_eq!(parsed.width, Some(600));
        assert_eq!(parsed.canvas_data, Some(vec![circle]));

        // Re-rendering upgrades the marker.
        let rendered = parsed.html_attributes(&options);
        assert_eq!(rendered.get(DATA_TYPE_ATTR).map(String::as_str), Some(DATA_TYPE));
    }

    #[test]
    fn test_parse_keeps_valid_entries_of_partly_bad_data() {
        let options = CanvasNodeOptions::default();
        let rect = ToolKind::Rectangle.create_shape(Point::new(1.0, 2.0)).unwrap();
        let data = format!(r#"[{},{{"type":"arrow"}}]"#, serde_json::to_string(&rect).unwrap());
        let attrs = html_attrs(&[("data-type", "drawing-canvas"), ("data-canvas", data.as_str())]);

        let parsed = CanvasNodeAttrs::parse_html("div", &attrs, &options).unwrap();
        assert_eq!(parsed.canvas_data, Some(vec![rect.clone()]));

        let mut map = AttrMap::new();
        map.insert(
            ATTR_CANVAS_DATA.to_string(),
            serde_json::json!([serde_json::to_value(&rect).unwrap(), 7]),
        );
        assert_eq!(CanvasNodeAttrs::from_attr_map(&map).canvas_data, Some(vec![rect]));
    }

    #[test]
    fn test_render_omits_absent_and_zero() {
        let options = CanvasNodeOptions::default();
        let attrs = CanvasNodeAttrs {
            width: Some(0),
            height: None,
            canvas_data: None,
        };
        assert_eq!(attrs.render_html(&options), r#"<div data-type="drawing-canvas"></div>"#);
    }

    #[test]
    fn test_render_escapes_canvas_json() {
        let attrs = CanvasNodeAttrs {
            width: Some(800),
            height: Some(400),
            canvas_data: Some(Vec::new()),
        };
        let html = attrs.render_html(&CanvasNodeOptions::default());
        assert_eq!(
            html,
            r#"<div data-canvas="[]" data-height="400" data-type="drawing-canvas" data-width="800"></div>"#
        );

        let shapes: Vec<Shape> = ToolKind::Text.create_shape(Point::new(1.0, 1.0)).into_iter().collect();
        let html = CanvasNodeAttrs {
            canvas_data: Some(shapes),
            ..attrs
        }
        .render_html(&CanvasNodeOptions::default());
        assert!(html.contains("&quot;type&quot;:&quot;text&quot;"));
        assert!(!html.contains("\"type\""));
    }

    #[test]
    fn test_extra_html_attributes_are_merged() {
        let mut options = CanvasNodeOptions::default();
        options
            .html_attributes
            .insert("class".to_string(), "canvas-block".to_string());
        options
            .html_attributes
            .insert(DATA_TYPE_ATTR.to_string(), "overridden".to_string());

        let attrs = CanvasNodeAttrs::with_defaults(&options).html_attributes(&options);
        assert_eq!(attrs.get("class").map(String::as_str), Some("canvas-block"));
        assert_eq!(attrs.get(DATA_TYPE_ATTR).map(String::as_str), Some(DATA_TYPE));
    }

    #[test]
    fn test_html_round_trip() {
        let options = CanvasNodeOptions::default();
        let shapes: Vec<Shape> = [ToolKind::Pen, ToolKind::Star]
            .iter()
            .filter_map(|t| t.create_shape(Point::new(4.0, 2.0)))
            .collect();
        let original = CanvasNodeAttrs {
            width: Some(640),
            height: Some(320),
            canvas_data: Some(shapes),
        };

        let parsed = CanvasNodeAttrs::parse_html("div", &original.html_attributes(&options), &options);
        assert_eq!(parsed, Some(original));
    }

    #[test]
    fn test_parse_defaults_and_malformed_data() {
        let options = CanvasNodeOptions::default();
        let attrs = html_attrs(&[
            ("data-type", "drawing-canvas"),
            ("data-width", "wide"),
            ("data-canvas", "[{\"id\":"),
        ]);

        let parsed = CanvasNodeAttrs::parse_html("div", &attrs, &options).unwrap();
        assert_eq!(parsed.width, Some(800));
        assert_eq!(parsed.height, Some(400));
        assert_eq!(parsed.canvas_data, None);

        let null = html_attrs(&[("data-type", "drawing-canvas"), ("data-canvas", "null")]);
        let parsed = CanvasNodeAttrs::parse_html("div", &null, &options).unwrap();
        assert_eq!(parsed.canvas_data, None);

        assert!(CanvasNodeAttrs::parse_html("div", &HtmlAttrs::new(), &options).is_none());
    }

    #[test]
    fn test_attr_map_conversion() {
        let attrs = CanvasNodeAttrs {
            width: Some(800),
            height: Some(400),
            canvas_data: Some(Vec::new()),
        };
        let map = attrs.to_attr_map();
        assert_eq!(map.get(ATTR_WIDTH), Some(&Value::from(800)));
        assert_eq!(CanvasNodeAttrs::from_attr_map(&map), attrs);

        let empty = CanvasNodeAttrs::from_attr_map(&AttrMap::new());
        assert_eq!(empty, CanvasNodeAttrs::default());
    }
}
