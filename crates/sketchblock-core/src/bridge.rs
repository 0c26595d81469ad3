//! Persistence bridge between the canvas, its document node and the cache.
//!
//! Every shape-list change is written through to the node's `canvasData`
//! attribute and mirrored into the local cache. On load the node attribute
//! wins; the cache is consulted only when the attribute is absent or empty,
//! and a non-empty cached list is copied back into the node. Undecodable
//! entries are skipped one by one rather than discarding the whole list.

use crate::canvas::{CanvasState, decode_shape_list, shapes_to_json};
use crate::config::CanvasConfig;
use crate::node::{ATTR_CANVAS_DATA, ATTR_HEIGHT, ATTR_WIDTH, AttrMap, NodeAttributes};
use crate::shapes::Shape;
use crate::storage::Cache;
use serde_json::Value;

/// Sink for shape-list replacements made by the interaction engine.
pub trait ShapePersistence {
    /// Load the canvas state. Never fails; bad data degrades to an empty list.
    fn load(&mut self) -> CanvasState;

    /// Persist the full shape list.
    fn save(&mut self, shapes: &[Shape]);

    /// Persist new stage dimensions together with the shape list.
    fn save_dimensions(&mut self, width: u32, height: u32, shapes: &[Shape]);
}

/// Reads and writes a canvas through its node attributes and the cache.
pub struct PersistenceBridge<N: NodeAttributes, C: Cache> {
    node: N,
    cache: C,
    config: CanvasConfig,
    cache_key: String,
}

impl<N: NodeAttributes, C: Cache> PersistenceBridge<N, C> {
    pub fn new(node: N, cache: C, config: CanvasConfig) -> Self {
        let cache_key = config.resolved_cache_key();
        Self {
            node,
            cache,
            config,
            cache_key,
        }
    }

    /// The node handle this bridge writes to.
    pub fn node(&self) -> &N {
        &self.node
    }

    /// The cache this bridge mirrors into.
    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub fn cache_key(&self) -> &str {
        &self.cache_key
    }

    fn dimension(&self, name: &str, default: u32) -> u32 {
        let parsed = match self.node.attribute(name) {
            Some(Value::Number(n)) => n.as_u64().or_else(|| n.as_f64().map(|f| f as u64)),
            Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
            _ => None,
        };
        match parsed.and_then(|v| u32::try_from(v).ok()) {
            Some(v) if v > 0 => v,
            _ => default,
        }
    }

    /// Shapes stored on the node.
    ///
    /// `None` means the node carries no shapes and the cache may be consulted.
    /// A present attribute always yields `Some`, even when none of its entries
    /// decode, so cached data never replaces what the document holds.
    fn node_shapes(&self) -> Option<Vec<Shape>> {
        let value = match self.node.attribute(ATTR_CANVAS_DATA)? {
            Value::String(text) if text.trim().is_empty() => return None,
            Value::String(text) => match serde_json::from_str::<Value>(&text) {
                Ok(value) => value,
                Err(e) => {
                    log::warn!("Failed to parse canvasData attribute: {}", e);
                    return Some(Vec::new());
                }
            },
            value => value,
        };

        match value {
            Value::Null => None,
            Value::Array(items) if items.is_empty() => None,
            Value::Array(items) => Some(decode_shape_list(items)),
            other => {
                log::warn!("Ignoring canvasData attribute of unexpected form: {}", other);
                Some(Vec::new())
            }
        }
    }

    /// Shapes under one cache key, if present, well-formed and non-empty.
    fn cached_shapes_at(&self, key: &str) -> Option<Vec<Shape>> {
        let text = match self.cache.get(key) {
            Ok(Some(text)) => text,
            Ok(None) => return None,
            Err(e) => {
                log::error!("Failed to read canvas cache '{}': {}", key, e);
                return None;
            }
        };

        let shapes = match serde_json::from_str::<Value>(&text) {
            Ok(Value::Array(items)) => decode_shape_list(items),
            Ok(other) => {
                log::error!("Saved canvas data under '{}' is not a list: {}", key, other);
                return None;
            }
            Err(e) => {
                log::error!("Failed to parse saved canvas data under '{}': {}", key, e);
                return None;
            }
        };
        (!shapes.is_empty()).then_some(shapes)
    }

    /// First non-empty cached list, checking the current key before legacy keys.
    fn cached_shapes(&self) -> Option<(String, Vec<Shape>)> {
        std::iter::once(self.cache_key.as_str())
            .chain(self.config.legacy_cache_keys().iter().map(String::as_str))
            .find_map(|key| self.cached_shapes_at(key).map(|shapes| (key.to_string(), shapes)))
    }

    fn write_node_shapes(&mut self, shapes: &[Shape], dimensions: Option<(u32, u32)>) {
        let value = match serde_json::to_value(shapes) {
            Ok(value) => value,
            Err(e) => {
                log::error!("Failed to serialize shapes for node attribute: {}", e);
                return;
            }
        };

        let mut attrs = AttrMap::new();
        if let Some((width, height)) = dimensions {
            attrs.insert(ATTR_WIDTH.to_string(), Value::from(width));
            attrs.insert(ATTR_HEIGHT.to_string(), Value::from(height));
        }
        attrs.insert(ATTR_CANVAS_DATA.to_string(), value);
        self.node.update_attributes(attrs);
    }

    fn mirror_to_cache(&self, shapes: &[Shape]) {
        let json = match shapes_to_json(shapes) {
            Ok(json) => json,
            Err(e) => {
                log::error!("Failed to serialize shapes for cache: {}", e);
                return;
            }
        };
        if let Err(e) = self.cache.set(&self.cache_key, &json) {
            log::error!("Failed to write canvas cache: {}", e);
        }
    }
}

impl<N: NodeAttributes, C: Cache> ShapePersistence for PersistenceBridge<N, C> {
    fn load(&mut self) -> CanvasState {
        let width = self.dimension(ATTR_WIDTH, self.config.default_width);
        let height = self.dimension(ATTR_HEIGHT, self.config.default_height);
        let mut state = CanvasState::new(width, height);

        if let Some(shapes) = self.node_shapes() {
            log::debug!("Loaded {} shapes from node attribute", shapes.len());
            state.shapes = shapes;
            return state;
        }

        if let Some((key, shapes)) = self.cached_shapes() {
            log::info!("Restored {} shapes from cache key '{}'", shapes.len(), key);
            self.write_node_shapes(&shapes, None);
            state.shapes = shapes;
        }

        state
    }

    fn save(&mut self, shapes: &[Shape]) {
        self.write_node_shapes(shapes, None);
        self.mirror_to_cache(shapes);
    }

    fn save_dimensions(&mut self, width: u32, height: u32, shapes: &[Shape]) {
        self.write_node_shapes(shapes, Some((width, height)));
        self.mirror_to_cache(shapes);
    }
}
