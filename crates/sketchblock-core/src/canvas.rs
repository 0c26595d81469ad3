//! Canvas state owned by one document node.

use crate::shapes::{Shape, ShapeId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Width, height and ordered shape list of one canvas.
///
/// The order of `shapes` is the z-order: later shapes draw on top.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CanvasState {
    pub width: u32,
    pub height: u32,
    pub shapes: Vec<Shape>,
}

impl CanvasState {
    /// Create an empty canvas of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            shapes: Vec::new(),
        }
    }

    /// Get a shape by ID.
    pub fn shape(&self, id: &ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| &s.id == id)
    }

    /// Get a mutable reference to a shape by ID.
    pub fn shape_mut(&mut self, id: &ShapeId) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| &s.id == id)
    }

    pub fn contains(&self, id: &ShapeId) -> bool {
        self.shape(id).is_some()
    }

    /// Check if the canvas has no shapes.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Get the number of shapes.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }
}

/// Serialize a shape list to its JSON text form.
pub fn shapes_to_json(shapes: &[Shape]) -> Result<String, serde_json::Error> {
    serde_json::to_string(shapes)
}

/// Deserialize a shape list from JSON text.
pub fn shapes_from_json(json: &str) -> Result<Vec<Shape>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Decode a shape list entry by entry.
///
/// Entries that fail to decode are logged and skipped, so one bad or unknown
/// entry never costs the rest of the list.
pub fn decode_shape_list(items: Vec<Value>) -> Vec<Shape> {
    let total = items.len();
    let shapes: Vec<Shape> = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value::<Shape>(item) {
            Ok(shape) => Some(shape),
            Err(e) => {
                log::warn!("Skipping undecodable shape at index {}: {}", index, e);
                None
            }
        })
        .collect();
    if shapes.len() < total {
        log::warn!("Kept {} of {} stored shapes", shapes.len(), total);
    }
    shapes
}
