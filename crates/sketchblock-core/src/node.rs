//! The hosting document node, seen through a narrow attribute interface.
//!
//! The canvas never owns the document node. It reads and writes attributes
//! through [`NodeAttributes`], which the host editor implements.

use serde_json::{Map, Value};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Attribute holding the stage width in pixels.
pub const ATTR_WIDTH: &str = "width";
/// Attribute holding the stage height in pixels.
pub const ATTR_HEIGHT: &str = "height";
/// Attribute holding the serialized shape list.
pub const ATTR_CANVAS_DATA: &str = "canvasData";

/// Attribute map as stored on a host node.
pub type AttrMap = Map<String, Value>;

/// Attribute access on the document node that hosts a canvas.
pub trait NodeAttributes {
    /// Read one attribute; `None` when absent.
    fn attribute(&self, name: &str) -> Option<Value>;

    /// Merge `attrs` into the node's attributes.
    fn update_attributes(&mut self, attrs: AttrMap);
}

/// In-memory node for tests and headless hosts.
///
/// Clones share the same attribute store, so a host can keep one handle
/// while the canvas owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryNode {
    attrs: Rc<RefCell<AttrMap>>,
    writes: Rc<Cell<usize>>,
}

impl MemoryNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a node pre-populated with attributes.
    pub fn with_attributes(attrs: AttrMap) -> Self {
        Self {
            attrs: Rc::new(RefCell::new(attrs)),
            writes: Rc::default(),
        }
    }

    /// Snapshot of all attributes.
    pub fn attributes(&self) -> AttrMap {
        self.attrs.borrow().clone()
    }

    /// Number of `update_attributes` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }
}

impl NodeAttributes for MemoryNode {
    fn attribute(&self, name: &str) -> Option<Value> {
        self.attrs.borrow().get(name).cloned()
    }

    fn update_attributes(&mut self, attrs: AttrMap) {
        self.writes.set(self.writes.get() + 1);
        self.attrs.borrow_mut().extend(attrs);
    }
}
