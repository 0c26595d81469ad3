//! Sketchblock Core Library
//!
//! Platform-agnostic shape model, interaction engine and persistence for a
//! drawing canvas embedded as a block in a rich-text document.

pub mod bridge;
pub mod canvas;
pub mod config;
pub mod engine;
pub mod input;
pub mod node;
pub mod shapes;
pub mod storage;
pub mod tools;

pub use bridge::{PersistenceBridge, ShapePersistence};
pub use canvas::{CanvasState, decode_shape_list, shapes_from_json, shapes_to_json};
pub use config::{
    CacheScope, CanvasConfig, DEFAULT_CACHE_KEY, DEFAULT_HEIGHT, DEFAULT_WIDTH, LEGACY_CACHE_KEY,
};
pub use engine::{DrawingEngine, InteractionState, TextEdit};
pub use input::{KeyEvent, KeyOutcome, Modifiers, PointerEvent, PointerTarget};
pub use node::{AttrMap, MemoryNode, NodeAttributes};
pub use shapes::{Geometry, Shape, ShapeId, ShapeKind, ShapeStyle};
pub use storage::{Cache, MemoryCache, StorageError, StorageResult};
pub use tools::ToolKind;
