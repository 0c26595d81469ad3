//! Sketchblock Editor Integration
//!
//! Hosts the drawing canvas inside a rich-text editor: the node schema and
//! its HTML codec, the insert command and toolbar button, keyboard routing
//! between canvases, and the interactive node view.

pub mod commands;
pub mod keyboard;
mod logging;
pub mod memory;
pub mod node_view;
pub mod replay;
pub mod schema;
pub mod toolbar;

pub use commands::{EditorError, EditorHost, InsertCanvasOptions, can_insert_canvas, insert_canvas};
pub use keyboard::{InstanceId, KeyboardHub, KeyboardRegistration};
pub use logging::init_logging;
pub use memory::MemoryEditor;
pub use node_view::{CanvasNodeView, ToolButton, ToolbarAction};
pub use replay::{ReplayOutput, ReplayStep, parse_script, replay};
pub use schema::{CANVAS_NODE, CanvasNodeAttrs, CanvasNodeOptions, LEGACY_NODE_NAME, NODE_NAME, NodeSpec};
pub use toolbar::CanvasButton;

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::start;
