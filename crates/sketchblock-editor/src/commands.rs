//! Editor commands contributed by the canvas block.

use crate::schema::{CanvasNodeAttrs, CanvasNodeOptions, NODE_NAME};
use serde::{Deserialize, Serialize};
use sketchblock_core::node::{AttrMap, NodeAttributes};
use sketchblock_core::storage::StorageError;
use thiserror::Error;

/// Errors surfaced by host editor commands.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Command cannot run in the current editor state: {0}")]
    NotExecutable(&'static str),
    #[error("Unknown node type: {0}")]
    UnknownNodeType(String),
    #[error("Insert failed: {0}")]
    InsertFailed(String),
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// The slice of a rich-text editor the canvas block talks to.
pub trait EditorHost {
    /// Handle to an inserted document node.
    type Node: NodeAttributes;

    /// Move keyboard focus into the editor.
    fn focus(&mut self);

    /// Whether a node of `node_type` can be inserted at the cursor right now.
    fn can_insert(&self, node_type: &str) -> bool;

    /// Insert a node of `node_type` at the cursor.
    fn insert_node(&mut self, node_type: &str, attrs: AttrMap) -> Result<Self::Node, EditorError>;
}

/// Optional overrides for [`insert_canvas`]. Zero means "use the default".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InsertCanvasOptions {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl InsertCanvasOptions {
    pub fn sized(width: u32, height: u32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
        }
    }
}

/// Whether the canvas insert command can run.
pub fn can_insert_canvas<H: EditorHost>(host: &H) -> bool {
    host.can_insert(NODE_NAME)
}

/// Focus the editor and insert an empty canvas at the cursor.
pub fn insert_canvas<H: EditorHost>(
    host: &mut H,
    options: &CanvasNodeOptions,
    request: InsertCanvasOptions,
) -> Result<H::Node, EditorError> {
    host.focus();
    if !can_insert_canvas(host) {
        return Err(EditorError::NotExecutable("insert_canvas"));
    }

    let attrs = CanvasNodeAttrs {
        width: Some(request.width.filter(|w| *w > 0).unwrap_or(options.width)),
        height: Some(request.height.filter(|h| *h > 0).unwrap_or(options.height)),
        canvas_data: None,
    };
    log::debug!(
        "Inserting {} canvas {:?}x{:?}",
        NODE_NAME,
        attrs.width,
        attrs.height
    );
    host.insert_node(NODE_NAME, attrs.to_attr_map())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryEditor;
    use serde_json::json;
    use sketchblock_core::node::{ATTR_CANVAS_DATA, ATTR_HEIGHT, ATTR_WIDTH};

    #[test]
    fn test_insert_uses_defaults_for_missing_or_zero() {
        let mut editor = MemoryEditor::new();
        let options = CanvasNodeOptions::default();

        let node = insert_canvas(&mut editor, &options, InsertCanvasOptions::default()).unwrap();
        assert_eq!(node.attribute(ATTR_WIDTH), Some(json!(800)));
        assert_eq!(node.attribute(ATTR_HEIGHT), Some(json!(400)));
        assert_eq!(node.attribute(ATTR_CANVAS_DATA), None);

        let node = insert_canvas(&mut editor, &options, InsertCanvasOptions::sized(0, 300)).unwrap();
        assert_eq!(node.attribute(ATTR_WIDTH), Some(json!(800)));
        assert_eq!(node.attribute(ATTR_HEIGHT), Some(json!(300)));
        assert_eq!(editor.len(), 2);
    }

    #[test]
    fn test_insert_focuses_first() {
        let mut editor = MemoryEditor::new();
        assert!(!editor.is_focused());
        insert_canvas(&mut editor, &CanvasNodeOptions::default(), InsertCanvasOptions::default())
            .unwrap();
        assert!(editor.is_focused());
    }

    #[test]
    fn test_insert_refused_when_not_executable() {
        let mut editor = MemoryEditor::new();
        editor.set_editable(false);

        let result = insert_canvas(
            &mut editor,
            &CanvasNodeOptions::default(),
            InsertCanvasOptions::sized(100, 100),
        );
        assert!(matches!(result, Err(EditorError::NotExecutable(_))));
        assert!(editor.is_empty());
    }

    #[test]
    fn test_options_from_json() {
        let request: InsertCanvasOptions = serde_json::from_str(r#"{"width":640}"#).unwrap();
        assert_eq!(request.width, Some(640));
        assert_eq!(request.height, None);
    }
}
