//! In-memory editor host for headless use and tests.

use crate::commands::{EditorError, EditorHost};
use crate::schema::{CANVAS_NODE, CanvasNodeAttrs, CanvasNodeOptions};
use sketchblock_core::node::{AttrMap, MemoryNode};

/// A document that is a flat list of canvas nodes.
#[derive(Debug)]
pub struct MemoryEditor {
    nodes: Vec<MemoryNode>,
    focused: bool,
    editable: bool,
    selected: Option<usize>,
}

impl Default for MemoryEditor {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            focused: false,
            editable: true,
            selected: None,
        }
    }
}

impl MemoryEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-only editors refuse every insert.
    pub fn set_editable(&mut self, editable: bool) {
        self.editable = editable;
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Handle to the node at `index`; clones share attributes.
    pub fn node(&self, index: usize) -> Option<MemoryNode> {
        self.nodes.get(index).cloned()
    }

    /// Select a node as a whole (node selection, not text selection).
    pub fn select_node(&mut self, index: Option<usize>) {
        self.selected = index.filter(|i| *i < self.nodes.len());
    }

    pub fn selected_node(&self) -> Option<usize> {
        self.selected
    }

    /// Serialize the document to HTML, one element per node.
    pub fn to_html(&self, options: &CanvasNodeOptions) -> String {
        self.nodes
            .iter()
            .map(|node| CanvasNodeAttrs::from_attr_map(&node.attributes()).render_html(options))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl EditorHost for MemoryEditor {
    type Node = MemoryNode;

    fn focus(&mut self) {
        self.focused = true;
    }

    fn can_insert(&self, node_type: &str) -> bool {
        self.editable && CANVAS_NODE.is_named(node_type)
    }

    fn insert_node(&mut self, node_type: &str, attrs: AttrMap) -> Result<MemoryNode, EditorError> {
        if !CANVAS_NODE.is_named(node_type) {
            return Err(EditorError::UnknownNodeType(node_type.to_string()));
        }
        if !self.editable {
            return Err(EditorError::InsertFailed("document is read-only".to_string()));
        }
        let node = MemoryNode::with_attributes(attrs);
        self.nodes.push(node.clone());
        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{InsertCanvasOptions, insert_canvas};

    #[test]
    fn test_unknown_node_type() {
        let mut editor = MemoryEditor::new();
        assert!(!editor.can_insert("image"));
        assert!(matches!(
            editor.insert_node("image", AttrMap::new()),
            Err(EditorError::UnknownNodeType(_))
        ));
    }

    #[test]
    fn test_select_node_bounds() {
        let mut editor = MemoryEditor::new();
        editor.select_node(Some(0));
        assert_eq!(editor.selected_node(), None);

        insert_canvas(&mut editor, &CanvasNodeOptions::default(), InsertCanvasOptions::default())
            .unwrap();
        editor.select_node(Some(0));
        assert_eq!(editor.selected_node(), Some(0));
    }

    #[test]
    fn test_document_html() {
        let mut editor = MemoryEditor::new();
        let options = CanvasNodeOptions::default();
        insert_canvas(&mut editor, &options, InsertCanvasOptions::sized(320, 200)).unwrap();

        assert_eq!(
            editor.to_html(&options),
            r#"<div data-height="200" data-type="drawing-canvas" data-width="320"></div>"#
        );
    }
}
