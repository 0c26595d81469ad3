//! Toolbar button that inserts a canvas.

use crate::commands::{EditorError, EditorHost, InsertCanvasOptions, can_insert_canvas, insert_canvas};
use crate::schema::CanvasNodeOptions;
use sketchblock_core::config::{DEFAULT_HEIGHT, DEFAULT_WIDTH};

/// The "insert canvas" toolbar button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanvasButton {
    pub text: String,
    pub width: u32,
    pub height: u32,
}

impl Default for CanvasButton {
    fn default() -> Self {
        Self {
            text: "Canvas".to_string(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl CanvasButton {
    /// Disabled while the host cannot run the insert command.
    pub fn is_disabled<H: EditorHost>(&self, host: &H) -> bool {
        !can_insert_canvas(host)
    }

    /// Handle a click. Returns the inserted node, or `None` when disabled.
    pub fn click<H: EditorHost>(
        &self,
        host: &mut H,
        options: &CanvasNodeOptions,
    ) -> Result<Option<H::Node>, EditorError> {
        if self.is_disabled(host) {
            log::debug!("{} button clicked while disabled", self.text);
            return Ok(None);
        }
        insert_canvas(host, options, InsertCanvasOptions::sized(self.width, self.height)).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryEditor;
    use serde_json::json;
    use sketchblock_core::node::{ATTR_WIDTH, NodeAttributes};

    #[test]
    fn test_defaults() {
        let button = CanvasButton::default();
        assert_eq!(button.text, "Canvas");
        assert_eq!((button.width, button.height), (800, 400));
    }

    #[test]
    fn test_click_inserts_node() {
        let mut editor = MemoryEditor::new();
        let button = CanvasButton {
            width: 1024,
            ..CanvasButton::default()
        };
        assert!(!button.is_disabled(&editor));

        let node = button
            .click(&mut editor, &CanvasNodeOptions::default())
            .unwrap()
            .unwrap();
        assert_eq!(node.attribute(ATTR_WIDTH), Some(json!(1024)));
        assert_eq!(editor.len(), 1);
    }

    #[test]
    fn test_disabled_click_is_noop() {
        let mut editor = MemoryEditor::new();
        editor.set_editable(false);
        let button = CanvasButton::default();

        assert!(button.is_disabled(&editor));
        let result = button.click(&mut editor, &CanvasNodeOptions::default()).unwrap();
        assert!(result.is_none());
        assert!(editor.is_empty());
        assert!(!editor.is_focused());
    }
}
