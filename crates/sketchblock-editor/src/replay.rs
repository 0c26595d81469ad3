//! Scripted interaction replay against an in-memory document.
//!
//! A script is a JSON array of steps such as
//! `[{"op":"insert"},{"op":"tool","tool":"rectangle"},{"op":"down","x":10,"y":10}]`.
//! Steps after `insert` act on the most recently inserted canvas.

use crate::commands::{EditorError, InsertCanvasOptions, insert_canvas};
use crate::keyboard::KeyboardHub;
use crate::memory::MemoryEditor;
use crate::node_view::CanvasNodeView;
use crate::schema::CanvasNodeOptions;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use sketchblock_core::bridge::PersistenceBridge;
use sketchblock_core::config::CanvasConfig;
use sketchblock_core::input::{KeyEvent, Modifiers};
use sketchblock_core::node::MemoryNode;
use sketchblock_core::shapes::Shape;
use sketchblock_core::storage::Cache;
use sketchblock_core::tools::ToolKind;
use sketchblock_render::{RenderStyle, SvgRenderer};

/// One scripted action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ReplayStep {
    /// Insert a canvas and mount a view for it.
    Insert {
        #[serde(default)]
        width: Option<u32>,
        #[serde(default)]
        height: Option<u32>,
    },
    Tool {
        tool: ToolKind,
    },
    Down {
        x: f64,
        y: f64,
    },
    Move {
        x: f64,
        y: f64,
    },
    Up {
        x: f64,
        y: f64,
    },
    DoubleClick {
        x: f64,
        y: f64,
    },
    /// A document-level key press.
    Key {
        key: String,
        #[serde(default)]
        modifiers: Modifiers,
    },
    /// Type into the text-edit input.
    Text {
        value: String,
    },
    Confirm,
    Cancel,
    Clear,
    Resize {
        width: u32,
        height: u32,
    },
    /// Host selects or deselects the canvas node.
    SelectNode {
        selected: bool,
    },
}

/// Final state after a replay.
#[derive(Debug, Clone)]
pub struct ReplayOutput {
    /// SVG of the last mounted canvas (empty if none).
    pub svg: String,
    /// HTML serialization of the whole document.
    pub html: String,
    /// Shapes of the last mounted canvas.
    pub shapes: Vec<Shape>,
}

/// Parse a replay script.
pub fn parse_script(json: &str) -> Result<Vec<ReplayStep>, EditorError> {
    Ok(serde_json::from_str(json)?)
}

type ReplayView<C> = CanvasNodeView<PersistenceBridge<MemoryNode, C>, SvgRenderer>;

/// Run `steps` against a fresh in-memory document mirrored into `cache`.
pub fn replay<C>(
    steps: &[ReplayStep],
    cache: C,
    options: &CanvasNodeOptions,
) -> Result<ReplayOutput, EditorError>
where
    C: Cache + Clone + 'static,
{
    let mut editor = MemoryEditor::new();
    let hub = KeyboardHub::new();
    let config = CanvasConfig {
        default_width: options.width,
        default_height: options.height,
        ..CanvasConfig::default()
    };
    let mut view: Option<ReplayView<C>> = None;

    for (index, step) in steps.iter().enumerate() {
        log::debug!("Replay step {}: {:?}", index, step);

        if let ReplayStep::Insert { width, height } = step {
            let node = insert_canvas(
                &mut editor,
                options,
                InsertCanvasOptions {
                    width: *width,
                    height: *height,
                },
            )?;
            if let Some(previous) = view.take() {
                previous.unmount();
            }
            let bridge = PersistenceBridge::new(node, cache.clone(), config.clone());
            view = Some(CanvasNodeView::mount(
                bridge,
                SvgRenderer::new(),
                RenderStyle::default(),
                &hub,
            ));
            continue;
        }

        let Some(current) = view.as_ref() else {
            return Err(EditorError::NotExecutable("no canvas inserted before interaction"));
        };

        match step {
            ReplayStep::Insert { .. } => {}
            ReplayStep::Tool { tool } => {
                current.set_tool(*tool);
            }
            ReplayStep::Down { x, y } => {
                current.pointer_down(Some(Point::new(*x, *y)));
            }
            ReplayStep::Move { x, y } => {
                current.pointer_move(Some(Point::new(*x, *y)));
            }
            ReplayStep::Up { x, y } => {
                current.pointer_up(Some(Point::new(*x, *y)));
            }
            ReplayStep::DoubleClick { x, y } => {
                current.double_click(Point::new(*x, *y));
            }
            ReplayStep::Key { key, modifiers } => {
                let event = KeyEvent::new(key.clone()).with_modifiers(*modifiers);
                if current.text_edit().is_some() {
                    current.text_edit_key(&event);
                } else {
                    hub.dispatch(&event);
                }
            }
            ReplayStep::Text { value } => {
                current.set_text_value(value.clone());
            }
            ReplayStep::Confirm => {
                current.confirm_text_edit();
            }
            ReplayStep::Cancel => {
                current.cancel_text_edit();
            }
            ReplayStep::Clear => {
                current.clear();
            }
            ReplayStep::Resize { width, height } => {
                current.resize(*width, *height);
            }
            ReplayStep::SelectNode { selected } => {
                let index = selected.then(|| editor.len().saturating_sub(1));
                editor.select_node(index);
                current.set_node_selected(*selected);
            }
        }
    }

    let (svg, shapes) = match &view {
        Some(current) => (current.with_renderer(|r| r.svg().to_string()), current.shapes()),
        None => (String::new(), Vec::new()),
    };

    Ok(ReplayOutput {
        svg,
        html: editor.to_html(options),
        shapes,
    })
}
