//! Drawing interaction engine.
//!
//! Turns pointer, keyboard and toolbar events plus the active tool into
//! shape-list mutations. Every mutation is persisted immediately through
//! the engine's [`ShapePersistence`] sink.
//!
//! States: `Idle` and `Drawing`, with text editing as an orthogonal overlay
//! that can be open in either state.

use crate::bridge::ShapePersistence;
use crate::canvas::CanvasState;
use crate::input::{KeyEvent, KeyOutcome, PointerEvent, PointerTarget};
use crate::shapes::{Geometry, STAR_INNER_RATIO, Shape, ShapeId};
use crate::tools::ToolKind;
use kurbo::Point;

/// State of a pointer interaction.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    /// A shape is being grown by pointer moves.
    Drawing {
        /// Pointer-down position.
        anchor: Point,
        /// Flattened pen path accumulated so far (pen tool only).
        path: Vec<f64>,
    },
}

/// An open text-edit dialog bound to one text shape.
#[derive(Debug, Clone, PartialEq)]
pub struct TextEdit {
    pub shape_id: ShapeId,
    /// Current content of the input field.
    pub value: String,
}

/// The interaction state machine for one canvas instance.
pub struct DrawingEngine<P: ShapePersistence> {
    persistence: P,
    canvas: CanvasState,
    tool: ToolKind,
    interaction: InteractionState,
    selection: Option<ShapeId>,
    text_edit: Option<TextEdit>,
}

impl<P: ShapePersistence> DrawingEngine<P> {
    /// Create an engine, loading the initial canvas through `persistence`.
    pub fn new(mut persistence: P) -> Self {
        let canvas = persistence.load();
        log::debug!(
            "Canvas loaded: {}x{} with {} shapes",
            canvas.width,
            canvas.height,
            canvas.len()
        );
        Self {
            persistence,
            canvas,
            tool: ToolKind::default(),
            interaction: InteractionState::Idle,
            selection: None,
            text_edit: None,
        }
    }

    pub fn canvas(&self) -> &CanvasState {
        &self.canvas
    }

    /// Shapes in z-order.
    pub fn shapes(&self) -> &[Shape] {
        &self.canvas.shapes
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.interaction, InteractionState::Drawing { .. })
    }

    /// Currently selected shape, if any.
    pub fn selection(&self) -> Option<&ShapeId> {
        self.selection.as_ref()
    }

    /// Open text-edit dialog, if any.
    pub fn text_edit(&self) -> Option<&TextEdit> {
        self.text_edit.as_ref()
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    /// Replace the shape list and persist it.
    pub fn update_shapes(&mut self, shapes: Vec<Shape>) {
        self.canvas.shapes = shapes;
        self.persist();
    }

    fn persist(&mut self) {
        self.persistence.save(&self.canvas.shapes);
    }

    /// Dispatch a pointer event. Returns true if a redraw is needed.
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> bool {
        match event {
            PointerEvent::Down { position, target } => self.pointer_down(*position, target),
            PointerEvent::Move { position } => self.pointer_move(*position),
            PointerEvent::Up => self.pointer_up(),
        }
    }

    /// Start drawing a new shape when the pointer goes down on empty stage.
    pub fn pointer_down(&mut self, position: Option<Point>, target: &PointerTarget) -> bool {
        // Shapes handle their own clicks.
        if *target != PointerTarget::Stage {
            return false;
        }
        if !self.tool.is_drawing() {
            return false;
        }
        let Some(point) = position else {
            return false;
        };
        let Some(mut shape) = self.tool.create_shape(point) else {
            return false;
        };
        while self.canvas.contains(&shape.id) {
            shape.id = ShapeId::generate();
        }

        let path = if self.tool == ToolKind::Pen {
            vec![point.x, point.y]
        } else {
            Vec::new()
        };

        log::debug!("Begin {} at ({}, {})", shape.kind().name(), point.x, point.y);
        self.selection = None;
        self.interaction = InteractionState::Drawing {
            anchor: point,
            path,
        };
        self.canvas.shapes.push(shape);
        self.persist();
        true
    }

    /// Grow the shape being drawn toward the pointer.
    pub fn pointer_move(&mut self, position: Option<Point>) -> bool {
        let InteractionState::Drawing { anchor, path } = &mut self.interaction else {
            return false;
        };
        let anchor = *anchor;
        let Some(point) = position else {
            return false;
        };
        let Some(shape) = self.canvas.shapes.last_mut() else {
            return false;
        };

        match &mut shape.geometry {
            Geometry::Line { points } => {
                path.extend([point.x, point.y]);
                *points = path.clone();
            }
            Geometry::Rect { width, height } => {
                *width = point.x - anchor.x;
                *height = point.y - anchor.y;
            }
            Geometry::Circle { radius } | Geometry::Triangle { radius, .. } => {
                *radius = anchor.distance(point);
            }
            Geometry::Ellipse { radius_x, radius_y } => {
                *radius_x = (point.x - anchor.x).abs();
                *radius_y = (point.y - anchor.y).abs();
            }
            Geometry::Star {
                inner_radius,
                outer_radius,
            } => {
                *outer_radius = anchor.distance(point);
                *inner_radius = *outer_radius * STAR_INNER_RATIO;
            }
            // Text is placed at full size on pointer-down.
            Geometry::Text { .. } => return false,
        }

        self.persist();
        true
    }

    /// Finish the current drawing interaction.
    pub fn pointer_up(&mut self) -> bool {
        if self.is_drawing() {
            log::debug!("End drawing");
            self.interaction = InteractionState::Idle;
            true
        } else {
            false
        }
    }

    /// Toggle selection of a clicked shape (select tool only).
    pub fn shape_click(&mut self, id: &ShapeId) -> bool {
        if self.tool != ToolKind::Select || !self.canvas.contains(id) {
            return false;
        }
        if self.selection.as_ref() == Some(id) {
            self.selection = None;
        } else {
            self.selection = Some(id.clone());
        }
        true
    }

    /// Reconcile a shape's model position after the render layer dragged it.
    ///
    /// `rendered` is the dragged node's final position. Line nodes are drawn
    /// at the origin with absolute points, so for them it is the drag offset.
    pub fn shape_drag_end(&mut self, id: &ShapeId, rendered: Option<Point>) -> bool {
        let Some(position) = rendered else {
            return false;
        };
        let Some(shape) = self.canvas.shape_mut(id) else {
            return false;
        };

        match shape.geometry {
            Geometry::Line { .. } => shape.translate(position.to_vec2()),
            _ => {
                shape.x = position.x;
                shape.y = position.y;
            }
        }

        self.persist();
        true
    }

    /// Open the text-edit dialog for a double-clicked text shape.
    pub fn double_click(&mut self, id: &ShapeId) -> bool {
        let Some(text) = self.canvas.shape(id).and_then(|s| s.text()) else {
            return false;
        };
        self.text_edit = Some(TextEdit {
            shape_id: id.clone(),
            value: text.to_string(),
        });
        true
    }

    /// Update the text-edit input field.
    pub fn set_text_value(&mut self, value: impl Into<String>) -> bool {
        match &mut self.text_edit {
            Some(edit) => {
                edit.value = value.into();
                true
            }
            None => false,
        }
    }

    /// Commit the text-edit value into its shape and close the dialog.
    pub fn confirm_text_edit(&mut self) -> bool {
        let Some(edit) = self.text_edit.take() else {
            return false;
        };
        let updated = match self.canvas.shape_mut(&edit.shape_id) {
            Some(Shape {
                geometry: Geometry::Text { text, .. },
                ..
            }) => {
                *text = edit.value;
                true
            }
            _ => false,
        };
        if updated {
            self.persist();
        }
        true
    }

    /// Close the text-edit dialog without changes.
    pub fn cancel_text_edit(&mut self) -> bool {
        self.text_edit.take().is_some()
    }

    /// Keys typed into the text-edit input: Enter confirms, Escape cancels.
    pub fn text_edit_key(&mut self, event: &KeyEvent) -> KeyOutcome {
        if self.text_edit.is_none() {
            return KeyOutcome::Ignored;
        }
        if event.is_enter() {
            self.confirm_text_edit();
            KeyOutcome::Consumed
        } else if event.is_escape() {
            self.cancel_text_edit();
            KeyOutcome::Consumed
        } else {
            KeyOutcome::Ignored
        }
    }

    /// Canvas-level keyboard shortcuts.
    ///
    /// `canvas_selected` is whether the host reports the canvas node itself as
    /// selected. Ctrl/Cmd+Z only clears the shape selection; it is not undo.
    pub fn handle_key(&mut self, event: &KeyEvent, canvas_selected: bool) -> KeyOutcome {
        if self.text_edit_key(event).is_consumed() {
            return KeyOutcome::Consumed;
        }

        if event.is_escape() && self.selection.is_some() {
            self.selection = None;
            return KeyOutcome::Consumed;
        }

        if canvas_selected && event.is_undo() {
            self.selection = None;
            return KeyOutcome::Consumed;
        }

        KeyOutcome::Ignored
    }

    /// Remove every shape.
    pub fn clear(&mut self) -> bool {
        log::debug!("Clearing {} shapes", self.canvas.len());
        self.interaction = InteractionState::Idle;
        self.selection = None;
        self.text_edit = None;
        self.update_shapes(Vec::new());
        true
    }

    /// Switch the active tool. Ends any drawing in progress.
    pub fn set_tool(&mut self, tool: ToolKind) -> bool {
        if tool.is_drawing() {
            self.selection = None;
        }
        self.interaction = InteractionState::Idle;
        self.tool = tool;
        true
    }

    /// Resize the stage and persist the new dimensions with the shapes.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        self.canvas.width = width;
        self.canvas.height = height;
        self.persistence
            .save_dimensions(width, height, &self.canvas.shapes);
        true
    }
}
