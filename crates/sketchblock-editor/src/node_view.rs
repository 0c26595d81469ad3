//! Interactive view of one canvas node.
//!
//! Owns the interaction engine and a renderer, routes raw stage pointer
//! events through scene hit-testing, and redraws after every change. While
//! mounted it holds a keyboard registration on the shared [`KeyboardHub`].

use crate::keyboard::{InstanceId, KeyboardHub, KeyboardRegistration};
use kurbo::Point;
use sketchblock_core::bridge::ShapePersistence;
use sketchblock_core::engine::{DrawingEngine, TextEdit};
use sketchblock_core::input::{KeyEvent, KeyOutcome, PointerTarget};
use sketchblock_core::shapes::{Shape, ShapeId};
use sketchblock_core::tools::ToolKind;
use sketchblock_render::{RenderContext, RenderStyle, Renderer, Scene, build_scene};
use std::cell::RefCell;
use std::rc::Rc;

/// What a tool bar entry does when pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    Tool(ToolKind),
    /// Remove every shape.
    Clear,
}

/// One entry of the canvas tool bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolButton {
    pub action: ToolbarAction,
    pub label: &'static str,
    /// Set on the entry of the current tool.
    pub active: bool,
}

/// Pointer pressed on a shape.
#[derive(Debug, Clone)]
struct Press {
    shape_id: ShapeId,
    start: Point,
    /// Scene position of the pressed node.
    origin: Point,
    draggable: bool,
    /// Latest pointer position once a drag has started.
    current: Option<Point>,
}

struct ViewState<P: ShapePersistence, R: Renderer> {
    engine: DrawingEngine<P>,
    renderer: R,
    style: RenderStyle,
    scene: Scene,
    press: Option<Press>,
    /// Whether the host reports this node as selected.
    node_selected: bool,
}

impl<P: ShapePersistence, R: Renderer> ViewState<P, R> {
    fn redraw(&mut self) {
        let canvas = self.engine.canvas();
        let ctx = RenderContext::new(canvas.width, canvas.height)
            .with_selection(self.engine.selection())
            .with_tool(self.engine.tool())
            .with_style(self.style.clone());
        let mut scene = build_scene(&canvas.shapes, &ctx);

        if let Some(press) = &self.press {
            if let Some(current) = press.current {
                scene.offset_shape(&press.shape_id, current - press.start);
            }
        }

        if let Err(e) = self.renderer.render(&scene) {
            log::error!("Failed to render canvas: {}", e);
        }
        self.scene = scene;
    }

    fn key(&mut self, event: &KeyEvent) -> KeyOutcome {
        let outcome = self.engine.handle_key(event, self.node_selected);
        if outcome.is_consumed() {
            self.redraw();
        }
        outcome
    }

    fn redraw_if(&mut self, changed: bool) -> bool {
        if changed {
            self.redraw();
        }
        changed
    }
}

/// A mounted canvas node.
pub struct CanvasNodeView<P, R>
where
    P: ShapePersistence + 'static,
    R: Renderer + 'static,
{
    state: Rc<RefCell<ViewState<P, R>>>,
    hub: KeyboardHub,
    registration: KeyboardRegistration,
}

impl<P, R> CanvasNodeView<P, R>
where
    P: ShapePersistence + 'static,
    R: Renderer + 'static,
{
    /// Load the canvas, draw the first frame and start listening for keys.
    pub fn mount(persistence: P, renderer: R, style: RenderStyle, hub: &KeyboardHub) -> Self {
        let engine = DrawingEngine::new(persistence);
        let canvas = engine.canvas();
        let scene = build_scene(&canvas.shapes, &RenderContext::new(canvas.width, canvas.height));

        let state = Rc::new(RefCell::new(ViewState {
            engine,
            renderer,
            style,
            scene,
            press: None,
            node_selected: false,
        }));
        state.borrow_mut().redraw();

        let weak = Rc::downgrade(&state);
        let registration = hub.register(move |event| {
            let Some(state) = weak.upgrade() else {
                return KeyOutcome::Ignored;
            };
            let Ok(mut state) = state.try_borrow_mut() else {
                return KeyOutcome::Ignored;
            };
            state.key(event)
        });
        log::debug!("Canvas view {} mounted", registration.id());

        Self {
            state,
            hub: hub.clone(),
            registration,
        }
    }

    /// Stop listening for keys and release the view.
    pub fn unmount(self) {
        log::debug!("Canvas view {} unmounted", self.registration.id());
    }

    pub fn instance_id(&self) -> InstanceId {
        self.registration.id()
    }

    /// Pointer pressed on the stage.
    pub fn pointer_down(&self, position: Option<Point>) -> bool {
        self.hub.focus(self.instance_id());
        let mut state = self.state.borrow_mut();

        let hit = position.and_then(|p| {
            state.scene.hit_test(p).map(|node| Press {
                shape_id: node.shape_id.clone(),
                start: p,
                origin: node.position,
                draggable: node.draggable,
                current: None,
            })
        });

        let target = match &hit {
            Some(press) => PointerTarget::Shape(press.shape_id.clone()),
            None => PointerTarget::Stage,
        };
        state.press = hit;

        let changed = state.engine.pointer_down(position, &target);
        state.redraw_if(changed)
    }

    /// Pointer moved over the stage.
    pub fn pointer_move(&self, position: Option<Point>) -> bool {
        let mut state = self.state.borrow_mut();

        if let Some(press) = state.press.as_mut() {
            let Some(point) = position else {
                return false;
            };
            if !press.draggable {
                return false;
            }
            press.current = Some(point);
            state.redraw();
            return true;
        }

        let changed = state.engine.pointer_move(position);
        state.redraw_if(changed)
    }

    /// Pointer released. A press on a shape ends as a click or a drag.
    pub fn pointer_up(&self, position: Option<Point>) -> bool {
        let mut state = self.state.borrow_mut();

        let press = state.press.take();
        let mut changed = match press {
            Some(press) => match press.current {
                Some(current) => {
                    let end = position.unwrap_or(current);
                    let rendered = press.origin + (end - press.start);
                    state.engine.shape_drag_end(&press.shape_id, Some(rendered));
                    // The drag offset must be cleared even if nothing moved.
                    true
                }
                None => state.engine.shape_click(&press.shape_id),
            },
            None => false,
        };
        changed |= state.engine.pointer_up();
        state.redraw_if(changed)
    }

    /// Double-click on the stage; opens the text editor over a text shape.
    pub fn double_click(&self, position: Point) -> bool {
        let mut state = self.state.borrow_mut();
        let target = state
            .scene
            .hit_test(position)
            .filter(|node| node.double_click)
            .map(|node| node.shape_id.clone());

        let changed = match target {
            Some(id) => state.engine.double_click(&id),
            None => false,
        };
        state.redraw_if(changed)
    }

    /// Deliver a key event directly, bypassing focus routing.
    pub fn key(&self, event: &KeyEvent) -> KeyOutcome {
        self.state.borrow_mut().key(event)
    }

    /// Host node selection changed. A selected node takes keyboard focus.
    pub fn set_node_selected(&self, selected: bool) {
        self.state.borrow_mut().node_selected = selected;
        if selected {
            self.hub.focus(self.instance_id());
        }
    }

    pub fn set_tool(&self, tool: ToolKind) -> bool {
        let mut state = self.state.borrow_mut();
        state.press = None;
        let changed = state.engine.set_tool(tool);
        state.redraw_if(changed)
    }

    pub fn clear(&self) -> bool {
        let mut state = self.state.borrow_mut();
        state.press = None;
        let changed = state.engine.clear();
        state.redraw_if(changed)
    }

    pub fn resize(&self, width: u32, height: u32) -> bool {
        let mut state = self.state.borrow_mut();
        let changed = state.engine.resize(width, height);
        state.redraw_if(changed)
    }

    pub fn set_text_value(&self, value: impl Into<String>) -> bool {
        self.state.borrow_mut().engine.set_text_value(value)
    }

    pub fn confirm_text_edit(&self) -> bool {
        let mut state = self.state.borrow_mut();
        let changed = state.engine.confirm_text_edit();
        state.redraw_if(changed)
    }

    pub fn cancel_text_edit(&self) -> bool {
        self.state.borrow_mut().engine.cancel_text_edit()
    }

    /// Keys typed into the text-edit input.
    pub fn text_edit_key(&self, event: &KeyEvent) -> KeyOutcome {
        let mut state = self.state.borrow_mut();
        let outcome = state.engine.text_edit_key(event);
        state.redraw_if(outcome.is_consumed());
        outcome
    }

    /// Tool bar entries in display order: every tool, then Clear.
    pub fn toolbar(&self) -> Vec<ToolButton> {
        let active = self.tool();
        ToolKind::all()
            .iter()
            .map(|tool| ToolButton {
                action: ToolbarAction::Tool(*tool),
                label: tool.display_name(),
                active: *tool == active,
            })
            .chain(std::iter::once(ToolButton {
                action: ToolbarAction::Clear,
                label: "Clear",
                active: false,
            }))
            .collect()
    }

    /// Press a tool bar entry.
    pub fn press(&self, action: ToolbarAction) -> bool {
        match action {
            ToolbarAction::Tool(tool) => self.set_tool(tool),
            ToolbarAction::Clear => self.clear(),
        }
    }

    pub fn tool(&self) -> ToolKind {
        self.state.borrow().engine.tool()
    }

    pub fn shapes(&self) -> Vec<Shape> {
        self.state.borrow().engine.shapes().to_vec()
    }

    pub fn selection(&self) -> Option<ShapeId> {
        self.state.borrow().engine.selection().cloned()
    }

    pub fn text_edit(&self) -> Option<TextEdit> {
        self.state.borrow().engine.text_edit().cloned()
    }

    /// Stage size in pixels.
    pub fn size(&self) -> (u32, u32) {
        let state = self.state.borrow();
        let canvas = state.engine.canvas();
        (canvas.width, canvas.height)
    }

    /// The last built scene.
    pub fn scene(&self) -> Scene {
        self.state.borrow().scene.clone()
    }

    /// Inspect the renderer, e.g. to read its output.
    pub fn with_renderer<T>(&self, f: impl FnOnce(&R) -> T) -> T {
        f(&self.state.borrow().renderer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sketchblock_core::bridge::PersistenceBridge;
    use sketchblock_core::config::CanvasConfig;
    use sketchblock_core::input::Modifiers;
    use sketchblock_core::node::{ATTR_CANVAS_DATA, MemoryNode, NodeAttributes};
    use sketchblock_core::shapes::Geometry;
    use sketchblock_core::storage::MemoryCache;
    use sketchblock_render::SvgRenderer;
    use std::sync::Arc;

    type TestView = CanvasNodeView<PersistenceBridge<MemoryNode, Arc<MemoryCache>>, SvgRenderer>;

    fn mount(hub: &KeyboardHub) -> (TestView, MemoryNode) {
        let node = MemoryNode::new();
        let bridge = PersistenceBridge::new(
            node.clone(),
            Arc::new(MemoryCache::new()),
            CanvasConfig::default(),
        );
        let view = CanvasNodeView::mount(bridge, SvgRenderer::new(), RenderStyle::default(), hub);
        (view, node)
    }

    fn p(x: f64, y: f64) -> Option<Point> {
        Some(Point::new(x, y))
    }

    fn drag(view: &TestView, from: (f64, f64), to: (f64, f64)) {
        view.pointer_down(p(from.0, from.1));
        view.pointer_move(p(to.0, to.1));
        view.pointer_up(p(to.0, to.1));
    }

    fn svg(view: &TestView) -> String {
        view.with_renderer(|r| r.svg().to_string())
    }

    #[test]
    fn test_mount_renders_first_frame() {
        let hub = KeyboardHub::new();
        let (view, _) = mount(&hub);
        assert_eq!(view.with_renderer(|r| r.frames()), 1);
        assert_eq!(view.size(), (800, 400));
        assert_eq!(hub.len(), 1);
        assert_eq!(view.toolbar().len(), ToolKind::all().len() + 1);
        assert!(view.toolbar()[0].active);
    }

    #[test]
    fn test_draw_rectangle_through_stage_events() {
        let hub = KeyboardHub::new();
        let (view, node) = mount(&hub);
        view.set_tool(ToolKind::Rectangle);
        drag(&view, (10.0, 10.0), (110.0, 60.0));

        let shapes = view.shapes();
        assert_eq!(shapes.len(), 1);
        assert_eq!(
            shapes[0].geometry,
            Geometry::Rect {
                width: 100.0,
                height: 50.0
            }
        );
        assert!(node.attribute(ATTR_CANVAS_DATA).is_some());
        assert!(svg(&view).contains(&format!("data-key=\"{}\"", shapes[0].id)));
    }

    #[test]
    fn test_click_selects_and_highlights() {
        let hub = KeyboardHub::new();
        let (view, _) = mount(&hub);
        view.set_tool(ToolKind::Rectangle);
        drag(&view, (10.0, 10.0), (110.0, 60.0));
        view.set_tool(ToolKind::Select);

        view.pointer_down(p(50.0, 30.0));
        view.pointer_up(p(50.0, 30.0));

        assert_eq!(view.selection(), Some(view.shapes()[0].id.clone()));
        assert!(svg(&view).contains("stroke=\"#ff6b6b\" stroke-width=\"3\""));
    }

    #[test]
    fn test_drag_moves_shape() {
        let hub = KeyboardHub::new();
        let (view, _) = mount(&hub);
        view.set_tool(ToolKind::Circle);
        drag(&view, (100.0, 100.0), (110.0, 100.0));
        view.set_tool(ToolKind::Select);

        drag(&view, (100.0, 100.0), (130.0, 120.0));

        let circle = &view.shapes()[0];
        assert!((circle.x - 130.0).abs() < 1e-9);
        assert!((circle.y - 120.0).abs() < 1e-9);
        // A drag is not a click.
        assert_eq!(view.selection(), None);
    }

    #[test]
    fn test_drag_line_by_hit_target() {
        let hub = KeyboardHub::new();
        let (view, _) = mount(&hub);
        view.set_tool(ToolKind::Pen);
        drag(&view, (0.0, 50.0), (100.0, 50.0));
        view.set_tool(ToolKind::Select);

        // 6px off the 2px line still grabs it.
        drag(&view, (50.0, 56.0), (50.0, 76.0));

        assert_eq!(
            view.shapes()[0].line_points(),
            vec![Point::new(0.0, 70.0), Point::new(100.0, 70.0)]
        );
    }

    #[test]
    fn test_pointer_down_on_shape_with_drawing_tool_does_not_draw() {
        let hub = KeyboardHub::new();
        let (view, _) = mount(&hub);
        view.set_tool(ToolKind::Rectangle);
        drag(&view, (10.0, 10.0), (110.0, 60.0));

        drag(&view, (50.0, 30.0), (70.0, 40.0));
        assert_eq!(view.shapes().len(), 1);
    }

    #[test]
    fn test_double_click_edits_text() {
        let hub = KeyboardHub::new();
        let (view, _) = mount(&hub);
        view.set_tool(ToolKind::Text);
        view.pointer_down(p(20.0, 20.0));
        view.pointer_up(p(20.0, 20.0));

        assert!(view.double_click(Point::new(25.0, 28.0)));
        assert!(view.text_edit().is_some());
        view.set_text_value("Label");
        assert_eq!(view.text_edit_key(&KeyEvent::new("Enter")), KeyOutcome::Consumed);

        assert_eq!(view.shapes()[0].text(), Some("Label"));
        assert!(svg(&view).contains(">Label</text>"));
    }

    #[test]
    fn test_keys_reach_only_focused_canvas() {
        let hub = KeyboardHub::new();
        let (first, _) = mount(&hub);
        let (second, _) = mount(&hub);
        for view in [&first, &second] {
            view.set_tool(ToolKind::Circle);
            drag(view, (100.0, 100.0), (120.0, 100.0));
            view.set_tool(ToolKind::Select);
            view.pointer_down(p(100.0, 100.0));
            view.pointer_up(p(100.0, 100.0));
            assert!(view.selection().is_some());
        }

        // The second canvas saw the last pointer-down.
        assert_eq!(hub.dispatch(&KeyEvent::new("Escape")), KeyOutcome::Consumed);
        assert!(first.selection().is_some());
        assert!(second.selection().is_none());
    }

    #[test]
    fn test_undo_requires_node_selection() {
        let hub = KeyboardHub::new();
        let (view, _) = mount(&hub);
        view.set_tool(ToolKind::Circle);
        drag(&view, (100.0, 100.0), (120.0, 100.0));
        view.set_tool(ToolKind::Select);
        view.pointer_down(p(100.0, 100.0));
        view.pointer_up(p(100.0, 100.0));

        let undo = KeyEvent::new("z").with_modifiers(Modifiers {
            meta: true,
            ..Default::default()
        });
        assert_eq!(hub.dispatch(&undo), KeyOutcome::Ignored);
        assert!(view.selection().is_some());

        view.set_node_selected(true);
        assert_eq!(hub.dispatch(&undo), KeyOutcome::Consumed);
        assert!(view.selection().is_none());
        assert_eq!(view.shapes().len(), 1);
    }

    #[test]
    fn test_unmount_releases_keyboard() {
        let hub = KeyboardHub::new();
        let (view, _) = mount(&hub);
        view.set_node_selected(true);
        assert_eq!(hub.focused(), Some(view.instance_id()));

        view.unmount();
        assert!(hub.is_empty());
        assert_eq!(hub.focused(), None);
    }

    #[test]
    fn test_resize_and_clear() {
        let hub = KeyboardHub::new();
        let (view, node) = mount(&hub);
        view.set_tool(ToolKind::Star);
        drag(&view, (50.0, 50.0), (60.0, 60.0));

        assert!(view.resize(1280, 640));
        assert_eq!(view.size(), (1280, 640));
        assert!(svg(&view).contains("width=\"1280\""));

        view.clear();
        assert!(view.shapes().is_empty());
        assert_eq!(node.attribute(ATTR_CANVAS_DATA), Some(serde_json::json!([])));
    }

    #[test]
    fn test_toolbar_ends_with_clear() {
        let hub = KeyboardHub::new();
        let (view, node) = mount(&hub);
        view.press(ToolbarAction::Tool(ToolKind::Circle));
        drag(&view, (100.0, 100.0), (120.0, 100.0));

        let toolbar = view.toolbar();
        let clear = toolbar.last().unwrap();
        assert_eq!(clear.action, ToolbarAction::Clear);
        assert_eq!(clear.label, "Clear");
        assert!(!clear.active);
        assert!(
            toolbar
                .iter()
                .any(|b| b.active && b.action == ToolbarAction::Tool(ToolKind::Circle))
        );

        assert!(view.press(clear.action));
        assert!(view.shapes().is_empty());
        assert_eq!(node.attribute(ATTR_CANVAS_DATA), Some(serde_json::json!([])));
    }
}
