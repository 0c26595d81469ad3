//! WebAssembly entry point and JS-facing helpers.

use crate::schema::{CanvasNodeAttrs, CanvasNodeOptions};
use sketchblock_core::node::AttrMap;
use wasm_bindgen::prelude::*;

/// Initialize logging when the module loads.
#[wasm_bindgen(start)]
pub fn start() {
    crate::init_logging();
    log::info!("Sketchblock editor integration loaded");
}

/// Render a canvas node's attributes (as JSON) to its HTML element.
#[wasm_bindgen(js_name = renderCanvasNode)]
pub fn render_canvas_node(attrs_json: &str) -> Result<String, JsValue> {
    let attrs: AttrMap =
        serde_json::from_str(attrs_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let options = CanvasNodeOptions::default();
    Ok(CanvasNodeAttrs::from_attr_map(&attrs).render_html(&options))
}
