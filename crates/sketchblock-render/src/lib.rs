//! Sketchblock Render Library
//!
//! Builds a scene graph from the canvas shape list, hit-tests it, and hands
//! it to a renderer backend. The bundled backend emits SVG.

mod renderer;
pub mod scene;
mod svg_impl;

pub use renderer::{RenderContext, RenderResult, RenderStyle, Renderer, RendererError};
pub use scene::{NodeRole, Paint, Primitive, Scene, SceneNode, build_scene, parse_css_color};
pub use svg_impl::SvgRenderer;
