//! Canvas configuration.

use serde::{Deserialize, Serialize};

/// Cache key shared by every canvas when [`CacheScope::Shared`] is used.
pub const DEFAULT_CACHE_KEY: &str = "drawing-canvas-data";

/// Cache key written by earlier releases of the canvas block.
pub const LEGACY_CACHE_KEY: &str = "konva-canvas-data";

/// Default stage width in pixels.
pub const DEFAULT_WIDTH: u32 = 800;

/// Default stage height in pixels.
pub const DEFAULT_HEIGHT: u32 = 400;

/// How canvases map onto cache keys.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheScope {
    /// Every canvas mirrors into the same key; the last save wins.
    #[default]
    Shared,
    /// Each canvas mirrors into its own key, suffixed with the node identity.
    PerNode(String),
}

/// Settings for one canvas instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Base cache key.
    pub cache_key: String,
    pub cache_scope: CacheScope,
    /// Width used when the node carries none.
    pub default_width: u32,
    /// Height used when the node carries none.
    pub default_height: u32,
    /// Older shared keys read on load when the current key holds nothing.
    /// Never written.
    pub legacy_keys: Vec<String>,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            cache_key: DEFAULT_CACHE_KEY.to_string(),
            cache_scope: CacheScope::Shared,
            default_width: DEFAULT_WIDTH,
            default_height: DEFAULT_HEIGHT,
            legacy_keys: vec![LEGACY_CACHE_KEY.to_string()],
        }
    }
}

impl CanvasConfig {
    /// Config that mirrors into a per-node cache key.
    pub fn per_node(node_id: impl Into<String>) -> Self {
        Self {
            cache_scope: CacheScope::PerNode(node_id.into()),
            ..Self::default()
        }
    }

    /// The effective cache key for this canvas.
    pub fn resolved_cache_key(&self) -> String {
        match &self.cache_scope {
            CacheScope::Shared => self.cache_key.clone(),
            CacheScope::PerNode(node_id) => format!("{}:{}", self.cache_key, node_id),
        }
    }

    /// Legacy keys to consult on load. Per-node canvases never read shared
    /// keys, so they stay isolated.
    pub fn legacy_cache_keys(&self) -> &[String] {
        match self.cache_scope {
            CacheScope::Shared => &self.legacy_keys,
            CacheScope::PerNode(_) => &[],
        }
    }
}
