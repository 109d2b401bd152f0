//! Tunable engine settings.
//!
//! Defaults come from [`crate::consts`]. Hosts that want different limits
//! (the CLI reads them from the environment) build an [`EngineConfig`] and
//! pass it to [`crate::engine::EngineCore::with_config`].

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use crate::consts::{HOVER_MARGIN_PX, MAX_ZOOM, MIN_ZOOM, VIEWPORT_BUFFER_PX, ZOOM_STEP};
use crate::doc::DeletePolicy;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Lower zoom bound.
    pub min_zoom: f64,
    /// Upper zoom bound.
    pub max_zoom: f64,
    /// Zoom multiplier applied per wheel notch.
    pub zoom_step: f64,
    /// Grab tolerance around shapes and arrows, in screen pixels.
    pub hover_margin_px: f64,
    /// Off-screen margin kept in the visible set, in screen pixels.
    pub viewport_buffer_px: f64,
    /// What deleting a shape does to arrows bound to it.
    pub delete_policy: DeletePolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            zoom_step: ZOOM_STEP,
            hover_margin_px: HOVER_MARGIN_PX,
            viewport_buffer_px: VIEWPORT_BUFFER_PX,
            delete_policy: DeletePolicy::KeepArrows,
        }
    }
}

impl EngineConfig {
    /// Clamp a zoom factor into the configured range.
    #[must_use]
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.clamp(self.min_zoom, self.max_zoom)
    }
}
