//! Engine settings from the environment.
//!
//! Every variable is optional. Missing or unparsable values fall back to
//! the engine defaults.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use canvas::config::EngineConfig;
use canvas::doc::DeletePolicy;

pub const ENV_MIN_ZOOM: &str = "MARGINALIA_MIN_ZOOM";
pub const ENV_MAX_ZOOM: &str = "MARGINALIA_MAX_ZOOM";
pub const ENV_ZOOM_STEP: &str = "MARGINALIA_ZOOM_STEP";
pub const ENV_HOVER_MARGIN: &str = "MARGINALIA_HOVER_MARGIN";
pub const ENV_VIEWPORT_BUFFER: &str = "MARGINALIA_VIEWPORT_BUFFER";
pub const ENV_CASCADE_DELETE: &str = "MARGINALIA_CASCADE_DELETE";

/// Build the engine config from process environment variables.
#[must_use]
pub fn engine_config_from_env() -> EngineConfig {
    engine_config_from(|key| std::env::var(key).ok())
}

/// Build the engine config from an arbitrary key lookup.
pub fn engine_config_from(lookup: impl Fn(&str) -> Option<String>) -> EngineConfig {
    let defaults = EngineConfig::default();
    let cascade = parse_or(&lookup, ENV_CASCADE_DELETE, false);
    let mut config = EngineConfig {
        min_zoom: parse_or(&lookup, ENV_MIN_ZOOM, defaults.min_zoom),
        max_zoom: parse_or(&lookup, ENV_MAX_ZOOM, defaults.max_zoom),
        zoom_step: parse_or(&lookup, ENV_ZOOM_STEP, defaults.zoom_step),
        hover_margin_px: parse_or(&lookup, ENV_HOVER_MARGIN, defaults.hover_margin_px),
        viewport_buffer_px: parse_or(&lookup, ENV_VIEWPORT_BUFFER, defaults.viewport_buffer_px),
        delete_policy: if cascade { DeletePolicy::CascadeArrows } else { DeletePolicy::KeepArrows },
    };

    if !(config.min_zoom > 0.0 && config.min_zoom <= config.max_zoom && config.max_zoom.is_finite()) {
        tracing::warn!(min = config.min_zoom, max = config.max_zoom, "invalid zoom bounds; using defaults");
        config.min_zoom = defaults.min_zoom;
        config.max_zoom = defaults.max_zoom;
    }
    if !(config.zoom_step > 1.0 && config.zoom_step.is_finite()) {
        tracing::warn!(step = config.zoom_step, "zoom step must be above 1; using default");
        config.zoom_step = defaults.zoom_step;
    }
    if config.hover_margin_px < 0.0 {
        config.hover_margin_px = defaults.hover_margin_px;
    }
    if config.viewport_buffer_px < 0.0 {
        config.viewport_buffer_px = defaults.viewport_buffer_px;
    }
    config
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    match lookup(key).map(|v| v.trim().parse::<T>()) {
        Some(Ok(value)) => value,
        Some(Err(_)) => {
            tracing::warn!(%key, "ignoring unparsable value");
            default
        }
        None => default,
    }
}
