//! Shared numeric constants for the canvas crate.

// ── Zoom ────────────────────────────────────────────────────────

/// Smallest zoom factor the wheel handler will reach.
pub const MIN_ZOOM: f64 = 0.5;

/// Largest zoom factor the wheel handler will reach.
pub const MAX_ZOOM: f64 = 3.0;

/// Multiplicative zoom change per wheel notch.
pub const ZOOM_STEP: f64 = 1.05;

// ── Hit-testing ─────────────────────────────────────────────────

/// Grab tolerance in screen pixels around rectangles and arrow bodies.
pub const HOVER_MARGIN_PX: f64 = 10.0;

/// Screen-space radius of an arrow endpoint handle.
pub const HANDLE_RADIUS_PX: f64 = 8.0;

// ── Virtualization ──────────────────────────────────────────────

/// Extra screen pixels rendered beyond each window edge.
pub const VIEWPORT_BUFFER_PX: f64 = 200.0;

// ── Shape creation ──────────────────────────────────────────────

/// Drags shorter than this (world units) create a default-size shape instead.
pub const MIN_DRAW_SIZE: f64 = 4.0;

/// Side length for click-created rectangles and circles.
pub const DEFAULT_SHAPE_SIZE: f64 = 100.0;

/// Width of a freshly created text box.
pub const DEFAULT_TEXT_WIDTH: f64 = 200.0;

/// Height of a freshly created text box.
pub const DEFAULT_TEXT_HEIGHT: f64 = 40.0;

/// Number of vertices used for a circle's hit polygon.
pub const CIRCLE_OUTLINE_VERTICES: usize = 8;
