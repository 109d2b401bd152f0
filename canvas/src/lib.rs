//! Annotation canvas engine for the e-book reader.
//!
//! The reader renders book text and layers an infinite, pan/zoomable canvas
//! over it. This crate owns that canvas: the scene graph of shapes,
//! highlights and arrows, hover detection under the pointer, the arrow
//! binding state machine that keeps arrow endpoints attached to the
//! elements they connect, and viewport virtualization. It compiles to
//! WebAssembly for the browser host and natively for tests and tooling.
//! The host is responsible only for wiring DOM events into the engine and
//! saving the resulting [`doc::Snapshot`] to the backend.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`doc`] | Element store, element types and snapshots |
//! | [`camera`] | Pan/zoom camera and coordinate conversions |
//! | [`geometry`] | Rectangles, polygon containment, closest-point helpers |
//! | [`hover`] | Recency-ordered hover tracking used for arrow snapping |
//! | [`binding`] | Arrow drafting, endpoint binding and re-anchoring |
//! | [`viewport`] | Visible world rectangle and element filtering |
//! | [`selection`] | Toolbar projection and bulk property edits |
//! | [`input`] | Input event types and the gesture state machine |
//! | [`hit`] | Select-tool hit-testing |
//! | [`render`] | Scene rendering to a 2D canvas context |
//! | [`config`] | Tunable engine settings |
//! | [`consts`] | Shared numeric constants (zoom limits, margins, sizes) |

pub mod binding;
pub mod camera;
pub mod config;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod geometry;
pub mod hit;
pub mod hover;
pub mod input;
pub mod render;
pub mod selection;
pub mod viewport;
