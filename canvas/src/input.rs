//! Input model: tools, modifier keys, mouse buttons, and the gesture state machine.
//!
//! `Tool` and `Modifiers` capture the user's intent at the time of a pointer
//! event. `InputState` is the gesture tracked between pointer-down and
//! pointer-up. The arrow draft lives in [`InputState::DraftingArrow`] until
//! the button is released or the gesture is cancelled.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::binding::ArrowEnd;
use crate::camera::Point;
use crate::doc::{CurveElement, ElementId};

/// Which tool is currently active. Set by the host toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Drag anywhere to pan.
    Pan,
    /// Pointer / selection tool (default).
    #[default]
    Select,
    /// Draw a rectangle.
    Rectangle,
    /// Draw a circle.
    Circle,
    /// Draw an arrow, binding its ends to hovered elements.
    Arrow,
    /// Place a text box.
    Text,
}

impl Tool {
    /// Parse the toolbar's tool name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Pan" | "pan" => Some(Self::Pan),
            "Select" | "select" => Some(Self::Select),
            "Rectangle" | "rectangle" => Some(Self::Rectangle),
            "Circle" | "circle" => Some(Self::Circle),
            "Arrow" | "arrow" => Some(Self::Arrow),
            "Text" | "text" => Some(Self::Text),
            _ => None,
        }
    }
}

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Cmd on macOS.
    #[must_use]
    pub fn zoom(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Primary,
    Middle,
    Secondary,
}

/// A keyboard key as reported by the browser (e.g. `"Delete"`, `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn is_delete(&self) -> bool {
        matches!(self.0.as_str(), "Delete" | "Backspace")
    }

    #[must_use]
    pub fn is_escape(&self) -> bool {
        self.0 == "Escape"
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// Persistent UI state visible to the renderer and toolbar.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Currently active tool.
    pub tool: Tool,
    /// Selected element ids, in selection order.
    pub selected_ids: Vec<ElementId>,
}

impl UiState {
    #[must_use]
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected_ids.iter().any(|s| s == id)
    }
}

/// Gesture in progress between pointer-down and pointer-up.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// Dragging the view.
    Panning {
        /// Screen position at the previous event.
        last_screen: Point,
    },
    /// Moving every selected shape together.
    DraggingSelection {
        /// Shapes being moved.
        ids: Vec<ElementId>,
        /// World position at pointer-down.
        origin_world: Point,
        /// World position at the previous event.
        last_world: Point,
    },
    /// Sizing a freshly created shape from its anchor corner.
    DrawingShape {
        id: ElementId,
        anchor_world: Point,
    },
    /// An arrow being drawn. Not in the store until released.
    DraftingArrow {
        draft: CurveElement,
    },
    /// Dragging one endpoint handle of a selected arrow.
    DraggingArrowEndpoint {
        id: ElementId,
        end: ArrowEnd,
    },
}

impl InputState {
    /// The in-progress arrow draft, if any.
    #[must_use]
    pub fn draft(&self) -> Option<&CurveElement> {
        match self {
            Self::DraftingArrow { draft } => Some(draft),
            _ => None,
        }
    }
}
