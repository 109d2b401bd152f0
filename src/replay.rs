//! Headless gesture replay.
//!
//! A script is JSON Lines: one event object per line, tagged by `"event"`.
//! Blank lines and lines starting with `#` are skipped.
//!
//! ```text
//! {"event":"tool","name":"arrow"}
//! {"event":"pointerDown","x":50,"y":50}
//! {"event":"pointerMove","x":500,"y":500}
//! {"event":"pointerUp","x":500,"y":500}
//! ```

#[cfg(test)]
#[path = "replay_test.rs"]
mod replay_test;

use canvas::camera::Point;
use canvas::doc::ElementId;
use canvas::engine::{Action, EngineCore};
use canvas::input::{Button, Key, Modifiers, Tool, WheelDelta};
use canvas::selection::ElementPatch;
use serde::{Deserialize, Serialize};

use crate::error::CliError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScriptButton {
    #[default]
    Primary,
    Middle,
    Secondary,
}

impl From<ScriptButton> for Button {
    fn from(button: ScriptButton) -> Self {
        match button {
            ScriptButton::Primary => Self::Primary,
            ScriptButton::Middle => Self::Middle,
            ScriptButton::Secondary => Self::Secondary,
        }
    }
}

#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScriptModifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl From<ScriptModifiers> for Modifiers {
    fn from(m: ScriptModifiers) -> Self {
        Self { shift: m.shift, ctrl: m.ctrl, alt: m.alt, meta: m.meta }
    }
}

/// One line of a replay script.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ScriptEvent {
    PointerDown {
        x: f64,
        y: f64,
        #[serde(default)]
        button: ScriptButton,
        #[serde(default)]
        modifiers: ScriptModifiers,
    },
    PointerMove {
        x: f64,
        y: f64,
        #[serde(default)]
        modifiers: ScriptModifiers,
    },
    PointerUp {
        x: f64,
        y: f64,
        #[serde(default)]
        button: ScriptButton,
        #[serde(default)]
        modifiers: ScriptModifiers,
    },
    Wheel {
        x: f64,
        y: f64,
        #[serde(default)]
        dx: f64,
        #[serde(default)]
        dy: f64,
        #[serde(default)]
        modifiers: ScriptModifiers,
    },
    Key {
        key: String,
        #[serde(default)]
        modifiers: ScriptModifiers,
    },
    Tool {
        name: String,
    },
    /// Commit text. Without an id, targets the last text box that asked for an edit.
    Text {
        #[serde(default)]
        id: Option<ElementId>,
        text: String,
    },
    Patch {
        patch: ElementPatch,
    },
    Select {
        ids: Vec<ElementId>,
    },
    Viewport {
        width: f64,
        height: f64,
        #[serde(default = "default_dpr")]
        dpr: f64,
    },
}

fn default_dpr() -> f64 {
    1.0
}

/// A decoded event and the 1-based file line it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptLine {
    pub line: usize,
    pub event: ScriptEvent,
}

/// Decode a JSON Lines script.
///
/// # Errors
///
/// Returns [`CliError::Script`] with the 1-based line number of the first
/// line that fails to decode.
pub fn parse_script(source: &str) -> Result<Vec<ScriptLine>, CliError> {
    let mut events = Vec::new();
    for (idx, raw) in source.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let event = serde_json::from_str(line).map_err(|e| CliError::Script { line: idx + 1, message: e.to_string() })?;
        events.push(ScriptLine { line: idx + 1, event });
    }
    Ok(events)
}

/// Counts of what a replay did to the scene.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaySummary {
    pub events: usize,
    pub shapes_created: usize,
    pub arrows_created: usize,
    pub shapes_updated: usize,
    pub arrows_updated: usize,
    pub deleted: usize,
    pub selection: Vec<ElementId>,
}

/// Feeds script events into an [`EngineCore`].
pub struct Replayer {
    pub core: EngineCore,
    pending_text: Option<ElementId>,
    summary: ReplaySummary,
}

impl Replayer {
    #[must_use]
    pub fn new(core: EngineCore) -> Self {
        Self { core, pending_text: None, summary: ReplaySummary::default() }
    }

    /// Apply every event in order.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Script`] naming the file line of an unknown tool
    /// name or a text event with no target.
    pub fn run(&mut self, lines: &[ScriptLine]) -> Result<(), CliError> {
        for ScriptLine { line, event } in lines {
            let actions = self.apply(*line, event)?;
            self.record(&actions);
        }
        Ok(())
    }

    /// The summary so far, with the current selection.
    #[must_use]
    pub fn summary(&self) -> ReplaySummary {
        ReplaySummary { selection: self.core.selection().to_vec(), ..self.summary.clone() }
    }

    fn apply(&mut self, line: usize, event: &ScriptEvent) -> Result<Vec<Action>, CliError> {
        self.summary.events += 1;
        let actions = match event {
            ScriptEvent::PointerDown { x, y, button, modifiers } => {
                self.core.on_pointer_down(Point::new(*x, *y), (*button).into(), (*modifiers).into())
            }
            ScriptEvent::PointerMove { x, y, modifiers } => self.core.on_pointer_move(Point::new(*x, *y), (*modifiers).into()),
            ScriptEvent::PointerUp { x, y, button, modifiers } => {
                self.core.on_pointer_up(Point::new(*x, *y), (*button).into(), (*modifiers).into())
            }
            ScriptEvent::Wheel { x, y, dx, dy, modifiers } => {
                self.core.on_wheel(Point::new(*x, *y), WheelDelta { dx: *dx, dy: *dy }, (*modifiers).into())
            }
            ScriptEvent::Key { key, modifiers } => self.core.on_key_down(&Key(key.clone()), (*modifiers).into()),
            ScriptEvent::Tool { name } => {
                let tool = Tool::from_name(name)
                    .ok_or_else(|| CliError::Script { line, message: format!("unknown tool {name:?}") })?;
                self.core.set_tool(tool)
            }
            ScriptEvent::Text { id, text } => {
                let target = id
                    .clone()
                    .or_else(|| self.pending_text.take())
                    .ok_or_else(|| CliError::Script { line, message: "no text box to edit".into() })?;
                self.core.set_text(&target, text.clone())
            }
            ScriptEvent::Patch { patch } => self.core.update_selected(patch),
            ScriptEvent::Select { ids } => self.core.select(ids),
            ScriptEvent::Viewport { width, height, dpr } => {
                self.core.set_viewport(*width, *height, *dpr);
                Vec::new()
            }
        };
        tracing::debug!(line, actions = actions.len(), "applied script event");
        Ok(actions)
    }

    fn record(&mut self, actions: &[Action]) {
        for action in actions {
            match action {
                Action::ShapeCreated(_) => self.summary.shapes_created += 1,
                Action::ArrowCreated(_) => self.summary.arrows_created += 1,
                Action::ShapeUpdated { .. } => self.summary.shapes_updated += 1,
                Action::ArrowUpdated { .. } => self.summary.arrows_updated += 1,
                Action::ElementDeleted { .. } => self.summary.deleted += 1,
                Action::EditTextRequested { id, .. } => self.pending_text = Some(id.clone()),
                Action::SelectionChanged(_) | Action::SetCursor(_) | Action::RenderNeeded => {}
            }
        }
    }
}
