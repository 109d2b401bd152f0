use super::*;
use crate::doc::Style;

// =============================================================
// Tool
// =============================================================

#[test]
fn tool_default_is_select() {
    assert_eq!(Tool::default(), Tool::Select);
}

#[test]
fn tool_from_toolbar_names() {
    assert_eq!(Tool::from_name("Pan"), Some(Tool::Pan));
    assert_eq!(Tool::from_name("Select"), Some(Tool::Select));
    assert_eq!(Tool::from_name("Rectangle"), Some(Tool::Rectangle));
    assert_eq!(Tool::from_name("circle"), Some(Tool::Circle));
    assert_eq!(Tool::from_name("Arrow"), Some(Tool::Arrow));
    assert_eq!(Tool::from_name("Text"), Some(Tool::Text));
    assert_eq!(Tool::from_name("Lasso"), None);
}

// =============================================================
// Modifiers / Key
// =============================================================

#[test]
fn modifiers_default_all_false() {
    let m = Modifiers::default();
    assert!(!m.shift && !m.ctrl && !m.alt && !m.meta);
    assert!(!m.zoom());
}

#[test]
fn ctrl_or_meta_zooms() {
    assert!(Modifiers { ctrl: true, ..Modifiers::default() }.zoom());
    assert!(Modifiers { meta: true, ..Modifiers::default() }.zoom());
    assert!(!Modifiers { shift: true, ..Modifiers::default() }.zoom());
}

#[test]
fn delete_keys() {
    assert!(Key("Delete".into()).is_delete());
    assert!(Key("Backspace".into()).is_delete());
    assert!(!Key("d".into()).is_delete());
}

#[test]
fn escape_key() {
    assert!(Key("Escape".into()).is_escape());
    assert!(!Key("Enter".into()).is_escape());
}

// =============================================================
// UiState
// =============================================================

#[test]
fn ui_state_defaults() {
    let ui = UiState::default();
    assert_eq!(ui.tool, Tool::Select);
    assert!(ui.selected_ids.is_empty());
}

#[test]
fn ui_state_is_selected() {
    let ui = UiState { tool: Tool::Select, selected_ids: vec!["a".into(), "b".into()] };
    assert!(ui.is_selected("b"));
    assert!(!ui.is_selected("c"));
}

// =============================================================
// InputState
// =============================================================

#[test]
fn input_state_default_is_idle() {
    assert!(matches!(InputState::default(), InputState::Idle));
}

#[test]
fn draft_only_while_drafting() {
    assert!(InputState::Idle.draft().is_none());
    let draft = CurveElement::new(Point::new(1.0, 2.0), Style::default());
    let id = draft.id.clone();
    let state = InputState::DraftingArrow { draft };
    assert_eq!(state.draft().map(|d| d.id.as_str()), Some(id.as_str()));
}
