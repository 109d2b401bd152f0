#![allow(clippy::float_cmp)]

use canvas::doc::ShapeKind;

use super::*;

fn replay(script: &str) -> Replayer {
    let events = parse_script(script).unwrap();
    let mut core = EngineCore::new();
    core.set_viewport(1000.0, 800.0, 1.0);
    let mut replayer = Replayer::new(core);
    replayer.run(&events).unwrap();
    replayer
}

// =============================================================
// Parsing
// =============================================================

#[test]
fn parse_skips_blank_and_comment_lines() {
    let events = parse_script("\n# draw\n{\"event\":\"tool\",\"name\":\"circle\"}\n   \n").unwrap();
    assert_eq!(events, vec![ScriptLine { line: 3, event: ScriptEvent::Tool { name: "circle".into() } }]);
}

#[test]
fn parse_fills_pointer_defaults() {
    let events = parse_script(r#"{"event":"pointerDown","x":1,"y":2}"#).unwrap();
    assert_eq!(
        events[0].event,
        ScriptEvent::PointerDown { x: 1.0, y: 2.0, button: ScriptButton::Primary, modifiers: ScriptModifiers::default() }
    );
}

#[test]
fn parse_reads_modifiers_and_button() {
    let events = parse_script(r#"{"event":"pointerDown","x":0,"y":0,"button":"middle","modifiers":{"shift":true}}"#).unwrap();
    let ScriptEvent::PointerDown { button, modifiers, .. } = &events[0].event else {
        panic!("expected pointerDown");
    };
    assert_eq!(*button, ScriptButton::Middle);
    assert!(modifiers.shift);
    assert!(!modifiers.ctrl);
}

#[test]
fn parse_reads_patch() {
    let events = parse_script(r##"{"event":"patch","patch":{"strokeColor":"#ff0000","opacity":0.5}}"##).unwrap();
    let ScriptEvent::Patch { patch } = &events[0].event else {
        panic!("expected patch");
    };
    assert_eq!(patch.stroke_color.as_deref(), Some("#ff0000"));
    assert_eq!(patch.opacity, Some(0.5));
}

#[test]
fn parse_reports_line_number() {
    let err = parse_script("{\"event\":\"tool\",\"name\":\"arrow\"}\n\n{\"event\":\"jump\"}").unwrap_err();
    assert!(matches!(err, CliError::Script { line: 3, .. }));
}

// =============================================================
// Replay
// =============================================================

#[test]
fn draw_bind_and_drag_script() {
    let replayer = replay(
        r#"
        {"event":"tool","name":"rectangle"}
        {"event":"pointerDown","x":0,"y":0}
        {"event":"pointerMove","x":100,"y":100}
        {"event":"pointerUp","x":100,"y":100}
        {"event":"tool","name":"arrow"}
        {"event":"pointerDown","x":50,"y":50}
        {"event":"pointerMove","x":500,"y":500}
        {"event":"pointerUp","x":500,"y":500}
        {"event":"tool","name":"select"}
        {"event":"pointerDown","x":50,"y":50}
        {"event":"pointerMove","x":70,"y":70}
        {"event":"pointerUp","x":70,"y":70}
        "#,
    );
    let summary = replayer.summary();
    assert_eq!(summary.shapes_created, 1);
    assert_eq!(summary.arrows_created, 1);
    assert_eq!(summary.shapes_updated, 1);
    assert_eq!(summary.arrows_updated, 1);

    let arrow = &replayer.core.store.list_arrows()[0];
    let rect = &replayer.core.store.list_shapes()[0];
    assert_eq!(arrow.binding.start_id.as_deref(), Some(rect.id.as_str()));
    assert_eq!(arrow.points[0], Point::new(120.0, 120.0));
    assert_eq!(arrow.points[1], Point::new(500.0, 500.0));
}

#[test]
fn text_event_targets_pending_text_box() {
    let replayer = replay(
        r#"
        {"event":"tool","name":"text"}
        {"event":"pointerDown","x":10,"y":10}
        {"event":"pointerUp","x":10,"y":10}
        {"event":"text","text":"margin note"}
        "#,
    );
    let shape = &replayer.core.store.list_shapes()[0];
    let ShapeKind::Text { text, .. } = &shape.kind else {
        panic!("expected text shape");
    };
    assert_eq!(text, "margin note");
}

#[test]
fn text_without_target_fails() {
    let events = parse_script(r#"{"event":"text","text":"orphan"}"#).unwrap();
    let mut replayer = Replayer::new(EngineCore::new());
    let err = replayer.run(&events).unwrap_err();
    assert!(matches!(err, CliError::Script { line: 1, .. }));
}

#[test]
fn unknown_tool_fails() {
    let events = parse_script(r#"{"event":"tool","name":"lasso"}"#).unwrap();
    let mut replayer = Replayer::new(EngineCore::new());
    assert!(replayer.run(&events).is_err());
}

#[test]
fn replay_errors_name_the_file_line() {
    let events = parse_script("# pick a tool\n\n{\"event\":\"tool\",\"name\":\"lasso\"}\n").unwrap();
    let mut replayer = Replayer::new(EngineCore::new());
    let err = replayer.run(&events).unwrap_err();
    assert!(matches!(err, CliError::Script { line: 3, .. }));
    assert!(err.to_string().starts_with("script line 3:"));
}

#[test]
fn delete_key_is_counted() {
    let replayer = replay(
        r#"
        {"event":"tool","name":"rectangle"}
        {"event":"pointerDown","x":0,"y":0}
        {"event":"pointerUp","x":0,"y":0}
        {"event":"key","key":"Delete"}
        "#,
    );
    let summary = replayer.summary();
    assert_eq!(summary.deleted, 1);
    assert!(summary.selection.is_empty());
    assert!(replayer.core.store.is_empty());
}

#[test]
fn ctrl_wheel_zooms() {
    let replayer = replay(r#"{"event":"wheel","x":0,"y":0,"dy":-10,"modifiers":{"ctrl":true}}"#);
    assert!((replayer.core.camera.zoom - 1.05).abs() < 1e-12);
}

#[test]
fn viewport_event_resizes() {
    let replayer = replay(r#"{"event":"viewport","width":640,"height":480}"#);
    assert_eq!(replayer.core.viewport_width, 640.0);
    assert_eq!(replayer.core.viewport_height, 480.0);
    assert_eq!(replayer.core.dpr, 1.0);
}
