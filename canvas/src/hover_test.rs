use super::*;
use crate::doc::{RoughOptions, Style};

fn rect(x: f64, y: f64, w: f64, h: f64) -> ShapeElement {
    ShapeElement::new(ShapeKind::Rectangle { rough: RoughOptions::default() }, Rect::new(x, y, w, h), Style::default())
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn ids(state: &HoverState) -> Vec<&str> {
    state.items.iter().map(|i| i.id.as_str()).collect()
}

// =============================================================
// detect
// =============================================================

#[test]
fn detect_tracks_first_containing_shape_only() {
    let a = rect(0.0, 0.0, 100.0, 100.0);
    let b = rect(50.0, 50.0, 100.0, 100.0);
    let mut hover = HoverState::new();

    let hit = hover.detect(pt(75.0, 75.0), [&a, &b]);

    assert_eq!(hit.as_deref(), Some(a.id.as_str()));
    assert_eq!(ids(&hover), vec![a.id.as_str()]);
}

#[test]
fn detect_miss_leaves_list_untouched() {
    let a = rect(0.0, 0.0, 10.0, 10.0);
    let mut hover = HoverState::new();
    hover.detect(pt(5.0, 5.0), [&a]);
    assert!(hover.detect(pt(500.0, 5.0), [&a]).is_none());
    assert_eq!(hover.len(), 1);
}

#[test]
fn detect_records_binding_kind_and_rects_for_highlights() {
    let h = ShapeElement::highlight("passage", vec![Rect::new(0.0, 0.0, 50.0, 10.0)], Style::default());
    let mut hover = HoverState::new();
    hover.detect(pt(10.0, 5.0), [&h]);
    let item = hover.latest().unwrap();
    assert_eq!(item.kind, BindingKind::BookText);
    assert_eq!(item.rects.as_deref(), Some(&[Rect::new(0.0, 0.0, 50.0, 10.0)][..]));
}

// =============================================================
// Recency ordering
// =============================================================

#[test]
fn rehovering_moves_item_to_end() {
    let a = rect(0.0, 0.0, 10.0, 10.0);
    let b = rect(20.0, 0.0, 10.0, 10.0);
    let mut hover = HoverState::new();
    hover.detect(pt(5.0, 5.0), [&a, &b]);
    hover.detect(pt(25.0, 5.0), [&a, &b]);
    hover.detect(pt(5.0, 5.0), [&a, &b]);
    assert_eq!(ids(&hover), vec![b.id.as_str(), a.id.as_str()]);
}

#[test]
fn rehovering_refreshes_geometry() {
    let mut a = rect(0.0, 0.0, 10.0, 10.0);
    let mut hover = HoverState::new();
    hover.detect(pt(5.0, 5.0), [&a]);
    a.translate(100.0, 0.0);
    hover.detect(pt(105.0, 5.0), [&a]);
    assert_eq!(hover.len(), 1);
    assert!(hover.under(pt(105.0, 5.0)).is_some());
    assert!(hover.under(pt(5.0, 5.0)).is_none());
}

#[test]
fn under_prefers_most_recent_overlapping_item() {
    let a = rect(0.0, 0.0, 100.0, 100.0);
    let b = rect(50.0, 50.0, 100.0, 100.0);
    let mut hover = HoverState::new();
    hover.detect(pt(10.0, 10.0), [&a]);
    hover.detect(pt(120.0, 120.0), [&b]);
    assert_eq!(hover.under(pt(75.0, 75.0)).map(|i| i.id.as_str()), Some(b.id.as_str()));
    assert_eq!(hover.under(pt(10.0, 10.0)).map(|i| i.id.as_str()), Some(a.id.as_str()));
    assert!(hover.under(pt(500.0, 500.0)).is_none());
}

// =============================================================
// prune / forget
// =============================================================

#[test]
fn prune_drops_items_the_pointer_left() {
    let a = rect(0.0, 0.0, 10.0, 10.0);
    let b = rect(20.0, 0.0, 10.0, 10.0);
    let mut hover = HoverState::new();
    hover.detect(pt(5.0, 5.0), [&a]);
    hover.detect(pt(25.0, 5.0), [&b]);
    hover.prune(pt(25.0, 5.0), &[]);
    assert_eq!(ids(&hover), vec![b.id.as_str()]);
}

#[test]
fn prune_keeps_ids_referenced_by_draft() {
    let a = rect(0.0, 0.0, 10.0, 10.0);
    let mut hover = HoverState::new();
    hover.detect(pt(5.0, 5.0), [&a]);
    hover.prune(pt(500.0, 500.0), &[a.id.as_str()]);
    assert_eq!(hover.len(), 1);
}

#[test]
fn refresh_replaces_stale_outline_in_place() {
    let mut a = rect(0.0, 0.0, 10.0, 10.0);
    let b = rect(20.0, 0.0, 10.0, 10.0);
    let mut hover = HoverState::new();
    hover.detect(pt(5.0, 5.0), [&a]);
    hover.detect(pt(25.0, 5.0), [&b]);

    a.translate(500.0, 0.0);
    hover.refresh(&a);

    assert!(hover.under(pt(5.0, 5.0)).is_none());
    assert_eq!(hover.under(pt(505.0, 5.0)).map(|i| i.id.as_str()), Some(a.id.as_str()));
    assert_eq!(ids(&hover), vec![a.id.as_str(), b.id.as_str()]);
}

#[test]
fn refresh_ignores_untracked_shapes() {
    let a = rect(0.0, 0.0, 10.0, 10.0);
    let mut hover = HoverState::new();
    hover.refresh(&a);
    assert!(hover.is_empty());
}

#[test]
fn forget_and_clear_remove_items() {
    let a = rect(0.0, 0.0, 10.0, 10.0);
    let b = rect(20.0, 0.0, 10.0, 10.0);
    let mut hover = HoverState::new();
    hover.detect(pt(5.0, 5.0), [&a]);
    hover.detect(pt(25.0, 5.0), [&b]);
    hover.forget(&a.id);
    assert_eq!(ids(&hover), vec![b.id.as_str()]);
    hover.clear();
    assert!(hover.is_empty());
}
