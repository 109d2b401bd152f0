//! Hover tracking for arrow snapping.
//!
//! While the arrow tool is active every pointer move asks [`HoverState::detect`]
//! which visible shape is under the cursor. Only the first hit in store order
//! is taken per event. Hits are kept in a recency-ordered list (most recent
//! last) so that when an arrow is started or released the engine can ask
//! [`HoverState::under`] for the most recently hovered element that still
//! contains the pointer.
//!
//! When another tool is active the list decays through [`HoverState::prune`]:
//! entries the pointer has left are dropped unless an arrow draft still
//! references them.

#[cfg(test)]
#[path = "hover_test.rs"]
mod hover_test;

use crate::camera::Point;
use crate::doc::{BindingKind, ElementId, ShapeElement, ShapeKind};
use crate::geometry::{self, Rect};

/// An element currently (or recently) under the pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct HoveredItem {
    pub id: ElementId,
    /// Outline at the time of the last hit.
    pub points: Vec<Point>,
    pub kind: BindingKind,
    /// Line rectangles for highlighted book text.
    pub rects: Option<Vec<Rect>>,
}

impl HoveredItem {
    #[must_use]
    pub fn from_shape(shape: &ShapeElement) -> Self {
        let rects = match &shape.kind {
            ShapeKind::BookTextHighlight { rects, .. } => Some(rects.clone()),
            _ => None,
        };
        Self { id: shape.id.clone(), points: shape.points.clone(), kind: shape.binding_kind(), rects }
    }

    /// Whether `world` falls on the recorded outline or any line rectangle.
    #[must_use]
    pub fn contains(&self, world: Point) -> bool {
        geometry::point_in_polygon(world, &self.points)
            || self.rects.as_ref().is_some_and(|rects| rects.iter().any(|r| r.contains(world)))
    }
}

/// Recency-ordered hover list. The last entry is the most recent.
#[derive(Debug, Clone, Default)]
pub struct HoverState {
    items: Vec<HoveredItem>,
}

impl HoverState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a hit: an existing entry with the same id moves to the end with
    /// refreshed geometry, otherwise the item is appended.
    pub fn track(&mut self, item: HoveredItem) {
        self.items.retain(|existing| existing.id != item.id);
        self.items.push(item);
    }

    /// Find the first candidate containing `world` and track it.
    ///
    /// Returns the id of the hit, if any. Later candidates are not examined.
    pub fn detect<'a>(&mut self, world: Point, candidates: impl IntoIterator<Item = &'a ShapeElement>) -> Option<ElementId> {
        let hit = candidates.into_iter().find(|shape| shape.contains(world))?;
        let id = hit.id.clone();
        self.track(HoveredItem::from_shape(hit));
        Some(id)
    }

    /// The most recently hovered item that contains `world`.
    #[must_use]
    pub fn under(&self, world: Point) -> Option<&HoveredItem> {
        self.items.iter().rev().find(|item| item.contains(world))
    }

    /// Drop items the pointer has left, except ids listed in `keep`.
    pub fn prune(&mut self, world: Point, keep: &[&str]) {
        self.items
            .retain(|item| item.contains(world) || keep.contains(&item.id.as_str()));
    }

    /// Replace a tracked entry's geometry with the shape's current outline,
    /// keeping its place in the recency order. Untracked shapes are ignored.
    pub fn refresh(&mut self, shape: &ShapeElement) {
        if let Some(item) = self.items.iter_mut().find(|item| item.id == shape.id) {
            *item = HoveredItem::from_shape(shape);
        }
    }

    /// Forget a specific element, e.g. after it is deleted.
    pub fn forget(&mut self, id: &str) {
        self.items.retain(|item| item.id != id);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// The most recent entry regardless of pointer position.
    #[must_use]
    pub fn latest(&self) -> Option<&HoveredItem> {
        self.items.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
