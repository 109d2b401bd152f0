//! Document model: canvas elements, their properties, and the in-memory store.
//!
//! This module defines what lives on the annotation canvas: positioned
//! [`ShapeElement`]s (rectangles, circles, free text, and highlights of the
//! book's own text) and [`CurveElement`]s (arrows) whose endpoints may be
//! bound to shapes by id. [`ElementStore`] owns both collections and the
//! back-reference index that tells each shape which arrows start or end on
//! it. [`Snapshot`] is the bulk load/save shape exchanged with the backend.
//!
//! Deleting a shape does not touch arrows bound to it unless the caller asks
//! for [`DeletePolicy::CascadeArrows`]; the arrows keep their dangling ids
//! and render from their stored coordinates.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::camera::Point;
use crate::consts::CIRCLE_OUTLINE_VERTICES;
use crate::geometry::{self, Rect};

/// Unique identifier for a canvas element.
///
/// Ids are client-generated UUID strings, but snapshots from older hosts may
/// carry arbitrary strings, so no format is enforced.
pub type ElementId = String;

/// Generate a fresh element id.
#[must_use]
pub fn new_element_id() -> ElementId {
    Uuid::new_v4().to_string()
}

// =============================================================
// Styles
// =============================================================

/// Paint properties shared by every element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Style {
    pub fill: String,
    pub stroke_color: String,
    pub stroke_width: f64,
    pub opacity: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fill: "transparent".to_owned(),
            stroke_color: "#1F1A17".to_owned(),
            stroke_width: 2.0,
            opacity: 1.0,
        }
    }
}

/// Font settings for free text elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FontProps {
    pub font_size: f64,
    pub font_family: String,
    pub font_style: String,
    pub align: String,
}

impl Default for FontProps {
    fn default() -> Self {
        Self {
            font_size: 16.0,
            font_family: "serif".to_owned(),
            font_style: "normal".to_owned(),
            align: "left".to_owned(),
        }
    }
}

/// Hand-drawn rendering parameters for sketchy shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoughOptions {
    pub fill_style: String,
    pub hachure_gap: f64,
    pub hachure_angle: f64,
    pub roughness: f64,
    pub bowing: f64,
}

impl Default for RoughOptions {
    fn default() -> Self {
        Self {
            fill_style: "hachure".to_owned(),
            hachure_gap: 4.0,
            hachure_angle: -41.0,
            roughness: 1.0,
            bowing: 1.0,
        }
    }
}

// =============================================================
// Shapes
// =============================================================

/// What kind of element an arrow endpoint is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BindingKind {
    /// A highlighted passage of the book's own text.
    #[serde(rename = "bookText")]
    BookText,
    /// Any element drawn on the canvas (shapes and free text).
    #[serde(rename = "text")]
    Text,
}

/// Variant-specific payload of a shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ShapeKind {
    Rectangle {
        #[serde(default)]
        rough: RoughOptions,
    },
    Circle {
        #[serde(default)]
        radius: f64,
        #[serde(default)]
        rough: RoughOptions,
    },
    Text {
        #[serde(default)]
        text: String,
        #[serde(default)]
        font: FontProps,
    },
    /// Highlighted book text. `rects` are the per-line boxes from the
    /// reader's layout; `points` on the element hold their outline.
    #[serde(rename_all = "camelCase")]
    BookTextHighlight {
        #[serde(default)]
        text: String,
        #[serde(default)]
        rects: Vec<Rect>,
    },
}

impl ShapeKind {
    /// Binding category an arrow records when attached to this shape.
    #[must_use]
    pub fn binding_kind(&self) -> BindingKind {
        match self {
            Self::BookTextHighlight { .. } => BindingKind::BookText,
            Self::Rectangle { .. } | Self::Circle { .. } | Self::Text { .. } => BindingKind::Text,
        }
    }

    /// Short lowercase name used in logs and reports.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Rectangle { .. } => "rectangle",
            Self::Circle { .. } => "circle",
            Self::Text { .. } => "text",
            Self::BookTextHighlight { .. } => "bookTextHighlight",
        }
    }
}

/// A positioned element that arrows can attach to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeElement {
    pub id: ElementId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(flatten)]
    pub style: Style,
    /// Clockwise rotation in degrees around the top-left corner.
    #[serde(default)]
    pub rotation: f64,
    /// Outline polygon in world space, used for hit-testing and anchoring.
    #[serde(default)]
    pub points: Vec<Point>,
    /// Arrows starting on this shape. Maintained by [`ElementStore`].
    #[serde(default)]
    pub outgoing_arrow_ids: Vec<ElementId>,
    /// Arrows ending on this shape. Maintained by [`ElementStore`].
    #[serde(default)]
    pub incoming_arrow_ids: Vec<ElementId>,
    #[serde(flatten)]
    pub kind: ShapeKind,
}

impl ShapeElement {
    /// Build a shape with a fresh id and an outline derived from its geometry.
    #[must_use]
    pub fn new(kind: ShapeKind, bounds: Rect, style: Style) -> Self {
        let mut shape = Self {
            id: new_element_id(),
            x: bounds.x,
            y: bounds.y,
            width: bounds.width,
            height: bounds.height,
            style,
            rotation: 0.0,
            points: Vec::new(),
            outgoing_arrow_ids: Vec::new(),
            incoming_arrow_ids: Vec::new(),
            kind,
        };
        shape.refresh_outline();
        shape
    }

    /// Highlight over book text laid out as `rects`.
    #[must_use]
    pub fn highlight(text: impl Into<String>, rects: Vec<Rect>, style: Style) -> Self {
        let corners: Vec<Point> = rects.iter().flat_map(Rect::corners).collect();
        let bounds = Rect::from_points(&corners).unwrap_or_default();
        Self::new(ShapeKind::BookTextHighlight { text: text.into(), rects }, bounds, style)
    }

    /// The `(x, y, width, height)` box.
    #[must_use]
    pub fn frame(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// World-space bounding box, from the outline when one exists.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::from_points(&self.points).unwrap_or_else(|| self.frame())
    }

    #[must_use]
    pub fn binding_kind(&self) -> BindingKind {
        self.kind.binding_kind()
    }

    /// Whether a world point falls on this shape.
    ///
    /// Highlights also accept any of their line rectangles, so a pointer in
    /// the gap between two ragged lines still counts.
    #[must_use]
    pub fn contains(&self, world: Point) -> bool {
        if geometry::point_in_polygon(world, &self.points) {
            return true;
        }
        match &self.kind {
            ShapeKind::BookTextHighlight { rects, .. } => rects.iter().any(|r| r.contains(world)),
            _ => false,
        }
    }

    /// Recompute `points` from the current geometry.
    ///
    /// Rectangles and text use their four rotated corners, circles a ring of
    /// vertices around the center. Highlights take the bounding outline of
    /// their line rectangles.
    pub fn refresh_outline(&mut self) {
        let frame = self.frame();
        let pivot = Point::new(self.x, self.y);
        self.points = match &self.kind {
            ShapeKind::Rectangle { .. } | ShapeKind::Text { .. } => frame
                .corners()
                .iter()
                .map(|&c| geometry::rotate_about(c, pivot, self.rotation))
                .collect(),
            ShapeKind::Circle { .. } => circle_outline(frame, self.rotation),
            ShapeKind::BookTextHighlight { rects, .. } => {
                let corners: Vec<Point> = rects.iter().flat_map(Rect::corners).collect();
                Rect::from_points(&corners).map(|r| r.corners().to_vec()).unwrap_or_default()
            }
        };
    }

    /// Move the shape, its outline and any highlight rectangles by `(dx, dy)`.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
        geometry::translate_points(&mut self.points, dx, dy);
        if let ShapeKind::BookTextHighlight { rects, .. } = &mut self.kind {
            for r in rects.iter_mut() {
                *r = r.translate(dx, dy);
            }
        }
    }
}

fn circle_outline(frame: Rect, rotation: f64) -> Vec<Point> {
    let center = frame.center();
    let (rx, ry) = (frame.width * 0.5, frame.height * 0.5);
    #[allow(clippy::cast_precision_loss)]
    let step = std::f64::consts::TAU / CIRCLE_OUTLINE_VERTICES as f64;
    (0..CIRCLE_OUTLINE_VERTICES)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let angle = step * i as f64 + rotation.to_radians();
            Point::new(center.x + rx * angle.cos(), center.y + ry * angle.sin())
        })
        .collect()
}

// =============================================================
// Arrows
// =============================================================

/// Which shapes an arrow's endpoints are attached to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrowBinding {
    #[serde(default)]
    pub start_id: Option<ElementId>,
    #[serde(default)]
    pub end_id: Option<ElementId>,
    #[serde(default)]
    pub start_type: Option<BindingKind>,
    #[serde(default)]
    pub end_type: Option<BindingKind>,
}

/// An arrow from `points[0]` to `points[1]`.
///
/// Arrows with fewer than two points are malformed: they are kept in the
/// store but never rendered, re-anchored or hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurveElement {
    pub id: ElementId,
    pub points: Vec<Point>,
    #[serde(flatten)]
    pub style: Style,
    #[serde(flatten)]
    pub binding: ArrowBinding,
}

impl CurveElement {
    /// A zero-length, unbound arrow at `at`.
    #[must_use]
    pub fn new(at: Point, style: Style) -> Self {
        Self { id: new_element_id(), points: vec![at, at], style, binding: ArrowBinding::default() }
    }

    /// Start and end points, or `None` when malformed.
    #[must_use]
    pub fn endpoints(&self) -> Option<(Point, Point)> {
        match self.points.as_slice() {
            [start, end, ..] => Some((*start, *end)),
            _ => None,
        }
    }

    /// Bounding box of the arrow's points.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        Rect::from_points(&self.points)
    }

    /// Whether either endpoint is bound to `shape_id`.
    #[must_use]
    pub fn touches(&self, shape_id: &str) -> bool {
        self.binding.start_id.as_deref() == Some(shape_id) || self.binding.end_id.as_deref() == Some(shape_id)
    }
}

// =============================================================
// Snapshot
// =============================================================

/// Error returned when decoding or encoding a [`Snapshot`].
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("failed to decode snapshot: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("failed to encode snapshot: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("snapshot scale must be positive and finite, got {0}")]
    InvalidScale(f64),
}

fn default_scale() -> f64 {
    1.0
}

/// Full canvas state for one book, loaded on open and saved wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub shape_elements: Vec<ShapeElement>,
    #[serde(default)]
    pub curve_elements: Vec<CurveElement>,
    #[serde(default)]
    pub offset_position: Point,
    #[serde(default = "default_scale")]
    pub scale: f64,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self { shape_elements: Vec::new(), curve_elements: Vec::new(), offset_position: Point::default(), scale: 1.0 }
    }
}

impl Snapshot {
    /// Parse a snapshot from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Decode`] on malformed JSON and
    /// [`SnapshotError::InvalidScale`] when `scale` is not a positive number.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_str(json).map_err(SnapshotError::Decode)?;
        if !(snapshot.scale.is_finite() && snapshot.scale > 0.0) {
            return Err(SnapshotError::InvalidScale(snapshot.scale));
        }
        Ok(snapshot)
    }

    /// Serialize to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Encode`] if serialization fails.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string_pretty(self).map_err(SnapshotError::Encode)
    }
}

// =============================================================
// Store
// =============================================================

/// What happens to bound arrows when a shape is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeletePolicy {
    /// Leave arrows in place with dangling ids.
    #[default]
    KeepArrows,
    /// Also delete every arrow bound to the shape.
    CascadeArrows,
}

/// Borrowed view of either element kind.
#[derive(Debug, Clone, Copy)]
pub enum ElementRef<'a> {
    Shape(&'a ShapeElement),
    Arrow(&'a CurveElement),
}

impl ElementRef<'_> {
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Shape(s) => &s.id,
            Self::Arrow(a) => &a.id,
        }
    }
}

/// Elements removed by a shape deletion.
#[derive(Debug, Clone, Default)]
pub struct Removed {
    pub shape: Option<ShapeElement>,
    pub arrows: Vec<CurveElement>,
}

/// Arrow ids attached to one shape id.
#[derive(Debug, Clone, Default, PartialEq)]
struct ArrowLinks {
    outgoing: Vec<ElementId>,
    incoming: Vec<ElementId>,
}

/// A referential problem found by [`ElementStore::integrity_issues`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "issue", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum IntegrityIssue {
    /// An arrow endpoint names a shape that is not in the store.
    DanglingBinding { arrow_id: ElementId, shape_id: ElementId },
    /// An arrow endpoint's recorded type disagrees with the shape it names.
    KindMismatch { arrow_id: ElementId, shape_id: ElementId, recorded: Option<BindingKind>, actual: BindingKind },
    /// An arrow with fewer than two points.
    MalformedArrow { arrow_id: ElementId, points: usize },
    /// The same id appears more than once across shapes and arrows.
    DuplicateId { id: ElementId },
}

/// In-memory store of canvas elements.
///
/// Shapes and arrows keep insertion order, which is also draw order and the
/// order hover detection walks. The back-reference index is rebuilt
/// incrementally on every arrow mutation and copied into each shape's
/// `outgoing_arrow_ids` / `incoming_arrow_ids`.
#[derive(Debug, Default)]
pub struct ElementStore {
    shapes: Vec<ShapeElement>,
    arrows: Vec<CurveElement>,
    links: HashMap<ElementId, ArrowLinks>,
}

impl ElementStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Shapes ---

    /// Insert or replace a shape. Its arrow-id arrays are overwritten from
    /// the index.
    pub fn upsert_shape(&mut self, mut shape: ShapeElement) {
        self.fill_links(&mut shape);
        match self.shapes.iter_mut().find(|s| s.id == shape.id) {
            Some(existing) => *existing = shape,
            None => self.shapes.push(shape),
        }
    }

    /// Remove a shape, leaving bound arrows dangling.
    pub fn remove_shape(&mut self, id: &str) -> Option<ShapeElement> {
        self.remove_shape_with(id, DeletePolicy::KeepArrows).shape
    }

    /// Remove a shape under an explicit policy.
    pub fn remove_shape_with(&mut self, id: &str, policy: DeletePolicy) -> Removed {
        let Some(pos) = self.shapes.iter().position(|s| s.id == id) else {
            return Removed::default();
        };
        let shape = self.shapes.remove(pos);
        let mut removed = Removed { shape: Some(shape), arrows: Vec::new() };
        if policy == DeletePolicy::CascadeArrows {
            let bound: Vec<ElementId> = self.arrows.iter().filter(|a| a.touches(id)).map(|a| a.id.clone()).collect();
            for arrow_id in bound {
                if let Some(arrow) = self.remove_arrow(&arrow_id) {
                    removed.arrows.push(arrow);
                }
            }
        }
        debug!(shape_id = %id, cascaded = removed.arrows.len(), "shape removed");
        removed
    }

    /// Apply `f` to a shape in place. Returns false if the shape doesn't exist.
    ///
    /// The id and arrow-id arrays are restored afterwards, so `f` can only
    /// change geometry, style and payload.
    pub fn update_shape(&mut self, id: &str, f: impl FnOnce(&mut ShapeElement)) -> bool {
        let Some(pos) = self.shapes.iter().position(|s| s.id == id) else {
            return false;
        };
        let links = self.links.get(id).cloned().unwrap_or_default();
        let shape = &mut self.shapes[pos];
        f(shape);
        shape.id = id.to_owned();
        shape.outgoing_arrow_ids = links.outgoing;
        shape.incoming_arrow_ids = links.incoming;
        true
    }

    #[must_use]
    pub fn shape(&self, id: &str) -> Option<&ShapeElement> {
        self.shapes.iter().find(|s| s.id == id)
    }

    #[must_use]
    pub fn list_shapes(&self) -> &[ShapeElement] {
        &self.shapes
    }

    // --- Arrows ---

    /// Insert or replace an arrow and update the back-reference index.
    pub fn upsert_arrow(&mut self, arrow: CurveElement) {
        if let Some(pos) = self.arrows.iter().position(|a| a.id == arrow.id) {
            let old = std::mem::replace(&mut self.arrows[pos], arrow);
            self.unlink(&old);
            let new = self.arrows[pos].clone();
            self.link(&new);
        } else {
            self.link(&arrow);
            self.arrows.push(arrow);
        }
    }

    /// Remove an arrow and drop it from the back-reference index.
    pub fn remove_arrow(&mut self, id: &str) -> Option<CurveElement> {
        let pos = self.arrows.iter().position(|a| a.id == id)?;
        let arrow = self.arrows.remove(pos);
        self.unlink(&arrow);
        Some(arrow)
    }

    /// Apply `f` to an arrow in place, re-indexing its binding afterwards.
    /// Returns false if the arrow doesn't exist.
    pub fn update_arrow(&mut self, id: &str, f: impl FnOnce(&mut CurveElement)) -> bool {
        let Some(mut arrow) = self.arrow(id).cloned() else {
            return false;
        };
        f(&mut arrow);
        arrow.id = id.to_owned();
        self.upsert_arrow(arrow);
        true
    }

    #[must_use]
    pub fn arrow(&self, id: &str) -> Option<&CurveElement> {
        self.arrows.iter().find(|a| a.id == id)
    }

    #[must_use]
    pub fn list_arrows(&self) -> &[CurveElement] {
        &self.arrows
    }

    /// Ids of arrows with either endpoint bound to any of `shape_ids`.
    #[must_use]
    pub fn arrows_touching(&self, shape_ids: &[ElementId]) -> Vec<ElementId> {
        self.arrows
            .iter()
            .filter(|a| shape_ids.iter().any(|id| a.touches(id)))
            .map(|a| a.id.clone())
            .collect()
    }

    // --- Lookup ---

    /// Find a shape or arrow by id.
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<ElementRef<'_>> {
        self.shape(id)
            .map(ElementRef::Shape)
            .or_else(|| self.arrow(id).map(ElementRef::Arrow))
    }

    /// Total number of shapes and arrows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len() + self.arrows.len()
    }

    /// Returns `true` if the store holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty() && self.arrows.is_empty()
    }

    // --- Bulk ---

    /// Replace all elements with a snapshot's contents, as given. Repeated
    /// ids are kept so [`Self::integrity_issues`] can report them. Shapes
    /// saved without an outline get one computed from their geometry.
    pub fn load(&mut self, shapes: Vec<ShapeElement>, arrows: Vec<CurveElement>) {
        self.shapes.clear();
        self.arrows.clear();
        self.links.clear();
        for arrow in &arrows {
            self.link(arrow);
        }
        self.arrows = arrows;
        self.shapes.reserve(shapes.len());
        for mut shape in shapes {
            if shape.points.is_empty() {
                shape.refresh_outline();
            }
            self.fill_links(&mut shape);
            self.shapes.push(shape);
        }
        debug!(shapes = self.shapes.len(), arrows = self.arrows.len(), "element store loaded");
    }

    /// Clone every element out for saving.
    #[must_use]
    pub fn export(&self) -> (Vec<ShapeElement>, Vec<CurveElement>) {
        (self.shapes.clone(), self.arrows.clone())
    }

    /// Report dangling bindings, type mismatches, malformed arrows and
    /// duplicate ids. Nothing is repaired.
    #[must_use]
    pub fn integrity_issues(&self) -> Vec<IntegrityIssue> {
        let mut issues = Vec::new();
        let mut seen = HashSet::new();
        let ids = self.shapes.iter().map(|s| &s.id).chain(self.arrows.iter().map(|a| &a.id));
        for id in ids {
            if !seen.insert(id) {
                issues.push(IntegrityIssue::DuplicateId { id: id.clone() });
            }
        }
        for arrow in &self.arrows {
            if arrow.points.len() < 2 {
                issues.push(IntegrityIssue::MalformedArrow { arrow_id: arrow.id.clone(), points: arrow.points.len() });
            }
            let ends = [
                (&arrow.binding.start_id, arrow.binding.start_type),
                (&arrow.binding.end_id, arrow.binding.end_type),
            ];
            for (shape_id, recorded) in ends {
                let Some(shape_id) = shape_id else { continue };
                match self.shape(shape_id) {
                    None => issues.push(IntegrityIssue::DanglingBinding {
                        arrow_id: arrow.id.clone(),
                        shape_id: shape_id.clone(),
                    }),
                    Some(shape) if recorded != Some(shape.binding_kind()) => {
                        issues.push(IntegrityIssue::KindMismatch {
                            arrow_id: arrow.id.clone(),
                            shape_id: shape_id.clone(),
                            recorded,
                            actual: shape.binding_kind(),
                        });
                    }
                    Some(_) => {}
                }
            }
        }
        issues
    }

    // --- Index maintenance ---

    fn link(&mut self, arrow: &CurveElement) {
        if arrow.points.len() < 2 {
            warn!(arrow_id = %arrow.id, points = arrow.points.len(), "storing malformed arrow");
        }
        if let Some(start) = &arrow.binding.start_id {
            push_unique(&mut self.links.entry(start.clone()).or_default().outgoing, &arrow.id);
            self.sync_shape(start);
        }
        if let Some(end) = &arrow.binding.end_id {
            push_unique(&mut self.links.entry(end.clone()).or_default().incoming, &arrow.id);
            self.sync_shape(end);
        }
    }

    fn unlink(&mut self, arrow: &CurveElement) {
        for shape_id in [&arrow.binding.start_id, &arrow.binding.end_id].into_iter().flatten() {
            if let Some(links) = self.links.get_mut(shape_id) {
                links.outgoing.retain(|id| *id != arrow.id);
                links.incoming.retain(|id| *id != arrow.id);
                if links.outgoing.is_empty() && links.incoming.is_empty() {
                    self.links.remove(shape_id);
                }
            }
            self.sync_shape(shape_id);
        }
    }

    fn sync_shape(&mut self, shape_id: &str) {
        let links = self.links.get(shape_id).cloned().unwrap_or_default();
        if let Some(shape) = self.shapes.iter_mut().find(|s| s.id == shape_id) {
            shape.outgoing_arrow_ids = links.outgoing;
            shape.incoming_arrow_ids = links.incoming;
        }
    }

    fn fill_links(&self, shape: &mut ShapeElement) {
        let links = self.links.get(&shape.id).cloned().unwrap_or_default();
        shape.outgoing_arrow_ids = links.outgoing;
        shape.incoming_arrow_ids = links.incoming;
    }
}

fn push_unique(ids: &mut Vec<ElementId>, id: &str) {
    if !ids.iter().any(|existing| existing == id) {
        ids.push(id.to_owned());
    }
}
