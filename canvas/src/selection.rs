//! Selection → toolbar projection and bulk property edits.
//!
//! The toolbar edits whatever is selected. [`project`] picks the first
//! selected element that still exists and reports which fields its variant
//! exposes. [`update_items`] merges an [`ElementPatch`] into every selected
//! element. Each variant has its own field whitelist, so a patch setting
//! `radius` changes circles and leaves rectangles alone. Nested font and
//! rough-style patches merge key by key into the existing sub-objects.
//!
//! Geometry edits rebuild the shape outline and re-anchor bound arrows.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::binding;
use crate::doc::{CurveElement, ElementId, ElementRef, ElementStore, FontProps, RoughOptions, ShapeElement, ShapeKind, Style};

/// A property the toolbar can edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ToolbarField {
    Fill,
    StrokeColor,
    StrokeWidth,
    Opacity,
    Rotation,
    X,
    Y,
    Width,
    Height,
    Radius,
    Text,
    FontSize,
    FontFamily,
    FontStyle,
    Align,
    FillStyle,
    HachureGap,
    HachureAngle,
    Roughness,
    Bowing,
}

const RECTANGLE_FIELDS: &[ToolbarField] = &[
    ToolbarField::Fill,
    ToolbarField::StrokeColor,
    ToolbarField::StrokeWidth,
    ToolbarField::Opacity,
    ToolbarField::Rotation,
    ToolbarField::X,
    ToolbarField::Y,
    ToolbarField::Width,
    ToolbarField::Height,
    ToolbarField::FillStyle,
    ToolbarField::HachureGap,
    ToolbarField::HachureAngle,
    ToolbarField::Roughness,
    ToolbarField::Bowing,
];

const CIRCLE_FIELDS: &[ToolbarField] = &[
    ToolbarField::Fill,
    ToolbarField::StrokeColor,
    ToolbarField::StrokeWidth,
    ToolbarField::Opacity,
    ToolbarField::X,
    ToolbarField::Y,
    ToolbarField::Radius,
    ToolbarField::FillStyle,
    ToolbarField::HachureGap,
    ToolbarField::HachureAngle,
    ToolbarField::Roughness,
    ToolbarField::Bowing,
];

const TEXT_FIELDS: &[ToolbarField] = &[
    ToolbarField::Fill,
    ToolbarField::Opacity,
    ToolbarField::Rotation,
    ToolbarField::X,
    ToolbarField::Y,
    ToolbarField::Width,
    ToolbarField::Height,
    ToolbarField::Text,
    ToolbarField::FontSize,
    ToolbarField::FontFamily,
    ToolbarField::FontStyle,
    ToolbarField::Align,
];

// Book text is laid out by the reader; only the paint is editable.
const HIGHLIGHT_FIELDS: &[ToolbarField] = &[ToolbarField::Fill, ToolbarField::Opacity];

const ARROW_FIELDS: &[ToolbarField] =
    &[ToolbarField::Fill, ToolbarField::StrokeColor, ToolbarField::StrokeWidth, ToolbarField::Opacity];

impl ShapeKind {
    /// Editable fields for this variant.
    #[must_use]
    pub fn toolbar_fields(&self) -> &'static [ToolbarField] {
        match self {
            Self::Rectangle { .. } => RECTANGLE_FIELDS,
            Self::Circle { .. } => CIRCLE_FIELDS,
            Self::Text { .. } => TEXT_FIELDS,
            Self::BookTextHighlight { .. } => HIGHLIGHT_FIELDS,
        }
    }
}

/// Editable fields for arrows.
#[must_use]
pub fn arrow_toolbar_fields() -> &'static [ToolbarField] {
    ARROW_FIELDS
}

/// Font keys to merge into a text element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<String>,
}

/// Rough-style keys to merge into a sketchy shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoughPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hachure_gap: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hachure_angle: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roughness: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bowing: Option<f64>,
}

/// Sparse edit for selected elements. Only present fields are applied, and
/// only where the element's variant allows them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<FontPatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rough: Option<RoughPatch>,
}

/// The element the toolbar edits and the fields it shows.
#[derive(Debug, Clone, Copy)]
pub struct ToolbarProjection<'a> {
    pub element: ElementRef<'a>,
    pub fields: &'static [ToolbarField],
}

/// Elements touched by [`update_items`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateOutcome {
    /// Shapes that received at least one field.
    pub shapes: Vec<ElementId>,
    /// Arrows edited directly or re-anchored by a geometry change.
    pub arrows: Vec<ElementId>,
}

/// The first selected id that resolves to an element.
#[must_use]
pub fn first_selected<'a>(store: &'a ElementStore, ids: &[ElementId]) -> Option<ElementRef<'a>> {
    ids.iter().find_map(|id| store.find_by_id(id))
}

/// Toolbar view of the current selection.
#[must_use]
pub fn project<'a>(store: &'a ElementStore, ids: &[ElementId]) -> Option<ToolbarProjection<'a>> {
    let element = first_selected(store, ids)?;
    let fields = match element {
        ElementRef::Shape(shape) => shape.kind.toolbar_fields(),
        ElementRef::Arrow(_) => arrow_toolbar_fields(),
    };
    Some(ToolbarProjection { element, fields })
}

/// Merge `patch` into every selected element.
pub fn update_items(store: &mut ElementStore, ids: &[ElementId], patch: &ElementPatch) -> UpdateOutcome {
    let mut outcome = UpdateOutcome::default();
    let mut reshaped = Vec::new();

    for id in ids {
        if store.shape(id).is_some() {
            let mut changed = false;
            let mut geometry = false;
            store.update_shape(id, |shape| (changed, geometry) = apply_to_shape(shape, patch));
            if changed {
                outcome.shapes.push(id.clone());
            }
            if geometry {
                reshaped.push(id.clone());
            }
        } else if store.arrow(id).is_some() {
            let mut changed = false;
            store.update_arrow(id, |arrow| changed = apply_to_arrow(arrow, patch));
            if changed {
                outcome.arrows.push(id.clone());
            }
        } else {
            debug!(element_id = %id, "selected element no longer exists");
        }
    }

    for arrow_id in binding::reanchor(store, &reshaped) {
        if !outcome.arrows.contains(&arrow_id) {
            outcome.arrows.push(arrow_id);
        }
    }
    outcome
}

/// Apply allowed fields; returns `(changed, geometry_changed)`.
fn apply_to_shape(shape: &mut ShapeElement, patch: &ElementPatch) -> (bool, bool) {
    let allowed = shape.kind.toolbar_fields();
    let allows = |field| allowed.contains(&field);
    let mut changed = apply_style(&mut shape.style, patch, allowed);
    let mut geometry = false;

    let dx = patch.x.filter(|_| allows(ToolbarField::X)).map_or(0.0, |x| x - shape.x);
    let dy = patch.y.filter(|_| allows(ToolbarField::Y)).map_or(0.0, |y| y - shape.y);
    if dx != 0.0 || dy != 0.0 {
        shape.translate(dx, dy);
        geometry = true;
    }

    let mut resized = false;
    if let Some(w) = patch.width.filter(|_| allows(ToolbarField::Width)) {
        shape.width = w;
        resized = true;
    }
    if let Some(h) = patch.height.filter(|_| allows(ToolbarField::Height)) {
        shape.height = h;
        resized = true;
    }
    if let Some(r) = patch.rotation.filter(|_| allows(ToolbarField::Rotation)) {
        shape.rotation = r;
        resized = true;
    }
    if let Some(r) = patch.radius.filter(|_| allows(ToolbarField::Radius)) {
        if let ShapeKind::Circle { radius, .. } = &mut shape.kind {
            *radius = r;
        }
        shape.width = r * 2.0;
        shape.height = r * 2.0;
        resized = true;
    }

    match &mut shape.kind {
        ShapeKind::Text { text, font } => {
            if let Some(t) = patch.text.as_ref().filter(|_| allows(ToolbarField::Text)) {
                text.clone_from(t);
                changed = true;
            }
            if let Some(fp) = &patch.font {
                changed |= merge_font(font, fp, allowed);
            }
        }
        ShapeKind::Rectangle { rough } | ShapeKind::Circle { rough, .. } => {
            if let Some(rp) = &patch.rough {
                changed |= merge_rough(rough, rp, allowed);
            }
        }
        ShapeKind::BookTextHighlight { .. } => {}
    }

    if resized {
        shape.refresh_outline();
        geometry = true;
    }
    (changed || geometry, geometry)
}

fn apply_to_arrow(arrow: &mut CurveElement, patch: &ElementPatch) -> bool {
    apply_style(&mut arrow.style, patch, arrow_toolbar_fields())
}

fn apply_style(style: &mut Style, patch: &ElementPatch, allowed: &[ToolbarField]) -> bool {
    let mut changed = false;
    if let Some(v) = patch.fill.as_ref().filter(|_| allowed.contains(&ToolbarField::Fill)) {
        style.fill.clone_from(v);
        changed = true;
    }
    if let Some(v) = patch.stroke_color.as_ref().filter(|_| allowed.contains(&ToolbarField::StrokeColor)) {
        style.stroke_color.clone_from(v);
        changed = true;
    }
    if let Some(v) = patch.stroke_width.filter(|_| allowed.contains(&ToolbarField::StrokeWidth)) {
        style.stroke_width = v;
        changed = true;
    }
    if let Some(v) = patch.opacity.filter(|_| allowed.contains(&ToolbarField::Opacity)) {
        style.opacity = v.clamp(0.0, 1.0);
        changed = true;
    }
    changed
}

fn merge_font(font: &mut FontProps, patch: &FontPatch, allowed: &[ToolbarField]) -> bool {
    let mut changed = false;
    if let Some(v) = patch.font_size.filter(|_| allowed.contains(&ToolbarField::FontSize)) {
        font.font_size = v;
        changed = true;
    }
    if let Some(v) = patch.font_family.as_ref().filter(|_| allowed.contains(&ToolbarField::FontFamily)) {
        font.font_family.clone_from(v);
        changed = true;
    }
    if let Some(v) = patch.font_style.as_ref().filter(|_| allowed.contains(&ToolbarField::FontStyle)) {
        font.font_style.clone_from(v);
        changed = true;
    }
    if let Some(v) = patch.align.as_ref().filter(|_| allowed.contains(&ToolbarField::Align)) {
        font.align.clone_from(v);
        changed = true;
    }
    changed
}

fn merge_rough(rough: &mut RoughOptions, patch: &RoughPatch, allowed: &[ToolbarField]) -> bool {
    let mut changed = false;
    if let Some(v) = patch.fill_style.as_ref().filter(|_| allowed.contains(&ToolbarField::FillStyle)) {
        rough.fill_style.clone_from(v);
        changed = true;
    }
    if let Some(v) = patch.hachure_gap.filter(|_| allowed.contains(&ToolbarField::HachureGap)) {
        rough.hachure_gap = v;
        changed = true;
    }
    if let Some(v) = patch.hachure_angle.filter(|_| allowed.contains(&ToolbarField::HachureAngle)) {
        rough.hachure_angle = v;
        changed = true;
    }
    if let Some(v) = patch.roughness.filter(|_| allowed.contains(&ToolbarField::Roughness)) {
        rough.roughness = v;
        changed = true;
    }
    if let Some(v) = patch.bowing.filter(|_| allowed.contains(&ToolbarField::Bowing)) {
        rough.bowing = v;
        changed = true;
    }
    changed
}
