use tracing::{debug, warn};
use web_sys::HtmlCanvasElement;

use crate::binding;
use crate::camera::{Camera, Point};
use crate::config::EngineConfig;
use crate::consts::{DEFAULT_SHAPE_SIZE, DEFAULT_TEXT_HEIGHT, DEFAULT_TEXT_WIDTH, MIN_DRAW_SIZE};
use crate::doc::{
    CurveElement, ElementId, ElementRef, ElementStore, FontProps, RoughOptions, ShapeElement, ShapeKind, Snapshot,
    Style,
};
use crate::geometry::Rect;
use crate::hit::{self, HitPart};
use crate::hover::HoverState;
use crate::input::{Button, InputState, Key, Modifiers, Tool, UiState, WheelDelta};
use crate::render;
use crate::selection::{self, ElementPatch, ToolbarProjection};
use crate::viewport::{self, Viewport};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone)]
pub enum Action {
    ShapeCreated(ShapeElement),
    ArrowCreated(CurveElement),
    ShapeUpdated { id: ElementId },
    ArrowUpdated { id: ElementId },
    ElementDeleted { id: ElementId },
    SelectionChanged(Vec<ElementId>),
    /// The host should open its text editor for this element.
    EditTextRequested { id: ElementId, text: String },
    SetCursor(String),
    RenderNeeded,
}

/// Core engine state: all logic that doesn't depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
pub struct EngineCore {
    pub store: ElementStore,
    pub camera: Camera,
    pub ui: UiState,
    pub hover: HoverState,
    pub input: InputState,
    pub config: EngineConfig,
    /// Style given to newly drawn elements.
    pub style: Style,
    pub viewport: Viewport,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub dpr: f64,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::with_config(EngineConfig::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        let camera = Camera::default();
        Self {
            store: ElementStore::new(),
            viewport: Viewport::from_camera(&camera, 0.0, 0.0, config.viewport_buffer_px),
            camera,
            ui: UiState::default(),
            hover: HoverState::new(),
            input: InputState::default(),
            config,
            style: Style::default(),
            viewport_width: 0.0,
            viewport_height: 0.0,
            dpr: 1.0,
        }
    }

    // --- Data inputs ---

    /// Replace the whole scene with a saved snapshot.
    pub fn load_snapshot(&mut self, snapshot: Snapshot) {
        self.store.load(snapshot.shape_elements, snapshot.curve_elements);
        self.camera = Camera::from_offset(snapshot.offset_position, self.config.clamp_zoom(snapshot.scale));
        self.ui.selected_ids.clear();
        self.hover.clear();
        self.input = InputState::Idle;
        self.refresh_viewport();
    }

    /// The scene and view as saved to the backend.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let (shape_elements, curve_elements) = self.store.export();
        Snapshot { shape_elements, curve_elements, offset_position: self.camera.offset(), scale: self.camera.zoom }
    }

    // --- Tool / text ---

    /// Set the active tool. An arrow draft in progress is discarded.
    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        self.ui.tool = tool;
        if tool != Tool::Arrow {
            self.hover.clear();
        }
        if self.cancel_draft() {
            return vec![Action::RenderNeeded];
        }
        Vec::new()
    }

    /// Commit text from the host editor into a text element.
    pub fn set_text(&mut self, id: &str, text: String) -> Vec<Action> {
        let mut applied = false;
        self.store.update_shape(id, |shape| {
            if let ShapeKind::Text { text: current, .. } = &mut shape.kind {
                *current = text;
                applied = true;
            }
        });
        if !applied {
            debug!(element_id = %id, "set_text ignored: not a text element");
            return Vec::new();
        }
        vec![Action::ShapeUpdated { id: id.to_owned() }, Action::RenderNeeded]
    }

    /// Replace the selection with the ids that exist.
    pub fn select(&mut self, ids: &[ElementId]) -> Vec<Action> {
        let ids: Vec<ElementId> = ids.iter().filter(|id| self.store.find_by_id(id).is_some()).cloned().collect();
        self.set_selection(ids)
    }

    /// Apply a toolbar edit to every selected element.
    pub fn update_selected(&mut self, patch: &ElementPatch) -> Vec<Action> {
        let outcome = selection::update_items(&mut self.store, &self.ui.selected_ids, patch);
        let mut actions: Vec<Action> = outcome
            .shapes
            .into_iter()
            .map(|id| Action::ShapeUpdated { id })
            .chain(outcome.arrows.into_iter().map(|id| Action::ArrowUpdated { id }))
            .collect();
        if !actions.is_empty() {
            let edited: Vec<ElementId> = self.ui.selected_ids.clone();
            self.refresh_hover(&edited);
            self.refresh_viewport();
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    /// Delete every selected element using the configured delete policy.
    pub fn delete_selected(&mut self) -> Vec<Action> {
        if self.ui.selected_ids.is_empty() {
            return Vec::new();
        }
        let mut actions = Vec::new();
        for id in std::mem::take(&mut self.ui.selected_ids) {
            self.hover.forget(&id);
            if self.store.shape(&id).is_some() {
                let removed = self.store.remove_shape_with(&id, self.config.delete_policy);
                actions.push(Action::ElementDeleted { id });
                for arrow in removed.arrows {
                    actions.push(Action::ElementDeleted { id: arrow.id });
                }
            } else if self.store.remove_arrow(&id).is_some() {
                actions.push(Action::ElementDeleted { id });
            }
        }
        actions.push(Action::SelectionChanged(Vec::new()));
        actions.push(Action::RenderNeeded);
        actions
    }

    // --- Viewport ---

    /// Update window dimensions (CSS pixels) and device pixel ratio.
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) {
        self.viewport_width = width_css;
        self.viewport_height = height_css;
        self.dpr = dpr;
        self.refresh_viewport();
    }

    /// Recompute the visible world rectangle after a pan or zoom.
    pub fn refresh_viewport(&mut self) {
        self.viewport = Viewport::from_camera(
            &self.camera,
            self.viewport_width,
            self.viewport_height,
            self.config.viewport_buffer_px,
        );
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        if button == Button::Middle || (button == Button::Primary && self.ui.tool == Tool::Pan) {
            self.input = InputState::Panning { last_screen: screen_pt };
            return vec![Action::SetCursor("grabbing".into())];
        }
        if button != Button::Primary {
            return Vec::new();
        }

        let world = self.camera.screen_to_world(screen_pt);
        self.update_hover(world);

        match self.ui.tool {
            Tool::Select => self.select_down(screen_pt, world, modifiers),
            Tool::Rectangle | Tool::Circle => {
                let shape = self.new_shape(self.ui.tool, Rect::new(world.x, world.y, 0.0, 0.0));
                let id = shape.id.clone();
                self.store.upsert_shape(shape);
                self.input = InputState::DrawingShape { id, anchor_world: world };
                vec![Action::RenderNeeded]
            }
            Tool::Text => {
                let shape = self.new_shape(Tool::Text, Rect::new(world.x, world.y, DEFAULT_TEXT_WIDTH, DEFAULT_TEXT_HEIGHT));
                let id = shape.id.clone();
                self.store.upsert_shape(shape.clone());
                let mut actions = vec![Action::ShapeCreated(shape)];
                actions.extend(self.set_selection(vec![id.clone()]));
                actions.push(Action::EditTextRequested { id, text: String::new() });
                actions
            }
            Tool::Arrow => {
                let draft = binding::begin_draft(world, &self.hover, &self.style);
                self.input = InputState::DraftingArrow { draft };
                vec![Action::RenderNeeded]
            }
            Tool::Pan => Vec::new(),
        }
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point, _modifiers: Modifiers) -> Vec<Action> {
        let world = self.camera.screen_to_world(screen_pt);

        match std::mem::take(&mut self.input) {
            InputState::Idle => {
                let before = self.hover.latest().map(|item| item.id.clone());
                self.update_hover(world);
                let after = self.hover.latest().map(|item| item.id.clone());
                if before == after { Vec::new() } else { vec![Action::RenderNeeded] }
            }
            InputState::Panning { last_screen } => {
                self.camera.pan_by(screen_pt.x - last_screen.x, screen_pt.y - last_screen.y);
                self.refresh_viewport();
                self.input = InputState::Panning { last_screen: screen_pt };
                vec![Action::RenderNeeded]
            }
            InputState::DraggingSelection { ids, origin_world, last_world } => {
                self.move_shapes(&ids, world.x - last_world.x, world.y - last_world.y);
                self.input = InputState::DraggingSelection { ids, origin_world, last_world: world };
                vec![Action::RenderNeeded]
            }
            InputState::DrawingShape { id, anchor_world } => {
                self.size_shape(&id, anchor_world, world);
                self.input = InputState::DrawingShape { id, anchor_world };
                vec![Action::RenderNeeded]
            }
            InputState::DraftingArrow { mut draft } => {
                self.update_hover(world);
                binding::extend_draft(&mut draft, world);
                self.input = InputState::DraftingArrow { draft };
                vec![Action::RenderNeeded]
            }
            InputState::DraggingArrowEndpoint { id, end } => {
                self.input = InputState::DraggingArrowEndpoint { id: id.clone(), end };
                self.update_hover(world);
                binding::drag_endpoint(&mut self.store, &id, end, world);
                vec![Action::RenderNeeded]
            }
        }
    }

    pub fn on_pointer_up(&mut self, screen_pt: Point, _button: Button, _modifiers: Modifiers) -> Vec<Action> {
        let world = self.camera.screen_to_world(screen_pt);

        let actions = match std::mem::take(&mut self.input) {
            InputState::Idle => Vec::new(),
            InputState::Panning { .. } => vec![Action::SetCursor("default".into())],
            InputState::DraggingSelection { ids, origin_world, last_world } => {
                self.move_shapes(&ids, world.x - last_world.x, world.y - last_world.y);
                if world == origin_world {
                    return Vec::new();
                }
                let arrows = self.store.arrows_touching(&ids);
                let mut actions: Vec<Action> = ids.into_iter().map(|id| Action::ShapeUpdated { id }).collect();
                actions.extend(arrows.into_iter().map(|id| Action::ArrowUpdated { id }));
                actions.push(Action::RenderNeeded);
                actions
            }
            InputState::DrawingShape { id, anchor_world } => self.finish_shape(&id, anchor_world, world),
            InputState::DraftingArrow { draft } => {
                self.detect_hover(world);
                let arrow = binding::finish_draft(draft, world, &self.hover);
                self.store.upsert_arrow(arrow.clone());
                vec![Action::ArrowCreated(arrow), Action::RenderNeeded]
            }
            InputState::DraggingArrowEndpoint { id, end } => {
                self.detect_hover(world);
                if binding::rebind_endpoint(&mut self.store, &id, end, world, &self.hover) {
                    vec![Action::ArrowUpdated { id }, Action::RenderNeeded]
                } else {
                    Vec::new()
                }
            }
        };
        self.update_hover(world);
        actions
    }

    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        if modifiers.zoom() {
            if delta.dy == 0.0 {
                return Vec::new();
            }
            let factor = if delta.dy < 0.0 { self.config.zoom_step } else { 1.0 / self.config.zoom_step };
            let target = self.camera.zoom * factor;
            self.camera.zoom_at(screen_pt, target, self.config.min_zoom, self.config.max_zoom);
        } else {
            self.camera.pan_by(-delta.dx, -delta.dy);
        }
        self.refresh_viewport();
        vec![Action::RenderNeeded]
    }

    pub fn on_key_down(&mut self, key: &Key, _modifiers: Modifiers) -> Vec<Action> {
        if key.is_escape() {
            if self.cancel_draft() {
                return vec![Action::RenderNeeded];
            }
            if self.ui.selected_ids.is_empty() {
                return Vec::new();
            }
            return self.set_selection(Vec::new());
        }
        if key.is_delete() && matches!(self.input, InputState::Idle) {
            return self.delete_selected();
        }
        Vec::new()
    }

    // --- Queries ---

    /// Selected element ids, in selection order.
    #[must_use]
    pub fn selection(&self) -> &[ElementId] {
        &self.ui.selected_ids
    }

    /// The current camera state.
    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    /// Look up an element by id.
    #[must_use]
    pub fn element(&self, id: &str) -> Option<ElementRef<'_>> {
        self.store.find_by_id(id)
    }

    /// What the toolbar should show for the current selection.
    #[must_use]
    pub fn toolbar(&self) -> Option<ToolbarProjection<'_>> {
        selection::project(&self.store, &self.ui.selected_ids)
    }

    /// The arrow being drawn, if any.
    #[must_use]
    pub fn draft(&self) -> Option<&CurveElement> {
        self.input.draft()
    }

    #[must_use]
    pub fn visible_shapes(&self) -> Vec<&ShapeElement> {
        viewport::visible_shapes(&self.store, &self.viewport)
    }

    #[must_use]
    pub fn visible_arrows(&self) -> Vec<&CurveElement> {
        viewport::visible_arrows(&self.store, &self.viewport)
    }

    // --- Internals ---

    fn select_down(&mut self, screen_pt: Point, world: Point, modifiers: Modifiers) -> Vec<Action> {
        let hit = hit::hit_test(world, &self.store, &self.camera, &self.ui.selected_ids, self.config.hover_margin_px);
        let Some(hit) = hit else {
            self.input = InputState::Panning { last_screen: screen_pt };
            if self.ui.selected_ids.is_empty() {
                return Vec::new();
            }
            return self.set_selection(Vec::new());
        };

        let mut actions = Vec::new();
        if !self.ui.is_selected(&hit.id) {
            let ids = if modifiers.shift {
                let mut ids = self.ui.selected_ids.clone();
                ids.push(hit.id.clone());
                ids
            } else {
                vec![hit.id.clone()]
            };
            actions.extend(self.set_selection(ids));
        }

        match hit.part {
            HitPart::ArrowEndpoint(end) => {
                self.input = InputState::DraggingArrowEndpoint { id: hit.id, end };
                self.update_hover(world);
                actions.push(Action::RenderNeeded);
            }
            HitPart::Body => {
                // Highlights follow the book text and never move.
                let ids: Vec<ElementId> = self
                    .ui
                    .selected_ids
                    .iter()
                    .filter(|id| {
                        self.store
                            .shape(id)
                            .is_some_and(|s| !matches!(s.kind, ShapeKind::BookTextHighlight { .. }))
                    })
                    .cloned()
                    .collect();
                if !ids.is_empty() {
                    self.input = InputState::DraggingSelection { ids, origin_world: world, last_world: world };
                }
            }
            HitPart::ArrowBody => {}
        }
        if actions.is_empty() {
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    fn set_selection(&mut self, ids: Vec<ElementId>) -> Vec<Action> {
        if ids == self.ui.selected_ids {
            return Vec::new();
        }
        self.ui.selected_ids = ids;
        vec![Action::SelectionChanged(self.ui.selected_ids.clone()), Action::RenderNeeded]
    }

    /// Track hover under `world`.
    ///
    /// While drawing arrows or dragging an arrow handle the first shape
    /// under the pointer is recorded. Otherwise stale entries are pruned,
    /// keeping anything the current draft is bound to.
    fn update_hover(&mut self, world: Point) {
        let binding_active =
            self.ui.tool == Tool::Arrow || matches!(self.input, InputState::DraggingArrowEndpoint { .. });
        if binding_active {
            self.detect_hover(world);
            return;
        }
        let keep: Vec<&str> = self
            .input
            .draft()
            .map(|d| [d.binding.start_id.as_deref(), d.binding.end_id.as_deref()])
            .into_iter()
            .flatten()
            .flatten()
            .collect();
        self.hover.prune(world, &keep);
    }

    /// Record the first visible shape under `world` as hovered.
    fn detect_hover(&mut self, world: Point) {
        let candidates = viewport::visible_shapes(&self.store, &self.viewport);
        self.hover.detect(world, candidates);
    }

    /// Bring hover entries for edited shapes in line with the store.
    fn refresh_hover(&mut self, ids: &[ElementId]) {
        for id in ids {
            if let Some(shape) = self.store.shape(id) {
                self.hover.refresh(shape);
            }
        }
    }

    fn cancel_draft(&mut self) -> bool {
        if matches!(self.input, InputState::DraftingArrow { .. }) {
            debug!("arrow draft cancelled");
            self.input = InputState::Idle;
            return true;
        }
        false
    }

    fn move_shapes(&mut self, ids: &[ElementId], dx: f64, dy: f64) {
        if dx == 0.0 && dy == 0.0 {
            return;
        }
        for id in ids {
            if !self.store.update_shape(id, |s| s.translate(dx, dy)) {
                warn!(element_id = %id, "dragged shape no longer exists");
            }
        }
        binding::reanchor(&mut self.store, ids);
        self.refresh_hover(ids);
    }

    fn new_shape(&self, tool: Tool, bounds: Rect) -> ShapeElement {
        let kind = match tool {
            Tool::Circle => ShapeKind::Circle { radius: bounds.width * 0.5, rough: RoughOptions::default() },
            Tool::Text => ShapeKind::Text { text: String::new(), font: FontProps::default() },
            _ => ShapeKind::Rectangle { rough: RoughOptions::default() },
        };
        ShapeElement::new(kind, bounds, self.style.clone())
    }

    /// Resize a shape being drawn so it spans `anchor` to `world`.
    /// Circles stay round, sized by the larger drag axis.
    fn size_shape(&mut self, id: &str, anchor: Point, world: Point) {
        let mut rect = Rect::from_corners(anchor, world);
        self.store.update_shape(id, |shape| {
            if let ShapeKind::Circle { radius, .. } = &mut shape.kind {
                let side = rect.width.max(rect.height);
                let x = if world.x < anchor.x { anchor.x - side } else { anchor.x };
                let y = if world.y < anchor.y { anchor.y - side } else { anchor.y };
                rect = Rect::new(x, y, side, side);
                *radius = side * 0.5;
            }
            shape.x = rect.x;
            shape.y = rect.y;
            shape.width = rect.width;
            shape.height = rect.height;
            shape.refresh_outline();
        });
    }

    fn finish_shape(&mut self, id: &str, anchor: Point, world: Point) -> Vec<Action> {
        let drawn = Rect::from_corners(anchor, world);
        if drawn.width < MIN_DRAW_SIZE && drawn.height < MIN_DRAW_SIZE {
            let click = Point::new(anchor.x + DEFAULT_SHAPE_SIZE, anchor.y + DEFAULT_SHAPE_SIZE);
            self.size_shape(id, anchor, click);
        } else {
            self.size_shape(id, anchor, world);
        }
        let Some(shape) = self.store.shape(id).cloned() else {
            warn!(element_id = %id, "drawn shape vanished before release");
            return Vec::new();
        };
        let mut actions = vec![Action::ShapeCreated(shape)];
        actions.extend(self.set_selection(vec![id.to_owned()]));
        if !actions.iter().any(|a| matches!(a, Action::RenderNeeded)) {
            actions.push(Action::RenderNeeded);
        }
        actions
    }
}

/// The full canvas engine. Wraps `EngineCore` and owns the browser canvas element.
pub struct Engine {
    canvas: HtmlCanvasElement,
    pub core: EngineCore,
}

impl Engine {
    /// Create a new engine bound to the given canvas element.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        Self { canvas, core: EngineCore::new() }
    }

    #[must_use]
    pub fn with_config(canvas: HtmlCanvasElement, config: EngineConfig) -> Self {
        Self { canvas, core: EngineCore::with_config(config) }
    }

    // --- Delegated data inputs ---

    pub fn load_snapshot(&mut self, snapshot: Snapshot) {
        self.core.load_snapshot(snapshot);
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.core.snapshot()
    }

    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        self.core.set_tool(tool)
    }

    pub fn set_text(&mut self, id: &str, text: String) -> Vec<Action> {
        self.core.set_text(id, text)
    }

    pub fn select(&mut self, ids: &[ElementId]) -> Vec<Action> {
        self.core.select(ids)
    }

    pub fn update_selected(&mut self, patch: &ElementPatch) -> Vec<Action> {
        self.core.update_selected(patch)
    }

    pub fn delete_selected(&mut self) -> Vec<Action> {
        self.core.delete_selected()
    }

    // --- Viewport ---

    /// Update viewport dimensions and device pixel ratio, resizing the
    /// canvas backing store to match.
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) {
        self.core.set_viewport(width_css, height_css, dpr);
        self.canvas.set_width(device_pixels(width_css, dpr));
        self.canvas.set_height(device_pixels(height_css, dpr));
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_pointer_down(screen_pt, button, modifiers)
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_pointer_move(screen_pt, modifiers)
    }

    pub fn on_pointer_up(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_pointer_up(screen_pt, button, modifiers)
    }

    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_wheel(screen_pt, delta, modifiers)
    }

    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_key_down(key, modifiers)
    }

    // --- Render ---

    /// Draw the current state to the canvas. Failures are logged.
    pub fn render(&self) {
        if let Err(err) = render::draw_to_canvas(&self.canvas, &self.core) {
            warn!(error = ?err, "canvas render failed");
        }
    }

    // --- Delegated queries ---

    #[must_use]
    pub fn selection(&self) -> &[ElementId] {
        self.core.selection()
    }

    #[must_use]
    pub fn camera(&self) -> Camera {
        self.core.camera()
    }

    #[must_use]
    pub fn element(&self, id: &str) -> Option<ElementRef<'_>> {
        self.core.element(id)
    }

    #[must_use]
    pub fn toolbar(&self) -> Option<ToolbarProjection<'_>> {
        self.core.toolbar()
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn device_pixels(css: f64, dpr: f64) -> u32 {
    (css * dpr).round().max(0.0) as u32
}
