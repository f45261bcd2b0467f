use tracing::debug;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Element, HtmlCanvasElement};

use crate::camera::{Camera, Point};
use crate::card::{self, DragBounds};
use crate::config::BoardConfig;
use crate::doc::{CardHeight, Entity, EntityId, EntityStore, Relationship};
use crate::hit::{self, Hit, HitPart, Rect};
use crate::input::{Button, InputState, WheelDelta};
use crate::render;
use crate::viewport::ViewportController;
use crate::wire::{self, WireSegment};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

const CURSOR_IDLE: &str = "grab";
const CURSOR_GRABBING: &str = "grabbing";
const CURSOR_RESIZE: &str = "nwse-resize";

/// Actions returned from input handlers for the host to process.
///
/// The first three are the store mutations; [`crate::doc::apply_actions`]
/// forwards them to an [`EntityStore`].
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    EntityMoved { id: EntityId, x: f64, y: f64 },
    EntityResized { id: EntityId, width: f64, height: CardHeight },
    EntitySelected(Option<EntityId>),
    SetCursor(String),
    RenderNeeded,
}

/// Core engine state: all logic that doesn't depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
/// Entities and relationships are the latest store snapshot; card gestures
/// update that snapshot in place as they emit mutations so wires track a
/// dragged card before the store echoes the change back.
pub struct EngineCore {
    config: BoardConfig,
    entities: Vec<Entity>,
    relationships: Vec<Relationship>,
    viewport: ViewportController,
    input: InputState,
    selected: Option<EntityId>,
    controls_rect: Option<Rect>,
    viewport_width: f64,
    viewport_height: f64,
    dpr: f64,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::with_config(BoardConfig::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: BoardConfig) -> Self {
        Self {
            viewport: ViewportController::new(&config),
            config,
            entities: Vec::new(),
            relationships: Vec::new(),
            input: InputState::Idle,
            selected: None,
            controls_rect: None,
            viewport_width: 0.0,
            viewport_height: 0.0,
            dpr: 1.0,
        }
    }

    // --- Data inputs ---

    /// Replace the render snapshot.
    ///
    /// A card gesture whose card vanished is cancelled, and a selection that
    /// no longer resolves is cleared.
    pub fn load_snapshot(&mut self, entities: Vec<Entity>, relationships: Vec<Relationship>) {
        self.entities = entities;
        self.relationships = relationships;

        if let Some(id) = self.input.entity_id() {
            if self.entity(&id).is_none() {
                debug!(%id, gesture = self.input.name(), "gesture target removed; cancelling");
                self.input = InputState::Idle;
            }
        }
        if let Some(id) = self.selected {
            if self.entity(&id).is_none() {
                self.selected = None;
            }
        }
    }

    /// Pull a fresh snapshot from a store.
    pub fn sync_from<S: EntityStore + ?Sized>(&mut self, store: &S) {
        self.load_snapshot(store.entities().to_vec(), store.relationships().to_vec());
    }

    /// Mirror a selection made outside the board (e.g. from a list).
    pub fn set_selection(&mut self, id: Option<EntityId>) {
        self.selected = id.filter(|id| self.entity(id).is_some());
    }

    /// Update viewport dimensions (CSS pixels) and device pixel ratio.
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) {
        self.viewport_width = width_css.max(0.0);
        self.viewport_height = height_css.max(0.0);
        self.dpr = dpr.max(1.0);
    }

    /// Screen rect of the zoom control cluster; presses inside it never
    /// reach the board.
    pub fn set_controls_rect(&mut self, rect: Option<Rect>) {
        self.controls_rect = rect;
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen: Point, button: Button) -> Vec<Action> {
        if button != Button::Primary {
            debug!(?button, "non-primary press ignored");
            return Vec::new();
        }
        if !self.input.is_idle() {
            debug!(gesture = self.input.name(), "press ignored; gesture already active");
            return Vec::new();
        }
        if self.controls_rect.is_some_and(|r| r.contains(screen)) {
            return Vec::new();
        }

        let camera = self.camera();
        let logical = camera.screen_to_logical(screen);
        match hit::hit_test(logical, &self.entities, &camera, self.selected, &self.config) {
            Some(Hit { entity_id, part: HitPart::ResizeHandle }) => self.begin_resize(entity_id, screen),
            Some(Hit { entity_id, part: HitPart::Body }) => self.begin_drag(entity_id, screen),
            None => self.begin_pan(screen),
        }
    }

    pub fn on_pointer_move(&mut self, screen: Point) -> Vec<Action> {
        match self.input {
            InputState::Idle => Vec::new(),
            InputState::Panning { anchor, origin, moved } => {
                self.viewport.update_pan(anchor, screen);
                let moved = moved || screen.distance(origin) > self.config.click_slop_px;
                self.input = InputState::Panning { anchor, origin, moved };
                vec![Action::RenderNeeded]
            }
            InputState::DraggingCard { id, pointer_offset } => self.drag_to(id, pointer_offset, screen),
            InputState::ResizingCard { id, anchor, start_width, start_height } => {
                let (width, height) =
                    card::resized(screen, anchor, start_width, start_height, &self.camera(), &self.config);
                self.emit_resize(id, width, CardHeight::fixed(height))
            }
        }
    }

    /// End the active gesture. A release anywhere ends it, whichever button.
    ///
    /// A background press-release that never left the click slop is a click
    /// and clears the selection; a real pan does not.
    pub fn on_pointer_up(&mut self, screen: Point) -> Vec<Action> {
        let finished = std::mem::take(&mut self.input);
        match finished {
            InputState::Idle => {
                debug!("release with no active gesture ignored");
                Vec::new()
            }
            InputState::Panning { anchor, origin, moved } => {
                self.viewport.update_pan(anchor, screen);
                let moved = moved || screen.distance(origin) > self.config.click_slop_px;
                let mut actions = vec![Action::SetCursor(CURSOR_IDLE.into())];
                if !moved && self.selected.take().is_some() {
                    actions.push(Action::EntitySelected(None));
                }
                actions.push(Action::RenderNeeded);
                actions
            }
            InputState::DraggingCard { id, .. } | InputState::ResizingCard { id, .. } => {
                debug!(%id, gesture = finished.name(), "card gesture ended");
                vec![Action::SetCursor(CURSOR_IDLE.into()), Action::RenderNeeded]
            }
        }
    }

    /// The pointer was lost (capture lost, touch cancelled). Ends any gesture
    /// where it stands.
    pub fn on_pointer_cancel(&mut self) -> Vec<Action> {
        let finished = std::mem::take(&mut self.input);
        if finished.is_idle() {
            return Vec::new();
        }
        debug!(gesture = finished.name(), "gesture cancelled");
        vec![Action::SetCursor(CURSOR_IDLE.into()), Action::RenderNeeded]
    }

    /// Wheel zoom toward the cursor. Ignored mid-pan.
    pub fn on_wheel(&mut self, screen: Point, delta: WheelDelta) -> Vec<Action> {
        if matches!(self.input, InputState::Panning { .. }) {
            debug!("wheel ignored while panning");
            return Vec::new();
        }
        render_if(self.viewport.zoom_wheel(screen, delta))
    }

    // --- Zoom controls ---

    pub fn zoom_in(&mut self) -> Vec<Action> {
        render_if(self.viewport.zoom_in())
    }

    pub fn zoom_out(&mut self) -> Vec<Action> {
        render_if(self.viewport.zoom_out())
    }

    pub fn reset_view(&mut self) -> Vec<Action> {
        self.viewport.reset_view();
        vec![Action::RenderNeeded]
    }

    // --- Queries ---

    /// The currently selected entity, if any.
    #[must_use]
    pub fn selection(&self) -> Option<EntityId> {
        self.selected
    }

    /// The current camera state.
    #[must_use]
    pub fn camera(&self) -> Camera {
        self.viewport.camera()
    }

    /// The active gesture.
    #[must_use]
    pub fn gesture(&self) -> InputState {
        self.input
    }

    #[must_use]
    pub fn is_gesture_active(&self) -> bool {
        !self.input.is_idle()
    }

    /// Look up an entity in the current snapshot.
    #[must_use]
    pub fn entity(&self, id: &EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == *id)
    }

    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    #[must_use]
    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    /// Wires for the current snapshot and camera.
    #[must_use]
    pub fn wires(&self) -> Vec<WireSegment> {
        wire::wires(&self.entities, &self.relationships, &self.camera(), &self.config)
    }

    #[must_use]
    pub fn zoom_percent(&self) -> i64 {
        self.viewport.zoom_percent()
    }

    #[must_use]
    pub fn can_zoom_in(&self) -> bool {
        self.viewport.can_zoom_in()
    }

    #[must_use]
    pub fn can_zoom_out(&self) -> bool {
        self.viewport.can_zoom_out()
    }

    /// CSS transform for the host's card layer.
    #[must_use]
    pub fn content_transform_css(&self) -> String {
        self.camera().css_transform()
    }

    #[must_use]
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    #[must_use]
    pub fn viewport_size(&self) -> (f64, f64) {
        (self.viewport_width, self.viewport_height)
    }

    #[must_use]
    pub fn dpr(&self) -> f64 {
        self.dpr
    }

    // --- Gesture internals ---

    fn begin_drag(&mut self, id: EntityId, screen: Point) -> Vec<Action> {
        let Some(entity) = self.entity(&id) else {
            return Vec::new();
        };
        let pointer_offset = card::pointer_offset(entity, screen, &self.camera());
        self.input = InputState::DraggingCard { id, pointer_offset };
        self.selected = Some(id);
        debug!(%id, "drag started");
        vec![
            Action::EntitySelected(Some(id)),
            Action::SetCursor(CURSOR_GRABBING.into()),
            Action::RenderNeeded,
        ]
    }

    fn begin_resize(&mut self, id: EntityId, screen: Point) -> Vec<Action> {
        let Some(entity) = self.entity(&id) else {
            return Vec::new();
        };
        let (start_width, start_height) = card::resize_start_size(entity, &self.config);
        let anchor = card::resize_anchor(screen, &self.camera());
        self.input = InputState::ResizingCard { id, anchor, start_width, start_height };
        debug!(%id, start_width, start_height, "resize started");

        // Pin the height now: an auto-sized card becomes fixed as soon as a
        // resize begins.
        let mut actions = self.emit_resize(id, start_width, CardHeight::fixed(start_height));
        actions.insert(0, Action::SetCursor(CURSOR_RESIZE.into()));
        actions
    }

    fn begin_pan(&mut self, screen: Point) -> Vec<Action> {
        let anchor = self.viewport.start_pan(screen);
        self.input = InputState::Panning { anchor, origin: screen, moved: false };
        vec![Action::SetCursor(CURSOR_GRABBING.into())]
    }

    fn drag_to(&mut self, id: EntityId, pointer_offset: Point, screen: Point) -> Vec<Action> {
        let camera = self.camera();
        let Some(entity) = self.entity(&id) else {
            debug!(%id, "dragged entity missing; cancelling");
            self.input = InputState::Idle;
            return Vec::new();
        };
        let card_size = Point::new(entity.width, entity.height.resolve(self.config.auto_card_height));
        let viewport_size = Point::new(self.viewport_width, self.viewport_height);
        let bounds = DragBounds::around_viewport(card_size, viewport_size, &camera);
        let pos = card::drag_position(screen, pointer_offset, &camera, bounds);

        if let Some(entity) = self.entity_mut(&id) {
            entity.x = pos.x;
            entity.y = pos.y;
        }
        vec![Action::EntityMoved { id, x: pos.x, y: pos.y }, Action::RenderNeeded]
    }

    fn emit_resize(&mut self, id: EntityId, width: f64, height: CardHeight) -> Vec<Action> {
        let Some(entity) = self.entity_mut(&id) else {
            debug!(%id, "resized entity missing; cancelling");
            self.input = InputState::Idle;
            return Vec::new();
        };
        entity.width = width;
        entity.height = height;
        vec![Action::EntityResized { id, width, height }, Action::RenderNeeded]
    }

    fn entity_mut(&mut self, id: &EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == *id)
    }
}

fn render_if(changed: bool) -> Vec<Action> {
    if changed { vec![Action::RenderNeeded] } else { Vec::new() }
}

/// Pointer capture on the board canvas, held for the lifetime of a gesture.
///
/// While held, moves and the release are delivered to the canvas even when
/// the pointer leaves it. Dropping the guard releases the capture, so every
/// way out of a gesture gives it back.
struct PointerCapture {
    element: Element,
    pointer_id: i32,
}

impl PointerCapture {
    fn acquire(element: &Element, pointer_id: i32) -> Result<Self, JsValue> {
        element.set_pointer_capture(pointer_id)?;
        Ok(Self { element: element.clone(), pointer_id })
    }
}

impl Drop for PointerCapture {
    fn drop(&mut self) {
        if let Err(err) = self.element.release_pointer_capture(self.pointer_id) {
            debug!(?err, pointer_id = self.pointer_id, "pointer capture release failed");
        }
    }
}

/// The full board engine. Wraps `EngineCore` and owns the browser canvas the
/// wires are painted on.
pub struct Engine {
    canvas: HtmlCanvasElement,
    capture: Option<PointerCapture>,
    pub core: EngineCore,
}

impl Engine {
    /// Create a new engine bound to the given canvas element.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        Self::with_config(canvas, BoardConfig::default())
    }

    #[must_use]
    pub fn with_config(canvas: HtmlCanvasElement, config: BoardConfig) -> Self {
        Self { canvas, capture: None, core: EngineCore::with_config(config) }
    }

    // --- Delegated data inputs ---

    pub fn load_snapshot(&mut self, entities: Vec<Entity>, relationships: Vec<Relationship>) {
        self.core.load_snapshot(entities, relationships);
        self.sync_capture(None);
    }

    pub fn sync_from<S: EntityStore + ?Sized>(&mut self, store: &S) {
        self.core.sync_from(store);
        self.sync_capture(None);
    }

    pub fn set_selection(&mut self, id: Option<EntityId>) {
        self.core.set_selection(id);
    }

    pub fn set_controls_rect(&mut self, rect: Option<Rect>) {
        self.core.set_controls_rect(rect);
    }

    // --- Viewport ---

    /// Update viewport dimensions and size the canvas backing store to match.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) {
        self.core.set_viewport(width_css, height_css, dpr);
        let (width, height) = self.core.viewport_size();
        let dpr = self.core.dpr();
        self.canvas.set_width((width * dpr).round().max(1.0) as u32);
        self.canvas.set_height((height * dpr).round().max(1.0) as u32);
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, pointer_id: i32) -> Vec<Action> {
        let actions = self.core.on_pointer_down(screen_pt, button);
        self.sync_capture(Some(pointer_id));
        actions
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point) -> Vec<Action> {
        let actions = self.core.on_pointer_move(screen_pt);
        self.sync_capture(None);
        actions
    }

    pub fn on_pointer_up(&mut self, screen_pt: Point) -> Vec<Action> {
        let actions = self.core.on_pointer_up(screen_pt);
        self.sync_capture(None);
        actions
    }

    pub fn on_pointer_cancel(&mut self) -> Vec<Action> {
        let actions = self.core.on_pointer_cancel();
        self.sync_capture(None);
        actions
    }

    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta) -> Vec<Action> {
        self.core.on_wheel(screen_pt, delta)
    }

    pub fn zoom_in(&mut self) -> Vec<Action> {
        self.core.zoom_in()
    }

    pub fn zoom_out(&mut self) -> Vec<Action> {
        self.core.zoom_out()
    }

    pub fn reset_view(&mut self) -> Vec<Action> {
        self.core.reset_view()
    }

    // --- Render ---

    /// Draw the current wires to the canvas.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the 2D context cannot be obtained or a draw call fails.
    pub fn render(&self) -> Result<(), JsValue> {
        let Some(ctx) = self.canvas.get_context("2d")? else {
            debug!("canvas has no 2d context; skipping render");
            return Ok(());
        };
        let ctx = ctx.dyn_into::<CanvasRenderingContext2d>().map_err(JsValue::from)?;
        let (width, height) = self.core.viewport_size();
        render::draw(&ctx, &self.core.wires(), width, height, self.core.dpr())
    }

    // --- Delegated queries ---

    #[must_use]
    pub fn selection(&self) -> Option<EntityId> {
        self.core.selection()
    }

    #[must_use]
    pub fn camera(&self) -> Camera {
        self.core.camera()
    }

    #[must_use]
    pub fn content_transform_css(&self) -> String {
        self.core.content_transform_css()
    }

    #[must_use]
    pub fn zoom_percent(&self) -> i64 {
        self.core.zoom_percent()
    }

    /// Hold pointer capture exactly while a gesture is active.
    fn sync_capture(&mut self, pointer_id: Option<i32>) {
        if !self.core.is_gesture_active() {
            self.capture = None;
            return;
        }
        if self.capture.is_some() {
            return;
        }
        let Some(pointer_id) = pointer_id else {
            return;
        };
        match PointerCapture::acquire(&self.canvas, pointer_id) {
            Ok(capture) => self.capture = Some(capture),
            Err(err) => debug!(?err, pointer_id, "pointer capture unavailable"),
        }
    }
}
