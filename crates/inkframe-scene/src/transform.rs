//! Interaction behaviors built on the public stage and scene event API.
//!
//! Each helper installs listeners and returns a [`Teardown`] that removes
//! them again. None of them keep state outside their own closures.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use inkframe_core::{Point, SceneError, SceneResult};

use crate::events::{LayerEventKind, ListenerId, StageEventKind};
use crate::layer::LayerId;
use crate::stage::input::{CursorIcon, Key};
use crate::stage::Stage;

pub type LayerCallback = Box<dyn FnMut(&mut Stage, LayerId)>;

/// Removes everything a helper installed.
#[must_use = "dropping a Teardown leaves its listeners installed"]
#[derive(Default)]
pub struct Teardown {
    stage_listeners: Vec<ListenerId>,
    layer_listeners: Vec<(LayerId, ListenerId)>,
    finish: Option<Box<dyn FnOnce(&mut Stage)>>,
}

impl fmt::Debug for Teardown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Teardown")
            .field("stage_listeners", &self.stage_listeners)
            .field("layer_listeners", &self.layer_listeners)
            .finish()
    }
}

impl Teardown {
    pub fn run(self, stage: &mut Stage) {
        if let Some(finish) = self.finish {
            finish(stage);
        }
        for id in self.stage_listeners {
            stage.off(id);
        }
        for (layer, id) in self.layer_listeners {
            stage.scene_mut().off(layer, id);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.stage_listeners.len() + self.layer_listeners.len()
    }
}

fn ensure_interactive(stage: &Stage) -> SceneResult<()> {
    if stage.is_interactive() {
        Ok(())
    } else {
        Err(SceneError::NotInteractive)
    }
}

/// Whether a pointer hit on `target` addresses `layer`. Only the layer
/// actually hit qualifies; a miss counts as a hit on the root.
fn addresses(stage: &Stage, layer: LayerId, target: Option<LayerId>) -> bool {
    target.unwrap_or_else(|| stage.root()) == layer
}

type CallbackSlot = RefCell<Option<LayerCallback>>;

/// Runs a user callback with no borrow held, so it may call back into the
/// stage. A callback re-entered from inside itself is skipped.
fn notify(slot: &CallbackSlot, stage: &mut Stage, layer: LayerId) {
    let taken = slot.borrow_mut().take();
    if let Some(mut callback) = taken {
        callback(stage, layer);
        slot.borrow_mut().get_or_insert(callback);
    }
}

// --- drag -----------------------------------------------------------------

#[derive(Default)]
pub struct DragOptions {
    on_start: Option<LayerCallback>,
    on_drag: Option<LayerCallback>,
    on_end: Option<LayerCallback>,
}

impl DragOptions {
    /// Called on the first move after pointerdown.
    pub fn on_start(mut self, f: impl FnMut(&mut Stage, LayerId) + 'static) -> Self {
        self.on_start = Some(Box::new(f));
        self
    }

    pub fn on_drag(mut self, f: impl FnMut(&mut Stage, LayerId) + 'static) -> Self {
        self.on_drag = Some(Box::new(f));
        self
    }

    /// Called on pointerup after at least one move.
    pub fn on_end(mut self, f: impl FnMut(&mut Stage, LayerId) + 'static) -> Self {
        self.on_end = Some(Box::new(f));
        self
    }
}

struct DragState {
    origin: Cell<Option<Point>>,
    dragging: Cell<bool>,
    on_start: CallbackSlot,
    on_drag: CallbackSlot,
    on_end: CallbackSlot,
}

/// Moves `layer` with the pointer when a pointerdown hits it. The root is
/// dragged when the pointerdown hits no other layer.
pub fn draggable(stage: &mut Stage, layer: LayerId, options: DragOptions) -> SceneResult<Teardown> {
    ensure_interactive(stage)?;
    stage.scene().layer(layer)?;
    let state = Rc::new(DragState {
        origin: Cell::new(None),
        dragging: Cell::new(false),
        on_start: RefCell::new(options.on_start),
        on_drag: RefCell::new(options.on_drag),
        on_end: RefCell::new(options.on_end),
    });
    let mut teardown = Teardown::default();

    let down_state = Rc::clone(&state);
    teardown.stage_listeners.push(stage.on(StageEventKind::PointerDown, move |stage, event| {
        if !addresses(stage, layer, event.target) {
            return;
        }
        if let Ok(origin) = stage.scene().position(layer) {
            down_state.origin.set(Some(origin));
            down_state.dragging.set(false);
        }
    }));

    let move_state = Rc::clone(&state);
    teardown.stage_listeners.push(stage.on(StageEventKind::PointerMove, move |stage, event| {
        let (Some(origin), Some(down)) = (move_state.origin.get(), event.down_position) else {
            return;
        };
        let delta = event.position - down;
        let moved = stage
            .scene()
            .resolve_parent_transform(layer, delta.x, delta.y)
            .and_then(|local| {
                stage
                    .scene_mut()
                    .set_position(layer, origin.x + local.x, origin.y + local.y)
            });
        if let Err(err) = moved {
            tracing::warn!("Drag of {:?} stopped: {}", layer, err);
            move_state.origin.set(None);
            return;
        }
        stage.render();
        if !move_state.dragging.replace(true) {
            notify(&move_state.on_start, stage, layer);
        }
        notify(&move_state.on_drag, stage, layer);
    }));

    let up_state = Rc::clone(&state);
    teardown.stage_listeners.push(stage.on(StageEventKind::PointerUp, move |stage, _| {
        let was_down = up_state.origin.take().is_some();
        if was_down && up_state.dragging.replace(false) {
            notify(&up_state.on_end, stage, layer);
        }
    }));

    tracing::debug!("{:?} is draggable", layer);
    Ok(teardown)
}

// --- wheel scale ------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleOptions {
    /// Scale change per wheel notch
    pub step: f32,
}

impl Default for ScaleOptions {
    fn default() -> Self {
        Self { step: 0.1 }
    }
}

/// Wheel up grows `layer` by `step`, wheel down shrinks it. Unclamped.
pub fn scalable(stage: &mut Stage, layer: LayerId, options: ScaleOptions) -> SceneResult<Teardown> {
    ensure_interactive(stage)?;
    stage.scene().layer(layer)?;
    let mut teardown = Teardown::default();
    teardown.stage_listeners.push(stage.on(StageEventKind::Wheel, move |stage, event| {
        if event.delta == 0.0 || !addresses(stage, layer, event.target) {
            return;
        }
        let step = if event.delta < 0.0 {
            options.step
        } else {
            -options.step
        };
        let scaled = stage
            .scene()
            .scale(layer)
            .and_then(|scale| stage.scene_mut().set_scale(layer, scale + step));
        match scaled {
            Ok(()) => stage.render(),
            Err(err) => tracing::warn!("Cannot scale {:?}: {}", layer, err),
        }
    }));
    Ok(teardown)
}

// --- text editing -----------------------------------------------------------

#[derive(Default)]
pub struct TextEditOptions {
    on_change: Option<LayerCallback>,
    on_end: Option<LayerCallback>,
}

impl TextEditOptions {
    /// Called after each edit has been applied to the layer.
    pub fn on_change(mut self, f: impl FnMut(&mut Stage, LayerId) + 'static) -> Self {
        self.on_change = Some(Box::new(f));
        self
    }

    pub fn on_end(mut self, f: impl FnMut(&mut Stage, LayerId) + 'static) -> Self {
        self.on_end = Some(Box::new(f));
        self
    }
}

struct EditState {
    active: Cell<bool>,
    on_change: CallbackSlot,
    on_end: CallbackSlot,
}

fn finish_edit(stage: &mut Stage, layer: LayerId, state: &EditState) {
    if !state.active.replace(false) {
        return;
    }
    stage.blur_text_input();
    if let Err(err) = stage.scene_mut().set_caret(layer, false) {
        tracing::debug!("Caret of {:?} not cleared: {}", layer, err);
    }
    stage.stop_loop();
    stage.render();
    notify(&state.on_end, stage, layer);
    tracing::debug!("Finished editing {:?}", layer);
}

/// Starts editing a text layer in place through the stage's hidden input.
///
/// Editing ends on a pointerdown that resolves to any other layer (or to
/// nothing), or on [`Key::Escape`].
pub fn text_editable(
    stage: &mut Stage,
    layer: LayerId,
    options: TextEditOptions,
) -> SceneResult<Teardown> {
    ensure_interactive(stage)?;
    let text = stage.scene().text(layer)?.to_string();
    stage.focus_text_input(&text);
    stage.scene_mut().set_caret(layer, true)?;
    stage.start_loop();
    stage.render();

    let state = Rc::new(EditState {
        active: Cell::new(true),
        on_change: RefCell::new(options.on_change),
        on_end: RefCell::new(options.on_end),
    });
    let mut teardown = Teardown::default();

    let input_state = Rc::clone(&state);
    teardown.stage_listeners.push(stage.on(StageEventKind::Input, move |stage, event| {
        if !input_state.active.get() {
            return;
        }
        let Some(value) = event.value.clone() else {
            return;
        };
        if let Err(err) = stage.scene_mut().set_text(layer, value) {
            tracing::warn!("Edit of {:?} dropped: {}", layer, err);
            return;
        }
        stage.render();
        notify(&input_state.on_change, stage, layer);
    }));

    let down_state = Rc::clone(&state);
    teardown.stage_listeners.push(stage.on(StageEventKind::PointerDown, move |stage, event| {
        if event.target != Some(layer) {
            finish_edit(stage, layer, &down_state);
        }
    }));

    let key_state = Rc::clone(&state);
    teardown.stage_listeners.push(stage.on(StageEventKind::KeyDown, move |stage, event| {
        if event.key == Some(Key::Escape) {
            finish_edit(stage, layer, &key_state);
        }
    }));

    teardown.finish = Some(Box::new(move |stage: &mut Stage| finish_edit(stage, layer, &state)));
    tracing::debug!("Editing {:?}", layer);
    Ok(teardown)
}

// --- cursor -----------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorOptions {
    pub enter: CursorIcon,
    pub down: CursorIcon,
    pub up: CursorIcon,
    pub leave: CursorIcon,
}

impl Default for CursorOptions {
    fn default() -> Self {
        Self {
            enter: CursorIcon::Grab,
            down: CursorIcon::Grabbing,
            up: CursorIcon::Grab,
            leave: CursorIcon::Default,
        }
    }
}

/// Switches the stage cursor as the pointer enters, presses, releases and
/// leaves `layer`.
pub fn set_cursor(stage: &mut Stage, layer: LayerId, options: CursorOptions) -> SceneResult<Teardown> {
    ensure_interactive(stage)?;
    let mut teardown = Teardown::default();
    let mappings = [
        (LayerEventKind::PointerEnter, options.enter),
        (LayerEventKind::PointerDown, options.down),
        (LayerEventKind::PointerUp, options.up),
        (LayerEventKind::PointerLeave, options.leave),
    ];
    for (kind, icon) in mappings {
        let cursor: Rc<Cell<CursorIcon>> = stage.cursor_handle();
        let id = stage
            .scene_mut()
            .on(layer, kind, move |_, _| cursor.set(icon))?;
        teardown.layer_listeners.push((layer, id));
    }
    Ok(teardown)
}
