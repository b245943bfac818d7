//! The stage: visible surface, identity surface and the input pipeline.
//!
//! The host owns the window. It forwards pointer, wheel and keyboard input in
//! logical coordinates, calls [`Stage::animation_frame`] while
//! [`Stage::is_looping`] is true, presents [`Stage::surface`] and applies
//! [`Stage::cursor`].

mod export;
pub mod input;

pub use export::ExportOptions;

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

use inkframe_core::{Point, Result, SceneError, SceneResult, StageConfig};
use tiny_skia::{Color, Pixmap, Transform};

use crate::events::{
    LayerEvent, LayerEventKind, ListenerId, LoopHandler, StageEvent, StageEventKind, StageHandler,
};
use crate::identity::IdentityCodec;
use crate::layer::{LayerBuilder, LayerId, ROOT_TAG};
use crate::render::{render_layer, Pass, RenderContext};
use crate::scene::Scene;
use input::{CursorIcon, Key, TextInput};

struct StageListener {
    id: ListenerId,
    kind: StageEventKind,
    handler: StageHandler,
}

fn allocate(width: u32, height: u32) -> SceneResult<Pixmap> {
    Pixmap::new(width, height).ok_or(SceneError::InvalidSurface { width, height })
}

pub struct Stage {
    config: StageConfig,
    scene: Scene,
    root: LayerId,
    surface: Pixmap,
    identity_surface: Option<Pixmap>,
    listeners: Vec<StageListener>,
    loops: Vec<(ListenerId, LoopHandler)>,
    next_listener: u64,
    looping: bool,
    epoch: Instant,
    caret_interval: Duration,
    down_position: Option<Point>,
    hovered: Option<LayerId>,
    cursor: Rc<Cell<CursorIcon>>,
    text_input: TextInput,
    needs_render: Rc<Cell<bool>>,
}

impl std::fmt::Debug for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stage")
            .field("config", &self.config)
            .field("scene", &self.scene)
            .field("listeners", &self.listeners.len())
            .field("loops", &self.loops.len())
            .field("looping", &self.looping)
            .finish()
    }
}

impl Stage {
    pub fn new(config: StageConfig) -> Result<Self> {
        config.validate()?;
        let (device_width, device_height) = config.device_size();
        let surface = allocate(device_width, device_height)?;
        let identity_surface = if config.interactive {
            Some(allocate(config.width, config.height)?)
        } else {
            None
        };

        let codec = if config.debug {
            IdentityCodec::debug()
        } else {
            IdentityCodec::default()
        };
        let mut scene = Scene::new(codec);
        let root = scene.insert(
            LayerBuilder::frame(0.0, 0.0, config.width as f32, config.height as f32).tag(ROOT_TAG),
        )?;

        let needs_render = Rc::new(Cell::new(false));
        scene.on(root, LayerEventKind::Error, |_, event| {
            tracing::error!(
                "Layer {:?} failed: {}",
                event.target,
                event.error.as_deref().unwrap_or("unknown error")
            );
        })?;
        let flag = Rc::clone(&needs_render);
        scene.on(root, LayerEventKind::Redraw, move |_, _| flag.set(true))?;

        tracing::debug!(
            "Created {}x{} stage (ratio {}, interactive {})",
            config.width,
            config.height,
            config.pixel_ratio,
            config.interactive
        );

        Ok(Self {
            config,
            scene,
            root,
            surface,
            identity_surface,
            listeners: Vec::new(),
            loops: Vec::new(),
            next_listener: 0,
            looping: false,
            epoch: Instant::now(),
            caret_interval: Duration::from_millis(500),
            down_position: None,
            hovered: None,
            cursor: Rc::new(Cell::new(CursorIcon::Default)),
            text_input: TextInput::default(),
            needs_render,
        })
    }

    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Full-stage frame tagged `root`.
    pub fn root(&self) -> LayerId {
        self.root
    }

    /// Inserts a layer and attaches it on top of the root frame.
    pub fn add(&mut self, builder: LayerBuilder) -> SceneResult<LayerId> {
        let id = self.scene.insert(builder)?;
        self.scene.add_child(self.root, id)?;
        Ok(id)
    }

    /// Visible surface in device pixels.
    pub fn surface(&self) -> &Pixmap {
        &self.surface
    }

    /// Identity surface in logical pixels, when interactive.
    pub fn identity_surface(&self) -> Option<&Pixmap> {
        self.identity_surface.as_ref()
    }

    pub fn is_interactive(&self) -> bool {
        self.identity_surface.is_some()
    }

    pub fn caret_interval(&self) -> Duration {
        self.caret_interval
    }

    pub fn set_caret_interval(&mut self, interval: Duration) {
        self.caret_interval = interval;
    }

    /// Reallocates both surfaces and resizes the root frame.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        let config = StageConfig {
            width,
            height,
            ..self.config.clone()
        };
        config.validate()?;
        let (device_width, device_height) = config.device_size();
        self.surface = allocate(device_width, device_height)?;
        if self.identity_surface.is_some() {
            self.identity_surface = Some(allocate(width, height)?);
        }
        self.scene
            .set_size(self.root, width as f32, height as f32)?;
        self.config = config;
        self.needs_render.set(true);
        Ok(())
    }

    // --- rendering ------------------------------------------------------

    pub fn render(&mut self) {
        self.render_at(Instant::now());
    }

    /// Repaints both surfaces. `now` drives time-based effects such as the
    /// caret blink.
    pub fn render_at(&mut self, now: Instant) {
        self.scene.poll_images();
        self.scene.prepare();

        if self.config.transparent {
            self.surface.fill(Color::TRANSPARENT);
        } else {
            let bg = self.config.background;
            self.surface.fill(Color::from_rgba8(bg.r, bg.g, bg.b, bg.a));
        }
        let ratio = self.config.pixel_ratio;
        let elapsed = now.saturating_duration_since(self.epoch);
        let mut ctx = RenderContext::new(
            &mut self.surface,
            Pass::Visible,
            Transform::from_scale(ratio, ratio),
        )
        .with_clock(elapsed, self.caret_interval)
        .with_debug(self.config.debug);
        render_layer(&self.scene, self.root, &mut ctx);

        if let Some(identity) = self.identity_surface.as_mut() {
            identity.fill(Color::TRANSPARENT);
            let mut ctx = RenderContext::new(identity, Pass::Identity, Transform::identity());
            render_layer(&self.scene, self.root, &mut ctx);
        }
        self.needs_render.set(false);
    }

    pub fn request_render(&self) {
        self.needs_render.set(true);
    }

    pub fn needs_render(&self) -> bool {
        self.needs_render.get()
    }

    /// Delivers finished image loads and renders if anything asked for it.
    /// Returns whether a render happened.
    pub fn update(&mut self) -> bool {
        self.scene.poll_images();
        if self.needs_render.get() {
            self.render();
            return true;
        }
        false
    }

    // --- hit testing ----------------------------------------------------

    /// Raw identity value under a logical position, if any pixel was painted.
    pub fn identity_at(&self, x: f32, y: f32) -> Option<u32> {
        let surface = self.identity_surface.as_ref()?;
        if !(x >= 0.0 && y >= 0.0) {
            return None;
        }
        let pixel = surface.pixel(x.floor() as u32, y.floor() as u32)?;
        if pixel.alpha() == 0 {
            return None;
        }
        Some((pixel.red() as u32) << 16 | (pixel.green() as u32) << 8 | pixel.blue() as u32)
    }

    /// Layer painted under a logical position on the last render.
    pub fn hit_test(&self, x: f32, y: f32) -> Option<LayerId> {
        self.identity_at(x, y)
            .and_then(|value| self.scene.lookup_identity(value))
    }

    // --- pointer --------------------------------------------------------

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.pointer(StageEventKind::PointerDown, Point::new(x, y), 0.0);
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.pointer(StageEventKind::PointerMove, Point::new(x, y), 0.0);
    }

    pub fn pointer_up(&mut self, x: f32, y: f32) {
        self.pointer(StageEventKind::PointerUp, Point::new(x, y), 0.0);
    }

    /// Negative `delta` scrolls up.
    pub fn wheel(&mut self, x: f32, y: f32, delta: f32) {
        self.pointer(StageEventKind::Wheel, Point::new(x, y), delta);
    }

    /// The pointer left the stage.
    pub fn pointer_leave(&mut self, x: f32, y: f32) {
        self.update_hover(None, Point::new(x, y));
    }

    fn pointer(&mut self, kind: StageEventKind, position: Point, delta: f32) {
        if kind == StageEventKind::PointerDown {
            self.down_position = Some(position);
        }
        let target = self.hit_test(position.x, position.y);
        tracing::trace!("{:?} at {:?} -> {:?}", kind, position, target);
        if kind == StageEventKind::PointerMove {
            self.update_hover(target, position);
        }

        if let (Some(target), Some(layer_kind)) = (target, kind.layer_kind()) {
            let mut event = LayerEvent::pointer(layer_kind, target, position, self.down_position)
                .with_delta(delta);
            self.scene.dispatch(target, &mut event);
        }
        let mut event = StageEvent::pointer(kind, position, self.down_position, target);
        event.delta = delta;
        self.emit(&event);

        if kind == StageEventKind::PointerUp {
            self.down_position = None;
        }
    }

    fn update_hover(&mut self, target: Option<LayerId>, position: Point) {
        if self.hovered == target {
            return;
        }
        if let Some(previous) = self.hovered.take() {
            if self.scene.contains(previous) {
                let mut event = LayerEvent::pointer(
                    LayerEventKind::PointerLeave,
                    previous,
                    position,
                    self.down_position,
                );
                self.scene.dispatch(previous, &mut event);
            }
            self.emit(&StageEvent::pointer(
                StageEventKind::PointerLeave,
                position,
                self.down_position,
                Some(previous),
            ));
        }
        if let Some(next) = target {
            let mut event = LayerEvent::pointer(
                LayerEventKind::PointerEnter,
                next,
                position,
                self.down_position,
            );
            self.scene.dispatch(next, &mut event);
            self.emit(&StageEvent::pointer(
                StageEventKind::PointerEnter,
                position,
                self.down_position,
                Some(next),
            ));
        }
        self.hovered = target;
    }

    pub fn hovered(&self) -> Option<LayerId> {
        self.hovered
    }

    pub fn down_position(&self) -> Option<Point> {
        self.down_position
    }

    // --- keyboard -------------------------------------------------------

    pub fn text_input(&self) -> &TextInput {
        &self.text_input
    }

    pub fn focus_text_input(&mut self, value: &str) {
        self.text_input.focus(value);
    }

    pub fn blur_text_input(&mut self) {
        self.text_input.blur();
    }

    /// Appends typed text to the focused hidden input.
    pub fn type_text(&mut self, text: &str) {
        if !self.text_input.is_focused() {
            return;
        }
        self.text_input.insert(text);
        let value = self.text_input.value().to_string();
        self.emit(&StageEvent::input(value));
    }

    pub fn key_down(&mut self, key: Key) {
        let changed = self.text_input.is_focused()
            && match key {
                Key::Backspace => self.text_input.backspace(),
                Key::Enter => {
                    self.text_input.insert("\n");
                    true
                }
                _ => false,
            };
        self.emit(&StageEvent::key(key));
        if changed {
            let value = self.text_input.value().to_string();
            self.emit(&StageEvent::input(value));
        }
    }

    // --- cursor ---------------------------------------------------------

    pub fn cursor(&self) -> CursorIcon {
        self.cursor.get()
    }

    pub fn set_cursor(&self, icon: CursorIcon) {
        self.cursor.set(icon);
    }

    /// Shared cell layer listeners write the cursor into.
    pub fn cursor_handle(&self) -> Rc<Cell<CursorIcon>> {
        Rc::clone(&self.cursor)
    }

    // --- listeners ------------------------------------------------------

    pub fn on<F>(&mut self, kind: StageEventKind, handler: F) -> ListenerId
    where
        F: FnMut(&mut Stage, &StageEvent) + 'static,
    {
        let id = self.next_id();
        let handler: StageHandler = Rc::new(RefCell::new(handler));
        self.listeners.push(StageListener { id, kind, handler });
        id
    }

    pub fn off(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != id);
        before != self.listeners.len()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn next_id(&mut self) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        id
    }

    pub(crate) fn emit(&mut self, event: &StageEvent) {
        let handlers: Vec<StageHandler> = self
            .listeners
            .iter()
            .filter(|l| l.kind == event.kind)
            .map(|l| Rc::clone(&l.handler))
            .collect();
        for handler in handlers {
            match handler.try_borrow_mut() {
                Ok(mut handler) => (&mut *handler)(self, event),
                Err(_) => tracing::warn!("Skipping re-entrant {:?} stage listener", event.kind),
            }
        }
    }

    // --- animation loop -------------------------------------------------

    pub fn add_loop<F>(&mut self, callback: F) -> ListenerId
    where
        F: FnMut(&mut Stage) + 'static,
    {
        let id = self.next_id();
        let callback: LoopHandler = Rc::new(RefCell::new(callback));
        self.loops.push((id, callback));
        id
    }

    pub fn remove_loop(&mut self, id: ListenerId) -> bool {
        let before = self.loops.len();
        self.loops.retain(|(loop_id, _)| *loop_id != id);
        before != self.loops.len()
    }

    pub fn start_loop(&mut self) {
        if !self.looping {
            tracing::debug!("Animation loop started");
        }
        self.looping = true;
    }

    pub fn stop_loop(&mut self) {
        if self.looping {
            tracing::debug!("Animation loop stopped");
        }
        self.looping = false;
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// One tick of the loop: runs every loop callback, then renders.
    /// Returns whether the loop is still running.
    pub fn animation_frame(&mut self, now: Instant) -> bool {
        if !self.looping {
            return false;
        }
        let callbacks: Vec<LoopHandler> = self.loops.iter().map(|(_, cb)| Rc::clone(cb)).collect();
        for callback in callbacks {
            if let Ok(mut callback) = callback.try_borrow_mut() {
                (&mut *callback)(self);
            }
        }
        self.render_at(now);
        self.looping
    }

    /// Drops every stage listener and loop callback and stops the loop.
    /// Layer listeners stay with their layers.
    pub fn destroy(&mut self) {
        self.listeners.clear();
        self.loops.clear();
        self.looping = false;
        self.text_input.blur();
        self.hovered = None;
        self.down_position = None;
        tracing::debug!("Stage destroyed");
    }
}
