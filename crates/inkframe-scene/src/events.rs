//! Event payloads for layer-level (bubbling) and stage-level listeners.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use inkframe_core::Point;

use crate::layer::LayerId;
use crate::scene::Scene;
use crate::stage::input::Key;
use crate::stage::Stage;

/// Handle returned by every `on`/`add_loop` registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub(crate) u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Listener({})", self.0)
    }
}

/// Events a layer can receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerEventKind {
    PointerDown,
    PointerMove,
    PointerUp,
    PointerEnter,
    PointerLeave,
    Wheel,
    /// The layer's content changed asynchronously and needs a repaint
    Redraw,
    /// An asynchronous resource of the layer failed to load
    Error,
}

/// Bubbling event payload.
#[derive(Debug, Clone)]
pub struct LayerEvent {
    pub kind: LayerEventKind,
    /// Layer the event originated on
    pub target: LayerId,
    /// Layer whose listeners are currently running
    pub current_target: LayerId,
    /// Pointer position in stage coordinates
    pub position: Point,
    /// Position of the pointerdown that started the current gesture
    pub down_position: Option<Point>,
    /// Wheel delta, negative when scrolling up
    pub delta: f32,
    pub error: Option<String>,
    stopped: bool,
}

impl LayerEvent {
    pub fn pointer(
        kind: LayerEventKind,
        target: LayerId,
        position: Point,
        down_position: Option<Point>,
    ) -> Self {
        Self {
            kind,
            target,
            current_target: target,
            position,
            down_position,
            delta: 0.0,
            error: None,
            stopped: false,
        }
    }

    pub fn redraw(target: LayerId) -> Self {
        Self::pointer(LayerEventKind::Redraw, target, Point::ZERO, None)
    }

    pub fn error(target: LayerId, message: impl Into<String>) -> Self {
        let mut event = Self::pointer(LayerEventKind::Error, target, Point::ZERO, None);
        event.error = Some(message.into());
        event
    }

    pub fn with_delta(mut self, delta: f32) -> Self {
        self.delta = delta;
        self
    }

    /// Keeps ancestors above the current layer from seeing this event.
    pub fn stop_propagation(&mut self) {
        self.stopped = true;
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.stopped
    }
}

/// Events emitted on the stage itself. They never bubble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageEventKind {
    PointerDown,
    PointerMove,
    PointerUp,
    PointerEnter,
    PointerLeave,
    Wheel,
    /// The hidden text input changed
    Input,
    KeyDown,
}

impl StageEventKind {
    pub(crate) fn layer_kind(self) -> Option<LayerEventKind> {
        match self {
            Self::PointerDown => Some(LayerEventKind::PointerDown),
            Self::PointerMove => Some(LayerEventKind::PointerMove),
            Self::PointerUp => Some(LayerEventKind::PointerUp),
            Self::PointerEnter => Some(LayerEventKind::PointerEnter),
            Self::PointerLeave => Some(LayerEventKind::PointerLeave),
            Self::Wheel => Some(LayerEventKind::Wheel),
            Self::Input | Self::KeyDown => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StageEvent {
    pub kind: StageEventKind,
    pub position: Point,
    pub down_position: Option<Point>,
    /// Layer resolved from the identity surface, if any
    pub target: Option<LayerId>,
    pub delta: f32,
    /// Current value of the hidden text input for `Input`
    pub value: Option<String>,
    pub key: Option<Key>,
}

impl StageEvent {
    pub fn pointer(
        kind: StageEventKind,
        position: Point,
        down_position: Option<Point>,
        target: Option<LayerId>,
    ) -> Self {
        Self {
            kind,
            position,
            down_position,
            target,
            delta: 0.0,
            value: None,
            key: None,
        }
    }

    pub fn input(value: String) -> Self {
        Self {
            value: Some(value),
            ..Self::pointer(StageEventKind::Input, Point::ZERO, None, None)
        }
    }

    pub fn key(key: Key) -> Self {
        Self {
            key: Some(key),
            ..Self::pointer(StageEventKind::KeyDown, Point::ZERO, None, None)
        }
    }
}

pub type LayerHandler = Rc<RefCell<dyn FnMut(&mut Scene, &mut LayerEvent)>>;
pub type StageHandler = Rc<RefCell<dyn FnMut(&mut Stage, &StageEvent)>>;
pub type LoopHandler = Rc<RefCell<dyn FnMut(&mut Stage)>>;
