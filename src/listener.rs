//! Input listeners.
//!
//! Four input categories can each carry one callback. The window event
//! handler calls the fixed trampolines on [`Listeners`] (`on_pointer_move`,
//! `on_scroll`, `on_button`, `on_key`), which forward to whatever callback is
//! registered for that category and drop the event otherwise.
//!
//! Callbacks are closures, so whatever context they need is captured instead
//! of being passed around as an opaque pointer.

use std::fmt::Debug;

use winit::{
    event::{ElementState, MouseButton},
    keyboard::{ModifiersState, PhysicalKey},
};

/// A mouse button press or release.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ButtonInput {
    pub button: MouseButton,
    pub state: ElementState,
    pub modifiers: ModifiersState,
}

/// A key press, repeat or release.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyInput {
    pub key: PhysicalKey,
    pub state: ElementState,
    pub repeat: bool,
    pub modifiers: ModifiersState,
}

pub type PointerCallback = Box<dyn FnMut(f64, f64)>;
pub type ScrollCallback = Box<dyn FnMut(f64, f64)>;
pub type ButtonCallback = Box<dyn FnMut(ButtonInput)>;
pub type KeyCallback = Box<dyn FnMut(KeyInput)>;

/// A callback together with the input category it listens to.
pub enum Listener {
    /// Cursor position in physical pixels (or the virtual position while the
    /// cursor is captured).
    PointerMove(PointerCallback),
    /// Horizontal and vertical scroll offset in lines.
    Scroll(ScrollCallback),
    Button(ButtonCallback),
    Key(KeyCallback),
}

impl Listener {
    pub fn pointer_move(f: impl FnMut(f64, f64) + 'static) -> Self {
        Self::PointerMove(Box::new(f))
    }

    pub fn scroll(f: impl FnMut(f64, f64) + 'static) -> Self {
        Self::Scroll(Box::new(f))
    }

    pub fn button(f: impl FnMut(ButtonInput) + 'static) -> Self {
        Self::Button(Box::new(f))
    }

    pub fn key(f: impl FnMut(KeyInput) + 'static) -> Self {
        Self::Key(Box::new(f))
    }

    pub fn kind(&self) -> ListenerKind {
        match self {
            Listener::PointerMove(_) => ListenerKind::PointerMove,
            Listener::Scroll(_) => ListenerKind::Scroll,
            Listener::Button(_) => ListenerKind::Button,
            Listener::Key(_) => ListenerKind::Key,
        }
    }
}

impl Debug for Listener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Listener::{:?}(..)", self.kind())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    PointerMove,
    Scroll,
    Button,
    Key,
}

/// Single-slot listener table.
#[derive(Default)]
pub struct Listeners {
    pointer_move: Option<PointerCallback>,
    scroll: Option<ScrollCallback>,
    button: Option<ButtonCallback>,
    key: Option<KeyCallback>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener`, returning the callback it replaced, if any.
    pub fn add(&mut self, listener: Listener) -> Option<Listener> {
        let kind = listener.kind();
        let replaced = match listener {
            Listener::PointerMove(f) => self.pointer_move.replace(f).map(Listener::PointerMove),
            Listener::Scroll(f) => self.scroll.replace(f).map(Listener::Scroll),
            Listener::Button(f) => self.button.replace(f).map(Listener::Button),
            Listener::Key(f) => self.key.replace(f).map(Listener::Key),
        };
        if replaced.is_some() {
            log::debug!("replaced {:?} listener", kind);
        } else {
            log::debug!("registered {:?} listener", kind);
        }
        replaced
    }

    /// Unregister the callback for `kind`. Removing an empty slot is a no-op.
    pub fn remove(&mut self, kind: ListenerKind) -> Option<Listener> {
        let removed = match kind {
            ListenerKind::PointerMove => self.pointer_move.take().map(Listener::PointerMove),
            ListenerKind::Scroll => self.scroll.take().map(Listener::Scroll),
            ListenerKind::Button => self.button.take().map(Listener::Button),
            ListenerKind::Key => self.key.take().map(Listener::Key),
        };
        if removed.is_some() {
            log::debug!("removed {:?} listener", kind);
        }
        removed
    }

    pub fn contains(&self, kind: ListenerKind) -> bool {
        match kind {
            ListenerKind::PointerMove => self.pointer_move.is_some(),
            ListenerKind::Scroll => self.scroll.is_some(),
            ListenerKind::Button => self.button.is_some(),
            ListenerKind::Key => self.key.is_some(),
        }
    }

    pub fn on_pointer_move(&mut self, x: f64, y: f64) {
        if let Some(f) = self.pointer_move.as_mut() {
            f(x, y);
        }
    }

    pub fn on_scroll(&mut self, dx: f64, dy: f64) {
        if let Some(f) = self.scroll.as_mut() {
            f(dx, dy);
        }
    }

    pub fn on_button(&mut self, input: ButtonInput) {
        if let Some(f) = self.button.as_mut() {
            f(input);
        }
    }

    pub fn on_key(&mut self, input: KeyInput) {
        if let Some(f) = self.key.as_mut() {
            f(input);
        }
    }
}

impl Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("pointer_move", &self.pointer_move.is_some())
            .field("scroll", &self.scroll.is_some())
            .field("button", &self.button.is_some())
            .field("key", &self.key.is_some())
            .finish()
    }
}
