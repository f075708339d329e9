//! Window event handling while the renderer pumps the winit event loop.
//!
//! [`WindowState`] survives between polls; [`EventHandler`] borrows it
//! together with the listener table for the duration of one pump.

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{DeviceEvent, DeviceId, KeyEvent, MouseScrollDelta, WindowEvent},
    event_loop::ActiveEventLoop,
    keyboard::ModifiersState,
    window::{Window, WindowAttributes, WindowId},
};

use crate::listener::{ButtonInput, KeyInput, Listeners};

/// Pixel scroll deltas (touchpads) are reported in lines of this height.
pub const PIXELS_PER_LINE: f64 = 20.0;

#[derive(Debug)]
pub struct WindowState {
    attributes: WindowAttributes,
    pub window: Option<Arc<Window>>,
    /// Set if the platform refused to create the window.
    pub creation_error: Option<winit::error::OsError>,
    pub open: bool,
    /// Latest size reported since the last draw.
    pub resized: Option<PhysicalSize<u32>>,
    pub modifiers: ModifiersState,
    pub cursor_captured: bool,
    /// Last pointer position handed to the listener.
    pub cursor: (f64, f64),
}

impl WindowState {
    pub fn new(attributes: WindowAttributes) -> Self {
        Self {
            attributes,
            window: None,
            creation_error: None,
            open: true,
            resized: None,
            modifiers: ModifiersState::empty(),
            cursor_captured: false,
            cursor: (0.0, 0.0),
        }
    }
}

pub struct EventHandler<'a> {
    pub state: &'a mut WindowState,
    pub listeners: &'a mut Listeners,
}

impl ApplicationHandler for EventHandler<'_> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.window.is_some() {
            return;
        }
        match event_loop.create_window(self.state.attributes.clone()) {
            Ok(window) => {
                log::info!("window created: {:?}", window.inner_size());
                self.state.window = Some(Arc::new(window));
            }
            Err(e) => {
                log::error!("cannot create window: {}", e);
                self.state.creation_error = Some(e);
            }
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let state = &mut *self.state;
        match event {
            WindowEvent::CloseRequested => {
                log::info!("close requested");
                state.open = false;
            }
            WindowEvent::Resized(size) => state.resized = Some(size),
            WindowEvent::ModifiersChanged(modifiers) => state.modifiers = modifiers.state(),
            WindowEvent::CursorMoved { position, .. } => {
                // while captured the position comes from raw motion instead
                if !state.cursor_captured {
                    state.cursor = (position.x, position.y);
                    self.listeners.on_pointer_move(position.x, position.y);
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let (dx, dy) = scroll_lines(delta);
                self.listeners.on_scroll(dx, dy);
            }
            WindowEvent::MouseInput {
                state: button_state,
                button,
                ..
            } => self.listeners.on_button(ButtonInput {
                button,
                state: button_state,
                modifiers: state.modifiers,
            }),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key,
                        state: key_state,
                        repeat,
                        ..
                    },
                ..
            } => self.listeners.on_key(KeyInput {
                key: physical_key,
                state: key_state,
                repeat,
                modifiers: state.modifiers,
            }),
            _ => {}
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _id: DeviceId, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.state.cursor_captured {
                let (x, y) = self.state.cursor;
                self.state.cursor = (x + delta.0, y + delta.1);
                self.listeners.on_pointer_move(self.state.cursor.0, self.state.cursor.1);
            }
        }
    }
}

/// Scroll offset in lines.
pub fn scroll_lines(delta: MouseScrollDelta) -> (f64, f64) {
    match delta {
        MouseScrollDelta::LineDelta(x, y) => (x as f64, y as f64),
        MouseScrollDelta::PixelDelta(p) => (p.x / PIXELS_PER_LINE, p.y / PIXELS_PER_LINE),
    }
}
