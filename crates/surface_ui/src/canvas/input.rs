//! Input events and their dispatch to a canvas
//!
//! Only mouse events reach the UI context. Keyboard and text input are not
//! forwarded yet.

use super::projection::transform_mouse_position;
use super::Canvas;
use crate::ecs::SceneHost;
use crate::ui::KeyModifiers;

/// Kind of device an event came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceType {
    /// Mouse
    Mouse,
    /// Keyboard
    Keyboard,
    /// Game controller
    Controller,
}

/// Payload of an input event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEventKind {
    /// Relative motion plus the resulting absolute position
    Axis {
        /// Relative X
        x: f32,
        /// Relative Y
        y: f32,
        /// Absolute X in screen pixels
        x_abs: i32,
        /// Absolute Y in screen pixels
        y_abs: i32,
    },
    /// Button or key state change
    Button {
        /// Button index or key code
        key_id: u32,
        /// Pressed
        down: bool,
    },
    /// Text entered
    TextInput(char),
    /// Device connected
    DeviceAdded,
    /// Device disconnected
    DeviceRemoved,
}

/// Event from the engine's input queue
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputEvent {
    /// Originating device
    pub device: DeviceType,
    /// Payload
    pub kind: InputEventKind,
}

impl InputEvent {
    /// Mouse moved to an absolute position
    pub fn mouse_move(x_abs: i32, y_abs: i32) -> Self {
        Self {
            device: DeviceType::Mouse,
            kind: InputEventKind::Axis {
                x: 0.0,
                y: 0.0,
                x_abs,
                y_abs,
            },
        }
    }

    /// Mouse button pressed or released
    pub fn mouse_button(button: u32, down: bool) -> Self {
        Self {
            device: DeviceType::Mouse,
            kind: InputEventKind::Button { key_id: button, down },
        }
    }
}

/// Forward one event to a canvas's context
pub fn dispatch(host: &dyn SceneHost, canvas: &mut Canvas, event: &InputEvent) {
    if event.device != DeviceType::Mouse {
        log::trace!("Ignoring {:?} input for canvas {}", event.device, canvas.entity());
        return;
    }

    match event.kind {
        InputEventKind::Axis { x_abs, y_abs, .. } => {
            let pos = transform_mouse_position(host, canvas, x_abs, y_abs);
            canvas.context.process_mouse_move(pos.x, pos.y, KeyModifiers::empty());
        }
        InputEventKind::Button { key_id, down: true } => {
            canvas.context.process_mouse_button_down(key_id, KeyModifiers::empty());
        }
        InputEventKind::Button { key_id, down: false } => {
            canvas.context.process_mouse_button_up(key_id, KeyModifiers::empty());
        }
        InputEventKind::TextInput(_) | InputEventKind::DeviceAdded | InputEventKind::DeviceRemoved => {}
    }
}
