//! Input mapping from raw events to semantic actions
//!
//! Keys map to app-level [`InputAction`]s. Pointer events from
//! [`PointerTracker`](bounce2d_input::PointerTracker) map to simulation
//! [`InputEvent`]s.

use bounce2d_core::InputEvent;
use bounce2d_input::PointerEvent;
use winit::event::ElementState;
use winit::keyboard::KeyCode;

/// Actions triggered by the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Load the current file again (R key)
    Reload,
    /// Switch to the next dynamics strategy (Tab key)
    CycleDynamics,
    /// Exit application (Escape key)
    Exit,
}

/// Maps raw input events to semantic actions
pub struct InputMapper;

impl InputMapper {
    /// Map keyboard input to an action
    ///
    /// Returns `None` for releases, auto-repeats of a held key and unbound
    /// keys, so holding Tab switches the strategy once.
    pub fn map_keyboard(key: KeyCode, state: ElementState, repeat: bool) -> Option<InputAction> {
        if state != ElementState::Pressed || repeat {
            return None;
        }

        match key {
            KeyCode::KeyR => Some(InputAction::Reload),
            KeyCode::Tab => Some(InputAction::CycleDynamics),
            KeyCode::Escape => Some(InputAction::Exit),
            _ => None,
        }
    }

    /// Map a pointer event to the simulation event it triggers
    pub fn map_pointer(event: PointerEvent) -> InputEvent {
        match event {
            PointerEvent::Down(point) => InputEvent::PointerDown(point),
            PointerEvent::Move(point) => InputEvent::PointerMove(point),
            PointerEvent::Up => InputEvent::PointerUp,
            PointerEvent::Leave => InputEvent::PointerLeave,
        }
    }
}
