//! Mouse and touch to pointer events
//!
//! Controls:
//! - Left mouse button: grab / release
//! - First touch: grab, drag, release
//! - Cursor leaving the window: release

use bounce2d_math::Vec2;
use winit::event::{ElementState, MouseButton, TouchPhase};

/// A device-independent pointer event in window pixel coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    Down(Vec2),
    Move(Vec2),
    Up,
    /// The pointer left the window or the touch was cancelled
    Leave,
}

/// Tracks cursor position and the active touch
///
/// Mouse buttons carry no position in winit, so the last cursor position is
/// remembered and used for [`PointerEvent::Down`]. Only the first finger
/// drives touch drags; other fingers are ignored until it lifts.
#[derive(Clone, Debug, Default)]
pub struct PointerTracker {
    cursor: Option<Vec2>,
    mouse_pressed: bool,
    touch_id: Option<u64>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last known cursor position
    pub fn cursor(&self) -> Option<Vec2> {
        self.cursor
    }

    /// True while the mouse button or a finger is down
    pub fn is_pressed(&self) -> bool {
        self.mouse_pressed || self.touch_id.is_some()
    }

    /// Process cursor movement
    pub fn process_cursor_moved(&mut self, x: f64, y: f64) -> Option<PointerEvent> {
        let position = Vec2::new(x as f32, y as f32);
        self.cursor = Some(position);
        Some(PointerEvent::Move(position))
    }

    /// Process the cursor leaving the window
    pub fn process_cursor_left(&mut self) -> Option<PointerEvent> {
        self.cursor = None;
        self.mouse_pressed = false;
        Some(PointerEvent::Leave)
    }

    /// Process mouse button input
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) -> Option<PointerEvent> {
        if button != MouseButton::Left || self.touch_id.is_some() {
            return None;
        }

        match state {
            ElementState::Pressed => {
                self.mouse_pressed = true;
                self.cursor.map(PointerEvent::Down)
            }
            ElementState::Released => {
                let was_pressed = std::mem::replace(&mut self.mouse_pressed, false);
                was_pressed.then_some(PointerEvent::Up)
            }
        }
    }

    /// Process a touch update
    pub fn process_touch(&mut self, id: u64, phase: TouchPhase, x: f64, y: f64) -> Option<PointerEvent> {
        let position = Vec2::new(x as f32, y as f32);

        match phase {
            TouchPhase::Started => {
                if self.touch_id.is_some() || self.mouse_pressed {
                    return None;
                }
                self.touch_id = Some(id);
                Some(PointerEvent::Down(position))
            }
            _ if self.touch_id != Some(id) => None,
            TouchPhase::Moved => Some(PointerEvent::Move(position)),
            TouchPhase::Ended => {
                self.touch_id = None;
                Some(PointerEvent::Up)
            }
            TouchPhase::Cancelled => {
                self.touch_id = None;
                Some(PointerEvent::Leave)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_uses_last_cursor_position() {
        let mut tracker = PointerTracker::new();
        tracker.process_cursor_moved(12.0, 34.0);

        let event = tracker.process_mouse_button(MouseButton::Left, ElementState::Pressed);

        assert_eq!(event, Some(PointerEvent::Down(Vec2::new(12.0, 34.0))));
        assert!(tracker.is_pressed());
    }

    #[test]
    fn test_press_without_cursor_is_ignored() {
        let mut tracker = PointerTracker::new();
        assert_eq!(tracker.process_mouse_button(MouseButton::Left, ElementState::Pressed), None);
    }

    #[test]
    fn test_release_only_after_press() {
        let mut tracker = PointerTracker::new();
        tracker.process_cursor_moved(1.0, 1.0);
        assert_eq!(tracker.process_mouse_button(MouseButton::Left, ElementState::Released), None);

        tracker.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        assert_eq!(
            tracker.process_mouse_button(MouseButton::Left, ElementState::Released),
            Some(PointerEvent::Up)
        );
        assert!(!tracker.is_pressed());
    }

    #[test]
    fn test_other_buttons_ignored() {
        let mut tracker = PointerTracker::new();
        tracker.process_cursor_moved(1.0, 1.0);
        assert_eq!(tracker.process_mouse_button(MouseButton::Right, ElementState::Pressed), None);
    }

    #[test]
    fn test_cursor_left_releases() {
        let mut tracker = PointerTracker::new();
        tracker.process_cursor_moved(1.0, 1.0);
        tracker.process_mouse_button(MouseButton::Left, ElementState::Pressed);

        assert_eq!(tracker.process_cursor_left(), Some(PointerEvent::Leave));
        assert!(!tracker.is_pressed());
        assert!(tracker.cursor().is_none());
    }

    #[test]
    fn test_touch_drag_follows_first_finger() {
        let mut tracker = PointerTracker::new();

        assert_eq!(
            tracker.process_touch(1, TouchPhase::Started, 5.0, 5.0),
            Some(PointerEvent::Down(Vec2::new(5.0, 5.0)))
        );
        assert_eq!(tracker.process_touch(2, TouchPhase::Started, 50.0, 50.0), None);
        assert_eq!(tracker.process_touch(2, TouchPhase::Moved, 60.0, 60.0), None);
        assert_eq!(
            tracker.process_touch(1, TouchPhase::Moved, 8.0, 9.0),
            Some(PointerEvent::Move(Vec2::new(8.0, 9.0)))
        );
        assert_eq!(tracker.process_touch(1, TouchPhase::Ended, 8.0, 9.0), Some(PointerEvent::Up));
        assert!(!tracker.is_pressed());
    }

    #[test]
    fn test_touch_cancel_is_leave() {
        let mut tracker = PointerTracker::new();
        tracker.process_touch(3, TouchPhase::Started, 0.0, 0.0);
        assert_eq!(tracker.process_touch(3, TouchPhase::Cancelled, 0.0, 0.0), Some(PointerEvent::Leave));
    }
}
