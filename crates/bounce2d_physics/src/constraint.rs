//! Pointer-driven drag constraint

use bounce2d_math::Vec2;

use crate::body::{BodyKey, RigidBody2D};

/// Binds one body to the pointer while a drag is in progress
///
/// The body is pulled toward `pointer - offset`, where `offset` is the
/// pointer position relative to the body center at grab time. A stiffness
/// of 1.0 pins the body exactly; lower values make it follow like a spring.
/// The constrained body skips gravity and integration, and collisions treat
/// it as immovable.
#[derive(Clone, Debug)]
pub struct MouseConstraint {
    body: Option<BodyKey>,
    offset: Vec2,
    pointer: Vec2,
    /// Fraction of the remaining distance covered each step (0.0-1.0)
    pub stiffness: f32,
}

impl Default for MouseConstraint {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl MouseConstraint {
    /// Create a detached constraint with the given stiffness
    pub fn new(stiffness: f32) -> Self {
        Self {
            body: None,
            offset: Vec2::ZERO,
            pointer: Vec2::ZERO,
            stiffness: stiffness.clamp(0.0, 1.0),
        }
    }

    /// Attach a body; `offset` is `pointer - body.position` at grab time
    pub fn attach(&mut self, body: BodyKey, offset: Vec2, pointer: Vec2) {
        self.body = Some(body);
        self.offset = offset;
        self.pointer = pointer;
    }

    /// Move the pointer end of the constraint
    pub fn set_pointer(&mut self, pointer: Vec2) {
        self.pointer = pointer;
    }

    /// Release the held body, returning its key
    pub fn detach(&mut self) -> Option<BodyKey> {
        self.body.take()
    }

    /// The currently held body
    pub fn body(&self) -> Option<BodyKey> {
        self.body
    }

    /// Where the held body's center should end up
    pub fn target(&self) -> Vec2 {
        self.pointer - self.offset
    }

    /// Move `body` toward the target and give it the matching velocity
    ///
    /// Setting the velocity lets a released body keep the throw.
    pub(crate) fn solve(&self, body: &mut RigidBody2D, dt: f32) {
        let displacement = (self.target() - body.position) * self.stiffness;
        body.apply_correction(displacement);
        body.velocity = if dt > 0.0 { displacement / dt } else { Vec2::ZERO };
    }
}
