//! Drawable area dimensions

use serde::{Deserialize, Serialize};

/// Size of the drawing surface in pixels
///
/// The origin is the top-left corner and y grows downward, so the floor the
/// gravity strategy bounces on is the line `y = height`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// The y coordinate of the floor
    #[inline]
    pub fn floor_y(&self) -> f32 {
        self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_is_bottom_edge() {
        assert_eq!(Viewport::new(800.0, 600.0).floor_y(), 600.0);
    }
}
