//! Collision shapes for 2D physics
//!
//! These are lightweight primitives used for collision detection.

use bounce2d_math::Vec2;

/// A circle defined by center and radius
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    /// Create a new circle at the given center with the given radius
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Area of the circle
    pub fn area(&self) -> f32 {
        std::f32::consts::PI * self.radius * self.radius
    }
}

/// A 2D axis-aligned bounding box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb2D {
    /// Minimum corner
    pub min: Vec2,
    /// Maximum corner
    pub max: Vec2,
}

impl Aabb2D {
    /// Create a new AABB from min and max corners
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Create an AABB centered at a position with given half-extents
    pub fn from_center_half_extents(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Area of the box
    pub fn area(&self) -> f32 {
        let size = self.max - self.min;
        size.x * size.y
    }

    /// Get the closest point inside or on the AABB to a given point
    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        point.clamp_components(self.min, self.max)
    }

    /// Translate the AABB by a delta
    pub fn translated(&self, delta: Vec2) -> Self {
        Self {
            min: self.min + delta,
            max: self.max + delta,
        }
    }
}

/// A collider attached to a rigid body (stored in world coordinates)
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Collider {
    Circle(Circle),
    Aabb(Aabb2D),
}

impl Collider {
    /// Center of the collider
    pub fn center(&self) -> Vec2 {
        match self {
            Collider::Circle(c) => c.center,
            Collider::Aabb(b) => b.center(),
        }
    }

    /// Area of the collider
    pub fn area(&self) -> f32 {
        match self {
            Collider::Circle(c) => c.area(),
            Collider::Aabb(b) => b.area(),
        }
    }

    /// Return a copy moved by `delta`
    pub fn translated(&self, delta: Vec2) -> Self {
        match self {
            Collider::Circle(c) => Collider::Circle(Circle::new(c.center + delta, c.radius)),
            Collider::Aabb(b) => Collider::Aabb(b.translated(delta)),
        }
    }
}
