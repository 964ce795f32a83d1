//! Rigid body types for 2D physics simulation

use crate::collision::CollisionFilter;
use crate::material::PhysicsMaterial;
use crate::shapes::{Aabb2D, Circle, Collider};
use bounce2d_math::Vec2;
use slotmap::new_key_type;

// Define generational key type for rigid bodies
new_key_type! {
    /// Key to a rigid body in the physics world
    ///
    /// Uses generational indexing: once a body is removed, old keys return
    /// None instead of pointing at whatever reuses the slot.
    pub struct BodyKey;
}

/// How a body participates in the simulation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BodyType {
    /// Moved by gravity, velocity and collisions
    #[default]
    Dynamic,
    /// Never moves; other bodies collide against it
    Static,
}

/// A 2D rigid body with position, velocity, and collision shape
#[derive(Clone, Debug)]
pub struct RigidBody2D {
    /// Position of the body's center (world coordinates)
    pub position: Vec2,
    /// Velocity (units per second)
    pub velocity: Vec2,
    /// Mass of the body (used to split collision corrections)
    pub mass: f32,
    /// Surface and damping properties
    pub material: PhysicsMaterial,
    /// The collision shape for this body (stores absolute world position)
    pub collider: Collider,
    /// Dynamic or static
    pub body_type: BodyType,
    /// Which bodies this one collides with
    pub filter: CollisionFilter,
}

impl RigidBody2D {
    /// Create a new dynamic body with a circle collider
    pub fn new_circle(position: Vec2, radius: f32) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            mass: 1.0,
            material: PhysicsMaterial::default(),
            collider: Collider::Circle(Circle::new(position, radius)),
            body_type: BodyType::Dynamic,
            filter: CollisionFilter::ball(),
        }
    }

    /// Create a static axis-aligned box
    pub fn new_static_aabb(position: Vec2, half_extents: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            mass: 1.0,
            material: PhysicsMaterial::WALL,
            collider: Collider::Aabb(Aabb2D::from_center_half_extents(position, half_extents)),
            body_type: BodyType::Static,
            filter: CollisionFilter::wall(),
        }
    }

    /// Set the velocity of this body
    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    /// Derive the mass from the collider area
    pub fn with_density(mut self, density: f32) -> Self {
        self.mass = density * self.collider.area();
        self
    }

    /// Set the material of this body
    pub fn with_material(mut self, material: PhysicsMaterial) -> Self {
        self.material = material;
        self
    }

    /// Check if this body is static
    pub fn is_static(&self) -> bool {
        self.body_type == BodyType::Static
    }

    /// Radius of the collider, if it is a circle
    pub fn radius(&self) -> Option<f32> {
        match self.collider {
            Collider::Circle(c) => Some(c.radius),
            Collider::Aabb(_) => None,
        }
    }

    /// Update the position and sync the collider
    pub fn set_position(&mut self, position: Vec2) {
        let delta = position - self.position;
        self.position = position;
        self.collider = self.collider.translated(delta);
    }

    /// Apply a positional correction (e.g., from collision resolution)
    pub fn apply_correction(&mut self, correction: Vec2) {
        self.position += correction;
        self.collider = self.collider.translated(correction);
    }
}
