//! Physical material properties for collision response

/// Surface and damping properties of a body
///
/// Friction and restitution act at contacts; air friction damps the
/// velocity of a free body once per step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhysicsMaterial {
    /// Tangential impulse limit as a fraction of the normal impulse
    pub friction: f32,
    /// Share of the approach speed returned on impact
    pub restitution: f32,
    /// Fraction of velocity lost per step while moving freely
    pub air_friction: f32,
}

impl Default for PhysicsMaterial {
    fn default() -> Self {
        Self {
            friction: 0.1,
            restitution: 0.0,
            air_friction: 0.01,
        }
    }
}

impl PhysicsMaterial {
    /// Ball material used for loaded entities: slight friction, bouncy
    pub const BALL: Self = Self {
        friction: 0.1,
        restitution: 0.7,
        air_friction: 0.01,
    };

    /// Wall material: restitution matches the balls so bounces decay the same way
    pub const WALL: Self = Self {
        friction: 0.1,
        restitution: 0.7,
        air_friction: 0.0,
    };

    /// Material without air friction; both values end up in [0, 1]
    pub fn new(friction: f32, restitution: f32) -> Self {
        Self {
            friction: friction.clamp(0.0, 1.0),
            restitution: restitution.clamp(0.0, 1.0),
            air_friction: 0.0,
        }
    }

    /// Set the air friction, clamped to [0.0, 1.0]
    pub fn with_air_friction(mut self, air_friction: f32) -> Self {
        self.air_friction = air_friction.clamp(0.0, 1.0);
        self
    }

    /// Material used for a contact between `self` and `other`
    ///
    /// Friction is the geometric mean; restitution and air friction take
    /// the larger value.
    pub fn combine(&self, other: &Self) -> Self {
        Self {
            friction: (self.friction * other.friction).sqrt(),
            restitution: self.restitution.max(other.restitution),
            air_friction: self.air_friction.max(other.air_friction),
        }
    }
}
