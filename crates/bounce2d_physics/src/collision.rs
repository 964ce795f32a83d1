//! Collision detection for 2D shapes
//!
//! Provides collision detection between circles and AABBs.
//! Also provides collision filtering via layer masks.

use bitflags::bitflags;

use crate::shapes::{Aabb2D, Circle};
use bounce2d_math::Vec2;

bitflags! {
    /// Collision layers for filtering which objects can collide
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CollisionLayer: u32 {
        /// Dynamic balls loaded from a file
        const BALL = 1 << 0;
        /// Static boundary walls
        const WALL = 1 << 1;
        /// All layers (collide with everything)
        const ALL = 0xFFFFFFFF;
    }
}

/// Collision filter determining what an object collides with
///
/// Two objects A and B collide if:
/// - (A.layer & B.mask) != 0, AND
/// - (B.layer & A.mask) != 0
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollisionFilter {
    /// Which layer(s) this object belongs to
    pub layer: CollisionLayer,
    /// Which layer(s) this object can collide with
    pub mask: CollisionLayer,
}

impl Default for CollisionFilter {
    fn default() -> Self {
        Self::ball()
    }
}

impl CollisionFilter {
    /// Create a new collision filter with specified layer and mask
    pub fn new(layer: CollisionLayer, mask: CollisionLayer) -> Self {
        Self { layer, mask }
    }

    /// Check if this filter allows collision with another filter
    pub fn collides_with(&self, other: &Self) -> bool {
        self.layer.intersects(other.mask) && other.layer.intersects(self.mask)
    }

    /// Filter for balls: collide with everything
    pub fn ball() -> Self {
        Self {
            layer: CollisionLayer::BALL,
            mask: CollisionLayer::ALL,
        }
    }

    /// Filter for walls: collide with balls, never with other walls
    pub fn wall() -> Self {
        Self {
            layer: CollisionLayer::WALL,
            mask: CollisionLayer::BALL,
        }
    }
}

/// Contact information from a collision
#[derive(Clone, Copy, Debug)]
pub struct Contact {
    /// Point of contact
    pub point: Vec2,
    /// Contact normal (direction documented by each test function)
    pub normal: Vec2,
    /// Penetration depth (positive means overlapping)
    pub penetration: f32,
}

impl Contact {
    /// Create a new contact
    pub fn new(point: Vec2, normal: Vec2, penetration: f32) -> Self {
        Self {
            point,
            normal,
            penetration,
        }
    }

    /// Check if this represents an actual collision (positive penetration)
    pub fn is_colliding(&self) -> bool {
        self.penetration > 0.0
    }
}

/// Test circle vs circle collision
///
/// The contact normal points from `a` toward `b`. Coincident centers
/// produce no contact since no separating direction exists.
pub fn circle_vs_circle(a: &Circle, b: &Circle) -> Option<Contact> {
    let delta = b.center - a.center;
    let dist_sq = delta.length_squared();
    let min_dist = a.radius + b.radius;

    if dist_sq < min_dist * min_dist && dist_sq > 0.0001 {
        let dist = dist_sq.sqrt();
        let penetration = min_dist - dist;
        let normal = delta.normalized();
        let point = a.center + normal * a.radius;
        Some(Contact::new(point, normal, penetration))
    } else {
        None
    }
}

/// Test circle vs AABB collision
///
/// The contact normal points from the AABB toward the circle.
pub fn circle_vs_aabb(circle: &Circle, aabb: &Aabb2D) -> Option<Contact> {
    let closest = aabb.closest_point(circle.center);

    let delta = circle.center - closest;
    let dist_squared = delta.length_squared();

    if dist_squared < circle.radius * circle.radius {
        let dist = dist_squared.sqrt();

        if dist > 0.0001 {
            return Some(Contact::new(closest, delta.normalized(), circle.radius - dist));
        }

        // Center inside the box: push out along the shortest escape axis
        let to_min = circle.center - aabb.min;
        let to_max = aabb.max - circle.center;

        let mut escape = to_min.x;
        let mut normal = -Vec2::X;
        if to_max.x < escape {
            escape = to_max.x;
            normal = Vec2::X;
        }
        if to_min.y < escape {
            escape = to_min.y;
            normal = -Vec2::Y;
        }
        if to_max.y < escape {
            escape = to_max.y;
            normal = Vec2::Y;
        }

        Some(Contact::new(closest, normal, circle.radius + escape))
    } else {
        None
    }
}
