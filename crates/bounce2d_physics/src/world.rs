//! Physics world and simulation

use crate::body::{BodyKey, RigidBody2D};
use crate::collision::{circle_vs_aabb, circle_vs_circle, Contact};
use crate::constraint::MouseConstraint;
use crate::shapes::Collider;
use bounce2d_math::Vec2;
use slotmap::SlotMap;

/// Configuration for the physics simulation
#[derive(Clone, Debug)]
pub struct PhysicsConfig {
    /// Gravity acceleration in units per second squared (positive y = down)
    pub gravity: Vec2,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, 980.0),
        }
    }
}

impl PhysicsConfig {
    /// Create a new physics config with the given downward gravity
    pub fn new(gravity: f32) -> Self {
        Self {
            gravity: Vec2::new(0.0, gravity),
        }
    }
}

/// Code run around every physics step
///
/// `before_step` runs before gravity and integration, `after_step` after
/// collisions are resolved. Both default to doing nothing.
pub trait StepHooks {
    fn before_step(&mut self, _world: &mut PhysicsWorld) {}
    fn after_step(&mut self, _world: &mut PhysicsWorld) {}
}

impl StepHooks for () {}

/// The physics world containing all rigid bodies
pub struct PhysicsWorld {
    /// All rigid bodies in the world (using generational keys)
    bodies: SlotMap<BodyKey, RigidBody2D>,
    /// Pointer drag binding
    mouse: MouseConstraint,
    /// Physics configuration
    pub config: PhysicsConfig,
}

impl PhysicsWorld {
    /// Create a new physics world with default configuration
    pub fn new() -> Self {
        Self::with_config(PhysicsConfig::default())
    }

    /// Create a new physics world with custom configuration
    pub fn with_config(config: PhysicsConfig) -> Self {
        Self {
            bodies: SlotMap::with_key(),
            mouse: MouseConstraint::default(),
            config,
        }
    }

    /// Add a body to the world and return its key
    pub fn add_body(&mut self, body: RigidBody2D) -> BodyKey {
        self.bodies.insert(body)
    }

    /// Remove a body from the world and return it
    ///
    /// Removing the dragged body also detaches the mouse constraint.
    pub fn remove_body(&mut self, key: BodyKey) -> Option<RigidBody2D> {
        if self.mouse.body() == Some(key) {
            self.mouse.detach();
        }
        self.bodies.remove(key)
    }

    /// Remove every body
    pub fn clear(&mut self) {
        self.mouse.detach();
        self.bodies.clear();
    }

    /// Get an immutable reference to a body by key
    pub fn get_body(&self, key: BodyKey) -> Option<&RigidBody2D> {
        self.bodies.get(key)
    }

    /// Get a mutable reference to a body by key
    pub fn get_body_mut(&mut self, key: BodyKey) -> Option<&mut RigidBody2D> {
        self.bodies.get_mut(key)
    }

    /// Get the number of bodies in the world
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Iterate mutably over all bodies
    pub fn bodies_mut(&mut self) -> impl Iterator<Item = (BodyKey, &mut RigidBody2D)> {
        self.bodies.iter_mut()
    }

    /// The pointer drag constraint
    pub fn mouse_constraint(&self) -> &MouseConstraint {
        &self.mouse
    }

    /// Mutable access to the pointer drag constraint
    pub fn mouse_constraint_mut(&mut self) -> &mut MouseConstraint {
        &mut self.mouse
    }


    /// Step the physics simulation forward by dt seconds
    pub fn step(&mut self, dt: f32) {
        self.step_with_hooks(dt, &mut ());
    }

    /// Step the simulation, running `hooks` around the step
    ///
    /// This performs:
    /// 1. `hooks.before_step`
    /// 2. Mouse constraint solve for the dragged body
    /// 3. Gravity, air friction and velocity integration for free dynamic bodies
    /// 4. Body-body collision detection and resolution
    /// 5. `hooks.after_step`
    pub fn step_with_hooks<H: StepHooks + ?Sized>(&mut self, dt: f32, hooks: &mut H) {
        hooks.before_step(self);

        let held = self.mouse.body();

        // Phase 1: drag constraint
        if let Some(key) = held {
            match self.bodies.get_mut(key) {
                Some(body) => self.mouse.solve(body, dt),
                None => {
                    self.mouse.detach();
                }
            }
        }

        // Phase 2: apply gravity and integrate velocity
        let gravity = self.config.gravity;
        for (key, body) in &mut self.bodies {
            if body.is_static() || Some(key) == held {
                continue;
            }

            body.velocity += gravity * dt;
            body.velocity *= 1.0 - body.material.air_friction;

            let displacement = body.velocity * dt;
            body.position += displacement;
            body.collider = body.collider.translated(displacement);
        }

        // Phase 3: resolve body-body collisions
        self.resolve_body_collisions(held);

        hooks.after_step(self);
    }

    /// Contact between two colliders, normal pointing from A toward B
    fn pair_contact(collider_a: &Collider, collider_b: &Collider) -> Option<Contact> {
        match (collider_a, collider_b) {
            (Collider::Circle(a), Collider::Circle(b)) => circle_vs_circle(a, b),
            (Collider::Circle(circle), Collider::Aabb(aabb)) => {
                // circle_vs_aabb's normal points from the AABB toward the circle
                circle_vs_aabb(circle, aabb).map(|mut c| {
                    c.normal = -c.normal;
                    c
                })
            }
            (Collider::Aabb(aabb), Collider::Circle(circle)) => circle_vs_aabb(circle, aabb),
            // Boxes are only used for static walls
            (Collider::Aabb(_), Collider::Aabb(_)) => None,
        }
    }

    /// Resolve collisions between bodies
    fn resolve_body_collisions(&mut self, held: Option<BodyKey>) {
        // Collect all keys first (needed because we can't iterate and mutate)
        let keys: Vec<BodyKey> = self.bodies.keys().collect();
        let key_count = keys.len();

        for i in 0..key_count {
            for j in (i + 1)..key_count {
                let key_a = keys[i];
                let key_b = keys[j];

                let (collider_a, collider_b, fixed_a, fixed_b, filters_match) = {
                    let body_a = &self.bodies[key_a];
                    let body_b = &self.bodies[key_b];
                    (
                        body_a.collider,
                        body_b.collider,
                        body_a.is_static() || Some(key_a) == held,
                        body_b.is_static() || Some(key_b) == held,
                        body_a.filter.collides_with(&body_b.filter),
                    )
                };

                if (fixed_a && fixed_b) || !filters_match {
                    continue;
                }

                if let Some(contact) = Self::pair_contact(&collider_a, &collider_b) {
                    if contact.is_colliding() {
                        self.resolve_body_pair_collision(key_a, key_b, &contact, fixed_a, fixed_b);
                    }
                }
            }
        }
    }

    /// Resolve collision between two specific bodies
    fn resolve_body_pair_collision(
        &mut self,
        key_a: BodyKey,
        key_b: BodyKey,
        contact: &Contact,
        fixed_a: bool,
        fixed_b: bool,
    ) {
        // Determine how to split the correction
        let (correction_a, correction_b) = if fixed_a {
            (Vec2::ZERO, contact.normal * contact.penetration)
        } else if fixed_b {
            (-contact.normal * contact.penetration, Vec2::ZERO)
        } else {
            let mass_a = self.bodies[key_a].mass;
            let mass_b = self.bodies[key_b].mass;
            let total_mass = mass_a + mass_b;

            // Massless pairs split evenly
            let (ratio_a, ratio_b) = if total_mass > 0.0 {
                (mass_b / total_mass, mass_a / total_mass)
            } else {
                (0.5, 0.5)
            };

            (
                -contact.normal * contact.penetration * ratio_a,
                contact.normal * contact.penetration * ratio_b,
            )
        };

        if !fixed_a {
            self.bodies[key_a].apply_correction(correction_a);
        }
        if !fixed_b {
            self.bodies[key_b].apply_correction(correction_b);
        }

        let combined = self.bodies[key_a].material.combine(&self.bodies[key_b].material);

        // Velocity response: A is pushed along -normal, B along +normal
        if !fixed_a {
            Self::reflect_velocity(&mut self.bodies[key_a], -contact.normal, combined.restitution, combined.friction);
        }
        if !fixed_b {
            Self::reflect_velocity(&mut self.bodies[key_b], contact.normal, combined.restitution, combined.friction);
        }
    }

    /// Bounce a body's velocity off a surface whose normal points toward the body
    fn reflect_velocity(body: &mut RigidBody2D, normal: Vec2, restitution: f32, friction: f32) {
        let vel_along_normal = body.velocity.dot(normal);
        if vel_along_normal >= 0.0 {
            return;
        }

        let normal_velocity = normal * vel_along_normal;
        body.velocity -= normal_velocity * (1.0 + restitution);

        // Apply friction to tangent velocity
        let tangent_velocity = body.velocity - normal * body.velocity.dot(normal);
        if tangent_velocity.length() > 0.0001 {
            body.velocity = normal * body.velocity.dot(normal) + tangent_velocity * (1.0 - friction);
        }
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{CollisionFilter, CollisionLayer};
    use crate::material::PhysicsMaterial;

    fn no_drag() -> PhysicsMaterial {
        PhysicsMaterial::new(0.0, 0.0)
    }

    #[test]
    fn test_physics_config_default() {
        let config = PhysicsConfig::default();
        assert_eq!(config.gravity, Vec2::new(0.0, 980.0));
        assert_eq!(PhysicsConfig::new(10.0).gravity, Vec2::new(0.0, 10.0));
    }

    #[test]
    fn test_world_add_and_remove_body() {
        let mut world = PhysicsWorld::new();
        assert_eq!(world.body_count(), 0);

        let key = world.add_body(RigidBody2D::new_circle(Vec2::new(0.0, 5.0), 0.5));
        assert!(world.get_body(key).is_some());
        assert_eq!(world.body_count(), 1);

        assert!(world.remove_body(key).is_some());
        assert!(world.get_body(key).is_none());
        assert_eq!(world.body_count(), 0);
    }

    #[test]
    fn test_massless_overlap_stays_finite() {
        let mut world = PhysicsWorld::with_config(PhysicsConfig::new(0.0));
        let a = world.add_body(RigidBody2D::new_circle(Vec2::new(0.0, 0.0), 10.0).with_density(0.0));
        let b = world.add_body(RigidBody2D::new_circle(Vec2::new(5.0, 0.0), 10.0).with_density(0.0));

        world.step(1.0 / 60.0);

        let pos_a = world.get_body(a).unwrap().position;
        let pos_b = world.get_body(b).unwrap().position;
        assert!(pos_a.is_finite() && pos_b.is_finite());
        // Pushed apart by the same amount
        assert!(pos_a.x < 0.0);
        assert!(pos_b.x > 5.0);
        assert!((-pos_a.x - (pos_b.x - 5.0)).abs() < 1e-3);
    }

    #[test]
    fn test_stale_key_returns_none() {
        let mut world = PhysicsWorld::new();
        let key = world.add_body(RigidBody2D::new_circle(Vec2::ZERO, 0.5));
        world.remove_body(key);

        let new_key = world.add_body(RigidBody2D::new_circle(Vec2::X, 0.5));

        assert!(world.get_body(key).is_none());
        assert!(world.get_body(new_key).is_some());
    }

    #[test]
    fn test_gravity_application() {
        let mut world = PhysicsWorld::with_config(PhysicsConfig::new(20.0));
        let key = world.add_body(RigidBody2D::new_circle(Vec2::ZERO, 0.5).with_material(no_drag()));

        world.step(0.1);

        let body = world.get_body(key).unwrap();
        assert!((body.velocity.y - 2.0).abs() < 0.0001);
        assert!((body.position.y - 0.2).abs() < 0.0001);
    }

    #[test]
    fn test_air_friction_damps_velocity() {
        let mut world = PhysicsWorld::with_config(PhysicsConfig::new(0.0));
        let key = world.add_body(
            RigidBody2D::new_circle(Vec2::ZERO, 0.5)
                .with_material(no_drag().with_air_friction(0.5))
                .with_velocity(Vec2::new(10.0, 0.0)),
        );

        world.step(1.0);

        let body = world.get_body(key).unwrap();
        assert_eq!(body.velocity.x, 5.0);
        assert_eq!(body.position.x, 5.0);
    }

    #[test]
    fn test_static_body_does_not_move() {
        let mut world = PhysicsWorld::new();
        let key = world.add_body(RigidBody2D::new_static_aabb(Vec2::ZERO, Vec2::new(1.0, 1.0)));

        world.step(1.0);

        let body = world.get_body(key).unwrap();
        assert_eq!(body.position, Vec2::ZERO);
        assert_eq!(body.velocity, Vec2::ZERO);
    }

    #[test]
    fn test_circle_bounces_off_static_floor() {
        let mut world = PhysicsWorld::with_config(PhysicsConfig::new(0.0));
        // Floor spanning y in [100, 150]
        world.add_body(
            RigidBody2D::new_static_aabb(Vec2::new(0.0, 125.0), Vec2::new(500.0, 25.0))
                .with_material(PhysicsMaterial::new(0.0, 1.0)),
        );
        let ball = world.add_body(
            RigidBody2D::new_circle(Vec2::new(0.0, 89.0), 10.0)
                .with_material(no_drag())
                .with_velocity(Vec2::new(0.0, 100.0)),
        );

        world.step(0.05);

        let body = world.get_body(ball).unwrap();
        assert!(body.velocity.y < 0.0, "ball should bounce upward, got {:?}", body.velocity);
        assert!(body.position.y <= 90.0 + 0.001);
    }

    #[test]
    fn test_zero_restitution_stops_ball() {
        let mut world = PhysicsWorld::with_config(PhysicsConfig::new(0.0));
        world.add_body(
            RigidBody2D::new_static_aabb(Vec2::new(0.0, 125.0), Vec2::new(500.0, 25.0))
                .with_material(PhysicsMaterial::new(0.0, 0.0)),
        );
        let ball = world.add_body(
            RigidBody2D::new_circle(Vec2::new(0.0, 89.0), 10.0)
                .with_material(no_drag())
                .with_velocity(Vec2::new(0.0, 100.0)),
        );

        world.step(0.05);

        assert!(world.get_body(ball).unwrap().velocity.y.abs() < 0.001);
    }

    #[test]
    fn test_two_circles_separate() {
        let mut world = PhysicsWorld::with_config(PhysicsConfig::new(0.0));
        let a = world.add_body(RigidBody2D::new_circle(Vec2::ZERO, 0.5));
        let b = world.add_body(
            RigidBody2D::new_circle(Vec2::new(2.0, 0.0), 0.5).with_velocity(Vec2::new(-10.0, 0.0)),
        );

        for _ in 0..20 {
            world.step(0.016);
        }

        let distance = (world.get_body(b).unwrap().position - world.get_body(a).unwrap().position).length();
        assert!(distance >= 1.0 - 0.1);
    }

    #[test]
    fn test_filtered_pair_passes_through() {
        let mut world = PhysicsWorld::with_config(PhysicsConfig::new(0.0));
        let mut wall_only = RigidBody2D::new_circle(Vec2::ZERO, 1.0);
        wall_only.filter = CollisionFilter::new(CollisionLayer::BALL, CollisionLayer::WALL);
        let a = world.add_body(wall_only);
        let b = world.add_body(RigidBody2D::new_circle(Vec2::new(0.5, 0.0), 1.0));

        world.step(0.016);

        assert_eq!(world.get_body(a).unwrap().position, Vec2::ZERO);
        assert_eq!(world.get_body(b).unwrap().position, Vec2::new(0.5, 0.0));
    }

    #[test]
    fn test_dragged_body_ignores_gravity() {
        let mut world = PhysicsWorld::with_config(PhysicsConfig::new(1000.0));
        let key = world.add_body(RigidBody2D::new_circle(Vec2::new(10.0, 10.0), 5.0));
        world
            .mouse_constraint_mut()
            .attach(key, Vec2::new(1.0, 1.0), Vec2::new(11.0, 11.0));
        world.mouse_constraint_mut().set_pointer(Vec2::new(41.0, 21.0));

        world.step(0.1);

        let body = world.get_body(key).unwrap();
        assert_eq!(body.position, Vec2::new(40.0, 20.0));
        assert_eq!(body.velocity, Vec2::new(300.0, 100.0));
    }

    #[test]
    fn test_remove_dragged_body_detaches_constraint() {
        let mut world = PhysicsWorld::new();
        let key = world.add_body(RigidBody2D::new_circle(Vec2::ZERO, 1.0));
        world.mouse_constraint_mut().attach(key, Vec2::ZERO, Vec2::ZERO);

        world.remove_body(key);

        assert!(world.mouse_constraint().body().is_none());
    }

    struct CountingHooks {
        before: usize,
        after: usize,
    }

    impl StepHooks for CountingHooks {
        fn before_step(&mut self, world: &mut PhysicsWorld) {
            self.before += 1;
            for (_, body) in world.bodies_mut() {
                body.velocity = Vec2::ZERO;
            }
        }

        fn after_step(&mut self, _world: &mut PhysicsWorld) {
            self.after += 1;
        }
    }

    #[test]
    fn test_hooks_run_around_step() {
        let mut world = PhysicsWorld::with_config(PhysicsConfig::new(0.0));
        let key = world.add_body(RigidBody2D::new_circle(Vec2::ZERO, 1.0).with_velocity(Vec2::new(10.0, 0.0)));
        let mut hooks = CountingHooks { before: 0, after: 0 };

        world.step_with_hooks(1.0, &mut hooks);
        world.step_with_hooks(1.0, &mut hooks);

        assert_eq!(hooks.before, 2);
        assert_eq!(hooks.after, 2);
        // before_step zeroed the velocity ahead of integration
        assert_eq!(world.get_body(key).unwrap().position, Vec2::ZERO);
    }
}
