//! Per-tick gravity with a reflecting floor

use crate::entity::Entity;
use crate::viewport::Viewport;

use super::{Dynamics, DynamicsKind};

/// Tuning for [`GravityBounce`]
#[derive(Clone, Debug, PartialEq)]
pub struct GravitySettings {
    /// Velocity added each tick (pixels per tick)
    pub gravity: f32,
    /// Fraction of speed kept when bouncing off the floor
    pub bounce_factor: f32,
}

impl Default for GravitySettings {
    fn default() -> Self {
        Self {
            gravity: 0.5,
            bounce_factor: 0.7,
        }
    }
}

/// Advance one entity by one tick
///
/// If the next position would cross the floor the velocity is reflected and
/// damped instead of accelerated. The position always moves by the new
/// velocity.
pub fn integrate(entity: &mut Entity, floor_y: f32, settings: &GravitySettings) {
    let next_bottom = entity.position.y + entity.radius() + entity.vertical_velocity;
    if next_bottom > floor_y {
        entity.vertical_velocity = -entity.vertical_velocity * settings.bounce_factor;
    } else {
        entity.vertical_velocity += settings.gravity;
    }
    entity.position.y += entity.vertical_velocity;
}

/// Vertical-only motion with a bouncing floor at the bottom of the viewport
///
/// One [`step`](Dynamics::step) is one tick; the frame time is ignored.
#[derive(Clone, Debug, Default)]
pub struct GravityBounce {
    settings: GravitySettings,
    viewport: Viewport,
}

impl GravityBounce {
    pub fn new(settings: GravitySettings) -> Self {
        Self {
            settings,
            viewport: Viewport::default(),
        }
    }

    pub fn settings(&self) -> &GravitySettings {
        &self.settings
    }
}

impl Dynamics for GravityBounce {
    fn kind(&self) -> DynamicsKind {
        DynamicsKind::Gravity
    }

    fn reset(&mut self, _entities: &[Entity], viewport: Viewport) {
        self.viewport = viewport;
    }

    fn resize(&mut self, _entities: &[Entity], viewport: Viewport) {
        self.viewport = viewport;
    }

    fn step(&mut self, entities: &mut [Entity], held: Option<usize>, _dt: f32) {
        let floor_y = self.viewport.floor_y();
        for (index, entity) in entities.iter_mut().enumerate() {
            if Some(index) == held {
                continue;
            }
            integrate(entity, floor_y, &self.settings);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bounce2d_math::Vec2;

    fn ball(y: f32, radius: f32, velocity: f32) -> Entity {
        let mut entity = Entity::new(Vec2::new(0.0, y), radius, "red", "");
        entity.vertical_velocity = velocity;
        entity
    }

    #[test]
    fn test_falls_above_floor() {
        let settings = GravitySettings::default();
        let mut entity = ball(100.0, 10.0, 2.0);

        integrate(&mut entity, 600.0, &settings);

        assert_eq!(entity.vertical_velocity, 2.5);
        assert_eq!(entity.position.y, 102.5);
    }

    #[test]
    fn test_touching_floor_exactly_still_accelerates() {
        let settings = GravitySettings::default();
        // 580 + 10 + 10 == 600, not past the floor
        let mut entity = ball(580.0, 10.0, 10.0);

        integrate(&mut entity, 600.0, &settings);

        assert_eq!(entity.vertical_velocity, 10.5);
    }

    #[test]
    fn test_bounces_past_floor() {
        let settings = GravitySettings::default();
        let mut entity = ball(585.0, 10.0, 10.0);

        integrate(&mut entity, 600.0, &settings);

        assert!((entity.vertical_velocity - -7.0).abs() < 1e-5);
        assert!((entity.position.y - 578.0).abs() < 1e-4);
    }

    #[test]
    fn test_step_skips_held_entity() {
        let mut dynamics = GravityBounce::default();
        dynamics.reset(&[], Viewport::new(800.0, 600.0));
        let mut entities = vec![ball(100.0, 10.0, 0.0), ball(100.0, 10.0, 0.0)];

        dynamics.step(&mut entities, Some(0), 1.0 / 60.0);

        assert_eq!(entities[0].position.y, 100.0);
        assert_eq!(entities[0].vertical_velocity, 0.0);
        assert_eq!(entities[1].position.y, 100.5);
    }

    #[test]
    fn test_step_ignores_frame_time() {
        let mut dynamics = GravityBounce::new(GravitySettings::default());
        dynamics.resize(&[], Viewport::new(800.0, 600.0));
        let mut a = vec![ball(0.0, 1.0, 0.0)];
        let mut b = a.clone();

        dynamics.step(&mut a, None, 0.001);
        dynamics.step(&mut b, None, 1.0);

        assert_eq!(a, b);
    }
}
