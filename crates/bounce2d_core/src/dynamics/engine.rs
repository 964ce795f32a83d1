//! Rigid-body engine strategies
//!
//! Each entity is mirrored by a dynamic circle body. The world is advanced
//! by a fixed-step [`Runner`] and entity positions are copied back from the
//! bodies afterwards. What happens at the viewport edges depends on the
//! [`Boundary`].

use bounce2d_math::Vec2;
use bounce2d_physics::{
    BodyKey, PhysicsConfig, PhysicsMaterial, PhysicsWorld, RigidBody2D, Runner, StepHooks,
};

use crate::entity::Entity;
use crate::viewport::Viewport;

use super::{Dynamics, DynamicsKind};

/// Tuning for [`EngineDynamics`]
#[derive(Clone, Debug, PartialEq)]
pub struct EngineSettings {
    /// Downward acceleration in pixels per second squared
    pub gravity: f32,
    pub restitution: f32,
    pub friction: f32,
    /// Fraction of velocity lost each step
    pub air_friction: f32,
    /// Mass per square pixel
    pub density: f32,
    /// Thickness of each containment wall
    pub wall_thickness: f32,
    /// Fixed step length in seconds
    pub timestep: f32,
    pub max_substeps: u32,
    /// 1.0 pins a dragged body to the pointer
    pub drag_stiffness: f32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            gravity: 1000.0,
            restitution: 0.7,
            friction: 0.1,
            air_friction: 0.01,
            density: 0.001,
            wall_thickness: 50.0,
            timestep: 1.0 / 60.0,
            max_substeps: 5,
            drag_stiffness: 1.0,
        }
    }
}

impl EngineSettings {
    fn ball_material(&self) -> PhysicsMaterial {
        PhysicsMaterial::new(self.friction, self.restitution).with_air_friction(self.air_friction)
    }

    fn wall_material(&self) -> PhysicsMaterial {
        PhysicsMaterial::new(self.friction, self.restitution)
    }
}

/// What keeps bodies on screen
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Boundary {
    /// Leaving one edge re-enters from the opposite edge
    Wrap,
    /// Four static walls just outside the viewport
    Walls,
}

/// Toroidal wrap of one circle center
///
/// A circle is moved only once it is entirely past an edge. Each axis is
/// handled on its own.
pub fn wrap_position(position: Vec2, radius: f32, viewport: Viewport) -> Vec2 {
    Vec2::new(
        wrap_axis(position.x, radius, viewport.width),
        wrap_axis(position.y, radius, viewport.height),
    )
}

fn wrap_axis(value: f32, radius: f32, extent: f32) -> f32 {
    if value > extent + radius {
        -radius
    } else if value < -radius {
        extent + radius
    } else {
        value
    }
}

/// Pre-step hook applying [`wrap_position`] to every free dynamic body
#[derive(Clone, Debug, Default)]
pub struct WrapBoundary {
    pub viewport: Viewport,
}

impl StepHooks for WrapBoundary {
    fn before_step(&mut self, world: &mut PhysicsWorld) {
        let held = world.mouse_constraint().body();
        let viewport = self.viewport;

        for (key, body) in world.bodies_mut() {
            if body.is_static() || Some(key) == held {
                continue;
            }
            let radius = body.radius().unwrap_or(0.0);
            let wrapped = wrap_position(body.position, radius, viewport);
            if wrapped != body.position {
                body.set_position(wrapped);
            }
        }
    }
}

/// Entities driven by the rigid-body engine
pub struct EngineDynamics {
    boundary: Boundary,
    settings: EngineSettings,
    world: PhysicsWorld,
    runner: Runner,
    /// Body of each entity, by entity index
    bodies: Vec<BodyKey>,
    walls: Vec<BodyKey>,
    wrap: WrapBoundary,
}

impl EngineDynamics {
    pub fn new(boundary: Boundary, settings: EngineSettings) -> Self {
        let mut world = PhysicsWorld::with_config(PhysicsConfig::new(settings.gravity));
        world.mouse_constraint_mut().stiffness = settings.drag_stiffness.clamp(0.0, 1.0);
        let runner = Runner::new(settings.timestep, settings.max_substeps);

        Self {
            boundary,
            settings,
            world,
            runner,
            bodies: Vec::new(),
            walls: Vec::new(),
            wrap: WrapBoundary::default(),
        }
    }

    pub fn boundary(&self) -> Boundary {
        self.boundary
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    /// Body mirroring entity `index`
    pub fn body_of(&self, index: usize) -> Option<&RigidBody2D> {
        self.bodies.get(index).and_then(|key| self.world.get_body(*key))
    }

    /// Keys of the current wall bodies (empty unless walled)
    pub fn wall_keys(&self) -> &[BodyKey] {
        &self.walls
    }

    fn rebuild_walls(&mut self, viewport: Viewport) {
        for key in self.walls.drain(..) {
            self.world.remove_body(key);
        }
        if self.boundary != Boundary::Walls {
            return;
        }

        let material = self.settings.wall_material();
        self.walls = wall_boxes(viewport, self.settings.wall_thickness)
            .into_iter()
            .map(|(center, half_extents)| {
                self.world
                    .add_body(RigidBody2D::new_static_aabb(center, half_extents).with_material(material))
            })
            .collect();
    }
}

/// Center and half extents of the four walls around `viewport`
///
/// Walls overlap at the corners so nothing escapes diagonally.
fn wall_boxes(viewport: Viewport, thickness: f32) -> [(Vec2, Vec2); 4] {
    let (w, h) = (viewport.width, viewport.height);
    let half = thickness * 0.5;
    let horizontal = Vec2::new(w * 0.5 + thickness, half);
    let vertical = Vec2::new(half, h * 0.5 + thickness);

    [
        (Vec2::new(w * 0.5, -half), horizontal),
        (Vec2::new(w * 0.5, h + half), horizontal),
        (Vec2::new(-half, h * 0.5), vertical),
        (Vec2::new(w + half, h * 0.5), vertical),
    ]
}

impl Dynamics for EngineDynamics {
    fn kind(&self) -> DynamicsKind {
        match self.boundary {
            Boundary::Wrap => DynamicsKind::Wrap,
            Boundary::Walls => DynamicsKind::Walls,
        }
    }

    fn reset(&mut self, entities: &[Entity], viewport: Viewport) {
        self.world.clear();
        self.runner.reset();
        self.walls.clear();

        let material = self.settings.ball_material();
        let density = self.settings.density;
        let world = &mut self.world;
        self.bodies = entities
            .iter()
            .map(|entity| {
                world.add_body(
                    RigidBody2D::new_circle(entity.position, entity.radius())
                        .with_material(material)
                        .with_density(density),
                )
            })
            .collect();

        self.wrap.viewport = viewport;
        self.rebuild_walls(viewport);
        log::debug!(
            "Engine reset: {} bodies, {} walls ({:?})",
            self.bodies.len(),
            self.walls.len(),
            self.boundary
        );
    }

    fn resize(&mut self, _entities: &[Entity], viewport: Viewport) {
        self.wrap.viewport = viewport;
        self.rebuild_walls(viewport);
    }

    fn step(&mut self, entities: &mut [Entity], held: Option<usize>, dt: f32) {
        let mut no_hooks = ();
        let hooks: &mut dyn StepHooks = match self.boundary {
            Boundary::Wrap => &mut self.wrap,
            Boundary::Walls => &mut no_hooks,
        };
        self.runner.tick(&mut self.world, dt, hooks);

        for (index, entity) in entities.iter_mut().enumerate() {
            if Some(index) == held {
                continue;
            }
            if let Some(body) = self.bodies.get(index).and_then(|key| self.world.get_body(*key)) {
                entity.position = body.position;
                entity.vertical_velocity = body.velocity.y;
            }
        }
    }

    fn grab(&mut self, index: usize, offset: Vec2, pointer: Vec2) {
        match self.bodies.get(index) {
            Some(&key) => self.world.mouse_constraint_mut().attach(key, offset, pointer),
            None => log::warn!("Grab of entity {} with no body", index),
        }
    }

    fn drag(&mut self, pointer: Vec2) {
        self.world.mouse_constraint_mut().set_pointer(pointer);
    }

    fn release(&mut self) {
        self.world.mouse_constraint_mut().detach();
    }
}
