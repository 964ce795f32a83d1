//! Physics strategies
//!
//! A [`Dynamics`] moves entities between frames. Two families exist:
//! [`GravityBounce`] integrates vertical motion directly on the entities,
//! while [`EngineDynamics`] mirrors them into a rigid-body world and copies
//! positions back after each step.

mod engine;
mod gravity;

use bounce2d_math::Vec2;
use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::viewport::Viewport;

pub use engine::{wrap_position, Boundary, EngineDynamics, EngineSettings, WrapBoundary};
pub use gravity::{integrate, GravityBounce, GravitySettings};

/// Swappable physics policy driven by [`SimulationState`](crate::SimulationState)
///
/// `held` is the index of the entity currently under the pointer. A
/// strategy must leave that entity's position alone.
pub trait Dynamics {
    /// Which strategy this is
    fn kind(&self) -> DynamicsKind;

    /// Human readable name for logs
    fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// Start over with a freshly loaded entity set
    fn reset(&mut self, entities: &[Entity], viewport: Viewport);

    /// The drawable area changed size
    fn resize(&mut self, entities: &[Entity], viewport: Viewport);

    /// Advance one frame
    fn step(&mut self, entities: &mut [Entity], held: Option<usize>, dt: f32);

    /// The pointer picked up entity `index`; `offset` is pointer minus center
    fn grab(&mut self, _index: usize, _offset: Vec2, _pointer: Vec2) {}

    /// The pointer moved while holding an entity
    fn drag(&mut self, _pointer: Vec2) {}

    /// The held entity was let go
    fn release(&mut self) {}
}

/// Selectable strategies
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DynamicsKind {
    /// Per-tick gravity with a bouncing floor
    #[default]
    Gravity,
    /// Rigid-body engine, bodies wrap around the viewport edges
    Wrap,
    /// Rigid-body engine, bodies stay inside four walls
    Walls,
}

impl DynamicsKind {
    pub const ALL: [DynamicsKind; 3] = [DynamicsKind::Gravity, DynamicsKind::Wrap, DynamicsKind::Walls];

    pub fn name(self) -> &'static str {
        match self {
            DynamicsKind::Gravity => "gravity",
            DynamicsKind::Wrap => "wrap",
            DynamicsKind::Walls => "walls",
        }
    }

    /// The strategy after this one, cycling back to the first
    pub fn next(self) -> Self {
        match self {
            DynamicsKind::Gravity => DynamicsKind::Wrap,
            DynamicsKind::Wrap => DynamicsKind::Walls,
            DynamicsKind::Walls => DynamicsKind::Gravity,
        }
    }
}

/// Tuning for every strategy
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DynamicsSettings {
    pub gravity: GravitySettings,
    pub engine: EngineSettings,
}

/// Build a strategy of the given kind
pub fn create_dynamics(kind: DynamicsKind, settings: &DynamicsSettings) -> Box<dyn Dynamics> {
    match kind {
        DynamicsKind::Gravity => Box::new(GravityBounce::new(settings.gravity.clone())),
        DynamicsKind::Wrap => Box::new(EngineDynamics::new(Boundary::Wrap, settings.engine.clone())),
        DynamicsKind::Walls => Box::new(EngineDynamics::new(Boundary::Walls, settings.engine.clone())),
    }
}
