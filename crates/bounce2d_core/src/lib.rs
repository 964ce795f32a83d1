//! Core types for bounce2d
//!
//! This crate holds everything that does not need a window:
//!
//! - [`Entity`] - One simulated circle
//! - [`EntityRecord`] - A validated CSV row
//! - [`CsvLoader`] - Background CSV loading
//! - [`Dynamics`] - Swappable physics strategy ([`GravityBounce`], [`EngineDynamics`])
//! - [`SimulationState`] - Owns the entities and applies [`InputEvent`]s
//! - [`Renderer`] - Drawing surface abstraction, with [`FrameRecorder`] for tests

mod entity;
mod error;
mod hit;
mod loader;
mod record;
mod render;
mod simulation;
mod viewport;
pub mod dynamics;

pub use entity::Entity;
pub use error::LoadError;
pub use hit::{is_inside, pick};
pub use loader::{load_file, parse_reader, CsvLoader, LoadResult};
pub use record::{EntityRecord, Field, LoadReport, RowError, RowErrorKind, RowPolicy};
pub use render::{draw_entity, label_font_size, DrawCommand, FrameRecorder, Renderer, LABEL_COLOR};
pub use simulation::{Hold, InputEvent, SimulationState};
pub use viewport::Viewport;
pub use dynamics::{
    create_dynamics, Boundary, Dynamics, DynamicsKind, DynamicsSettings, EngineDynamics,
    EngineSettings, GravityBounce, GravitySettings,
};

// Re-export commonly used types from the math crate for convenience
pub use bounce2d_math::{Color, Vec2};
