//! 2D Physics simulation for bounce2d
//!
//! This crate provides the physics engine behind the engine-backed dynamics:
//! - Collision shapes (circles, AABBs) and contact generation
//! - Rigid body dynamics with gravity, restitution and friction
//! - A fixed-step runner with pre/post-step hooks
//! - A mouse constraint for dragging bodies with a pointer

pub mod body;
pub mod collision;
pub mod constraint;
pub mod material;
pub mod runner;
pub mod shapes;
pub mod world;

// Re-export commonly used types
pub use body::{BodyKey, BodyType, RigidBody2D};
pub use collision::{circle_vs_aabb, circle_vs_circle, CollisionFilter, CollisionLayer, Contact};
pub use constraint::MouseConstraint;
pub use material::PhysicsMaterial;
pub use runner::Runner;
pub use shapes::{Aabb2D, Circle, Collider};
pub use world::{PhysicsConfig, PhysicsWorld, StepHooks};
