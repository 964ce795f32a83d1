//! bounce2d application library
//!
//! The binary in `main.rs` wires these together; they live in a library so
//! integration tests can reach the config loader and input mapping.

pub mod config;
pub mod input;
pub mod systems;
