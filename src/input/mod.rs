//! Input handling module
//!
//! Maps raw keyboard and pointer input to simulation events and app actions.

mod input_mapper;

pub use input_mapper::{InputAction, InputMapper};
