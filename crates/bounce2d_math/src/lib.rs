//! 2D Mathematics Library
//!
//! This crate provides the small set of math types shared by the bounce2d crates.
//!
//! ## Core Types
//!
//! - [`Vec2`] - 2D vector in screen space (y grows downward)
//! - [`Color`] - RGBA color, parsed from CSS color strings

mod vec2;
pub mod color;

pub use vec2::Vec2;
pub use color::{Color, ColorParseError};
