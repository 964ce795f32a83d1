//! Rendering pipeline components
//!
//! A single render pipeline draws every shape as an instanced quad.

pub mod types;
pub mod shape_pipeline;

pub use types::{ShapeInstance, ScreenUniforms, SHAPE_CIRCLE, SHAPE_GLYPH};
pub use shape_pipeline::ShapePipeline;
