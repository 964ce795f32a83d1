//! bounce2d Rendering Library
//!
//! This crate provides the wgpu-based renderer behind the window front end.
//!
//! ## Key Components
//!
//! - [`context::RenderContext`] - WGPU device, queue, and surface management
//! - [`pipeline::ShapePipeline`] - Instanced quads drawn as circles or atlas glyphs
//! - [`batch::ShapeBatch`] - CPU-side instance list implementing the core `Renderer`
//! - [`font::GlyphAtlas`] - `ab_glyph` rasteriser and texture atlas for labels
//! - [`GpuRenderer`] - Ties the above together and presents frames

pub mod batch;
pub mod context;
pub mod font;
pub mod pipeline;
mod gpu_renderer;

pub use batch::ShapeBatch;
pub use context::{ContextError, RenderContext};
pub use font::{FontError, GlyphAtlas};
pub use gpu_renderer::GpuRenderer;

// Re-export core types for convenience
pub use bounce2d_core::{Color, DrawCommand, Renderer, Vec2};
