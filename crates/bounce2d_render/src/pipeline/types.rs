//! GPU-compatible data types for the shape pipeline
//!
//! These types are designed to match the shader layouts exactly.
//! All types derive Pod and Zeroable for safe GPU buffer operations.

use bytemuck::{Pod, Zeroable};

use crate::font::GlyphQuad;

/// Instance is filled inside a circle of radius `half_size.x`
pub const SHAPE_CIRCLE: u32 = 0;
/// Instance is a glyph, its alpha taken from the atlas texture
pub const SHAPE_GLYPH: u32 = 1;

/// One quad to draw, in window pixel coordinates
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct ShapeInstance {
    /// Center of the quad
    pub center: [f32; 2],
    /// Half width and half height
    pub half_size: [f32; 2],
    /// RGBA color, already in the surface's color space
    pub color: [f32; 4],
    /// Atlas texels covered by a glyph: min x, min y, max x, max y
    pub uv_rect: [f32; 4],
    /// [`SHAPE_CIRCLE`] or [`SHAPE_GLYPH`]
    pub kind: u32,
    /// Padding to align to 16 bytes
    pub _padding: [u32; 3],
}

impl ShapeInstance {
    pub fn circle(center: [f32; 2], radius: f32, color: [f32; 4]) -> Self {
        Self {
            center,
            half_size: [radius, radius],
            color,
            uv_rect: [0.0; 4],
            kind: SHAPE_CIRCLE,
            _padding: [0; 3],
        }
    }

    pub fn glyph(quad: &GlyphQuad, color: [f32; 4]) -> Self {
        Self {
            center: quad.center.to_array(),
            half_size: quad.half_size.to_array(),
            color,
            uv_rect: [quad.uv_min[0], quad.uv_min[1], quad.uv_max[0], quad.uv_max[1]],
            kind: SHAPE_GLYPH,
            _padding: [0; 3],
        }
    }
}

/// Uniforms for converting pixels to clip space
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct ScreenUniforms {
    /// Surface size in pixels
    pub size: [f32; 2],
    pub _padding: [f32; 2],
}

impl ScreenUniforms {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: [width.max(1) as f32, height.max(1) as f32],
            _padding: [0.0; 2],
        }
    }
}

impl Default for ScreenUniforms {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_instance_size() {
        // 2 + 2 + 4 + 4 floats + 4 u32 = 64 bytes
        assert_eq!(std::mem::size_of::<ShapeInstance>(), 64);
    }

    #[test]
    fn test_glyph_instance_carries_uv_rect() {
        let quad = GlyphQuad {
            center: bounce2d_math::Vec2::new(10.0, 20.0),
            half_size: bounce2d_math::Vec2::new(3.0, 4.0),
            uv_min: [1.0, 2.0],
            uv_max: [7.0, 10.0],
        };
        let instance = ShapeInstance::glyph(&quad, [1.0; 4]);
        assert_eq!(instance.kind, SHAPE_GLYPH);
        assert_eq!(instance.half_size, [3.0, 4.0]);
        assert_eq!(instance.uv_rect, [1.0, 2.0, 7.0, 10.0]);
    }

    #[test]
    fn test_screen_uniforms_size() {
        assert_eq!(std::mem::size_of::<ScreenUniforms>(), 16);
    }

    #[test]
    fn test_screen_uniforms_never_zero() {
        assert_eq!(ScreenUniforms::new(0, 0).size, [1.0, 1.0]);
    }
}
