//! CPU-side list of shapes for one frame

use bounce2d_core::{Color, Renderer, Vec2, LABEL_COLOR};

use crate::font::GlyphAtlas;
use crate::pipeline::ShapeInstance;

/// Convert one sRGB component to linear
fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Convert a CSS (sRGB) color for a surface
///
/// sRGB surfaces encode on write, so colors must be handed over linear or
/// they come out washed out. Alpha is never converted.
pub fn surface_color(color: Color, linear_output: bool) -> [f32; 4] {
    if linear_output {
        [srgb_to_linear(color.r), srgb_to_linear(color.g), srgb_to_linear(color.b), color.a]
    } else {
        color.to_array()
    }
}

/// Collects the instances of a frame
///
/// Implements [`Renderer`]: circles become circle instances, text becomes
/// one textured instance per glyph, rasterised into the batch's
/// [`GlyphAtlas`] on first use. Instances are drawn in push order, so later
/// shapes cover earlier ones.
pub struct ShapeBatch {
    instances: Vec<ShapeInstance>,
    atlas: GlyphAtlas,
    label_color: Color,
    linear_output: bool,
}

impl ShapeBatch {
    /// Create an empty batch; `linear_output` is set for sRGB surfaces
    pub fn new(linear_output: bool, atlas: GlyphAtlas) -> Self {
        Self {
            instances: Vec::new(),
            atlas,
            label_color: LABEL_COLOR,
            linear_output,
        }
    }

    /// Builder: set the color used for text
    pub fn with_label_color(mut self, color: Color) -> Self {
        self.label_color = color;
        self
    }

    pub fn instances(&self) -> &[ShapeInstance] {
        &self.instances
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn atlas(&self) -> &GlyphAtlas {
        &self.atlas
    }

    /// Instances plus the atlas they sample, for upload
    pub fn parts_mut(&mut self) -> (&[ShapeInstance], &mut GlyphAtlas) {
        (&self.instances, &mut self.atlas)
    }

    pub fn label_color(&self) -> Color {
        self.label_color
    }

    pub fn linear_output(&self) -> bool {
        self.linear_output
    }
}

impl Renderer for ShapeBatch {
    fn clear(&mut self) {
        self.instances.clear();
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, fill: Color) {
        if radius.is_nan() || radius <= 0.0 || !center.is_finite() {
            return;
        }
        self.instances.push(ShapeInstance::circle(
            center.to_array(),
            radius,
            surface_color(fill, self.linear_output),
        ));
    }

    fn draw_centered_text(&mut self, text: &str, center: Vec2, font_size: f32) {
        if !center.is_finite() {
            return;
        }
        let color = surface_color(self.label_color, self.linear_output);
        for quad in self.atlas.layout_centered(text, center, font_size) {
            self.instances.push(ShapeInstance::glyph(&quad, color));
        }
    }
}
