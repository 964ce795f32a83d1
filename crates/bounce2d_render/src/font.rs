//! Glyph atlas for label text
//!
//! Glyphs are rasterised with `ab_glyph` the first time they are needed and
//! packed into a single-channel CPU atlas. The shape pipeline uploads the
//! atlas as a texture and draws one textured quad per glyph.
//!
//! Glyphs are cached per glyph id and whole-pixel size. Quads are scaled
//! from that cached size to the exact requested size.

use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::Path;

use ab_glyph::{Font, FontArc, GlyphId, OutlinedGlyph, PxScale, ScaleFont};
use bounce2d_math::Vec2;

/// Atlas width in texels; it only ever grows in height
pub const ATLAS_WIDTH: u32 = 1024;
const INITIAL_HEIGHT: u32 = 256;
/// Height limit, the minimum max texture size wgpu guarantees
pub const MAX_ATLAS_HEIGHT: u32 = 8192;
/// Empty texels around each glyph so linear sampling never bleeds
const PADDING: u32 = 1;

/// Error type for loading a label font
#[derive(Debug)]
pub enum FontError {
    /// The font file could not be read
    Io(io::Error),
    /// The bytes are not a TrueType/OpenType font
    Invalid(ab_glyph::InvalidFont),
}

impl fmt::Display for FontError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontError::Io(err) => write!(f, "Font IO error: {}", err),
            FontError::Invalid(err) => write!(f, "Invalid font: {}", err),
        }
    }
}

impl std::error::Error for FontError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FontError::Io(err) => Some(err),
            FontError::Invalid(err) => Some(err),
        }
    }
}

impl From<io::Error> for FontError {
    fn from(err: io::Error) -> Self {
        FontError::Io(err)
    }
}

impl From<ab_glyph::InvalidFont> for FontError {
    fn from(err: ab_glyph::InvalidFont) -> Self {
        FontError::Invalid(err)
    }
}

/// Where a rasterised glyph lives in the atlas
#[derive(Clone, Copy, Debug, PartialEq)]
struct CachedGlyph {
    /// Top-left texel
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    /// Top-left of the bitmap relative to the pen on the baseline
    offset: Vec2,
}

/// One glyph to draw, in window pixels
///
/// UVs are in atlas texels, not normalised, so quads stay valid when the
/// atlas grows later in the same frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlyphQuad {
    pub center: Vec2,
    pub half_size: Vec2,
    pub uv_min: [f32; 2],
    pub uv_max: [f32; 2],
}

/// Font plus the coverage atlas of every glyph drawn so far
pub struct GlyphAtlas {
    font: FontArc,
    /// `None` marks glyphs with no outline (spaces) or that did not fit
    glyphs: HashMap<(GlyphId, u32), Option<CachedGlyph>>,
    pixels: Vec<u8>,
    height: u32,
    cursor_x: u32,
    cursor_y: u32,
    row_height: u32,
    dirty: bool,
}

impl GlyphAtlas {
    pub fn new(font: FontArc) -> Self {
        Self {
            font,
            glyphs: HashMap::new(),
            pixels: vec![0; (ATLAS_WIDTH * INITIAL_HEIGHT) as usize],
            height: INITIAL_HEIGHT,
            cursor_x: PADDING,
            cursor_y: PADDING,
            row_height: 0,
            dirty: true,
        }
    }

    /// Atlas using the sans-serif font compiled into the binary
    pub fn embedded() -> Result<Self, FontError> {
        let font = FontArc::try_from_slice(epaint_default_fonts::UBUNTU_LIGHT)?;
        Ok(Self::new(font))
    }

    /// Atlas using a font from raw TrueType/OpenType bytes
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, FontError> {
        Ok(Self::new(FontArc::try_from_vec(bytes)?))
    }

    /// Atlas using a font file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, FontError> {
        Self::from_bytes(std::fs::read(path)?)
    }

    pub fn width(&self) -> u32 {
        ATLAS_WIDTH
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major coverage, one byte per texel
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// True when pixels changed since the last [`mark_clean`](Self::mark_clean)
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Number of cached glyph/size pairs, blank ones included
    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    /// Scale for a CSS-style font size, i.e. the em square in pixels
    fn scale_for(&self, font_size: f32) -> PxScale {
        let units_per_em = self.font.units_per_em().unwrap_or(1000.0);
        PxScale::from(font_size * self.font.height_unscaled() / units_per_em)
    }

    /// Advance width and line height of `text` at `font_size`
    pub fn measure(&self, text: &str, font_size: f32) -> Vec2 {
        if text.is_empty() || !(font_size.is_finite() && font_size > 0.0) {
            return Vec2::ZERO;
        }
        let scaled = self.font.as_scaled(self.scale_for(font_size));
        let mut width = 0.0;
        let mut prev: Option<GlyphId> = None;
        for ch in text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(p) = prev {
                width += scaled.kern(p, id);
            }
            width += scaled.h_advance(id);
            prev = Some(id);
        }
        Vec2::new(width, scaled.ascent() - scaled.descent())
    }

    /// Quads for `text` centered on `center`, both horizontally and on the
    /// middle of the line box
    pub fn layout_centered(&mut self, text: &str, center: Vec2, font_size: f32) -> Vec<GlyphQuad> {
        let size = self.measure(text, font_size);
        if size == Vec2::ZERO {
            return Vec::new();
        }

        let scale = self.scale_for(font_size);
        let raster_px = scale.y.round().max(1.0) as u32;
        let ratio = scale.y / raster_px as f32;

        let font = self.font.clone();
        let scaled = font.as_scaled(scale);
        let baseline = center.y + (scaled.ascent() + scaled.descent()) * 0.5;
        let mut pen = center.x - size.x * 0.5;

        let mut quads = Vec::new();
        let mut prev: Option<GlyphId> = None;
        for ch in text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(p) = prev {
                pen += scaled.kern(p, id);
            }
            if let Some(glyph) = self.rasterize(id, raster_px) {
                let min = Vec2::new(pen, baseline) + glyph.offset * ratio;
                let extent = Vec2::new(glyph.width as f32, glyph.height as f32) * ratio;
                quads.push(GlyphQuad {
                    center: min + extent * 0.5,
                    half_size: extent * 0.5,
                    uv_min: [glyph.x as f32, glyph.y as f32],
                    uv_max: [(glyph.x + glyph.width) as f32, (glyph.y + glyph.height) as f32],
                });
            }
            pen += scaled.h_advance(id);
            prev = Some(id);
        }
        quads
    }

    /// Cached atlas slot for a glyph at `px`, rasterising it on first use
    fn rasterize(&mut self, id: GlyphId, px: u32) -> Option<CachedGlyph> {
        if let Some(cached) = self.glyphs.get(&(id, px)) {
            return *cached;
        }
        let glyph = id.with_scale_and_position(PxScale::from(px as f32), ab_glyph::point(0.0, 0.0));
        let cached = self.font.outline_glyph(glyph).and_then(|outlined| self.pack(&outlined));
        self.glyphs.insert((id, px), cached);
        cached
    }

    /// Copy a glyph's coverage into the next free slot
    fn pack(&mut self, outlined: &OutlinedGlyph) -> Option<CachedGlyph> {
        let bounds = outlined.px_bounds();
        let width = bounds.width().ceil() as u32;
        let height = bounds.height().ceil() as u32;
        if width == 0 || height == 0 {
            return None;
        }
        if width + 2 * PADDING > ATLAS_WIDTH {
            log::warn!("Glyph {}px wide does not fit the atlas", width);
            return None;
        }

        if self.cursor_x + width + PADDING > ATLAS_WIDTH {
            self.cursor_x = PADDING;
            self.cursor_y += self.row_height + PADDING;
            self.row_height = 0;
        }
        if self.cursor_y + height + PADDING > self.height && !self.grow(self.cursor_y + height + PADDING) {
            log::warn!("Glyph atlas full at {}x{}", ATLAS_WIDTH, self.height);
            return None;
        }

        let (x, y) = (self.cursor_x, self.cursor_y);
        let atlas_height = self.height;
        let pixels = &mut self.pixels;
        outlined.draw(|gx, gy, coverage| {
            let (px, py) = (x + gx, y + gy);
            if px < ATLAS_WIDTH && py < atlas_height {
                let index = (py * ATLAS_WIDTH + px) as usize;
                let value = (coverage.clamp(0.0, 1.0) * 255.0) as u8;
                pixels[index] = pixels[index].max(value);
            }
        });

        self.cursor_x += width + PADDING;
        self.row_height = self.row_height.max(height);
        self.dirty = true;

        Some(CachedGlyph {
            x,
            y,
            width,
            height,
            offset: Vec2::new(bounds.min.x, bounds.min.y),
        })
    }

    /// Double the height (at least to `needed`); false past the limit
    fn grow(&mut self, needed: u32) -> bool {
        let new_height = (self.height * 2).max(needed);
        if new_height > MAX_ATLAS_HEIGHT {
            return false;
        }
        log::debug!("Growing glyph atlas: {} -> {} rows", self.height, new_height);
        // Rows are contiguous, so growing appends empty rows at the bottom
        self.pixels.resize((ATLAS_WIDTH * new_height) as usize, 0);
        self.height = new_height;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atlas() -> GlyphAtlas {
        GlyphAtlas::embedded().unwrap()
    }

    fn bounds(quads: &[GlyphQuad]) -> (Vec2, Vec2) {
        let mut min = Vec2::new(f32::MAX, f32::MAX);
        let mut max = Vec2::new(f32::MIN, f32::MIN);
        for q in quads {
            let lo = q.center - q.half_size;
            let hi = q.center + q.half_size;
            min = Vec2::new(min.x.min(lo.x), min.y.min(lo.y));
            max = Vec2::new(max.x.max(hi.x), max.y.max(hi.y));
        }
        (min, max)
    }

    #[test]
    fn test_distinct_accented_labels_differ() {
        let mut atlas = atlas();
        let e = atlas.layout_centered("é", Vec2::ZERO, 40.0);
        let u = atlas.layout_centered("ü", Vec2::ZERO, 40.0);
        let sz = atlas.layout_centered("ß", Vec2::ZERO, 40.0);

        assert_eq!(e.len(), 1);
        assert_eq!(u.len(), 1);
        assert_ne!(e[0].uv_min, u[0].uv_min);
        assert_ne!(u[0].uv_min, sz[0].uv_min);
    }

    #[test]
    fn test_lowercase_is_its_own_glyph() {
        let mut atlas = atlas();
        let lower = atlas.layout_centered("a", Vec2::ZERO, 40.0);
        let upper = atlas.layout_centered("A", Vec2::ZERO, 40.0);
        assert_ne!(lower[0].uv_min, upper[0].uv_min);
        // Lowercase a is shorter than capital A
        assert!(lower[0].half_size.y < upper[0].half_size.y);
    }

    #[test]
    fn test_layout_is_centered() {
        let mut atlas = atlas();
        let center = Vec2::new(200.0, 100.0);
        let quads = atlas.layout_centered("HOH", center, 30.0);
        let (min, max) = bounds(&quads);
        let mid = (min + max) * 0.5;
        // Side bearings are small but not zero
        assert!((mid.x - center.x).abs() < 2.0, "mid.x = {}", mid.x);
        assert!((mid.y - center.y).abs() < 4.0, "mid.y = {}", mid.y);
    }

    #[test]
    fn test_glyphs_cached() {
        let mut atlas = atlas();
        atlas.layout_centered("Ball", Vec2::ZERO, 20.0);
        let count = atlas.glyph_count();
        atlas.mark_clean();

        atlas.layout_centered("Ball", Vec2::new(50.0, 50.0), 20.0);
        assert_eq!(atlas.glyph_count(), count);
        assert!(!atlas.is_dirty());

        atlas.layout_centered("Ball", Vec2::ZERO, 60.0);
        assert!(atlas.glyph_count() > count);
        assert!(atlas.is_dirty());
    }

    #[test]
    fn test_quads_scale_with_font_size() {
        let mut atlas = atlas();
        let small = atlas.layout_centered("M", Vec2::ZERO, 20.0);
        let large = atlas.layout_centered("M", Vec2::ZERO, 40.0);
        let ratio = large[0].half_size.y / small[0].half_size.y;
        assert!((ratio - 2.0).abs() < 0.2, "ratio = {}", ratio);
    }

    #[test]
    fn test_spaces_advance_without_quads() {
        let mut atlas = atlas();
        assert!(atlas.layout_centered("   ", Vec2::ZERO, 20.0).is_empty());
        assert!(atlas.measure("A B", 20.0).x > atlas.measure("AB", 20.0).x);
    }

    #[test]
    fn test_degenerate_input() {
        let mut atlas = atlas();
        assert!(atlas.layout_centered("", Vec2::ZERO, 20.0).is_empty());
        assert!(atlas.layout_centered("A", Vec2::ZERO, 0.0).is_empty());
        assert!(atlas.layout_centered("A", Vec2::ZERO, f32::NAN).is_empty());
        assert_eq!(atlas.measure("", 20.0), Vec2::ZERO);
    }

    #[test]
    fn test_atlas_grows() {
        let mut atlas = atlas();
        let text: String = ('A'..='Z').chain('a'..='z').collect();
        for size in [80.0, 90.0, 100.0, 110.0] {
            atlas.layout_centered(&text, Vec2::ZERO, size);
        }
        assert!(atlas.height() > INITIAL_HEIGHT);
        assert!(atlas.height() <= MAX_ATLAS_HEIGHT);
        assert_eq!(atlas.pixels().len(), (atlas.width() * atlas.height()) as usize);
        assert!(atlas.pixels().iter().any(|&p| p > 0));
    }

    #[test]
    fn test_invalid_font_bytes() {
        let result = GlyphAtlas::from_bytes(vec![0, 1, 2, 3]);
        assert!(matches!(result, Err(FontError::Invalid(_))));
    }

    #[test]
    fn test_missing_font_file() {
        let result = GlyphAtlas::from_file("/definitely/not/a/font.ttf");
        assert!(matches!(result, Err(FontError::Io(_))));
    }
}
