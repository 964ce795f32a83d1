//! GPU rendering system
//!
//! Owns the [`GpuRenderer`] and turns surface errors into something the
//! event loop can act on.

use std::sync::Arc;
use winit::window::Window;

use bounce2d_core::SimulationState;
use bounce2d_render::{GlyphAtlas, GpuRenderer, RenderContext};

use crate::config::RenderingConfig;

/// Render error types
#[derive(Debug)]
pub enum RenderError {
    /// Surface was lost or outdated; it has been reconfigured
    SurfaceLost,
    /// GPU out of memory
    OutOfMemory,
    /// Other surface or setup error
    Other(String),
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::SurfaceLost => write!(f, "Surface lost"),
            RenderError::OutOfMemory => write!(f, "Out of memory"),
            RenderError::Other(msg) => write!(f, "Render error: {}", msg),
        }
    }
}

impl std::error::Error for RenderError {}

impl From<wgpu::SurfaceError> for RenderError {
    fn from(e: wgpu::SurfaceError) -> Self {
        match e {
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => RenderError::SurfaceLost,
            wgpu::SurfaceError::OutOfMemory => RenderError::OutOfMemory,
            other => RenderError::Other(format!("{:?}", other)),
        }
    }
}

/// Glyph atlas for the configured label font
///
/// A font file that cannot be used is logged and replaced by the embedded
/// font.
fn load_glyph_atlas(config: &RenderingConfig) -> Result<GlyphAtlas, RenderError> {
    if let Some(path) = &config.font_path {
        match GlyphAtlas::from_file(path) {
            Ok(atlas) => {
                log::info!("Label font: {}", path.display());
                return Ok(atlas);
            }
            Err(e) => log::warn!("Cannot use font {}: {}. Using the embedded font.", path.display(), e),
        }
    }
    GlyphAtlas::embedded().map_err(|e| RenderError::Other(e.to_string()))
}

/// Manages GPU rendering
pub struct RenderSystem {
    renderer: GpuRenderer,
}

impl RenderSystem {
    /// Create render system from window and config
    pub fn new(window: Arc<Window>, config: &RenderingConfig, vsync: bool) -> Result<Self, RenderError> {
        let atlas = load_glyph_atlas(config)?;
        let context = pollster::block_on(RenderContext::with_vsync(window, vsync))
            .map_err(|e| RenderError::Other(e.to_string()))?;
        log::info!(
            "Render surface {}x{} ({:?})",
            context.size.width,
            context.size.height,
            context.config.format
        );

        Ok(Self {
            renderer: GpuRenderer::new(context, config.background(), config.label(), atlas),
        })
    }

    /// Handle window resize
    pub fn resize(&mut self, width: u32, height: u32) {
        self.renderer.resize(width, height);
    }

    /// Draw the simulation and present it
    ///
    /// A lost or outdated surface is reconfigured before the error is
    /// returned, so the next frame can try again.
    pub fn render_frame(&mut self, state: &SimulationState) -> Result<(), RenderError> {
        state.draw(&mut self.renderer);
        match self.renderer.present() {
            Ok(()) => Ok(()),
            Err(e) => {
                let err = RenderError::from(e);
                if matches!(err, RenderError::SurfaceLost) {
                    self.renderer.reconfigure();
                }
                Err(err)
            }
        }
    }
}
