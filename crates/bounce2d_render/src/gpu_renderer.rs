//! Window renderer on top of wgpu

use bounce2d_core::{Color, Renderer, Vec2};

use crate::batch::{surface_color, ShapeBatch};
use crate::context::RenderContext;
use crate::font::GlyphAtlas;
use crate::pipeline::ShapePipeline;

/// Draws frames into a window surface
///
/// Draw calls go into a [`ShapeBatch`]; [`present`](Self::present) uploads
/// the batch and submits a single render pass.
pub struct GpuRenderer {
    context: RenderContext,
    pipeline: ShapePipeline,
    batch: ShapeBatch,
    background: Color,
}

impl GpuRenderer {
    pub fn new(context: RenderContext, background: Color, label_color: Color, atlas: GlyphAtlas) -> Self {
        let pipeline = ShapePipeline::new(&context.device, context.config.format);
        pipeline.update_screen(&context.queue, context.config.width, context.config.height);
        let batch = ShapeBatch::new(context.is_srgb(), atlas).with_label_color(label_color);

        Self {
            context,
            pipeline,
            batch,
            background,
        }
    }

    /// Handle window resize
    pub fn resize(&mut self, width: u32, height: u32) {
        self.context.resize(winit::dpi::PhysicalSize::new(width, height));
        self.pipeline
            .update_screen(&self.context.queue, self.context.config.width, self.context.config.height);
    }

    /// Reconfigure the surface after it was lost or became outdated
    pub fn reconfigure(&mut self) {
        self.context.reconfigure();
    }

    /// Draw everything queued since the last clear and show it
    pub fn present(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.context.surface.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let (instances, atlas) = self.batch.parts_mut();
        self.pipeline.upload_atlas(&self.context.device, &self.context.queue, atlas);
        self.pipeline
            .upload_instances(&self.context.device, &self.context.queue, instances);

        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Shape Encoder"),
            });

        let bg = surface_color(self.background, self.batch.linear_output());
        self.pipeline.render(
            &mut encoder,
            &view,
            wgpu::Color {
                r: bg[0] as f64,
                g: bg[1] as f64,
                b: bg[2] as f64,
                a: bg[3] as f64,
            },
        );

        self.context.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

impl Renderer for GpuRenderer {
    fn clear(&mut self) {
        self.batch.clear();
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, fill: Color) {
        self.batch.draw_circle(center, radius, fill);
    }

    fn draw_centered_text(&mut self, text: &str, center: Vec2, font_size: f32) {
        self.batch.draw_centered_text(text, center, font_size);
    }
}
