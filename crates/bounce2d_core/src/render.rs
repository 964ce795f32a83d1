//! Drawing surface abstraction
//!
//! The simulation only ever talks to a [`Renderer`]. The window front end
//! implements it on the GPU; tests use [`FrameRecorder`] to inspect what a
//! frame would draw.

use bounce2d_math::{Color, Vec2};

use crate::entity::Entity;

/// Color used for entity labels
pub const LABEL_COLOR: Color = Color::BLACK;

/// Font size of an entity's label
#[inline]
pub fn label_font_size(radius: f32) -> f32 {
    radius / 2.0
}

/// A 2D surface that can draw filled circles and centered text
pub trait Renderer {
    /// Wipe the whole surface
    fn clear(&mut self);

    /// Fill a circle
    fn draw_circle(&mut self, center: Vec2, radius: f32, fill: Color);

    /// Draw `text` centered horizontally and vertically on `center`
    fn draw_centered_text(&mut self, text: &str, center: Vec2, font_size: f32);
}

/// Draw one entity: its circle, then its label on top
pub fn draw_entity<R: Renderer + ?Sized>(renderer: &mut R, entity: &Entity) {
    renderer.draw_circle(entity.position, entity.radius(), entity.fill());
    draw_label(renderer, entity);
}

pub(crate) fn draw_label<R: Renderer + ?Sized>(renderer: &mut R, entity: &Entity) {
    if entity.label().is_empty() {
        return;
    }
    renderer.draw_centered_text(entity.label(), entity.position, label_font_size(entity.radius()));
}

/// A single recorded draw call
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear,
    Circle { center: Vec2, radius: f32, fill: Color },
    Text { text: String, center: Vec2, font_size: f32 },
}

/// Renderer that stores draw calls instead of executing them
#[derive(Clone, Debug, Default)]
pub struct FrameRecorder {
    commands: Vec<DrawCommand>,
}

impl FrameRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands recorded since the last [`take`](Self::take)
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Hand over the recorded commands and start a fresh list
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Number of circles recorded
    pub fn circle_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { .. }))
            .count()
    }
}

impl Renderer for FrameRecorder {
    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, fill: Color) {
        self.commands.push(DrawCommand::Circle { center, radius, fill });
    }

    fn draw_centered_text(&mut self, text: &str, center: Vec2, font_size: f32) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            center,
            font_size,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_entity_circle_then_label() {
        let entity = Entity::new(Vec2::new(10.0, 20.0), 8.0, "blue", "B");
        let mut recorder = FrameRecorder::new();

        draw_entity(&mut recorder, &entity);

        assert_eq!(
            recorder.commands(),
            &[
                DrawCommand::Circle {
                    center: Vec2::new(10.0, 20.0),
                    radius: 8.0,
                    fill: Color::rgb(0.0, 0.0, 1.0),
                },
                DrawCommand::Text {
                    text: "B".to_string(),
                    center: Vec2::new(10.0, 20.0),
                    font_size: 4.0,
                },
            ]
        );
    }

    #[test]
    fn test_empty_label_not_drawn() {
        let entity = Entity::new(Vec2::ZERO, 8.0, "blue", "");
        let mut recorder = FrameRecorder::new();
        draw_entity(&mut recorder, &entity);
        assert_eq!(recorder.commands().len(), 1);
    }

    #[test]
    fn test_take_resets() {
        let mut recorder = FrameRecorder::new();
        recorder.clear();
        assert_eq!(recorder.take(), vec![DrawCommand::Clear]);
        assert!(recorder.commands().is_empty());
    }
}
