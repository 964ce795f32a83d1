//! Drawable, movable circles

use bounce2d_math::{Color, Vec2};

use crate::record::EntityRecord;

/// One circle on screen
///
/// Radius, color and label are fixed at creation. Position and vertical
/// velocity change every frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    /// Center of the circle in screen coordinates
    pub position: Vec2,
    /// Used only by the gravity strategy
    pub vertical_velocity: f32,
    radius: f32,
    color: String,
    fill: Color,
    label: String,
}

impl Entity {
    /// Create an entity at rest
    ///
    /// An unparseable color string falls back to [`Color::FALLBACK`] and is
    /// logged.
    pub fn new(position: Vec2, radius: f32, color: impl Into<String>, label: impl Into<String>) -> Self {
        let color = color.into();
        let fill = match Color::parse(&color) {
            Ok(fill) => fill,
            Err(e) => {
                log::warn!("Unknown color {:?} ({}), using gray", color, e);
                Color::FALLBACK
            }
        };

        Self {
            position,
            vertical_velocity: 0.0,
            radius,
            color,
            fill,
            label: label.into(),
        }
    }

    /// Create an entity from a validated CSV record
    pub fn from_record(record: &EntityRecord) -> Self {
        Self::new(
            Vec2::new(record.x, record.y),
            record.radius,
            record.color.clone(),
            record.label.clone(),
        )
    }

    /// The record this entity currently corresponds to
    pub fn to_record(&self) -> EntityRecord {
        EntityRecord {
            x: self.position.x,
            y: self.position.y,
            radius: self.radius,
            color: self.color.clone(),
            label: self.label.clone(),
        }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// The color string as written in the file
    #[inline]
    pub fn color(&self) -> &str {
        &self.color
    }

    /// The parsed fill color
    #[inline]
    pub fn fill(&self) -> Color {
        self.fill
    }

    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_record() {
        let record = EntityRecord {
            x: 100.0,
            y: 50.0,
            radius: 20.0,
            color: "#ff0000".to_string(),
            label: "A".to_string(),
        };
        let entity = Entity::from_record(&record);

        assert_eq!(entity.position, Vec2::new(100.0, 50.0));
        assert_eq!(entity.radius(), 20.0);
        assert_eq!(entity.color(), "#ff0000");
        assert_eq!(entity.fill(), Color::rgb(1.0, 0.0, 0.0));
        assert_eq!(entity.label(), "A");
        assert_eq!(entity.vertical_velocity, 0.0);
        assert_eq!(entity.to_record(), record);
    }

    #[test]
    fn test_unknown_color_falls_back() {
        let entity = Entity::new(Vec2::ZERO, 5.0, "not-a-color", "x");
        assert_eq!(entity.fill(), Color::FALLBACK);
        assert_eq!(entity.color(), "not-a-color");
    }
}
