//! Point-in-circle hit testing

use bounce2d_math::Vec2;

use crate::entity::Entity;

/// Check whether `point` lies inside or on the edge of `entity`
#[inline]
pub fn is_inside(entity: &Entity, point: Vec2) -> bool {
    entity.position.distance_squared(point) <= entity.radius() * entity.radius()
}

/// Index of the entity under `point`
///
/// Entities are drawn in order, so when several overlap the last one (the
/// one drawn on top) is picked.
pub fn pick(entities: &[Entity], point: Vec2) -> Option<usize> {
    entities.iter().rposition(|entity| is_inside(entity, point))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn circle(x: f32, y: f32, r: f32) -> Entity {
        Entity::new(Vec2::new(x, y), r, "red", "")
    }

    #[test]
    fn test_center_is_inside() {
        assert!(is_inside(&circle(10.0, 10.0, 5.0), Vec2::new(10.0, 10.0)));
    }

    #[test]
    fn test_edge_is_inside() {
        assert!(is_inside(&circle(0.0, 0.0, 5.0), Vec2::new(5.0, 0.0)));
    }

    #[test]
    fn test_just_outside() {
        let entity = circle(0.0, 0.0, 5.0);
        assert!(!is_inside(&entity, Vec2::new(5.0 + 1e-3, 0.0)));
        assert!(!is_inside(&entity, Vec2::new(4.0, 4.0)));
    }

    #[test]
    fn test_pick_prefers_last_overlap() {
        let entities = vec![circle(0.0, 0.0, 10.0), circle(5.0, 0.0, 10.0), circle(100.0, 0.0, 1.0)];
        assert_eq!(pick(&entities, Vec2::new(3.0, 0.0)), Some(1));
        assert_eq!(pick(&entities, Vec2::new(-8.0, 0.0)), Some(0));
        assert_eq!(pick(&entities, Vec2::new(50.0, 50.0)), None);
    }

    #[test]
    fn test_pick_empty() {
        assert_eq!(pick(&[], Vec2::ZERO), None);
    }
}
