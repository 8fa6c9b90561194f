//! Terrain contact data produced by the radial ground sensor.

use bevy::prelude::*;

/// A single terrain contact reported by one probe ray.
///
/// Contacts are transient: the sensor produces a fresh set every physics step
/// and nothing persists them across steps. The normal is unit-length and
/// points away from the terrain into open space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// World position of the hit point.
    pub point: Vec2,
    /// Surface normal at the hit point (unit length, away from terrain).
    pub normal: Vec2,
    /// Distance from the probe origin to the hit point.
    pub distance: f32,
    /// Terrain entity that was hit (if the backend reports one).
    pub entity: Option<Entity>,
}

impl Contact {
    /// Create a contact.
    pub fn new(point: Vec2, normal: Vec2, distance: f32, entity: Option<Entity>) -> Self {
        Self {
            point,
            normal,
            distance,
            entity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contact_new() {
        let contact = Contact::new(Vec2::new(3.0, -1.0), Vec2::Y, 1.5, None);
        assert_eq!(contact.point, Vec2::new(3.0, -1.0));
        assert_eq!(contact.normal, Vec2::Y);
        assert_eq!(contact.distance, 1.5);
        assert!(contact.entity.is_none());
    }

    #[test]
    fn contact_with_entity() {
        let entity = Entity::from_raw(7);
        let contact = Contact::new(Vec2::ZERO, Vec2::X, 0.5, Some(entity));
        assert_eq!(contact.entity, Some(entity));
    }
}
