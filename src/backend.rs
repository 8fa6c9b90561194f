//! Physics backend abstraction.
//!
//! The controller consumes a small slice of a 2D physics engine: raycasts
//! against terrain, velocity access, a one-shot impulse and a gravity scale.
//! Implement this trait to integrate an engine; the crate ships a Rapier2D
//! implementation behind the `rapier2d` feature.

use bevy::prelude::*;

/// Trait for physics backend implementations.
///
/// The backend's plugin is responsible for registering a sensing system in
/// [`crate::WheelControllerSet::Sensors`] that runs the probe pass via
/// [`crate::systems::run_sensing_pass`] with its engine's raycast.
pub trait PhysicsBackend: 'static + Send + Sync {
    /// Returns the plugin that sets up this backend.
    fn plugin() -> impl Plugin;

    /// Get the current linear velocity of an entity.
    fn get_velocity(world: &World, entity: Entity) -> Vec2;

    /// Set the linear velocity of an entity.
    fn set_velocity(world: &mut World, entity: Entity, velocity: Vec2);

    /// Apply an instantaneous impulse (velocity change scaled by mass).
    fn apply_impulse(world: &mut World, entity: Entity, impulse: Vec2);

    /// Set the per-body gravity scale (0 disables engine gravity).
    fn set_gravity_scale(world: &mut World, entity: Entity, scale: f32);

    /// Get the current world position of an entity.
    fn get_position(world: &World, entity: Entity) -> Vec2 {
        world
            .get::<GlobalTransform>(entity)
            .map(|t| t.translation().truncate())
            .or_else(|| {
                world
                    .get::<Transform>(entity)
                    .map(|t| t.translation.truncate())
            })
            .unwrap_or(Vec2::ZERO)
    }

    /// Get the fixed simulation timestep in seconds.
    fn get_fixed_timestep(world: &World) -> f32 {
        world
            .get_resource::<Time<Fixed>>()
            .map(|t| t.delta_secs())
            .filter(|&d| d > 0.0)
            .unwrap_or(1.0 / 60.0)
    }
}

/// Empty plugin for backends that need no additional setup.
pub struct NoOpBackendPlugin;

impl Plugin for NoOpBackendPlugin {
    fn build(&self, _app: &mut App) {}
}
