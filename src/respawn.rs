//! Reset-to-spawn developer cheat.
//!
//! A one-shot request on the intent teleports the character back to its
//! spawn point with all motion and controller state cleared.

use bevy::prelude::*;

use crate::backend::PhysicsBackend;
use crate::controller::WheelController;
use crate::intent::ControlIntent;
use crate::windup::WindupSequence;

/// Where the character respawns.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct SpawnPoint(pub Vec2);

/// Consume pending respawn requests: zero the velocity, restore the spawn
/// transform and reset the controller and windup state.
pub fn apply_respawns<B: PhysicsBackend>(world: &mut World) {
    let entities: Vec<(Entity, Vec2)> = world
        .query::<(Entity, &SpawnPoint, &ControlIntent)>()
        .iter(world)
        .map(|(entity, spawn, _)| (entity, spawn.0))
        .collect();

    for (entity, spawn_pos) in entities {
        let requested = world
            .get_mut::<ControlIntent>(entity)
            .map(|mut intent| intent.take_respawn_request())
            .unwrap_or(false);
        if !requested {
            continue;
        }

        B::set_velocity(world, entity, Vec2::ZERO);

        if let Some(mut transform) = world.get_mut::<Transform>(entity) {
            transform.translation = spawn_pos.extend(transform.translation.z);
            transform.rotation = Quat::IDENTITY;
        }
        if let Some(mut controller) = world.get_mut::<WheelController>(entity) {
            controller.reset();
        }
        if let Some(mut intent) = world.get_mut::<ControlIntent>(entity) {
            intent.clear();
        }
        world.entity_mut(entity).remove::<WindupSequence>();

        debug!("respawned {entity} at {spawn_pos}");
    }
}
