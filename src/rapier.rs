//! Rapier2D physics backend.
//!
//! Enable with the `rapier2d` feature. Probe rays are cast through
//! `RapierContext`; velocity, impulse and gravity scale go through the
//! standard Rapier components. Terrain filtering piggybacks on the
//! character's own `CollisionGroups`: rays only see what the character's
//! collider would collide with, so putting terrain in its own group makes
//! every other category transparent to the sensor.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use crate::backend::PhysicsBackend;
use crate::config::WheelConfig;
use crate::contact::Contact;
use crate::controller::WheelController;
use crate::platform::OneWayPlatform;
use crate::systems::run_sensing_pass;
use crate::windup::WindupSequence;
use crate::WheelControllerSet;

/// Rapier2D backend for the wheel controller.
pub struct Rapier2dBackend;

impl PhysicsBackend for Rapier2dBackend {
    fn plugin() -> impl Plugin {
        Rapier2dBackendPlugin
    }

    fn get_velocity(world: &World, entity: Entity) -> Vec2 {
        world
            .get::<Velocity>(entity)
            .map(|v| v.linvel)
            .unwrap_or(Vec2::ZERO)
    }

    fn set_velocity(world: &mut World, entity: Entity, velocity: Vec2) {
        if let Some(mut vel) = world.get_mut::<Velocity>(entity) {
            vel.linvel = velocity;
        }
    }

    fn apply_impulse(world: &mut World, entity: Entity, impulse: Vec2) {
        if let Some(mut ext_impulse) = world.get_mut::<ExternalImpulse>(entity) {
            ext_impulse.impulse += impulse;
        } else if let Some(mut vel) = world.get_mut::<Velocity>(entity) {
            // No ExternalImpulse component: apply as a direct velocity change.
            vel.linvel += impulse;
        }
    }

    fn set_gravity_scale(world: &mut World, entity: Entity, scale: f32) {
        if let Some(mut gravity) = world.get_mut::<GravityScale>(entity) {
            if gravity.0 != scale {
                gravity.0 = scale;
            }
        }
    }
}

/// Plugin registering the Rapier-specific sensing and platform systems.
pub struct Rapier2dBackendPlugin;

impl Plugin for Rapier2dBackendPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            rapier_sense_ground.in_set(WheelControllerSet::Sensors),
        );
        app.add_systems(
            FixedUpdate,
            sync_platform_colliders.after(WheelControllerSet::Actions),
        );
    }
}

/// Physics components a wheel character needs on top of its collider.
#[derive(Bundle)]
pub struct Rapier2dWheelBundle {
    pub rigid_body: RigidBody,
    pub velocity: Velocity,
    pub external_impulse: ExternalImpulse,
    pub gravity_scale: GravityScale,
    pub locked_axes: LockedAxes,
}

impl Default for Rapier2dWheelBundle {
    fn default() -> Self {
        Self {
            rigid_body: RigidBody::Dynamic,
            velocity: Velocity::default(),
            external_impulse: ExternalImpulse::default(),
            gravity_scale: GravityScale(1.0),
            locked_axes: LockedAxes::empty(),
        }
    }
}

impl Rapier2dWheelBundle {
    /// Bundle with rotation locked; the visual lean is driven by the
    /// presentation systems, not by the body spinning.
    pub fn rotation_locked() -> Self {
        Self {
            locked_axes: LockedAxes::ROTATION_LOCKED,
            ..Self::default()
        }
    }
}

/// Cast one probe ray against terrain.
fn rapier_probe(
    context: &RapierContext,
    origin: Vec2,
    direction: Vec2,
    max_distance: f32,
    exclude_entity: Entity,
    collision_groups: Option<CollisionGroups>,
) -> Option<Contact> {
    let mut filter = QueryFilter::default()
        .exclude_rigid_body(exclude_entity)
        .exclude_sensors();
    if let Some(groups) = collision_groups {
        filter = filter.groups(groups);
    }

    context
        .cast_ray_and_get_normal(origin, direction, max_distance, true, filter)
        .map(|(hit_entity, intersection)| {
            Contact::new(
                intersection.point,
                intersection.normal,
                intersection.time_of_impact,
                Some(hit_entity),
            )
        })
}

/// Run the sensing pass for every wheel character through Rapier raycasts.
fn rapier_sense_ground(
    contexts: Query<&RapierContext>,
    mut q_characters: Query<(
        Entity,
        &GlobalTransform,
        &WheelConfig,
        Option<&WindupSequence>,
        Option<&CollisionGroups>,
        &mut WheelController,
    )>,
) {
    let Ok(context) = contexts.get_single() else {
        return;
    };

    for (entity, transform, config, windup, collision_groups, mut controller) in &mut q_characters {
        let position = transform.translation().truncate();
        let groups = collision_groups.copied();

        run_sensing_pass(
            &mut controller,
            config,
            windup,
            position,
            |origin, direction, max_distance| {
                rapier_probe(context, origin, direction, max_distance, entity, groups)
            },
        );
    }
}

/// Mirror `OneWayPlatform::enabled` into Rapier's collider state.
fn sync_platform_colliders(
    mut commands: Commands,
    platforms: Query<(Entity, &OneWayPlatform, Has<ColliderDisabled>)>,
) {
    for (entity, platform, disabled) in &platforms {
        if platform.enabled && disabled {
            commands.entity(entity).remove::<ColliderDisabled>();
        } else if !platform.enabled && !disabled {
            commands.entity(entity).insert(ColliderDisabled);
        }
    }
}
