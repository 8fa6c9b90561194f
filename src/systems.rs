//! Core controller systems.
//!
//! Simulation-tick systems run in `FixedUpdate`: the backend's sensing pass
//! first, then gravity adaptation, locomotion and the jump sequencer, all
//! mutating the character's owned state block and rigid body. Presentation
//! systems run in `Update` and only derive visuals from that state.

use bevy::prelude::*;

use crate::backend::PhysicsBackend;
use crate::config::WheelConfig;
use crate::contact::Contact;
use crate::controller::WheelController;
use crate::intent::ControlIntent;
use crate::jump::JumpPhase;
use crate::locomotion;
use crate::presentation::{
    body_transform, emission_rate, emitter_rotation, lean_degrees, update_facing, BodyVisual,
    DustEmitter, Facing, VisualRig,
};
use crate::sensor;
use crate::slope::{self, GroundState};
use crate::windup::{WindupPose, WindupSequence};

/// Forward-biased half-circle arc for the jump re-sense, degrees CCW from
/// world +X. Centered on the current facing so the launch reads the terrain
/// the character is leaning toward.
pub fn forward_arc(facing: Facing) -> (f32, f32) {
    match facing {
        Facing::Right => (-90.0, 90.0),
        Facing::Left => (90.0, 270.0),
    }
}

/// Run one full sensing pass for a character: the full-ring probe, slope
/// resolution, and (when the windup has reached its midpoint) the
/// forward-arc re-sense for the jump sequencer.
///
/// Backend sensing systems call this with their engine's raycast; the
/// closure returns the nearest terrain contact for one probe ray, or `None`.
pub fn run_sensing_pass<F>(
    controller: &mut WheelController,
    config: &WheelConfig,
    windup: Option<&WindupSequence>,
    position: Vec2,
    mut raycast: F,
) where
    F: FnMut(Vec2, Vec2, f32) -> Option<Contact>,
{
    controller.contacts = sensor::sense(
        position,
        config.probe_count,
        config.probe_range,
        0.0,
        360.0,
        &mut raycast,
    );
    controller.ground = slope::resolve(&controller.contacts, config.max_walkable_angle);

    if controller.jump.wants_resense() {
        let midpoint_reached = windup
            .map(|w| w.fraction() >= config.midpoint_fraction)
            .unwrap_or(false);
        if midpoint_reached {
            let (arc_start, arc_end) = forward_arc(controller.facing);
            let contacts = sensor::sense(
                position,
                config.probe_count,
                config.resense_range(),
                arc_start,
                arc_end,
                &mut raycast,
            );
            controller.jump.deliver_resense(contacts);
        }
    }
}

/// Zero engine gravity while grounded so the slope tangent alone carries the
/// vertical component; restore it while airborne.
pub fn apply_gravity_scale<B: PhysicsBackend>(world: &mut World) {
    let entities: Vec<(Entity, bool)> = world
        .query::<(Entity, &WheelController)>()
        .iter(world)
        .map(|(entity, controller)| (entity, controller.is_grounded()))
        .collect();

    for (entity, grounded) in entities {
        B::set_gravity_scale(world, entity, if grounded { 0.0 } else { 1.0 });
    }
}

/// Evaluate the locomotion model and write the resulting velocity.
///
/// While the jump sequencer is in `Launched` the grounded branch is
/// suppressed: re-projecting the velocity onto the tangent on the step after
/// the impulse would cancel the launch before the character clears the probe
/// range.
pub fn apply_locomotion<B: PhysicsBackend>(world: &mut World) {
    let dt = B::get_fixed_timestep(world);

    let entities: Vec<(Entity, WheelConfig, GroundState, JumpPhase, f32)> = world
        .query::<(Entity, &WheelConfig, &WheelController, &ControlIntent)>()
        .iter(world)
        .map(|(entity, config, controller, intent)| {
            (
                entity,
                *config,
                controller.ground,
                controller.jump.phase,
                intent.horizontal,
            )
        })
        .collect();

    for (entity, config, ground, phase, horizontal) in entities {
        let ground = if phase == JumpPhase::Launched {
            GroundState::default()
        } else {
            ground
        };
        let velocity = B::get_velocity(world, entity);
        let new_velocity = locomotion::step(&ground, horizontal, velocity, &config, dt);
        B::set_velocity(world, entity, new_velocity);
    }
}

/// Advance the jump state machine by one simulation step.
///
/// The jump latch is consumed exactly once at the start of the step; an edge
/// arriving while the sequencer is not idle is discarded (no windup
/// stacking). Launch impulses fire on the step after the midpoint re-sense
/// decided the direction.
pub fn drive_jump_sequencer<B: PhysicsBackend>(world: &mut World) {
    let entities: Vec<Entity> = world
        .query_filtered::<Entity, (With<WheelController>, With<WheelConfig>, With<ControlIntent>)>()
        .iter(world)
        .collect();

    for entity in entities {
        let edge = world
            .get_mut::<ControlIntent>(entity)
            .map(|mut intent| intent.take_jump_latch())
            .unwrap_or(false);

        let Some(config) = world.get::<WheelConfig>(entity).copied() else {
            continue;
        };
        let windup_finished = world
            .get::<WindupSequence>(entity)
            .map(|w| w.finished())
            .unwrap_or(true);

        let Some(phase) = world
            .get::<WheelController>(entity)
            .map(|c| c.jump.phase)
        else {
            continue;
        };

        match phase {
            JumpPhase::Idle => {
                if edge {
                    if let Some(mut controller) = world.get_mut::<WheelController>(entity) {
                        controller.jump.accept_edge();
                    }
                    world.entity_mut(entity).insert(WindupSequence::jump(
                        config.windup_duration,
                        config.max_inflate_scale,
                        config.shift_distance,
                    ));
                }
            }
            JumpPhase::WindingUp => {
                if let Some(mut controller) = world.get_mut::<WheelController>(entity) {
                    if let Some(direction) = controller.jump.resolve_launch_direction() {
                        if direction.is_none() {
                            debug!("jump re-sense found no ground contact; launch whiffed");
                        }
                    }
                }
            }
            JumpPhase::WaitingForLaunch => {
                let launch = world
                    .get_mut::<WheelController>(entity)
                    .map(|mut controller| controller.jump.take_launch())
                    .unwrap_or(None);
                if let Some(direction) = launch {
                    B::apply_impulse(world, entity, direction * config.jump_force);
                }
            }
            JumpPhase::Launched => {
                if windup_finished {
                    if let Some(mut controller) = world.get_mut::<WheelController>(entity) {
                        controller.jump.finish_windup();
                    }
                }
            }
            JumpPhase::Resetting => {
                if let Some(mut controller) = world.get_mut::<WheelController>(entity) {
                    controller.jump.complete_reset();
                }
            }
        }
    }
}

/// Update facing and lean from the projected velocity (presentation tick).
pub fn update_orientation<B: PhysicsBackend>(world: &mut World) {
    let entities: Vec<(Entity, f32)> = world
        .query::<(Entity, &WheelConfig, &WheelController)>()
        .iter(world)
        .map(|(entity, config, _)| (entity, config.flip_threshold))
        .collect();

    for (entity, flip_threshold) in entities {
        let velocity = B::get_velocity(world, entity);
        if let Some(mut controller) = world.get_mut::<WheelController>(entity) {
            let projected = velocity.dot(controller.ground.move_direction);
            controller.facing = update_facing(controller.facing, projected, flip_threshold);
            controller.lean = lean_degrees(controller.ground.angle, controller.facing);
        }
    }
}

/// Validate configuration when it is added. Out-of-range values are a setup
/// error, not something the per-step systems recover from.
pub fn validate_new_configs(configs: Query<(Entity, &WheelConfig), Added<WheelConfig>>) {
    for (entity, config) in &configs {
        if let Err(error) = config.validate() {
            panic!("invalid WheelConfig on {entity}: {error}");
        }
    }
}

/// Run edge detection on every intent once per presentation tick.
pub fn latch_jump_edges(mut intents: Query<&mut ControlIntent>) {
    for mut intent in &mut intents {
        intent.latch_edges();
    }
}

/// Progress running windup sequences by presentation-tick time.
pub fn advance_windup(
    time: Res<Time>,
    mut sequences: Query<(&WheelController, &mut WindupSequence)>,
) {
    for (controller, mut sequence) in &mut sequences {
        if matches!(
            controller.jump.phase,
            JumpPhase::WindingUp | JumpPhase::WaitingForLaunch | JumpPhase::Launched
        ) {
            sequence.advance(time.delta_secs());
        }
    }
}

/// Compose the body visual transform from the windup pose, facing and lean.
pub fn drive_body_visual(
    characters: Query<(&WheelController, &VisualRig, Option<&WindupSequence>)>,
    mut bodies: Query<(&mut Transform, &BodyVisual)>,
) {
    for (controller, rig, windup) in &characters {
        let pose = match (controller.jump.phase, windup) {
            (
                JumpPhase::WindingUp | JumpPhase::WaitingForLaunch | JumpPhase::Launched,
                Some(sequence),
            ) => sequence.sample(),
            _ => WindupPose::REST,
        };

        if let Ok((mut transform, visual)) = bodies.get_mut(rig.body) {
            *transform = body_transform(
                visual.rest_translation,
                pose,
                controller.facing,
                controller.lean,
            );
        }
    }
}

/// Gate and position the dust emitter: emit only while grounded with
/// meaningful input, follow the bottom anchor, mirror the input direction.
pub fn update_dust_emitters(
    characters: Query<(&WheelController, &ControlIntent, &WheelConfig, &VisualRig)>,
    anchors: Query<&GlobalTransform>,
    mut emitters: Query<(&mut DustEmitter, &mut Transform)>,
) {
    for (controller, intent, config, rig) in &characters {
        let Some(emitter_entity) = rig.dust_emitter else {
            continue;
        };
        let Ok((mut emitter, mut transform)) = emitters.get_mut(emitter_entity) else {
            continue;
        };

        emitter.rate_over_time = emission_rate(
            controller.is_grounded(),
            intent.horizontal,
            config.min_input,
            emitter.base_rate,
        );

        if let Some(anchor) = rig.bottom_anchor {
            if let Ok(anchor_transform) = anchors.get(anchor) {
                transform.translation = anchor_transform.translation();
            }
        }
        if emitter.rate_over_time > 0.0 {
            transform.rotation = emitter_rotation(intent.horizontal, controller.lean);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_arc_faces_the_walk_direction() {
        let (start, end) = forward_arc(Facing::Right);
        // Right-facing arc spans the right half-circle through straight down.
        assert_eq!((start, end), (-90.0, 90.0));
        let (start, end) = forward_arc(Facing::Left);
        assert_eq!((start, end), (90.0, 270.0));
    }

    #[test]
    fn sensing_pass_resolves_ground_and_skips_resense_when_idle() {
        let mut controller = WheelController::new();
        let config = WheelConfig::default().with_probes(16, 1.0);
        let mut casts = 0;

        run_sensing_pass(
            &mut controller,
            &config,
            None,
            Vec2::new(0.0, 0.5),
            |from, dir, max| {
                casts += 1;
                if dir.y >= 0.0 {
                    return None;
                }
                let t = from.y / -dir.y;
                (t <= max).then(|| Contact::new(from + dir * t, Vec2::Y, t, None))
            },
        );

        // Only the full ring was cast, no re-sense while idle.
        assert_eq!(casts, 16);
        assert!(controller.is_grounded());
        assert!(controller.ground_angle().abs() < 1e-4);
    }

    #[test]
    fn sensing_pass_resenses_past_the_midpoint() {
        let mut controller = WheelController::new();
        let config = WheelConfig::default().with_probes(16, 1.0);
        controller.jump.accept_edge();

        let mut windup = WindupSequence::jump(
            config.windup_duration,
            config.max_inflate_scale,
            config.shift_distance,
        );
        windup.advance(config.windup_duration * 0.5);

        run_sensing_pass(
            &mut controller,
            &config,
            Some(&windup),
            Vec2::new(0.0, 0.5),
            |from, dir, max| {
                if dir.y >= 0.0 {
                    return None;
                }
                let t = from.y / -dir.y;
                (t <= max).then(|| Contact::new(from + dir * t, Vec2::Y, t, None))
            },
        );

        assert!(!controller.jump.wants_resense());
        let decided = controller.jump.resolve_launch_direction().unwrap();
        let direction = decided.unwrap();
        assert!((direction - Vec2::Y).length() < 1e-3);
    }

    #[test]
    fn sensing_pass_before_midpoint_does_not_resense() {
        let mut controller = WheelController::new();
        let config = WheelConfig::default().with_probes(8, 1.0);
        controller.jump.accept_edge();

        let mut windup = WindupSequence::jump(
            config.windup_duration,
            config.max_inflate_scale,
            config.shift_distance,
        );
        windup.advance(config.windup_duration * 0.25);

        run_sensing_pass(
            &mut controller,
            &config,
            Some(&windup),
            Vec2::new(0.0, 0.5),
            |_, _, _| None,
        );

        assert!(controller.jump.wants_resense());
    }
}
