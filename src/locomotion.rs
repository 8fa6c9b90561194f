//! Slope-aware locomotion model.
//!
//! Pure velocity update evaluated once per fixed physics step. Grounded
//! movement lives entirely along the resolved ground tangent; the tangent
//! itself carries the vertical component on slopes, nothing is added
//! separately. Airborne movement leaves the horizontal component untouched
//! (no air control) and only clamps the fall speed.

use bevy::prelude::*;

use crate::config::WheelConfig;
use crate::slope::GroundState;

/// Speeds within this of zero snap to exactly zero when decelerating, so the
/// character never oscillates around rest.
pub const SPEED_EPSILON: f32 = 1e-3;

/// Compute the new velocity from the resolved ground state, the horizontal
/// input in [-1, 1] and the previous velocity.
pub fn step(
    ground: &GroundState,
    horizontal_input: f32,
    velocity: Vec2,
    config: &WheelConfig,
    dt: f32,
) -> Vec2 {
    if !ground.grounded {
        // Airborne: clamp the fall speed, keep horizontal drift as-is.
        return Vec2::new(velocity.x, velocity.y.max(-config.max_falling_speed));
    }

    let projected = velocity.dot(ground.move_direction);
    let new_speed = if horizontal_input.abs() > config.min_input {
        accelerate(projected, horizontal_input, ground.angle, config, dt)
    } else {
        decelerate(projected, config.slow_per_second * dt)
    };

    ground.move_direction * new_speed
}

/// Accelerate toward the input-scaled target speed, honoring reversal braking
/// and the slope coefficient.
fn accelerate(projected: f32, input: f32, ground_angle: f32, config: &WheelConfig, dt: f32) -> f32 {
    let target_speed = input.abs() * config.max_speed;

    let mut rate = config.acceleration_per_second;
    if projected != 0.0 && input.signum() != projected.signum() {
        // Reversing: brake at least as hard as we accelerate.
        rate = config.slow_per_second.max(config.acceleration_per_second);
    }

    // Climbing when the input sign opposes the slope sign: resistance shrinks
    // the step toward zero at the walkable limit. Walking downhill (or on
    // flat ground) the coefficient is >= 1 and assists.
    let limit = config.max_walkable_angle;
    let coefficient = if input * ground_angle < 0.0 {
        (limit - ground_angle.abs()) / limit
    } else {
        (limit + ground_angle.abs()) / limit
    };

    (projected + dt * rate * coefficient * input).clamp(-target_speed, target_speed)
}

/// Decelerate toward zero without crossing it, snapping to exactly zero once
/// within [`SPEED_EPSILON`].
fn decelerate(projected: f32, step: f32) -> f32 {
    let slowed = if projected > 0.0 {
        (projected - step).max(0.0)
    } else {
        (projected + step).min(0.0)
    };

    if slowed.abs() < SPEED_EPSILON {
        0.0
    } else {
        slowed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slope::surface_tangent;

    const DT: f32 = 1.0 / 60.0;

    fn flat() -> GroundState {
        GroundState {
            grounded: true,
            angle: 0.0,
            move_direction: Vec2::X,
        }
    }

    fn airborne() -> GroundState {
        GroundState::default()
    }

    fn slope_deg(angle: f32) -> GroundState {
        let rad = angle.to_radians();
        let normal = Vec2::new(rad.sin(), rad.cos());
        GroundState {
            grounded: true,
            angle,
            move_direction: surface_tangent(normal),
        }
    }

    #[test]
    fn flat_ground_accelerates_monotonically_to_max_speed() {
        // Scenario A: full input held from rest. Projected speed rises by
        // acceleration * dt per step until clamped at max_speed.
        let config = WheelConfig::default();
        let ground = flat();
        let mut velocity = Vec2::ZERO;
        let mut previous = 0.0;

        for _ in 0..2000 {
            velocity = step(&ground, 1.0, velocity, &config, DT);
            let projected = velocity.dot(ground.move_direction);
            assert!(projected >= previous);
            assert!(projected <= config.max_speed + 1e-4);
            previous = projected;
        }
        assert!((previous - config.max_speed).abs() < 1e-3);
    }

    #[test]
    fn first_step_matches_acceleration_rate() {
        let config = WheelConfig::default();
        let velocity = step(&flat(), 1.0, Vec2::ZERO, &config, DT);
        let expected = config.acceleration_per_second * DT;
        assert!((velocity.x - expected).abs() < 1e-5);
        assert_eq!(velocity.y, 0.0);
    }

    #[test]
    fn speed_never_exceeds_input_scaled_target() {
        let config = WheelConfig::default();
        let ground = flat();
        for input in [0.25, 0.5, 1.0] {
            let mut velocity = Vec2::ZERO;
            for _ in 0..5000 {
                velocity = step(&ground, input, velocity, &config, DT);
                assert!(velocity.length() <= config.max_speed * input + 1e-4);
            }
        }
    }

    #[test]
    fn deadzone_input_decelerates_and_snaps_to_zero() {
        // Scenario D: projected speed -2 with sub-deadzone input converges to
        // exactly zero at slow_per_second and never turns positive.
        let config = WheelConfig::default();
        let ground = flat();
        let mut velocity = Vec2::new(-2.0, 0.0);
        let mut steps = 0;

        loop {
            let before = velocity.dot(ground.move_direction);
            velocity = step(&ground, 0.0, velocity, &config, DT);
            let after = velocity.dot(ground.move_direction);
            assert!(after >= before);
            assert!(after <= 0.0);
            steps += 1;
            if after == 0.0 {
                break;
            }
            assert!(steps < 10_000, "deceleration must converge");
        }

        // Once at rest it stays at rest.
        velocity = step(&ground, 0.0, velocity, &config, DT);
        assert_eq!(velocity, Vec2::ZERO);
    }

    #[test]
    fn deceleration_never_oscillates_from_positive_side() {
        let config = WheelConfig::default();
        let ground = flat();
        let mut velocity = Vec2::new(0.013, 0.0);
        for _ in 0..10 {
            velocity = step(&ground, 0.0, velocity, &config, DT);
            assert!(velocity.x >= 0.0);
        }
        assert_eq!(velocity.x, 0.0);
    }

    #[test]
    fn airborne_clamps_fall_speed_and_keeps_horizontal() {
        let config = WheelConfig::default();
        let velocity = step(
            &airborne(),
            1.0,
            Vec2::new(3.0, -100.0),
            &config,
            DT,
        );
        assert_eq!(velocity.x, 3.0);
        assert_eq!(velocity.y, -config.max_falling_speed);
    }

    #[test]
    fn airborne_preserves_upward_velocity() {
        let config = WheelConfig::default();
        let velocity = step(&airborne(), 0.0, Vec2::new(-1.0, 12.0), &config, DT);
        assert_eq!(velocity, Vec2::new(-1.0, 12.0));
    }

    #[test]
    fn reversal_brakes_at_least_as_fast_as_acceleration() {
        let mut config = WheelConfig::default();
        config.slow_per_second = 6.0; // harder braking than acceleration
        let ground = flat();

        let moving_right = Vec2::new(2.0, 0.0);
        let after = step(&ground, -1.0, moving_right, &config, DT);
        let expected = 2.0 - config.slow_per_second * DT;
        assert!((after.x - expected).abs() < 1e-4);
    }

    #[test]
    fn uphill_step_shrinks_with_slope() {
        let config = WheelConfig::default();
        // Surface rising to the right has a negative angle; moving right climbs.
        let ground = slope_deg(-20.0);
        let velocity = step(&ground, 1.0, Vec2::ZERO, &config, DT);
        let projected = velocity.dot(ground.move_direction);

        let expected_coefficient =
            (config.max_walkable_angle - 20.0) / config.max_walkable_angle;
        let expected = config.acceleration_per_second * expected_coefficient * DT;
        assert!((projected - expected).abs() < 1e-4);
    }

    #[test]
    fn downhill_step_grows_with_slope() {
        let config = WheelConfig::default();
        // Surface descending to the right has a positive angle; moving right descends.
        let ground = slope_deg(20.0);
        let velocity = step(&ground, 1.0, Vec2::ZERO, &config, DT);
        let projected = velocity.dot(ground.move_direction);

        let expected_coefficient =
            (config.max_walkable_angle + 20.0) / config.max_walkable_angle;
        let expected = config.acceleration_per_second * expected_coefficient * DT;
        assert!((projected - expected).abs() < 1e-4);
    }

    #[test]
    fn uphill_resistance_vanishes_at_walkable_limit() {
        let config = WheelConfig::default();
        let ground = slope_deg(-(config.max_walkable_angle - 1e-3));
        let velocity = step(&ground, 1.0, Vec2::ZERO, &config, DT);
        let projected = velocity.dot(ground.move_direction);
        assert!(projected.abs() < 1e-4);
    }

    #[test]
    fn grounded_velocity_lies_along_tangent() {
        let config = WheelConfig::default();
        let ground = slope_deg(15.0);
        let velocity = step(&ground, 1.0, Vec2::ZERO, &config, DT);
        let off_tangent = velocity - ground.move_direction * velocity.dot(ground.move_direction);
        assert!(off_tangent.length() < 1e-5);
    }
}
