//! Controller configuration.
//!
//! All parameters are read at spawn time and immutable afterwards. Out-of-range
//! values are a setup error caught by validation when the component is added,
//! never a per-step concern.

use bevy::prelude::*;
use thiserror::Error;

/// Configuration error raised by [`WheelConfig::validate`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f32 },
    #[error("probe_count must be at least 1")]
    NoProbes,
    #[error("max_walkable_angle must be in (0, 90) degrees, got {0}")]
    UnwalkableAngleLimit(f32),
    #[error("min_input must be in [0, 1), got {0}")]
    BadDeadzone(f32),
    #[error("midpoint_fraction must be in (0, 1), got {0}")]
    BadMidpoint(f32),
    #[error("max_inflate_scale must be at least 1, got {0}")]
    BadInflateScale(f32),
}

/// Immutable per-character parameters for the wheel controller.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct WheelConfig {
    // === Movement ===
    /// Maximum speed along the ground tangent (units/second).
    pub max_speed: f32,
    /// Acceleration while input is held (units/second^2).
    pub acceleration_per_second: f32,
    /// Deceleration with no input, and the braking floor when reversing
    /// (units/second^2).
    pub slow_per_second: f32,
    /// Steepest slope the character can stand on (degrees, exclusive).
    pub max_walkable_angle: f32,
    /// Horizontal input magnitudes at or below this are treated as no input.
    pub min_input: f32,
    /// Downward speed is clamped to this magnitude while airborne.
    pub max_falling_speed: f32,

    // === Ground sensing ===
    /// Number of probe rays in the full sensing ring.
    pub probe_count: usize,
    /// Probe ray length; roughly the wheel radius plus a small margin.
    pub probe_range: f32,

    // === Jump ===
    /// Impulse magnitude applied along the launch direction.
    pub jump_force: f32,
    /// Total duration of the windup sequence (seconds).
    pub windup_duration: f32,
    /// Fraction of the windup at which the ground is re-sensed (the visual
    /// scale peak).
    pub midpoint_fraction: f32,
    /// Peak uniform scale of the body visual during the windup.
    pub max_inflate_scale: f32,
    /// How far the body visual shifts toward the ground during the windup;
    /// also widens the re-sense probe range.
    pub shift_distance: f32,

    // === Presentation ===
    /// Projected speed beyond which the facing flips. Speeds inside the
    /// deadband keep the previous facing.
    pub flip_threshold: f32,
}

impl Default for WheelConfig {
    fn default() -> Self {
        let max_speed = 10.0;
        Self {
            max_speed,
            acceleration_per_second: 2.0,
            slow_per_second: 1.0,
            max_walkable_angle: 35.0,
            min_input: 0.05,
            max_falling_speed: 25.0,

            probe_count: 360,
            probe_range: 0.6,

            jump_force: 20.0,
            windup_duration: 0.2,
            midpoint_fraction: 0.5,
            max_inflate_scale: 2.0,
            shift_distance: 0.3,

            flip_threshold: max_speed / 8.0,
        }
    }
}

impl WheelConfig {
    /// Probe range for the mid-windup re-sense: body size at peak inflation
    /// plus the shift allowance.
    #[inline]
    pub fn resense_range(&self) -> f32 {
        self.probe_range * self.max_inflate_scale + self.shift_distance
    }

    /// Check every parameter range. Called automatically when the component
    /// is added; invalid configuration is a setup error.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positives = [
            ("max_speed", self.max_speed),
            ("acceleration_per_second", self.acceleration_per_second),
            ("slow_per_second", self.slow_per_second),
            ("max_falling_speed", self.max_falling_speed),
            ("probe_range", self.probe_range),
            ("jump_force", self.jump_force),
            ("windup_duration", self.windup_duration),
            ("shift_distance", self.shift_distance),
            ("flip_threshold", self.flip_threshold),
        ];
        for (name, value) in positives {
            if !(value > 0.0) || !value.is_finite() {
                return Err(ConfigError::NonPositive { name, value });
            }
        }
        if self.probe_count == 0 {
            return Err(ConfigError::NoProbes);
        }
        if !(self.max_walkable_angle > 0.0 && self.max_walkable_angle < 90.0) {
            return Err(ConfigError::UnwalkableAngleLimit(self.max_walkable_angle));
        }
        if !(0.0..1.0).contains(&self.min_input) {
            return Err(ConfigError::BadDeadzone(self.min_input));
        }
        if !(self.midpoint_fraction > 0.0 && self.midpoint_fraction < 1.0) {
            return Err(ConfigError::BadMidpoint(self.midpoint_fraction));
        }
        if self.max_inflate_scale < 1.0 {
            return Err(ConfigError::BadInflateScale(self.max_inflate_scale));
        }
        Ok(())
    }

    /// Builder: set movement parameters.
    pub fn with_movement(mut self, max_speed: f32, acceleration: f32, slow: f32) -> Self {
        self.max_speed = max_speed;
        self.acceleration_per_second = acceleration;
        self.slow_per_second = slow;
        self.flip_threshold = max_speed / 8.0;
        self
    }

    /// Builder: set the walkable angle limit (degrees).
    pub fn with_max_walkable_angle(mut self, degrees: f32) -> Self {
        self.max_walkable_angle = degrees;
        self
    }

    /// Builder: set the probe ring density and range.
    pub fn with_probes(mut self, count: usize, range: f32) -> Self {
        self.probe_count = count;
        self.probe_range = range;
        self
    }

    /// Builder: set jump force and windup duration.
    pub fn with_jump(mut self, force: f32, windup_duration: f32) -> Self {
        self.jump_force = force;
        self.windup_duration = windup_duration;
        self
    }

    /// Builder: set the airborne fall speed clamp.
    pub fn with_max_falling_speed(mut self, speed: f32) -> Self {
        self.max_falling_speed = speed;
        self
    }

    /// Builder: set the facing flip threshold.
    pub fn with_flip_threshold(mut self, threshold: f32) -> Self {
        self.flip_threshold = threshold;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(WheelConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_probe_count_is_rejected() {
        let config = WheelConfig {
            probe_count: 0,
            ..default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NoProbes));
    }

    #[test]
    fn negative_speed_is_rejected() {
        let config = WheelConfig::default().with_movement(-1.0, 2.0, 1.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive {
                name: "max_speed",
                ..
            })
        ));
    }

    #[test]
    fn angle_limit_must_stay_below_vertical() {
        let config = WheelConfig::default().with_max_walkable_angle(90.0);
        assert_eq!(
            config.validate(),
            Err(ConfigError::UnwalkableAngleLimit(90.0))
        );
    }

    #[test]
    fn deadzone_must_stay_below_full_input() {
        let config = WheelConfig {
            min_input: 1.0,
            ..default()
        };
        assert_eq!(config.validate(), Err(ConfigError::BadDeadzone(1.0)));
    }

    #[test]
    fn midpoint_must_be_interior() {
        let config = WheelConfig {
            midpoint_fraction: 1.0,
            ..default()
        };
        assert_eq!(config.validate(), Err(ConfigError::BadMidpoint(1.0)));
    }

    #[test]
    fn resense_range_covers_inflated_body_and_shift() {
        let config = WheelConfig::default();
        let expected = config.probe_range * config.max_inflate_scale + config.shift_distance;
        assert!((config.resense_range() - expected).abs() < 1e-6);
    }

    #[test]
    fn movement_builder_rescales_flip_threshold() {
        let config = WheelConfig::default().with_movement(16.0, 4.0, 2.0);
        assert_eq!(config.flip_threshold, 2.0);
    }
}
