//! One-way platform behavior.
//!
//! A platform's collider is solid only while the player's wheel sits above
//! it: enabled once the wheel center clears the platform top by `top_offset`,
//! disabled again once it drops `bottom_offset` below. The band between the
//! two offsets is hysteresis so the collider does not flicker while the
//! wheel rides exactly at the threshold.

use bevy::prelude::*;

use crate::config::WheelConfig;
use crate::controller::WheelController;

/// Marker and tuning for a one-way platform.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct OneWayPlatform {
    /// How far above the threshold the wheel must be to enable the collider.
    pub top_offset: f32,
    /// How far below the threshold the wheel must drop to disable it again.
    pub bottom_offset: f32,
    /// Whether the collider is currently solid. Synced to the physics
    /// backend by its plugin.
    pub enabled: bool,
}

impl Default for OneWayPlatform {
    fn default() -> Self {
        Self {
            top_offset: 0.05,
            bottom_offset: 0.5,
            enabled: false,
        }
    }
}

impl OneWayPlatform {
    pub fn new(top_offset: f32, bottom_offset: f32) -> Self {
        Self {
            top_offset,
            bottom_offset,
            enabled: false,
        }
    }
}

/// Decide the platform's solidity from the wheel's height.
///
/// `threshold` is the platform's top surface plus the wheel radius: the
/// height the wheel center sits at when resting on the platform.
pub fn platform_enabled(
    previous: bool,
    wheel_y: f32,
    threshold: f32,
    top_offset: f32,
    bottom_offset: f32,
) -> bool {
    if wheel_y >= threshold + top_offset {
        true
    } else if wheel_y <= threshold - bottom_offset {
        false
    } else {
        previous
    }
}

/// Toggle one-way platforms against the player wheel's current height.
///
/// Uses the first wheel character found; the controller owns exactly one
/// player character per world.
pub fn update_one_way_platforms(
    players: Query<(&GlobalTransform, &WheelConfig), With<WheelController>>,
    mut platforms: Query<(&GlobalTransform, &mut OneWayPlatform)>,
) {
    let Some((player_transform, config)) = players.iter().next() else {
        return;
    };
    let wheel_y = player_transform.translation().y;
    let wheel_radius = config.probe_range;

    for (platform_transform, mut platform) in &mut platforms {
        let threshold = platform_transform.translation().y + wheel_radius;
        let enabled = platform_enabled(
            platform.enabled,
            wheel_y,
            threshold,
            platform.top_offset,
            platform.bottom_offset,
        );
        // Avoid dirtying change detection when nothing moved across the band.
        if enabled != platform.enabled {
            platform.enabled = enabled;
        }
    }
}
