//! Orientation and presentation state.
//!
//! Facing flip with hysteresis, visual lean, and the dust emitter gate. The
//! actual renderer and particle playback are external; this module only
//! computes the state they read.

use bevy::prelude::*;

use crate::windup::WindupPose;

/// Horizontal facing of the character visuals.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    #[default]
    Right,
    Left,
}

impl Facing {
    /// +1 for right, -1 for left.
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Facing::Right => 1.0,
            Facing::Left => -1.0,
        }
    }
}

/// Update the facing from the velocity projected onto the ground tangent.
///
/// Beyond +threshold the character faces right, beyond -threshold left, and
/// inside the deadband the previous facing is kept so near-zero speeds never
/// jitter the sprite.
pub fn update_facing(previous: Facing, projected_speed: f32, threshold: f32) -> Facing {
    if projected_speed > threshold {
        Facing::Right
    } else if projected_speed < -threshold {
        Facing::Left
    } else {
        previous
    }
}

/// Visual lean in degrees: the ground angle, sign-flipped when facing left so
/// the lean always reads as uphill/downhill from the viewer's side.
pub fn lean_degrees(ground_angle: f32, facing: Facing) -> f32 {
    match facing {
        Facing::Right => -ground_angle,
        Facing::Left => ground_angle,
    }
}

/// Dust emission rate: the configured rate while grounded with meaningful
/// input, zero otherwise.
pub fn emission_rate(grounded: bool, horizontal_input: f32, deadzone: f32, base_rate: f32) -> f32 {
    if grounded && horizontal_input.abs() > deadzone {
        base_rate
    } else {
        0.0
    }
}

/// Marker for the body visual entity the windup deformation and lean drive.
/// `rest_translation` is the local translation the windup offsets from.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct BodyVisual {
    pub rest_translation: Vec3,
}

/// Dust emitter state read by the game's particle integration.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct DustEmitter {
    /// Configured emission rate while walking.
    pub base_rate: f32,
    /// Current emission rate (zero while airborne or idle).
    pub rate_over_time: f32,
}

impl Default for DustEmitter {
    fn default() -> Self {
        Self {
            base_rate: 30.0,
            rate_over_time: 0.0,
        }
    }
}

/// Entity references to the character's visual parts.
///
/// `body` receives the windup deformation, facing mirror and lean;
/// `dust_emitter` is positioned at `bottom_anchor` and gated by ground
/// contact and input.
#[derive(Component, Debug, Clone, Copy)]
pub struct VisualRig {
    pub body: Entity,
    pub dust_emitter: Option<Entity>,
    pub bottom_anchor: Option<Entity>,
}

impl VisualRig {
    pub fn new(body: Entity) -> Self {
        Self {
            body,
            dust_emitter: None,
            bottom_anchor: None,
        }
    }

    pub fn with_dust(mut self, emitter: Entity, bottom_anchor: Entity) -> Self {
        self.dust_emitter = Some(emitter);
        self.bottom_anchor = Some(bottom_anchor);
        self
    }
}

/// Compose the body visual transform from windup pose, facing and lean.
pub fn body_transform(rest_translation: Vec3, pose: WindupPose, facing: Facing, lean: f32) -> Transform {
    Transform {
        translation: rest_translation + pose.offset.extend(0.0),
        rotation: Quat::from_rotation_z(lean.to_radians()),
        scale: Vec3::new(pose.scale * facing.sign(), pose.scale, 1.0),
    }
}

/// Rotation for the dust emitter: mirrored by the input direction, leaning
/// with the terrain.
pub fn emitter_rotation(horizontal_input: f32, lean: f32) -> Quat {
    let z = if horizontal_input < 0.0 {
        lean.abs()
    } else {
        -lean.abs()
    };
    let flip = if horizontal_input < 0.0 {
        Quat::from_rotation_y(std::f32::consts::PI)
    } else {
        Quat::IDENTITY
    };
    flip * Quat::from_rotation_z(z.to_radians())
}
