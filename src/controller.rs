//! The character's owned state block.
//!
//! One `WheelController` per character holds everything the simulation tick
//! mutates: the resolved ground state, the last probe contacts, the jump
//! sequencer and the presentation-facing outputs. The presentation tick only
//! reads from it, so the block stays exclusively owned by the simulation.

use bevy::prelude::*;

use crate::contact::Contact;
use crate::jump::JumpSequencer;
use crate::presentation::Facing;
use crate::slope::GroundState;

/// Central state component for a wheel character.
#[derive(Component, Reflect, Debug, Clone, Default)]
#[reflect(Component)]
pub struct WheelController {
    /// Ground state resolved from the last full-ring sense. Recomputed every
    /// simulation step; defaults to the airborne fallback.
    pub ground: GroundState,
    /// Contacts from the last full-ring sense (transient, replaced each step).
    #[reflect(ignore)]
    pub contacts: Vec<Contact>,
    /// Jump state machine.
    pub jump: JumpSequencer,
    /// Current facing, updated with hysteresis by the presentation driver.
    pub facing: Facing,
    /// Visual lean in degrees, derived from the ground angle and facing.
    pub lean: f32,
}

impl WheelController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the character stands on walkable ground.
    #[inline]
    pub fn is_grounded(&self) -> bool {
        self.ground.grounded
    }

    /// Signed slope angle of the authoritative contact, degrees.
    #[inline]
    pub fn ground_angle(&self) -> f32 {
        self.ground.angle
    }

    /// Unit tangent along the walking surface.
    #[inline]
    pub fn move_direction(&self) -> Vec2 {
        self.ground.move_direction
    }

    /// Reset everything except configuration (respawn).
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
