//! Slope resolution.
//!
//! Reduces a probe contact set to the single ground state used for grounding
//! decisions and movement direction.

use bevy::prelude::*;

use crate::contact::Contact;

/// Resolved ground state for one physics step.
///
/// Recomputed from scratch every step; the default is the airborne fallback.
#[derive(Reflect, Debug, Clone, Copy, PartialEq)]
pub struct GroundState {
    /// Whether the character stands on walkable ground.
    pub grounded: bool,
    /// Signed slope angle in degrees. Zero on flat ground; the sign follows
    /// the tilt of the authoritative contact normal (positive when the normal
    /// leans clockwise, i.e. the surface descends to the right).
    pub angle: f32,
    /// Unit tangent along the walking surface, oriented so positive
    /// horizontal input moves the character rightward along it.
    pub move_direction: Vec2,
}

impl Default for GroundState {
    fn default() -> Self {
        Self {
            grounded: false,
            angle: 0.0,
            move_direction: Vec2::X,
        }
    }
}

/// Signed angle in degrees between world-up and a surface normal.
///
/// Positive when the normal leans clockwise (toward +X).
pub fn signed_angle_from_up(normal: Vec2) -> f32 {
    normal.x.atan2(normal.y).to_degrees()
}

/// Tangent of a surface with the given normal, oriented rightward.
///
/// The normal rotated -90° so that flat ground (normal +Y) yields world-right.
pub fn surface_tangent(normal: Vec2) -> Vec2 {
    Vec2::new(normal.y, -normal.x)
}

/// Resolve a contact set into a [`GroundState`].
///
/// The authoritative contact is the one whose normal is closest to flat
/// (minimum absolute angle from world-up), not the closest point: a steep
/// wall contact must not win over nearby walkable floor just because it is
/// nearer. Ties keep the first contact in scan order, so repeated calls with
/// identical input stay deterministic.
///
/// An empty contact set or a minimal angle at or above `max_walkable_angle`
/// (exclusive boundary) resolves to the airborne fallback. The fallback
/// `move_direction` of world-right is intentional: the airborne locomotion
/// branch never reads it.
pub fn resolve(contacts: &[Contact], max_walkable_angle: f32) -> GroundState {
    let mut best: Option<(f32, Vec2)> = None;

    for contact in contacts {
        let angle = signed_angle_from_up(contact.normal);
        match best {
            Some((current, _)) if angle.abs() >= current.abs() => {}
            _ => best = Some((angle, contact.normal)),
        }
    }

    match best {
        Some((angle, normal)) if angle.abs() < max_walkable_angle => GroundState {
            grounded: true,
            angle,
            move_direction: surface_tangent(normal).normalize_or_zero(),
        },
        _ => GroundState::default(),
    }
}
