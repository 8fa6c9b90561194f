//! Jump sequencer.
//!
//! A small state machine that gates the windup animation, re-senses the
//! ground at the windup midpoint, and applies a single launch impulse on the
//! simulation step after the direction was decided. Deciding the direction
//! mid-windup lets the launch read the terrain at the moment of takeoff while
//! the impulse still lands on an exact simulation step.

use bevy::prelude::*;

use crate::contact::Contact;

/// Normals closer than this are treated as the same direction when
/// deduplicating re-sense results.
const NORMAL_EPSILON: f32 = 1e-4;

/// Phase of the jump sequence. Exactly one per character.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JumpPhase {
    /// Accepting jump edges.
    #[default]
    Idle,
    /// Windup animation running; waiting for the midpoint re-sense.
    WindingUp,
    /// Launch direction decided (or whiffed); impulse fires next step.
    WaitingForLaunch,
    /// Impulse applied (or whiffed); waiting for the windup to finish.
    Launched,
    /// Windup finished; visuals snap back to rest before accepting input again.
    Resetting,
}

/// Per-character jump state.
#[derive(Reflect, Debug, Clone, Default)]
pub struct JumpSequencer {
    pub phase: JumpPhase,
    /// Launch direction decided at the windup midpoint, consumed on the next
    /// simulation step. `None` while `WaitingForLaunch` means the re-sense
    /// found no ground and the jump whiffs.
    queued_launch: Option<Vec2>,
    /// Contacts from the midpoint re-sense, handed over by the sensing pass
    /// and consumed by the sequencer the same step.
    #[reflect(ignore)]
    pending_resense: Option<Vec<Contact>>,
}

impl JumpSequencer {
    /// Accept a jump edge. Returns true when a new windup starts; edges
    /// arriving outside `Idle` are ignored so windups never stack.
    pub fn accept_edge(&mut self) -> bool {
        if self.phase == JumpPhase::Idle {
            self.phase = JumpPhase::WindingUp;
            self.queued_launch = None;
            self.pending_resense = None;
            true
        } else {
            false
        }
    }

    /// Whether the sensing pass should run the forward-arc re-sense this step.
    pub fn wants_resense(&self) -> bool {
        self.phase == JumpPhase::WindingUp && self.pending_resense.is_none()
    }

    /// Hand over the midpoint re-sense contacts from the sensing pass.
    pub fn deliver_resense(&mut self, contacts: Vec<Contact>) {
        if self.phase == JumpPhase::WindingUp {
            self.pending_resense = Some(contacts);
        }
    }

    /// Consume a delivered re-sense: decide the launch direction and move to
    /// `WaitingForLaunch`. Returns the decided direction for logging.
    pub fn resolve_launch_direction(&mut self) -> Option<Option<Vec2>> {
        if self.phase != JumpPhase::WindingUp {
            return None;
        }
        let contacts = self.pending_resense.take()?;
        let direction = mean_distinct_normal(&contacts);
        self.queued_launch = direction;
        self.phase = JumpPhase::WaitingForLaunch;
        Some(direction)
    }

    /// Take the queued launch direction and move to `Launched`. Returns the
    /// direction to apply the impulse along, or `None` for a whiffed jump.
    pub fn take_launch(&mut self) -> Option<Vec2> {
        debug_assert_eq!(self.phase, JumpPhase::WaitingForLaunch);
        self.phase = JumpPhase::Launched;
        self.queued_launch.take()
    }

    /// Windup animation finished while `Launched`: begin resetting visuals.
    pub fn finish_windup(&mut self) {
        if self.phase == JumpPhase::Launched {
            self.phase = JumpPhase::Resetting;
        }
    }

    /// Visuals are back at rest: accept jump edges again.
    pub fn complete_reset(&mut self) {
        if self.phase == JumpPhase::Resetting {
            self.phase = JumpPhase::Idle;
        }
    }

    /// Reset the whole sequencer (respawn).
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Mean of the distinct contact normals, normalized.
///
/// Repeated identical normals count once, so a flat run of probes does not
/// drown out a single corner contact. Returns `None` for an empty contact set
/// or when the distinct normals cancel out; the caller treats that as a
/// whiffed jump, not an error.
pub fn mean_distinct_normal(contacts: &[Contact]) -> Option<Vec2> {
    let mut distinct: Vec<Vec2> = Vec::new();
    for contact in contacts {
        let known = distinct
            .iter()
            .any(|n| (*n - contact.normal).length_squared() < NORMAL_EPSILON * NORMAL_EPSILON);
        if !known {
            distinct.push(contact.normal);
        }
    }

    if distinct.is_empty() {
        return None;
    }

    let sum: Vec2 = distinct.iter().copied().sum();
    let mean = sum / distinct.len() as f32;
    let direction = mean.normalize_or_zero();
    (direction != Vec2::ZERO).then_some(direction)
}
