//! Control intent.
//!
//! The game's input layer writes a horizontal axis and a jump level into this
//! component every presentation tick; the controller turns the level into an
//! edge-triggered, single-delivery latch consumed by the simulation tick.
//! The latch is the only state shared across the two tick rates: it must not
//! drop an edge when the presentation tick outpaces the simulation tick, and
//! must not double-fire when the simulation tick runs twice between samples.

use bevy::prelude::*;

/// Rising-edge detector: true exactly when the level goes false -> true.
#[inline]
pub fn rising_edge(previous: bool, current: bool) -> bool {
    !previous && current
}

/// Per-character input state sampled by the game and consumed by the
/// controller systems.
#[derive(Component, Reflect, Debug, Clone, Default)]
#[reflect(Component)]
pub struct ControlIntent {
    /// Horizontal axis in [-1, 1].
    pub horizontal: f32,
    /// Current jump level as reported by the input layer.
    jump_pressed: bool,
    /// Previous presentation tick's level, for edge detection.
    jump_pressed_prev: bool,
    /// One-shot latch set on a rising edge, cleared when consumed.
    jump_latch: bool,
    /// One-shot respawn request (developer cheat).
    respawn_requested: bool,
}

impl ControlIntent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the horizontal axis, clamped to [-1, 1].
    pub fn set_horizontal(&mut self, axis: f32) {
        self.horizontal = axis.clamp(-1.0, 1.0);
    }

    /// Set the jump level for this presentation tick. Works with any source
    /// of a boolean: keyboard, gamepad, AI.
    pub fn set_jump_pressed(&mut self, pressed: bool) {
        self.jump_pressed = pressed;
    }

    pub fn is_jump_pressed(&self) -> bool {
        self.jump_pressed
    }

    /// Run edge detection for this presentation tick. A rising edge sets the
    /// latch; an already-set latch is kept, never overwritten by a quiet tick.
    pub fn latch_edges(&mut self) {
        if rising_edge(self.jump_pressed_prev, self.jump_pressed) {
            self.jump_latch = true;
        }
        self.jump_pressed_prev = self.jump_pressed;
    }

    /// Consume the jump latch. Called once at the start of each simulation
    /// tick; returns true for exactly one consumption per rising edge.
    pub fn take_jump_latch(&mut self) -> bool {
        std::mem::take(&mut self.jump_latch)
    }

    /// Request a reset to the spawn point.
    pub fn request_respawn(&mut self) {
        self.respawn_requested = true;
    }

    /// Consume a pending respawn request.
    pub fn take_respawn_request(&mut self) -> bool {
        std::mem::take(&mut self.respawn_requested)
    }

    /// Clear all input state (used on respawn).
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rising_edge_truth_table() {
        assert!(!rising_edge(false, false));
        assert!(rising_edge(false, true));
        assert!(!rising_edge(true, true));
        assert!(!rising_edge(true, false));
    }

    #[test]
    fn horizontal_axis_is_clamped() {
        let mut intent = ControlIntent::new();
        intent.set_horizontal(2.5);
        assert_eq!(intent.horizontal, 1.0);
        intent.set_horizontal(-2.5);
        assert_eq!(intent.horizontal, -1.0);
        intent.set_horizontal(0.3);
        assert_eq!(intent.horizontal, 0.3);
    }

    #[test]
    fn latch_delivers_exactly_once_per_press() {
        let mut intent = ControlIntent::new();

        intent.set_jump_pressed(true);
        intent.latch_edges();
        assert!(intent.take_jump_latch());
        // Second consumption of the same press yields nothing.
        assert!(!intent.take_jump_latch());

        // Held level produces no further edges.
        intent.latch_edges();
        assert!(!intent.take_jump_latch());

        // Release and press again: a new edge.
        intent.set_jump_pressed(false);
        intent.latch_edges();
        intent.set_jump_pressed(true);
        intent.latch_edges();
        assert!(intent.take_jump_latch());
    }

    #[test]
    fn latch_survives_extra_presentation_ticks() {
        // Presentation running faster than simulation: the edge is latched on
        // one tick and must still be there after several quiet ticks.
        let mut intent = ControlIntent::new();
        intent.set_jump_pressed(true);
        intent.latch_edges();
        intent.set_jump_pressed(false);
        intent.latch_edges();
        intent.latch_edges();
        assert!(intent.take_jump_latch());
        assert!(!intent.take_jump_latch());
    }

    #[test]
    fn respawn_request_is_one_shot() {
        let mut intent = ControlIntent::new();
        assert!(!intent.take_respawn_request());
        intent.request_respawn();
        assert!(intent.take_respawn_request());
        assert!(!intent.take_respawn_request());
    }

    #[test]
    fn clear_resets_everything() {
        let mut intent = ControlIntent::new();
        intent.set_horizontal(1.0);
        intent.set_jump_pressed(true);
        intent.latch_edges();
        intent.request_respawn();

        intent.clear();
        assert_eq!(intent.horizontal, 0.0);
        assert!(!intent.take_jump_latch());
        assert!(!intent.take_respawn_request());
    }
}
