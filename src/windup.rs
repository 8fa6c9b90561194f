//! Windup sequence interpreter.
//!
//! The jump's anticipatory deformation is a chain of timed phases advanced by
//! elapsed presentation-tick time, never a blocking sleep. Each phase
//! interpolates the body visual's uniform scale and local offset; phase
//! boundaries are what the jump sequencer keys its transitions off.

use bevy::prelude::*;

/// Interpolation curve for one windup phase.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ease {
    #[default]
    Linear,
    /// Hermite smoothstep, eases both ends.
    SmoothStep,
}

impl Ease {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::SmoothStep => t * t * (3.0 - 2.0 * t),
        }
    }
}

/// One timed segment of the windup deformation.
#[derive(Reflect, Debug, Clone, Copy)]
pub struct WindupPhase {
    pub duration: f32,
    pub ease: Ease,
    /// Uniform body scale at the start and end of the phase.
    pub scale: (f32, f32),
    /// Body offset from its rest translation at the start and end.
    pub offset: (Vec2, Vec2),
}

/// Sampled visual pose: uniform scale and offset from the rest translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindupPose {
    pub scale: f32,
    pub offset: Vec2,
}

impl WindupPose {
    pub const REST: Self = Self {
        scale: 1.0,
        offset: Vec2::ZERO,
    };
}

/// A windup deformation in progress, advanced once per presentation tick.
#[derive(Component, Reflect, Debug, Clone)]
pub struct WindupSequence {
    phases: Vec<WindupPhase>,
    elapsed: f32,
    total: f32,
}

impl WindupSequence {
    /// Build a sequence from explicit phases.
    pub fn new(phases: Vec<WindupPhase>) -> Self {
        let total = phases.iter().map(|p| p.duration).sum();
        Self {
            phases,
            elapsed: 0.0,
            total,
        }
    }

    /// The standard four-phase jump windup: shift toward the ground, inflate,
    /// shift back, deflate. Equal quarters of `duration`.
    pub fn jump(duration: f32, max_inflate_scale: f32, shift_distance: f32) -> Self {
        let quarter = duration / 4.0;
        let shifted = Vec2::new(0.0, -shift_distance);
        Self::new(vec![
            WindupPhase {
                duration: quarter,
                ease: Ease::SmoothStep,
                scale: (1.0, 1.0),
                offset: (Vec2::ZERO, shifted),
            },
            WindupPhase {
                duration: quarter,
                ease: Ease::SmoothStep,
                scale: (1.0, max_inflate_scale),
                offset: (shifted, shifted),
            },
            WindupPhase {
                duration: quarter,
                ease: Ease::SmoothStep,
                scale: (max_inflate_scale, max_inflate_scale),
                offset: (shifted, Vec2::ZERO),
            },
            WindupPhase {
                duration: quarter,
                ease: Ease::SmoothStep,
                scale: (max_inflate_scale, 1.0),
                offset: (Vec2::ZERO, Vec2::ZERO),
            },
        ])
    }

    /// Restart from the beginning.
    pub fn restart(&mut self) {
        self.elapsed = 0.0;
    }

    /// Advance by one presentation tick's worth of time.
    pub fn advance(&mut self, dt: f32) {
        self.elapsed = (self.elapsed + dt).min(self.total);
    }

    /// Progress through the whole sequence in [0, 1].
    pub fn fraction(&self) -> f32 {
        if self.total <= 0.0 {
            1.0
        } else {
            self.elapsed / self.total
        }
    }

    pub fn finished(&self) -> bool {
        self.elapsed >= self.total
    }

    /// Sample the current pose.
    pub fn sample(&self) -> WindupPose {
        let mut remaining = self.elapsed;
        for phase in &self.phases {
            if remaining <= phase.duration || phase.duration <= 0.0 {
                let t = if phase.duration <= 0.0 {
                    1.0
                } else {
                    remaining / phase.duration
                };
                let eased = phase.ease.apply(t);
                return WindupPose {
                    scale: phase.scale.0 + (phase.scale.1 - phase.scale.0) * eased,
                    offset: phase.offset.0.lerp(phase.offset.1, eased),
                };
            }
            remaining -= phase.duration;
        }
        WindupPose::REST
    }
}
