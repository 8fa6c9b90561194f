//! # `wheel_character_controller`
//!
//! A 2D wheel-shaped character controller with physics backend abstraction.
//!
//! This crate provides a slope-aware rolling character that:
//! - Senses ground with a radial ring of raycast probes
//! - Picks the flattest contact and moves along its surface tangent
//! - Accelerates, brakes and fights gravity with slope-dependent rates
//! - Charges jumps through a squash-and-stretch windup, re-sensing the
//!   terrain at the windup midpoint to pick the launch direction
//! - Drives facing, lean and dust particles purely from simulation state
//! - Abstracts the physics backend for easy swapping (Rapier2D included)
//!
//! ## Architecture
//!
//! The controller treats the character as a **wheel**:
//! 1. A dynamic circular rigidbody handles collisions normally
//! 2. A full ring of probe rays finds every nearby surface each step
//! 3. The flattest walkable contact defines "the ground" and its tangent
//! 4. While grounded, engine gravity is disabled and the velocity is driven
//!    along the tangent; airborne the body simply falls, with no air control
//!
//! ## Usage
//!
//! ```rust
//! use bevy::prelude::*;
//! use wheel_character_controller::prelude::*;
//!
//! // Components for a player wheel
//! let controller = WheelController::new();
//! let config = WheelConfig::default();
//! let intent = ControlIntent::default();
//!
//! // These can be spawned as a bundle with physics components
//! ```

use bevy::prelude::*;

pub mod backend;
pub mod config;
pub mod contact;
pub mod controller;
pub mod intent;
pub mod jump;
pub mod locomotion;
pub mod platform;
pub mod presentation;
pub mod respawn;
pub mod sensor;
pub mod slope;
pub mod systems;
pub mod windup;

#[cfg(feature = "rapier2d")]
pub mod rapier;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::backend::PhysicsBackend;
    pub use crate::config::WheelConfig;
    pub use crate::contact::Contact;
    pub use crate::controller::WheelController;
    pub use crate::intent::ControlIntent;
    pub use crate::jump::JumpPhase;
    pub use crate::platform::OneWayPlatform;
    pub use crate::presentation::{BodyVisual, DustEmitter, Facing, VisualRig};
    pub use crate::respawn::SpawnPoint;
    pub use crate::slope::GroundState;
    pub use crate::windup::WindupSequence;
    pub use crate::{WheelControllerPlugin, WheelControllerSet};

    #[cfg(feature = "rapier2d")]
    pub use crate::rapier::{Rapier2dBackend, Rapier2dWheelBundle};
}

/// System sets for the fixed-tick half of the controller.
///
/// The backend plugin registers its sensing system in [`Sensors`]; the
/// generic action systems run afterwards in [`Actions`].
///
/// [`Sensors`]: WheelControllerSet::Sensors
/// [`Actions`]: WheelControllerSet::Actions
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WheelControllerSet {
    /// Probe the terrain and resolve the ground state.
    Sensors,
    /// Gravity adaptation, locomotion, jump sequencing, respawns.
    Actions,
}

/// Main plugin for the wheel character controller.
///
/// This plugin is generic over a physics backend `B` which provides the
/// actual physics operations (raycasting, velocity access, impulses).
///
/// # Type Parameters
/// - `B`: The physics backend implementation (e.g., `Rapier2dBackend`)
///
/// # Examples
///
/// With Rapier2D backend:
/// ```rust,no_run
/// use bevy::prelude::*;
/// use bevy_rapier2d::prelude::*;
/// use wheel_character_controller::prelude::*;
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
///     .add_plugins(WheelControllerPlugin::<Rapier2dBackend>::default())
///     .run();
/// ```
pub struct WheelControllerPlugin<B: backend::PhysicsBackend> {
    _marker: std::marker::PhantomData<B>,
}

impl<B: backend::PhysicsBackend> Default for WheelControllerPlugin<B> {
    fn default() -> Self {
        Self {
            _marker: std::marker::PhantomData,
        }
    }
}

impl<B: backend::PhysicsBackend> Plugin for WheelControllerPlugin<B> {
    fn build(&self, app: &mut App) {
        // Register core types
        app.register_type::<config::WheelConfig>();
        app.register_type::<controller::WheelController>();
        app.register_type::<intent::ControlIntent>();
        app.register_type::<jump::JumpPhase>();
        app.register_type::<platform::OneWayPlatform>();
        app.register_type::<presentation::BodyVisual>();
        app.register_type::<presentation::DustEmitter>();
        app.register_type::<presentation::Facing>();
        app.register_type::<respawn::SpawnPoint>();
        app.register_type::<slope::GroundState>();
        app.register_type::<windup::WindupSequence>();

        // Add the physics backend plugin
        app.add_plugins(B::plugin());

        app.configure_sets(
            FixedUpdate,
            (WheelControllerSet::Sensors, WheelControllerSet::Actions).chain(),
        );

        // Simulation systems in FixedUpdate for deterministic stepping
        app.add_systems(
            FixedUpdate,
            (
                systems::apply_gravity_scale::<B>,
                systems::apply_locomotion::<B>,
                systems::drive_jump_sequencer::<B>,
                respawn::apply_respawns::<B>,
                platform::update_one_way_platforms,
            )
                .chain()
                .in_set(WheelControllerSet::Actions),
        );

        // Presentation systems in Update, reading simulation state only
        app.add_systems(
            Update,
            (
                systems::validate_new_configs,
                systems::latch_jump_edges,
                systems::advance_windup,
                systems::update_orientation::<B>,
                systems::drive_body_visual,
                systems::update_dust_emitters,
            )
                .chain(),
        );
    }
}
