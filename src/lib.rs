//! Pinball Sim - a tick-driven 2D pinball physics core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (geometry, entities, collisions, stepping)
//! - `layout`: Table descriptors and the built-in preset tables
//! - `settings`: Global tunables and presets
//! - `input`: Bounded key queue between keyboard capture and the stepper
//! - `frame`: Read-only render projection of the simulation
//! - `session`: Per-tick glue between queue, simulation and display

pub mod error;
pub mod frame;
pub mod input;
pub mod layout;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::ConfigError;
pub use frame::{Display, Frame};
pub use layout::Layout;
pub use session::Session;
pub use settings::{Preset, Tunables};

use serde::{Deserialize, Serialize};

/// Table configuration constants (classic pinball table)
pub mod consts {
    /// Table dimensions
    pub const TABLE_WIDTH: f32 = 800.0;
    pub const TABLE_HEIGHT: f32 = 800.0;

    /// Default friction coefficient (applied as sqrt per half-step)
    pub const FRICTION: f32 = 0.99;
    /// Default gravity increment per tick (applied halved per half-step)
    pub const GRAVITY: f32 = 0.1;
    /// Bumper restitution used by the built-in tables
    pub const BUMPER_MULTIPLIER: f32 = 2.0;
    /// Per-axis speed cap
    pub const MAX_SPEED: f32 = 15.0;
    /// Balls the player may launch
    pub const BALL_LIMIT: u32 = 10;

    /// Bumper boost applied while an actuator is extended
    pub const ACTUATOR_BOOST: f32 = 2.5;
    /// Uniform velocity jitter added after a segment bounce
    pub const LINE_JITTER: f32 = 0.5;

    /// Mass of fixed bodies. Large but finite so the mass sums never overflow.
    pub const FIXED_MASS: f32 = 1.0e30;

    /// Launch lane (top-left of the new ball's bounding box)
    pub const LAUNCH_X: f32 = TABLE_WIDTH - 75.0;
    pub const LAUNCH_Y: f32 = TABLE_HEIGHT - 450.0;
    pub const LAUNCH_SPEED: f32 = 12.0;
    pub const LAUNCH_DIAMETER: f32 = 40.0;

    /// Keys
    pub const SPAWN_KEY: char = 'z';
    pub const QUIT_KEY: char = 'q';

    /// Input queue capacity
    pub const INPUT_CAPACITY: usize = 16;
}

/// Opaque entity identifier, monotonically increasing in creation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
