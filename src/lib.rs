//! Triad Arena - deterministic rock/paper/scissors arena engine
//!
//! Core modules:
//! - `sim`: Deterministic simulation (generation, physics, collisions, run driver)
//! - `settings`: Arena configuration
//! - `error`: Crate error type

pub mod error;
pub mod settings;
pub mod sim;

pub use error::{Error, Result};
pub use settings::ArenaConfig;

/// Engine configuration constants
pub mod consts {
    /// Nominal frame duration (60 Hz host loop)
    pub const FRAME_DT: f64 = 1.0 / 60.0;
    /// Frame delta is capped at this multiple of the nominal frame
    pub const MAX_DT_FACTOR: f64 = 3.0;
    /// Run time ceiling in seconds
    pub const TIME_CEILING: f64 = 60.0;

    /// Arena dimensions
    pub const ARENA_WIDTH: f64 = 800.0;
    pub const ARENA_HEIGHT: f64 = 600.0;

    /// Shared object radius
    pub const OBJECT_RADIUS: f64 = 15.0;
    /// Starting objects per kind
    pub const PER_KIND: u32 = 10;

    /// Initial speed range per velocity component (units/sec)
    pub const MIN_SPEED: f64 = 50.0;
    pub const MAX_SPEED: f64 = 150.0;

    /// Extra push applied on top of half the overlap when separating a pair
    pub const SEPARATION_EPSILON: f64 = 0.01;
    /// Offset applied along x when two centers coincide exactly
    pub const COINCIDENT_NUDGE: f64 = 0.5;

    /// Rejection sampling budget per placement
    pub const MAX_PLACEMENT_ATTEMPTS: u32 = 100;
}
