//! Deterministic simulation module
//!
//! All outcome-relevant logic lives here. This module must be pure and deterministic:
//! - Host-supplied frame deltas only
//! - Seeded integer LCG only
//! - Stable iteration order (by object index)
//! - No rendering or platform dependencies

pub mod collision;
pub mod driver;
pub mod events;
pub mod generator;
pub mod motion;
pub mod state;
pub mod tick;

pub use collision::{CollisionEvent, Conversion, circles_overlap, resolve_collisions};
pub use driver::{RunSummary, Simulation, run_headless};
pub use events::{EventBus, ListenerId};
pub use generator::{ParkMiller, Placement, Seed, generate, generate_objects};
pub use motion::{integrate, reflect_walls};
pub use state::{ArenaObject, Kind, KindCounts, RunStatus, dominant};
pub use tick::{TickOutput, tick};
