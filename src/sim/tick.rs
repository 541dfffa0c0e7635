//! Single-frame physics pass
//!
//! Integration, wall reflection and collision resolution each run over the
//! whole object set before the next phase starts.

use super::collision::{CollisionEvent, resolve_collisions};
use super::motion::{integrate, reflect_walls};
use super::state::{ArenaObject, KindCounts};
use crate::settings::ArenaConfig;

/// What one physics pass produced
#[derive(Debug, Clone, Default)]
pub struct TickOutput {
    /// Collision events in pair order
    pub events: Vec<CollisionEvent>,
    /// Per-kind counts after resolution
    pub counts: KindCounts,
    /// Objects that touched a wall this frame
    pub wall_contacts: usize,
}

impl TickOutput {
    pub fn conversions(&self) -> usize {
        self.events.iter().filter(|e| e.has_transformation()).count()
    }
}

/// Advance every object by `dt` and resolve walls and collisions
pub fn tick(
    objects: &mut [ArenaObject],
    arena: &ArenaConfig,
    dt: f64,
    timestamp: f64,
    next_event_id: &mut u64,
) -> TickOutput {
    for obj in objects.iter_mut() {
        integrate(obj, dt);
    }

    let mut wall_contacts = 0;
    for obj in objects.iter_mut() {
        if reflect_walls(obj, arena) {
            wall_contacts += 1;
        }
    }

    let events = resolve_collisions(objects, timestamp, next_event_id);
    let counts = KindCounts::tally(objects);

    TickOutput {
        events,
        counts,
        wall_contacts,
    }
}
