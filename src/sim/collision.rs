//! Pairwise collision detection, dominance conversion and separation
//!
//! Every unordered pair is checked once per frame in index order. The exact
//! touching distance is deliberately not a collision so that two runtimes
//! agree on borderline contacts.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::state::{ArenaObject, Kind, dominant};
use crate::consts::{COINCIDENT_NUDGE, SEPARATION_EPSILON};

/// Kind change caused by a collision
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Conversion {
    /// Id of the object that lost and changed kind
    pub object: u32,
    /// Its kind after the collision (the winner's kind)
    pub new_kind: Kind,
}

/// One overlapping pair found during a frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollisionEvent {
    /// Per-run monotonic id
    pub id: u64,
    pub a: u32,
    pub b: u32,
    /// Midpoint of the two centers before separation
    pub point: DVec2,
    /// Run-elapsed seconds of the frame
    pub timestamp: f64,
    pub conversion: Option<Conversion>,
}

impl CollisionEvent {
    pub fn has_transformation(&self) -> bool {
        self.conversion.is_some()
    }

    pub fn new_kind(&self) -> Option<Kind> {
        self.conversion.map(|c| c.new_kind)
    }
}

/// Whether two circles overlap (touching exactly does not count)
#[inline]
pub fn circles_overlap(a_pos: DVec2, a_radius: f64, b_pos: DVec2, b_radius: f64) -> bool {
    a_pos.distance(b_pos) < a_radius + b_radius
}

/// Apply the dominance rule to a colliding pair, overwriting the loser's kind
pub fn convert_pair(a: &mut ArenaObject, b: &mut ArenaObject) -> Option<Conversion> {
    let winner = dominant(a.kind, b.kind)?;
    let loser = if a.kind == winner { b } else { a };
    loser.kind = winner;
    Some(Conversion {
        object: loser.id,
        new_kind: winner,
    })
}

/// Push an overlapping pair apart along the line between their centers
pub fn separate_pair(a: &mut ArenaObject, b: &mut ArenaObject) {
    let delta = b.pos - a.pos;
    let dist = delta.length();
    let overlap = a.radius + b.radius - dist;
    if overlap <= 0.0 {
        return;
    }
    if dist == 0.0 {
        // Coincident centers have no direction; use a fixed axis
        a.pos.x -= COINCIDENT_NUDGE;
        b.pos.x += COINCIDENT_NUDGE;
        return;
    }
    let push = delta / dist * (overlap / 2.0 + SEPARATION_EPSILON);
    a.pos -= push;
    b.pos += push;
}

/// Mutable borrows of two distinct objects, `i < j`
fn pair_mut(objects: &mut [ArenaObject], i: usize, j: usize) -> (&mut ArenaObject, &mut ArenaObject) {
    debug_assert!(i < j);
    let (head, tail) = objects.split_at_mut(j);
    (&mut head[i], &mut tail[0])
}

/// Resolve every overlapping pair for one frame.
///
/// Event ids are drawn from `next_event_id`, which the caller owns for the
/// whole run. Events are returned in pair order.
pub fn resolve_collisions(
    objects: &mut [ArenaObject],
    timestamp: f64,
    next_event_id: &mut u64,
) -> Vec<CollisionEvent> {
    let mut events = Vec::new();
    let n = objects.len();
    for i in 0..n {
        for j in (i + 1)..n {
            let (a, b) = pair_mut(objects, i, j);
            if !circles_overlap(a.pos, a.radius, b.pos, b.radius) {
                continue;
            }

            let point = (a.pos + b.pos) * 0.5;
            let conversion = convert_pair(a, b);
            separate_pair(a, b);

            events.push(CollisionEvent {
                id: *next_event_id,
                a: a.id,
                b: b.id,
                point,
                timestamp,
                conversion,
            });
            *next_event_id += 1;
        }
    }
    events
}
