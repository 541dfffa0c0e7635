//! Per-object movement and wall handling

use super::state::ArenaObject;
use crate::settings::ArenaConfig;

/// Advance position by velocity * dt (no clamping)
#[inline]
pub fn integrate(obj: &mut ArenaObject, dt: f64) {
    obj.pos += obj.vel * dt;
}

/// Clamp an object into the arena and reflect off the wall it reached.
///
/// A velocity component is only negated when it points into the wall, so an
/// object already moving away after a clamp is not reflected again.
/// Returns true if the object touched any wall.
pub fn reflect_walls(obj: &mut ArenaObject, arena: &ArenaConfig) -> bool {
    let hit_x = reflect_axis(&mut obj.pos.x, &mut obj.vel.x, obj.radius, arena.width);
    let hit_y = reflect_axis(&mut obj.pos.y, &mut obj.vel.y, obj.radius, arena.height);
    hit_x || hit_y
}

#[inline]
fn reflect_axis(pos: &mut f64, vel: &mut f64, radius: f64, extent: f64) -> bool {
    let lo = radius;
    let hi = extent - radius;
    if *pos < lo {
        *pos = lo;
        if *vel < 0.0 {
            *vel = -*vel;
        }
        true
    } else if *pos > hi {
        *pos = hi;
        if *vel > 0.0 {
            *vel = -*vel;
        }
        true
    } else {
        false
    }
}
