//! Seeded initial population
//!
//! The generator must agree bit-for-bit with any other runtime fed the same
//! seed, so it uses a Park-Miller minimal standard generator with all state
//! arithmetic done in integers. Every draw is a single state advance.

use std::fmt;
use std::str::FromStr;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::state::{ArenaObject, Kind};
use crate::consts::MAX_PLACEMENT_ATTEMPTS;
use crate::error::Error;
use crate::settings::ArenaConfig;

/// LCG modulus (2^31 - 1)
pub const LCG_MODULUS: u64 = 2_147_483_647;
/// LCG multiplier (7^5)
pub const LCG_MULTIPLIER: u64 = 16_807;
/// Resolution of the fraction derived from a state
const FRACTION_SCALE: u64 = 1_000_000;

/// Externally supplied run seed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Seed(pub u64);

impl Seed {
    /// Initial LCG state for this seed (never zero)
    pub fn initial_state(self) -> u64 {
        match self.0 % LCG_MODULUS {
            0 => LCG_MODULUS - 1,
            s => s,
        }
    }
}

impl From<u64> for Seed {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Seed {
    type Err = Error;

    /// Accepts decimal or `0x` hex of any length (e.g. a transaction hash).
    /// Values that do not fit in 64 bits are reduced modulo the LCG modulus,
    /// which leaves the initial state unchanged.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (digits, radix) = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(hex) => (hex, 16),
            None => (s, 10),
        };
        if digits.is_empty() {
            return Err(Error::InvalidSeed(format!("empty seed {s:?}")));
        }
        // `from_str_radix` would take a leading sign; the long-seed path would not
        if let Some(c) = digits.chars().find(|c| !c.is_digit(radix)) {
            return Err(Error::InvalidSeed(format!("unexpected digit {c:?} in {s:?}")));
        }
        if let Ok(v) = u64::from_str_radix(digits, radix) {
            return Ok(Seed(v));
        }
        let mut acc = 0u64;
        for c in digits.chars() {
            let d = c
                .to_digit(radix)
                .ok_or_else(|| Error::InvalidSeed(format!("unexpected digit {c:?} in {s:?}")))?;
            acc = (acc * radix as u64 + d as u64) % LCG_MODULUS;
        }
        Ok(Seed(acc))
    }
}

/// Park-Miller minimal standard generator: `state' = 16807 * state mod (2^31 - 1)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParkMiller {
    state: u64,
}

impl ParkMiller {
    pub fn new(seed: Seed) -> Self {
        Self {
            state: seed.initial_state(),
        }
    }

    /// Advance once and return the new state
    #[inline]
    pub fn advance(&mut self) -> u64 {
        self.state = (LCG_MULTIPLIER * self.state) % LCG_MODULUS;
        self.state
    }

    /// Advance once and map the state into [0, 1)
    #[inline]
    pub fn next_fraction(&mut self) -> f64 {
        fraction(self.advance())
    }

    /// Advance once and map into [min, max)
    #[inline]
    pub fn next_range(&mut self, min: f64, max: f64) -> f64 {
        min + (max - min) * self.next_fraction()
    }

    /// Advance once; magnitude in [min, max), sign from the parity of the same state
    #[inline]
    pub fn next_signed(&mut self, min: f64, max: f64) -> f64 {
        let state = self.advance();
        let magnitude = min + (max - min) * fraction(state);
        if state % 2 == 0 { magnitude } else { -magnitude }
    }
}

#[inline]
fn fraction(state: u64) -> f64 {
    (state % FRACTION_SCALE) as f64 / FRACTION_SCALE as f64
}

/// One generated starting object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub kind: Kind,
    pub pos: DVec2,
    pub vel: DVec2,
}

impl Placement {
    /// Materialize as an arena object with the given id
    pub fn to_object(&self, id: u32, radius: f64) -> ArenaObject {
        ArenaObject::new(id, self.kind, self.pos, self.vel, radius)
    }
}

/// Generate the ordered starting population for `seed`.
///
/// Kinds are filled rock, paper, scissors with `per_kind` slots each.
/// Positions are rejection-sampled against earlier placements; when the
/// attempt budget runs out the last candidate is kept even if it overlaps.
pub fn generate(seed: Seed, config: &ArenaConfig) -> Vec<Placement> {
    let mut rng = ParkMiller::new(seed);
    let r = config.object_radius;
    let min_dist_sq = (2.0 * r) * (2.0 * r);
    let mut placements: Vec<Placement> = Vec::with_capacity(config.population());
    let mut overlapped = 0usize;

    for kind in Kind::ALL {
        for _ in 0..config.per_kind {
            let mut pos = DVec2::ZERO;
            let mut clear = false;
            for _ in 0..MAX_PLACEMENT_ATTEMPTS {
                let x = rng.next_range(r, config.width - r);
                let y = rng.next_range(r, config.height - r);
                pos = DVec2::new(x, y);
                if !placements
                    .iter()
                    .any(|p| p.pos.distance_squared(pos) < min_dist_sq)
                {
                    clear = true;
                    break;
                }
            }
            if !clear {
                overlapped += 1;
                log::warn!(
                    "Placement {} ({}) overlaps after {} attempts; keeping last candidate",
                    placements.len(),
                    kind,
                    MAX_PLACEMENT_ATTEMPTS
                );
            }

            let vx = rng.next_signed(config.min_speed, config.max_speed);
            let vy = rng.next_signed(config.min_speed, config.max_speed);
            placements.push(Placement {
                kind,
                pos,
                vel: DVec2::new(vx, vy),
            });
        }
    }

    log::debug!(
        "Generated {} placements for seed {} ({} overlapping)",
        placements.len(),
        seed,
        overlapped
    );
    placements
}

/// Generate and materialize arena objects (ids follow generation order)
pub fn generate_objects(seed: Seed, config: &ArenaConfig) -> Vec<ArenaObject> {
    generate(seed, config)
        .iter()
        .enumerate()
        .map(|(i, p)| p.to_object(i as u32, config.object_radius))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_park_miller_reference_sequence() {
        // Classic minimal standard check: seed 1 -> 16807 -> 282475249 -> 1622650073
        let mut rng = ParkMiller::new(Seed(1));
        assert_eq!(rng.advance(), 16_807);
        assert_eq!(rng.advance(), 282_475_249);
        assert_eq!(rng.advance(), 1_622_650_073);
    }

    #[test]
    fn test_park_miller_10000th_value() {
        let mut rng = ParkMiller::new(Seed(1));
        let mut last = 0;
        for _ in 0..10_000 {
            last = rng.advance();
        }
        assert_eq!(last, 1_043_618_065);
    }

    #[test]
    fn test_zero_seed_is_normalized() {
        assert_eq!(Seed(0).initial_state(), LCG_MODULUS - 1);
        assert_eq!(Seed(LCG_MODULUS).initial_state(), LCG_MODULUS - 1);
        assert_eq!(Seed(LCG_MODULUS + 5).initial_state(), 5);
    }

    #[test]
    fn test_fraction_and_sign() {
        let mut rng = ParkMiller::new(Seed(1));
        // 16807 % 1e6 = 16807 -> 0.016807
        assert!((rng.next_fraction() - 0.016807).abs() < 1e-15);
        // 282475249 is odd -> negative; fraction 0.475249
        let v = rng.next_signed(50.0, 150.0);
        assert!((v + (50.0 + 100.0 * 0.475249)).abs() < 1e-9);
    }

    #[test]
    fn test_seed_parsing() {
        assert_eq!("12345".parse::<Seed>().unwrap(), Seed(12345));
        assert_eq!("0xff".parse::<Seed>().unwrap(), Seed(255));
        assert_eq!(" 0XFF ".parse::<Seed>().unwrap(), Seed(255));
        assert!("".parse::<Seed>().is_err());
        assert!("0x".parse::<Seed>().is_err());
        assert!("12a".parse::<Seed>().is_err());
    }

    #[test]
    fn test_seed_sign_rejected_at_any_length() {
        for s in ["+5", "-5", "0x+ff", "0x-ff", "+123456789012345678901234567890"] {
            assert!(
                matches!(s.parse::<Seed>(), Err(Error::InvalidSeed(_))),
                "{s} should be rejected"
            );
        }
    }

    #[test]
    fn test_long_hex_seed_reduces_to_same_state() {
        // 2^64 = 0x1_0000_0000_0000_0000 overflows u64; reduce modulo 2^31 - 1
        let seed: Seed = "0x10000000000000000".parse().unwrap();
        // 2^64 mod (2^31 - 1) = 2^(64 mod 31) = 2^2 = 4
        assert_eq!(seed.initial_state(), 4);
    }

    #[test]
    fn test_generate_counts_and_order() {
        let config = ArenaConfig::default();
        let placements = generate(Seed(42), &config);
        assert_eq!(placements.len(), config.population());
        let n = config.per_kind as usize;
        assert!(placements[..n].iter().all(|p| p.kind == Kind::Rock));
        assert!(placements[n..2 * n].iter().all(|p| p.kind == Kind::Paper));
        assert!(placements[2 * n..].iter().all(|p| p.kind == Kind::Scissors));
    }

    #[test]
    fn test_generate_is_deterministic() {
        let config = ArenaConfig::default();
        assert_eq!(generate(Seed(7), &config), generate(Seed(7), &config));
        assert_ne!(generate(Seed(7), &config), generate(Seed(8), &config));
    }

    #[test]
    fn test_no_initial_overlap_default_arena() {
        let config = ArenaConfig::default();
        let r = config.object_radius;
        for seed in 1..20u64 {
            let placements = generate(Seed(seed), &config);
            for (i, a) in placements.iter().enumerate() {
                for b in &placements[i + 1..] {
                    assert!(a.pos.distance(b.pos) >= 2.0 * r, "seed {seed} overlaps");
                }
            }
        }
    }

    #[test]
    fn test_crowded_arena_still_terminates() {
        // Far more objects than fit: placement must give up, not loop
        let config = ArenaConfig::with_geometry(100.0, 100.0, 15.0, 20);
        let placements = generate(Seed(3), &config);
        assert_eq!(placements.len(), 60);
    }

    #[test]
    fn test_generate_objects_ids() {
        let config = ArenaConfig::default();
        let objects = generate_objects(Seed(9), &config);
        for (i, obj) in objects.iter().enumerate() {
            assert_eq!(obj.id as usize, i);
            assert_eq!(obj.radius, config.object_radius);
        }
    }

    proptest! {
        #[test]
        fn prop_placements_within_bounds(seed in any::<u64>()) {
            let config = ArenaConfig::default();
            let r = config.object_radius;
            for p in generate(Seed(seed), &config) {
                prop_assert!(p.pos.x >= r && p.pos.x < config.width - r);
                prop_assert!(p.pos.y >= r && p.pos.y < config.height - r);
                for v in [p.vel.x.abs(), p.vel.y.abs()] {
                    prop_assert!(v >= config.min_speed && v < config.max_speed);
                }
            }
        }

        #[test]
        fn prop_state_stays_in_range(seed in any::<u64>()) {
            let mut rng = ParkMiller::new(Seed(seed));
            for _ in 0..64 {
                let s = rng.advance();
                prop_assert!(s > 0 && s < LCG_MODULUS);
            }
        }
    }
}
