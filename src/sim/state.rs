//! Arena object types and per-run state
//!
//! Everything here is plain data: serializable, cloneable, and free of any
//! reference into the engine so snapshots stay valid after a reset.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// The three object kinds.
///
/// Declaration order is the canonical priority order used for tie-breaks
/// and the order in which the generator fills kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Rock,
    Paper,
    Scissors,
}

impl Kind {
    /// All kinds in canonical priority order
    pub const ALL: [Kind; 3] = [Kind::Rock, Kind::Paper, Kind::Scissors];

    /// The kind this one converts on contact
    #[inline]
    pub fn prey(self) -> Kind {
        match self {
            Kind::Rock => Kind::Scissors,
            Kind::Scissors => Kind::Paper,
            Kind::Paper => Kind::Rock,
        }
    }

    /// Whether `self` converts `other`
    #[inline]
    pub fn beats(self, other: Kind) -> bool {
        self.prey() == other
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Rock => "rock",
            Kind::Paper => "paper",
            Kind::Scissors => "scissors",
        }
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Winner of a contact between two kinds, `None` for same-kind contact
#[inline]
pub fn dominant(a: Kind, b: Kind) -> Option<Kind> {
    if a.beats(b) {
        Some(a)
    } else if b.beats(a) {
        Some(b)
    } else {
        None
    }
}

/// A single moving object in the arena
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenaObject {
    /// Stable id, equal to the object's index in the run
    pub id: u32,
    pub kind: Kind,
    pub pos: DVec2,
    /// Velocity in units/sec
    pub vel: DVec2,
    pub radius: f64,
}

impl ArenaObject {
    pub fn new(id: u32, kind: Kind, pos: DVec2, vel: DVec2, radius: f64) -> Self {
        Self {
            id,
            kind,
            pos,
            vel,
            radius,
        }
    }
}

/// Per-kind population tally
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindCounts {
    pub rock: u32,
    pub paper: u32,
    pub scissors: u32,
}

impl KindCounts {
    /// Count kinds across a set of objects
    pub fn tally(objects: &[ArenaObject]) -> Self {
        let mut counts = Self::default();
        for obj in objects {
            *counts.get_mut(obj.kind) += 1;
        }
        counts
    }

    pub fn get(&self, kind: Kind) -> u32 {
        match kind {
            Kind::Rock => self.rock,
            Kind::Paper => self.paper,
            Kind::Scissors => self.scissors,
        }
    }

    fn get_mut(&mut self, kind: Kind) -> &mut u32 {
        match kind {
            Kind::Rock => &mut self.rock,
            Kind::Paper => &mut self.paper,
            Kind::Scissors => &mut self.scissors,
        }
    }

    pub fn total(&self) -> u32 {
        self.rock + self.paper + self.scissors
    }

    /// Number of kinds with at least one object
    pub fn survivors(&self) -> usize {
        Kind::ALL.iter().filter(|&&k| self.get(k) > 0).count()
    }

    /// The only surviving kind, if exactly one remains
    pub fn sole_survivor(&self) -> Option<Kind> {
        let mut alive = Kind::ALL.into_iter().filter(|&k| self.get(k) > 0);
        match (alive.next(), alive.next()) {
            (Some(kind), None) => Some(kind),
            _ => None,
        }
    }

    /// Kind with the highest count; ties go to the earlier kind in priority order.
    /// `None` when every count is zero.
    pub fn leader(&self) -> Option<Kind> {
        let mut best: Option<Kind> = None;
        for kind in Kind::ALL {
            let count = self.get(kind);
            if count == 0 {
                continue;
            }
            // Strictly greater keeps the earlier (higher priority) kind on ties
            if best.is_none_or(|b| count > self.get(b)) {
                best = Some(kind);
            }
        }
        best
    }
}

/// Driver state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// No run in progress
    Idle,
    /// Frames are being stepped
    Running,
    /// One kind converted every other object
    Completed(Kind),
    /// Time ceiling reached; winner by majority
    Timeout(Kind),
}

impl RunStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunStatus::Completed(_) | RunStatus::Timeout(_))
    }

    pub fn winner(&self) -> Option<Kind> {
        match *self {
            RunStatus::Completed(k) | RunStatus::Timeout(k) => Some(k),
            _ => None,
        }
    }
}
