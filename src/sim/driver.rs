//! Run driver: timing, termination and winner selection
//!
//! The host owns the loop and calls [`Simulation::step`] once per frame with
//! its clock (or [`Simulation::step_by`] with a delta). The driver keeps no
//! timers or threads of its own.

use serde::{Deserialize, Serialize};

use super::collision::CollisionEvent;
use super::events::{EventBus, ListenerId};
use super::generator::{Seed, generate_objects};
use super::state::{ArenaObject, Kind, KindCounts, RunStatus};
use super::tick::tick;
use crate::error::{Error, Result};
use crate::settings::ArenaConfig;

/// Result record for a finished (or stopped) run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub seed: Option<Seed>,
    pub status: RunStatus,
    pub winner: Option<Kind>,
    pub elapsed: f64,
    pub frames: u64,
    pub collisions: u64,
    pub conversions: u64,
    pub counts: KindCounts,
}

/// One simulation run and its state machine
#[derive(Debug)]
pub struct Simulation {
    config: ArenaConfig,
    seed: Option<Seed>,
    status: RunStatus,
    /// Objects addressed by index; `objects[i].id == i`
    objects: Vec<ArenaObject>,
    population: u32,
    counts: KindCounts,
    elapsed: f64,
    frames: u64,
    last_frame_time: Option<f64>,
    next_event_id: u64,
    collisions: u64,
    conversions: u64,
    /// Events of the most recent frame only
    frame_events: Vec<CollisionEvent>,
    bus: EventBus,
}

impl Simulation {
    /// Create an idle driver for the given arena
    pub fn new(config: ArenaConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            seed: None,
            status: RunStatus::Idle,
            objects: Vec::new(),
            population: 0,
            counts: KindCounts::default(),
            elapsed: 0.0,
            frames: 0,
            last_frame_time: None,
            next_event_id: 0,
            collisions: 0,
            conversions: 0,
            frame_events: Vec::new(),
            bus: EventBus::new(),
        })
    }

    /// Generate the population for `seed` and start running.
    /// `now` is the host clock (seconds) the first frame is measured from.
    pub fn start(&mut self, seed: Seed, now: f64) -> RunStatus {
        let objects = generate_objects(seed, &self.config);
        self.begin(Some(seed), objects, now);
        log::info!(
            "Run started with seed {}: {} objects in {}x{}",
            seed,
            self.population,
            self.config.width,
            self.config.height
        );
        self.status
    }

    /// Start from an explicit population (ids are reassigned to match indices)
    pub fn start_with_objects(&mut self, objects: Vec<ArenaObject>, now: f64) -> RunStatus {
        self.begin(None, objects, now);
        log::info!("Run started from {} supplied objects", self.population);
        self.status
    }

    fn begin(&mut self, seed: Option<Seed>, mut objects: Vec<ArenaObject>, now: f64) {
        for (i, obj) in objects.iter_mut().enumerate() {
            obj.id = i as u32;
        }
        // Replacing the vector leaves earlier snapshots untouched
        self.counts = KindCounts::tally(&objects);
        self.population = objects.len() as u32;
        self.objects = objects;
        self.seed = seed;
        self.status = RunStatus::Running;
        self.elapsed = 0.0;
        self.frames = 0;
        self.last_frame_time = Some(now);
        self.next_event_id = 0;
        self.collisions = 0;
        self.conversions = 0;
        self.frame_events.clear();
    }

    /// Advance one frame using the host clock.
    ///
    /// The frame delta is measured from the previous call (or from `start`)
    /// and capped; a clock that runs backwards yields a zero delta.
    pub fn step(&mut self, now: f64) -> Result<RunStatus> {
        if self.status != RunStatus::Running {
            return Ok(self.status);
        }
        let dt = self.last_frame_time.map_or(0.0, |last| now - last);
        self.last_frame_time = Some(now);
        self.advance(dt)
    }

    /// Advance one frame by an explicit delta (same capping as [`step`](Self::step))
    pub fn step_by(&mut self, dt: f64) -> Result<RunStatus> {
        if self.status != RunStatus::Running {
            return Ok(self.status);
        }
        if let Some(last) = self.last_frame_time.as_mut() {
            *last += dt;
        }
        self.advance(dt)
    }

    fn advance(&mut self, raw_dt: f64) -> Result<RunStatus> {
        let dt = if raw_dt.is_nan() {
            0.0
        } else {
            raw_dt.clamp(0.0, self.config.max_dt())
        };

        self.frame_events.clear();
        self.frames += 1;
        self.elapsed += dt;

        // Timeout is decided before physics and wins over a same-frame completion
        if self.elapsed >= self.config.time_ceiling {
            self.elapsed = self.config.time_ceiling;
            let winner = self.counts.leader().ok_or_else(|| {
                self.invariant_violation("time ceiling reached with no surviving objects")
            })?;
            self.status = RunStatus::Timeout(winner);
            log::info!(
                "Run timed out after {} frames; {} wins by majority ({:?})",
                self.frames,
                winner,
                self.counts
            );
            return Ok(self.status);
        }

        let out = tick(
            &mut self.objects,
            &self.config,
            dt,
            self.elapsed,
            &mut self.next_event_id,
        );
        let conversions = out.conversions();
        if conversions > 0 {
            log::debug!(
                "Frame {}: {} collisions, {} conversions, {} wall contacts, counts {:?}",
                self.frames,
                out.events.len(),
                conversions,
                out.wall_contacts,
                out.counts
            );
        }
        self.collisions += out.events.len() as u64;
        self.conversions += conversions as u64;
        self.counts = out.counts;
        self.bus.publish(&out.events);
        self.frame_events = out.events;

        if self.counts.total() != self.population {
            return Err(self.invariant_violation(&format!(
                "population changed from {} to {}",
                self.population,
                self.counts.total()
            )));
        }

        match self.counts.survivors() {
            0 => Err(self.invariant_violation("no surviving kinds after frame")),
            1 => {
                let winner = self
                    .counts
                    .sole_survivor()
                    .ok_or_else(|| self.invariant_violation("single survivor not found"))?;
                self.status = RunStatus::Completed(winner);
                log::info!(
                    "Run completed after {} frames ({:.3}s); {} wins",
                    self.frames,
                    self.elapsed,
                    winner
                );
                Ok(self.status)
            }
            _ => Ok(self.status),
        }
    }

    fn invariant_violation(&self, msg: &str) -> Error {
        log::error!("Invariant violation at frame {}: {}", self.frames, msg);
        Error::InvariantViolation(msg.to_string())
    }

    /// Halt a running run and return to idle, keeping the current objects.
    /// Finished runs keep their result; only [`reset`](Self::reset) clears it.
    pub fn stop(&mut self) {
        if self.status.is_terminal() {
            return;
        }
        if self.status == RunStatus::Running {
            log::info!("Run stopped at frame {}", self.frames);
        }
        self.status = RunStatus::Idle;
        self.last_frame_time = None;
    }

    /// Drop all run state and listeners
    pub fn reset(&mut self) {
        self.begin(None, Vec::new(), 0.0);
        self.status = RunStatus::Idle;
        self.last_frame_time = None;
        self.bus.clear();
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    pub fn seed(&self) -> Option<Seed> {
        self.seed
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn counts(&self) -> KindCounts {
        self.counts
    }

    /// Owned copy of the current objects
    pub fn snapshot(&self) -> Vec<ArenaObject> {
        self.objects.clone()
    }

    /// Read-only view of the current objects
    pub fn objects(&self) -> &[ArenaObject] {
        &self.objects
    }

    /// Collision events produced by the most recent frame
    pub fn frame_events(&self) -> &[CollisionEvent] {
        &self.frame_events
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&CollisionEvent) + 'static) -> ListenerId {
        self.bus.subscribe(callback)
    }

    pub fn subscribe_channel(&mut self) -> std::sync::mpsc::Receiver<CollisionEvent> {
        self.bus.subscribe_channel()
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.bus.unsubscribe(id)
    }

    pub fn listener_count(&self) -> usize {
        self.bus.len()
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            seed: self.seed,
            status: self.status,
            winner: self.status.winner(),
            elapsed: self.elapsed,
            frames: self.frames,
            collisions: self.collisions,
            conversions: self.conversions,
            counts: self.counts,
        }
    }
}

/// Run a seed to completion at the nominal frame rate.
///
/// This is the outcome any other runtime reproduces from the seed alone.
pub fn run_headless(seed: Seed, config: &ArenaConfig) -> Result<RunSummary> {
    let mut sim = Simulation::new(config.clone())?;
    sim.start(seed, 0.0);
    let frame_dt = config.frame_dt;
    while !sim.step_by(frame_dt)?.is_terminal() {}
    Ok(sim.summary())
}
