//! Triad Arena headless runner
//!
//! Resolves the outcome for a seed and prints the run summary as JSON.

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use std::path::PathBuf;

    use clap::Parser;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use triad_arena::ArenaConfig;
    use triad_arena::sim::{Seed, Simulation};

    /// Run one arena simulation to its outcome
    #[derive(Debug, Parser)]
    #[command(name = "triad-arena", version, about)]
    pub struct Args {
        /// Run seed (decimal or 0x hex); random when omitted
        #[arg(long)]
        seed: Option<String>,

        /// Arena config JSON (missing fields use defaults)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Vary each frame delta by up to this fraction of the nominal frame
        #[arg(long, default_value_t = 0.0)]
        jitter: f64,

        /// Print every collision event as a JSON line
        #[arg(long)]
        events: bool,

        /// Write the effective config to this path and exit
        #[arg(long)]
        write_config: Option<PathBuf>,
    }

    pub fn run(args: Args) -> triad_arena::Result<()> {
        let config = match &args.config {
            Some(path) => ArenaConfig::load(path)?,
            None => ArenaConfig::default(),
        };

        if let Some(path) = &args.write_config {
            return config.save(path);
        }

        let seed: Seed = match &args.seed {
            Some(s) => s.parse()?,
            None => Seed(rand::random::<u32>() as u64),
        };
        log::info!("Resolving outcome for seed {}", seed);

        let mut sim = Simulation::new(config)?;
        if args.events {
            sim.subscribe(|event| match serde_json::to_string(event) {
                Ok(line) => println!("{line}"),
                Err(e) => log::warn!("Failed to encode collision event {}: {}", event.id, e),
            });
        }

        // Host-side timing noise; the engine only ever sees the resulting deltas
        let jitter = args.jitter.clamp(0.0, 1.0);
        let mut timing = Pcg32::seed_from_u64(seed.0);
        let frame_dt = sim.config().frame_dt;

        sim.start(seed, 0.0);
        loop {
            let dt = if jitter > 0.0 {
                frame_dt * (1.0 + jitter * timing.random_range(-1.0..1.0))
            } else {
                frame_dt
            };
            if sim.step_by(dt)?.is_terminal() {
                break;
            }
        }

        let summary = serde_json::to_string_pretty(&sim.summary())?;
        println!("{summary}");
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    env_logger::init();
    log::info!("Triad Arena (native) starting...");

    if let Err(e) = cli::run(cli::Args::parse()) {
        log::error!("{e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The engine is consumed as a library on wasm; there is no CLI
}
