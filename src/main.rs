//! Toroid Rocks entry point
//!
//! Runs the simulation headless on a simulated clock with scripted input and
//! prints the final world snapshot as JSON.

#[cfg(not(target_arch = "wasm32"))]
use toroid_rocks::{
    SimError, Tuning, render,
    sim::{HudState, InputEvent, InputQueue, World, tick},
};

/// Simulated frame length
#[cfg(not(target_arch = "wasm32"))]
const FRAME_MS: u64 = 16;

/// Run a seeded, scripted session and print the final world as JSON
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, clap::Parser)]
#[command(name = "toroid-rocks", version)]
struct Options {
    /// RNG seed for asteroid spawns and splits
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Number of ticks to simulate
    #[arg(long, default_value_t = 600)]
    ticks: u64,
    /// JSON tuning file; built-in defaults when omitted
    #[arg(long, value_name = "FILE")]
    tuning: Option<std::path::PathBuf>,
}

/// Fixed input pattern: keep turning, thrust now and then, fire steadily
#[cfg(not(target_arch = "wasm32"))]
fn scripted_input(frame: u64, queue: &mut InputQueue) {
    if frame % 15 == 0 {
        queue.push(InputEvent::key_down(" "));
    }
    if frame % 40 == 0 {
        queue.push(InputEvent::key_down("w"));
    }
    if frame % 9 == 0 {
        queue.push(InputEvent::key_down("a"));
        queue.push(InputEvent::key_up("a"));
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn run(options: &Options) -> Result<render::WorldSnapshot, SimError> {
    use rand::SeedableRng;

    let tuning = match &options.tuning {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };
    let mut queue = InputQueue::new(tuning.input_queue_capacity);
    let mut world = World::with_parts(
        tuning,
        rand_pcg::Pcg32::seed_from_u64(options.seed),
        Box::new(toroid_rocks::sim::StaticGeometry::new()),
        0,
    )?;
    let mut hud = HudState::default();

    log::info!("Game initialized with seed: {}", options.seed);
    for frame in 1..=options.ticks {
        scripted_input(frame, &mut queue);
        let report = tick(&mut world, &mut queue, &mut hud, frame * FRAME_MS)?;
        if report.restarted {
            log::info!("Ship lost all lives at tick {}", frame);
        }
        if frame % 300 == 0 {
            log::info!(
                "tick {}: score {} lives {} entities {}",
                frame,
                hud.score,
                hud.lives,
                world.len()
            );
        }
    }

    Ok(render::snapshot(&world))
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    env_logger::init();
    log::info!("Toroid Rocks (headless) starting...");

    let options = Options::parse();

    let snapshot = match run(&options) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            log::error!("Simulation failed: {}", e);
            std::process::exit(1);
        }
    };

    match serde_json::to_string_pretty(&snapshot) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::error!("Failed to serialize snapshot: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The simulation is driven by the host page on wasm
}
