//! # Lapland Walk
//!
//! Headless walker: loads an optional TOML world config, walks the observer
//! east from spawn, digs and builds along the way, and prints the debug line
//! after every step.
//!
//! Usage: `lapland_walk [config.toml] [steps]`
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

use std::process::ExitCode;

use lapland::Session;
use lapland_world::{BlockHit, WorldConfig};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Blocks walked per step.
const STEP_LENGTH: f64 = 4.0;

/// Steps walked when none are given.
const DEFAULT_STEPS: u32 = 48;

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => match WorldConfig::load(&path) {
            Ok(config) => config,
            Err(err) => {
                error!(%path, %err, "cannot load world config");
                return ExitCode::FAILURE;
            }
        },
        None => WorldConfig::default(),
    };
    let steps = match args.next().map(|raw| raw.parse::<u32>()) {
        Some(Ok(steps)) => steps,
        Some(Err(err)) => {
            error!(%err, "steps must be a positive integer");
            return ExitCode::FAILURE;
        }
        None => DEFAULT_STEPS,
    };

    info!(
        seed = config.seed,
        render_distance = config.render_distance,
        steps,
        "starting walk"
    );

    let mut session = Session::new(&config);
    let [mut x, y, z] = session.position();

    for step in 0..steps {
        let frame = session.tick(x, y, z);

        // Every eighth step: dig the surface block ahead and rebuild it
        // with the next hotbar kind.
        if step % 8 == 7 {
            let (bx, bz) = (x.floor() as i32 + 1, z.floor() as i32);
            let surface = session.store().generator().height_at(bx, bz);
            let hit = BlockHit::new([bx, surface, bz], [0, 1, 0]);
            if let Some(kind) = session.break_block(hit) {
                info!(x = bx, y = surface, z = bz, ?kind, "dug");
            }
            session.select_slot((step / 8 % 9 + 1) as u8);
            let below = BlockHit::new([bx, surface - 1, bz], [0, 1, 0]);
            if session.place_block(below) {
                info!(x = bx, y = surface, z = bz, kind = ?session.selected(), "built");
            }
            let edits = session.take_instance_changes().len();
            info!(edits, "edit changes drained");
        }

        println!(
            "[{:>4}] {} | +{} -{} chunks | {} changes | {:.2} ms",
            frame.frame,
            session.debug_line(),
            frame.streaming.loaded,
            frame.streaming.unloaded,
            frame.changes.len(),
            frame.elapsed.as_secs_f64() * 1000.0
        );

        x += STEP_LENGTH;
    }

    let stats = session.stats();
    println!();
    println!("Walked {:.0} blocks east", f64::from(steps) * STEP_LENGTH);
    println!("Loaded chunks:    {}", stats.loaded_chunks);
    println!("Visible instances: {}", stats.visible_instances);
    println!("Generated total:  {}", stats.generated_this_session);
    println!("Unloaded total:   {}", stats.unloaded_this_session);

    ExitCode::SUCCESS
}
