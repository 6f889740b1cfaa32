//! Float Bite headless runner
//!
//! Plays scripted fishing rounds against the engine and prints what a
//! presentation layer would receive.
//!
//! Usage: float-bite [--seed N] [--bite 1-10] [--hook-after MS] [--rounds N] [--settings PATH]

use std::path::PathBuf;

use clap::Parser;
use float_bite::Settings;
use float_bite::sim::{FishingGame, GameEvent, ImpactEmitter, Phase, ambient_rings};

/// Simulation step (ms)
const STEP_MS: u64 = 50;
/// Give up on a round after this long (ms)
const ROUND_LIMIT_MS: u64 = 120_000;

#[derive(Parser, Debug)]
#[command(name = "float-bite")]
#[command(about = "Play scripted float-fishing rounds and print engine output")]
struct Args {
    /// RNG seed
    #[arg(long, default_value_t = 12345)]
    seed: u64,

    /// Force a bite pattern (1-based catalog number); out of range picks randomly
    #[arg(long, allow_negative_numbers = true)]
    bite: Option<i64>,

    /// Strike this long after bite onset (ms)
    #[arg(long = "hook-after", default_value_t = 500)]
    hook_after_ms: u64,

    /// Number of rounds to play
    #[arg(long, default_value_t = 3)]
    rounds: u32,

    /// Settings JSON file
    #[arg(long)]
    settings: Option<PathBuf>,
}

fn main() {
    env_logger::init();
    let options = Args::parse();
    log::info!("Float Bite (headless) starting with {:?}", options);

    let settings = options
        .settings
        .as_deref()
        .map(|path| Settings::load(path))
        .unwrap_or_default();

    let mut game = FishingGame::with_settings(options.seed, settings.clone());
    game.set_debug_override(options.bite);
    let mut impacts = ImpactEmitter::new(settings.impact.clone());

    let mut playing: Option<(u64, u64)> = None;
    let mut hits = 0;
    let mut misses = 0;

    for round in 1..=options.rounds {
        println!("\n=== Round {} ===", round);
        game.primary_action();
        let round_start = game.now_ms();
        let mut resolved = false;

        while game.now_ms() - round_start < ROUND_LIMIT_MS {
            let now = game.now_ms();
            for event in game.drain_events() {
                impacts.observe(&event, now);
                match &event {
                    GameEvent::PhaseChanged { phase, message } => {
                        println!("[{:>6} ms] {:<8} {}", now, phase.as_str(), message);
                        match phase {
                            Phase::Hit => hits += 1,
                            Phase::Miss => misses += 1,
                            _ => {}
                        }
                    }
                    GameEvent::Motion(update) => {
                        println!(
                            "[{:>6} ms] motion #{} {:?}: {} keyframes over {:.0} ms",
                            now,
                            update.id,
                            update.kind,
                            update.float.samples.len(),
                            update.duration_ms()
                        );
                        playing = Some((update.id, now + update.duration_ms().ceil() as u64));
                    }
                }
            }

            if let Some((id, done_at)) = playing {
                if now >= done_at {
                    game.curve_finished(id);
                    playing = None;
                }
            }

            match game.phase() {
                Phase::Bite => {
                    let elapsed = game.session().bite_elapsed_ms().unwrap_or(0);
                    if elapsed >= options.hook_after_ms {
                        game.primary_action();
                        continue;
                    }
                }
                Phase::Hit | Phase::Miss => resolved = true,
                Phase::Ready if resolved => break,
                _ => {}
            }

            impacts.update(now);
            game.advance(STEP_MS);
        }

        let rings = ambient_rings(game.now_ms());
        log::debug!(
            "Ambient rings at round end: {:.2}/{:.2}, {} impact pulses live",
            rings[0].scale,
            rings[1].scale,
            impacts.active().len()
        );
    }

    println!("\nHooked {} of {} strikes", hits, hits + misses);
}
