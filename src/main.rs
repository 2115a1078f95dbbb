//! Lumies headless runner
//!
//! Plays a seeded match with random shots and logs the event stream.
//! Usage: `lumies [seed] [tuning.json]` (set `RUST_LOG=debug` for turn detail).

use glam::Vec2;
use rand::Rng;

use lumies::consts::FRAME_MS;
use lumies::sim::{GameEvent, Role, seeded};
use lumies::{Game, Tuning};

/// Give up after this many turns
const MAX_TURNS: u32 = 500;

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let seed = match args.next().map(|s| s.parse::<u64>()) {
        Some(Ok(seed)) => seed,
        Some(Err(err)) => {
            log::warn!("Bad seed ({err}); using 1");
            1
        }
        None => 1,
    };
    let tuning = args.next().map(Tuning::load).unwrap_or_default();

    let mut game = Game::new(tuning, seed);
    // Separate stream for the shots so the match RNG stays untouched
    let mut hand = seeded(seed ^ 0x5eed);

    while game.hud().winner.is_none() && game.hud().turn <= MAX_TURNS {
        let Some(striker) = game.bodies().into_iter().find(|b| b.role == Role::Striker) else {
            break;
        };

        // Random pull-back, mostly upward toward the Lumie row
        let angle = hand.random_range(0.15f32..0.85) * std::f32::consts::PI;
        let pull = hand.random_range(20.0f32..200.0);
        let release = striker.pos + Vec2::new(angle.cos(), angle.sin()) * pull;
        game.start_aim(striker.pos);
        game.update_aim(release);
        game.commit_shoot();

        for event in game.run_until_idle(FRAME_MS, 10_000) {
            report(&event);
        }
    }

    let hud = game.hud();
    match hud.winner {
        Some(tint) => log::info!(
            "Winner: {} in {} turns (seed {})",
            tint.as_str(),
            hud.turn,
            game.seed()
        ),
        None => log::warn!("No winner after {MAX_TURNS} turns"),
    }
    match serde_json::to_string_pretty(&hud) {
        Ok(json) => println!("{json}"),
        Err(err) => log::error!("Cannot serialize HUD: {err}"),
    }
}

fn report(event: &GameEvent) {
    match event {
        GameEvent::LumieConverted { change } => log::info!(
            "Lumie {}: {} -> {}",
            change.body_id,
            change.before.as_str(),
            change.after.as_str()
        ),
        GameEvent::TurnChanged { player, replay } => {
            log::info!("Player {} {}", player.number(), if *replay { "goes again" } else { "to shoot" })
        }
        other => log::debug!("{other:?}"),
    }
}
