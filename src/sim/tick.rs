//! Per-frame simulation tick
//!
//! Drives the turn cycle: a shot moves the match from aiming to rolling,
//! physics runs until every body rests (or the roll times out), then the
//! turn resolves into a replay or a hand-over.

use glam::Vec2;

use super::body::Body;
use super::collision::{bounce_off_walls, resolve_collision};
use super::random::RandomSource;
use super::state::{ColorChange, GameEvent, GameState, Player, Tint, TurnPhase};
use crate::settings::Tuning;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Committed slingshot drag (press point minus release point)
    pub shot: Option<Vec2>,
    /// Throw the board away and start a new match
    pub rematch: bool,
}

/// Advance the match by one frame of `dt_ms` milliseconds
pub fn tick(state: &mut GameState, input: &TickInput, rng: &mut impl RandomSource, dt_ms: f64) {
    if input.rematch {
        state.rematch(rng);
        return;
    }

    if state.is_over() {
        return;
    }

    state.clock_ms += dt_ms;

    match state.phase {
        TurnPhase::Aiming => {
            if let Some(drag) = input.shot {
                shoot(state, drag);
            }
        }
        TurnPhase::Rolling => roll(state, rng),
        TurnPhase::Resolving => resolve_turn(state, rng),
        TurnPhase::Over => {}
    }
}

/// Launch velocity for a drag: along the drag, capped at `max_power`
pub fn launch_velocity(drag: Vec2, tuning: &Tuning) -> Option<Vec2> {
    let len = drag.length();
    // Written so NaN fails the check too
    if !(len >= tuning.min_drag) {
        return None;
    }
    let power = (len * tuning.power_scale).min(tuning.max_power);
    Some(drag / len * power)
}

/// Start a roll. Ignored outside `Aiming` or for drags shorter than `min_drag`.
pub fn shoot(state: &mut GameState, drag: Vec2) -> bool {
    if state.phase != TurnPhase::Aiming {
        log::debug!("Shot ignored in {:?}", state.phase);
        return false;
    }
    let Some(velocity) = launch_velocity(drag, &state.tuning) else {
        log::debug!("Shot ignored: drag {:.1} too short", drag.length());
        return false;
    };

    state.changes.clear();
    state.roll_started_ms = state.clock_ms;
    state.clear_expired_locks();

    let Some(striker) = state.striker_mut() else {
        return false;
    };
    striker.vel = velocity;

    state.phase = TurnPhase::Rolling;
    let player = state.current_player;
    log::debug!("Player {} shoots at {:.2}", player.number(), velocity.length());
    state.push_event(GameEvent::RollStarted { player, velocity });
    true
}

fn roll(state: &mut GameState, rng: &mut impl RandomSource) {
    let elapsed = state.clock_ms - state.roll_started_ms;
    if elapsed > state.tuning.roll_timeout_ms {
        log::debug!("Roll timed out after {elapsed:.0} ms");
        settle(state);
        resolve_turn(state, rng);
        return;
    }

    step_physics(state, rng);
    if state.is_over() {
        return;
    }

    if !state.bodies.iter().any(Body::is_moving) {
        settle(state);
        resolve_turn(state, rng);
    }
}

fn settle(state: &mut GameState) {
    for body in state.bodies.iter_mut() {
        body.halt();
    }
    state.phase = TurnPhase::Resolving;
}

/// One physics step: integrate, bounce off walls, resolve every pair
pub fn step_physics(state: &mut GameState, rng: &mut impl RandomSource) {
    let tuning = &state.tuning;
    for body in state.bodies.iter_mut() {
        body.update(tuning, rng);
        bounce_off_walls(
            body,
            tuning.board_width,
            tuning.board_height,
            tuning.wall_restitution,
        );
    }

    let n = state.bodies.len();
    for i in 0..n {
        for j in (i + 1)..n {
            let (head, tail) = state.bodies.split_at_mut(j);
            let result = resolve_collision(&mut head[i], &mut tail[0], &state.tuning, rng);
            if !result.converts(&state.tuning) {
                continue;
            }
            log::trace!(
                "Impact {} <-> {} at {:.2}",
                state.bodies[i].id,
                state.bodies[j].id,
                result.intensity
            );
            for idx in [i, j] {
                state.convert_lumie(idx, rng);
                if state.is_over() {
                    return;
                }
            }
        }
    }
}

/// Whether the acting player earned another shot
///
/// Only a roll that gained the player's own color and handed nothing to the
/// opponent earns a replay. A player without a color never replays.
pub fn earns_replay(own: Option<Tint>, changes: &[ColorChange]) -> bool {
    let Some(own) = own else {
        return false;
    };
    let gained = changes.iter().filter(|c| c.after == own).count();
    let lost = changes.iter().filter(|c| c.after == own.opposite()).count();
    gained > 0 && lost == 0
}

/// Who shoots after the roll just finished
pub fn next_player(state: &GameState) -> Player {
    let acting = state.current_player;
    if earns_replay(state.color_of(acting), &state.changes) {
        acting
    } else {
        acting.other()
    }
}

fn resolve_turn(state: &mut GameState, rng: &mut impl RandomSource) {
    let acting = state.current_player;
    let next = next_player(state);
    let replay = next == acting;

    state.current_player = next;
    state.turn += 1;
    state.spawn_striker(rng);
    state.phase = TurnPhase::Aiming;

    log::debug!(
        "Turn {}: player {} ({} change(s){})",
        state.turn,
        next.number(),
        state.changes.len(),
        if replay { ", replay" } else { "" }
    );
    state.push_event(GameEvent::TurnChanged {
        player: next,
        replay,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRAME_MS;
    use crate::sim::body::Role;
    use crate::sim::random::seeded;
    use rand_pcg::Pcg32;

    fn fresh(seed: u64) -> (GameState, Pcg32) {
        let mut rng = seeded(seed);
        let state = GameState::new(Tuning::default(), &mut rng);
        (state, rng)
    }

    fn change(after: Tint) -> ColorChange {
        ColorChange {
            body_id: 1,
            before: Tint::Neutral,
            after,
        }
    }

    fn run_roll(state: &mut GameState, rng: &mut Pcg32) {
        let idle = TickInput::default();
        for _ in 0..10_000 {
            if state.phase != TurnPhase::Rolling {
                return;
            }
            tick(state, &idle, rng, FRAME_MS);
        }
        panic!("roll never finished");
    }

    #[test]
    fn test_replay_rules() {
        let green = Some(Tint::Green);
        assert!(earns_replay(green, &[change(Tint::Green)]));
        assert!(!earns_replay(green, &[change(Tint::Blue)]));
        assert!(!earns_replay(green, &[change(Tint::Green), change(Tint::Blue)]));
        assert!(!earns_replay(green, &[]));
        assert!(!earns_replay(None, &[change(Tint::Green)]));
    }

    #[test]
    fn test_gain_keeps_turn() {
        let (mut state, mut rng) = fresh(1);
        state.colors = [Some(Tint::Green), Some(Tint::Blue)];
        state.changes = vec![change(Tint::Green)];
        state.phase = TurnPhase::Resolving;
        tick(&mut state, &TickInput::default(), &mut rng, FRAME_MS);

        assert_eq!(state.phase, TurnPhase::Aiming);
        assert_eq!(state.current_player, Player::One);
        assert!(state.events.contains(&GameEvent::TurnChanged {
            player: Player::One,
            replay: true
        }));
    }

    #[test]
    fn test_opponent_gain_switches_turn() {
        let (mut state, mut rng) = fresh(2);
        state.colors = [Some(Tint::Green), Some(Tint::Blue)];
        state.changes = vec![change(Tint::Blue)];
        state.phase = TurnPhase::Resolving;
        tick(&mut state, &TickInput::default(), &mut rng, FRAME_MS);

        assert_eq!(state.current_player, Player::Two);
        let striker = state.striker().unwrap();
        assert_eq!(striker.pos, state.tuning.spawn_point(Player::Two));
        assert_eq!(striker.tint, Tint::Blue);
    }

    #[test]
    fn test_launch_velocity() {
        let tuning = Tuning::default();
        assert_eq!(launch_velocity(Vec2::new(4.0, 0.0), &tuning), None);
        assert_eq!(launch_velocity(Vec2::NAN, &tuning), None);

        let v = launch_velocity(Vec2::new(0.0, 50.0), &tuning).unwrap();
        assert!((v.length() - 50.0 * tuning.power_scale).abs() < 1e-5);
        assert!(v.x.abs() < 1e-6 && v.y > 0.0);

        let v = launch_velocity(Vec2::new(-10_000.0, 0.0), &tuning).unwrap();
        assert!((v.length() - tuning.max_power).abs() < 1e-4);
        assert!(v.x < 0.0);
    }

    #[test]
    fn test_shot_starts_roll() {
        let (mut state, mut rng) = fresh(3);
        state.bodies[0].locked_until_ms = 1.0;
        state.changes = vec![change(Tint::Green)];
        let input = TickInput {
            shot: Some(Vec2::new(0.0, -100.0)),
            ..Default::default()
        };
        tick(&mut state, &input, &mut rng, FRAME_MS);

        assert_eq!(state.phase, TurnPhase::Rolling);
        assert!(state.changes.is_empty());
        assert_eq!(state.roll_started_ms, state.clock_ms);
        assert_eq!(state.bodies[0].locked_until_ms, 0.0);
        assert!(state.striker().unwrap().vel.y < 0.0);
    }

    #[test]
    fn test_short_or_late_shots_ignored() {
        let (mut state, mut rng) = fresh(4);
        let short = TickInput {
            shot: Some(Vec2::new(3.0, 0.0)),
            ..Default::default()
        };
        tick(&mut state, &short, &mut rng, FRAME_MS);
        assert_eq!(state.phase, TurnPhase::Aiming);
        assert!(state.events.is_empty());

        state.phase = TurnPhase::Rolling;
        state.roll_started_ms = state.clock_ms;
        assert!(!shoot(&mut state, Vec2::new(0.0, -100.0)));
        assert!(!state.striker().unwrap().is_moving());
    }

    #[test]
    fn test_roll_timeout_zeroes_everything() {
        let (mut state, mut rng) = fresh(5);
        assert!(shoot(&mut state, Vec2::new(1.0, -200.0)));
        state.bodies[1].vel = Vec2::new(10.0, 0.0);
        state.bodies[1].spin = 0.5;

        tick(&mut state, &TickInput::default(), &mut rng, 3001.0);

        assert_eq!(state.phase, TurnPhase::Aiming);
        assert!(state.bodies.iter().all(|b| b.vel == Vec2::ZERO && b.spin == 0.0));
        assert_eq!(state.current_player, Player::Two);
    }

    #[test]
    fn test_whiff_passes_turn() {
        let (mut state, mut rng) = fresh(6);
        // Straight down into the bottom wall, away from the Lumie row
        assert!(shoot(&mut state, Vec2::new(0.0, 30.0)));
        run_roll(&mut state, &mut rng);

        assert_eq!(state.phase, TurnPhase::Aiming);
        assert_eq!(state.current_player, Player::Two);
        assert!(state.lumies().all(|l| l.tint == Tint::Neutral));
        assert_eq!(state.turn, 2);
    }

    #[test]
    fn test_hard_hit_draws_first_blood() {
        let (mut state, mut rng) = fresh(7);
        let striker = state.striker().unwrap().pos;
        let target = state.lumies().next().unwrap().pos;
        assert!(shoot(&mut state, (target - striker) * 10.0));
        run_roll(&mut state, &mut rng);

        let own = state.color_of(Player::One).expect("first blood");
        assert_eq!(state.color_of(Player::Two), Some(own.opposite()));
        assert!(state.scores.of(own) >= 1);
        assert!(state.events.iter().any(|e| matches!(e, GameEvent::LumieConverted { .. })));
    }

    #[test]
    fn test_struck_lumies_settle_before_timeout() {
        for seed in 0..20 {
            let (mut state, mut rng) = fresh(seed);
            let striker = state.striker().unwrap().pos;
            let target = state.bodies[seed as usize % 5].pos;
            assert!(shoot(&mut state, (target - striker) * 10.0));
            run_roll(&mut state, &mut rng);

            let elapsed = state.clock_ms - state.roll_started_ms;
            assert!(
                elapsed <= state.tuning.roll_timeout_ms,
                "seed {seed}: roll ran {elapsed:.0} ms"
            );
            assert!(state.events.iter().any(|e| matches!(e, GameEvent::LumieConverted { .. })));
            assert!(state.bodies.iter().all(|b| !b.is_moving()));
            assert_eq!(state.phase, TurnPhase::Aiming);
        }
    }

    #[test]
    fn test_win_stops_processing() {
        let (mut state, mut rng) = fresh(8);
        state.colors = [Some(Tint::Green), Some(Tint::Blue)];
        for lumie in state.bodies.iter_mut().filter(|b| b.role == Role::Lumie) {
            lumie.tint = Tint::Green;
        }
        state.bodies[4].tint = Tint::Blue;

        // Park the striker against the last Lumie, moving into it
        let target = state.bodies[4].pos;
        let striker = state.striker_mut().unwrap();
        striker.pos = target + Vec2::new(0.0, 40.0);
        striker.vel = Vec2::new(0.0, -10.0);
        state.phase = TurnPhase::Rolling;
        state.roll_started_ms = state.clock_ms;

        tick(&mut state, &TickInput::default(), &mut rng, FRAME_MS);
        assert_eq!(state.phase, TurnPhase::Over);
        assert_eq!(state.winner, Some(Tint::Green));
        assert_eq!(state.scores.green, 5);

        let clock = state.clock_ms;
        let shot = TickInput {
            shot: Some(Vec2::new(0.0, -100.0)),
            ..Default::default()
        };
        tick(&mut state, &shot, &mut rng, FRAME_MS);
        assert_eq!(state.phase, TurnPhase::Over);
        assert_eq!(state.clock_ms, clock);
    }

    #[test]
    fn test_rematch_input() {
        let (mut state, mut rng) = fresh(9);
        state.phase = TurnPhase::Over;
        state.winner = Some(Tint::Blue);
        let input = TickInput {
            rematch: true,
            ..Default::default()
        };
        tick(&mut state, &input, &mut rng, FRAME_MS);
        assert_eq!(state.phase, TurnPhase::Aiming);
        assert_eq!(state.winner, None);
    }

    #[test]
    fn test_determinism() {
        let (mut state1, mut rng1) = fresh(99);
        let (mut state2, mut rng2) = fresh(99);
        let shot = Vec2::new(35.0, -120.0);

        for (state, rng) in [(&mut state1, &mut rng1), (&mut state2, &mut rng2)] {
            assert!(shoot(state, shot));
            run_roll(state, rng);
        }

        assert_eq!(state1.clock_ms, state2.clock_ms);
        assert_eq!(state1.current_player, state2.current_player);
        for (a, b) in state1.bodies.iter().zip(&state2.bodies) {
            assert_eq!(a.pos, b.pos);
            assert_eq!(a.tint, b.tint);
        }
    }
}
