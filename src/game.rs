//! Session facade
//!
//! Owns the match state, the seeded RNG and the aim gesture. A frontend
//! forwards pointer events, calls `frame` once per animation tick, and
//! draws from `bodies` / `hud`.

use glam::Vec2;
use rand_pcg::Pcg32;

use crate::settings::Tuning;
use crate::sim::{
    AimGesture, BodyView, GameEvent, GameState, HudView, TickInput, TurnPhase, body_views,
    hud_view, launch_velocity, seeded, tick,
};

/// Longest frame fed to the simulation (ms); longer gaps are clamped
pub const MAX_FRAME_MS: f64 = 100.0;

/// A running match
pub struct Game {
    state: GameState,
    rng: Pcg32,
    seed: u64,
    aim: AimGesture,
    /// One-shot input for the next frame
    input: TickInput,
}

impl Game {
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        let mut rng = seeded(seed);
        let state = GameState::new(tuning, &mut rng);
        log::info!("New match (seed {seed})");
        Self {
            state,
            rng,
            seed,
            aim: AimGesture::default(),
            input: TickInput::default(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    fn accepts_aim(&self) -> bool {
        self.state.phase == TurnPhase::Aiming && self.input.shot.is_none()
    }

    /// Pointer pressed
    pub fn start_aim(&mut self, pos: Vec2) {
        if self.accepts_aim() {
            self.aim.start(pos);
        }
    }

    /// Pointer moved
    pub fn update_aim(&mut self, pos: Vec2) {
        self.aim.update(pos);
    }

    /// Pointer released. Returns true if a shot was queued.
    pub fn commit_shoot(&mut self) -> bool {
        if !self.accepts_aim() {
            self.aim.cancel();
            log::debug!("Shot ignored in {:?}", self.state.phase);
            return false;
        }
        match self.aim.commit(self.state.tuning.min_drag) {
            Some(drag) => {
                self.input.shot = Some(drag);
                true
            }
            None => false,
        }
    }

    /// Launch velocity the current drag would produce (for an aim guide)
    pub fn aim_preview(&self) -> Option<Vec2> {
        self.aim
            .drag()
            .and_then(|drag| launch_velocity(drag, &self.state.tuning))
    }

    /// Throw the board away and start over on the next frame
    pub fn request_rematch(&mut self) {
        log::info!("Rematch requested (seed {})", self.seed);
        self.aim.cancel();
        self.input.rematch = true;
    }

    /// Run one animation tick and return what happened
    pub fn frame(&mut self, dt_ms: f64) -> Vec<GameEvent> {
        // A NaN clock would never reach the roll timeout
        let dt_ms = if dt_ms.is_finite() {
            dt_ms.clamp(0.0, MAX_FRAME_MS)
        } else {
            0.0
        };
        let input = std::mem::take(&mut self.input);
        tick(&mut self.state, &input, &mut self.rng, dt_ms);
        std::mem::take(&mut self.state.events)
    }

    /// Run frames until the board is waiting for a shot (or the match ends)
    pub fn run_until_idle(&mut self, dt_ms: f64, max_frames: usize) -> Vec<GameEvent> {
        let mut events = Vec::new();
        for _ in 0..max_frames {
            events.extend(self.frame(dt_ms));
            if self.state.phase != TurnPhase::Rolling && self.input.shot.is_none() {
                break;
            }
        }
        events
    }

    pub fn bodies(&self) -> Vec<BodyView> {
        body_views(&self.state)
    }

    pub fn hud(&self) -> HudView {
        hud_view(&self.state)
    }
}
