//! Match state and conversion rules
//!
//! Everything a match needs lives in `GameState`; the tick and the session
//! facade receive it by `&mut` and nothing else holds game data.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{Body, Role};
use super::random::RandomSource;
use crate::settings::Tuning;

/// Ball color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tint {
    Neutral,
    Green,
    Blue,
}

impl Tint {
    /// The other player color (`Neutral` stays `Neutral`)
    pub fn opposite(self) -> Self {
        match self {
            Tint::Neutral => Tint::Neutral,
            Tint::Green => Tint::Blue,
            Tint::Blue => Tint::Green,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tint::Neutral => "neutral",
            Tint::Green => "green",
            Tint::Blue => "blue",
        }
    }
}

/// Seat at the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub fn other(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// 1 or 2
    pub fn number(self) -> u8 {
        match self {
            Player::One => 1,
            Player::Two => 2,
        }
    }
}

/// Turn phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnPhase {
    /// Waiting for a shot
    Aiming,
    /// Bodies in motion; input ignored
    Rolling,
    /// Roll finished, deciding who plays next
    Resolving,
    /// A color owns every Lumie
    Over,
}

/// One conversion made during the current roll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorChange {
    pub body_id: u32,
    pub before: Tint,
    pub after: Tint,
}

/// Lumies held per color
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scores {
    pub green: usize,
    pub blue: usize,
}

impl Scores {
    pub fn of(&self, tint: Tint) -> usize {
        match tint {
            Tint::Green => self.green,
            Tint::Blue => self.blue,
            Tint::Neutral => 0,
        }
    }
}

/// Discrete notifications for a presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RollStarted { player: Player, velocity: Vec2 },
    LumieConverted { change: ColorChange },
    /// First blood: colors are now fixed for the match
    ColorAssigned { player: Player, tint: Tint },
    TurnChanged { player: Player, replay: bool },
    MatchWon { tint: Tint },
    MatchReset,
}

/// Complete match state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub tuning: Tuning,
    /// Match clock (ms)
    pub clock_ms: f64,
    pub phase: TurnPhase,
    pub current_player: Player,
    /// Color of player one / player two, fixed by first blood
    pub colors: [Option<Tint>; 2],
    pub scores: Scores,
    pub winner: Option<Tint>,
    /// Lumies first, striker last
    pub bodies: Vec<Body>,
    /// Conversions made since the current roll started
    pub changes: Vec<ColorChange>,
    pub roll_started_ms: f64,
    /// Turns played so far (replays included)
    pub turn: u32,
    /// Pending notifications, drained by the session
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Fresh match: Lumies in their row, player one to shoot
    pub fn new(tuning: Tuning, rng: &mut impl RandomSource) -> Self {
        let mut state = Self {
            tuning,
            clock_ms: 0.0,
            phase: TurnPhase::Aiming,
            current_player: Player::One,
            colors: [None, None],
            scores: Scores::default(),
            winner: None,
            bodies: Vec::new(),
            changes: Vec::new(),
            roll_started_ms: 0.0,
            turn: 1,
            events: Vec::new(),
            next_id: 1,
        };
        state.place_lumies(rng);
        state.spawn_striker(rng);
        state
    }

    /// Allocate a new body ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn place_lumies(&mut self, rng: &mut impl RandomSource) {
        let radius = self.tuning.lumie_radius;
        for pos in self.tuning.lumie_layout() {
            let id = self.next_entity_id();
            self.bodies.push(Body::new(id, Role::Lumie, pos, radius, rng));
        }
    }

    /// Replace the striker with a new one at the current player's spawn
    pub fn spawn_striker(&mut self, rng: &mut impl RandomSource) {
        self.bodies.retain(|b| b.role != Role::Striker);
        let id = self.next_entity_id();
        let pos = self.tuning.spawn_point(self.current_player);
        let mut striker = Body::new(id, Role::Striker, pos, self.tuning.striker_radius, rng);
        striker.tint = self.color_of(self.current_player).unwrap_or(Tint::Neutral);
        self.bodies.push(striker);
    }

    pub fn striker(&self) -> Option<&Body> {
        self.bodies.iter().find(|b| b.role == Role::Striker)
    }

    pub fn striker_mut(&mut self) -> Option<&mut Body> {
        self.bodies.iter_mut().find(|b| b.role == Role::Striker)
    }

    pub fn lumies(&self) -> impl Iterator<Item = &Body> {
        self.bodies.iter().filter(|b| b.role == Role::Lumie)
    }

    pub fn color_of(&self, player: Player) -> Option<Tint> {
        self.colors[player.number() as usize - 1]
    }

    pub fn is_over(&self) -> bool {
        self.phase == TurnPhase::Over
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Recount scores from Lumie colors
    pub fn recount_scores(&mut self) {
        let mut scores = Scores::default();
        for lumie in self.lumies() {
            match lumie.tint {
                Tint::Green => scores.green += 1,
                Tint::Blue => scores.blue += 1,
                Tint::Neutral => {}
            }
        }
        self.scores = scores;
    }

    /// Release every Lumie whose lock has run out
    pub fn clear_expired_locks(&mut self) {
        let now = self.clock_ms;
        for body in self.bodies.iter_mut() {
            if body.role == Role::Lumie && body.locked_until_ms != 0.0 && now >= body.locked_until_ms {
                body.locked_until_ms = 0.0;
            }
        }
    }

    /// Apply the conversion rule to the body at `index`
    ///
    /// Returns the change made, or `None` if the body is not a Lumie, is
    /// still locked, or the match is already over.
    pub fn convert_lumie(&mut self, index: usize, rng: &mut impl RandomSource) -> Option<ColorChange> {
        if self.is_over() {
            return None;
        }
        let now = self.clock_ms;
        let lock_ms = self.tuning.lock_ms;
        let body = self.bodies.get_mut(index)?;
        if body.role != Role::Lumie || body.is_locked(now) {
            return None;
        }

        let before = body.tint;
        let after = match before {
            Tint::Neutral => {
                if rng.coin() {
                    Tint::Green
                } else {
                    Tint::Blue
                }
            }
            other => other.opposite(),
        };
        body.tint = after;
        body.locked_until_ms = now + lock_ms;

        let change = ColorChange {
            body_id: body.id,
            before,
            after,
        };
        self.changes.push(change);
        self.push_event(GameEvent::LumieConverted { change });
        log::trace!("Lumie {} {} -> {}", change.body_id, before.as_str(), after.as_str());

        if self.colors == [None, None] {
            self.assign_colors(self.current_player, after);
        }

        self.recount_scores();
        if self.scores.of(after) >= self.tuning.lumie_count {
            self.finish(after);
        }
        Some(change)
    }

    /// First blood: `player` takes `tint`, the opponent the other color
    fn assign_colors(&mut self, player: Player, tint: Tint) {
        self.colors[player.number() as usize - 1] = Some(tint);
        self.colors[player.other().number() as usize - 1] = Some(tint.opposite());
        if let Some(striker) = self.striker_mut() {
            striker.tint = tint;
        }
        log::info!(
            "First blood: player {} is {}, player {} is {}",
            player.number(),
            tint.as_str(),
            player.other().number(),
            tint.opposite().as_str()
        );
        self.push_event(GameEvent::ColorAssigned { player, tint });
        self.push_event(GameEvent::ColorAssigned {
            player: player.other(),
            tint: tint.opposite(),
        });
    }

    /// End the match in `tint`'s favor and freeze the board
    fn finish(&mut self, tint: Tint) {
        self.phase = TurnPhase::Over;
        self.winner = Some(tint);
        for body in self.bodies.iter_mut() {
            body.halt();
        }
        log::info!("{} wins after {} turns", tint.as_str(), self.turn);
        self.push_event(GameEvent::MatchWon { tint });
    }

    /// Reset for another match with the same tuning
    pub fn rematch(&mut self, rng: &mut impl RandomSource) {
        let tuning = self.tuning.clone();
        *self = Self::new(tuning, rng);
        log::info!("Rematch");
        self.push_event(GameEvent::MatchReset);
    }
}
