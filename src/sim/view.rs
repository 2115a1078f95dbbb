//! Read-only snapshots for the renderer and the HUD

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::Role;
use super::state::{GameState, Player, Scores, Tint, TurnPhase};

/// What the renderer needs to draw one body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyView {
    pub id: u32,
    pub role: Role,
    pub pos: Vec2,
    pub radius: f32,
    pub tint: Tint,
    pub angle: f32,
    pub locked: bool,
}

/// Score display and turn badge
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HudView {
    pub scores: Scores,
    pub current_player: Player,
    /// `None` until first blood
    pub current_color: Option<Tint>,
    pub phase: TurnPhase,
    pub winner: Option<Tint>,
    pub turn: u32,
}

pub fn body_views(state: &GameState) -> Vec<BodyView> {
    state
        .bodies
        .iter()
        .map(|b| BodyView {
            id: b.id,
            role: b.role,
            pos: b.pos,
            radius: b.radius(),
            tint: b.tint,
            angle: b.angle,
            locked: b.is_locked(state.clock_ms),
        })
        .collect()
}

pub fn hud_view(state: &GameState) -> HudView {
    HudView {
        scores: state.scores,
        current_player: state.current_player,
        current_color: state.color_of(state.current_player),
        phase: state.phase,
        winner: state.winner,
        turn: state.turn,
    }
}
