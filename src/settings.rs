//! Physics and gameplay tuning
//!
//! A static set of named constants supplied at startup. Partial JSON
//! overrides are accepted; anything missing keeps its default.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::Player;

/// Named physics/gameplay constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Board ===
    pub board_width: f32,
    pub board_height: f32,
    /// Number of Lumies; also the score that wins
    pub lumie_count: usize,
    pub lumie_radius: f32,
    /// Center-to-center distance between neighbouring Lumies
    pub lumie_spacing: f32,
    pub striker_radius: f32,

    // === Physics ===
    /// Per-tick velocity multiplier (< 1)
    pub friction: f32,
    /// Per-tick angular velocity multiplier (< 1)
    pub angular_friction: f32,
    /// Speed kept after bouncing off a board edge
    pub wall_restitution: f32,
    /// Below this speed a body snaps to rest
    pub stop_speed: f32,
    /// Lumies wobble only above this speed
    pub wobble_speed: f32,
    /// Eccentric-mass push per tick, as a fraction of current speed.
    /// `friction * (1 + wobble_strength)` must stay below 1.
    pub wobble_strength: f32,
    /// Angular velocity nudge per unit of linear speed
    pub spin_coupling: f32,
    /// Max random angular kick on contact
    pub spin_kick: f32,
    /// Relative normal speed needed to convert a Lumie
    pub impact_threshold: f32,

    // === Shooting ===
    /// Launch speed per unit of drag
    pub power_scale: f32,
    pub max_power: f32,
    pub min_drag: f32,

    // === Timing (ms) ===
    pub lock_ms: f64,
    pub roll_timeout_ms: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            board_width: BOARD_WIDTH,
            board_height: BOARD_HEIGHT,
            lumie_count: LUMIE_COUNT,
            lumie_radius: LUMIE_RADIUS,
            lumie_spacing: LUMIE_SPACING,
            striker_radius: STRIKER_RADIUS,

            friction: 0.95,
            angular_friction: 0.96,
            wall_restitution: 0.9,
            stop_speed: 0.05,
            wobble_speed: 0.3,
            wobble_strength: 0.005,
            spin_coupling: 0.002,
            spin_kick: 0.15,
            impact_threshold: 1.5,

            power_scale: 0.12,
            max_power: 18.0,
            min_drag: MIN_DRAG,

            lock_ms: LOCK_MS,
            roll_timeout_ms: ROLL_TIMEOUT_MS,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON (missing fields keep defaults)
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> String {
        // Plain data with string keys; serialization cannot fail
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Load tuning from a JSON file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning
                }
                Err(err) => {
                    log::warn!("Malformed tuning in {}: {err}; using defaults", path.display());
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!("Cannot read {}: {err}; using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Spawn point of each player's striker
    pub fn spawn_point(&self, player: Player) -> Vec2 {
        let x = match player {
            Player::One => self.board_width * 0.25,
            Player::Two => self.board_width * 0.75,
        };
        Vec2::new(x, self.board_height * 0.85)
    }

    /// Centers of the Lumie row, centered on the board
    pub fn lumie_layout(&self) -> Vec<Vec2> {
        let n = self.lumie_count;
        let row_width = self.lumie_spacing * n.saturating_sub(1) as f32;
        let x0 = (self.board_width - row_width) / 2.0;
        let y = self.board_height / 2.0;
        (0..n)
            .map(|i| Vec2::new(x0 + i as f32 * self.lumie_spacing, y))
            .collect()
    }
}
