//! Lumies - a two-player billiard party game
//!
//! Core modules:
//! - `sim`: Simulation (bodies, collisions, turn/match state machine)
//! - `game`: Session facade driven by a frontend once per frame
//! - `settings`: Physics and gameplay tuning

pub mod game;
pub mod settings;
pub mod sim;

pub use game::Game;
pub use settings::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Nominal frame duration in milliseconds (60 Hz animation tick)
    pub const FRAME_MS: f64 = 1000.0 / 60.0;

    /// Board dimensions
    pub const BOARD_WIDTH: f32 = 800.0;
    pub const BOARD_HEIGHT: f32 = 600.0;

    /// Number of Lumies on the board; converting all of them wins
    pub const LUMIE_COUNT: usize = 5;
    pub const LUMIE_RADIUS: f32 = 22.0;
    pub const LUMIE_SPACING: f32 = 110.0;
    pub const STRIKER_RADIUS: f32 = 16.0;

    /// Lock window after a conversion (ms)
    pub const LOCK_MS: f64 = 4000.0;
    /// Hard cap on a single roll (ms)
    pub const ROLL_TIMEOUT_MS: f64 = 3000.0;

    /// Shortest drag that counts as a shot
    pub const MIN_DRAG: f32 = 5.0;
}

/// Normalize `v`, or return `fallback` when `v` is too short to have a direction
#[inline]
pub fn unit_or(v: Vec2, fallback: Vec2) -> Vec2 {
    let len = v.length();
    if len < f32::EPSILON || !len.is_finite() {
        fallback
    } else {
        v / len
    }
}

/// Split `v` into its component along unit `normal` and the tangential remainder
#[inline]
pub fn split_along(v: Vec2, normal: Vec2) -> (f32, Vec2) {
    let along = v.dot(normal);
    (along, v - normal * along)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_or_fallback() {
        assert_eq!(unit_or(Vec2::ZERO, Vec2::X), Vec2::X);
        let n = unit_or(Vec2::new(3.0, 4.0), Vec2::X);
        assert!((n.length() - 1.0).abs() < 1e-6);
        assert!((n.x - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_split_along() {
        let (along, tangent) = split_along(Vec2::new(2.0, 5.0), Vec2::X);
        assert!((along - 2.0).abs() < 1e-6);
        assert_eq!(tangent, Vec2::new(0.0, 5.0));
    }
}
