//! Circular rigid bodies
//!
//! One type serves both the player's striker and the Lumies; the role tag
//! decides which extra behavior (wobble, locking) applies.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::random::RandomSource;
use super::state::Tint;
use crate::settings::Tuning;

/// What a body is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// The ball a player launches
    Striker,
    /// A target ball that changes color on impact
    Lumie,
}

/// A circular body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub id: u32,
    pub role: Role,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Orientation (radians)
    pub angle: f32,
    /// Angular velocity (radians per tick)
    pub spin: f32,
    pub tint: Tint,
    /// Match clock (ms) until which a Lumie ignores impacts
    pub locked_until_ms: f64,
    radius: f32,
    mass: f32,
    /// Direction of the off-center weight relative to `angle`
    heavy_phase: f32,
}

impl Body {
    pub fn new(id: u32, role: Role, pos: Vec2, radius: f32, rng: &mut impl RandomSource) -> Self {
        Self {
            id,
            role,
            pos,
            vel: Vec2::ZERO,
            angle: rng.unit() * std::f32::consts::TAU,
            spin: 0.0,
            tint: Tint::Neutral,
            locked_until_ms: 0.0,
            radius,
            mass: radius,
            heavy_phase: rng.unit() * std::f32::consts::TAU,
        }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Mass grows with size so larger balls push harder
    #[inline]
    pub fn mass(&self) -> f32 {
        self.mass
    }

    #[inline]
    pub fn heavy_phase(&self) -> f32 {
        self.heavy_phase
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    #[inline]
    pub fn is_moving(&self) -> bool {
        self.vel != Vec2::ZERO
    }

    /// Whether impacts are ignored at `now_ms`
    #[inline]
    pub fn is_locked(&self, now_ms: f64) -> bool {
        self.role == Role::Lumie && now_ms < self.locked_until_ms
    }

    /// Hard stop, linear and angular
    pub fn halt(&mut self) {
        self.vel = Vec2::ZERO;
        self.spin = 0.0;
    }

    /// Advance one tick: integrate, apply friction, wobble, snap to rest
    pub fn update(&mut self, tuning: &Tuning, rng: &mut impl RandomSource) {
        self.pos += self.vel;
        self.angle += self.spin;

        self.vel *= tuning.friction;
        self.spin *= tuning.angular_friction;

        let speed = self.speed();
        if self.role == Role::Lumie && speed > tuning.wobble_speed {
            // Off-center weight drags the ball toward its heavy side.
            // Proportional to speed, so friction * (1 + wobble_strength) < 1
            // keeps the ball slowing down every tick.
            let heading = self.angle + self.heavy_phase;
            self.vel += Vec2::from_angle(heading) * (speed * tuning.wobble_strength);
            // Sign is redrawn every tick; the jitter is intended
            self.spin += rng.sign() * speed * tuning.spin_coupling;
        }

        if self.speed() < tuning.stop_speed {
            self.halt();
        }
    }
}
