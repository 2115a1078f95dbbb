//! Collision detection and response between circular bodies
//!
//! Contacts are resolved in two steps: positional correction so the pair
//! ends exactly touching, then a 1-D elastic exchange along the contact
//! normal with mass equal to radius.

use glam::Vec2;

use super::body::Body;
use super::random::RandomSource;
use crate::settings::Tuning;
use crate::{split_along, unit_or};

/// Normal used when two centers coincide exactly
pub const FALLBACK_NORMAL: Vec2 = Vec2::X;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether the bodies overlapped
    pub hit: bool,
    /// Unit normal pointing from the first body toward the second
    pub normal: Vec2,
    /// Overlap depth before separation
    pub penetration: f32,
    /// Closing speed along the normal before the response
    pub intensity: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            penetration: 0.0,
            intensity: 0.0,
        }
    }

    /// Whether this contact is hard enough to convert a Lumie
    pub fn converts(&self, tuning: &Tuning) -> bool {
        self.hit && self.intensity > tuning.impact_threshold
    }
}

/// New normal speeds after a 1-D elastic collision
#[inline]
pub fn elastic_exchange(m1: f32, v1: f32, m2: f32, v2: f32) -> (f32, f32) {
    let total = m1 + m2;
    let v1_after = ((m1 - m2) * v1 + 2.0 * m2 * v2) / total;
    let v2_after = ((m2 - m1) * v2 + 2.0 * m1 * v1) / total;
    (v1_after, v2_after)
}

/// Detect and resolve a contact between `a` and `b`
pub fn resolve_collision(
    a: &mut Body,
    b: &mut Body,
    tuning: &Tuning,
    rng: &mut impl RandomSource,
) -> CollisionResult {
    let delta = b.pos - a.pos;
    let dist = delta.length();
    let reach = a.radius() + b.radius();
    if dist >= reach {
        return CollisionResult::miss();
    }

    let normal = unit_or(delta, FALLBACK_NORMAL);
    let penetration = reach - dist;

    // Split the correction evenly
    a.pos -= normal * (penetration * 0.5);
    b.pos += normal * (penetration * 0.5);

    let (va, ta) = split_along(a.vel, normal);
    let (vb, tb) = split_along(b.vel, normal);
    let intensity = (va - vb).abs();

    let (va_after, vb_after) = elastic_exchange(a.mass(), va, b.mass(), vb);
    a.vel = ta + normal * va_after;
    b.vel = tb + normal * vb_after;

    // Desynchronize rotation after every contact
    a.spin += rng.signed() * tuning.spin_kick;
    b.spin += rng.signed() * tuning.spin_kick;

    CollisionResult {
        hit: true,
        normal,
        penetration,
        intensity,
    }
}

/// Keep a body inside the board, reflecting velocity off each edge it
/// crossed. Returns true if it touched a wall.
pub fn bounce_off_walls(body: &mut Body, width: f32, height: f32, restitution: f32) -> bool {
    let r = body.radius();
    let mut hit = false;

    if body.pos.x - r < 0.0 {
        body.pos.x = r;
        body.vel.x = body.vel.x.abs() * restitution;
        hit = true;
    } else if body.pos.x + r > width {
        body.pos.x = width - r;
        body.vel.x = -body.vel.x.abs() * restitution;
        hit = true;
    }

    if body.pos.y - r < 0.0 {
        body.pos.y = r;
        body.vel.y = body.vel.y.abs() * restitution;
        hit = true;
    } else if body.pos.y + r > height {
        body.pos.y = height - r;
        body.vel.y = -body.vel.y.abs() * restitution;
        hit = true;
    }

    hit
}
