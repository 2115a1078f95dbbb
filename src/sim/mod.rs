//! Simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering
//! and platform dependencies:
//! - One step per frame, bodies iterated in a stable order
//! - Randomness only through an injected `RandomSource`
//! - All match data in a single `GameState`

pub mod aim;
pub mod body;
pub mod collision;
pub mod random;
pub mod state;
pub mod tick;
pub mod view;

pub use aim::AimGesture;
pub use body::{Body, Role};
pub use collision::{CollisionResult, FALLBACK_NORMAL, bounce_off_walls, resolve_collision};
pub use random::{RandomSource, seeded};
pub use state::{ColorChange, GameEvent, GameState, Player, Scores, Tint, TurnPhase};
pub use tick::{TickInput, earns_replay, launch_velocity, next_player, shoot, step_physics, tick};
pub use view::{BodyView, HudView, body_views, hud_view};
