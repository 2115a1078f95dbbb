//! Slingshot aiming
//!
//! The player presses on the board, drags back, and releases. The drag
//! vector runs from the release point to the press point, so pulling left
//! shoots right.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An in-progress drag
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AimGesture {
    anchor: Option<Vec2>,
    current: Vec2,
}

impl AimGesture {
    pub fn start(&mut self, pos: Vec2) {
        self.anchor = Some(pos);
        self.current = pos;
    }

    /// Move the pointer; ignored when no drag is in progress
    pub fn update(&mut self, pos: Vec2) {
        if self.anchor.is_some() {
            self.current = pos;
        }
    }

    pub fn is_active(&self) -> bool {
        self.anchor.is_some()
    }

    /// Current drag vector, if aiming
    pub fn drag(&self) -> Option<Vec2> {
        self.anchor.map(|anchor| anchor - self.current)
    }

    pub fn cancel(&mut self) {
        self.anchor = None;
    }

    /// Finish the gesture. Yields the drag only if it is at least `min_drag` long.
    pub fn commit(&mut self, min_drag: f32) -> Option<Vec2> {
        let drag = self.drag();
        self.cancel();
        drag.filter(|d| d.length() >= min_drag)
    }
}
