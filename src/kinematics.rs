//! Gravity and jump integration for the player.

use crate::config::GameConfig;
use crate::geometry::Rect;

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Fixed for the whole run.
    pub x: f64,
    pub y: f64,
    /// Positive is upward.
    pub vy: f64,
    pub width: f64,
    pub height: f64,
}

impl Player {
    /// A player at the start position with zero velocity.
    pub fn spawn(config: &GameConfig) -> Self {
        Self {
            x: config.player_start_x,
            y: config.player_start_y,
            vy: 0.0,
            width: config.player_width,
            height: config.player_height,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kinematics {
    pub gravity: f64,
    pub jump_strength: f64,
}

impl Kinematics {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            gravity: config.gravity,
            jump_strength: config.jump_strength,
        }
    }

    /// One fixed step: gravity first, then position.
    ///
    /// `_dt` is the frame time reported by the host. Steps are per frame, not per second,
    /// so it is not used.
    pub fn advance(&self, player: &mut Player, _dt: f64) {
        player.vy -= self.gravity;
        player.y += player.vy;
    }

    pub fn jump(&self, player: &mut Player) {
        player.vy = self.jump_strength;
    }
}
