//! Terminal conditions and pass-through scoring.

use crate::barrier::BarrierSet;
use crate::kinematics::Player;

/// True if the player overlaps any barrier. Touching edges do not count.
pub fn check_collision(player: &Player, barriers: &BarrierSet) -> bool {
    let rect = player.rect();
    barriers.iter().any(|b| rect.overlaps(&b.rect()))
}

/// True once the player's bottom edge is below 0 or its top edge is above `screen_height`.
pub fn check_out_of_bounds(player: &Player, screen_height: f64) -> bool {
    let rect = player.rect();
    rect.bottom() < 0.0 || rect.top() > screen_height
}

/// Adds one point for every unscored barrier whose right edge is left of the player's center.
///
/// Top and bottom halves are scored separately, so a passed pair is worth 2.
pub fn update_score(score: u32, player: &Player, barriers: &mut BarrierSet) -> u32 {
    let mut score = score;
    for barrier in barriers.iter_mut() {
        if !barrier.scored && barrier.right() < player.x {
            barrier.scored = true;
            score += 1;
        }
    }
    score
}
