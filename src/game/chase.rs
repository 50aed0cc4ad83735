//! Greedy chase step for the obstacle.

use super::board::Board;
use super::types::Position;
use serde::{Deserialize, Serialize};

/// Result of advancing the obstacle one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChaseOutcome {
    /// The obstacle moved to the given cell.
    Moved(Position),
    /// The chosen cell holds an uncollected tile; the obstacle stays put.
    Blocked,
    /// The obstacle reached the player's cell.
    Caught,
}

/// Computes one greedy Manhattan step from `obstacle` toward `player`.
///
/// The obstacle advances along the axis with the larger absolute distance;
/// a tie goes to the vertical axis. It never steps onto an uncollected
/// letter tile and does not try the other axis when blocked.
pub fn chase_step(obstacle: Position, player: Position, board: &Board) -> ChaseOutcome {
    let dx = player.x as i16 - obstacle.x as i16;
    let dy = player.y as i16 - obstacle.y as i16;
    if dx == 0 && dy == 0 {
        return ChaseOutcome::Caught;
    }

    let (cx, cy) = if dx.abs() > dy.abs() {
        (obstacle.x as i16 + dx.signum(), obstacle.y as i16)
    } else {
        (obstacle.x as i16, obstacle.y as i16 + dy.signum())
    };

    let size = board.size() as i16;
    if cx < 0 || cy < 0 || cx >= size || cy >= size {
        return ChaseOutcome::Blocked;
    }
    let candidate = Position::new(cx as u8, cy as u8);

    if board.tile_at(candidate).is_some() {
        return ChaseOutcome::Blocked;
    }
    if candidate == player {
        return ChaseOutcome::Caught;
    }
    ChaseOutcome::Moved(candidate)
}
