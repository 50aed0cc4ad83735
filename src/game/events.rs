//! Domain events, scheduling commands, and render snapshots.
//!
//! The session core never touches a screen, a speaker, or a timer. It
//! records [`GameEvent`]s for feedback consumers, [`Command`]s for the
//! driver that owns the clock, and produces an immutable [`Snapshot`]
//! sufficient to redraw the whole game.

use super::types::{Phase, Position, Tier};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A discrete thing that happened inside the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A fresh round began.
    RoundStarted {
        /// The English clue the player must spell the German word for.
        clue: String,
        /// Number of letters in the hidden word.
        length: usize,
        /// Tier the word was drawn from.
        tier: Tier,
    },
    /// The player translated to a new cell.
    PlayerMoved {
        /// Cell the player left.
        from: Position,
        /// Cell the player entered.
        to: Position,
    },
    /// The player collected the next required letter.
    LetterCollected {
        /// The collected letter.
        letter: char,
        /// Its index in the spelling order.
        sequence_index: usize,
        /// Points awarded.
        points: u32,
    },
    /// The player touched a letter out of spelling order.
    WrongLetter {
        /// The letter on the touched tile.
        touched: char,
        /// The letter actually required next.
        expected: char,
    },
    /// The word was fully collected and the bonus applied.
    WordCompleted {
        /// The completed German word.
        word: String,
        /// Its English translation.
        translation: String,
        /// Bonus points awarded.
        bonus: u32,
    },
    /// Cumulative score pushed the difficulty tier up.
    TierRaised {
        /// The new tier.
        tier: Tier,
    },
    /// The obstacle advanced one cell.
    ObstacleMoved {
        /// Cell the obstacle left.
        from: Position,
        /// Cell the obstacle entered.
        to: Position,
    },
    /// The obstacle reached the player; the round restarts after a delay.
    ObstacleCaught,
    /// The session was stopped.
    Stopped,
}

/// Deferred session operations the driver schedules on the session's behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduledAction {
    /// Apply the completion bonus and enter `RoundComplete`.
    FinishRound,
    /// Begin a fresh round after the obstacle caught the player.
    RecoverFromCatch,
}

/// Instructions for the driver that owns timers.
///
/// Every deferred action carries the round generation observed when it was
/// issued; the session ignores an action whose generation has advanced, so
/// a stale timer can never mutate a newer round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Run `action` after `delay`, tagged with the issuing generation.
    Schedule {
        /// What to run.
        action: ScheduledAction,
        /// How long to wait.
        delay: Duration,
        /// Round generation at scheduling time.
        generation: u64,
    },
    /// (Re)start the fixed-period obstacle timer.
    StartObstacleTimer {
        /// Tick period.
        period: Duration,
    },
    /// Stop the obstacle timer.
    StopObstacleTimer,
}

/// A letter tile as the render layer sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileView {
    /// The letter shown on the tile.
    pub letter: char,
    /// Where it sits.
    pub position: Position,
}

/// Board-level state of the live round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundView {
    /// Board edge length.
    pub board_size: u8,
    /// The player's cell.
    pub player: Position,
    /// The obstacle's cell, when placed.
    pub obstacle: Option<Position>,
    /// Uncollected tiles in spelling order.
    pub tiles: Vec<TileView>,
    /// The English clue for the hidden word.
    pub clue: String,
    /// Letters collected so far, in order.
    pub collected: String,
}

/// Payload shown when a word is completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedWord {
    /// The completed German word.
    pub word: String,
    /// Its English translation.
    pub translation: String,
}

/// Immutable state snapshot sufficient to redraw the whole game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Session phase.
    pub phase: Phase,
    /// Cumulative score.
    pub score: u32,
    /// Current difficulty tier.
    pub tier: Tier,
    /// Live round state; absent while idle.
    pub round: Option<RoundView>,
    /// Completed-word payload while in `RoundComplete`.
    pub completed: Option<CompletedWord>,
}

/// Consumes state snapshots after every core mutation.
pub trait RenderSink: Send {
    /// Receives the latest snapshot.
    fn render(&mut self, snapshot: &Snapshot);
}

/// Receives discrete domain events, fire-and-forget.
pub trait FeedbackSink: Send {
    /// Receives one event.
    fn notify(&mut self, event: &GameEvent);
}
