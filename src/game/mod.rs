//! The game core: board model, movement adjudication, obstacle chase, and
//! the session state machine. Headless by construction; rendering, audio,
//! and timers live behind the seams in [`events`].

mod board;
mod chase;
mod events;
mod session;
mod types;

pub use board::{Board, BoardError};
pub use chase::{ChaseOutcome, chase_step};
pub use events::{
    Command, CompletedWord, FeedbackSink, GameEvent, RenderSink, RoundView, ScheduledAction,
    Snapshot, TileView,
};
pub use session::GameSession;
pub use types::{Direction, LetterTile, Phase, Position, Tier, Word, WordError};
