//! Wortjagd - a German spelling game with an LLM-backed vocabulary server.
//!
//! The player steers a muncher across a grid, collecting the letters of a
//! hidden German word in spelling order while a chasing obstacle pursues
//! them.
//!
//! # Architecture
//!
//! - **Game core**: board model, movement adjudication, chase AI, and the
//!   session state machine. Headless; emits events, snapshots, and timer
//!   commands instead of touching screens or clocks.
//! - **Runtime**: a single tokio task that owns the session, executes its
//!   timer commands, and feeds the render/feedback sinks.
//! - **Vocabulary**: word sources (built-in list, LLM-generated with
//!   fallback) behind one async seam.
//! - **Server**: axum service exposing vocabulary generation and static
//!   assets.
//! - **TUI**: ratatui front end over the runtime.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use wortjagd::{Direction, GameRules, GameSession, builtin_words};
//!
//! let mut session = GameSession::with_seed(GameRules::default(), 7);
//! let word = builtin_words().into_iter().next().unwrap();
//! session.start(word);
//! session.request_move(Direction::Right, Duration::ZERO);
//! let snapshot = session.snapshot();
//! assert!(snapshot.round.is_some());
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod game;
mod llm;
mod runtime;
mod server;
pub mod tui;
mod vocabulary;
mod words;

// Crate-level exports - configuration
pub use config::{ConfigError, GameRules, LlmSettings, ServerSettings, Settings};

// Crate-level exports - game core
pub use game::{
    Board, BoardError, ChaseOutcome, Command, CompletedWord, Direction, FeedbackSink, GameEvent,
    GameSession, LetterTile, Phase, Position, RenderSink, RoundView, ScheduledAction, Snapshot,
    TileView, Tier, Word, WordError, chase_step,
};

// Crate-level exports - LLM client
pub use llm::{LlmClient, LlmConfig, LlmError, LlmProvider};

// Crate-level exports - runtime
pub use runtime::{
    ChannelFeedback, ChannelRender, GameRuntime, LogFeedback, NullRender, RuntimeHandle,
};

// Crate-level exports - server
pub use server::{GenerateVocabularyRequest, bind_with_retry, router, serve};

// Crate-level exports - vocabulary
pub use vocabulary::{
    GeneratedWordList, StaticWordList, VocabularyEntry, VocabularyError, WordSource,
    parse_vocabulary,
};
pub use words::builtin_words;
