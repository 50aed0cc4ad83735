//! Application state for the terminal front end.

use crate::game::{GameEvent, Phase, Snapshot};
use tracing::debug;

/// Latest snapshot plus the one-line status message.
pub struct App {
    snapshot: Option<Snapshot>,
    status: String,
}

impl App {
    /// Creates the app in its pre-first-snapshot state.
    pub fn new() -> Self {
        Self {
            snapshot: None,
            status: "Starting...".to_string(),
        }
    }

    /// The most recent snapshot, if one has arrived.
    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    /// The current status line.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Stores the latest snapshot.
    pub fn set_snapshot(&mut self, snapshot: Snapshot) {
        self.snapshot = Some(snapshot);
    }

    /// Updates the status line from a game event.
    pub fn handle_event(&mut self, event: &GameEvent) {
        debug!(?event, "handling game event");
        match event {
            GameEvent::RoundStarted { clue, .. } => {
                self.status = format!("Find the German word for \"{}\"!", clue);
            }
            GameEvent::LetterCollected { .. } => {
                self.status = "Yum! Find the next letter!".to_string();
            }
            GameEvent::WrongLetter { expected, .. } => {
                self.status = format!("Oops! You need the letter \"{}\" next!", expected);
            }
            GameEvent::WordCompleted { word, bonus, .. } => {
                self.status = format!("{} complete, +{}! Press 'n' for the next word.", word, bonus);
            }
            GameEvent::TierRaised { tier } => {
                self.status = format!("Difficulty up: {}!", tier);
            }
            GameEvent::ObstacleCaught => {
                self.status = "Caught! A new round starts in a moment...".to_string();
            }
            GameEvent::Stopped => {
                self.status = "Game stopped. Press 'r' to play again, 'q' to quit.".to_string();
            }
            GameEvent::PlayerMoved { .. } | GameEvent::ObstacleMoved { .. } => {}
        }
    }

    /// Whether a round-complete overlay should be shown.
    pub fn round_complete(&self) -> bool {
        self.snapshot
            .as_ref()
            .is_some_and(|s| s.phase == Phase::RoundComplete)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
