//! Keyboard mapping for the terminal front end.

use crate::game::Direction;
use crossterm::event::KeyCode;

/// What a key press asks the game to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Move the player.
    Move(Direction),
    /// Advance to the next word after a completed round.
    NextWord,
    /// Restart the game from scratch.
    Restart,
    /// Leave the game.
    Quit,
}

/// Maps a key code to its action, if any.
pub fn action_for(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Up | KeyCode::Char('w') => Some(Action::Move(Direction::Up)),
        KeyCode::Down | KeyCode::Char('s') => Some(Action::Move(Direction::Down)),
        KeyCode::Left | KeyCode::Char('a') => Some(Action::Move(Direction::Left)),
        KeyCode::Right | KeyCode::Char('d') => Some(Action::Move(Direction::Right)),
        KeyCode::Char('n') | KeyCode::Enter => Some(Action::NextWord),
        KeyCode::Char('r') => Some(Action::Restart),
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        _ => None,
    }
}
