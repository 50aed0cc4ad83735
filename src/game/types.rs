//! Core domain types for the spelling game.

use serde::{Deserialize, Serialize};
use strum::Display;

/// A cell coordinate on the board. Origin is the top-left corner; `y` grows
/// downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Column, 0-based.
    pub x: u8,
    /// Row, 0-based.
    pub y: u8,
}

impl Position {
    /// Creates a position from raw coordinates.
    pub fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Returns the neighboring cell one step in `direction`, or `None` if
    /// that step leaves a board of the given size.
    pub fn step(self, direction: Direction, size: u8) -> Option<Position> {
        let (dx, dy) = direction.delta();
        let x = self.x.checked_add_signed(dx)?;
        let y = self.y.checked_add_signed(dy)?;
        if x < size && y < size {
            Some(Position { x, y })
        } else {
            None
        }
    }

    /// Chebyshev (chessboard) distance to another cell.
    pub fn chebyshev(self, other: Position) -> u8 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the four cardinal movement directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Direction {
    /// Toward smaller `y`.
    Up,
    /// Toward larger `y`.
    Down,
    /// Toward smaller `x`.
    Left,
    /// Toward larger `x`.
    Right,
}

impl Direction {
    /// Unit delta for this direction as `(dx, dy)`.
    pub fn delta(self) -> (i8, i8) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Word difficulty tier. Controls the length and complexity of the
/// vocabulary pool a round draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
pub enum Tier {
    /// Short words (3-4 letters).
    Easy,
    /// Medium words (5-6 letters).
    Medium,
    /// Long words (7+ letters).
    Hard,
}

impl Tier {
    /// Numeric level of this tier (1-3).
    pub fn level(self) -> u8 {
        match self {
            Tier::Easy => 1,
            Tier::Medium => 2,
            Tier::Hard => 3,
        }
    }

    /// Parses a numeric level (1-3) back into a tier.
    pub fn from_level(level: u8) -> Option<Tier> {
        match level {
            1 => Some(Tier::Easy),
            2 => Some(Tier::Medium),
            3 => Some(Tier::Hard),
            _ => None,
        }
    }
}

impl Serialize for Tier {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.level())
    }
}

impl<'de> Deserialize<'de> for Tier {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let level = u8::deserialize(deserializer)?;
        Tier::from_level(level)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid difficulty tier: {}", level)))
    }
}

/// A vocabulary word: uppercase German text plus its English translation.
///
/// Immutable once constructed; the session treats it as supplied whole by a
/// word source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    text: String,
    letters: Vec<char>,
    translation: String,
    tier: Tier,
}

impl Word {
    /// Creates a word, normalizing the text to uppercase.
    ///
    /// # Errors
    ///
    /// Returns [`WordError::EmptyText`] if the text contains no letters.
    pub fn new(
        text: impl Into<String>,
        translation: impl Into<String>,
        tier: Tier,
    ) -> Result<Self, WordError> {
        let text = text.into().trim().to_uppercase();
        if text.is_empty() {
            return Err(WordError::EmptyText);
        }
        let letters: Vec<char> = text.chars().collect();
        Ok(Self {
            text,
            letters,
            translation: translation.into(),
            tier,
        })
    }

    /// The uppercase word text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The English translation shown as the round's clue.
    pub fn translation(&self) -> &str {
        &self.translation
    }

    /// Difficulty tier this word belongs to.
    pub fn tier(&self) -> Tier {
        self.tier
    }

    /// Number of letters in the word.
    pub fn len(&self) -> usize {
        self.letters.len()
    }

    /// True for the degenerate zero-letter word (never constructible).
    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    /// Iterates the letters in spelling order.
    pub fn letters(&self) -> impl Iterator<Item = char> + '_ {
        self.letters.iter().copied()
    }

    /// The letter at the given spelling index.
    pub fn letter_at(&self, index: usize) -> Option<char> {
        self.letters.get(index).copied()
    }
}

/// Errors from constructing a [`Word`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordError {
    /// The word text was empty after trimming.
    EmptyText,
}

impl std::fmt::Display for WordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WordError::EmptyText => write!(f, "word text is empty"),
        }
    }
}

impl std::error::Error for WordError {}

/// One required letter placed on the board for the active round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LetterTile {
    /// The letter this tile carries.
    pub letter: char,
    /// Where the tile sits on the board.
    pub position: Position,
    /// Index of this letter in the word's spelling order.
    pub sequence_index: usize,
    /// Whether the player has already collected this tile.
    pub collected: bool,
}

/// The session state machine's current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Game not started, or explicitly stopped.
    Idle,
    /// Round live; the player may move.
    AwaitingInput,
    /// The obstacle caught the player; a fresh round starts after a delay.
    Caught,
    /// Word fully collected; waiting for the next-word trigger.
    RoundComplete,
}
