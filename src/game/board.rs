//! Authoritative occupancy map for one round.

use super::types::{LetterTile, Position, Word};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Board state for a single round: player, obstacle, and letter tiles.
///
/// Invariant: the player, the obstacle, and every uncollected tile occupy
/// pairwise distinct cells once a move has fully resolved. Tiles are stored
/// in spelling order, so a tile's index in the sequence equals its
/// `sequence_index`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    size: u8,
    player: Position,
    obstacle: Option<Position>,
    tiles: Vec<LetterTile>,
}

impl Board {
    /// Generates a fresh board for `word`: random player cell, one
    /// rejection-sampled tile per letter, and the obstacle at the corner
    /// opposite the player's start.
    ///
    /// # Panics
    ///
    /// Panics if the board cannot hold the word plus the player
    /// (`size * size` must exceed the word length plus one).
    #[instrument(skip(word, rng), fields(word_len = word.len(), size))]
    pub fn generate(word: &Word, size: u8, rng: &mut impl Rng) -> Self {
        assert!(
            (size as usize) * (size as usize) > word.len() + 1,
            "board of size {} cannot hold a {}-letter word",
            size,
            word.len()
        );

        let player = Self::random_free_cell(size, &[], rng);
        let mut used = vec![player];
        let mut tiles = Vec::with_capacity(word.len());
        for (sequence_index, letter) in word.letters().enumerate() {
            let position = Self::random_free_cell(size, &used, rng);
            used.push(position);
            tiles.push(LetterTile {
                letter,
                position,
                sequence_index,
                collected: false,
            });
        }

        let obstacle = Self::obstacle_start(size, player, &tiles);
        Self {
            size,
            player,
            obstacle: Some(obstacle),
            tiles,
        }
    }

    /// Builds a board from an explicit layout, validating the occupancy
    /// invariants. Intended for deterministic scenarios and tests.
    ///
    /// # Errors
    ///
    /// Returns a [`BoardError`] when a piece lies off the board, two pieces
    /// share a cell, or the tiles are not numbered `0..n` in order.
    pub fn from_parts(
        size: u8,
        player: Position,
        obstacle: Option<Position>,
        tiles: Vec<LetterTile>,
    ) -> Result<Self, BoardError> {
        let in_bounds = |p: Position| p.x < size && p.y < size;
        if !in_bounds(player)
            || obstacle.is_some_and(|o| !in_bounds(o))
            || tiles.iter().any(|t| !in_bounds(t.position))
        {
            return Err(BoardError::OutOfBounds);
        }
        if tiles
            .iter()
            .enumerate()
            .any(|(index, tile)| tile.sequence_index != index)
        {
            return Err(BoardError::BadSequence);
        }

        let mut occupied = vec![player];
        occupied.extend(obstacle);
        for tile in tiles.iter().filter(|t| !t.collected) {
            occupied.push(tile.position);
        }
        let mut deduped = occupied.clone();
        deduped.sort_by_key(|p| (p.x, p.y));
        deduped.dedup();
        if deduped.len() != occupied.len() {
            return Err(BoardError::OverlappingPieces);
        }

        Ok(Self {
            size,
            player,
            obstacle,
            tiles,
        })
    }

    fn random_free_cell(size: u8, used: &[Position], rng: &mut impl Rng) -> Position {
        loop {
            let candidate = Position {
                x: rng.gen_range(0..size),
                y: rng.gen_range(0..size),
            };
            if !used.contains(&candidate) {
                return candidate;
            }
        }
    }

    /// Starting cell for the obstacle: the corner opposite the player's
    /// start. When that corner already holds a tile, the free corner
    /// farthest (Chebyshev) from the player wins, first in scan order on
    /// ties; if every corner is taken, the first free cell in row-major
    /// order is used.
    fn obstacle_start(size: u8, player: Position, tiles: &[LetterTile]) -> Position {
        let far = size - 1;
        let is_free = |cell: Position| cell != player && !tiles.iter().any(|t| t.position == cell);

        let corner = Position {
            x: if player.x == 0 { far } else { 0 },
            y: if player.y == 0 { far } else { 0 },
        };
        if is_free(corner) {
            return corner;
        }

        let corners = [
            Position::new(0, 0),
            Position::new(far, 0),
            Position::new(0, far),
            Position::new(far, far),
        ];
        let mut best: Option<Position> = None;
        for candidate in corners {
            if candidate == corner || !is_free(candidate) {
                continue;
            }
            if best.is_none_or(|b| candidate.chebyshev(player) > b.chebyshev(player)) {
                best = Some(candidate);
            }
        }
        if let Some(found) = best {
            return found;
        }

        for y in 0..size {
            for x in 0..size {
                let cell = Position::new(x, y);
                if is_free(cell) {
                    return cell;
                }
            }
        }
        unreachable!("generate() asserts the board holds more cells than pieces")
    }

    /// Board edge length.
    pub fn size(&self) -> u8 {
        self.size
    }

    /// The player's current cell.
    pub fn player(&self) -> Position {
        self.player
    }

    /// The obstacle's current cell, if one is placed.
    pub fn obstacle(&self) -> Option<Position> {
        self.obstacle
    }

    /// All tiles of the round in spelling order, collected ones included.
    pub fn tiles(&self) -> &[LetterTile] {
        &self.tiles
    }

    /// Iterates the tiles still waiting to be collected.
    pub fn uncollected(&self) -> impl Iterator<Item = &LetterTile> {
        self.tiles.iter().filter(|t| !t.collected)
    }

    /// The uncollected tile at `position`, if any.
    pub fn tile_at(&self, position: Position) -> Option<&LetterTile> {
        self.uncollected().find(|t| t.position == position)
    }

    /// Whether the obstacle occupies `position`.
    pub fn is_occupied_by_obstacle(&self, position: Position) -> bool {
        self.obstacle == Some(position)
    }

    /// Marks the tile with the given spelling index as collected.
    pub fn collect(&mut self, sequence_index: usize) {
        if let Some(tile) = self.tiles.get_mut(sequence_index) {
            debug_assert!(!tile.collected, "tile {} collected twice", sequence_index);
            tile.collected = true;
        }
    }

    /// Moves the player to `to`.
    pub fn move_player(&mut self, to: Position) {
        self.player = to;
    }

    /// Moves the obstacle to `to`.
    pub fn move_obstacle(&mut self, to: Position) {
        self.obstacle = Some(to);
    }
}

/// Errors from building a board from an explicit layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// A piece lies outside the board.
    OutOfBounds,
    /// Two pieces share a cell.
    OverlappingPieces,
    /// Tile sequence indices are not `0..n` in order.
    BadSequence,
}

impl std::fmt::Display for BoardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoardError::OutOfBounds => write!(f, "piece placed outside the board"),
            BoardError::OverlappingPieces => write!(f, "two pieces share a cell"),
            BoardError::BadSequence => write!(f, "tile sequence indices are not 0..n in order"),
        }
    }
}

impl std::error::Error for BoardError {}
