//! The game session state machine.
//!
//! [`GameSession`] owns the board and all session fields; every mutation
//! goes through its operations. Timer-driven behavior is expressed as
//! [`Command`]s for the driver, tagged with a round generation so stale
//! timers become no-ops instead of corrupting a newer round.

use super::board::{Board, BoardError};
use super::chase::{ChaseOutcome, chase_step};
use super::events::{Command, CompletedWord, GameEvent, RoundView, ScheduledAction, Snapshot, TileView};
use super::types::{Direction, Phase, Tier, Word};
use crate::config::GameRules;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// State of the live round.
#[derive(Debug, Clone)]
struct Round {
    word: Word,
    board: Board,
    collected_count: usize,
}

/// One player's game: score, difficulty, phase, and the live round.
///
/// All async activity (player input, obstacle ticks, deferred completions)
/// must be serialized onto this state by the caller; the runtime does so by
/// owning the session from a single task.
#[derive(Debug)]
pub struct GameSession {
    rules: GameRules,
    score: u32,
    tier: Tier,
    phase: Phase,
    running: bool,
    round: Option<Round>,
    generation: u64,
    cooldown_until: Option<Duration>,
    rng: SmallRng,
    events: Vec<GameEvent>,
    commands: Vec<Command>,
}

impl GameSession {
    /// Creates an idle session with the given rules.
    #[instrument(skip(rules))]
    pub fn new(rules: GameRules) -> Self {
        Self::with_rng(rules, SmallRng::from_entropy())
    }

    /// Creates a session whose board layouts are deterministic for a seed.
    pub fn with_seed(rules: GameRules, seed: u64) -> Self {
        Self::with_rng(rules, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(rules: GameRules, rng: SmallRng) -> Self {
        let tier = rules.starting_tier();
        Self {
            rules,
            score: 0,
            tier,
            phase: Phase::Idle,
            running: false,
            round: None,
            generation: 0,
            cooldown_until: None,
            rng,
            events: Vec::new(),
            commands: Vec::new(),
        }
    }

    /// Starts the game: resets the score and begins the first round.
    #[instrument(skip(self, word), fields(word_len = word.len(), tier = ?word.tier()))]
    pub fn start(&mut self, word: Word) {
        info!("starting game");
        self.score = 0;
        self.running = true;
        self.begin_round(word);
    }

    /// Starts the game with an explicit board layout instead of a random
    /// one. Intended for deterministic scenarios and tests.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::BadSequence`] if the board's tiles don't spell
    /// `word`.
    pub fn start_with_board(&mut self, word: Word, board: Board) -> Result<(), BoardError> {
        Self::check_board_spells(&word, &board)?;
        self.score = 0;
        self.running = true;
        self.install_round(word, board);
        Ok(())
    }

    /// Stops the game: clears the board and guarantees no pending deferred
    /// action can mutate state afterward.
    #[instrument(skip(self))]
    pub fn stop(&mut self) {
        if !self.running && self.phase == Phase::Idle {
            return;
        }
        info!(score = self.score, "stopping game");
        self.generation += 1;
        self.running = false;
        self.phase = Phase::Idle;
        self.round = None;
        self.cooldown_until = None;
        self.commands.push(Command::StopObstacleTimer);
        self.events.push(GameEvent::Stopped);
    }

    /// Adjudicates one discrete move request at game time `now`.
    ///
    /// Silently ignored outside `AwaitingInput`, while the movement cooldown
    /// is active, or when the target lies off the board (an off-board
    /// request does not engage the cooldown). Moving onto the obstacle's
    /// cell triggers a catch without translating the player.
    #[instrument(skip(self), fields(phase = ?self.phase))]
    pub fn request_move(&mut self, direction: Direction, now: Duration) {
        if self.phase != Phase::AwaitingInput {
            return;
        }
        if self.cooldown_until.is_some_and(|until| now < until) {
            debug!("move ignored: cooldown active");
            return;
        }
        let Some(round) = self.round.as_ref() else {
            return;
        };
        let from = round.board.player();
        let Some(target) = from.step(direction, round.board.size()) else {
            debug!("move ignored: target off the board");
            return;
        };
        if round.board.is_occupied_by_obstacle(target) {
            self.catch();
            return;
        }

        let Some(round) = self.round.as_mut() else {
            return;
        };
        round.board.move_player(target);
        self.cooldown_until = Some(now + self.rules.movement_cooldown());
        self.events.push(GameEvent::PlayerMoved { from, to: target });

        let Some(tile) = round.board.tile_at(target) else {
            return;
        };
        let (letter, sequence_index) = (tile.letter, tile.sequence_index);
        if sequence_index == round.collected_count {
            round.board.collect(sequence_index);
            round.collected_count += 1;
            self.score += self.rules.points_per_letter();
            debug!(%letter, sequence_index, score = self.score, "letter collected");
            self.events.push(GameEvent::LetterCollected {
                letter,
                sequence_index,
                points: self.rules.points_per_letter(),
            });
            if round.collected_count == round.word.len() {
                self.commands.push(Command::Schedule {
                    action: ScheduledAction::FinishRound,
                    delay: self.rules.completion_delay(),
                    generation: self.generation,
                });
            }
        } else if let Some(expected) = round.word.letter_at(round.collected_count) {
            debug!(touched = %letter, %expected, "wrong letter touched");
            self.events.push(GameEvent::WrongLetter {
                touched: letter,
                expected,
            });
        }
    }

    /// Advances the obstacle one chase step. Ignored outside
    /// `AwaitingInput`.
    #[instrument(skip(self), fields(phase = ?self.phase))]
    pub fn obstacle_tick(&mut self) {
        if self.phase != Phase::AwaitingInput {
            return;
        }
        let outcome = {
            let Some(round) = self.round.as_ref() else {
                return;
            };
            let Some(obstacle) = round.board.obstacle() else {
                return;
            };
            (obstacle, chase_step(obstacle, round.board.player(), &round.board))
        };
        match outcome {
            (from, ChaseOutcome::Moved(to)) => {
                if let Some(round) = self.round.as_mut() {
                    round.board.move_obstacle(to);
                }
                self.events.push(GameEvent::ObstacleMoved { from, to });
            }
            (_, ChaseOutcome::Blocked) => {}
            (_, ChaseOutcome::Caught) => self.catch(),
        }
    }

    /// Begins the next round after a completed word. Valid only from
    /// `RoundComplete`.
    #[instrument(skip(self, word), fields(phase = ?self.phase))]
    pub fn advance_to_next_round(&mut self, word: Word) {
        if self.phase != Phase::RoundComplete {
            warn!(phase = ?self.phase, "next-round request outside RoundComplete ignored");
            return;
        }
        self.begin_round(word);
    }

    /// Deferred round completion: applies the bonus, escalates the tier,
    /// and enters `RoundComplete`.
    ///
    /// A no-op unless `generation` still matches, the phase is still
    /// `AwaitingInput`, and the word is fully collected; a catch inside the
    /// completion window therefore wins over the stale completion.
    #[instrument(skip(self), fields(phase = ?self.phase))]
    pub fn finish_round(&mut self, generation: u64) {
        if generation != self.generation {
            debug!(generation, current = self.generation, "stale completion ignored");
            return;
        }
        if self.phase != Phase::AwaitingInput {
            return;
        }
        let Some(round) = self.round.as_ref() else {
            return;
        };
        if round.collected_count != round.word.len() {
            return;
        }

        self.score += self.rules.word_bonus();
        info!(word = round.word.text(), score = self.score, "word completed");
        self.events.push(GameEvent::WordCompleted {
            word: round.word.text().to_string(),
            translation: round.word.translation().to_string(),
            bonus: self.rules.word_bonus(),
        });

        let target = if self.score > 300 {
            Tier::Hard
        } else if self.score > 150 {
            Tier::Medium
        } else {
            self.tier
        };
        if target > self.tier {
            self.tier = target;
            info!(tier = ?self.tier, "difficulty raised");
            self.events.push(GameEvent::TierRaised { tier: self.tier });
        }

        self.phase = Phase::RoundComplete;
        self.commands.push(Command::StopObstacleTimer);
    }

    /// Deferred catch recovery: begins a fresh round at the same tier with
    /// the score preserved. A no-op unless `generation` still matches and
    /// the phase is still `Caught`.
    #[instrument(skip(self, word), fields(phase = ?self.phase))]
    pub fn recover_from_catch(&mut self, word: Word, generation: u64) {
        if generation != self.generation {
            debug!(generation, current = self.generation, "stale recovery ignored");
            return;
        }
        if self.phase != Phase::Caught {
            return;
        }
        self.begin_round(word);
    }

    fn catch(&mut self) {
        info!(score = self.score, "obstacle caught the player");
        self.phase = Phase::Caught;
        self.events.push(GameEvent::ObstacleCaught);
        self.commands.push(Command::StopObstacleTimer);
        self.commands.push(Command::Schedule {
            action: ScheduledAction::RecoverFromCatch,
            delay: self.rules.catch_recovery(),
            generation: self.generation,
        });
    }

    fn begin_round(&mut self, word: Word) {
        let board = Board::generate(&word, self.rules.board_size(), &mut self.rng);
        self.install_round(word, board);
    }

    fn install_round(&mut self, word: Word, board: Board) {
        self.generation += 1;
        debug!(
            generation = self.generation,
            word_len = word.len(),
            "round begins"
        );
        self.events.push(GameEvent::RoundStarted {
            clue: word.translation().to_string(),
            length: word.len(),
            tier: word.tier(),
        });
        self.round = Some(Round {
            word,
            board,
            collected_count: 0,
        });
        self.phase = Phase::AwaitingInput;
        self.cooldown_until = None;
        self.commands.push(Command::StartObstacleTimer {
            period: self.rules.obstacle_period(),
        });
    }

    fn check_board_spells(word: &Word, board: &Board) -> Result<(), BoardError> {
        let matches = board.tiles().len() == word.len()
            && board
                .tiles()
                .iter()
                .zip(word.letters())
                .all(|(tile, letter)| tile.letter == letter);
        if matches { Ok(()) } else { Err(BoardError::BadSequence) }
    }

    /// Cumulative score.
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Current difficulty tier.
    pub fn tier(&self) -> Tier {
        self.tier
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether the session has been started and not stopped.
    pub fn running(&self) -> bool {
        self.running
    }

    /// Current round generation; bumped by every round start and by
    /// `stop()`.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Letters collected in the live round.
    pub fn collected_count(&self) -> usize {
        self.round.as_ref().map_or(0, |r| r.collected_count)
    }

    /// The live round's board, if any.
    pub fn board(&self) -> Option<&Board> {
        self.round.as_ref().map(|r| &r.board)
    }

    /// The live round's word, if any.
    pub fn word(&self) -> Option<&Word> {
        self.round.as_ref().map(|r| &r.word)
    }

    /// Drains the events recorded since the last drain.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Drains the driver commands issued since the last drain.
    pub fn take_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }

    /// Produces an immutable snapshot sufficient to redraw the game.
    pub fn snapshot(&self) -> Snapshot {
        let round = self.round.as_ref().map(|round| RoundView {
            board_size: round.board.size(),
            player: round.board.player(),
            obstacle: round.board.obstacle(),
            tiles: round
                .board
                .uncollected()
                .map(|t| TileView {
                    letter: t.letter,
                    position: t.position,
                })
                .collect(),
            clue: round.word.translation().to_string(),
            collected: round.word.letters().take(round.collected_count).collect(),
        });
        let completed = match (self.phase, self.round.as_ref()) {
            (Phase::RoundComplete, Some(round)) => Some(CompletedWord {
                word: round.word.text().to_string(),
                translation: round.word.translation().to_string(),
            }),
            _ => None,
        };
        Snapshot {
            phase: self.phase,
            score: self.score,
            tier: self.tier,
            round,
            completed,
        }
    }
}
