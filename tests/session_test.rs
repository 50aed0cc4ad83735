//! Scenario tests for the game session state machine.

use std::time::Duration;
use wortjagd::{
    Board, Command, Direction, GameEvent, GameRules, GameSession, LetterTile, Phase, Position,
    ScheduledAction, Tier, Word,
};

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

fn ball() -> Word {
    Word::new("BALL", "ball", Tier::Easy).expect("valid word")
}

fn tile(letter: char, x: u8, y: u8, sequence_index: usize) -> LetterTile {
    LetterTile {
        letter,
        position: Position::new(x, y),
        sequence_index,
        collected: false,
    }
}

/// B A L L in a straight line east of the player.
fn linear_board(obstacle: Position) -> Board {
    Board::from_parts(
        8,
        Position::new(0, 0),
        Some(obstacle),
        vec![
            tile('B', 1, 0, 0),
            tile('A', 2, 0, 1),
            tile('L', 3, 0, 2),
            tile('L', 4, 0, 3),
        ],
    )
    .expect("valid layout")
}

fn session_with(word: Word, board: Board) -> GameSession {
    let mut session = GameSession::with_seed(GameRules::default(), 11);
    session.start_with_board(word, board).expect("board spells word");
    session.take_events();
    session.take_commands();
    session
}

fn finish_generation(commands: &[Command]) -> Option<u64> {
    commands.iter().find_map(|c| match c {
        Command::Schedule {
            action: ScheduledAction::FinishRound,
            generation,
            ..
        } => Some(*generation),
        _ => None,
    })
}

#[test]
fn collecting_the_next_letter_awards_points() {
    let mut session = session_with(ball(), linear_board(Position::new(7, 7)));

    session.request_move(Direction::Right, ms(0));

    assert_eq!(session.score(), 10);
    assert_eq!(session.collected_count(), 1);
    let events = session.take_events();
    assert!(events.contains(&GameEvent::PlayerMoved {
        from: Position::new(0, 0),
        to: Position::new(1, 0),
    }));
    assert!(events.contains(&GameEvent::LetterCollected {
        letter: 'B',
        sequence_index: 0,
        points: 10,
    }));
}

#[test]
fn out_of_order_letters_are_rejected_but_stay_collectible() {
    // B at (1,0), then the SECOND L at (2,0) sits in the player's path
    // before A at (3,0).
    let board = Board::from_parts(
        8,
        Position::new(0, 0),
        Some(Position::new(7, 7)),
        vec![
            tile('B', 1, 0, 0),
            tile('A', 3, 0, 1),
            tile('L', 2, 0, 2),
            tile('L', 4, 0, 3),
        ],
    )
    .expect("valid layout");
    let mut session = session_with(ball(), board);

    session.request_move(Direction::Right, ms(0));
    assert_eq!(session.score(), 10);
    session.take_events();

    // Touching the L with sequence index 2 while index 1 is still owed.
    session.request_move(Direction::Right, ms(300));
    assert_eq!(session.score(), 10, "wrong letter must not score");
    assert_eq!(session.collected_count(), 1);
    let events = session.take_events();
    assert!(events.contains(&GameEvent::WrongLetter {
        touched: 'L',
        expected: 'A',
    }));
    let board = session.board().expect("round live");
    assert!(
        board.tile_at(Position::new(2, 0)).is_some(),
        "rejected tile stays on the board"
    );

    // Collect A, come back for the skipped L, then take the last L.
    session.request_move(Direction::Right, ms(600));
    assert_eq!(session.collected_count(), 2);
    session.request_move(Direction::Left, ms(900));
    assert_eq!(session.collected_count(), 3);
    session.request_move(Direction::Right, ms(1200));
    session.request_move(Direction::Right, ms(1500));
    assert_eq!(session.collected_count(), 4);
    assert!(finish_generation(&session.take_commands()).is_some());
}

#[test]
fn completing_the_word_applies_the_bonus_after_the_deferred_finish() {
    let mut session = session_with(ball(), linear_board(Position::new(7, 7)));

    for (step, now) in [0u64, 300, 600, 900].into_iter().enumerate() {
        session.request_move(Direction::Right, ms(now));
        assert_eq!(session.collected_count(), step + 1);
    }
    assert_eq!(session.score(), 40);
    assert_eq!(session.phase(), Phase::AwaitingInput, "completion is deferred");

    let commands = session.take_commands();
    let generation = finish_generation(&commands).expect("completion scheduled");
    session.take_events();

    session.finish_round(generation);
    assert_eq!(session.score(), 90);
    assert_eq!(session.phase(), Phase::RoundComplete);
    let events = session.take_events();
    assert!(events.contains(&GameEvent::WordCompleted {
        word: "BALL".to_string(),
        translation: "ball".to_string(),
        bonus: 50,
    }));
    assert!(
        session.take_commands().contains(&Command::StopObstacleTimer),
        "completion stops the obstacle timer"
    );

    let snapshot = session.snapshot();
    let completed = snapshot.completed.expect("completed payload");
    assert_eq!(completed.word, "BALL");
    assert_eq!(completed.translation, "ball");

    // A second firing of the same completion is a no-op.
    session.finish_round(generation);
    assert_eq!(session.score(), 90);
}

#[test]
fn movement_cooldown_gates_the_next_move() {
    let mut session = session_with(ball(), linear_board(Position::new(7, 7)));

    session.request_move(Direction::Right, ms(0));
    session.request_move(Direction::Right, ms(100));
    assert_eq!(
        session.board().expect("round live").player(),
        Position::new(1, 0),
        "move inside the cooldown is ignored"
    );

    session.request_move(Direction::Right, ms(200));
    assert_eq!(session.board().expect("round live").player(), Position::new(2, 0));
}

#[test]
fn an_off_board_move_is_ignored_without_engaging_the_cooldown() {
    let mut session = session_with(ball(), linear_board(Position::new(7, 7)));

    session.take_events();
    session.request_move(Direction::Left, ms(0));
    assert!(session.take_events().is_empty(), "wall bounce emits nothing");

    // Same timestamp: the bounce must not have started a cooldown.
    session.request_move(Direction::Right, ms(0));
    assert_eq!(session.board().expect("round live").player(), Position::new(1, 0));
}

#[test]
fn moving_onto_the_obstacle_triggers_a_catch_without_translation() {
    let board = Board::from_parts(
        8,
        Position::new(0, 0),
        Some(Position::new(1, 0)),
        vec![
            tile('B', 0, 1, 0),
            tile('A', 5, 5, 1),
            tile('L', 6, 6, 2),
            tile('L', 7, 5, 3),
        ],
    )
    .expect("valid layout");
    let mut session = session_with(ball(), board);

    session.request_move(Direction::Down, ms(0));
    assert_eq!(session.score(), 10);
    session.request_move(Direction::Up, ms(300));
    session.take_events();
    session.take_commands();

    session.request_move(Direction::Right, ms(600));
    assert_eq!(session.phase(), Phase::Caught);
    assert_eq!(
        session.board().expect("round live").player(),
        Position::new(0, 0),
        "no translation onto the obstacle"
    );
    let events = session.take_events();
    assert!(events.contains(&GameEvent::ObstacleCaught));
    let commands = session.take_commands();
    assert!(commands.contains(&Command::StopObstacleTimer));
    let recovery = commands.iter().find_map(|c| match c {
        Command::Schedule {
            action: ScheduledAction::RecoverFromCatch,
            delay,
            generation,
        } => Some((*delay, *generation)),
        _ => None,
    });
    let (delay, generation) = recovery.expect("recovery scheduled");
    assert_eq!(delay, ms(2000));

    // Recovery: fresh round, same tier, score preserved.
    let next = Word::new("ROT", "red", Tier::Easy).expect("valid word");
    session.recover_from_catch(next, generation);
    assert_eq!(session.phase(), Phase::AwaitingInput);
    assert_eq!(session.score(), 10);
    assert_eq!(session.tier(), Tier::Easy);
    assert_eq!(session.collected_count(), 0);
    assert_eq!(session.board().expect("round live").tiles().len(), 3);
    assert!(session
        .take_events()
        .iter()
        .any(|e| matches!(e, GameEvent::RoundStarted { .. })));
}

#[test]
fn obstacle_tick_moves_blocks_and_catches() {
    // Plain chase step, tie resolves vertically.
    let mut session = session_with(ball(), linear_board(Position::new(7, 7)));
    session.obstacle_tick();
    let events = session.take_events();
    assert!(events.contains(&GameEvent::ObstacleMoved {
        from: Position::new(7, 7),
        to: Position::new(7, 6),
    }));

    // Blocked by an uncollected tile: stays put, no event.
    let blocked_board = Board::from_parts(
        8,
        Position::new(0, 0),
        Some(Position::new(0, 5)),
        vec![
            tile('B', 0, 4, 0),
            tile('A', 5, 5, 1),
            tile('L', 6, 5, 2),
            tile('L', 7, 5, 3),
        ],
    )
    .expect("valid layout");
    let mut session = session_with(ball(), blocked_board);
    session.obstacle_tick();
    assert!(session.take_events().is_empty());
    assert_eq!(
        session.board().expect("round live").obstacle(),
        Some(Position::new(0, 5))
    );
    assert_eq!(session.phase(), Phase::AwaitingInput);

    // Stepping onto the player is a catch.
    let adjacent_board = Board::from_parts(
        8,
        Position::new(0, 0),
        Some(Position::new(1, 0)),
        vec![
            tile('B', 0, 4, 0),
            tile('A', 5, 5, 1),
            tile('L', 6, 5, 2),
            tile('L', 7, 5, 3),
        ],
    )
    .expect("valid layout");
    let mut session = session_with(ball(), adjacent_board);
    session.obstacle_tick();
    assert_eq!(session.phase(), Phase::Caught);
    assert!(session.take_events().contains(&GameEvent::ObstacleCaught));
}

#[test]
fn a_catch_inside_the_completion_window_wins() {
    let mut session = session_with(ball(), linear_board(Position::new(6, 0)));

    for now in [0u64, 300, 600, 900] {
        session.request_move(Direction::Right, ms(now));
    }
    assert_eq!(session.collected_count(), 4);
    let generation = finish_generation(&session.take_commands()).expect("completion scheduled");

    // Player sits at (4,0); the obstacle closes in from (6,0) over the
    // still-live completion window.
    session.obstacle_tick();
    session.obstacle_tick();
    assert_eq!(session.phase(), Phase::Caught);

    session.finish_round(generation);
    assert_eq!(session.phase(), Phase::Caught, "stale completion must not fire");
    assert_eq!(session.score(), 40, "no bonus after a catch");
}

#[test]
fn stop_invalidates_every_pending_deferred_action() {
    let mut session = session_with(ball(), linear_board(Position::new(7, 7)));

    for now in [0u64, 300, 600, 900] {
        session.request_move(Direction::Right, ms(now));
    }
    let generation = finish_generation(&session.take_commands()).expect("completion scheduled");

    session.stop();
    assert_eq!(session.phase(), Phase::Idle);
    assert!(!session.running());
    assert!(session.board().is_none());
    assert!(session.take_events().contains(&GameEvent::Stopped));
    assert!(session.take_commands().contains(&Command::StopObstacleTimer));

    session.finish_round(generation);
    assert_eq!(session.phase(), Phase::Idle);
    assert_eq!(session.score(), 40, "stale completion after stop is a no-op");

    session.request_move(Direction::Right, ms(2000));
    assert!(session.take_events().is_empty(), "moves are ignored while idle");
}

#[test]
fn difficulty_escalates_on_score_thresholds_at_round_completion() {
    // 4 letters * 30 + 50 bonus = 170 > 150: up to Medium.
    let rules: GameRules = toml::from_str("points_per_letter = 30").expect("valid rules");
    let mut session = GameSession::with_seed(rules, 3);
    session
        .start_with_board(ball(), linear_board(Position::new(7, 7)))
        .expect("board spells word");
    for now in [0u64, 300, 600, 900] {
        session.request_move(Direction::Right, ms(now));
    }
    let generation = finish_generation(&session.take_commands()).expect("completion scheduled");
    session.take_events();
    session.finish_round(generation);
    assert_eq!(session.score(), 170);
    assert_eq!(session.tier(), Tier::Medium);
    assert!(session
        .take_events()
        .contains(&GameEvent::TierRaised { tier: Tier::Medium }));

    // 4 letters * 80 + 50 bonus = 370 > 300: straight to Hard.
    let rules: GameRules = toml::from_str("points_per_letter = 80").expect("valid rules");
    let mut session = GameSession::with_seed(rules, 3);
    session
        .start_with_board(ball(), linear_board(Position::new(7, 7)))
        .expect("board spells word");
    for now in [0u64, 300, 600, 900] {
        session.request_move(Direction::Right, ms(now));
    }
    let generation = finish_generation(&session.take_commands()).expect("completion scheduled");
    session.finish_round(generation);
    assert_eq!(session.score(), 370);
    assert_eq!(session.tier(), Tier::Hard);

    // Exactly 150 stays Easy: the threshold is strict.
    let rules: GameRules = toml::from_str("points_per_letter = 25").expect("valid rules");
    let mut session = GameSession::with_seed(rules, 3);
    session
        .start_with_board(ball(), linear_board(Position::new(7, 7)))
        .expect("board spells word");
    for now in [0u64, 300, 600, 900] {
        session.request_move(Direction::Right, ms(now));
    }
    let generation = finish_generation(&session.take_commands()).expect("completion scheduled");
    session.take_events();
    session.finish_round(generation);
    assert_eq!(session.score(), 150);
    assert_eq!(session.tier(), Tier::Easy);
    assert!(!session
        .take_events()
        .iter()
        .any(|e| matches!(e, GameEvent::TierRaised { .. })));

    // The tier never auto-decreases.
    let rules: GameRules =
        toml::from_str("points_per_letter = 30\nstarting_tier = 3").expect("valid rules");
    let mut session = GameSession::with_seed(rules, 3);
    session
        .start_with_board(ball(), linear_board(Position::new(7, 7)))
        .expect("board spells word");
    for now in [0u64, 300, 600, 900] {
        session.request_move(Direction::Right, ms(now));
    }
    let generation = finish_generation(&session.take_commands()).expect("completion scheduled");
    session.finish_round(generation);
    assert_eq!(session.tier(), Tier::Hard);
}

#[test]
fn advancing_to_the_next_round_requires_round_complete() {
    let mut session = session_with(ball(), linear_board(Position::new(7, 7)));

    let other = Word::new("ROT", "red", Tier::Easy).expect("valid word");
    session.advance_to_next_round(other.clone());
    assert_eq!(
        session.word().map(|w| w.text().to_string()),
        Some("BALL".to_string()),
        "next-round outside RoundComplete is ignored"
    );

    for now in [0u64, 300, 600, 900] {
        session.request_move(Direction::Right, ms(now));
    }
    let generation = finish_generation(&session.take_commands()).expect("completion scheduled");
    session.finish_round(generation);
    assert_eq!(session.phase(), Phase::RoundComplete);
    let score = session.score();

    session.advance_to_next_round(other);
    assert_eq!(session.phase(), Phase::AwaitingInput);
    assert_eq!(session.score(), score, "score persists across rounds");
    assert_eq!(session.collected_count(), 0);
    assert_eq!(session.word().map(|w| w.text().to_string()), Some("ROT".to_string()));
}

#[test]
fn snapshot_reflects_the_live_round() {
    let mut session = session_with(ball(), linear_board(Position::new(7, 7)));
    session.request_move(Direction::Right, ms(0));

    let snapshot = session.snapshot();
    assert_eq!(snapshot.phase, Phase::AwaitingInput);
    assert_eq!(snapshot.score, 10);
    assert_eq!(snapshot.tier, Tier::Easy);
    assert!(snapshot.completed.is_none());

    let round = snapshot.round.expect("round live");
    assert_eq!(round.board_size, 8);
    assert_eq!(round.player, Position::new(1, 0));
    assert_eq!(round.obstacle, Some(Position::new(7, 7)));
    assert_eq!(round.clue, "ball");
    assert_eq!(round.collected, "B");
    assert_eq!(round.tiles.len(), 3, "collected tiles leave the view");
}

#[test]
fn starting_again_resets_the_score() {
    let mut session = session_with(ball(), linear_board(Position::new(7, 7)));
    session.request_move(Direction::Right, ms(0));
    assert_eq!(session.score(), 10);

    session
        .start_with_board(ball(), linear_board(Position::new(7, 7)))
        .expect("board spells word");
    assert_eq!(session.score(), 0);
    assert_eq!(session.phase(), Phase::AwaitingInput);
    assert!(session.running());
}
