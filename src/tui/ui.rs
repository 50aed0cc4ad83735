//! Drawing for the terminal front end.

use super::app::App;
use crate::game::{Position, RoundView};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::widgets::{Block, Borders, Paragraph};

/// Draws the whole screen from the latest snapshot.
pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(10),
        Constraint::Length(3),
        Constraint::Length(3),
    ])
    .split(frame.area());

    let header = match app.snapshot() {
        Some(snapshot) => {
            let clue = snapshot
                .round
                .as_ref()
                .map(|r| r.clue.to_uppercase())
                .unwrap_or_default();
            format!(
                "Score: {}   Level: {}   Spell the German word for: {}",
                snapshot.score,
                snapshot.tier.level(),
                clue
            )
        }
        None => "Loading...".to_string(),
    };
    frame.render_widget(
        Paragraph::new(header).block(Block::default().title("Wortjagd").borders(Borders::ALL)),
        chunks[0],
    );

    let board = match app.snapshot().and_then(|s| s.round.as_ref()) {
        Some(round) => board_text(round),
        None => String::new(),
    };
    let board_block = if app.round_complete() {
        let completed = app
            .snapshot()
            .and_then(|s| s.completed.as_ref())
            .map(|c| format!("You spelled {} ({})!", c.word, c.translation))
            .unwrap_or_default();
        Paragraph::new(format!("{}\n\n{}", board, completed))
    } else {
        Paragraph::new(board)
    };
    frame.render_widget(
        board_block.block(Block::default().borders(Borders::ALL)),
        chunks[1],
    );

    let collected = app
        .snapshot()
        .and_then(|s| s.round.as_ref())
        .map(|r| collected_slots(r))
        .unwrap_or_default();
    frame.render_widget(
        Paragraph::new(collected).block(Block::default().title("Collected").borders(Borders::ALL)),
        chunks[2],
    );

    frame.render_widget(
        Paragraph::new(app.status().to_string())
            .block(Block::default().title("Status").borders(Borders::ALL)),
        chunks[3],
    );
}

/// Formats the board as a character grid: `@` player, `#` obstacle, letter
/// tiles as themselves, `.` empty.
fn board_text(round: &RoundView) -> String {
    let mut out = String::new();
    for y in 0..round.board_size {
        for x in 0..round.board_size {
            let cell = Position::new(x, y);
            let glyph = if round.player == cell {
                '@'
            } else if round.obstacle == Some(cell) {
                '#'
            } else if let Some(tile) = round.tiles.iter().find(|t| t.position == cell) {
                tile.letter
            } else {
                '.'
            };
            out.push(' ');
            out.push(glyph);
            out.push(' ');
        }
        out.push('\n');
    }
    out
}

/// One slot per letter: collected letters shown, the rest as underscores.
fn collected_slots(round: &RoundView) -> String {
    let total = round.collected.chars().count() + round.tiles.len();
    let mut slots: Vec<String> = round.collected.chars().map(|c| c.to_string()).collect();
    slots.resize(total, "_".to_string());
    slots.join(" ")
}
