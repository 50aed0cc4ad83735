//! Terminal front end for the spelling game.

mod app;
mod input;
mod ui;

use crate::config::GameRules;
use crate::game::{GameEvent, GameSession, Snapshot};
use crate::runtime::{ChannelFeedback, ChannelRender, GameRuntime, RuntimeHandle};
use crate::vocabulary::WordSource;
use anyhow::Result;
use app::App;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use input::Action;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info};

/// Runs the terminal game until the player quits.
pub async fn run(rules: GameRules, source: Arc<dyn WordSource>, seed: Option<u64>) -> Result<()> {
    // Log to a file so tracing output doesn't tear the terminal.
    let log_file = std::fs::File::create("wortjagd_tui.log")?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::sync::Arc::new(log_file))
        .with_ansi(false)
        .try_init();

    info!("starting terminal game");

    let session = match seed {
        Some(seed) => GameSession::with_seed(rules, seed),
        None => GameSession::new(rules),
    };
    let (snapshot_tx, snapshot_rx) = mpsc::unbounded_channel();
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let (runtime, handle) = GameRuntime::new(
        session,
        source,
        Box::new(ChannelRender(snapshot_tx)),
        Box::new(ChannelFeedback(event_tx)),
    );
    let runtime_task = tokio::spawn(runtime.run());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, handle.clone(), snapshot_rx, event_rx).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    handle.shutdown();
    runtime_task.await??;

    if let Err(err) = &res {
        error!(error = ?err, "terminal game loop error");
    }
    res
}

/// Draw/input loop: drains snapshots and events, then polls the keyboard.
async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    handle: RuntimeHandle,
    mut snapshot_rx: mpsc::UnboundedReceiver<Snapshot>,
    mut event_rx: mpsc::UnboundedReceiver<GameEvent>,
) -> Result<()>
where
    <B as ratatui::backend::Backend>::Error: std::error::Error + Send + Sync + 'static,
{
    handle.start();
    let mut app = App::new();
    loop {
        while let Ok(snapshot) = snapshot_rx.try_recv() {
            app.set_snapshot(snapshot);
        }
        while let Ok(event) = event_rx.try_recv() {
            app.handle_event(&event);
        }
        terminal.draw(|frame| ui::draw(frame, &app))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match input::action_for(key.code) {
                    Some(Action::Quit) => {
                        handle.stop();
                        return Ok(());
                    }
                    Some(Action::Move(direction)) => handle.move_player(direction),
                    Some(Action::NextWord) => handle.next_word(),
                    Some(Action::Restart) => handle.start(),
                    None => {}
                }
            }
        }
    }
}
