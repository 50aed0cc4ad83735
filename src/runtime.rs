//! Async driver for the game core.
//!
//! One tokio task owns the [`GameSession`]; player input, obstacle ticks,
//! and deferred actions all arrive through a single channel, so every
//! mutation of session state is serialized. The driver owns the clock: it
//! turns the session's [`Command`]s into tokio timers and feeds the results
//! back through the same channel.

use crate::game::{
    Command, Direction, FeedbackSink, GameEvent, GameSession, Phase, RenderSink, ScheduledAction,
    Snapshot,
};
use crate::vocabulary::WordSource;
use anyhow::Result;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};

/// Messages serialized onto the session actor.
#[derive(Debug)]
enum Msg {
    Start,
    Stop,
    Move(Direction),
    NextWord,
    ObstacleTick,
    Fire {
        action: ScheduledAction,
        generation: u64,
    },
    Shutdown,
}

/// Cloneable handle for sending player requests to a running
/// [`GameRuntime`].
#[derive(Debug, Clone)]
pub struct RuntimeHandle {
    tx: mpsc::UnboundedSender<Msg>,
}

impl RuntimeHandle {
    /// Starts (or restarts) the game.
    pub fn start(&self) {
        let _ = self.tx.send(Msg::Start);
    }

    /// Stops the game.
    pub fn stop(&self) {
        let _ = self.tx.send(Msg::Stop);
    }

    /// Requests one player move.
    pub fn move_player(&self, direction: Direction) {
        let _ = self.tx.send(Msg::Move(direction));
    }

    /// Requests the next round after a completed word.
    pub fn next_word(&self) {
        let _ = self.tx.send(Msg::NextWord);
    }

    /// Shuts the runtime down.
    pub fn shutdown(&self) {
        let _ = self.tx.send(Msg::Shutdown);
    }
}

/// Drives a [`GameSession`] with timers, a word source, and output sinks.
pub struct GameRuntime {
    session: GameSession,
    source: Arc<dyn WordSource>,
    render: Box<dyn RenderSink>,
    feedback: Box<dyn FeedbackSink>,
    rx: mpsc::UnboundedReceiver<Msg>,
    tx: mpsc::UnboundedSender<Msg>,
    epoch: Instant,
    obstacle_timer: Option<JoinHandle<()>>,
}

impl GameRuntime {
    /// Creates a runtime and the handle front ends talk to it through.
    pub fn new(
        session: GameSession,
        source: Arc<dyn WordSource>,
        render: Box<dyn RenderSink>,
        feedback: Box<dyn FeedbackSink>,
    ) -> (Self, RuntimeHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = RuntimeHandle { tx: tx.clone() };
        let runtime = Self {
            session,
            source,
            render,
            feedback,
            rx,
            tx,
            epoch: Instant::now(),
            obstacle_timer: None,
        };
        (runtime, handle)
    }

    /// Runs the session actor until shutdown or until every handle is
    /// dropped.
    #[instrument(skip(self))]
    pub async fn run(mut self) -> Result<()> {
        info!("game runtime started");
        loop {
            let Some(msg) = self.rx.recv().await else {
                break;
            };
            match msg {
                Msg::Start => {
                    let word = self.source.fetch_word(self.session.tier()).await;
                    self.session.start(word);
                }
                Msg::Stop => self.session.stop(),
                Msg::Move(direction) => {
                    self.session.request_move(direction, self.epoch.elapsed());
                }
                Msg::NextWord => {
                    if self.session.phase() == Phase::RoundComplete {
                        let word = self.source.fetch_word(self.session.tier()).await;
                        self.session.advance_to_next_round(word);
                    }
                }
                Msg::ObstacleTick => self.session.obstacle_tick(),
                Msg::Fire { action, generation } => match action {
                    ScheduledAction::FinishRound => self.session.finish_round(generation),
                    ScheduledAction::RecoverFromCatch => {
                        // The session re-checks the generation after the await.
                        if generation == self.session.generation() {
                            let word = self.source.fetch_word(self.session.tier()).await;
                            self.session.recover_from_catch(word, generation);
                        }
                    }
                },
                Msg::Shutdown => break,
            }
            self.pump();
        }
        self.stop_obstacle_timer();
        info!("game runtime stopped");
        Ok(())
    }

    /// Executes pending commands and forwards events plus a fresh snapshot
    /// to the sinks.
    fn pump(&mut self) {
        for command in self.session.take_commands() {
            match command {
                Command::StartObstacleTimer { period } => {
                    debug!(?period, "starting obstacle timer");
                    self.start_obstacle_timer(period);
                }
                Command::StopObstacleTimer => {
                    debug!("stopping obstacle timer");
                    self.stop_obstacle_timer();
                }
                Command::Schedule {
                    action,
                    delay,
                    generation,
                } => {
                    let tx = self.tx.clone();
                    tokio::spawn(async move {
                        tokio::time::sleep(delay).await;
                        let _ = tx.send(Msg::Fire { action, generation });
                    });
                }
            }
        }
        for event in self.session.take_events() {
            self.feedback.notify(&event);
        }
        self.render.render(&self.session.snapshot());
    }

    fn start_obstacle_timer(&mut self, period: std::time::Duration) {
        self.stop_obstacle_timer();
        let tx = self.tx.clone();
        self.obstacle_timer = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // The first tick of a tokio interval fires immediately.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if tx.send(Msg::ObstacleTick).is_err() {
                    break;
                }
            }
        }));
    }

    fn stop_obstacle_timer(&mut self) {
        if let Some(timer) = self.obstacle_timer.take() {
            timer.abort();
        }
    }
}

/// Render sink that drops every snapshot. Useful for headless runs.
#[derive(Debug, Default)]
pub struct NullRender;

impl RenderSink for NullRender {
    fn render(&mut self, _snapshot: &Snapshot) {}
}

/// Feedback sink that logs events through `tracing`.
#[derive(Debug, Default)]
pub struct LogFeedback;

impl FeedbackSink for LogFeedback {
    fn notify(&mut self, event: &GameEvent) {
        info!(?event, "game event");
    }
}

/// Render sink forwarding snapshots into a channel.
#[derive(Debug)]
pub struct ChannelRender(pub mpsc::UnboundedSender<Snapshot>);

impl RenderSink for ChannelRender {
    fn render(&mut self, snapshot: &Snapshot) {
        let _ = self.0.send(snapshot.clone());
    }
}

/// Feedback sink forwarding events into a channel.
#[derive(Debug)]
pub struct ChannelFeedback(pub mpsc::UnboundedSender<GameEvent>);

impl FeedbackSink for ChannelFeedback {
    fn notify(&mut self, event: &GameEvent) {
        let _ = self.0.send(event.clone());
    }
}
