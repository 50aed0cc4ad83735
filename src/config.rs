//! Settings: game rules, server options, and LLM configuration.
//!
//! Everything has a sensible default; a TOML file and a few environment
//! variables (`PORT`, `OPENAI_API_KEY`, `ANTHROPIC_API_KEY`) override it.

use crate::game::Tier;
use crate::llm::{LlmClient, LlmConfig, LlmProvider};
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Tunable rules of the game simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRules {
    /// Board edge length.
    #[serde(default = "default_board_size")]
    board_size: u8,
    /// Points per collected letter.
    #[serde(default = "default_points_per_letter")]
    points_per_letter: u32,
    /// Bonus for completing a word.
    #[serde(default = "default_word_bonus")]
    word_bonus: u32,
    /// Cooldown between accepted moves, in milliseconds.
    #[serde(default = "default_movement_cooldown_ms")]
    movement_cooldown_ms: u64,
    /// Obstacle chase period, in milliseconds.
    #[serde(default = "default_obstacle_period_ms")]
    obstacle_period_ms: u64,
    /// Delay between the final collect and round completion, in
    /// milliseconds.
    #[serde(default = "default_completion_delay_ms")]
    completion_delay_ms: u64,
    /// Delay before a caught round restarts, in milliseconds.
    #[serde(default = "default_catch_recovery_ms")]
    catch_recovery_ms: u64,
    /// Tier the first round draws from.
    #[serde(default = "default_starting_tier")]
    starting_tier: Tier,
}

fn default_board_size() -> u8 {
    8
}

fn default_points_per_letter() -> u32 {
    10
}

fn default_word_bonus() -> u32 {
    50
}

fn default_movement_cooldown_ms() -> u64 {
    200
}

fn default_obstacle_period_ms() -> u64 {
    1000
}

fn default_completion_delay_ms() -> u64 {
    500
}

fn default_catch_recovery_ms() -> u64 {
    2000
}

fn default_starting_tier() -> Tier {
    Tier::Easy
}

impl GameRules {
    /// Board edge length.
    pub fn board_size(&self) -> u8 {
        self.board_size
    }

    /// Points per collected letter.
    pub fn points_per_letter(&self) -> u32 {
        self.points_per_letter
    }

    /// Bonus for completing a word.
    pub fn word_bonus(&self) -> u32 {
        self.word_bonus
    }

    /// Cooldown between accepted moves.
    pub fn movement_cooldown(&self) -> Duration {
        Duration::from_millis(self.movement_cooldown_ms)
    }

    /// Obstacle chase period.
    pub fn obstacle_period(&self) -> Duration {
        Duration::from_millis(self.obstacle_period_ms)
    }

    /// Delay between the final collect and round completion.
    pub fn completion_delay(&self) -> Duration {
        Duration::from_millis(self.completion_delay_ms)
    }

    /// Delay before a caught round restarts.
    pub fn catch_recovery(&self) -> Duration {
        Duration::from_millis(self.catch_recovery_ms)
    }

    /// Tier the first round draws from.
    pub fn starting_tier(&self) -> Tier {
        self.starting_tier
    }
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            board_size: default_board_size(),
            points_per_letter: default_points_per_letter(),
            word_bonus: default_word_bonus(),
            movement_cooldown_ms: default_movement_cooldown_ms(),
            obstacle_period_ms: default_obstacle_period_ms(),
            completion_delay_ms: default_completion_delay_ms(),
            catch_recovery_ms: default_catch_recovery_ms(),
            starting_tier: default_starting_tier(),
        }
    }
}

/// HTTP server options.
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Host to bind to.
    #[serde(default = "default_host")]
    host: String,
    /// Port to bind to; the next higher ports are tried when occupied.
    #[serde(default = "default_port")]
    port: u16,
    /// How many consecutive ports to try.
    #[serde(default = "default_max_port_attempts")]
    max_port_attempts: u16,
    /// Directory the static assets are served from.
    #[serde(default = "default_asset_dir")]
    asset_dir: PathBuf,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_max_port_attempts() -> u16 {
    10
}

fn default_asset_dir() -> PathBuf {
    PathBuf::from(".")
}

impl ServerSettings {
    /// Overrides the port.
    pub fn set_port(&mut self, port: u16) {
        self.port = port;
    }

    /// Overrides the bind host.
    pub fn set_host(&mut self, host: String) {
        self.host = host;
    }

    /// Overrides the asset directory.
    pub fn set_asset_dir(&mut self, dir: PathBuf) {
        self.asset_dir = dir;
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_port_attempts: default_max_port_attempts(),
            asset_dir: default_asset_dir(),
        }
    }
}

/// LLM provider/model options for vocabulary generation.
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
pub struct LlmSettings {
    /// LLM provider (openai or anthropic).
    #[serde(default = "default_provider")]
    provider: LlmProvider,
    /// Model name.
    #[serde(default = "default_model")]
    model: String,
    /// Response token cap.
    #[serde(default = "default_llm_max_tokens")]
    max_tokens: u32,
    /// Words requested per generation batch.
    #[serde(default = "default_batch_size")]
    batch_size: usize,
}

fn default_provider() -> LlmProvider {
    LlmProvider::OpenAI
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_llm_max_tokens() -> u32 {
    500
}

fn default_batch_size() -> usize {
    5
}

impl LlmSettings {
    /// Builds an [`LlmClient`] from these settings.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the provider's API key environment
    /// variable is not set.
    #[instrument(skip(self), fields(provider = ?self.provider, model = %self.model))]
    pub fn create_client(&self) -> Result<LlmClient, ConfigError> {
        let api_key = match self.provider {
            LlmProvider::OpenAI => std::env::var("OPENAI_API_KEY").map_err(|_| {
                ConfigError::new("OPENAI_API_KEY environment variable not set".to_string())
            })?,
            LlmProvider::Anthropic => std::env::var("ANTHROPIC_API_KEY").map_err(|_| {
                ConfigError::new("ANTHROPIC_API_KEY environment variable not set".to_string())
            })?,
        };
        Ok(LlmClient::new(LlmConfig::new(
            self.provider,
            api_key,
            self.model.clone(),
            self.max_tokens,
        )))
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            max_tokens: default_llm_max_tokens(),
            batch_size: default_batch_size(),
        }
    }
}

/// Top-level settings.
#[derive(Debug, Clone, Default, Getters, Serialize, Deserialize)]
pub struct Settings {
    /// Game simulation rules.
    #[serde(default)]
    game: GameRules,
    /// HTTP server options.
    #[serde(default)]
    server: ServerSettings,
    /// Vocabulary generation options.
    #[serde(default)]
    llm: LlmSettings,
}

impl Settings {
    /// Loads settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("failed to read config file: {}", e)))?;
        let settings: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("failed to parse config: {}", e)))?;
        info!("config loaded");
        Ok(settings)
    }

    /// Loads settings from an optional file path (defaults when absent) and
    /// applies environment overrides.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a given file cannot be read or
    /// parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut settings = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        settings.apply_env();
        Ok(settings)
    }

    fn apply_env(&mut self) {
        if let Ok(raw) = std::env::var("PORT") {
            match raw.parse::<u16>() {
                Ok(port) => self.server.port = port,
                Err(_) => warn!(port = %raw, "ignoring unparseable PORT override"),
            }
        }
    }

    /// Mutable access to the server options, for CLI overrides.
    pub fn server_mut(&mut self) -> &mut ServerSettings {
        &mut self.server
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where the error was created.
    pub line: u32,
    /// Source file where the error was created.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
