//! HTTP server: static assets plus the vocabulary-generation endpoint.

use crate::config::Settings;
use crate::game::Tier;
use crate::llm::LlmClient;
use crate::vocabulary::VocabularyEntry;
use anyhow::Result;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tracing::{error, info, instrument, warn};

/// Shared state behind the API routes.
#[derive(Clone)]
struct AppState {
    llm: Arc<LlmClient>,
}

/// Body of `POST /api/generate-vocabulary`.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateVocabularyRequest {
    /// How many words to generate.
    #[serde(default = "default_count")]
    pub count: usize,
    /// Difficulty level (1-3).
    #[serde(default = "default_difficulty")]
    pub difficulty: u8,
}

fn default_count() -> usize {
    5
}

fn default_difficulty() -> u8 {
    1
}

/// Upper bound on words per request; keeps a single call from burning an
/// unbounded number of tokens.
const MAX_WORDS_PER_REQUEST: usize = 20;

#[instrument(skip(state), fields(count = request.count, difficulty = request.difficulty))]
async fn generate_vocabulary(
    State(state): State<AppState>,
    Json(request): Json<GenerateVocabularyRequest>,
) -> Response {
    let Some(tier) = Tier::from_level(request.difficulty) else {
        return error_response(
            StatusCode::BAD_REQUEST,
            format!("difficulty must be 1-3, got {}", request.difficulty),
        );
    };
    let count = request.count.clamp(1, MAX_WORDS_PER_REQUEST);

    match state.llm.generate_vocabulary(count, tier).await {
        Ok(words) => {
            info!(count = words.len(), "vocabulary generated");
            let entries: Vec<VocabularyEntry> = words.iter().map(VocabularyEntry::from).collect();
            Json(entries).into_response()
        }
        Err(e) => {
            error!(error = %e, "vocabulary generation failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.message)
        }
    }
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

/// Builds the application router: the vocabulary API plus static assets
/// from `asset_dir`.
pub fn router(llm: Arc<LlmClient>, asset_dir: &Path) -> Router {
    Router::new()
        .route("/api/generate-vocabulary", post(generate_vocabulary))
        .fallback_service(ServeDir::new(asset_dir))
        .with_state(AppState { llm })
}

/// Binds `host:port`, retrying the next higher port while the candidate is
/// occupied, up to `max_attempts` ports in total.
///
/// # Errors
///
/// Returns the last bind error when every candidate port is occupied, or
/// the first error of any other kind.
#[instrument]
pub async fn bind_with_retry(
    host: &str,
    port: u16,
    max_attempts: u16,
) -> std::io::Result<TcpListener> {
    let mut last_err = None;
    for offset in 0..max_attempts.max(1) {
        let Some(candidate) = port.checked_add(offset) else {
            break;
        };
        match TcpListener::bind((host, candidate)).await {
            Ok(listener) => return Ok(listener),
            Err(e) if e.kind() == ErrorKind::AddrInUse => {
                warn!(port = candidate, "port in use, trying next port");
                last_err = Some(e);
            }
            Err(e) => return Err(e),
        }
    }
    Err(last_err.unwrap_or_else(|| {
        std::io::Error::new(ErrorKind::AddrInUse, "no candidate ports to try")
    }))
}

/// Runs the HTTP server until ctrl-c.
///
/// # Errors
///
/// Fails when the LLM client cannot be configured (missing API key) or no
/// port can be bound.
#[instrument(skip(settings))]
pub async fn serve(settings: &Settings) -> Result<()> {
    let llm = Arc::new(settings.llm().create_client()?);
    let server = settings.server();
    let app = router(llm, server.asset_dir());

    let listener = bind_with_retry(server.host(), *server.port(), *server.max_port_attempts()).await?;
    info!(addr = %listener.local_addr()?, "server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down server");
    }
}
