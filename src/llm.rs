//! LLM chat-completion client for vocabulary generation.

use crate::game::{Tier, Word};
use crate::vocabulary::parse_vocabulary;
use async_openai::{
    Client as OpenAIClient,
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

/// System prompt pinning the response shape to a raw JSON array.
const SYSTEM_PROMPT: &str = "You are a direct assistant that returns only raw JSON arrays \
of German vocabulary words. No markdown, no explanations, no code blocks.";

/// LLM provider selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// OpenAI (GPT models).
    OpenAI,
    /// Anthropic (Claude models).
    Anthropic,
}

/// Configuration for the LLM client.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    provider: LlmProvider,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl LlmConfig {
    /// Creates a new LLM configuration.
    #[instrument(skip(api_key), fields(provider = ?provider, model = %model))]
    pub fn new(provider: LlmProvider, api_key: String, model: String, max_tokens: u32) -> Self {
        Self {
            provider,
            api_key,
            model,
            max_tokens,
        }
    }

    /// The configured provider.
    pub fn provider(&self) -> LlmProvider {
        self.provider
    }

    /// The configured model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// The response token cap.
    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }
}

/// Client that generates vocabulary through a chat-completion API.
#[derive(Debug, Clone)]
pub struct LlmClient {
    config: LlmConfig,
}

impl LlmClient {
    /// Creates a new client.
    #[instrument(skip(config), fields(provider = ?config.provider()))]
    pub fn new(config: LlmConfig) -> Self {
        info!("creating LLM client");
        Self { config }
    }

    /// Generates `count` German vocabulary words at the given tier.
    ///
    /// # Errors
    ///
    /// Returns an [`LlmError`] when the API call fails or the response
    /// contains no valid words.
    #[instrument(skip(self), fields(provider = ?self.config.provider, model = %self.config.model))]
    pub async fn generate_vocabulary(&self, count: usize, tier: Tier) -> Result<Vec<Word>, LlmError> {
        let prompt = vocabulary_prompt(count, tier);
        let content = match self.config.provider {
            LlmProvider::OpenAI => self.complete_openai(&prompt).await?,
            LlmProvider::Anthropic => self.complete_anthropic(&prompt).await?,
        };
        debug!(response_length = content.len(), "parsing vocabulary response");
        let words = parse_vocabulary(&content, tier)
            .map_err(|e| LlmError::new(format!("invalid vocabulary response: {}", e)))?;
        info!(count = words.len(), tier = tier.level(), "generated vocabulary");
        Ok(words)
    }

    async fn complete_openai(&self, prompt: &str) -> Result<String, LlmError> {
        let client = OpenAIClient::with_config(
            OpenAIConfig::new().with_api_key(self.config.api_key.clone()),
        );

        let messages = vec![
            ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(SYSTEM_PROMPT)
                    .build()
                    .map_err(|e| LlmError::new(format!("failed to build system message: {}", e)))?,
            ),
            ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessageArgs::default()
                    .content(prompt)
                    .build()
                    .map_err(|e| LlmError::new(format!("failed to build user message: {}", e)))?,
            ),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.config.model)
            .messages(messages)
            .max_tokens(self.config.max_tokens)
            .temperature(0.7)
            .build()
            .map_err(|e| LlmError::new(format!("failed to build request: {}", e)))?;

        let response = client.chat().create(request).await.map_err(|e| {
            error!(error = %e, "OpenAI API error");
            LlmError::new(format!("OpenAI API error: {}", e))
        })?;

        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| LlmError::new("no content in OpenAI response".to_string()))
    }

    async fn complete_anthropic(&self, prompt: &str) -> Result<String, LlmError> {
        let request_body = serde_json::json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "system": SYSTEM_PROMPT,
            "messages": [
                { "role": "user", "content": prompt }
            ]
        });

        let response = reqwest::Client::new()
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", self.config.api_key.clone())
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Anthropic API request failed");
                LlmError::new(format!("Anthropic API request failed: {}", e))
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| LlmError::new(format!("failed to read Anthropic response: {}", e)))?;
        if !status.is_success() {
            error!(status = %status, response = %text, "Anthropic API error");
            return Err(LlmError::new(format!("Anthropic API error {}: {}", status, text)));
        }

        let json: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| LlmError::new(format!("failed to parse Anthropic response: {}", e)))?;
        json["content"][0]["text"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| LlmError::new("no text content in Anthropic response".to_string()))
    }
}

/// Builds the vocabulary-generation prompt for a tier.
fn vocabulary_prompt(count: usize, tier: Tier) -> String {
    let descriptor = match tier {
        Tier::Easy => "easy (3-4 letters)",
        Tier::Medium => "medium (5-6 letters)",
        Tier::Hard => "challenging (7+ letters)",
    };
    let level = tier.level();
    format!(
        "Generate {count} {descriptor} German vocabulary words with their English translations.\n\
         Respond with a raw JSON array only, no markdown formatting, no code blocks, no additional text.\n\
         Each word object must have exactly difficulty level {level}.\n\
         Format:\n\
         [{{\"word\": \"GERMAN_WORD\", \"translation\": \"english_translation\", \"difficulty\": {level}}}]\n\
         Requirements:\n\
         - All German words must be in ALL CAPS\n\
         - Words must be appropriate for children's education\n\
         - Difficulty must be exactly {level}\n\
         - No markdown or code block formatting"
    )
}

/// LLM client error.
#[derive(Debug, Clone, Display, Error)]
#[display("LLM error: {} at {}:{}", message, file, line)]
pub struct LlmError {
    /// Error message.
    pub message: String,
    /// Line number where the error was created.
    pub line: u32,
    /// Source file where the error was created.
    pub file: &'static str,
}

impl LlmError {
    /// Creates a new LLM error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        error!(error_message = %message, "LLM error created");
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
