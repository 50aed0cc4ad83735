//! Word sources: the seam the game core draws vocabulary through.
//!
//! A [`WordSource`] must always produce a word for a valid tier; failures
//! are absorbed at this boundary (tier fallback, static-list fallback) so
//! the session never sees an error.

use crate::game::{Tier, Word};
use crate::llm::LlmClient;
use crate::words::builtin_words;
use async_trait::async_trait;
use derive_more::{Display, Error};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

/// Supplies one word at a time for a difficulty tier.
#[async_trait]
pub trait WordSource: Send + Sync {
    /// Returns a word for the tier. Implementations must always succeed for
    /// a valid tier, falling back to a wider pool if necessary.
    async fn fetch_word(&self, tier: Tier) -> Word;
}

/// The built-in (or caller-supplied) static vocabulary pool.
#[derive(Debug)]
pub struct StaticWordList {
    entries: Vec<Word>,
    rng: Mutex<SmallRng>,
}

impl StaticWordList {
    /// Creates a source over the built-in German pool.
    pub fn new() -> Self {
        Self::with_entries(builtin_words())
    }

    /// Creates a source over a caller-supplied pool.
    ///
    /// # Panics
    ///
    /// Panics if `entries` is empty; a word source must always be able to
    /// produce a word.
    pub fn with_entries(entries: Vec<Word>) -> Self {
        assert!(!entries.is_empty(), "static word list needs at least one word");
        Self {
            entries,
            rng: Mutex::new(SmallRng::from_entropy()),
        }
    }

    fn pick(&self, tier: Tier) -> Word {
        let pool: Vec<&Word> = self.entries.iter().filter(|w| w.tier() == tier).collect();
        let pool = if pool.is_empty() {
            warn!(?tier, "no words at tier, falling back to the whole pool");
            self.entries.iter().collect()
        } else {
            pool
        };
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        pool[rng.gen_range(0..pool.len())].clone()
    }
}

impl Default for StaticWordList {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WordSource for StaticWordList {
    async fn fetch_word(&self, tier: Tier) -> Word {
        self.pick(tier)
    }
}

/// LLM-generated vocabulary with caching and static fallback.
///
/// Words are requested in batches per tier and handed out one at a time;
/// any generation failure logs a warning and falls back to the static
/// pool, so `fetch_word` still always succeeds.
pub struct GeneratedWordList {
    client: LlmClient,
    batch_size: usize,
    cache: Mutex<HashMap<Tier, Vec<Word>>>,
    fallback: StaticWordList,
}

impl GeneratedWordList {
    /// Creates a generated source backed by `client`, requesting
    /// `batch_size` words per refill.
    pub fn new(client: LlmClient, batch_size: usize) -> Self {
        Self {
            client,
            batch_size: batch_size.max(1),
            cache: Mutex::new(HashMap::new()),
            fallback: StaticWordList::new(),
        }
    }

    fn pop_cached(&self, tier: Tier) -> Option<Word> {
        let mut cache = self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        cache.get_mut(&tier).and_then(Vec::pop)
    }

    fn refill(&self, tier: Tier, words: Vec<Word>) {
        let mut cache = self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        cache.entry(tier).or_default().extend(words);
    }
}

#[async_trait]
impl WordSource for GeneratedWordList {
    #[instrument(skip(self))]
    async fn fetch_word(&self, tier: Tier) -> Word {
        if let Some(word) = self.pop_cached(tier) {
            debug!(word = word.text(), "serving cached generated word");
            return word;
        }
        match self.client.generate_vocabulary(self.batch_size, tier).await {
            Ok(words) => {
                debug!(count = words.len(), "generated vocabulary batch");
                self.refill(tier, words);
                self.pop_cached(tier)
                    .unwrap_or_else(|| self.fallback.pick(tier))
            }
            Err(e) => {
                warn!(error = %e, "vocabulary generation failed, using static pool");
                self.fallback.fetch_word(tier).await
            }
        }
    }
}

/// Wire shape of one generated vocabulary entry, as served by the
/// `/api/generate-vocabulary` endpoint and returned by the LLM.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    /// The German word, ALL CAPS.
    pub word: String,
    /// Its English translation.
    pub translation: String,
    /// Difficulty level (1-3).
    pub difficulty: u8,
}

impl From<&Word> for VocabularyEntry {
    fn from(word: &Word) -> Self {
        Self {
            word: word.text().to_string(),
            translation: word.translation().to_string(),
            difficulty: word.tier().level(),
        }
    }
}

/// Parses and validates a generated vocabulary payload.
///
/// Strips markdown code fences, parses the JSON array, and keeps only
/// entries that are uppercase, non-empty, and carry the requested tier.
///
/// # Errors
///
/// Returns a [`VocabularyError`] when the payload is not a JSON array or
/// no entry survives validation.
#[instrument(skip(raw), fields(len = raw.len()))]
pub fn parse_vocabulary(raw: &str, tier: Tier) -> Result<Vec<Word>, VocabularyError> {
    let cleaned = strip_code_fences(raw);
    let entries: Vec<VocabularyEntry> = serde_json::from_str(cleaned)
        .map_err(|e| VocabularyError::new(format!("vocabulary payload is not a JSON array: {}", e)))?;

    let total = entries.len();
    let words: Vec<Word> = entries
        .into_iter()
        .filter(|entry| {
            let valid = entry.difficulty == tier.level()
                && !entry.word.is_empty()
                && entry.word == entry.word.to_uppercase();
            if !valid {
                debug!(word = %entry.word, difficulty = entry.difficulty, "dropping invalid entry");
            }
            valid
        })
        .filter_map(|entry| Word::new(entry.word, entry.translation, tier).ok())
        .collect();

    if words.is_empty() {
        return Err(VocabularyError::new(format!(
            "no valid words among {} entries for tier {}",
            total,
            tier.level()
        )));
    }
    Ok(words)
}

fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let trimmed = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    trimmed.strip_suffix("```").unwrap_or(trimmed).trim()
}

/// Vocabulary parsing/validation error.
#[derive(Debug, Clone, Display, Error)]
#[display("vocabulary error: {} at {}:{}", message, file, line)]
pub struct VocabularyError {
    /// Error message.
    pub message: String,
    /// Line number where the error was created.
    pub line: u32,
    /// Source file where the error was created.
    pub file: &'static str,
}

impl VocabularyError {
    /// Creates a new vocabulary error.
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
