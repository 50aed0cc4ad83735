//! Tests for word sources and vocabulary payload validation.

use wortjagd::{StaticWordList, Tier, VocabularyEntry, Word, WordError, WordSource, builtin_words, parse_vocabulary};

#[test]
fn builtin_pool_covers_every_tier_with_uppercase_words() {
    let words = builtin_words();
    assert_eq!(words.len(), 24);
    for tier in [Tier::Easy, Tier::Medium, Tier::Hard] {
        assert!(words.iter().any(|w| w.tier() == tier));
    }
    for word in &words {
        assert_eq!(word.text(), word.text().to_uppercase());
        assert!(!word.translation().is_empty());
    }
}

#[test]
fn word_construction_normalizes_and_validates() {
    let word = Word::new(" hund ", "dog", Tier::Easy).expect("valid word");
    assert_eq!(word.text(), "HUND");
    assert_eq!(word.len(), 4);
    assert_eq!(word.letter_at(0), Some('H'));
    assert_eq!(word.letter_at(4), None);

    // Umlauts count as single letters.
    let umlaut = Word::new("BÄCKER", "baker", Tier::Medium).expect("valid word");
    assert_eq!(umlaut.len(), 6);

    assert_eq!(Word::new("  ", "nothing", Tier::Easy), Err(WordError::EmptyText));
}

#[test]
fn tier_serializes_as_its_numeric_level() {
    assert_eq!(serde_json::to_string(&Tier::Hard).unwrap(), "3");
    assert_eq!(serde_json::from_str::<Tier>("2").unwrap(), Tier::Medium);
    assert!(serde_json::from_str::<Tier>("5").is_err());
}

#[tokio::test]
async fn static_source_serves_the_requested_tier() {
    let source = StaticWordList::new();
    for _ in 0..10 {
        let word = source.fetch_word(Tier::Medium).await;
        assert_eq!(word.tier(), Tier::Medium);
    }
}

#[tokio::test]
async fn static_source_falls_back_to_the_whole_pool_for_an_empty_tier() {
    let only_easy = vec![
        Word::new("ROT", "red", Tier::Easy).unwrap(),
        Word::new("BLAU", "blue", Tier::Easy).unwrap(),
    ];
    let source = StaticWordList::with_entries(only_easy);

    // Must still produce a word rather than fail.
    let word = source.fetch_word(Tier::Hard).await;
    assert_eq!(word.tier(), Tier::Easy);
}

#[test]
fn parse_vocabulary_accepts_a_clean_array() {
    let raw = r#"[
        {"word": "MILCH", "translation": "milk", "difficulty": 2},
        {"word": "GARTEN", "translation": "garden", "difficulty": 2}
    ]"#;
    let words = parse_vocabulary(raw, Tier::Medium).expect("valid payload");
    assert_eq!(words.len(), 2);
    assert_eq!(words[0].text(), "MILCH");
    assert_eq!(words[0].tier(), Tier::Medium);
}

#[test]
fn parse_vocabulary_strips_markdown_fences() {
    let raw = "```json\n[{\"word\": \"HAUS\", \"translation\": \"house\", \"difficulty\": 1}]\n```";
    let words = parse_vocabulary(raw, Tier::Easy).expect("valid payload");
    assert_eq!(words.len(), 1);
    assert_eq!(words[0].text(), "HAUS");
}

#[test]
fn parse_vocabulary_drops_invalid_entries() {
    let raw = r#"[
        {"word": "hund", "translation": "dog", "difficulty": 1},
        {"word": "KATZE", "translation": "cat", "difficulty": 2},
        {"word": "HAUS", "translation": "house", "difficulty": 1}
    ]"#;
    // Lowercase and wrong-tier entries vanish; the valid one survives.
    let words = parse_vocabulary(raw, Tier::Easy).expect("one valid entry");
    assert_eq!(words.len(), 1);
    assert_eq!(words[0].text(), "HAUS");
}

#[test]
fn parse_vocabulary_rejects_garbage_and_all_invalid_batches() {
    assert!(parse_vocabulary("the model rambled instead", Tier::Easy).is_err());
    let all_wrong = r#"[{"word": "hund", "translation": "dog", "difficulty": 3}]"#;
    assert!(parse_vocabulary(all_wrong, Tier::Easy).is_err());
}

#[test]
fn vocabulary_entry_mirrors_the_word() {
    let word = Word::new("SCHULE", "school", Tier::Medium).unwrap();
    let entry = VocabularyEntry::from(&word);
    assert_eq!(entry.word, "SCHULE");
    assert_eq!(entry.translation, "school");
    assert_eq!(entry.difficulty, 2);
}
