//! Built-in German vocabulary pool.

use crate::game::{Tier, Word};

/// `(word, translation, difficulty level)` rows of the built-in pool.
const BUILTIN: &[(&str, &str, u8)] = &[
    // Level 1 - easy words (3-4 letters)
    ("HUND", "dog", 1),
    ("KATZE", "cat", 1),
    ("HAUS", "house", 1),
    ("BALL", "ball", 1),
    ("EINS", "one", 1),
    ("ZWEI", "two", 1),
    ("ROT", "red", 1),
    ("BLAU", "blue", 1),
    // Level 2 - medium words (5-6 letters)
    ("APFEL", "apple", 2),
    ("MILCH", "milk", 2),
    ("GARTEN", "garden", 2),
    ("SCHULE", "school", 2),
    ("WASSER", "water", 2),
    ("BÄCKER", "baker", 2),
    ("FREUND", "friend", 2),
    ("KINDER", "children", 2),
    // Level 3 - harder words (7+ letters)
    ("GUMMIBÄR", "gummy bear", 3),
    ("SCHOKOLADE", "chocolate", 3),
    ("SPIELPLATZ", "playground", 3),
    ("GEBURTSTAG", "birthday", 3),
    ("KEKSE", "cookies", 3),
    ("TEDDYBÄR", "teddy bear", 3),
    ("FRÜHSTÜCK", "breakfast", 3),
    ("REGENBOGEN", "rainbow", 3),
];

/// Materializes the built-in pool as [`Word`] values.
pub fn builtin_words() -> Vec<Word> {
    BUILTIN
        .iter()
        .map(|&(text, translation, level)| {
            let tier = Tier::from_level(level).expect("builtin word list uses levels 1-3");
            Word::new(text, translation, tier).expect("builtin word list has no empty words")
        })
        .collect()
}
