//! Field-name heuristics shared by the extraction strategies

use crate::types::SentenceRecord;
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

/// Known Japanese field names, in priority order
pub const JAPANESE_KEYS: &[&str] = &["ja", "japanese", "jp", "sentence_ja"];

/// Known English field names, in priority order
pub const ENGLISH_KEYS: &[&str] = &["en", "english", "translation", "sentence_en"];

/// Language-neutral text fields, used for the Japanese side as a last resort
pub const GENERIC_KEYS: &[&str] = &["text", "sentence"];

// Patterns are literals; the tests module compiles every one of them.
#[allow(clippy::expect_used)]
static JAPANESE_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(sentence_)?(ja|jp|jpn|japanese)(_text|_sentence)?$")
        .expect("valid Japanese key pattern")
});

#[allow(clippy::expect_used)]
static ENGLISH_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(sentence_)?(en|eng|english|translation)(_text|_sentence)?$")
        .expect("valid English key pattern")
});

#[allow(clippy::expect_used)]
static GENERIC_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(text|sentence)$").expect("valid generic key pattern"));

/// True if `key` looks like it holds Japanese, English or generic sentence text
pub fn is_sentence_key(key: &str) -> bool {
    JAPANESE_KEY.is_match(key) || ENGLISH_KEY.is_match(key) || GENERIC_KEY.is_match(key)
}

/// True if any key of `entry` looks like sentence text
pub fn has_sentence_key(entry: &Map<String, Value>) -> bool {
    entry.keys().any(|k| is_sentence_key(k))
}

/// First string among the known `keys`, then among keys matching `pattern`
fn pick<'a>(entry: &'a Map<String, Value>, keys: &[&str], pattern: &Regex) -> Option<&'a str> {
    keys.iter()
        .find_map(|k| entry.get(*k).and_then(Value::as_str))
        .or_else(|| {
            entry
                .iter()
                .filter(|(k, _)| pattern.is_match(k))
                .find_map(|(_, v)| v.as_str())
        })
}

/// Japanese text of one sentence entry ("" if absent)
pub fn japanese_text(entry: &Map<String, Value>) -> &str {
    pick(entry, JAPANESE_KEYS, &JAPANESE_KEY)
        .or_else(|| pick(entry, GENERIC_KEYS, &GENERIC_KEY))
        .unwrap_or("")
}

/// English text of one sentence entry ("" if absent)
pub fn english_text(entry: &Map<String, Value>) -> &str {
    pick(entry, ENGLISH_KEYS, &ENGLISH_KEY).unwrap_or("")
}

/// Objects of a JSON array, skipping anything that is not an object
pub fn object_entries(items: &[Value]) -> impl Iterator<Item = &Map<String, Value>> {
    items.iter().filter_map(Value::as_object)
}

/// Map sentence-like objects to records numbered from zero
pub fn to_records(subject_id: u64, items: &[Value]) -> Vec<SentenceRecord> {
    object_entries(items)
        .enumerate()
        .map(|(index, entry)| {
            SentenceRecord::new(subject_id, index, japanese_text(entry), english_text(entry))
        })
        .collect()
}
