//! Built-in extraction strategies
//!
//! Each strategy is a pure function from a subject to an optional list of
//! sentences. `None` (or an empty list) means "not applicable, try the next
//! one".

use super::fields::{has_sentence_key, object_entries, to_records};
use crate::types::{SentenceRecord, Subject};
use serde_json::Value;

/// Key under which the upstream API stores example sentences
pub const CONTEXT_SENTENCES_KEY: &str = "context_sentences";

/// Sentences from `data.context_sentences`
pub fn context_sentences(subject: &Subject) -> Option<Vec<SentenceRecord>> {
    let items = subject.data.get(CONTEXT_SENTENCES_KEY)?.as_array()?;
    if object_entries(items).next().is_none() {
        return None;
    }
    Some(to_records(subject.id, items))
}

/// Sentences from the first `data` field that looks like a sentence list
///
/// A candidate is a non-empty array whose first element is an object and
/// where at least one element carries a Japanese, English or text-like key.
/// Fields are scanned in key order.
pub fn sentence_like_field(subject: &Subject) -> Option<Vec<SentenceRecord>> {
    let data = subject.data.as_object()?;
    let mut fields: Vec<_> = data.iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    fields.into_iter().find_map(|(key, value)| {
        let items = value.as_array()?;
        items.first()?.as_object()?;
        if !object_entries(items).any(has_sentence_key) {
            return None;
        }
        tracing::trace!(subject_id = subject.id, field = %key, "using sentence-like field");
        Some(to_records(subject.id, items))
    })
}

/// One synthesized sentence from the subject's characters and first meaning
pub fn characters_fallback(subject: &Subject) -> Option<Vec<SentenceRecord>> {
    let characters = subject.data.get("characters").and_then(Value::as_str)?;
    let meaning = subject.meanings().first().copied().unwrap_or("");
    Some(vec![SentenceRecord::new(subject.id, 0, characters, meaning)])
}
