//! Example-sentence extraction
//!
//! The upstream subject payload is not stable across API revisions and
//! subject types, so extraction is best effort. A [`SentenceExtractor`] runs
//! an ordered list of named strategies and keeps the first non-empty result;
//! results from different strategies are never merged. A subject for which
//! no strategy applies contributes nothing, which is not an error.
//!
//! Default order:
//! 1. [`context_sentences`](strategies::context_sentences)
//! 2. [`sentence_like_field`](strategies::sentence_like_field)
//! 3. [`characters_fallback`](strategies::characters_fallback)

pub mod fields;
pub mod strategies;


use crate::types::{SentenceRecord, Subject, SubjectGroup};
use tracing::trace;

/// Signature every extraction strategy implements
pub type StrategyFn = fn(&Subject) -> Option<Vec<SentenceRecord>>;

/// A named extraction strategy
#[derive(Clone, Copy)]
pub struct ExtractionStrategy {
    /// Name used in logs
    pub name: &'static str,
    /// The strategy itself
    pub run: StrategyFn,
}

impl ExtractionStrategy {
    /// Create a named strategy
    pub const fn new(name: &'static str, run: StrategyFn) -> Self {
        Self { name, run }
    }
}

impl std::fmt::Debug for ExtractionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ExtractionStrategy").field(&self.name).finish()
    }
}

/// Built-in strategies in priority order
pub const DEFAULT_STRATEGIES: [ExtractionStrategy; 3] = [
    ExtractionStrategy::new("context_sentences", strategies::context_sentences),
    ExtractionStrategy::new("sentence_like_field", strategies::sentence_like_field),
    ExtractionStrategy::new("characters_fallback", strategies::characters_fallback),
];

/// Runs extraction strategies in order until one yields sentences
#[derive(Clone, Debug)]
pub struct SentenceExtractor {
    strategies: Vec<ExtractionStrategy>,
}

impl Default for SentenceExtractor {
    fn default() -> Self {
        Self {
            strategies: DEFAULT_STRATEGIES.to_vec(),
        }
    }
}

impl SentenceExtractor {
    /// Extractor with the built-in strategies
    pub fn new() -> Self {
        Self::default()
    }

    /// Extractor with a caller-supplied strategy order
    pub fn with_strategies(strategies: Vec<ExtractionStrategy>) -> Self {
        Self { strategies }
    }

    /// Strategy names in the order they are tried
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name).collect()
    }

    /// Sentences for `subject`, possibly empty
    pub fn extract(&self, subject: &Subject) -> Vec<SentenceRecord> {
        for strategy in &self.strategies {
            match (strategy.run)(subject) {
                Some(sentences) if !sentences.is_empty() => {
                    trace!(
                        subject_id = subject.id,
                        strategy = strategy.name,
                        count = sentences.len(),
                        "extracted sentences"
                    );
                    return sentences;
                }
                _ => continue,
            }
        }

        trace!(subject_id = subject.id, "no strategy produced sentences");
        Vec::new()
    }

    /// Group for `subject`, or `None` if it has no sentences
    pub fn group(&self, subject: &Subject) -> Option<SubjectGroup> {
        let sentences = self.extract(subject);
        if sentences.is_empty() {
            return None;
        }
        Some(SubjectGroup {
            subject_id: subject.id,
            display_label: subject.display_label(),
            sentences,
        })
    }

    /// Groups for every subject that yields sentences, in input order
    pub fn group_all<'a>(&self, subjects: impl IntoIterator<Item = &'a Subject>) -> Vec<SubjectGroup> {
        subjects.into_iter().filter_map(|s| self.group(s)).collect()
    }
}
