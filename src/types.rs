//! Core types for sentence-harvest

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// One vocabulary item returned by the upstream API
///
/// The nested `data` payload varies across API revisions and subject types,
/// so it is kept as raw JSON and probed through accessors.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    /// Upstream identifier
    #[serde(default)]
    pub id: u64,

    /// Upstream object type (e.g. "vocabulary")
    #[serde(default)]
    pub object: String,

    /// Canonical URL of the subject
    #[serde(default)]
    pub url: Option<String>,

    /// Free-form payload
    #[serde(default)]
    pub data: Value,
}

impl Subject {
    /// Build a subject from one raw collection element
    ///
    /// Returns `None` for anything that is not a JSON object. An `id` that
    /// is neither an unsigned integer nor a string holding one falls back to
    /// `fallback_id`; a non-string `object` or `url` counts as absent.
    pub fn from_json(value: Value, fallback_id: u64) -> Option<Self> {
        let Value::Object(mut fields) = value else {
            return None;
        };

        let id = match fields.get("id") {
            Some(Value::Number(n)) => n.as_u64(),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        }
        .unwrap_or(fallback_id);
        let object = fields
            .get("object")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let url = fields.get("url").and_then(Value::as_str).map(str::to_string);

        Some(Self {
            id,
            object,
            url,
            data: fields.remove("data").unwrap_or(Value::Null),
        })
    }

    /// Display characters of the subject, if present
    pub fn characters(&self) -> Option<&str> {
        self.data.get("characters").and_then(Value::as_str)
    }

    /// Level the upstream API assigned to this subject
    pub fn level(&self) -> Option<u32> {
        self.data
            .get("level")
            .and_then(Value::as_u64)
            .and_then(|l| u32::try_from(l).ok())
    }

    /// Meaning strings in upstream order
    pub fn meanings(&self) -> Vec<&str> {
        self.data
            .get("meanings")
            .and_then(Value::as_array)
            .map(|meanings| {
                meanings
                    .iter()
                    .filter_map(|m| m.get("meaning").and_then(Value::as_str))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Label used for this subject in exports
    pub fn display_label(&self) -> String {
        match self.characters() {
            Some(chars) if !chars.is_empty() => chars.to_string(),
            _ => format!("Subject {}", self.id),
        }
    }
}

/// One example sentence pair
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentenceRecord {
    /// `{subject_id}-{index}`, unique within one fetch
    pub id: String,
    /// Japanese sentence (empty if the source lacked one)
    pub japanese_text: String,
    /// English sentence (empty if the source lacked one)
    pub english_text: String,
}

impl SentenceRecord {
    /// Build a record for the `index`-th sentence of `subject_id`
    pub fn new(
        subject_id: u64,
        index: usize,
        japanese_text: impl Into<String>,
        english_text: impl Into<String>,
    ) -> Self {
        Self {
            id: format!("{}-{}", subject_id, index),
            japanese_text: japanese_text.into(),
            english_text: english_text.into(),
        }
    }
}

/// Sentences extracted from one subject
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectGroup {
    /// Upstream subject identifier
    pub subject_id: u64,
    /// Characters of the subject, or a synthesized label
    pub display_label: String,
    /// Never empty
    pub sentences: Vec<SentenceRecord>,
}

/// Sentence groups keyed by level
///
/// Serializes as a JSON object whose keys are `"Level N"` labels in ascending
/// numeric order, so `"Level 2"` precedes `"Level 10"`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LevelResults {
    levels: BTreeMap<u32, Vec<SubjectGroup>>,
}

/// Label used for a level in results and exports
pub fn level_label(level: u32) -> String {
    format!("Level {}", level)
}

fn parse_level_label(label: &str) -> Option<u32> {
    label.strip_prefix("Level ")?.trim().parse().ok()
}

impl LevelResults {
    /// Empty result set
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the groups for `level`, replacing any previous entry
    ///
    /// An empty `groups` vector removes the level instead, since only levels
    /// with at least one group are kept.
    pub fn insert(&mut self, level: u32, groups: Vec<SubjectGroup>) {
        if groups.is_empty() {
            self.levels.remove(&level);
        } else {
            self.levels.insert(level, groups);
        }
    }

    /// Groups for `level`
    pub fn get(&self, level: u32) -> Option<&[SubjectGroup]> {
        self.levels.get(&level).map(Vec::as_slice)
    }

    /// Groups for a `"Level N"` label
    pub fn get_label(&self, label: &str) -> Option<&[SubjectGroup]> {
        parse_level_label(label).and_then(|level| self.get(level))
    }

    /// Levels present, ascending
    pub fn levels(&self) -> impl Iterator<Item = u32> + '_ {
        self.levels.keys().copied()
    }

    /// Labels present, ascending by level
    pub fn labels(&self) -> Vec<String> {
        self.levels().map(level_label).collect()
    }

    /// `(level, groups)` pairs, ascending
    pub fn iter(&self) -> impl Iterator<Item = (u32, &[SubjectGroup])> + '_ {
        self.levels.iter().map(|(l, g)| (*l, g.as_slice()))
    }

    /// Number of levels present
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// True if no level produced any group
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Total number of sentences across all levels
    pub fn sentence_count(&self) -> usize {
        self.levels
            .values()
            .flatten()
            .map(|g| g.sentences.len())
            .sum()
    }
}

impl Serialize for LevelResults {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.levels.len()))?;
        for (level, groups) in &self.levels {
            map.serialize_entry(&level_label(*level), groups)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for LevelResults {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct LevelResultsVisitor;

        impl<'de> Visitor<'de> for LevelResultsVisitor {
            type Value = LevelResults;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of \"Level N\" labels to subject groups")
            }

            fn visit_map<M>(self, mut access: M) -> Result<Self::Value, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut results = LevelResults::new();
                while let Some((label, groups)) =
                    access.next_entry::<String, Vec<SubjectGroup>>()?
                {
                    let level = parse_level_label(&label).ok_or_else(|| {
                        de::Error::custom(format!("invalid level label '{}'", label))
                    })?;
                    results.insert(level, groups);
                }
                Ok(results)
            }
        }

        deserializer.deserialize_map(LevelResultsVisitor)
    }
}

/// Events emitted by the harvester
///
/// Subscribe with [`SentenceHarvester::subscribe`](crate::SentenceHarvester::subscribe).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A fetch operation started
    FetchStarted {
        /// Levels requested, ascending
        levels: Vec<u32>,
    },

    /// One page of subjects arrived
    PageFetched {
        /// Level being fetched
        level: u32,
        /// One-based page number within the level
        page: usize,
        /// Subjects accumulated for this level so far
        total: usize,
    },

    /// All pages of a level were fetched and extracted
    LevelFetched {
        /// Level that completed
        level: u32,
        /// Subjects returned by the API
        subjects: usize,
        /// Subjects that yielded at least one sentence
        groups: usize,
    },

    /// The whole fetch operation succeeded
    FetchCompleted {
        /// Levels with at least one group
        levels: Vec<u32>,
        /// Total sentences across all levels
        sentences: usize,
    },

    /// The fetch operation failed; no results were kept
    FetchFailed {
        /// Error message
        error: String,
    },

    /// A file was handed to the delivery sink
    FileDelivered {
        /// File name
        filename: String,
        /// Payload size in bytes
        bytes: usize,
    },

    /// Every file of an export was delivered
    ExportCompleted {
        /// Number of files delivered
        files: usize,
    },
}
