//! Export serialization
//!
//! Turns a [`LevelResults`] into one or more [`ExportFile`]s. Serialization
//! is pure: the same results, mode and layout always produce the same
//! filenames and bytes, so re-exporting is idempotent.
//!
//! | Mode            | Output                                                |
//! |-----------------|-------------------------------------------------------|
//! | `japanese-only` | text, Japanese side of every sentence                 |
//! | `english-only`  | text, English side of every sentence                  |
//! | `bilingual`     | text, `japanese<TAB>english` per sentence             |
//! | `json-full`     | one pretty-printed JSON document of the whole result  |
//!
//! Text modes honour [`ExportLayout`]: one file per level, or one combined
//! file. `json-full` always produces a single file.

mod text;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

use crate::config::ExportLayout;
use crate::error::{Error, Result};
use crate::levels::LevelSpec;
use crate::types::LevelResults;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// MIME type of text exports
pub const TEXT_MIME: &str = "text/plain; charset=utf-8";

/// MIME type of JSON exports
pub const JSON_MIME: &str = "application/json";

/// What an export contains
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportMode {
    /// Japanese sentences only
    JapaneseOnly,
    /// English sentences only
    EnglishOnly,
    /// Japanese and English, tab separated
    Bilingual,
    /// The full result as JSON
    JsonFull,
}

impl ExportMode {
    /// All modes, in display order
    pub const ALL: [ExportMode; 4] = [
        ExportMode::JapaneseOnly,
        ExportMode::EnglishOnly,
        ExportMode::Bilingual,
        ExportMode::JsonFull,
    ];

    /// Kebab-case name used in filenames and configuration
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportMode::JapaneseOnly => "japanese-only",
            ExportMode::EnglishOnly => "english-only",
            ExportMode::Bilingual => "bilingual",
            ExportMode::JsonFull => "json-full",
        }
    }

    /// True for the plain-text modes
    pub fn is_text(&self) -> bool {
        !matches!(self, ExportMode::JsonFull)
    }
}

impl fmt::Display for ExportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        ExportMode::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::InvalidExportMode(s.to_string()))
    }
}

/// One file ready for delivery
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportFile {
    /// Bare file name, no directories
    pub filename: String,
    /// File contents
    pub payload: Vec<u8>,
    /// MIME type of the payload
    pub mime_type: &'static str,
}

impl ExportFile {
    /// Lowercase hex SHA-256 of the payload
    pub fn sha256(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(&self.payload);
        format!("{:x}", hasher.finalize())
    }

    /// Payload size in bytes
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// True if the payload is empty
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

/// Level set of `results` as used in filenames: `4-7_9` or `none`
fn levels_slug(results: &LevelResults) -> String {
    let levels: LevelSpec = results.levels().collect();
    if levels.is_empty() {
        "none".to_string()
    } else {
        levels.compact().replace(',', "_")
    }
}

/// Serialize `results` into export files
///
/// An empty result yields no text files, and a single JSON file named
/// `levels-none-full.json` in `json-full` mode.
///
/// # Errors
/// Returns [`Error::Serialization`] if JSON encoding fails.
pub fn serialize(
    results: &LevelResults,
    mode: ExportMode,
    layout: ExportLayout,
) -> Result<Vec<ExportFile>> {
    let files = match (mode, layout) {
        (ExportMode::JsonFull, _) => {
            let json = serde_json::to_string_pretty(results)?;
            vec![ExportFile {
                filename: format!("levels-{}-full.json", levels_slug(results)),
                payload: json.into_bytes(),
                mime_type: JSON_MIME,
            }]
        }
        (_, ExportLayout::PerLevel) => results
            .iter()
            .map(|(level, groups)| ExportFile {
                filename: format!("level-{}-{}.txt", level, mode),
                payload: text::render_groups(groups, mode).into_bytes(),
                mime_type: TEXT_MIME,
            })
            .collect(),
        (_, ExportLayout::Combined) => {
            if results.is_empty() {
                Vec::new()
            } else {
                vec![ExportFile {
                    filename: format!("levels-{}-{}.txt", levels_slug(results), mode),
                    payload: text::render_combined(results, mode).into_bytes(),
                    mime_type: TEXT_MIME,
                }]
            }
        }
    };

    tracing::debug!(
        mode = %mode,
        layout = ?layout,
        files = files.len(),
        "serialized export"
    );
    Ok(files)
}
