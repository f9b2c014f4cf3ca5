//! Plain-text rendering
//!
//! ```text
//! # 一 (2467)
//! 一ど、あいましょう。	Let’s meet up once.
//!
//! ```
//!
//! Single-language modes skip sentences whose chosen side is empty; the
//! group header is always written.

use super::ExportMode;
use crate::types::{LevelResults, SentenceRecord, SubjectGroup, level_label};

fn sentence_line(sentence: &SentenceRecord, mode: ExportMode) -> Option<String> {
    let line = match mode {
        ExportMode::JapaneseOnly => sentence.japanese_text.clone(),
        ExportMode::EnglishOnly => sentence.english_text.clone(),
        ExportMode::Bilingual => {
            return Some(format!("{}\t{}", sentence.japanese_text, sentence.english_text));
        }
        ExportMode::JsonFull => return None,
    };
    if line.is_empty() { None } else { Some(line) }
}

fn push_group(out: &mut String, group: &SubjectGroup, mode: ExportMode) {
    out.push_str(&format!("# {} ({})\n", group.display_label, group.subject_id));
    for line in group.sentences.iter().filter_map(|s| sentence_line(s, mode)) {
        out.push_str(&line);
        out.push('\n');
    }
    out.push('\n');
}

/// Body of one level's file
pub(super) fn render_groups(groups: &[SubjectGroup], mode: ExportMode) -> String {
    let mut out = String::new();
    for group in groups {
        push_group(&mut out, group, mode);
    }
    out
}

/// Body of the combined file, levels ascending
pub(super) fn render_combined(results: &LevelResults, mode: ExportMode) -> String {
    let mut out = String::new();
    for (level, groups) in results.iter() {
        out.push_str(&format!("## {}\n\n", level_label(level)));
        for group in groups {
            push_group(&mut out, group, mode);
        }
    }
    out
}
