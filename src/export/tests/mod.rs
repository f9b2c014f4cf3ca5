use super::*;
use crate::types::{SentenceRecord, SubjectGroup};

fn group(id: u64, label: &str, sentences: &[(&str, &str)]) -> SubjectGroup {
    SubjectGroup {
        subject_id: id,
        display_label: label.to_string(),
        sentences: sentences
            .iter()
            .enumerate()
            .map(|(i, (ja, en))| SentenceRecord::new(id, i, *ja, *en))
            .collect(),
    }
}

/// Levels 4, 5 and 9 with a mix of complete and one-sided sentences
fn sample_results() -> LevelResults {
    let mut results = LevelResults::new();
    results.insert(
        4,
        vec![
            group(
                2467,
                "一",
                &[
                    ("一ど、あいましょう。", "Let’s meet up once."),
                    ("一いはアメリカ人でした。", "First place was an American."),
                ],
            ),
            group(2468, "一つ", &[("一つください。", "")]),
        ],
    );
    results.insert(5, vec![group(3000, "大人", &[("", "I'm an adult.")])]);
    results.insert(9, vec![group(4000, "九", &[("九時です。", "It's nine.")])]);
    results
}

fn text(file: &ExportFile) -> &str {
    std::str::from_utf8(&file.payload).unwrap()
}

// ---------------------------------------------------------------------------
// ExportMode
// ---------------------------------------------------------------------------

#[test]
fn mode_names_round_trip_through_from_str() {
    for mode in ExportMode::ALL {
        assert_eq!(mode.as_str().parse::<ExportMode>().unwrap(), mode);
        assert_eq!(mode.to_string(), mode.as_str());
    }
    assert_eq!(
        " Bilingual ".parse::<ExportMode>().unwrap(),
        ExportMode::Bilingual
    );
}

#[test]
fn unknown_mode_is_an_input_error() {
    let err = "pdf".parse::<ExportMode>().unwrap_err();
    assert!(matches!(err, Error::InvalidExportMode(ref m) if m == "pdf"));
    assert_eq!(err.kind(), crate::error::ErrorKind::Input);
}

#[test]
fn mode_serializes_as_kebab_case() {
    let json = serde_json::to_string(&ExportMode::JapaneseOnly).unwrap();
    assert_eq!(json, "\"japanese-only\"");
    let back: ExportMode = serde_json::from_str("\"json-full\"").unwrap();
    assert_eq!(back, ExportMode::JsonFull);
}

// ---------------------------------------------------------------------------
// Per-level text
// ---------------------------------------------------------------------------

#[test]
fn per_level_bilingual_writes_one_file_per_level() {
    let files = serialize(&sample_results(), ExportMode::Bilingual, ExportLayout::PerLevel).unwrap();

    let names: Vec<&str> = files.iter().map(|f| f.filename.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "level-4-bilingual.txt",
            "level-5-bilingual.txt",
            "level-9-bilingual.txt"
        ]
    );
    assert!(files.iter().all(|f| f.mime_type == TEXT_MIME));

    assert_eq!(
        text(&files[0]),
        "# 一 (2467)\n\
         一ど、あいましょう。\tLet’s meet up once.\n\
         一いはアメリカ人でした。\tFirst place was an American.\n\
         \n\
         # 一つ (2468)\n\
         一つください。\t\n\
         \n"
    );
}

#[test]
fn japanese_only_skips_sentences_without_japanese() {
    let files =
        serialize(&sample_results(), ExportMode::JapaneseOnly, ExportLayout::PerLevel).unwrap();

    assert_eq!(files[1].filename, "level-5-japanese-only.txt");
    assert_eq!(text(&files[1]), "# 大人 (3000)\n\n", "header kept, empty line dropped");
    assert!(text(&files[0]).contains("一つください。\n"));
    assert!(!text(&files[0]).contains("Let’s meet up once."));
}

#[test]
fn english_only_writes_english_side() {
    let files =
        serialize(&sample_results(), ExportMode::EnglishOnly, ExportLayout::PerLevel).unwrap();

    assert_eq!(text(&files[1]), "# 大人 (3000)\nI'm an adult.\n\n");
    assert!(!text(&files[0]).contains("一つください。"));
}

// ---------------------------------------------------------------------------
// Combined text
// ---------------------------------------------------------------------------

#[test]
fn combined_layout_writes_single_file_with_level_headings() {
    let files = serialize(&sample_results(), ExportMode::Bilingual, ExportLayout::Combined).unwrap();

    assert_eq!(files.len(), 1);
    assert_eq!(files[0].filename, "levels-4-5_9-bilingual.txt");

    let body = text(&files[0]);
    let l4 = body.find("## Level 4\n\n").unwrap();
    let l5 = body.find("## Level 5\n\n").unwrap();
    let l9 = body.find("## Level 9\n\n").unwrap();
    assert!(l4 < l5 && l5 < l9, "levels must appear in ascending order");
    assert!(body.starts_with("## Level 4\n\n# 一 (2467)\n"));
}

#[test]
fn combined_layout_orders_levels_numerically() {
    let mut results = LevelResults::new();
    results.insert(10, vec![group(10, "十", &[("十", "ten")])]);
    results.insert(2, vec![group(2, "二", &[("二", "two")])]);

    let files = serialize(&results, ExportMode::EnglishOnly, ExportLayout::Combined).unwrap();
    assert_eq!(files[0].filename, "levels-2_10-english-only.txt");
    let body = text(&files[0]);
    assert!(body.find("## Level 2").unwrap() < body.find("## Level 10").unwrap());
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

#[test]
fn json_full_round_trips_to_equal_results() {
    let results = sample_results();
    for layout in [ExportLayout::PerLevel, ExportLayout::Combined] {
        let files = serialize(&results, ExportMode::JsonFull, layout).unwrap();
        assert_eq!(files.len(), 1, "json-full is always one file");
        assert_eq!(files[0].filename, "levels-4-5_9-full.json");
        assert_eq!(files[0].mime_type, JSON_MIME);

        let back: LevelResults = serde_json::from_slice(&files[0].payload).unwrap();
        assert_eq!(back, results);
    }
}

#[test]
fn json_full_uses_level_labels_and_camel_case() {
    let files = serialize(&sample_results(), ExportMode::JsonFull, ExportLayout::PerLevel).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&files[0].payload).unwrap();

    let first = &value["Level 4"][0];
    assert_eq!(first["subjectId"], 2467);
    assert_eq!(first["displayLabel"], "一");
    assert_eq!(first["sentences"][1]["id"], "2467-1");
    assert_eq!(first["sentences"][1]["japaneseText"], "一いはアメリカ人でした。");
}

// ---------------------------------------------------------------------------
// Empty results and idempotence
// ---------------------------------------------------------------------------

#[test]
fn empty_results_yield_no_text_files_and_one_json_file() {
    let empty = LevelResults::new();

    for layout in [ExportLayout::PerLevel, ExportLayout::Combined] {
        for mode in [ExportMode::JapaneseOnly, ExportMode::EnglishOnly, ExportMode::Bilingual] {
            assert!(serialize(&empty, mode, layout).unwrap().is_empty());
        }
    }

    let files = serialize(&empty, ExportMode::JsonFull, ExportLayout::PerLevel).unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].filename, "levels-none-full.json");
    assert_eq!(text(&files[0]), "{}");
}

#[test]
fn repeated_export_is_byte_identical() {
    let results = sample_results();
    for mode in ExportMode::ALL {
        for layout in [ExportLayout::PerLevel, ExportLayout::Combined] {
            let first = serialize(&results, mode, layout).unwrap();
            let second = serialize(&results.clone(), mode, layout).unwrap();
            assert_eq!(first, second, "{mode} / {layout:?} must be deterministic");
            let hashes: Vec<String> = first.iter().map(ExportFile::sha256).collect();
            let again: Vec<String> = second.iter().map(ExportFile::sha256).collect();
            assert_eq!(hashes, again);
        }
    }
}

#[test]
fn sha256_is_lowercase_hex_of_payload() {
    let file = ExportFile {
        filename: "x.txt".into(),
        payload: b"abc".to_vec(),
        mime_type: TEXT_MIME,
    };
    assert_eq!(
        file.sha256(),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
    assert_eq!(file.len(), 3);
}
