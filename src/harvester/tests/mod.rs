use super::*;
use crate::config::{CredentialSource, ExportLayout};
use crate::credentials::MemoryCredentialStore;
use crate::delivery::MemorySink;
use crate::error::Error;
use crate::export::ExportMode;
use serde_json::{Value, json};
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const TOKEN: &str = "harvest-token";

fn test_config(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.api.base_url = server.uri();
    config.credentials.source = CredentialSource::Memory;
    config.credentials.token = Some(TOKEN.to_string());
    config.export.file_delay = Duration::ZERO;
    config
}

fn harvester_with_sink(server: &MockServer) -> (SentenceHarvester, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let harvester = SentenceHarvester::new(test_config(server))
        .unwrap()
        .with_sink(sink.clone());
    (harvester, sink)
}

fn vocab_with_context(id: u64, level: u32, characters: &str) -> Value {
    json!({
        "id": id,
        "object": "vocabulary",
        "data": {
            "level": level,
            "characters": characters,
            "meanings": [{ "meaning": "Meaning", "primary": true }],
            "context_sentences": [
                { "ja": format!("{}です。", characters), "en": format!("It is {}.", id) }
            ]
        }
    })
}

fn bare_subject(id: u64) -> Value {
    json!({ "id": id, "object": "vocabulary", "data": { "level": 2 } })
}

async fn mount_level(server: &MockServer, level: u32, subjects: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path("/subjects"))
        .and(query_param("levels", level.to_string()))
        .and(header("Authorization", format!("Bearer {}", TOKEN)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "collection",
            "data": subjects,
            "pages": { "next_url": null }
        })))
        .mount(server)
        .await;
}

fn drain(rx: &mut broadcast::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

#[test]
fn new_rejects_invalid_config() {
    let mut config = Config::default();
    config.api.max_pages = 0;
    assert!(matches!(
        SentenceHarvester::new(config),
        Err(Error::Config { .. })
    ));
}

// ---------------------------------------------------------------------------
// fetch_levels
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_levels_groups_sentences_by_level() {
    let server = MockServer::start().await;
    mount_level(
        &server,
        1,
        vec![vocab_with_context(11, 1, "一"), vocab_with_context(12, 1, "二")],
    )
    .await;
    mount_level(&server, 3, vec![vocab_with_context(31, 3, "三")]).await;

    let (harvester, _) = harvester_with_sink(&server);
    let results = harvester.fetch_levels("3, 1").await.unwrap();

    assert_eq!(results.labels(), vec!["Level 1", "Level 3"]);
    let level_1 = results.get_label("Level 1").unwrap();
    assert_eq!(level_1.len(), 2);
    assert_eq!(level_1[0].display_label, "一");
    assert_eq!(level_1[0].sentences[0].id, "11-0");
    assert_eq!(level_1[0].sentences[0].japanese_text, "一です。");
    assert_eq!(results.sentence_count(), 3);

    let latest = harvester.latest_results().await.unwrap();
    assert_eq!(*latest, results);
}

#[tokio::test]
async fn levels_without_sentences_are_left_out() {
    let server = MockServer::start().await;
    mount_level(&server, 1, vec![vocab_with_context(11, 1, "一")]).await;
    mount_level(&server, 2, vec![bare_subject(21), bare_subject(22)]).await;
    mount_level(&server, 3, vec![]).await;

    let (harvester, _) = harvester_with_sink(&server);
    let results = harvester.fetch_levels("1-3").await.unwrap();

    assert_eq!(results.labels(), vec!["Level 1"]);
    assert!(results.get(2).is_none());
    assert!(results.get(3).is_none());
}

#[tokio::test]
async fn odd_subject_does_not_fail_the_fetch() {
    let server = MockServer::start().await;
    mount_level(
        &server,
        1,
        vec![
            vocab_with_context(11, 1, "一"),
            json!({ "id": 12, "object": null, "data": { "level": 1 } }),
            Value::Null,
        ],
    )
    .await;
    mount_level(&server, 2, vec![vocab_with_context(21, 2, "二")]).await;

    let (harvester, _) = harvester_with_sink(&server);
    let results = harvester.fetch_levels("1-2").await.unwrap();

    assert_eq!(results.labels(), vec!["Level 1", "Level 2"]);
    assert_eq!(results.get(1).unwrap()[0].sentences[0].japanese_text, "一です。");
    assert_eq!(results.sentence_count(), 2);
}

#[tokio::test]
async fn invalid_level_spec_makes_no_request() {
    let server = MockServer::start().await;
    let (harvester, _) = harvester_with_sink(&server);

    for spec in ["", "abc", " , ", "9-4"] {
        let err = harvester.fetch_levels(spec).await.unwrap_err();
        assert!(
            matches!(err, Error::InvalidLevels { ref input } if input == spec),
            "{spec:?} should be rejected, got {err:?}"
        );
    }

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_token_makes_no_request() {
    let server = MockServer::start().await;
    let harvester = SentenceHarvester::new(test_config(&server))
        .unwrap()
        .with_credentials(Arc::new(MemoryCredentialStore::new(None)));

    let err = harvester.fetch_levels("1").await.unwrap_err();
    assert!(matches!(err, Error::MissingCredential));
    assert_eq!(err.kind(), crate::error::ErrorKind::Auth);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn failure_discards_partial_and_previous_results() {
    let server = MockServer::start().await;
    mount_level(&server, 1, vec![vocab_with_context(11, 1, "一")]).await;
    Mock::given(method("GET"))
        .and(path("/subjects"))
        .and(query_param("levels", "2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (harvester, _) = harvester_with_sink(&server);
    harvester.fetch_levels("1").await.unwrap();
    assert!(harvester.latest_results().await.is_some());

    let err = harvester.fetch_levels("1-2").await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert!(
        harvester.latest_results().await.is_none(),
        "no stale level may survive a failed fetch"
    );
}

#[tokio::test]
async fn fetch_emits_progress_events_in_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/subjects"))
        .and(query_param("levels", "4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [vocab_with_context(41, 4, "四")],
            "pages": { "next_url": format!("{}/page-2", server.uri()) }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [bare_subject(42)],
            "pages": {}
        })))
        .mount(&server)
        .await;

    let (harvester, _) = harvester_with_sink(&server);
    let mut rx = harvester.subscribe();
    harvester.fetch_levels("4").await.unwrap();

    assert_eq!(
        drain(&mut rx),
        vec![
            Event::FetchStarted { levels: vec![4] },
            Event::PageFetched {
                level: 4,
                page: 1,
                total: 1
            },
            Event::PageFetched {
                level: 4,
                page: 2,
                total: 2
            },
            Event::LevelFetched {
                level: 4,
                subjects: 2,
                groups: 1
            },
            Event::FetchCompleted {
                levels: vec![4],
                sentences: 1
            },
        ]
    );
}

#[tokio::test]
async fn failed_fetch_emits_fetch_failed() {
    let server = MockServer::start().await;
    let (harvester, _) = harvester_with_sink(&server);
    let mut rx = harvester.subscribe();

    harvester.fetch_levels("nope").await.unwrap_err();

    let events = drain(&mut rx);
    assert_eq!(events.len(), 1);
    assert!(matches!(&events[0], Event::FetchFailed { error } if error.contains("nope")));
}

// ---------------------------------------------------------------------------
// export
// ---------------------------------------------------------------------------

#[tokio::test]
async fn export_latest_delivers_files_to_sink() {
    let server = MockServer::start().await;
    mount_level(&server, 1, vec![vocab_with_context(11, 1, "一")]).await;
    mount_level(&server, 2, vec![vocab_with_context(21, 2, "二")]).await;

    let (harvester, sink) = harvester_with_sink(&server);
    harvester.fetch_levels("1,2").await.unwrap();

    let mut rx = harvester.subscribe();
    let report = harvester.export_latest(ExportMode::Bilingual).await.unwrap();

    assert_eq!(
        report.filenames(),
        vec!["level-1-bilingual.txt", "level-2-bilingual.txt"]
    );
    let files = sink.files().await;
    assert_eq!(files.len(), 2);
    assert_eq!(
        String::from_utf8(files[0].payload.clone()).unwrap(),
        "# 一 (11)\n一です。\tIt is 11.\n\n"
    );

    let events = drain(&mut rx);
    assert_eq!(events.len(), 3);
    assert!(matches!(&events[0], Event::FileDelivered { filename, .. } if filename == "level-1-bilingual.txt"));
    assert_eq!(events[2], Event::ExportCompleted { files: 2 });
}

#[tokio::test]
async fn export_follows_configured_layout() {
    let server = MockServer::start().await;
    let mut config = test_config(&server);
    config.export.layout = ExportLayout::Combined;
    let sink = Arc::new(MemorySink::new());
    let harvester = SentenceHarvester::new(config).unwrap().with_sink(sink.clone());

    let mut results = LevelResults::new();
    results.insert(
        7,
        vec![crate::types::SubjectGroup {
            subject_id: 70,
            display_label: "七".into(),
            sentences: vec![crate::types::SentenceRecord::new(70, 0, "七つ", "seven")],
        }],
    );

    let report = harvester
        .export(&results, ExportMode::JapaneseOnly)
        .await
        .unwrap();
    assert_eq!(report.filenames(), vec!["levels-7-japanese-only.txt"]);
    assert_eq!(sink.filenames().await, vec!["levels-7-japanese-only.txt"]);
}

#[tokio::test]
async fn export_latest_without_fetch_is_an_error() {
    let server = MockServer::start().await;
    let (harvester, sink) = harvester_with_sink(&server);

    let err = harvester
        .export_latest(ExportMode::JsonFull)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NoResults));
    assert!(sink.files().await.is_empty());
}

#[tokio::test]
async fn export_twice_is_idempotent() {
    let server = MockServer::start().await;
    mount_level(&server, 5, vec![vocab_with_context(51, 5, "五")]).await;

    let (harvester, sink) = harvester_with_sink(&server);
    let results = harvester.fetch_levels("5").await.unwrap();

    let first = harvester.export(&results, ExportMode::JsonFull).await.unwrap();
    let second = harvester.export(&results, ExportMode::JsonFull).await.unwrap();
    assert_eq!(first, second);

    let files = sink.files().await;
    assert_eq!(files[0], files[1]);
    assert_eq!(files[0].filename, "levels-5-full.json");
}

#[tokio::test]
async fn custom_extractor_is_used() {
    use crate::extraction::{ExtractionStrategy, strategies};

    let server = MockServer::start().await;
    mount_level(&server, 1, vec![vocab_with_context(11, 1, "一")]).await;

    let (harvester, _) = harvester_with_sink(&server);
    let harvester = harvester.with_extractor(SentenceExtractor::with_strategies(vec![
        ExtractionStrategy::new("characters_fallback", strategies::characters_fallback),
    ]));

    let results = harvester.fetch_levels("1").await.unwrap();
    let sentences = &results.get(1).unwrap()[0].sentences;
    assert_eq!(sentences[0].japanese_text, "一");
    assert_eq!(sentences[0].english_text, "Meaning");
}
