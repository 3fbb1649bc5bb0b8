//! The engine end to end: sources, queries, reports and configuration.

use std::fs;
use std::path::Path;

use scour::{BracketEmphasis, Engine, EngineConfig, JsonDirSource, SearchError, SilentObserver};
use tempfile::TempDir;

use crate::common::{make_doc, make_titled_doc, ns, report_keys, temp_engine};

fn write_source(dir: &Path) {
    fs::create_dir_all(dir.join("documents")).unwrap();
    fs::write(
        dir.join("manifest.json"),
        r#"{
            "version": 1,
            "namespaces": {
                "go": ["goroutines", "channels", "draft", "gone"],
                "python": ["generators"]
            }
        }"#,
    )
    .unwrap();
    let docs = [
        (
            "goroutines",
            r#"{"url": "https://go.dev/goroutines", "title": "Goroutines", "content": "A goroutine is a lightweight thread. Start one with the go keyword."}"#,
        ),
        (
            "channels",
            r#"{"url": "https://go.dev/channels", "title": "Channels", "content": "Channels connect goroutines. Send and receive values!"}"#,
        ),
        (
            "draft",
            r#"{"url": "https://go.dev/draft", "content": null}"#,
        ),
        (
            "generators",
            r#"{"url": "https://python.org/generators", "content": "Generators yield values lazily."}"#,
        ),
    ];
    for (key, body) in docs {
        fs::write(dir.join("documents").join(format!("{}.json", key)), body).unwrap();
    }
}

#[test]
fn test_index_from_json_directory() {
    let source_dir = TempDir::new().unwrap();
    write_source(source_dir.path());
    let (_dir, engine) = temp_engine();

    let source = JsonDirSource::open(source_dir.path()).unwrap();
    let reports = engine
        .index_from_source(&source, &[], &SilentObserver)
        .unwrap();

    assert_eq!(reports.len(), 2);
    let (go, go_report) = &reports[0];
    assert_eq!(go.as_str(), "go");
    assert_eq!(go_report.indexed, 2);
    assert_eq!(go_report.skipped, 2);
    assert_eq!(go_report.skipped_keys, vec!["draft", "gone"]);

    let listed = engine.list_namespaces().unwrap();
    assert_eq!(listed.len(), 2);

    let report = engine.query(&ns("python"), "yield").unwrap();
    assert_eq!(report_keys(&report), vec!["generators"]);
}

#[test]
fn test_selector_limits_indexing() {
    let source_dir = TempDir::new().unwrap();
    write_source(source_dir.path());
    let (_dir, engine) = temp_engine();

    let source = JsonDirSource::open(source_dir.path()).unwrap();
    engine
        .index_from_source(&source, &[ns("python")], &SilentObserver)
        .unwrap();

    let err = engine.query(&ns("go"), "goroutine").unwrap_err();
    assert!(matches!(err, SearchError::NotIndexed(_)));
}

#[test]
fn test_reports_carry_metadata_and_fragments() {
    let (_dir, engine) = temp_engine();
    engine
        .index(
            &ns("go"),
            vec![make_titled_doc(
                "ch",
                "Channels",
                "Channels connect goroutines. Nothing else here. Buffered channels block when full!",
            )],
        )
        .unwrap();

    let report = engine.query(&ns("go"), "channels").unwrap();
    let hit = &report.matches[0];
    assert_eq!(hit.title.as_deref(), Some("Channels"));
    assert_eq!(hit.url, "https://example.org/ch");
    assert!(hit.score > 0.0);

    let rendered: Vec<String> = hit
        .fragments
        .iter()
        .map(|f| f.render(&BracketEmphasis))
        .collect();
    assert_eq!(
        rendered,
        vec![
            "[Channels] connect goroutines.",
            "Buffered [channels] block when full!"
        ]
    );
}

#[test]
fn test_negated_terms_are_not_highlighted() {
    let (_dir, engine) = temp_engine();
    engine
        .index(&ns("go"), vec![make_doc("a", "maps and slices. slices only.")])
        .unwrap();

    let report = engine.query(&ns("go"), "maps AND NOT channels").unwrap();
    let fragments = &report.matches[0].fragments;
    assert_eq!(fragments.len(), 1);
    assert_eq!(fragments[0].render(&BracketEmphasis), "[maps] and slices.");
}

#[test]
fn test_result_limit_applies_per_namespace() {
    let dir = TempDir::new().unwrap();
    let config = EngineConfig {
        result_limit: 3,
        ..EngineConfig::default().with_index_dir(dir.path())
    };
    let engine = Engine::new(config).unwrap();

    let docs = (0..10)
        .map(|i| make_doc(&format!("d{}", i), "common word"))
        .collect();
    engine.index(&ns("go"), docs).unwrap();

    let report = engine.query(&ns("go"), "common").unwrap();
    assert_eq!(report_keys(&report), vec!["d0", "d1", "d2"]);
}

#[test]
fn test_config_file_drives_engine() {
    let dir = TempDir::new().unwrap();
    let index_dir = dir.path().join("indexes");
    let config_path = dir.path().join("scour.json");
    fs::write(
        &config_path,
        format!(
            r#"{{"index_dir": {:?}, "max_fragments": 1}}"#,
            index_dir.display().to_string()
        ),
    )
    .unwrap();

    let engine = Engine::new(EngineConfig::from_file(&config_path).unwrap()).unwrap();
    engine
        .index(&ns("go"), vec![make_doc("a", "one match. two match. three match.")])
        .unwrap();
    assert!(index_dir.join("go").join("segment.scour").is_file());

    let report = engine.query(&ns("go"), "match").unwrap();
    assert_eq!(report.matches[0].fragments.len(), 1);
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = EngineConfig {
        max_fragments: 0,
        ..EngineConfig::default()
    };
    assert!(matches!(Engine::new(config), Err(SearchError::Config(_))));
}

#[test]
fn test_syntax_error_carries_position() {
    let (_dir, engine) = temp_engine();
    engine.index(&ns("go"), vec![make_doc("a", "x")]).unwrap();

    match engine.query(&ns("go"), "maps AND (slices") {
        Err(SearchError::QuerySyntax { position, .. }) => assert_eq!(position, 9),
        other => panic!("expected syntax error, got {:?}", other),
    }
    assert!(matches!(
        engine.query_many(&[], "\"unterminated"),
        Err(SearchError::QuerySyntax { .. })
    ));
}

#[test]
fn test_engine_sees_its_own_commits() {
    let (_dir, engine) = temp_engine();
    engine.index(&ns("go"), vec![make_doc("a", "before")]).unwrap();
    assert_eq!(report_keys(&engine.query(&ns("go"), "before").unwrap()), vec!["a"]);

    engine.index(&ns("go"), vec![make_doc("a", "after")]).unwrap();
    assert!(engine.query(&ns("go"), "before").unwrap().matches.is_empty());
    assert_eq!(report_keys(&engine.query(&ns("go"), "after").unwrap()), vec!["a"]);
}
