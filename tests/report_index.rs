use std::fs;
use std::time::Duration;

use realm_index::config::ReportConfig;
use realm_index::contract::MockSummarizer;
use realm_index::error::SummarizeError;
use realm_index::preprocess::{add_to_bundle, BundleMap, ROOT_KEY};
use realm_index::report::{header, write_index, IndexRecord, FALLBACK_DESCRIPTION};
use tempfile::tempdir;

fn report_config(dir: &std::path::Path, delay_ms: u64) -> ReportConfig {
    ReportConfig {
        artifacts_dir: dir.to_path_buf(),
        delay_ms,
        ..ReportConfig::default()
    }
}

/// Lines after the two-rule header.
fn body_lines(index: &str) -> Vec<String> {
    index.lines().skip(6).map(str::to_string).collect()
}

#[test]
fn test_index_record_line_formats() {
    let ok = IndexRecord {
        safe_filename: "demo_boards".to_string(),
        summary: Some("A message board".to_string()),
    };
    assert_eq!(ok.to_line(), "demo_boards | A message board;");

    let failed = IndexRecord {
        safe_filename: "demo_boards".to_string(),
        summary: None,
    };
    assert_eq!(failed.to_line(), "demo_boards | Error extracting keywords");
    assert!(!failed.to_line().ends_with(';'));
}

#[test]
fn test_header_layout() {
    let config = ReportConfig::default();
    let text = header(&config, ".gno", 3);
    let lines: Vec<&str> = text.lines().collect();
    let rule = "-".repeat(80);

    assert_eq!(
        lines,
        vec![
            "Found 3 .gno files from Gno documentation",
            "Source: https://gno.land/r",
            rule.as_str(),
            "",
            "File Name | Description",
            rule.as_str(),
        ]
    );
}

#[tokio::test]
async fn test_write_index_sorts_and_falls_back_on_failure() {
    let tmp = tempdir().unwrap();
    let config = report_config(tmp.path(), 0);

    let mut bundles = BundleMap::new();
    add_to_bundle(&mut bundles, "demo/users", "package users");
    add_to_bundle(&mut bundles, "demo/boards", "package boards");
    add_to_bundle(&mut bundles, ROOT_KEY, "package root");

    let mut summarizer = MockSummarizer::new();
    summarizer
        .expect_summarize()
        .times(3)
        .returning(|_instruction: &str, content: &str| {
            if content == "package users" {
                Err(SummarizeError::EmptyResponse)
            } else {
                Ok(format!("About {content}"))
            }
        });

    let report = write_index(&bundles, &config, ".gno", "be concise", &summarizer)
        .await
        .expect("index should be written");

    assert!(report.output_dir.starts_with(tmp.path()));
    let dir_name = report.output_dir.file_name().unwrap().to_string_lossy().into_owned();
    assert!(dir_name.starts_with("gno_docs_"), "got {dir_name}");
    assert_eq!(dir_name.len(), "gno_docs_".len() + "YYYYMMDD-HHMMSS".len());
    assert_eq!(
        report.index_path.file_name().unwrap().to_string_lossy(),
        "realms_index.txt"
    );

    let index = fs::read_to_string(&report.index_path).unwrap();
    assert!(index.starts_with("Found 3 .gno files from Gno documentation\n"));
    assert_eq!(
        body_lines(&index),
        vec![
            "demo_boards | About package boards;".to_string(),
            format!("demo_users | {FALLBACK_DESCRIPTION}"),
            ". | About package root;".to_string(),
        ]
    );
    assert_eq!(report.summarized(), 2);
    assert_eq!(report.failed(), 1);

    let entries: Vec<_> = fs::read_dir(&report.output_dir).unwrap().collect();
    assert_eq!(entries.len(), 1, "the output directory holds only the index");
}

#[tokio::test]
async fn test_write_index_passes_instruction_as_system_directive() {
    let tmp = tempdir().unwrap();
    let config = report_config(tmp.path(), 0);

    let mut bundles = BundleMap::new();
    add_to_bundle(&mut bundles, "foo", "package foo");

    let mut summarizer = MockSummarizer::new();
    summarizer
        .expect_summarize()
        .withf(|instruction: &str, content: &str| {
            instruction == "Do not use ; or | characters!" && content == "package foo"
        })
        .times(1)
        .returning(|_, _| Ok("ok".to_string()));

    write_index(
        &bundles,
        &config,
        ".gno",
        "Do not use ; or | characters!",
        &summarizer,
    )
    .await
    .unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_pause_follows_only_successful_summaries() {
    let tmp = tempdir().unwrap();
    let config = report_config(tmp.path(), 500);

    let mut bundles = BundleMap::new();
    add_to_bundle(&mut bundles, "a", "ok");
    add_to_bundle(&mut bundles, "b", "fail");
    add_to_bundle(&mut bundles, "c", "fail");

    let mut summarizer = MockSummarizer::new();
    summarizer
        .expect_summarize()
        .times(3)
        .returning(|_instruction: &str, content: &str| {
            if content == "ok" {
                Ok("fine".to_string())
            } else {
                Err(SummarizeError::Status {
                    status: 429,
                    body: "rate limited".to_string(),
                })
            }
        });

    let started = tokio::time::Instant::now();
    let report = write_index(&bundles, &config, ".gno", "x", &summarizer)
        .await
        .unwrap();

    assert_eq!(report.summarized(), 1);
    assert_eq!(started.elapsed(), Duration::from_millis(500));
}
