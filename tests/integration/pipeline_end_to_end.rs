// エンドツーエンド統合テスト
#[path = "../fixtures/mod.rs"]
mod fixtures;

use fixtures::*;
use clap::Parser;
use record_ring::cli::{resolve_settings, Cli};
use record_ring::{
    process_file, DrainMode, JsonLinesSource, MemoryRecordSink, NoOpReporter, PipelineError,
    PipelineSettings, RecordPipeline,
};
use std::fs;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

const GUARD: Duration = Duration::from_secs(10);

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_file_through_pipeline_exactly_once() {
    let input = records(1000);
    let (_temp_dir, path) = write_records(&input);
    let settings = PipelineSettings::new(&path)
        .with_buffer_size(32)
        .with_num_readers(5);
    let sink = Arc::new(MemoryRecordSink::new());

    let summary = timeout(
        GUARD,
        process_file(&path, settings, Arc::clone(&sink), Arc::new(NoOpReporter::new())),
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(summary.records_enqueued, 1000);
    assert_eq!(summary.records_processed, 1000);
    assert_eq!(summary.workers.len(), 5);
    assert_eq!(
        summary.workers.iter().map(|w| w.processed).sum::<usize>(),
        1000
    );
    assert_eq!(as_set(sink.records()), as_set(input));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_malformed_lines_are_skipped() {
    let lines = vec![
        ndjson_line(&record(1)),
        "{\"datetime\": \"2024\", \"value\": ".to_string(),
        String::new(),
        r#"{"datetime": 1, "value": "2", "partition": "x"}"#.to_string(),
        r#"{"value": "only"}"#.to_string(),
        ndjson_line(&record(2)),
    ];
    let (_temp_dir, path) = write_ndjson(&lines);
    let sink = Arc::new(MemoryRecordSink::new());

    let mut reporter = MockPipelineReporter::new();
    reporter.expect_report_started().times(1).returning(|_, _| ());
    reporter
        .expect_report_skipped()
        .withf(|line, _| [2, 3, 4].contains(line))
        .times(3)
        .returning(|_, _| ());
    reporter
        .expect_report_worker_finished()
        .times(2)
        .returning(|_| ());
    reporter
        .expect_report_completed()
        .times(1)
        .returning(|_| ());

    let settings = PipelineSettings::new(&path)
        .with_buffer_size(2)
        .with_num_readers(2);
    let summary = timeout(
        GUARD,
        process_file(&path, settings, Arc::clone(&sink), Arc::new(reporter)),
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(summary.records_skipped, 3);
    assert_eq!(summary.records_processed, 3);
    let values: Vec<String> = sink
        .records()
        .iter()
        .map(|r| r.value().to_string())
        .collect();
    assert!(values.contains(&"only".to_string()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_sink_failures_do_not_strand_records() {
    let input = records(50);
    let (_temp_dir, path) = write_records(&input);
    let sink = Arc::new(RejectingSink::rejecting([3, 17, 42]));

    let settings = PipelineSettings::new(&path)
        .with_buffer_size(4)
        .with_num_readers(3)
        .with_drain_mode(DrainMode::Wait);
    let summary = timeout(
        GUARD,
        process_file(&path, settings, Arc::clone(&sink), Arc::new(NoOpReporter::new())),
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(summary.sink_failures, 3);
    assert_eq!(summary.records_processed, 47);
    assert_eq!(sink.accepted(), 47);
}

#[tokio::test]
async fn test_missing_input_file_is_fatal() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let path = temp_dir.path().join("nope.json");

    let result = process_file(
        &path,
        PipelineSettings::new(&path),
        Arc::new(MemoryRecordSink::new()),
        Arc::new(NoOpReporter::new()),
    )
    .await;

    match result {
        Err(error @ PipelineError::SourceOpenError { .. }) => {
            assert!(error.to_string().contains("nope.json"));
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_input_completes() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let path = temp_dir.path().join("empty.json");
    fs::write(&path, "").unwrap();
    let sink = Arc::new(MemoryRecordSink::new());

    let summary = timeout(
        GUARD,
        process_file(
            &path,
            PipelineSettings::new(&path).with_buffer_size(1).with_num_readers(4),
            Arc::clone(&sink),
            Arc::new(NoOpReporter::new()),
        ),
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(summary.records_enqueued, 0);
    assert_eq!(summary.records_processed, 0);
    assert_eq!(summary.workers.len(), 4);
}

#[tokio::test]
async fn test_in_memory_source_with_zero_poll_interval() {
    let text: String = records(64)
        .iter()
        .map(|r| ndjson_line(r) + "\n")
        .collect();
    let settings = PipelineSettings::new("in-memory")
        .with_buffer_size(3)
        .with_num_readers(2)
        .with_poll_interval_ms(0);
    let sink = Arc::new(MemoryRecordSink::new());

    let summary = timeout(
        GUARD,
        RecordPipeline::new(settings).execute(
            JsonLinesSource::from_reader(std::io::Cursor::new(text.into_bytes())),
            Arc::clone(&sink),
            Arc::new(NoOpReporter::new()),
        ),
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(summary.records_processed, 64);
    assert_eq!(as_set(sink.records()), as_set(records(64)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_cli_settings_drive_a_run() {
    let input = records(20);
    let (temp_dir, data_path) = write_records(&input);
    fs::write(
        temp_dir.path().join("config.json"),
        serde_json::json!({
            "buffer_size": 100,
            "json_filename": data_path,
            "num_readers": 1,
        })
        .to_string(),
    )
    .unwrap();

    let cli = Cli::try_parse_from(["record_ring", "--num-readers", "3", "--drain", "wait"]).unwrap();
    let settings = resolve_settings(&cli, temp_dir.path()).unwrap();
    assert_eq!(settings.num_readers, 3);

    let sink = Arc::new(MemoryRecordSink::new());
    let input_path = settings.json_filename.clone();
    let summary = timeout(
        GUARD,
        process_file(
            &input_path,
            settings,
            Arc::clone(&sink),
            Arc::new(NoOpReporter::new()),
        ),
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(summary.records_processed, 20);
    assert_eq!(as_set(sink.records()), as_set(input));
}
