// テストユーティリティ
// 統合テスト共通のレコード生成・入力ファイル作成・出力実装

#![allow(dead_code)]

use async_trait::async_trait;
use record_ring::{Record, RecordSink};
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

pub use record_ring::core::traits::{MockPipelineReporter, MockRecordSink, MockRecordSource};

/// 番号付きのテストレコード
pub fn record(n: usize) -> Record {
    Record::new(
        format!("2024-01-01T00:{:02}:{:02}", n / 60 % 60, n % 60),
        n.to_string(),
        format!("partition-{}", n % 5),
    )
}

pub fn records(count: usize) -> Vec<Record> {
    (0..count).map(record).collect()
}

/// 1行1レコードのJSON
pub fn ndjson_line(record: &Record) -> String {
    serde_json::json!({
        "datetime": record.datetime(),
        "value": record.value(),
        "partition": record.partition(),
    })
    .to_string()
}

/// 一時ディレクトリにNDJSONファイルを作成する
pub fn write_ndjson(lines: &[String]) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = temp_dir.path().join("records.json");
    let mut content = lines.join("\n");
    content.push('\n');
    fs::write(&path, content).expect("Failed to write records");
    (temp_dir, path)
}

pub fn write_records(records: &[Record]) -> (TempDir, PathBuf) {
    let lines: Vec<String> = records.iter().map(ndjson_line).collect();
    write_ndjson(&lines)
}

pub fn as_set(records: Vec<Record>) -> HashSet<Record> {
    records.into_iter().collect()
}

/// 指定した値のレコードだけ失敗する出力
#[derive(Default)]
pub struct RejectingSink {
    rejected_values: HashSet<String>,
    accepted: AtomicUsize,
}

impl RejectingSink {
    pub fn rejecting<I: IntoIterator<Item = usize>>(values: I) -> Self {
        Self {
            rejected_values: values.into_iter().map(|v| v.to_string()).collect(),
            accepted: AtomicUsize::new(0),
        }
    }

    pub fn accepted(&self) -> usize {
        self.accepted.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl RecordSink for RejectingSink {
    async fn consume(&self, _worker_id: usize, record: Record) -> anyhow::Result<()> {
        if self.rejected_values.contains(record.value()) {
            anyhow::bail!("rejected value {}", record.value());
        }
        self.accepted.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
