// レコード出力の具象実装

use crate::core::{Record, RecordSink};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::io::Write;
use std::sync::{Arc, Mutex};

/// 標準出力に`Reader <id>: {..}`形式で1行ずつ書き出す
#[derive(Debug, Default, Clone)]
pub struct ConsoleRecordSink;

impl ConsoleRecordSink {
    pub fn new() -> Self {
        Self
    }

    /// 1レコード分の出力行
    pub fn format_line(worker_id: usize, record: &Record) -> String {
        format!("Reader {worker_id}: {record}")
    }
}

#[async_trait]
impl RecordSink for ConsoleRecordSink {
    async fn consume(&self, worker_id: usize, record: Record) -> Result<()> {
        let line = Self::format_line(worker_id, &record);
        // 行単位でロックするので、ワーカー間で行が混ざることはない
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{line}").context("標準出力への書き込みに失敗しました")
    }
}

/// メモリ内に保持する出力実装（テスト用および組み込み用）
#[derive(Debug, Default, Clone)]
pub struct MemoryRecordSink {
    consumed: Arc<Mutex<Vec<(usize, Record)>>>,
}

impl MemoryRecordSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// 消費された順の`(worker_id, record)`一覧
    pub fn consumed(&self) -> Vec<(usize, Record)> {
        self.consumed
            .lock()
            .map(|guard| guard.to_vec())
            .unwrap_or_default()
    }

    /// レコードのみ（消費順）
    pub fn records(&self) -> Vec<Record> {
        self.consumed().into_iter().map(|(_, record)| record).collect()
    }

    pub fn consumed_count(&self) -> usize {
        self.consumed.lock().map(|guard| guard.len()).unwrap_or(0)
    }
}

#[async_trait]
impl RecordSink for MemoryRecordSink {
    async fn consume(&self, worker_id: usize, record: Record) -> Result<()> {
        self.consumed
            .lock()
            .map_err(|e| anyhow::anyhow!("sink lock poisoned: {e}"))?
            .push((worker_id, record));
        Ok(())
    }
}
