// 実行状況報告の具象実装

use crate::core::{PipelineReporter, RunSummary, WorkerReport};
use async_trait::async_trait;

/// 標準エラー出力による報告実装
///
/// レコード本体は標準出力に出るため、報告はすべて標準エラー側に出す。
/// スキップ行とエラーはquietでも表示する。
#[derive(Debug, Default, Clone)]
pub struct ConsoleReporter {
    quiet: bool,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quiet() -> Self {
        Self { quiet: true }
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }
}

#[async_trait]
impl PipelineReporter for ConsoleReporter {
    async fn report_started(&self, buffer_size: usize, num_readers: usize) {
        if !self.quiet {
            eprintln!("🚀 Starting: buffer_size={buffer_size}, num_readers={num_readers}");
        }
    }

    async fn report_skipped(&self, line: usize, reason: &str) {
        eprintln!("⚠️  Skipping line {line}: {reason}");
    }

    async fn report_sink_error(&self, _worker_id: usize, error: &str) {
        // メッセージ自体にReader番号が含まれる
        eprintln!("❌ {error}");
    }

    async fn report_worker_finished(&self, report: &WorkerReport) {
        tracing::debug!(
            worker_id = report.worker_id,
            processed = report.processed,
            sink_failures = report.sink_failures,
            "worker finished"
        );
    }

    async fn report_completed(&self, summary: &RunSummary) {
        if !self.quiet {
            eprintln!(
                "✅ Completed! Enqueued: {}, Processed: {}, Skipped: {}, Sink errors: {} ({} ms)",
                summary.records_enqueued,
                summary.records_processed,
                summary.records_skipped,
                summary.sink_failures,
                summary.elapsed_ms
            );
        }
    }
}

/// 何もしない報告実装（テスト・組み込み用）
#[derive(Debug, Default, Clone)]
pub struct NoOpReporter;

impl NoOpReporter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PipelineReporter for NoOpReporter {
    async fn report_started(&self, _buffer_size: usize, _num_readers: usize) {}

    async fn report_skipped(&self, _line: usize, _reason: &str) {}

    async fn report_sink_error(&self, _worker_id: usize, _error: &str) {}

    async fn report_worker_finished(&self, _report: &WorkerReport) {}

    async fn report_completed(&self, _summary: &RunSummary) {}
}
