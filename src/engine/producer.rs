// Producer - レコード投入機能

use crate::core::{
    PipelineReporter, PipelineResult, ProducerReport, Record, RecordSource, SourceItem,
};
use crate::queue::RingQueue;
use std::sync::Arc;

/// Producer: ソースを読み切るまでキューへ投入し、最後に必ず`stop`する
///
/// 不正な行は報告してスキップする。読み込み失敗時も`stop`してからエラーを返す。
pub fn spawn_producer<S, R>(
    mut source: S,
    queue: Arc<RingQueue<Record>>,
    reporter: Arc<R>,
) -> tokio::task::JoinHandle<PipelineResult<ProducerReport>>
where
    S: RecordSource + 'static,
    R: PipelineReporter + 'static,
{
    tokio::spawn(async move {
        let mut report = ProducerReport::default();

        let outcome = loop {
            match source.next_item().await {
                Ok(SourceItem::Record(record)) => {
                    queue.enqueue(record).await;
                    report.records_enqueued += 1;
                }
                Ok(SourceItem::Malformed { line, reason }) => {
                    report.records_skipped += 1;
                    reporter.report_skipped(line, &reason).await;
                }
                Ok(SourceItem::End) => break Ok(report),
                Err(error) => break Err(error),
            }
        };

        // 入力終端またはエラー。これ以上投入しない
        queue.stop();
        outcome
    })
}
