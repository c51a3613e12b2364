// Pipeline - Producer-Consumer パイプライン
// リングキュー・Producer・Consumerプールのオーケストレーション

use super::{consumer::spawn_consumers, producer::spawn_producer};
use crate::core::{
    PipelineConfig, PipelineError, PipelineReporter, PipelineResult, Record, RecordSink,
    RecordSource, RunSummary,
};
use crate::queue::RingQueue;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// 設定を保持し、1回の実行ごとにキューとワーカーを構築するパイプライン
pub struct RecordPipeline<C> {
    config: C,
}

impl<C: PipelineConfig> RecordPipeline<C> {
    pub fn new(config: C) -> Self {
        Self { config }
    }

    /// ソースを読み切り、全ワーカーが排出完了するまで実行する
    ///
    /// Producerが読み込みエラーで止まった場合も、投入済みレコードを
    /// 全て排出してからそのエラーを返す。
    pub async fn execute<S, K, R>(
        &self,
        source: S,
        sink: Arc<K>,
        reporter: Arc<R>,
    ) -> PipelineResult<RunSummary>
    where
        S: RecordSource + 'static,
        K: RecordSink + 'static,
        R: PipelineReporter + 'static,
    {
        let buffer_size = self.config.buffer_size();
        let num_readers = self.config.num_readers();
        if num_readers == 0 {
            return Err(PipelineError::validation(
                "num_readers",
                "1以上である必要があります",
            ));
        }

        let start_time = Instant::now();
        let queue: Arc<RingQueue<Record>> = Arc::new(RingQueue::new(buffer_size)?);
        reporter.report_started(buffer_size, num_readers).await;
        info!(buffer_size, num_readers, "pipeline started");

        // Consumer Pool起動
        let consumer_handles = spawn_consumers(
            Arc::clone(&queue),
            sink,
            Arc::clone(&reporter),
            self.config.drain_strategy(),
            num_readers,
        );

        // Producer起動
        let producer_handle = spawn_producer(source, Arc::clone(&queue), Arc::clone(&reporter));

        // Producerがpanicした場合stopされないので、ここで止める
        let producer_outcome = match producer_handle.await {
            Ok(outcome) => outcome,
            Err(join_error) => {
                queue.stop();
                Err(PipelineError::task(join_error))
            }
        };

        // Consumer完了を待機。panicしたワーカーがあっても全ハンドルをjoinしてから判断する
        let mut workers = Vec::with_capacity(num_readers);
        let mut worker_failure = None;
        for handle in consumer_handles {
            match handle.await {
                Ok(report) => workers.push(report),
                Err(join_error) => {
                    warn!(error = %join_error, "worker task failed");
                    worker_failure.get_or_insert(join_error);
                }
            }
        }
        debug!(status = ?queue.status(), "all workers joined");

        // Producer側のエラーを優先して返す
        let producer_report = producer_outcome?;
        if let Some(join_error) = worker_failure {
            return Err(PipelineError::task(join_error));
        }

        let summary =
            RunSummary::from_reports(producer_report, workers, start_time.elapsed());
        reporter.report_completed(&summary).await;

        Ok(summary)
    }
}
