// Consumer - 並列ワーカー機能

use crate::core::{
    DrainStrategy, PipelineError, PipelineReporter, Record, RecordSink, WorkerReport,
};
use crate::queue::RingQueue;
use std::sync::Arc;
use tracing::{debug, warn};

/// 単一Consumerワーカー
///
/// 取り出しが`None`でも即座には終了しない。キューが排出完了を公開して
/// 初めて終了する。
pub fn spawn_single_consumer<S, R>(
    worker_id: usize,
    queue: Arc<RingQueue<Record>>,
    sink: Arc<S>,
    reporter: Arc<R>,
    strategy: DrainStrategy,
) -> tokio::task::JoinHandle<WorkerReport>
where
    S: RecordSink + 'static,
    R: PipelineReporter + 'static,
{
    tokio::spawn(async move {
        let mut report = WorkerReport {
            worker_id,
            ..WorkerReport::default()
        };

        loop {
            let next = match strategy {
                DrainStrategy::Poll { .. } => queue.try_dequeue().await,
                DrainStrategy::Wait => queue.dequeue().await,
            };

            match next {
                Some(record) => match sink.consume(worker_id, record).await {
                    Ok(()) => report.processed += 1,
                    Err(source) => {
                        // 出力の失敗で排出を止めるとレコードが取り残される
                        let error = PipelineError::sink(worker_id, source);
                        report.sink_failures += 1;
                        warn!(worker_id, severity = error.severity().as_str(), "{error}");
                        reporter
                            .report_sink_error(worker_id, &error.to_string())
                            .await;
                    }
                },
                None if queue.is_drained() => break,
                None => match strategy {
                    DrainStrategy::Poll { interval } if interval.is_zero() => {
                        tokio::task::yield_now().await
                    }
                    DrainStrategy::Poll { interval } => tokio::time::sleep(interval).await,
                    // dequeueは排出完了まで待つので、ここに来るのはアービトレーター消滅時のみ
                    DrainStrategy::Wait => break,
                },
            }
        }

        debug!(worker_id, processed = report.processed, "worker exiting");
        reporter.report_worker_finished(&report).await;
        report
    })
}

/// Consumers: 並列ワーカープール
///
/// 返されたハンドルを全てjoinするまで実行は完了しない。
pub fn spawn_consumers<S, R>(
    queue: Arc<RingQueue<Record>>,
    sink: Arc<S>,
    reporter: Arc<R>,
    strategy: DrainStrategy,
    worker_count: usize,
) -> Vec<tokio::task::JoinHandle<WorkerReport>>
where
    S: RecordSink + 'static,
    R: PipelineReporter + 'static,
{
    (0..worker_count)
        .map(|worker_id| {
            spawn_single_consumer(
                worker_id,
                Arc::clone(&queue),
                Arc::clone(&sink),
                Arc::clone(&reporter),
                strategy,
            )
        })
        .collect()
}
