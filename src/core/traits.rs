// パイプラインのトレイト定義
// 設定・入力・出力・報告の抽象化インターフェース

use super::error::PipelineResult;
use super::types::{DrainStrategy, Record, RunSummary, SourceItem, WorkerReport};
use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

/// パイプラインの設定を抽象化するトレイト
#[automock]
pub trait PipelineConfig: Send + Sync {
    /// リングキューの容量
    fn buffer_size(&self) -> usize;

    /// Consumerワーカー数
    fn num_readers(&self) -> usize;

    /// ワーカーの排出方法
    fn drain_strategy(&self) -> DrainStrategy;
}

/// レコード入力の抽象化トレイト
///
/// 有限かつ再開不可能なシーケンス。`End`を返した後の呼び出しは想定しない。
#[automock]
#[async_trait]
pub trait RecordSource: Send {
    /// 次の1件を取得。致命的な読み込み失敗のみ`Err`になる
    async fn next_item(&mut self) -> PipelineResult<SourceItem>;
}

/// レコード出力の抽象化トレイト
#[automock]
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// ワーカーが取り出したレコードを消費する
    async fn consume(&self, worker_id: usize, record: Record) -> Result<()>;
}

/// 実行状況の報告トレイト
#[automock]
#[async_trait]
pub trait PipelineReporter: Send + Sync {
    /// 実行開始時の報告
    async fn report_started(&self, buffer_size: usize, num_readers: usize);

    /// 不正な行をスキップした際の報告
    async fn report_skipped(&self, line: usize, reason: &str);

    /// 出力に失敗した際の報告
    async fn report_sink_error(&self, worker_id: usize, error: &str);

    /// ワーカー終了時の報告
    async fn report_worker_finished(&self, report: &WorkerReport);

    /// 実行完了時の報告
    async fn report_completed(&self, summary: &RunSummary);
}
