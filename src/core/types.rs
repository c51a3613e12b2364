// パイプラインを流れるデータ型定義

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// 1行のJSONから得られるレコード
///
/// 構築後は不変。キューへの投入・取り出しで所有権ごと移動する。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    #[serde(default)]
    datetime: String,
    #[serde(default)]
    value: String,
    #[serde(default)]
    partition: String,
}

impl Record {
    pub fn new(
        datetime: impl Into<String>,
        value: impl Into<String>,
        partition: impl Into<String>,
    ) -> Self {
        Self {
            datetime: datetime.into(),
            value: value.into(),
            partition: partition.into(),
        }
    }

    pub fn datetime(&self) -> &str {
        &self.datetime
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn partition(&self) -> &str {
        &self.partition
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{Datetime:{} Value:{} Partition:{}}}",
            self.datetime, self.value, self.partition
        )
    }
}

/// レコードソースが返す1件分の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceItem {
    /// パース済みのレコード
    Record(Record),
    /// パースできなかった行（スキップして続行）
    Malformed { line: usize, reason: String },
    /// 入力終端
    End,
}

/// ワーカーがキューを空にする方法
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainStrategy {
    /// `try_dequeue`でポーリングし、空なら`interval`だけ待つ（ゼロならyieldのみ）
    Poll { interval: Duration },
    /// `dequeue`でレコード到着か排出完了まで待機する
    Wait,
}

impl Default for DrainStrategy {
    fn default() -> Self {
        Self::Poll {
            interval: Duration::from_millis(1),
        }
    }
}

/// Producerの集計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProducerReport {
    pub records_enqueued: usize,
    pub records_skipped: usize,
}

/// ワーカー1つ分の集計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerReport {
    pub worker_id: usize,
    pub processed: usize,
    pub sink_failures: usize,
}

/// 実行全体のサマリー
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub records_enqueued: usize,
    pub records_skipped: usize,
    pub records_processed: usize,
    pub sink_failures: usize,
    pub workers: Vec<WorkerReport>,
    pub elapsed_ms: u64,
}

impl RunSummary {
    /// 経過時間はミリ秒に丸め、`u64`に収まらない場合は`u64::MAX`とする
    pub fn from_reports(
        producer: ProducerReport,
        workers: Vec<WorkerReport>,
        elapsed: Duration,
    ) -> Self {
        Self {
            records_enqueued: producer.records_enqueued,
            records_skipped: producer.records_skipped,
            records_processed: workers.iter().map(|w| w.processed).sum(),
            sink_failures: workers.iter().map(|w| w.sink_failures).sum(),
            workers,
            elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        }
    }
}
