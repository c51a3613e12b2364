//! 有界リングキュー
//!
//! キューの可変状態（配列・head・tail・件数・停止フラグ）はすべて
//! アービトレーターが単独で所有する。Producer/Consumerは`RingQueue`ハンドル
//! 経由で要求を送るだけで、内部状態に直接触れることはない。
//!
//! - `ring`: 件数で空/満杯を区別する循環ストレージ
//! - `arbitrator`: 要求を1タスクで直列化するイベントループ
//! - `handle`: 公開API（enqueue / try_dequeue / dequeue / stop）
//!
//! 排出完了（停止済みかつ空）は`watch`チャンネルで一度だけ公開され、
//! 全ワーカーはこれを見て独立に終了を判断する。

mod arbitrator;
mod handle;
pub mod ring;

pub use arbitrator::{QueuePhase, QueueStatus};
pub use handle::RingQueue;
pub use ring::RingBuffer;
