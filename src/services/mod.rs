// サービス層 - パイプラインの周辺機能
// 設定・入力・出力・報告をそれぞれ独立に提供する

pub mod config;
pub mod monitoring;
pub mod sink;
pub mod source;

pub use config::{DrainMode, PipelineSettings};
pub use monitoring::{ConsoleReporter, NoOpReporter};
pub use sink::{ConsoleRecordSink, MemoryRecordSink};
pub use source::JsonLinesSource;
