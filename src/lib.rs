//! 有界リングキューによるProducer-Consumerパイプライン
//!
//! 単一のアービトレータータスクがリングバッファを所有し、enqueue・dequeue・stopを
//! 直列化する。Producerは入力を読み切ると`stop`し、Consumerは排出完了が
//! 公開されるまで取り出しを続ける。

pub mod cli;
pub mod core;
pub mod engine;
pub mod logging;
pub mod queue;
pub mod services;

pub use crate::core::{
    DrainStrategy, PipelineConfig, PipelineError, PipelineReporter, PipelineResult, Record,
    RecordSink, RecordSource, RunSummary, SourceItem,
};
pub use engine::{process_file, process_with_settings, RecordPipeline};
pub use queue::{QueuePhase, QueueStatus, RingQueue};
pub use services::{
    ConsoleRecordSink, ConsoleReporter, DrainMode, JsonLinesSource, MemoryRecordSink,
    NoOpReporter, PipelineSettings,
};
