// エンジン層 - 並列処理とオーケストレーション
// キューとサービス層を組み合わせて高レベルな処理を提供

pub mod api;
pub mod consumer;
mod pipeline;
pub mod producer;

pub use api::{process_file, process_with_settings};
pub use pipeline::RecordPipeline;
