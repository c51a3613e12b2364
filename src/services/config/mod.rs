// 設定管理
// 設定ファイルの探索・読み込み・検証

pub mod implementations;

pub use implementations::{DrainMode, PipelineSettings, CONFIG_BASENAME};
