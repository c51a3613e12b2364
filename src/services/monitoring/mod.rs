// 実行状況の監視
// 開始・スキップ・出力エラー・完了の報告

pub mod implementations;

pub use implementations::{ConsoleReporter, NoOpReporter};
