// レコード出力

pub mod implementations;

pub use implementations::{ConsoleRecordSink, MemoryRecordSink};
