use crate::services::DrainMode;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "record_ring")]
#[command(about = "Feed NDJSON records through a bounded ring queue to a pool of readers")]
#[command(version)]
pub struct Cli {
    /// Configuration file (json or toml). Defaults to ./config.json or ./config.toml
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Ring queue capacity
    #[arg(long)]
    pub buffer_size: Option<usize>,

    /// Number of concurrent readers
    #[arg(long)]
    pub num_readers: Option<usize>,

    /// NDJSON input file
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// How readers drain the queue
    #[arg(long, value_enum)]
    pub drain: Option<DrainMode>,

    /// Poll backoff in milliseconds when the queue is empty (0 = yield only)
    #[arg(long)]
    pub poll_interval_ms: Option<u64>,

    /// Suppress progress messages (records are still printed)
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
