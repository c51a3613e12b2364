use anyhow::Result;
use clap::Parser;
use record_ring::cli::{execute_run, Cli};
use record_ring::logging::init_logging;

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let summary = execute_run(&cli).await?;
    if summary.sink_failures > 0 {
        tracing::warn!(
            sink_failures = summary.sink_failures,
            "some records could not be emitted"
        );
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("❌ エラー: {error:#}");
        std::process::exit(1);
    }
}
