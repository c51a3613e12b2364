use crate::cli::Cli;
use crate::core::{PipelineError, RunSummary};
use crate::engine::process_with_settings;
use crate::services::{ConsoleReporter, PipelineSettings};
use anyhow::{Context, Result};
use std::path::Path;

/// 設定ファイルとCLIの上書き値から実行設定を組み立てる
///
/// `--config`が無ければ`dir`から設定ファイルを探す。見つからなくても
/// `--input`があれば既定値で実行する。
pub fn resolve_settings(cli: &Cli, dir: &Path) -> Result<PipelineSettings> {
    let mut settings = match (&cli.config, &cli.input) {
        (Some(path), _) => load_settings(path)?,
        (None, input) => match (PipelineSettings::discover(dir), input) {
            (Ok(path), _) => load_settings(&path)?,
            (Err(PipelineError::ConfigurationError { .. }), Some(input)) => {
                PipelineSettings::new(input)
            }
            (Err(error), _) => return Err(error.into()),
        },
    };

    if let Some(buffer_size) = cli.buffer_size {
        settings = settings.with_buffer_size(buffer_size);
    }
    if let Some(num_readers) = cli.num_readers {
        settings = settings.with_num_readers(num_readers);
    }
    if let Some(input) = &cli.input {
        settings = settings.with_json_filename(input);
    }
    if let Some(drain) = cli.drain {
        settings = settings.with_drain_mode(drain);
    }
    if let Some(poll_interval_ms) = cli.poll_interval_ms {
        settings = settings.with_poll_interval_ms(poll_interval_ms);
    }

    settings.validate()?;
    Ok(settings)
}

fn load_settings(path: &Path) -> Result<PipelineSettings> {
    PipelineSettings::load(path)
        .with_context(|| format!("設定ファイルの読み込みに失敗しました: {}", path.display()))
}

/// パイプラインを実行し、レコードを標準出力へ書き出す
pub async fn execute_run(cli: &Cli) -> Result<RunSummary> {
    let cwd = std::env::current_dir().context("カレントディレクトリを取得できません")?;
    let settings = resolve_settings(cli, &cwd)?;
    tracing::info!(?settings, "resolved settings");

    let reporter = if cli.quiet {
        ConsoleReporter::quiet()
    } else {
        ConsoleReporter::new()
    };

    let summary = process_with_settings(&settings, reporter)
        .await
        .with_context(|| format!("処理に失敗しました: {}", settings.json_filename.display()))?;
    Ok(summary)
}
