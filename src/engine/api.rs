// 高レベル公開API
// RecordPipelineを簡単に使用できるようにするための便利な関数

use super::RecordPipeline;
use crate::core::{PipelineConfig, PipelineReporter, PipelineResult, RecordSink, RunSummary};
use crate::services::{ConsoleRecordSink, ConsoleReporter, JsonLinesSource, PipelineSettings};
use std::path::Path;
use std::sync::Arc;

/// NDJSONファイルを開いてパイプラインで処理する
///
/// ファイルを開けない場合はワーカーを起動せずにエラーを返す。
pub async fn process_file<C, K, R>(
    path: &Path,
    config: C,
    sink: Arc<K>,
    reporter: Arc<R>,
) -> PipelineResult<RunSummary>
where
    C: PipelineConfig,
    K: RecordSink + 'static,
    R: PipelineReporter + 'static,
{
    let source = JsonLinesSource::open(path).await?;
    RecordPipeline::new(config)
        .execute(source, sink, reporter)
        .await
}

/// 設定に従い、標準出力へレコードを出力する標準構成で実行
pub async fn process_with_settings(
    settings: &PipelineSettings,
    reporter: ConsoleReporter,
) -> PipelineResult<RunSummary> {
    settings.validate()?;
    process_file(
        &settings.json_filename,
        settings.clone(),
        Arc::new(ConsoleRecordSink::new()),
        Arc::new(reporter),
    )
    .await
}
