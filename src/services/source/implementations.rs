// レコード入力の具象実装

use crate::core::{PipelineError, PipelineResult, Record, RecordSource, SourceItem};
use async_trait::async_trait;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};

/// 1行1JSONオブジェクト形式の入力
pub struct JsonLinesSource<R> {
    lines: Lines<R>,
    line: usize,
}

impl JsonLinesSource<BufReader<File>> {
    /// 入力ファイルを開く。開けない場合は致命的エラー
    pub async fn open(path: &Path) -> PipelineResult<Self> {
        let file = File::open(path)
            .await
            .map_err(|e| PipelineError::source_open(path.display().to_string(), e))?;
        Ok(Self::from_reader(BufReader::new(file)))
    }
}

impl<R: AsyncBufRead + Unpin> JsonLinesSource<R> {
    pub fn from_reader(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line: 0,
        }
    }

    /// 直前に読んだ行番号（1始まり）
    pub fn line(&self) -> usize {
        self.line
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> RecordSource for JsonLinesSource<R> {
    async fn next_item(&mut self) -> PipelineResult<SourceItem> {
        let next = self
            .lines
            .next_line()
            .await
            .map_err(|e| PipelineError::source_read(self.line + 1, e))?;

        let Some(text) = next else {
            return Ok(SourceItem::End);
        };
        self.line += 1;

        Ok(match serde_json::from_str::<Record>(&text) {
            Ok(record) => SourceItem::Record(record),
            Err(e) => SourceItem::Malformed {
                line: self.line,
                reason: e.to_string(),
            },
        })
    }
}
