// パイプライン専用のカスタムエラー型定義

use thiserror::Error;

/// パイプライン固有のエラー型
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("設定エラー: {message}")]
    ConfigurationError { message: String },

    #[error("バリデーションエラー: {field} - {reason}")]
    ValidationError { field: String, reason: String },

    #[error("入力ファイルを開けません: {path} - {source}")]
    SourceOpenError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("入力読み込みエラー: {line}行目 - {source}")]
    SourceReadError {
        line: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("出力エラー: Reader {worker_id} - {source}")]
    SinkError {
        worker_id: usize,
        #[source]
        source: anyhow::Error,
    },

    #[error("タスクエラー: {source}")]
    TaskError {
        #[source]
        source: tokio::task::JoinError,
    },

    #[error("内部エラー: {source}")]
    InternalError {
        #[source]
        source: anyhow::Error,
    },
}

impl PipelineError {
    /// 設定エラーの作成
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
        }
    }

    /// バリデーションエラーの作成
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// 入力オープンエラーの作成
    pub fn source_open(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::SourceOpenError {
            path: path.into(),
            source,
        }
    }

    /// 入力読み込みエラーの作成
    pub fn source_read(line: usize, source: std::io::Error) -> Self {
        Self::SourceReadError { line, source }
    }

    /// 出力エラーの作成
    pub fn sink(worker_id: usize, source: anyhow::Error) -> Self {
        Self::SinkError { worker_id, source }
    }

    /// タスクエラーの作成
    pub fn task(source: tokio::task::JoinError) -> Self {
        Self::TaskError { source }
    }

    /// エラーの重要度を取得
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ConfigurationError { .. } | Self::ValidationError { .. } => ErrorSeverity::High,
            Self::SourceOpenError { .. } | Self::SourceReadError { .. } => ErrorSeverity::High,
            Self::SinkError { .. } => ErrorSeverity::Medium,
            Self::TaskError { .. } | Self::InternalError { .. } => ErrorSeverity::Critical,
        }
    }

    /// エラーが回復可能かどうかを判定
    ///
    /// 回復可能なエラーはレコード単位で報告され、処理は続行される。
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::SinkError { .. })
    }
}

/// エラーの重要度レベル
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// 中重要度 - 警告レベル
    Medium,
    /// 高重要度 - 要対応
    High,
    /// 致命的 - システム停止レベル
    Critical,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

/// パイプラインの結果型
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

impl From<anyhow::Error> for PipelineError {
    fn from(error: anyhow::Error) -> Self {
        PipelineError::InternalError { source: error }
    }
}

impl From<tokio::task::JoinError> for PipelineError {
    fn from(error: tokio::task::JoinError) -> Self {
        PipelineError::TaskError { source: error }
    }
}
