// 設定管理の具象実装

use crate::core::{DrainStrategy, PipelineConfig, PipelineError, PipelineResult};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 設定ファイルを探すときのファイル名（拡張子なし）
pub const CONFIG_BASENAME: &str = "config";

/// 対応する設定ファイル形式
const SUPPORTED_EXTENSIONS: &[&str] = &["json", "toml"];

/// ワーカーの排出モード（設定ファイル・CLI用の表現）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DrainMode {
    #[default]
    Poll,
    Wait,
}

/// パイプライン設定
///
/// `buffer_size`, `json_filename`, `num_readers`は必須。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PipelineSettings {
    pub buffer_size: usize,
    pub json_filename: PathBuf,
    pub num_readers: usize,
    #[serde(default)]
    pub drain: DrainMode,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_poll_interval_ms() -> u64 {
    1
}

impl PipelineSettings {
    pub fn new(json_filename: impl Into<PathBuf>) -> Self {
        Self {
            buffer_size: 100,
            json_filename: json_filename.into(),
            num_readers: num_cpus::get().max(1),
            drain: DrainMode::default(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub fn with_num_readers(mut self, num_readers: usize) -> Self {
        self.num_readers = num_readers;
        self
    }

    pub fn with_json_filename(mut self, json_filename: impl Into<PathBuf>) -> Self {
        self.json_filename = json_filename.into();
        self
    }

    pub fn with_drain_mode(mut self, drain: DrainMode) -> Self {
        self.drain = drain;
        self
    }

    pub fn with_poll_interval_ms(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// 拡張子から形式を判断して設定ファイルを読み込む
    pub fn load(path: &Path) -> PipelineResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::configuration(format!(
                "設定ファイルを読み込めません {}: {e}",
                path.display()
            ))
        })?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let settings: Self = match extension.as_deref() {
            Some("json") => serde_json::from_str(&content).map_err(|e| {
                PipelineError::configuration(format!(
                    "設定ファイルを解析できません {}: {e}",
                    path.display()
                ))
            })?,
            Some("toml") => toml::from_str(&content).map_err(|e| {
                PipelineError::configuration(format!(
                    "設定ファイルを解析できません {}: {e}",
                    path.display()
                ))
            })?,
            _ => {
                return Err(PipelineError::configuration(format!(
                    "未対応の設定ファイル形式です: {} (対応形式: {})",
                    path.display(),
                    SUPPORTED_EXTENSIONS.join(", ")
                )))
            }
        };

        settings.validate()?;
        Ok(settings)
    }

    /// `dir`内の`config.<ext>`を探す
    pub fn discover(dir: &Path) -> PipelineResult<PathBuf> {
        SUPPORTED_EXTENSIONS
            .iter()
            .map(|ext| dir.join(format!("{CONFIG_BASENAME}.{ext}")))
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| {
                PipelineError::configuration(format!(
                    "設定ファイルが見つかりません: {}/{CONFIG_BASENAME}.{{{}}}",
                    dir.display(),
                    SUPPORTED_EXTENSIONS.join(",")
                ))
            })
    }

    /// 設定値の妥当性をチェック
    pub fn validate(&self) -> PipelineResult<()> {
        if self.buffer_size == 0 {
            return Err(PipelineError::validation(
                "buffer_size",
                "1以上である必要があります",
            ));
        }
        if self.num_readers == 0 {
            return Err(PipelineError::validation(
                "num_readers",
                "1以上である必要があります",
            ));
        }
        if self.json_filename.as_os_str().is_empty() {
            return Err(PipelineError::validation(
                "json_filename",
                "入力ファイルを指定してください",
            ));
        }
        Ok(())
    }
}

impl PipelineConfig for PipelineSettings {
    fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    fn num_readers(&self) -> usize {
        self.num_readers
    }

    fn drain_strategy(&self) -> DrainStrategy {
        match self.drain {
            DrainMode::Poll => DrainStrategy::Poll {
                interval: Duration::from_millis(self.poll_interval_ms),
            },
            DrainMode::Wait => DrainStrategy::Wait,
        }
    }
}
