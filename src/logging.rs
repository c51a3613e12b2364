// ログ初期化
// 標準出力はレコード専用なので、診断ログは標準エラーへ出す

use tracing_subscriber::EnvFilter;

/// `-v`の回数に対応する既定のログレベル
pub fn default_level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// グローバルなtracing subscriberを登録する
///
/// `RUST_LOG`が設定されていればそちらを優先する。
pub fn init_logging(verbosity: u8) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbosity)));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("ログの初期化に失敗しました: {e}"))
}
