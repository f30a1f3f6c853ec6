use anyhow::Context;
use chrono::Utc;
use dripfeed::{app::workflow::execute_release_workflow, types::DripConfig};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // 環境変数を読み込み（.envファイルがあれば使用）
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = DripConfig::from_env().context("設定の読み込みに失敗")?;

    execute_release_workflow(&config, &Utc::now()).context("フィード公開ワークフローが失敗しました")?;

    Ok(())
}
