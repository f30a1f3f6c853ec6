//! 型定義モジュール
//!
//! アプリケーション全体で使用される共通的な型定義を管理します。
//! - 設定: 環境変数・drip.yamlから読み込む実行時設定とそのエラー
//! - インフラエラー: ファイル操作・シリアライゼーションのエラー

pub mod config;
pub mod infra;

// 便利な再エクスポート
pub use config::{ConfigError, ConfigResult, DripConfig, DripSettings};
pub use infra::{InfraError, InfraResult};
