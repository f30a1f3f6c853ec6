use chrono::{NaiveTime, Weekday};
use chrono_tz::Tz;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 設定関連のエラー型
/// 環境変数、設定ファイル、設定値の検証など設定に関するエラーを定義
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 設定値が不正
    #[error("設定値が不正です: {reason}")]
    InvalidValue { reason: String },

    /// 設定ファイルが見つからない
    #[error("設定ファイルが見つかりません: {path}")]
    MissingConfigFile { path: String },

    /// 設定ファイルの読み込みに失敗（存在しない場合を除く）
    #[error("設定ファイルを読み込めません: {path} - {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// 設定ファイルの解析に失敗
    #[error("設定ファイルの解析に失敗しました: {path} - {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

impl ConfigError {
    /// 不正な設定値エラーを作成
    pub fn invalid_value<R: Into<String>>(reason: R) -> Self {
        Self::InvalidValue {
            reason: reason.into(),
        }
    }

    /// 設定ファイル不足エラーを作成
    pub fn missing_config_file<P: Into<String>>(path: P) -> Self {
        Self::MissingConfigFile { path: path.into() }
    }
}

/// 設定エラーのResult型エイリアス
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

pub const ENV_ROOT: &str = "DRIP_ROOT";
pub const ENV_CONFIG: &str = "DRIP_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "drip.yaml";

pub const DEFAULT_TIMEZONE: &str = "Europe/Stockholm";
pub const DEFAULT_RELEASE_WEEKDAY: &str = "Sun";
pub const DEFAULT_RELEASE_TIME: &str = "02:00";
pub const DEFAULT_MARKER: &str = "<!-- AUTO_EPISODES_INSERT_HERE -->";
pub const DEFAULT_MARKER_INDENT: &str = "  ";

/// drip.yamlの構造に対応する型
/// すべての項目は省略可能で、省略時はデフォルト値を使う
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DripSettings {
    pub base_path: PathBuf,
    pub feed_path: PathBuf,
    pub state_path: PathBuf,
    pub episodes_dir: PathBuf,
    pub timezone: String,
    pub release_weekday: String,
    pub release_time: String,
    pub marker: String,
    pub marker_indent: String,
}

impl Default for DripSettings {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("feed_base.xml"),
            feed_path: PathBuf::from("feed.xml"),
            state_path: PathBuf::from("state.json"),
            episodes_dir: PathBuf::from("episodes"),
            timezone: DEFAULT_TIMEZONE.to_string(),
            release_weekday: DEFAULT_RELEASE_WEEKDAY.to_string(),
            release_time: DEFAULT_RELEASE_TIME.to_string(),
            marker: DEFAULT_MARKER.to_string(),
            marker_indent: DEFAULT_MARKER_INDENT.to_string(),
        }
    }
}

/// 検証済みの実行時設定
#[derive(Debug, Clone)]
pub struct DripConfig {
    pub root: PathBuf,
    pub base_path: PathBuf,
    pub feed_path: PathBuf,
    pub state_path: PathBuf,
    pub episodes_dir: PathBuf,
    pub timezone: Tz,
    pub release_weekday: Weekday,
    pub release_time: NaiveTime,
    pub marker: String,
    pub marker_indent: String,
}

impl DripConfig {
    /// デフォルト設定でルートディレクトリを指定して作成
    pub fn with_root<P: Into<PathBuf>>(root: P) -> ConfigResult<Self> {
        Self::from_settings(root, DripSettings::default())
    }

    /// 環境変数と設定ファイルから設定を読み込む
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_sources(std::env::var(ENV_ROOT).ok(), std::env::var(ENV_CONFIG).ok())
    }

    /// ルートと設定ファイルの指定から設定を読み込む
    ///
    /// 1. `root` があればルートとして使い、なければカレントディレクトリ
    /// 2. `config` で指定されたYAMLファイル（指定時は必須、相対パスはルート基準）
    /// 3. 未指定なら `<root>/drip.yaml` が存在する場合のみ読み込む
    pub fn from_sources(root: Option<String>, config: Option<String>) -> ConfigResult<Self> {
        let root = match root {
            Some(root) if !root.trim().is_empty() => PathBuf::from(root),
            _ => std::env::current_dir().map_err(|e| {
                ConfigError::invalid_value(format!("カレントディレクトリを取得できません: {}", e))
            })?,
        };

        let settings = match config {
            Some(path) if !path.trim().is_empty() => load_settings(&resolve(&root, Path::new(&path)))?,
            _ => {
                let path = root.join(DEFAULT_CONFIG_FILE);
                if path.is_file() {
                    load_settings(&path)?
                } else {
                    DripSettings::default()
                }
            }
        };

        Self::from_settings(root, settings)
    }

    /// 設定値を検証して実行時設定に変換する
    pub fn from_settings<P: Into<PathBuf>>(root: P, settings: DripSettings) -> ConfigResult<Self> {
        let root = root.into();

        let timezone: Tz = settings.timezone.parse().map_err(|_| {
            ConfigError::invalid_value(format!("不明なタイムゾーン: {}", settings.timezone))
        })?;
        let release_weekday: Weekday = settings.release_weekday.parse().map_err(|_| {
            ConfigError::invalid_value(format!("不正な曜日: {}", settings.release_weekday))
        })?;
        let release_time = parse_release_time(&settings.release_time)?;

        if settings.marker.trim().is_empty() {
            return Err(ConfigError::invalid_value("マーカーが空です"));
        }

        Ok(Self {
            base_path: resolve(&root, &settings.base_path),
            feed_path: resolve(&root, &settings.feed_path),
            state_path: resolve(&root, &settings.state_path),
            episodes_dir: resolve(&root, &settings.episodes_dir),
            root,
            timezone,
            release_weekday,
            release_time,
            marker: settings.marker,
            marker_indent: settings.marker_indent,
        })
    }
}

fn load_settings(path: &Path) -> ConfigResult<DripSettings> {
    let text = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ConfigError::missing_config_file(path.display().to_string())
        } else {
            ConfigError::Io {
                path: path.display().to_string(),
                source,
            }
        }
    })?;
    // 空のYAMLはnullになるため、デフォルト扱いにする
    if text.trim().is_empty() {
        return Ok(DripSettings::default());
    }
    serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

fn parse_release_time(value: &str) -> ConfigResult<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map_err(|_| ConfigError::invalid_value(format!("不正な公開時刻: {}", value)))
}

fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
