use crate::infra::storage::file::{load_json_from_file, save_json_pretty};
use crate::types::InfraResult;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

/// 公開の進捗を表す永続化レコード（state.json）
///
/// キーが欠けている場合は `next_episode = 1`、日付なしとして扱う。
/// 知らないキーは読み書きの間で保持する。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseState {
    #[serde(default = "default_next_episode")]
    pub next_episode: u32,
    #[serde(default)]
    pub last_release_local_date: Option<NaiveDate>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_next_episode() -> u32 {
    1
}

impl Default for ReleaseState {
    fn default() -> Self {
        Self {
            next_episode: default_next_episode(),
            last_release_local_date: None,
            extra: Map::new(),
        }
    }
}

impl ReleaseState {
    /// 公開済みとみなす最大のエピソード番号（next_episode - 1、0未満にはならない）
    pub fn released_upto(&self) -> u32 {
        self.next_episode.saturating_sub(1)
    }
}

/// state.jsonを読み込む
///
/// ファイルが存在しない、または内容が不正な場合はエラー（暗黙の初期化はしない）
pub fn load_state(path: &Path) -> InfraResult<ReleaseState> {
    load_json_from_file(path)
}

/// state.jsonを書き込む
pub fn save_state(path: &Path, state: &ReleaseState) -> InfraResult<()> {
    save_json_pretty(path, state)
}
