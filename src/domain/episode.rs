use crate::infra::storage::file::load_text_from_file;
use crate::types::{InfraError, InfraResult};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, warn};

/// エピソード断片の取得元を抽象化するトレイト
///
/// 本番ではディレクトリ上の `NN.xml` を読み、テストではメモリ上の断片を使う。
pub trait EpisodeSource {
    /// 指定番号の断片が存在するか
    fn exists(&self, episode: u32) -> bool;

    /// 指定番号の断片を読み込む（末尾の空白は除去済み）
    fn read(&self, episode: u32) -> InfraResult<String>;
}

/// 断片のファイル名（2桁ゼロ埋め）
pub fn fragment_file_name(episode: u32) -> String {
    format!("{:02}.xml", episode)
}

/// episodes/ ディレクトリから断片を読む実装
#[derive(Debug, Clone)]
pub struct DirEpisodeSource {
    dir: PathBuf,
}

impl DirEpisodeSource {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self, episode: u32) -> PathBuf {
        self.dir.join(fragment_file_name(episode))
    }
}

impl EpisodeSource for DirEpisodeSource {
    fn exists(&self, episode: u32) -> bool {
        self.path(episode).is_file()
    }

    fn read(&self, episode: u32) -> InfraResult<String> {
        let path = self.path(episode);
        debug!(path = %path.display(), "エピソード断片を読み込み");
        // 先頭のインデントはファイルのまま残す
        Ok(load_text_from_file(&path)?.trim_end().to_string())
    }
}

/// メモリ上の断片を返す実装
#[derive(Debug, Clone, Default)]
pub struct MemoryEpisodeSource {
    fragments: HashMap<u32, String>,
}

impl MemoryEpisodeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fragment<S: Into<String>>(mut self, episode: u32, text: S) -> Self {
        self.fragments.insert(episode, text.into());
        self
    }
}

impl EpisodeSource for MemoryEpisodeSource {
    fn exists(&self, episode: u32) -> bool {
        self.fragments.contains_key(&episode)
    }

    fn read(&self, episode: u32) -> InfraResult<String> {
        match self.fragments.get(&episode) {
            Some(text) => Ok(text.trim_end().to_string()),
            None => Err(InfraError::file_system(
                fragment_file_name(episode),
                std::io::Error::from(std::io::ErrorKind::NotFound),
            )),
        }
    }
}

/// 断片 1..=upto を順に連結する
///
/// 各断片は末尾の空白を除去したうえで空行区切りで連結し、全体の前後の空白も除去する。
/// 途中の番号が欠けていた場合はそこで打ち切る（エラーにはしない）。
pub fn build_items<S: EpisodeSource>(source: &S, upto: u32) -> InfraResult<String> {
    let mut parts = Vec::new();

    for episode in 1..=upto {
        if !source.exists(episode) {
            warn!(
                missing = episode,
                released_upto = upto,
                "公開済みのはずのエピソード断片が見つからないため、以降の連結を打ち切ります"
            );
            break;
        }
        parts.push(source.read(episode)?);
    }

    Ok(parts.join("\n\n").trim().to_string())
}
