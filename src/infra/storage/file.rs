use crate::types::{InfraError, InfraResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

/// ファイルパスからBufReaderを作成する
/// パースやデータ変換は各ドメインで行う
pub fn load_file(file_path: &Path) -> InfraResult<BufReader<File>> {
    let file = File::open(file_path).map_err(|e| InfraError::file_system(display(file_path), e))?;
    Ok(BufReader::new(file))
}

/// UTF-8テキストファイルを丸ごと読み込む
pub fn load_text_from_file(file_path: &Path) -> InfraResult<String> {
    fs::read_to_string(file_path).map_err(|e| InfraError::file_system(display(file_path), e))
}

/// JSONファイルからSerdeでDeserializeできる型を読み込む
pub fn load_json_from_file<T: DeserializeOwned>(file_path: &Path) -> InfraResult<T> {
    let buf_reader = load_file(file_path)?;
    serde_json::from_reader(buf_reader)
        .map_err(|e| InfraError::serialization(format!("JSONファイルの解析に失敗: {}", display(file_path)), e))
}

/// 値を2スペースインデントのJSONとして書き込む（末尾改行付き）
pub fn save_json_pretty<T: Serialize>(file_path: &Path, value: &T) -> InfraResult<()> {
    let mut json = serde_json::to_string_pretty(value)
        .map_err(|e| InfraError::serialization(format!("JSONの生成に失敗: {}", display(file_path)), e))?;
    json.push('\n');
    save_text_atomic(file_path, &json)
}

/// テキストを一時ファイル経由で書き込み、renameで置き換える
///
/// 書き込み途中で中断されても、既存ファイルが半端な内容になることはない。
pub fn save_text_atomic(file_path: &Path, content: &str) -> InfraResult<()> {
    let file_name = file_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp_path = file_path.with_file_name(format!(".{}.tmp", file_name));

    fs::write(&tmp_path, content).map_err(|e| InfraError::file_system(display(&tmp_path), e))?;
    fs::rename(&tmp_path, file_path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        InfraError::file_system(display(file_path), e)
    })
}

fn display(path: &Path) -> String {
    path.display().to_string()
}
