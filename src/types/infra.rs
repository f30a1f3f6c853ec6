use thiserror::Error;

/// インフラストラクチャ層のエラー型
/// ファイルシステム、シリアライゼーションなど基盤的なエラーを定義
#[derive(Error, Debug)]
pub enum InfraError {
    /// ファイルシステムエラー
    #[error("ファイルシステムエラー: {path} - {source}")]
    FileSystem {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// シリアライゼーションエラー
    #[error("シリアライゼーションエラー: {context} - {source}")]
    Serialization {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

impl InfraError {
    /// ファイルシステムエラーを作成
    pub fn file_system<P: Into<String>>(path: P, source: std::io::Error) -> Self {
        Self::FileSystem {
            path: path.into(),
            source,
        }
    }

    /// シリアライゼーションエラーを作成
    pub fn serialization<C: Into<String>>(context: C, source: serde_json::Error) -> Self {
        Self::Serialization {
            context: context.into(),
            source,
        }
    }

    /// ファイルが存在しないことによるエラーかどうか
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::FileSystem { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }
}

/// インフラエラーのResult型エイリアス
pub type InfraResult<T> = std::result::Result<T, InfraError>;
