use thiserror::Error;

/// フィード組み立てのエラー型
#[derive(Error, Debug, PartialEq, Eq)]
pub enum FeedError {
    /// テンプレートにマーカーが存在しない
    #[error("テンプレートにマーカーが見つかりません: {marker}")]
    MarkerNotFound { marker: String },

    /// テンプレートにマーカーが複数存在する
    #[error("テンプレートにマーカーが{count}個あります（1個のみ許可）: {marker}")]
    DuplicateMarker { marker: String, count: usize },
}

/// フィード本文の差し込み位置を表すマーカー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedTemplate<'a> {
    pub marker: &'a str,
    pub indent: &'a str,
}

impl<'a> FeedTemplate<'a> {
    pub fn new(marker: &'a str, indent: &'a str) -> Self {
        Self { marker, indent }
    }

    /// テンプレートのマーカー直前にitemsを差し込む
    ///
    /// マーカー自体は次回以降の実行のためにそのまま残す。
    /// itemsが空の場合はテンプレートをそのまま返す。
    pub fn build_feed(&self, base: &str, items: &str) -> Result<String, FeedError> {
        let count = base.matches(self.marker).count();
        match count {
            0 => {
                return Err(FeedError::MarkerNotFound {
                    marker: self.marker.to_string(),
                })
            }
            1 => {}
            _ => {
                return Err(FeedError::DuplicateMarker {
                    marker: self.marker.to_string(),
                    count,
                })
            }
        }

        if items.is_empty() {
            return Ok(base.to_string());
        }

        let insertion = format!("{}\n\n{}{}", items, self.indent, self.marker);
        Ok(base.replacen(self.marker, &insertion, 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::config::{DEFAULT_MARKER, DEFAULT_MARKER_INDENT};

    const BASE: &str = "<rss>\n<channel>\n  <!-- AUTO_EPISODES_INSERT_HERE -->\n</channel>\n</rss>\n";

    fn template() -> FeedTemplate<'static> {
        FeedTemplate::new(DEFAULT_MARKER, DEFAULT_MARKER_INDENT)
    }

    #[test]
    fn test_empty_items_returns_base() {
        assert_eq!(template().build_feed(BASE, "").unwrap(), BASE);
    }

    #[test]
    fn test_items_inserted_before_marker() {
        let feed = template()
            .build_feed(BASE, "<item>one</item>\n\n    <item>two</item>")
            .unwrap();

        assert_eq!(
            feed,
            "<rss>\n<channel>\n  <item>one</item>\n\n    <item>two</item>\n\n  <!-- AUTO_EPISODES_INSERT_HERE -->\n</channel>\n</rss>\n"
        );
    }

    #[test]
    fn test_marker_survives_for_next_run() {
        let first = template().build_feed(BASE, "<item>one</item>").unwrap();
        assert_eq!(first.matches(DEFAULT_MARKER).count(), 1);
    }

    #[test]
    fn test_missing_marker() {
        let result = template().build_feed("<rss></rss>", "<item>x</item>");
        assert_eq!(
            result,
            Err(FeedError::MarkerNotFound {
                marker: DEFAULT_MARKER.to_string()
            })
        );

        // itemsが空でもマーカーは必須
        assert!(template().build_feed("<rss></rss>", "").is_err());
    }

    #[test]
    fn test_duplicate_marker() {
        let base = format!("{m}\n{m}\n", m = DEFAULT_MARKER);
        let result = template().build_feed(&base, "<item>x</item>");
        assert!(matches!(result, Err(FeedError::DuplicateMarker { count: 2, .. })));
    }
}
