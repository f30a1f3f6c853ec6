use crate::{
    domain::{
        episode::{build_items, DirEpisodeSource},
        feed::FeedTemplate,
        release::{release_step, ReleaseOutcome},
        schedule::ReleaseSchedule,
        state::{load_state, save_state},
    },
    infra::storage::file::{load_text_from_file, save_text_atomic},
    types::DripConfig,
};
use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone};
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, info};

/// 1回の実行結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub outcome: ReleaseOutcome,
    pub released_upto: u32,
    pub feed_path: PathBuf,
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "処理完了: {}、公開済み{}件 → {}",
            self.outcome,
            self.released_upto,
            self.feed_path.display()
        )
    }
}

/// フィード公開ワークフローのメイン実行関数（現在時刻を注入）
///
/// 1. テンプレートとstate.jsonを読み込み
/// 2. 公開ゲートを判定し、必要ならstateを1つ進める
/// 3. 公開済みの断片を連結してテンプレートに差し込む
/// 4. フィードを毎回書き直し、その後stateを保存（進めた場合のみ）
///
/// 致命的なエラー（state不正、マーカーなし）は書き込み前に発生するため、
/// 失敗時にファイルが中途半端に更新されることはない。
pub fn execute_release_workflow<Z: TimeZone>(
    config: &DripConfig,
    now: &DateTime<Z>,
) -> Result<RunReport> {
    let schedule = ReleaseSchedule::from_config(config);
    let episodes = DirEpisodeSource::new(&config.episodes_dir);
    let template = FeedTemplate::new(&config.marker, &config.marker_indent);

    info!(
        now = %schedule.localize(now),
        timezone = %config.timezone,
        "=== フィード公開ワークフロー開始 ==="
    );

    let base = load_text_from_file(&config.base_path).context("フィードテンプレートの読み込みに失敗")?;
    let mut state = load_state(&config.state_path).context("stateの読み込みに失敗")?;
    debug!(
        next_episode = state.next_episode,
        last_release = ?state.last_release_local_date,
        "state読み込み完了"
    );

    let outcome = release_step(&mut state, now, &schedule, &episodes);
    info!(%outcome, "公開判定");

    let released_upto = state.released_upto();
    let items = build_items(&episodes, released_upto).context("エピソード断片の連結に失敗")?;
    let feed = template
        .build_feed(&base, &items)
        .with_context(|| format!("フィードの組み立てに失敗: {}", config.base_path.display()))?;

    // フィードを先に書く。state保存に失敗しても次回同じエピソードを公開し直すだけで済む
    save_text_atomic(&config.feed_path, &feed).context("フィードの書き込みに失敗")?;

    if outcome.is_released() {
        save_state(&config.state_path, &state).context("stateの保存に失敗")?;
        debug!(next_episode = state.next_episode, "state保存完了");
    }

    let report = RunReport {
        outcome,
        released_upto,
        feed_path: config.feed_path.clone(),
    };
    info!("{}", report);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DripSettings;
    use chrono::NaiveDate;
    use chrono_tz::Europe::Stockholm;
    use std::fs;
    use std::path::Path;

    const BASE: &str = "<rss>\n  <!-- AUTO_EPISODES_INSERT_HERE -->\n</rss>\n";

    fn setup(root: &Path, state: &str) -> DripConfig {
        fs::create_dir_all(root.join("episodes")).unwrap();
        fs::write(root.join("feed_base.xml"), BASE).unwrap();
        fs::write(root.join("state.json"), state).unwrap();
        DripConfig::with_root(root).unwrap()
    }

    #[test]
    fn test_report_display() {
        let report = RunReport {
            outcome: ReleaseOutcome::Released {
                episode: 3,
                date: NaiveDate::from_ymd_opt(2025, 3, 9).unwrap(),
            },
            released_upto: 3,
            feed_path: PathBuf::from("feed.xml"),
        };
        assert_eq!(
            report.to_string(),
            "処理完了: エピソード03を公開 (2025-03-09)、公開済み3件 → feed.xml"
        );
    }

    #[test]
    fn test_marker_missing_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = setup(dir.path(), "{\"next_episode\": 1}\n");
        fs::write(dir.path().join("feed_base.xml"), "<rss></rss>").unwrap();
        fs::write(dir.path().join("episodes/01.xml"), "<item>X</item>").unwrap();
        let now = Stockholm.with_ymd_and_hms(2025, 3, 9, 2, 0, 1).unwrap();

        let result = execute_release_workflow(&config, &now);

        assert!(result.is_err(), "マーカーなしでエラーにならなかった");
        assert_eq!(
            fs::read_to_string(dir.path().join("state.json")).unwrap(),
            "{\"next_episode\": 1}\n",
            "失敗時にstateが書き換えられた"
        );
        assert!(!dir.path().join("feed.xml").exists(), "失敗時にフィードが書き込まれた");
    }

    #[test]
    fn test_state_untouched_when_gate_closed() {
        let dir = tempfile::tempdir().unwrap();
        let state = "{\"next_episode\":2,\"last_release_local_date\":\"2025-03-02\"}";
        let config = setup(dir.path(), state);
        fs::write(dir.path().join("episodes/01.xml"), "<item>X</item>\n").unwrap();
        let now = Stockholm.with_ymd_and_hms(2025, 3, 12, 10, 0, 0).unwrap();

        let report = execute_release_workflow(&config, &now).unwrap();

        assert_eq!(report.outcome, ReleaseOutcome::GateClosed);
        assert_eq!(report.released_upto, 1);
        // 書式も含めて元のまま
        assert_eq!(fs::read_to_string(dir.path().join("state.json")).unwrap(), state);
        assert_eq!(
            fs::read_to_string(dir.path().join("feed.xml")).unwrap(),
            "<rss>\n  <item>X</item>\n\n  <!-- AUTO_EPISODES_INSERT_HERE -->\n</rss>\n"
        );
    }

    #[test]
    fn test_feed_write_failure_keeps_state() {
        let dir = tempfile::tempdir().unwrap();
        let original = "{\"next_episode\": 1}\n";
        setup(dir.path(), original);
        fs::write(dir.path().join("episodes/01.xml"), "<item>X</item>").unwrap();
        let settings = DripSettings {
            feed_path: PathBuf::from("no_such_dir/feed.xml"),
            ..DripSettings::default()
        };
        let config = DripConfig::from_settings(dir.path(), settings).unwrap();
        let now = Stockholm.with_ymd_and_hms(2025, 3, 9, 2, 0, 1).unwrap();

        let result = execute_release_workflow(&config, &now);

        assert!(result.is_err(), "フィードが書けないのにエラーにならなかった");
        assert_eq!(
            fs::read_to_string(dir.path().join("state.json")).unwrap(),
            original,
            "フィード書き込み失敗時にstateが進んだ"
        );
    }
}
