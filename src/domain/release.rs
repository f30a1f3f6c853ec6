use crate::domain::episode::EpisodeSource;
use crate::domain::schedule::ReleaseSchedule;
use crate::domain::state::ReleaseState;
use chrono::{DateTime, NaiveDate, TimeZone};
use std::fmt;

/// 公開ステップの判定結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// 公開曜日・時刻ではない
    GateClosed,
    /// 今日はすでに公開済み
    AlreadyReleasedToday { date: NaiveDate },
    /// 次のエピソード断片がまだ用意されていない
    NotYetAuthored { episode: u32 },
    /// 新しいエピソードを公開した
    Released { episode: u32, date: NaiveDate },
}

impl ReleaseOutcome {
    pub fn is_released(&self) -> bool {
        matches!(self, Self::Released { .. })
    }
}

impl fmt::Display for ReleaseOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GateClosed => write!(f, "公開時間外"),
            Self::AlreadyReleasedToday { date } => write!(f, "{}は公開済み", date),
            Self::NotYetAuthored { episode } => write!(f, "エピソード{:02}は未作成", episode),
            Self::Released { episode, date } => write!(f, "エピソード{:02}を公開 ({})", episode, date),
        }
    }
}

/// 1回分の公開判定を行い、公開する場合はstateを進める
///
/// stateの永続化は呼び出し側の責務。同じ現地日付では何度呼んでも高々1回しか進まない。
pub fn release_step<Z, S>(
    state: &mut ReleaseState,
    now: &DateTime<Z>,
    schedule: &ReleaseSchedule,
    episodes: &S,
) -> ReleaseOutcome
where
    Z: TimeZone,
    S: EpisodeSource,
{
    if !schedule.should_release(now) {
        return ReleaseOutcome::GateClosed;
    }

    let today = schedule.local_date(now);
    if state.last_release_local_date == Some(today) {
        return ReleaseOutcome::AlreadyReleasedToday { date: today };
    }

    let episode = state.next_episode;
    if !episodes.exists(episode) {
        return ReleaseOutcome::NotYetAuthored { episode };
    }

    state.next_episode = episode.saturating_add(1);
    state.last_release_local_date = Some(today);
    ReleaseOutcome::Released {
        episode,
        date: today,
    }
}
