use crate::types::DripConfig;
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Weekday};
use chrono_tz::Tz;

/// 公開ゲート（曜日 + 時刻）
///
/// 判定はすべて設定されたタイムゾーンの現地時刻で行う。
/// ホストのローカル時刻やUTCでは比較しない。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleaseSchedule {
    pub timezone: Tz,
    pub weekday: Weekday,
    pub time: NaiveTime,
}

impl ReleaseSchedule {
    pub fn new(timezone: Tz, weekday: Weekday, time: NaiveTime) -> Self {
        Self {
            timezone,
            weekday,
            time,
        }
    }

    pub fn from_config(config: &DripConfig) -> Self {
        Self::new(config.timezone, config.release_weekday, config.release_time)
    }

    /// 任意のタイムゾーンの時刻を公開用タイムゾーンの現地時刻に変換する
    pub fn localize<Z: TimeZone>(&self, now: &DateTime<Z>) -> DateTime<Tz> {
        now.with_timezone(&self.timezone)
    }

    /// 現地日付（state.jsonの `last_release_local_date` と比較する値）
    pub fn local_date<Z: TimeZone>(&self, now: &DateTime<Z>) -> NaiveDate {
        self.localize(now).date_naive()
    }

    /// 公開曜日かつ公開時刻以降であればtrue
    pub fn should_release<Z: TimeZone>(&self, now: &DateTime<Z>) -> bool {
        let local = self.localize(now);
        local.weekday() == self.weekday && local.time() >= self.time
    }
}
