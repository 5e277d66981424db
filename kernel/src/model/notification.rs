use crate::model::id::ReservationId;
use chrono::{DateTime, Duration, Utc};
use derive_new::new;

/// 予約開始の何分前に通知するか
pub const NOTIFY_BEFORE_MINUTES: i64 = 30;

/// 予約 1 件に対する通知予定。予約 ID をキーとし、
/// 同じ予約に再スケジュールした場合は既存の予定を置き換える
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct ReservationNotice {
    pub reservation_id: ReservationId,
    pub recipient: String,
    pub device_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub reason: String,
}

impl ReservationNotice {
    /// 通知の発火時刻（予約開始 30 分前）
    pub fn notify_at(&self) -> DateTime<Utc> {
        self.start_time - Duration::minutes(NOTIFY_BEFORE_MINUTES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::id::ReservationId;
    use chrono::TimeZone;

    #[test]
    fn notice_fires_thirty_minutes_before_start() {
        let start = Utc.with_ymd_and_hms(2024, 4, 1, 10, 0, 0).unwrap();
        let notice = ReservationNotice::new(
            ReservationId::new(),
            "user@example.com".into(),
            "Laptop-A".into(),
            start,
            Utc.with_ymd_and_hms(2024, 4, 1, 11, 0, 0).unwrap(),
            "demo".into(),
        );
        assert_eq!(
            notice.notify_at(),
            Utc.with_ymd_and_hms(2024, 4, 1, 9, 30, 0).unwrap()
        );
    }
}
