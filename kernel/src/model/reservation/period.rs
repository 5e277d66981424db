use chrono::{DateTime, Utc};
use derive_new::new;
use shared::error::{AppError, AppResult};

/// 予約の時間帯 [start_time, end_time)
#[derive(Debug, Clone, Copy, PartialEq, Eq, new)]
pub struct ReservationPeriod {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl ReservationPeriod {
    /// 時間帯そのものの妥当性を確認する。
    /// - 過去の時刻を含む予約は作成・変更できない
    /// - 開始時刻は終了時刻より前でなければならない
    pub fn validate(&self, now: DateTime<Utc>) -> AppResult<()> {
        if self.start_time < now || self.end_time < now {
            return Err(AppError::UnprocessableEntity(
                "過去の時間帯には予約できません。".into(),
            ));
        }
        if self.start_time >= self.end_time {
            return Err(AppError::UnprocessableEntity(
                "開始時刻は終了時刻より前である必要があります。".into(),
            ));
        }
        Ok(())
    }

    /// 既存予約との衝突判定。
    /// 衝突しないのは、相手が完全に後ろ（other.start > self.end）か
    /// 完全に前（other.end < self.start）の場合のみ。
    /// 端点が一致する場合（11:00 終了と 11:00 開始など）は衝突扱いとなる。
    /// この不等号は厳密に < / > であり、変更してはならない
    pub fn conflicts_with(&self, other: &Self) -> bool {
        !(other.start_time > self.end_time || other.end_time < self.start_time)
    }

    /// 既存予約群に対して空いているかどうか。最初の衝突で打ち切る
    pub fn is_available(&self, existing: &[ReservationPeriod]) -> bool {
        !existing.iter().any(|r| self.conflicts_with(r))
    }
}

/// 候補（候補ごとの既存予約つき）を列挙順に走査し、
/// 指定時間帯に空いている最初の 1 件を返す。
/// どの候補が選ばれるかは列挙順に依存するため、
/// 呼び出し側は特定の候補が選ばれることに依存してはならない
pub fn first_available<Id: Copy>(
    candidates: &[(Id, Vec<ReservationPeriod>)],
    period: &ReservationPeriod,
) -> Option<Id> {
    candidates
        .iter()
        .find(|(_, existing)| period.is_available(existing))
        .map(|(id, _)| *id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 1, hour, min, 0).unwrap()
    }

    #[test]
    fn validate_rejects_past_start() {
        let period = ReservationPeriod::new(at(8, 0), at(10, 0));
        assert!(period.validate(at(9, 0)).is_err());
    }

    #[test]
    fn validate_rejects_past_end() {
        let period = ReservationPeriod::new(at(8, 0), at(8, 30));
        assert!(period.validate(at(9, 0)).is_err());
    }

    #[test]
    fn validate_rejects_start_not_before_end() {
        let period = ReservationPeriod::new(at(10, 0), at(10, 0));
        assert!(period.validate(at(9, 0)).is_err());

        let period = ReservationPeriod::new(at(11, 0), at(10, 0));
        assert!(period.validate(at(9, 0)).is_err());
    }

    #[test]
    fn validate_accepts_future_ordered_period() {
        let period = ReservationPeriod::new(at(10, 0), at(11, 0));
        assert!(period.validate(at(9, 0)).is_ok());
    }

    #[test]
    fn validate_is_idempotent() {
        let period = ReservationPeriod::new(at(10, 0), at(11, 0));
        let now = at(9, 0);
        assert_eq!(
            period.validate(now).is_ok(),
            period.validate(now).is_ok()
        );

        let bad = ReservationPeriod::new(at(8, 0), at(7, 0));
        assert_eq!(bad.validate(now).is_err(), bad.validate(now).is_err());
    }

    #[test]
    fn overlapping_periods_conflict() {
        let existing = ReservationPeriod::new(at(10, 0), at(11, 0));
        let requested = ReservationPeriod::new(at(10, 30), at(11, 30));
        assert!(requested.conflicts_with(&existing));
    }

    #[test]
    fn touching_boundary_counts_as_conflict() {
        // 11:00 終了の予約に対して 11:00 開始はまだ空きではない
        let existing = ReservationPeriod::new(at(10, 0), at(11, 0));
        let requested = ReservationPeriod::new(at(11, 0), at(12, 0));
        assert!(requested.conflicts_with(&existing));
        assert!(existing.conflicts_with(&requested));
    }

    #[test]
    fn strictly_later_period_is_free() {
        let existing = ReservationPeriod::new(at(10, 0), at(11, 0));
        let requested = ReservationPeriod::new(at(11, 1), at(12, 0));
        assert!(!requested.conflicts_with(&existing));
        assert!(requested.is_available(&[existing]));
    }

    #[test]
    fn availability_short_circuits_on_any_conflict() {
        let requested = ReservationPeriod::new(at(12, 0), at(13, 0));
        let existing = vec![
            ReservationPeriod::new(at(8, 0), at(9, 0)),
            ReservationPeriod::new(at(12, 30), at(14, 0)),
            ReservationPeriod::new(at(15, 0), at(16, 0)),
        ];
        assert!(!requested.is_available(&existing));
    }

    #[test]
    fn empty_schedule_is_always_available() {
        let requested = ReservationPeriod::new(at(12, 0), at(13, 0));
        assert!(requested.is_available(&[]));
    }

    #[test]
    fn first_available_skips_busy_candidate_in_any_order() {
        // 同名デバイスが 2 台、一方だけ 14:00〜15:00 が埋まっている場合、
        // 列挙順によらず空いている方が選ばれる
        let requested = ReservationPeriod::new(at(14, 0), at(15, 0));
        let busy_schedule = vec![ReservationPeriod::new(at(13, 30), at(15, 30))];
        let free_schedule = vec![ReservationPeriod::new(at(9, 0), at(10, 0))];

        let busy_first = vec![
            ("busy", busy_schedule.clone()),
            ("free", free_schedule.clone()),
        ];
        assert_eq!(first_available(&busy_first, &requested), Some("free"));

        let free_first = vec![("free", free_schedule), ("busy", busy_schedule)];
        assert_eq!(first_available(&free_first, &requested), Some("free"));
    }

    #[test]
    fn first_available_reports_none_when_all_candidates_busy() {
        let requested = ReservationPeriod::new(at(14, 0), at(15, 0));
        let candidates = vec![
            ("a", vec![ReservationPeriod::new(at(14, 0), at(15, 0))]),
            ("b", vec![ReservationPeriod::new(at(13, 0), at(14, 0))]),
        ];
        // 端点の一致も衝突なので b も空きではない
        assert_eq!(first_available(&candidates, &requested), None);
    }

    #[test]
    fn accepted_pairs_never_overlap() {
        // 片方が完全に前、または完全に後ろであることが
        // 受理済みペアの常に満たすべき性質
        let a = ReservationPeriod::new(at(10, 0), at(11, 0));
        let b = ReservationPeriod::new(at(11, 1), at(12, 0));
        assert!(a.end_time < b.start_time || b.end_time < a.start_time);
    }
}
