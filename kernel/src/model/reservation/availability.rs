use super::{period::ReservationPeriod, Reservation};
use chrono::{DateTime, Utc};

/// デバイスの空き時間帯。end が None の場合はその時刻以降ずっと空き
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilitySlot {
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
}

/// 空き時間帯の一覧と、その導出元になった未来の予約一覧
#[derive(Debug)]
pub struct DeviceAvailability {
    pub reservations: Vec<Reservation>,
    pub slots: Vec<AvailabilitySlot>,
}

/// 未来の予約一覧（start_time > now、開始時刻の昇順）から空き時間帯を導出する。
/// 進行中の予約は一覧に含まれない前提であり、now 時点は空き扱いになる。
///
/// - 予約がなければ {now, 無期限} の 1 件
/// - now と先頭予約の間に隙間があれば先頭の空きとして出力
/// - 隣接する予約の間は prev.end < next.start の場合のみ出力
///   （連続した予約の間に幅ゼロの空きは出さない）
/// - 末尾予約の終了以降は常に無期限の空きとして出力
pub fn free_slots(
    now: DateTime<Utc>,
    reservations: &[ReservationPeriod],
) -> Vec<AvailabilitySlot> {
    let mut slots = Vec::new();

    let Some(first) = reservations.first() else {
        slots.push(AvailabilitySlot { start: now, end: None });
        return slots;
    };

    if now < first.start_time {
        slots.push(AvailabilitySlot {
            start: now,
            end: Some(first.start_time),
        });
    }

    for pair in reservations.windows(2) {
        let (current, next) = (&pair[0], &pair[1]);
        if current.end_time < next.start_time {
            slots.push(AvailabilitySlot {
                start: current.end_time,
                end: Some(next.start_time),
            });
        }
    }

    // 最後の予約以降は無期限に空き
    let last = reservations.last().unwrap_or(first);
    slots.push(AvailabilitySlot {
        start: last.end_time,
        end: None,
    });

    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 1, hour, min, 0).unwrap()
    }

    #[test]
    fn no_reservations_means_free_from_now() {
        let slots = free_slots(at(9, 0), &[]);
        assert_eq!(
            slots,
            vec![AvailabilitySlot {
                start: at(9, 0),
                end: None
            }]
        );
    }

    #[test]
    fn gap_before_first_between_and_after_last() {
        let reservations = vec![
            ReservationPeriod::new(at(10, 0), at(11, 0)),
            ReservationPeriod::new(at(12, 0), at(13, 0)),
        ];
        let slots = free_slots(at(9, 0), &reservations);
        assert_eq!(
            slots,
            vec![
                AvailabilitySlot {
                    start: at(9, 0),
                    end: Some(at(10, 0))
                },
                AvailabilitySlot {
                    start: at(11, 0),
                    end: Some(at(12, 0))
                },
                AvailabilitySlot {
                    start: at(13, 0),
                    end: None
                },
            ]
        );
    }

    #[test]
    fn back_to_back_reservations_emit_no_inner_gap() {
        let reservations = vec![
            ReservationPeriod::new(at(10, 0), at(11, 0)),
            ReservationPeriod::new(at(11, 0), at(12, 0)),
        ];
        let slots = free_slots(at(9, 0), &reservations);
        assert_eq!(
            slots,
            vec![
                AvailabilitySlot {
                    start: at(9, 0),
                    end: Some(at(10, 0))
                },
                AvailabilitySlot {
                    start: at(12, 0),
                    end: None
                },
            ]
        );
    }

    #[test]
    fn no_leading_gap_when_first_starts_at_now() {
        let reservations = vec![ReservationPeriod::new(at(9, 0), at(10, 0))];
        let slots = free_slots(at(9, 0), &reservations);
        assert_eq!(
            slots,
            vec![AvailabilitySlot {
                start: at(10, 0),
                end: None
            }]
        );
    }

    #[test]
    fn slots_and_reservations_partition_the_timeline() {
        // 空きと予約を時刻順に連結すると [now, +inf) を
        // 重なりなく覆うことを確認する
        let reservations = vec![
            ReservationPeriod::new(at(10, 0), at(11, 0)),
            ReservationPeriod::new(at(11, 30), at(12, 0)),
            ReservationPeriod::new(at(14, 0), at(15, 0)),
        ];
        let now = at(9, 0);
        let slots = free_slots(now, &reservations);

        let open_end = at(23, 59);
        let mut intervals: Vec<(DateTime<Utc>, DateTime<Utc>)> = reservations
            .iter()
            .map(|r| (r.start_time, r.end_time))
            .chain(slots.iter().map(|s| (s.start, s.end.unwrap_or(open_end))))
            .collect();
        intervals.sort_by_key(|(start, _)| *start);

        // 先頭は now から始まり、隙間も重なりもなく連結している
        let mut cursor = now;
        for (start, end) in intervals {
            assert_eq!(start, cursor);
            cursor = end;
        }
        assert_eq!(cursor, open_end);
        // 末尾は無期限の空きで閉じる
        assert_eq!(slots.last().unwrap().end, None);
        assert_eq!(slots.last().unwrap().start, at(15, 0));
    }
}
