use super::period::ReservationPeriod;
use crate::model::id::{DeviceId, ReservationId, UserId};
use chrono::{DateTime, Utc};
use derive_new::new;

/// 予約対象デバイスの指定方法。
/// ID 指定ならそのデバイスのみ、名前指定なら同名デバイスのうち
/// 指定時間帯に空いている最初の 1 台が対象になる
#[derive(Debug, Clone)]
pub enum DeviceTarget {
    ById(DeviceId),
    ByName(String),
}

#[derive(new)]
pub struct CreateReservation {
    pub target: DeviceTarget,
    pub user_name: String,
    pub period: ReservationPeriod,
    pub reason: String,
    pub reserved_at: DateTime<Utc>,
}

// 管理者のみが実行できる。指定されたフィールドのみ更新し、
// 全フィールドの検証が通ってから 1 回の UPDATE で確定する
#[derive(Debug)]
pub struct UpdateReservation {
    pub reservation_id: ReservationId,
    pub device_id: Option<DeviceId>,
    pub device_name: Option<String>,
    pub user_name: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub reason: Option<String>,
    pub requested_user: UserId,
}

#[derive(Debug, new)]
pub struct DeleteReservation {
    pub reservation_id: ReservationId,
    pub requested_user: UserId,
}
