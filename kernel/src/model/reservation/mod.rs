use crate::model::id::{DeviceId, ReservationId};
use chrono::{DateTime, Utc};

pub mod availability;
pub mod event;
pub mod period;

use period::ReservationPeriod;

#[derive(Debug, Clone)]
pub struct Reservation {
    pub reservation_id: ReservationId,
    pub device_id: DeviceId,
    // 予約作成・更新時点のデバイス名のコピー。
    // デバイス名変更時は明示的なカスケード更新で追従させる
    pub device_name: String,
    pub user_name: String,
    pub period: ReservationPeriod,
    pub reason: String,
    pub reserved_at: DateTime<Utc>,
}
