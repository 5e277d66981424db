use chrono::{DateTime, Utc};
use kernel::model::{
    id::{DeviceId, ReservationId},
    reservation::{period::ReservationPeriod, Reservation},
};

#[derive(sqlx::FromRow)]
pub struct ReservationRow {
    pub reservation_id: ReservationId,
    pub device_id: DeviceId,
    pub device_name: String,
    pub user_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub reason: String,
    pub reserved_at: DateTime<Utc>,
}

impl From<ReservationRow> for Reservation {
    fn from(value: ReservationRow) -> Self {
        let ReservationRow {
            reservation_id,
            device_id,
            device_name,
            user_name,
            start_time,
            end_time,
            reason,
            reserved_at,
        } = value;
        Reservation {
            reservation_id,
            device_id,
            device_name,
            user_name,
            period: ReservationPeriod::new(start_time, end_time),
            reason,
            reserved_at,
        }
    }
}
