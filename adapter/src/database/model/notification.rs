use chrono::{DateTime, Utc};
use kernel::model::{id::ReservationId, notification::ReservationNotice};

#[derive(sqlx::FromRow)]
pub struct NotificationRow {
    pub reservation_id: ReservationId,
    pub recipient: String,
    pub device_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub reason: String,
}

impl From<NotificationRow> for ReservationNotice {
    fn from(value: NotificationRow) -> Self {
        let NotificationRow {
            reservation_id,
            recipient,
            device_name,
            start_time,
            end_time,
            reason,
        } = value;
        ReservationNotice {
            reservation_id,
            recipient,
            device_name,
            start_time,
            end_time,
            reason,
        }
    }
}
