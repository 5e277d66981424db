use crate::model::id::{DeviceId, UserId};
use chrono::{DateTime, Utc};
use derive_new::new;

#[derive(new)]
pub struct CreateDevice {
    pub device_name: String,
    pub device_brand: String,
    pub device_status: String,
    pub device_type: String,
}

// デバイス名を変更した場合は reservations の device_name も
// 同一トランザクション内で追従させる
#[derive(Debug)]
pub struct UpdateDevice {
    pub device_id: DeviceId,
    pub device_name: Option<String>,
    pub device_brand: Option<String>,
    pub device_status: Option<String>,
    pub device_type: Option<String>,
    pub last_used_at: Option<DateTime<Utc>>,
    pub requested_user: UserId,
}

#[derive(Debug)]
pub struct DeleteDevice {
    pub device_id: DeviceId,
    pub requested_user: UserId,
}
