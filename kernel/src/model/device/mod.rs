use crate::model::id::DeviceId;
use chrono::{DateTime, Utc};

pub mod event;

#[derive(Debug, Clone)]
pub struct Device {
    pub device_id: DeviceId,
    pub device_name: String,
    pub device_brand: String,
    pub device_status: String,
    pub device_type: String,
    pub last_used_at: Option<DateTime<Utc>>,
}
