use chrono::{DateTime, Utc};
use kernel::model::{device::Device, id::DeviceId};

#[derive(sqlx::FromRow)]
pub struct DeviceRow {
    pub device_id: DeviceId,
    pub device_name: String,
    pub device_brand: String,
    pub device_status: String,
    pub device_type: String,
    pub last_used_at: Option<DateTime<Utc>>,
}

impl From<DeviceRow> for Device {
    fn from(value: DeviceRow) -> Self {
        let DeviceRow {
            device_id,
            device_name,
            device_brand,
            device_status,
            device_type,
            last_used_at,
        } = value;
        Device {
            device_id,
            device_name,
            device_brand,
            device_status,
            device_type,
            last_used_at,
        }
    }
}
