use chrono::{DateTime, Utc};
use derive_new::new;
use garde::Validate;
use kernel::model::{
    device::{
        event::{CreateDevice, UpdateDevice},
        Device,
    },
    id::{DeviceId, UserId},
};
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DevicesResponse {
    pub items: Vec<DeviceResponse>,
}

impl From<Vec<Device>> for DevicesResponse {
    fn from(value: Vec<Device>) -> Self {
        Self {
            items: value.into_iter().map(DeviceResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceResponse {
    pub device_id: DeviceId,
    pub device_name: String,
    pub device_brand: String,
    pub device_status: String,
    pub device_type: String,
    pub last_used_at: Option<DateTime<Utc>>,
}

impl From<Device> for DeviceResponse {
    fn from(value: Device) -> Self {
        let Device {
            device_id,
            device_name,
            device_brand,
            device_status,
            device_type,
            last_used_at,
        } = value;
        Self {
            device_id,
            device_name,
            device_brand,
            device_status,
            device_type,
            last_used_at,
        }
    }
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeviceRequest {
    #[garde(length(min = 1))]
    pub device_name: String,
    #[garde(length(min = 1))]
    pub device_brand: String,
    #[garde(length(min = 1))]
    pub device_status: String,
    #[garde(length(min = 1))]
    pub device_type: String,
}

impl From<CreateDeviceRequest> for CreateDevice {
    fn from(value: CreateDeviceRequest) -> Self {
        let CreateDeviceRequest {
            device_name,
            device_brand,
            device_status,
            device_type,
        } = value;
        Self {
            device_name,
            device_brand,
            device_status,
            device_type,
        }
    }
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDeviceRequest {
    #[garde(inner(length(min = 1)))]
    pub device_name: Option<String>,
    #[garde(inner(length(min = 1)))]
    pub device_brand: Option<String>,
    #[garde(inner(length(min = 1)))]
    pub device_status: Option<String>,
    #[garde(inner(length(min = 1)))]
    pub device_type: Option<String>,
    #[garde(skip)]
    pub last_used_at: Option<DateTime<Utc>>,
}

#[derive(new)]
pub struct UpdateDeviceRequestWithIds(DeviceId, UserId, UpdateDeviceRequest);
impl From<UpdateDeviceRequestWithIds> for UpdateDevice {
    fn from(value: UpdateDeviceRequestWithIds) -> Self {
        let UpdateDeviceRequestWithIds(
            device_id,
            requested_user,
            UpdateDeviceRequest {
                device_name,
                device_brand,
                device_status,
                device_type,
                last_used_at,
            },
        ) = value;
        Self {
            device_id,
            device_name,
            device_brand,
            device_status,
            device_type,
            last_used_at,
            requested_user,
        }
    }
}

/// デバイス削除時の確認フラグ。
/// 予約が残っているデバイスは confirm=true を付けない限り削除しない
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DeleteDeviceQuery {
    #[serde(default)]
    pub confirm: bool,
}
