use crate::model::{
    device::{
        event::{CreateDevice, DeleteDevice, UpdateDevice},
        Device,
    },
    id::DeviceId,
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait DeviceRepository: Send + Sync {
    async fn create(&self, event: CreateDevice) -> AppResult<DeviceId>;
    async fn find_all(&self) -> AppResult<Vec<Device>>;
    async fn find_by_id(&self, device_id: DeviceId) -> AppResult<Option<Device>>;
    async fn update(&self, event: UpdateDevice) -> AppResult<()>;
    async fn delete(&self, event: DeleteDevice) -> AppResult<()>;
}
