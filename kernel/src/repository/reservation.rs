use crate::model::{
    id::{DeviceId, ReservationId},
    reservation::{
        availability::DeviceAvailability,
        event::{CreateReservation, DeleteReservation, UpdateReservation},
        Reservation,
    },
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::error::AppResult;

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    // 予約を作成する。空き確認と INSERT は同一トランザクションで行う
    async fn create(&self, event: CreateReservation) -> AppResult<Reservation>;
    // すべての予約を取得する（管理者向け）
    async fn find_all(&self) -> AppResult<Vec<Reservation>>;
    // ユーザー名に紐づく予約一覧を取得する
    async fn find_by_user_name(&self, user_name: &str) -> AppResult<Vec<Reservation>>;
    async fn find_by_id(&self, reservation_id: ReservationId)
        -> AppResult<Option<Reservation>>;
    // デバイス ID に紐づく予約一覧を取得する
    async fn find_by_device_id(&self, device_id: DeviceId) -> AppResult<Vec<Reservation>>;
    // now 以降に開始する予約から空き時間帯を導出する
    async fn find_availability(
        &self,
        device_id: DeviceId,
        now: DateTime<Utc>,
    ) -> AppResult<DeviceAvailability>;
    // 管理者による予約内容の更新。更新後の予約を返す
    async fn update(&self, event: UpdateReservation) -> AppResult<Reservation>;
    async fn delete(&self, event: DeleteReservation) -> AppResult<()>;
}
