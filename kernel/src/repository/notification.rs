use crate::model::{id::ReservationId, notification::ReservationNotice};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::error::AppResult;

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    // 通知を予約する。同じ予約 ID の予定があれば置き換える
    async fn schedule(&self, notice: ReservationNotice) -> AppResult<()>;
    async fn cancel(&self, reservation_id: ReservationId) -> AppResult<()>;
    // 発火時刻を過ぎた通知を取り出す（取り出した時点で予定から消える）
    async fn pop_due(&self, now: DateTime<Utc>) -> AppResult<Vec<ReservationNotice>>;
}
