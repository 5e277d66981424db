use crate::database::{model::notification::NotificationRow, ConnectionPool};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use derive_new::new;
use kernel::model::{id::ReservationId, notification::ReservationNotice};
use kernel::repository::notification::NotificationRepository;
use shared::error::{AppError, AppResult};

#[derive(new)]
pub struct NotificationRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl NotificationRepository for NotificationRepositoryImpl {
    // 予約 ID を主キーにした UPSERT。
    // 同じ予約への再スケジュールは既存の予定を置き換える
    async fn schedule(&self, notice: ReservationNotice) -> AppResult<()> {
        sqlx::query(
            r#"
                INSERT INTO reservation_notifications
                (reservation_id, recipient, device_name,
                start_time, end_time, reason, notify_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                ON CONFLICT (reservation_id)
                DO UPDATE SET
                    recipient = EXCLUDED.recipient,
                    device_name = EXCLUDED.device_name,
                    start_time = EXCLUDED.start_time,
                    end_time = EXCLUDED.end_time,
                    reason = EXCLUDED.reason,
                    notify_at = EXCLUDED.notify_at
            "#,
        )
        .bind(notice.reservation_id)
        .bind(&notice.recipient)
        .bind(&notice.device_name)
        .bind(notice.start_time)
        .bind(notice.end_time)
        .bind(&notice.reason)
        .bind(notice.notify_at())
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(())
    }

    // 予定がなくてもエラーにしない（予約削除時に常に呼ばれるため）
    async fn cancel(&self, reservation_id: ReservationId) -> AppResult<()> {
        sqlx::query("DELETE FROM reservation_notifications WHERE reservation_id = $1")
            .bind(reservation_id)
            .execute(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

        Ok(())
    }

    // 発火時刻を過ぎた通知を取り出しつつ削除する。
    // 複数の配送ループが動いても同じ通知を二重に取り出すことはない
    async fn pop_due(&self, now: DateTime<Utc>) -> AppResult<Vec<ReservationNotice>> {
        let rows: Vec<NotificationRow> = sqlx::query_as(
            r#"
                DELETE FROM reservation_notifications
                WHERE notify_at <= $1
                RETURNING
                    reservation_id, recipient, device_name,
                    start_time, end_time, reason
            "#,
        )
        .bind(now)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(rows.into_iter().map(ReservationNotice::from).collect())
    }
}
