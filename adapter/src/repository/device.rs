use crate::database::{model::device::DeviceRow, ConnectionPool};
use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    device::{
        event::{CreateDevice, DeleteDevice, UpdateDevice},
        Device,
    },
    id::DeviceId,
};
use kernel::repository::device::DeviceRepository;
use shared::error::{AppError, AppResult};

#[derive(new)]
pub struct DeviceRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl DeviceRepository for DeviceRepositoryImpl {
    async fn create(&self, event: CreateDevice) -> AppResult<DeviceId> {
        let device_id = DeviceId::new();
        let res = sqlx::query(
            r#"
                INSERT INTO devices
                (device_id, device_name, device_brand, device_status, device_type)
                VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(device_id)
        .bind(&event.device_name)
        .bind(&event.device_brand)
        .bind(&event.device_status)
        .bind(&event.device_type)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No device record has been created".into(),
            ));
        }

        Ok(device_id)
    }

    async fn find_all(&self) -> AppResult<Vec<Device>> {
        let rows: Vec<DeviceRow> = sqlx::query_as(
            r#"
                SELECT
                    device_id, device_name, device_brand,
                    device_status, device_type, last_used_at
                FROM devices
                ORDER BY created_at DESC
            "#,
        )
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(rows.into_iter().map(Device::from).collect())
    }

    async fn find_by_id(&self, device_id: DeviceId) -> AppResult<Option<Device>> {
        let row: Option<DeviceRow> = sqlx::query_as(
            r#"
                SELECT
                    device_id, device_name, device_brand,
                    device_status, device_type, last_used_at
                FROM devices
                WHERE device_id = $1
            "#,
        )
        .bind(device_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(row.map(Device::from))
    }

    // デバイス情報の更新。
    // デバイス名を変更する場合は、この名前を複製して保持している
    // reservations.device_name も同一トランザクションで追従させる
    async fn update(&self, event: UpdateDevice) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let res = sqlx::query(
            r#"
                UPDATE devices
                SET
                    device_name = COALESCE($2, device_name),
                    device_brand = COALESCE($3, device_brand),
                    device_status = COALESCE($4, device_status),
                    device_type = COALESCE($5, device_type),
                    last_used_at = COALESCE($6, last_used_at),
                    updated_at = NOW()
                WHERE device_id = $1
            "#,
        )
        .bind(event.device_id)
        .bind(&event.device_name)
        .bind(&event.device_brand)
        .bind(&event.device_status)
        .bind(&event.device_type)
        .bind(event.last_used_at)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(format!(
                "デバイス（{}）が見つかりませんでした。",
                event.device_id
            )));
        }

        if let Some(device_name) = &event.device_name {
            sqlx::query("UPDATE reservations SET device_name = $2 WHERE device_id = $1")
                .bind(event.device_id)
                .bind(device_name)
                .execute(&mut *tx)
                .await
                .map_err(AppError::SpecificOperationError)?;
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(())
    }

    // デバイスの削除。
    // 依存する予約と通知予定も同一トランザクションで削除し、
    // 途中で失敗した場合は何も消えない。
    // 予約が残っているデバイスを削除してよいかの確認は呼び出し側の責務
    async fn delete(&self, event: DeleteDevice) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        sqlx::query(
            r#"
                DELETE FROM reservation_notifications
                WHERE reservation_id IN (
                    SELECT reservation_id FROM reservations WHERE device_id = $1
                )
            "#,
        )
        .bind(event.device_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        sqlx::query("DELETE FROM reservations WHERE device_id = $1")
            .bind(event.device_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

        let res = sqlx::query("DELETE FROM devices WHERE device_id = $1")
            .bind(event.device_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(format!(
                "デバイス（{}）が見つかりませんでした。",
                event.device_id
            )));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(())
    }
}
