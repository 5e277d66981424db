use crate::database::{model::reservation::ReservationRow, ConnectionPool};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use derive_new::new;
use kernel::model::{
    id::{DeviceId, ReservationId},
    reservation::{
        availability::{free_slots, DeviceAvailability},
        event::{CreateReservation, DeleteReservation, DeviceTarget, UpdateReservation},
        period::{first_available, ReservationPeriod},
        Reservation,
    },
};
use kernel::repository::reservation::ReservationRepository;
use shared::error::{AppError, AppResult};

#[derive(new)]
pub struct ReservationRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl ReservationRepository for ReservationRepositoryImpl {
    // 予約を作成する。
    // 空き確認と INSERT は同一の SERIALIZABLE トランザクションで行い、
    // 同時リクエストが同じ時間帯を確保してしまう余地をなくす
    async fn create(&self, event: CreateReservation) -> AppResult<Reservation> {
        let mut tx = self.db.begin().await?;
        self.set_transaction_serializable(&mut tx).await?;

        let (device_id, device_name) = match &event.target {
            // ID 指定：デバイスの存在確認のうえ空きを確認する
            DeviceTarget::ById(device_id) => {
                let device_name: Option<String> =
                    sqlx::query_scalar("SELECT device_name FROM devices WHERE device_id = $1")
                        .bind(device_id)
                        .fetch_optional(&mut *tx)
                        .await
                        .map_err(AppError::SpecificOperationError)?;

                let Some(device_name) = device_name else {
                    return Err(AppError::EntityNotFound(format!(
                        "デバイス（{device_id}）が見つかりませんでした。"
                    )));
                };
                if Self::has_conflict(&mut tx, *device_id, &event.period).await? {
                    return Err(AppError::ResourceConflict(
                        "指定の時間帯ではこのデバイスを予約できません。".into(),
                    ));
                }
                (*device_id, device_name)
            }
            // 名前指定：同名デバイスのうち空いている最初の 1 台に解決する
            DeviceTarget::ByName(device_name) => {
                let device_id =
                    Self::resolve_available_device(&mut tx, device_name, &event.period).await?;
                (device_id, device_name.clone())
            }
        };

        let reservation_id = ReservationId::new();
        let res = sqlx::query(
            r#"
                INSERT INTO reservations
                (reservation_id, device_id, device_name, user_name,
                start_time, end_time, reason, reserved_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(reservation_id)
        .bind(device_id)
        .bind(&device_name)
        .bind(&event.user_name)
        .bind(event.period.start_time)
        .bind(event.period.end_time)
        .bind(&event.reason)
        .bind(event.reserved_at)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No reservation record has been created".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(Reservation {
            reservation_id,
            device_id,
            device_name,
            user_name: event.user_name,
            period: event.period,
            reason: event.reason,
            reserved_at: event.reserved_at,
        })
    }

    async fn find_all(&self) -> AppResult<Vec<Reservation>> {
        let rows: Vec<ReservationRow> = sqlx::query_as(
            r#"
                SELECT
                    reservation_id, device_id, device_name, user_name,
                    start_time, end_time, reason, reserved_at
                FROM reservations
                ORDER BY start_time ASC
            "#,
        )
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(rows.into_iter().map(Reservation::from).collect())
    }

    async fn find_by_user_name(&self, user_name: &str) -> AppResult<Vec<Reservation>> {
        let rows: Vec<ReservationRow> = sqlx::query_as(
            r#"
                SELECT
                    reservation_id, device_id, device_name, user_name,
                    start_time, end_time, reason, reserved_at
                FROM reservations
                WHERE user_name = $1
                ORDER BY start_time ASC
            "#,
        )
        .bind(user_name)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(rows.into_iter().map(Reservation::from).collect())
    }

    async fn find_by_id(
        &self,
        reservation_id: ReservationId,
    ) -> AppResult<Option<Reservation>> {
        let row: Option<ReservationRow> = sqlx::query_as(
            r#"
                SELECT
                    reservation_id, device_id, device_name, user_name,
                    start_time, end_time, reason, reserved_at
                FROM reservations
                WHERE reservation_id = $1
            "#,
        )
        .bind(reservation_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(row.map(Reservation::from))
    }

    async fn find_by_device_id(&self, device_id: DeviceId) -> AppResult<Vec<Reservation>> {
        let rows: Vec<ReservationRow> = sqlx::query_as(
            r#"
                SELECT
                    reservation_id, device_id, device_name, user_name,
                    start_time, end_time, reason, reserved_at
                FROM reservations
                WHERE device_id = $1
                ORDER BY start_time ASC
            "#,
        )
        .bind(device_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(rows.into_iter().map(Reservation::from).collect())
    }

    // now より後に開始する予約だけを空き時間帯の計算対象にする。
    // 進行中の予約は対象外（now 時点は空きとして扱う）
    async fn find_availability(
        &self,
        device_id: DeviceId,
        now: DateTime<Utc>,
    ) -> AppResult<DeviceAvailability> {
        let rows: Vec<ReservationRow> = sqlx::query_as(
            r#"
                SELECT
                    reservation_id, device_id, device_name, user_name,
                    start_time, end_time, reason, reserved_at
                FROM reservations
                WHERE device_id = $1 AND start_time > $2
                ORDER BY start_time ASC
            "#,
        )
        .bind(device_id)
        .bind(now)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        let reservations: Vec<Reservation> =
            rows.into_iter().map(Reservation::from).collect();
        let periods: Vec<ReservationPeriod> =
            reservations.iter().map(|r| r.period).collect();
        let slots = free_slots(now, &periods);

        Ok(DeviceAvailability {
            reservations,
            slots,
        })
    }

    // 管理者による予約の更新。
    // フィールドごとの検証をすべて通過してから 1 回の UPDATE で確定し、
    // 途中で失敗した場合は何も書き込まない
    async fn update(&self, event: UpdateReservation) -> AppResult<Reservation> {
        let mut tx = self.db.begin().await?;
        self.set_transaction_serializable(&mut tx).await?;

        let existing: Option<ReservationRow> = sqlx::query_as(
            r#"
                SELECT
                    reservation_id, device_id, device_name, user_name,
                    start_time, end_time, reason, reserved_at
                FROM reservations
                WHERE reservation_id = $1
                FOR UPDATE
            "#,
        )
        .bind(event.reservation_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        let Some(existing) = existing else {
            return Err(AppError::EntityNotFound(format!(
                "予約（{}）が見つかりませんでした。",
                event.reservation_id
            )));
        };

        // ① 理由
        let reason = event.reason.unwrap_or(existing.reason);

        // ② ユーザー名（存在確認のみ）
        let user_name = match event.user_name {
            Some(user_name) => {
                let exists: Option<i32> =
                    sqlx::query_scalar("SELECT 1 FROM users WHERE user_name = $1")
                        .bind(&user_name)
                        .fetch_optional(&mut *tx)
                        .await
                        .map_err(AppError::SpecificOperationError)?;
                if exists.is_none() {
                    return Err(AppError::EntityNotFound(format!(
                        "ユーザー（{user_name}）が存在しません。"
                    )));
                }
                user_name
            }
            None => existing.user_name,
        };

        // ③ 時間帯。片方だけ指定された場合は既存の値と組み合わせて検証する
        let period = ReservationPeriod::new(
            event.start_time.unwrap_or(existing.start_time),
            event.end_time.unwrap_or(existing.end_time),
        );
        if event.start_time.is_some() || event.end_time.is_some() {
            period.validate(Utc::now())?;
        }

        // ④ デバイス名：更新後の時間帯で空いている同名デバイスに解決する
        let (mut device_id, mut device_name) = (existing.device_id, existing.device_name);
        if let Some(name) = event.device_name {
            device_id = Self::resolve_available_device(&mut tx, &name, &period).await?;
            device_name = name;
        }

        // ⑤ デバイス ID：存在確認のうえ空きを確認する。
        // 空き確認は全予約が対象。更新対象の予約自身も衝突として数える
        if let Some(id) = event.device_id {
            let name: Option<String> =
                sqlx::query_scalar("SELECT device_name FROM devices WHERE device_id = $1")
                    .bind(id)
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(AppError::SpecificOperationError)?;
            let Some(name) = name else {
                return Err(AppError::EntityNotFound(format!(
                    "デバイス（{id}）が存在しません。"
                )));
            };
            if Self::has_conflict(&mut tx, id, &period).await? {
                return Err(AppError::ResourceConflict(
                    "指定の時間帯ではこのデバイスを予約できません。".into(),
                ));
            }
            device_id = id;
            device_name = name;
        }

        let res = sqlx::query(
            r#"
                UPDATE reservations
                SET
                    device_id = $2,
                    device_name = $3,
                    user_name = $4,
                    start_time = $5,
                    end_time = $6,
                    reason = $7
                WHERE reservation_id = $1
            "#,
        )
        .bind(event.reservation_id)
        .bind(device_id)
        .bind(&device_name)
        .bind(&user_name)
        .bind(period.start_time)
        .bind(period.end_time)
        .bind(&reason)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No reservation record has been updated".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(Reservation {
            reservation_id: event.reservation_id,
            device_id,
            device_name,
            user_name,
            period,
            reason,
            reserved_at: existing.reserved_at,
        })
    }

    async fn delete(&self, event: DeleteReservation) -> AppResult<()> {
        let res = sqlx::query("DELETE FROM reservations WHERE reservation_id = $1")
            .bind(event.reservation_id)
            .execute(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(format!(
                "予約（{}）が見つかりませんでした。",
                event.reservation_id
            )));
        }

        Ok(())
    }
}

impl ReservationRepositoryImpl {
    // 空き確認と書き込みの間に他のリクエストが割り込まないよう
    // トランザクション分離レベルを SERIALIZABLE に設定する
    async fn set_transaction_serializable(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> AppResult<()> {
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut **tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        Ok(())
    }

    // 指定時間帯に衝突する予約が 1 件でもあれば true。
    // 衝突条件は start_time <= 新予約の終了 かつ end_time >= 新予約の開始。
    // 端点が一致するだけでも衝突となる（厳密な不等号を崩さないこと）
    async fn has_conflict(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        device_id: DeviceId,
        period: &ReservationPeriod,
    ) -> AppResult<bool> {
        let conflict: Option<ReservationId> = sqlx::query_scalar(
            r#"
                SELECT reservation_id
                FROM reservations
                WHERE device_id = $1
                  AND start_time <= $3
                  AND end_time >= $2
                LIMIT 1
            "#,
        )
        .bind(device_id)
        .bind(period.start_time)
        .bind(period.end_time)
        .fetch_optional(&mut **tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(conflict.is_some())
    }

    // 同名デバイスを列挙し、指定時間帯に空いている最初の 1 台を返す。
    // 取得順は実装依存であり、同名デバイスのどれが選ばれるかに
    // 依存してはならない
    async fn resolve_available_device(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        device_name: &str,
        period: &ReservationPeriod,
    ) -> AppResult<DeviceId> {
        let candidates: Vec<DeviceId> =
            sqlx::query_scalar("SELECT device_id FROM devices WHERE device_name = $1")
                .bind(device_name)
                .fetch_all(&mut **tx)
                .await
                .map_err(AppError::SpecificOperationError)?;

        if candidates.is_empty() {
            return Err(AppError::EntityNotFound(format!(
                "{device_name} という名前のデバイスが見つかりませんでした。"
            )));
        }

        let mut schedules = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let rows: Vec<(DateTime<Utc>, DateTime<Utc>)> = sqlx::query_as(
                "SELECT start_time, end_time FROM reservations WHERE device_id = $1",
            )
            .bind(candidate)
            .fetch_all(&mut **tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
            let existing = rows
                .into_iter()
                .map(|(start_time, end_time)| ReservationPeriod::new(start_time, end_time))
                .collect();
            schedules.push((candidate, existing));
        }

        first_available(&schedules, period).ok_or_else(|| {
            AppError::ResourceConflict(
                "指定の名前のデバイスには指定時間帯の空きがありません。".into(),
            )
        })
    }
}
