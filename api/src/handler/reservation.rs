use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use garde::Validate;
use kernel::model::{
    id::ReservationId,
    notification::ReservationNotice,
    reservation::{
        event::{CreateReservation, DeleteReservation, DeviceTarget},
        period::ReservationPeriod,
        Reservation,
    },
};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::extractor::AuthorizedUser;
use crate::model::reservation::{
    CreateReservationRequest, ReservationListQuery, ReservationResponse, ReservationsResponse,
    UpdateReservationRequest, UpdateReservationRequestWithIds,
};

pub async fn create_reservation(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateReservationRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate(&())?;

    let now = Utc::now();
    let period = ReservationPeriod::new(req.start_time, req.end_time);
    period.validate(now)?;

    // ID があれば ID を優先する
    let target = match (req.device_id, req.device_name) {
        (Some(device_id), _) => DeviceTarget::ById(device_id),
        (None, Some(device_name)) => DeviceTarget::ByName(device_name),
        (None, None) => {
            return Err(AppError::UnprocessableEntity(
                "デバイスの ID か名前のいずれかを指定してください。".into(),
            ))
        }
    };

    let reservation = registry
        .reservation_repository()
        .create(CreateReservation::new(
            target,
            user.user.user_name.clone(),
            period,
            req.reason,
            now,
        ))
        .await?;

    schedule_notice(&registry, &reservation, user.user.email.clone()).await;

    Ok((
        StatusCode::CREATED,
        Json(ReservationResponse::from(reservation)),
    ))
}

// 通常は自分の予約のみ。show_all=true は管理者だけが使える
pub async fn show_reservation_list(
    user: AuthorizedUser,
    Query(query): Query<ReservationListQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ReservationsResponse>> {
    let reservations = if query.show_all {
        if !user.is_admin() {
            return Err(AppError::ForbiddenOperation);
        }
        registry.reservation_repository().find_all().await?
    } else {
        registry
            .reservation_repository()
            .find_by_user_name(&user.user.user_name)
            .await?
    };

    Ok(Json(ReservationsResponse::from(reservations)))
}

pub async fn show_reservation(
    _user: AuthorizedUser,
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ReservationResponse>> {
    let reservation = registry
        .reservation_repository()
        .find_by_id(reservation_id)
        .await?
        .ok_or_else(|| {
            AppError::EntityNotFound(format!(
                "予約（{reservation_id}）が見つかりませんでした。"
            ))
        })?;
    Ok(Json(ReservationResponse::from(reservation)))
}

// 予約内容の変更は管理者のみ
pub async fn update_reservation(
    user: AuthorizedUser,
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateReservationRequest>,
) -> AppResult<Json<ReservationResponse>> {
    if !user.is_admin() {
        return Err(AppError::ForbiddenOperation);
    }
    req.validate(&())?;

    let updated = registry
        .reservation_repository()
        .update(UpdateReservationRequestWithIds::new(reservation_id, user.id(), req).into())
        .await?;

    // 更新後の予約者に合わせて通知を取り直す
    match registry
        .user_repository()
        .find_by_name(&updated.user_name)
        .await
    {
        Ok(Some(owner)) => schedule_notice(&registry, &updated, owner.email).await,
        Ok(None) => {
            tracing::warn!(
                user_name = %updated.user_name,
                "reservation owner not found, skipping notification"
            );
        }
        Err(e) => {
            tracing::warn!(error = %e, "failed to look up reservation owner");
        }
    }

    Ok(Json(ReservationResponse::from(updated)))
}

// 本人または管理者のみが削除できる
pub async fn delete_reservation(
    user: AuthorizedUser,
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    let reservation = registry
        .reservation_repository()
        .find_by_id(reservation_id)
        .await?
        .ok_or_else(|| {
            AppError::EntityNotFound(format!(
                "予約（{reservation_id}）が見つかりませんでした。"
            ))
        })?;

    if !may_delete_reservation(&reservation, &user) {
        return Err(AppError::ForbiddenOperation);
    }

    registry
        .reservation_repository()
        .delete(DeleteReservation::new(reservation_id, user.id()))
        .await?;

    if let Err(e) = registry
        .notification_repository()
        .cancel(reservation_id)
        .await
    {
        tracing::warn!(
            error = %e,
            reservation_id = %reservation_id,
            "failed to cancel reservation notification"
        );
    }

    Ok(StatusCode::OK)
}

// 削除できるのは予約者本人と管理者のみ。
// この判定は削除の書き込みより前に行われる
fn may_delete_reservation(reservation: &Reservation, user: &AuthorizedUser) -> bool {
    reservation.user_name == user.user.user_name || user.is_admin()
}

// 通知のスケジュール失敗で予約操作自体を失敗させない
async fn schedule_notice(registry: &AppRegistry, reservation: &Reservation, recipient: String) {
    let notice = ReservationNotice::new(
        reservation.reservation_id,
        recipient,
        reservation.device_name.clone(),
        reservation.period.start_time,
        reservation.period.end_time,
        reservation.reason.clone(),
    );
    if let Err(e) = registry.notification_repository().schedule(notice).await {
        tracing::warn!(
            error = %e,
            reservation_id = %reservation.reservation_id,
            "failed to schedule reservation notification"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use kernel::model::{
        auth::AccessToken,
        id::{DeviceId, ReservationId, UserId},
        role::Role,
        user::User,
    };

    fn reservation_owned_by(user_name: &str) -> Reservation {
        let start = Utc.with_ymd_and_hms(2024, 4, 1, 10, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 4, 1, 11, 0, 0).unwrap();
        Reservation {
            reservation_id: ReservationId::new(),
            device_id: DeviceId::new(),
            device_name: "Laptop-A".into(),
            user_name: user_name.into(),
            period: ReservationPeriod::new(start, end),
            reason: "demo".into(),
            reserved_at: start,
        }
    }

    fn authorized(user_name: &str, role: Role) -> AuthorizedUser {
        AuthorizedUser {
            access_token: AccessToken("token".into()),
            user: User {
                user_id: UserId::new(),
                user_name: user_name.into(),
                email: format!("{user_name}@example.com"),
                role,
            },
        }
    }

    #[test]
    fn owner_and_admin_may_delete() {
        let reservation = reservation_owned_by("tanaka");
        assert!(may_delete_reservation(
            &reservation,
            &authorized("tanaka", Role::User)
        ));
        assert!(may_delete_reservation(
            &reservation,
            &authorized("suzuki", Role::Admin)
        ));
    }

    #[test]
    fn other_users_reservation_cannot_be_deleted_by_non_admin() {
        let reservation = reservation_owned_by("tanaka");
        assert!(!may_delete_reservation(
            &reservation,
            &authorized("suzuki", Role::User)
        ));
    }
}
