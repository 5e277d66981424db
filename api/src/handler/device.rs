use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use garde::Validate;
use kernel::model::{device::event::DeleteDevice, id::DeviceId};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::extractor::AuthorizedUser;
use crate::model::device::{
    CreateDeviceRequest, DeleteDeviceQuery, DeviceResponse, DevicesResponse,
    UpdateDeviceRequest, UpdateDeviceRequestWithIds,
};
use crate::model::reservation::DeviceAvailabilityResponse;

pub async fn register_device(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateDeviceRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !user.is_admin() {
        return Err(AppError::ForbiddenOperation);
    }
    req.validate(&())?;

    let device_id = registry.device_repository().create(req.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "deviceId": device_id.to_string() })),
    ))
}

pub async fn show_device_list(
    _user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<DevicesResponse>> {
    registry
        .device_repository()
        .find_all()
        .await
        .map(DevicesResponse::from)
        .map(Json)
}

pub async fn show_device(
    _user: AuthorizedUser,
    Path(device_id): Path<DeviceId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<DeviceResponse>> {
    let device = registry
        .device_repository()
        .find_by_id(device_id)
        .await?
        .ok_or_else(|| {
            AppError::EntityNotFound(format!("デバイス（{device_id}）が見つかりませんでした。"))
        })?;
    Ok(Json(DeviceResponse::from(device)))
}

// 今後の予約一覧と、そこから導出した空き時間帯を返す
pub async fn show_device_availability(
    _user: AuthorizedUser,
    Path(device_id): Path<DeviceId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<DeviceAvailabilityResponse>> {
    registry
        .device_repository()
        .find_by_id(device_id)
        .await?
        .ok_or_else(|| {
            AppError::EntityNotFound(format!("デバイス（{device_id}）が見つかりませんでした。"))
        })?;

    registry
        .reservation_repository()
        .find_availability(device_id, Utc::now())
        .await
        .map(DeviceAvailabilityResponse::from)
        .map(Json)
}

pub async fn update_device(
    user: AuthorizedUser,
    Path(device_id): Path<DeviceId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateDeviceRequest>,
) -> AppResult<StatusCode> {
    if !user.is_admin() {
        return Err(AppError::ForbiddenOperation);
    }
    req.validate(&())?;

    // 最終使用日時に未来の時刻は指定できない
    if let Some(last_used_at) = req.last_used_at {
        if last_used_at > Utc::now() {
            return Err(AppError::UnprocessableEntity(
                "最終使用日時に未来の時刻は指定できません。".into(),
            ));
        }
    }

    registry
        .device_repository()
        .update(UpdateDeviceRequestWithIds::new(device_id, user.id(), req).into())
        .await?;
    Ok(StatusCode::OK)
}

// 予約が残っているデバイスの削除には confirm=true が必要。
// 確認済みの削除では残っている予約と通知予定も併せて消す
pub async fn delete_device(
    user: AuthorizedUser,
    Path(device_id): Path<DeviceId>,
    Query(query): Query<DeleteDeviceQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    if !user.is_admin() {
        return Err(AppError::ForbiddenOperation);
    }

    registry
        .device_repository()
        .find_by_id(device_id)
        .await?
        .ok_or_else(|| {
            AppError::EntityNotFound(format!("デバイス（{device_id}）が見つかりませんでした。"))
        })?;

    let reservations = registry
        .reservation_repository()
        .find_by_device_id(device_id)
        .await?;

    // 残っている予約と通知予定はリポジトリ側で同一トランザクション削除される
    if !reservations.is_empty() && !query.confirm {
        return Err(AppError::ResourceConflict(format!(
            "このデバイスには予約が {} 件残っています。削除するには confirm=true を指定してください。",
            reservations.len()
        )));
    }

    registry
        .device_repository()
        .delete(DeleteDevice {
            device_id,
            requested_user: user.id(),
        })
        .await?;
    Ok(StatusCode::OK)
}
