use chrono::{DateTime, Utc};
use derive_new::new;
use garde::Validate;
use kernel::model::{
    id::{DeviceId, ReservationId, UserId},
    reservation::{
        availability::{AvailabilitySlot, DeviceAvailability},
        event::UpdateReservation,
        Reservation,
    },
};
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationsResponse {
    pub items: Vec<ReservationResponse>,
}

impl From<Vec<Reservation>> for ReservationsResponse {
    fn from(value: Vec<Reservation>) -> Self {
        Self {
            items: value.into_iter().map(ReservationResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationResponse {
    pub reservation_id: ReservationId,
    pub device_id: DeviceId,
    pub device_name: String,
    pub user_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub reason: String,
    pub reserved_at: DateTime<Utc>,
}

impl From<Reservation> for ReservationResponse {
    fn from(value: Reservation) -> Self {
        let Reservation {
            reservation_id,
            device_id,
            device_name,
            user_name,
            period,
            reason,
            reserved_at,
        } = value;
        Self {
            reservation_id,
            device_id,
            device_name,
            user_name,
            start_time: period.start_time,
            end_time: period.end_time,
            reason,
            reserved_at,
        }
    }
}

/// デバイスは ID か名前のどちらかで指定する。
/// 名前指定の場合は同名デバイスのうち空いている 1 台が割り当てられる
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    #[garde(skip)]
    pub device_id: Option<DeviceId>,
    #[garde(inner(length(min = 1)))]
    pub device_name: Option<String>,
    #[garde(skip)]
    pub start_time: DateTime<Utc>,
    #[garde(skip)]
    pub end_time: DateTime<Utc>,
    #[garde(length(min = 1))]
    pub reason: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReservationRequest {
    #[garde(skip)]
    pub device_id: Option<DeviceId>,
    #[garde(inner(length(min = 1)))]
    pub device_name: Option<String>,
    #[garde(inner(length(min = 1)))]
    pub user_name: Option<String>,
    #[garde(skip)]
    pub start_time: Option<DateTime<Utc>>,
    #[garde(skip)]
    pub end_time: Option<DateTime<Utc>>,
    #[garde(inner(length(min = 1)))]
    pub reason: Option<String>,
}

#[derive(new)]
pub struct UpdateReservationRequestWithIds(ReservationId, UserId, UpdateReservationRequest);
impl From<UpdateReservationRequestWithIds> for UpdateReservation {
    fn from(value: UpdateReservationRequestWithIds) -> Self {
        let UpdateReservationRequestWithIds(
            reservation_id,
            requested_user,
            UpdateReservationRequest {
                device_id,
                device_name,
                user_name,
                start_time,
                end_time,
                reason,
            },
        ) = value;
        Self {
            reservation_id,
            device_id,
            device_name,
            user_name,
            start_time,
            end_time,
            reason,
            requested_user,
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReservationListQuery {
    #[serde(default)]
    pub show_all: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilitySlotResponse {
    pub start: DateTime<Utc>,
    // None は「以降ずっと空き」を表す
    pub end: Option<DateTime<Utc>>,
}

impl From<AvailabilitySlot> for AvailabilitySlotResponse {
    fn from(value: AvailabilitySlot) -> Self {
        let AvailabilitySlot { start, end } = value;
        Self { start, end }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceAvailabilityResponse {
    pub reservations: Vec<ReservationResponse>,
    pub available_slots: Vec<AvailabilitySlotResponse>,
}

impl From<DeviceAvailability> for DeviceAvailabilityResponse {
    fn from(value: DeviceAvailability) -> Self {
        let DeviceAvailability {
            reservations,
            slots,
        } = value;
        Self {
            reservations: reservations
                .into_iter()
                .map(ReservationResponse::from)
                .collect(),
            available_slots: slots
                .into_iter()
                .map(AvailabilitySlotResponse::from)
                .collect(),
        }
    }
}
