use axum::{
    routing::{delete, get, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::device::{
    delete_device, register_device, show_device, show_device_availability, show_device_list,
    update_device,
};

pub fn build_device_routers() -> Router<AppRegistry> {
    let devices_routers = Router::new()
        .route("/", post(register_device))
        .route("/", get(show_device_list))
        .route("/:device_id", get(show_device))
        .route("/:device_id/availability", get(show_device_availability))
        .route("/:device_id", put(update_device))
        .route("/:device_id", delete(delete_device));

    Router::new().nest("/devices", devices_routers)
}
