use axum::{
    routing::{delete, get, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::user::{
    change_role, delete_user, get_current_user, list_users, register_user, update_user_profile,
};

pub fn build_user_routers() -> Router<AppRegistry> {
    let users_routers = Router::new()
        .route("/", post(register_user))
        .route("/", get(list_users))
        .route("/me", get(get_current_user))
        .route("/me", put(update_user_profile))
        .route("/:user_id/role", put(change_role))
        .route("/:user_id", delete(delete_user));

    Router::new().nest("/users", users_routers)
}
