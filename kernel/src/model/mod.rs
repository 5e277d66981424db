pub mod auth;
pub mod device;
pub mod id;
pub mod notification;
pub mod reservation;
pub mod role;
pub mod user;
