pub mod auth;
pub mod device;
pub mod notification;
pub mod reservation;
pub mod user;
