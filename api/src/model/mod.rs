pub mod auth;
pub mod device;
pub mod reservation;
pub mod user;
