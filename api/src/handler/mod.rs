pub mod auth;
pub mod device;
pub mod health;
pub mod reservation;
pub mod user;
