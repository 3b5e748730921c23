pub mod asset;
pub mod attendance;
pub mod auth;
pub mod employee;
pub mod health;
