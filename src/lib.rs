//! Employee attendance tracking service.
//!
//! Employees punch in and out by employee ID, HR approves or rejects finished
//! shifts, and employees file asset requests. The lifecycle rules live in
//! [`domain`]; [`store`] provides the MySQL and in-memory persistence behind
//! one trait; [`api`] and [`routes`] expose everything over actix-web.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod docs;
pub mod domain;
pub mod error;
pub mod model;
pub mod routes;
pub mod store;
