#![doc = "The `tasklite` library crate."]
#![doc = ""]
#![doc = "A task management REST API over SQLite: accounts with bcrypt-hashed passwords,"]
#![doc = "bearer tokens, and per-user task CRUD. The binary (`main.rs`) loads `Config`,"]
#![doc = "opens the pool and mounts `routes::config`."]

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;

pub use crate::config::{AuthSettings, Config};
pub use crate::error::AppError;
