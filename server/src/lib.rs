// server/src/lib.rs

//! HTTP front of the art catalog orders resource: auth gate, routing,
//! envelope shaping, Postgres persistence and new-order notifications.

pub mod config;
pub mod db;
pub mod errors;
pub mod services;
pub mod state;
pub mod web;

pub use crate::config::AppConfig;
pub use crate::errors::{AppError, Result};
pub use crate::state::AppState;
