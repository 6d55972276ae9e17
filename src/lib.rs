use sqlx::PgPool;
use std::sync::Arc;

pub mod auth;
pub mod booking;
pub mod config;
pub mod handlers;
pub mod inventory;
pub mod lifecycle;
pub mod models;
pub mod notify;
pub mod routes;
pub mod utils;

use crate::notify::Notifier;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub notifier: Arc<dyn Notifier>,
}
