use std::env;
use std::time::Duration;

pub mod cors;
pub mod security;

pub use cors::create_cors_layer;
pub use security::security_headers;

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 3600;

pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub sweep_interval: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let sweep_interval_secs = env::var("LIFECYCLE_SWEEP_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_SWEEP_INTERVAL_SECS);

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost/eventhub".to_string()),
            port,
            sweep_interval: Duration::from_secs(sweep_interval_secs),
        }
    }
}
