//! Configuration module - environment-based configuration.

use std::env;
use std::sync::Arc;

use caseflow_core::StepAdvancer;
use caseflow_db::{DbConfig, DbContext};

use crate::auth::JwtKeys;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Server config
    pub host: String,
    pub port: u16,

    // Database
    pub database: DbConfig,

    // Auth
    pub jwt_secret: String,
    pub jwt_algorithm: String,
    pub token_expire_minutes: i64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let host = env::var("CASEFLOW_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("CASEFLOW_PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse()
            .unwrap_or(8000);

        Self {
            host,
            port,
            database: DbConfig::from_env(),
            jwt_secret: env::var("JWT_SECRET_KEY")
                .unwrap_or_else(|_| "change-this-in-prod".to_string()),
            jwt_algorithm: env::var("JWT_ALGORITHM").unwrap_or_else(|_| "HS256".to_string()),
            token_expire_minutes: env::var("JWT_ACCESS_TOKEN_EXPIRE_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(60),
        }
    }

    /// Get server bind address.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: DbContext,
    pub advancer: StepAdvancer,
    pub jwt: JwtKeys,
}

impl AppState {
    pub fn new(config: Config, db: DbContext) -> Self {
        let jwt = JwtKeys::new(
            config.jwt_secret.as_bytes(),
            &config.jwt_algorithm,
            config.token_expire_minutes,
        );
        let advancer = StepAdvancer::new(db.pool.clone());

        Self {
            config: Arc::new(config),
            db,
            advancer,
            jwt,
        }
    }
}
