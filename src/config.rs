//! Application configuration module
//!
//! Handles loading and validating configuration from environment variables.
//! All environment access happens here; the rest of the application receives
//! an explicit `Settings` value (the token codec in particular is constructed
//! from `AuthConfig`, never from ambient state).

use serde::Deserialize;
use std::net::Ipv4Addr;
use thiserror::Error;

/// Development-only signing secret, used when `JWT_SECRET` is absent outside
/// production.
pub const DEV_JWT_SECRET: &str = "vacancy-board-dev-secret-change-in-production";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Deployment environment, from `APP_ENV`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    fn from_env() -> Self {
        match std::env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            _ => Environment::Development,
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: Ipv4Addr,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Ipv4Addr::new(0, 0, 0, 0), // Bind to 0.0.0.0 for container deployments
            port: 3000,
        }
    }
}

/// Authentication configuration consumed by the token codec and cookie layer
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HMAC secret for token signatures
    pub jwt_secret: String,
    /// Fixed token lifetime, constant per deployment
    pub token_lifetime_hours: i64,
    /// Whether the session cookie carries the `Secure` flag
    pub cookie_secure: bool,
}

impl AuthConfig {
    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: DEV_JWT_SECRET.to_string(),
            token_lifetime_hours: 24,
            cookie_secure: false,
        }
    }
}

/// Bootstrap administrator seeded at startup
#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub email: String,
    pub password: String,
    pub name: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            email: "admin@vacancyboard.local".to_string(),
            password: "admin123".to_string(),
            name: "Admin".to_string(),
        }
    }
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["http://localhost:3001".to_string()],
        }
    }
}

/// Complete application settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub environment: Environment,
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub admin: AdminConfig,
    pub cors: CorsConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig::default(),
            auth: AuthConfig::default(),
            admin: AdminConfig::default(),
            cors: CorsConfig::default(),
        }
    }
}

impl Settings {
    /// Load settings from environment variables
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if it exists (ignore errors if file not found)
        let _ = dotenvy::dotenv();

        let environment = Environment::from_env();

        let server = ServerConfig {
            host: std::env::var("HOST")
                .ok()
                .and_then(|h| h.parse().ok())
                .unwrap_or_else(|| ServerConfig::default().host),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or_else(|| ServerConfig::default().port),
        };

        // Fail closed in production: a deployment without an explicit secret
        // must not start.
        let jwt_secret = match std::env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ if environment == Environment::Production => {
                return Err(ConfigError::MissingVar("JWT_SECRET".to_string()));
            }
            _ => DEV_JWT_SECRET.to_string(),
        };

        let token_lifetime_hours = std::env::var("TOKEN_LIFETIME_HOURS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or_else(|| AuthConfig::default().token_lifetime_hours);
        if token_lifetime_hours <= 0 {
            return Err(ConfigError::InvalidValue(
                "TOKEN_LIFETIME_HOURS must be a positive number of hours".to_string(),
            ));
        }

        let auth = AuthConfig {
            jwt_secret,
            token_lifetime_hours,
            cookie_secure: std::env::var("COOKIE_SECURE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(environment == Environment::Production),
        };

        let defaults = AdminConfig::default();
        let admin = AdminConfig {
            email: std::env::var("ADMIN_EMAIL").unwrap_or(defaults.email),
            password: std::env::var("ADMIN_PASSWORD").unwrap_or(defaults.password),
            name: std::env::var("ADMIN_NAME").unwrap_or(defaults.name),
        };

        let cors = CorsConfig {
            allowed_origins: std::env::var("ALLOWED_ORIGINS")
                .ok()
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_else(|| CorsConfig::default().allowed_origins),
        };

        Ok(Self {
            environment,
            server,
            auth,
            admin,
            cors,
        })
    }
}
