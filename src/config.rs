//! Application configuration loaded from environment variables.
//!
//! All configuration is loaded from environment variables with sensible defaults
//! for development. In production, configure via environment variables or a `.env` file.
//!
//! # Security Configuration
//!
//! - `API_KEY_HEADER`: Header whose presence gates `/api/products` (default: `x-api-key`)
//! - `AUTH_BYPASS_PATHS`: Comma-separated exact paths that skip the check (default: `/,/health`)
//! - `CORS_ALLOWED_ORIGINS`: Comma-separated list of allowed origins (default: `*` for dev)
//!
//! # Limits
//!
//! - `MAX_REQUEST_BODY_SIZE`: Largest JSON body accepted, in bytes (default: 100KB)

use std::env;
use std::net::SocketAddr;

use axum::http::HeaderName;

use crate::error::{AppError, AppResult};

/// Default header carrying the API key.
pub const DEFAULT_API_KEY_HEADER: &str = "x-api-key";

/// Default body limit, matching the usual 100KB JSON parser limit.
pub const DEFAULT_MAX_REQUEST_BODY_SIZE: usize = 100 * 1024;

/// Application configuration loaded from environment variables.
///
/// # Example
///
/// ```rust,ignore
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.server_addr());
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Server host address (default: "0.0.0.0")
    pub host: String,

    /// Server port (default: 3000)
    pub port: u16,

    /// Maximum request body size in bytes (default: 100KB)
    pub max_request_body_size: usize,

    // =========================================================================
    // Security Configuration
    // =========================================================================
    /// Header that must be present on protected routes (lowercase)
    pub api_key_header: String,

    /// Paths that bypass the API key check.
    /// Default: ["/", "/health"]
    pub auth_bypass_paths: Vec<String>,

    /// Allowed CORS origins, "*" allows all
    pub cors_allowed_origins: Vec<String>,

    // =========================================================================
    // Observability Configuration
    // =========================================================================
    /// Port for Prometheus metrics endpoint (default: 0 = disabled)
    pub metrics_port: u16,
}

impl Config {
    /// Load configuration from environment variables with sensible defaults.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if any configuration value is invalid
    /// (e.g., non-numeric PORT value, zero body limit).
    pub fn from_env() -> AppResult<Self> {
        // Load an .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let config = Self {
            // Server
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: Self::parse_env("PORT", 3000)?,
            max_request_body_size: Self::parse_env(
                "MAX_REQUEST_BODY_SIZE",
                DEFAULT_MAX_REQUEST_BODY_SIZE,
            )?,

            // Security
            api_key_header: env::var("API_KEY_HEADER")
                .ok()
                .map(|h| h.trim().to_ascii_lowercase())
                .filter(|h| !h.is_empty())
                .unwrap_or_else(|| DEFAULT_API_KEY_HEADER.to_string()),
            auth_bypass_paths: Self::parse_auth_bypass_paths(),
            cors_allowed_origins: Self::parse_cors_origins(),

            // Observability
            metrics_port: Self::parse_env("METRICS_PORT", 0)?,
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values for consistency and correctness.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if validation fails.
    pub fn validate(&self) -> AppResult<()> {
        if self.max_request_body_size == 0 {
            return Err(AppError::Config(
                "MAX_REQUEST_BODY_SIZE must be greater than 0".to_string(),
            ));
        }

        if HeaderName::from_bytes(self.api_key_header.as_bytes()).is_err() {
            return Err(AppError::Config(format!(
                "API_KEY_HEADER '{}' is not a valid header name",
                self.api_key_header
            )));
        }

        if let Some(path) = self.auth_bypass_paths.iter().find(|p| !p.starts_with('/')) {
            return Err(AppError::Config(format!(
                "AUTH_BYPASS_PATHS entry '{path}' must start with '/'"
            )));
        }

        Ok(())
    }

    /// Get the full server address for binding.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if Prometheus metrics export is enabled.
    pub fn metrics_enabled(&self) -> bool {
        self.metrics_port > 0
    }

    /// Get the metrics endpoint address.
    ///
    /// Returns `None` if metrics are disabled (port = 0).
    pub fn metrics_addr(&self) -> Option<SocketAddr> {
        self.metrics_enabled()
            .then(|| SocketAddr::from(([0, 0, 0, 0], self.metrics_port)))
    }

    /// Parse an environment variable into the specified type with a default value.
    fn parse_env<T>(name: &str, default: T) -> AppResult<T>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        match env::var(name) {
            Ok(val) => val
                .trim()
                .parse()
                .map_err(|e| AppError::Config(format!("Invalid {name}: {e}"))),
            Err(_) => Ok(default),
        }
    }

    /// Parse CORS allowed origins from environment variable.
    fn parse_cors_origins() -> Vec<String> {
        split_list(&env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string()))
    }

    /// Parse auth bypass paths from environment variable.
    ///
    /// Default: "/,/health" (welcome page and health probe)
    fn parse_auth_bypass_paths() -> Vec<String> {
        split_list(&env::var("AUTH_BYPASS_PATHS").unwrap_or_else(|_| "/,/health".to_string()))
    }
}

/// Split a comma-separated list, dropping blanks.
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Default configuration for testing and development.
///
/// Production deployments should use `Config::from_env()` instead.
impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            max_request_body_size: DEFAULT_MAX_REQUEST_BODY_SIZE,
            api_key_header: DEFAULT_API_KEY_HEADER.to_string(),
            auth_bypass_paths: vec!["/".to_string(), "/health".to_string()],
            cors_allowed_origins: vec!["*".to_string()],
            metrics_port: 0,
        }
    }
}
