use thiserror::Error;

use crate::guard::RouteTable;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub auth: AuthConfig,
    pub node: NodeConfig,
    pub routes: RouteTable,
    /// Seed the demo directory on an empty store. Must never be true in
    /// production.
    pub seed_demo: bool,
    pub sessions: SessionConfig,
}

#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub bind_address: String,
    pub data_dir: String,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// The one email allowed to log in as admin
    pub admin_email: String,
    /// Validity window of the short-lived identity token (seconds)
    pub identity_token_ttl_seconds: u64,
    /// HMAC secret for identity token signing
    pub token_secret: String,
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub cleanup_interval_seconds: u64,
    /// Mark the session cookie `Secure` (set in production)
    pub secure_cookies: bool,
    pub session_ttl_seconds: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cleanup_interval_seconds: 60,
            secure_cookies: false,
            session_ttl_seconds: 432_000, // 5 days
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let bind_address =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let data_dir = std::env::var("DATA_DIR").unwrap_or_else(|_| "./data".to_string());

        let token_secret = std::env::var("TOKEN_SECRET").map_err(|_| {
            ConfigError::ValidationError("TOKEN_SECRET must be set".to_string())
        })?;

        let admin_email =
            std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@edutraq.com".to_string());

        let identity_token_ttl_seconds = std::env::var("IDENTITY_TOKEN_TTL_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(300);

        let session_ttl_seconds = std::env::var("SESSION_TTL_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(432_000);

        let cleanup_interval_seconds = std::env::var("CLEANUP_INTERVAL_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(60);

        let secure_cookies = std::env::var("SECURE_COOKIES")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        let seed_demo = std::env::var("SEED_DEMO")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        let routes = match std::env::var("ROUTE_TABLE") {
            Ok(path) => {
                let raw = std::fs::read_to_string(&path).map_err(|e| {
                    ConfigError::ValidationError(format!(
                        "Failed to read route table {path}: {e}"
                    ))
                })?;
                serde_json::from_str(&raw).map_err(|e| {
                    ConfigError::ValidationError(format!(
                        "Failed to parse route table {path}: {e}"
                    ))
                })?
            }
            Err(_) => RouteTable::default(),
        };

        let config = Config {
            auth: AuthConfig {
                admin_email,
                identity_token_ttl_seconds,
                token_secret,
            },
            node: NodeConfig {
                bind_address,
                data_dir,
            },
            routes,
            seed_demo,
            sessions: SessionConfig {
                cleanup_interval_seconds,
                secure_cookies,
                session_ttl_seconds,
            },
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.token_secret.is_empty() {
            return Err(ConfigError::ValidationError(
                "TOKEN_SECRET cannot be empty".to_string(),
            ));
        }
        if self.auth.token_secret.len() < 32 {
            tracing::warn!(
                "TOKEN_SECRET is shorter than 32 bytes; use a longer random secret in production"
            );
        }

        if !self.auth.admin_email.contains('@') {
            return Err(ConfigError::ValidationError(format!(
                "ADMIN_EMAIL '{}' is not an email address",
                self.auth.admin_email
            )));
        }

        if self.sessions.session_ttl_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "SESSION_TTL_SECONDS must be greater than 0".to_string(),
            ));
        }
        if self.auth.identity_token_ttl_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "IDENTITY_TOKEN_TTL_SECONDS must be greater than 0".to_string(),
            ));
        }

        if self.routes.rules.is_empty() {
            return Err(ConfigError::ValidationError(
                "Route table has no rules; every path would be public".to_string(),
            ));
        }

        Ok(())
    }
}
