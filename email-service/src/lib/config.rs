use std::env;
use std::time::Duration;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

/// Application configuration for email-service.
///
/// Constructed once in `main` and handed to the components that need it;
/// nothing reads configuration from the environment after startup.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub inference: InferenceConfig,
}

/// PostgreSQL database configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

/// HTTP server configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
    /// Origins allowed by the CORS layer. Empty means no cross-origin access.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// Token signing configuration.
#[derive(Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_ttl_minutes")]
    pub default_ttl_minutes: i64,
    #[serde(default = "login_ttl_minutes")]
    pub login_ttl_minutes: i64,
}

/// Hosted text-generation endpoints.
#[derive(Clone, Deserialize)]
pub struct InferenceConfig {
    pub api_token: String,
    pub translation_url: String,
    pub formatting_url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_max_new_tokens")]
    pub max_new_tokens: u32,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("default_ttl_minutes", &self.default_ttl_minutes)
            .field("login_ttl_minutes", &self.login_ttl_minutes)
            .finish()
    }
}

impl std::fmt::Debug for InferenceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceConfig")
            .field("api_token", &"<redacted>")
            .field("translation_url", &self.translation_url)
            .field("formatting_url", &self.formatting_url)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("max_new_tokens", &self.max_new_tokens)
            .finish()
    }
}

impl InferenceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

fn default_max_connections() -> u32 {
    5
}

fn default_ttl_minutes() -> i64 {
    15
}

fn login_ttl_minutes() -> i64 {
    30
}

fn default_timeout_seconds() -> u64 {
    20
}

fn default_max_new_tokens() -> u32 {
    1024
}

impl Config {
    /// Load configuration from files with environment variable overrides.
    ///
    /// # Configuration Priority (highest to lowest)
    /// 1. Environment variables (JWT__SECRET, INFERENCE__API_TOKEN, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    ///
    /// # Errors
    /// Returns error if required values are missing, malformed or empty
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: INFERENCE__API_TOKEN=hf_... overrides inference.api_token
            .add_source(Environment::default().separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Reject configurations the service cannot start with.
    ///
    /// # Errors
    /// * `ConfigError::Message` - A secret is empty or a lifetime/timeout is not positive
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.trim().is_empty() {
            return Err(ConfigError::Message("jwt.secret must not be empty".into()));
        }
        if self.inference.api_token.trim().is_empty() {
            return Err(ConfigError::Message(
                "inference.api_token must not be empty".into(),
            ));
        }
        if self.jwt.default_ttl_minutes <= 0 || self.jwt.login_ttl_minutes <= 0 {
            return Err(ConfigError::Message(
                "jwt token lifetimes must be positive".into(),
            ));
        }
        if self.inference.timeout_seconds == 0 {
            return Err(ConfigError::Message(
                "inference.timeout_seconds must be positive".into(),
            ));
        }
        Ok(())
    }
}
