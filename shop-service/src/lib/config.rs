use std::env;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    pub mail: MailConfig,
    pub links: LinksConfig,
    pub uploads: UploadsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: i64,
}

/// Product listing cache.
///
/// Without a `url` the service falls back to an in-process store.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct CacheConfig {
    pub url: Option<String>,
    pub ttl_seconds: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub from_address: String,
    #[serde(default)]
    pub notify_on_login: bool,
}

/// Base URLs embedded in emailed links.
///
/// Verification links point at this server, reset links at the client app.
#[derive(Debug, Deserialize, Clone)]
pub struct LinksConfig {
    pub verify_email_base_url: String,
    pub reset_password_base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UploadsConfig {
    pub directory: String,
    #[serde(default = "default_max_upload_bytes")]
    pub max_bytes: usize,
}

fn default_max_connections() -> u32 {
    5
}

fn default_max_upload_bytes() -> usize {
    2 * 1024 * 1024
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, CACHE__URL, MAIL__SMTP_HOST, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: CACHE__URL=redis://... overrides cache.url
            .add_source(Environment::with_prefix("").separator("__"))
            .build()?;

        configuration.try_deserialize()
    }
}
