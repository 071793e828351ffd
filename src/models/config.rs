use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Runtime configuration of the storefront server.
///
/// Loaded from `config/default.yaml`, an optional `config/{APP_ENV}.yaml`
/// overlay and `APP_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    /// Path of the SQLite database file.
    pub database_url: String,
    /// Key material for the session and flash-message cookies (at least 64 bytes).
    pub secret: String,
    pub templates_dir: String,
    pub static_dir: String,
    /// Public URL prefix under which stored images are served.
    pub media_url: String,
    /// Where anonymous users are sent to sign in.
    pub login_url: String,
    /// Marks the session cookie `Secure`; turn on when served over HTTPS.
    #[serde(default)]
    pub secure_cookies: bool,
}

impl ServerConfig {
    /// Reads `config/default.yaml`, then `config/{APP_ENV}.yaml`, then `APP_*`
    /// environment variables; later sources win.
    pub fn load() -> Result<Self, ConfigError> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "local".into());

        Config::builder()
            .add_source(File::with_name("config/default"))
            .add_source(File::with_name(&format!("config/{app_env}")).required(false))
            .add_source(Environment::with_prefix("APP"))
            .build()?
            .try_deserialize()
    }
}
