//! Process configuration.
//!
//! Built once at startup and passed into constructors. Sources, lowest
//! precedence first:
//!
//! 1. built-in defaults
//! 2. `config/default.toml` (optional)
//! 3. `APP__*` environment variables (`APP__PORT`, `APP__WX__APPID`, ...)

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const CONFIG_FILE: &str = "config/default";
const DEFAULT_TOKEN_TTL_HOURS: i64 = 140;

/// WeChat mini-program credentials used for the login exchange.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct WxConfig {
    #[serde(default)]
    pub appid: String,
    #[serde(default)]
    pub secret: String,
    /// Base URL of the code exchange API.
    pub api_base: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub app_name: String,
    pub environment: String,
    /// Human-readable logs and verbose filters when set.
    pub debug: bool,
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    /// Open ids promoted to admin on login.
    #[serde(default)]
    pub admin_open_ids: Vec<String>,
    pub wx: WxConfig,
}

impl AppConfig {
    /// Load defaults, the optional config file and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::builder()?
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("admin_open_ids")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Built-in defaults only. Useful for tests and local tooling.
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::builder()?.build()?.try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("app_name", "storefront")?
            .set_default("environment", "development")?
            .set_default("debug", false)?
            .set_default("host", "0.0.0.0")?
            .set_default("port", 8080)?
            .set_default("database_url", "sqlite://storefront.db")?
            .set_default("jwt_secret", "dev-secret")?
            .set_default("token_ttl_hours", DEFAULT_TOKEN_TTL_HOURS)?
            .set_default("wx.appid", "")?
            .set_default("wx.secret", "")?
            .set_default("wx.api_base", "https://api.weixin.qq.com")
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.token_ttl_hours)
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
