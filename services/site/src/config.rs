use std::net::SocketAddr;

use mamamia_pizza::client;
use mamamia_pizza::widget::{self, WidgetConfig};
use tracing::Level;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
    #[error(transparent)]
    Widget(#[from] widget::ConfigError),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub widget: WidgetConfig,
    pub voice: client::Config,
}

impl Config {
    /// Loads configuration from the environment, reading a `.env` file first
    /// if there is one:
    ///
    /// *   `BIND_ADDRESS`: address to serve on. Defaults to "0.0.0.0:3000".
    /// *   `RUST_LOG`: (Optional) The logging level. Defaults to "INFO".
    /// *   `VAPI_PUBLIC_KEY`, `VAPI_ASSISTANT_ID`, `VAPI_CONNECT_TIMEOUT_SECS`:
    ///     voice widget settings. A missing key is shown in the widget.
    /// *   `VAPI_BASE_URL`: (Optional) websocket base url of the voice service.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_address_str =
            lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let bind_address = parse_bind_address(&bind_address_str)?;

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let widget = WidgetConfig::from_lookup(&lookup)?;
        let voice = match lookup("VAPI_BASE_URL").filter(|v| !v.trim().is_empty()) {
            Some(base_url) => client::Config::builder().with_base_url(&base_url).build(),
            None => client::Config::new(),
        };

        Ok(Self {
            bind_address,
            log_level,
            widget,
            voice,
        })
    }

    pub fn with_bind_address(mut self, bind_address: SocketAddr) -> Self {
        self.bind_address = bind_address;
        self
    }
}

fn parse_bind_address(raw: &str) -> Result<SocketAddr, ConfigError> {
    raw.parse::<SocketAddr>()
        .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))
}
