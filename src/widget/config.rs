use std::time::Duration;

use mamamia_types::{AssistantConfig, StartTarget};
use secrecy::SecretString;

use crate::client::consts::{ASSISTANT_ID_ENV, CONNECT_TIMEOUT_ENV, PUBLIC_KEY_ENV};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Settings for the voice widget.
///
/// A missing public key is not a configuration error: the widget reports it
/// to the visitor and refuses to start calls until it is set.
#[derive(Debug, Clone, Default)]
pub struct WidgetConfig {
    public_key: Option<SecretString>,
    assistant_id: Option<String>,
    assistant: AssistantConfig,
    connect_timeout: Option<Duration>,
}

pub struct WidgetConfigBuilder {
    config: WidgetConfig,
}

impl WidgetConfigBuilder {
    pub fn with_public_key(mut self, public_key: &str) -> Self {
        self.config.public_key = Some(SecretString::from(public_key.to_string()));
        self
    }

    pub fn with_assistant_id(mut self, assistant_id: &str) -> Self {
        self.config.assistant_id = Some(assistant_id.to_string());
        self
    }

    /// Inline assistant used when no assistant id is set.
    pub fn with_assistant(mut self, assistant: AssistantConfig) -> Self {
        self.config.assistant = assistant;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = Some(timeout);
        self
    }

    pub fn build(self) -> WidgetConfig {
        self.config
    }
}

impl WidgetConfig {
    pub fn builder() -> WidgetConfigBuilder {
        WidgetConfigBuilder {
            config: WidgetConfig::default(),
        }
    }

    /// Reads `VAPI_PUBLIC_KEY`, `VAPI_ASSISTANT_ID` and
    /// `VAPI_CONNECT_TIMEOUT_SECS`. Blank values count as unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let connect_timeout = match non_blank(CONNECT_TIMEOUT_ENV) {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|e| {
                    ConfigError::InvalidValue(CONNECT_TIMEOUT_ENV.to_string(), e.to_string())
                })?;
                if secs == 0 {
                    return Err(ConfigError::InvalidValue(
                        CONNECT_TIMEOUT_ENV.to_string(),
                        "must be at least one second".to_string(),
                    ));
                }
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Self {
            public_key: non_blank(PUBLIC_KEY_ENV).map(SecretString::from),
            assistant_id: non_blank(ASSISTANT_ID_ENV),
            assistant: AssistantConfig::default(),
            connect_timeout,
        })
    }

    pub fn public_key(&self) -> Option<&SecretString> {
        self.public_key.as_ref()
    }

    pub fn has_public_key(&self) -> bool {
        self.public_key.is_some()
    }

    pub fn assistant_id(&self) -> Option<&str> {
        self.assistant_id.as_deref()
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout
    }

    /// The hosted assistant when one is configured, the inline one otherwise.
    pub fn start_target(&self) -> StartTarget {
        match &self.assistant_id {
            Some(id) => StartTarget::AssistantId(id.clone()),
            None => StartTarget::Inline(self.assistant.clone()),
        }
    }
}
