use crate::client::consts::{BASE_URL, BASE_URL_ENV};

#[derive(Debug, Clone)]
pub struct Config {
    base_url: String,
    capacity: usize,
}

pub struct ConfigBuilder {
    config: Config,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.config.base_url = base_url.to_string();
        self
    }

    /// Size of the event and frame buffers of each session.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.config.capacity = capacity.max(1);
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            capacity: 256,
        }
    }

    /// Defaults, with the base url taken from `VAPI_BASE_URL` when set.
    pub fn from_env() -> Self {
        let mut config = Self::new();
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            if !base_url.trim().is_empty() {
                config.base_url = base_url;
            }
        }
        config
    }

    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
