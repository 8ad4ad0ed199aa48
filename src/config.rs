use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub assets: AssetsConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_address: String,
    /// Maximum request body size in bytes
    pub max_body_size: usize,
}

#[derive(Debug, Clone)]
pub struct AssetsConfig {
    /// Directory holding `index.html`, served at `/`
    pub template_dir: String,
    /// Directory served under `/static`
    pub static_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5839".to_string(),
            max_body_size: 16 * 1024 * 1024, // 16MiB
        }
    }
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            template_dir: "./templates".to_string(),
            static_dir: "./static".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let defaults = ServerConfig::default();

        let bind_address = std::env::var("BIND_ADDRESS").unwrap_or(defaults.bind_address);

        let max_body_size = std::env::var("MAX_BODY_SIZE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.max_body_size);

        let assets = AssetsConfig::default();
        let template_dir = std::env::var("TEMPLATE_DIR").unwrap_or(assets.template_dir);
        let static_dir = std::env::var("STATIC_DIR").unwrap_or(assets.static_dir);

        let config = Config {
            server: ServerConfig {
                bind_address,
                max_body_size,
            },
            assets: AssetsConfig {
                template_dir,
                static_dir,
            },
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.bind_address.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "BIND_ADDRESS cannot be empty".to_string(),
            ));
        }

        if self.server.max_body_size == 0 {
            return Err(ConfigError::ValidationError(
                "MAX_BODY_SIZE must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
