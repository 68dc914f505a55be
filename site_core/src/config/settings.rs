use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub site: SiteConfig,
    pub api: ApiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Peers whose `X-Forwarded-For` header names the visitor. Empty means the
    /// socket peer is always the visitor.
    #[serde(default)]
    pub trusted_proxies: Vec<IpAddr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    Development,
    Production,
    Test,
}

impl RuntimeEnvironment {
    pub fn is_development(&self) -> bool {
        matches!(self, RuntimeEnvironment::Development)
    }
}

impl std::fmt::Display for RuntimeEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuntimeEnvironment::Development => write!(f, "development"),
            RuntimeEnvironment::Production => write!(f, "production"),
            RuntimeEnvironment::Test => write!(f, "test"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub environment: RuntimeEnvironment,
    /// Origin the site is being served from, e.g. `https://bpsdynamic.com`.
    pub runtime_origin: String,
    pub public_dir: PathBuf,
    pub sitemap_base_url: String,
}

/// Remote form backend settings. Durations are in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    /// Unset means "on in development, off elsewhere".
    pub mock_enabled: Option<bool>,
    pub timeout_ms: u64,
    pub retries: u32,
    pub cooldown_ms: u64,
    pub retry_backoff_ms: u64,
    pub mock_delay_min_ms: u64,
    pub mock_delay_max_ms: u64,
    pub enforce_cors: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            site: SiteConfig::default(),
            api: ApiConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            trusted_proxies: Vec::new(),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            environment: RuntimeEnvironment::Development,
            runtime_origin: "http://localhost:3000".to_string(),
            public_dir: PathBuf::from("./public"),
            sitemap_base_url: "https://bpsdynamic.com".to_string(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://tz6x8dtfzf.execute-api.eu-west-1.amazonaws.com/prod".to_string(),
            mock_enabled: None,
            timeout_ms: 15_000,
            retries: 2,
            cooldown_ms: 3_000,
            retry_backoff_ms: 1_000,
            mock_delay_min_ms: 500,
            mock_delay_max_ms: 1_000,
            enforce_cors: true,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .add_source(Config::try_from(&AppConfig::default())?);

        if std::path::Path::new("config.toml").exists() {
            builder = builder.add_source(File::with_name("config"));
        }

        builder = builder.add_source(
            Environment::with_prefix("BPS")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("server.trusted_proxies")
                .try_parsing(true),
        );

        let config = builder.build()?;
        let app_config: AppConfig = config.try_deserialize()?;

        app_config.validate()?;

        Ok(app_config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Message("Server port cannot be 0".to_string()));
        }

        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::Message(
                "API base URL cannot be empty".to_string(),
            ));
        }

        if self.api.timeout_ms == 0 {
            return Err(ConfigError::Message(
                "API timeout must be greater than 0".to_string(),
            ));
        }

        if self.api.mock_delay_min_ms > self.api.mock_delay_max_ms {
            return Err(ConfigError::Message(
                "Mock delay minimum cannot exceed the maximum".to_string(),
            ));
        }

        if self.site.sitemap_base_url.trim().is_empty() {
            return Err(ConfigError::Message(
                "Sitemap base URL cannot be empty".to_string(),
            ));
        }

        if self.site.environment == RuntimeEnvironment::Production
            && self.api.mock_enabled == Some(true)
        {
            tracing::warn!("Mock mode is enabled in production - form submissions will not reach the backend!");
        }

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.api.timeout_ms, 15_000);
        assert_eq!(config.api.retries, 2);
        assert_eq!(config.api.cooldown_ms, 3_000);
        assert!(config.api.mock_enabled.is_none());
        assert!(config.server.trusted_proxies.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = AppConfig::default();

        config.server.port = 0;
        assert!(config.validate().is_err());

        config = AppConfig::default();
        config.api.base_url = "  ".to_string();
        assert!(config.validate().is_err());

        config = AppConfig::default();
        config.api.timeout_ms = 0;
        assert!(config.validate().is_err());

        config = AppConfig::default();
        config.api.mock_delay_min_ms = 2_000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bind_address() {
        let config = AppConfig::default();
        assert_eq!(config.bind_address(), "127.0.0.1:3000");

        let mut config = AppConfig::default();
        config.server.host = "0.0.0.0".to_string();
        config.server.port = 8080;
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_config_loading() {
        let config = AppConfig::load().expect("Should load default configuration");

        assert!(config.server.port > 0);
        assert!(!config.api.base_url.is_empty());
        assert!(config.api.mock_delay_min_ms <= config.api.mock_delay_max_ms);
    }

    #[test]
    fn test_environment_serialization() {
        let json = serde_json::to_string(&RuntimeEnvironment::Production).unwrap();
        assert_eq!(json, "\"production\"");
        assert_eq!(RuntimeEnvironment::Test.to_string(), "test");
        assert!(RuntimeEnvironment::Development.is_development());
        assert!(!RuntimeEnvironment::Production.is_development());
    }
}
