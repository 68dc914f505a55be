//! Submission settings resolved once from [`AppConfig`] at startup

use super::settings::{AppConfig, RuntimeEnvironment};
use std::time::Duration;

/// Host fragment of the hosted preview deployment whose requests the
/// backend refuses cross-origin.
const RESTRICTED_DEPLOYMENT_MARKER: &str = "amplifyapp.com";

/// Known deployments, used for the `Origin` header sent to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentOrigin {
    Production,
    Staging,
    Development,
    Amplify,
}

impl DeploymentOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeploymentOrigin::Production => "https://bpsdynamic.com",
            DeploymentOrigin::Staging => "https://staging.bpsdynamic.com",
            DeploymentOrigin::Development => "http://localhost:3000",
            DeploymentOrigin::Amplify => "https://main.d31lum6mthi3md.amplifyapp.com",
        }
    }

    pub fn all() -> [DeploymentOrigin; 4] {
        [
            DeploymentOrigin::Production,
            DeploymentOrigin::Staging,
            DeploymentOrigin::Development,
            DeploymentOrigin::Amplify,
        ]
    }

    pub fn select(runtime_origin: &str, environment: RuntimeEnvironment) -> Self {
        if environment == RuntimeEnvironment::Test {
            return DeploymentOrigin::Development;
        }

        let origin = runtime_origin.to_ascii_lowercase();

        if origin.contains(RESTRICTED_DEPLOYMENT_MARKER) {
            DeploymentOrigin::Amplify
        } else if origin.contains("staging.") {
            DeploymentOrigin::Staging
        } else if origin.contains("localhost") || origin.contains("127.0.0.1") {
            DeploymentOrigin::Development
        } else if environment == RuntimeEnvironment::Production {
            DeploymentOrigin::Production
        } else {
            DeploymentOrigin::Development
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub mock_enabled: bool,
    pub timeout: Duration,
    pub retries: u32,
    pub cooldown: Duration,
    pub retry_backoff: Duration,
    pub mock_delay_min: Duration,
    pub mock_delay_max: Duration,
    pub origin: DeploymentOrigin,
    pub enforce_cors: bool,
}

impl ApiSettings {
    pub fn resolve(config: &AppConfig) -> Self {
        let environment = config.site.environment;
        let runtime_origin = config.site.runtime_origin.as_str();

        // The restricted deployment cannot reach the backend at all.
        let mock_enabled = if runtime_origin.contains(RESTRICTED_DEPLOYMENT_MARKER) {
            true
        } else {
            config
                .api
                .mock_enabled
                .unwrap_or_else(|| environment.is_development())
        };

        Self {
            base_url: config.api.base_url.trim_end_matches('/').to_string(),
            mock_enabled,
            timeout: Duration::from_millis(config.api.timeout_ms),
            retries: config.api.retries,
            cooldown: Duration::from_millis(config.api.cooldown_ms),
            retry_backoff: Duration::from_millis(config.api.retry_backoff_ms),
            mock_delay_min: Duration::from_millis(config.api.mock_delay_min_ms),
            mock_delay_max: Duration::from_millis(config.api.mock_delay_max_ms),
            origin: DeploymentOrigin::select(runtime_origin, environment),
            enforce_cors: config.api.enforce_cors,
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self::resolve(&AppConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_selection() {
        use RuntimeEnvironment::*;

        assert_eq!(
            DeploymentOrigin::select("https://main.d31lum6mthi3md.amplifyapp.com", Production),
            DeploymentOrigin::Amplify
        );
        assert_eq!(
            DeploymentOrigin::select("https://staging.bpsdynamic.com", Production),
            DeploymentOrigin::Staging
        );
        assert_eq!(
            DeploymentOrigin::select("http://127.0.0.1:8080", Production),
            DeploymentOrigin::Development
        );
        assert_eq!(
            DeploymentOrigin::select("https://bpsdynamic.com", Production),
            DeploymentOrigin::Production
        );
        assert_eq!(
            DeploymentOrigin::select("https://bpsdynamic.com", Development),
            DeploymentOrigin::Development
        );
        assert_eq!(
            DeploymentOrigin::select("https://main.d31lum6mthi3md.amplifyapp.com", Test),
            DeploymentOrigin::Development
        );
    }

    #[test]
    fn test_mock_defaults_follow_environment() {
        let mut config = AppConfig::default();
        assert!(ApiSettings::resolve(&config).mock_enabled);

        config.site.environment = RuntimeEnvironment::Production;
        config.site.runtime_origin = "https://bpsdynamic.com".to_string();
        assert!(!ApiSettings::resolve(&config).mock_enabled);

        config.api.mock_enabled = Some(true);
        assert!(ApiSettings::resolve(&config).mock_enabled);
    }

    #[test]
    fn test_restricted_deployment_forces_mock() {
        let mut config = AppConfig::default();
        config.site.environment = RuntimeEnvironment::Production;
        config.site.runtime_origin = "https://main.d31lum6mthi3md.amplifyapp.com".to_string();
        config.api.mock_enabled = Some(false);

        let settings = ApiSettings::resolve(&config);
        assert!(settings.mock_enabled);
        assert_eq!(settings.origin, DeploymentOrigin::Amplify);
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let mut config = AppConfig::default();
        config.api.base_url = "https://api.example.com/prod/".to_string();
        let settings = ApiSettings::resolve(&config);

        assert_eq!(settings.endpoint("/BookingForm"), "https://api.example.com/prod/BookingForm");
        assert_eq!(settings.timeout, Duration::from_millis(15_000));
        assert_eq!(settings.cooldown, Duration::from_millis(3_000));
    }
}
