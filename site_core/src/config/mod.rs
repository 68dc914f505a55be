//! Application configuration

pub mod api;
pub mod settings;

pub use api::{ApiSettings, DeploymentOrigin};
pub use settings::{ApiConfig, AppConfig, RuntimeEnvironment, ServerConfig, SiteConfig};
