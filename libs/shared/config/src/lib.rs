use std::env;
use tracing::warn;

/// How the running deployment should be treated for safety-gated features.
///
/// Production is asserted only by an explicit override flag or a build mode
/// that is exactly "production". A bare "prod" boolean from the environment
/// is not consulted: custom deployment modes have disagreed with it before.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentMode {
    Production,
    NonProduction,
}

impl DeploymentMode {
    pub fn from_signals(force_production: Option<bool>, build_mode: &str) -> Self {
        if force_production == Some(true) || build_mode == "production" {
            DeploymentMode::Production
        } else {
            DeploymentMode::NonProduction
        }
    }

    pub fn is_production(self) -> bool {
        matches!(self, DeploymentMode::Production)
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub practice_api_url: String,
    pub practice_api_key: String,
    pub build_mode: String,
    pub deployment_mode: DeploymentMode,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let build_mode = env::var("BUILD_MODE").unwrap_or_else(|_| {
            warn!("BUILD_MODE not set, assuming development");
            "development".to_string()
        });

        let force_production = env::var("FORCE_PRODUCTION")
            .ok()
            .map(|value| value == "true");

        let config = Self {
            practice_api_url: env::var("PRACTICE_API_URL").unwrap_or_else(|_| {
                warn!("PRACTICE_API_URL not set, using empty value");
                String::new()
            }),
            practice_api_key: env::var("PRACTICE_API_KEY").unwrap_or_else(|_| {
                warn!("PRACTICE_API_KEY not set, using empty value");
                String::new()
            }),
            deployment_mode: DeploymentMode::from_signals(force_production, &build_mode),
            build_mode,
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.practice_api_url.is_empty() && !self.practice_api_key.is_empty()
    }
}
