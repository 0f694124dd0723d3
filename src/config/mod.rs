//! Configuration Management
//!
//! Loads IRMAP configuration from TOML files.
//! Configuration includes:
//! - Analyzer settings (ML service endpoint, path, optional timeout)
//! - Bootstrap session seeds
//! - Log filter

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::errors::IrmapError;

/// Default address of the ML scoring service.
pub const DEFAULT_ANALYZER_ENDPOINT: &str = "http://127.0.0.1:5000";
/// Default path of the scoring route on the ML service.
pub const DEFAULT_ANALYZER_PATH: &str = "/analyze";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where and how to reach the ML scoring service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_path")]
    pub path: String,
    /// Whole-request timeout. Unset means the call waits until the service
    /// answers or the transport fails.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            path: default_path(),
            timeout_secs: None,
        }
    }
}

impl AnalyzerConfig {
    /// Full URL the asset is posted to.
    pub fn url(&self) -> String {
        format!("{}{}", self.endpoint.trim_end_matches('/'), self.path)
    }
}

fn default_endpoint() -> String {
    DEFAULT_ANALYZER_ENDPOINT.to_string()
}
fn default_path() -> String {
    DEFAULT_ANALYZER_PATH.to_string()
}

/// A token/username pair loaded into the session store at startup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSeed {
    pub token: String,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_seed")]
    pub seed: Vec<SessionSeed>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
        }
    }
}

fn default_seed() -> Vec<SessionSeed> {
    vec![SessionSeed {
        token: crate::session::BOOTSTRAP_TOKEN.to_string(),
        username: crate::session::BOOTSTRAP_USER.to_string(),
    }]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when neither RUST_LOG nor IRMAP_LOG is set
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

fn default_filter() -> String {
    "warn".to_string()
}

impl Config {
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut config = match path {
            Some(p) => {
                let content = std::fs::read_to_string(p).map_err(|e| {
                    IrmapError::Config(format!("Failed to read config from {}: {}", p, e))
                })?;
                parse_toml(&content, p)?
            }
            None => {
                let mut default_paths = vec![std::path::PathBuf::from("irmap.toml")];
                if let Some(home) = dirs::home_dir() {
                    default_paths.push(home.join(".config/irmap/config.toml"));
                }

                let mut loaded = None;
                for p in &default_paths {
                    if let Ok(content) = std::fs::read_to_string(p) {
                        tracing::debug!("Loading config from {}", p.display());
                        loaded = Some(parse_toml(&content, &p.display().to_string())?);
                        break;
                    }
                }
                loaded.unwrap_or_else(|| {
                    tracing::debug!("No config file found, using defaults");
                    Self::default()
                })
            }
        };

        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Override with environment variables
    fn apply_env_overrides(&mut self) -> std::result::Result<(), IrmapError> {
        if let Ok(endpoint) = std::env::var("IRMAP_ANALYZER_ENDPOINT") {
            self.analyzer.endpoint = endpoint;
        }
        if let Ok(path) = std::env::var("IRMAP_ANALYZER_PATH") {
            self.analyzer.path = path;
        }
        if let Ok(timeout) = std::env::var("IRMAP_ANALYZER_TIMEOUT") {
            self.analyzer.timeout_secs = Some(parse_timeout(&timeout)?);
        }
        if let Ok(filter) = std::env::var("IRMAP_LOG") {
            self.logging.filter = filter;
        }
        Ok(())
    }

    pub fn validate(&self) -> std::result::Result<(), IrmapError> {
        let parsed = url::Url::parse(&self.analyzer.endpoint).map_err(|e| {
            IrmapError::Config(format!(
                "analyzer.endpoint '{}' is not a valid URL: {}",
                self.analyzer.endpoint, e
            ))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(IrmapError::Config(format!(
                "analyzer.endpoint must use http or https, got '{}'",
                parsed.scheme()
            )));
        }
        if !self.analyzer.path.starts_with('/') {
            return Err(IrmapError::Config(format!(
                "analyzer.path must start with '/', got '{}'",
                self.analyzer.path
            )));
        }
        Ok(())
    }
}

fn parse_toml(content: &str, origin: &str) -> std::result::Result<Config, IrmapError> {
    toml::from_str(content)
        .map_err(|e| IrmapError::Config(format!("Failed to parse {}: {}", origin, e)))
}

/// Timeout in whole seconds. Anything else is a configuration error, never a
/// silent fallback to "no timeout".
fn parse_timeout(value: &str) -> std::result::Result<u64, IrmapError> {
    value.trim().parse::<u64>().map_err(|_| {
        IrmapError::Config(format!(
            "IRMAP_ANALYZER_TIMEOUT must be a whole number of seconds, got '{}'",
            value
        ))
    })
}
