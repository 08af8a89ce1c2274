//! Configuration management for the Paragliding Alerts evaluation service
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with PGA__ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::{AlertRuleConfig, SiteDirectionCapability, SurfaceFallback, WindowConfig};

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Defaults applied to every evaluation
    pub evaluation: EvaluationConfig,

    /// Registered flying sites
    #[serde(default)]
    pub sites: Vec<SiteConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EvaluationConfig {
    /// IANA timezone used when a site or request does not name one
    pub default_timezone: String,

    /// Flyable window used when a site does not override it
    pub window: WindowConfig,

    /// Surface values for hours the short-range series does not cover
    pub surface_fallback: SurfaceFallback,

    /// Upper bound on hours accepted per series in one request
    pub max_hours_per_series: usize,

    /// Upper bound on sites in one batch request
    pub max_batch_sites: usize,
}

/// A flying site as written in the configuration file
#[derive(Debug, Deserialize, Clone)]
pub struct SiteConfig {
    pub id: String,
    pub name: String,

    /// IANA timezone name; falls back to `evaluation.default_timezone`
    #[serde(default)]
    pub timezone: Option<String>,

    /// Launch directions, as sector tags (`["n", "nw"]`)
    pub directions: SiteDirectionCapability,

    #[serde(default)]
    pub rule: AlertRuleConfig,

    #[serde(default)]
    pub window: Option<WindowConfig>,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("PGA_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("evaluation.default_timezone", "Europe/Oslo")?
            .set_default("evaluation.window.flyable_hours.start_hour", 8)?
            .set_default("evaluation.window.flyable_hours.end_hour", 20)?
            .set_default("evaluation.window.min_run_length", 3)?
            .set_default("evaluation.surface_fallback", "empty")?
            .set_default("evaluation.max_hours_per_series", 500)?
            .set_default("evaluation.max_batch_sites", 50)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (PGA__ prefix)
            .add_source(
                Environment::with_prefix("PGA")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            default_timezone: "Europe/Oslo".to_string(),
            window: WindowConfig::default(),
            surface_fallback: SurfaceFallback::default(),
            max_hours_per_series: 500,
            max_batch_sites: 50,
        }
    }
}
