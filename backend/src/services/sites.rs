//! Registry of configured flying sites

use std::collections::BTreeMap;

use chrono_tz::Tz;
use shared::{
    validate_alert_rule, validate_site_id, validate_window, AlertRuleConfig,
    SiteDirectionCapability, WindowConfig,
};

use crate::config::{EvaluationConfig, SiteConfig};
use crate::error::{AppError, AppResult};
use crate::models::SiteSummary;

/// A site with its timezone resolved and its settings checked
#[derive(Debug, Clone)]
pub struct Site {
    pub id: String,
    pub name: String,
    pub timezone: Tz,
    pub directions: SiteDirectionCapability,
    pub rule: AlertRuleConfig,
    pub window: WindowConfig,
}

impl Site {
    pub fn summary(&self) -> SiteSummary {
        SiteSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            timezone: self.timezone.name().to_string(),
            directions: self.directions.tags(),
            rule: self.rule.clone(),
            window: self.window,
        }
    }
}

/// Parse an IANA timezone name
pub fn parse_timezone(name: &str) -> AppResult<Tz> {
    name.parse::<Tz>()
        .map_err(|_| AppError::UnknownTimezone(name.to_string()))
}

/// Sites keyed by id, immutable after startup
#[derive(Debug, Clone, Default)]
pub struct SiteRegistry {
    sites: BTreeMap<String, Site>,
}

impl SiteRegistry {
    /// Build the registry, rejecting any site with invalid settings
    pub fn from_config(sites: &[SiteConfig], defaults: &EvaluationConfig) -> AppResult<Self> {
        let default_tz = parse_timezone(&defaults.default_timezone)
            .map_err(|e| AppError::Configuration(e.to_string()))?;
        validate_window(&defaults.window)
            .map_err(|msg| AppError::Configuration(format!("default window: {}", msg)))?;

        let mut registry = BTreeMap::new();
        for config in sites {
            let site = Self::resolve(config, default_tz, defaults)?;
            if registry.contains_key(&site.id) {
                return Err(AppError::Configuration(format!(
                    "duplicate site id: {}",
                    site.id
                )));
            }
            tracing::debug!(
                site_id = %site.id,
                timezone = %site.timezone.name(),
                directions = ?site.directions.tags(),
                "Registered site"
            );
            registry.insert(site.id.clone(), site);
        }

        Ok(Self { sites: registry })
    }

    fn resolve(config: &SiteConfig, default_tz: Tz, defaults: &EvaluationConfig) -> AppResult<Site> {
        let invalid = |msg: &str| AppError::Configuration(format!("site {}: {}", config.id, msg));

        validate_site_id(&config.id).map_err(invalid)?;
        validate_alert_rule(&config.rule).map_err(invalid)?;
        if config.directions.is_empty() {
            return Err(invalid("no launch directions configured"));
        }

        let window = config.window.unwrap_or(defaults.window);
        validate_window(&window).map_err(invalid)?;

        let timezone = match &config.timezone {
            Some(name) => parse_timezone(name).map_err(|e| invalid(&e.to_string()))?,
            None => default_tz,
        };

        Ok(Site {
            id: config.id.clone(),
            name: config.name.clone(),
            timezone,
            directions: config.directions.clone(),
            rule: config.rule.clone(),
            window,
        })
    }

    pub fn get(&self, id: &str) -> AppResult<&Site> {
        self.sites
            .get(id)
            .ok_or_else(|| AppError::NotFound(format!("Site {}", id)))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Site> {
        self.sites.values()
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}
