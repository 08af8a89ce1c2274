//! Per-site alert rule thresholds

use serde::{Deserialize, Serialize};

use super::forecast::PressureLevel;

/// Thresholds an hour is scored against. Speeds in m/s, precipitation in mm.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlertRuleConfig {
    pub min_wind_speed: f64,
    pub max_wind_speed: f64,
    pub max_gust: f64,

    /// Softer pair: wind at or above both flags the hour as blowing too much
    pub much_wind: f64,
    pub much_gust: f64,

    pub max_precipitation: f64,

    pub max_wind_speed_925hpa: f64,
    pub max_wind_speed_850hpa: f64,
    pub max_wind_speed_700hpa: f64,

    #[serde(default)]
    pub convective: ConvectiveLimits,
}

impl AlertRuleConfig {
    pub fn max_wind_speed_at(&self, level: PressureLevel) -> f64 {
        match level {
            PressureLevel::Hpa925 => self.max_wind_speed_925hpa,
            PressureLevel::Hpa850 => self.max_wind_speed_850hpa,
            PressureLevel::Hpa700 => self.max_wind_speed_700hpa,
        }
    }
}

impl Default for AlertRuleConfig {
    fn default() -> Self {
        Self {
            min_wind_speed: 0.0,
            max_wind_speed: 7.5,
            max_gust: 11.5,
            much_wind: 5.5,
            much_gust: 9.5,
            max_precipitation: 0.0,
            max_wind_speed_925hpa: 11.5,
            max_wind_speed_850hpa: 12.5,
            max_wind_speed_700hpa: 13.5,
            convective: ConvectiveLimits::default(),
        }
    }
}

/// Optional thermal-stability limits. `None` disables the check.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct ConvectiveLimits {
    /// CAPE at or above this fails the hour (J/kg)
    #[serde(default)]
    pub max_cape: Option<f64>,
    #[serde(default)]
    pub min_lifted_index: Option<f64>,
    #[serde(default)]
    pub max_lifted_index: Option<f64>,
    /// Convective inhibition at or below this fails the hour (J/kg)
    #[serde(default)]
    pub min_convective_inhibition: Option<f64>,
}

impl ConvectiveLimits {
    pub fn is_empty(&self) -> bool {
        self.max_cape.is_none()
            && self.min_lifted_index.is_none()
            && self.max_lifted_index.is_none()
            && self.min_convective_inhibition.is_none()
    }
}
