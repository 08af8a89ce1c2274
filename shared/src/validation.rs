//! Validation utilities for site configuration and upstream forecast values
//!
//! The scoring engine assumes its inputs already passed these checks.

use crate::models::{AlertRuleConfig, PrecipitationBand};
use crate::scoring::WindowConfig;

// ============================================================================
// Configuration Validations
// ============================================================================

/// Validate an alert rule's thresholds
pub fn validate_alert_rule(rule: &AlertRuleConfig) -> Result<(), &'static str> {
    let thresholds = [
        rule.min_wind_speed,
        rule.max_wind_speed,
        rule.max_gust,
        rule.much_wind,
        rule.much_gust,
        rule.max_precipitation,
        rule.max_wind_speed_925hpa,
        rule.max_wind_speed_850hpa,
        rule.max_wind_speed_700hpa,
    ];
    if thresholds.iter().any(|t| !t.is_finite()) {
        return Err("Alert rule thresholds must be finite numbers");
    }
    if thresholds.iter().any(|t| *t < 0.0) {
        return Err("Alert rule thresholds cannot be negative");
    }
    if rule.min_wind_speed > rule.max_wind_speed {
        return Err("Minimum wind speed cannot exceed maximum wind speed");
    }
    if rule.much_wind > rule.max_wind_speed {
        return Err("Much-wind threshold cannot exceed maximum wind speed");
    }
    if rule.much_gust > rule.max_gust {
        return Err("Much-gust threshold cannot exceed maximum gust");
    }

    let limits = &rule.convective;
    if let (Some(min), Some(max)) = (limits.min_lifted_index, limits.max_lifted_index) {
        if min > max {
            return Err("Minimum lifted index cannot exceed maximum lifted index");
        }
    }
    if limits.max_cape.is_some_and(|cape| cape < 0.0) {
        return Err("CAPE limit cannot be negative");
    }
    Ok(())
}

/// Validate a flyable window
pub fn validate_window(window: &WindowConfig) -> Result<(), &'static str> {
    let hours = window.flyable_hours;
    if hours.end_hour > 23 {
        return Err("Flyable window must end at or before hour 23");
    }
    if hours.start_hour > hours.end_hour {
        return Err("Flyable window must start before it ends");
    }
    if window.min_run_length == 0 {
        return Err("Minimum run length must be at least 1 hour");
    }
    if window.min_run_length as u32 > hours.len() {
        return Err("Minimum run length cannot exceed the flyable window");
    }
    Ok(())
}

/// Validate a site identifier (2-64 lowercase alphanumeric or hyphen)
pub fn validate_site_id(id: &str) -> Result<(), &'static str> {
    if id.len() < 2 {
        return Err("Site id must be at least 2 characters");
    }
    if id.len() > 64 {
        return Err("Site id must be at most 64 characters");
    }
    if !id
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err("Site id must be lowercase alphanumeric or hyphen only");
    }
    if id.starts_with('-') || id.ends_with('-') {
        return Err("Site id cannot start or end with a hyphen");
    }
    Ok(())
}

// ============================================================================
// Upstream Forecast Validations
// ============================================================================

/// Validate a wind-from direction in degrees
pub fn validate_wind_direction(degrees: f64) -> Result<(), &'static str> {
    if !degrees.is_finite() || !(0.0..=360.0).contains(&degrees) {
        return Err("Wind direction must be between 0 and 360 degrees");
    }
    Ok(())
}

/// Validate a wind or gust speed in m/s
pub fn validate_wind_speed(speed: f64) -> Result<(), &'static str> {
    if !speed.is_finite() || speed < 0.0 {
        return Err("Wind speed cannot be negative");
    }
    Ok(())
}

/// Validate an hourly precipitation band (mm)
pub fn validate_precipitation(band: &PrecipitationBand) -> Result<(), &'static str> {
    if [band.amount, band.min, band.max].iter().any(|v| !v.is_finite() || *v < 0.0) {
        return Err("Precipitation cannot be negative");
    }
    if band.min > band.max {
        return Err("Precipitation minimum cannot exceed maximum");
    }
    Ok(())
}

/// Validate a percentage such as cloud cover or precipitation probability
pub fn validate_percentage(value: f64) -> Result<(), &'static str> {
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err("Percentage must be between 0 and 100");
    }
    Ok(())
}
