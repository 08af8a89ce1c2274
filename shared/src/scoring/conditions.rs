//! Condition evaluator
//!
//! Scores one merged hour against a site's flyable directions and alert rule.
//! Every check runs independently and appends to the failure or warning list;
//! an hour is promising when no failure was recorded. Warnings never change
//! the verdict.

use crate::models::sky::is_acceptable_sky_code;
use crate::models::{
    AlertRuleConfig, EvaluatedHour, FailureReason, MergedHourlyRecord, MinimalForecast,
    SiteDirectionCapability, WarningReason,
};

/// Below this speed (m/s) an upper level cannot shear the glide path
pub const SHEAR_MIN_WIND_SPEED: f64 = 4.0;

/// Largest surface-to-altitude direction change still considered acceptable
pub const MAX_SHEAR_DEG: f64 = 90.0;

/// Absolute difference between two compass directions, normalised to 0..=180
pub fn angular_difference(a_deg: f64, b_deg: f64) -> f64 {
    let difference = (a_deg - b_deg).abs().rem_euclid(360.0);
    if difference > 180.0 {
        360.0 - difference
    } else {
        difference
    }
}

/// Whether the wind at one altitude lines up well enough with the surface wind
pub fn is_wind_shear_acceptable(
    surface_direction: f64,
    altitude_direction: f64,
    altitude_wind_speed: f64,
) -> bool {
    if altitude_wind_speed < SHEAR_MIN_WIND_SPEED {
        return true;
    }
    angular_difference(surface_direction, altitude_direction) <= MAX_SHEAR_DEG
}

/// Fields shared by full merged hours and map-marker forecasts
struct SurfaceView<'a> {
    is_day: bool,
    sky_code: &'a str,
    wind_speed: f64,
    wind_direction: f64,
    wind_gusts: Option<f64>,
}

impl<'a> From<&'a MergedHourlyRecord> for SurfaceView<'a> {
    fn from(record: &'a MergedHourlyRecord) -> Self {
        Self {
            is_day: record.is_day,
            sky_code: &record.sky_code,
            wind_speed: record.wind_speed,
            wind_direction: record.wind_direction,
            wind_gusts: record.wind_gusts,
        }
    }
}

impl<'a> From<&'a MinimalForecast> for SurfaceView<'a> {
    fn from(forecast: &'a MinimalForecast) -> Self {
        Self {
            is_day: forecast.is_day,
            sky_code: &forecast.sky_code,
            wind_speed: forecast.wind_speed,
            wind_direction: forecast.wind_direction,
            wind_gusts: forecast.wind_gusts,
        }
    }
}

fn check_surface(
    surface: &SurfaceView<'_>,
    directions: &SiteDirectionCapability,
    rule: &AlertRuleConfig,
    failures: &mut Vec<FailureReason>,
) {
    if !surface.is_day {
        failures.push(FailureReason::Dark);
    }

    if surface.is_day && !is_acceptable_sky_code(surface.sky_code) {
        failures.push(FailureReason::BadWeather);
    }

    // Empty capability fails closed
    if directions.is_empty() || !directions.allows(surface.wind_direction) {
        failures.push(FailureReason::WrongWindDirection);
    }

    let is_max_wind = surface.wind_speed > rule.max_wind_speed;
    if surface.wind_speed < rule.min_wind_speed {
        failures.push(FailureReason::TooLittleWind);
    }
    if is_max_wind {
        failures.push(FailureReason::TooMuchWind);
    }

    if let Some(gusts) = surface.wind_gusts {
        let is_max_gust = gusts > rule.max_gust;
        if is_max_gust && !is_max_wind {
            failures.push(FailureReason::TooMuchInGusts);
        }

        let is_much_wind = surface.wind_speed >= rule.much_wind;
        let is_much_gust = gusts >= rule.much_gust;
        if is_much_wind && is_much_gust && !is_max_gust && !is_max_wind {
            failures.push(FailureReason::BlowingTooMuch);
        }
    }
}

fn check_precipitation(
    record: &MergedHourlyRecord,
    rule: &AlertRuleConfig,
    failures: &mut Vec<FailureReason>,
    warnings: &mut Vec<WarningReason>,
) {
    let band = &record.precipitation;
    if band.min > rule.max_precipitation {
        failures.push(FailureReason::Raining);
    } else if band.max > rule.max_precipitation {
        warnings.push(WarningReason::RainPossible);
    }
}

/// Warn about the lowest level whose wind exceeds its limit, if any.
fn check_upper_air_speed(
    record: &MergedHourlyRecord,
    rule: &AlertRuleConfig,
    warnings: &mut Vec<WarningReason>,
) {
    let too_windy = record
        .upper_air
        .iter()
        .find(|(level, wind)| wind.wind_speed > rule.max_wind_speed_at(*level));

    if let Some((level, wind)) = too_windy {
        warnings.push(WarningReason::StrongWindAloft {
            level,
            height_m: wind.geopotential_height,
        });
    }
}

/// Warn about the lowest level whose direction departs too far from the surface wind.
fn check_wind_shear(record: &MergedHourlyRecord, warnings: &mut Vec<WarningReason>) {
    let sheared = record.upper_air.iter().find(|(_, wind)| {
        !is_wind_shear_acceptable(record.wind_direction, wind.wind_direction, wind.wind_speed)
    });

    if let Some((level, wind)) = sheared {
        warnings.push(WarningReason::WindShear {
            level,
            height_m: wind.geopotential_height,
        });
    }
}

fn check_convection(
    record: &MergedHourlyRecord,
    rule: &AlertRuleConfig,
    failures: &mut Vec<FailureReason>,
) {
    let limits = &rule.convective;

    if limits.max_cape.is_some_and(|max| record.cape >= max) {
        failures.push(FailureReason::CapeTooHigh);
    }
    if limits.min_lifted_index.is_some_and(|min| record.lifted_index < min) {
        failures.push(FailureReason::LiftedIndexTooLow);
    }
    if limits.max_lifted_index.is_some_and(|max| record.lifted_index > max) {
        failures.push(FailureReason::LiftedIndexTooHigh);
    }
    if limits
        .min_convective_inhibition
        .is_some_and(|min| record.convective_inhibition <= min)
    {
        failures.push(FailureReason::ConvectiveInhibitionTooLow);
    }
}

/// Score one merged hour.
///
/// Failures are reported in a fixed order: daylight, sky, direction, wind
/// speed, gusts, much-wind, precipitation, then any configured convective
/// limits. Warnings follow the same idea: rain uncertainty first, then the
/// single most relevant upper-air speed warning and the single most relevant
/// shear warning.
pub fn evaluate(
    hour: &MergedHourlyRecord,
    directions: &SiteDirectionCapability,
    rule: &AlertRuleConfig,
) -> EvaluatedHour {
    let mut failures = Vec::new();
    let mut warnings = Vec::new();

    check_surface(&SurfaceView::from(hour), directions, rule, &mut failures);
    check_precipitation(hour, rule, &mut failures, &mut warnings);
    check_upper_air_speed(hour, rule, &mut warnings);
    check_wind_shear(hour, &mut warnings);
    check_convection(hour, rule, &mut failures);

    EvaluatedHour {
        record: hour.clone(),
        is_promising: failures.is_empty(),
        validation_failures: failures,
        validation_warnings: warnings,
    }
}

/// Score every hour, keeping forecast order.
pub fn evaluate_all(
    hours: &[MergedHourlyRecord],
    directions: &SiteDirectionCapability,
    rule: &AlertRuleConfig,
) -> Vec<EvaluatedHour> {
    hours
        .iter()
        .map(|hour| evaluate(hour, directions, rule))
        .collect()
}

/// Surface-only verdict for map markers, which carry no upper-air data.
pub fn is_minimal_forecast_promising(
    forecast: &MinimalForecast,
    directions: &SiteDirectionCapability,
    rule: &AlertRuleConfig,
) -> bool {
    let mut failures = Vec::new();
    check_surface(&SurfaceView::from(forecast), directions, rule, &mut failures);
    failures.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        CompassSector, ConvectiveLimits, PrecipitationBand, PressureLevel, PressureLevelWind,
        UpperAirWinds,
    };
    use chrono::{TimeZone, Utc};

    fn level(speed: f64, direction: f64, height: f64) -> PressureLevelWind {
        PressureLevelWind {
            wind_speed: speed,
            wind_direction: direction,
            temperature: 0.0,
            geopotential_height: height,
        }
    }

    /// A calm, sunny, southerly hour that passes the default rule
    fn good_hour() -> MergedHourlyRecord {
        MergedHourlyRecord {
            time: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
            temperature: 15.0,
            wind_speed: 3.0,
            wind_direction: 180.0,
            wind_gusts: Some(5.0),
            precipitation: PrecipitationBand::point(0.0),
            precipitation_probability: Some(0.0),
            pressure_msl: 1015.0,
            sky_code: "clearsky_day".to_string(),
            cloud_cover: 10.0,
            is_day: true,
            has_short_range_data: true,
            upper_air: UpperAirWinds {
                hpa925: level(5.0, 190.0, 800.0),
                hpa850: level(7.0, 200.0, 1500.0),
                hpa700: level(9.0, 210.0, 3000.0),
            },
            cape: 50.0,
            lifted_index: 2.0,
            convective_inhibition: -20.0,
            boundary_layer_height: 1000.0,
            freezing_level_height: 2800.0,
            cloud_cover_low: 5.0,
            cloud_cover_mid: 5.0,
            cloud_cover_high: 0.0,
        }
    }

    fn south() -> SiteDirectionCapability {
        SiteDirectionCapability::new([CompassSector::SE, CompassSector::S, CompassSector::SW])
    }

    #[test]
    fn test_good_hour_is_promising() {
        let result = evaluate(&good_hour(), &south(), &AlertRuleConfig::default());
        assert!(result.is_promising);
        assert!(result.validation_failures.is_empty());
        assert!(result.validation_warnings.is_empty());
        assert_eq!(result.record, good_hour());
    }

    #[test]
    fn test_night_fails_without_bad_weather() {
        let hour = MergedHourlyRecord {
            is_day: false,
            sky_code: "clearsky_night".to_string(),
            ..good_hour()
        };
        let result = evaluate(&hour, &south(), &AlertRuleConfig::default());
        assert_eq!(result.validation_failures, vec![FailureReason::Dark]);
    }

    #[test]
    fn test_bad_sky_code_fails_in_daylight() {
        let hour = MergedHourlyRecord {
            sky_code: "rainshowers_day".to_string(),
            ..good_hour()
        };
        let result = evaluate(&hour, &south(), &AlertRuleConfig::default());
        assert_eq!(result.validation_failures, vec![FailureReason::BadWeather]);
        assert!(!result.is_promising);
    }

    #[test]
    fn test_wrong_direction() {
        let hour = MergedHourlyRecord {
            wind_direction: 0.0,
            ..good_hour()
        };
        let result = evaluate(&hour, &south(), &AlertRuleConfig::default());
        assert_eq!(result.validation_failures, vec![FailureReason::WrongWindDirection]);
    }

    #[test]
    fn test_empty_capability_fails_closed() {
        let result = evaluate(
            &good_hour(),
            &SiteDirectionCapability::default(),
            &AlertRuleConfig::default(),
        );
        assert_eq!(result.validation_failures, vec![FailureReason::WrongWindDirection]);
    }

    #[test]
    fn test_too_little_wind() {
        let rule = AlertRuleConfig {
            min_wind_speed: 2.0,
            ..Default::default()
        };
        let hour = MergedHourlyRecord {
            wind_speed: 1.0,
            ..good_hour()
        };
        let result = evaluate(&hour, &south(), &rule);
        assert_eq!(result.validation_failures, vec![FailureReason::TooLittleWind]);
    }

    #[test]
    fn test_max_wind_suppresses_gust_and_much_wind() {
        let hour = MergedHourlyRecord {
            wind_speed: 9.0,
            wind_gusts: Some(14.0),
            ..good_hour()
        };
        let result = evaluate(&hour, &south(), &AlertRuleConfig::default());
        assert_eq!(result.validation_failures, vec![FailureReason::TooMuchWind]);
    }

    #[test]
    fn test_gust_failure_when_wind_within_limit() {
        let hour = MergedHourlyRecord {
            wind_speed: 4.0,
            wind_gusts: Some(12.0),
            ..good_hour()
        };
        let result = evaluate(&hour, &south(), &AlertRuleConfig::default());
        assert_eq!(result.validation_failures, vec![FailureReason::TooMuchInGusts]);
    }

    #[test]
    fn test_much_wind_heuristic() {
        // 6.0 >= 5.5 and 10.0 >= 9.5, both under the hard caps of 7.5 / 11.5
        let hour = MergedHourlyRecord {
            wind_speed: 6.0,
            wind_gusts: Some(10.0),
            ..good_hour()
        };
        let result = evaluate(&hour, &south(), &AlertRuleConfig::default());
        assert_eq!(result.validation_failures, vec![FailureReason::BlowingTooMuch]);

        // Strong but not gusty enough
        let hour = MergedHourlyRecord {
            wind_speed: 6.0,
            wind_gusts: Some(9.0),
            ..good_hour()
        };
        let result = evaluate(&hour, &south(), &AlertRuleConfig::default());
        assert!(result.is_promising);
    }

    #[test]
    fn test_missing_gusts_skip_gust_checks() {
        let hour = MergedHourlyRecord {
            wind_speed: 6.0,
            wind_gusts: None,
            ..good_hour()
        };
        let result = evaluate(&hour, &south(), &AlertRuleConfig::default());
        assert!(result.is_promising);
    }

    #[test]
    fn test_rain_uncertainty_warns() {
        let rule = AlertRuleConfig {
            max_precipitation: 1.0,
            ..Default::default()
        };
        let hour = MergedHourlyRecord {
            precipitation: PrecipitationBand::with_bounds(0.5, Some(0.0), Some(1.5)),
            ..good_hour()
        };
        let result = evaluate(&hour, &south(), &rule);
        assert!(result.is_promising);
        assert_eq!(result.validation_warnings, vec![WarningReason::RainPossible]);
    }

    #[test]
    fn test_rain_certain_fails_without_warning() {
        let rule = AlertRuleConfig {
            max_precipitation: 1.0,
            ..Default::default()
        };
        let hour = MergedHourlyRecord {
            precipitation: PrecipitationBand::with_bounds(1.5, Some(1.2), Some(2.0)),
            ..good_hour()
        };
        let result = evaluate(&hour, &south(), &rule);
        assert_eq!(result.validation_failures, vec![FailureReason::Raining]);
        assert!(result.validation_warnings.is_empty());
    }

    #[test]
    fn test_upper_air_reports_lowest_offending_level_only() {
        let mut hour = good_hour();
        hour.upper_air.hpa850 = level(20.0, 200.0, 1480.0);
        hour.upper_air.hpa700 = level(30.0, 200.0, 3020.0);
        let result = evaluate(&hour, &south(), &AlertRuleConfig::default());

        assert!(result.is_promising);
        assert_eq!(
            result.validation_warnings,
            vec![WarningReason::StrongWindAloft {
                level: PressureLevel::Hpa850,
                height_m: 1480.0,
            }]
        );
    }

    #[test]
    fn test_shear_reports_lowest_offending_level_only() {
        let mut hour = good_hour();
        hour.upper_air.hpa925 = level(6.0, 0.0, 790.0);
        hour.upper_air.hpa700 = level(9.0, 20.0, 3010.0);
        let result = evaluate(&hour, &south(), &AlertRuleConfig::default());

        assert_eq!(
            result.validation_warnings,
            vec![WarningReason::WindShear {
                level: PressureLevel::Hpa925,
                height_m: 790.0,
            }]
        );
    }

    #[test]
    fn test_light_upper_wind_never_shears() {
        let mut hour = good_hour();
        hour.upper_air.hpa925 = level(3.9, 0.0, 800.0);
        hour.upper_air.hpa850 = level(2.0, 0.0, 1500.0);
        hour.upper_air.hpa700 = level(0.5, 0.0, 3000.0);
        let result = evaluate(&hour, &south(), &AlertRuleConfig::default());
        assert!(result.validation_warnings.is_empty());
    }

    #[test]
    fn test_convective_limits_apply_only_when_set() {
        let hour = MergedHourlyRecord {
            cape: 1500.0,
            lifted_index: -5.0,
            convective_inhibition: -300.0,
            ..good_hour()
        };
        let result = evaluate(&hour, &south(), &AlertRuleConfig::default());
        assert!(result.is_promising);

        let rule = AlertRuleConfig {
            convective: ConvectiveLimits {
                max_cape: Some(1000.0),
                min_lifted_index: Some(-4.0),
                max_lifted_index: Some(2.0),
                min_convective_inhibition: Some(-50.0),
            },
            ..Default::default()
        };
        let result = evaluate(&hour, &south(), &rule);
        assert_eq!(
            result.validation_failures,
            vec![
                FailureReason::CapeTooHigh,
                FailureReason::LiftedIndexTooLow,
                FailureReason::ConvectiveInhibitionTooLow,
            ]
        );
    }

    #[test]
    fn test_failures_accumulate_in_check_order() {
        let hour = MergedHourlyRecord {
            sky_code: "heavyrain".to_string(),
            wind_direction: 10.0,
            wind_speed: 8.0,
            precipitation: PrecipitationBand::point(4.0),
            ..good_hour()
        };
        let result = evaluate(&hour, &south(), &AlertRuleConfig::default());
        assert_eq!(
            result.validation_failures,
            vec![
                FailureReason::BadWeather,
                FailureReason::WrongWindDirection,
                FailureReason::TooMuchWind,
                FailureReason::Raining,
            ]
        );
        assert_eq!(
            result.joined_failures(crate::types::Language::English),
            "bad weather,wrong wind direction,too much wind,raining"
        );
    }

    #[test]
    fn test_angular_difference_wraps() {
        assert_eq!(angular_difference(350.0, 10.0), 20.0);
        assert_eq!(angular_difference(10.0, 350.0), 20.0);
        assert_eq!(angular_difference(0.0, 180.0), 180.0);
        assert_eq!(angular_difference(90.0, 90.0), 0.0);
    }

    #[test]
    fn test_shear_boundary_is_inclusive() {
        assert!(is_wind_shear_acceptable(0.0, 90.0, 10.0));
        assert!(!is_wind_shear_acceptable(0.0, 91.0, 10.0));
        assert!(is_wind_shear_acceptable(0.0, 180.0, 3.99));
    }

    #[test]
    fn test_minimal_forecast_uses_surface_checks_only() {
        let forecast = MinimalForecast::from(&good_hour());
        assert!(is_minimal_forecast_promising(
            &forecast,
            &south(),
            &AlertRuleConfig::default()
        ));

        let night = MinimalForecast {
            is_day: false,
            ..forecast.clone()
        };
        assert!(!is_minimal_forecast_promising(
            &night,
            &south(),
            &AlertRuleConfig::default()
        ));

        assert!(!is_minimal_forecast_promising(
            &forecast,
            &SiteDirectionCapability::default(),
            &AlertRuleConfig::default()
        ));
    }
}
