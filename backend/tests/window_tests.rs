//! Window detector and pipeline integration tests
//!
//! Tests for day verdicts including:
//! - Streak minimality
//! - Local-time day boundaries
//! - Merge fallback through the full pipeline

use chrono::{DateTime, Duration, TimeZone, Utc};
use chrono_tz::Europe::Oslo;
use proptest::prelude::*;
use shared::{
    combine, detect, evaluate_forecast, AlertRuleConfig, CompassSector, EvaluatedHour,
    HourRange, HourlyAtmosphericProfile, HourlyObservation, MergedHourlyRecord,
    PrecipitationBand, PressureLevelWind, SiteDirectionCapability, UpperAirWinds, Verdict,
    WindowConfig,
};

/// Midnight UTC on a winter day, when Oslo is UTC+1
fn winter_midnight() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap()
}

fn evaluated(time: DateTime<Utc>, is_promising: bool) -> EvaluatedHour {
    EvaluatedHour {
        record: MergedHourlyRecord {
            time,
            temperature: -2.0,
            wind_speed: 2.0,
            wind_direction: 0.0,
            wind_gusts: None,
            precipitation: PrecipitationBand::default(),
            precipitation_probability: None,
            pressure_msl: 1025.0,
            sky_code: "clearsky_day".to_string(),
            cloud_cover: 0.0,
            is_day: true,
            has_short_range_data: true,
            upper_air: UpperAirWinds::default(),
            cape: 0.0,
            lifted_index: 0.0,
            convective_inhibition: 0.0,
            boundary_layer_height: 0.0,
            freezing_level_height: 0.0,
            cloud_cover_low: 0.0,
            cloud_cover_mid: 0.0,
            cloud_cover_high: 0.0,
        },
        is_promising,
        validation_failures: Vec::new(),
        validation_warnings: Vec::new(),
    }
}

/// A UTC day of hours whose promising flags come from `flags`
fn utc_day(flags: &[bool]) -> Vec<EvaluatedHour> {
    flags
        .iter()
        .enumerate()
        .map(|(h, &p)| evaluated(winter_midnight() + Duration::hours(h as i64), p))
        .collect()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Clean day: 13 flyable hours, all promising
    #[test]
    fn test_clean_day_scenario() {
        let hours: Vec<_> = (8..=20)
            .map(|h| evaluated(winter_midnight() + Duration::hours(h), true))
            .collect();
        let verdict = detect(hours, &WindowConfig::default(), &Utc);

        assert_eq!(verdict.days.len(), 1);
        assert_eq!(verdict.days[0].result, Verdict::Positive);
        assert_eq!(verdict.overall, Verdict::Positive);
    }

    #[test]
    fn test_oslo_window_shifts_one_hour_in_winter() {
        // 07:00 UTC is 08:00 in Oslo; 20:00 UTC is 21:00 and outside the window
        let mut flags = vec![false; 24];
        for h in [7, 8, 9] {
            flags[h] = true;
        }
        let verdict = detect(utc_day(&flags), &WindowConfig::default(), &Oslo);
        assert_eq!(verdict.days[0].result, Verdict::Positive);

        let verdict = detect(utc_day(&flags), &WindowConfig::default(), &Utc);
        assert_eq!(verdict.days[0].result, Verdict::Negative);
    }

    #[test]
    fn test_custom_window_and_run_length() {
        let window = WindowConfig {
            flyable_hours: HourRange::new(10, 16),
            min_run_length: 5,
        };
        let mut flags = vec![false; 24];
        for h in 12..=16 {
            flags[h] = true;
        }
        let verdict = detect(utc_day(&flags), &window, &Utc);
        assert_eq!(verdict.days[0].result, Verdict::Positive);
        assert_eq!(verdict.days[0].hours.len(), 7);

        flags[14] = false;
        let verdict = detect(utc_day(&flags), &window, &Utc);
        assert_eq!(verdict.days[0].result, Verdict::Negative);
    }

    /// Merge fallback: uncovered hours get empty surface values, upper air untouched
    #[test]
    fn test_merge_fallback_scenario() {
        let upper = UpperAirWinds {
            hpa925: PressureLevelWind {
                wind_speed: 6.0,
                wind_direction: 300.0,
                temperature: -4.0,
                geopotential_height: 720.0,
            },
            hpa850: PressureLevelWind {
                wind_speed: 9.0,
                wind_direction: 310.0,
                temperature: -9.0,
                geopotential_height: 1380.0,
            },
            hpa700: PressureLevelWind {
                wind_speed: 14.0,
                wind_direction: 320.0,
                temperature: -18.0,
                geopotential_height: 2900.0,
            },
        };
        let profile = HourlyAtmosphericProfile {
            time: winter_midnight() + Duration::hours(12),
            temperature_2m: -1.0,
            wind_speed_10m: 5.0,
            wind_direction_10m: 290.0,
            wind_gusts_10m: 9.0,
            precipitation: 0.4,
            precipitation_probability: Some(40.0),
            pressure_msl: 1008.0,
            weather_code: 71,
            cloud_cover: 90.0,
            is_day: true,
            upper_air: upper,
            cape: 0.0,
            lifted_index: 6.0,
            convective_inhibition: 0.0,
            boundary_layer_height: 400.0,
            freezing_level_height: 0.0,
            cloud_cover_low: 80.0,
            cloud_cover_mid: 40.0,
            cloud_cover_high: 10.0,
        };

        let merged = combine(&[], &[profile.clone()]);
        let record = &merged[0];
        assert_eq!(record.wind_speed, 0.0);
        assert_eq!(record.wind_gusts, None);
        assert_eq!(record.precipitation, PrecipitationBand::default());
        assert_eq!(record.upper_air, profile.upper_air);
        assert_eq!(record.lifted_index, profile.lifted_index);
        assert_eq!(record.boundary_layer_height, profile.boundary_layer_height);
        assert_eq!(record.cloud_cover_low, profile.cloud_cover_low);
    }

    #[test]
    fn test_pipeline_over_two_local_days() {
        let observation = |time: DateTime<Utc>| HourlyObservation {
            time,
            air_temperature: 1.0,
            wind_speed: 2.5,
            wind_from_direction: 10.0,
            wind_speed_of_gust: Some(4.0),
            precipitation_amount: 0.0,
            precipitation_amount_min: None,
            precipitation_amount_max: None,
            probability_of_precipitation: None,
            air_pressure_at_sea_level: None,
            symbol_code: "fair_day".to_string(),
            cloud_area_fraction: 10.0,
        };
        let profile = |time: DateTime<Utc>| HourlyAtmosphericProfile {
            time,
            temperature_2m: 1.0,
            wind_speed_10m: 2.5,
            wind_direction_10m: 10.0,
            wind_gusts_10m: 4.0,
            precipitation: 0.0,
            precipitation_probability: None,
            pressure_msl: 1020.0,
            weather_code: 1,
            cloud_cover: 10.0,
            is_day: true,
            upper_air: UpperAirWinds::default(),
            cape: 0.0,
            lifted_index: 5.0,
            convective_inhibition: 0.0,
            boundary_layer_height: 500.0,
            freezing_level_height: 600.0,
            cloud_cover_low: 0.0,
            cloud_cover_mid: 0.0,
            cloud_cover_high: 10.0,
        };

        // Two days of extended data, short-range data only on the first day
        let b: Vec<_> = (0..48)
            .map(|h| profile(winter_midnight() + Duration::hours(h)))
            .collect();
        let a: Vec<_> = (0..24)
            .map(|h| observation(winter_midnight() + Duration::hours(h)))
            .collect();

        let result = evaluate_forecast(
            &a,
            &b,
            &SiteDirectionCapability::new([CompassSector::N]),
            &AlertRuleConfig::default(),
            &WindowConfig::default(),
            &Oslo,
        );

        assert_eq!(result.hours.len(), 48);
        let results: Vec<_> = result.verdict.days.iter().map(|d| d.result).collect();
        // Local days: 15th (from 00:00 Oslo), 16th, and the first hour of the 17th
        assert_eq!(result.verdict.days.len(), 3);
        assert_eq!(results[0], Verdict::Positive);
        assert_eq!(results[1], Verdict::Negative);
        assert_eq!(result.verdict.overall, Verdict::Positive);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn run_length_strategy() -> impl Strategy<Value = usize> {
        2usize..=6
    }

    /// Start hour for a run that fits inside 08:00-20:00
    fn start_strategy() -> impl Strategy<Value = usize> {
        8usize..=14
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Streak minimality: one hour short is negative
        #[test]
        fn prop_run_one_short_is_negative(
            run in run_length_strategy(),
            start in start_strategy()
        ) {
            let mut flags = vec![false; 24];
            for h in start..start + run - 1 {
                flags[h] = true;
            }
            let window = WindowConfig { min_run_length: run, ..Default::default() };
            let verdict = detect(utc_day(&flags), &window, &Utc);
            prop_assert_eq!(verdict.days[0].result, Verdict::Negative);
        }

        /// Streak minimality: exactly the run length is positive
        #[test]
        fn prop_full_run_is_positive(
            run in run_length_strategy(),
            start in start_strategy()
        ) {
            let mut flags = vec![false; 24];
            for h in start..start + run {
                flags[h] = true;
            }
            let window = WindowConfig { min_run_length: run, ..Default::default() };
            let verdict = detect(utc_day(&flags), &window, &Utc);
            prop_assert_eq!(verdict.days[0].result, Verdict::Positive);
        }

        /// Overall is positive exactly when some day is
        #[test]
        fn prop_overall_matches_days(flags in prop::collection::vec(any::<bool>(), 0..96)) {
            let hours: Vec<_> = flags
                .iter()
                .enumerate()
                .map(|(h, &p)| evaluated(winter_midnight() + Duration::hours(h as i64), p))
                .collect();
            let verdict = detect(hours, &WindowConfig::default(), &Oslo);
            let any_positive = verdict.days.iter().any(|d| d.result.is_positive());
            prop_assert_eq!(verdict.overall.is_positive(), any_positive);
        }

        /// Every kept hour lies inside the local window
        #[test]
        fn prop_kept_hours_are_in_window(flags in prop::collection::vec(any::<bool>(), 0..72)) {
            let hours: Vec<_> = flags
                .iter()
                .enumerate()
                .map(|(h, &p)| evaluated(winter_midnight() + Duration::hours(h as i64), p))
                .collect();
            let verdict = detect(hours, &WindowConfig::default(), &Oslo);
            for day in &verdict.days {
                for hour in &day.hours {
                    let local = hour.record.time.with_timezone(&Oslo);
                    prop_assert_eq!(local.date_naive(), day.date);
                    prop_assert!((8..=20).contains(&chrono::Timelike::hour(&local)));
                }
            }
        }
    }
}
