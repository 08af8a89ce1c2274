//! Source combiner
//!
//! The extended series (Source B) is the timeline: one merged record is
//! emitted per Source B hour. Short-range values (Source A) replace the
//! surface fields when an hour with the same minute-truncated timestamp
//! exists.

use std::collections::HashMap;

use chrono::{DateTime, Duration, DurationRound, Utc};
use serde::{Deserialize, Serialize};

use crate::models::sky::sky_code_from_wmo;
use crate::models::{
    HourlyAtmosphericProfile, HourlyObservation, MergedHourlyRecord, PrecipitationBand,
};

/// What to put in the surface fields of an hour Source A does not cover
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceFallback {
    /// Zero wind and precipitation, no gusts, empty sky code
    #[default]
    Empty,
    /// Keep Source B's own surface values
    ExtendedSeries,
}

/// Merge the two series with [`SurfaceFallback::Empty`] for uncovered hours.
pub fn combine(
    source_a: &[HourlyObservation],
    source_b: &[HourlyAtmosphericProfile],
) -> Vec<MergedHourlyRecord> {
    combine_with(source_a, source_b, SurfaceFallback::Empty)
}

pub fn combine_with(
    source_a: &[HourlyObservation],
    source_b: &[HourlyAtmosphericProfile],
    fallback: SurfaceFallback,
) -> Vec<MergedHourlyRecord> {
    let by_minute: HashMap<DateTime<Utc>, &HourlyObservation> = source_a
        .iter()
        .map(|obs| (join_key(obs.time), obs))
        .collect();

    source_b
        .iter()
        .map(|profile| {
            let mut record = base_record(profile, fallback);
            if let Some(obs) = by_minute.get(&join_key(profile.time)) {
                overlay_short_range(&mut record, obs);
            }
            record
        })
        .collect()
}

/// Timestamp truncated to the minute
fn join_key(time: DateTime<Utc>) -> DateTime<Utc> {
    time.duration_trunc(Duration::minutes(1)).unwrap_or(time)
}

fn base_record(profile: &HourlyAtmosphericProfile, fallback: SurfaceFallback) -> MergedHourlyRecord {
    let (wind_speed, wind_direction, wind_gusts, precipitation, sky_code) = match fallback {
        SurfaceFallback::Empty => (0.0, 0.0, None, PrecipitationBand::default(), String::new()),
        SurfaceFallback::ExtendedSeries => (
            profile.wind_speed_10m,
            profile.wind_direction_10m,
            Some(profile.wind_gusts_10m),
            PrecipitationBand::point(profile.precipitation),
            sky_code_from_wmo(profile.weather_code, profile.is_day).to_string(),
        ),
    };

    MergedHourlyRecord {
        time: profile.time,
        temperature: profile.temperature_2m,
        wind_speed,
        wind_direction,
        wind_gusts,
        precipitation,
        precipitation_probability: profile.precipitation_probability,
        pressure_msl: profile.pressure_msl,
        sky_code,
        cloud_cover: profile.cloud_cover,
        is_day: profile.is_day,
        has_short_range_data: false,
        upper_air: profile.upper_air,
        cape: profile.cape,
        lifted_index: profile.lifted_index,
        convective_inhibition: profile.convective_inhibition,
        boundary_layer_height: profile.boundary_layer_height,
        freezing_level_height: profile.freezing_level_height,
        cloud_cover_low: profile.cloud_cover_low,
        cloud_cover_mid: profile.cloud_cover_mid,
        cloud_cover_high: profile.cloud_cover_high,
    }
}

fn overlay_short_range(record: &mut MergedHourlyRecord, obs: &HourlyObservation) {
    record.temperature = obs.air_temperature;
    record.wind_speed = obs.wind_speed;
    record.wind_direction = obs.wind_from_direction;
    record.wind_gusts = obs.wind_speed_of_gust;
    record.precipitation = PrecipitationBand::with_bounds(
        obs.precipitation_amount,
        obs.precipitation_amount_min,
        obs.precipitation_amount_max,
    );
    record.sky_code = obs.symbol_code.clone();
    record.cloud_cover = obs.cloud_area_fraction;
    record.has_short_range_data = true;
}
