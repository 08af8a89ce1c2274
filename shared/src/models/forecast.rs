//! Hourly forecast models
//!
//! Two upstream series feed the engine: a short-range, high-fidelity series
//! (Source A) and a longer-range series with upper-air data (Source B). Both
//! are merged into one [`MergedHourlyRecord`] per hour of Source B.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// One hour of the short-range forecast (Source A)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HourlyObservation {
    pub time: DateTime<Utc>,
    pub air_temperature: f64,
    pub wind_speed: f64,
    /// Degrees the wind blows from, 0-360
    pub wind_from_direction: f64,
    #[serde(default)]
    pub wind_speed_of_gust: Option<f64>,
    pub precipitation_amount: f64,
    #[serde(default)]
    pub precipitation_amount_min: Option<f64>,
    #[serde(default)]
    pub precipitation_amount_max: Option<f64>,
    #[serde(default)]
    pub probability_of_precipitation: Option<f64>,
    #[serde(default)]
    pub air_pressure_at_sea_level: Option<f64>,
    pub symbol_code: String,
    pub cloud_area_fraction: f64,
}

/// Pressure levels carried by the extended series, lowest altitude first
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum PressureLevel {
    Hpa925,
    Hpa850,
    Hpa700,
}

impl PressureLevel {
    /// All levels ordered from the ground up
    pub const ALL: [PressureLevel; 3] = [
        PressureLevel::Hpa925,
        PressureLevel::Hpa850,
        PressureLevel::Hpa700,
    ];

    pub fn hectopascals(&self) -> u32 {
        match self {
            PressureLevel::Hpa925 => 925,
            PressureLevel::Hpa850 => 850,
            PressureLevel::Hpa700 => 700,
        }
    }

    /// Rough altitude above sea level in meters
    pub fn approximate_altitude_m(&self) -> u32 {
        match self {
            PressureLevel::Hpa925 => 800,
            PressureLevel::Hpa850 => 1500,
            PressureLevel::Hpa700 => 3000,
        }
    }
}

impl std::fmt::Display for PressureLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}hPa", self.hectopascals())
    }
}

/// Wind and temperature at a single pressure level
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct PressureLevelWind {
    pub wind_speed: f64,
    pub wind_direction: f64,
    pub temperature: f64,
    pub geopotential_height: f64,
}

/// Upper-air winds at the three monitored pressure levels
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct UpperAirWinds {
    pub hpa925: PressureLevelWind,
    pub hpa850: PressureLevelWind,
    pub hpa700: PressureLevelWind,
}

impl UpperAirWinds {
    pub fn get(&self, level: PressureLevel) -> &PressureLevelWind {
        match level {
            PressureLevel::Hpa925 => &self.hpa925,
            PressureLevel::Hpa850 => &self.hpa850,
            PressureLevel::Hpa700 => &self.hpa700,
        }
    }

    /// Levels paired with their values, lowest altitude first
    pub fn iter(&self) -> impl Iterator<Item = (PressureLevel, &PressureLevelWind)> {
        PressureLevel::ALL.into_iter().map(move |level| (level, self.get(level)))
    }
}

/// One hour of the extended forecast (Source B)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HourlyAtmosphericProfile {
    pub time: DateTime<Utc>,
    pub temperature_2m: f64,
    pub wind_speed_10m: f64,
    pub wind_direction_10m: f64,
    pub wind_gusts_10m: f64,
    pub precipitation: f64,
    #[serde(default)]
    pub precipitation_probability: Option<f64>,
    pub pressure_msl: f64,
    /// WMO weather interpretation code
    pub weather_code: u8,
    pub cloud_cover: f64,
    #[serde(deserialize_with = "bool_from_flag")]
    pub is_day: bool,
    pub upper_air: UpperAirWinds,
    pub cape: f64,
    pub lifted_index: f64,
    pub convective_inhibition: f64,
    pub boundary_layer_height: f64,
    pub freezing_level_height: f64,
    pub cloud_cover_low: f64,
    pub cloud_cover_mid: f64,
    pub cloud_cover_high: f64,
}

/// Precipitation point estimate with its uncertainty band, in mm
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct PrecipitationBand {
    pub amount: f64,
    pub min: f64,
    pub max: f64,
}

impl PrecipitationBand {
    /// A band with no uncertainty: both bounds equal the point estimate.
    pub fn point(amount: f64) -> Self {
        Self {
            amount,
            min: amount,
            max: amount,
        }
    }

    pub fn with_bounds(amount: f64, min: Option<f64>, max: Option<f64>) -> Self {
        Self {
            amount,
            min: min.unwrap_or(amount),
            max: max.unwrap_or(amount),
        }
    }
}

/// Source B hour with Source A's surface values laid over it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MergedHourlyRecord {
    pub time: DateTime<Utc>,
    pub temperature: f64,
    pub wind_speed: f64,
    pub wind_direction: f64,
    /// `None` when no gust value is known for the hour
    pub wind_gusts: Option<f64>,
    pub precipitation: PrecipitationBand,
    pub precipitation_probability: Option<f64>,
    pub pressure_msl: f64,
    pub sky_code: String,
    pub cloud_cover: f64,
    pub is_day: bool,
    /// Whether the surface fields came from the short-range series
    pub has_short_range_data: bool,
    pub upper_air: UpperAirWinds,
    pub cape: f64,
    pub lifted_index: f64,
    pub convective_inhibition: f64,
    pub boundary_layer_height: f64,
    pub freezing_level_height: f64,
    pub cloud_cover_low: f64,
    pub cloud_cover_mid: f64,
    pub cloud_cover_high: f64,
}

/// Reduced surface-only hour, as shown on map markers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MinimalForecast {
    pub time: DateTime<Utc>,
    #[serde(deserialize_with = "bool_from_flag")]
    pub is_day: bool,
    pub sky_code: String,
    pub temperature: f64,
    pub wind_speed: f64,
    #[serde(default)]
    pub wind_gusts: Option<f64>,
    pub wind_direction: f64,
}

impl From<&MergedHourlyRecord> for MinimalForecast {
    fn from(record: &MergedHourlyRecord) -> Self {
        Self {
            time: record.time,
            is_day: record.is_day,
            sky_code: record.sky_code.clone(),
            temperature: record.temperature,
            wind_speed: record.wind_speed,
            wind_gusts: record.wind_gusts,
            wind_direction: record.wind_direction,
        }
    }
}

/// Accepts either a JSON bool or the 0/1 integer flag used by forecast APIs.
pub fn bool_from_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => Ok(b),
        Flag::Int(0) => Ok(false),
        Flag::Int(1) => Ok(true),
        Flag::Int(other) => Err(serde::de::Error::custom(format!(
            "expected 0 or 1 for a boolean flag, got {}",
            other
        ))),
    }
}
