//! Request and response models for the evaluation API
//!
//! Inbound forecast hours are range-checked here before they are converted
//! into the shared engine's types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

pub use shared::models::*;
use shared::validation::{
    validate_percentage, validate_precipitation, validate_wind_direction, validate_wind_speed,
};
use shared::{ForecastEvaluation, Language, SurfaceFallback, Verdict, WindowConfig};

// ============================================================================
// Range checks shared with the engine's validation module
// ============================================================================

fn checked(result: Result<(), &'static str>, code: &'static str) -> Result<(), ValidationError> {
    result.map_err(|message| {
        let mut error = ValidationError::new(code);
        error.message = Some(message.into());
        error
    })
}

fn wind_speed(value: f64) -> Result<(), ValidationError> {
    checked(validate_wind_speed(value), "wind_speed")
}

fn wind_direction(value: f64) -> Result<(), ValidationError> {
    checked(validate_wind_direction(value), "wind_direction")
}

fn percentage(value: f64) -> Result<(), ValidationError> {
    checked(validate_percentage(value), "percentage")
}

fn precipitation(value: f64) -> Result<(), ValidationError> {
    checked(validate_precipitation(&PrecipitationBand::point(value)), "precipitation")
}

fn observation_band(input: &ObservationInput) -> Result<(), ValidationError> {
    let band = PrecipitationBand::with_bounds(
        input.precipitation_amount,
        input.precipitation_amount_min,
        input.precipitation_amount_max,
    );
    checked(validate_precipitation(&band), "precipitation")
}

// ============================================================================
// Inbound forecast data
// ============================================================================

/// Short-range hour as received from the fetch layer
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "observation_band"))]
pub struct ObservationInput {
    pub time: DateTime<Utc>,
    pub air_temperature: f64,
    #[validate(custom = "wind_speed")]
    pub wind_speed: f64,
    #[validate(custom = "wind_direction")]
    pub wind_from_direction: f64,
    #[validate(custom = "wind_speed")]
    pub wind_speed_of_gust: Option<f64>,
    pub precipitation_amount: f64,
    pub precipitation_amount_min: Option<f64>,
    pub precipitation_amount_max: Option<f64>,
    #[validate(custom = "percentage")]
    pub probability_of_precipitation: Option<f64>,
    pub air_pressure_at_sea_level: Option<f64>,
    #[validate(length(min = 1, max = 64, message = "sky code is required"))]
    pub symbol_code: String,
    #[validate(custom = "percentage")]
    pub cloud_area_fraction: f64,
}

impl From<ObservationInput> for HourlyObservation {
    fn from(input: ObservationInput) -> Self {
        HourlyObservation {
            time: input.time,
            air_temperature: input.air_temperature,
            wind_speed: input.wind_speed,
            wind_from_direction: input.wind_from_direction,
            wind_speed_of_gust: input.wind_speed_of_gust,
            precipitation_amount: input.precipitation_amount,
            precipitation_amount_min: input.precipitation_amount_min,
            precipitation_amount_max: input.precipitation_amount_max,
            probability_of_precipitation: input.probability_of_precipitation,
            air_pressure_at_sea_level: input.air_pressure_at_sea_level,
            symbol_code: input.symbol_code,
            cloud_area_fraction: input.cloud_area_fraction,
        }
    }
}

/// Wind at one pressure level
#[derive(Debug, Clone, Copy, Deserialize, Validate)]
pub struct PressureLevelInput {
    #[validate(custom = "wind_speed")]
    pub wind_speed: f64,
    #[validate(custom = "wind_direction")]
    pub wind_direction: f64,
    pub temperature: f64,
    #[validate(range(min = 0.0, message = "height cannot be negative"))]
    pub geopotential_height: f64,
}

impl From<PressureLevelInput> for PressureLevelWind {
    fn from(input: PressureLevelInput) -> Self {
        PressureLevelWind {
            wind_speed: input.wind_speed,
            wind_direction: input.wind_direction,
            temperature: input.temperature,
            geopotential_height: input.geopotential_height,
        }
    }
}

/// Extended-series hour as received from the fetch layer
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProfileInput {
    pub time: DateTime<Utc>,
    pub temperature_2m: f64,
    #[validate(custom = "wind_speed")]
    pub wind_speed_10m: f64,
    #[validate(custom = "wind_direction")]
    pub wind_direction_10m: f64,
    #[validate(custom = "wind_speed")]
    pub wind_gusts_10m: f64,
    #[validate(custom = "precipitation")]
    pub precipitation: f64,
    #[validate(custom = "percentage")]
    pub precipitation_probability: Option<f64>,
    pub pressure_msl: f64,
    pub weather_code: u8,
    #[validate(custom = "percentage")]
    pub cloud_cover: f64,
    #[serde(deserialize_with = "bool_from_flag")]
    pub is_day: bool,
    #[validate]
    pub hpa925: PressureLevelInput,
    #[validate]
    pub hpa850: PressureLevelInput,
    #[validate]
    pub hpa700: PressureLevelInput,
    #[serde(default)]
    pub cape: f64,
    #[serde(default)]
    pub lifted_index: f64,
    #[serde(default)]
    pub convective_inhibition: f64,
    #[serde(default)]
    pub boundary_layer_height: f64,
    #[serde(default)]
    pub freezing_level_height: f64,
    #[serde(default)]
    pub cloud_cover_low: f64,
    #[serde(default)]
    pub cloud_cover_mid: f64,
    #[serde(default)]
    pub cloud_cover_high: f64,
}

impl From<ProfileInput> for HourlyAtmosphericProfile {
    fn from(input: ProfileInput) -> Self {
        HourlyAtmosphericProfile {
            time: input.time,
            temperature_2m: input.temperature_2m,
            wind_speed_10m: input.wind_speed_10m,
            wind_direction_10m: input.wind_direction_10m,
            wind_gusts_10m: input.wind_gusts_10m,
            precipitation: input.precipitation,
            precipitation_probability: input.precipitation_probability,
            pressure_msl: input.pressure_msl,
            weather_code: input.weather_code,
            cloud_cover: input.cloud_cover,
            is_day: input.is_day,
            upper_air: UpperAirWinds {
                hpa925: input.hpa925.into(),
                hpa850: input.hpa850.into(),
                hpa700: input.hpa700.into(),
            },
            cape: input.cape,
            lifted_index: input.lifted_index,
            convective_inhibition: input.convective_inhibition,
            boundary_layer_height: input.boundary_layer_height,
            freezing_level_height: input.freezing_level_height,
            cloud_cover_low: input.cloud_cover_low,
            cloud_cover_mid: input.cloud_cover_mid,
            cloud_cover_high: input.cloud_cover_high,
        }
    }
}

/// Both hourly series for one site
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ForecastInput {
    #[serde(default)]
    #[validate]
    pub short_range: Vec<ObservationInput>,
    #[validate]
    pub extended: Vec<ProfileInput>,
    /// Overrides the configured fallback for uncovered hours
    #[serde(default)]
    pub surface_fallback: Option<SurfaceFallback>,
}

impl ForecastInput {
    pub fn into_series(self) -> (Vec<HourlyObservation>, Vec<HourlyAtmosphericProfile>) {
        (
            self.short_range.into_iter().map(Into::into).collect(),
            self.extended.into_iter().map(Into::into).collect(),
        )
    }
}

// ============================================================================
// Requests
// ============================================================================

/// Evaluate a forecast for a site that is not in the registry
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AdHocEvaluationRequest {
    /// Launch directions as sector tags. An empty list scores every hour
    /// with a wrong-direction failure.
    pub directions: Vec<String>,
    #[serde(default)]
    pub rule: Option<AlertRuleConfig>,
    #[serde(default)]
    pub window: Option<WindowConfig>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(flatten)]
    #[validate]
    pub forecast: ForecastInput,
}

/// One registered site's data inside a batch request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BatchSiteInput {
    #[validate(length(min = 2, max = 64))]
    pub site_id: String,
    #[serde(flatten)]
    #[validate]
    pub forecast: ForecastInput,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BatchEvaluationRequest {
    #[validate]
    pub sites: Vec<BatchSiteInput>,
}

/// `?lang=en|no`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LanguageQuery {
    pub lang: Option<String>,
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct SiteSummary {
    pub id: String,
    pub name: String,
    pub timezone: String,
    pub directions: Vec<&'static str>,
    pub rule: AlertRuleConfig,
    pub window: WindowConfig,
}

/// An evaluated hour with its reasons rendered for display
#[derive(Debug, Clone, Serialize)]
pub struct HourResponse {
    #[serde(flatten)]
    pub hour: EvaluatedHour,
    pub failures: String,
    pub warnings: String,
}

impl HourResponse {
    pub fn render(hour: EvaluatedHour, language: Language) -> Self {
        Self {
            failures: hour.joined_failures(language),
            warnings: hour.joined_warnings(language),
            hour,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DayResponse {
    pub date: NaiveDate,
    pub result: Verdict,
    pub hours: Vec<HourResponse>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EvaluationResponse {
    pub evaluation_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_id: Option<String>,
    pub evaluated_at: DateTime<Utc>,
    pub language: Language,
    pub overall: Verdict,
    pub days: Vec<DayResponse>,
    /// Every hour in forecast order, including those outside the window
    pub hours: Vec<HourResponse>,
}

impl EvaluationResponse {
    pub fn new(site_id: Option<String>, evaluation: ForecastEvaluation, language: Language) -> Self {
        let ForecastEvaluation { hours, verdict } = evaluation;

        Self {
            evaluation_id: Uuid::new_v4(),
            site_id,
            evaluated_at: Utc::now(),
            language,
            overall: verdict.overall,
            days: verdict
                .days
                .into_iter()
                .map(|day| DayResponse {
                    date: day.date,
                    result: day.result,
                    hours: day
                        .hours
                        .into_iter()
                        .map(|h| HourResponse::render(h, language))
                        .collect(),
                })
                .collect(),
            hours: hours
                .into_iter()
                .map(|h| HourResponse::render(h, language))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    Ok,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchSiteResult {
    pub site_id: String,
    pub status: BatchStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<EvaluationResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchEvaluationResponse {
    pub overall: Verdict,
    pub results: Vec<BatchSiteResult>,
}
