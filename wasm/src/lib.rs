//! WebAssembly module for Paragliding Alerts
//!
//! Provides client-side computation for:
//! - Scoring a single forecast hour
//! - Scoring a whole forecast into day verdicts
//! - Map-marker checks on reduced forecasts
//! - Compass sector lookup

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::scoring::*;
pub use shared::types::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::debug_1(&JsValue::from_str("paragliding alerts engine loaded"));
}

fn parse<T: for<'de> Deserialize<'de>>(json: &str, what: &str) -> Result<T, JsValue> {
    serde_json::from_str(json).map_err(|e| JsValue::from_str(&format!("Invalid {} JSON: {}", what, e)))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// A merged hour plus the site settings to score it with
#[derive(Deserialize)]
struct HourRequest {
    hour: MergedHourlyRecord,
    directions: SiteDirectionCapability,
    #[serde(default)]
    rule: AlertRuleConfig,
}

/// Score one merged hour; returns the evaluated hour as JSON
#[wasm_bindgen]
pub fn evaluate_hour_json(request_json: &str) -> Result<String, JsValue> {
    let request: HourRequest = parse(request_json, "hour request")?;
    let evaluated = evaluate(&request.hour, &request.directions, &request.rule);
    to_json(&evaluated)
}

/// Both series plus site settings for a full run
#[derive(Deserialize)]
struct ForecastRequest {
    #[serde(default)]
    short_range: Vec<HourlyObservation>,
    extended: Vec<HourlyAtmosphericProfile>,
    directions: SiteDirectionCapability,
    #[serde(default)]
    rule: AlertRuleConfig,
    #[serde(default)]
    window: WindowConfig,
    #[serde(default)]
    surface_fallback: SurfaceFallback,
    #[serde(default = "default_timezone")]
    timezone: String,
}

fn default_timezone() -> String {
    "Europe/Oslo".to_string()
}

/// Merge, score and window a forecast; returns hours and verdict as JSON
#[wasm_bindgen]
pub fn evaluate_forecast_json(request_json: &str) -> Result<String, JsValue> {
    let request: ForecastRequest = parse(request_json, "forecast request")?;
    let tz: chrono_tz::Tz = request
        .timezone
        .parse()
        .map_err(|_| JsValue::from_str(&format!("Unknown timezone: {}", request.timezone)))?;

    let result = evaluate_forecast_with(
        &request.short_range,
        &request.extended,
        request.surface_fallback,
        &request.directions,
        &request.rule,
        &request.window,
        &tz,
    );
    to_json(&result)
}

#[derive(Deserialize)]
struct MinimalRequest {
    forecast: MinimalForecast,
    directions: SiteDirectionCapability,
    #[serde(default)]
    rule: AlertRuleConfig,
}

/// Surface-only check used for map markers
#[wasm_bindgen]
pub fn is_minimal_forecast_promising_json(request_json: &str) -> Result<bool, JsValue> {
    let request: MinimalRequest = parse(request_json, "marker request")?;
    Ok(is_minimal_forecast_promising(
        &request.forecast,
        &request.directions,
        &request.rule,
    ))
}

/// Compass sector tag for a wind direction, empty when not a finite number
#[wasm_bindgen]
pub fn sector_for_direction(direction_deg: f64) -> String {
    CompassSector::from_degrees(direction_deg)
        .map(|s| s.tag().to_string())
        .unwrap_or_default()
}

/// Failure and warning text for an evaluated hour in the given language
#[wasm_bindgen]
pub fn render_reasons_json(evaluated_hour_json: &str, language: &str) -> Result<String, JsValue> {
    let hour: EvaluatedHour = parse(evaluated_hour_json, "evaluated hour")?;
    let language = Language::from_code(language).unwrap_or_default();
    to_json(&serde_json::json!({
        "failures": hour.joined_failures(language),
        "warnings": hour.joined_warnings(language),
    }))
}
