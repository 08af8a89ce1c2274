//! Forecast scoring engine
//!
//! Three pure stages: merge the two hourly series, score each merged hour,
//! then look for flyable runs per local day.

mod combine;
mod conditions;
mod windows;

pub use combine::*;
pub use conditions::*;
pub use windows::*;

use chrono::TimeZone;

use crate::models::{
    AlertRuleConfig, EvaluatedHour, ForecastVerdict, HourlyAtmosphericProfile, HourlyObservation,
    SiteDirectionCapability,
};

/// Everything one run of the pipeline produces
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ForecastEvaluation {
    /// Every merged hour in forecast order, including hours outside the window
    pub hours: Vec<EvaluatedHour>,
    pub verdict: ForecastVerdict,
}

/// Merge, score and window a site's forecast in one call.
pub fn evaluate_forecast<Tz: TimeZone>(
    source_a: &[HourlyObservation],
    source_b: &[HourlyAtmosphericProfile],
    directions: &SiteDirectionCapability,
    rule: &AlertRuleConfig,
    window: &WindowConfig,
    tz: &Tz,
) -> ForecastEvaluation {
    evaluate_forecast_with(
        source_a,
        source_b,
        SurfaceFallback::Empty,
        directions,
        rule,
        window,
        tz,
    )
}

pub fn evaluate_forecast_with<Tz: TimeZone>(
    source_a: &[HourlyObservation],
    source_b: &[HourlyAtmosphericProfile],
    fallback: SurfaceFallback,
    directions: &SiteDirectionCapability,
    rule: &AlertRuleConfig,
    window: &WindowConfig,
    tz: &Tz,
) -> ForecastEvaluation {
    let merged = combine_with(source_a, source_b, fallback);
    let hours = evaluate_all(&merged, directions, rule);
    let verdict = detect(hours.clone(), window, tz);
    ForecastEvaluation { hours, verdict }
}
