//! Forecast evaluation service
//!
//! Runs the shared scoring pipeline off the async runtime. Each site is
//! evaluated on its own blocking task, so a panic inside the engine fails
//! that site's result as a whole and leaves every other site untouched.

use std::sync::Arc;

use chrono_tz::Tz;
use shared::{
    evaluate_forecast_with, AlertRuleConfig, ForecastEvaluation, HourlyAtmosphericProfile,
    HourlyObservation, SiteDirectionCapability, SurfaceFallback, WindowConfig,
};
use validator::Validate;

use crate::config::EvaluationConfig;
use crate::error::{AppError, AppResult};
use crate::models::{AdHocEvaluationRequest, BatchEvaluationRequest, ForecastInput};
use crate::services::sites::{parse_timezone, SiteRegistry};

/// Everything the engine needs for one site's run
#[derive(Debug, Clone)]
pub struct EvaluationJob {
    pub site_id: String,
    pub directions: SiteDirectionCapability,
    pub rule: AlertRuleConfig,
    pub window: WindowConfig,
    pub timezone: Tz,
    pub fallback: SurfaceFallback,
    pub short_range: Vec<HourlyObservation>,
    pub extended: Vec<HourlyAtmosphericProfile>,
}

impl EvaluationJob {
    pub fn run(&self) -> ForecastEvaluation {
        evaluate_forecast_with(
            &self.short_range,
            &self.extended,
            self.fallback,
            &self.directions,
            &self.rule,
            &self.window,
            &self.timezone,
        )
    }
}

/// Outcome of one site inside a batch
#[derive(Debug)]
pub struct SiteOutcome {
    pub site_id: String,
    pub result: AppResult<ForecastEvaluation>,
}

/// Evaluation service for registered and ad-hoc sites
#[derive(Clone)]
pub struct EvaluationService {
    sites: Arc<SiteRegistry>,
    config: EvaluationConfig,
}

impl EvaluationService {
    pub fn new(sites: Arc<SiteRegistry>, config: EvaluationConfig) -> Self {
        Self { sites, config }
    }

    /// Evaluate a forecast for a registered site
    pub async fn evaluate_site(
        &self,
        site_id: &str,
        input: ForecastInput,
    ) -> AppResult<ForecastEvaluation> {
        let job = self.site_job(site_id, input)?;
        run_job(job).await
    }

    /// Evaluate a forecast for a site described in the request itself
    pub async fn evaluate_ad_hoc(
        &self,
        request: AdHocEvaluationRequest,
    ) -> AppResult<ForecastEvaluation> {
        request.validate()?;
        self.check_series_length(&request.forecast)?;

        let directions = SiteDirectionCapability::from_tags(&request.directions).map_err(|e| {
            AppError::Validation {
                field: "directions".to_string(),
                message: e.to_string(),
                message_no: format!("Ukjent vindretning: {}", e.0),
            }
        })?;

        let rule = request.rule.unwrap_or_default();
        shared::validate_alert_rule(&rule).map_err(|msg| field_error("rule", msg))?;

        let window = request.window.unwrap_or(self.config.window);
        shared::validate_window(&window).map_err(|msg| field_error("window", msg))?;

        let timezone = parse_timezone(
            request
                .timezone
                .as_deref()
                .unwrap_or(&self.config.default_timezone),
        )?;

        let fallback = request
            .forecast
            .surface_fallback
            .unwrap_or(self.config.surface_fallback);
        let (short_range, extended) = request.forecast.into_series();

        run_job(EvaluationJob {
            site_id: "ad-hoc".to_string(),
            directions,
            rule,
            window,
            timezone,
            fallback,
            short_range,
            extended,
        })
        .await
    }

    /// Evaluate many registered sites concurrently.
    ///
    /// The request as a whole is rejected only for malformed input; unknown
    /// sites and failed evaluations are reported per site.
    pub async fn evaluate_batch(&self, request: BatchEvaluationRequest) -> AppResult<Vec<SiteOutcome>> {
        request.validate()?;
        if request.sites.is_empty() {
            return Err(field_error("sites", "at least one site is required"));
        }
        if request.sites.len() > self.config.max_batch_sites {
            return Err(AppError::TooManyItems {
                resource: "sites".to_string(),
                limit: self.config.max_batch_sites,
            });
        }

        tracing::info!(sites = request.sites.len(), "Starting batch evaluation");

        let handles: Vec<_> = request
            .sites
            .into_iter()
            .map(|entry| {
                let site_id = entry.site_id.clone();
                let job = self.site_job(&entry.site_id, entry.forecast);
                let handle = job.map(|job| tokio::spawn(run_job(job)));
                (site_id, handle)
            })
            .collect();

        let mut outcomes = Vec::with_capacity(handles.len());
        for (site_id, handle) in handles {
            let result = match handle {
                Ok(task) => match task.await {
                    Ok(result) => result,
                    Err(err) => {
                        tracing::error!(site_id = %site_id, "Batch task aborted: {}", err);
                        Err(AppError::EvaluationFailed {
                            site_id: site_id.clone(),
                        })
                    }
                },
                Err(err) => Err(err),
            };
            outcomes.push(SiteOutcome { site_id, result });
        }

        let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
        tracing::info!(
            sites = outcomes.len(),
            failed,
            "Batch evaluation finished"
        );

        Ok(outcomes)
    }

    fn site_job(&self, site_id: &str, input: ForecastInput) -> AppResult<EvaluationJob> {
        input.validate()?;
        self.check_series_length(&input)?;

        let site = self.sites.get(site_id)?;
        let fallback = input.surface_fallback.unwrap_or(self.config.surface_fallback);
        let (short_range, extended) = input.into_series();

        Ok(EvaluationJob {
            site_id: site.id.clone(),
            directions: site.directions.clone(),
            rule: site.rule.clone(),
            window: site.window,
            timezone: site.timezone,
            fallback,
            short_range,
            extended,
        })
    }

    fn check_series_length(&self, input: &ForecastInput) -> AppResult<()> {
        let limit = self.config.max_hours_per_series;
        if input.short_range.len() > limit || input.extended.len() > limit {
            return Err(AppError::TooManyItems {
                resource: "forecast hours".to_string(),
                limit,
            });
        }
        Ok(())
    }
}

fn field_error(field: &str, message: &str) -> AppError {
    AppError::Validation {
        field: field.to_string(),
        message: message.to_string(),
        message_no: format!("Ugyldig verdi for {}", field),
    }
}

/// Run one job on the blocking pool
async fn run_job(job: EvaluationJob) -> AppResult<ForecastEvaluation> {
    let site_id = job.site_id.clone();
    tracing::debug!(
        site_id = %site_id,
        short_range_hours = job.short_range.len(),
        extended_hours = job.extended.len(),
        "Evaluating forecast"
    );

    let evaluation = run_isolated(site_id.clone(), move || job.run()).await?;
    tracing::info!(
        site_id = %site_id,
        overall = %evaluation.verdict.overall,
        positive_days = evaluation.verdict.positive_days().count(),
        "Forecast evaluated"
    );
    Ok(evaluation)
}

/// A panic in `work` becomes an evaluation failure for `site_id` only
async fn run_isolated<T, F>(site_id: String, work: F) -> AppResult<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work).await.map_err(|err| {
        tracing::error!(site_id = %site_id, "Forecast evaluation panicked: {}", err);
        AppError::EvaluationFailed { site_id }
    })
}
