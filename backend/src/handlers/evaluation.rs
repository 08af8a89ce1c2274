//! HTTP handlers for forecast evaluation endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use shared::{Language, Verdict};

use crate::error::{AppError, AppResult};
use crate::models::{
    AdHocEvaluationRequest, BatchEvaluationRequest, BatchEvaluationResponse, BatchSiteResult,
    BatchStatus, EvaluationResponse, ForecastInput, LanguageQuery,
};
use crate::services::EvaluationService;
use crate::AppState;

fn service(state: &AppState) -> EvaluationService {
    EvaluationService::new(state.sites.clone(), state.config.evaluation.clone())
}

/// Resolve `?lang=`, defaulting to English
fn language(query: &LanguageQuery) -> AppResult<Language> {
    match query.lang.as_deref() {
        None => Ok(Language::default()),
        Some(code) => Language::from_code(code).ok_or_else(|| AppError::Validation {
            field: "lang".to_string(),
            message: format!("Unsupported language: {}", code),
            message_no: format!("Språket støttes ikke: {}", code),
        }),
    }
}

/// Evaluate a forecast for a registered site
pub async fn evaluate_site(
    State(state): State<AppState>,
    Path(site_id): Path<String>,
    Query(query): Query<LanguageQuery>,
    Json(input): Json<ForecastInput>,
) -> AppResult<Json<EvaluationResponse>> {
    let language = language(&query)?;
    let evaluation = service(&state).evaluate_site(&site_id, input).await?;
    Ok(Json(EvaluationResponse::new(
        Some(site_id),
        evaluation,
        language,
    )))
}

/// Evaluate a forecast for a site described in the request
pub async fn evaluate_ad_hoc(
    State(state): State<AppState>,
    Query(query): Query<LanguageQuery>,
    Json(request): Json<AdHocEvaluationRequest>,
) -> AppResult<Json<EvaluationResponse>> {
    let language = language(&query)?;
    let evaluation = service(&state).evaluate_ad_hoc(request).await?;
    Ok(Json(EvaluationResponse::new(None, evaluation, language)))
}

/// Evaluate several registered sites at once
pub async fn evaluate_batch(
    State(state): State<AppState>,
    Query(query): Query<LanguageQuery>,
    Json(request): Json<BatchEvaluationRequest>,
) -> AppResult<Json<BatchEvaluationResponse>> {
    let language = language(&query)?;
    let outcomes = service(&state).evaluate_batch(request).await?;

    let results: Vec<BatchSiteResult> = outcomes
        .into_iter()
        .map(|outcome| match outcome.result {
            Ok(evaluation) => BatchSiteResult {
                evaluation: Some(EvaluationResponse::new(
                    Some(outcome.site_id.clone()),
                    evaluation,
                    language,
                )),
                site_id: outcome.site_id,
                status: BatchStatus::Ok,
                error: None,
            },
            Err(err) => BatchSiteResult {
                site_id: outcome.site_id,
                status: BatchStatus::Failed,
                evaluation: None,
                error: Some(err.to_string()),
            },
        })
        .collect();

    let overall = Verdict::from(results.iter().any(|r| {
        r.evaluation
            .as_ref()
            .is_some_and(|e| e.overall.is_positive())
    }));

    Ok(Json(BatchEvaluationResponse { overall, results }))
}
