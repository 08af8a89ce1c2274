//! Error handling for the Paragliding Alerts evaluation service
//!
//! Provides consistent error responses in English and Norwegian

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {message}")]
    Validation {
        field: String,
        message: String,
        message_no: String,
    },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),

    #[error("Too many items: {resource} (limit {limit})")]
    TooManyItems { resource: String, limit: usize },

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Evaluation errors
    #[error("Evaluation failed for site {site_id}")]
    EvaluationFailed { site_id: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        // Report the first offending field, nested paths joined with dots
        let (field, detail) = first_field_error(&errors)
            .unwrap_or_else(|| ("request".to_string(), "invalid value".to_string()));

        AppError::Validation {
            message: format!("Invalid value for {}: {}", field, detail),
            message_no: format!("Ugyldig verdi for {}: {}", field, detail),
            field,
        }
    }
}

fn first_field_error(errors: &validator::ValidationErrors) -> Option<(String, String)> {
    use validator::ValidationErrorsKind;

    let mut fields: Vec<_> = errors.errors().iter().collect();
    fields.sort_by_key(|(name, _)| *name);

    for (name, kind) in fields {
        match kind {
            ValidationErrorsKind::Field(list) => {
                if let Some(err) = list.first() {
                    let detail = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string());
                    return Some((name.to_string(), detail));
                }
            }
            ValidationErrorsKind::Struct(inner) => {
                if let Some((field, detail)) = first_field_error(inner) {
                    return Some((nested_path(name.to_string(), &field), detail));
                }
            }
            ValidationErrorsKind::List(items) => {
                if let Some((index, inner)) = items.iter().next() {
                    if let Some((field, detail)) = first_field_error(inner) {
                        let parent = format!("{}[{}]", name, index);
                        return Some((nested_path(parent, &field), detail));
                    }
                }
            }
        }
    }
    None
}

/// Struct-level checks report under `__all__`; attribute those to the parent
fn nested_path(parent: String, field: &str) -> String {
    if field == "__all__" {
        parent
    } else {
        format!("{}.{}", parent, field)
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_no: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::Validation {
                field,
                message,
                message_no,
            } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message_en: message.clone(),
                    message_no: message_no.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::ValidationError(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message_en: msg.clone(),
                    message_no: format!("Ugyldige data: {}", msg),
                    field: None,
                },
            ),
            AppError::UnknownTimezone(name) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "UNKNOWN_TIMEZONE".to_string(),
                    message_en: format!("Unknown timezone: {}", name),
                    message_no: format!("Ukjent tidssone: {}", name),
                    field: Some("timezone".to_string()),
                },
            ),
            AppError::TooManyItems { resource, limit } => (
                StatusCode::PAYLOAD_TOO_LARGE,
                ErrorDetail {
                    code: "TOO_MANY_ITEMS".to_string(),
                    message_en: format!("At most {} {} are allowed", limit, resource),
                    message_no: format!("Maks {} {} er tillatt", limit, resource),
                    field: Some(resource.clone()),
                },
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "NOT_FOUND".to_string(),
                    message_en: format!("{} not found", resource),
                    message_no: format!("Fant ikke {}", resource),
                    field: None,
                },
            ),
            AppError::EvaluationFailed { site_id } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "EVALUATION_FAILED".to_string(),
                    message_en: format!("Forecast evaluation failed for site {}", site_id),
                    message_no: format!("Vurdering av varselet feilet for {}", site_id),
                    field: None,
                },
            ),
            AppError::Configuration(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "CONFIGURATION_ERROR".to_string(),
                    message_en: format!("Configuration error: {}", msg),
                    message_no: format!("Feil i konfigurasjonen: {}", msg),
                    field: None,
                },
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message_en: msg.clone(),
                    message_no: "Det oppstod en intern feil".to_string(),
                    field: None,
                },
            ),
            AppError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message_en: "An internal server error occurred".to_string(),
                    message_no: "Det oppstod en intern feil".to_string(),
                    field: None,
                },
            ),
        };

        // Log the error for debugging
        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::debug!("Request rejected: {:?}", self);
        }

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
