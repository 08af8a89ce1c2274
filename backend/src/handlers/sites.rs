//! HTTP handlers for the site registry

use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::AppResult;
use crate::models::SiteSummary;
use crate::AppState;

/// List every registered site
pub async fn list_sites(State(state): State<AppState>) -> Json<Vec<SiteSummary>> {
    Json(state.sites.iter().map(|site| site.summary()).collect())
}

/// Get one registered site
pub async fn get_site(
    State(state): State<AppState>,
    Path(site_id): Path<String>,
) -> AppResult<Json<SiteSummary>> {
    let site = state.sites.get(&site_id)?;
    Ok(Json(site.summary()))
}
