// SPDX-License-Identifier: MIT

//! Proxy routes against the Strava API.
//!
//! Every handler here validates the cached credential first (refreshing it
//! if needed) before issuing remote calls.

use crate::error::Result;
use crate::models::{Activity, StreamSet};
use crate::services::enrich::{self, PER_PAGE, STREAM_KEYS};
use crate::services::strava::{ActivityDetail, StravaApi};
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/strava/activities", get(list_all))
        .route("/strava/activities/page/{page}", get(list_page))
        .route("/strava/activity/{id}", get(activity_detail))
        .route("/strava/activity/{id}/streams", get(activity_streams))
        .route("/strava/save-activities", get(save_activities))
        .route("/strava/save-enriched", get(save_enriched))
        .route("/strava/token-info", get(token_info))
}

/// Full activity list (all pages), not persisted.
async fn list_all(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Activity>>> {
    let credential = state.token.ensure_valid(&state.strava).await?;
    let activities = enrich::fetch_all_activities(&state.strava, &credential.access_token).await?;
    Ok(Json(activities))
}

/// Single page proxy.
async fn list_page(
    State(state): State<Arc<AppState>>,
    Path(page): Path<u32>,
) -> Result<Json<Vec<Activity>>> {
    let credential = state.token.ensure_valid(&state.strava).await?;
    let activities = state
        .strava
        .list_activities_page(&credential.access_token, page, PER_PAGE)
        .await?;
    Ok(Json(activities))
}

/// Detail proxy (segment efforts, zones, splits).
async fn activity_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<ActivityDetail>> {
    let credential = state.token.ensure_valid(&state.strava).await?;
    let detail = state
        .strava
        .get_activity_detail(&credential.access_token, id)
        .await?;
    Ok(Json(detail))
}

/// Streams proxy.
async fn activity_streams(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<StreamSet>> {
    let credential = state.token.ensure_valid(&state.strava).await?;
    let streams = state
        .strava
        .get_activity_streams(&credential.access_token, id, STREAM_KEYS)
        .await?;
    Ok(Json(streams))
}

/// Response for the two save endpoints.
#[derive(Serialize)]
pub struct SaveResponse {
    pub status: String,
    pub count: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub degraded: Vec<u64>,
}

/// Fetch the full list and persist it as-is.
async fn save_activities(State(state): State<Arc<AppState>>) -> Result<Json<SaveResponse>> {
    let credential = state.token.ensure_valid(&state.strava).await?;
    let activities = enrich::fetch_all_activities(&state.strava, &credential.access_token).await?;
    state.store.save(&activities).await?;

    Ok(Json(SaveResponse {
        status: "saved".to_string(),
        count: activities.len(),
        degraded: Vec::new(),
    }))
}

/// Fetch the full list, enrich per activity, persist the mixed result.
/// Per-item enrichment failures degrade to bare records; only the initial
/// listing failure aborts the request.
async fn save_enriched(State(state): State<Arc<AppState>>) -> Result<Json<SaveResponse>> {
    let credential = state.token.ensure_valid(&state.strava).await?;
    let activities = enrich::fetch_all_activities(&state.strava, &credential.access_token).await?;
    let report = enrich::enrich(&state.strava, &credential.access_token, activities).await;
    state.store.save(&report.activities).await?;

    Ok(Json(SaveResponse {
        status: "saved".to_string(),
        count: report.activities.len(),
        degraded: report.degraded,
    }))
}

#[derive(Serialize)]
pub struct TokenInfoResponse {
    pub token_preview: String,
    pub expires_at: i64,
    pub expires_in_secs: i64,
}

/// Expiry metadata for the cached credential (refreshes it if needed).
async fn token_info(State(state): State<Arc<AppState>>) -> Result<Json<TokenInfoResponse>> {
    let credential = state.token.ensure_valid(&state.strava).await?;
    let now = chrono::Utc::now().timestamp();

    Ok(Json(TokenInfoResponse {
        token_preview: credential.masked_token(),
        expires_at: credential.expires_at,
        expires_in_secs: credential.expires_at - now,
    }))
}
