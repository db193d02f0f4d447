// SPDX-License-Identifier: MIT

//! Analysis routes over the cached dataset.
//!
//! These never touch the remote API: they load the persisted dataset and
//! run pure analytics, answering 404 when nothing has been saved yet.

use crate::error::Result;
use crate::models::{BiometricProfile, IntensityProfile, MetricComparison, RouteGroup, WeeklyReport};
use crate::services::analysis;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/analyze/week", get(analyze_week))
        .route("/recognize/routes", get(recognize_routes))
        .route("/analyze/biometrics", get(analyze_biometrics))
        .route("/compare/activities/{metric}", get(compare_activities))
        .route("/analyze/intensity", get(analyze_intensity))
        .route("/export/csv", get(export_csv))
}

async fn analyze_week(State(state): State<Arc<AppState>>) -> Result<Json<WeeklyReport>> {
    let activities = state.store.load().await?;
    Ok(Json(analysis::weekly_rollup(&activities)))
}

#[derive(Serialize)]
pub struct RoutesResponse {
    pub routes: Vec<RouteGroup>,
}

async fn recognize_routes(State(state): State<Arc<AppState>>) -> Result<Json<RoutesResponse>> {
    let activities = state.store.load().await?;
    Ok(Json(RoutesResponse {
        routes: analysis::recognize_routes(&activities),
    }))
}

async fn analyze_biometrics(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<BiometricProfile>>> {
    let activities = state.store.load().await?;
    Ok(Json(analysis::biometrics(&activities)))
}

async fn compare_activities(
    State(state): State<Arc<AppState>>,
    Path(metric): Path<String>,
) -> Result<Json<Vec<MetricComparison>>> {
    let activities = state.store.load().await?;
    Ok(Json(analysis::compare_metric(&activities, &metric)))
}

async fn analyze_intensity(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<IntensityProfile>>> {
    let activities = state.store.load().await?;
    Ok(Json(analysis::intensity(&activities)))
}

/// Build the CSV export, persist it through the store and return it.
async fn export_csv(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse> {
    let activities = state.store.load().await?;
    let csv = analysis::export_csv(&activities);
    state.store.save_csv(&csv).await?;

    Ok(([(header::CONTENT_TYPE, "text/csv")], csv))
}
