// SPDX-License-Identifier: MIT

//! Shared test fixtures: an in-memory Strava API fake and app construction.

use serde_json::json;
use std::collections::HashSet;
use std::sync::atomic::AtomicU32;
use std::sync::Arc;
use strava_insights::config::Config;
use strava_insights::error::{AppError, Result};
use strava_insights::models::{Activity, Stream, StreamSet};
use strava_insights::services::strava::{ActivityDetail, StravaApi, TokenRefreshResponse};
use strava_insights::services::{StravaClient, TokenManager};
use strava_insights::store::DatasetStore;
use strava_insights::AppState;

/// In-memory fake of the Strava API with call counters.
#[derive(Default)]
#[allow(dead_code)]
pub struct FakeStrava {
    /// Page N (1-indexed) returns `pages[N-1]`; anything past the end is
    /// an empty page.
    pub pages: Vec<Vec<Activity>>,
    /// Activity ids whose detail fetch fails.
    pub failing_details: HashSet<u64>,
    /// Expiry stamped on every refreshed token.
    pub token_expires_at: i64,
    pub refresh_calls: AtomicU32,
    pub page_calls: AtomicU32,
}

impl StravaApi for FakeStrava {
    async fn refresh_token(&self) -> Result<TokenRefreshResponse> {
        self.refresh_calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        // Force a suspension point so concurrent callers pile up on the
        // refresh lock.
        tokio::task::yield_now().await;
        Ok(TokenRefreshResponse {
            access_token: "fresh_token".to_string(),
            expires_at: self.token_expires_at,
        })
    }

    async fn list_activities_page(
        &self,
        _token: &str,
        page: u32,
        _per_page: u32,
    ) -> Result<Vec<Activity>> {
        self.page_calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Ok(self
            .pages
            .get((page - 1) as usize)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_activity_detail(&self, _token: &str, id: u64) -> Result<ActivityDetail> {
        if self.failing_details.contains(&id) {
            return Err(AppError::Remote {
                status: 500,
                body: "upstream blew up".to_string(),
            });
        }
        Ok(ActivityDetail {
            segment_efforts: Some(json!([{ "id": id * 100 }])),
            zones: Some(json!([])),
            splits_metric: Some(json!([])),
            extra: Default::default(),
        })
    }

    async fn get_activity_streams(&self, _token: &str, _id: u64, _keys: &str) -> Result<StreamSet> {
        let mut streams = StreamSet::new();
        streams.insert(
            "heartrate".to_string(),
            Stream {
                data: vec![130.0, 140.0, 150.0],
                extra: Default::default(),
            },
        );
        Ok(streams)
    }
}

/// Bare activity with just an id and a name.
#[allow(dead_code)]
pub fn activity(id: u64) -> Activity {
    serde_json::from_value(json!({ "id": id, "name": format!("Activity {id}") })).unwrap()
}

/// Activity built from arbitrary JSON.
#[allow(dead_code)]
pub fn activity_from(value: serde_json::Value) -> Activity {
    serde_json::from_value(value).unwrap()
}

/// App state backed by a store in `dir` and a real (never-called) client.
#[allow(dead_code)]
pub fn test_state(dir: &tempfile::TempDir) -> Arc<AppState> {
    let config = Config::default();
    let strava = StravaClient::new(
        config.strava_client_id.clone(),
        config.strava_client_secret.clone(),
        config.strava_refresh_token.clone(),
    );
    let store = DatasetStore::new(
        dir.path().join("activities.json"),
        dir.path().join("activities.csv"),
    );

    Arc::new(AppState {
        config,
        strava,
        token: TokenManager::new(),
        store,
    })
}
