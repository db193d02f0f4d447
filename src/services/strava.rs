// SPDX-License-Identifier: MIT

//! Strava API client.
//!
//! Thin typed wrappers over the REST calls used by the enrichment pipeline:
//! paginated activity listing, per-activity detail and per-activity streams,
//! plus the OAuth refresh exchange. The client performs no retries; retry
//! and degrade policy belongs to the callers.

use crate::error::{AppError, Result};
use crate::models::{Activity, StreamSet};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use std::future::Future;

/// Remote operations needed by the token manager and the enrichment
/// pipeline. `StravaClient` is the production implementation; tests
/// substitute in-memory fakes.
pub trait StravaApi: Send + Sync {
    /// Exchange the configured refresh token for a fresh access token.
    fn refresh_token(&self) -> impl Future<Output = Result<TokenRefreshResponse>> + Send;

    /// One page of the athlete's activities (possibly empty).
    fn list_activities_page(
        &self,
        token: &str,
        page: u32,
        per_page: u32,
    ) -> impl Future<Output = Result<Vec<Activity>>> + Send;

    /// Detailed activity (segment efforts, zones, splits).
    fn get_activity_detail(
        &self,
        token: &str,
        id: u64,
    ) -> impl Future<Output = Result<ActivityDetail>> + Send;

    /// Named stream bundle for one activity.
    fn get_activity_streams(
        &self,
        token: &str,
        id: u64,
        keys: &str,
    ) -> impl Future<Output = Result<StreamSet>> + Send;
}

/// Strava API client over `reqwest`.
#[derive(Clone)]
pub struct StravaClient {
    http: reqwest::Client,
    base_url: String,
    token_url: String,
    client_id: String,
    client_secret: String,
    refresh_token: String,
}

impl StravaClient {
    /// Create a new client with the fixed OAuth credential triple.
    pub fn new(client_id: String, client_secret: String, refresh_token: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: "https://www.strava.com/api/v3".to_string(),
            token_url: "https://www.strava.com/oauth/token".to_string(),
            client_id,
            client_secret,
            refresh_token,
        }
    }

    /// Generic GET request with JSON response.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        token: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let response = self
            .http
            .get(url)
            .bearer_auth(token)
            .query(query)
            .send()
            .await
            .map_err(|e| AppError::Transport(e.to_string()))?;

        check_response_json(response).await
    }
}

impl StravaApi for StravaClient {
    async fn refresh_token(&self) -> Result<TokenRefreshResponse> {
        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("refresh_token", self.refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(|e| AppError::Transport(format!("token refresh request failed: {}", e)))?;

        check_response_json(response).await
    }

    async fn list_activities_page(
        &self,
        token: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Activity>> {
        let url = format!("{}/athlete/activities", self.base_url);
        self.get_json(
            &url,
            token,
            &[
                ("per_page", per_page.to_string()),
                ("page", page.to_string()),
            ],
        )
        .await
    }

    async fn get_activity_detail(&self, token: &str, id: u64) -> Result<ActivityDetail> {
        let url = format!("{}/activities/{}", self.base_url, id);
        self.get_json(&url, token, &[("include_all_efforts", "true".to_string())])
            .await
    }

    async fn get_activity_streams(&self, token: &str, id: u64, keys: &str) -> Result<StreamSet> {
        let url = format!("{}/activities/{}/streams", self.base_url, id);
        self.get_json(
            &url,
            token,
            &[
                ("keys", keys.to_string()),
                ("key_by_type", "true".to_string()),
            ],
        )
        .await
    }
}

/// Check response status and parse the JSON body.
async fn check_response_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::Remote { status, body });
    }

    response
        .json()
        .await
        .map_err(|e| AppError::Transport(format!("JSON parse error: {}", e)))
}

/// Token refresh response from Strava.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenRefreshResponse {
    pub access_token: String,
    /// Absolute expiry, epoch seconds
    pub expires_at: i64,
}

/// Detailed activity response.
///
/// The enrichment pipeline only merges the three named fields; everything
/// else stays in `extra` so the detail proxy endpoint returns the full
/// payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment_efforts: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zones: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub splits_metric: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
