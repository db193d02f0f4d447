// SPDX-License-Identifier: MIT

//! OAuth credential lifecycle.
//!
//! Keeps the single fixed-athlete access token valid: the expiry is
//! re-checked before every remote call and the refresh exchange runs at most
//! once at a time (single-flight), with concurrent callers sharing its
//! result.

use crate::error::{AppError, Result};
use crate::services::strava::StravaApi;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Access token plus its absolute expiry (epoch seconds).
#[derive(Debug, Clone)]
pub struct Credential {
    pub access_token: String,
    pub expires_at: i64,
}

impl Credential {
    pub fn is_valid_at(&self, now: i64) -> bool {
        now < self.expires_at
    }

    /// Last four characters of the token, for diagnostics endpoints.
    pub fn masked_token(&self) -> String {
        let tail = self
            .access_token
            .get(self.access_token.len().saturating_sub(4)..)
            .unwrap_or("");
        format!("...{}", tail)
    }
}

/// Process-wide credential store and refresh coordinator.
#[derive(Clone, Default)]
pub struct TokenManager {
    /// Lazily populated; overwritten only by a successful refresh.
    credential: Arc<RwLock<Option<Credential>>>,
    /// Serializes refresh exchanges.
    refresh_lock: Arc<Mutex<()>>,
}

impl TokenManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with a known credential (tests, warm restarts).
    pub async fn set_credential(&self, credential: Credential) {
        *self.credential.write().await = Some(credential);
    }

    /// Current credential, valid or not.
    pub async fn current(&self) -> Option<Credential> {
        self.credential.read().await.clone()
    }

    /// Return a valid credential, refreshing through `client` if the stored
    /// one is missing or expired.
    ///
    /// On refresh failure the stored credential is left untouched, so the
    /// next call re-checks and retries the exchange.
    pub async fn ensure_valid<C: StravaApi>(&self, client: &C) -> Result<Credential> {
        let now = Utc::now().timestamp();

        // Fast path: current credential still valid.
        if let Some(credential) = self.credential.read().await.as_ref() {
            if credential.is_valid_at(now) {
                return Ok(credential.clone());
            }
        }

        // Only one task performs the exchange; the rest wait here.
        let _guard = self.refresh_lock.lock().await;

        // Re-check after acquiring the lock: another task may have refreshed
        // while we were waiting.
        if let Some(credential) = self.credential.read().await.as_ref() {
            if credential.is_valid_at(now) {
                return Ok(credential.clone());
            }
        }

        let response = client
            .refresh_token()
            .await
            .map_err(|e| AppError::TokenRefresh(e.to_string()))?;

        let credential = Credential {
            access_token: response.access_token,
            expires_at: response.expires_at,
        };
        *self.credential.write().await = Some(credential.clone());

        tracing::info!(expires_at = credential.expires_at, "Access token refreshed");
        Ok(credential)
    }
}
