// SPDX-License-Identifier: MIT

//! Tests for credential reuse and single-flight refresh.

use chrono::Utc;
use std::sync::atomic::Ordering;
use strava_insights::services::{Credential, TokenManager};

mod common;
use common::FakeStrava;

#[tokio::test]
async fn valid_credential_is_reused_without_refresh() {
    let fake = FakeStrava {
        token_expires_at: Utc::now().timestamp() + 3600,
        ..Default::default()
    };
    let manager = TokenManager::new();
    manager
        .set_credential(Credential {
            access_token: "cached_token".to_string(),
            expires_at: Utc::now().timestamp() + 3600,
        })
        .await;

    let credential = manager.ensure_valid(&fake).await.unwrap();

    assert_eq!(credential.access_token, "cached_token");
    assert_eq!(fake.refresh_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn expired_credential_triggers_refresh() {
    let fake = FakeStrava {
        token_expires_at: Utc::now().timestamp() + 3600,
        ..Default::default()
    };
    let manager = TokenManager::new();
    manager
        .set_credential(Credential {
            access_token: "stale_token".to_string(),
            expires_at: Utc::now().timestamp() - 10,
        })
        .await;

    let credential = manager.ensure_valid(&fake).await.unwrap();

    assert_eq!(credential.access_token, "fresh_token");
    assert_eq!(fake.refresh_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn concurrent_callers_share_one_refresh() {
    let fake = FakeStrava {
        token_expires_at: Utc::now().timestamp() + 3600,
        ..Default::default()
    };
    let manager = TokenManager::new();

    let results =
        futures_util::future::join_all((0..8).map(|_| manager.ensure_valid(&fake))).await;

    for result in results {
        assert_eq!(result.unwrap().access_token, "fresh_token");
    }
    assert_eq!(fake.refresh_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn failed_refresh_leaves_credential_untouched() {
    // A fake whose refresh always fails.
    struct BrokenExchange;
    impl strava_insights::services::StravaApi for BrokenExchange {
        async fn refresh_token(
            &self,
        ) -> strava_insights::error::Result<
            strava_insights::services::strava::TokenRefreshResponse,
        > {
            Err(strava_insights::error::AppError::Remote {
                status: 400,
                body: "invalid_grant".to_string(),
            })
        }

        async fn list_activities_page(
            &self,
            _token: &str,
            _page: u32,
            _per_page: u32,
        ) -> strava_insights::error::Result<Vec<strava_insights::models::Activity>> {
            unreachable!("not used in this test")
        }

        async fn get_activity_detail(
            &self,
            _token: &str,
            _id: u64,
        ) -> strava_insights::error::Result<strava_insights::services::strava::ActivityDetail>
        {
            unreachable!("not used in this test")
        }

        async fn get_activity_streams(
            &self,
            _token: &str,
            _id: u64,
            _keys: &str,
        ) -> strava_insights::error::Result<strava_insights::models::StreamSet> {
            unreachable!("not used in this test")
        }
    }

    let manager = TokenManager::new();
    let stale = Credential {
        access_token: "stale_token".to_string(),
        expires_at: Utc::now().timestamp() - 10,
    };
    manager.set_credential(stale).await;

    let result = manager.ensure_valid(&BrokenExchange).await;
    assert!(matches!(
        result,
        Err(strava_insights::error::AppError::TokenRefresh(_))
    ));

    // The expired credential is still in place, so the next check fails
    // validity again and retries the exchange.
    let current = manager.current().await.unwrap();
    assert_eq!(current.access_token, "stale_token");
}
