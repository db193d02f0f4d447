// SPDX-License-Identifier: MIT

//! Strava-Insights: proxy, cache and analyze a single athlete's Strava data.
//!
//! This crate keeps one OAuth credential fresh, bulk-downloads and enriches
//! the athlete's activities into a local JSON dataset, and serves analytics
//! (weekly load, recurring routes, biometric zones, CSV export) derived from
//! that dataset.

pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

use config::Config;
use services::{StravaClient, TokenManager};
use store::DatasetStore;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub strava: StravaClient,
    pub token: TokenManager,
    pub store: DatasetStore,
}
