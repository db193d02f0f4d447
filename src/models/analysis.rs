// SPDX-License-Identifier: MIT

//! Result shapes produced by the analytics engine.

use serde::{Deserialize, Serialize};

/// Weekly training-load rollup.
///
/// The vectors are parallel, one entry per bucket, ordered by plain string
/// comparison of the `"{year}-W{week}"` labels. Numeric columns are
/// pre-formatted strings (1 decimal for km and hours, 0 for elevation) to
/// match what chart consumers already expect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyReport {
    /// Human-readable summary of the most recent bucket
    pub text: String,
    pub labels: Vec<String>,
    pub distance_km: Vec<String>,
    pub time_hours: Vec<String>,
    pub elevation_m: Vec<String>,
    pub counts: Vec<u32>,
}

/// A recurring route: activities sharing the same polyline-prefix signature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteGroup {
    /// Name of the first-seen activity in the group
    pub route: String,
    /// The 30-character polyline prefix used as the group key
    pub hash: String,
    pub count: u32,
}

/// Raw biometric sample arrays for one activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiometricProfile {
    pub id: u64,
    pub name: String,
    pub heartrate: Vec<f64>,
    pub cadence: Vec<f64>,
    pub watts: Vec<f64>,
    pub velocity: Vec<f64>,
    pub altitude: Vec<f64>,
}

/// Per-activity mean of one requested metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricComparison {
    pub id: u64,
    pub name: String,
    /// Arithmetic mean, rounded to 1 decimal
    pub average: f64,
    pub samples: usize,
}

/// Heart-rate intensity summary for one activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntensityProfile {
    pub id: u64,
    pub name: String,
    pub avg_heartrate: f64,
    pub max_heartrate: f64,
    pub avg_watts: f64,
    /// Heart-rate sample count, used as a duration proxy
    pub samples: usize,
    /// Zone histogram: <120, 120-139, 140-159, 160-179, >=180
    pub zones: [u32; 5],
}
