// SPDX-License-Identifier: MIT

//! Data models.

pub mod activity;
pub mod analysis;

pub use activity::{Activity, ActivityMap, Stream, StreamSet};
pub use analysis::{
    BiometricProfile, IntensityProfile, MetricComparison, RouteGroup, WeeklyReport,
};
