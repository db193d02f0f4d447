// SPDX-License-Identifier: MIT

//! Service layer: remote client, token lifecycle, pipeline, analytics.

pub mod analysis;
pub mod enrich;
pub mod strava;
pub mod token;

pub use strava::{StravaApi, StravaClient};
pub use token::{Credential, TokenManager};
