// SPDX-License-Identifier: MIT

//! Bulk fetch and enrichment pipeline.
//!
//! `fetch_all_activities` walks the paginated listing; `enrich` joins every
//! activity with its detail and streams, degrading per item on failure so
//! one flaky remote call never fails the whole save.

use crate::error::Result;
use crate::models::Activity;
use crate::services::strava::StravaApi;
use futures_util::future::join_all;

/// Page size for the paginated listing.
pub const PER_PAGE: u32 = 200;

/// Stream keys requested for every enriched activity.
pub const STREAM_KEYS: &str = "time,altitude,velocity_smooth,heartrate,cadence,watts";

/// Outcome of an enrichment run: the full dataset in original order plus the
/// ids that fell back to their un-enriched form.
#[derive(Debug, Default)]
pub struct EnrichmentReport {
    pub activities: Vec<Activity>,
    pub degraded: Vec<u64>,
}

/// Fetch the complete activity list, one page at a time.
///
/// Pages are requested sequentially starting at 1 and accumulation stops on
/// the first empty page. A short page is not a terminator: pages are not
/// guaranteed dense, so only an empty response ends the walk (which costs
/// one trailing request when the total is an exact multiple of the page
/// size).
pub async fn fetch_all_activities<C: StravaApi>(client: &C, token: &str) -> Result<Vec<Activity>> {
    let mut all = Vec::new();
    let mut page = 1;

    loop {
        let batch = client.list_activities_page(token, page, PER_PAGE).await?;
        if batch.is_empty() {
            break;
        }
        all.extend(batch);
        page += 1;
    }

    tracing::info!(count = all.len(), pages = page, "Fetched activity list");
    Ok(all)
}

/// Join every activity with its detail and streams.
///
/// All activities fan out jointly and the two calls per activity run
/// concurrently; results are reassembled in original order. A failure on
/// either call degrades that one activity to its original record.
pub async fn enrich<C: StravaApi>(
    client: &C,
    token: &str,
    activities: Vec<Activity>,
) -> EnrichmentReport {
    let tasks = activities.into_iter().map(|activity| async move {
        let detail = client.get_activity_detail(token, activity.id);
        let streams = client.get_activity_streams(token, activity.id, STREAM_KEYS);

        match tokio::try_join!(detail, streams) {
            Ok((detail, streams)) => {
                let mut enriched = activity;
                enriched.efforts = detail.segment_efforts;
                enriched.zones = detail.zones;
                enriched.splits = detail.splits_metric;
                enriched.streams = Some(streams);
                (enriched, false)
            }
            Err(error) => {
                tracing::warn!(
                    activity_id = activity.id,
                    error = %error,
                    "Enrichment failed, keeping bare record"
                );
                (activity, true)
            }
        }
    });

    let mut report = EnrichmentReport::default();
    for (activity, degraded) in join_all(tasks).await {
        if degraded {
            report.degraded.push(activity.id);
        }
        report.activities.push(activity);
    }

    tracing::info!(
        count = report.activities.len(),
        degraded = report.degraded.len(),
        "Enrichment complete"
    );
    report
}
