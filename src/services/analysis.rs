// SPDX-License-Identifier: MIT

//! Analytics engine.
//!
//! Pure, deterministic functions over the cached dataset. Nothing here
//! mutates the dataset or talks to the network; handlers load the dataset
//! through the store and pass it in.

use crate::models::{
    Activity, BiometricProfile, IntensityProfile, MetricComparison, RouteGroup, WeeklyReport,
};
use chrono::Datelike;
use std::collections::HashMap;

/// Number of polyline characters used as a route signature. Deliberately
/// coarse: a shared prefix, not a geometric hash.
const ROUTE_SIGNATURE_LEN: usize = 30;

/// Heart-rate zone lower bounds (zone 1 is everything below the first).
const HR_ZONE_BOUNDS: [f64; 4] = [120.0, 140.0, 160.0, 180.0];

#[derive(Debug, Default)]
struct WeeklyBucket {
    distance: f64,
    time: f64,
    elevation: f64,
    count: u32,
}

/// Week bucket key: `"{year}-W{week}"`, where the week number counts
/// Sunday-started weeks from January 1st.
fn week_key(raw: &str) -> Option<String> {
    let date = chrono::DateTime::parse_from_rfc3339(raw).ok()?.date_naive();
    let jan1 = chrono::NaiveDate::from_ymd_opt(date.year(), 1, 1)?;
    let days = (date - jan1).num_days();
    let weekday = jan1.weekday().num_days_from_sunday() as i64; // 0 = Sunday
    let week = (days + weekday + 1 + 6) / 7; // ceil((days + weekday + 1) / 7)
    Some(format!("{}-W{}", date.year(), week))
}

/// Sum distance, moving time and elevation per week.
pub fn weekly_rollup(activities: &[Activity]) -> WeeklyReport {
    let mut weeks: HashMap<String, WeeklyBucket> = HashMap::new();

    for activity in activities {
        let Some(raw) = activity
            .start_date
            .as_deref()
            .or(activity.start_date_local.as_deref())
        else {
            continue;
        };
        let Some(key) = week_key(raw) else { continue };

        let bucket = weeks.entry(key).or_default();
        bucket.distance += activity.distance.unwrap_or(0.0);
        bucket.time += activity.moving_time.unwrap_or(0.0);
        bucket.elevation += activity.total_elevation_gain.unwrap_or(0.0);
        bucket.count += 1;
    }

    let mut sorted: Vec<(String, WeeklyBucket)> = weeks.into_iter().collect();
    // Plain string comparison of the unpadded labels, so "2024-W10" sorts
    // before "2024-W2". Existing chart consumers depend on this exact order.
    sorted.sort_by(|(a, _), (b, _)| a.cmp(b));

    let text = match sorted.last() {
        Some((_, last)) => format!(
            "Last week: {:.1} km, {:.1} h, {:.0} m of climbing across {} activities.",
            last.distance / 1000.0,
            last.time / 3600.0,
            last.elevation,
            last.count
        ),
        None => "No activities recorded yet.".to_string(),
    };

    WeeklyReport {
        text,
        labels: sorted.iter().map(|(key, _)| key.clone()).collect(),
        distance_km: sorted
            .iter()
            .map(|(_, bucket)| format!("{:.1}", bucket.distance / 1000.0))
            .collect(),
        time_hours: sorted
            .iter()
            .map(|(_, bucket)| format!("{:.1}", bucket.time / 3600.0))
            .collect(),
        elevation_m: sorted
            .iter()
            .map(|(_, bucket)| format!("{:.0}", bucket.elevation))
            .collect(),
        counts: sorted.iter().map(|(_, bucket)| bucket.count).collect(),
    }
}

/// Group activities by polyline-prefix signature and report the groups that
/// recur (count > 1), in first-seen order.
pub fn recognize_routes(activities: &[Activity]) -> Vec<RouteGroup> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, RouteGroup> = HashMap::new();

    for activity in activities {
        let Some(polyline) = activity.summary_polyline() else {
            continue;
        };
        if polyline.is_empty() {
            continue;
        }

        let hash: String = polyline.chars().take(ROUTE_SIGNATURE_LEN).collect();
        let group = groups.entry(hash.clone()).or_insert_with(|| {
            order.push(hash.clone());
            RouteGroup {
                route: activity.name.clone().unwrap_or_default(),
                hash,
                count: 0,
            }
        });
        group.count += 1;
    }

    order
        .into_iter()
        .filter_map(|hash| groups.remove(&hash))
        .filter(|group| group.count > 1)
        .collect()
}

/// Surface the raw biometric sample arrays per activity.
pub fn biometrics(activities: &[Activity]) -> Vec<BiometricProfile> {
    activities
        .iter()
        .map(|activity| BiometricProfile {
            id: activity.id,
            name: activity.name.clone().unwrap_or_default(),
            heartrate: activity.samples("heartrate"),
            cadence: activity.samples("cadence"),
            watts: activity.samples("watts"),
            velocity: activity.samples("velocity"),
            altitude: activity.samples("altitude"),
        })
        .collect()
}

/// Mean of one metric per activity. Activities without samples for the
/// metric are omitted. Accepts names with or without a `_stream` suffix.
pub fn compare_metric(activities: &[Activity], metric: &str) -> Vec<MetricComparison> {
    activities
        .iter()
        .filter_map(|activity| {
            let samples = activity.samples(metric);
            if samples.is_empty() {
                return None;
            }
            Some(MetricComparison {
                id: activity.id,
                name: activity.name.clone().unwrap_or_default(),
                average: round1(mean(&samples)),
                samples: samples.len(),
            })
        })
        .collect()
}

/// Heart-rate intensity summary per activity, with a 5-zone histogram.
/// Zone bounds are inclusive on the lower end: 120 is zone 2, 180 is zone 5.
pub fn intensity(activities: &[Activity]) -> Vec<IntensityProfile> {
    activities
        .iter()
        .map(|activity| {
            let heartrate = activity.samples("heartrate");
            let watts = activity.samples("watts");

            let mut zones = [0u32; 5];
            for &bpm in &heartrate {
                let zone = HR_ZONE_BOUNDS.iter().filter(|&&bound| bpm >= bound).count();
                zones[zone] += 1;
            }

            IntensityProfile {
                id: activity.id,
                name: activity.name.clone().unwrap_or_default(),
                avg_heartrate: round1(mean(&heartrate)),
                max_heartrate: heartrate.iter().copied().fold(0.0, f64::max),
                avg_watts: round1(mean(&watts)),
                samples: heartrate.len(),
                zones,
            }
        })
        .collect()
}

/// CSV export: one row per activity with mean heart rate, velocity and
/// altitude. Fields are comma-joined with no quoting, so a comma inside an
/// activity name shifts the columns (known limitation).
pub fn export_csv(activities: &[Activity]) -> String {
    let mut out = String::from("id,name,start_date_local,avg_heartrate,avg_velocity,avg_altitude\n");

    for activity in activities {
        let heartrate = activity.samples("heartrate");
        let velocity = activity.samples("velocity");
        let altitude = activity.samples("altitude");

        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            activity.id,
            activity.name.as_deref().unwrap_or(""),
            activity.local_start(),
            fmt_mean(&heartrate),
            fmt_mean(&velocity),
            fmt_mean(&altitude),
        ));
    }

    out
}

fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn fmt_mean(samples: &[f64]) -> String {
    if samples.is_empty() {
        String::new()
    } else {
        format!("{:.1}", mean(samples))
    }
}
