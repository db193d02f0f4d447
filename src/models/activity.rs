// SPDX-License-Identifier: MIT

//! Strava activity model for storage and analytics.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Named sample arrays keyed by stream type (`heartrate`, `watts`, ...).
pub type StreamSet = HashMap<String, Stream>;

/// Activity record as returned by the Strava list endpoint, optionally
/// carrying enrichment fields merged in by the enrichment pipeline.
///
/// Everything except `id` is optional: the stored dataset is read back
/// without schema validation, so analytics treat absent fields as
/// zero/empty. Unknown upstream fields are kept in `extra` so a saved
/// dataset round-trips without loss.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    /// Remote-assigned activity ID
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Start date/time (ISO 8601, UTC)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date_local: Option<String>,
    /// Distance in meters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    /// Moving time in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moving_time: Option<f64>,
    /// Elevation gain in meters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_elevation_gain: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map: Option<ActivityMap>,

    // ─── Enrichment fields ───────────────────────────────────────
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub streams: Option<StreamSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub efforts: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zones: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub splits: Option<Value>,

    // ─── Flattened sample arrays (pre-extracted variants) ────────
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heartrate_stream: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cadence_stream: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watts_stream: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub velocity_stream: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude_stream: Option<Vec<f64>>,

    /// Any other upstream fields, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Activity map data with the summary polyline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityMap {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary_polyline: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One named stream: a per-sample array plus whatever metadata Strava sends.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Stream {
    #[serde(default)]
    pub data: Vec<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Activity {
    /// Summary polyline, if the activity has map geometry.
    pub fn summary_polyline(&self) -> Option<&str> {
        self.map.as_ref()?.summary_polyline.as_deref()
    }

    /// Local start date, falling back to the UTC one.
    pub fn local_start(&self) -> &str {
        self.start_date_local
            .as_deref()
            .or(self.start_date.as_deref())
            .unwrap_or("")
    }

    /// Sample array for a metric, resolved through a single fallback chain:
    /// typed `<metric>_stream` field, then a dynamic `<metric>_stream` key in
    /// `extra`, then `streams.<metric>.data`. `velocity` aliases Strava's
    /// `velocity_smooth` stream. Unknown metrics yield an empty array.
    pub fn samples(&self, metric: &str) -> Vec<f64> {
        let metric = metric.strip_suffix("_stream").unwrap_or(metric);

        let flat = match metric {
            "heartrate" => self.heartrate_stream.as_ref(),
            "cadence" => self.cadence_stream.as_ref(),
            "watts" => self.watts_stream.as_ref(),
            "velocity" | "velocity_smooth" => self.velocity_stream.as_ref(),
            "altitude" => self.altitude_stream.as_ref(),
            _ => None,
        };
        if let Some(data) = flat {
            return data.clone();
        }

        if let Some(Value::Array(values)) = self.extra.get(&format!("{metric}_stream")) {
            return values.iter().filter_map(Value::as_f64).collect();
        }

        if let Some(streams) = &self.streams {
            let key = if metric == "velocity" {
                "velocity_smooth"
            } else {
                metric
            };
            if let Some(stream) = streams.get(key) {
                return stream.data.clone();
            }
        }

        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn from_json(value: Value) -> Activity {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_samples_prefers_flattened_field() {
        let activity = from_json(json!({
            "id": 1,
            "heartrate_stream": [100.0, 110.0],
            "streams": { "heartrate": { "data": [1.0] } }
        }));
        assert_eq!(activity.samples("heartrate"), vec![100.0, 110.0]);
    }

    #[test]
    fn test_samples_falls_back_to_nested_stream() {
        let activity = from_json(json!({
            "id": 1,
            "streams": { "heartrate": { "data": [140.0, 150.0] } }
        }));
        assert_eq!(activity.samples("heartrate"), vec![140.0, 150.0]);
        assert_eq!(activity.samples("heartrate_stream"), vec![140.0, 150.0]);
    }

    #[test]
    fn test_samples_velocity_aliases_velocity_smooth() {
        let activity = from_json(json!({
            "id": 1,
            "streams": { "velocity_smooth": { "data": [2.5, 3.0] } }
        }));
        assert_eq!(activity.samples("velocity"), vec![2.5, 3.0]);
    }

    #[test]
    fn test_samples_reads_dynamic_extra_field() {
        let activity = from_json(json!({
            "id": 1,
            "temp_stream": [21.0, 22.0]
        }));
        assert_eq!(activity.samples("temp_stream"), vec![21.0, 22.0]);
    }

    #[test]
    fn test_samples_missing_metric_is_empty() {
        let activity = from_json(json!({ "id": 1 }));
        assert!(activity.samples("watts").is_empty());
    }

    #[test]
    fn test_unknown_fields_round_trip() {
        let activity = from_json(json!({
            "id": 42,
            "name": "Morning Ride",
            "kudos_count": 7,
            "sport_type": "Ride"
        }));

        let back = serde_json::to_value(&activity).unwrap();
        assert_eq!(back["kudos_count"], 7);
        assert_eq!(back["sport_type"], "Ride");
    }
}
