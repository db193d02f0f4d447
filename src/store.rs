// SPDX-License-Identifier: MIT

//! File-backed dataset store.
//!
//! The persisted dataset is a single JSON array of activities. Writes go to
//! a temp sibling and are renamed into place, so a concurrent load sees
//! either the fully-old or fully-new document, never a half-written one.

use crate::error::{AppError, Result};
use crate::models::Activity;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct DatasetStore {
    data_path: PathBuf,
    export_path: PathBuf,
}

impl DatasetStore {
    pub fn new(data_path: impl Into<PathBuf>, export_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
            export_path: export_path.into(),
        }
    }

    /// Persist the full collection, overwriting any prior document.
    pub async fn save(&self, activities: &[Activity]) -> Result<()> {
        let json = serde_json::to_vec_pretty(activities)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("serialize dataset: {}", e)))?;
        write_atomic(&self.data_path, &json).await?;

        tracing::info!(
            count = activities.len(),
            path = %self.data_path.display(),
            "Dataset saved"
        );
        Ok(())
    }

    /// Load the stored collection verbatim. No schema validation beyond the
    /// activity shape itself; consumers read optional fields defensively.
    pub async fn load(&self) -> Result<Vec<Activity>> {
        let raw = match tokio::fs::read(&self.data_path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(AppError::DatasetNotFound),
            Err(e) => return Err(AppError::Storage(e)),
        };

        serde_json::from_slice(&raw)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("parse dataset: {}", e)))
    }

    /// Persist the CSV export document.
    pub async fn save_csv(&self, csv: &str) -> Result<()> {
        write_atomic(&self.export_path, csv.as_bytes()).await
    }
}

async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    tokio::fs::write(&tmp, bytes).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}
