use chrono::{DateTime, Utc};
use serde::Serialize;

use super::validate::{validate_samples, ValidatedSample};
use super::MIN_SAMPLES;
use crate::feed::{RawBatch, RawSatelliteRecord};

/// A validated, time-ordered position history for one satellite. Rebuilt
/// from scratch every refresh cycle, never patched in place.
#[derive(Debug, Clone, Serialize)]
pub struct Trajectory {
    pub id: String,
    pub name: String,
    pub samples: Vec<ValidatedSample>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Build a trajectory from one raw record, or drop the satellite for this
/// cycle. Dropping is silent towards the caller; the reason goes to the log.
pub fn build_trajectory(record: &RawSatelliteRecord) -> Option<Trajectory> {
    let id = identity(&record.id)?;
    let name = identity(&record.name).unwrap_or_else(|| format!("SAT {}", id));

    let mut samples = validate_samples(&record.samples);
    if samples.len() < MIN_SAMPLES {
        log::debug!(
            "dropping {}: {} valid of {} samples",
            id,
            samples.len(),
            record.samples.len()
        );
        return None;
    }

    // The feed promises chronological order but nothing enforces it.
    samples.sort_by_key(|s| s.timestamp);

    let start = samples.first()?.timestamp;
    let end = samples.last()?.timestamp;

    Some(Trajectory {
        id,
        name,
        samples,
        start,
        end,
    })
}

/// Build all trajectories for a batch, skipping satellites that fail
/// validation. Never an error: a bad record costs only itself.
pub fn build_batch(batch: &RawBatch) -> Vec<Trajectory> {
    batch.satellites.iter().filter_map(build_trajectory).collect()
}

fn identity(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
