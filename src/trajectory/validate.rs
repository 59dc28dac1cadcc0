use chrono::{DateTime, Utc};
use serde::Serialize;

/// A sample whose fields have all been checked. Altitude is kilometers,
/// everywhere, always.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValidatedSample {
    pub timestamp: DateTime<Utc>,
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_km: f64,
}

/// Filter a raw sample sequence down to the well-formed entries.
/// Rejects rather than coerces: a stringly-typed number is not a number.
pub fn validate_samples(raw: &[crate::feed::RawSample]) -> Vec<ValidatedSample> {
    raw.iter()
        .filter_map(|sample| {
            Some(ValidatedSample {
                timestamp: timestamp(&sample.t)?,
                latitude_deg: numeric(&sample.lat)?,
                longitude_deg: numeric(&sample.lon)?,
                altitude_km: numeric(&sample.alt_km)?,
            })
        })
        .collect()
}

fn numeric(value: &serde_json::Value) -> Option<f64> {
    value.as_f64().filter(|v| v.is_finite())
}

fn timestamp(value: &serde_json::Value) -> Option<DateTime<Utc>> {
    let text = value.as_str()?;
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
