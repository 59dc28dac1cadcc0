use serde::Deserialize;

/// One poll's worth of satellite data, exactly as the feed sent it.
/// A response without a `satellites` key is an empty batch.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawBatch {
    #[serde(default)]
    pub satellites: Vec<RawSatelliteRecord>,
}

/// A single satellite record from the feed. The feed is untrusted, so
/// identity fields stay as raw JSON until the builder resolves them.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSatelliteRecord {
    #[serde(default)]
    pub id: serde_json::Value,
    #[serde(default)]
    pub name: serde_json::Value,
    #[serde(default)]
    pub samples: Vec<RawSample>,
}

/// One position sample, fields unchecked at this boundary.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSample {
    #[serde(default)]
    pub t: serde_json::Value,
    #[serde(default)]
    pub lat: serde_json::Value,
    #[serde(default)]
    pub lon: serde_json::Value,
    #[serde(default)]
    pub alt_km: serde_json::Value,
}
