use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Geographic position, altitude in kilometers above the reference sphere.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPosition {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_km: f64,
}

/// Earth-centered cartesian position in kilometers.
pub type Cartesian = [f64; 3];

/// Closed time interval, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeInterval {
    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        self.start <= t && t <= self.end
    }
}

/// Simulation clock as seen through the engine: the playback window, the
/// current time inside it, and whether playback advances on its own.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClockState {
    pub window: TimeInterval,
    pub current: DateTime<Utc>,
    pub playing: bool,
}

/// Screen coordinate of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

/// Entity id of the moving marker for a satellite.
pub fn marker_id(satellite_id: &str) -> String {
    satellite_id.to_string()
}

/// Entity id of the static orbit path for a satellite.
pub fn path_id(satellite_id: &str) -> String {
    format!("{}_path", satellite_id)
}

/// The single transient selection label shares one id across selections.
pub const PICK_LABEL_ID: &str = "pick_label";

/// Presentation knobs for the entities this crate creates.
#[derive(Debug, Clone, Deserialize)]
pub struct SceneConfig {
    #[serde(default = "default_path_width")]
    pub path_width: f64,
    #[serde(default = "default_interpolation_degree")]
    pub interpolation_degree: usize,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            path_width: default_path_width(),
            interpolation_degree: default_interpolation_degree(),
        }
    }
}

fn default_path_width() -> f64 {
    1.0
}

fn default_interpolation_degree() -> usize {
    5
}
