use chrono::{DateTime, Utc};

use super::types::{Cartesian, ClockState, GeoPosition, ScreenPoint, TimeInterval};

/// Static multi-point line tracing a satellite's orbit track.
#[derive(Debug, Clone)]
pub struct PathEntity {
    pub id: String,
    pub positions: Vec<GeoPosition>,
    pub width: f64,
}

/// Time-sampled moving point. The engine interpolates between samples with
/// a polynomial of the given degree; outside `availability` the entity has
/// no position.
#[derive(Debug, Clone)]
pub struct MarkerEntity {
    pub id: String,
    pub name: String,
    pub samples: Vec<(DateTime<Utc>, GeoPosition)>,
    pub availability: TimeInterval,
    pub interpolation_degree: usize,
}

/// Transient text label anchored at a fixed position.
#[derive(Debug, Clone)]
pub struct LabelEntity {
    pub id: String,
    pub position: GeoPosition,
    pub text: String,
}

/// The capability surface this crate consumes from a 3D globe engine.
/// The engine owns cameras, picking geometry, entity storage and the
/// interpolation math; the core only holds entity ids.
pub trait SceneEngine {
    fn contains(&self, id: &str) -> bool;

    /// Remove an entity. Returns whether it existed.
    fn remove(&mut self, id: &str) -> bool;

    fn add_path(&mut self, path: PathEntity);
    fn add_marker(&mut self, marker: MarkerEntity);
    fn add_label(&mut self, label: LabelEntity);

    /// Display name of an entity, if it carries one.
    fn entity_name(&self, id: &str) -> Option<String>;

    /// Clock state, `None` until the first synchronization configures it.
    fn clock(&self) -> Option<ClockState>;
    fn set_clock(&mut self, clock: ClockState);

    /// Resolve the entity under a screen coordinate.
    fn pick(&self, point: ScreenPoint) -> Option<String>;

    /// Evaluate a time-varying entity's position at `time`. `None` for
    /// entities without a position property or outside their availability.
    fn position_at(&self, id: &str, time: DateTime<Utc>) -> Option<Cartesian>;

    /// Convert an engine position back to geographic coordinates.
    fn to_geographic(&self, position: Cartesian) -> GeoPosition;
}
