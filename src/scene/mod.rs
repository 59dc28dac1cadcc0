mod clock;
mod engine;
mod headless;
mod picking;
mod reconcile;
mod types;

pub use clock::sync_clock;
pub use engine::{LabelEntity, MarkerEntity, PathEntity, SceneEngine};
pub use headless::HeadlessEngine;
pub use picking::PickingController;
pub use reconcile::{apply_batch, reconcile, ReconcilePlan, RenderedSet};
pub use types::{
    marker_id, path_id, Cartesian, ClockState, GeoPosition, SceneConfig, ScreenPoint,
    TimeInterval, PICK_LABEL_ID,
};
