use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use super::config::Config;
use crate::feed::{FeedClient, FeedError, RawBatch};
use crate::scene::{
    apply_batch, sync_clock, HeadlessEngine, PickingController, RenderedSet, SceneConfig,
    SceneEngine, ScreenPoint, TimeInterval,
};
use crate::trajectory::build_batch;

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("feed error: {0}")]
    Feed(#[from] FeedError),
}

/// What one refresh cycle did, for the log line.
#[derive(Debug, Clone)]
pub struct RefreshOutcome {
    pub received: usize,
    pub rendered: usize,
    pub removed: usize,
    pub window: Option<TimeInterval>,
}

/// Owns the engine, the rendered-entity registry and the picking state.
/// All entity mutation goes through here, on one thread.
pub struct Viewer<E: SceneEngine> {
    engine: E,
    rendered: RenderedSet,
    picking: PickingController,
    scene: SceneConfig,
}

impl<E: SceneEngine> Viewer<E> {
    pub fn new(engine: E, scene: SceneConfig) -> Self {
        Self {
            engine,
            rendered: RenderedSet::new(),
            picking: PickingController::new(),
            scene,
        }
    }

    #[allow(dead_code)]
    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Run one batch through validate → build → reconcile → sync-clock.
    pub fn ingest(&mut self, batch: &RawBatch) -> RefreshOutcome {
        self.ingest_at(batch, Utc::now())
    }

    pub fn ingest_at(&mut self, batch: &RawBatch, now: DateTime<Utc>) -> RefreshOutcome {
        let trajectories = build_batch(batch);
        let plan = apply_batch(&mut self.engine, &mut self.rendered, &trajectories, &self.scene);
        let window = sync_clock(&mut self.engine, &trajectories, now);

        RefreshOutcome {
            received: batch.satellites.len(),
            rendered: trajectories.len(),
            removed: plan.to_remove.len(),
            window,
        }
    }

    pub fn handle_pick(&mut self, point: ScreenPoint) {
        self.picking.handle_pick(&mut self.engine, point);
    }

    /// Tear down: the engine and everything it renders die with `self`.
    pub fn unmount(self) {
        log::info!("viewer unmounted, {} entities released", self.rendered.len());
    }
}

/// Mount a viewer on the headless engine and poll the feed until Ctrl-C.
pub async fn run_viewer(config: Config) -> Result<(), ViewerError> {
    let feed = FeedClient::new(config.feed.url.clone(), config.feed.timeout)?;
    let mut viewer = Viewer::new(HeadlessEngine::new(), config.scene.clone());

    // A real mount would forward the engine's pointer events through this
    // channel; the headless run has no pointer source.
    let (_pick_tx, mut pick_rx) = mpsc::unbounded_channel::<ScreenPoint>();

    let mut poll = tokio::time::interval(config.feed.poll_interval);
    // A fetch that outlives the interval postpones the next cycle instead
    // of stacking cycles behind it.
    poll.set_missed_tick_behavior(MissedTickBehavior::Delay);

    // Stand-in for the renderer's frame loop: advance playback once a second.
    let mut frame = tokio::time::interval(std::time::Duration::from_secs(1));
    frame.set_missed_tick_behavior(MissedTickBehavior::Skip);

    log::info!(
        "viewer mounted, polling {} every {}",
        config.feed.url,
        humantime::format_duration(config.feed.poll_interval)
    );

    loop {
        tokio::select! {
            _ = poll.tick() => match feed.fetch().await {
                Ok(batch) => {
                    let outcome = viewer.ingest(&batch);
                    log::debug!("reconcile removed {} entities", outcome.removed);
                    match outcome.window {
                        Some(window) => log::info!(
                            "cycle: {} of {} satellites rendered, window {} .. {}",
                            outcome.rendered,
                            outcome.received,
                            window.start,
                            window.end
                        ),
                        None => log::info!(
                            "cycle: no valid trajectories in {} records, clock kept",
                            outcome.received
                        ),
                    }
                }
                Err(e) => log::warn!("fetch failed, keeping previous scene: {}", e),
            },
            _ = frame.tick() => {
                viewer.engine_mut().advance_clock(chrono::Duration::seconds(1));
            }
            Some(point) = pick_rx.recv() => viewer.handle_pick(point),
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    viewer.unmount();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn batch(value: serde_json::Value) -> RawBatch {
        serde_json::from_value(value).unwrap()
    }

    fn t(suffix: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(&format!("2026-08-08T12:{}:00Z", suffix))
            .unwrap()
            .with_timezone(&Utc)
    }

    fn sample(minute: &str) -> serde_json::Value {
        json!({"t": format!("2026-08-08T12:{}:00Z", minute), "lat": 10.0, "lon": 20.0, "alt_km": 500.0})
    }

    fn viewer() -> Viewer<HeadlessEngine> {
        Viewer::new(HeadlessEngine::new(), SceneConfig::default())
    }

    #[test]
    fn scenario_a_partial_batch_renders_only_valid_satellites() {
        let mut viewer = viewer();
        let batch = batch(json!({
            "satellites": [
                {"id": "X", "name": "X-SAT", "samples": [sample("00"), sample("01"), sample("02")]},
                {"id": "Y", "name": "Y-SAT", "samples": [sample("00")]},
            ]
        }));

        let outcome = viewer.ingest_at(&batch, t("01"));

        assert_eq!(outcome.received, 2);
        assert_eq!(outcome.rendered, 1);
        assert_eq!(
            viewer.engine().entity_ids(),
            vec!["X".to_string(), "X_path".to_string()]
        );
        let window = outcome.window.unwrap();
        assert_eq!(window.start, t("00"));
        assert_eq!(window.end, t("02"));
    }

    #[test]
    fn scenario_b_identical_batches_do_not_grow_the_scene() {
        let mut viewer = viewer();
        let batch = batch(json!({
            "satellites": [
                {"id": "X", "name": "X-SAT", "samples": [sample("00"), sample("01")]},
            ]
        }));

        viewer.ingest_at(&batch, t("00"));
        viewer.ingest_at(&batch, t("00"));

        assert_eq!(
            viewer.engine().entity_ids(),
            vec!["X".to_string(), "X_path".to_string()]
        );
    }

    #[test]
    fn scenario_c_vanished_satellite_leaves_its_path() {
        let mut viewer = viewer();
        let first = batch(json!({
            "satellites": [
                {"id": "X", "name": "X-SAT", "samples": [sample("00"), sample("01")]},
            ]
        }));
        let second = batch(json!({
            "satellites": [
                {"id": "Z", "name": "Z-SAT", "samples": [sample("00"), sample("01")]},
            ]
        }));

        viewer.ingest_at(&first, t("00"));
        viewer.ingest_at(&second, t("00"));

        assert!(!viewer.engine().contains("X"));
        assert!(viewer.engine().contains("X_path"));
        assert!(viewer.engine().contains("Z"));
    }

    #[test]
    fn empty_batch_keeps_the_previous_clock_window() {
        let mut viewer = viewer();
        let first = batch(json!({
            "satellites": [
                {"id": "X", "name": "X-SAT", "samples": [sample("00"), sample("02")]},
            ]
        }));

        viewer.ingest_at(&first, t("01"));
        let before = viewer.engine().clock().unwrap();

        let outcome = viewer.ingest_at(&batch(json!({})), t("01"));

        assert!(outcome.window.is_none());
        assert_eq!(viewer.engine().clock().unwrap(), before);
        // Markers are still blanket-cleared.
        assert!(!viewer.engine().contains("X"));
    }

    #[test]
    fn pick_flow_through_the_viewer() {
        let mut viewer = viewer();
        let batch = batch(json!({
            "satellites": [
                {"id": "X", "name": "X-SAT", "samples": [sample("00"), sample("02")]},
            ]
        }));
        viewer.ingest_at(&batch, t("01"));

        viewer.engine_mut().set_pick_result(Some("X"));
        viewer.handle_pick(ScreenPoint { x: 1.0, y: 1.0 });
        assert!(viewer.engine().contains(crate::scene::PICK_LABEL_ID));

        viewer.engine_mut().set_pick_result(None);
        viewer.handle_pick(ScreenPoint { x: 1.0, y: 1.0 });
        assert!(!viewer.engine().contains(crate::scene::PICK_LABEL_ID));
    }
}
