use std::collections::BTreeSet;

use super::engine::{MarkerEntity, PathEntity, SceneEngine};
use super::types::{marker_id, path_id, GeoPosition, SceneConfig, TimeInterval};
use crate::trajectory::{Trajectory, ValidatedSample};

/// The marker and path ids this crate has created, kept outside the engine
/// so reconciliation can be computed without querying 3D state.
#[derive(Debug, Clone, Default)]
pub struct RenderedSet {
    markers: BTreeSet<String>,
    paths: BTreeSet<String>,
}

impl RenderedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.markers.len() + self.paths.len()
    }

    fn forget(&mut self, id: &str) {
        self.markers.remove(id);
        self.paths.remove(id);
    }
}

/// The entity mutations one refresh cycle requires.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcilePlan {
    /// Entity ids to remove, markers first.
    pub to_remove: Vec<String>,
    /// Satellite ids to (re)create path + marker entities for.
    pub to_add: Vec<String>,
}

/// Diff the rendered set against this cycle's trajectories. Pure function:
/// markers are always rebuilt (their interpolation curve is derived from
/// the new batch wholesale), existing entities under a returning satellite's
/// ids are replaced, and entities of satellites absent from the batch are
/// left alone.
pub fn reconcile(rendered: &RenderedSet, trajectories: &[Trajectory]) -> ReconcilePlan {
    let mut to_remove: Vec<String> = rendered.markers.iter().cloned().collect();
    let mut removed: BTreeSet<String> = rendered.markers.clone();

    let mut to_add = Vec::with_capacity(trajectories.len());
    for trajectory in trajectories {
        for id in [marker_id(&trajectory.id), path_id(&trajectory.id)] {
            let exists = rendered.markers.contains(&id) || rendered.paths.contains(&id);
            if exists && removed.insert(id.clone()) {
                to_remove.push(id);
            }
        }
        to_add.push(trajectory.id.clone());
    }

    ReconcilePlan { to_remove, to_add }
}

/// Apply a cycle's trajectories to the engine and the registry. Removal
/// precedes creation on every id, so running the same batch twice leaves
/// the entity id set unchanged.
pub fn apply_batch<E: SceneEngine>(
    engine: &mut E,
    rendered: &mut RenderedSet,
    trajectories: &[Trajectory],
    config: &SceneConfig,
) -> ReconcilePlan {
    let plan = reconcile(rendered, trajectories);

    for id in &plan.to_remove {
        engine.remove(id);
        rendered.forget(id);
    }

    for trajectory in trajectories {
        engine.add_path(PathEntity {
            id: path_id(&trajectory.id),
            positions: trajectory.samples.iter().map(geo_position).collect(),
            width: config.path_width,
        });
        engine.add_marker(MarkerEntity {
            id: marker_id(&trajectory.id),
            name: trajectory.name.clone(),
            samples: trajectory
                .samples
                .iter()
                .map(|s| (s.timestamp, geo_position(s)))
                .collect(),
            availability: TimeInterval {
                start: trajectory.start,
                end: trajectory.end,
            },
            interpolation_degree: config.interpolation_degree,
        });
        rendered.paths.insert(path_id(&trajectory.id));
        rendered.markers.insert(marker_id(&trajectory.id));
    }

    plan
}

fn geo_position(sample: &ValidatedSample) -> GeoPosition {
    GeoPosition {
        latitude_deg: sample.latitude_deg,
        longitude_deg: sample.longitude_deg,
        altitude_km: sample.altitude_km,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::HeadlessEngine;
    use crate::trajectory::ValidatedSample;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 8, 12, 0, 0).unwrap() + Duration::seconds(secs)
    }

    fn trajectory(id: &str, times: &[i64]) -> Trajectory {
        let samples: Vec<ValidatedSample> = times
            .iter()
            .map(|s| ValidatedSample {
                timestamp: t(*s),
                latitude_deg: 10.0,
                longitude_deg: 20.0,
                altitude_km: 500.0,
            })
            .collect();
        Trajectory {
            id: id.into(),
            name: format!("SAT {}", id),
            start: samples.first().unwrap().timestamp,
            end: samples.last().unwrap().timestamp,
            samples,
        }
    }

    fn apply(
        engine: &mut HeadlessEngine,
        rendered: &mut RenderedSet,
        trajectories: &[Trajectory],
    ) -> ReconcilePlan {
        apply_batch(engine, rendered, trajectories, &SceneConfig::default())
    }

    #[test]
    fn each_satellite_gets_exactly_one_marker_and_one_path() {
        let mut engine = HeadlessEngine::new();
        let mut rendered = RenderedSet::new();
        apply(&mut engine, &mut rendered, &[trajectory("X", &[0, 30, 60])]);

        assert_eq!(engine.entity_ids(), vec!["X".to_string(), "X_path".to_string()]);
        assert_eq!(rendered.len(), 2);
    }

    #[test]
    fn same_batch_twice_is_idempotent() {
        let mut engine = HeadlessEngine::new();
        let mut rendered = RenderedSet::new();
        let batch = [trajectory("X", &[0, 30]), trajectory("Y", &[0, 30])];

        apply(&mut engine, &mut rendered, &batch);
        let first_ids = engine.entity_ids();
        let plan = apply(&mut engine, &mut rendered, &batch);

        assert_eq!(engine.entity_ids(), first_ids);
        assert_eq!(rendered.len(), 4);
        // Second cycle replaced everything it recreated.
        assert_eq!(plan.to_remove.len(), 4);
    }

    #[test]
    fn stale_path_survives_when_satellite_vanishes() {
        let mut engine = HeadlessEngine::new();
        let mut rendered = RenderedSet::new();
        apply(&mut engine, &mut rendered, &[trajectory("X", &[0, 30])]);
        apply(&mut engine, &mut rendered, &[trajectory("Y", &[0, 30])]);

        // X's marker is blanket-cleared, but its path lingers until the id
        // shows up in a batch again.
        assert!(!engine.contains("X"));
        assert!(engine.contains("X_path"));
        assert!(engine.contains("Y"));
        assert!(engine.contains("Y_path"));
    }

    #[test]
    fn returning_satellite_replaces_its_stale_path() {
        let mut engine = HeadlessEngine::new();
        let mut rendered = RenderedSet::new();
        apply(&mut engine, &mut rendered, &[trajectory("X", &[0, 30])]);
        apply(&mut engine, &mut rendered, &[]);
        let plan = apply(&mut engine, &mut rendered, &[trajectory("X", &[60, 90])]);

        assert!(plan.to_remove.contains(&"X_path".to_string()));
        assert_eq!(engine.entity_ids(), vec!["X".to_string(), "X_path".to_string()]);
    }

    #[test]
    fn empty_batch_clears_markers_only() {
        let mut engine = HeadlessEngine::new();
        let mut rendered = RenderedSet::new();
        apply(&mut engine, &mut rendered, &[trajectory("X", &[0, 30])]);
        let plan = apply(&mut engine, &mut rendered, &[]);

        assert_eq!(plan.to_remove, vec!["X".to_string()]);
        assert!(plan.to_add.is_empty());
        assert_eq!(engine.entity_ids(), vec!["X_path".to_string()]);
    }

    #[test]
    fn plan_is_pure_and_orders_marker_removal_first() {
        let mut engine = HeadlessEngine::new();
        let mut rendered = RenderedSet::new();
        apply(&mut engine, &mut rendered, &[trajectory("X", &[0, 30])]);

        let plan = reconcile(&rendered, &[trajectory("X", &[60, 90])]);
        assert_eq!(
            plan.to_remove,
            vec!["X".to_string(), "X_path".to_string()]
        );
        assert_eq!(plan.to_add, vec!["X".to_string()]);
        // Planning must not touch the registry.
        assert_eq!(rendered.len(), 2);
    }
}
