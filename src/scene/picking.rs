use super::engine::{LabelEntity, SceneEngine};
use super::types::{ScreenPoint, PICK_LABEL_ID};

/// Resolves pointer selections into a transient info label. Two states:
/// idle (no label) and selected (exactly one label entity in the scene).
/// Every selection event first clears the previous label, so clicking empty
/// space or an entity without a position just deselects.
#[derive(Debug, Default)]
pub struct PickingController {
    selected: bool,
}

impl PickingController {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(dead_code)]
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Handle one selection event at `point`.
    pub fn handle_pick<E: SceneEngine>(&mut self, engine: &mut E, point: ScreenPoint) {
        if self.selected {
            engine.remove(PICK_LABEL_ID);
            self.selected = false;
        }

        let Some(picked) = engine.pick(point) else {
            return;
        };
        let Some(clock) = engine.clock() else {
            return;
        };
        let Some(position) = engine.position_at(&picked, clock.current) else {
            return;
        };

        let geo = engine.to_geographic(position);
        let name = engine.entity_name(&picked).unwrap_or_else(|| picked.clone());
        engine.add_label(LabelEntity {
            id: PICK_LABEL_ID.to_string(),
            position: geo,
            text: format!("{}\nAlt: {:.1} km", name, geo.altitude_km),
        });
        self.selected = true;
    }
}
