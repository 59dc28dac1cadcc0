use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};

use super::engine::{LabelEntity, MarkerEntity, PathEntity, SceneEngine};
use super::types::{Cartesian, ClockState, GeoPosition, ScreenPoint};

/// Mean earth radius used by the position feed's altitude convention.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug)]
enum Entity {
    Path(PathEntity),
    Marker(StoredMarker),
    Label(LabelEntity),
}

#[derive(Debug)]
struct StoredMarker {
    marker: MarkerEntity,
    /// Interpolation knots: seconds since the first sample, cartesian km.
    knots: Vec<(f64, Cartesian)>,
    epoch: DateTime<Utc>,
}

/// In-process implementation of [`SceneEngine`]: a real entity store and
/// clock without any rendering. It backs the `run` subcommand and the test
/// suite. Having no picking geometry, it returns whatever pick result the
/// host injected last.
#[derive(Debug, Default)]
pub struct HeadlessEngine {
    entities: BTreeMap<String, Entity>,
    clock: Option<ClockState>,
    next_pick: Option<String>,
}

impl HeadlessEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inject the entity the next `pick` calls will resolve to.
    #[allow(dead_code)]
    pub fn set_pick_result(&mut self, id: Option<&str>) {
        self.next_pick = id.map(String::from);
    }

    /// Advance playback, clamping at the window end. The embedding loop
    /// stands in for a renderer's frame loop here.
    pub fn advance_clock(&mut self, elapsed: Duration) {
        if let Some(clock) = self.clock.as_mut() {
            if clock.playing {
                clock.current = (clock.current + elapsed).min(clock.window.end);
            }
        }
    }

    #[allow(dead_code)]
    pub fn entity_ids(&self) -> Vec<String> {
        self.entities.keys().cloned().collect()
    }

    fn to_cartesian(geo: &GeoPosition) -> Cartesian {
        let r = EARTH_RADIUS_KM + geo.altitude_km;
        let lat = geo.latitude_deg.to_radians();
        let lon = geo.longitude_deg.to_radians();
        [
            r * lat.cos() * lon.cos(),
            r * lat.cos() * lon.sin(),
            r * lat.sin(),
        ]
    }
}

impl SceneEngine for HeadlessEngine {
    fn contains(&self, id: &str) -> bool {
        self.entities.contains_key(id)
    }

    fn remove(&mut self, id: &str) -> bool {
        self.entities.remove(id).is_some()
    }

    fn add_path(&mut self, path: PathEntity) {
        self.entities.insert(path.id.clone(), Entity::Path(path));
    }

    fn add_marker(&mut self, marker: MarkerEntity) {
        let epoch = marker
            .samples
            .first()
            .map(|(t, _)| *t)
            .unwrap_or(marker.availability.start);

        let mut knots: Vec<(f64, Cartesian)> = Vec::with_capacity(marker.samples.len());
        for (t, geo) in &marker.samples {
            let x = (*t - epoch).num_milliseconds() as f64 / 1000.0;
            // A duplicate timestamp would collapse the polynomial basis.
            if knots.last().map_or(true, |(last, _)| *last < x) {
                knots.push((x, Self::to_cartesian(geo)));
            }
        }

        self.entities.insert(
            marker.id.clone(),
            Entity::Marker(StoredMarker {
                marker,
                knots,
                epoch,
            }),
        );
    }

    fn add_label(&mut self, label: LabelEntity) {
        self.entities.insert(label.id.clone(), Entity::Label(label));
    }

    fn entity_name(&self, id: &str) -> Option<String> {
        match self.entities.get(id)? {
            Entity::Marker(stored) => Some(stored.marker.name.clone()),
            _ => None,
        }
    }

    fn clock(&self) -> Option<ClockState> {
        self.clock
    }

    fn set_clock(&mut self, clock: ClockState) {
        self.clock = Some(clock);
    }

    fn pick(&self, _point: ScreenPoint) -> Option<String> {
        self.next_pick
            .as_ref()
            .filter(|id| self.entities.contains_key(*id))
            .cloned()
    }

    fn position_at(&self, id: &str, time: DateTime<Utc>) -> Option<Cartesian> {
        let Entity::Marker(stored) = self.entities.get(id)? else {
            return None;
        };
        if !stored.marker.availability.contains(time) || stored.knots.is_empty() {
            return None;
        }

        let x = (time - stored.epoch).num_milliseconds() as f64 / 1000.0;
        let window = knot_window(
            &stored.knots,
            x,
            stored.marker.interpolation_degree + 1,
        );
        Some(lagrange(window, x))
    }

    fn to_geographic(&self, position: Cartesian) -> GeoPosition {
        let [x, y, z] = position;
        let r = (x * x + y * y + z * z).sqrt();
        if r == 0.0 {
            return GeoPosition {
                latitude_deg: 0.0,
                longitude_deg: 0.0,
                altitude_km: -EARTH_RADIUS_KM,
            };
        }
        GeoPosition {
            latitude_deg: (z / r).asin().to_degrees(),
            longitude_deg: y.atan2(x).to_degrees(),
            altitude_km: r - EARTH_RADIUS_KM,
        }
    }
}

/// Select up to `size` knots around `x` for the interpolation basis.
fn knot_window(knots: &[(f64, Cartesian)], x: f64, size: usize) -> &[(f64, Cartesian)] {
    if knots.len() <= size {
        return knots;
    }
    let after = knots.partition_point(|(kx, _)| *kx < x);
    let start = after
        .saturating_sub(size / 2)
        .min(knots.len() - size);
    &knots[start..start + size]
}

fn lagrange(knots: &[(f64, Cartesian)], x: f64) -> Cartesian {
    let mut out = [0.0; 3];
    for (i, (xi, yi)) in knots.iter().enumerate() {
        let mut weight = 1.0;
        for (j, (xj, _)) in knots.iter().enumerate() {
            if i != j {
                weight *= (x - xj) / (xi - xj);
            }
        }
        for (o, v) in out.iter_mut().zip(yi) {
            *o += weight * v;
        }
    }
    out
}
