use chrono::{DateTime, Utc};

use super::engine::SceneEngine;
use super::types::{ClockState, TimeInterval};
use crate::trajectory::Trajectory;

/// Point the simulation clock at the time span covered by this cycle's
/// trajectories. Playback runs in real time and clamps at the window end.
/// With no trajectories there is nothing to play: the clock keeps its
/// previous window and `None` is returned.
pub fn sync_clock<E: SceneEngine>(
    engine: &mut E,
    trajectories: &[Trajectory],
    now: DateTime<Utc>,
) -> Option<TimeInterval> {
    let start = trajectories.iter().map(|t| t.start).min()?;
    let end = trajectories.iter().map(|t| t.end).max()?;
    let window = TimeInterval { start, end };

    let current = if window.contains(now) { now } else { start };
    engine.set_clock(ClockState {
        window,
        current,
        playing: true,
    });

    Some(window)
}
