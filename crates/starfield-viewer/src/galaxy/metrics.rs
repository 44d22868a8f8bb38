use bevy::prelude::{Res, ResMut, Time};
use std::time::{Duration, Instant};

use crate::galaxy::state::GalaxyState;

const RATE_WINDOW: Duration = Duration::from_secs(2);

pub fn tick_housekeeping(time: Res<Time>, mut st: ResMut<GalaxyState>) {
    let dt = time.delta_seconds().max(0.0001);
    st.perf.fps = 1.0 / dt;
    st.tick_metrics(Instant::now());
}

impl GalaxyState {
    pub fn tick_metrics(&mut self, now: Instant) {
        while let Some(front) = self.perf.tick_window.front() {
            if now.duration_since(*front) > RATE_WINDOW {
                self.perf.tick_window.pop_front();
            } else {
                break;
            }
        }
        self.perf.tick_rate = self.perf.tick_window.len() as f32 / RATE_WINDOW.as_secs_f32();
    }
}
