//! Friendly helper drone
//!
//! Crosses the top of the playfield left to right. When the player flies
//! through its help area and the drop cadence has elapsed, it drops a pickup.

use glam::Vec2;

use super::collision::HitCircle;
use super::rng::SimRng;

const START_X: f32 = 88.0;
const TOP_OFFSET: f32 = 52.0;
const HELP_RADIUS: f32 = 200.0;
const START_INTERVAL: f32 = 21.0;

#[derive(Debug, Clone)]
pub struct HelperDrone {
    pub pos: Vec2,
    pub vel: Vec2,
    help_radius: f32,
    /// Seconds between drops
    interval: f32,
}

impl HelperDrone {
    pub fn new(bounds: Vec2, rng: &mut SimRng) -> Self {
        Self {
            pos: Vec2::new(START_X, bounds.y - TOP_OFFSET),
            vel: Vec2::new(rng.range(50.0, 100.0), 0.0),
            help_radius: HELP_RADIUS,
            interval: START_INTERVAL,
        }
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }

    pub fn help_area(&self) -> HitCircle {
        HitCircle::new(self.pos, self.help_radius)
    }

    /// Drift, re-entering from the left after leaving on the right
    pub fn update(&mut self, dt: f32, bounds: Vec2) {
        self.pos += self.vel * dt;
        if self.pos.x >= bounds.x + START_X {
            self.pos.x = START_X;
        }
    }

    /// Whether a drop is due, given the player's hit area and the time since
    /// the last drop
    pub fn ready_to_drop(&self, player: &HitCircle, since_last: f32) -> bool {
        since_last >= self.interval && self.help_area().overlaps(player)
    }

    /// Shorten the cadence by `step`; refuses once at `min`
    pub fn shorten_interval(&mut self, step: f32, min: f32) -> bool {
        if self.interval <= min {
            return false;
        }
        self.interval = (self.interval - step).max(min);
        true
    }
}
