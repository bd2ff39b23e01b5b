//! Star Arena - simulation core of a 2D arena shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, interactions, round flow)
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences
//! - `audio`: Sound cue queue consumed by the host's playback backend
//! - `highscores`: Leaderboard persisted by the host

pub mod audio;
pub mod error;
pub mod highscores;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{ConfigError, ConfigResult};
pub use highscores::HighScores;
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Playfield dimensions (y up, origin bottom-left)
    pub const ARENA_WIDTH: f32 = 1280.0;
    pub const ARENA_HEIGHT: f32 = 720.0;

    /// Projectiles survive this far past the playfield edge
    pub const PROJECTILE_MARGIN: f32 = 20.0;

    /// Asteroid defaults
    pub const ASTEROID_SPEED: f32 = 200.0;
    /// Hit radius of a scale 1.0 asteroid (256px sprite, 0.9 fill)
    pub const ASTEROID_RADIUS: f32 = 115.2;
    /// Spin range (radians/s), symmetric around zero
    pub const ASTEROID_SPIN: f32 = std::f32::consts::PI;
    pub const ASTEROID_BASE_HP: f32 = 7.0;
    pub const ASTEROID_HP_PER_LEVEL: f32 = 2.0;
    pub const ASTEROID_SPLIT_MIN_SCALE: f32 = 0.5;
    pub const ASTEROID_SPLIT_SHRINK: f32 = 0.2;
    pub const ASTEROID_SPLIT_COUNT: usize = 3;

    /// Pickup defaults
    pub const PICKUP_SPEED: f32 = 50.0;
    pub const PICKUP_AMOUNT: u32 = 30;
    pub const PICKUP_LIFETIME: f32 = 7.0;

    /// Floating text defaults
    pub const TEXT_LIFETIME: f32 = 1.5;
    pub const TEXT_DRIFT_X: f32 = 10.0;
    pub const TEXT_DRIFT_Y: f32 = 50.0;

    /// Engine trail kicks in above this speed
    pub const TRAIL_SPEED: f32 = 50.0;

    /// Displayed score catches up at this rate (points/s)
    pub const SCORE_ROLL_RATE: f32 = 1000.0;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Unit vector pointing along `angle` (radians, counter-clockwise from +x)
#[inline]
pub fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Angle of the vector from `from` to `to`
#[inline]
pub fn heading(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Playfield size as a vector
#[inline]
pub fn arena_bounds() -> Vec2 {
    Vec2::new(consts::ARENA_WIDTH, consts::ARENA_HEIGHT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_normalize_angle_wraps() {
        assert!((normalize_angle(3.0 * PI) - (-PI)).abs() < 1e-5);
        assert!((normalize_angle(-FRAC_PI_2) + FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_heading_and_direction_agree() {
        let from = Vec2::new(10.0, 10.0);
        let to = Vec2::new(10.0, 50.0);
        let dir = direction(heading(from, to));
        assert!((dir - Vec2::Y).length() < 1e-5);
    }
}
