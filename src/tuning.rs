//! Data-driven game balance
//!
//! Every number the rules depend on lives here so a JSON file can reshape
//! the game without touching code. Missing fields fall back to the stock
//! balance.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::sim::pilot::PilotTuning;
use crate::sim::ship::ShipDescriptor;

/// Combat, economy and round-flow rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleTuning {
    /// Level index of the boss fight (the last level)
    pub boss_level: u32,
    /// Asteroids spawned at level start: `min(level, this)`
    pub max_asteroids_per_wave: u32,
    /// Damage multiplier on a critical hit
    pub crit_multiplier: u32,
    /// Damage an asteroid takes from ramming a ship
    pub asteroid_chip_damage: u32,
    /// Player ram damage is `floor(level * scale * this)`
    pub asteroid_ram_damage: f32,
    /// Player gains `asteroid hp_max * this` for surviving a ram
    pub asteroid_ram_score: u64,
    /// Score per asteroid kill is `hp_max * this`
    pub asteroid_kill_score: u64,
    /// Score per hit on a ship is `hp_max * this`
    pub ship_hit_score: u64,
    /// Pickup rolls when an asteroid is destroyed
    pub asteroid_drop_rolls: u32,
    /// Per-roll drop chance is `round(scale * this)` percent
    pub asteroid_drop_chance_per_scale: f32,
    /// Currency drop chance (percent) on every hit landed on the boss
    pub boss_drop_chance: u32,
    /// Mutual damage while the player overlaps the boss
    pub boss_contact_damage: u32,
    /// Velocity impulse exchanged by colliding bodies
    pub push_impulse: f32,
    /// Speed a magnetized pickup gains each tick
    pub magnet_pull: f32,
    /// Seconds the "Level N" banner stays up
    pub banner_duration: f32,
}

impl Default for RuleTuning {
    fn default() -> Self {
        Self {
            boss_level: 5,
            max_asteroids_per_wave: 3,
            crit_multiplier: 3,
            asteroid_chip_damage: 2,
            asteroid_ram_damage: 5.0,
            asteroid_ram_score: 20,
            asteroid_kill_score: 100,
            ship_hit_score: 100,
            asteroid_drop_rolls: 3,
            asteroid_drop_chance_per_scale: 25.0,
            boss_drop_chance: 7,
            boss_contact_damage: 1,
            push_impulse: 200.0,
            magnet_pull: 200.0,
            banner_duration: 3.0,
        }
    }
}

impl RuleTuning {
    /// Drop chance for one roll on an asteroid of the given scale
    pub fn asteroid_drop_chance(&self, scale: f32) -> u32 {
        (scale * self.asteroid_drop_chance_per_scale).round().max(0.0) as u32
    }
}

/// Complete balance sheet: rules plus the three ship types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub rules: RuleTuning,
    pub pilot: PilotTuning,
    pub player: ShipDescriptor,
    pub enemy: ShipDescriptor,
    pub boss: ShipDescriptor,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            rules: RuleTuning::default(),
            pilot: PilotTuning::default(),
            player: ShipDescriptor::player(),
            enemy: ShipDescriptor::enemy(),
            boss: ShipDescriptor::boss(),
        }
    }
}

impl Tuning {
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn load(path: &Path) -> ConfigResult<Self> {
        let json = fs::read_to_string(path)?;
        let tuning = Self::from_json_str(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject balance sheets the simulation cannot run
    pub fn validate(&self) -> ConfigResult<()> {
        let r = &self.rules;
        if r.boss_level < 2 {
            return Err(ConfigError::InvalidValue {
                name: "rules.boss_level",
                value: r.boss_level as f32,
                range: "[2, inf)",
            });
        }
        if r.crit_multiplier == 0 {
            return Err(ConfigError::InvalidValue {
                name: "rules.crit_multiplier",
                value: 0.0,
                range: "[1, inf)",
            });
        }
        if !(r.banner_duration >= 0.0) {
            return Err(ConfigError::InvalidValue {
                name: "rules.banner_duration",
                value: r.banner_duration,
                range: "[0, inf)",
            });
        }
        if r.boss_drop_chance > 100 {
            return Err(ConfigError::InvalidValue {
                name: "rules.boss_drop_chance",
                value: r.boss_drop_chance as f32,
                range: "[0, 100]",
            });
        }
        self.player.validate()?;
        self.enemy.validate()?;
        self.boss.validate()?;
        Ok(())
    }
}
