//! Game state and round bookkeeping
//!
//! Everything one playthrough owns lives here. The per-tick ordering is in
//! [`super::tick`].

use serde::{Deserialize, Serialize};

use super::asteroid::Asteroid;
use super::effects::Effects;
use super::helper::HelperDrone;
use super::pickup::Pickup;
use super::pilot::{Pilot, ShopError, Skill};
use super::pool::Pool;
use super::projectile::Projectile;
use super::rng::SimRng;
use super::ship::Ship;
use super::snapshot::RenderSnapshot;
use crate::arena_bounds;
use crate::audio::{MusicTrack, SoundCue};
use crate::error::ConfigResult;
use crate::settings::Settings;
use crate::tuning::Tuning;

/// Cosmetic effects draw from their own stream so toggling them never
/// shifts gameplay rolls
const EFFECTS_STREAM: u64 = 0x9E37_79B9_7F4A_7C15;

/// Current phase of a playthrough
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Asteroid levels, enemy from level 2 on
    Wave,
    /// Final level against the boss
    Boss,
    Victory,
    Defeat,
    /// Player quit to the menu
    Abandoned,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Victory | Phase::Defeat | Phase::Abandoned)
    }
}

/// Terminal result reported to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Victory,
    Defeat,
}

/// Final numbers of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub score: u64,
    pub currency: u32,
    pub level: u32,
}

/// Banner shown right after a level starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Banner {
    Level(u32),
    FinalLevel,
}

/// Complete state of one playthrough
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    /// Current level (1-based)
    pub level: u32,
    pub phase: Phase,
    paused: bool,
    /// Seconds since the current level started
    pub round_timer: f32,
    /// Seconds since the helper drone last dropped a pickup
    pub help_timer: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub player: Ship,
    pub pilot: Pilot,
    pub enemy: Ship,
    pub boss: Ship,
    /// Boss weapon upgrade has happened
    pub boss_enraged: bool,
    pub helper: HelperDrone,
    pub projectiles: Pool<Projectile>,
    pub asteroids: Pool<Asteroid>,
    pub pickups: Pool<Pickup>,
    /// Visual particles and texts (not gameplay-affecting)
    pub effects: Effects,
    /// Gameplay RNG
    pub rng: SimRng,
    /// Sound cues raised this tick, flushed to the host
    pub cues: Vec<SoundCue>,
    /// Music change waiting for the next flush
    pub music: Option<MusicTrack>,
}

impl GameState {
    /// Create a new run with the given seed and balance sheet
    pub fn new(seed: u64, tuning: Tuning) -> ConfigResult<Self> {
        tuning.validate()?;
        let bounds = arena_bounds();
        let mut rng = SimRng::new(seed);

        let player = Ship::from_descriptor(&tuning.player, tuning.player.spawn_point(&mut rng))?;
        let mut enemy = Ship::from_descriptor(&tuning.enemy, tuning.enemy.spawn_point(&mut rng))?;
        // Dormant until level 2
        enemy.retire();
        let boss = Ship::from_descriptor(&tuning.boss, tuning.boss.spawn_point(&mut rng))?;
        let helper = HelperDrone::new(bounds, &mut rng);

        let mut state = Self {
            seed,
            pilot: Pilot::new(tuning.pilot.clone()),
            level: 1,
            phase: Phase::Wave,
            paused: false,
            round_timer: 0.0,
            help_timer: 0.0,
            time_ticks: 0,
            player,
            enemy,
            boss,
            boss_enraged: false,
            helper,
            projectiles: Pool::new(),
            asteroids: Pool::new(),
            pickups: Pool::new(),
            effects: Effects::new(seed ^ EFFECTS_STREAM),
            rng,
            cues: Vec::new(),
            music: Some(MusicTrack::Gameplay),
            tuning,
        };
        state.spawn_wave();
        log::info!("New run (seed {seed})");
        Ok(state)
    }

    /// Same as [`GameState::new`], with effects configured from the player's
    /// settings
    pub fn with_settings(seed: u64, tuning: Tuning, settings: &Settings) -> ConfigResult<Self> {
        let mut state = Self::new(seed, tuning)?;
        state.effects.configure(settings);
        Ok(state)
    }

    /// Spawn `min(level, cap)` fresh asteroids
    pub(crate) fn spawn_wave(&mut self) {
        let count = self.level.min(self.tuning.rules.max_asteroids_per_wave);
        for _ in 0..count {
            self.asteroids
                .spawn_random(self.level, arena_bounds(), &mut self.rng);
        }
        log::debug!("Level {} spawned {count} asteroids", self.level);
    }

    pub fn boss_level(&self) -> u32 {
        self.tuning.rules.boss_level
    }

    pub fn is_boss_level(&self) -> bool {
        self.level == self.boss_level()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn set_paused(&mut self, paused: bool) {
        if self.paused != paused {
            log::debug!("{}", if paused { "Paused" } else { "Resumed" });
        }
        self.paused = paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Level banner, shown for a few seconds after each level starts
    pub fn banner(&self) -> Option<Banner> {
        if self.phase.is_terminal() || self.round_timer >= self.tuning.rules.banner_duration {
            return None;
        }
        Some(if self.is_boss_level() {
            Banner::FinalLevel
        } else {
            Banner::Level(self.level)
        })
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            score: self.pilot.score(),
            currency: self.pilot.currency(),
            level: self.level,
        }
    }

    /// Buy a skill from the shop; only open while paused
    pub fn purchase(&mut self, skill: Skill) -> Result<(), ShopError> {
        if !self.paused {
            return Err(ShopError::ShopClosed);
        }
        self.pilot
            .purchase(skill, &mut self.player, &mut self.helper)
    }

    /// Read-only view for the renderer
    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot::capture(self)
    }
}
