//! Weapons: fire-rate gating, muzzle geometry, ammo economy

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::projectile::{Owner, ProjectileLaunch, ProjectileSpawner};
use crate::direction;
use crate::error::{ConfigError, ConfigResult};

/// Visual family of a weapon (drives projectile trail tint)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WeaponKind {
    #[default]
    Laser,
    GreenLaser,
    SuperLaser,
}

/// One simultaneous spawn point, relative to the ship
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MuzzleSlot {
    /// Distance from the ship center
    pub distance: f32,
    /// Offset from the ship's facing (degrees)
    pub angle_deg: f32,
    /// Launch direction offset from the ship's facing (degrees)
    pub deflection_deg: f32,
}

impl MuzzleSlot {
    pub const fn new(distance: f32, angle_deg: f32, deflection_deg: f32) -> Self {
        Self {
            distance,
            angle_deg,
            deflection_deg,
        }
    }
}

/// Static description of a weapon tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponSpec {
    pub name: String,
    pub kind: WeaponKind,
    /// Minimum time between volleys (seconds)
    pub period: f32,
    pub damage: u32,
    pub projectile_speed: f32,
    pub capacity: u32,
    pub muzzles: Vec<MuzzleSlot>,
}

impl WeaponSpec {
    fn tier(
        name: &str,
        kind: WeaponKind,
        period: f32,
        damage: u32,
        projectile_speed: f32,
        capacity: u32,
        muzzles: &[MuzzleSlot],
    ) -> Self {
        Self {
            name: name.to_string(),
            kind,
            period,
            damage,
            projectile_speed,
            capacity,
            muzzles: muzzles.to_vec(),
        }
    }

    /// Reject specs that could never fire
    pub fn validate(&self) -> ConfigResult<()> {
        if self.muzzles.is_empty() {
            return Err(ConfigError::EmptyMuzzles {
                weapon: self.name.clone(),
            });
        }
        if !(self.period > 0.0) {
            return Err(ConfigError::InvalidValue {
                name: "weapon.period",
                value: self.period,
                range: "(0, inf)",
            });
        }
        if !(self.projectile_speed > 0.0) {
            return Err(ConfigError::InvalidValue {
                name: "weapon.projectile_speed",
                value: self.projectile_speed,
                range: "(0, inf)",
            });
        }
        Ok(())
    }
}

/// Player laser tiers, bought one by one in the shop
pub fn player_arsenal() -> Vec<WeaponSpec> {
    use WeaponKind::Laser;
    vec![
        WeaponSpec::tier(
            "twin laser",
            Laser,
            0.2,
            1,
            600.0,
            300,
            &[MuzzleSlot::new(28.0, 90.0, 0.0), MuzzleSlot::new(28.0, -90.0, 0.0)],
        ),
        WeaponSpec::tier(
            "spread laser",
            Laser,
            0.2,
            1,
            600.0,
            300,
            &[
                MuzzleSlot::new(28.0, 0.0, 0.0),
                MuzzleSlot::new(28.0, 90.0, 20.0),
                MuzzleSlot::new(28.0, -90.0, -20.0),
            ],
        ),
        WeaponSpec::tier(
            "fan laser",
            Laser,
            0.2,
            1,
            600.0,
            500,
            &[
                MuzzleSlot::new(28.0, 0.0, 0.0),
                MuzzleSlot::new(28.0, 90.0, 10.0),
                MuzzleSlot::new(28.0, 90.0, 20.0),
                MuzzleSlot::new(28.0, -90.0, -10.0),
                MuzzleSlot::new(28.0, -90.0, -20.0),
            ],
        ),
        WeaponSpec::tier(
            "rapid laser",
            Laser,
            0.1,
            2,
            600.0,
            1000,
            &[
                MuzzleSlot::new(28.0, 0.0, 0.0),
                MuzzleSlot::new(28.0, 90.0, 16.0),
                MuzzleSlot::new(28.0, -90.0, -16.0),
            ],
        ),
    ]
}

pub fn enemy_arsenal() -> Vec<WeaponSpec> {
    vec![WeaponSpec::tier(
        "green laser",
        WeaponKind::GreenLaser,
        0.3,
        1,
        600.0,
        30_000,
        &[MuzzleSlot::new(28.0, 90.0, 0.0), MuzzleSlot::new(28.0, -90.0, 0.0)],
    )]
}

/// Boss tiers; the second one is unlocked once, when the boss is wounded
pub fn boss_arsenal() -> Vec<WeaponSpec> {
    use WeaponKind::SuperLaser;
    vec![
        WeaponSpec::tier(
            "super laser",
            SuperLaser,
            0.4,
            3,
            700.0,
            30_000,
            &[
                MuzzleSlot::new(125.0, 0.0, 0.0),
                MuzzleSlot::new(100.0, 100.0, 0.0),
                MuzzleSlot::new(100.0, -100.0, 0.0),
            ],
        ),
        WeaponSpec::tier(
            "super laser mk2",
            SuperLaser,
            0.4,
            3,
            750.0,
            30_000,
            &[
                MuzzleSlot::new(125.0, 0.0, 0.0),
                MuzzleSlot::new(100.0, 50.0, 0.0),
                MuzzleSlot::new(100.0, 100.0, 0.0),
                MuzzleSlot::new(100.0, -100.0, 0.0),
                MuzzleSlot::new(100.0, -50.0, 0.0),
            ],
        ),
    ]
}

/// Kinematic state of the firing ship
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireOrigin {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Facing (radians)
    pub angle: f32,
}

/// A weapon instance with its own ammo counter
#[derive(Debug, Clone)]
pub struct Weapon {
    spec: WeaponSpec,
    ammo: u32,
}

impl Weapon {
    /// Build a weapon with a full magazine
    pub fn new(spec: WeaponSpec) -> ConfigResult<Self> {
        spec.validate()?;
        let ammo = spec.capacity;
        Ok(Self { spec, ammo })
    }

    pub fn spec(&self) -> &WeaponSpec {
        &self.spec
    }

    pub fn kind(&self) -> WeaponKind {
        self.spec.kind
    }

    pub fn damage(&self) -> u32 {
        self.spec.damage
    }

    pub fn ammo(&self) -> u32 {
        self.ammo
    }

    pub fn capacity(&self) -> u32 {
        self.spec.capacity
    }

    pub fn muzzle_count(&self) -> usize {
        self.spec.muzzles.len()
    }

    /// Fire a volley if the period has elapsed and any ammo is left
    ///
    /// `fire_timer` is the time accumulated since the last volley; it is reset
    /// only when the volley actually goes out.
    pub fn try_fire(
        &mut self,
        fire_timer: &mut f32,
        origin: &FireOrigin,
        owner: Owner,
        spawner: &mut impl ProjectileSpawner,
    ) -> bool {
        if *fire_timer <= self.spec.period || self.ammo == 0 {
            return false;
        }
        *fire_timer = 0.0;
        self.ammo = self.ammo.saturating_sub(self.spec.muzzles.len() as u32);

        for slot in &self.spec.muzzles {
            let offset_angle = origin.angle + slot.angle_deg.to_radians();
            let launch_angle = origin.angle + slot.deflection_deg.to_radians();
            spawner.spawn_projectile(ProjectileLaunch {
                pos: origin.pos + direction(offset_angle) * slot.distance,
                vel: origin.vel + direction(launch_angle) * self.spec.projectile_speed,
                owner,
                kind: self.spec.kind,
                damage: self.spec.damage,
            });
        }
        true
    }

    /// Saturating refill; returns how many rounds were actually added
    pub fn add_ammo(&mut self, amount: u32) -> u32 {
        let before = self.ammo;
        self.ammo = self.ammo.saturating_add(amount).min(self.spec.capacity);
        self.ammo - before
    }
}
