//! Ships: one data-driven model shared by the player, the enemy and the boss
//!
//! A [`ShipDescriptor`] carries everything that differs between the three
//! (stats, weapon tiers, AI behaviour); [`Ship`] is the live instance.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{HitCircle, bounce_in_bounds};
use super::effects::TrailEmitter;
use super::projectile::{Owner, ProjectileSpawner};
use super::rng::SimRng;
use super::weapon::{FireOrigin, Weapon, WeaponSpec, boss_arsenal, enemy_arsenal, player_arsenal};
use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH, TRAIL_SPEED};
use crate::error::{ConfigError, ConfigResult};
use crate::{direction, heading};

/// Closed set of ship behaviours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Behavior {
    /// Driven by player input
    Player,
    /// Hunts the player, leaves an engine trail
    Chaser,
    /// Hunts the player, upgrades its weapon once when wounded
    Boss,
}

impl Behavior {
    pub fn owner(self) -> Owner {
        match self {
            Behavior::Player => Owner::Player,
            Behavior::Chaser | Behavior::Boss => Owner::Enemy,
        }
    }
}

/// Static description of a ship type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipDescriptor {
    pub name: String,
    pub behavior: Behavior,
    pub hp_max: u32,
    pub engine_power: f32,
    /// Turn rate (degrees/s)
    pub rotation_speed: f32,
    /// Half the sprite size, used for wall clamping
    pub half_extent: f32,
    pub hit_radius: f32,
    /// AI thrusts while farther than this from its target
    pub chase_distance: f32,
    /// AI fires while closer than this to its target
    pub fire_distance: f32,
    pub engine_trail: bool,
    /// Spawn rectangle (min corner, max corner)
    pub spawn_min: Vec2,
    pub spawn_max: Vec2,
    pub weapons: Vec<WeaponSpec>,
}

impl ShipDescriptor {
    pub fn player() -> Self {
        let center = Vec2::new(ARENA_WIDTH / 2.0, ARENA_HEIGHT / 2.0);
        Self {
            name: "player".to_string(),
            behavior: Behavior::Player,
            hp_max: 100,
            engine_power: 500.0,
            rotation_speed: 180.0,
            half_extent: 32.0,
            hit_radius: 28.8,
            chase_distance: 0.0,
            fire_distance: 0.0,
            engine_trail: true,
            spawn_min: center,
            spawn_max: center,
            weapons: player_arsenal(),
        }
    }

    pub fn enemy() -> Self {
        Self {
            name: "enemy".to_string(),
            behavior: Behavior::Chaser,
            hp_max: 50,
            engine_power: 200.0,
            rotation_speed: 180.0,
            half_extent: 32.0,
            hit_radius: 28.8,
            chase_distance: 200.0,
            fire_distance: 300.0,
            engine_trail: true,
            spawn_min: Vec2::new(ARENA_WIDTH - 200.0, 100.0),
            spawn_max: Vec2::new(ARENA_WIDTH - 100.0, ARENA_HEIGHT - 100.0),
            weapons: enemy_arsenal(),
        }
    }

    pub fn boss() -> Self {
        Self {
            name: "boss".to_string(),
            behavior: Behavior::Boss,
            hp_max: 100,
            engine_power: 100.0,
            rotation_speed: 180.0,
            half_extent: 128.0,
            hit_radius: 115.0,
            chase_distance: 200.0,
            fire_distance: 300.0,
            engine_trail: false,
            spawn_min: Vec2::new(ARENA_WIDTH - 200.0, 100.0),
            spawn_max: Vec2::new(ARENA_WIDTH - 100.0, ARENA_HEIGHT - 100.0),
            weapons: boss_arsenal(),
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.weapons.is_empty() {
            return Err(ConfigError::EmptyWeaponSet {
                ship: self.name.clone(),
            });
        }
        if self.hp_max == 0 {
            return Err(ConfigError::InvalidValue {
                name: "ship.hp_max",
                value: 0.0,
                range: "[1, inf)",
            });
        }
        if !(self.hit_radius > 0.0) {
            return Err(ConfigError::InvalidValue {
                name: "ship.hit_radius",
                value: self.hit_radius,
                range: "(0, inf)",
            });
        }
        for spec in &self.weapons {
            spec.validate()?;
        }
        Ok(())
    }

    /// Pick a spawn point inside the descriptor's spawn rectangle
    pub fn spawn_point(&self, rng: &mut SimRng) -> Vec2 {
        Vec2::new(
            rng.range(self.spawn_min.x, self.spawn_max.x),
            rng.range(self.spawn_min.y, self.spawn_max.y),
        )
    }
}

/// A live ship
#[derive(Debug, Clone)]
pub struct Ship {
    name: String,
    behavior: Behavior,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Facing (radians)
    pub angle: f32,
    hp: u32,
    hp_max: u32,
    engine_power: f32,
    rotation_speed: f32,
    half_extent: f32,
    hit: HitCircle,
    chase_distance: f32,
    fire_distance: f32,
    engine_trail: bool,
    weapons: Vec<Weapon>,
    weapon_index: usize,
    fire_timer: f32,
}

impl Ship {
    pub fn from_descriptor(desc: &ShipDescriptor, pos: Vec2) -> ConfigResult<Self> {
        desc.validate()?;
        let weapons = desc
            .weapons
            .iter()
            .cloned()
            .map(Weapon::new)
            .collect::<ConfigResult<Vec<_>>>()?;

        Ok(Self {
            name: desc.name.clone(),
            behavior: desc.behavior,
            pos,
            vel: Vec2::ZERO,
            angle: 0.0,
            hp: desc.hp_max,
            hp_max: desc.hp_max,
            engine_power: desc.engine_power,
            rotation_speed: desc.rotation_speed.to_radians(),
            half_extent: desc.half_extent,
            hit: HitCircle::new(pos, desc.hit_radius),
            chase_distance: desc.chase_distance,
            fire_distance: desc.fire_distance,
            engine_trail: desc.engine_trail,
            weapons,
            weapon_index: 0,
            fire_timer: 0.0,
        })
    }

    pub fn owner(&self) -> Owner {
        self.behavior.owner()
    }

    pub fn hp(&self) -> u32 {
        self.hp
    }

    pub fn hp_max(&self) -> u32 {
        self.hp_max
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn hit(&self) -> &HitCircle {
        &self.hit
    }

    pub fn weapon(&self) -> &Weapon {
        &self.weapons[self.weapon_index]
    }

    pub fn weapon_mut(&mut self) -> &mut Weapon {
        &mut self.weapons[self.weapon_index]
    }

    pub fn weapon_index(&self) -> usize {
        self.weapon_index
    }

    pub fn weapon_tiers(&self) -> usize {
        self.weapons.len()
    }

    pub fn fire_timer(&self) -> f32 {
        self.fire_timer
    }

    /// Apply damage, saturating at zero. Returns `true` if this blow killed
    /// the ship.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        let was_alive = self.is_alive();
        self.hp = self.hp.saturating_sub(amount);
        was_alive && !self.is_alive()
    }

    /// Restore health up to the max; returns the amount actually gained
    pub fn heal(&mut self, amount: u32) -> u32 {
        let before = self.hp;
        self.hp = self.hp.saturating_add(amount).min(self.hp_max);
        self.hp - before
    }

    pub fn raise_hp_max(&mut self, amount: u32) {
        self.hp_max = self.hp_max.saturating_add(amount);
    }

    /// Back to full health
    pub fn restore(&mut self) {
        self.hp = self.hp_max;
    }

    /// Bring a dead ship back at full health
    pub fn resurrect(&mut self) {
        self.restore();
        self.fire_timer = 0.0;
        log::debug!("{} resurrected with {} hp", self.name, self.hp);
    }

    /// Put the ship out of play without a kill
    pub fn retire(&mut self) {
        self.hp = 0;
    }

    /// Teleport (spawn / respawn)
    pub fn place(&mut self, pos: Vec2) {
        self.pos = pos;
        self.vel = Vec2::ZERO;
        self.hit.center = pos;
    }

    /// Apply a push-apart correction
    pub fn shift(&mut self, delta: Vec2) {
        self.pos += delta;
        self.hit.center = self.pos;
    }

    /// Physics step shared by every behaviour
    pub fn update(&mut self, dt: f32, bounds: Vec2) {
        self.fire_timer += dt;
        self.pos += self.vel * dt;
        self.vel *= (1.0 - dt).max(0.0);
        bounce_in_bounds(&mut self.pos, &mut self.vel, self.half_extent, bounds);
        self.hit.center = self.pos;
    }

    /// Turn; `dir` is +1 for counter-clockwise, -1 for clockwise
    pub fn rotate(&mut self, dir: f32, dt: f32) {
        self.angle = crate::normalize_angle(self.angle + dir * self.rotation_speed * dt);
    }

    pub fn thrust(&mut self, dt: f32) {
        self.vel += direction(self.angle) * self.engine_power * dt;
    }

    pub fn brake(&mut self, dt: f32) {
        self.vel -= direction(self.angle) * self.engine_power * dt / 2.0;
    }

    fn fire_origin(&self) -> FireOrigin {
        FireOrigin {
            pos: self.pos,
            vel: self.vel,
            angle: self.angle,
        }
    }

    /// Fire the active weapon if its period has elapsed
    pub fn try_fire(&mut self, spawner: &mut impl ProjectileSpawner) -> bool {
        let origin = self.fire_origin();
        let owner = self.owner();
        let idx = self.weapon_index;
        self.weapons[idx].try_fire(&mut self.fire_timer, &origin, owner, spawner)
    }

    /// AI step: face the target, close in, shoot when in range
    pub fn pursue(&mut self, target: Vec2, dt: f32, spawner: &mut impl ProjectileSpawner) -> bool {
        self.angle = heading(self.pos, target);
        let dist = self.pos.distance(target);
        if dist > self.chase_distance {
            self.thrust(dt);
        }
        if dist < self.fire_distance {
            return self.try_fire(spawner);
        }
        false
    }

    /// Exhaust puffs while moving fast
    pub fn emit_trail(&self, trails: &mut impl TrailEmitter) {
        if self.engine_trail && self.vel.length() > TRAIL_SPEED {
            trails.engine_trail(self.pos, self.vel, self.angle, self.owner());
        }
    }

    /// Advance to the next weapon tier; never goes back
    pub fn upgrade_weapon(&mut self) -> bool {
        if self.weapon_index + 1 < self.weapons.len() {
            self.weapon_index += 1;
            log::debug!(
                "{} weapon upgraded to '{}'",
                self.name,
                self.weapon().spec().name
            );
            true
        } else {
            false
        }
    }
}
