//! Projectiles fired by ship weapons

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::out_of_bounds;
use super::effects::TrailEmitter;
use super::pool::{Pool, Poolable};
use super::weapon::WeaponKind;
use crate::consts::PROJECTILE_MARGIN;

/// Which side fired a projectile (decides friend/foe and trail tint)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Owner {
    #[default]
    Player,
    Enemy,
}

/// Everything a weapon decides about a new projectile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileLaunch {
    pub pos: Vec2,
    pub vel: Vec2,
    pub owner: Owner,
    pub kind: WeaponKind,
    /// Damage snapshot taken when the shot leaves the muzzle
    pub damage: u32,
}

/// Sink for freshly fired projectiles
pub trait ProjectileSpawner {
    fn spawn_projectile(&mut self, launch: ProjectileLaunch);
}

#[derive(Debug, Clone, Default)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub owner: Owner,
    pub kind: WeaponKind,
    pub damage: u32,
    active: bool,
}

impl Poolable for Projectile {
    fn is_active(&self) -> bool {
        self.active
    }

    fn deactivate(&mut self) {
        self.active = false;
    }
}

impl Projectile {
    /// Reset every field from a launch description
    pub fn activate(&mut self, launch: &ProjectileLaunch) {
        self.pos = launch.pos;
        self.vel = launch.vel;
        self.owner = launch.owner;
        self.kind = launch.kind;
        self.damage = launch.damage;
        self.active = true;
    }

    /// Integrate, leave a trail, and expire once off the playfield
    pub fn update(&mut self, dt: f32, bounds: Vec2, trails: &mut impl TrailEmitter) {
        self.pos += self.vel * dt;
        trails.projectile_trail(self.pos, self.vel, self.kind);
        if out_of_bounds(self.pos, PROJECTILE_MARGIN, bounds) {
            self.deactivate();
        }
    }
}

impl ProjectileSpawner for Pool<Projectile> {
    fn spawn_projectile(&mut self, launch: ProjectileLaunch) {
        self.acquire().activate(&launch);
    }
}

impl Pool<Projectile> {
    /// Advance every live projectile
    pub fn update_all(&mut self, dt: f32, bounds: Vec2, trails: &mut impl TrailEmitter) {
        for p in self.iter_mut().filter(|p| p.is_active()) {
            p.update(dt, bounds, trails);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena_bounds;
    use crate::sim::effects::Effects;

    fn launch(pos: Vec2, vel: Vec2) -> ProjectileLaunch {
        ProjectileLaunch {
            pos,
            vel,
            owner: Owner::Player,
            kind: WeaponKind::Laser,
            damage: 2,
        }
    }

    #[test]
    fn test_spawn_resets_fields() {
        let mut pool = Pool::<Projectile>::new();
        pool.spawn_projectile(launch(Vec2::new(5.0, 5.0), Vec2::X));
        pool.active_mut()[0].deactivate();
        pool.release_inactive();

        pool.spawn_projectile(ProjectileLaunch {
            owner: Owner::Enemy,
            damage: 9,
            ..launch(Vec2::new(100.0, 100.0), Vec2::Y)
        });
        let p = &pool.active()[0];
        assert!(p.is_active());
        assert_eq!(p.owner, Owner::Enemy);
        assert_eq!(p.damage, 9);
        assert_eq!(pool.capacity_total(), 1);
    }

    #[test]
    fn test_expires_past_margin() {
        let mut trails = Effects::new(1);
        let mut pool = Pool::<Projectile>::new();
        pool.spawn_projectile(launch(Vec2::new(1290.0, 300.0), Vec2::new(600.0, 0.0)));

        pool.update_all(0.01, arena_bounds(), &mut trails);
        assert!(pool.active()[0].is_active());

        pool.update_all(0.01, arena_bounds(), &mut trails);
        assert!(!pool.active()[0].is_active());
    }
}
