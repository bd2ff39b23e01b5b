//! Asteroids: wrapping hazards that split when destroyed

use glam::Vec2;

use super::collision::{HitCircle, wrap_around};
use super::pool::{Pool, Poolable};
use super::rng::SimRng;
use crate::consts::*;

/// Parameters for a new asteroid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AsteroidSpawn {
    pub pos: Vec2,
    pub vel: Vec2,
    pub scale: f32,
    /// Level the asteroid belongs to (drives its health)
    pub level: u32,
}

/// Health of an asteroid at a given level and scale
pub fn asteroid_hp_max(level: u32, scale: f32) -> u32 {
    let hp = ((ASTEROID_BASE_HP + ASTEROID_HP_PER_LEVEL * level as f32) * scale).floor();
    (hp as u32).max(1)
}

#[derive(Debug, Clone, Default)]
pub struct Asteroid {
    pub pos: Vec2,
    pub vel: Vec2,
    pub angle: f32,
    pub spin: f32,
    pub scale: f32,
    pub level: u32,
    hp: u32,
    hp_max: u32,
    hit: HitCircle,
    active: bool,
}

impl Poolable for Asteroid {
    fn is_active(&self) -> bool {
        self.active
    }

    fn deactivate(&mut self) {
        self.active = false;
    }
}

impl Asteroid {
    pub fn activate(&mut self, spawn: &AsteroidSpawn, rng: &mut SimRng) {
        self.pos = spawn.pos;
        self.vel = spawn.vel;
        self.angle = rng.angle();
        self.spin = rng.symmetric(ASTEROID_SPIN);
        self.scale = spawn.scale;
        self.level = spawn.level;
        self.hp_max = asteroid_hp_max(spawn.level, spawn.scale);
        self.hp = self.hp_max;
        self.hit = HitCircle::new(spawn.pos, ASTEROID_RADIUS * spawn.scale);
        self.active = true;
    }

    pub fn hp(&self) -> u32 {
        self.hp
    }

    pub fn hp_max(&self) -> u32 {
        self.hp_max
    }

    pub fn hit(&self) -> &HitCircle {
        &self.hit
    }

    pub fn update(&mut self, dt: f32, bounds: Vec2) {
        self.pos += self.vel * dt;
        self.angle += self.spin * dt;
        wrap_around(&mut self.pos, self.hit.radius, bounds);
        self.hit.center = self.pos;
    }

    /// Move by a push-apart correction
    pub fn shift(&mut self, delta: Vec2) {
        self.pos += delta;
        self.hit.center = self.pos;
    }

    /// Apply damage, returning `true` if this blow destroyed the asteroid
    pub fn take_damage(&mut self, amount: u32) -> bool {
        if !self.active {
            return false;
        }
        self.hp = self.hp.saturating_sub(amount);
        if self.hp == 0 {
            self.deactivate();
            return true;
        }
        false
    }

    /// Children produced when this asteroid breaks apart
    ///
    /// Large enough rocks split into three smaller ones at the same spot,
    /// each flung off with an independent random velocity.
    pub fn fragments(&self, rng: &mut SimRng) -> Vec<AsteroidSpawn> {
        if self.scale <= ASTEROID_SPLIT_MIN_SCALE {
            return Vec::new();
        }
        (0..ASTEROID_SPLIT_COUNT)
            .map(|_| AsteroidSpawn {
                pos: self.pos,
                vel: Vec2::new(rng.symmetric(ASTEROID_SPEED), rng.symmetric(ASTEROID_SPEED)),
                scale: self.scale - ASTEROID_SPLIT_SHRINK,
                level: self.level,
            })
            .collect()
    }
}

impl Pool<Asteroid> {
    pub fn spawn(&mut self, spawn: &AsteroidSpawn, rng: &mut SimRng) {
        self.acquire().activate(spawn, rng);
    }

    /// Spawn a full-size asteroid anywhere on the playfield
    pub fn spawn_random(&mut self, level: u32, bounds: Vec2, rng: &mut SimRng) {
        let spawn = AsteroidSpawn {
            pos: Vec2::new(rng.range(0.0, bounds.x), rng.range(0.0, bounds.y)),
            vel: Vec2::new(rng.symmetric(ASTEROID_SPEED), rng.symmetric(ASTEROID_SPEED)),
            scale: 1.0,
            level,
        };
        self.spawn(&spawn, rng);
    }

    pub fn update_all(&mut self, dt: f32, bounds: Vec2) {
        for a in self.iter_mut().filter(|a| a.is_active()) {
            a.update(dt, bounds);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rock(scale: f32, level: u32, rng: &mut SimRng) -> Asteroid {
        let mut a = Asteroid::default();
        a.activate(
            &AsteroidSpawn {
                pos: Vec2::new(300.0, 300.0),
                vel: Vec2::ZERO,
                scale,
                level,
            },
            rng,
        );
        a
    }

    #[test]
    fn test_hp_scales_with_level_and_size() {
        assert_eq!(asteroid_hp_max(1, 1.0), 9);
        assert_eq!(asteroid_hp_max(3, 1.0), 13);
        assert_eq!(asteroid_hp_max(1, 0.4), 3);
        assert_eq!(asteroid_hp_max(0, 0.01), 1);
    }

    #[test]
    fn test_hit_radius_follows_scale() {
        let mut rng = SimRng::new(2);
        let a = rock(0.5, 1, &mut rng);
        assert!((a.hit().radius - ASTEROID_RADIUS * 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_damage_destroys_once() {
        let mut rng = SimRng::new(2);
        let mut a = rock(1.0, 1, &mut rng);
        assert!(!a.take_damage(8));
        assert!(a.take_damage(5));
        assert_eq!(a.hp(), 0);
        assert!(!a.is_active());
        assert!(!a.take_damage(1));
    }

    #[test]
    fn test_wraps_when_fully_off_screen() {
        let mut rng = SimRng::new(2);
        let mut a = rock(0.4, 1, &mut rng);
        let r = a.hit().radius;
        a.pos = Vec2::new(-r + 1.0, 100.0);
        a.vel = Vec2::new(-120.0, 0.0);
        a.update(1.0 / 60.0, Vec2::new(1280.0, 720.0));
        assert!((a.pos.x - (1280.0 + r)).abs() < 1e-3);
        assert_eq!(a.hit().center, a.pos);
    }

    proptest! {
        #[test]
        fn prop_split_conservation(scale in 0.05f32..1.5, seed in any::<u64>()) {
            let mut rng = SimRng::new(seed);
            let a = rock(scale, 2, &mut rng);
            let kids = a.fragments(&mut rng);

            if scale > ASTEROID_SPLIT_MIN_SCALE {
                prop_assert_eq!(kids.len(), 3);
                for k in &kids {
                    prop_assert!((k.scale - (scale - 0.2)).abs() < 1e-6);
                    prop_assert_eq!(k.pos, a.pos);
                    prop_assert!(k.vel.x.abs() <= ASTEROID_SPEED);
                    prop_assert!(k.vel.y.abs() <= ASTEROID_SPEED);
                }
            } else {
                prop_assert!(kids.is_empty());
            }
        }
    }
}
