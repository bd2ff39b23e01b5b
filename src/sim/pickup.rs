//! Collectible pickups dropped by asteroids, the boss and the helper drone

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::pool::{Pool, Poolable};
use super::rng::SimRng;
use crate::consts::{PICKUP_AMOUNT, PICKUP_LIFETIME, PICKUP_SPEED};

/// Pickup types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PickupKind {
    #[default]
    Heal,
    Currency,
    Ammo,
}

impl PickupKind {
    pub const ALL: [PickupKind; 3] = [PickupKind::Heal, PickupKind::Currency, PickupKind::Ammo];

    pub fn random(rng: &mut SimRng) -> Self {
        let idx = (rng.range(0.0, 3.0) as usize).min(2);
        Self::ALL[idx]
    }
}

#[derive(Debug, Clone, Default)]
pub struct Pickup {
    pub kind: PickupKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub amount: u32,
    pub age: f32,
    active: bool,
}

impl Poolable for Pickup {
    fn is_active(&self) -> bool {
        self.active
    }

    fn deactivate(&mut self) {
        self.active = false;
    }
}

impl Pickup {
    /// Start drifting in a random direction
    pub fn activate(&mut self, kind: PickupKind, pos: Vec2, rng: &mut SimRng) {
        self.kind = kind;
        self.pos = pos;
        self.vel = rng.heading_vec(PICKUP_SPEED);
        self.amount = PICKUP_AMOUNT;
        self.age = 0.0;
        self.active = true;
    }

    pub fn update(&mut self, dt: f32) {
        self.pos += self.vel * dt;
        self.age += dt;
        if self.age > PICKUP_LIFETIME {
            self.deactivate();
        }
    }
}

impl Pool<Pickup> {
    pub fn spawn(&mut self, kind: PickupKind, pos: Vec2, rng: &mut SimRng) {
        self.acquire().activate(kind, pos, rng);
    }

    /// Spawn a pickup of a random kind
    pub fn spawn_random(&mut self, pos: Vec2, rng: &mut SimRng) {
        let kind = PickupKind::random(rng);
        self.spawn(kind, pos, rng);
    }

    pub fn update_all(&mut self, dt: f32) {
        for p in self.iter_mut().filter(|p| p.is_active()) {
            p.update(dt);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pickup_drifts_then_expires() {
        let mut rng = SimRng::new(11);
        let mut pool = Pool::<Pickup>::new();
        pool.spawn(PickupKind::Ammo, Vec2::new(200.0, 200.0), &mut rng);

        let p = &pool.active()[0];
        assert_eq!(p.amount, PICKUP_AMOUNT);
        assert!((p.vel.length() - PICKUP_SPEED).abs() < 1e-3);

        pool.update_all(6.9);
        assert_eq!(pool.live_count(), 1);
        pool.update_all(0.2);
        assert_eq!(pool.live_count(), 0);
    }

    #[test]
    fn test_random_kind_covers_all() {
        let mut rng = SimRng::new(5);
        let mut seen = [false; 3];
        for _ in 0..200 {
            let k = PickupKind::random(&mut rng);
            seen[k as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }
}
