//! Cosmetic effects: particles and floating text
//!
//! Effects never feed back into gameplay. They draw from their own RNG
//! stream so toggling them off leaves gameplay rolls untouched.

use glam::Vec2;

use super::pickup::PickupKind;
use super::pool::{Pool, Poolable};
use super::projectile::Owner;
use super::rng::SimRng;
use super::weapon::WeaponKind;
use crate::consts::{TEXT_DRIFT_X, TEXT_DRIFT_Y, TEXT_LIFETIME};
use crate::direction;
use crate::settings::Settings;

pub type Rgba = [f32; 4];

/// Named colors used by effects and floating text
pub mod colors {
    use super::Rgba;

    pub const WHITE: Rgba = [1.0, 1.0, 1.0, 1.0];
    pub const RED: Rgba = [1.0, 0.0, 0.0, 1.0];
    pub const GREEN: Rgba = [0.0, 1.0, 0.0, 1.0];
    pub const YELLOW: Rgba = [1.0, 1.0, 0.0, 1.0];
    pub const ORANGE: Rgba = [1.0, 0.65, 0.0, 1.0];
    pub const CYAN: Rgba = [0.0, 1.0, 1.0, 1.0];
    pub const PURPLE: Rgba = [0.63, 0.13, 0.94, 1.0];
}

/// Everything needed to start one particle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleSpec {
    pub pos: Vec2,
    pub vel: Vec2,
    pub lifetime: f32,
    pub size_start: f32,
    pub size_end: f32,
    pub color_start: Rgba,
    pub color_end: Rgba,
}

/// A transient visual particle
#[derive(Debug, Clone, Default)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub age: f32,
    pub lifetime: f32,
    pub size_start: f32,
    pub size_end: f32,
    pub color_start: Rgba,
    pub color_end: Rgba,
    active: bool,
}

impl Poolable for Particle {
    fn is_active(&self) -> bool {
        self.active
    }

    fn deactivate(&mut self) {
        self.active = false;
    }
}

impl Particle {
    pub fn activate(&mut self, spec: &ParticleSpec) {
        self.pos = spec.pos;
        self.vel = spec.vel;
        self.age = 0.0;
        self.lifetime = spec.lifetime;
        self.size_start = spec.size_start;
        self.size_end = spec.size_end;
        self.color_start = spec.color_start;
        self.color_end = spec.color_end;
        self.active = true;
    }

    pub fn update(&mut self, dt: f32) {
        self.pos += self.vel * dt;
        self.age += dt;
        if self.age > self.lifetime {
            self.deactivate();
        }
    }

    /// Normalized age in [0, 1]
    pub fn progress(&self) -> f32 {
        if self.lifetime <= 0.0 {
            1.0
        } else {
            (self.age / self.lifetime).clamp(0.0, 1.0)
        }
    }

    pub fn size(&self) -> f32 {
        let t = self.progress();
        self.size_start + (self.size_end - self.size_start) * t
    }

    pub fn color(&self) -> Rgba {
        let t = self.progress();
        let mut out = [0.0; 4];
        for (i, c) in out.iter_mut().enumerate() {
            *c = self.color_start[i] + (self.color_end[i] - self.color_start[i]) * t;
        }
        out
    }
}

/// Rising, fading text (damage numbers, pickup gains)
#[derive(Debug, Clone, Default)]
pub struct FloatingText {
    pub pos: Vec2,
    pub vel: Vec2,
    pub age: f32,
    pub lifetime: f32,
    pub text: String,
    pub color: Rgba,
    active: bool,
}

impl Poolable for FloatingText {
    fn is_active(&self) -> bool {
        self.active
    }

    fn deactivate(&mut self) {
        self.active = false;
    }
}

impl FloatingText {
    pub fn activate(&mut self, pos: Vec2, text: &str, color: Rgba) {
        self.pos = pos;
        self.vel = Vec2::new(TEXT_DRIFT_X, TEXT_DRIFT_Y);
        self.age = 0.0;
        self.lifetime = TEXT_LIFETIME;
        // Reuse the recycled allocation
        self.text.clear();
        self.text.push_str(text);
        self.color = color;
        self.active = true;
    }

    pub fn update(&mut self, dt: f32) {
        self.pos += self.vel * dt;
        self.age += dt;
        if self.age > self.lifetime {
            self.deactivate();
        }
    }

    /// Alpha fades out over the lifetime
    pub fn alpha(&self) -> f32 {
        (1.0 - self.age / self.lifetime).clamp(0.0, 1.0)
    }
}

/// Receives trail puffs from moving entities
pub trait TrailEmitter {
    fn projectile_trail(&mut self, pos: Vec2, vel: Vec2, kind: WeaponKind);
    fn engine_trail(&mut self, pos: Vec2, vel: Vec2, angle: f32, owner: Owner);
}

/// Owner of every particle and floating text, plus the builders that
/// assemble the standard effects
#[derive(Debug, Clone)]
pub struct Effects {
    particles: Pool<Particle>,
    texts: Pool<FloatingText>,
    rng: SimRng,
    pub particles_enabled: bool,
    pub texts_enabled: bool,
    /// Cap on particles in flight
    pub max_particles: usize,
}

impl Effects {
    pub fn new(seed: u64) -> Self {
        Self {
            particles: Pool::new(),
            texts: Pool::new(),
            rng: SimRng::new(seed),
            particles_enabled: true,
            texts_enabled: true,
            max_particles: usize::MAX,
        }
    }

    /// Follow the player's visual preferences
    pub fn configure(&mut self, settings: &Settings) {
        self.max_particles = settings.max_particles();
        self.particles_enabled = self.max_particles > 0;
        self.texts_enabled = settings.floating_text;
    }

    pub fn particles(&self) -> &Pool<Particle> {
        &self.particles
    }

    pub fn texts(&self) -> &Pool<FloatingText> {
        &self.texts
    }

    pub fn spawn_particle(&mut self, spec: ParticleSpec) {
        if self.particles_enabled && self.particles.len() < self.max_particles {
            self.particles.acquire().activate(&spec);
        }
    }

    pub fn float_text(&mut self, pos: Vec2, text: &str, color: Rgba) {
        if self.texts_enabled {
            self.texts.acquire().activate(pos, text, color);
        }
    }

    pub fn update(&mut self, dt: f32) {
        for p in self.particles.iter_mut().filter(|p| p.is_active()) {
            p.update(dt);
        }
        for t in self.texts.iter_mut().filter(|t| t.is_active()) {
            t.update(dt);
        }
    }

    pub fn release_inactive(&mut self) {
        self.particles.release_inactive();
        self.texts.release_inactive();
    }

    /// Jittered copy of `base` with a velocity kick
    fn scatter(&mut self, base: Vec2, vel: Vec2, pos_jitter: f32, vel_jitter: f32) -> (Vec2, Vec2) {
        let pos = base + Vec2::new(self.rng.symmetric(pos_jitter), self.rng.symmetric(pos_jitter));
        let vel = vel + Vec2::new(self.rng.symmetric(vel_jitter), self.rng.symmetric(vel_jitter));
        (pos, vel)
    }

    /// Three interleaved rings for a destroyed ship
    pub fn death_burst(&mut self, pos: Vec2) {
        for i in 0..16 {
            let i = i as f32;
            self.spawn_particle(ParticleSpec {
                pos,
                vel: direction(6.9 / 16.0 * i) * 100.0,
                lifetime: 1.5,
                size_start: 3.0,
                size_end: 1.5,
                color_start: [0.0, 1.0, 0.0, 1.0],
                color_end: [0.0, 1.0, 0.3, 0.0],
            });
            self.spawn_particle(ParticleSpec {
                pos,
                vel: direction(10.5 / 16.0 * i) * 100.0,
                lifetime: 1.5,
                size_start: 3.0,
                size_end: 2.8,
                color_start: [1.0, 1.0, 0.0, 1.0],
                color_end: [1.0, 0.5, 0.0, 0.5],
            });
            self.spawn_particle(ParticleSpec {
                pos,
                vel: direction(i) * 100.0,
                lifetime: 1.5,
                size_start: 3.0,
                size_end: 2.8,
                color_start: [1.0, 0.0, 0.0, 1.0],
                color_end: [1.0, 0.0, 1.0, 0.5],
            });
        }
    }

    /// Ring tinted by the kind of pickup collected
    pub fn pickup_burst(&mut self, pos: Vec2, kind: PickupKind) {
        let (color_start, color_end) = match kind {
            PickupKind::Heal => ([0.0, 1.0, 0.0, 1.0], [0.0, 1.0, 0.3, 0.5]),
            PickupKind::Currency => ([1.0, 1.0, 0.0, 1.0], [1.0, 0.5, 0.0, 0.5]),
            PickupKind::Ammo => ([1.0, 0.0, 0.0, 1.0], [1.0, 0.0, 1.0, 0.5]),
        };
        for i in 0..16 {
            self.spawn_particle(ParticleSpec {
                pos,
                vel: direction(std::f32::consts::TAU / 16.0 * i as f32) * 100.0,
                lifetime: 0.8,
                size_start: 3.0,
                size_end: 2.8,
                color_start,
                color_end,
            });
        }
    }

    /// Spark where a projectile struck an asteroid
    pub fn impact(&mut self, pos: Vec2, vel: Vec2) {
        if !self.particles_enabled {
            return;
        }
        let (pos, vel) = self.scatter(pos, vel * -0.3, 4.0, 30.0);
        self.spawn_particle(ParticleSpec {
            pos,
            vel,
            lifetime: 0.2,
            size_start: 2.3,
            size_end: 1.7,
            color_start: colors::WHITE,
            color_end: [0.0, 0.0, 1.0, 0.0],
        });
    }
}

impl TrailEmitter for Effects {
    fn projectile_trail(&mut self, pos: Vec2, vel: Vec2, kind: WeaponKind) {
        if !self.particles_enabled {
            return;
        }
        let (size_start, size_end, color_start, color_end) = match kind {
            WeaponKind::Laser => (1.5, 0.2, [1.0, 0.3, 0.0, 1.0], colors::WHITE),
            WeaponKind::GreenLaser => (1.2, 2.2, [0.2, 1.0, 0.2, 1.0], [0.3, 1.0, 0.3, 1.0]),
            WeaponKind::SuperLaser => (1.7, 2.5, [0.3, 1.0, 0.2, 1.0], [1.0, 1.0, 0.3, 1.0]),
        };
        let (pos, vel) = self.scatter(pos, vel * -0.3, 4.0, 20.0);
        self.spawn_particle(ParticleSpec {
            pos,
            vel,
            lifetime: 0.05,
            size_start,
            size_end,
            color_start,
            color_end,
        });
    }

    fn engine_trail(&mut self, pos: Vec2, vel: Vec2, angle: f32, owner: Owner) {
        if !self.particles_enabled {
            return;
        }
        let exhaust = pos - direction(angle) * 20.0;
        let (color_start, color_end) = match owner {
            Owner::Player => ([1.0, 0.3, 0.0, 1.0], colors::WHITE),
            Owner::Enemy => ([1.0, 0.0, 0.0, 1.0], [1.0, 0.0, 0.0, 0.0]),
        };
        for _ in 0..2 {
            let (pos, vel) = self.scatter(exhaust, vel * -0.3, 4.0, 20.0);
            self.spawn_particle(ParticleSpec {
                pos,
                vel,
                lifetime: 0.5,
                size_start: 1.2,
                size_end: 0.2,
                color_start,
                color_end,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_particle_expires_after_lifetime() {
        let mut fx = Effects::new(3);
        fx.impact(Vec2::ZERO, Vec2::new(600.0, 0.0));
        assert_eq!(fx.particles().live_count(), 1);

        fx.update(0.1);
        assert_eq!(fx.particles().live_count(), 1);
        fx.update(0.15);
        assert_eq!(fx.particles().live_count(), 0);

        fx.release_inactive();
        assert_eq!(fx.particles().free_len(), 1);
    }

    #[test]
    fn test_particle_interpolates() {
        let mut p = Particle::default();
        p.activate(&ParticleSpec {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            lifetime: 1.0,
            size_start: 2.0,
            size_end: 4.0,
            color_start: [0.0, 0.0, 0.0, 1.0],
            color_end: [1.0, 1.0, 1.0, 0.0],
        });
        p.update(0.5);
        assert!((p.size() - 3.0).abs() < 1e-5);
        assert!((p.color()[3] - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_builders_spawn_expected_counts() {
        let mut fx = Effects::new(9);
        fx.death_burst(Vec2::new(50.0, 50.0));
        assert_eq!(fx.particles().live_count(), 48);

        let mut fx = Effects::new(9);
        fx.pickup_burst(Vec2::ZERO, PickupKind::Currency);
        assert_eq!(fx.particles().live_count(), 16);

        fx.engine_trail(Vec2::ZERO, Vec2::new(100.0, 0.0), 0.0, Owner::Player);
        assert_eq!(fx.particles().live_count(), 18);
    }

    #[test]
    fn test_disabled_effects_spawn_nothing() {
        let mut fx = Effects::new(9);
        fx.particles_enabled = false;
        fx.texts_enabled = false;
        fx.death_burst(Vec2::ZERO);
        fx.float_text(Vec2::ZERO, "HP -3", colors::RED);
        assert!(fx.particles().is_empty());
        assert!(fx.texts().is_empty());
    }

    #[test]
    fn test_particle_budget_from_settings() {
        let mut fx = Effects::new(9);
        let mut settings = Settings::from_preset(crate::settings::QualityPreset::Low);
        fx.configure(&settings);
        assert!(!fx.texts_enabled);
        for _ in 0..10 {
            fx.death_burst(Vec2::ZERO);
        }
        assert_eq!(fx.particles().len(), 200);

        settings.particles = false;
        fx.configure(&settings);
        assert!(!fx.particles_enabled);
    }

    #[test]
    fn test_floating_text_drifts_and_fades() {
        let mut fx = Effects::new(1);
        fx.float_text(Vec2::new(10.0, 10.0), "MONEY +30", colors::YELLOW);
        fx.update(0.5);

        let text = &fx.texts().active()[0];
        assert_eq!(text.text, "MONEY +30");
        assert!((text.pos - Vec2::new(15.0, 35.0)).length() < 1e-4);
        assert!(text.alpha() < 1.0 && text.alpha() > 0.0);

        fx.update(1.1);
        assert_eq!(fx.texts().live_count(), 0);
    }
}
