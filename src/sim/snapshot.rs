//! Read-only view of a game state for the renderer
//!
//! Instance structs are `#[repr(C)]` + `Pod` so they can be uploaded to a
//! vertex buffer as-is.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use super::effects::Rgba;
use super::pickup::PickupKind;
use super::pool::Poolable;
use super::projectile::Owner;
use super::state::{Banner, GameState, Phase};
use super::weapon::WeaponKind;

/// Sprite categories, stored in [`SpriteInstance::kind`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum SpriteKind {
    Player = 0,
    Enemy = 1,
    Boss = 2,
    Helper = 3,
    Asteroid = 4,
    PlayerShot = 5,
    EnemyShot = 6,
    HealPickup = 7,
    CurrencyPickup = 8,
    AmmoPickup = 9,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SpriteInstance {
    pub position: [f32; 2], // offset 0
    pub angle: f32,         // offset 8
    pub scale: f32,         // offset 12
    pub color: [f32; 4],    // offset 16
    pub kind: u32,          // offset 32
    pub _pad: [u32; 3],     // pad to 48 bytes
}

impl SpriteInstance {
    fn new(kind: SpriteKind, pos: Vec2, angle: f32, scale: f32, color: Rgba) -> Self {
        Self {
            position: pos.to_array(),
            angle,
            scale,
            color,
            kind: kind as u32,
            _pad: [0; 3],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ParticleInstance {
    pub position: [f32; 2],
    pub size: f32,
    pub _pad: f32,
    pub color: [f32; 4],
}

/// Floating text, alpha already applied
#[derive(Debug, Clone, PartialEq)]
pub struct TextInstance {
    pub position: Vec2,
    pub text: String,
    pub color: Rgba,
}

/// Numbers for the heads-up display
#[derive(Debug, Clone, PartialEq)]
pub struct Hud {
    pub hp: u32,
    pub hp_max: u32,
    /// Rolling score counter
    pub score: u64,
    pub currency: u32,
    pub ammo: u32,
    pub ammo_capacity: u32,
    pub weapon: String,
    /// 1-based tier of the active weapon
    pub weapon_tier: usize,
    pub weapon_tiers: usize,
    /// Fraction of the firing period elapsed, 1.0 when ready
    pub reload: f32,
    pub level: u32,
    pub crit_chance: u32,
    pub magnet_radius: f32,
    pub paused: bool,
}

/// Everything drawn for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSnapshot {
    pub sprites: Vec<SpriteInstance>,
    pub particles: Vec<ParticleInstance>,
    pub texts: Vec<TextInstance>,
    pub hud: Hud,
    pub banner: Option<Banner>,
}

const WHITE: Rgba = [1.0, 1.0, 1.0, 1.0];

fn shot_tint(kind: WeaponKind) -> Rgba {
    match kind {
        WeaponKind::Laser => [1.0, 0.3, 0.0, 1.0],
        WeaponKind::GreenLaser => [0.2, 1.0, 0.2, 1.0],
        WeaponKind::SuperLaser => [1.0, 1.0, 0.3, 1.0],
    }
}

impl RenderSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let mut sprites = Vec::new();

        // Back to front
        sprites.push(SpriteInstance::new(
            SpriteKind::Helper,
            state.helper.pos,
            0.0,
            1.0,
            WHITE,
        ));
        for a in state.asteroids.iter().filter(|a| a.is_active()) {
            sprites.push(SpriteInstance::new(
                SpriteKind::Asteroid,
                a.pos,
                a.angle,
                a.scale,
                WHITE,
            ));
        }
        for p in state.pickups.iter().filter(|p| p.is_active()) {
            let kind = match p.kind {
                PickupKind::Heal => SpriteKind::HealPickup,
                PickupKind::Currency => SpriteKind::CurrencyPickup,
                PickupKind::Ammo => SpriteKind::AmmoPickup,
            };
            sprites.push(SpriteInstance::new(kind, p.pos, 0.0, 1.0, WHITE));
        }
        match state.phase {
            Phase::Wave if state.enemy.is_alive() => sprites.push(SpriteInstance::new(
                SpriteKind::Enemy,
                state.enemy.pos,
                state.enemy.angle,
                1.0,
                WHITE,
            )),
            Phase::Boss if state.boss.is_alive() => sprites.push(SpriteInstance::new(
                SpriteKind::Boss,
                state.boss.pos,
                state.boss.angle,
                1.0,
                WHITE,
            )),
            _ => {}
        }
        if state.player.is_alive() {
            sprites.push(SpriteInstance::new(
                SpriteKind::Player,
                state.player.pos,
                state.player.angle,
                1.0,
                WHITE,
            ));
        }
        for p in state.projectiles.iter().filter(|p| p.is_active()) {
            let kind = match p.owner {
                Owner::Player => SpriteKind::PlayerShot,
                Owner::Enemy => SpriteKind::EnemyShot,
            };
            let angle = p.vel.y.atan2(p.vel.x);
            sprites.push(SpriteInstance::new(kind, p.pos, angle, 1.0, shot_tint(p.kind)));
        }

        let particles = state
            .effects
            .particles()
            .iter()
            .filter(|p| p.is_active())
            .map(|p| ParticleInstance {
                position: p.pos.to_array(),
                size: p.size(),
                _pad: 0.0,
                color: p.color(),
            })
            .collect();

        let texts = state
            .effects
            .texts()
            .iter()
            .filter(|t| t.is_active())
            .map(|t| {
                let mut color = t.color;
                color[3] *= t.alpha();
                TextInstance {
                    position: t.pos,
                    text: t.text.clone(),
                    color,
                }
            })
            .collect();

        let weapon = state.player.weapon();
        let hud = Hud {
            hp: state.player.hp(),
            hp_max: state.player.hp_max(),
            score: state.pilot.displayed_score(),
            currency: state.pilot.currency(),
            ammo: weapon.ammo(),
            ammo_capacity: weapon.capacity(),
            weapon: weapon.spec().name.clone(),
            weapon_tier: state.player.weapon_index() + 1,
            weapon_tiers: state.player.weapon_tiers(),
            reload: (state.player.fire_timer() / weapon.spec().period).min(1.0),
            level: state.level,
            crit_chance: state.pilot.crit_chance(),
            magnet_radius: state.pilot.magnet_radius(),
            paused: state.is_paused(),
        };

        Self {
            sprites,
            particles,
            texts,
            hud,
            banner: state.banner(),
        }
    }

    /// Raw sprite bytes for a GPU upload
    pub fn sprite_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.sprites)
    }

    pub fn particle_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.particles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    #[test]
    fn test_instance_layout() {
        assert_eq!(std::mem::size_of::<SpriteInstance>(), 48);
        assert_eq!(std::mem::size_of::<ParticleInstance>(), 32);
    }

    #[test]
    fn test_fresh_run_snapshot() {
        let state = GameState::new(11, Tuning::default()).unwrap();
        let snap = state.snapshot();

        let kinds: Vec<u32> = snap.sprites.iter().map(|s| s.kind).collect();
        assert!(kinds.contains(&(SpriteKind::Player as u32)));
        assert!(kinds.contains(&(SpriteKind::Asteroid as u32)));
        // Dormant enemy and the not-yet-active boss are hidden
        assert!(!kinds.contains(&(SpriteKind::Enemy as u32)));
        assert!(!kinds.contains(&(SpriteKind::Boss as u32)));

        assert_eq!(snap.hud.hp, 100);
        assert_eq!(snap.hud.currency, 300);
        assert_eq!(snap.banner, Some(Banner::Level(1)));
        assert_eq!(snap.sprite_bytes().len(), snap.sprites.len() * 48);
    }

    #[test]
    fn test_hud_tracks_weapon_and_reload() {
        let mut state = GameState::new(11, Tuning::default()).unwrap();
        let hud = state.snapshot().hud;
        assert_eq!(hud.weapon_tier, 1);
        assert_eq!(hud.weapon_tiers, state.player.weapon_tiers());
        assert_eq!(hud.reload, 0.0);

        state.player.upgrade_weapon();
        state.player.update(10.0, crate::arena_bounds());
        let hud = state.snapshot().hud;
        assert_eq!(hud.weapon_tier, 2);
        assert_eq!(hud.reload, 1.0);
    }

    #[test]
    fn test_texts_carry_alpha() {
        let mut state = GameState::new(11, Tuning::default()).unwrap();
        state
            .effects
            .float_text(Vec2::new(10.0, 10.0), "HP +5", [0.0, 1.0, 0.0, 1.0]);
        let snap = state.snapshot();
        assert_eq!(snap.texts.len(), 1);
        assert_eq!(snap.texts[0].text, "HP +5");
        assert!(snap.texts[0].color[3] <= 1.0);
    }
}
