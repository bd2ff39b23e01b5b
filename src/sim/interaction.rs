//! Per-tick interaction resolution
//!
//! Runs after every entity has advanced, in a fixed rule order:
//!
//! 1. ship vs asteroid (ram)
//! 2. projectile vs asteroid
//! 3. projectile vs ship
//! 4. pickup magnetism and collection
//! 5. ship vs ship
//!
//! A projectile or pickup deactivated by one rule is invisible to every later
//! rule. Once the player is dead the remaining rules are skipped, so lethal
//! damage is never followed by more damage in the same tick.

use super::asteroid::{Asteroid, AsteroidSpawn};
use super::collision::{HitCircle, circle_contact, push_apart};
use super::effects::{Effects, colors};
use super::pickup::{Pickup, PickupKind};
use super::pilot::Pilot;
use super::pool::{Pool, Poolable};
use super::projectile::{Owner, Projectile};
use super::rng::{SimRng, roll_succeeds};
use super::ship::Ship;
use crate::audio::SoundCue;
use crate::tuning::RuleTuning;

/// Outcome of a damage roll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub damage: u32,
    pub critical: bool,
}

/// Apply the crit rule to a given roll
pub fn damage_for_roll(base: u32, roll: u32, crit_chance: u32, multiplier: u32) -> Hit {
    if roll_succeeds(roll, crit_chance) {
        Hit {
            damage: base.saturating_mul(multiplier),
            critical: true,
        }
    } else {
        Hit {
            damage: base,
            critical: false,
        }
    }
}

/// Which round phase the resolver runs in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arena {
    Wave,
    Boss,
}

/// Mutable view of everything the rules touch
///
/// Built fresh each tick by the round controller from disjoint borrows of
/// its own state.
pub struct Interactions<'a> {
    pub arena: Arena,
    pub level: u32,
    /// Length of the tick being resolved
    pub dt: f32,
    pub player: &'a mut Ship,
    pub pilot: &'a mut Pilot,
    /// Living enemy (wave) or boss (boss fight), if any
    pub opponent: Option<&'a mut Ship>,
    pub asteroids: &'a mut Pool<Asteroid>,
    pub projectiles: &'a mut Pool<Projectile>,
    pub pickups: &'a mut Pool<Pickup>,
    pub effects: &'a mut Effects,
    pub rng: &'a mut SimRng,
    pub rules: &'a RuleTuning,
    pub cues: &'a mut Vec<SoundCue>,
}

impl Interactions<'_> {
    /// Run every rule in order
    pub fn resolve(&mut self) {
        let steps: [fn(&mut Self); 5] = [
            Self::ship_asteroid,
            Self::projectile_asteroid,
            Self::projectile_ship,
            Self::pickups,
            Self::ship_ship,
        ];
        for step in steps {
            if !self.player.is_alive() {
                return;
            }
            step(self);
        }
    }

    fn roll_hit(&mut self, base: u32) -> Hit {
        let roll = self.rng.roll_percent();
        damage_for_roll(base, roll, self.pilot.crit_chance(), self.rules.crit_multiplier)
    }

    fn spawn_fragments(&mut self, spawns: Vec<AsteroidSpawn>) {
        for spawn in &spawns {
            self.asteroids.spawn(spawn, self.rng);
        }
    }

    /// Rule 1: ships ramming asteroids
    fn ship_asteroid(&mut self) {
        let mut fragments = Vec::new();

        self.ram_asteroids(true, &mut fragments);
        if self.player.is_alive() && self.arena == Arena::Wave {
            self.ram_asteroids(false, &mut fragments);
        }
        self.spawn_fragments(fragments);
    }

    fn ram_asteroids(&mut self, is_player: bool, fragments: &mut Vec<AsteroidSpawn>) {
        let ship = if is_player {
            &mut *self.player
        } else {
            match self.opponent.as_deref_mut() {
                Some(ship) if ship.is_alive() => ship,
                _ => return,
            }
        };

        for a in self.asteroids.iter_mut().filter(|a| a.is_active()) {
            let Some(contact) = circle_contact(ship.hit(), a.hit()) else {
                continue;
            };
            let (ds, da) = push_apart(ship.hit(), a.hit(), &contact);
            ship.shift(ds);
            a.shift(da);

            let (r_ship, r_rock) = (ship.hit().radius, a.hit().radius);
            let sum = r_ship * 2.0 + r_rock;
            ship.vel += contact.normal * self.rules.push_impulse * r_rock / sum;
            a.vel -= contact.normal * self.rules.push_impulse * r_ship / sum;

            if a.take_damage(self.rules.asteroid_chip_damage) {
                self.cues.push(SoundCue::AsteroidDestroyed);
                fragments.extend(a.fragments(self.rng));
            }

            if is_player {
                let hurt = (self.level as f32 * a.scale * self.rules.asteroid_ram_damage).floor() as u32;
                ship.take_damage(hurt);
                self.effects
                    .float_text(ship.pos, &format!("HP -{hurt}"), colors::RED);
                self.pilot
                    .add_score(a.hp_max() as u64 * self.rules.asteroid_ram_score);
                if !ship.is_alive() {
                    return;
                }
            }
        }
    }

    /// Rule 2: projectiles striking asteroids
    fn projectile_asteroid(&mut self) {
        let mut fragments = Vec::new();

        for i in 0..self.projectiles.len() {
            let p = &self.projectiles.active()[i];
            if !p.is_active() {
                continue;
            }
            let (pos, vel, owner, base) = (p.pos, p.vel, p.owner, p.damage);

            let Some(ai) = self
                .asteroids
                .iter()
                .position(|a| a.is_active() && a.hit().contains(pos))
            else {
                continue;
            };

            self.effects.impact(pos, vel);
            self.projectiles.active_mut()[i].deactivate();

            // Hostile fire is absorbed without effect
            if owner != Owner::Player {
                continue;
            }

            let hit = self.roll_hit(base);
            let a = &mut self.asteroids.active_mut()[ai];
            if hit.critical {
                self.effects
                    .float_text(a.pos, &format!("-{}", hit.damage), colors::PURPLE);
            }
            if !a.take_damage(hit.damage) {
                continue;
            }

            let (rock_pos, scale, hp_max) = (a.pos, a.scale, a.hp_max());
            fragments.extend(a.fragments(self.rng));
            self.pilot
                .add_score(hp_max as u64 * self.rules.asteroid_kill_score);
            self.cues.push(SoundCue::AsteroidDestroyed);

            let chance = self.rules.asteroid_drop_chance(scale);
            for _ in 0..self.rules.asteroid_drop_rolls {
                if self.rng.chance(chance) {
                    self.pickups.spawn_random(rock_pos, self.rng);
                }
            }
        }

        self.spawn_fragments(fragments);
    }

    /// Rule 3: projectiles striking ships
    fn projectile_ship(&mut self) {
        for i in 0..self.projectiles.len() {
            let p = &self.projectiles.active()[i];
            if !p.is_active() {
                continue;
            }
            let (pos, owner, base) = (p.pos, p.owner, p.damage);

            match owner {
                Owner::Player => {
                    let Some(target) = self.opponent.as_deref() else {
                        continue;
                    };
                    if !target.is_alive() || !target.hit().contains(pos) {
                        continue;
                    }
                    self.projectiles.active_mut()[i].deactivate();
                    self.hit_opponent(base);
                }
                Owner::Enemy => {
                    if !self.player.hit().contains(pos) {
                        continue;
                    }
                    self.projectiles.active_mut()[i].deactivate();
                    self.player.take_damage(base);
                    self.effects
                        .float_text(self.player.pos, &format!("HP -{base}"), colors::RED);
                    if !self.player.is_alive() {
                        return;
                    }
                }
            }
        }
    }

    fn hit_opponent(&mut self, base: u32) {
        let hit = self.roll_hit(base);
        let Some(target) = self.opponent.as_deref_mut() else {
            return;
        };

        let killed = target.take_damage(hit.damage);
        let (pos, hp_max) = (target.pos, target.hp_max());
        self.effects
            .float_text(pos, &format!("HP -{}", hit.damage), colors::CYAN);
        self.pilot
            .add_score(hp_max as u64 * self.rules.ship_hit_score);

        if killed {
            self.effects.death_burst(pos);
            self.cues.push(SoundCue::ShipDestroyed);
        }
        if self.arena == Arena::Boss && self.rng.chance(self.rules.boss_drop_chance) {
            self.pickups.spawn(PickupKind::Currency, pos, self.rng);
        }
    }

    /// Rule 4: magnetism, then collection
    fn pickups(&mut self) {
        let magnet = HitCircle::new(self.player.pos, self.pilot.magnet_radius());

        for pk in self.pickups.iter_mut().filter(|p| p.is_active()) {
            if magnet.contains(pk.pos) {
                // Head straight for the player, never further than it in one step
                let offset = self.player.pos - pk.pos;
                let speed = (pk.vel.length() + self.rules.magnet_pull)
                    .min(offset.length() / self.dt);
                pk.vel = offset.normalize_or_zero() * speed;
            }
            if !self.player.hit().contains(pk.pos) {
                continue;
            }

            let (text, color) = match pk.kind {
                PickupKind::Heal => {
                    let gained = self.player.heal(pk.amount);
                    (format!("HP +{gained}"), colors::GREEN)
                }
                PickupKind::Currency => {
                    self.pilot.add_currency(pk.amount);
                    (format!("MONEY +{}", pk.amount), colors::YELLOW)
                }
                PickupKind::Ammo => {
                    let added = self.player.weapon_mut().add_ammo(pk.amount);
                    (format!("AMMO +{added}"), colors::ORANGE)
                }
            };
            self.effects.float_text(pk.pos, &text, color);
            self.effects.pickup_burst(pk.pos, pk.kind);
            self.cues.push(SoundCue::PickupCollected);
            pk.deactivate();
        }
    }

    /// Rule 5: player against the enemy or boss
    fn ship_ship(&mut self) {
        let Some(other) = self.opponent.as_deref_mut() else {
            return;
        };
        if !other.is_alive() {
            return;
        }
        let Some(contact) = circle_contact(self.player.hit(), other.hit()) else {
            return;
        };

        let (dp, do_) = push_apart(self.player.hit(), other.hit(), &contact);
        self.player.shift(dp);
        other.shift(do_);

        let (r_player, r_other) = (self.player.hit().radius, other.hit().radius);
        let sum = r_player * 2.0 + r_other;
        self.player.vel += contact.normal * self.rules.push_impulse * r_other / sum;
        other.vel -= contact.normal * self.rules.push_impulse * r_player / sum;

        if self.arena == Arena::Boss {
            let dmg = self.rules.boss_contact_damage;
            if other.take_damage(dmg) {
                self.effects.death_burst(other.pos);
                self.cues.push(SoundCue::ShipDestroyed);
            }
            self.player.take_damage(dmg);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::pilot::PilotTuning;
    use crate::sim::projectile::{ProjectileLaunch, ProjectileSpawner};
    use crate::sim::ship::ShipDescriptor;
    use crate::sim::weapon::WeaponKind;
    use glam::Vec2;

    struct World {
        player: Ship,
        pilot: Pilot,
        opponent: Ship,
        asteroids: Pool<Asteroid>,
        projectiles: Pool<Projectile>,
        pickups: Pool<Pickup>,
        effects: Effects,
        rng: SimRng,
        rules: RuleTuning,
        cues: Vec<SoundCue>,
    }

    impl World {
        fn new() -> Self {
            let mut opponent =
                Ship::from_descriptor(&ShipDescriptor::enemy(), Vec2::new(1100.0, 600.0)).unwrap();
            opponent.retire();
            Self {
                player: Ship::from_descriptor(&ShipDescriptor::player(), Vec2::new(640.0, 360.0))
                    .unwrap(),
                pilot: Pilot::new(PilotTuning::default()),
                opponent,
                asteroids: Pool::new(),
                projectiles: Pool::new(),
                pickups: Pool::new(),
                effects: Effects::new(99),
                rng: SimRng::new(5),
                rules: RuleTuning::default(),
                cues: Vec::new(),
            }
        }

        fn run(&mut self, arena: Arena, level: u32) {
            Interactions {
                arena,
                level,
                dt: SIM_DT,
                player: &mut self.player,
                pilot: &mut self.pilot,
                opponent: Some(&mut self.opponent),
                asteroids: &mut self.asteroids,
                projectiles: &mut self.projectiles,
                pickups: &mut self.pickups,
                effects: &mut self.effects,
                rng: &mut self.rng,
                rules: &self.rules,
                cues: &mut self.cues,
            }
            .resolve();
        }

        fn rock(&mut self, pos: Vec2, scale: f32) {
            self.asteroids.spawn(
                &AsteroidSpawn {
                    pos,
                    vel: Vec2::ZERO,
                    scale,
                    level: 1,
                },
                &mut self.rng,
            );
        }

        fn shot(&mut self, pos: Vec2, owner: Owner, damage: u32) {
            self.projectiles.spawn_projectile(ProjectileLaunch {
                pos,
                vel: Vec2::new(600.0, 0.0),
                owner,
                kind: WeaponKind::Laser,
                damage,
            });
        }
    }

    #[test]
    fn test_crit_boundary() {
        assert_eq!(damage_for_roll(2, 5, 5, 3), Hit { damage: 6, critical: true });
        assert_eq!(damage_for_roll(2, 6, 5, 3), Hit { damage: 2, critical: false });
    }

    #[test]
    fn test_projectile_consumed_by_asteroid_not_ship() {
        let mut w = World::new();
        // Boss fights skip opponent ramming, so the rock stays put
        w.opponent = Ship::from_descriptor(&ShipDescriptor::boss(), Vec2::new(300.0, 300.0)).unwrap();
        w.rock(Vec2::new(300.0, 300.0), 1.0);
        w.shot(Vec2::new(300.0, 300.0), Owner::Player, 1);

        w.run(Arena::Boss, 5);
        assert_eq!(w.opponent.hp(), w.opponent.hp_max());
        assert!(w.asteroids.active()[0].hp() < w.asteroids.active()[0].hp_max());
        assert_eq!(w.projectiles.live_count(), 0);
    }

    #[test]
    fn test_enemy_shot_absorbed_by_asteroid() {
        let mut w = World::new();
        w.rock(Vec2::new(300.0, 300.0), 1.0);
        w.shot(Vec2::new(300.0, 300.0), Owner::Enemy, 1);
        w.run(Arena::Wave, 1);
        let a = &w.asteroids.active()[0];
        assert_eq!(a.hp(), a.hp_max());
        assert_eq!(w.projectiles.live_count(), 0);
    }

    #[test]
    fn test_asteroid_kill_scores_and_splits() {
        let mut w = World::new();
        w.rules.asteroid_drop_chance_per_scale = 100.0;
        w.rock(Vec2::new(300.0, 300.0), 1.0);
        let hp = w.asteroids.active()[0].hp();
        w.asteroids.active_mut()[0].take_damage(hp - 1);
        w.shot(Vec2::new(300.0, 300.0), Owner::Player, 1);

        w.run(Arena::Wave, 1);
        assert_eq!(w.pilot.score(), 9 * 100);
        assert_eq!(w.pickups.live_count(), 3);
        assert_eq!(w.asteroids.live_count(), 3);
        assert!(w.asteroids.iter().filter(|a| a.is_active()).all(|a| (a.scale - 0.8).abs() < 1e-6));
        assert!(w.cues.contains(&SoundCue::AsteroidDestroyed));
    }

    #[test]
    fn test_ram_hurts_player_and_chips_asteroid() {
        let mut w = World::new();
        w.rock(Vec2::new(700.0, 360.0), 1.0);
        w.run(Arena::Wave, 2);

        // floor(2 * 1.0 * 5)
        assert_eq!(w.player.hp(), 90);
        let a = &w.asteroids.active()[0];
        assert_eq!(a.hp(), a.hp_max() - 2);
        assert_eq!(w.pilot.score(), a.hp_max() as u64 * 20);
        // Pushed apart along the contact normal
        assert!(w.player.pos.x < 640.0);
        assert!(w.player.vel.x < 0.0);
        assert!(a.vel.x > 0.0);
    }

    #[test]
    fn test_enemy_shot_hits_player() {
        let mut w = World::new();
        w.shot(Vec2::new(645.0, 360.0), Owner::Enemy, 7);
        w.run(Arena::Wave, 1);
        assert_eq!(w.player.hp(), 93);
        assert_eq!(w.projectiles.live_count(), 0);
    }

    #[test]
    fn test_player_shot_on_dead_opponent_passes_through() {
        let mut w = World::new();
        w.opponent.place(Vec2::new(300.0, 300.0));
        w.shot(Vec2::new(300.0, 300.0), Owner::Player, 1);
        w.run(Arena::Wave, 1);
        assert_eq!(w.projectiles.live_count(), 1);
    }

    #[test]
    fn test_ship_hit_scores_per_hit() {
        let mut w = World::new();
        w.opponent.resurrect();
        w.opponent.place(Vec2::new(300.0, 300.0));
        w.shot(Vec2::new(300.0, 300.0), Owner::Player, 1);
        w.shot(Vec2::new(301.0, 300.0), Owner::Player, 1);
        w.run(Arena::Wave, 2);
        assert_eq!(w.pilot.score(), 2 * 50 * 100);
        assert!(w.opponent.hp() <= 48);
    }

    #[test]
    fn test_critical_ship_hit_text_stays_cyan() {
        let mut w = World::new();
        w.pilot = Pilot::new(PilotTuning {
            crit_chance: 100,
            ..PilotTuning::default()
        });
        w.opponent.resurrect();
        w.opponent.place(Vec2::new(300.0, 300.0));
        w.shot(Vec2::new(300.0, 300.0), Owner::Player, 1);
        w.run(Arena::Wave, 2);

        let texts: Vec<_> = w.effects.texts().iter().filter(|t| t.is_active()).collect();
        assert_eq!(texts.len(), 1);
        assert_eq!(texts[0].text, format!("HP -{}", w.rules.crit_multiplier));
        assert_eq!(texts[0].color, colors::CYAN);
    }

    #[test]
    fn test_lethal_damage_stops_resolution() {
        let mut w = World::new();
        w.player.take_damage(95);
        w.shot(Vec2::new(645.0, 360.0), Owner::Enemy, 10);
        w.shot(Vec2::new(640.0, 365.0), Owner::Enemy, 10);
        // Pickup sitting on the player must not be collected after death
        w.pickups.spawn(PickupKind::Heal, Vec2::new(640.0, 360.0), &mut w.rng);

        w.run(Arena::Wave, 1);
        assert!(!w.player.is_alive());
        assert_eq!(w.projectiles.live_count(), 1);
        assert_eq!(w.pickups.live_count(), 1);
    }

    #[test]
    fn test_pickup_collected_once() {
        let mut w = World::new();
        w.player.take_damage(50);
        w.pickups.spawn(PickupKind::Heal, Vec2::new(645.0, 360.0), &mut w.rng);
        w.run(Arena::Wave, 1);
        assert_eq!(w.player.hp(), 80);
        w.run(Arena::Wave, 1);
        assert_eq!(w.player.hp(), 80);
        assert_eq!(w.cues.iter().filter(|c| **c == SoundCue::PickupCollected).count(), 1);
    }

    #[test]
    fn test_currency_and_ammo_pickups() {
        let mut w = World::new();
        w.pickups.spawn(PickupKind::Currency, Vec2::new(640.0, 365.0), &mut w.rng);
        w.pickups.spawn(PickupKind::Ammo, Vec2::new(640.0, 355.0), &mut w.rng);
        w.run(Arena::Wave, 1);
        assert_eq!(w.pilot.currency(), 330);
        // Full magazine: nothing added
        assert_eq!(w.player.weapon().ammo(), w.player.weapon().capacity());
        assert_eq!(w.pickups.live_count(), 0);
    }

    #[test]
    fn test_magnet_pulls_toward_player() {
        let mut w = World::new();
        w.pickups.spawn(PickupKind::Currency, Vec2::new(720.0, 360.0), &mut w.rng);
        w.run(Arena::Wave, 1);
        let pk = &w.pickups.active()[0];
        assert!(pk.is_active());
        assert!(pk.vel.x < -100.0);
    }

    #[test]
    fn test_boss_contact_damages_both() {
        let mut w = World::new();
        w.opponent = Ship::from_descriptor(&ShipDescriptor::boss(), Vec2::new(760.0, 360.0)).unwrap();
        w.run(Arena::Boss, 5);
        assert_eq!(w.player.hp(), 99);
        assert_eq!(w.opponent.hp(), 99);
        assert!(w.player.pos.x < 640.0);
    }

    #[test]
    fn test_enemy_contact_pushes_without_damage() {
        let mut w = World::new();
        w.opponent.resurrect();
        w.opponent.place(Vec2::new(660.0, 360.0));
        w.run(Arena::Wave, 2);
        assert_eq!(w.player.hp(), 100);
        assert_eq!(w.opponent.hp(), 50);
        assert!(w.opponent.pos.x > 660.0);
    }
}
