//! Player economy: score, currency, crit chance, magnet, and the upgrade shop

use std::fmt;

use serde::{Deserialize, Serialize};

use super::helper::HelperDrone;
use super::ship::Ship;
use crate::consts::SCORE_ROLL_RATE;

/// Starting values and upgrade steps for the pilot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PilotTuning {
    pub start_currency: u32,
    pub crit_chance: u32,
    pub crit_step: u32,
    pub crit_max: u32,
    pub magnet_radius: f32,
    pub magnet_step: f32,
    pub magnet_max: f32,
    pub hp_max_step: u32,
    pub heal_step: u32,
    pub helper_interval_step: f32,
    pub helper_interval_min: f32,
}

impl Default for PilotTuning {
    fn default() -> Self {
        Self {
            start_currency: 300,
            crit_chance: 5,
            crit_step: 5,
            crit_max: 100,
            magnet_radius: 100.0,
            magnet_step: 10.0,
            magnet_max: 700.0,
            hp_max_step: 10,
            heal_step: 10,
            helper_interval_step: 3.0,
            helper_interval_min: 3.0,
        }
    }
}

/// Upgrades sold in the shop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Skill {
    /// Raise max health
    HpMax,
    /// Repair
    Hp,
    /// Next weapon tier
    Weapon,
    /// Wider pickup magnet
    Magnet,
    /// Faster helper drops
    Timer,
    /// Higher crit chance
    Critical,
}

impl Skill {
    pub const ALL: [Skill; 6] = [
        Skill::HpMax,
        Skill::Hp,
        Skill::Weapon,
        Skill::Magnet,
        Skill::Timer,
        Skill::Critical,
    ];

    pub fn cost(self) -> u32 {
        match self {
            Skill::HpMax | Skill::Hp => 20,
            Skill::Weapon => 100,
            Skill::Magnet | Skill::Critical => 50,
            Skill::Timer => 30,
        }
    }
}

/// Why the shop refused a purchase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShopError {
    NotEnoughCurrency { cost: u32, available: u32 },
    AlreadyMaxed(Skill),
    /// Purchases are only accepted while the game is paused
    ShopClosed,
}

impl fmt::Display for ShopError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShopError::NotEnoughCurrency { cost, available } => {
                write!(f, "costs {cost}, only {available} available")
            }
            ShopError::AlreadyMaxed(skill) => write!(f, "{skill:?} is already maxed"),
            ShopError::ShopClosed => write!(f, "the shop is closed"),
        }
    }
}

impl std::error::Error for ShopError {}

#[derive(Debug, Clone)]
pub struct Pilot {
    score: u64,
    /// Rolling counter shown on the HUD; catches up with `score`
    displayed_score: f32,
    currency: u32,
    crit_chance: u32,
    magnet_radius: f32,
    tuning: PilotTuning,
}

impl Pilot {
    pub fn new(tuning: PilotTuning) -> Self {
        Self {
            score: 0,
            displayed_score: 0.0,
            currency: tuning.start_currency,
            crit_chance: tuning.crit_chance,
            magnet_radius: tuning.magnet_radius,
            tuning,
        }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn displayed_score(&self) -> u64 {
        self.displayed_score as u64
    }

    pub fn currency(&self) -> u32 {
        self.currency
    }

    pub fn crit_chance(&self) -> u32 {
        self.crit_chance
    }

    pub fn magnet_radius(&self) -> f32 {
        self.magnet_radius
    }

    pub fn add_score(&mut self, amount: u64) {
        self.score = self.score.saturating_add(amount);
    }

    pub fn add_currency(&mut self, amount: u32) {
        self.currency = self.currency.saturating_add(amount);
    }

    /// Roll the HUD counter toward the real score
    pub fn update(&mut self, dt: f32) {
        let target = self.score as f32;
        if self.displayed_score < target {
            self.displayed_score = (self.displayed_score + SCORE_ROLL_RATE * dt).min(target);
        }
    }

    /// Buy a skill. Currency is only charged when the upgrade applies.
    pub fn purchase(
        &mut self,
        skill: Skill,
        ship: &mut Ship,
        helper: &mut HelperDrone,
    ) -> Result<(), ShopError> {
        let cost = skill.cost();
        if self.currency < cost {
            return Err(ShopError::NotEnoughCurrency {
                cost,
                available: self.currency,
            });
        }

        let t = &self.tuning;
        let applied = match skill {
            Skill::HpMax => {
                ship.raise_hp_max(t.hp_max_step);
                true
            }
            Skill::Hp => ship.heal(t.heal_step) > 0,
            Skill::Weapon => ship.upgrade_weapon(),
            Skill::Magnet => {
                if self.magnet_radius < t.magnet_max {
                    self.magnet_radius = (self.magnet_radius + t.magnet_step).min(t.magnet_max);
                    true
                } else {
                    false
                }
            }
            Skill::Timer => helper.shorten_interval(t.helper_interval_step, t.helper_interval_min),
            Skill::Critical => {
                if self.crit_chance < t.crit_max {
                    self.crit_chance = (self.crit_chance + t.crit_step).min(t.crit_max);
                    true
                } else {
                    false
                }
            }
        };

        if !applied {
            return Err(ShopError::AlreadyMaxed(skill));
        }
        self.currency -= cost;
        log::info!("Bought {skill:?} for {cost}, {} left", self.currency);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena_bounds;
    use crate::sim::rng::SimRng;
    use crate::sim::ship::ShipDescriptor;
    use glam::Vec2;

    fn setup() -> (Pilot, Ship, HelperDrone) {
        let mut rng = SimRng::new(1);
        let ship = Ship::from_descriptor(&ShipDescriptor::player(), Vec2::new(640.0, 360.0)).unwrap();
        let helper = HelperDrone::new(arena_bounds(), &mut rng);
        (Pilot::new(PilotTuning::default()), ship, helper)
    }

    #[test]
    fn test_score_rolls_up() {
        let (mut pilot, _, _) = setup();
        pilot.add_score(900);
        pilot.update(0.5);
        assert_eq!(pilot.displayed_score(), 500);
        pilot.update(0.5);
        assert_eq!(pilot.displayed_score(), 900);
    }

    #[test]
    fn test_weapon_purchase_charges_once() {
        let (mut pilot, mut ship, mut helper) = setup();
        assert!(pilot.purchase(Skill::Weapon, &mut ship, &mut helper).is_ok());
        assert_eq!(ship.weapon_index(), 1);
        assert_eq!(pilot.currency(), 200);
    }

    #[test]
    fn test_maxed_skill_is_free_refusal() {
        let (mut pilot, mut ship, mut helper) = setup();
        // Full health: repair has nothing to do
        assert_eq!(
            pilot.purchase(Skill::Hp, &mut ship, &mut helper),
            Err(ShopError::AlreadyMaxed(Skill::Hp))
        );
        assert_eq!(pilot.currency(), 300);

        ship.take_damage(15);
        assert!(pilot.purchase(Skill::Hp, &mut ship, &mut helper).is_ok());
        assert_eq!(ship.hp(), 95);
    }

    #[test]
    fn test_not_enough_currency() {
        let (mut pilot, mut ship, mut helper) = setup();
        for _ in 0..3 {
            pilot.purchase(Skill::Weapon, &mut ship, &mut helper).unwrap();
        }
        assert_eq!(pilot.currency(), 0);
        assert_eq!(
            pilot.purchase(Skill::Timer, &mut ship, &mut helper),
            Err(ShopError::NotEnoughCurrency { cost: 30, available: 0 })
        );
    }

    #[test]
    fn test_every_skill_refused_when_broke() {
        let (mut pilot, mut ship, mut helper) = setup();
        for _ in 0..3 {
            pilot.purchase(Skill::Weapon, &mut ship, &mut helper).unwrap();
        }
        for skill in Skill::ALL {
            assert_eq!(
                pilot.purchase(skill, &mut ship, &mut helper),
                Err(ShopError::NotEnoughCurrency {
                    cost: skill.cost(),
                    available: 0
                })
            );
        }
    }

    #[test]
    fn test_magnet_and_crit_caps() {
        let (mut pilot, mut ship, mut helper) = setup();
        pilot.add_currency(100_000);
        while pilot.purchase(Skill::Magnet, &mut ship, &mut helper).is_ok() {}
        assert_eq!(pilot.magnet_radius(), 700.0);
        while pilot.purchase(Skill::Critical, &mut ship, &mut helper).is_ok() {}
        assert_eq!(pilot.crit_chance(), 100);
    }

    #[test]
    fn test_timer_and_hp_max() {
        let (mut pilot, mut ship, mut helper) = setup();
        pilot.purchase(Skill::Timer, &mut ship, &mut helper).unwrap();
        assert_eq!(helper.interval(), 18.0);
        pilot.purchase(Skill::HpMax, &mut ship, &mut helper).unwrap();
        assert_eq!(ship.hp_max(), 110);
        assert_eq!(ship.hp(), 100);
    }
}
