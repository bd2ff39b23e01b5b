//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (cosmetic effects on a separate stream)
//! - Stable iteration order (pool order)
//! - No rendering, audio or file I/O

pub mod asteroid;
pub mod collision;
pub mod effects;
pub mod helper;
pub mod interaction;
pub mod pickup;
pub mod pilot;
pub mod pool;
pub mod projectile;
pub mod rng;
pub mod ship;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod weapon;

pub use asteroid::{Asteroid, AsteroidSpawn};
pub use collision::HitCircle;
pub use effects::{Effects, FloatingText, Particle, TrailEmitter};
pub use interaction::{Arena, Hit, Interactions, damage_for_roll};
pub use pickup::{Pickup, PickupKind};
pub use pilot::{Pilot, PilotTuning, ShopError, Skill};
pub use pool::{Pool, Poolable};
pub use projectile::{Owner, Projectile, ProjectileLaunch, ProjectileSpawner};
pub use rng::SimRng;
pub use ship::{Behavior, Ship, ShipDescriptor};
pub use snapshot::{Hud, ParticleInstance, RenderSnapshot, SpriteInstance, SpriteKind, TextInstance};
pub use state::{Banner, GameState, Outcome, Phase, RunSummary};
pub use tick::{Host, TickInput, autopilot_input, tick};
pub use weapon::{Weapon, WeaponKind, WeaponSpec};
