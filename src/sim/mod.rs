//! Simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Delta-time driven, single-threaded
//! - One seeded RNG per run, threaded through by reference
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod bullet;
pub mod collision;
pub mod enemy;
pub mod pickup;
pub mod player;
pub mod state;
pub mod tick;
pub mod weapon;

pub use bullet::{Bullet, BulletKind};
pub use enemy::{
    BasicEnemy, BasicKind, BossEnemy, CentipedeEnemy, CentipedeSegment, Enemy, EnemyBody, EnemySpawn, FractalBoss,
    FractalNode, HitState, MiniBossEnemy, MiniBossVariant,
};
pub use pickup::{Booster, BoosterKind, Pickup, PickupKind};
pub use player::{DamageOutcome, LevelUp, Player, PlayerStats};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};
pub use weapon::{FireContext, Weapon, WeaponKind, WeaponStats, WeaponTier};
