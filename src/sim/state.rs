//! Game state and core simulation types
//!
//! Everything the frame loop mutates lives here, including the run RNG, so a
//! snapshot fully determines the rest of the run.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bullet::Bullet;
use super::enemy::{Enemy, EnemySpawn, create_enemy};
use super::pickup::{Booster, BoosterKind, Pickup, PickupKind};
use super::player::Player;
use super::weapon::{Weapon, WeaponKind};
use crate::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Player died
    GameOver,
}

/// Game events drained by the outer layer (audio, UI, wave logic)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    EnemySpawned { id: u32, kind: EnemySpawn },
    EnemyKilled { id: u32, kind: EnemySpawn, pos: Vec2 },
    PlayerHit { shield: i32, health: i32 },
    PlayerDodged,
    LevelUp { level: u32 },
    WeaponGranted { kind: WeaponKind },
    PickupCollected { kind: PickupKind },
    BoosterCollected { kind: BoosterKind },
    PlayerDied,
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Single RNG for the whole run
    pub rng: Pcg32,
    pub tuning: Tuning,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Simulated seconds
    pub elapsed: f32,
    pub phase: GamePhase,
    pub player: Player,
    /// Active enemies (spawn order)
    pub enemies: Vec<Enemy>,
    /// Projectiles from both sides
    pub bullets: Vec<Bullet>,
    pub pickups: Vec<Pickup>,
    pub boosters: Vec<Booster>,
    pub kills: u32,
    /// Events since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new game state with the given seed and default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let arena = tuning.arena_size();
        let mut player = Player::new(arena * 0.5, tuning.player.clone(), tuning.max_weapons);
        for slot in &tuning.starting_loadout {
            player.add_weapon(Weapon::new(slot.kind, slot.tier));
        }

        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            time_ticks: 0,
            elapsed: 0.0,
            phase: GamePhase::Playing,
            player,
            enemies: Vec::new(),
            bullets: Vec::new(),
            pickups: Vec::new(),
            boosters: Vec::new(),
            kills: 0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn arena_size(&self) -> Vec2 {
        self.tuning.arena_size()
    }

    /// Spawn an enemy; returns its id
    pub fn spawn_enemy(&mut self, kind: EnemySpawn, pos: Vec2) -> u32 {
        let id = self.next_entity_id();
        let enemy = create_enemy(id, kind, pos, &self.tuning, &mut self.rng);
        log::info!("Spawned {} #{id} at ({:.0}, {:.0})", enemy.name(), pos.x, pos.y);
        self.enemies.push(enemy);
        self.events.push(GameEvent::EnemySpawned { id, kind });
        id
    }

    /// Spawn a booster unless one of that kind is already on the map
    pub fn spawn_booster(&mut self, kind: BoosterKind, pos: Vec2) -> Option<u32> {
        if self.boosters.iter().any(|b| b.alive && b.kind == kind) {
            return None;
        }
        let id = self.next_entity_id();
        self.boosters
            .push(Booster::new(id, kind, pos, self.tuning.booster.lifetime));
        log::debug!("Spawned {} booster #{id}", kind.name());
        Some(id)
    }

    pub fn materials_on_map(&self) -> usize {
        self.pickups.iter().filter(|p| p.alive && p.is_material()).count()
    }

    /// Drop loot for a killed enemy: always an orb, sometimes a material
    pub fn drop_loot(&mut self, pos: Vec2, experience: u32) {
        let orb_id = self.next_entity_id();
        self.pickups
            .push(Pickup::new(orb_id, PickupKind::Experience(experience), pos));

        if self.rng.random::<f32>() < self.tuning.material_drop_chance {
            if self.materials_on_map() >= self.tuning.max_materials_on_map {
                return;
            }
            let id = self.next_entity_id();
            self.pickups.push(Pickup::new(id, PickupKind::Material(1), pos));
        }
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn living_enemies(&self) -> usize {
        self.enemies.iter().filter(|e| e.is_alive()).count()
    }
}
