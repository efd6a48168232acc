//! Data-driven game balance
//!
//! Loaded from JSON; any field left out keeps its default.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH};
use crate::sim::enemy::fractal::{DEFAULT_BASE_SIZE, DEFAULT_DEPTH, DEFAULT_ROTATION_SPEED};
use crate::sim::player::PlayerStats;
use crate::sim::weapon::{WeaponKind, WeaponTier};

#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One entry of the starting loadout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponSlot {
    pub kind: WeaponKind,
    pub tier: WeaponTier,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoosterTuning {
    /// Seconds before an uncollected booster despawns
    pub lifetime: f32,
    pub fire_rate_multiplier: f32,
    pub fire_rate_duration: f32,
    pub heal_amount: i32,
}

impl Default for BoosterTuning {
    fn default() -> Self {
        Self {
            lifetime: 5.0,
            fire_rate_multiplier: 1.5,
            fire_rate_duration: 5.0,
            heal_amount: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FractalTuning {
    pub depth: u32,
    pub base_size: f32,
    /// Radians per second
    pub rotation_speed: f32,
}

impl Default for FractalTuning {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            base_size: DEFAULT_BASE_SIZE,
            rotation_speed: DEFAULT_ROTATION_SPEED,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub arena_width: f32,
    pub arena_height: f32,
    pub player: PlayerStats,
    pub starting_loadout: Vec<WeaponSlot>,
    pub max_weapons: usize,
    pub max_materials_on_map: usize,
    /// Chance in [0, 1] that a kill also drops a material
    pub material_drop_chance: f32,
    pub booster: BoosterTuning,
    pub fractal: FractalTuning,
    /// Minimum seconds between two contact hits on the player
    pub contact_damage_interval: f32,
    /// Seconds before an orbiting weapon may strike the same enemy again
    pub orbit_rehit_interval: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            player: PlayerStats::default(),
            starting_loadout: vec![
                WeaponSlot {
                    kind: WeaponKind::MeleeStick,
                    tier: WeaponTier::One,
                },
                WeaponSlot {
                    kind: WeaponKind::Pistol,
                    tier: WeaponTier::One,
                },
                WeaponSlot {
                    kind: WeaponKind::OrbitingBrick,
                    tier: WeaponTier::One,
                },
            ],
            max_weapons: 6,
            max_materials_on_map: 50,
            material_drop_chance: 0.5,
            booster: BoosterTuning::default(),
            fractal: FractalTuning::default(),
            contact_damage_interval: 0.5,
            orbit_rehit_interval: 0.5,
        }
    }
}

impl Tuning {
    pub fn from_json_str(json: &str) -> Result<Self, TuningError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json_str(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Load from `path`, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::warn!("Using default tuning ({}): {e}", path.as_ref().display());
                Self::default()
            }
        }
    }

    pub fn arena_size(&self) -> glam::Vec2 {
        glam::Vec2::new(self.arena_width, self.arena_height)
    }
}
