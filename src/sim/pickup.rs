//! Field pickups: experience orbs, materials, and timed boosters

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub const PICKUP_RADIUS: f32 = 8.0;
/// Speed at which pickups inside the pickup range fly to the player
pub const ATTRACT_SPEED: f32 = 350.0;
pub const BOOSTER_RADIUS: f32 = 16.0;

/// What a dropped pickup carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    Experience(u32),
    Material(u32),
}

/// A drop lying on the field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub id: u32,
    pub kind: PickupKind,
    pub pos: Vec2,
    pub radius: f32,
    pub alive: bool,
}

impl Pickup {
    pub fn new(id: u32, kind: PickupKind, pos: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            radius: PICKUP_RADIUS,
            alive: true,
        }
    }

    #[inline]
    pub fn is_material(&self) -> bool {
        matches!(self.kind, PickupKind::Material(_))
    }

    /// Drift toward the player once inside `pickup_range`
    pub fn update(&mut self, dt: f32, player_pos: Vec2, pickup_range: f32) {
        let to_player = player_pos - self.pos;
        let distance = to_player.length();
        if distance <= pickup_range && distance > 0.0 {
            let step = (ATTRACT_SPEED * dt).min(distance);
            self.pos += to_player / distance * step;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoosterKind {
    /// Temporary fire-rate boost
    SpeedUp,
    Healing,
}

impl BoosterKind {
    pub fn name(self) -> &'static str {
        match self {
            BoosterKind::SpeedUp => "speed-up",
            BoosterKind::Healing => "healing",
        }
    }
}

/// A booster that despawns on its own if not collected in time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booster {
    pub id: u32,
    pub kind: BoosterKind,
    pub pos: Vec2,
    pub radius: f32,
    pub lifetime: f32,
    pub max_lifetime: f32,
    pub alive: bool,
}

impl Booster {
    pub fn new(id: u32, kind: BoosterKind, pos: Vec2, max_lifetime: f32) -> Self {
        Self {
            id,
            kind,
            pos,
            radius: BOOSTER_RADIUS,
            lifetime: 0.0,
            max_lifetime,
            alive: true,
        }
    }

    pub fn update(&mut self, dt: f32) {
        if !self.alive {
            return;
        }
        self.lifetime += dt;
        if self.lifetime >= self.max_lifetime {
            self.alive = false;
        }
    }

    /// Remaining lifetime as a fraction of the total (1.0 when fresh)
    pub fn remaining_fraction(&self) -> f32 {
        if self.max_lifetime <= 0.0 {
            return 0.0;
        }
        ((self.max_lifetime - self.lifetime) / self.max_lifetime).clamp(0.0, 1.0)
    }
}
