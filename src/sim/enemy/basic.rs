//! Basic chasers: the wave fodder

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::EnemyBody;
use crate::sim::bullet::Bullet;

/// Slime lob cadence (seconds)
pub const SLIME_LOB_COOLDOWN: f32 = 3.0;
const SLIME_LOB_DAMAGE: i32 = 6;
const SLIME_LOB_RANGE: f32 = 420.0;
const SLIME_LOB_SPEED: f32 = 220.0;
/// Upward kick added to a lob so it arcs (screen space, -y is up)
const SLIME_LOB_LIFT: f32 = 160.0;

const HIT_DURATION: f32 = 0.2;
const FRAME_INTERVAL: f32 = 0.5;

/// Basic enemy flavors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BasicKind {
    /// Plain chaser
    Base,
    /// Slow, tanky, lobs goo at the player
    Slime,
    /// Small and fast
    Pebblin,
}

impl BasicKind {
    /// (health, speed, radius, contact damage)
    fn stats(self) -> (i32, f32, f32, i32) {
        match self {
            BasicKind::Base => (30, 80.0, 30.0, 5),
            BasicKind::Slime => (45, 60.0, 28.0, 6),
            BasicKind::Pebblin => (20, 110.0, 22.0, 4),
        }
    }

    pub fn experience(self) -> u32 {
        match self {
            BasicKind::Base => 1,
            BasicKind::Slime => 2,
            BasicKind::Pebblin => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BasicKind::Base => "base",
            BasicKind::Slime => "slime",
            BasicKind::Pebblin => "pebblin",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasicEnemy {
    pub body: EnemyBody,
    pub kind: BasicKind,
    max_health: i32,
    /// Time since the last lob (slimes only)
    pub since_shot: f32,
}

impl BasicEnemy {
    pub fn new(id: u32, pos: Vec2, kind: BasicKind) -> Self {
        let (health, speed, radius, damage) = kind.stats();
        Self {
            body: EnemyBody::new(id, pos, radius, health, speed, damage),
            kind,
            max_health: health,
            since_shot: 0.0,
        }
    }

    pub fn max_health(&self) -> i32 {
        self.max_health
    }

    pub fn update(&mut self, dt: f32, player_pos: Vec2, bullets: &mut Vec<Bullet>) {
        self.body.chase(player_pos, dt);

        if self.kind == BasicKind::Slime {
            self.since_shot += dt;
            if self.since_shot >= SLIME_LOB_COOLDOWN {
                self.since_shot = 0.0;
                if let Some(dir) = self.body.aim_at(player_pos, 1.0) {
                    let launch = dir * SLIME_LOB_SPEED + Vec2::new(0.0, -SLIME_LOB_LIFT);
                    bullets.push(Bullet::lobbed(self.body.pos, launch, SLIME_LOB_DAMAGE, SLIME_LOB_RANGE));
                }
            }
        }

        self.body.animate(dt, HIT_DURATION, FRAME_INTERVAL);
    }
}
