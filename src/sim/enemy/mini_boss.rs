//! Mini-bosses: pack members with one of five fixed firing presets

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::EnemyBody;
use crate::sim::bullet::{Bullet, BulletKind};

const BULLET_RANGE: f32 = 650.0;
const HIT_DURATION: f32 = 0.2;
const FRAME_INTERVAL: f32 = 0.7;

/// The five mini-boss presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MiniBossVariant {
    One,
    Two,
    Three,
    Four,
    Five,
}

/// Firing preset selected by a variant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariantTuning {
    pub fire_cooldown: f32,
    pub bullet_speed: f32,
    pub bullet_damage: i32,
    pub bullet_kind: BulletKind,
}

impl MiniBossVariant {
    pub const ALL: [MiniBossVariant; 5] = [
        MiniBossVariant::One,
        MiniBossVariant::Two,
        MiniBossVariant::Three,
        MiniBossVariant::Four,
        MiniBossVariant::Five,
    ];

    /// Variant from its 1-based index; out-of-range indices yield None
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            1..=5 => Some(Self::ALL[(index - 1) as usize]),
            _ => None,
        }
    }

    pub fn index(self) -> u8 {
        match self {
            MiniBossVariant::One => 1,
            MiniBossVariant::Two => 2,
            MiniBossVariant::Three => 3,
            MiniBossVariant::Four => 4,
            MiniBossVariant::Five => 5,
        }
    }

    pub fn tuning(self) -> VariantTuning {
        let (fire_cooldown, bullet_speed, bullet_damage, bullet_kind) = match self {
            MiniBossVariant::One => (2.1, 420.0, 7, BulletKind::MiniBoss1),
            MiniBossVariant::Two => (2.0, 480.0, 7, BulletKind::MiniBoss2),
            MiniBossVariant::Three => (1.9, 540.0, 8, BulletKind::MiniBoss3),
            MiniBossVariant::Four => (1.8, 600.0, 8, BulletKind::MiniBoss4),
            MiniBossVariant::Five => (1.7, 660.0, 9, BulletKind::MiniBoss5),
        };
        VariantTuning {
            fire_cooldown,
            bullet_speed,
            bullet_damage,
            bullet_kind,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MiniBossEnemy {
    pub body: EnemyBody,
    pub variant: MiniBossVariant,
    pub leader: bool,
    max_health: i32,
    pub since_shot: f32,
}

impl MiniBossEnemy {
    pub fn new(id: u32, pos: Vec2, variant: MiniBossVariant, leader: bool) -> Self {
        // (health, radius, speed)
        let (health, radius, speed) = if leader { (1500, 38.0, 95.0) } else { (900, 30.0, 110.0) };
        Self {
            body: EnemyBody::new(id, pos, radius, health, speed, 10),
            variant,
            leader,
            max_health: health,
            since_shot: 0.0,
        }
    }

    pub fn max_health(&self) -> i32 {
        self.max_health
    }

    pub fn update(&mut self, dt: f32, player_pos: Vec2, bullets: &mut Vec<Bullet>) {
        self.body.chase(player_pos, dt);

        let tuning = self.variant.tuning();
        self.since_shot += dt;
        if self.since_shot >= tuning.fire_cooldown {
            self.since_shot = 0.0;
            if let Some(dir) = self.body.aim_at(player_pos, 1.0) {
                bullets.push(Bullet::new(
                    self.body.pos,
                    dir,
                    tuning.bullet_damage,
                    BULLET_RANGE,
                    tuning.bullet_speed,
                    tuning.bullet_kind,
                    true,
                ));
            }
        }

        self.body.animate(dt, HIT_DURATION, FRAME_INTERVAL);
    }
}
