//! Boss: a tank that alternates a slow walk with a sprint

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::EnemyBody;
use crate::sim::bullet::{Bullet, BulletKind};

/// Seconds spent walking before sprinting
pub const NORMAL_PHASE_DURATION: f32 = 4.0;
/// Seconds spent sprinting before walking again
pub const SPRINT_PHASE_DURATION: f32 = 2.0;
pub const NORMAL_SPEED: f32 = 68.0;
pub const SPRINT_SPEED: f32 = 160.0;

const MAX_HEALTH: i32 = 1000;
const RADIUS: f32 = 60.0;
const CONTACT_DAMAGE: i32 = 15;
const FIRE_COOLDOWN: f32 = 1.5;
const BULLET_DAMAGE: i32 = 12;
const BULLET_RANGE: f32 = 700.0;
const BULLET_SPEED: f32 = 600.0;
const HIT_DURATION: f32 = 0.3;
const FRAME_INTERVAL: f32 = 1.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossEnemy {
    pub body: EnemyBody,
    pub since_shot: f32,
    /// Time spent in the current movement phase
    pub phase_timer: f32,
    pub sprinting: bool,
}

impl BossEnemy {
    pub fn new(id: u32, pos: Vec2) -> Self {
        Self {
            body: EnemyBody::new(id, pos, RADIUS, MAX_HEALTH, NORMAL_SPEED, CONTACT_DAMAGE),
            since_shot: 0.0,
            phase_timer: 0.0,
            sprinting: false,
        }
    }

    pub fn max_health(&self) -> i32 {
        MAX_HEALTH
    }

    pub fn update(&mut self, dt: f32, player_pos: Vec2, bullets: &mut Vec<Bullet>) {
        self.advance_phase(dt);
        self.body.chase(player_pos, dt);
        self.try_fire(dt, player_pos, bullets);
        self.body.animate(dt, HIT_DURATION, FRAME_INTERVAL);
    }

    fn advance_phase(&mut self, dt: f32) {
        self.phase_timer += dt;
        if !self.sprinting && self.phase_timer >= NORMAL_PHASE_DURATION {
            self.sprinting = true;
            self.body.speed = SPRINT_SPEED;
            self.phase_timer = 0.0;
        } else if self.sprinting && self.phase_timer >= SPRINT_PHASE_DURATION {
            self.sprinting = false;
            self.body.speed = NORMAL_SPEED;
            self.phase_timer = 0.0;
        }
    }

    fn try_fire(&mut self, dt: f32, player_pos: Vec2, bullets: &mut Vec<Bullet>) {
        self.since_shot += dt;
        if self.since_shot < FIRE_COOLDOWN {
            return;
        }
        self.since_shot = 0.0;

        if let Some(dir) = self.body.aim_at(player_pos, 1.0) {
            bullets.push(Bullet::new(
                self.body.pos,
                dir,
                BULLET_DAMAGE,
                BULLET_RANGE,
                BULLET_SPEED,
                BulletKind::BossBullet,
                true,
            ));
        }
    }
}
