//! Enemy variants behind a single closed sum type
//!
//! Every variant shares an [`EnemyBody`] (position, health, hit/animation
//! state). [`Enemy`] dispatches the common capabilities: update, take_damage,
//! max_health, is_boss_unit, is_leader. Adding a variant means extending the
//! enum and every match below.

pub mod basic;
pub mod boss;
pub mod centipede;
pub mod fractal;
pub mod mini_boss;

pub use basic::{BasicEnemy, BasicKind};
pub use boss::BossEnemy;
pub use centipede::{CentipedeEnemy, CentipedeSegment};
pub use fractal::{FractalBoss, FractalNode};
pub use mini_boss::{MiniBossEnemy, MiniBossVariant};

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::bullet::Bullet;
use crate::consts::MIN_DIRECTION_LENGTH;

/// Visual hit state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HitState {
    #[default]
    Idle,
    Hit,
}

/// State shared by every enemy variant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyBody {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub health: i32,
    pub speed: f32,
    /// Contact damage dealt to the player on touch
    pub damage: i32,
    pub alive: bool,
    pub state: HitState,
    pub hit_timer: f32,
    pub anim_timer: f32,
    /// Two-frame idle animation (0 or 1)
    pub frame: u8,
    pub facing_right: bool,
}

impl EnemyBody {
    pub fn new(id: u32, pos: Vec2, radius: f32, health: i32, speed: f32, damage: i32) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            radius,
            health,
            speed,
            damage,
            alive: true,
            state: HitState::Idle,
            hit_timer: 0.0,
            anim_timer: 0.0,
            frame: 0,
            facing_right: false,
        }
    }

    /// Walk straight toward `target` at the current speed
    pub fn chase(&mut self, target: Vec2, dt: f32) {
        let dir = (target - self.pos).normalize_or_zero();
        self.vel = dir * self.speed;
        self.pos += self.vel * dt;
        self.facing_right = target.x > self.pos.x;
    }

    /// Enter the hit flash
    pub fn mark_hit(&mut self) {
        self.state = HitState::Hit;
        self.hit_timer = 0.0;
    }

    /// Advance hit flash and idle frame toggling
    pub fn animate(&mut self, dt: f32, hit_duration: f32, frame_interval: f32) {
        self.anim_timer += dt;
        if self.state == HitState::Hit {
            self.hit_timer += dt;
            if self.hit_timer > hit_duration {
                self.state = HitState::Idle;
                self.hit_timer = 0.0;
            }
        }
        if self.state == HitState::Idle && self.anim_timer > frame_interval {
            self.frame = 1 - self.frame;
            self.anim_timer = 0.0;
        }
    }

    /// Subtract health; kills at zero. Returns true if this call killed it.
    pub fn apply_damage(&mut self, damage: i32) -> bool {
        if !self.alive {
            return false;
        }
        self.health -= damage;
        self.mark_hit();
        if self.health <= 0 {
            self.health = 0;
            self.alive = false;
            return true;
        }
        false
    }

    /// Unit vector toward `target`, or None when too close to aim
    pub fn aim_at(&self, target: Vec2, min_distance: f32) -> Option<Vec2> {
        let to_target = target - self.pos;
        if to_target.length() < min_distance.max(MIN_DIRECTION_LENGTH) {
            None
        } else {
            Some(to_target.normalize_or_zero())
        }
    }
}

/// What a spawn request asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemySpawn {
    Basic(BasicKind),
    Centipede,
    Boss,
    MiniBoss { variant: MiniBossVariant, leader: bool },
    Fractal,
}

/// Closed set of enemy variants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Enemy {
    Basic(BasicEnemy),
    Centipede(CentipedeEnemy),
    Boss(BossEnemy),
    MiniBoss(MiniBossEnemy),
    Fractal(FractalBoss),
}

impl Enemy {
    pub fn body(&self) -> &EnemyBody {
        match self {
            Enemy::Basic(e) => &e.body,
            Enemy::Centipede(e) => &e.body,
            Enemy::Boss(e) => &e.body,
            Enemy::MiniBoss(e) => &e.body,
            Enemy::Fractal(e) => &e.body,
        }
    }

    pub fn body_mut(&mut self) -> &mut EnemyBody {
        match self {
            Enemy::Basic(e) => &mut e.body,
            Enemy::Centipede(e) => &mut e.body,
            Enemy::Boss(e) => &mut e.body,
            Enemy::MiniBoss(e) => &mut e.body,
            Enemy::Fractal(e) => &mut e.body,
        }
    }

    #[inline]
    pub fn id(&self) -> u32 {
        self.body().id
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.body().pos
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.body().alive
    }

    #[inline]
    pub fn health(&self) -> i32 {
        self.body().health
    }

    /// Spawn request that would recreate this variant
    pub fn spawn_kind(&self) -> EnemySpawn {
        match self {
            Enemy::Basic(e) => EnemySpawn::Basic(e.kind),
            Enemy::Centipede(_) => EnemySpawn::Centipede,
            Enemy::Boss(_) => EnemySpawn::Boss,
            Enemy::MiniBoss(e) => EnemySpawn::MiniBoss {
                variant: e.variant,
                leader: e.leader,
            },
            Enemy::Fractal(_) => EnemySpawn::Fractal,
        }
    }

    /// Advance one frame; may append projectiles
    pub fn update(&mut self, dt: f32, player_pos: Vec2, bullets: &mut Vec<Bullet>, rng: &mut impl Rng) {
        if !self.is_alive() {
            return;
        }
        match self {
            Enemy::Basic(e) => e.update(dt, player_pos, bullets),
            Enemy::Centipede(e) => e.update(dt, player_pos, bullets, rng),
            Enemy::Boss(e) => e.update(dt, player_pos, bullets),
            Enemy::MiniBoss(e) => e.update(dt, player_pos, bullets),
            Enemy::Fractal(e) => e.update(dt, player_pos, bullets),
        }
    }

    /// Apply damage. Returns true if this hit killed the enemy.
    pub fn take_damage(&mut self, damage: i32, rng: &mut impl Rng) -> bool {
        if !self.is_alive() {
            return false;
        }
        match self {
            Enemy::Basic(e) => e.body.apply_damage(damage),
            Enemy::Centipede(e) => e.take_damage(damage),
            Enemy::Boss(e) => e.body.apply_damage(damage),
            Enemy::MiniBoss(e) => e.body.apply_damage(damage),
            Enemy::Fractal(e) => e.take_damage(damage, rng),
        }
    }

    pub fn max_health(&self) -> i32 {
        match self {
            Enemy::Basic(e) => e.max_health(),
            Enemy::Centipede(e) => e.max_health(),
            Enemy::Boss(e) => e.max_health(),
            Enemy::MiniBoss(e) => e.max_health(),
            Enemy::Fractal(e) => e.max_health(),
        }
    }

    pub fn is_boss_unit(&self) -> bool {
        !matches!(self, Enemy::Basic(_) | Enemy::Centipede(_))
    }

    pub fn is_leader(&self) -> bool {
        match self {
            Enemy::MiniBoss(e) => e.leader,
            _ => false,
        }
    }

    /// Contact damage dealt to the player on touch
    pub fn contact_damage(&self) -> i32 {
        self.body().damage
    }

    /// Whether a circle at `point` with `radius` touches this enemy's hit shape
    pub fn overlaps(&self, point: Vec2, radius: f32) -> bool {
        if !self.is_alive() {
            return false;
        }
        match self {
            Enemy::Centipede(e) => e.overlaps(point, radius),
            Enemy::Fractal(e) => e.overlaps(point, radius),
            _ => {
                let body = self.body();
                point.distance(body.pos) <= body.radius + radius
            }
        }
    }

    /// Push the enemy away; boss units and centipedes do not budge
    pub fn knock_back(&mut self, dir: Vec2, amount: f32) {
        if amount <= 0.0 {
            return;
        }
        match self {
            Enemy::Basic(e) => e.body.pos += dir.normalize_or_zero() * amount,
            Enemy::MiniBoss(e) if !e.leader => e.body.pos += dir.normalize_or_zero() * amount,
            _ => {}
        }
    }

    /// Experience dropped on death
    pub fn experience_value(&self) -> u32 {
        match self {
            Enemy::Basic(e) => e.kind.experience(),
            Enemy::Centipede(_) => 20,
            Enemy::Boss(_) => 50,
            Enemy::MiniBoss(e) if e.leader => 30,
            Enemy::MiniBoss(_) => 15,
            Enemy::Fractal(_) => 80,
        }
    }

    /// Short label for logs
    pub fn name(&self) -> &'static str {
        match self {
            Enemy::Basic(e) => e.kind.name(),
            Enemy::Centipede(_) => "centipede",
            Enemy::Boss(_) => "boss",
            Enemy::MiniBoss(_) => "mini-boss",
            Enemy::Fractal(_) => "fractal boss",
        }
    }
}

/// Build an enemy for a spawn request
pub fn create_enemy(id: u32, spawn: EnemySpawn, pos: Vec2, tuning: &crate::Tuning, rng: &mut impl Rng) -> Enemy {
    match spawn {
        EnemySpawn::Basic(kind) => Enemy::Basic(BasicEnemy::new(id, pos, kind)),
        EnemySpawn::Centipede => Enemy::Centipede(CentipedeEnemy::new(id, pos, rng)),
        EnemySpawn::Boss => Enemy::Boss(BossEnemy::new(id, pos)),
        EnemySpawn::MiniBoss { variant, leader } => {
            Enemy::MiniBoss(MiniBossEnemy::new(id, pos, variant, leader))
        }
        EnemySpawn::Fractal => Enemy::Fractal(FractalBoss::with_params(
            id,
            pos,
            tuning.fractal.depth,
            tuning.fractal.base_size,
            tuning.fractal.rotation_speed,
            rng,
        )),
    }
}
