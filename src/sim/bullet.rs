//! Projectiles fired by weapons and enemies
//!
//! A bullet lives until it has traveled `max_range` from where it was fired or
//! until the collision pass consumes it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::Rgba;

/// Default projectile radius
pub const BULLET_RADIUS: f32 = 4.0;
/// Downward pull applied to lobbed projectiles (pixels/s², +y is down on screen)
pub const LOB_GRAVITY: f32 = 420.0;

/// Projectile flavor; selects render color and motion model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulletKind {
    Pistol,
    Smg,
    Shotgun,
    Sniper,
    EnemyLob,
    BossBullet,
    MiniBoss1,
    MiniBoss2,
    MiniBoss3,
    MiniBoss4,
    MiniBoss5,
    FractalCenter,
    FractalLevel1,
    FractalLevel2,
    Centipede,
}

impl BulletKind {
    /// Default color for this projectile kind
    pub fn color(self) -> Rgba {
        match self {
            BulletKind::Pistol | BulletKind::Smg => Rgba::YELLOW,
            BulletKind::Shotgun => Rgba::rgb(255, 180, 60),
            BulletKind::Sniper => Rgba::rgb(180, 240, 255),
            BulletKind::EnemyLob => Rgba::rgb(120, 220, 90),
            BulletKind::BossBullet => Rgba::rgb(255, 140, 0),
            BulletKind::MiniBoss1 => Rgba::rgb(255, 80, 80),
            BulletKind::MiniBoss2 => Rgba::rgb(255, 160, 60),
            BulletKind::MiniBoss3 => Rgba::rgb(220, 220, 60),
            BulletKind::MiniBoss4 => Rgba::rgb(80, 200, 255),
            BulletKind::MiniBoss5 => Rgba::rgb(200, 90, 255),
            BulletKind::FractalCenter => Rgba::rgb(255, 100, 100),
            BulletKind::FractalLevel1 => Rgba::rgb(100, 255, 100),
            BulletKind::FractalLevel2 => Rgba::rgb(100, 100, 255),
            BulletKind::Centipede => Rgba::WHITE,
        }
    }

    /// Whether this kind follows a ballistic arc instead of a straight line
    pub fn is_lobbed(self) -> bool {
        matches!(self, BulletKind::EnemyLob)
    }
}

/// A projectile in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub start_pos: Vec2,
    /// Unit travel direction (initial direction for lobbed bullets)
    pub dir: Vec2,
    pub speed: f32,
    pub radius: f32,
    pub max_range: f32,
    pub damage: i32,
    pub alive: bool,
    pub kind: BulletKind,
    pub enemy_owned: bool,
    /// Ballistic velocity, only meaningful for lobbed kinds
    pub vel: Vec2,
    pub gravity: f32,
    /// Push applied to a non-boss enemy on hit
    #[serde(default)]
    pub knockback: f32,
    pub color: Rgba,
}

impl Bullet {
    /// Create a straight-flying bullet. `dir` is normalized here.
    pub fn new(
        pos: Vec2,
        dir: Vec2,
        damage: i32,
        max_range: f32,
        speed: f32,
        kind: BulletKind,
        enemy_owned: bool,
    ) -> Self {
        let dir = dir.normalize_or_zero();
        Self {
            pos,
            start_pos: pos,
            dir,
            speed,
            radius: BULLET_RADIUS,
            max_range,
            damage,
            alive: true,
            kind,
            enemy_owned,
            vel: dir * speed,
            gravity: if kind.is_lobbed() { LOB_GRAVITY } else { 0.0 },
            knockback: 0.0,
            color: kind.color(),
        }
    }

    /// Create a lobbed enemy projectile with an explicit launch velocity
    pub fn lobbed(pos: Vec2, launch_vel: Vec2, damage: i32, max_range: f32) -> Self {
        let mut bullet = Self::new(
            pos,
            launch_vel,
            damage,
            max_range,
            launch_vel.length(),
            BulletKind::EnemyLob,
            true,
        );
        bullet.vel = launch_vel;
        bullet
    }

    pub fn with_color(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }

    pub fn with_knockback(mut self, knockback: f32) -> Self {
        self.knockback = knockback;
        self
    }

    /// Distance from the firing point
    #[inline]
    pub fn traveled(&self) -> f32 {
        self.pos.distance(self.start_pos)
    }

    /// Advance the bullet; expires it once it reaches `max_range`
    pub fn update(&mut self, dt: f32) {
        if !self.alive {
            return;
        }

        if self.kind.is_lobbed() {
            self.vel.y += self.gravity * dt;
            self.pos += self.vel * dt;
        } else {
            self.pos += self.dir * self.speed * dt;
        }

        let offset = self.pos - self.start_pos;
        let traveled = offset.length();
        if traveled >= self.max_range {
            // Pin to the range boundary so the range bound holds after expiry too
            self.pos = self.start_pos + offset.normalize_or_zero() * self.max_range;
            self.alive = false;
        }
    }

    /// Mark consumed by a collision
    pub fn destroy(&mut self) {
        self.alive = false;
    }
}
