//! Player: movement, two-layer damage absorption, leveling, and the weapon ring

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::bullet::Bullet;
use super::weapon::{FireContext, Weapon, WeaponKind, WeaponTier};
use crate::consts::{MIN_AIM_DISTANCE, PLAYER_RADIUS, REGEN_INTERVAL, WEAPON_RING_RADIUS};
use crate::polar_to_cartesian;

/// Base stats, upgraded over a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerStats {
    pub max_health: i32,
    pub max_shield: i32,
    /// Flat reduction per hit
    pub armor: i32,
    /// Fraction in [0, 1]
    pub dodge_chance: f32,
    pub move_speed: f32,
    /// Multiplier on weapon fire rate
    pub attack_speed: f32,
    /// Added to ranged weapon damage (scaled per weapon)
    pub damage: f32,
    /// Added to melee weapon damage (scaled per weapon)
    pub melee_damage: f32,
    /// HP per second
    pub health_regen: f32,
    pub pickup_range: f32,
    pub materials: u32,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            max_health: 100,
            max_shield: 100,
            armor: 0,
            dodge_chance: 0.0,
            move_speed: 300.0,
            attack_speed: 1.0,
            damage: 0.0,
            melee_damage: 0.0,
            health_regen: 0.0,
            pickup_range: 100.0,
            materials: 0,
        }
    }
}

/// Result of one incoming hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    Dodged,
    Taken { shield: i32, health: i32 },
}

/// A level gained, with the weapon it granted (if any)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelUp {
    pub level: u32,
    pub granted: Option<WeaponKind>,
}

/// Weapon handed out automatically on reaching a level
pub fn level_grant(level: u32) -> Option<WeaponKind> {
    match level {
        2 => Some(WeaponKind::MeleeStick),
        3 => Some(WeaponKind::Smg),
        4 => Some(WeaponKind::Shotgun),
        5 => Some(WeaponKind::Sniper),
        _ => None,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Unit aim direction
    pub aim_dir: Vec2,
    pub health: i32,
    pub shield: i32,
    pub stats: PlayerStats,
    /// Cumulative experience
    pub experience: u32,
    pub level: u32,
    pub weapons: Vec<Weapon>,
    pub max_weapons: usize,
    pub fire_rate_multiplier: f32,
    pub fire_rate_boost_remaining: f32,
    pub regen_timer: f32,
    pub regen_accumulator: f32,
    /// Time until enemy contact can hurt again
    pub contact_cooldown: f32,
}

impl Player {
    pub fn new(pos: Vec2, stats: PlayerStats, max_weapons: usize) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius: PLAYER_RADIUS,
            aim_dir: Vec2::X,
            health: stats.max_health,
            shield: stats.max_shield,
            stats,
            experience: 0,
            level: 1,
            weapons: Vec::new(),
            max_weapons,
            fire_rate_multiplier: 1.0,
            fire_rate_boost_remaining: 0.0,
            regen_timer: 0.0,
            regen_accumulator: 0.0,
            contact_cooldown: 0.0,
        }
    }

    /// Set velocity from a movement intent; any non-zero intent moves at full speed
    pub fn set_move_intent(&mut self, intent: Vec2) {
        self.vel = intent.normalize_or_zero() * self.stats.move_speed;
    }

    /// Point the aim at `target` unless it sits on the player
    pub fn update_aim(&mut self, target: Vec2) {
        let to_target = target - self.pos;
        if to_target.length() > MIN_AIM_DISTANCE {
            self.aim_dir = to_target.normalize_or_zero();
        }
    }

    /// Move, clamp to the arena, and advance boost, regen and contact timers
    pub fn update(&mut self, dt: f32, arena: Vec2) {
        self.pos += self.vel * dt;
        self.pos = self.pos.clamp(
            Vec2::splat(self.radius),
            (arena - Vec2::splat(self.radius)).max(Vec2::splat(self.radius)),
        );

        if self.fire_rate_boost_remaining > 0.0 {
            self.fire_rate_boost_remaining -= dt;
            if self.fire_rate_boost_remaining <= 0.0 {
                self.fire_rate_boost_remaining = 0.0;
                self.fire_rate_multiplier = 1.0;
            }
        }

        if self.stats.health_regen > 0.0 {
            self.regen_timer += dt;
            if self.regen_timer >= REGEN_INTERVAL {
                self.regen_timer = 0.0;
                self.regen_accumulator += self.stats.health_regen;
                let whole = self.regen_accumulator.floor();
                if whole >= 1.0 {
                    self.heal(whole as i32);
                    self.regen_accumulator -= whole;
                }
            }
        }

        self.contact_cooldown = (self.contact_cooldown - dt).max(0.0);
    }

    pub fn fire_context(&self) -> FireContext {
        FireContext {
            attack_speed: self.stats.attack_speed,
            fire_rate_multiplier: self.fire_rate_multiplier,
            damage: self.stats.damage,
            melee_damage: self.stats.melee_damage,
        }
    }

    /// Mount position of weapon `index`: ring slot, or orbit position for orbiters
    pub fn weapon_position(&self, index: usize) -> Vec2 {
        match self.weapons.get(index) {
            Some(weapon) if weapon.is_orbiting() => weapon.orbit_position(self.pos),
            Some(_) => {
                let angle = std::f32::consts::TAU * index as f32 / self.weapons.len() as f32;
                self.pos + polar_to_cartesian(WEAPON_RING_RADIUS, angle)
            }
            None => self.pos,
        }
    }

    /// Advance every weapon; fired projectiles are appended to `bullets`
    pub fn update_weapons(&mut self, dt: f32, bullets: &mut Vec<Bullet>, rng: &mut impl Rng) {
        let ctx = self.fire_context();
        let aim = self.aim_dir;
        for i in 0..self.weapons.len() {
            let pos = self.weapon_position(i);
            self.weapons[i].update(dt, pos, aim, bullets, &ctx, rng);
        }
    }

    /// Add a weapon if a slot is free; excess is silently dropped
    pub fn add_weapon(&mut self, weapon: Weapon) -> bool {
        if self.weapons.len() >= self.max_weapons {
            log::debug!("Weapon slots full, dropping {}", weapon.kind.name());
            return false;
        }
        self.weapons.push(weapon);
        true
    }

    /// Armor, then dodge, then shield, then health
    pub fn take_damage(&mut self, raw: i32, rng: &mut impl Rng) -> DamageOutcome {
        let mut remaining = (raw - self.stats.armor).max(1);

        if self.stats.dodge_chance > 0.0 && rng.random::<f32>() < self.stats.dodge_chance {
            return DamageOutcome::Dodged;
        }

        let mut to_shield = 0;
        if self.shield > 0 {
            to_shield = remaining.min(self.shield);
            self.shield -= to_shield;
            remaining -= to_shield;
        }

        let to_health = remaining.min(self.health);
        self.health = (self.health - remaining).max(0);

        DamageOutcome::Taken {
            shield: to_shield,
            health: to_health,
        }
    }

    pub fn heal(&mut self, amount: i32) {
        self.health = (self.health + amount).min(self.stats.max_health);
    }

    pub fn restore_shield(&mut self, amount: i32) {
        self.shield = (self.shield + amount).min(self.stats.max_shield);
    }

    /// Damage that bypasses armor, dodge and health
    pub fn take_shield_damage(&mut self, amount: i32) {
        self.shield = (self.shield - amount).max(0);
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    /// Total experience needed to leave the current level
    pub fn experience_to_next_level(&self) -> u32 {
        let n = self.level + 4;
        n * n
    }

    /// Add experience, applying every level crossed
    pub fn gain_experience(&mut self, amount: u32) -> Vec<LevelUp> {
        self.experience += amount;
        let mut gained = Vec::new();
        while self.experience >= self.experience_to_next_level() {
            gained.push(self.level_up());
        }
        gained
    }

    fn level_up(&mut self) -> LevelUp {
        self.level += 1;
        self.stats.max_health += 1;
        log::info!("Level up! Now level {}", self.level);

        let granted = level_grant(self.level)
            .filter(|&kind| self.add_weapon(Weapon::new(kind, WeaponTier::One)));
        if let Some(kind) = granted {
            log::info!("Got {}!", kind.name());
        }
        LevelUp {
            level: self.level,
            granted,
        }
    }

    /// Take the stronger of the current and new multiplier; restart the timer
    pub fn apply_fire_rate_boost(&mut self, multiplier: f32, duration: f32) {
        self.fire_rate_multiplier = self.fire_rate_multiplier.max(multiplier);
        self.fire_rate_boost_remaining = duration;
    }
}
