//! Weapons: per-(type, tier) stat tables and firing patterns
//!
//! Stats are fixed at construction. Player stats only enter at fire time,
//! through a [`FireContext`] snapshot.

use std::f32::consts::FRAC_PI_2;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::bullet::{Bullet, BulletKind};
use crate::consts::{MIN_DIRECTION_LENGTH, MIN_FIRE_RATE_DIVISOR};
use crate::{angle_of, direction_from_angle, polar_to_cartesian, wrap_angle};

/// Seconds a melee swing lasts
pub const MELEE_ATTACK_DURATION: f32 = 0.3;
/// Fraction of the swing spent extending
pub const MELEE_EXTEND_FRACTION: f32 = 0.6;
pub const MUZZLE_FLASH_DURATION: f32 = 0.1;

pub const SHOTGUN_PELLETS: usize = 5;
/// ±15° in radians
pub const SHOTGUN_SPREAD: f32 = 0.2617;
pub const SMG_INACCURACY: f32 = 0.2;

const DEFAULT_BULLET_SPEED: f32 = 400.0;
const SHOTGUN_BULLET_SPEED: f32 = 350.0;
const SNIPER_BULLET_SPEED: f32 = 600.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeaponKind {
    Pistol,
    Smg,
    MeleeStick,
    Shotgun,
    Sniper,
    OrbitingBrick,
}

impl WeaponKind {
    pub fn name(self) -> &'static str {
        match self {
            WeaponKind::Pistol => "Pistol",
            WeaponKind::Smg => "SMG",
            WeaponKind::MeleeStick => "Brick on Stick",
            WeaponKind::Shotgun => "Shotgun",
            WeaponKind::Sniper => "Sniper Rifle",
            WeaponKind::OrbitingBrick => "Orbiting Brick",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WeaponTier {
    One,
    Two,
    Three,
    Four,
}

impl WeaponTier {
    /// Row into the 4-entry stat tables
    #[inline]
    fn row(self) -> usize {
        match self {
            WeaponTier::One => 0,
            WeaponTier::Two => 1,
            WeaponTier::Three => 2,
            WeaponTier::Four => 3,
        }
    }

    pub fn number(self) -> u8 {
        self.row() as u8 + 1
    }
}

/// Immutable stats for one (type, tier)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeaponStats {
    pub base_damage: i32,
    /// Seconds between shots (an interval, smaller is faster)
    pub attack_speed: f32,
    pub range: f32,
    /// 0.0 to 1.0
    pub crit_chance: f32,
    pub crit_multiplier: f32,
    pub knockback: f32,
    pub ranged_damage_scaling: f32,
    pub melee_damage_scaling: f32,
}

impl WeaponStats {
    pub fn lookup(kind: WeaponKind, tier: WeaponTier) -> Self {
        let t = tier.row();
        match kind {
            WeaponKind::Pistol => Self {
                base_damage: [12, 20, 30, 50][t],
                attack_speed: [1.2, 1.12, 1.03, 0.87][t],
                range: 400.0,
                crit_chance: [0.05, 0.10, 0.15, 0.20][t],
                crit_multiplier: 2.0,
                knockback: 15.0,
                ranged_damage_scaling: 1.0,
                melee_damage_scaling: 0.0,
            },
            WeaponKind::Smg => Self {
                base_damage: [3, 4, 6, 8][t],
                attack_speed: [0.17, 0.16, 0.155, 0.15][t],
                range: 400.0,
                crit_chance: 0.01,
                crit_multiplier: 1.5,
                knockback: 0.0,
                ranged_damage_scaling: 1.0,
                melee_damage_scaling: 0.0,
            },
            WeaponKind::MeleeStick => Self {
                base_damage: [15, 25, 40, 65][t],
                attack_speed: [0.8, 0.75, 0.7, 0.65][t],
                range: 80.0,
                crit_chance: 0.08,
                crit_multiplier: 2.5,
                knockback: 25.0,
                ranged_damage_scaling: 0.0,
                melee_damage_scaling: 1.0,
            },
            WeaponKind::Shotgun => Self {
                base_damage: [3, 4, 5, 6][t],
                attack_speed: [1.5, 1.4, 1.3, 1.2][t],
                range: 300.0,
                crit_chance: 0.03,
                crit_multiplier: 1.8,
                knockback: 20.0,
                ranged_damage_scaling: 1.0,
                melee_damage_scaling: 0.0,
            },
            WeaponKind::Sniper => Self {
                base_damage: [25, 35, 50, 60][t],
                attack_speed: 2.0,
                range: 600.0,
                crit_chance: 0.25,
                crit_multiplier: 3.0,
                knockback: 35.0,
                ranged_damage_scaling: 1.0,
                melee_damage_scaling: 0.0,
            },
            WeaponKind::OrbitingBrick => Self {
                base_damage: [8, 12, 18, 26][t],
                attack_speed: 0.0,
                range: OrbitParams::lookup(tier).radius,
                crit_chance: 0.0,
                crit_multiplier: 1.0,
                knockback: 20.0,
                ranged_damage_scaling: 0.0,
                melee_damage_scaling: 1.0,
            },
        }
    }
}

/// Orbit shape of an orbiting weapon
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitParams {
    pub radius: f32,
    /// Radians per second
    pub angular_speed: f32,
    pub hit_radius: f32,
}

impl OrbitParams {
    pub fn lookup(tier: WeaponTier) -> Self {
        let t = tier.row();
        Self {
            radius: [70.0, 78.0, 86.0, 96.0][t],
            angular_speed: [2.5, 2.8, 3.1, 3.4][t],
            hit_radius: [16.0, 18.0, 20.0, 22.0][t],
        }
    }
}

/// Player stats that feed into firing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireContext {
    pub attack_speed: f32,
    pub fire_rate_multiplier: f32,
    pub damage: f32,
    pub melee_damage: f32,
}

impl Default for FireContext {
    fn default() -> Self {
        Self {
            attack_speed: 1.0,
            fire_rate_multiplier: 1.0,
            damage: 0.0,
            melee_damage: 0.0,
        }
    }
}

/// Per-enemy re-hit cooldown for an orbiting weapon
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OrbitHit {
    pub enemy_id: u32,
    pub cooldown: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Weapon {
    pub kind: WeaponKind,
    pub tier: WeaponTier,
    pub stats: WeaponStats,
    pub since_shot: f32,
    pub muzzle_flash: f32,
    /// Remaining melee swing time
    pub attack_timer: f32,
    pub last_shot_dir: Vec2,
    pub orbit: Option<OrbitParams>,
    pub orbit_angle: f32,
    /// Enemies already struck by the current melee swing
    #[serde(default)]
    pub swing_hits: Vec<u32>,
    #[serde(default)]
    pub orbit_hits: Vec<OrbitHit>,
}

impl Weapon {
    pub fn new(kind: WeaponKind, tier: WeaponTier) -> Self {
        Self {
            kind,
            tier,
            stats: WeaponStats::lookup(kind, tier),
            since_shot: 0.0,
            muzzle_flash: 0.0,
            attack_timer: 0.0,
            last_shot_dir: Vec2::X,
            orbit: (kind == WeaponKind::OrbitingBrick).then(|| OrbitParams::lookup(tier)),
            orbit_angle: 0.0,
            swing_hits: Vec::new(),
            orbit_hits: Vec::new(),
        }
    }

    #[inline]
    pub fn is_melee(&self) -> bool {
        self.kind == WeaponKind::MeleeStick
    }

    #[inline]
    pub fn is_orbiting(&self) -> bool {
        self.orbit.is_some()
    }

    /// Seconds between shots after player attack speed and boosts
    pub fn fire_interval(&self, ctx: &FireContext) -> f32 {
        let divisor = (ctx.attack_speed * ctx.fire_rate_multiplier).max(MIN_FIRE_RATE_DIVISOR);
        self.stats.attack_speed / divisor
    }

    /// Damage before the crit roll
    pub fn calculate_damage(&self, ctx: &FireContext) -> i32 {
        let mut total = self.stats.base_damage as f32;
        if self.stats.ranged_damage_scaling > 0.0 {
            total += ctx.damage * self.stats.ranged_damage_scaling;
        }
        if self.stats.melee_damage_scaling > 0.0 {
            total += ctx.melee_damage * self.stats.melee_damage_scaling;
        }
        total as i32
    }

    /// Roll a crit against this weapon's chance
    pub fn roll_crit(&self, damage: i32, rng: &mut impl Rng) -> i32 {
        if rng.random::<f32>() < self.stats.crit_chance {
            (damage as f32 * self.stats.crit_multiplier) as i32
        } else {
            damage
        }
    }

    pub fn update(
        &mut self,
        dt: f32,
        weapon_pos: Vec2,
        aim_dir: Vec2,
        bullets: &mut Vec<Bullet>,
        ctx: &FireContext,
        rng: &mut impl Rng,
    ) {
        self.since_shot += dt;
        self.muzzle_flash = (self.muzzle_flash - dt).max(0.0);
        self.attack_timer = (self.attack_timer - dt).max(0.0);

        if let Some(orbit) = self.orbit {
            self.orbit_angle = wrap_angle(self.orbit_angle + orbit.angular_speed * dt);
            for hit in &mut self.orbit_hits {
                hit.cooldown -= dt;
            }
            self.orbit_hits.retain(|hit| hit.cooldown > 0.0);
            return;
        }

        if self.since_shot < self.fire_interval(ctx) {
            return;
        }
        // Degenerate aim: skip this attempt, stay ready
        if aim_dir.length() < MIN_DIRECTION_LENGTH {
            return;
        }

        let dir = aim_dir.normalize_or_zero();
        self.fire(weapon_pos, dir, bullets, ctx, rng);
        self.since_shot = 0.0;
        self.last_shot_dir = dir;
    }

    fn fire(&mut self, weapon_pos: Vec2, dir: Vec2, bullets: &mut Vec<Bullet>, ctx: &FireContext, rng: &mut impl Rng) {
        let knockback = self.stats.knockback;
        let range = self.stats.range;

        match self.kind {
            WeaponKind::MeleeStick => {
                self.attack_timer = MELEE_ATTACK_DURATION;
                self.swing_hits.clear();
            }
            WeaponKind::Shotgun => {
                let damage = self.calculate_damage(ctx);
                let base_angle = angle_of(dir);
                for _ in 0..SHOTGUN_PELLETS {
                    let angle = base_angle + rng.random_range(-SHOTGUN_SPREAD..=SHOTGUN_SPREAD);
                    let pellet_damage = self.roll_crit(damage, rng);
                    bullets.push(
                        Bullet::new(
                            weapon_pos,
                            direction_from_angle(angle),
                            pellet_damage,
                            range,
                            SHOTGUN_BULLET_SPEED,
                            BulletKind::Shotgun,
                            false,
                        )
                        .with_knockback(knockback),
                    );
                }
                self.muzzle_flash = MUZZLE_FLASH_DURATION;
            }
            WeaponKind::Pistol | WeaponKind::Smg | WeaponKind::Sniper => {
                let (fire_dir, kind, speed) = match self.kind {
                    WeaponKind::Smg => {
                        let angle = angle_of(dir) + rng.random_range(-SMG_INACCURACY..=SMG_INACCURACY);
                        (direction_from_angle(angle), BulletKind::Smg, DEFAULT_BULLET_SPEED)
                    }
                    WeaponKind::Sniper => (dir, BulletKind::Sniper, SNIPER_BULLET_SPEED),
                    _ => (dir, BulletKind::Pistol, DEFAULT_BULLET_SPEED),
                };
                let damage = self.roll_crit(self.calculate_damage(ctx), rng);
                bullets.push(
                    Bullet::new(weapon_pos, fire_dir, damage, range, speed, kind, false).with_knockback(knockback),
                );
                self.muzzle_flash = MUZZLE_FLASH_DURATION;
            }
            WeaponKind::OrbitingBrick => {}
        }
    }

    #[inline]
    pub fn is_attacking(&self) -> bool {
        self.attack_timer > 0.0
    }

    /// Swing progress: 0.0 at start, 1.0 at the end, 0.0 when idle
    pub fn attack_progress(&self) -> f32 {
        if self.is_attacking() {
            (MELEE_ATTACK_DURATION - self.attack_timer) / MELEE_ATTACK_DURATION
        } else {
            0.0
        }
    }

    /// Fraction of full reach at the current point in the swing
    pub fn reach_fraction(&self) -> f32 {
        let progress = self.attack_progress();
        if progress < MELEE_EXTEND_FRACTION {
            (progress / MELEE_EXTEND_FRACTION * FRAC_PI_2).sin()
        } else {
            ((progress - MELEE_EXTEND_FRACTION) / (1.0 - MELEE_EXTEND_FRACTION) * FRAC_PI_2).cos()
        }
    }

    /// Melee tip position; non-melee weapons return `weapon_pos`
    pub fn tip_position(&self, weapon_pos: Vec2, dir: Vec2) -> Vec2 {
        if !self.is_melee() {
            return weapon_pos;
        }
        weapon_pos + dir * (self.stats.range * self.reach_fraction())
    }

    /// Record a melee hit; false if this enemy was already struck this swing
    pub fn register_swing_hit(&mut self, enemy_id: u32) -> bool {
        if self.swing_hits.contains(&enemy_id) {
            return false;
        }
        self.swing_hits.push(enemy_id);
        true
    }

    pub fn orbit_position(&self, player_pos: Vec2) -> Vec2 {
        match self.orbit {
            Some(orbit) => player_pos + polar_to_cartesian(orbit.radius, self.orbit_angle),
            None => player_pos,
        }
    }

    pub fn orbit_hit_radius(&self) -> f32 {
        self.orbit.map_or(0.0, |orbit| orbit.hit_radius)
    }

    /// Record an orbit hit; false while this enemy is still on cooldown
    pub fn register_orbit_hit(&mut self, enemy_id: u32, rehit_interval: f32) -> bool {
        if self.orbit_hits.iter().any(|hit| hit.enemy_id == enemy_id) {
            return false;
        }
        self.orbit_hits.push(OrbitHit {
            enemy_id,
            cooldown: rehit_interval,
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(2024)
    }

    #[test]
    fn test_pistol_fires_every_interval() {
        let mut weapon = Weapon::new(WeaponKind::Pistol, WeaponTier::One);
        let ctx = FireContext::default();
        let mut bullets = Vec::new();
        let mut rng = rng();
        let dt = 0.01;
        let mut shot_times = Vec::new();

        for step in 1..=500 {
            let before = bullets.len();
            weapon.update(dt, Vec2::ZERO, Vec2::X, &mut bullets, &ctx, &mut rng);
            if bullets.len() > before {
                shot_times.push(step as f32 * dt);
            }
        }

        assert_eq!(shot_times.len(), 4);
        for pair in shot_times.windows(2) {
            let gap = pair[1] - pair[0];
            assert!(gap >= 1.2 - 1e-3, "shots {gap}s apart");
            assert!(gap < 1.2 + dt + 1e-3);
        }
    }

    #[test]
    fn test_fire_interval_clamps_divisor() {
        let weapon = Weapon::new(WeaponKind::Pistol, WeaponTier::One);
        let boosted = FireContext {
            fire_rate_multiplier: 2.0,
            ..Default::default()
        };
        assert!((weapon.fire_interval(&boosted) - 0.6).abs() < 1e-5);

        let crippled = FireContext {
            attack_speed: 0.0,
            ..Default::default()
        };
        assert!((weapon.fire_interval(&crippled) - 12.0).abs() < 1e-4);
    }

    #[test]
    fn test_damage_scaling() {
        let ctx = FireContext {
            damage: 5.0,
            melee_damage: 3.0,
            ..Default::default()
        };
        assert_eq!(Weapon::new(WeaponKind::Pistol, WeaponTier::One).calculate_damage(&ctx), 17);
        assert_eq!(Weapon::new(WeaponKind::MeleeStick, WeaponTier::One).calculate_damage(&ctx), 18);
        assert_eq!(Weapon::new(WeaponKind::Sniper, WeaponTier::Four).calculate_damage(&ctx), 65);
    }

    #[test]
    fn test_tier_tables() {
        assert_eq!(WeaponStats::lookup(WeaponKind::Pistol, WeaponTier::Four).base_damage, 50);
        assert_eq!(WeaponStats::lookup(WeaponKind::Smg, WeaponTier::Three).attack_speed, 0.155);
        assert_eq!(WeaponStats::lookup(WeaponKind::MeleeStick, WeaponTier::Two).range, 80.0);
        assert_eq!(WeaponStats::lookup(WeaponKind::OrbitingBrick, WeaponTier::Three).range, 86.0);
        assert_eq!(WeaponTier::Three.number(), 3);
    }

    #[test]
    fn test_shotgun_spread() {
        let mut weapon = Weapon::new(WeaponKind::Shotgun, WeaponTier::One);
        weapon.since_shot = 10.0;
        let mut bullets = Vec::new();
        let mut rng = rng();
        weapon.update(0.0, Vec2::ZERO, Vec2::X, &mut bullets, &FireContext::default(), &mut rng);

        assert_eq!(bullets.len(), SHOTGUN_PELLETS);
        for pellet in &bullets {
            assert!(angle_of(pellet.dir).abs() <= SHOTGUN_SPREAD + 1e-4);
            assert_eq!(pellet.kind, BulletKind::Shotgun);
            assert!(!pellet.enemy_owned);
            assert!(pellet.damage == 3 || pellet.damage == 5);
            assert_eq!(pellet.knockback, 20.0);
        }
    }

    #[test]
    fn test_smg_inaccuracy_bounded() {
        let mut weapon = Weapon::new(WeaponKind::Smg, WeaponTier::One);
        let mut bullets = Vec::new();
        let mut rng = rng();
        for _ in 0..200 {
            weapon.update(0.05, Vec2::ZERO, Vec2::Y, &mut bullets, &FireContext::default(), &mut rng);
        }
        assert!(bullets.len() > 40);
        for bullet in &bullets {
            let offset = angle_of(bullet.dir) - FRAC_PI_2;
            assert!(offset.abs() <= SMG_INACCURACY + 1e-4);
        }
    }

    #[test]
    fn test_zero_aim_skips_fire() {
        let mut weapon = Weapon::new(WeaponKind::Pistol, WeaponTier::One);
        let mut bullets = Vec::new();
        let mut rng = rng();
        weapon.update(2.0, Vec2::ZERO, Vec2::ZERO, &mut bullets, &FireContext::default(), &mut rng);
        assert!(bullets.is_empty());
        // Still ready next tick once aim is valid
        weapon.update(0.0, Vec2::ZERO, Vec2::X, &mut bullets, &FireContext::default(), &mut rng);
        assert_eq!(bullets.len(), 1);
    }

    #[test]
    fn test_melee_swing_reach_curve() {
        let mut weapon = Weapon::new(WeaponKind::MeleeStick, WeaponTier::One);
        let mut bullets = Vec::new();
        let mut rng = rng();
        weapon.update(1.0, Vec2::ZERO, Vec2::X, &mut bullets, &FireContext::default(), &mut rng);
        assert!(bullets.is_empty());
        assert!(weapon.is_attacking());
        assert!(weapon.tip_position(Vec2::ZERO, Vec2::X).x.abs() < 1e-3);

        // 60% of the swing: fully extended
        weapon.attack_timer = MELEE_ATTACK_DURATION * 0.4;
        assert!((weapon.tip_position(Vec2::ZERO, Vec2::X).x - 80.0).abs() < 1e-2);

        // 80%: halfway back along the cosine
        weapon.attack_timer = MELEE_ATTACK_DURATION * 0.2;
        let expected = 80.0 * (0.5 * FRAC_PI_2).cos();
        assert!((weapon.tip_position(Vec2::ZERO, Vec2::X).x - expected).abs() < 1e-2);
    }

    #[test]
    fn test_melee_hits_once_per_swing() {
        let mut weapon = Weapon::new(WeaponKind::MeleeStick, WeaponTier::One);
        let mut bullets = Vec::new();
        let mut rng = rng();
        weapon.update(1.0, Vec2::ZERO, Vec2::X, &mut bullets, &FireContext::default(), &mut rng);
        assert!(weapon.register_swing_hit(4));
        assert!(!weapon.register_swing_hit(4));
        assert!(weapon.register_swing_hit(5));

        // Next swing clears the list
        weapon.update(1.0, Vec2::ZERO, Vec2::X, &mut bullets, &FireContext::default(), &mut rng);
        assert!(weapon.register_swing_hit(4));
    }

    #[test]
    fn test_orbit_advances_and_never_fires() {
        let mut weapon = Weapon::new(WeaponKind::OrbitingBrick, WeaponTier::One);
        let mut bullets = Vec::new();
        let mut rng = rng();
        weapon.update(1.0, Vec2::ZERO, Vec2::X, &mut bullets, &FireContext::default(), &mut rng);
        assert!(bullets.is_empty());
        assert!((weapon.orbit_angle - 2.5).abs() < 1e-5);
        let pos = weapon.orbit_position(Vec2::new(10.0, 10.0));
        assert!((pos.distance(Vec2::new(10.0, 10.0)) - 70.0).abs() < 1e-3);
        assert_eq!(weapon.orbit_hit_radius(), 16.0);
        assert_eq!(Weapon::new(WeaponKind::Pistol, WeaponTier::One).orbit_hit_radius(), 0.0);
    }

    #[test]
    fn test_orbit_rehit_cooldown() {
        let mut weapon = Weapon::new(WeaponKind::OrbitingBrick, WeaponTier::One);
        let mut bullets = Vec::new();
        let mut rng = rng();
        assert!(weapon.register_orbit_hit(9, 0.5));
        assert!(!weapon.register_orbit_hit(9, 0.5));
        weapon.update(0.6, Vec2::ZERO, Vec2::X, &mut bullets, &FireContext::default(), &mut rng);
        assert!(weapon.register_orbit_hit(9, 0.5));
    }
}
