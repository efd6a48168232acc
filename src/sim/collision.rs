//! Collision detection and combat resolution
//!
//! Every resolver only marks things dead; removal happens later in the tick's
//! compaction pass so indices stay stable while resolving.

use glam::Vec2;
use rand::Rng;

use super::bullet::Bullet;
use super::enemy::Enemy;
use super::pickup::{Booster, BoosterKind, Pickup, PickupKind};
use super::player::{DamageOutcome, Player};
use super::state::GameEvent;

/// Radius of the melee weapon tip used for reach checks
pub const MELEE_TIP_RADIUS: f32 = 8.0;

#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance_squared(b) <= (ra + rb) * (ra + rb)
}

fn record_player_damage(outcome: DamageOutcome, events: &mut Vec<GameEvent>) {
    match outcome {
        DamageOutcome::Dodged => {
            log::debug!("Dodged!");
            events.push(GameEvent::PlayerDodged);
        }
        DamageOutcome::Taken { shield, health } => events.push(GameEvent::PlayerHit { shield, health }),
    }
}

/// Player projectiles against enemies. Each projectile hits at most one enemy.
pub fn player_bullets_vs_enemies(bullets: &mut [Bullet], enemies: &mut [Enemy], rng: &mut impl Rng) {
    for bullet in bullets.iter_mut().filter(|b| b.alive && !b.enemy_owned) {
        let Some(enemy) = enemies
            .iter_mut()
            .find(|e| e.overlaps(bullet.pos, bullet.radius))
        else {
            continue;
        };
        if !enemy.take_damage(bullet.damage, rng) {
            enemy.knock_back(bullet.dir, bullet.knockback);
        }
        bullet.destroy();
    }
}

/// Enemy projectiles against the player
pub fn enemy_bullets_vs_player(
    bullets: &mut [Bullet],
    player: &mut Player,
    rng: &mut impl Rng,
    events: &mut Vec<GameEvent>,
) {
    for bullet in bullets.iter_mut().filter(|b| b.alive && b.enemy_owned) {
        if player.is_dead() {
            return;
        }
        if circles_overlap(bullet.pos, bullet.radius, player.pos, player.radius) {
            let outcome = player.take_damage(bullet.damage, rng);
            record_player_damage(outcome, events);
            bullet.destroy();
        }
    }
}

/// Melee reach checks: the swinging tip hits each enemy once per swing
pub fn melee_vs_enemies(player: &mut Player, enemies: &mut [Enemy], rng: &mut impl Rng) {
    let ctx = player.fire_context();
    let aim = player.aim_dir;

    for i in 0..player.weapons.len() {
        if !player.weapons[i].is_melee() || !player.weapons[i].is_attacking() {
            continue;
        }
        let mount = player.weapon_position(i);
        let weapon = &mut player.weapons[i];
        let tip = weapon.tip_position(mount, aim);

        for enemy in enemies.iter_mut() {
            if !enemy.overlaps(tip, MELEE_TIP_RADIUS) || !weapon.register_swing_hit(enemy.id()) {
                continue;
            }
            let damage = weapon.roll_crit(weapon.calculate_damage(&ctx), rng);
            if !enemy.take_damage(damage, rng) {
                enemy.knock_back(aim, weapon.stats.knockback);
            }
        }
    }
}

/// Orbiting weapons damage whatever they pass through, once per re-hit interval
pub fn orbit_vs_enemies(
    player: &mut Player,
    enemies: &mut [Enemy],
    rng: &mut impl Rng,
    rehit_interval: f32,
) {
    let ctx = player.fire_context();
    let center = player.pos;

    for weapon in player.weapons.iter_mut().filter(|w| w.is_orbiting()) {
        let pos = weapon.orbit_position(center);
        let hit_radius = weapon.orbit_hit_radius();

        for enemy in enemies.iter_mut() {
            if !enemy.overlaps(pos, hit_radius) || !weapon.register_orbit_hit(enemy.id(), rehit_interval) {
                continue;
            }
            let damage = weapon.roll_crit(weapon.calculate_damage(&ctx), rng);
            if !enemy.take_damage(damage, rng) {
                enemy.knock_back(enemy.pos() - center, weapon.stats.knockback);
            }
        }
    }
}

/// Body contact: the first touching enemy hurts the player, then contact
/// damage is suppressed for `interval` seconds
pub fn contact_vs_player(
    player: &mut Player,
    enemies: &[Enemy],
    rng: &mut impl Rng,
    interval: f32,
    events: &mut Vec<GameEvent>,
) {
    if player.contact_cooldown > 0.0 || player.is_dead() {
        return;
    }
    if let Some(enemy) = enemies.iter().find(|e| e.overlaps(player.pos, player.radius)) {
        let outcome = player.take_damage(enemy.contact_damage(), rng);
        record_player_damage(outcome, events);
        player.contact_cooldown = interval;
    }
}

/// Collect pickups the player touches
pub fn collect_pickups(player: &Player, pickups: &mut [Pickup]) -> Vec<PickupKind> {
    pickups
        .iter_mut()
        .filter(|p| p.alive && circles_overlap(p.pos, p.radius, player.pos, player.radius))
        .map(|p| {
            p.alive = false;
            p.kind
        })
        .collect()
}

/// Collect boosters the player touches
pub fn collect_boosters(player: &Player, boosters: &mut [Booster]) -> Vec<BoosterKind> {
    boosters
        .iter_mut()
        .filter(|b| b.alive && circles_overlap(b.pos, b.radius, player.pos, player.radius))
        .map(|b| {
            b.alive = false;
            b.kind
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::bullet::BulletKind;
    use crate::sim::enemy::{BasicEnemy, BasicKind, BossEnemy};
    use crate::sim::player::PlayerStats;
    use crate::sim::weapon::{Weapon, WeaponKind, WeaponTier};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn basic(id: u32, pos: Vec2) -> Enemy {
        Enemy::Basic(BasicEnemy::new(id, pos, BasicKind::Base))
    }

    fn player_at(pos: Vec2) -> Player {
        Player::new(pos, PlayerStats::default(), 6)
    }

    #[test]
    fn test_circles_overlap() {
        assert!(circles_overlap(Vec2::ZERO, 5.0, Vec2::new(10.0, 0.0), 5.0));
        assert!(!circles_overlap(Vec2::ZERO, 5.0, Vec2::new(10.1, 0.0), 5.0));
    }

    #[test]
    fn test_bullet_hits_one_enemy_and_knocks_back() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut enemies = vec![basic(1, Vec2::new(100.0, 0.0)), basic(2, Vec2::new(100.0, 0.0))];
        let mut bullets = vec![
            Bullet::new(Vec2::new(95.0, 0.0), Vec2::X, 10, 400.0, 400.0, BulletKind::Pistol, false)
                .with_knockback(15.0),
        ];
        player_bullets_vs_enemies(&mut bullets, &mut enemies, &mut rng);

        assert!(!bullets[0].alive);
        assert_eq!(enemies[0].health(), 20);
        assert_eq!(enemies[1].health(), 30);
        assert!((enemies[0].pos().x - 115.0).abs() < 1e-4);
    }

    #[test]
    fn test_enemy_bullets_ignore_enemies() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut enemies = vec![basic(1, Vec2::ZERO)];
        let mut bullets = vec![Bullet::new(Vec2::ZERO, Vec2::X, 10, 400.0, 400.0, BulletKind::BossBullet, true)];
        player_bullets_vs_enemies(&mut bullets, &mut enemies, &mut rng);
        assert!(bullets[0].alive);
        assert_eq!(enemies[0].health(), 30);
    }

    #[test]
    fn test_lethal_bullet_marks_dead_without_knockback() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut enemies = vec![basic(1, Vec2::new(100.0, 0.0))];
        let mut bullets = vec![
            Bullet::new(Vec2::new(95.0, 0.0), Vec2::X, 30, 400.0, 400.0, BulletKind::Pistol, false)
                .with_knockback(15.0),
        ];
        player_bullets_vs_enemies(&mut bullets, &mut enemies, &mut rng);

        // Still in the slice; removal is left to compaction
        assert_eq!(enemies.len(), 1);
        assert!(!enemies[0].is_alive());
        assert_eq!(enemies[0].pos(), Vec2::new(100.0, 0.0));
    }

    #[test]
    fn test_enemy_bullet_hurts_player() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut player = player_at(Vec2::new(50.0, 50.0));
        let mut events = Vec::new();
        let mut bullets = vec![Bullet::new(Vec2::new(60.0, 50.0), Vec2::X, 12, 400.0, 400.0, BulletKind::BossBullet, true)];
        enemy_bullets_vs_player(&mut bullets, &mut player, &mut rng, &mut events);
        assert!(!bullets[0].alive);
        assert_eq!(player.shield, 88);
        assert_eq!(events, vec![GameEvent::PlayerHit { shield: 12, health: 0 }]);
    }

    #[test]
    fn test_melee_hits_once_per_swing() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut player = player_at(Vec2::new(500.0, 500.0));
        player.add_weapon(Weapon::new(WeaponKind::MeleeStick, WeaponTier::One));
        player.weapons[0].stats.crit_chance = 0.0;
        let mut bullets = Vec::new();
        player.update_weapons(1.0, &mut bullets, &mut rng);
        // Fully extended: 60% through the swing
        player.weapons[0].attack_timer = 0.12;

        let mount = player.weapon_position(0);
        let tip = mount + player.aim_dir * 80.0;
        let mut enemies = vec![Enemy::Boss(BossEnemy::new(1, tip))];

        melee_vs_enemies(&mut player, &mut enemies, &mut rng);
        melee_vs_enemies(&mut player, &mut enemies, &mut rng);
        assert_eq!(enemies[0].health(), 1000 - 15);
    }

    #[test]
    fn test_orbit_respects_rehit_interval() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut player = player_at(Vec2::new(500.0, 500.0));
        player.add_weapon(Weapon::new(WeaponKind::OrbitingBrick, WeaponTier::One));
        let brick = player.weapons[0].orbit_position(player.pos);
        let mut enemies = vec![Enemy::Boss(BossEnemy::new(1, brick))];

        orbit_vs_enemies(&mut player, &mut enemies, &mut rng, 0.5);
        orbit_vs_enemies(&mut player, &mut enemies, &mut rng, 0.5);
        assert_eq!(enemies[0].health(), 1000 - 8);
    }

    #[test]
    fn test_contact_damage_interval() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut player = player_at(Vec2::new(100.0, 100.0));
        let enemies = vec![basic(1, Vec2::new(110.0, 100.0))];
        let mut events = Vec::new();

        contact_vs_player(&mut player, &enemies, &mut rng, 0.5, &mut events);
        contact_vs_player(&mut player, &enemies, &mut rng, 0.5, &mut events);
        assert_eq!(events.len(), 1);
        assert_eq!(player.shield, 95);

        player.update(0.6, Vec2::new(1920.0, 1080.0));
        contact_vs_player(&mut player, &enemies, &mut rng, 0.5, &mut events);
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_collect_pickups_on_touch() {
        let player = player_at(Vec2::ZERO);
        let mut pickups = vec![
            Pickup::new(1, PickupKind::Experience(3), Vec2::new(10.0, 0.0)),
            Pickup::new(2, PickupKind::Material(1), Vec2::new(500.0, 0.0)),
        ];
        assert_eq!(collect_pickups(&player, &mut pickups), vec![PickupKind::Experience(3)]);
        assert!(!pickups[0].alive);
        assert!(pickups[1].alive);
    }
}
