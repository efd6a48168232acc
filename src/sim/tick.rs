//! Per-frame simulation step
//!
//! Order within a frame: player → weapons → enemies → projectiles → pickups →
//! collision resolution → compaction. Updaters only append projectiles;
//! removal happens once, in compaction.

use glam::Vec2;

use super::collision;
use super::pickup::{BoosterKind, PickupKind};
use super::state::{GameEvent, GamePhase, GameState};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Movement intent (any length; zero means stand still)
    pub move_dir: Vec2,
    /// World-space aim target (pointer position)
    pub aim_target: Option<Vec2>,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the game state by `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => state.phase = GamePhase::Playing,
            GamePhase::GameOver => {}
        }
    }

    if state.phase != GamePhase::Playing {
        return;
    }

    state.time_ticks += 1;
    state.elapsed += dt;
    let arena = state.arena_size();

    // Player
    state.player.set_move_intent(input.move_dir);
    state.player.update(dt, arena);
    if let Some(target) = input.aim_target {
        state.player.update_aim(target);
    }

    // Weapons
    state
        .player
        .update_weapons(dt, &mut state.bullets, &mut state.rng);

    // Enemies
    let player_pos = state.player.pos;
    for enemy in &mut state.enemies {
        enemy.update(dt, player_pos, &mut state.bullets, &mut state.rng);
    }

    // Projectiles
    for bullet in &mut state.bullets {
        bullet.update(dt);
    }

    // Pickups
    let pickup_range = state.player.stats.pickup_range;
    for pickup in &mut state.pickups {
        pickup.update(dt, player_pos, pickup_range);
    }
    for booster in &mut state.boosters {
        booster.update(dt);
    }

    resolve_collisions(state);
    compact(state);

    if state.player.is_dead() {
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::PlayerDied);
        log::info!(
            "Player died at level {} after {:.1}s with {} kills",
            state.player.level,
            state.elapsed,
            state.kills
        );
    }
}

fn resolve_collisions(state: &mut GameState) {
    let tuning = &state.tuning;

    collision::player_bullets_vs_enemies(&mut state.bullets, &mut state.enemies, &mut state.rng);
    collision::melee_vs_enemies(&mut state.player, &mut state.enemies, &mut state.rng);
    collision::orbit_vs_enemies(
        &mut state.player,
        &mut state.enemies,
        &mut state.rng,
        tuning.orbit_rehit_interval,
    );
    collision::enemy_bullets_vs_player(
        &mut state.bullets,
        &mut state.player,
        &mut state.rng,
        &mut state.events,
    );
    collision::contact_vs_player(
        &mut state.player,
        &state.enemies,
        &mut state.rng,
        tuning.contact_damage_interval,
        &mut state.events,
    );

    for kind in collision::collect_pickups(&state.player, &mut state.pickups) {
        match kind {
            PickupKind::Experience(amount) => {
                for level_up in state.player.gain_experience(amount) {
                    state.events.push(GameEvent::LevelUp { level: level_up.level });
                    if let Some(kind) = level_up.granted {
                        state.events.push(GameEvent::WeaponGranted { kind });
                    }
                }
            }
            PickupKind::Material(amount) => state.player.stats.materials += amount,
        }
        state.events.push(GameEvent::PickupCollected { kind });
    }

    for kind in collision::collect_boosters(&state.player, &mut state.boosters) {
        match kind {
            BoosterKind::SpeedUp => state
                .player
                .apply_fire_rate_boost(tuning.booster.fire_rate_multiplier, tuning.booster.fire_rate_duration),
            BoosterKind::Healing => state.player.heal(tuning.booster.heal_amount),
        }
        log::debug!("Collected {} booster", kind.name());
        state.events.push(GameEvent::BoosterCollected { kind });
    }
}

/// Drop dead entities, spawning loot for each dead enemy
fn compact(state: &mut GameState) {
    state.bullets.retain(|b| b.alive);

    let mut dead = Vec::new();
    state.enemies.retain(|e| {
        if e.is_alive() {
            true
        } else {
            dead.push((e.id(), e.spawn_kind(), e.pos(), e.experience_value(), e.name()));
            false
        }
    });
    for (id, kind, pos, experience, name) in dead {
        log::info!("Killed {name} #{id}");
        state.kills += 1;
        state.drop_loot(pos, experience);
        state.events.push(GameEvent::EnemyKilled { id, kind, pos });
    }

    state.pickups.retain(|p| p.alive);
    state.boosters.retain(|b| b.alive);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::bullet::{Bullet, BulletKind};
    use crate::sim::enemy::{BasicKind, Enemy, EnemySpawn};
    use crate::sim::weapon::WeaponKind;

    fn empty_handed(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        state.player.weapons.clear();
        state
    }

    #[test]
    fn test_tick_pause() {
        let mut state = GameState::new(12345);
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Paused);
        assert_eq!(state.time_ticks, 0);

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.time_ticks, 0);

        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_player_moves_and_aims() {
        let mut state = empty_handed(1);
        let start = state.player.pos;
        let input = TickInput {
            move_dir: Vec2::new(0.0, -1.0),
            aim_target: Some(start + Vec2::new(-100.0, 0.0)),
            pause: false,
        };
        tick(&mut state, &input, 0.1);
        assert!((state.player.pos.y - (start.y - 30.0)).abs() < 1e-3);
        assert_eq!(state.player.aim_dir, Vec2::NEG_X);
    }

    #[test]
    fn test_kill_drops_orb_and_emits_event() {
        let mut state = empty_handed(3);
        state.tuning.material_drop_chance = 0.0;
        let pos = state.player.pos + Vec2::new(300.0, 0.0);
        let id = state.spawn_enemy(EnemySpawn::Basic(BasicKind::Pebblin), pos);
        state.drain_events();
        state.enemies[0].body_mut().health = 1;

        let mut bullet = Bullet::new(pos, Vec2::X, 5, 400.0, 0.0, BulletKind::Pistol, false);
        bullet.speed = 0.0;
        state.bullets.push(bullet);
        tick(&mut state, &TickInput::default(), SIM_DT);

        assert!(state.enemies.is_empty());
        assert!(state.bullets.is_empty());
        assert_eq!(state.kills, 1);
        assert_eq!(state.pickups.len(), 1);
        assert_eq!(state.pickups[0].kind, PickupKind::Experience(1));
        assert!(state
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::EnemyKilled { id: killed, .. } if *killed == id)));
    }

    #[test]
    fn test_orb_collection_levels_up_and_grants_weapon() {
        let mut state = empty_handed(4);
        state.tuning.material_drop_chance = 0.0;
        let pos = state.player.pos;
        state.drop_loot(pos, 25);
        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(state.player.level, 2);
        assert_eq!(state.player.weapons.len(), 1);
        assert_eq!(state.player.weapons[0].kind, WeaponKind::MeleeStick);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::LevelUp { level: 2 }));
        assert!(events.contains(&GameEvent::WeaponGranted { kind: WeaponKind::MeleeStick }));
        assert!(events.contains(&GameEvent::PickupCollected { kind: PickupKind::Experience(25) }));
    }

    #[test]
    fn test_boosters() {
        let mut state = empty_handed(5);
        let pos = state.player.pos;
        state.player.health = 50;
        state.spawn_booster(BoosterKind::Healing, pos);
        state.spawn_booster(BoosterKind::SpeedUp, pos);
        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(state.player.health, 70);
        assert_eq!(state.player.fire_rate_multiplier, state.tuning.booster.fire_rate_multiplier);
        assert!(state.boosters.is_empty());
    }

    #[test]
    fn test_uncollected_booster_despawns() {
        let mut state = empty_handed(6);
        let far = state.player.pos + Vec2::new(500.0, 0.0);
        state.spawn_booster(BoosterKind::Healing, far);
        for _ in 0..((5.0 / SIM_DT) as usize + 2) {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert!(state.boosters.is_empty());
    }

    #[test]
    fn test_death_ends_run() {
        let mut state = empty_handed(7);
        state.player.shield = 0;
        state.player.health = 1;
        let pos = state.player.pos;
        state.spawn_enemy(EnemySpawn::Basic(BasicKind::Base), pos);
        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.events.contains(&GameEvent::PlayerDied));

        let ticks = state.time_ticks;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.time_ticks, ticks);
    }

    #[test]
    fn test_fractal_boss_dies_after_last_node() {
        let mut state = empty_handed(8);
        let pos = state.player.pos + Vec2::new(0.0, -250.0);
        state.spawn_enemy(EnemySpawn::Fractal, pos);

        for hit in 1..=21 {
            let Some(Enemy::Fractal(boss)) = state.enemies.first() else {
                panic!("fractal boss gone after {} hits", hit - 1);
            };
            // Drop a lethal, stationary shot on any living node
            let mut target = None;
            boss.root.visit(boss.body.pos, boss.rotation, &mut |node, world| {
                if node.alive && target.is_none() {
                    target = Some(world);
                }
            });
            let target = target.expect("living node");
            let mut bullet = Bullet::new(target, Vec2::X, 1000, 400.0, 0.0, BulletKind::Pistol, false);
            bullet.speed = 0.0;
            state.bullets.push(bullet);

            tick(&mut state, &TickInput::default(), SIM_DT);
            assert_eq!(state.enemies.is_empty(), hit == 21, "after hit {hit}");
        }
        assert_eq!(state.kills, 1);
    }

    #[test]
    fn test_determinism() {
        fn run(seed: u64) -> String {
            let mut state = GameState::new(seed);
            let center = state.player.pos;
            state.spawn_enemy(EnemySpawn::Centipede, center + Vec2::new(-400.0, -300.0));
            state.spawn_enemy(EnemySpawn::Fractal, center + Vec2::new(500.0, 0.0));
            state.spawn_enemy(EnemySpawn::Basic(BasicKind::Slime), center + Vec2::new(0.0, 350.0));

            for i in 0..600 {
                let angle = i as f32 * 0.01;
                let input = TickInput {
                    move_dir: Vec2::new(angle.cos(), angle.sin()),
                    aim_target: Some(center + Vec2::new(300.0, 0.0)),
                    pause: false,
                };
                tick(&mut state, &input, SIM_DT);
            }
            serde_json::to_string(&state).expect("serialize")
        }

        assert_eq!(run(99999), run(99999));
        assert_ne!(run(99999), run(1));
    }
}
