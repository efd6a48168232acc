//! Per-entity drawing
//!
//! Every entity draws its sprite when the texture is available and a plain
//! shape otherwise, so a headless or asset-less build still shows the game.

use glam::Vec2;

use super::{Asset, Canvas, Sprite, Textures};
use crate::sim::enemy::{
    BasicEnemy, BasicKind, BossEnemy, CentipedeEnemy, Enemy, EnemyBody, FractalBoss, HitState, MiniBossEnemy,
};
use crate::sim::{Booster, BoosterKind, Bullet, BulletKind, GameState, Pickup, PickupKind, Player, Weapon, WeaponKind, WeaponTier};
use crate::{Rgba, angle_of};

pub const BAR_BACKGROUND: Rgba = Rgba::rgb(64, 64, 64);
pub const BAR_BORDER: Rgba = Rgba::WHITE;

const HIT_TINT: Rgba = Rgba::rgb(255, 110, 110);
const ARENA_BORDER: Rgba = Rgba::rgb(80, 80, 80);

const CONNECTOR_COLOR: Rgba = Rgba::rgb(150, 75, 25);
const NODE_OUTLINE: Rgba = Rgba::rgb(255, 200, 150);
const NODE_DOT_RADIUS: f32 = 2.0;

const MINI_BOSS_BAR_BACKGROUND: Rgba = Rgba::rgb(139, 0, 0);
const MINI_BOSS_BAR_FILL: Rgba = Rgba::rgb(255, 0, 0);

const BOOSTER_BAR_SIZE: Vec2 = Vec2::new(40.0, 5.0);
const BOOSTER_BAR_OFFSET: f32 = 6.0;

const BRICK_COLOR: Rgba = Rgba::rgb(178, 74, 46);
const STICK_COLOR: Rgba = Rgba::rgb(139, 90, 43);
const GUN_COLOR: Rgba = Rgba::rgb(90, 90, 100);
const MUZZLE_FLASH_COLOR: Rgba = Rgba::rgb(255, 230, 120);
const WEAPON_SPRITE_SIZE: Vec2 = Vec2::new(32.0, 16.0);
const BRICK_HEAD_SIZE: f32 = 16.0;
const MUZZLE_OFFSET: f32 = 22.0;

/// Anything that can describe itself on a [`Canvas`]
pub trait Draw {
    fn draw<C: Canvas>(&self, canvas: &mut C, textures: &Textures);
}

/// Fractal node fill: dim brown when nearly dead, bright orange at full health
pub fn health_tint(fraction: f32) -> Rgba {
    let f = fraction.clamp(0.0, 1.0);
    Rgba::rgb(
        (200.0 * f + 55.0) as u8,
        (100.0 * f + 50.0) as u8,
        (50.0 * f + 25.0) as u8,
    )
}

fn body_tint(body: &EnemyBody) -> Rgba {
    match body.state {
        HitState::Hit => HIT_TINT,
        HitState::Idle => Rgba::WHITE,
    }
}

/// Idle animation: the second frame is drawn slightly larger
fn idle_scale(body: &EnemyBody) -> f32 {
    if body.frame == 1 { 1.05 } else { 1.0 }
}

fn sprite_or_circle<C: Canvas>(
    canvas: &mut C,
    textures: &Textures,
    asset: Asset,
    body: &EnemyBody,
    size: Vec2,
    fallback: Rgba,
) {
    match textures.get(asset) {
        Some(texture) => canvas.sprite(
            Sprite::new(texture, body.pos, size * idle_scale(body))
                .flipped(body.facing_right)
                .tinted(body_tint(body)),
        ),
        None => {
            let color = if body.state == HitState::Hit { HIT_TINT } else { fallback };
            canvas.fill_circle(body.pos, body.radius, color);
        }
    }
}

/// Background, proportional fill, border
fn progress_bar<C: Canvas>(canvas: &mut C, min: Vec2, size: Vec2, fraction: f32, background: Rgba, fill: Rgba) {
    canvas.fill_rect(min, size, background);
    let width = size.x * fraction.clamp(0.0, 1.0);
    if width > 0.0 {
        canvas.fill_rect(min, Vec2::new(width, size.y), fill);
    }
    canvas.stroke_rect(min, size, BAR_BORDER);
}

impl Draw for Enemy {
    fn draw<C: Canvas>(&self, canvas: &mut C, textures: &Textures) {
        if !self.is_alive() {
            return;
        }
        match self {
            Enemy::Basic(e) => e.draw(canvas, textures),
            Enemy::Centipede(e) => e.draw(canvas, textures),
            Enemy::Boss(e) => e.draw(canvas, textures),
            Enemy::MiniBoss(e) => e.draw(canvas, textures),
            Enemy::Fractal(e) => e.draw(canvas, textures),
        }
    }
}

impl Draw for BasicEnemy {
    fn draw<C: Canvas>(&self, canvas: &mut C, textures: &Textures) {
        let (asset, fallback) = match self.kind {
            BasicKind::Base => (Asset::Crawler, Rgba::rgb(170, 60, 60)),
            BasicKind::Slime => (Asset::Slime, Rgba::rgb(90, 200, 90)),
            BasicKind::Pebblin => (Asset::Pebblin, Rgba::rgb(150, 150, 140)),
        };
        let size = Vec2::splat(self.body.radius * 2.0);
        sprite_or_circle(canvas, textures, asset, &self.body, size, fallback);
    }
}

impl Draw for BossEnemy {
    fn draw<C: Canvas>(&self, canvas: &mut C, textures: &Textures) {
        let (asset, fallback) = if self.sprinting {
            (Asset::BossRush, Rgba::rgb(255, 90, 0))
        } else {
            (Asset::Boss, Rgba::rgb(160, 30, 30))
        };
        let size = Vec2::splat(self.body.radius * 2.4);
        sprite_or_circle(canvas, textures, asset, &self.body, size, fallback);
    }
}

impl Draw for MiniBossEnemy {
    fn draw<C: Canvas>(&self, canvas: &mut C, textures: &Textures) {
        let body = &self.body;
        if self.leader {
            canvas.fill_circle(body.pos, body.radius + 4.0, self.variant.tuning().bullet_kind.color());
        }
        let size = Vec2::splat(body.radius * 2.0);
        sprite_or_circle(canvas, textures, Asset::MiniBoss, body, size, Rgba::rgb(120, 20, 20));

        let bar_size = if self.leader { Vec2::new(80.0, 8.0) } else { Vec2::new(60.0, 6.0) };
        let bar_min = Vec2::new(body.pos.x - bar_size.x * 0.5, (body.pos.y - body.radius - 12.0).max(0.0));
        let fraction = body.health as f32 / self.max_health().max(1) as f32;
        progress_bar(canvas, bar_min, bar_size, fraction, MINI_BOSS_BAR_BACKGROUND, MINI_BOSS_BAR_FILL);
    }
}

impl Draw for CentipedeEnemy {
    fn draw<C: Canvas>(&self, canvas: &mut C, _textures: &Textures) {
        let radius = self.body.radius;
        let hit = self.body.state == HitState::Hit;

        // Tail first so the head ends up on top
        for segment in self.segments.iter().rev() {
            let color = if hit { HIT_TINT } else { segment.color };
            canvas.fill_circle(segment.pos, radius, color);
        }

        if let Some(head) = self.head() {
            let forward = head.dir.normalize_or_zero();
            let side = forward.perp();
            for eye in [side, -side] {
                let pos = head.pos + forward * (radius * 0.4) + eye * (radius * 0.35);
                canvas.fill_circle(pos, 4.0, Rgba::WHITE);
            }
        }
    }
}

impl Draw for FractalBoss {
    fn draw<C: Canvas>(&self, canvas: &mut C, _textures: &Textures) {
        let rotation = self.rotation;

        // Connectors go underneath the nodes. A destroyed child keeps its
        // connector so the structure stays readable.
        self.root.visit_active(self.body.pos, rotation, &mut |node, world| {
            for child in &node.children {
                canvas.line(world, child.world_position(world, rotation), CONNECTOR_COLOR);
            }
        });

        self.root.visit_active(self.body.pos, rotation, &mut |node, world| {
            let min = world - Vec2::splat(node.radius);
            let size = Vec2::splat(node.radius * 2.0);
            let fraction = node.health as f32 / node.max_health.max(1) as f32;
            canvas.fill_rect(min, size, health_tint(fraction));
            canvas.stroke_rect(min, size, NODE_OUTLINE);
            canvas.fill_circle(world, NODE_DOT_RADIUS, node.color);
        });

        canvas.fill_rect(self.body.pos - Vec2::splat(3.0), Vec2::splat(6.0), Rgba::WHITE);
    }
}

impl Draw for Bullet {
    fn draw<C: Canvas>(&self, canvas: &mut C, _textures: &Textures) {
        if !self.alive {
            return;
        }
        if self.kind.is_lobbed() {
            canvas.fill_circle(self.pos, self.radius * 1.5, self.color);
            return;
        }
        if self.kind == BulletKind::Sniper {
            canvas.line(self.pos - self.dir * 14.0, self.pos, self.color);
        }
        canvas.fill_circle(self.pos, self.radius, self.color);
    }
}

fn weapon_asset(weapon: &Weapon) -> Asset {
    match weapon.kind {
        WeaponKind::Pistol => match weapon.tier {
            WeaponTier::One => Asset::Pistol,
            WeaponTier::Two => Asset::Pistol2,
            WeaponTier::Three | WeaponTier::Four => Asset::Pistol3,
        },
        WeaponKind::Smg => Asset::Smg,
        WeaponKind::MeleeStick => Asset::BrickOnStick,
        WeaponKind::Shotgun => Asset::Shotgun,
        WeaponKind::Sniper => Asset::Sniper,
        WeaponKind::OrbitingBrick => Asset::Player,
    }
}

fn draw_brick<C: Canvas>(canvas: &mut C, textures: &Textures, asset: Asset, center: Vec2, rotation: f32) {
    match textures.get(asset) {
        Some(texture) => canvas.sprite(Sprite::new(texture, center, Vec2::splat(BRICK_HEAD_SIZE)).rotated(rotation)),
        None => {
            let half = Vec2::splat(BRICK_HEAD_SIZE * 0.5);
            canvas.fill_rect(center - half, half * 2.0, BRICK_COLOR);
        }
    }
}

fn draw_weapon<C: Canvas>(canvas: &mut C, textures: &Textures, weapon: &Weapon, mount: Vec2, aim: Vec2) {
    let asset = weapon_asset(weapon);
    match weapon.kind {
        WeaponKind::MeleeStick => {
            let tip = weapon.tip_position(mount, aim);
            if weapon.is_attacking() {
                canvas.line(mount, tip, STICK_COLOR);
            }
            draw_brick(canvas, textures, asset, tip, angle_of(aim));
        }
        WeaponKind::OrbitingBrick => draw_brick(canvas, textures, asset, mount, weapon.orbit_angle),
        _ => {
            match textures.get(asset) {
                Some(texture) => canvas.sprite(Sprite::new(texture, mount, WEAPON_SPRITE_SIZE).rotated(angle_of(aim))),
                None => canvas.line(mount, mount + aim * WEAPON_SPRITE_SIZE.y, GUN_COLOR),
            }
            if weapon.muzzle_flash > 0.0 {
                canvas.fill_circle(mount + weapon.last_shot_dir * MUZZLE_OFFSET, 5.0, MUZZLE_FLASH_COLOR);
            }
        }
    }
}

impl Draw for Player {
    fn draw<C: Canvas>(&self, canvas: &mut C, textures: &Textures) {
        match textures.get(Asset::Player) {
            Some(texture) => canvas.sprite(
                Sprite::new(texture, self.pos, Vec2::splat(self.radius * 2.5)).flipped(self.aim_dir.x < 0.0),
            ),
            None => {
                let half = Vec2::splat(self.radius);
                canvas.fill_rect(self.pos - half, half * 2.0, BRICK_COLOR);
            }
        }

        for (i, weapon) in self.weapons.iter().enumerate() {
            draw_weapon(canvas, textures, weapon, self.weapon_position(i), self.aim_dir);
        }
    }
}

impl Draw for Pickup {
    fn draw<C: Canvas>(&self, canvas: &mut C, _textures: &Textures) {
        if !self.alive {
            return;
        }
        match self.kind {
            PickupKind::Experience(_) => canvas.fill_circle(self.pos, self.radius, Rgba::rgb(80, 220, 120)),
            PickupKind::Material(_) => {
                let half = Vec2::splat(self.radius);
                canvas.fill_rect(self.pos - half, half * 2.0, Rgba::rgb(230, 150, 40));
            }
        }
    }
}

impl Draw for Booster {
    fn draw<C: Canvas>(&self, canvas: &mut C, textures: &Textures) {
        if !self.alive {
            return;
        }
        let asset = match self.kind {
            BoosterKind::SpeedUp => Asset::SpeedUpBooster,
            BoosterKind::Healing => Asset::HealingBooster,
        };
        match textures.get(asset) {
            Some(texture) => canvas.sprite(Sprite::new(texture, self.pos, Vec2::splat(self.radius * 2.0))),
            None => canvas.fill_circle(self.pos, self.radius, Rgba::YELLOW),
        }

        let remaining = self.remaining_fraction();
        let fill = if remaining > 0.5 {
            Rgba::rgb(0, 255, 0)
        } else if remaining > 0.25 {
            Rgba::YELLOW
        } else {
            Rgba::rgb(255, 0, 0)
        };
        let min = Vec2::new(
            self.pos.x - BOOSTER_BAR_SIZE.x * 0.5,
            self.pos.y + self.radius + BOOSTER_BAR_OFFSET,
        );
        progress_bar(canvas, min, BOOSTER_BAR_SIZE, remaining, BAR_BACKGROUND, fill);
    }
}

impl Draw for GameState {
    fn draw<C: Canvas>(&self, canvas: &mut C, textures: &Textures) {
        canvas.stroke_rect(Vec2::ZERO, self.arena_size(), ARENA_BORDER);
        for pickup in &self.pickups {
            pickup.draw(canvas, textures);
        }
        for booster in &self.boosters {
            booster.draw(canvas, textures);
        }
        for enemy in &self.enemies {
            enemy.draw(canvas, textures);
        }
        for bullet in &self.bullets {
            bullet.draw(canvas, textures);
        }
        self.player.draw(canvas, textures);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{DrawCall, FixedTextures, RecordingCanvas};
    use crate::sim::PlayerStats;
    use crate::sim::enemy::{EnemySpawn, MiniBossVariant};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn all_textures() -> Textures {
        Textures::load_all(&mut FixedTextures::everything())
    }

    #[test]
    fn test_health_tint_range() {
        assert_eq!(health_tint(1.0), Rgba::rgb(255, 150, 75));
        assert_eq!(health_tint(0.0), Rgba::rgb(55, 50, 25));
        assert_eq!(health_tint(7.0), health_tint(1.0));
    }

    #[test]
    fn test_fractal_draws_active_nodes_and_connectors() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut boss = FractalBoss::new(1, Vec2::new(500.0, 500.0), &mut rng);
        let mut canvas = RecordingCanvas::default();
        boss.draw(&mut canvas, &Textures::default());

        assert_eq!(canvas.lines(), 20);
        assert_eq!(canvas.circles(), 21);
        // 21 node squares + the center marker
        assert_eq!(canvas.rects().count(), 22);

        boss.root.children[0].children[0].take_damage(1000);
        canvas.clear();
        boss.draw(&mut canvas, &Textures::default());
        assert_eq!(canvas.lines(), 20);
        assert_eq!(canvas.circles(), 20);

        // A destroyed child takes its grandchildren off screen
        boss.root.children[1].take_damage(1000);
        canvas.clear();
        boss.draw(&mut canvas, &Textures::default());
        assert_eq!(canvas.lines(), 16);
        assert_eq!(canvas.circles(), 15);
        assert_eq!(canvas.rects().count(), 16);
    }

    #[test]
    fn test_boss_sprint_swaps_sprite() {
        let textures = all_textures();
        let mut boss = BossEnemy::new(1, Vec2::new(300.0, 300.0));
        let mut canvas = RecordingCanvas::default();

        boss.draw(&mut canvas, &textures);
        boss.sprinting = true;
        boss.draw(&mut canvas, &textures);

        let used: Vec<_> = canvas.sprites().map(|s| s.texture).collect();
        assert_eq!(used, vec![
            textures.get(Asset::Boss).expect("boss texture"),
            textures.get(Asset::BossRush).expect("rush texture"),
        ]);
    }

    #[test]
    fn test_missing_texture_falls_back_to_circle() {
        let enemy = Enemy::Basic(BasicEnemy::new(1, Vec2::new(100.0, 100.0), BasicKind::Pebblin));
        let mut canvas = RecordingCanvas::default();
        enemy.draw(&mut canvas, &Textures::default());
        assert_eq!(canvas.circles(), 1);
        assert_eq!(canvas.sprites().count(), 0);

        canvas.clear();
        enemy.draw(&mut canvas, &all_textures());
        assert_eq!(canvas.circles(), 0);
        assert_eq!(canvas.sprites().count(), 1);
    }

    #[test]
    fn test_mini_boss_health_bar() {
        let mut mini = MiniBossEnemy::new(1, Vec2::new(400.0, 400.0), MiniBossVariant::One, true);
        mini.body.health = mini.max_health() / 2;
        let mut canvas = RecordingCanvas::default();
        mini.draw(&mut canvas, &Textures::default());

        let bars: Vec<_> = canvas.rects().collect();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].1, Vec2::new(80.0, 8.0));
        assert!((bars[1].1.x - 40.0).abs() < 1e-4);
        assert_eq!(bars[1].2, MINI_BOSS_BAR_FILL);
    }

    #[test]
    fn test_booster_lifetime_bar() {
        let mut booster = Booster::new(1, BoosterKind::Healing, Vec2::new(50.0, 50.0), 5.0);
        booster.update(2.5);
        let mut canvas = RecordingCanvas::default();
        booster.draw(&mut canvas, &Textures::default());

        let bars: Vec<_> = canvas.rects().collect();
        assert_eq!(bars[0].2, BAR_BACKGROUND);
        assert!((bars[1].1.x - 20.0).abs() < 1e-4);
        assert_eq!(bars[1].2, Rgba::YELLOW);
    }

    #[test]
    fn test_melee_stick_extends_only_while_attacking() {
        let mut player = Player::new(Vec2::new(500.0, 500.0), PlayerStats::default(), 6);
        player.add_weapon(Weapon::new(WeaponKind::MeleeStick, WeaponTier::One));
        let mut canvas = RecordingCanvas::default();

        player.draw(&mut canvas, &Textures::default());
        assert_eq!(canvas.lines(), 0);

        // Fully extended
        player.weapons[0].attack_timer = 0.12;
        canvas.clear();
        player.draw(&mut canvas, &Textures::default());
        let mount = player.weapon_position(0);
        let reach = player.weapons[0].stats.range;
        let stick = canvas.calls.iter().find_map(|c| match c {
            DrawCall::Line { from, to, .. } => Some((*from, *to)),
            _ => None,
        });
        let (from, to) = stick.expect("stick line");
        assert_eq!(from, mount);
        assert!((to.distance(mount) - reach).abs() < 1e-2);
    }

    #[test]
    fn test_dead_entities_are_skipped() {
        let mut state = GameState::new(3);
        state.spawn_enemy(EnemySpawn::Boss, Vec2::new(200.0, 200.0));
        let mut canvas = RecordingCanvas::default();
        state.draw(&mut canvas, &Textures::default());
        let with_boss = canvas.calls.len();

        state.enemies[0].body_mut().alive = false;
        canvas.clear();
        state.draw(&mut canvas, &Textures::default());
        assert_eq!(canvas.calls.len(), with_boss - 1);
    }
}
