//! Centipede: a chain of segments that steps on a grid toward the player
//!
//! The head moves one spacing along the dominant axis every movement tick and
//! each trailing segment takes the previous segment's pre-move position.
//! Damage trims segments from the tail in proportion to health lost.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::EnemyBody;
use crate::Rgba;
use crate::sim::bullet::{Bullet, BulletKind};

pub const INITIAL_SEGMENTS: usize = 10;
pub const SEGMENT_SPACING: f32 = 50.0;
/// Seconds between grid steps at full length
pub const MOVEMENT_TIMER: f32 = 0.6;
/// Speed gained per lost segment
pub const SPEED_PER_LOST_SEGMENT: f32 = 0.1;
pub const BASE_FIRE_COOLDOWN: f32 = 2.0;
/// Width of the random window added to the base cooldown
pub const FIRE_COOLDOWN_JITTER: f32 = 1.0;

const MAX_HEALTH: i32 = 1000;
const SEGMENT_RADIUS: f32 = 30.0;
const CONTACT_DAMAGE: i32 = 8;
const BULLET_DAMAGE: i32 = 10;
const BULLET_RANGE: f32 = 500.0;
const BULLET_SPEED: f32 = 250.0;
const HIT_DURATION: f32 = 0.3;
const FRAME_INTERVAL: f32 = 0.5;

const SEGMENT_PALETTE: [Rgba; 6] = [
    Rgba::rgb(255, 100, 100),
    Rgba::rgb(100, 255, 100),
    Rgba::rgb(100, 100, 255),
    Rgba::rgb(255, 255, 100),
    Rgba::rgb(255, 100, 255),
    Rgba::rgb(100, 255, 255),
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CentipedeSegment {
    pub pos: Vec2,
    /// Last grid step direction (unit axis vector)
    pub dir: Vec2,
    pub since_shot: f32,
    /// Cooldown window for the next shot
    pub fire_cooldown: f32,
    pub color: Rgba,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CentipedeEnemy {
    /// `body.pos` mirrors the head position
    pub body: EnemyBody,
    /// segments[0] is the head
    pub segments: Vec<CentipedeSegment>,
    pub movement_timer: f32,
    pub segments_lost: usize,
}

impl CentipedeEnemy {
    /// Lay the chain out vertically below `pos`, head first
    pub fn new(id: u32, pos: Vec2, rng: &mut impl Rng) -> Self {
        let segments = (0..INITIAL_SEGMENTS)
            .map(|i| CentipedeSegment {
                pos: Vec2::new(pos.x, pos.y + i as f32 * SEGMENT_SPACING),
                dir: Vec2::X,
                since_shot: i as f32 * 0.3,
                fire_cooldown: roll_fire_cooldown(rng),
                color: SEGMENT_PALETTE[rng.random_range(0..SEGMENT_PALETTE.len())],
            })
            .collect();

        Self {
            body: EnemyBody::new(id, pos, SEGMENT_RADIUS, MAX_HEALTH, 0.0, CONTACT_DAMAGE),
            segments,
            movement_timer: 0.0,
            segments_lost: 0,
        }
    }

    pub fn max_health(&self) -> i32 {
        MAX_HEALTH
    }

    /// 1.0 at full length, +10% per lost segment
    pub fn speed_multiplier(&self) -> f32 {
        1.0 + self.segments_lost as f32 * SPEED_PER_LOST_SEGMENT
    }

    /// Seconds between grid steps at the current length
    pub fn step_interval(&self) -> f32 {
        MOVEMENT_TIMER / self.speed_multiplier()
    }

    pub fn head(&self) -> Option<&CentipedeSegment> {
        self.segments.first()
    }

    pub fn update(&mut self, dt: f32, player_pos: Vec2, bullets: &mut Vec<Bullet>, rng: &mut impl Rng) {
        self.update_movement(dt, player_pos);
        self.update_shooting(dt, player_pos, bullets, rng);
        self.body.animate(dt, HIT_DURATION, FRAME_INTERVAL);
    }

    fn update_movement(&mut self, dt: f32, player_pos: Vec2) {
        self.movement_timer += dt;
        if self.movement_timer < self.step_interval() || self.segments.is_empty() {
            return;
        }
        self.movement_timer = 0.0;

        let step = grid_step_toward(self.segments[0].pos, player_pos);
        let mut previous = self.segments[0].pos;
        self.segments[0].dir = step;
        self.segments[0].pos += step * SEGMENT_SPACING;

        for segment in self.segments.iter_mut().skip(1) {
            let before_move = segment.pos;
            segment.dir = (previous - before_move).normalize_or_zero();
            segment.pos = previous;
            previous = before_move;
        }

        self.body.pos = self.segments[0].pos;
        self.body.facing_right = step.x > 0.0;
    }

    fn update_shooting(&mut self, dt: f32, player_pos: Vec2, bullets: &mut Vec<Bullet>, rng: &mut impl Rng) {
        for segment in &mut self.segments {
            segment.since_shot += dt;
            if segment.since_shot < segment.fire_cooldown {
                continue;
            }
            segment.since_shot = 0.0;
            segment.fire_cooldown = roll_fire_cooldown(rng);

            let to_player = player_pos - segment.pos;
            if to_player.length() > 1.0 {
                bullets.push(
                    Bullet::new(
                        segment.pos,
                        to_player,
                        BULLET_DAMAGE,
                        BULLET_RANGE,
                        BULLET_SPEED,
                        BulletKind::Centipede,
                        true,
                    )
                    .with_color(segment.color),
                );
            }
        }
    }

    /// Segment count matching the current health fraction (rounded down)
    pub fn target_segments(&self) -> usize {
        let fraction = (self.body.health.max(0) as f32 / MAX_HEALTH as f32).clamp(0.0, 1.0);
        (INITIAL_SEGMENTS as f32 * fraction) as usize
    }

    /// Returns true if this hit killed the centipede
    pub fn take_damage(&mut self, damage: i32) -> bool {
        if !self.body.alive {
            return false;
        }
        self.body.health -= damage;
        self.body.mark_hit();

        let target = self.target_segments();
        while self.segments.len() > target {
            self.segments.pop();
            self.segments_lost += 1;
        }

        if self.segments.is_empty() || self.body.health <= 0 {
            self.body.health = self.body.health.max(0);
            self.body.alive = false;
            log::debug!("Centipede {} destroyed", self.body.id);
            return true;
        }
        false
    }

    /// Whether a circle touches any segment
    pub fn overlaps(&self, point: Vec2, radius: f32) -> bool {
        self.segments
            .iter()
            .any(|s| s.pos.distance(point) <= SEGMENT_RADIUS + radius)
    }
}

/// One axis-aligned unit step toward `target` along the dominant axis
pub fn grid_step_toward(from: Vec2, target: Vec2) -> Vec2 {
    let diff = target - from;
    if diff.x.abs() > diff.y.abs() {
        Vec2::new(diff.x.signum(), 0.0)
    } else if diff.y > 0.0 {
        Vec2::Y
    } else {
        Vec2::NEG_Y
    }
}

fn roll_fire_cooldown(rng: &mut impl Rng) -> f32 {
    BASE_FIRE_COOLDOWN + rng.random::<f32>() * FIRE_COOLDOWN_JITTER
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn centipede() -> (CentipedeEnemy, Pcg32) {
        let mut rng = Pcg32::seed_from_u64(11);
        (CentipedeEnemy::new(1, Vec2::new(500.0, 100.0), &mut rng), rng)
    }

    #[test]
    fn test_initial_layout() {
        let (c, _) = centipede();
        assert_eq!(c.segments.len(), INITIAL_SEGMENTS);
        assert_eq!(c.body.pos, c.segments[0].pos);
        for pair in c.segments.windows(2) {
            assert!((pair[0].pos.distance(pair[1].pos) - SEGMENT_SPACING).abs() < 1e-4);
        }
    }

    #[test]
    fn test_grid_step_picks_dominant_axis() {
        assert_eq!(grid_step_toward(Vec2::ZERO, Vec2::new(10.0, 3.0)), Vec2::X);
        assert_eq!(grid_step_toward(Vec2::ZERO, Vec2::new(-10.0, 3.0)), Vec2::NEG_X);
        assert_eq!(grid_step_toward(Vec2::ZERO, Vec2::new(2.0, 9.0)), Vec2::Y);
        assert_eq!(grid_step_toward(Vec2::ZERO, Vec2::new(2.0, -9.0)), Vec2::NEG_Y);
    }

    #[test]
    fn test_snake_follow_takes_previous_positions() {
        let (mut c, mut rng) = centipede();
        let before: Vec<Vec2> = c.segments.iter().map(|s| s.pos).collect();
        let mut bullets = Vec::new();
        c.update(MOVEMENT_TIMER + 0.01, Vec2::new(2000.0, 100.0), &mut bullets, &mut rng);

        assert_eq!(c.segments[0].pos, before[0] + Vec2::X * SEGMENT_SPACING);
        for i in 1..c.segments.len() {
            assert_eq!(c.segments[i].pos, before[i - 1]);
        }
        assert_eq!(c.body.pos, c.segments[0].pos);
    }

    #[test]
    fn test_no_step_before_timer() {
        let (mut c, mut rng) = centipede();
        let head = c.segments[0].pos;
        let mut bullets = Vec::new();
        c.update(MOVEMENT_TIMER * 0.5, Vec2::new(2000.0, 100.0), &mut bullets, &mut rng);
        assert_eq!(c.segments[0].pos, head);
    }

    #[test]
    fn test_half_health_halves_segments() {
        let (mut c, _) = centipede();
        assert!(!c.take_damage(MAX_HEALTH / 2));
        assert_eq!(c.segments.len(), INITIAL_SEGMENTS / 2);
        assert_eq!(c.segments_lost, INITIAL_SEGMENTS / 2);
        assert!((c.speed_multiplier() - 1.5).abs() < 1e-5);
        assert!(c.step_interval() < MOVEMENT_TIMER);
    }

    #[test]
    fn test_trim_from_tail_keeps_head() {
        let (mut c, _) = centipede();
        let head = c.segments[0].pos;
        let third = c.segments[2].pos;
        c.take_damage(700);
        assert_eq!(c.segments.len(), 3);
        assert_eq!(c.segments[0].pos, head);
        assert_eq!(c.segments[2].pos, third);
    }

    #[test]
    fn test_dies_when_segments_run_out() {
        let (mut c, _) = centipede();
        // 95 HP left rounds down to zero segments
        assert!(c.take_damage(905));
        assert!(c.segments.is_empty());
        assert!(!c.body.alive);
    }

    #[test]
    fn test_segments_fire_in_own_color() {
        let (mut c, mut rng) = centipede();
        let mut bullets = Vec::new();
        for _ in 0..40 {
            c.update(0.1, Vec2::new(500.0, -800.0), &mut bullets, &mut rng);
        }
        assert!(!bullets.is_empty());
        assert!(bullets.iter().all(|b| b.kind == BulletKind::Centipede && b.enemy_owned));
        assert!(bullets.iter().all(|b| SEGMENT_PALETTE.contains(&b.color)));
    }

    proptest! {
        #[test]
        fn prop_segments_never_increase(hits in proptest::collection::vec(1i32..200, 1..40), seed in any::<u64>()) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut c = CentipedeEnemy::new(1, Vec2::ZERO, &mut rng);
            let mut last = c.segments.len();
            for hit in hits {
                c.take_damage(hit);
                prop_assert!(c.segments.len() <= last);
                prop_assert!(c.segments.len() <= c.target_segments());
                last = c.segments.len();
                if !c.body.alive {
                    prop_assert!(c.segments.is_empty() || c.body.health <= 0);
                    break;
                }
            }
        }
    }
}
