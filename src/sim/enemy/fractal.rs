//! Fractal boss: a rotating 4-ary tree of destructible nodes
//!
//! Nodes own their children by value. The tree is never pruned; a destroyed
//! node stays in place so the structure keeps its shape. It stops firing and
//! updating, and its whole subtree goes quiet with it: orphaned descendants
//! neither act nor render and can't be picked by the closest-node query, but
//! they still count as living and can still take random hits. The boss
//! aggregate health is derived from the living nodes every frame, and the
//! boss is defeated exactly when no node is left alive.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::EnemyBody;
use crate::sim::bullet::{Bullet, BulletKind};
use crate::{Rgba, rotate_offset, wrap_angle};

pub const DEFAULT_DEPTH: u32 = 2;
/// Deepest tree that will be generated (341 nodes)
pub const MAX_DEPTH: u32 = 4;
pub const DEFAULT_BASE_SIZE: f32 = 300.0;
/// Radians per second (about 45°/s)
pub const DEFAULT_ROTATION_SPEED: f32 = 0.785;

const ROOT_HEALTH: i32 = 100;
const SPEED: f32 = 50.0;
/// Broad-phase radius of the whole structure
const OUTER_RADIUS: f32 = 200.0;
const CONTACT_DAMAGE: i32 = 20;
const BULLET_RANGE: f32 = 500.0;
const HIT_DURATION: f32 = 0.2;
const FRAME_INTERVAL: f32 = 0.5;

/// Health of a child generated with `remaining` levels still to build
#[inline]
fn child_health(remaining: u32) -> i32 {
    40 + remaining as i32 * 20
}

/// Per-level node parameters: (radius, shoot interval, color)
fn level_params(level: u32) -> (f32, f32, Rgba) {
    match level {
        0 => (25.0, 0.8, Rgba::rgb(255, 100, 100)),
        1 => (20.0, 1.0, Rgba::rgb(100, 255, 100)),
        2 => (15.0, 1.2, Rgba::rgb(100, 100, 255)),
        3 => (12.0, 1.5, Rgba::rgb(255, 255, 100)),
        _ => (10.0, 2.0, Rgba::WHITE),
    }
}

fn level_bullet_kind(level: u32) -> BulletKind {
    match level {
        0 => BulletKind::FractalCenter,
        1 => BulletKind::FractalLevel1,
        2 => BulletKind::FractalLevel2,
        _ => BulletKind::BossBullet,
    }
}

/// One destructible unit of the fractal structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FractalNode {
    /// Offset from the parent before rotation
    pub local_offset: Vec2,
    pub children: Vec<FractalNode>,
    pub shoot_timer: f32,
    pub shoot_interval: f32,
    pub health: i32,
    pub max_health: i32,
    pub alive: bool,
    pub radius: f32,
    /// Generation depth: 0 for the root, 1 for its children, and so on
    pub level: u32,
    pub color: Rgba,
}

impl FractalNode {
    pub fn new(local_offset: Vec2, health: i32, level: u32, rng: &mut impl Rng) -> Self {
        let (radius, shoot_interval, color) = level_params(level);
        Self {
            local_offset,
            children: Vec::new(),
            // Desync nodes so they don't fire in volleys
            shoot_timer: rng.random::<f32>() * shoot_interval,
            shoot_interval,
            health,
            max_health: health,
            alive: true,
            radius,
            level,
            color,
        }
    }

    /// Bullet damage for this node's level
    pub fn bullet_damage(&self) -> i32 {
        8 + self.level as i32 * 2
    }

    pub fn bullet_speed(&self) -> f32 {
        300.0 + self.level as f32 * 50.0
    }

    #[inline]
    pub fn world_position(&self, parent_pos: Vec2, rotation: f32) -> Vec2 {
        parent_pos + rotate_offset(self.local_offset, rotation)
    }

    pub fn update(&mut self, dt: f32, parent_pos: Vec2, rotation: f32, player_pos: Vec2, bullets: &mut Vec<Bullet>) {
        if !self.alive {
            return;
        }
        let world = self.world_position(parent_pos, rotation);

        self.shoot_timer += dt;
        if self.shoot_timer >= self.shoot_interval {
            self.shoot_timer = 0.0;
            let to_player = player_pos - world;
            if to_player.length() > 1.0 {
                bullets.push(
                    Bullet::new(
                        world,
                        to_player,
                        self.bullet_damage(),
                        BULLET_RANGE,
                        self.bullet_speed(),
                        level_bullet_kind(self.level),
                        true,
                    )
                    .with_color(self.color),
                );
            }
        }

        for child in &mut self.children {
            child.update(dt, world, rotation, player_pos, bullets);
        }
    }

    /// Returns true if this call destroyed the node
    pub fn take_damage(&mut self, damage: i32) -> bool {
        if !self.alive {
            return false;
        }
        self.health -= damage;
        if self.health <= 0 {
            self.health = 0;
            self.alive = false;
            log::debug!("Fractal node level {} destroyed", self.level);
            return true;
        }
        false
    }

    /// Sum of health over living nodes in this subtree
    pub fn total_health(&self) -> i32 {
        let own = if self.alive { self.health } else { 0 };
        own + self.children.iter().map(FractalNode::total_health).sum::<i32>()
    }

    pub fn count_living(&self) -> usize {
        let own = usize::from(self.alive);
        own + self.children.iter().map(FractalNode::count_living).sum::<usize>()
    }

    pub fn count_nodes(&self) -> usize {
        1 + self.children.iter().map(FractalNode::count_nodes).sum::<usize>()
    }

    /// The `n`th living node in pre-order. `n` counts down as nodes are skipped.
    pub fn nth_living_mut(&mut self, n: &mut usize) -> Option<&mut FractalNode> {
        if self.alive {
            if *n == 0 {
                return Some(self);
            }
            *n -= 1;
        }
        for child in &mut self.children {
            if let Some(found) = child.nth_living_mut(n) {
                return Some(found);
            }
        }
        None
    }

    /// Child-index path of the nearest living node whose radius contains `point`.
    ///
    /// `min_distance` is the best distance found so far across the whole
    /// traversal; `path` is the path of `self` from the root.
    pub fn find_closest(
        &self,
        point: Vec2,
        parent_pos: Vec2,
        rotation: f32,
        min_distance: &mut f32,
        path: &mut Vec<usize>,
    ) -> Option<Vec<usize>> {
        if !self.alive {
            return None;
        }
        let world = self.world_position(parent_pos, rotation);
        let mut closest = None;

        let distance = world.distance(point);
        if distance <= self.radius && distance < *min_distance {
            *min_distance = distance;
            closest = Some(path.clone());
        }

        for (i, child) in self.children.iter().enumerate() {
            path.push(i);
            if let Some(found) = child.find_closest(point, world, rotation, min_distance, path) {
                closest = Some(found);
            }
            path.pop();
        }

        closest
    }

    pub fn node_at_mut(&mut self, path: &[usize]) -> Option<&mut FractalNode> {
        match path.split_first() {
            None => Some(self),
            Some((&i, rest)) => self.children.get_mut(i)?.node_at_mut(rest),
        }
    }

    /// Visit the living nodes reachable through living parents, parents first
    pub fn visit_active(&self, parent_pos: Vec2, rotation: f32, f: &mut impl FnMut(&FractalNode, Vec2)) {
        if !self.alive {
            return;
        }
        let world = self.world_position(parent_pos, rotation);
        f(self, world);
        for child in &self.children {
            child.visit_active(world, rotation, f);
        }
    }

    /// Visit every node (living or not) with its world position, parents first
    pub fn visit(&self, parent_pos: Vec2, rotation: f32, f: &mut impl FnMut(&FractalNode, Vec2)) {
        let world = self.world_position(parent_pos, rotation);
        f(self, world);
        for child in &self.children {
            child.visit(world, rotation, f);
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FractalBoss {
    /// `body.health` is derived from the living nodes
    pub body: EnemyBody,
    pub root: FractalNode,
    /// Shared rotation angle in [0, 2π)
    pub rotation: f32,
    pub rotation_speed: f32,
    pub depth: u32,
    pub base_size: f32,
    pub total_nodes: usize,
    max_health: i32,
}

impl FractalBoss {
    pub fn new(id: u32, pos: Vec2, rng: &mut impl Rng) -> Self {
        Self::with_params(id, pos, DEFAULT_DEPTH, DEFAULT_BASE_SIZE, DEFAULT_ROTATION_SPEED, rng)
    }

    pub fn with_params(
        id: u32,
        pos: Vec2,
        depth: u32,
        base_size: f32,
        rotation_speed: f32,
        rng: &mut impl Rng,
    ) -> Self {
        let depth = if depth > MAX_DEPTH {
            log::warn!("Fractal depth {depth} clamped to {MAX_DEPTH}");
            MAX_DEPTH
        } else {
            depth
        };
        let mut root = FractalNode::new(Vec2::ZERO, ROOT_HEALTH, 0, rng);
        generate(&mut root, depth, base_size, rng);

        let total_nodes = root.count_living();
        let max_health = root.total_health();
        log::info!("Fractal boss {id} created with {total_nodes} nodes and {max_health} health");

        Self {
            body: EnemyBody::new(id, pos, OUTER_RADIUS, max_health, SPEED, CONTACT_DAMAGE),
            root,
            rotation: 0.0,
            rotation_speed,
            depth,
            base_size,
            total_nodes,
            max_health,
        }
    }

    pub fn max_health(&self) -> i32 {
        self.max_health
    }

    pub fn living_nodes(&self) -> usize {
        self.root.count_living()
    }

    pub fn update(&mut self, dt: f32, player_pos: Vec2, bullets: &mut Vec<Bullet>) {
        if !self.body.alive {
            return;
        }
        self.body.chase(player_pos, dt);
        self.rotation = wrap_angle(self.rotation + self.rotation_speed * dt);
        self.root.update(dt, self.body.pos, self.rotation, player_pos, bullets);
        self.sync_health();
        self.body.animate(dt, HIT_DURATION, FRAME_INTERVAL);
    }

    /// Recompute aggregate health; living-node count is the only death condition
    pub fn sync_health(&mut self) {
        let living = self.root.count_living();
        if living == 0 {
            if self.body.alive {
                log::info!("Fractal boss {} defeated", self.body.id);
            }
            self.body.alive = false;
            self.body.health = 0;
            return;
        }
        if self.body.health <= 0 {
            log::debug!(
                "Fractal boss {} health resynced with {living} living nodes",
                self.body.id
            );
        }
        self.body.health = self.root.total_health();
    }

    /// Damage one uniformly random living node. Returns true if the boss died.
    pub fn take_damage(&mut self, damage: i32, rng: &mut impl Rng) -> bool {
        if !self.body.alive {
            return false;
        }
        let living = self.root.count_living();
        if living > 0 {
            let mut n = rng.random_range(0..living);
            if let Some(node) = self.root.nth_living_mut(&mut n) {
                node.take_damage(damage);
                log::trace!("Fractal node level {} now at {} health", node.level, node.health);
            }
        }
        self.body.mark_hit();
        self.sync_health();
        !self.body.alive
    }

    /// Path to the nearest living node containing `point`
    pub fn find_hit_node(&self, point: Vec2) -> Option<Vec<usize>> {
        let mut min_distance = f32::MAX;
        self.root
            .find_closest(point, self.body.pos, self.rotation, &mut min_distance, &mut Vec::new())
    }

    /// Damage the node under `point`, if any. `Some(true)` means the boss died.
    pub fn damage_at(&mut self, point: Vec2, damage: i32) -> Option<bool> {
        if !self.body.alive {
            return None;
        }
        let path = self.find_hit_node(point)?;
        self.root.node_at_mut(&path)?.take_damage(damage);
        self.body.mark_hit();
        self.sync_health();
        Some(!self.body.alive)
    }

    /// Whether a circle touches any living node. Orphaned nodes stay solid so
    /// the boss can always be finished off.
    pub fn overlaps(&self, point: Vec2, radius: f32) -> bool {
        let mut hit = false;
        self.root.visit(self.body.pos, self.rotation, &mut |node, world| {
            if node.alive && world.distance(point) <= node.radius + radius {
                hit = true;
            }
        });
        hit
    }
}

/// Attach four children at the corners of a square, recursing `remaining` levels
fn generate(node: &mut FractalNode, remaining: u32, size: f32, rng: &mut impl Rng) {
    if remaining == 0 {
        return;
    }
    let offset = size / 3.0;
    let health = child_health(remaining);
    let level = node.level + 1;
    let corners = [
        Vec2::new(-offset, -offset),
        Vec2::new(offset, -offset),
        Vec2::new(-offset, offset),
        Vec2::new(offset, offset),
    ];
    node.children = corners
        .into_iter()
        .map(|corner| FractalNode::new(corner, health, level, rng))
        .collect();
    for child in &mut node.children {
        generate(child, remaining - 1, size * 0.5, rng);
    }
}
