//! Brick Arena - entity simulation core for a top-down arcade survival shooter
//!
//! Core modules:
//! - `sim`: Simulation (player, weapons, enemies, projectiles, collisions)
//! - `render`: Draw-call boundary toward an external rendering layer
//! - `tuning`: Data-driven game balance

pub mod render;
pub mod sim;
pub mod tuning;

pub use tuning::{Tuning, TuningError};

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;

    /// Default arena dimensions (pixels)
    pub const ARENA_WIDTH: f32 = 1920.0;
    pub const ARENA_HEIGHT: f32 = 1080.0;

    /// Player body radius
    pub const PLAYER_RADIUS: f32 = 20.0;
    /// Radius of the ring weapons are mounted on around the player
    pub const WEAPON_RING_RADIUS: f32 = 50.0;
    /// Aim targets closer than this keep the previous aim direction
    pub const MIN_AIM_DISTANCE: f32 = 0.1;
    /// Direction vectors shorter than this are treated as "no direction"
    pub const MIN_DIRECTION_LENGTH: f32 = 1e-4;

    /// Health regeneration is applied once per this many seconds
    pub const REGEN_INTERVAL: f32 = 1.0;
    /// Lower bound on the attack-speed divisor used for fire intervals
    pub const MIN_FIRE_RATE_DIVISOR: f32 = 0.1;
}

/// Straight RGBA color, 8 bits per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const YELLOW: Rgba = Rgba::rgb(255, 255, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// Wrap an angle into [0, 2π)
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    use std::f32::consts::TAU;
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Rotate a local offset by `angle` radians (counter-clockwise in math space)
#[inline]
pub fn rotate_offset(offset: Vec2, angle: f32) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(offset.x * cos - offset.y * sin, offset.x * sin + offset.y * cos)
}

/// Unit vector pointing along `angle`
#[inline]
pub fn direction_from_angle(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    direction_from_angle(theta) * r
}

/// Angle of a direction vector
#[inline]
pub fn angle_of(dir: Vec2) -> f32 {
    dir.y.atan2(dir.x)
}
