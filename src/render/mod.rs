//! Draw-call boundary toward an external rendering layer
//!
//! The simulation never touches a graphics API. Entities describe themselves
//! through [`Draw`] as a handful of primitive calls on a [`Canvas`]; textures
//! are resolved once through a [`TextureSource`] and looked up by [`Asset`].

mod draw;

use std::collections::HashMap;

use glam::Vec2;
use thiserror::Error;

use crate::Rgba;

pub use draw::{BAR_BACKGROUND, BAR_BORDER, Draw, health_tint};

/// Opaque handle handed out by a [`TextureSource`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset not found: {0}")]
    NotFound(String),
    #[error("failed to decode {path}: {reason}")]
    Decode { path: String, reason: String },
}

/// Something that can turn an asset path into a texture
pub trait TextureSource {
    fn load(&mut self, path: &str) -> Result<TextureId, AssetError>;
}

/// A textured quad
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub texture: TextureId,
    pub center: Vec2,
    pub size: Vec2,
    /// Radians, counter-clockwise
    pub rotation: f32,
    pub flip_x: bool,
    pub tint: Rgba,
}

impl Sprite {
    pub fn new(texture: TextureId, center: Vec2, size: Vec2) -> Self {
        Self {
            texture,
            center,
            size,
            rotation: 0.0,
            flip_x: false,
            tint: Rgba::WHITE,
        }
    }

    pub fn rotated(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn flipped(mut self, flip_x: bool) -> Self {
        self.flip_x = flip_x;
        self
    }

    pub fn tinted(mut self, tint: Rgba) -> Self {
        self.tint = tint;
        self
    }
}

/// Primitive drawing surface implemented by the rendering layer
pub trait Canvas {
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);
    /// Axis-aligned rectangle from its top-left corner
    fn fill_rect(&mut self, min: Vec2, size: Vec2, color: Rgba);
    fn stroke_rect(&mut self, min: Vec2, size: Vec2, color: Rgba);
    fn line(&mut self, from: Vec2, to: Vec2, color: Rgba);
    fn sprite(&mut self, sprite: Sprite);
}

/// Every texture the game knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Asset {
    Player,
    Pebblin,
    Slime,
    Crawler,
    Boss,
    BossRush,
    MiniBoss,
    Pistol,
    Pistol2,
    Pistol3,
    Smg,
    BrickOnStick,
    Shotgun,
    Sniper,
    SpeedUpBooster,
    HealingBooster,
}

impl Asset {
    pub const ALL: [Asset; 16] = [
        Asset::Player,
        Asset::Pebblin,
        Asset::Slime,
        Asset::Crawler,
        Asset::Boss,
        Asset::BossRush,
        Asset::MiniBoss,
        Asset::Pistol,
        Asset::Pistol2,
        Asset::Pistol3,
        Asset::Smg,
        Asset::BrickOnStick,
        Asset::Shotgun,
        Asset::Sniper,
        Asset::SpeedUpBooster,
        Asset::HealingBooster,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Asset::Player => "assets/character/brick.png",
            Asset::Pebblin => "assets/enemies/pebblin.png",
            Asset::Slime => "assets/enemies/slime.png",
            Asset::Crawler => "assets/enemies/crawler.png",
            Asset::Boss => "assets/enemies/bossT.png",
            Asset::BossRush => "assets/enemies/bossT_rush.png",
            Asset::MiniBoss => "assets/enemies/miniboss.png",
            Asset::Pistol => "assets/weapons/pistol.png",
            Asset::Pistol2 => "assets/weapons/pistol2.png",
            Asset::Pistol3 => "assets/weapons/pistol3.png",
            Asset::Smg => "assets/weapons/smg.png",
            Asset::BrickOnStick => "assets/weapons/brickonstick.png",
            Asset::Shotgun => "assets/weapons/shotgun.png",
            Asset::Sniper => "assets/weapons/sniper2.png",
            Asset::SpeedUpBooster => "assets/ui/speed_up_booster.png",
            Asset::HealingBooster => "assets/ui/healing_booster.png",
        }
    }
}

/// Texture cache. A failed load is remembered as missing, and drawing
/// code falls back to plain shapes for it.
#[derive(Debug, Clone, Default)]
pub struct Textures {
    loaded: HashMap<Asset, Option<TextureId>>,
}

impl Textures {
    /// Resolve every known asset through `source`
    pub fn load_all(source: &mut impl TextureSource) -> Self {
        let mut loaded = HashMap::with_capacity(Asset::ALL.len());
        for asset in Asset::ALL {
            let texture = match source.load(asset.path()) {
                Ok(texture) => Some(texture),
                Err(e) => {
                    log::warn!("Texture unavailable, using fallback shape: {e}");
                    None
                }
            };
            loaded.insert(asset, texture);
        }
        log::info!(
            "Loaded {}/{} textures",
            loaded.values().filter(|t| t.is_some()).count(),
            Asset::ALL.len()
        );
        Self { loaded }
    }

    pub fn get(&self, asset: Asset) -> Option<TextureId> {
        self.loaded.get(&asset).copied().flatten()
    }

    pub fn missing(&self) -> impl Iterator<Item = Asset> + '_ {
        Asset::ALL.into_iter().filter(|asset| self.get(*asset).is_none())
    }
}

/// One recorded canvas call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Circle { center: Vec2, radius: f32, color: Rgba },
    Rect { min: Vec2, size: Vec2, color: Rgba },
    StrokeRect { min: Vec2, size: Vec2, color: Rgba },
    Line { from: Vec2, to: Vec2, color: Rgba },
    Sprite(Sprite),
}

/// Canvas that only records calls (headless runs and tests)
#[derive(Debug, Clone, Default)]
pub struct RecordingCanvas {
    pub calls: Vec<DrawCall>,
}

impl RecordingCanvas {
    pub fn clear(&mut self) {
        self.calls.clear();
    }

    pub fn circles(&self) -> usize {
        self.calls.iter().filter(|c| matches!(c, DrawCall::Circle { .. })).count()
    }

    pub fn rects(&self) -> impl Iterator<Item = (Vec2, Vec2, Rgba)> + '_ {
        self.calls.iter().filter_map(|c| match c {
            DrawCall::Rect { min, size, color } => Some((*min, *size, *color)),
            _ => None,
        })
    }

    pub fn lines(&self) -> usize {
        self.calls.iter().filter(|c| matches!(c, DrawCall::Line { .. })).count()
    }

    pub fn sprites(&self) -> impl Iterator<Item = &Sprite> {
        self.calls.iter().filter_map(|c| match c {
            DrawCall::Sprite(sprite) => Some(sprite),
            _ => None,
        })
    }
}

impl Canvas for RecordingCanvas {
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.calls.push(DrawCall::Circle { center, radius, color });
    }

    fn fill_rect(&mut self, min: Vec2, size: Vec2, color: Rgba) {
        self.calls.push(DrawCall::Rect { min, size, color });
    }

    fn stroke_rect(&mut self, min: Vec2, size: Vec2, color: Rgba) {
        self.calls.push(DrawCall::StrokeRect { min, size, color });
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Rgba) {
        self.calls.push(DrawCall::Line { from, to, color });
    }

    fn sprite(&mut self, sprite: Sprite) {
        self.calls.push(DrawCall::Sprite(sprite));
    }
}

/// Texture source that hands out sequential ids for a fixed set of paths
#[derive(Debug, Clone, Default)]
pub struct FixedTextures {
    available: Vec<&'static str>,
}

impl FixedTextures {
    pub fn new(available: &[&'static str]) -> Self {
        Self {
            available: available.to_vec(),
        }
    }

    pub fn everything() -> Self {
        Self::new(&Asset::ALL.map(Asset::path))
    }
}

impl TextureSource for FixedTextures {
    fn load(&mut self, path: &str) -> Result<TextureId, AssetError> {
        self.available
            .iter()
            .position(|p| *p == path)
            .map(|i| TextureId(i as u32))
            .ok_or_else(|| AssetError::NotFound(path.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CorruptPng;

    impl TextureSource for CorruptPng {
        fn load(&mut self, path: &str) -> Result<TextureId, AssetError> {
            Err(AssetError::Decode {
                path: path.to_string(),
                reason: "bad header".to_string(),
            })
        }
    }

    #[test]
    fn test_missing_textures_are_remembered() {
        let mut source = FixedTextures::new(&["assets/character/brick.png", "assets/enemies/bossT.png"]);
        let textures = Textures::load_all(&mut source);

        assert_eq!(textures.get(Asset::Player), Some(TextureId(0)));
        assert_eq!(textures.get(Asset::Boss), Some(TextureId(1)));
        assert_eq!(textures.get(Asset::BossRush), None);
        assert_eq!(textures.missing().count(), Asset::ALL.len() - 2);
    }

    #[test]
    fn test_decode_failure_is_not_fatal() {
        let textures = Textures::load_all(&mut CorruptPng);
        assert_eq!(textures.missing().count(), Asset::ALL.len());
    }

    #[test]
    fn test_everything_loads() {
        let textures = Textures::load_all(&mut FixedTextures::everything());
        assert_eq!(textures.missing().count(), 0);
        assert!(Textures::default().get(Asset::Smg).is_none());
    }

    #[test]
    fn test_asset_error_messages() {
        let err = AssetError::NotFound("assets/x.png".to_string());
        assert_eq!(err.to_string(), "asset not found: assets/x.png");
    }
}
