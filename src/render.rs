//! Render snapshot
//!
//! The simulation never draws. Each frame the host captures a `Frame`: a flat,
//! back-to-front list of screen-space sprites plus HUD values, and hands it to
//! whatever renderer it owns. Asset loading is the renderer's job; every
//! sprite key carries a fallback color so a missing image never blanks a frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::{Camera, GamePhase, GameSession, Gender, Rect};

/// What a sprite depicts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpriteKey {
    Wall,
    Gate,
    Pickup,
    Pursuer,
    Player(Gender),
}

impl SpriteKey {
    /// Image the renderer should try first; walls and the gate are drawn
    /// procedurally
    pub fn asset_file(&self) -> Option<&'static str> {
        match self {
            SpriteKey::Player(Gender::Male) => Some("assets/boy.png"),
            SpriteKey::Player(Gender::Female) => Some("assets/girl.png"),
            SpriteKey::Pursuer => Some("assets/hod.png"),
            SpriteKey::Pickup => Some("assets/note.png"),
            SpriteKey::Wall | SpriteKey::Gate => None,
        }
    }

    /// Solid RGB fill used when the image is missing
    pub fn fallback_color(&self) -> [u8; 3] {
        match self {
            SpriteKey::Wall => [30, 60, 200],
            SpriteKey::Gate => [255, 215, 0],
            SpriteKey::Pickup => [50, 205, 50],
            SpriteKey::Pursuer => [220, 20, 60],
            SpriteKey::Player(Gender::Male) => [0, 0, 255],
            SpriteKey::Player(Gender::Female) => [255, 100, 100],
        }
    }
}

/// One drawable, already in screen space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub key: SpriteKey,
    pub rect: Rect,
}

/// HUD values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hud {
    pub name: String,
    pub gender: Gender,
    pub score: u64,
    pub level: u32,
    pub lives: u8,
    pub phase: GamePhase,
    pub boosted: bool,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Size of the drawable area
    pub screen: Vec2,
    pub camera_offset: Vec2,
    /// Back to front: walls, gate, pickups, pursuer, player
    pub sprites: Vec<Sprite>,
    pub hud: Hud,
}

impl Frame {
    /// Snapshot the session after a tick
    pub fn capture(session: &GameSession) -> Self {
        let config = &session.config;
        let screen = session.camera.map_or_else(
            || config.viewport.unwrap_or_else(|| config.map_size()),
            |camera| camera.viewport,
        );
        let camera = session
            .camera
            .unwrap_or_else(|| Camera::new(screen, config.map_size()));

        let hud = Hud {
            name: session.profile.display_name().to_string(),
            gender: session.profile.gender,
            score: session.score,
            level: session.level,
            lives: session.lives,
            phase: session.phase,
            boosted: session.player().is_some_and(|p| p.is_boosted()),
        };

        let mut sprites = Vec::new();
        let in_game = matches!(session.phase, GamePhase::Play | GamePhase::Hit);
        if let (true, Some(level)) = (in_game, session.current.as_ref()) {
            let mut push = |key: SpriteKey, rect: &Rect| {
                // Off-screen sprites are skipped
                if camera.is_visible(rect) {
                    sprites.push(Sprite {
                        key,
                        rect: camera.apply(rect),
                    });
                }
            };

            for wall in level.world.walls() {
                push(SpriteKey::Wall, &wall);
            }
            push(SpriteKey::Gate, &level.gate.rect);
            for pickup in &level.pickups {
                push(SpriteKey::Pickup, &pickup.rect);
            }
            push(SpriteKey::Pursuer, &level.pursuer.rect);
            if level.player.visible {
                push(SpriteKey::Player(session.profile.gender), &level.player.rect);
            }
        }

        Self {
            screen,
            camera_offset: camera.offset,
            sprites,
            hud,
        }
    }
}
