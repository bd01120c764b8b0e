//! Maze Run - A top-down maze chase arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (maze, collisions, entities, game state)
//! - `render`: Per-frame render snapshot handed to an external renderer
//! - `settings`: Data-driven game balance and maze presets

pub mod render;
pub mod settings;
pub mod sim;

pub use render::{Frame, Hud, Sprite, SpriteKey};
pub use settings::{ConfigError, GameConfig, MazePreset};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Simulation rate the frame-count timers are tuned for
    pub const SIM_HZ: u32 = 60;

    /// Side length of one maze cell in world pixels
    pub const TILE_SIZE: f32 = 40.0;

    /// Entity footprints
    pub const PLAYER_SIZE: f32 = 28.0;
    pub const PURSUER_SIZE: f32 = 30.0;
    pub const PICKUP_SIZE: f32 = 20.0;

    /// Player defaults
    pub const PLAYER_BASE_SPEED: f32 = 4.0;
    pub const PLAYER_BOOST_SPEED: f32 = 6.0;
    /// Boost duration (3 seconds at 60 Hz)
    pub const BOOST_TICKS: u32 = 180;
    pub const START_LIVES: u8 = 3;

    /// Pursuer speed = base + level * per_level, capped below player base speed
    pub const PURSUER_BASE_SPEED: f32 = 2.5;
    pub const PURSUER_SPEED_PER_LEVEL: f32 = 0.25;
    pub const PURSUER_MAX_SPEED: f32 = 3.5;

    /// Post-hit invulnerability window (1.5 seconds at 60 Hz)
    pub const HIT_TICKS: u32 = 90;
    /// Blink flag toggles every N ticks while hit
    pub const BLINK_INTERVAL: u32 = 6;

    /// Scoring
    pub const PICKUP_VALUE: u64 = 100;
    pub const LEVEL_BONUS: u64 = 1000;
    pub const PENALTY_ONE_LIFE: u64 = 500;
    pub const PENALTY_MANY_LIVES: u64 = 700;

    /// Pickups per level = base + level, capped
    pub const BASE_PICKUPS: usize = 5;
    pub const MAX_PICKUPS: usize = 12;

    /// Longest accepted player name
    pub const MAX_NAME_LEN: usize = 16;
}

/// Top-left world position of the tile at (col, row)
#[inline]
pub fn tile_origin(col: usize, row: usize, tile_size: f32) -> Vec2 {
    Vec2::new(col as f32 * tile_size, row as f32 * tile_size)
}

/// Top-left position that centers a box of `size` inside the tile at `origin`
#[inline]
pub fn centered_in_tile(origin: Vec2, tile_size: f32, size: Vec2) -> Vec2 {
    origin + (Vec2::splat(tile_size) - size) / 2.0
}
