//! Game configuration and maze presets
//!
//! Everything the simulation tunes on lives in `GameConfig`. Values are
//! validated once, before the first level is built, so a bad config fails
//! with a readable error instead of an out-of-range index mid-game.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::maze::{self, GateOverride, MazeError};

/// Maze size presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MazePreset {
    /// One screen (20x15 tiles), no scrolling
    #[default]
    Small,
    /// Scrolling maze (41x31 tiles) seen through an 800x600 viewport
    Large,
}

impl MazePreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            MazePreset::Small => "Small",
            MazePreset::Large => "Large",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "small" | "s" => Some(MazePreset::Small),
            "large" | "l" | "big" => Some(MazePreset::Large),
            _ => None,
        }
    }

    /// Maze dimensions in tiles (cols, rows)
    pub fn dimensions(&self) -> (usize, usize) {
        match self {
            MazePreset::Small => (20, 15),
            MazePreset::Large => (41, 31),
        }
    }

    /// Viewport for the scrolling camera
    pub fn viewport(&self) -> Option<Vec2> {
        match self {
            MazePreset::Small => None,
            MazePreset::Large => Some(Vec2::new(800.0, 600.0)),
        }
    }

    /// Points per pickup
    pub fn pickup_value(&self) -> u64 {
        match self {
            MazePreset::Small => PICKUP_VALUE,
            MazePreset::Large => 250,
        }
    }

    /// Pickup count on level 0 (level n adds n)
    pub fn base_pickups(&self) -> usize {
        match self {
            MazePreset::Small => BASE_PICKUPS,
            MazePreset::Large => 10,
        }
    }
}

/// Configuration errors, raised before any level is built
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Maze(#[from] MazeError),

    #[error("tile size must be positive, got {0}")]
    TileSize(f32),

    #[error("{entity} size {size} does not fit in a {tile} pixel tile")]
    EntityTooLarge {
        entity: &'static str,
        size: f32,
        tile: f32,
    },

    #[error("{entity} speed {speed} must be positive and below the {tile} pixel tile size")]
    SpeedOutOfRange {
        entity: &'static str,
        speed: f32,
        tile: f32,
    },

    #[error("boost speed {boost} is below base speed {base}")]
    BoostBelowBase { boost: f32, base: f32 },

    #[error("pursuer speed cap {cap} must stay below player base speed {player}")]
    PursuerTooFast { cap: f32, player: f32 },

    #[error("{requested} pickups requested but only {available} spawn points are free")]
    TooManyPickups { requested: usize, available: usize },

    #[error("player needs at least one life")]
    NoLives,

    #[error("blink interval must be at least 1 tick")]
    BlinkInterval,

    #[error("viewport must be positive, got {0}")]
    Viewport(Vec2),

    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Game balance and maze shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Maze ===
    pub cols: usize,
    pub rows: usize,
    pub tile_size: f32,
    pub gate_override: GateOverride,
    /// Scrolling viewport; the camera only runs when the map is larger
    pub viewport: Option<Vec2>,

    // === Entities ===
    pub player_size: f32,
    pub pursuer_size: f32,
    pub pickup_size: f32,
    pub player_base_speed: f32,
    pub player_boost_speed: f32,
    pub boost_ticks: u32,
    pub pursuer_base_speed: f32,
    pub pursuer_speed_per_level: f32,
    pub pursuer_max_speed: f32,

    // === Lives ===
    pub start_lives: u8,
    /// Post-hit freeze; 0 respawns on the same tick
    pub hit_ticks: u32,
    pub blink_interval: u32,

    // === Scoring ===
    pub pickup_value: u64,
    pub level_bonus: u64,
    /// Bonus penalty after losing exactly one life on the level
    pub penalty_one_life: u64,
    /// Bonus penalty after losing two or more lives on the level
    pub penalty_many_lives: u64,
    pub base_pickups: usize,
    pub max_pickups: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::from_preset(MazePreset::Small)
    }
}

impl GameConfig {
    /// Create a config from a maze preset
    pub fn from_preset(preset: MazePreset) -> Self {
        let (cols, rows) = preset.dimensions();
        Self {
            cols,
            rows,
            tile_size: TILE_SIZE,
            gate_override: GateOverride::Forced,
            viewport: preset.viewport(),

            player_size: PLAYER_SIZE,
            pursuer_size: PURSUER_SIZE,
            pickup_size: PICKUP_SIZE,
            player_base_speed: PLAYER_BASE_SPEED,
            player_boost_speed: PLAYER_BOOST_SPEED,
            boost_ticks: BOOST_TICKS,
            pursuer_base_speed: PURSUER_BASE_SPEED,
            pursuer_speed_per_level: PURSUER_SPEED_PER_LEVEL,
            pursuer_max_speed: PURSUER_MAX_SPEED,

            start_lives: START_LIVES,
            hit_ticks: HIT_TICKS,
            blink_interval: BLINK_INTERVAL,

            pickup_value: preset.pickup_value(),
            level_bonus: LEVEL_BONUS,
            penalty_one_life: PENALTY_ONE_LIFE,
            penalty_many_lives: PENALTY_MANY_LIVES,
            base_pickups: preset.base_pickups(),
            max_pickups: match preset {
                MazePreset::Small => MAX_PICKUPS,
                MazePreset::Large => 30,
            },
        }
    }

    /// Parse a JSON config; missing fields fall back to the Small preset
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Map size in pixels
    pub fn map_size(&self) -> Vec2 {
        Vec2::new(self.cols as f32, self.rows as f32) * self.tile_size
    }

    /// Pickups placed on a level
    pub fn pickups_for_level(&self, level: u32) -> usize {
        self.base_pickups
            .saturating_add(level as usize)
            .min(self.max_pickups)
    }

    /// Pursuer speed on a level, capped below the player's base speed
    pub fn pursuer_speed(&self, level: u32) -> f32 {
        (self.pursuer_base_speed + level as f32 * self.pursuer_speed_per_level)
            .min(self.pursuer_max_speed)
    }

    /// Open cells every maze of this size is guaranteed to have, minus the
    /// player start and the gate
    ///
    /// The carve opens every lattice room plus one passage per tree edge.
    pub fn guaranteed_pickup_slots(&self) -> usize {
        let rooms = (self.cols.saturating_sub(1) / 2) * (self.rows.saturating_sub(1) / 2);
        (2 * rooms).saturating_sub(3)
    }

    /// Check every invariant the simulation relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        maze::check_dimensions(self.cols, self.rows)?;

        let tile = self.tile_size;
        if !(tile > 0.0) {
            return Err(ConfigError::TileSize(tile));
        }

        for (entity, size) in [
            ("player", self.player_size),
            ("pursuer", self.pursuer_size),
            ("pickup", self.pickup_size),
        ] {
            if !(size > 0.0 && size <= tile) {
                return Err(ConfigError::EntityTooLarge { entity, size, tile });
            }
        }

        // A step as long as a tile could jump clean over a wall
        for (entity, speed) in [
            ("player", self.player_base_speed),
            ("boosted player", self.player_boost_speed),
            ("pursuer", self.pursuer_max_speed),
        ] {
            if !(speed > 0.0 && speed < tile) {
                return Err(ConfigError::SpeedOutOfRange { entity, speed, tile });
            }
        }
        if self.pursuer_base_speed < 0.0 || self.pursuer_speed_per_level < 0.0 {
            return Err(ConfigError::SpeedOutOfRange {
                entity: "pursuer",
                speed: self.pursuer_base_speed.min(self.pursuer_speed_per_level),
                tile,
            });
        }

        if self.player_boost_speed < self.player_base_speed {
            return Err(ConfigError::BoostBelowBase {
                boost: self.player_boost_speed,
                base: self.player_base_speed,
            });
        }
        if self.pursuer_max_speed >= self.player_base_speed {
            return Err(ConfigError::PursuerTooFast {
                cap: self.pursuer_max_speed,
                player: self.player_base_speed,
            });
        }

        let available = self.guaranteed_pickup_slots();
        if self.max_pickups > available {
            return Err(ConfigError::TooManyPickups {
                requested: self.max_pickups,
                available,
            });
        }

        if self.start_lives == 0 {
            return Err(ConfigError::NoLives);
        }
        if self.blink_interval == 0 {
            return Err(ConfigError::BlinkInterval);
        }
        if let Some(viewport) = self.viewport {
            if !(viewport.x > 0.0 && viewport.y > 0.0) {
                return Err(ConfigError::Viewport(viewport));
            }
        }

        Ok(())
    }
}
