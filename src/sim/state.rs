//! Game state and core simulation types
//!
//! `GameSession` owns everything a run needs. The current `Level` (grid,
//! walls, entities, pickups, gate) is swapped out whole on every rebuild.

use glam::Vec2;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::camera::Camera;
use super::collision::{CollisionWorld, Rect};
use super::entity::{Player, Pursuer};
use super::maze::{self, Cell, Grid};
use crate::settings::{ConfigError, GameConfig};
use crate::{centered_in_tile, tile_origin};

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Name and gender entry, waiting for confirm
    Login,
    /// Active gameplay
    Play,
    /// Player was caught; frozen and blinking until respawn
    Hit,
    /// Out of lives, waiting for restart
    GameOver,
    /// Closed by the host; terminal
    Quit,
}

/// Selects the player sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Gender {
    #[default]
    Male,
    Female,
}

impl Gender {
    pub fn toggled(self) -> Self {
        match self {
            Gender::Male => Gender::Female,
            Gender::Female => Gender::Male,
        }
    }
}

/// Login choices, kept across restarts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub name: String,
    pub gender: Gender,
}

impl PlayerProfile {
    /// Name shown in the HUD
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "Player"
        } else {
            &self.name
        }
    }
}

/// A collectible on the maze floor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub id: u32,
    pub cell: Cell,
    pub rect: Rect,
}

/// The level exit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gate {
    pub cell: Cell,
    pub rect: Rect,
}

/// Things the host may want to react to (sound, HUD flashes)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    LevelBuilt { level: u32, pickups: usize },
    PickupCollected { id: u32, score: u64 },
    PlayerCaught { lives_left: u8 },
    Respawned,
    LevelComplete { level: u32, bonus: u64 },
    GameOver { level: u32, score: u64 },
}

/// Everything that exists inside one level
#[derive(Debug, Clone)]
pub struct Level {
    pub number: u32,
    pub grid: Grid,
    pub world: CollisionWorld,
    /// Open cells in scan order
    pub spawn_points: Vec<Cell>,
    pub player: Player,
    pub pursuer: Pursuer,
    /// Remaining pickups, in spawn order
    pub pickups: Vec<Pickup>,
    pub gate: Gate,
    pub player_start: Vec2,
    pub pursuer_start: Vec2,
}

impl Level {
    /// Generate a fresh maze and populate it
    ///
    /// Nothing of the previous level is touched; the caller swaps the result
    /// in only once this returns `Ok`.
    pub fn build<R: Rng + ?Sized>(
        config: &GameConfig,
        number: u32,
        rng: &mut R,
    ) -> Result<Self, ConfigError> {
        let grid = maze::generate_with(config.cols, config.rows, config.gate_override, rng)?;

        let unreachable = grid.unreachable_open_cells(Cell::START);
        if !unreachable.is_empty() {
            log::warn!(
                "Level {}: {} open cells unreachable from start: {:?}",
                number,
                unreachable.len(),
                unreachable
            );
        }

        let spawn_points = grid.spawn_points();
        let requested = config.pickups_for_level(number);
        let available = spawn_points.len().saturating_sub(2);
        if requested > available {
            return Err(ConfigError::TooManyPickups {
                requested,
                available,
            });
        }

        let tile = config.tile_size;
        let place = |cell: Cell, size: f32| {
            centered_in_tile(tile_origin(cell.col, cell.row, tile), tile, Vec2::splat(size))
        };

        let start_cell = spawn_points[0];
        let gate_cell = spawn_points[spawn_points.len() - 1];
        let pursuer_cell = spawn_points[spawn_points.len() / 2];

        let player_start = place(start_cell, config.player_size);
        let pursuer_start = place(pursuer_cell, config.pursuer_size);

        // Sample without replacement, skipping the start and the gate
        let candidates = &spawn_points[1..spawn_points.len() - 1];
        let mut chosen = index::sample(rng, candidates.len(), requested).into_vec();
        chosen.sort_unstable();
        let pickups = chosen
            .into_iter()
            .enumerate()
            .map(|(id, i)| {
                let cell = candidates[i];
                Pickup {
                    id: id as u32,
                    cell,
                    rect: Rect::new(place(cell, config.pickup_size), Vec2::splat(config.pickup_size)),
                }
            })
            .collect();

        let gate = Gate {
            cell: gate_cell,
            rect: Rect::new(tile_origin(gate_cell.col, gate_cell.row, tile), Vec2::splat(tile)),
        };

        Ok(Self {
            number,
            world: CollisionWorld::from_grid(&grid, tile),
            grid,
            spawn_points,
            player: Player::new(player_start, config),
            pursuer: Pursuer::new(pursuer_start, config.pursuer_size, config.pursuer_speed(number)),
            pickups,
            gate,
            player_start,
            pursuer_start,
        })
    }

    /// Send both entities back to their level-start positions
    pub fn reset_positions(&mut self) {
        self.player.respawn(self.player_start);
        self.pursuer.rect.pos = self.pursuer_start;
    }

    pub fn map_size(&self) -> Vec2 {
        self.world.map_size()
    }
}

/// A whole run: score, lives, level and the world being played
#[derive(Debug, Clone)]
pub struct GameSession {
    pub config: GameConfig,
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    pub phase: GamePhase,
    /// Current level (1-based)
    pub level: u32,
    pub score: u64,
    pub lives: u8,
    pub lives_lost_this_level: u32,
    pub profile: PlayerProfile,
    /// The level being played; `None` until the first confirm
    pub current: Option<Level>,
    /// Present only when the map outgrows the viewport
    pub camera: Option<Camera>,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events since the host last drained them
    pub events: Vec<GameEvent>,
}

impl GameSession {
    /// Validate the config and open at the login screen
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            lives: config.start_lives,
            config,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Login,
            level: 1,
            score: 0,
            lives_lost_this_level: 0,
            profile: PlayerProfile::default(),
            current: None,
            camera: None,
            time_ticks: 0,
            events: Vec::new(),
        })
    }

    /// Build `self.level` and swap it in atomically, refilling lives
    pub fn build_level(&mut self) -> Result<(), ConfigError> {
        let next = Level::build(&self.config, self.level, &mut self.rng)?;

        let map_size = next.map_size();
        self.camera = self
            .config
            .viewport
            .filter(|&viewport| Camera::is_needed(viewport, map_size))
            .map(|viewport| Camera::new(viewport, map_size));

        log::info!(
            "Level {}: {}x{} maze, {} spawn points, {} pickups, pursuer speed {}",
            self.level,
            next.grid.cols(),
            next.grid.rows(),
            next.spawn_points.len(),
            next.pickups.len(),
            next.pursuer.speed
        );
        self.events.push(GameEvent::LevelBuilt {
            level: self.level,
            pickups: next.pickups.len(),
        });

        self.current = Some(next);
        // Every level starts with a fresh player
        self.lives = self.config.start_lives;
        self.lives_lost_this_level = 0;
        self.follow_player();
        Ok(())
    }

    /// Fresh run from level 1
    pub fn start_run(&mut self) -> Result<(), ConfigError> {
        self.level = 1;
        self.score = 0;
        self.build_level()?;
        self.phase = GamePhase::Play;
        Ok(())
    }

    /// Back to the login screen with a cleared scoreboard
    pub fn reset_to_login(&mut self) {
        self.level = 1;
        self.score = 0;
        self.lives = self.config.start_lives;
        self.lives_lost_this_level = 0;
        self.current = None;
        self.camera = None;
        self.phase = GamePhase::Login;
    }

    /// Re-center the camera on the player
    pub fn follow_player(&mut self) {
        if let (Some(camera), Some(level)) = (self.camera.as_mut(), self.current.as_ref()) {
            camera.update(&level.player.rect);
        }
    }

    pub fn player(&self) -> Option<&Player> {
        self.current.as_ref().map(|l| &l.player)
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
