//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Frame-count timers only
//! - Seeded RNG only
//! - Stable iteration order (scan order for cells, spawn order for pickups)
//! - No rendering or platform dependencies

pub mod camera;
pub mod collision;
pub mod entity;
pub mod maze;
pub mod state;
pub mod tick;

pub use camera::Camera;
pub use collision::{Axis, CollisionWorld, Rect};
pub use entity::{Intent, Player, Pursuer};
pub use maze::{Cell, CellKind, GateOverride, Grid, MazeError, generate, generate_with};
pub use state::{Gate, GameEvent, GamePhase, GameSession, Gender, Level, Pickup, PlayerProfile};
pub use tick::{TickInput, completion_bonus, tick};
