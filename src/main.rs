//! Maze Run headless driver
//!
//! Hosts the simulation the way a real frontend would: one `tick` per frame,
//! a `Frame` captured after each one. Instead of reading a keyboard it steers
//! the player along the shortest maze path to the gate, which makes it handy
//! for smoke-testing configs and seeds.

use std::collections::VecDeque;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use glam::Vec2;

use maze_run::sim::{Cell, GameEvent, GamePhase, GameSession, Intent, Level, TickInput, tick};
use maze_run::{Frame, GameConfig, MazePreset};

#[derive(Debug, Parser)]
#[command(name = "maze-run", about = "Headless Maze Run driver")]
struct Options {
    /// RNG seed for maze layouts and pickup placement
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Built-in maze preset (small or large)
    #[arg(long, value_parser = parse_preset, conflicts_with = "config")]
    preset: Option<MazePreset>,
    /// JSON config file; missing fields fall back to the small preset
    #[arg(long)]
    config: Option<PathBuf>,
    /// Maximum number of ticks to simulate
    #[arg(long, default_value_t = 60 * 60 * 5)]
    ticks: u64,
    /// Print the last frame as JSON
    #[arg(long = "frame")]
    print_frame: bool,
}

impl Options {
    fn game_config(&self) -> Result<GameConfig> {
        if let Some(path) = &self.config {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            return GameConfig::from_json(&json)
                .with_context(|| format!("loading {}", path.display()));
        }
        Ok(self.preset.map(GameConfig::from_preset).unwrap_or_default())
    }
}

fn parse_preset(value: &str) -> Result<MazePreset, String> {
    MazePreset::from_str(value).ok_or_else(|| format!("unknown preset {value:?}"))
}

/// Steer toward the next cell on the shortest path to the gate
fn autopilot(level: &Level) -> Intent {
    let tile = level.world.tile_size();
    let center = level.player.rect.center();
    let here = Cell::new((center.x / tile) as usize, (center.y / tile) as usize);
    let goal = level.gate.cell;

    let Some(next) = next_step(level, here, goal) else {
        return Intent::default();
    };

    let target = (Vec2::new(next.col as f32, next.row as f32) + 0.5) * tile;
    let delta = target - center;
    let dead_zone = level.player.speed() / 2.0;
    Intent {
        left: delta.x < -dead_zone,
        right: delta.x > dead_zone,
        up: delta.y < -dead_zone,
        down: delta.y > dead_zone,
    }
}

/// First cell after `from` on a BFS path to `goal` (`from` itself once there)
fn next_step(level: &Level, from: Cell, goal: Cell) -> Option<Cell> {
    let grid = &level.grid;
    let idx = |c: Cell| c.row * grid.cols() + c.col;
    let mut came_from: Vec<Option<Cell>> = vec![None; grid.cols() * grid.rows()];
    let mut queue = VecDeque::from([from]);
    came_from[idx(from)] = Some(from);

    while let Some(cell) = queue.pop_front() {
        if cell == goal {
            let mut step = cell;
            while let Some(prev) = came_from[idx(step)] {
                if prev == from {
                    return Some(step);
                }
                step = prev;
            }
            return Some(from);
        }
        for next in grid.open_neighbours(cell) {
            if came_from[idx(next)].is_none() {
                came_from[idx(next)] = Some(cell);
                queue.push_back(next);
            }
        }
    }
    None
}

fn run(options: Options) -> Result<()> {
    let mut session = GameSession::new(options.game_config()?, options.seed)?;
    log::info!("Maze Run (headless) seed {}", options.seed);

    tick(
        &mut session,
        &TickInput {
            text: "Autopilot".into(),
            confirm: true,
            ..Default::default()
        },
    );
    if session.phase != GamePhase::Play {
        bail!("level 1 could not be built");
    }

    let mut frame = Frame::capture(&session);
    for _ in 0..options.ticks {
        let intent = session
            .current
            .as_ref()
            .map(autopilot)
            .unwrap_or_default();
        tick(
            &mut session,
            &TickInput {
                intent,
                ..Default::default()
            },
        );
        frame = Frame::capture(&session);

        for event in session.drain_events() {
            match event {
                GameEvent::LevelComplete { level, bonus } => {
                    println!("level {level} cleared, bonus {bonus}, score {}", session.score)
                }
                GameEvent::GameOver { level, score } => {
                    println!("game over on level {level} with {score} points")
                }
                other => log::debug!("{other:?}"),
            }
        }
        if session.phase == GamePhase::GameOver {
            break;
        }
    }

    let hud = &frame.hud;
    println!(
        "{}: level {} score {} lives {} ({:?}) after {} ticks",
        hud.name, hud.level, hud.score, hud.lives, hud.phase, session.time_ticks
    );
    if options.print_frame {
        println!("{}", serde_json::to_string_pretty(&frame)?);
    }
    Ok(())
}

fn main() -> Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();
    run(Options::parse())
}
