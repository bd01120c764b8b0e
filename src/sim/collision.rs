//! Collision detection and movement resolution
//!
//! Walls are tile-sized axis-aligned boxes. Moving boxes are resolved one
//! axis at a time (X fully, then Y): when a move on one axis lands inside a
//! wall the leading edge is snapped flush against the nearest blocking wall,
//! so entities slide along corridors instead of stopping dead. The X-first
//! order decides diagonal moves into a corner: the horizontal step wins.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::maze::Grid;
use crate::tile_origin;

/// Axis-aligned rectangle (top-left position + size)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Strict overlap: rectangles that only share an edge do not collide
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    pub fn translated(&self, offset: Vec2) -> Rect {
        Rect::new(self.pos + offset, self.size)
    }
}

/// Movement axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    #[inline]
    fn of(self, v: Vec2) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
        }
    }

    #[inline]
    fn set(self, v: &mut Vec2, value: f32) {
        match self {
            Axis::X => v.x = value,
            Axis::Y => v.y = value,
        }
    }

    #[inline]
    fn vector(self, amount: f32) -> Vec2 {
        match self {
            Axis::X => Vec2::new(amount, 0.0),
            Axis::Y => Vec2::new(0.0, amount),
        }
    }
}

/// Static solid geometry of one level
#[derive(Debug, Clone)]
pub struct CollisionWorld {
    tile_size: f32,
    cols: usize,
    rows: usize,
    solid: Vec<bool>,
}

impl CollisionWorld {
    /// Every wall cell of the grid becomes a solid tile
    pub fn from_grid(grid: &Grid, tile_size: f32) -> Self {
        let (cols, rows) = (grid.cols(), grid.rows());
        let solid = (0..rows)
            .flat_map(|row| (0..cols).map(move |col| (col, row)))
            .map(|(col, row)| !grid.is_open(col, row))
            .collect();
        Self {
            tile_size,
            cols,
            rows,
            solid,
        }
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// World size in pixels
    pub fn map_size(&self) -> Vec2 {
        Vec2::new(self.cols as f32, self.rows as f32) * self.tile_size
    }

    fn wall_rect(&self, col: usize, row: usize) -> Rect {
        Rect::new(tile_origin(col, row, self.tile_size), Vec2::splat(self.tile_size))
    }

    /// All wall rectangles in scan order
    pub fn walls(&self) -> impl Iterator<Item = Rect> + '_ {
        let cols = self.cols;
        (0..self.rows)
            .flat_map(move |row| (0..cols).map(move |col| (col, row)))
            .filter(move |&(col, row)| self.solid[row * cols + col])
            .map(move |(col, row)| self.wall_rect(col, row))
    }

    /// Wall rectangles overlapping `rect`
    ///
    /// Only the tiles under the rectangle are inspected.
    pub fn overlapping_walls(&self, rect: &Rect) -> impl Iterator<Item = Rect> + '_ {
        let t = self.tile_size;
        let cols = self.cols;
        let col_lo = (rect.left() / t).floor().max(0.0) as usize;
        let row_lo = (rect.top() / t).floor().max(0.0) as usize;
        let col_hi = ((rect.right() / t).ceil().max(0.0) as usize).min(cols);
        let row_hi = ((rect.bottom() / t).ceil().max(0.0) as usize).min(self.rows);
        let rect = *rect;

        (row_lo..row_hi)
            .flat_map(move |row| (col_lo..col_hi).map(move |col| (col, row)))
            .filter(move |&(col, row)| self.solid[row * cols + col])
            .map(move |(col, row)| self.wall_rect(col, row))
            .filter(move |wall| wall.overlaps(&rect))
    }

    pub fn overlaps_any(&self, rect: &Rect) -> bool {
        self.overlapping_walls(rect).next().is_some()
    }

    /// Move `rect` by `delta` along one axis and snap it out of any wall hit
    pub fn resolve_axis(&self, rect: Rect, axis: Axis, delta: f32) -> Rect {
        let mut moved = rect.translated(axis.vector(delta));
        if delta == 0.0 {
            return moved;
        }

        let snapped = self
            .overlapping_walls(&moved)
            .fold(axis.of(moved.pos), |coord, wall| {
                if delta > 0.0 {
                    // Leading edge flush with the wall's near side
                    coord.min(axis.of(wall.pos) - axis.of(moved.size))
                } else {
                    coord.max(axis.of(wall.pos) + axis.of(wall.size))
                }
            });
        axis.set(&mut moved.pos, snapped);
        moved
    }

    /// Axis-separated move: X is resolved before Y
    pub fn move_and_slide(&self, rect: Rect, delta: Vec2) -> Rect {
        let rect = self.resolve_axis(rect, Axis::X, delta.x);
        self.resolve_axis(rect, Axis::Y, delta.y)
    }
}
