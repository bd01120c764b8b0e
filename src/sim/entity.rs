//! Moving entities: the player and the pursuer
//!
//! Both move through the same `CollisionWorld::move_and_slide`, so they share
//! the slide policy and the X-before-Y corner tie-break.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{CollisionWorld, Rect};
use crate::settings::GameConfig;

/// Directional intent for one tick, merged from every input source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Intent {
    /// Logical OR of two sources (e.g. keyboard and touch pad)
    pub fn merge(self, other: Intent) -> Intent {
        Intent {
            up: self.up || other.up,
            down: self.down || other.down,
            left: self.left || other.left,
            right: self.right || other.right,
        }
    }

    /// Per-axis sign in {-1, 0, 1}; opposite flags cancel
    ///
    /// Not normalized: a diagonal moves at full speed on both axes.
    pub fn direction(&self) -> Vec2 {
        let axis = |neg: bool, pos: bool| f32::from(i8::from(pos) - i8::from(neg));
        Vec2::new(axis(self.left, self.right), axis(self.up, self.down))
    }

    pub fn is_idle(&self) -> bool {
        self.direction() == Vec2::ZERO
    }
}

/// The player-controlled runner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub rect: Rect,
    pub base_speed: f32,
    pub boost_speed: f32,
    pub boost_duration: u32,
    /// Updates left at boosted speed
    pub boost_ticks: u32,
    /// Ticks left in the post-hit window
    pub recovery_ticks: u32,
    /// Blink flag; false while hidden during the post-hit window
    pub visible: bool,
    /// Intent applied on the last update
    pub intent: Intent,
}

impl Player {
    pub fn new(pos: Vec2, config: &GameConfig) -> Self {
        Self {
            rect: Rect::new(pos, Vec2::splat(config.player_size)),
            base_speed: config.player_base_speed,
            boost_speed: config.player_boost_speed,
            boost_duration: config.boost_ticks,
            boost_ticks: 0,
            recovery_ticks: 0,
            visible: true,
            intent: Intent::default(),
        }
    }

    /// Current speed: boosted while the countdown runs, base otherwise
    pub fn speed(&self) -> f32 {
        if self.boost_ticks > 0 {
            self.boost_speed
        } else {
            self.base_speed
        }
    }

    pub fn is_boosted(&self) -> bool {
        self.boost_ticks > 0
    }

    /// Start (or restart) the boost countdown
    pub fn boost(&mut self) {
        self.boost_ticks = self.boost_duration;
    }

    /// Move by the intent and resolve against walls, then tick the boost down
    pub fn update(&mut self, intent: Intent, world: &CollisionWorld) {
        self.intent = intent;
        if !intent.is_idle() {
            let delta = intent.direction() * self.speed();
            self.rect = world.move_and_slide(self.rect, delta);
        }
        self.boost_ticks = self.boost_ticks.saturating_sub(1);
    }

    /// Enter the post-hit window (hidden on the first frame)
    pub fn start_recovery(&mut self, ticks: u32) {
        self.recovery_ticks = ticks;
        self.visible = ticks == 0;
    }

    pub fn is_recovering(&self) -> bool {
        self.recovery_ticks > 0
    }

    /// Advance the post-hit window by one tick
    ///
    /// Returns true on the tick the window closes.
    pub fn advance_recovery(&mut self, blink_interval: u32) -> bool {
        if !self.is_recovering() {
            return false;
        }
        self.recovery_ticks -= 1;
        if self.recovery_ticks == 0 {
            self.visible = true;
            return true;
        }
        if blink_interval > 0 && self.recovery_ticks % blink_interval == 0 {
            self.visible = !self.visible;
        }
        false
    }

    /// Put the player back on its start tile with a clean slate
    pub fn respawn(&mut self, pos: Vec2) {
        self.rect.pos = pos;
        self.boost_ticks = 0;
        self.recovery_ticks = 0;
        self.visible = true;
        self.intent = Intent::default();
    }
}

/// The chasing enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pursuer {
    pub rect: Rect,
    pub speed: f32,
}

impl Pursuer {
    pub fn new(pos: Vec2, size: f32, speed: f32) -> Self {
        Self {
            rect: Rect::new(pos, Vec2::splat(size)),
            speed,
        }
    }

    /// Greedy chase: step toward the target on each axis independently
    ///
    /// No pathfinding. A wall between pursuer and target is pushed against
    /// rather than walked around.
    pub fn update(&mut self, target: &Rect, world: &CollisionWorld) {
        let step = |from: f32, to: f32| {
            if from < to {
                self.speed
            } else if from > to {
                -self.speed
            } else {
                0.0
            }
        };
        let delta = Vec2::new(
            step(self.rect.pos.x, target.pos.x),
            step(self.rect.pos.y, target.pos.y),
        );
        self.rect = world.move_and_slide(self.rect, delta);
    }
}
