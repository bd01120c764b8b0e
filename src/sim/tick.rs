//! Per-frame simulation tick
//!
//! The host calls `tick` once per frame; the core never owns the loop.
//! One call is one complete update pass: move the player, move the pursuer,
//! resolve pickups / catches / the gate, then move the camera.

use super::entity::Intent;
use super::state::{GameEvent, GamePhase, GameSession, Gender};
use crate::consts::MAX_NAME_LEN;
use crate::settings::GameConfig;

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Merged directional intent (keyboard, touch pad, ...)
    pub intent: Intent,
    /// Start the run from the login screen
    pub confirm: bool,
    /// Leave the game-over screen
    pub restart: bool,
    /// Flip the selected gender on the login screen
    pub toggle_gender: bool,
    /// Pick a gender explicitly (wins over the toggle)
    pub select_gender: Option<Gender>,
    /// Typed characters for the name field
    pub text: String,
    /// Delete the last name character
    pub backspace: bool,
    /// Host close signal
    pub quit: bool,
}

/// Level-completion bonus after losing `lives_lost` lives on the level
pub fn completion_bonus(config: &GameConfig, lives_lost: u32) -> u64 {
    let penalty = match lives_lost {
        0 => 0,
        1 => config.penalty_one_life,
        _ => config.penalty_many_lives,
    };
    config.level_bonus.saturating_sub(penalty)
}

/// Advance the game by one frame
pub fn tick(session: &mut GameSession, input: &TickInput) {
    if session.phase == GamePhase::Quit {
        return;
    }
    if input.quit {
        log::info!("Quit requested at level {} with score {}", session.level, session.score);
        session.phase = GamePhase::Quit;
        return;
    }

    session.time_ticks += 1;

    match session.phase {
        GamePhase::Login => tick_login(session, input),
        GamePhase::Play => tick_play(session, input.intent),
        GamePhase::Hit => tick_hit(session),
        GamePhase::GameOver => {
            if input.restart {
                log::info!("Restart: back to login");
                session.reset_to_login();
            }
        }
        GamePhase::Quit => {}
    }
}

fn tick_login(session: &mut GameSession, input: &TickInput) {
    let profile = &mut session.profile;
    if input.backspace {
        profile.name.pop();
    }
    for ch in input.text.chars().filter(|c| !c.is_control()) {
        if profile.name.chars().count() >= MAX_NAME_LEN {
            break;
        }
        profile.name.push(ch);
    }

    if let Some(gender) = input.select_gender {
        profile.gender = gender;
    } else if input.toggle_gender {
        profile.gender = profile.gender.toggled();
    }

    if input.confirm {
        match session.start_run() {
            Ok(()) => log::info!(
                "{} ({:?}) starts level 1",
                session.profile.display_name(),
                session.profile.gender
            ),
            Err(e) => log::error!("Failed to build level 1: {e}"),
        }
    }
}

fn tick_play(session: &mut GameSession, intent: Intent) {
    let Some(level) = session.current.as_mut() else {
        log::error!("Play phase without a level, returning to login");
        session.reset_to_login();
        return;
    };

    level.player.update(intent, &level.world);
    level.pursuer.update(&level.player.rect, &level.world);

    // Pickups: removed on first touch, so each pays out once
    let player_rect = level.player.rect;
    let mut collected = Vec::new();
    level.pickups.retain(|p| {
        let hit = p.rect.overlaps(&player_rect);
        if hit {
            collected.push(p.id);
        }
        !hit
    });
    for id in collected {
        session.score += session.config.pickup_value;
        level.player.boost();
        log::debug!("Pickup {} collected, score {}", id, session.score);
        session.events.push(GameEvent::PickupCollected {
            id,
            score: session.score,
        });
    }

    // Caught
    if level.pursuer.rect.overlaps(&level.player.rect) {
        session.lives = session.lives.saturating_sub(1);
        session.lives_lost_this_level += 1;
        log::debug!("Caught on level {}, {} lives left", session.level, session.lives);
        session.events.push(GameEvent::PlayerCaught {
            lives_left: session.lives,
        });

        if session.lives == 0 {
            log::info!("Game over at level {} with score {}", session.level, session.score);
            session.events.push(GameEvent::GameOver {
                level: session.level,
                score: session.score,
            });
            session.phase = GamePhase::GameOver;
            return;
        }

        if session.config.hit_ticks == 0 {
            level.reset_positions();
            session.events.push(GameEvent::Respawned);
            session.follow_player();
        } else {
            level.player.start_recovery(session.config.hit_ticks);
            session.phase = GamePhase::Hit;
        }
        return;
    }

    // Gate
    if level.gate.rect.overlaps(&level.player.rect) {
        let bonus = completion_bonus(&session.config, session.lives_lost_this_level);
        session.score += bonus;
        log::info!(
            "Level {} complete (lives lost {}), bonus {}, score {}",
            session.level,
            session.lives_lost_this_level,
            bonus,
            session.score
        );
        session.events.push(GameEvent::LevelComplete {
            level: session.level,
            bonus,
        });

        session.level += 1;
        if let Err(e) = session.build_level() {
            // The old level is still intact, but standing on its gate would
            // pay the bonus again every frame
            log::error!("Failed to build level {}: {e}", session.level);
            session.phase = GamePhase::GameOver;
        }
        return;
    }

    session.follow_player();
}

fn tick_hit(session: &mut GameSession) {
    let Some(level) = session.current.as_mut() else {
        session.reset_to_login();
        return;
    };

    if level.player.advance_recovery(session.config.blink_interval) {
        level.reset_positions();
        session.phase = GamePhase::Play;
        session.events.push(GameEvent::Respawned);
        session.follow_player();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::MazePreset;
    use crate::sim::state::Level;
    use glam::Vec2;

    const SEED: u64 = 20_240_601;

    fn confirm() -> TickInput {
        TickInput {
            confirm: true,
            ..Default::default()
        }
    }

    fn playing(config: GameConfig) -> GameSession {
        let mut session = GameSession::new(config, SEED).unwrap();
        tick(&mut session, &confirm());
        assert_eq!(session.phase, GamePhase::Play);
        session
    }

    fn level(session: &mut GameSession) -> &mut Level {
        session.current.as_mut().unwrap()
    }

    /// Freeze the pursuer off the map until the next respawn
    fn park_pursuer(session: &mut GameSession) {
        let level = level(session);
        level.pursuer.speed = 0.0;
        level.pursuer.rect.pos = Vec2::splat(-1000.0);
    }

    /// Center the player on a world rectangle
    fn put_player_on(session: &mut GameSession, target_center: Vec2) {
        let level = level(session);
        level.player.rect.pos = target_center - level.player.rect.size / 2.0;
    }

    fn idle(session: &mut GameSession) {
        tick(session, &TickInput::default());
    }

    /// Drop the pursuer onto the player and run one tick
    fn get_caught(session: &mut GameSession) {
        let level = level(session);
        level.pursuer.rect.pos = level.player.rect.pos;
        idle(session);
    }

    fn sit_out_hit(session: &mut GameSession) {
        let mut guard = 0;
        while session.phase == GamePhase::Hit {
            idle(session);
            guard += 1;
            assert!(guard <= 1000, "hit phase never ended");
        }
    }

    #[test]
    fn test_login_collects_name_and_gender() {
        let mut session = GameSession::new(GameConfig::default(), SEED).unwrap();
        let input = TickInput {
            text: "Ada\u{8}xyz".into(),
            toggle_gender: true,
            ..Default::default()
        };
        tick(&mut session, &input);
        tick(
            &mut session,
            &TickInput {
                backspace: true,
                ..Default::default()
            },
        );
        assert_eq!(session.profile.name, "Adaxy");
        assert_eq!(session.profile.gender, Gender::Female);
        assert_eq!(session.phase, GamePhase::Login);

        let long = TickInput {
            text: "x".repeat(40),
            select_gender: Some(Gender::Male),
            toggle_gender: true,
            ..Default::default()
        };
        tick(&mut session, &long);
        assert_eq!(session.profile.name.chars().count(), MAX_NAME_LEN);
        assert_eq!(session.profile.gender, Gender::Male);
    }

    #[test]
    fn test_confirm_builds_level_one() {
        let session = playing(GameConfig::default());
        assert_eq!(session.level, 1);
        assert_eq!(session.score, 0);
        assert_eq!(session.lives, 3);
        assert!(session.current.is_some());
    }

    #[test]
    fn test_scenario_a_spawn_order() {
        let mut session = playing(GameConfig::default());
        let level = level(&mut session);
        assert_eq!((level.grid.cols(), level.grid.rows()), (20, 15));
        let first = level.grid.spawn_points()[0];
        let last = *level.grid.spawn_points().last().unwrap();
        assert_eq!(level.spawn_points[0], first);
        assert_eq!(level.player_start, Vec2::new(first.col as f32, first.row as f32) * 40.0 + 6.0);
        assert_eq!(level.gate.cell, last);
    }

    #[test]
    fn test_pickup_pays_once_and_boosts() {
        let mut session = playing(GameConfig::default());
        park_pursuer(&mut session);
        let before = level(&mut session).pickups.len();
        let target = level(&mut session).pickups[0].rect.center();

        put_player_on(&mut session, target);
        idle(&mut session);
        assert_eq!(session.score, 100);
        assert_eq!(level(&mut session).pickups.len(), before - 1);
        assert!(level(&mut session).player.is_boosted());

        // Standing on the same spot again pays nothing
        idle(&mut session);
        assert_eq!(session.score, 100);
        assert!(matches!(
            session.drain_events().as_slice(),
            [GameEvent::LevelBuilt { .. }, GameEvent::PickupCollected { score: 100, .. }]
        ));
    }

    #[test]
    fn test_caught_blinks_then_respawns() {
        let mut session = playing(GameConfig::default());
        park_pursuer(&mut session);
        let start = level(&mut session).player_start;
        put_player_on(&mut session, Vec2::new(300.0, 300.0));

        get_caught(&mut session);
        assert_eq!(session.phase, GamePhase::Hit);
        assert_eq!(session.lives, 2);
        assert!(!level(&mut session).player.visible);

        // Frozen while blinking
        let frozen = level(&mut session).player.rect.pos;
        let walk = TickInput {
            intent: Intent {
                right: true,
                ..Default::default()
            },
            ..Default::default()
        };
        tick(&mut session, &walk);
        assert_eq!(level(&mut session).player.rect.pos, frozen);

        sit_out_hit(&mut session);
        assert_eq!(session.phase, GamePhase::Play);
        let level = level(&mut session);
        assert_eq!(level.player.rect.pos, start);
        assert_eq!(level.pursuer.rect.pos, level.pursuer_start);
        assert!(level.player.visible);
    }

    #[test]
    fn test_instant_respawn_without_hit_window() {
        let config = GameConfig {
            hit_ticks: 0,
            ..GameConfig::default()
        };
        let mut session = playing(config);
        park_pursuer(&mut session);
        put_player_on(&mut session, Vec2::new(300.0, 300.0));
        get_caught(&mut session);
        assert_eq!(session.phase, GamePhase::Play);
        assert_eq!(session.lives, 2);
        let level = level(&mut session);
        assert_eq!(level.player.rect.pos, level.player_start);
    }

    #[test]
    fn test_scenario_b_penalized_level_bonus() {
        let mut session = playing(GameConfig::default());
        park_pursuer(&mut session);

        let pickup = level(&mut session).pickups[0].rect.center();
        put_player_on(&mut session, pickup);
        idle(&mut session);
        assert_eq!(session.score, 100);

        for _ in 0..2 {
            get_caught(&mut session);
            sit_out_hit(&mut session);
        }
        assert_eq!(session.lives, 1);
        assert_eq!(session.lives_lost_this_level, 2);
        assert_eq!(session.phase, GamePhase::Play);

        let gate = level(&mut session).gate.rect.center();
        put_player_on(&mut session, gate);
        idle(&mut session);

        assert_eq!(session.score, 100 + (1000 - 700));
        assert_eq!(session.score, 400);
        assert_eq!(session.level, 2);
        assert_eq!(session.lives, 3);
        assert_eq!(session.lives_lost_this_level, 0);
        assert_eq!(session.phase, GamePhase::Play);
        assert_eq!(level(&mut session).number, 2);
    }

    #[test]
    fn test_completion_bonus_tiers() {
        let config = GameConfig::default();
        assert_eq!(completion_bonus(&config, 0), 1000);
        assert_eq!(completion_bonus(&config, 1), 500);
        assert_eq!(completion_bonus(&config, 2), 300);
        assert_eq!(completion_bonus(&config, 7), 300);

        let stingy = GameConfig {
            level_bonus: 400,
            ..GameConfig::default()
        };
        assert_eq!(completion_bonus(&stingy, 1), 0);
    }

    #[test]
    fn test_scenario_c_last_life_ends_game() {
        let mut session = playing(GameConfig::default());
        park_pursuer(&mut session);
        for _ in 0..2 {
            get_caught(&mut session);
            sit_out_hit(&mut session);
        }
        assert_eq!(session.lives, 1);

        get_caught(&mut session);
        assert_eq!(session.lives, 0);
        assert_eq!(session.phase, GamePhase::GameOver);

        // Nothing moves after game over
        idle(&mut session);
        assert_eq!(session.phase, GamePhase::GameOver);
        assert!(matches!(
            session.events.last(),
            Some(GameEvent::GameOver { level: 1, .. })
        ));
    }

    #[test]
    fn test_scenario_d_restart_resets_run() {
        let mut session = playing(GameConfig::default());
        park_pursuer(&mut session);
        let pickup = level(&mut session).pickups[0].rect.center();
        put_player_on(&mut session, pickup);
        idle(&mut session);
        session.level = 4;
        for _ in 0..3 {
            get_caught(&mut session);
            sit_out_hit(&mut session);
        }
        assert_eq!(session.phase, GamePhase::GameOver);
        assert!(session.score > 0);

        idle(&mut session);
        assert_eq!(session.phase, GamePhase::GameOver);

        tick(
            &mut session,
            &TickInput {
                restart: true,
                ..Default::default()
            },
        );
        assert_eq!(session.phase, GamePhase::Login);
        assert_eq!(session.level, 1);
        assert_eq!(session.score, 0);
        assert!(session.current.is_none());

        // A new run starts with full lives
        tick(&mut session, &confirm());
        assert_eq!(session.lives, 3);
    }

    #[test]
    fn test_entities_never_end_inside_walls() {
        let mut session = playing(GameConfig::default());
        let pattern = [
            Intent { right: true, ..Default::default() },
            Intent { down: true, right: true, ..Default::default() },
            Intent { down: true, ..Default::default() },
            Intent { left: true, up: true, ..Default::default() },
        ];
        for i in 0..2000 {
            let intent = pattern[(i / 37) % pattern.len()];
            tick(&mut session, &TickInput { intent, ..Default::default() });
            if session.phase == GamePhase::GameOver {
                break;
            }
            let level = level(&mut session);
            assert!(!level.world.overlaps_any(&level.player.rect), "tick {i}");
            assert!(!level.world.overlaps_any(&level.pursuer.rect), "tick {i}");
        }
    }

    #[test]
    fn test_camera_follows_player_in_large_maze() {
        let mut session = playing(GameConfig::from_preset(MazePreset::Large));
        park_pursuer(&mut session);
        put_player_on(&mut session, Vec2::new(820.0, 620.0));
        idle(&mut session);
        let camera = session.camera.unwrap();
        assert_eq!(camera.offset, Vec2::new(-420.0, -320.0));
    }

    #[test]
    fn test_quit_is_terminal() {
        let mut session = playing(GameConfig::default());
        tick(
            &mut session,
            &TickInput {
                quit: true,
                ..Default::default()
            },
        );
        assert_eq!(session.phase, GamePhase::Quit);
        let ticks = session.time_ticks;
        tick(&mut session, &confirm());
        assert_eq!(session.phase, GamePhase::Quit);
        assert_eq!(session.time_ticks, ticks);
    }

    #[test]
    fn test_determinism() {
        let mut a = playing(GameConfig::default());
        let mut b = playing(GameConfig::default());
        let input = TickInput {
            intent: Intent {
                right: true,
                down: true,
                ..Default::default()
            },
            ..Default::default()
        };
        for _ in 0..300 {
            tick(&mut a, &input);
            tick(&mut b, &input);
        }
        assert_eq!(a.phase, b.phase);
        assert_eq!(a.score, b.score);
        assert_eq!(a.lives, b.lives);
        assert_eq!(
            a.player().map(|p| p.rect.pos),
            b.player().map(|p| p.rect.pos)
        );
    }
}
