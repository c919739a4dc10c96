//! Variable-delta simulation tick
//!
//! One call advances the world by `dt` milliseconds in a fixed phase order:
//! input, integration, collision, spawning and stage checks, then pruning.
//! Nothing runs outside `Running`, and during a damage-freeze only the freeze
//! countdown advances.

use serde::{Deserialize, Serialize};

use super::boss;
use super::collision;
use super::life;
use super::physics;
use super::spawn;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Horizontal intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveDir {
    Left,
    Right,
}

/// Input for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    /// Held direction, if any
    pub move_dir: Option<MoveDir>,
    /// Jump pressed since the last tick
    pub jump: bool,
    /// Shoot pressed since the last tick
    pub shoot: bool,
}

/// Advance the game state by `dt` milliseconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.phase != GamePhase::Running {
        return events;
    }
    let dt = dt.max(0.0);

    // Input arriving during the freeze is dropped
    if life::update_damage_freeze(state, dt) {
        return events;
    }

    state.time_ticks += 1;
    state.elapsed_ms += f64::from(dt);

    apply_input(state, input, &mut events);
    integrate_world(state, dt, &mut events);

    if state.phase == GamePhase::Running {
        collision::resolve_all(state, &mut events);
    }

    if state.phase == GamePhase::Running {
        boss::advance_encounter(state, dt, &mut events);
        spawn::run_spawns(state);
        spawn::check_score_clear(state, &mut events);
        state.score += 1;
    }

    state.prune();
    events
}

fn apply_input(state: &mut GameState, input: &TickInput, events: &mut Vec<GameEvent>) {
    let player = &mut state.player;
    player.vel.x = match input.move_dir {
        Some(MoveDir::Left) => -PLAYER_MAX_SPEED,
        Some(MoveDir::Right) => PLAYER_MAX_SPEED,
        None => 0.0,
    };

    if input.jump && player.jump() {
        events.push(GameEvent::Jumped);
    }

    if input.shoot
        && let Some(projectile) = player.shoot(state.tuning.shoot_cooldown_ms)
    {
        state.projectiles.push(projectile);
        events.push(GameEvent::Shot);
    }
}

fn integrate_world(state: &mut GameState, dt: f32, events: &mut Vec<GameEvent>) {
    physics::integrate_player(&mut state.player, &state.blocks, &state.tuning, dt);
    life::check_fall_out(state, events);
    if state.phase != GamePhase::Running {
        return;
    }

    let multiplier = state.stage_def().speed_multiplier;
    let scroll = state.scroll_speed();

    // Spawns from enemies are deferred until the pass is done
    let mut minions = Vec::new();
    for enemy in state.enemies.iter_mut().filter(|e| e.active) {
        if enemy.is_boss() {
            if let Some(minion) = boss::update_boss(enemy, &mut state.rng, &state.tuning, dt) {
                minions.push(minion);
            }
        } else if let Some(bomb) = physics::integrate_enemy(enemy, multiplier, dt) {
            state.bombs.push(bomb);
            events.push(GameEvent::BombDropped);
        }
    }
    if !minions.is_empty() {
        log::debug!("Boss summoned {} minion(s)", minions.len());
        state.enemies.extend(minions);
    }

    for projectile in state.projectiles.iter_mut().filter(|p| p.active) {
        physics::integrate_projectile(projectile, dt);
    }
    for bomb in state.bombs.iter_mut().filter(|b| b.active) {
        physics::integrate_bomb(bomb, scroll, dt);
    }
    for block in state.blocks.iter_mut().filter(|b| b.active) {
        physics::integrate_block(block, scroll, dt);
    }
    for item in state.items.iter_mut().filter(|i| i.active) {
        physics::integrate_item(item, scroll, dt);
    }
    state.background_x = physics::scroll_background(state.background_x, scroll, dt);
}
