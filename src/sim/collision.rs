//! Collision response
//!
//! Pair resolution runs once per tick after integration, in a fixed order:
//! player/enemies, projectiles/enemies, player/bombs, player/breakables,
//! player/items. Cross-entity effects are collected during each pass and
//! applied after it, so no pass holds two mutable borrows into the state.

use glam::Vec2;

use super::boss;
use super::entity::{BlockKind, Item, ItemKind};
use super::life;
use super::rect::Rect;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// How a player/enemy overlap is resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Landed on the enemy from above
    Stomp,
    /// Any other touch hurts the player
    Damage,
}

/// Falling, with the feet above the enemy's vertical midpoint, is a stomp
pub fn classify_contact(vel_y: f32, player_bottom: f32, enemy: &Rect) -> Contact {
    if vel_y > 0.0 && player_bottom < enemy.top() + enemy.h / 2.0 {
        Contact::Stomp
    } else {
        Contact::Damage
    }
}

/// Player against every live enemy, classified against the pre-pass player
pub fn resolve_player_enemies(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let body = state.player.rect();
    let vel_y = state.player.vel.y;

    let mut rebound = false;
    let mut hurt = false;
    let mut boss_drop = None;

    for enemy in state.enemies.iter_mut().filter(|e| e.is_live()) {
        let rect = enemy.rect();
        if !body.overlaps(&rect) {
            continue;
        }
        match classify_contact(vel_y, body.bottom(), &rect) {
            Contact::Stomp if enemy.is_boss() => {
                // The rebound happens even when the hit is ignored
                rebound = true;
                if let Some(hit) = boss::take_hit(enemy, &state.tuning) {
                    events.push(GameEvent::BossHit {
                        hit_points_left: hit.hit_points_left,
                    });
                    log::debug!("Boss hit, {} left", hit.hit_points_left);
                    if hit.defeated {
                        boss_drop = Some(boss::stage_clear_drop(enemy));
                    }
                }
            }
            Contact::Stomp => {
                enemy.stomp(state.tuning.stomp_despawn_ms);
                state.score += state.tuning.stomp_score;
                rebound = true;
                events.push(GameEvent::EnemyStomped);
            }
            Contact::Damage => hurt = true,
        }
    }

    if rebound {
        state.player.rebound();
    }
    if let Some(drop) = boss_drop {
        boss::on_defeated(state, drop, events);
    }
    if hurt {
        life::take_damage(state, events);
    }
}

/// Shots destroy the first non-boss enemy they touch
pub fn resolve_projectiles(state: &mut GameState, events: &mut Vec<GameEvent>) {
    for projectile in state.projectiles.iter_mut().filter(|p| p.active) {
        let shot = projectile.rect();
        let Some(enemy) = state
            .enemies
            .iter_mut()
            .find(|e| e.is_live() && !e.is_boss() && shot.overlaps(&e.rect()))
        else {
            continue;
        };
        enemy.active = false;
        projectile.active = false;
        state.score += state.tuning.shot_score;
        events.push(GameEvent::EnemyShot);
    }
}

/// A bomb that touches the player explodes and hurts
pub fn resolve_bombs(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let body = state.player.rect();
    let mut hurt = false;
    for bomb in state.bombs.iter_mut().filter(|b| b.active) {
        if body.overlaps(&bomb.rect()) {
            bomb.active = false;
            hurt = true;
        }
    }
    if hurt {
        life::take_damage(state, events);
    }
}

/// Whether a rising player is bumping the block from below
pub fn hits_from_below(vel_y: f32, body: &Rect, block: &Rect) -> bool {
    vel_y < 0.0 && body.overlaps(block) && body.top() > block.mid_y() && body.bottom() > block.bottom()
}

/// Item released by a broken block, just above its center
pub fn released_item(block: &Rect, kind: ItemKind) -> Item {
    Item::new(
        Vec2::new(block.x + block.w / 2.0 - ITEM_SIZE / 2.0, block.y - ITEM_SIZE - 5.0),
        kind,
    )
}

/// Breakable blocks bumped from below break once and may release an item
pub fn resolve_breakables(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let body = state.player.rect();
    let vel_y = state.player.vel.y;
    let mut ceiling = None;

    for block in state.blocks.iter_mut().filter(|b| b.active) {
        let rect = block.rect();
        let BlockKind::Breakable { broken, break_ms, item } = &mut block.kind else {
            continue;
        };
        if *broken || !hits_from_below(vel_y, &body, &rect) {
            continue;
        }
        *broken = true;
        *break_ms = state.tuning.block_break_ms;
        if let Some(kind) = item.take() {
            state.items.push(released_item(&rect, kind));
        }
        events.push(GameEvent::BlockBroken);
        ceiling = Some(rect.bottom());
        // One block per bump
        break;
    }

    if let Some(y) = ceiling {
        state.player.vel.y = 0.0;
        state.player.pos.y = y;
    }
}

/// Apply pickups. Returns true when the stage-clear item was collected.
pub fn resolve_items(state: &mut GameState, events: &mut Vec<GameEvent>) -> bool {
    let body = state.player.rect();

    for i in 0..state.items.len() {
        let item = &state.items[i];
        if !item.active || !body.overlaps(&item.rect()) {
            continue;
        }
        let kind = item.kind;
        state.items[i].active = false;

        let applied = match kind {
            ItemKind::Health => life::heal(state),
            ItemKind::Invincibility => {
                life::gain_invincibility(&mut state.player, &state.tuning);
                true
            }
            ItemKind::ShootAbility => {
                life::gain_shoot_ability(&mut state.player);
                true
            }
            ItemKind::StageClear => {
                events.push(GameEvent::ItemCollected { kind, applied: true });
                clear_stage(state, events);
                return true;
            }
        };
        events.push(GameEvent::ItemCollected { kind, applied });
    }
    false
}

fn clear_stage(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let final_stage = state.stage_def().is_final();
    state.phase = GamePhase::StageClear;
    events.push(GameEvent::StageCleared {
        stage: state.stage,
        final_stage,
    });
    log::info!("Stage {} cleared with score {}", state.stage, state.score);
}

/// Every pass in order. Stops early once the game is over or the stage cleared.
pub fn resolve_all(state: &mut GameState, events: &mut Vec<GameEvent>) {
    resolve_player_enemies(state, events);
    resolve_projectiles(state, events);
    resolve_bombs(state, events);
    resolve_breakables(state, events);
    if state.phase == GamePhase::Running {
        resolve_items(state, events);
    }
}
