//! Per-entity integration and sprite animation
//!
//! Positions advance by `velocity * dt / 1000` (velocities in px/s, `dt` in ms);
//! gravity is added as `vel.y += gravity * dt`. World-scrolled entities move
//! left by the stage scroll speed instead of their own velocity.

use super::entity::{
    Block, BlockKind, Bomb, Enemy, EnemyKind, Item, PLAYER_RUN_FRAMES, Player, Projectile,
};
use super::rect::Rect;
use crate::consts::*;
use crate::tuning::Tuning;
use crate::{px_per_ms, tick_down};

/// Advance an invincibility window and its blink phase together
pub fn tick_invincibility(invincible_ms: &mut f32, blink_ms: &mut f32, dt: f32, blink_interval_ms: f32) {
    if *invincible_ms <= 0.0 {
        return;
    }
    *blink_ms += dt;
    if *blink_ms >= blink_interval_ms * 2.0 {
        *blink_ms = 0.0;
    }
    if tick_down(invincible_ms, dt) {
        *blink_ms = 0.0;
    }
}

/// Free fall: position from the current velocity, then gravity
#[inline]
pub fn integrate_fall(pos_y: &mut f32, vel_y: &mut f32, gravity: f32, dt: f32) {
    *pos_y += px_per_ms(*vel_y, dt);
    *vel_y += gravity * dt;
}

/// Slack (px) for feet resting exactly on a surface
const LANDING_SLACK: f32 = 0.5;

/// Whether `block` stops a falling body whose feet were at `prev_bottom` last tick.
///
/// Feet touching the top count as contact. Blocks integrate after the player,
/// so a moving platform is compared against where its top was last tick.
fn catches(body: &Rect, prev_bottom: f32, block: &Block, dt: f32) -> bool {
    if !block.is_solid() {
        return false;
    }
    let top = block.pos.y;
    let prev_top = top - px_per_ms(block.vertical_speed(), dt);
    body.left() < block.pos.x + block.size.x
        && body.right() > block.pos.x
        && body.bottom() + LANDING_SLACK >= top
        && body.top() < top + block.size.y
        && prev_bottom <= prev_top.max(top) + LANDING_SLACK
}

/// Move the player, land on blocks or the ground, run timers and animation
pub fn integrate_player(player: &mut Player, blocks: &[Block], tuning: &Tuning, dt: f32) {
    let prev_bottom = player.pos.y + player.size.y;

    player.pos.x = (player.pos.x + px_per_ms(player.vel.x, dt)).clamp(0.0, VIEW_WIDTH - player.size.x);
    integrate_fall(&mut player.pos.y, &mut player.vel.y, PLAYER_GRAVITY, dt);

    let mut supported = false;
    if player.vel.y >= 0.0 {
        let body = player.rect();
        if let Some(block) = blocks.iter().find(|b| catches(&body, prev_bottom, b, dt)) {
            player.land_on(block.pos.y);
            // Ride moving platforms
            player.pos.y += px_per_ms(block.vertical_speed(), dt);
            supported = true;
        }
    }

    if !supported && player.pos.y >= VIEW_HEIGHT - player.size.y {
        player.land_on(VIEW_HEIGHT);
    }

    tick_invincibility(&mut player.invincible_ms, &mut player.blink_ms, dt, tuning.blink_interval_ms);
    tick_down(&mut player.shoot_cooldown_ms, dt);

    if player.sprite.step() {
        // The jump sheet has a single frame; standing still shows the first run frame
        player.sprite.frame = if !player.jumping && player.vel.x != 0.0 {
            (player.sprite.frame + 1) % PLAYER_RUN_FRAMES
        } else {
            0
        };
    }
}

/// Advance a non-boss enemy. Returns a bomb if a dropper released one.
pub fn integrate_enemy(enemy: &mut Enemy, speed_multiplier: f32, dt: f32) -> Option<Bomb> {
    if enemy.stomped {
        if tick_down(&mut enemy.stomp_ms, dt) {
            enemy.active = false;
        }
        return None;
    }

    enemy.pos.x -= px_per_ms(enemy.speed * speed_multiplier, dt);
    if enemy.pos.x + enemy.size.x < 0.0 {
        enemy.active = false;
    }
    enemy.sprite.advance();

    let rect = enemy.rect();
    match &mut enemy.kind {
        EnemyKind::Flying(path) => {
            path.angle += path.frequency * speed_multiplier * dt;
            enemy.pos.y = path.base_y + path.angle.sin() * path.amplitude;
            None
        }
        EnemyKind::BombDropper(bay) if enemy.active => {
            if crate::cooldown_ready(&mut bay.cooldown_ms, dt) {
                bay.cooldown_ms = bay.interval_ms;
                Some(Bomb::dropped_from(&rect))
            } else {
                None
            }
        }
        _ => None,
    }
}

pub fn integrate_projectile(projectile: &mut Projectile, dt: f32) {
    projectile.pos.x += px_per_ms(projectile.speed, dt);
    if projectile.pos.x > VIEW_WIDTH {
        projectile.active = false;
    }
}

/// Bombs fall while drifting left with the world
pub fn integrate_bomb(bomb: &mut Bomb, scroll_speed: f32, dt: f32) {
    bomb.pos.x -= px_per_ms(scroll_speed, dt);
    integrate_fall(&mut bomb.pos.y, &mut bomb.vel_y, bomb.gravity, dt);
    if bomb.pos.x + bomb.size.x < 0.0 || bomb.pos.y > VIEW_HEIGHT + FALL_OUT_MARGIN {
        bomb.active = false;
    }
}

pub fn integrate_block(block: &mut Block, scroll_speed: f32, dt: f32) {
    block.pos.x -= px_per_ms(scroll_speed, dt);

    match &mut block.kind {
        BlockKind::Static => {}
        BlockKind::MovingPlatform {
            min_y,
            max_y,
            speed_y,
            direction,
        } => {
            block.pos.y += px_per_ms(*direction * *speed_y, dt);
            if *direction < 0.0 && block.pos.y <= *min_y {
                block.pos.y = *min_y;
                *direction = 1.0;
            } else if *direction > 0.0 && block.pos.y + block.size.y >= *max_y {
                block.pos.y = *max_y - block.size.y;
                *direction = -1.0;
            }
        }
        BlockKind::Breakable { broken, break_ms, .. } => {
            if *broken && tick_down(break_ms, dt) {
                block.active = false;
            }
        }
    }

    if block.pos.x + block.size.x <= 0.0 {
        block.active = false;
    }
}

/// Non-fixed items scroll with the world; fixed ones wait to be collected
pub fn integrate_item(item: &mut Item, scroll_speed: f32, dt: f32) {
    if item.fixed {
        return;
    }
    item.pos.x -= px_per_ms(scroll_speed, dt);
    if item.pos.x + item.size.x < 0.0 {
        item.active = false;
    }
}

/// Background offset after scrolling, wrapped to one view width
pub fn scroll_background(background_x: f32, scroll_speed: f32, dt: f32) -> f32 {
    let x = background_x - px_per_ms(scroll_speed, dt);
    if x <= -VIEW_WIDTH { 0.0 } else { x }
}

/// Top y at which a body of `height` stands on the ground
pub fn ground_y(height: f32) -> f32 {
    VIEW_HEIGHT - height
}
