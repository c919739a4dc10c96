//! Draw command generation for every entity

use super::assets::AssetId;
use super::{Color, DrawCommand, colors};
use crate::consts::*;
use crate::sim::{BlockKind, Enemy, EnemyKind, GameState, ItemKind, Player, Rect, SpriteCursor, blink_hidden};

/// Height fraction a stomped enemy is squashed to
const SQUISH_FACTOR: f32 = 0.2;

/// Source rectangle of the cursor's current frame
fn frame_rect(asset: AssetId, frame: u32) -> Option<Rect> {
    asset
        .frame_size()
        .map(|(w, h)| Rect::new(frame as f32 * w, 0.0, w, h))
}

fn background(state: &GameState, out: &mut Vec<DrawCommand>) {
    let (asset, color) = if state.stage_def().has_boss {
        (AssetId::BackgroundStage2, colors::DARK_BLUE)
    } else {
        (AssetId::Background, colors::SKY_BLUE)
    };
    let view = Rect::new(0.0, 0.0, VIEW_WIDTH, VIEW_HEIGHT);
    for offset in [0.0, VIEW_WIDTH] {
        let dest = Rect::new(state.background_x + offset, 0.0, VIEW_WIDTH, VIEW_HEIGHT);
        out.push(DrawCommand {
            fallback_dest: view,
            ..DrawCommand::new(asset, None, dest, color)
        });
    }
}

fn player_sprite(player: &Player) -> DrawCommand {
    let (asset, frame) = if player.jumping {
        (AssetId::PlayerJump, player.sprite.frame)
    } else if player.vel.x == 0.0 {
        (AssetId::PlayerRun, 0)
    } else {
        (AssetId::PlayerRun, player.sprite.frame)
    };
    DrawCommand::new(asset, frame_rect(asset, frame), player.rect(), colors::RED)
}

fn enemy_asset(kind: &EnemyKind) -> AssetId {
    match kind {
        EnemyKind::Ground => AssetId::Enemy,
        EnemyKind::Flying(_) => AssetId::FlyingEnemy,
        EnemyKind::Ground2 => AssetId::GroundEnemy,
        EnemyKind::BombDropper(_) => AssetId::BombDropper,
        EnemyKind::Boss(_) => AssetId::Boss,
    }
}

fn enemy_sprite(enemy: &Enemy) -> DrawCommand {
    let asset = enemy_asset(&enemy.kind);
    if enemy.stomped {
        // Squashed flat against its feet on the first frame
        let h = enemy.size.y * SQUISH_FACTOR;
        let dest = Rect::new(enemy.pos.x, enemy.pos.y + enemy.size.y - h, enemy.size.x, h);
        return DrawCommand::new(asset, frame_rect(asset, 0), dest, colors::GREEN);
    }
    let SpriteCursor { frame, .. } = enemy.sprite;
    DrawCommand::new(asset, frame_rect(asset, frame), enemy.rect(), colors::GREEN)
}

fn item_look(kind: ItemKind) -> (AssetId, Color) {
    match kind {
        ItemKind::Health => (AssetId::HealthItem, colors::PINK),
        ItemKind::Invincibility => (AssetId::InvincibilityItem, colors::GRAY),
        ItemKind::ShootAbility => (AssetId::ShootItem, colors::PURPLE),
        ItemKind::StageClear => (AssetId::StageClearItem, colors::GOLD),
    }
}

/// Everything visible this frame, back to front.
///
/// With `reduced_motion` invincible entities stay visible instead of blinking.
pub fn build_draw_list(state: &GameState, reduced_motion: bool) -> Vec<DrawCommand> {
    let blink = state.tuning.blink_interval_ms;
    let mut out = Vec::with_capacity(
        2 + 1 + state.enemies.len() + state.projectiles.len() + state.bombs.len() + state.blocks.len() + state.items.len(),
    );

    background(state, &mut out);

    if reduced_motion || !state.player.blinked_out(blink) {
        out.push(player_sprite(&state.player));
    }

    for enemy in state.enemies.iter().filter(|e| e.active) {
        let hidden = enemy
            .boss()
            .is_some_and(|b| b.is_invincible() && blink_hidden(b.blink_ms, blink));
        if reduced_motion || !hidden {
            out.push(enemy_sprite(enemy));
        }
    }

    for projectile in state.projectiles.iter().filter(|p| p.active) {
        out.push(DrawCommand::new(AssetId::PlayerProjectile, None, projectile.rect(), colors::BLUE));
    }

    for bomb in state.bombs.iter().filter(|b| b.active) {
        out.push(DrawCommand::new(AssetId::Bomb, None, bomb.rect(), colors::BLACK));
    }

    for block in state.blocks.iter().filter(|b| b.active) {
        let r = block.rect();
        match block.kind {
            BlockKind::Breakable { broken: true, .. } => out.push(DrawCommand {
                fallback_dest: Rect::new(r.x, r.y + r.h * 0.2, r.w, r.h * 0.8),
                ..DrawCommand::new(
                    AssetId::BreakableBlock,
                    None,
                    Rect::new(r.x, r.y, r.w, r.h * 0.5),
                    colors::GRAY,
                )
            }),
            BlockKind::Breakable { .. } => {
                out.push(DrawCommand::new(AssetId::BreakableBlock, None, r, colors::BROWN))
            }
            BlockKind::Static | BlockKind::MovingPlatform { .. } => {
                out.push(DrawCommand::new(AssetId::Block, None, r, colors::BROWN))
            }
        }
    }

    for item in state.items.iter().filter(|i| i.active) {
        let (asset, color) = item_look(item.kind);
        out.push(DrawCommand::new(asset, None, item.rect(), color));
    }

    out
}
