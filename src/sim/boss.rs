//! Boss encounter
//!
//! Dormant -> Spawned -> Defeated. While dormant a countdown accumulates tick
//! time; once it reaches the spawn delay the boss walks in from the right edge.
//! While spawned it patrols between two x-bounds, jumps on a randomized
//! cooldown and summons bomb-dropping minions on a fixed one. Each stomp that
//! lands outside its invincibility window costs one hit point; the last one
//! defeats it and drops a single fixed stage-clear item.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::{BossState, Enemy, EnemyKind, Item, ItemKind};
use super::physics::{ground_y, integrate_fall, tick_invincibility};
use super::state::{GameEvent, GameState};
use crate::consts::*;
use crate::tuning::Tuning;
use crate::{cooldown_ready, px_per_ms};

pub const BOSS_SIZE: f32 = 200.0;
pub const BOSS_PATROL_SPEED: f32 = 250.0;
pub const BOSS_PATROL_MARGIN: f32 = 50.0;
pub const BOSS_JUMP_VELOCITY: f32 = -1200.0;
pub const BOSS_GRAVITY: f32 = 1.0;
pub const MINION_SIZE: f32 = 80.0;

/// Encounter progress
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BossPhase {
    /// No boss yet; counts time towards the spawn
    Dormant { elapsed_ms: f32 },
    Spawned,
    Defeated,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BossEncounter {
    pub phase: BossPhase,
}

impl Default for BossEncounter {
    fn default() -> Self {
        Self {
            phase: BossPhase::Dormant { elapsed_ms: 0.0 },
        }
    }
}

/// Result of a stomp that registered on the boss
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BossHit {
    pub hit_points_left: u8,
    pub defeated: bool,
}

/// Build the boss just off the right edge, standing on the ground
pub fn spawn_boss<R: Rng>(rng: &mut R, tuning: &Tuning) -> Enemy {
    let state = BossState {
        hit_points: tuning.boss_hit_points,
        direction: -1.0,
        min_x: BOSS_PATROL_MARGIN,
        max_x: VIEW_WIDTH - BOSS_PATROL_MARGIN,
        patrol_speed: BOSS_PATROL_SPEED,
        vel_y: 0.0,
        jumping: false,
        jump_cooldown_ms: 0.0,
        jump_interval_ms: 3000.0 + rng.random::<f32>() * 2000.0,
        invincible_ms: 0.0,
        blink_ms: 0.0,
        minion_cooldown_ms: 0.0,
        defeated: false,
    };
    Enemy::new_boss(
        Vec2::new(VIEW_WIDTH, ground_y(BOSS_SIZE)),
        Vec2::splat(BOSS_SIZE),
        state,
    )
}

/// Run the dormant countdown on boss stages. Spawns the boss when it elapses.
pub fn advance_encounter(state: &mut GameState, dt: f32, events: &mut Vec<GameEvent>) {
    if !state.stage_def().has_boss {
        return;
    }
    let BossPhase::Dormant { elapsed_ms } = &mut state.boss.phase else {
        return;
    };
    *elapsed_ms += dt;
    if *elapsed_ms < state.tuning.boss_spawn_delay_ms {
        return;
    }

    // One boss per session stage
    if state.enemies.iter().any(|e| e.is_boss()) {
        state.boss.phase = BossPhase::Spawned;
        return;
    }
    let boss = spawn_boss(&mut state.rng, &state.tuning);
    state.enemies.push(boss);
    state.boss.phase = BossPhase::Spawned;
    events.push(GameEvent::BossSpawned);
    log::info!("Boss spawned on stage {}", state.stage);
}

/// Per-tick boss behavior. Returns a minion when one is summoned.
pub fn update_boss<R: Rng>(enemy: &mut Enemy, rng: &mut R, tuning: &Tuning, dt: f32) -> Option<Enemy> {
    let size = enemy.size;
    let BossParts { boss, pos } = split(enemy)?;
    if boss.defeated {
        return None;
    }

    tick_invincibility(&mut boss.invincible_ms, &mut boss.blink_ms, dt, tuning.blink_interval_ms);

    // Patrol
    pos.x += boss.direction * px_per_ms(boss.patrol_speed, dt);
    if pos.x <= boss.min_x {
        boss.direction = 1.0;
        pos.x = boss.min_x;
    } else if pos.x + size.x >= boss.max_x {
        boss.direction = -1.0;
        pos.x = boss.max_x - size.x;
    }

    // Jump
    if boss.jumping {
        integrate_fall(&mut pos.y, &mut boss.vel_y, BOSS_GRAVITY, dt);
        let ground = ground_y(size.y);
        if pos.y >= ground {
            pos.y = ground;
            boss.vel_y = 0.0;
            boss.jumping = false;
        }
    } else if cooldown_ready(&mut boss.jump_cooldown_ms, dt) {
        boss.jumping = true;
        boss.vel_y = BOSS_JUMP_VELOCITY;
        boss.jump_cooldown_ms = boss.jump_interval_ms;
    }

    let summon = cooldown_ready(&mut boss.minion_cooldown_ms, dt);
    if summon {
        boss.minion_cooldown_ms = tuning.boss_minion_cooldown_ms;
    }

    enemy.sprite.advance();

    summon.then(|| spawn_minion(rng))
}

struct BossParts<'a> {
    boss: &'a mut BossState,
    pos: &'a mut Vec2,
}

// Disjoint borrows of the position and the boss payload
fn split(enemy: &mut Enemy) -> Option<BossParts<'_>> {
    let Enemy { pos, kind, .. } = enemy;
    match kind {
        EnemyKind::Boss(boss) => Some(BossParts { boss, pos }),
        _ => None,
    }
}

/// A ground-level bomb dropper entering from the right edge
pub fn spawn_minion<R: Rng>(rng: &mut R) -> Enemy {
    let speed = 120.0 + rng.random::<f32>() * 60.0;
    let drop_interval = 2000.0 + rng.random::<f32>() * 1000.0;
    Enemy::bomb_dropper(
        Vec2::new(VIEW_WIDTH, ground_y(MINION_SIZE)),
        Vec2::splat(MINION_SIZE),
        speed,
        drop_interval,
    )
}

/// Register a stomp on the boss. Ignored (None) while invincible or defeated.
pub fn take_hit(enemy: &mut Enemy, tuning: &Tuning) -> Option<BossHit> {
    let boss = enemy.boss_mut()?;
    if boss.defeated || boss.is_invincible() {
        return None;
    }

    boss.hit_points = boss.hit_points.saturating_sub(1);
    boss.invincible_ms = tuning.boss_invincibility_ms;
    boss.blink_ms = 0.0;

    let defeated = boss.hit_points == 0;
    if defeated {
        boss.defeated = true;
        enemy.active = false;
    }
    Some(BossHit {
        hit_points_left: enemy.boss().map_or(0, |b| b.hit_points),
        defeated,
    })
}

/// The stage-clear item dropped at the boss's center
pub fn stage_clear_drop(boss: &Enemy) -> Item {
    let center = boss.rect().center();
    let half = STAGE_CLEAR_ITEM_SIZE / 2.0;
    Item::fixed(Vec2::new(center.x - half, center.y - half), ItemKind::StageClear)
}

/// Bookkeeping after a defeating hit: one stage-clear item per stage, ever
pub fn on_defeated(state: &mut GameState, drop: Item, events: &mut Vec<GameEvent>) {
    state.boss.phase = BossPhase::Defeated;
    events.push(GameEvent::BossDefeated);
    log::info!("Boss defeated");

    if !state.stage_clear_item_spawned {
        state.items.push(drop);
        state.stage_clear_item_spawned = true;
        events.push(GameEvent::StageClearItemSpawned);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::GamePhase;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn boss_stage() -> GameState {
        let mut state = GameState::new(42, Tuning::default());
        state.stage = BOSS_STAGE;
        state.load_stage();
        state.phase = GamePhase::Running;
        state
    }

    #[test]
    fn test_boss_spawns_after_delay_once() {
        let mut state = boss_stage();
        let mut events = Vec::new();
        advance_encounter(&mut state, 4999.0, &mut events);
        assert!(state.enemies.is_empty());

        advance_encounter(&mut state, 1.0, &mut events);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.boss.phase, BossPhase::Spawned);
        assert_eq!(events, vec![GameEvent::BossSpawned]);

        advance_encounter(&mut state, 10_000.0, &mut events);
        assert_eq!(state.enemies.iter().filter(|e| e.is_boss()).count(), 1);
    }

    #[test]
    fn test_no_boss_on_score_stage() {
        let mut state = GameState::new(42, Tuning::default());
        let mut events = Vec::new();
        advance_encounter(&mut state, 60_000.0, &mut events);
        assert!(state.enemies.is_empty());
    }

    #[test]
    fn test_five_hits_defeat_boss() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut boss = spawn_boss(&mut rng, &tuning);

        for expected_left in (0..5u8).rev() {
            let hit = take_hit(&mut boss, &tuning).expect("vulnerable boss takes the hit");
            assert_eq!(hit.hit_points_left, expected_left);
            assert_eq!(hit.defeated, expected_left == 0);
            // Burn off the invincibility window
            if let Some(b) = boss.boss_mut() {
                b.invincible_ms = 0.0;
            }
        }
        assert!(!boss.active);
        assert!(boss.boss().is_some_and(|b| b.defeated));
        // Defeat is terminal
        assert!(take_hit(&mut boss, &tuning).is_none());
    }

    #[test]
    fn test_invincibility_blocks_hits() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut boss = spawn_boss(&mut rng, &tuning);

        assert!(take_hit(&mut boss, &tuning).is_some());
        for _ in 0..10 {
            assert!(take_hit(&mut boss, &tuning).is_none());
        }
        assert_eq!(boss.boss().map(|b| b.hit_points), Some(4));

        // Window lapses through normal updates
        let mut elapsed = 0.0;
        while boss.boss().is_some_and(|b| b.is_invincible()) {
            update_boss(&mut boss, &mut rng, &tuning, 16.0);
            elapsed += 16.0;
        }
        assert!(elapsed >= tuning.boss_invincibility_ms);
        assert!(take_hit(&mut boss, &tuning).is_some());
    }

    #[test]
    fn test_patrol_reverses_at_bounds() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut boss = spawn_boss(&mut rng, &tuning);

        // Entering from the right edge snaps inside the right bound
        update_boss(&mut boss, &mut rng, &tuning, 16.0);
        assert_eq!(boss.pos.x, VIEW_WIDTH - BOSS_PATROL_MARGIN - BOSS_SIZE);
        assert_eq!(boss.boss().map(|b| b.direction), Some(-1.0));

        boss.pos.x = BOSS_PATROL_MARGIN + 1.0;
        update_boss(&mut boss, &mut rng, &tuning, 16.0);
        assert_eq!(boss.pos.x, BOSS_PATROL_MARGIN);
        assert_eq!(boss.boss().map(|b| b.direction), Some(1.0));
    }

    #[test]
    fn test_boss_jumps_and_lands() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut boss = spawn_boss(&mut rng, &tuning);

        update_boss(&mut boss, &mut rng, &tuning, 16.0);
        assert!(boss.boss().is_some_and(|b| b.jumping));

        let mut airborne = false;
        for _ in 0..200 {
            update_boss(&mut boss, &mut rng, &tuning, 16.0);
            airborne |= boss.pos.y < ground_y(BOSS_SIZE);
            if boss.boss().is_some_and(|b| !b.jumping) {
                break;
            }
        }
        assert!(airborne);
        assert!(boss.boss().is_some_and(|b| !b.jumping));
        assert_eq!(boss.pos.y, ground_y(BOSS_SIZE));
    }

    #[test]
    fn test_minions_on_cooldown() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(9);
        let mut boss = spawn_boss(&mut rng, &tuning);

        let first = update_boss(&mut boss, &mut rng, &tuning, 16.0);
        assert!(first.is_some_and(|m| matches!(m.kind, EnemyKind::BombDropper(_))));

        let mut summoned = 0;
        let mut t = 0.0;
        while t < tuning.boss_minion_cooldown_ms - 32.0 {
            summoned += update_boss(&mut boss, &mut rng, &tuning, 16.0).iter().count();
            t += 16.0;
        }
        assert_eq!(summoned, 0);
    }

    #[test]
    fn test_stage_clear_item_spawns_once() {
        let mut state = boss_stage();
        let tuning = state.tuning.clone();
        let mut boss = spawn_boss(&mut state.rng, &tuning);
        let mut events = Vec::new();

        for _ in 0..3 {
            let drop = stage_clear_drop(&boss);
            on_defeated(&mut state, drop, &mut events);
        }
        let clear_items = state
            .items
            .iter()
            .filter(|i| i.kind == ItemKind::StageClear)
            .count();
        assert_eq!(clear_items, 1);
        assert!(state.items[0].fixed);

        boss.pos = Vec2::new(100.0, 300.0);
        let drop = stage_clear_drop(&boss);
        assert_eq!(drop.pos, Vec2::new(180.0, 380.0));
    }
}
