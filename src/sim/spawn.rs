//! Spawn scheduling
//!
//! Normal enemies and timed items arrive on fixed intervals measured in stage
//! time; terrain is extended whenever the rightmost block scrolls far enough in.
//! Every random draw comes from the session's seeded generator.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::{Block, Enemy, Item, ItemKind};
use super::physics::ground_y;
use super::state::{GameEvent, GameState};
use crate::consts::*;

/// Last spawn timestamps in stage time (ms)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SpawnScheduler {
    pub last_enemy_ms: f64,
    pub last_item_ms: f64,
}

/// Normal enemy archetypes on score stages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Archetype {
    BombDropper,
    Ground,
    Flying,
    Ground2,
}

/// Weighted table: 30% BombDropper, 30% Ground, 20% Flying, 20% Ground2
pub fn pick_archetype(roll: f32) -> Archetype {
    if roll < 0.3 {
        Archetype::BombDropper
    } else if roll < 0.6 {
        Archetype::Ground
    } else if roll < 0.8 {
        Archetype::Flying
    } else {
        Archetype::Ground2
    }
}

/// Instantiate an archetype just past the right edge
pub fn spawn_enemy<R: Rng>(archetype: Archetype, rng: &mut R) -> Enemy {
    let x = VIEW_WIDTH;
    match archetype {
        Archetype::BombDropper => {
            let y = rng.random::<f32>() * 150.0;
            let speed = 80.0 + rng.random::<f32>() * 40.0;
            let interval = 2000.0 + rng.random::<f32>() * 1000.0;
            Enemy::bomb_dropper(Vec2::new(x, y), Vec2::splat(60.0), speed, interval)
        }
        Archetype::Ground => {
            let speed = 100.0 + rng.random::<f32>() * 50.0;
            Enemy::ground(Vec2::new(x, ground_y(60.0)), Vec2::splat(60.0), speed)
        }
        Archetype::Flying => {
            let y = 200.0 + rng.random::<f32>() * 100.0;
            let speed = 80.0 + rng.random::<f32>() * 40.0;
            let amplitude = 20.0 + rng.random::<f32>() * 30.0;
            let frequency = 0.00005 + rng.random::<f32>() * 0.00005;
            let phase = rng.random::<f32>() * std::f32::consts::TAU;
            Enemy::flying(Vec2::new(x, y), Vec2::new(50.0, 30.0), speed, amplitude, frequency, phase)
        }
        Archetype::Ground2 => {
            let speed = 120.0 + rng.random::<f32>() * 60.0;
            Enemy::ground2(Vec2::new(x, ground_y(80.0)), Vec2::splat(80.0), speed)
        }
    }
}

/// Timed item kinds: 55% Health, 30% Invincibility, 15% ShootAbility
pub fn pick_timed_item(roll: f32) -> ItemKind {
    if roll < 0.55 {
        ItemKind::Health
    } else if roll < 0.85 {
        ItemKind::Invincibility
    } else {
        ItemKind::ShootAbility
    }
}

/// A timed item at the right edge, 100 to 250 px above the ground
pub fn spawn_timed_item<R: Rng>(rng: &mut R) -> Item {
    let kind = pick_timed_item(rng.random());
    let lift = rng.random::<f32>() * 150.0 + 100.0;
    Item::new(Vec2::new(VIEW_WIDTH, VIEW_HEIGHT - ITEM_SIZE - lift), kind)
}

/// Next terrain block after `last`, or None while the last one is still far right
pub fn next_block<R: Rng>(last: &Block, rng: &mut R) -> Option<Block> {
    if last.pos.x >= VIEW_WIDTH * 0.8 {
        return None;
    }
    let width = 80.0 + rng.random::<f32>() * 50.0;
    let gap = 50.0 + rng.random::<f32>() * 50.0;
    let x = last.pos.x + last.size.x + gap;
    let y = (last.pos.y + (rng.random::<f32>() - 0.5) * 50.0).clamp(VIEW_HEIGHT - 400.0, VIEW_HEIGHT - 50.0);

    if rng.random::<f32>() < 0.25 {
        let item = (rng.random::<f32>() < 0.8).then(|| {
            if rng.random::<f32>() < 0.5 {
                ItemKind::Health
            } else {
                ItemKind::Invincibility
            }
        });
        Some(Block::breakable(x, y, width, BLOCK_HEIGHT, item))
    } else {
        Some(Block::solid(x, y, width, BLOCK_HEIGHT))
    }
}

/// Run the scheduler for this tick
pub fn run_spawns(state: &mut GameState) {
    let def = state.stage_def();
    let now = state.elapsed_ms;

    if def.spawns_enemies && now - state.spawner.last_enemy_ms >= state.tuning.enemy_spawn_interval_ms {
        state.spawner.last_enemy_ms = now;
        let archetype = pick_archetype(state.rng.random());
        let enemy = spawn_enemy(archetype, &mut state.rng);
        log::debug!("Spawned {:?} at y={:.0}", archetype, enemy.pos.y);
        state.enemies.push(enemy);
    }

    if def.spawns_items && now - state.spawner.last_item_ms >= state.tuning.item_spawn_interval_ms {
        state.spawner.last_item_ms = now;
        let item = spawn_timed_item(&mut state.rng);
        log::debug!("Spawned {:?} item", item.kind);
        state.items.push(item);
    }

    if def.procedural_terrain {
        extend_terrain(state);
    }
}

/// Append one block past the rightmost active block when it has scrolled in
pub fn extend_terrain(state: &mut GameState) {
    let Some(last) = state
        .blocks
        .iter()
        .filter(|b| b.active)
        .max_by(|a, b| a.pos.x.total_cmp(&b.pos.x))
    else {
        return;
    };
    if let Some(block) = next_block(last, &mut state.rng) {
        state.blocks.push(block);
    }
}

/// Release the scrolling stage-clear item once the score threshold is met
pub fn check_score_clear(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if state.stage_clear_item_spawned {
        return;
    }
    let Some(threshold) = state.stage_def().clear_score() else {
        return;
    };
    if state.score < threshold {
        return;
    }
    let pos = Vec2::new(VIEW_WIDTH + 100.0, VIEW_HEIGHT - 140.0);
    state.items.push(Item::new(pos, ItemKind::StageClear));
    state.stage_clear_item_spawned = true;
    events.push(GameEvent::StageClearItemSpawned);
    log::info!("Stage clear item released at score {}", state.score);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{BlockKind, EnemyKind};
    use crate::sim::state::GamePhase;
    use crate::tuning::Tuning;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn running(stage: u32) -> GameState {
        let mut state = GameState::new(11, Tuning::default());
        state.stage = stage;
        state.load_stage();
        state.phase = GamePhase::Running;
        state
    }

    #[test]
    fn test_archetype_table() {
        assert_eq!(pick_archetype(0.0), Archetype::BombDropper);
        assert_eq!(pick_archetype(0.29), Archetype::BombDropper);
        assert_eq!(pick_archetype(0.3), Archetype::Ground);
        assert_eq!(pick_archetype(0.6), Archetype::Flying);
        assert_eq!(pick_archetype(0.8), Archetype::Ground2);
        assert_eq!(pick_archetype(0.999), Archetype::Ground2);
    }

    #[test]
    fn test_timed_item_table() {
        assert_eq!(pick_timed_item(0.1), ItemKind::Health);
        assert_eq!(pick_timed_item(0.6), ItemKind::Invincibility);
        assert_eq!(pick_timed_item(0.9), ItemKind::ShootAbility);
    }

    #[test]
    fn test_enemies_spawn_off_right_edge() {
        let mut rng = Pcg32::seed_from_u64(2);
        for archetype in [
            Archetype::BombDropper,
            Archetype::Ground,
            Archetype::Flying,
            Archetype::Ground2,
        ] {
            let enemy = spawn_enemy(archetype, &mut rng);
            assert_eq!(enemy.pos.x, VIEW_WIDTH);
            assert!(enemy.active);
        }

        let ground = spawn_enemy(Archetype::Ground2, &mut rng);
        assert_eq!(ground.pos.y + ground.size.y, VIEW_HEIGHT);
        let flyer = spawn_enemy(Archetype::Flying, &mut rng);
        assert!(matches!(flyer.kind, EnemyKind::Flying(_)));
        assert!((200.0..300.0).contains(&flyer.pos.y));
    }

    #[test]
    fn test_enemy_interval() {
        let mut state = running(INITIAL_STAGE);
        state.elapsed_ms = 1499.0;
        run_spawns(&mut state);
        assert!(state.enemies.is_empty());

        state.elapsed_ms = 1500.0;
        run_spawns(&mut state);
        assert_eq!(state.enemies.len(), 1);

        state.elapsed_ms = 2000.0;
        run_spawns(&mut state);
        assert_eq!(state.enemies.len(), 1);

        state.elapsed_ms = 3000.0;
        run_spawns(&mut state);
        assert_eq!(state.enemies.len(), 2);
    }

    #[test]
    fn test_item_interval() {
        let mut state = running(INITIAL_STAGE);
        state.elapsed_ms = 4999.0;
        run_spawns(&mut state);
        assert!(state.items.is_empty());
        state.elapsed_ms = 5000.0;
        run_spawns(&mut state);
        assert_eq!(state.items.len(), 1);
        let item = &state.items[0];
        assert!(item.pos.y >= VIEW_HEIGHT - ITEM_SIZE - 250.0);
        assert!(item.pos.y <= VIEW_HEIGHT - ITEM_SIZE - 100.0);
    }

    #[test]
    fn test_boss_stage_spawns_nothing() {
        let mut state = running(BOSS_STAGE);
        let blocks = state.blocks.len();
        state.elapsed_ms = 60_000.0;
        run_spawns(&mut state);
        assert!(state.enemies.is_empty());
        assert!(state.items.is_empty());
        assert_eq!(state.blocks.len(), blocks);
    }

    #[test]
    fn test_terrain_extends_only_when_scrolled_in() {
        let mut state = running(INITIAL_STAGE);
        // Rightmost starting block sits at x=650
        extend_terrain(&mut state);
        assert_eq!(state.blocks.len(), 5);

        for block in &mut state.blocks {
            block.pos.x -= 300.0;
        }
        extend_terrain(&mut state);
        assert_eq!(state.blocks.len(), 6);

        let last = &state.blocks[5];
        assert!(last.pos.x >= 350.0 + 90.0 + 50.0);
        assert!(last.pos.y >= VIEW_HEIGHT - 400.0 && last.pos.y <= VIEW_HEIGHT - 50.0);
        assert_eq!(last.size.y, BLOCK_HEIGHT);
    }

    #[test]
    fn test_terrain_mix_includes_breakables() {
        let mut rng = Pcg32::seed_from_u64(99);
        let mut last = Block::solid(0.0, 300.0, 100.0, BLOCK_HEIGHT);
        let mut breakables = 0;
        for _ in 0..400 {
            let mut next = next_block(&last, &mut rng).expect("anchor is left of the threshold");
            if matches!(next.kind, BlockKind::Breakable { .. }) {
                breakables += 1;
            }
            next.pos.x = 0.0;
            last = next;
        }
        assert!((50..150).contains(&breakables), "got {breakables}");
    }

    #[test]
    fn test_score_clear_item_once() {
        let mut state = running(INITIAL_STAGE);
        let mut events = Vec::new();
        state.score = 5999;
        check_score_clear(&mut state, &mut events);
        assert!(state.items.is_empty());

        state.score = 6000;
        check_score_clear(&mut state, &mut events);
        check_score_clear(&mut state, &mut events);
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.items[0].kind, ItemKind::StageClear);
        assert!(!state.items[0].fixed);
        assert_eq!(events, vec![GameEvent::StageClearItemSpawned]);
    }

    #[test]
    fn test_no_score_clear_on_boss_stage() {
        let mut state = running(BOSS_STAGE);
        state.score = 1_000_000;
        let mut events = Vec::new();
        check_score_clear(&mut state, &mut events);
        assert!(state.items.is_empty());
    }
}
