//! Stage definitions
//!
//! A stage decides pacing (scroll multiplier), what may spawn, how the stage is
//! cleared, and its hand-placed starting layout.

use serde::{Deserialize, Serialize};

use super::entity::{Block, ItemKind};
use crate::consts::*;

/// How a stage is cleared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClearRule {
    /// Reaching the score releases a stage-clear item
    Score(u64),
    /// Defeating the boss drops a stage-clear item
    BossDefeat,
}

/// Per-stage behavior table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StageDef {
    pub number: u32,
    /// Scales world scroll and enemy speed
    pub speed_multiplier: f32,
    pub clear_rule: ClearRule,
    /// Normal enemies come from the spawn scheduler
    pub spawns_enemies: bool,
    /// Timed item drops
    pub spawns_items: bool,
    /// Terrain is extended procedurally as it scrolls in
    pub procedural_terrain: bool,
    pub has_boss: bool,
}

impl StageDef {
    /// Look up a stage by number. Unknown numbers play like the first stage.
    pub fn for_stage(number: u32, clear_score: u64) -> Self {
        if number == BOSS_STAGE {
            Self {
                number,
                speed_multiplier: 1.5,
                clear_rule: ClearRule::BossDefeat,
                spawns_enemies: false,
                spawns_items: false,
                procedural_terrain: false,
                has_boss: true,
            }
        } else {
            Self {
                number,
                speed_multiplier: 1.0,
                clear_rule: ClearRule::Score(clear_score),
                spawns_enemies: true,
                spawns_items: true,
                procedural_terrain: true,
                has_boss: false,
            }
        }
    }

    /// Score needed to release the clear item (None on boss stages)
    pub fn clear_score(&self) -> Option<u64> {
        match self.clear_rule {
            ClearRule::Score(score) => Some(score),
            ClearRule::BossDefeat => None,
        }
    }

    pub fn is_final(&self) -> bool {
        self.number >= MAX_STAGE
    }

    /// Hand-placed starting blocks
    pub fn layout(&self) -> Vec<Block> {
        let h = VIEW_HEIGHT;
        if self.has_boss {
            // One lift near the left edge for reaching the boss's head
            vec![Block::moving_platform(100.0, 120.0, BLOCK_HEIGHT, h - 250.0, h - 100.0, 80.0)]
        } else {
            vec![
                Block::solid(50.0, h - 100.0, 100.0, BLOCK_HEIGHT),
                Block::solid(200.0, h - 200.0, 120.0, BLOCK_HEIGHT),
                Block::solid(350.0, h - 100.0, 80.0, BLOCK_HEIGHT),
                Block::breakable(500.0, h - 250.0, 70.0, BLOCK_HEIGHT, Some(ItemKind::Health)),
                Block::solid(650.0, h - 150.0, 90.0, BLOCK_HEIGHT),
            ]
        }
    }
}
