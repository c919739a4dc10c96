//! Session state and core simulation types
//!
//! One `GameState` owns every entity collection plus the session bookkeeping
//! (score, lives, stage, phase). It is threaded through every tick and command;
//! there is no ambient global state.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::boss::BossEncounter;
use super::entity::{Block, Bomb, Enemy, Item, ItemKind, Player, Projectile};
use super::spawn::SpawnScheduler;
use super::stage::StageDef;
use crate::consts::*;
use crate::tuning::Tuning;

/// Top-level session mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Before the first start (and after the campaign is complete)
    Idle,
    /// Active gameplay (damage-freeze is a transient sub-state of this)
    Running,
    /// Fully suspended
    Paused,
    /// Out of lives
    GameOver,
    /// Stage-clear item collected
    StageClear,
}

/// Things that happened during a tick or command, for audio and UI
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    StageStarted { stage: u32 },
    Jumped,
    Shot,
    BombDropped,
    EnemyStomped,
    EnemyShot,
    BossSpawned,
    BossHit { hit_points_left: u8 },
    BossDefeated,
    PlayerDamaged { lives: u8 },
    PlayerFellOut,
    BlockBroken,
    /// `applied` is false when the pickup had no effect (healing at full lives)
    ItemCollected { kind: ItemKind, applied: bool },
    StageClearItemSpawned,
    StageCleared { stage: u32, final_stage: bool },
    GameOver,
    Continued { continues_left: u8 },
    /// The session is back to Idle; `score` is the campaign total before the reset
    GameComplete { score: u64 },
    Paused,
    Resumed,
}

/// Read-only numbers for the HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HudSnapshot {
    pub score: u64,
    pub lives: u8,
    pub stage: u32,
    /// Present while a boss is alive
    pub boss_hit_points: Option<u8>,
    pub continues: u8,
    pub phase: GamePhase,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Current stage number
    pub stage: u32,
    pub score: u64,
    pub lives: u8,
    /// Continues left for this run
    pub continues: u8,
    /// Ticks simulated in the current stage
    pub time_ticks: u64,
    /// Simulated time in the current stage (ms, excludes pause and freeze)
    pub elapsed_ms: f64,
    /// Remaining damage-freeze (ms, 0 = not frozen)
    pub damage_freeze_ms: f32,
    /// Background scroll offset (wraps at the view width)
    pub background_x: f32,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub bombs: Vec<Bomb>,
    pub blocks: Vec<Block>,
    pub items: Vec<Item>,
    pub spawner: SpawnScheduler,
    pub boss: BossEncounter,
    /// One-shot guard for the stage-clear item
    pub stage_clear_item_spawned: bool,
}

impl GameState {
    /// Create an idle session with the given seed
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let continues = tuning.continues;
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            phase: GamePhase::Idle,
            stage: INITIAL_STAGE,
            score: 0,
            lives: MAX_LIVES,
            continues,
            time_ticks: 0,
            elapsed_ms: 0.0,
            damage_freeze_ms: 0.0,
            background_x: 0.0,
            player: Player::new(),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            bombs: Vec::new(),
            blocks: Vec::new(),
            items: Vec::new(),
            spawner: SpawnScheduler::default(),
            boss: BossEncounter::default(),
            stage_clear_item_spawned: false,
        };
        state.load_stage();
        state
    }

    /// Behavior table for the current stage
    pub fn stage_def(&self) -> StageDef {
        StageDef::for_stage(self.stage, self.tuning.stage_clear_score)
    }

    /// World scroll speed for the current stage (px/s)
    pub fn scroll_speed(&self) -> f32 {
        self.tuning.scroll_speed * self.stage_def().speed_multiplier
    }

    pub fn is_frozen(&self) -> bool {
        self.damage_freeze_ms > 0.0
    }

    /// Everything back to the start of the campaign
    pub fn reset_full(&mut self) {
        self.score = 0;
        self.lives = MAX_LIVES;
        self.continues = self.tuning.continues;
        self.stage = INITIAL_STAGE;
        self.load_stage();
    }

    /// Reset player and stage content and lay out the current stage
    pub fn load_stage(&mut self) {
        self.player.reset_to_spawn();
        self.enemies.clear();
        self.projectiles.clear();
        self.bombs.clear();
        self.items.clear();
        self.stage_clear_item_spawned = false;
        self.boss = BossEncounter::default();
        self.spawner = SpawnScheduler::default();
        self.background_x = 0.0;
        self.damage_freeze_ms = 0.0;
        self.time_ticks = 0;
        self.elapsed_ms = 0.0;
        self.blocks = self.stage_def().layout();
        log::info!("Stage {} loaded ({} blocks)", self.stage, self.blocks.len());
    }

    /// The boss enemy, if one is alive
    pub fn boss_enemy(&self) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.active && e.is_boss())
    }

    /// Drop every inactive entity. Runs once per tick after all updates.
    pub fn prune(&mut self) {
        self.enemies.retain(|e| e.active);
        self.projectiles.retain(|p| p.active);
        self.bombs.retain(|b| b.active);
        self.blocks.retain(|b| b.active);
        self.items.retain(|i| i.active);
    }

    pub fn hud(&self) -> HudSnapshot {
        let boss_hit_points = self
            .boss_enemy()
            .and_then(|e| e.boss())
            .map(|b| b.hit_points)
            .filter(|&hp| hp > 0);
        HudSnapshot {
            score: self.score,
            lives: self.lives,
            stage: self.stage,
            boss_hit_points,
            continues: self.continues,
            phase: self.phase,
        }
    }
}
