//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time comes in only as the per-tick delta
//! - Seeded RNG only
//! - Stable iteration order (collection order, pruned once per tick)
//! - No rendering, audio or platform dependencies

pub mod boss;
pub mod collision;
pub mod entity;
pub mod life;
pub mod physics;
pub mod rect;
pub mod session;
pub mod spawn;
pub mod stage;
pub mod state;
pub mod tick;

pub use boss::{BossEncounter, BossPhase};
pub use collision::{Contact, classify_contact};
pub use entity::{
    Block, BlockKind, Bomb, BossState, Enemy, EnemyKind, Item, ItemKind, Player, Projectile, SpriteCursor,
    blink_hidden,
};
pub use rect::Rect;
pub use session::{Command, apply_command};
pub use spawn::SpawnScheduler;
pub use stage::{ClearRule, StageDef};
pub use state::{GameEvent, GamePhase, GameState, HudSnapshot};
pub use tick::{MoveDir, TickInput, tick};
