//! Asset names and load status
//!
//! Loading happens in the host. It reports each outcome here, and drawing
//! consults the table to choose between the image and its color fallback.

use std::collections::HashMap;

use serde::Serialize;

/// Every image the game references
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AssetId {
    PlayerRun,
    PlayerJump,
    Enemy,
    FlyingEnemy,
    GroundEnemy,
    BombDropper,
    Boss,
    Bomb,
    Block,
    BreakableBlock,
    HealthItem,
    InvincibilityItem,
    ShootItem,
    StageClearItem,
    PlayerProjectile,
    Background,
    BackgroundStage2,
}

impl AssetId {
    pub const ALL: [AssetId; 17] = [
        AssetId::PlayerRun,
        AssetId::PlayerJump,
        AssetId::Enemy,
        AssetId::FlyingEnemy,
        AssetId::GroundEnemy,
        AssetId::BombDropper,
        AssetId::Boss,
        AssetId::Bomb,
        AssetId::Block,
        AssetId::BreakableBlock,
        AssetId::HealthItem,
        AssetId::InvincibilityItem,
        AssetId::ShootItem,
        AssetId::StageClearItem,
        AssetId::PlayerProjectile,
        AssetId::Background,
        AssetId::BackgroundStage2,
    ];

    /// Stable symbolic name the host resolves to a file
    pub fn name(self) -> &'static str {
        match self {
            AssetId::PlayerRun => "player_run",
            AssetId::PlayerJump => "player_jump",
            AssetId::Enemy => "enemy",
            AssetId::FlyingEnemy => "flying_enemy",
            AssetId::GroundEnemy => "ground_enemy",
            AssetId::BombDropper => "bomb_dropper",
            AssetId::Boss => "stage2_enemy",
            AssetId::Bomb => "bomb",
            AssetId::Block => "block",
            AssetId::BreakableBlock => "breakable_block",
            AssetId::HealthItem => "health_item",
            AssetId::InvincibilityItem => "invincibility_item",
            AssetId::ShootItem => "shoot_item",
            AssetId::StageClearItem => "stage_clear_item",
            AssetId::PlayerProjectile => "player_projectile",
            AssetId::Background => "background",
            AssetId::BackgroundStage2 => "background_stage2",
        }
    }

    /// Frame size for horizontal sprite sheets; None for single images
    pub fn frame_size(self) -> Option<(f32, f32)> {
        match self {
            AssetId::PlayerRun | AssetId::PlayerJump => Some((32.0, 32.0)),
            AssetId::Enemy | AssetId::FlyingEnemy => Some((60.0, 40.0)),
            AssetId::GroundEnemy => Some((64.0, 64.0)),
            AssetId::BombDropper => Some((48.0, 48.0)),
            AssetId::Boss => Some((100.0, 100.0)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetStatus {
    Pending,
    Ready,
    Failed(String),
}

/// Load status per asset. Unknown assets count as pending.
#[derive(Debug, Clone, Default)]
pub struct AssetTable {
    status: HashMap<AssetId, AssetStatus>,
}

impl AssetTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// A table where everything resolved (tests, headless hosts)
    pub fn all_ready() -> Self {
        let mut table = Self::new();
        for id in AssetId::ALL {
            table.mark_ready(id);
        }
        table
    }

    pub fn mark_ready(&mut self, id: AssetId) {
        self.status.insert(id, AssetStatus::Ready);
    }

    /// Record a failed load. Drawing degrades to the color fallback.
    pub fn mark_failed(&mut self, id: AssetId, reason: &str) {
        log::warn!("Asset '{}' failed to load: {}", id.name(), reason);
        self.status.insert(id, AssetStatus::Failed(reason.to_owned()));
    }

    pub fn status(&self, id: AssetId) -> AssetStatus {
        self.status.get(&id).cloned().unwrap_or(AssetStatus::Pending)
    }

    pub fn is_ready(&self, id: AssetId) -> bool {
        matches!(self.status.get(&id), Some(AssetStatus::Ready))
    }

    /// Assets not yet resolved either way
    pub fn pending(&self) -> usize {
        AssetId::ALL.iter().filter(|id| !self.status.contains_key(id)).count()
    }
}
