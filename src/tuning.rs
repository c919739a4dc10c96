//! Data-driven game balance
//!
//! Every timer and score value the simulation reads lives here so a run can be
//! re-balanced from a JSON file without touching code. Missing keys fall back
//! to the defaults below.

use serde::{Deserialize, Serialize};

/// Gameplay balance knobs (all durations in milliseconds)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Spawning ===
    /// Time between normal enemy spawns
    pub enemy_spawn_interval_ms: f64,
    /// Time between timed item spawns (score stages only)
    pub item_spawn_interval_ms: f64,

    // === Player ===
    /// Global freeze after the player takes damage
    pub damage_freeze_ms: f32,
    /// Invincibility window after damage or an invincibility pickup
    pub invincibility_ms: f32,
    /// Half-period of the invincibility blink
    pub blink_interval_ms: f32,
    /// Minimum time between shots
    pub shoot_cooldown_ms: f32,

    // === Enemies / blocks ===
    /// Squash animation before a stomped enemy despawns
    pub stomp_despawn_ms: f32,
    /// How long a broken block lingers before removal
    pub block_break_ms: f32,

    // === Boss ===
    pub boss_spawn_delay_ms: f32,
    pub boss_hit_points: u8,
    pub boss_invincibility_ms: f32,
    pub boss_minion_cooldown_ms: f32,

    // === Progression ===
    /// Score that releases the stage-clear item on score stages
    pub stage_clear_score: u64,
    /// Continues granted per run
    pub continues: u8,
    /// Base world scroll speed (px/s) before the stage multiplier
    pub scroll_speed: f32,
    pub stomp_score: u64,
    pub shot_score: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            enemy_spawn_interval_ms: 1500.0,
            item_spawn_interval_ms: 5000.0,

            damage_freeze_ms: 150.0,
            invincibility_ms: 3000.0,
            blink_interval_ms: 50.0,
            shoot_cooldown_ms: 300.0,

            stomp_despawn_ms: 200.0,
            block_break_ms: 100.0,

            boss_spawn_delay_ms: 5000.0,
            boss_hit_points: 5,
            boss_invincibility_ms: 3000.0,
            boss_minion_cooldown_ms: 4000.0,

            stage_clear_score: 6000,
            continues: 3,
            scroll_speed: 100.0,
            stomp_score: 100,
            shot_score: 150,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; absent fields keep their defaults
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let tuning: Self = serde_json::from_str(json)?;
        log::info!(
            "Loaded tuning: enemy every {}ms, clear at {} points",
            tuning.enemy_spawn_interval_ms,
            tuning.stage_clear_score
        );
        Ok(tuning)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "boss_hit_points": 2, "continues": 0 }"#).unwrap();
        assert_eq!(tuning.boss_hit_points, 2);
        assert_eq!(tuning.continues, 0);
        assert_eq!(tuning.enemy_spawn_interval_ms, 1500.0);
        assert_eq!(tuning.damage_freeze_ms, 150.0);
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(Tuning::from_json("{ boss_hit_points: ").is_err());
    }
}
