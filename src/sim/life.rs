//! Damage and life bookkeeping
//!
//! Player health, invincibility, the damage-freeze and pickup effects.

use super::entity::Player;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;
use crate::tick_down;
use crate::tuning::Tuning;

/// Apply contact damage. No-op while the player is invincible.
///
/// Returns true if a life was lost.
pub fn take_damage(state: &mut GameState, events: &mut Vec<GameEvent>) -> bool {
    if state.player.is_invincible() {
        return false;
    }

    state.lives = state.lives.saturating_sub(1);
    state.player.invincible_ms = state.tuning.invincibility_ms;
    state.player.blink_ms = 0.0;
    state.player.can_shoot = false;
    state.damage_freeze_ms = state.tuning.damage_freeze_ms;
    events.push(GameEvent::PlayerDamaged { lives: state.lives });
    log::debug!("Player hit, {} lives left", state.lives);

    if state.lives == 0 {
        state.phase = GamePhase::GameOver;
        events.push(GameEvent::GameOver);
        log::info!("Game over at stage {} with score {}", state.stage, state.score);
    }
    true
}

/// Count the damage-freeze down. Returns true while the world stays frozen.
pub fn update_damage_freeze(state: &mut GameState, dt: f32) -> bool {
    if !state.is_frozen() {
        return false;
    }
    tick_down(&mut state.damage_freeze_ms, dt);
    state.is_frozen()
}

/// One extra life, up to the cap. Returns false at full lives.
pub fn heal(state: &mut GameState) -> bool {
    if state.lives >= MAX_LIVES {
        return false;
    }
    state.lives += 1;
    true
}

pub fn gain_invincibility(player: &mut Player, tuning: &Tuning) {
    player.invincible_ms = tuning.invincibility_ms;
    player.blink_ms = 0.0;
}

pub fn gain_shoot_ability(player: &mut Player) {
    player.can_shoot = true;
    player.shoot_cooldown_ms = 0.0;
}

/// Falling out of the world costs a life; survivors respawn on the ground.
///
/// The ground spans the whole view on every current stage, so this only fires
/// for a player placed below it. It guards stages with gaps in the floor.
pub fn check_fall_out(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if state.player.pos.y <= VIEW_HEIGHT + FALL_OUT_MARGIN {
        return;
    }
    events.push(GameEvent::PlayerFellOut);
    take_damage(state, events);
    if state.lives > 0 {
        state.player.respawn_on_ground();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running_state() -> GameState {
        let mut state = GameState::new(7, Tuning::default());
        state.phase = GamePhase::Running;
        state
    }

    #[test]
    fn test_damage_costs_life_and_starts_windows() {
        let mut state = running_state();
        state.player.can_shoot = true;
        let mut events = Vec::new();

        assert!(take_damage(&mut state, &mut events));
        assert_eq!(state.lives, 2);
        assert!(state.player.is_invincible());
        assert!(!state.player.can_shoot);
        assert!(state.is_frozen());
        assert_eq!(events, vec![GameEvent::PlayerDamaged { lives: 2 }]);
    }

    #[test]
    fn test_damage_while_invincible_is_ignored() {
        let mut state = running_state();
        let mut events = Vec::new();
        take_damage(&mut state, &mut events);

        // Let the freeze run out but stay inside the invincibility window
        assert!(!update_damage_freeze(&mut state, 200.0));
        events.clear();

        assert!(!take_damage(&mut state, &mut events));
        assert_eq!(state.lives, 2);
        assert!(!state.is_frozen());
        assert!(events.is_empty());
    }

    #[test]
    fn test_last_life_ends_the_game() {
        let mut state = running_state();
        state.lives = 1;
        let mut events = Vec::new();
        take_damage(&mut state, &mut events);
        assert_eq!(state.lives, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(events.contains(&GameEvent::GameOver));
    }

    #[test]
    fn test_freeze_counts_down() {
        let mut state = running_state();
        state.damage_freeze_ms = 150.0;
        assert!(update_damage_freeze(&mut state, 100.0));
        assert!(!update_damage_freeze(&mut state, 100.0));
        assert!(!update_damage_freeze(&mut state, 100.0));
    }

    #[test]
    fn test_heal_caps_at_max() {
        let mut state = running_state();
        assert!(!heal(&mut state));
        state.lives = 1;
        assert!(heal(&mut state));
        assert_eq!(state.lives, 2);
    }

    #[test]
    fn test_fall_out_respawns_on_ground() {
        let mut state = running_state();
        state.player.pos.y = VIEW_HEIGHT + 60.0;
        let mut events = Vec::new();
        check_fall_out(&mut state, &mut events);
        assert_eq!(state.lives, 2);
        assert_eq!(state.player.pos.y, VIEW_HEIGHT - PLAYER_SIZE);
        assert_eq!(events[0], GameEvent::PlayerFellOut);
    }

    #[test]
    fn test_pickup_effects() {
        let mut player = Player::new();
        let tuning = Tuning::default();
        gain_invincibility(&mut player, &tuning);
        assert_eq!(player.invincible_ms, tuning.invincibility_ms);
        player.shoot_cooldown_ms = 100.0;
        gain_shoot_ability(&mut player);
        assert!(player.can_shoot);
        assert_eq!(player.shoot_cooldown_ms, 0.0);
    }
}
