//! Session lifecycle commands
//!
//! External commands map one-to-one onto phase transitions. A command that is
//! not valid in the current phase is a no-op and returns no events.

use serde::{Deserialize, Serialize};

use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Lifecycle commands accepted from the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Idle -> Running
    Start,
    /// GameOver -> Running, spending one continue
    Continue,
    /// GameOver or StageClear -> Running from the first stage
    RestartFull,
    /// Paused -> Running from the first stage
    RestartFromPause,
    /// StageClear -> Running on the next stage (or Idle after the last one)
    AdvanceStage,
    /// Running <-> Paused
    TogglePause,
}

/// Apply a command, returning the events it produced
pub fn apply_command(state: &mut GameState, command: Command) -> Vec<GameEvent> {
    let mut events = Vec::new();
    match (command, state.phase) {
        (Command::Start, GamePhase::Idle) => {
            state.reset_full();
            start_stage(state, &mut events);
        }
        (Command::Continue, GamePhase::GameOver) if state.continues > 0 => {
            state.continues -= 1;
            state.lives = MAX_LIVES;
            state.load_stage();
            events.push(GameEvent::Continued {
                continues_left: state.continues,
            });
            log::info!("Continue used, {} left", state.continues);
            start_stage(state, &mut events);
        }
        (Command::RestartFull, GamePhase::GameOver | GamePhase::StageClear)
        | (Command::RestartFromPause, GamePhase::Paused) => {
            log::info!("Restarting from stage {}", INITIAL_STAGE);
            state.reset_full();
            start_stage(state, &mut events);
        }
        (Command::AdvanceStage, GamePhase::StageClear) => {
            if state.stage_def().is_final() {
                let score = state.score;
                log::info!("Campaign complete with score {}", score);
                state.reset_full();
                state.phase = GamePhase::Idle;
                events.push(GameEvent::GameComplete { score });
            } else {
                state.stage += 1;
                state.lives = MAX_LIVES;
                state.load_stage();
                start_stage(state, &mut events);
            }
        }
        (Command::TogglePause, GamePhase::Running) => {
            state.phase = GamePhase::Paused;
            events.push(GameEvent::Paused);
        }
        (Command::TogglePause, GamePhase::Paused) => {
            state.phase = GamePhase::Running;
            events.push(GameEvent::Resumed);
        }
        (command, phase) => {
            log::debug!("Ignoring {:?} while {:?}", command, phase);
        }
    }
    events
}

fn start_stage(state: &mut GameState, events: &mut Vec<GameEvent>) {
    state.phase = GamePhase::Running;
    events.push(GameEvent::StageStarted { stage: state.stage });
}
