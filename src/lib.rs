//! Stomp Runner - A side-scrolling stomp-and-shoot platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, spawning, boss, session state)
//! - `renderer`: Renderer capability and per-entity draw commands
//! - `platform`: Frame clock and input plumbing
//! - `audio`: Audio sink capability and clip mapping
//! - `tuning`: Data-driven game balance
//! - `game`: Host driver wiring the capabilities to the simulation

pub mod audio;
pub mod game;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use game::Game;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Visible area
    pub const VIEW_WIDTH: f32 = 500.0;
    pub const VIEW_HEIGHT: f32 = 500.0;

    /// Stage numbering (the campaign starts at stage 3)
    pub const INITIAL_STAGE: u32 = 3;
    pub const MAX_STAGE: u32 = 4;
    /// The stage hosting the boss encounter
    pub const BOSS_STAGE: u32 = 4;

    /// Lives cap
    pub const MAX_LIVES: u8 = 3;

    /// Player defaults
    pub const PLAYER_START_X: f32 = 100.0;
    pub const PLAYER_SIZE: f32 = 50.0;
    pub const PLAYER_MAX_SPEED: f32 = 250.0; // px/s
    pub const PLAYER_GRAVITY: f32 = 1.2; // px/s gained per ms
    pub const PLAYER_JUMP_VELOCITY: f32 = -550.0; // px/s
    pub const PLAYER_MAX_JUMPS: u8 = 2;

    /// Projectile defaults
    pub const PROJECTILE_SIZE: f32 = 20.0;
    pub const PROJECTILE_SPEED: f32 = 500.0;

    /// Bomb defaults
    pub const BOMB_SIZE: f32 = 50.0;
    pub const BOMB_GRAVITY: f32 = 0.8;

    /// Item sizes
    pub const ITEM_SIZE: f32 = 30.0;
    pub const STAGE_CLEAR_ITEM_SIZE: f32 = 40.0;

    /// Terrain block height
    pub const BLOCK_HEIGHT: f32 = 30.0;

    /// Entities falling this far below the view are gone
    pub const FALL_OUT_MARGIN: f32 = 50.0;
}

/// Count a millisecond timer down by `dt`, clamping at zero.
///
/// Returns true on the call that drains the timer.
#[inline]
pub fn tick_down(timer: &mut f32, dt: f32) -> bool {
    if *timer <= 0.0 {
        return false;
    }
    *timer -= dt;
    if *timer <= 0.0 {
        *timer = 0.0;
        true
    } else {
        false
    }
}

/// Count a cooldown down by `dt`. True while it sits at zero (ready to fire).
#[inline]
pub fn cooldown_ready(timer: &mut f32, dt: f32) -> bool {
    tick_down(timer, dt);
    *timer <= 0.0
}

/// Scale a px/s speed to the distance covered in `dt` milliseconds
#[inline]
pub fn px_per_ms(speed: f32, dt: f32) -> f32 {
    speed * dt / 1000.0
}
