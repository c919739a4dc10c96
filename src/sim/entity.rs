//! Entity records
//!
//! Plain data for everything that lives in the world. Behavior lives in
//! `physics` (integration), `collision` (pair resolution) and `boss`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::consts::*;

/// Frame cursor into a horizontal sprite sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteCursor {
    /// Current frame index
    pub frame: u32,
    /// Ticks since the last frame change
    pub counter: u32,
    /// Frames in the sheet
    pub frame_count: u32,
    /// Ticks per frame
    pub anim_speed: u32,
}

impl SpriteCursor {
    pub fn new(frame_count: u32, anim_speed: u32) -> Self {
        Self {
            frame: 0,
            counter: 0,
            frame_count: frame_count.max(1),
            anim_speed: anim_speed.max(1),
        }
    }

    /// Count one tick; returns true when the threshold was reached this call
    pub fn step(&mut self) -> bool {
        self.counter += 1;
        if self.counter >= self.anim_speed {
            self.counter = 0;
            true
        } else {
            false
        }
    }

    /// Count one tick and cycle the frame at the threshold
    pub fn advance(&mut self) {
        if self.step() {
            self.frame = (self.frame + 1) % self.frame_count;
        }
    }
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    /// x = horizontal speed from input, y = vertical velocity (px/s)
    pub vel: Vec2,
    pub jumping: bool,
    /// Jump charges left before touching ground again
    pub jumps_left: u8,
    /// Run sheet cursor (the jump sheet reuses it with one frame)
    pub sprite: SpriteCursor,
    /// Remaining invincibility (ms, 0 = vulnerable)
    pub invincible_ms: f32,
    /// Blink phase accumulator (ms)
    pub blink_ms: f32,
    pub can_shoot: bool,
    pub shoot_cooldown_ms: f32,
}

/// Run sheet frames
pub const PLAYER_RUN_FRAMES: u32 = 6;
const PLAYER_ANIM_SPEED: u32 = 5;

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    pub fn new() -> Self {
        Self {
            pos: Self::spawn_point(),
            size: Vec2::splat(PLAYER_SIZE),
            vel: Vec2::ZERO,
            jumping: false,
            jumps_left: PLAYER_MAX_JUMPS,
            sprite: SpriteCursor::new(PLAYER_RUN_FRAMES, PLAYER_ANIM_SPEED),
            invincible_ms: 0.0,
            blink_ms: 0.0,
            can_shoot: false,
            shoot_cooldown_ms: 0.0,
        }
    }

    /// Stage start position: one body height above the ground
    pub fn spawn_point() -> Vec2 {
        Vec2::new(PLAYER_START_X, VIEW_HEIGHT - PLAYER_SIZE - PLAYER_SIZE)
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible_ms > 0.0
    }

    /// Back to the stage start position with no buffs (stage load / continue)
    pub fn reset_to_spawn(&mut self) {
        self.pos = Self::spawn_point();
        self.vel = Vec2::ZERO;
        self.jumping = false;
        self.jumps_left = PLAYER_MAX_JUMPS;
        self.invincible_ms = 0.0;
        self.blink_ms = 0.0;
        self.can_shoot = false;
        self.shoot_cooldown_ms = 0.0;
    }

    /// Put the player back on the ground after falling out of the world
    pub fn respawn_on_ground(&mut self) {
        self.pos = Vec2::new(PLAYER_START_X, VIEW_HEIGHT - self.size.y);
        self.vel.y = 0.0;
        self.jumping = false;
        self.jumps_left = PLAYER_MAX_JUMPS;
    }

    /// Rest on a surface whose top is at `surface_y`
    pub fn land_on(&mut self, surface_y: f32) {
        self.pos.y = surface_y - self.size.y;
        self.vel.y = 0.0;
        self.jumping = false;
        self.jumps_left = PLAYER_MAX_JUMPS;
    }

    /// Spend a jump charge; false when none are left
    pub fn jump(&mut self) -> bool {
        if self.jumps_left == 0 {
            return false;
        }
        self.vel.y = PLAYER_JUMP_VELOCITY;
        self.jumping = true;
        self.jumps_left -= 1;
        self.sprite.frame = 0;
        true
    }

    /// Bounce off a stomped enemy; mid-air control stays available
    pub fn rebound(&mut self) {
        self.vel.y = PLAYER_JUMP_VELOCITY / 2.0;
        self.jumping = true;
    }

    /// Fire a projectile if able
    pub fn shoot(&mut self, cooldown_ms: f32) -> Option<Projectile> {
        if !self.can_shoot || self.shoot_cooldown_ms > 0.0 {
            return None;
        }
        self.shoot_cooldown_ms = cooldown_ms;
        let pos = Vec2::new(
            self.pos.x + self.size.x,
            self.pos.y + self.size.y / 2.0 - PROJECTILE_SIZE / 2.0,
        );
        Some(Projectile::new(pos))
    }

    /// Whether the blink animation currently hides the player
    pub fn blinked_out(&self, blink_interval_ms: f32) -> bool {
        self.is_invincible() && blink_hidden(self.blink_ms, blink_interval_ms)
    }
}

/// Blink phase: hidden during even half-periods
pub fn blink_hidden(blink_ms: f32, interval_ms: f32) -> bool {
    if interval_ms <= 0.0 {
        return false;
    }
    ((blink_ms / interval_ms).floor() as i64) % 2 == 0
}

/// Sinusoidal flight path
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlightPath {
    pub base_y: f32,
    pub amplitude: f32,
    /// Radians per millisecond
    pub frequency: f32,
    pub angle: f32,
}

/// Bomb-dropping behavior
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BombBay {
    pub cooldown_ms: f32,
    pub interval_ms: f32,
}

/// Boss encounter state carried by the boss enemy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossState {
    pub hit_points: u8,
    /// -1 moving left, 1 moving right
    pub direction: f32,
    pub min_x: f32,
    pub max_x: f32,
    pub patrol_speed: f32,
    pub vel_y: f32,
    pub jumping: bool,
    pub jump_cooldown_ms: f32,
    pub jump_interval_ms: f32,
    pub invincible_ms: f32,
    pub blink_ms: f32,
    pub minion_cooldown_ms: f32,
    pub defeated: bool,
}

impl BossState {
    pub fn is_invincible(&self) -> bool {
        self.invincible_ms > 0.0
    }
}

/// Enemy variants with their type-specific payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EnemyKind {
    Ground,
    Flying(FlightPath),
    Ground2,
    BombDropper(BombBay),
    Boss(Box<BossState>),
}

/// An enemy (shared base record + variant payload)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Vec2,
    pub size: Vec2,
    /// Leftward speed (px/s) before the stage multiplier
    pub speed: f32,
    pub active: bool,
    pub stomped: bool,
    /// Squash time left once stomped
    pub stomp_ms: f32,
    pub sprite: SpriteCursor,
    pub kind: EnemyKind,
}

impl Enemy {
    fn base(pos: Vec2, size: Vec2, speed: f32, sprite: SpriteCursor, kind: EnemyKind) -> Self {
        Self {
            pos,
            size,
            speed,
            active: true,
            stomped: false,
            stomp_ms: 0.0,
            sprite,
            kind,
        }
    }

    /// Basic walker
    pub fn ground(pos: Vec2, size: Vec2, speed: f32) -> Self {
        Self::base(pos, size, speed, SpriteCursor::new(8, 7), EnemyKind::Ground)
    }

    pub fn flying(pos: Vec2, size: Vec2, speed: f32, amplitude: f32, frequency: f32, phase: f32) -> Self {
        let path = FlightPath {
            base_y: pos.y,
            amplitude,
            frequency,
            angle: phase,
        };
        Self::base(pos, size, speed, SpriteCursor::new(2, 15), EnemyKind::Flying(path))
    }

    /// Heavy walker
    pub fn ground2(pos: Vec2, size: Vec2, speed: f32) -> Self {
        Self::base(pos, size, speed, SpriteCursor::new(4, 10), EnemyKind::Ground2)
    }

    /// Drops its first bomb on its first update
    pub fn bomb_dropper(pos: Vec2, size: Vec2, speed: f32, drop_interval_ms: f32) -> Self {
        let bay = BombBay {
            cooldown_ms: 0.0,
            interval_ms: drop_interval_ms,
        };
        Self::base(pos, size, speed, SpriteCursor::new(2, 15), EnemyKind::BombDropper(bay))
    }

    pub fn new_boss(pos: Vec2, size: Vec2, state: BossState) -> Self {
        let speed = state.patrol_speed;
        Self::base(pos, size, speed, SpriteCursor::new(18, 4), EnemyKind::Boss(Box::new(state)))
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn is_boss(&self) -> bool {
        matches!(self.kind, EnemyKind::Boss(_))
    }

    pub fn boss(&self) -> Option<&BossState> {
        match &self.kind {
            EnemyKind::Boss(boss) => Some(boss),
            _ => None,
        }
    }

    pub fn boss_mut(&mut self) -> Option<&mut BossState> {
        match &mut self.kind {
            EnemyKind::Boss(boss) => Some(boss),
            _ => None,
        }
    }

    /// Can still collide (not squashing, not removed)
    pub fn is_live(&self) -> bool {
        self.active && !self.stomped
    }

    /// Start the squash-and-despawn animation
    pub fn stomp(&mut self, despawn_ms: f32) {
        self.stomped = true;
        self.stomp_ms = despawn_ms;
    }
}

/// A player shot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub size: Vec2,
    /// Rightward speed (px/s)
    pub speed: f32,
    pub active: bool,
}

impl Projectile {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            size: Vec2::splat(PROJECTILE_SIZE),
            speed: PROJECTILE_SPEED,
            active: true,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }
}

/// A bomb dropped by a BombDropper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bomb {
    pub pos: Vec2,
    pub size: Vec2,
    pub vel_y: f32,
    pub gravity: f32,
    pub active: bool,
}

impl Bomb {
    /// Bomb released from under `dropper`, centered on it
    pub fn dropped_from(dropper: &Rect) -> Self {
        Self {
            pos: Vec2::new(dropper.x + dropper.w / 2.0 - BOMB_SIZE / 2.0, dropper.bottom()),
            size: Vec2::splat(BOMB_SIZE),
            vel_y: 0.0,
            gravity: BOMB_GRAVITY,
            active: true,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }
}

/// Terrain block variants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BlockKind {
    Static,
    /// Oscillates vertically between `min_y` (top bound) and `max_y` (bottom bound)
    MovingPlatform {
        min_y: f32,
        max_y: f32,
        speed_y: f32,
        /// -1 up, 1 down
        direction: f32,
    },
    /// Breaks when bumped from below, optionally releasing an item
    Breakable {
        broken: bool,
        break_ms: f32,
        item: Option<ItemKind>,
    },
}

/// A terrain block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: BlockKind,
    pub active: bool,
}

impl Block {
    pub fn solid(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
            kind: BlockKind::Static,
            active: true,
        }
    }

    /// Platform starting at the bottom of its range, moving up first
    pub fn moving_platform(x: f32, w: f32, h: f32, min_y: f32, max_y: f32, speed_y: f32) -> Self {
        Self {
            pos: Vec2::new(x, max_y),
            size: Vec2::new(w, h),
            kind: BlockKind::MovingPlatform {
                min_y,
                max_y,
                speed_y,
                direction: -1.0,
            },
            active: true,
        }
    }

    pub fn breakable(x: f32, y: f32, w: f32, h: f32, item: Option<ItemKind>) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
            kind: BlockKind::Breakable {
                broken: false,
                break_ms: 0.0,
                item,
            },
            active: true,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn is_broken(&self) -> bool {
        matches!(self.kind, BlockKind::Breakable { broken: true, .. })
    }

    /// Can be stood on
    pub fn is_solid(&self) -> bool {
        self.active && !self.is_broken()
    }

    /// Vertical platform velocity (px/s), 0 for non-moving blocks
    pub fn vertical_speed(&self) -> f32 {
        match self.kind {
            BlockKind::MovingPlatform { speed_y, direction, .. } => speed_y * direction,
            _ => 0.0,
        }
    }
}

/// Pickup kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    Health,
    Invincibility,
    ShootAbility,
    StageClear,
}

/// A collectible
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: ItemKind,
    /// Fixed items do not scroll with the world
    pub fixed: bool,
    pub active: bool,
}

impl Item {
    pub fn new(pos: Vec2, kind: ItemKind) -> Self {
        let size = match kind {
            ItemKind::StageClear => STAGE_CLEAR_ITEM_SIZE,
            _ => ITEM_SIZE,
        };
        Self {
            pos,
            size: Vec2::splat(size),
            kind,
            fixed: false,
            active: true,
        }
    }

    /// A non-scrolling item
    pub fn fixed(pos: Vec2, kind: ItemKind) -> Self {
        Self {
            fixed: true,
            ..Self::new(pos, kind)
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }
}
