//! Platform abstraction layer
//!
//! Host-facing plumbing that stays outside the simulation:
//! - Time: frame timestamps to clamped tick deltas
//! - Input: logical input events buffered into per-tick input

pub mod input;
pub mod time;

pub use input::{ButtonState, InputBuffer, InputEvent, InputSource, ScriptedInput};
pub use time::Clock;
