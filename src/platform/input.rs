//! Logical input
//!
//! Hosts translate keys, buttons or touches into `InputEvent`s. The buffer keeps
//! only the latest horizontal intent and edge-triggers jump, shoot and pause,
//! so events arriving between ticks are never lost and never repeat.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::sim::{MoveDir, TickInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ButtonState {
    Pressed,
    Released,
}

/// Discrete input events delivered by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    MoveLeft(ButtonState),
    MoveRight(ButtonState),
    Jump,
    Shoot,
    TogglePause,
}

/// Source of input events, polled once per frame
pub trait InputSource {
    /// Next pending event, or None when drained
    fn next_event(&mut self) -> Option<InputEvent>;
}

/// Per-tick accumulation of input events
#[derive(Debug, Clone, Default)]
pub struct InputBuffer {
    left_held: bool,
    right_held: bool,
    /// Most recently pressed direction wins while both are held
    latest: Option<MoveDir>,
    jump: bool,
    shoot: bool,
    pause: bool,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        match event {
            InputEvent::MoveLeft(state) => {
                self.left_held = state == ButtonState::Pressed;
                self.update_direction(MoveDir::Left, self.left_held);
            }
            InputEvent::MoveRight(state) => {
                self.right_held = state == ButtonState::Pressed;
                self.update_direction(MoveDir::Right, self.right_held);
            }
            InputEvent::Jump => self.jump = true,
            InputEvent::Shoot => self.shoot = true,
            InputEvent::TogglePause => self.pause = true,
        }
    }

    fn update_direction(&mut self, dir: MoveDir, held: bool) {
        if held {
            self.latest = Some(dir);
        } else if self.latest == Some(dir) {
            // Fall back to the other direction if it is still held
            self.latest = match dir {
                MoveDir::Left if self.right_held => Some(MoveDir::Right),
                MoveDir::Right if self.left_held => Some(MoveDir::Left),
                _ => None,
            };
        }
    }

    /// Drain every pending event from a source
    pub fn poll<S: InputSource + ?Sized>(&mut self, source: &mut S) {
        while let Some(event) = source.next_event() {
            self.push(event);
        }
    }

    /// Input for the next tick. Clears the one-shot presses.
    pub fn take(&mut self) -> TickInput {
        let input = TickInput {
            move_dir: self.latest,
            jump: self.jump,
            shoot: self.shoot,
        };
        self.jump = false;
        self.shoot = false;
        input
    }

    /// Whether pause was pressed since the last call
    pub fn take_pause(&mut self) -> bool {
        std::mem::take(&mut self.pause)
    }

    /// Drop one-shot presses without consuming them (frozen or paused frames)
    pub fn clear_edges(&mut self) {
        self.jump = false;
        self.shoot = false;
    }
}

/// Queue-backed source for tests, replays and the headless runner
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    queue: VecDeque<InputEvent>,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        self.queue.push_back(event);
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

impl InputSource for ScriptedInput {
    fn next_event(&mut self) -> Option<InputEvent> {
        self.queue.pop_front()
    }
}

impl FromIterator<InputEvent> for ScriptedInput {
    fn from_iter<T: IntoIterator<Item = InputEvent>>(iter: T) -> Self {
        Self {
            queue: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_direction_wins() {
        let mut buffer = InputBuffer::new();
        buffer.push(InputEvent::MoveLeft(ButtonState::Pressed));
        buffer.push(InputEvent::MoveRight(ButtonState::Pressed));
        assert_eq!(buffer.take().move_dir, Some(MoveDir::Right));

        buffer.push(InputEvent::MoveRight(ButtonState::Released));
        assert_eq!(buffer.take().move_dir, Some(MoveDir::Left));

        buffer.push(InputEvent::MoveLeft(ButtonState::Released));
        assert_eq!(buffer.take().move_dir, None);
    }

    #[test]
    fn test_direction_persists_across_ticks() {
        let mut buffer = InputBuffer::new();
        buffer.push(InputEvent::MoveRight(ButtonState::Pressed));
        assert_eq!(buffer.take().move_dir, Some(MoveDir::Right));
        assert_eq!(buffer.take().move_dir, Some(MoveDir::Right));
    }

    #[test]
    fn test_presses_are_edge_triggered() {
        let mut buffer = InputBuffer::new();
        buffer.push(InputEvent::Jump);
        buffer.push(InputEvent::Jump);
        buffer.push(InputEvent::Shoot);

        let first = buffer.take();
        assert!(first.jump && first.shoot);
        let second = buffer.take();
        assert!(!second.jump && !second.shoot);
    }

    #[test]
    fn test_pause_is_taken_once() {
        let mut buffer = InputBuffer::new();
        buffer.push(InputEvent::TogglePause);
        assert!(buffer.take_pause());
        assert!(!buffer.take_pause());
    }

    #[test]
    fn test_clear_edges_keeps_direction() {
        let mut buffer = InputBuffer::new();
        buffer.push(InputEvent::MoveLeft(ButtonState::Pressed));
        buffer.push(InputEvent::Jump);
        buffer.clear_edges();
        let input = buffer.take();
        assert!(!input.jump);
        assert_eq!(input.move_dir, Some(MoveDir::Left));
    }

    #[test]
    fn test_poll_drains_scripted_source() {
        let mut source: ScriptedInput = [InputEvent::MoveRight(ButtonState::Pressed), InputEvent::Shoot]
            .into_iter()
            .collect();
        let mut buffer = InputBuffer::new();
        buffer.poll(&mut source);
        assert_eq!(source.pending(), 0);
        let input = buffer.take();
        assert_eq!(input.move_dir, Some(MoveDir::Right));
        assert!(input.shoot);
    }
}
