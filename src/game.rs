//! Host driver
//!
//! Owns the session plus the three injected capabilities (renderer, audio sink,
//! input source). The host calls `frame` once per animation frame and `command`
//! for UI lifecycle buttons; everything else is internal.

use crate::audio::{AudioManager, AudioSink};
use crate::platform::{Clock, InputBuffer, InputSource};
use crate::renderer::{AssetTable, Renderer, build_draw_list, draw_frame};
use crate::settings::Settings;
use crate::sim::{Command, GameEvent, GamePhase, GameState, HudSnapshot, apply_command, tick};
use crate::tuning::Tuning;

pub struct Game<R: Renderer, A: AudioSink, I: InputSource> {
    state: GameState,
    clock: Clock,
    buffer: InputBuffer,
    renderer: R,
    audio: AudioManager<A>,
    input: I,
    assets: AssetTable,
    settings: Settings,
}

impl<R: Renderer, A: AudioSink, I: InputSource> Game<R, A, I> {
    pub fn new(seed: u64, tuning: Tuning, settings: Settings, renderer: R, audio: A, input: I) -> Self {
        log::info!("Stomp Runner session created (seed {seed})");
        Self {
            state: GameState::new(seed, tuning),
            clock: Clock::new(),
            buffer: InputBuffer::new(),
            renderer,
            audio: AudioManager::new(audio, &settings),
            input,
            assets: AssetTable::new(),
            settings,
        }
    }

    /// Apply a lifecycle command from the UI
    pub fn command(&mut self, command: Command) -> Vec<GameEvent> {
        let events = apply_command(&mut self.state, command);
        if self.state.phase == GamePhase::Running && !events.is_empty() {
            // Time spent in menus or paused must not reach the next tick
            self.clock.resync();
            self.buffer.clear_edges();
        }
        self.audio.handle_events(&events, self.state.stage);
        events
    }

    /// Run one animation frame at host time `now_ms`
    pub fn frame(&mut self, now_ms: f64) -> Vec<GameEvent> {
        self.buffer.poll(&mut self.input);

        let mut events = Vec::new();
        if self.buffer.take_pause() {
            events.extend(self.command(Command::TogglePause));
        }

        if self.state.phase == GamePhase::Running {
            let dt = self.clock.delta(now_ms);
            let input = self.buffer.take();
            let tick_events = tick(&mut self.state, &input, dt);
            self.audio.handle_events(&tick_events, self.state.stage);
            events.extend(tick_events);
        } else {
            self.clock.resync();
            self.buffer.clear_edges();
        }

        let commands = build_draw_list(&self.state, self.settings.reduced_motion);
        draw_frame(&mut self.renderer, &self.assets, &commands);
        events
    }

    pub fn hud(&self) -> HudSnapshot {
        self.state.hud()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn apply_settings(&mut self, settings: Settings) {
        self.audio.apply_settings(&settings);
        self.settings = settings;
    }

    /// Asset load results are reported here by the host loader
    pub fn assets_mut(&mut self) -> &mut AssetTable {
        &mut self.assets
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    /// Read the session while feeding the input source (bots, replays)
    pub fn state_and_input(&mut self) -> (&GameState, &mut I) {
        (&self.state, &mut self.input)
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn audio(&self) -> &AudioManager<A> {
        &self.audio
    }
}
