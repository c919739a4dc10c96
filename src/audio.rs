//! Audio routing
//!
//! The simulation only reports `GameEvent`s. This module maps them onto named
//! clips and stage music and forwards them to a host-supplied `AudioSink`.
//! Playback is fire-and-forget: sink failures are logged and dropped.

use std::fmt;

use crate::settings::Settings;
use crate::sim::{GameEvent, ItemKind};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player jumps
    Jump,
    /// Player takes damage
    Hit,
    /// Enemy stomped or shot, or the boss takes a hit
    EnemyHit,
    /// Pickup collected
    CollectItem,
    /// Breakable block broken
    BlockHit,
    /// Stage cleared
    StageClear,
    /// Player fires
    Shoot,
    /// A bomb is released
    BombDrop,
}

impl SoundEffect {
    /// Asset name of the clip
    pub fn clip_name(self) -> &'static str {
        match self {
            SoundEffect::Jump => "jump",
            SoundEffect::Hit => "hit",
            SoundEffect::EnemyHit => "enemy_hit",
            SoundEffect::CollectItem => "collect_item",
            SoundEffect::BlockHit => "block_hit",
            SoundEffect::StageClear => "stage_clear",
            SoundEffect::Shoot => "shoot",
            SoundEffect::BombDrop => "bomb_drop",
        }
    }

    /// Clip for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Jumped => Some(SoundEffect::Jump),
            GameEvent::Shot => Some(SoundEffect::Shoot),
            GameEvent::BombDropped => Some(SoundEffect::BombDrop),
            GameEvent::EnemyStomped | GameEvent::EnemyShot | GameEvent::BossHit { .. } => {
                Some(SoundEffect::EnemyHit)
            }
            GameEvent::PlayerDamaged { .. } => Some(SoundEffect::Hit),
            GameEvent::BlockBroken => Some(SoundEffect::BlockHit),
            // A heal at full lives is silent; the clear item has its own fanfare
            GameEvent::ItemCollected { kind, applied } => {
                (*applied && *kind != ItemKind::StageClear).then_some(SoundEffect::CollectItem)
            }
            GameEvent::StageCleared { .. } => Some(SoundEffect::StageClear),
            _ => None,
        }
    }
}

/// Background music, one track per stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicTrack {
    Field,
    BossArena,
}

impl MusicTrack {
    pub fn for_stage(stage: u32) -> Self {
        if stage == crate::consts::BOSS_STAGE {
            MusicTrack::BossArena
        } else {
            MusicTrack::Field
        }
    }

    pub fn clip_name(self) -> &'static str {
        match self {
            MusicTrack::Field => "bgm",
            MusicTrack::BossArena => "bgm_stage2",
        }
    }
}

/// Why a sink could not play a clip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioError {
    pub clip: String,
    pub reason: String,
}

impl AudioError {
    pub fn new(clip: &str, reason: impl Into<String>) -> Self {
        Self {
            clip: clip.to_owned(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot play '{}': {}", self.clip, self.reason)
    }
}

impl std::error::Error for AudioError {}

/// Host audio backend
pub trait AudioSink {
    /// Play a clip from the start
    fn play_clip(&mut self, clip: &str, volume: f32) -> Result<(), AudioError>;
    /// Start a looping music track, replacing any current one
    fn play_music(&mut self, track: &str, volume: f32) -> Result<(), AudioError>;
    fn stop_music(&mut self);
}

/// Sink that plays nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play_clip(&mut self, _clip: &str, _volume: f32) -> Result<(), AudioError> {
        Ok(())
    }

    fn play_music(&mut self, _track: &str, _volume: f32) -> Result<(), AudioError> {
        Ok(())
    }

    fn stop_music(&mut self) {}
}

/// Audio manager for the game
pub struct AudioManager<S: AudioSink> {
    sink: S,
    settings: Settings,
}

impl<S: AudioSink> AudioManager<S> {
    pub fn new(sink: S, settings: &Settings) -> Self {
        Self {
            sink,
            settings: settings.clone(),
        }
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.set_muted(settings.muted);
        self.settings = settings.clone();
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.settings.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.settings.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio. Muting also stops the music.
    pub fn set_muted(&mut self, muted: bool) {
        if muted && !self.settings.muted {
            self.sink.stop_music();
        }
        self.settings.muted = muted;
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.settings.effective_sfx_volume();
        if vol <= 0.0 {
            return;
        }
        if let Err(err) = self.sink.play_clip(effect.clip_name(), vol) {
            log::warn!("Sound effect dropped: {err}");
        }
    }

    pub fn start_music(&mut self, track: MusicTrack) {
        let vol = self.settings.effective_music_volume();
        if vol <= 0.0 {
            return;
        }
        if let Err(err) = self.sink.play_music(track.clip_name(), vol) {
            log::warn!("Music unavailable: {err}");
        }
    }

    pub fn stop_music(&mut self) {
        self.sink.stop_music();
    }

    /// Route one batch of simulation events. `stage` is the stage after the batch.
    pub fn handle_events(&mut self, events: &[GameEvent], stage: u32) {
        for event in events {
            if let Some(effect) = SoundEffect::for_event(event) {
                self.play(effect);
            }
            match event {
                GameEvent::StageStarted { stage } => self.start_music(MusicTrack::for_stage(*stage)),
                GameEvent::Resumed => self.start_music(MusicTrack::for_stage(stage)),
                GameEvent::Paused | GameEvent::GameOver | GameEvent::StageCleared { .. } | GameEvent::GameComplete { .. } => {
                    self.stop_music()
                }
                _ => {}
            }
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        clips: Vec<(String, f32)>,
        music: Option<String>,
        fail: bool,
    }

    impl AudioSink for Recorder {
        fn play_clip(&mut self, clip: &str, volume: f32) -> Result<(), AudioError> {
            if self.fail {
                return Err(AudioError::new(clip, "not loaded"));
            }
            self.clips.push((clip.to_owned(), volume));
            Ok(())
        }

        fn play_music(&mut self, track: &str, _volume: f32) -> Result<(), AudioError> {
            if self.fail {
                return Err(AudioError::new(track, "not loaded"));
            }
            self.music = Some(track.to_owned());
            Ok(())
        }

        fn stop_music(&mut self) {
            self.music = None;
        }
    }

    fn names(manager: &AudioManager<Recorder>) -> Vec<&str> {
        manager.sink().clips.iter().map(|(c, _)| c.as_str()).collect()
    }

    #[test]
    fn test_event_mapping() {
        let mut audio = AudioManager::new(Recorder::default(), &Settings::default());
        audio.handle_events(
            &[
                GameEvent::Jumped,
                GameEvent::EnemyStomped,
                GameEvent::BossHit { hit_points_left: 3 },
                GameEvent::PlayerDamaged { lives: 2 },
                GameEvent::BlockBroken,
                GameEvent::ItemCollected {
                    kind: ItemKind::Health,
                    applied: false,
                },
                GameEvent::ItemCollected {
                    kind: ItemKind::ShootAbility,
                    applied: true,
                },
                GameEvent::BossSpawned,
            ],
            3,
        );
        assert_eq!(
            names(&audio),
            vec!["jump", "enemy_hit", "enemy_hit", "hit", "block_hit", "collect_item"]
        );
    }

    #[test]
    fn test_music_follows_session() {
        let mut audio = AudioManager::new(Recorder::default(), &Settings::default());
        audio.handle_events(&[GameEvent::StageStarted { stage: 3 }], 3);
        assert_eq!(audio.sink().music.as_deref(), Some("bgm"));

        audio.handle_events(&[GameEvent::Paused], 3);
        assert_eq!(audio.sink().music, None);

        audio.handle_events(&[GameEvent::Resumed], 4);
        assert_eq!(audio.sink().music.as_deref(), Some("bgm_stage2"));

        audio.handle_events(&[GameEvent::StageCleared { stage: 4, final_stage: true }], 4);
        assert_eq!(audio.sink().music, None);
        assert_eq!(names(&audio), vec!["stage_clear"]);
    }

    #[test]
    fn test_volume_and_mute() {
        let settings = Settings {
            master_volume: 0.5,
            sfx_volume: 0.5,
            ..Default::default()
        };
        let mut audio = AudioManager::new(Recorder::default(), &settings);
        audio.play(SoundEffect::Shoot);
        assert_eq!(audio.sink().clips, vec![("shoot".to_owned(), 0.25)]);

        audio.set_muted(true);
        audio.play(SoundEffect::Shoot);
        audio.start_music(MusicTrack::Field);
        assert_eq!(audio.sink().clips.len(), 1);
        assert_eq!(audio.sink().music, None);
    }

    #[test]
    fn test_sink_failures_are_swallowed() {
        let sink = Recorder {
            fail: true,
            ..Default::default()
        };
        let mut audio = AudioManager::new(sink, &Settings::default());
        audio.handle_events(&[GameEvent::StageStarted { stage: 3 }, GameEvent::Jumped], 3);
        assert!(audio.sink().clips.is_empty());
    }

    #[test]
    fn test_error_display() {
        let err = AudioError::new("jump", "decode failed");
        assert_eq!(err.to_string(), "cannot play 'jump': decode failed");
    }
}
