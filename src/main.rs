//! Stomp Runner headless runner
//!
//! Plays a seeded session in attract mode: a simple autopilot feeds logical
//! input events, game overs are continued and cleared stages advanced. Prints a
//! JSON run summary on stdout.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use serde::Serialize;

use stomp_runner::audio::{AudioError, AudioSink};
use stomp_runner::platform::{ButtonState, InputEvent, ScriptedInput};
use stomp_runner::renderer::{AssetId, AssetTable, Color, Renderer};
use stomp_runner::sim::{Command, GameEvent, GamePhase, GameState, HudSnapshot, MoveDir, Rect};
use stomp_runner::{Game, Settings, Tuning};

#[derive(Parser, Debug)]
#[command(name = "stomp-runner")]
#[command(about = "Run a seeded Stomp Runner session headless and report the outcome")]
struct Args {
    /// Run seed
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Animation frames to simulate
    #[arg(long, default_value_t = 18_000)]
    frames: u32,
    /// Host frame interval (ms)
    #[arg(long, default_value_t = 16.7)]
    frame_ms: f64,
    /// Balance overrides (JSON)
    #[arg(long)]
    tuning: Option<PathBuf>,
    /// Player preferences (JSON)
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Pretty-print the summary
    #[arg(long)]
    pretty: bool,
}

/// Counts draw calls instead of painting
#[derive(Debug, Default)]
struct HeadlessRenderer {
    blits: u64,
    fills: u64,
}

impl Renderer for HeadlessRenderer {
    fn blit(&mut self, _asset: AssetId, _source: Option<Rect>, _dest: Rect) {
        self.blits += 1;
    }

    fn fill(&mut self, _color: Color, _dest: Rect) {
        self.fills += 1;
    }
}

/// Logs clips instead of playing them
#[derive(Debug, Default)]
struct LogAudio {
    clips: u64,
}

impl AudioSink for LogAudio {
    fn play_clip(&mut self, clip: &str, volume: f32) -> Result<(), AudioError> {
        log::trace!("clip {clip} @ {volume:.2}");
        self.clips += 1;
        Ok(())
    }

    fn play_music(&mut self, track: &str, volume: f32) -> Result<(), AudioError> {
        log::debug!("music {track} @ {volume:.2}");
        Ok(())
    }

    fn stop_music(&mut self) {
        log::debug!("music stopped");
    }
}

/// Attract-mode player: hops over what is coming and shoots when it can
#[derive(Debug, Default)]
struct Autopilot {
    held: Option<MoveDir>,
}

impl Autopilot {
    /// How far ahead a threat triggers a jump (px)
    const LOOKAHEAD: f32 = 110.0;

    fn steer(&mut self, state: &GameState, out: &mut ScriptedInput) {
        let player = state.player.rect();

        let want = match state.boss_enemy() {
            // Chase the boss's head
            Some(boss) => {
                let center = boss.rect().center().x;
                if center > player.center().x + 20.0 {
                    Some(MoveDir::Right)
                } else if center < player.center().x - 20.0 {
                    Some(MoveDir::Left)
                } else {
                    None
                }
            }
            None if player.x < 120.0 => Some(MoveDir::Right),
            None if player.x > 260.0 => Some(MoveDir::Left),
            None => None,
        };
        self.hold(want, out);

        let threatened = state
            .enemies
            .iter()
            .filter(|e| e.is_live())
            .map(|e| e.rect())
            .chain(state.bombs.iter().map(|b| b.rect()))
            .any(|r| {
                let ahead = r.left() - player.right();
                let level = r.bottom() > player.top() - 40.0 && r.top() < player.bottom();
                level && (-20.0..Self::LOOKAHEAD).contains(&ahead)
            });
        let near_boss = state
            .boss_enemy()
            .is_some_and(|b| (b.rect().center().x - player.center().x).abs() < 80.0);
        if (threatened || near_boss) && !state.player.jumping {
            out.push(InputEvent::Jump);
        }

        if state.player.can_shoot && state.player.shoot_cooldown_ms <= 0.0 {
            out.push(InputEvent::Shoot);
        }
    }

    fn hold(&mut self, want: Option<MoveDir>, out: &mut ScriptedInput) {
        if want == self.held {
            return;
        }
        if let Some(dir) = self.held {
            out.push(button(dir, ButtonState::Released));
        }
        if let Some(dir) = want {
            out.push(button(dir, ButtonState::Pressed));
        }
        self.held = want;
    }
}

fn button(dir: MoveDir, state: ButtonState) -> InputEvent {
    match dir {
        MoveDir::Left => InputEvent::MoveLeft(state),
        MoveDir::Right => InputEvent::MoveRight(state),
    }
}

#[derive(Debug, Default, Serialize)]
struct RunSummary {
    seed: u64,
    frames: u32,
    final_hud: Option<HudSnapshot>,
    stages_cleared: u32,
    continues_used: u32,
    completed: bool,
    completion_score: Option<u64>,
    stomps: u32,
    enemies_shot: u32,
    boss_hits: u32,
    damage_taken: u32,
    items_collected: u32,
    blocks_broken: u32,
    draw_blits: u64,
    draw_fills: u64,
    clips_played: u64,
}

impl RunSummary {
    fn record(&mut self, events: &[GameEvent]) {
        for event in events {
            match event {
                GameEvent::EnemyStomped => self.stomps += 1,
                GameEvent::EnemyShot => self.enemies_shot += 1,
                GameEvent::BossHit { .. } => self.boss_hits += 1,
                GameEvent::PlayerDamaged { .. } => self.damage_taken += 1,
                GameEvent::ItemCollected { .. } => self.items_collected += 1,
                GameEvent::BlockBroken => self.blocks_broken += 1,
                GameEvent::StageCleared { .. } => self.stages_cleared += 1,
                GameEvent::Continued { .. } => self.continues_used += 1,
                GameEvent::GameComplete { score } => {
                    self.completed = true;
                    self.completion_score = Some(*score);
                }
                _ => {}
            }
        }
    }
}

fn load_tuning(path: Option<&PathBuf>) -> Result<Tuning> {
    let Some(path) = path else {
        return Ok(Tuning::default());
    };
    let text = fs::read_to_string(path).with_context(|| format!("reading tuning file {}", path.display()))?;
    Tuning::from_json(&text).with_context(|| format!("parsing tuning file {}", path.display()))
}

fn run(args: &Args) -> Result<RunSummary> {
    if args.frames == 0 {
        return Err(anyhow!("--frames must be > 0"));
    }
    if args.frame_ms.is_nan() || args.frame_ms <= 0.0 {
        return Err(anyhow!("--frame-ms must be positive"));
    }

    let tuning = load_tuning(args.tuning.as_ref())?;
    let settings = args.settings.as_deref().map(Settings::load).unwrap_or_default();

    let mut game = Game::new(
        args.seed,
        tuning,
        settings,
        HeadlessRenderer::default(),
        LogAudio::default(),
        ScriptedInput::new(),
    );
    *game.assets_mut() = AssetTable::all_ready();

    let mut summary = RunSummary {
        seed: args.seed,
        ..Default::default()
    };
    let mut pilot = Autopilot::default();
    summary.record(&game.command(Command::Start));

    for frame in 0..args.frames {
        let now = f64::from(frame) * args.frame_ms;
        match game.state().phase {
            GamePhase::GameOver if game.state().continues > 0 => {
                summary.record(&game.command(Command::Continue));
            }
            GamePhase::GameOver => break,
            GamePhase::StageClear => summary.record(&game.command(Command::AdvanceStage)),
            GamePhase::Idle => break,
            GamePhase::Running | GamePhase::Paused => {}
        }
        if game.state().phase == GamePhase::Running {
            let (state, input) = game.state_and_input();
            pilot.steer(state, input);
        }
        summary.record(&game.frame(now));
        summary.frames = frame + 1;
    }

    summary.final_hud = Some(game.hud());
    summary.draw_blits = game.renderer().blits;
    summary.draw_fills = game.renderer().fills;
    summary.clips_played = game.audio().sink().clips;
    log::info!(
        "Run finished after {} frames: score {}, stage {}",
        summary.frames,
        game.hud().score,
        game.hud().stage
    );
    Ok(summary)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let summary = run(&args)?;
    let json = if args.pretty {
        serde_json::to_string_pretty(&summary)?
    } else {
        serde_json::to_string(&summary)?
    };
    println!("{json}");
    Ok(())
}
