//! Aim Warmup entry point
//!
//! Native headless demo: plays each mode with a scripted pointer that
//! flicks toward targets with a slight overshoot, then logs the summary.
//!
//! Usage: `aim-warmup [--settings path.json] [--seed N] [--mode name]`

use glam::Vec2;
use std::path::Path;

use aim_warmup::GameSession;
use aim_warmup::consts::TICK_DT;
use aim_warmup::platform::PointerSource;
use aim_warmup::session::HostInput;
use aim_warmup::settings::Settings;
use aim_warmup::sim::{GameMode, GamePhase, SessionState};

/// Longest a non-timed demo round may run (seconds)
const DEMO_ROUND_LIMIT: f32 = 30.0;
/// Fraction of the remaining distance covered per tick
const BOT_GAIN: f32 = 0.02;
/// How far past the target the first flick aims, relative to the distance
const BOT_OVERSHOOT: f32 = 0.15;

/// Pointer driven by the demo bot
struct BotPointer {
    pos: Vec2,
}

impl PointerSource for BotPointer {
    fn position(&mut self) -> Vec2 {
        self.pos
    }

    fn warp_to(&mut self, pos: Vec2) {
        self.pos = pos;
    }
}

/// Flick-then-correct aiming
#[derive(Default)]
struct Bot {
    /// Target being aimed at
    aim: Option<Vec2>,
    /// Point past the target the first flick heads for
    overshoot: Vec2,
    corrected: bool,
}

impl Bot {
    /// Pointer counts to move this tick and whether to click
    fn step(&mut self, state: &SessionState) -> (Vec2, bool) {
        let camera = &state.camera;
        let tracking = state.mode() == GameMode::Tracking;
        let target = state
            .target_views()
            .into_iter()
            .filter(|view| tracking || view.is_shootable())
            .min_by(|a, b| {
                camera
                    .distance_to(a.pos)
                    .total_cmp(&camera.distance_to(b.pos))
            });
        let Some(target) = target else {
            self.aim = None;
            return (Vec2::ZERO, false);
        };

        let delta = camera.delta_to(target.pos);
        if tracking {
            self.corrected = true;
        } else if self.aim != Some(target.pos) {
            // New target: head past it first
            self.aim = Some(target.pos);
            self.overshoot = delta * BOT_OVERSHOOT;
            self.corrected = false;
        }

        let goal = if self.corrected {
            delta
        } else {
            delta + self.overshoot
        };
        if !self.corrected && goal.length() < target.half_size * 0.2 {
            self.corrected = true;
        }

        let sens = camera.sensitivity();
        let degrees = goal * BOT_GAIN;
        let counts = Vec2::new(
            degrees.x * sens.h_counts_per_degree(),
            -degrees.y * sens.v_counts_per_degree(),
        );
        let click = !tracking && self.corrected && delta.length() < target.half_size * 0.5;
        (counts, click)
    }
}

fn parse_args() -> (Settings, u64, Vec<GameMode>) {
    let mut settings = Settings::default();
    let mut seed = 12345;
    let mut modes = vec![
        GameMode::Random,
        GameMode::Shapes,
        GameMode::Debug,
        GameMode::Tracking,
    ];

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--settings" => match args.next() {
                Some(path) => settings = Settings::load_or_default(Path::new(&path)),
                None => log::warn!("--settings needs a path"),
            },
            "--seed" => match args.next().map(|s| s.parse::<u64>()) {
                Some(Ok(value)) => seed = value,
                _ => log::warn!("--seed needs an integer, using {seed}"),
            },
            "--mode" => match args.next().as_deref().and_then(GameMode::from_str) {
                Some(mode) => modes = vec![mode],
                None => log::warn!("Unknown mode, running all"),
            },
            other => log::warn!("Ignoring argument {other}"),
        }
    }
    (settings, seed, modes)
}

fn run_mode(session: &mut GameSession, pointer: &mut BotPointer, mode: GameMode) {
    session.start(mode, pointer);
    let mut bot = Bot::default();
    let limit = match mode {
        GameMode::Tracking => f32::INFINITY,
        _ => DEMO_ROUND_LIMIT,
    };

    while session.phase() == GamePhase::Running {
        if session.state().elapsed >= limit {
            let quit = HostInput {
                has_focus: true,
                quit: true,
                ..Default::default()
            };
            session.frame(pointer, quit, TICK_DT);
            break;
        }

        let (counts, click) = bot.step(session.state());
        pointer.pos += counts;
        let spawn_next =
            mode == GameMode::Debug && session.state().target_views().is_empty();
        session.frame(
            pointer,
            HostInput {
                has_focus: true,
                clicked: click,
                spawn_next,
                ..Default::default()
            },
            TICK_DT,
        );
    }

    let summary = session.summary();
    log::info!(
        "{}: hits {} misses {} accuracy {:?} reaction {:?}ms efficiency {:?}",
        mode.as_str(),
        summary.hits,
        summary.misses,
        summary.accuracy,
        summary.avg_reaction_ms,
        summary.avg_efficiency
    );
    if mode == GameMode::Tracking {
        log::info!(
            "Tracking: {:.1}s on target, {} destroyed",
            summary.time_on_target,
            summary.targets_destroyed
        );
    }
    log::info!(
        "Diagnosis: X {:?} Y {:?}",
        summary.diagnosis.x,
        summary.diagnosis.y
    );
    session.return_to_menu();
}

fn main() {
    env_logger::init();
    log::info!("Aim Warmup (headless demo) starting...");

    let (settings, seed, modes) = parse_args();
    let anchor = Vec2::new(
        settings.view.screen_width / 2.0,
        settings.view.screen_height / 2.0,
    );
    let mut session = GameSession::new(settings, seed, anchor);
    let mut pointer = BotPointer { pos: anchor };

    for mode in modes {
        run_mode(&mut session, &mut pointer, mode);
    }
}
