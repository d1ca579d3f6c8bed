//! Session state and core simulation types
//!
//! Everything the tick loop mutates lives in [`SessionState`]: camera,
//! target field, path tracker, statistics and the seeded RNG.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::analysis::{ApproachAnalysis, ShotClass};
use super::camera::Camera;
use super::field::{FieldContext, GameMode, TargetField};
use super::path::PathTracker;
use super::shapes::ShapeKind;
use super::stats::SessionStats;
use super::target::TargetView;
use crate::consts::*;
use crate::sensitivity::SensitivityModel;
use crate::settings::Settings;

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Mode selection, nothing ticking
    Menu,
    /// Exercise in progress
    Running,
    /// Exercise over, stats frozen
    Finished,
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FinishReason {
    /// Tracking round ran out of time
    TimeUp,
    /// Every shape was completed
    ShapesComplete,
    /// Player quit
    Quit,
}

/// Discrete things that happened during a tick, drained by the host
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Started(GameMode),
    /// Click registered as a shot
    Fired,
    Hit {
        pos: Vec2,
        precision: f32,
        reaction_time: f32,
        class: Option<ShotClass>,
    },
    Missed,
    Expired { pos: Vec2 },
    Destroyed { pos: Vec2 },
    ShapeCompleted { kind: ShapeKind, shapes_done: usize },
    /// Focus went away while locked
    FocusLost,
    /// A click after refocus re-engaged the lock
    Relocked,
    Finished(FinishReason),
}

/// A recently visited camera position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailPoint {
    pub pos: Vec2,
    pub time: f32,
}

impl TrailPoint {
    /// 1 when fresh, fading to 0 at [`TRAIL_DURATION`]
    #[inline]
    pub fn opacity(&self, now: f32) -> f32 {
        (1.0 - (now - self.time) / TRAIL_DURATION).clamp(0.0, 1.0)
    }
}

/// What the last click did, for the HUD
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LastShot {
    pub hit: bool,
    pub precision: Option<f32>,
    pub efficiency: Option<f32>,
    pub reaction_time: Option<f32>,
    pub class: Option<ShotClass>,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Seed for reproducible target placement
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub settings: Settings,
    pub phase: GamePhase,
    pub finish_reason: Option<FinishReason>,
    pub camera: Camera,
    pub field: TargetField,
    pub path: PathTracker,
    pub stats: SessionStats,
    /// Seconds since start
    pub elapsed: f32,
    /// High-precision accumulator behind `elapsed`
    pub(crate) clock: f64,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Pointer captured: camera follows the mouse, shots count
    pub locked: bool,
    /// Lock was lost to a focus change and awaits a click
    pub was_locked: bool,
    /// Recent camera positions, newest first
    pub trail: Vec<TrailPoint>,
    pub(crate) last_trail_time: f32,
    pub last_analysis: Option<ApproachAnalysis>,
    pub last_shot: Option<LastShot>,
    /// Events produced since the host last drained them
    pub events: Vec<GameEvent>,
}

impl SessionState {
    /// Create a session sitting in the menu
    pub fn new(mut settings: Settings, seed: u64) -> Self {
        settings.sanitize();
        let sensitivity = SensitivityModel::from_settings(&settings.sensitivity);
        let camera = Camera::new(sensitivity, &settings.view);
        let field = TargetField::new(GameMode::default(), &settings);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            settings,
            phase: GamePhase::Menu,
            finish_reason: None,
            camera,
            field,
            path: PathTracker::new(),
            stats: SessionStats::default(),
            elapsed: 0.0,
            clock: 0.0,
            time_ticks: 0,
            locked: false,
            was_locked: false,
            trail: Vec::with_capacity(TRAIL_LENGTH),
            last_trail_time: 0.0,
            last_analysis: None,
            last_shot: None,
            events: Vec::new(),
        }
    }

    #[inline]
    pub fn mode(&self) -> GameMode {
        self.field.mode()
    }

    /// Start (or restart) an exercise; the pointer is captured immediately
    pub fn start(&mut self, mode: GameMode) {
        self.rng = Pcg32::seed_from_u64(self.seed);
        self.camera.reset();
        self.field = TargetField::new(mode, &self.settings);
        self.path.reset();
        self.stats.reset();
        self.elapsed = 0.0;
        self.clock = 0.0;
        self.time_ticks = 0;
        self.trail.clear();
        self.last_trail_time = 0.0;
        self.last_analysis = None;
        self.last_shot = None;
        self.finish_reason = None;
        self.locked = true;
        self.was_locked = false;
        self.phase = GamePhase::Running;

        let mut ctx = FieldContext {
            camera: &self.camera,
            now: 0.0,
            dt: 0.0,
            rng: &mut self.rng,
        };
        self.field.on_spawn(&mut ctx);

        log::info!("Started {} session (seed {})", mode.as_str(), self.seed);
        self.events.push(GameEvent::Started(mode));
    }

    /// End the exercise, freezing the stats
    pub fn finish(&mut self, reason: FinishReason) {
        if self.phase != GamePhase::Running {
            return;
        }
        self.phase = GamePhase::Finished;
        self.finish_reason = Some(reason);
        self.locked = false;

        let summary = self.stats.summary();
        log::info!(
            "{} session finished ({:?}) after {:.1}s: {} hits, {} misses",
            self.mode().as_str(),
            reason,
            self.elapsed,
            summary.hits,
            summary.misses
        );
        self.events.push(GameEvent::Finished(reason));
    }

    /// Leave a running or finished session for the menu
    pub fn return_to_menu(&mut self) {
        self.phase = GamePhase::Menu;
        self.locked = false;
        self.was_locked = false;
    }

    /// Clear statistics and analysis buffers without touching the targets
    pub fn reset_stats(&mut self) {
        self.stats.reset();
        self.last_analysis = None;
        self.last_shot = None;
        self.path.reset();
    }

    /// Apply changed settings, recomputing sensitivity and the view
    ///
    /// Target settings take effect on the next [`SessionState::start`].
    pub fn apply_settings(&mut self, mut settings: Settings) {
        settings.sanitize();
        let sensitivity = SensitivityModel::from_settings(&settings.sensitivity);
        self.camera.set_sensitivity(sensitivity);
        self.camera.set_view(&settings.view);
        log::info!(
            "Sensitivity: {:.3} / {:.3} counts per degree",
            sensitivity.h_counts_per_degree(),
            sensitivity.v_counts_per_degree()
        );
        self.settings = settings;
    }

    /// Advance the session clock by `dt` seconds
    pub(crate) fn advance_clock(&mut self, dt: f32) {
        self.time_ticks += 1;
        self.clock += f64::from(dt);
        self.elapsed = self.clock as f32;
    }

    /// Remember the current camera position for the motion trail
    pub(crate) fn record_trail(&mut self) {
        if self.elapsed - self.last_trail_time < self.settings.analysis.sample_interval {
            return;
        }
        self.last_trail_time = self.elapsed;
        self.trail.insert(
            0,
            TrailPoint {
                pos: self.camera.position(),
                time: self.elapsed,
            },
        );
        let now = self.elapsed;
        self.trail.retain(|point| now - point.time <= TRAIL_DURATION);
        self.trail.truncate(TRAIL_LENGTH);
    }

    /// Targets as they should be drawn right now
    pub fn target_views(&self) -> Vec<TargetView> {
        self.field.targets(&self.camera, self.elapsed)
    }

    /// Seconds left in a time-boxed round
    pub fn time_remaining(&self) -> Option<f32> {
        match self.mode() {
            GameMode::Tracking => Some((self.settings.tracking.duration - self.elapsed).max(0.0)),
            _ => None,
        }
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::ViewMode;

    #[test]
    fn test_new_session_waits_in_menu() {
        let state = SessionState::new(Settings::default(), 1);
        assert_eq!(state.phase, GamePhase::Menu);
        assert!(!state.locked);
    }

    #[test]
    fn test_start_populates_field_and_locks() {
        let mut state = SessionState::new(Settings::default(), 1);
        state.start(GameMode::Random);
        assert_eq!(state.phase, GamePhase::Running);
        assert!(state.locked);
        assert_eq!(state.target_views().len(), 3);
        assert_eq!(state.drain_events(), vec![GameEvent::Started(GameMode::Random)]);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_finish_only_once() {
        let mut state = SessionState::new(Settings::default(), 1);
        state.start(GameMode::Debug);
        state.finish(FinishReason::Quit);
        state.finish(FinishReason::TimeUp);
        assert_eq!(state.finish_reason, Some(FinishReason::Quit));
        assert_eq!(state.phase, GamePhase::Finished);
    }

    #[test]
    fn test_reset_stats_twice_matches_once() {
        let mut state = SessionState::new(Settings::default(), 1);
        state.start(GameMode::Random);
        state.stats.record_hit(0.25);
        state.stats.record_miss();
        state.stats.path_efficiencies.push(75.0);

        state.reset_stats();
        let once = state.stats.clone();
        state.reset_stats();
        assert_eq!(state.stats, once);
        assert_eq!(state.stats.hits, 0);
        assert_eq!(state.stats.misses, 0);
        assert!(state.stats.path_efficiencies.is_empty());
    }

    #[test]
    fn test_trail_opacity_fades() {
        let point = TrailPoint {
            pos: Vec2::ZERO,
            time: 1.0,
        };
        assert_eq!(point.opacity(1.0), 1.0);
        assert!((point.opacity(1.25) - 0.5).abs() < 1e-4);
        assert_eq!(point.opacity(2.0), 0.0);
    }

    #[test]
    fn test_negative_spawn_fraction_does_not_panic() {
        let settings = Settings::from_json(r#"{"debug":{"safe_fraction":-0.5}}"#)
            .expect("valid json");
        let mut state = SessionState::new(settings, 1);
        state.start(GameMode::Debug);
        assert_eq!(state.target_views().len(), 1);
    }

    #[test]
    fn test_view_settings_reach_camera() {
        let mut state = SessionState::new(Settings::default(), 1);
        let mut settings = state.settings.clone();
        settings.view.fov = 60.0;
        settings.view.view_mode = ViewMode::Room;
        state.apply_settings(settings);
        assert_eq!(state.camera.projection().fov, 60.0);
        assert_eq!(state.camera.view_mode(), ViewMode::Room);

        state.start(GameMode::Random);
        assert_eq!(state.camera.projection().fov, 60.0);
        assert_eq!(state.camera.view_mode(), ViewMode::Room);
    }

    #[test]
    fn test_clock_keeps_advancing_late_in_a_session() {
        let mut state = SessionState::new(Settings::default(), 1);
        state.clock = 40_000.0;
        state.elapsed = state.clock as f32;
        for _ in 0..1000 {
            state.advance_clock(0.001);
        }
        assert!((state.elapsed - 40_001.0).abs() < 0.01);
    }

    #[test]
    fn test_apply_settings_updates_camera() {
        let mut state = SessionState::new(Settings::default(), 1);
        let before = state.camera.sensitivity().h_counts_per_degree();
        let mut settings = state.settings.clone();
        settings.sensitivity.h_dpi *= 2.0;
        state.apply_settings(settings);
        let after = state.camera.sensitivity().h_counts_per_degree();
        assert!((after - before * 2.0).abs() < 1e-3);
    }
}
